pub mod markdown_renderer;
pub mod stack_parser;
pub mod tag_handler;
pub mod vocabulary;
