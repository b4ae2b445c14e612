pub mod config;
pub mod convert;
pub mod error;
pub mod events;
pub mod panic_handler;
pub mod parsing;
pub mod tokens;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ConvertOptions;
pub use convert::{convert_file, convert_html, parse_html};
pub use error::{ConvertError, ParseError};
pub use events::Event;
pub use parsing::markdown_renderer::MarkdownRenderer;
pub use parsing::stack_parser::{StackParser, parse_document};
pub use tokens::{BlockToken, Document, FormatKind, HeadingLevel, InlineItem};
