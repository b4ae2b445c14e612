use std::collections::VecDeque;

use log::{debug, trace};

use crate::config::ConvertOptions;
use crate::error::ParseError;
use crate::events::Event;
use crate::parsing::tag_handler::TagHandler;
use crate::parsing::vocabulary::handler_for;
use crate::tokens::{BlockToken, Document};

struct Frame {
    tag: String,
    handler: TagHandler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Finished,
    Failed,
}

/// Stack machine turning a flat event sequence into block tokens.
///
/// One frame is pushed per `Start` and popped per matching `End`. A popped handler is
/// finalized and its result handed to the handler below it, which decides whether
/// the result becomes part of its own content or is complete and ready to emit.
/// Finished blocks wait in an output buffer until the consumer pulls them, so the
/// parser only reads as many events as it needs to produce the next token.
///
/// # Usage
///
/// ```rust,no_run
/// use corpusmark::config::ConvertOptions;
/// use corpusmark::events::events_from_html;
/// use corpusmark::parsing::stack_parser::StackParser;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let events = events_from_html("<p>Hello <b>world</b>.</p>")?;
/// for token in StackParser::new(events, ConvertOptions::default()) {
///     println!("{:?}", token?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct StackParser<I> {
    events: I,
    options: ConvertOptions,
    stack: Vec<Frame>,
    output: VecDeque<BlockToken>,
    saw_title: bool,
    state: State,
}

impl<I> StackParser<I>
where
    I: Iterator<Item = Event>,
{
    pub fn new<E>(events: E, options: ConvertOptions) -> Self
    where
        E: IntoIterator<Item = Event, IntoIter = I>,
    {
        StackParser {
            events: events.into_iter(),
            options,
            stack: vec![Frame {
                tag: String::new(),
                handler: TagHandler::Ignore,
            }],
            output: VecDeque::new(),
            saw_title: false,
            state: State::Running,
        }
    }

    /// Number of currently open elements, not counting the document root.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    fn process(&mut self, event: Event) -> Result<(), ParseError> {
        match event {
            Event::DocumentStart => {}
            Event::DocumentEnd => self.finish()?,
            Event::Start { tag, attrs } => {
                let handler = handler_for(&tag, &attrs, &self.options)?;
                trace!("push <{tag}> at depth {}", self.depth());
                self.stack.push(Frame { tag, handler });
            }
            Event::End { tag } => self.close(&tag)?,
            Event::Characters { text } => {
                if let Some(top) = self.stack.last_mut() {
                    top.handler.handle_characters(&text);
                }
            }
        }
        Ok(())
    }

    fn close(&mut self, tag: &str) -> Result<(), ParseError> {
        if self.stack.len() <= 1 {
            return Err(ParseError::UnbalancedTag(tag.to_string()));
        }

        let frame = match self.stack.pop() {
            Some(frame) if frame.tag == tag => frame,
            Some(frame) => {
                debug!("</{tag}> closes while <{}> is still open", frame.tag);
                return Err(ParseError::UnbalancedTag(tag.to_string()));
            }
            None => return Err(ParseError::UnbalancedTag(tag.to_string())),
        };
        trace!("pop <{tag}> at depth {}", self.depth());

        let fragment = frame.handler.finalize()?;
        let parent = self
            .stack
            .last_mut()
            .ok_or_else(|| ParseError::UnbalancedTag(tag.to_string()))?;

        for token in parent.handler.accept(fragment) {
            if matches!(token, BlockToken::Title { .. }) {
                self.saw_title = true;
            }
            self.output.push_back(token);
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        self.state = State::Finished;

        if let Some(open) = self.stack.last().filter(|_| self.stack.len() > 1) {
            return Err(ParseError::UnbalancedTag(open.tag.clone()));
        }
        if self.options.require_title && !self.saw_title {
            return Err(ParseError::MissingTitle);
        }
        Ok(())
    }

    fn fail(&mut self, err: ParseError) -> Option<Result<BlockToken, ParseError>> {
        debug!("Parse aborted: {err}");
        self.state = State::Failed;
        self.output.clear();
        self.stack.truncate(1);
        Some(Err(err))
    }
}

impl<I> Iterator for StackParser<I>
where
    I: Iterator<Item = Event>,
{
    type Item = Result<BlockToken, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.state == State::Failed {
                return None;
            }
            if let Some(token) = self.output.pop_front() {
                return Some(Ok(token));
            }
            if self.state == State::Finished {
                return None;
            }

            let result = match self.events.next() {
                Some(event) => self.process(event),
                None => self.finish(),
            };
            if let Err(err) = result {
                return self.fail(err);
            }
        }
    }
}

impl<I> std::iter::FusedIterator for StackParser<I> where I: Iterator<Item = Event> {}

/// Parses a whole document. Any structural error discards every token.
pub fn parse_document<E>(events: E, options: &ConvertOptions) -> Result<Document, ParseError>
where
    E: IntoIterator<Item = Event>,
{
    let tokens = StackParser::new(events, options.clone()).collect::<Result<Vec<_>, _>>()?;
    Ok(Document { tokens })
}
