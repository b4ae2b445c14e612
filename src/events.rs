use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::ConvertError;

/// Flat markup event, the only input the stack parser understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    DocumentStart,
    DocumentEnd,
    Start {
        tag: String,
        attrs: BTreeMap<String, String>,
    },
    End {
        tag: String,
    },
    Characters {
        text: String,
    },
}

impl Event {
    pub fn start(tag: &str) -> Self {
        Event::Start {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn start_with(tag: &str, attrs: &[(&str, &str)]) -> Self {
        Event::Start {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    pub fn end(tag: &str) -> Self {
        Event::End {
            tag: tag.to_string(),
        }
    }

    pub fn text(text: &str) -> Self {
        Event::Characters {
            text: text.to_string(),
        }
    }
}

enum Step {
    DocumentStart,
    DocumentEnd,
    Enter(Handle),
    Leave(String),
}

/// Lazily walks an html5ever DOM and yields it as a balanced event sequence.
///
/// The walk keeps an explicit work stack instead of recursing, so the depth of the
/// markup never touches the call stack. Void elements such as `meta` still produce a
/// `Start`/`End` pair because the tree builder has already closed them.
///
/// The iterator owns the document root. Dropping the last handle to a node clears
/// the children of its whole subtree, so the walk must not outlive it.
pub struct DomEvents {
    _root: Handle,
    pending: Vec<Step>,
}

impl DomEvents {
    pub fn new(dom: &RcDom) -> Self {
        let mut pending = vec![Step::DocumentEnd];
        pending.extend(
            dom.document
                .children
                .borrow()
                .iter()
                .rev()
                .cloned()
                .map(Step::Enter),
        );
        pending.push(Step::DocumentStart);
        DomEvents {
            _root: dom.document.clone(),
            pending,
        }
    }

    fn push_children(&mut self, node: &Handle) {
        self.pending.extend(
            node.children
                .borrow()
                .iter()
                .rev()
                .cloned()
                .map(Step::Enter),
        );
    }
}

impl Iterator for DomEvents {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        loop {
            let node = match self.pending.pop()? {
                Step::DocumentStart => return Some(Event::DocumentStart),
                Step::DocumentEnd => return Some(Event::DocumentEnd),
                Step::Leave(tag) => return Some(Event::End { tag }),
                Step::Enter(node) => node,
            };

            match node.data {
                NodeData::Element {
                    ref name,
                    ref attrs,
                    ..
                } => {
                    let tag = name.local.to_string();
                    let attrs = attrs
                        .borrow()
                        .iter()
                        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                        .collect();
                    self.pending.push(Step::Leave(tag.clone()));
                    self.push_children(&node);
                    return Some(Event::Start { tag, attrs });
                }
                NodeData::Text { ref contents } => {
                    return Some(Event::Characters {
                        text: contents.borrow().to_string(),
                    });
                }
                NodeData::Document => {
                    self.push_children(&node);
                }
                // Doctype, comments and processing instructions carry no content.
                _ => {}
            }
        }
    }
}

pub fn events_from_reader<R: Read>(mut reader: R) -> Result<DomEvents, ConvertError> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut reader)?;

    if !dom.errors.is_empty() {
        log::debug!("html5ever reported {} recoverable errors", dom.errors.len());
    }

    Ok(DomEvents::new(&dom))
}

pub fn events_from_html(html: &str) -> Result<DomEvents, ConvertError> {
    events_from_reader(html.as_bytes())
}

/// Distinct element names opened anywhere in the event stream.
pub fn tag_inventory<I>(events: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = Event>,
{
    events
        .into_iter()
        .filter_map(|event| match event {
            Event::Start { tag, .. } => Some(tag),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(html: &str) -> Vec<Event> {
        events_from_html(html).unwrap().collect()
    }

    #[test]
    fn test_events_are_balanced_and_framed() {
        let events = collect("<html><head><title>T</title></head><body><p>Hi</p></body></html>");

        assert_eq!(events.first(), Some(&Event::DocumentStart));
        assert_eq!(events.last(), Some(&Event::DocumentEnd));

        let starts = events
            .iter()
            .filter(|e| matches!(e, Event::Start { .. }))
            .count();
        let ends = events
            .iter()
            .filter(|e| matches!(e, Event::End { .. }))
            .count();
        assert_eq!(starts, ends);
    }

    #[test]
    fn test_paragraph_event_order() {
        let events = collect("<body><p>Hello <b>world</b>.</p></body>");
        let p = events
            .iter()
            .position(|e| *e == Event::start("p"))
            .expect("p start");

        assert_eq!(
            &events[p..p + 7],
            &[
                Event::start("p"),
                Event::text("Hello "),
                Event::start("b"),
                Event::text("world"),
                Event::end("b"),
                Event::text("."),
                Event::end("p"),
            ]
        );
    }

    #[test]
    fn test_void_meta_is_closed() {
        let events = collect(r#"<html><head><meta charset="utf-8"></head><body></body></html>"#);
        let meta = events
            .iter()
            .position(|e| matches!(e, Event::Start { tag, .. } if tag == "meta"))
            .expect("meta start");

        assert_eq!(events[meta + 1], Event::end("meta"));
        if let Event::Start { attrs, .. } = &events[meta] {
            assert_eq!(attrs.get("charset").map(String::as_str), Some("utf-8"));
        }
    }

    #[test]
    fn test_comments_and_doctype_are_skipped() {
        let events = collect("<!DOCTYPE html><!-- note --><p>x</p>");
        assert!(events.iter().all(|e| match e {
            Event::Characters { text } => !text.contains("note"),
            _ => true,
        }));
    }

    // The RcDom built inside events_from_html is gone once this returns.
    fn events_for_later(html: &str) -> DomEvents {
        events_from_html(html).unwrap()
    }

    #[test]
    fn test_events_outlive_the_parsed_dom() {
        let events: Vec<Event> = events_for_later("<body><p>Hello <b>world</b>.</p></body>")
            .skip(1)
            .collect();

        assert!(events.contains(&Event::text("world")));
        assert!(events.contains(&Event::end("p")));
        assert!(events.len() > 4, "Expected nested events, got {events:?}");
    }

    #[test]
    fn test_tag_inventory() {
        let tags = tag_inventory(collect("<p>a <i>b</i> <sup>1</sup></p>"));
        let expected: BTreeSet<String> = ["body", "head", "html", "i", "p", "sup"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(tags, expected);
    }
}
