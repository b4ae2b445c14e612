use crate::error::ParseError;
use crate::tokens::{BlockToken, FormatKind, HeadingLevel, InlineItem};

/// Result of closing an element, handed to the element that contains it.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Block(BlockToken),
    Inline(InlineItem),
    /// Inline item that swallowed label anchors nested inside it.
    Labelled {
        item: InlineItem,
        labels: Vec<String>,
    },
}

impl Fragment {
    pub fn inline(item: InlineItem, labels: Vec<String>) -> Self {
        if labels.is_empty() {
            Fragment::Inline(item)
        } else {
            Fragment::Labelled { item, labels }
        }
    }
}

/// Accumulator bound to one open element.
///
/// Each variant owns everything it gathers until `finalize`. Content produced by
/// children only ever reaches a handler through `accept`.
#[derive(Debug, Clone, PartialEq)]
pub enum TagHandler {
    /// Structural container. Absorbs text and passes finished blocks up unchanged.
    Ignore,
    Title {
        text: TextBuffer,
        required: bool,
    },
    Heading {
        level: HeadingLevel,
        text: TextBuffer,
    },
    Paragraph(ParagraphBuilder),
    Anchor {
        kind: AnchorKind,
        text: TextBuffer,
        labels: Vec<String>,
    },
    InlineFormat {
        kind: FormatKind,
        text: TextBuffer,
        labels: Vec<String>,
    },
}

/// How an `<a>` was classified when it was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorKind {
    Label { id: String },
    Link { href: String },
}

/// Raw character data collected for one handler, normalized on flush.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBuffer(String);

impl TextBuffer {
    pub fn push(&mut self, chunk: &str) {
        self.0.push_str(chunk);
    }

    /// Glues a finished child onto the buffer as if it were separate words.
    pub fn push_word(&mut self, word: &str) {
        if !word.is_empty() {
            self.0.push(' ');
            self.0.push_str(word);
        }
    }

    pub fn take_raw(&mut self) -> String {
        std::mem::take(&mut self.0)
    }

    /// Whitespace runs collapse to one space; the ends are trimmed.
    pub fn take_normalized(&mut self) -> String {
        normalize_whitespace(&self.take_raw())
    }
}

pub fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Paragraph content in the making.
///
/// Character data is buffered raw until a child closes or the paragraph ends, so
/// consecutive chunks form one text item. Whether whitespace separated two items
/// in the source is remembered before the text is trimmed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParagraphBuilder {
    items: Vec<InlineItem>,
    label: Option<String>,
    attached: Vec<usize>,
    pending: TextBuffer,
    spaced: bool,
}

impl ParagraphBuilder {
    fn flush(&mut self) {
        let raw = self.pending.take_raw();
        let text = normalize_whitespace(&raw);
        if text.is_empty() {
            if !raw.is_empty() {
                self.spaced = true;
            }
            return;
        }

        let leading_space = raw.starts_with(char::is_whitespace);
        self.push_item(InlineItem::Text(text), leading_space);
        self.spaced = raw.ends_with(char::is_whitespace);
    }

    fn push_item(&mut self, item: InlineItem, leading_space: bool) {
        if !self.items.is_empty() && !self.spaced && !leading_space {
            self.attached.push(self.items.len());
        }
        self.items.push(item);
        self.spaced = false;
    }

    /// The first label becomes the paragraph's own; later ones stay as items.
    fn push_label(&mut self, id: String) {
        if self.label.is_none() {
            self.label = Some(id);
        } else {
            self.items.push(InlineItem::Label(id));
        }
    }

    fn push_child(&mut self, item: InlineItem, labels: Vec<String>) {
        self.flush();
        for id in labels {
            self.push_label(id);
        }
        match item {
            InlineItem::Label(id) => self.push_label(id),
            other => self.push_item(other, false),
        }
    }

    fn finish(mut self) -> BlockToken {
        self.flush();
        BlockToken::Paragraph {
            items: self.items,
            label: self.label,
            attached: self.attached,
        }
    }
}

impl TagHandler {
    pub fn title(required: bool) -> Self {
        TagHandler::Title {
            text: TextBuffer::default(),
            required,
        }
    }

    pub fn heading(level: HeadingLevel) -> Self {
        TagHandler::Heading {
            level,
            text: TextBuffer::default(),
        }
    }

    pub fn paragraph() -> Self {
        TagHandler::Paragraph(ParagraphBuilder::default())
    }

    pub fn anchor(kind: AnchorKind) -> Self {
        TagHandler::Anchor {
            kind,
            text: TextBuffer::default(),
            labels: Vec::new(),
        }
    }

    pub fn inline_format(kind: FormatKind) -> Self {
        TagHandler::InlineFormat {
            kind,
            text: TextBuffer::default(),
            labels: Vec::new(),
        }
    }

    pub fn handle_characters(&mut self, chunk: &str) {
        match self {
            TagHandler::Ignore => {
                if !chunk.trim().is_empty() {
                    log::trace!("Discarding structural text: {:?}", chunk.trim());
                }
            }
            TagHandler::Title { text, .. }
            | TagHandler::Heading { text, .. }
            | TagHandler::Anchor { text, .. }
            | TagHandler::InlineFormat { text, .. } => text.push(chunk),
            TagHandler::Paragraph(paragraph) => paragraph.pending.push(chunk),
        }
    }

    /// Takes the finalized result of a closed child. Returns the blocks that are
    /// now complete and must be emitted.
    pub fn accept(&mut self, child: Option<Fragment>) -> Vec<BlockToken> {
        let (item, mut labels) = match child {
            None => return Vec::new(),
            Some(Fragment::Block(block)) => return vec![block],
            Some(Fragment::Inline(item)) => (item, Vec::new()),
            Some(Fragment::Labelled { item, labels }) => (item, labels),
        };

        match self {
            TagHandler::Ignore => {
                log::warn!(
                    "Dropping inline content outside of a paragraph: {item:?} (labels {labels:?})"
                );
            }
            TagHandler::Paragraph(paragraph) => paragraph.push_child(item, labels),
            TagHandler::Anchor {
                text,
                labels: carried,
                ..
            }
            | TagHandler::InlineFormat {
                text,
                labels: carried,
                ..
            } => match item {
                InlineItem::Label(id) => {
                    carried.append(&mut labels);
                    carried.push(id);
                }
                other => {
                    text.push_word(other.plain_text());
                    carried.append(&mut labels);
                }
            },
            TagHandler::Title { text, .. } | TagHandler::Heading { text, .. } => {
                if let InlineItem::Label(id) = &item {
                    labels.push(id.clone());
                }
                if !labels.is_empty() {
                    log::warn!("Dropping labels {labels:?} nested in a title or heading");
                }
                text.push_word(item.plain_text());
            }
        }

        Vec::new()
    }

    pub fn finalize(self) -> Result<Option<Fragment>, ParseError> {
        let fragment = match self {
            TagHandler::Ignore => None,
            TagHandler::Title { mut text, required } => {
                let text = text.take_normalized();
                if text.is_empty() {
                    if required {
                        return Err(ParseError::MissingTitle);
                    }
                    log::warn!("Skipping empty <title>");
                    return Ok(None);
                }
                Some(Fragment::Block(BlockToken::Title { text }))
            }
            TagHandler::Heading { level, mut text } => Some(Fragment::Block(BlockToken::Heading {
                level,
                text: text.take_normalized(),
            })),
            TagHandler::Paragraph(paragraph) => Some(Fragment::Block(paragraph.finish())),
            TagHandler::Anchor {
                kind,
                mut text,
                labels,
            } => {
                let text = text.take_normalized();
                let item = match kind {
                    AnchorKind::Label { id } => {
                        if !text.is_empty() {
                            log::debug!("Label anchor {id} has text {text:?}, keeping only the label");
                        }
                        InlineItem::Label(id)
                    }
                    AnchorKind::Link { href } => InlineItem::Link { text, href },
                };
                Some(Fragment::inline(item, labels))
            }
            TagHandler::InlineFormat {
                kind,
                mut text,
                labels,
            } => Some(Fragment::inline(
                InlineItem::Formatted {
                    kind,
                    text: text.take_normalized(),
                },
                labels,
            )),
        };

        Ok(fragment)
    }
}
