#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub tokens: Vec<BlockToken>,
}

/// Top-level unit of the converted document, emitted by the parser in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockToken {
    Title {
        text: String,
    },
    Heading {
        level: HeadingLevel,
        text: String,
    },
    /// `attached` lists the indices of items that touched the previous item with no
    /// whitespace in between, e.g. `word<sup>1</sup>`.
    Paragraph {
        items: Vec<InlineItem>,
        label: Option<String>,
        attached: Vec<usize>,
    },
}

/// Fragment inside a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineItem {
    Text(String),
    Formatted { kind: FormatKind, text: String },
    Link { text: String, href: String },
    Label(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Bold,
    Italic,
    Underline,
    Superscript,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeadingLevel {
    H1 = 1,
    H2 = 2,
    H3 = 3,
    H4 = 4,
}

impl HeadingLevel {
    pub fn from_u8(level: u8) -> Option<Self> {
        match level {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            4 => Some(HeadingLevel::H4),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl FormatKind {
    /// Opening and closing markup placed around the formatted text.
    pub fn markers(self) -> (&'static str, &'static str) {
        match self {
            FormatKind::Bold => ("**", "**"),
            FormatKind::Italic => ("*", "*"),
            FormatKind::Underline => ("<u>", "</u>"),
            FormatKind::Superscript => ("<sup>", "</sup>"),
        }
    }

    pub fn wrap(self, text: &str) -> String {
        let (open, close) = self.markers();
        format!("{open}{text}{close}")
    }
}

impl InlineItem {
    /// Text content without any markup. Labels carry no visible text.
    pub fn plain_text(&self) -> &str {
        match self {
            InlineItem::Text(text) => text,
            InlineItem::Formatted { text, .. } => text,
            InlineItem::Link { text, .. } => text,
            InlineItem::Label(_) => "",
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, InlineItem::Label(_))
    }
}

impl BlockToken {
    pub fn paragraph(items: Vec<InlineItem>) -> Self {
        BlockToken::Paragraph {
            items,
            label: None,
            attached: Vec::new(),
        }
    }

    /// Every label carried by a paragraph: the primary one first, then any extra
    /// label items in document order.
    pub fn labels(&self) -> Vec<&str> {
        match self {
            BlockToken::Paragraph { items, label, .. } => label
                .as_deref()
                .into_iter()
                .chain(items.iter().filter_map(|item| match item {
                    InlineItem::Label(extra) => Some(extra.as_str()),
                    _ => None,
                }))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Document { tokens: Vec::new() }
    }

    pub fn title(&self) -> Option<&str> {
        self.tokens.iter().find_map(|token| match token {
            BlockToken::Title { text } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<&str> for InlineItem {
    fn from(value: &str) -> Self {
        InlineItem::Text(value.to_string())
    }
}

impl From<String> for InlineItem {
    fn from(value: String) -> Self {
        InlineItem::Text(value)
    }
}

impl IntoIterator for Document {
    type Item = BlockToken;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_round_trip() {
        assert_eq!(HeadingLevel::from_u8(3).map(HeadingLevel::as_u8), Some(3));
        assert_eq!(HeadingLevel::from_u8(5), None);
    }

    #[test]
    fn test_format_wrap() {
        assert_eq!(FormatKind::Superscript.wrap("3"), "<sup>3</sup>");
        assert_eq!(FormatKind::Italic.wrap("x"), "*x*");
    }

    #[test]
    fn test_paragraph_labels_primary_first() {
        let token = BlockToken::Paragraph {
            items: vec!["Text".into(), InlineItem::Label("b".to_string())],
            label: Some("a".to_string()),
            attached: Vec::new(),
        };
        assert_eq!(token.labels(), vec!["a", "b"]);
    }
}
