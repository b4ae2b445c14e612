use crate::config::DEFAULT_WRAP_WIDTH;
use crate::tokens::{BlockToken, Document, HeadingLevel, InlineItem};

const CLOSING_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', ')', ']', '}', '\u{201d}', '\u{2019}', '\u{bb}', '\u{2026}',
];
const OPENING_PUNCTUATION: &[char] = &['(', '[', '{', '\u{201c}', '\u{2018}', '\u{ab}'];

/// Block token to Markdown renderer for Obsidian vaults.
///
/// # Responsibilities
///
/// - Title becomes YAML front matter so Obsidian shows it as a property
/// - Headings get `#` prefixes matching their level
/// - Paragraph items are joined, wrapped at the configured width and followed by
///   one ` ^label` block reference line per label
/// - Inline formats use Markdown where it exists and literal HTML otherwise
///
/// Rendering holds no state between calls, the same tokens always produce the
/// same text.
///
/// # Usage
///
/// ```rust,no_run
/// use corpusmark::parsing::markdown_renderer::MarkdownRenderer;
/// # use corpusmark::tokens::Document;
/// # fn main() {
/// let renderer = MarkdownRenderer::new(80);
/// # let document = Document::new();
/// let output_text = renderer.render(&document);
/// # }
/// ```
pub struct MarkdownRenderer {
    width: usize,
}

impl MarkdownRenderer {
    pub fn new(width: usize) -> Self {
        MarkdownRenderer { width }
    }

    pub fn render(&self, doc: &Document) -> String {
        self.render_tokens(&doc.tokens)
    }

    pub fn render_tokens<'a, T>(&self, tokens: T) -> String
    where
        T: IntoIterator<Item = &'a BlockToken>,
    {
        let mut output = String::new();
        for line in self.render_lines(tokens) {
            output.push_str(&line);
            output.push('\n');
        }
        output
    }

    pub fn render_lines<'a, T>(&self, tokens: T) -> Vec<String>
    where
        T: IntoIterator<Item = &'a BlockToken>,
    {
        let mut lines = Vec::new();
        for token in tokens {
            self.render_token(token, &mut lines);
        }
        lines
    }

    pub fn render_token(&self, token: &BlockToken, lines: &mut Vec<String>) {
        match token {
            BlockToken::Title { text } => self.render_title(text, lines),
            BlockToken::Heading { level, text } => self.render_heading(*level, text, lines),
            BlockToken::Paragraph {
                items, attached, ..
            } => self.render_paragraph(items, attached, &token.labels(), lines),
        }
    }

    fn render_title(&self, text: &str, lines: &mut Vec<String>) {
        let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
        lines.push("---".to_string());
        lines.push(format!("title: \"{escaped}\""));
        lines.push("---".to_string());
        lines.push(String::new());
    }

    fn render_heading(&self, level: HeadingLevel, text: &str, lines: &mut Vec<String>) {
        let hashes = "#".repeat(level.as_u8() as usize);
        lines.push(format!("{hashes} {text}"));
        lines.push(String::new());
    }

    fn render_paragraph(
        &self,
        items: &[InlineItem],
        attached: &[usize],
        labels: &[&str],
        lines: &mut Vec<String>,
    ) {
        let text = self.render_items(items, attached);
        if text.is_empty() && labels.is_empty() {
            return;
        }

        if !text.is_empty() {
            lines.extend(self.wrap(&text));
        }
        for label in labels {
            lines.push(format!(" ^{label}"));
        }
        lines.push(String::new());
    }

    fn wrap(&self, text: &str) -> Vec<String> {
        if self.width == 0 {
            return vec![text.to_string()];
        }

        let options = textwrap::Options::new(self.width).break_words(false);
        textwrap::wrap(text, options)
            .into_iter()
            .map(|line| line.into_owned())
            .collect()
    }

    /// Joins the visible items of a paragraph into one line of Markdown. Items listed
    /// in `attached` touched their predecessor in the source and get no space.
    pub fn render_items(&self, items: &[InlineItem], attached: &[usize]) -> String {
        let mut output = String::new();

        for (index, item) in items.iter().enumerate() {
            if item.is_label() {
                continue;
            }
            let piece = self.render_inline(item);
            if piece.is_empty() {
                continue;
            }

            if !attached.contains(&index) && needs_space(&output, &piece) {
                output.push(' ');
            }
            output.push_str(&piece);
        }

        output
    }

    pub fn render_inline(&self, item: &InlineItem) -> String {
        match item {
            InlineItem::Text(text) => text.clone(),
            InlineItem::Formatted { kind, text } => {
                if text.is_empty() {
                    String::new()
                } else {
                    kind.wrap(text)
                }
            }
            InlineItem::Link { text, href } => format!("[{text}]({href})"),
            InlineItem::Label(_) => String::new(),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_WRAP_WIDTH)
    }
}

fn needs_space(previous: &str, next: &str) -> bool {
    match (previous.chars().last(), next.chars().next()) {
        (Some(last), Some(first)) => {
            !OPENING_PUNCTUATION.contains(&last) && !CLOSING_PUNCTUATION.contains(&first)
        }
        _ => false,
    }
}
