use std::collections::BTreeMap;

use crate::config::ConvertOptions;
use crate::error::ParseError;
use crate::parsing::tag_handler::{AnchorKind, TagHandler};
use crate::tokens::{FormatKind, HeadingLevel};

/// What a recognized element becomes once opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFamily {
    /// Only gives the document its shape.
    Structural,
    Title,
    Heading(HeadingLevel),
    Paragraph,
    Anchor,
    Format(FormatKind),
}

/// The element vocabulary of the corpus export. Names must match exactly.
pub fn tag_family(tag: &str) -> Option<TagFamily> {
    let family = match tag {
        "html" | "head" | "meta" | "style" | "body" | "div" => TagFamily::Structural,
        "title" => TagFamily::Title,
        "h1" => TagFamily::Heading(HeadingLevel::H1),
        "h2" => TagFamily::Heading(HeadingLevel::H2),
        "h3" => TagFamily::Heading(HeadingLevel::H3),
        "h4" => TagFamily::Heading(HeadingLevel::H4),
        "p" => TagFamily::Paragraph,
        "a" => TagFamily::Anchor,
        "b" => TagFamily::Format(FormatKind::Bold),
        "i" | "em" => TagFamily::Format(FormatKind::Italic),
        "u" => TagFamily::Format(FormatKind::Underline),
        "sup" => TagFamily::Format(FormatKind::Superscript),
        _ => return None,
    };
    Some(family)
}

pub fn is_recognized(tag: &str) -> bool {
    tag_family(tag).is_some()
}

/// Builds the handler for a freshly opened element.
pub fn handler_for(
    tag: &str,
    attrs: &BTreeMap<String, String>,
    options: &ConvertOptions,
) -> Result<TagHandler, ParseError> {
    let family = tag_family(tag).ok_or_else(|| ParseError::UnrecognizedTag(tag.to_string()))?;

    let handler = match family {
        TagFamily::Structural => TagHandler::Ignore,
        TagFamily::Title => TagHandler::title(options.require_title),
        TagFamily::Heading(level) => TagHandler::heading(level),
        TagFamily::Paragraph => TagHandler::paragraph(),
        TagFamily::Anchor => TagHandler::anchor(classify_anchor(attrs, options)?),
        TagFamily::Format(kind) => TagHandler::inline_format(kind),
    };
    Ok(handler)
}

/// A label anchor carries a marker class plus an `id`; anything else needs an `href`.
pub fn classify_anchor(
    attrs: &BTreeMap<String, String>,
    options: &ConvertOptions,
) -> Result<AnchorKind, ParseError> {
    let class = attrs.get("class").filter(|c| options.is_label_class(c));
    let id = attrs.get("id").filter(|id| !id.trim().is_empty());

    if let (Some(_), Some(id)) = (class, id) {
        return Ok(AnchorKind::Label {
            id: id.trim().to_string(),
        });
    }

    match attrs.get("href") {
        Some(href) => Ok(AnchorKind::Link {
            href: href.trim().to_string(),
        }),
        None => Err(ParseError::AmbiguousAnchor {
            attrs: attrs.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const CORPUS_TAGS: &[&str] = &[
        "html", "head", "meta", "title", "style", "body", "div", "h1", "h2", "h3", "h4", "p", "a",
        "sup", "b", "i", "u", "em",
    ];

    #[test]
    fn test_every_recognized_tag_has_a_handler() {
        let options = ConvertOptions::default();
        let link = attrs(&[("href", "#x")]);
        for tag in CORPUS_TAGS {
            assert!(is_recognized(tag), "Expected <{tag}> to be recognized");
            assert!(
                handler_for(tag, &link, &options).is_ok(),
                "Expected handler for <{tag}>"
            );
        }
    }

    #[test]
    fn test_unknown_tags_are_rejected() {
        let options = ConvertOptions::default();
        for tag in ["script", "span", "h5", "table", "br"] {
            assert_eq!(
                handler_for(tag, &BTreeMap::new(), &options),
                Err(ParseError::UnrecognizedTag(tag.to_string()))
            );
            assert!(!is_recognized(tag));
        }
    }

    #[test]
    fn test_heading_handler_for_exact_name() {
        let handler = handler_for("h2", &BTreeMap::new(), &ConvertOptions::default()).unwrap();
        assert_eq!(handler, TagHandler::heading(HeadingLevel::H2));
    }

    #[test]
    fn test_heading_lookalikes_are_rejected() {
        let options = ConvertOptions::default();
        for tag in ["h01", "h+2", "h004", "h0", "H2", "h"] {
            assert_eq!(
                handler_for(tag, &BTreeMap::new(), &options),
                Err(ParseError::UnrecognizedTag(tag.to_string())),
                "Expected <{tag}> to be rejected"
            );
            assert!(!is_recognized(tag));
        }
    }

    #[test]
    fn test_title_handler_follows_require_title() {
        let strict = ConvertOptions {
            require_title: true,
            ..Default::default()
        };
        assert_eq!(
            handler_for("title", &BTreeMap::new(), &strict).unwrap(),
            TagHandler::title(true)
        );
        assert_eq!(
            handler_for("title", &BTreeMap::new(), &ConvertOptions::default()).unwrap(),
            TagHandler::title(false)
        );
    }

    #[test]
    fn test_label_anchor() {
        let kind = classify_anchor(
            &attrs(&[("class", "of"), ("id", "ref-7")]),
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(
            kind,
            AnchorKind::Label {
                id: "ref-7".to_string()
            }
        );
    }

    #[test]
    fn test_label_wins_over_href() {
        let kind = classify_anchor(
            &attrs(&[("class", "of"), ("id", "n1"), ("href", "#n1")]),
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(
            kind,
            AnchorKind::Label {
                id: "n1".to_string()
            }
        );
    }

    #[test]
    fn test_link_anchor() {
        let kind = classify_anchor(
            &attrs(&[("href", "https://example.org")]),
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(
            kind,
            AnchorKind::Link {
                href: "https://example.org".to_string()
            }
        );
    }

    #[test]
    fn test_restricted_label_class_falls_back_to_link() {
        let options = ConvertOptions {
            label_classes: vec!["of".to_string()],
            ..Default::default()
        };
        let kind = classify_anchor(
            &attrs(&[("class", "external"), ("id", "x"), ("href", "/a")]),
            &options,
        )
        .unwrap();
        assert_eq!(
            kind,
            AnchorKind::Link {
                href: "/a".to_string()
            }
        );
    }

    #[test]
    fn test_ambiguous_anchor() {
        let bare = attrs(&[("id", "lonely")]);
        assert_eq!(
            classify_anchor(&bare, &ConvertOptions::default()),
            Err(ParseError::AmbiguousAnchor { attrs: bare.clone() })
        );
        assert!(matches!(
            classify_anchor(&BTreeMap::new(), &ConvertOptions::default()),
            Err(ParseError::AmbiguousAnchor { .. })
        ));
    }
}
