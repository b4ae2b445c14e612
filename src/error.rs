use std::collections::BTreeMap;

use thiserror::Error;

/// Structural failures of a single document. All of them abort the whole pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("UnrecognizedTagError: <{0}> is not part of the supported vocabulary")]
    UnrecognizedTag(String),

    #[error("UnbalancedTagError: </{0}> does not close the innermost open element")]
    UnbalancedTag(String),

    #[error("AmbiguousAnchorError: anchor is neither a label nor a hyperlink (attributes: {attrs:?})")]
    AmbiguousAnchor { attrs: BTreeMap<String, String> },

    #[error("MissingTitleError: document title is missing or empty")]
    MissingTitle,
}

/// Errors of the conversion entry points, which also touch the filesystem.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to read html input: {0}")]
    Io(#[from] std::io::Error),
}
