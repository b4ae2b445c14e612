use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_WRAP_WIDTH: usize = 80;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ConvertOptions {
    /// Column at which paragraph text is wrapped. `0` keeps each paragraph on one line.
    pub wrap_width: usize,

    /// Class values that mark an `<a>` as a back-reference label. Empty accepts any class.
    pub label_classes: Vec<String>,

    /// Fail documents that never produce a `<title>`, or whose `<title>` is empty.
    /// When off, an empty `<title>` is skipped with a warning.
    pub require_title: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            wrap_width: DEFAULT_WRAP_WIDTH,
            label_classes: Vec::new(),
            require_title: false,
        }
    }
}

impl ConvertOptions {
    pub fn load_or_default(file_path: Option<&str>) -> Self {
        match file_path {
            Some(path) => Self::load_from_file(path).unwrap_or_else(|e| {
                log::error!("Failed to load options from {path}: {e}");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let path = Path::new(file_path);
        if path.exists() {
            let content = fs::read_to_string(path)?;

            match serde_json::from_str::<Self>(&content) {
                Ok(options) => Ok(options),
                Err(e) => {
                    log::error!("Failed to parse options file: {e}");
                    Err(anyhow::anyhow!("Failed to parse options: {}", e))
                }
            }
        } else {
            Ok(Self::default())
        }
    }

    pub fn is_label_class(&self, class: &str) -> bool {
        self.label_classes.is_empty()
            || class
                .split_whitespace()
                .any(|c| self.label_classes.iter().any(|allowed| allowed == c))
    }
}
