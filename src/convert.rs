use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::ConvertOptions;
use crate::error::ConvertError;
use crate::events::{events_from_html, events_from_reader, tag_inventory};
use crate::parsing::markdown_renderer::MarkdownRenderer;
use crate::parsing::stack_parser::parse_document;
use crate::tokens::Document;

/// Parses one HTML document into block tokens.
pub fn parse_html(html: &str, options: &ConvertOptions) -> Result<Document, ConvertError> {
    let events = events_from_html(html)?;
    Ok(parse_document(events, options)?)
}

/// HTML in, Obsidian Markdown out.
pub fn convert_html(html: &str, options: &ConvertOptions) -> Result<String, ConvertError> {
    let document = parse_html(html, options)?;
    Ok(MarkdownRenderer::new(options.wrap_width).render(&document))
}

pub fn convert_file<P: AsRef<Path>>(
    path: P,
    options: &ConvertOptions,
) -> Result<String, ConvertError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let document = parse_document(events_from_reader(reader)?, options)?;
    info!(
        "Parsed {} into {} tokens",
        path.display(),
        document.tokens.len()
    );
    Ok(MarkdownRenderer::new(options.wrap_width).render(&document))
}

/// Distinct tag names used by a file, for checking a corpus against the vocabulary.
pub fn file_tag_inventory<P: AsRef<Path>>(path: P) -> Result<BTreeSet<String>, ConvertError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    Ok(tag_inventory(events_from_reader(reader)?))
}

/// Tag names seen across a batch, plus every file that could not be read.
#[derive(Debug, Default)]
pub struct TagInventory {
    pub tags: BTreeSet<String>,
    pub failures: Vec<(PathBuf, ConvertError)>,
}

/// Inventories every file; a file that fails is recorded and the batch goes on.
pub fn corpus_tag_inventory<P: AsRef<Path>>(files: &[P]) -> TagInventory {
    let mut inventory = TagInventory::default();
    for file in files {
        let file = file.as_ref();
        match file_tag_inventory(file) {
            Ok(found) => inventory.tags.extend(found),
            Err(err) => {
                warn!("Skipping {} in tag inventory: {err}", file.display());
                inventory.failures.push((file.to_path_buf(), err));
            }
        }
    }
    inventory
}

pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// HTML files directly inside `dir`, sorted by path.
pub fn discover_html_files<P: AsRef<Path>>(dir: P) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir.as_ref())?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            (path.is_file() && is_html_file(&path)).then_some(path)
        })
        .collect();
    files.sort();
    debug!(
        "Discovered {} html files in {}",
        files.len(),
        dir.as_ref().display()
    );
    Ok(files)
}

/// Expands directories to the HTML files they contain; plain files pass through.
pub fn expand_inputs<P: AsRef<Path>>(inputs: &[P]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            files.extend(discover_html_files(input)?);
        } else {
            files.push(input.to_path_buf());
        }
    }
    Ok(files)
}

/// `<out_dir>/<stem>.md` for an input file.
pub fn output_path(input: &Path, out_dir: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "untitled".into());
    name.push(".md");
    out_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_convert_html_scenario() {
        let markdown =
            convert_html("<body><p>Hello <b>world</b>.</p></body>", &ConvertOptions::default())
                .unwrap();
        assert_eq!(markdown, "Hello **world**.\n\n");
    }

    #[test]
    fn test_convert_html_keeps_source_spacing() {
        let markdown = convert_html(
            "<p>The <i>Kitáb</i>-i-Aqdas and word<b>s</b> <sup>2</sup></p>",
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(markdown, "The *Kitáb*-i-Aqdas and word**s** <sup>2</sup>\n\n");
    }

    #[test]
    fn test_convert_html_heading() {
        let markdown =
            convert_html("<h2>Title Text</h2>", &ConvertOptions::default()).unwrap();
        assert_eq!(markdown, "## Title Text\n\n");
    }

    #[test]
    fn test_convert_html_error_is_parse_error() {
        let err = convert_html("<p>x</p><script></script>", &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Parse(ParseError::UnrecognizedTag(ref tag)) if tag == "script"
        ));
    }

    #[test]
    fn test_discover_html_files_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["b.html", "a.htm", "notes.txt", "C.HTML"] {
            fs::write(dir.path().join(name), "<p>x</p>").unwrap();
        }
        fs::create_dir(dir.path().join("nested.html")).unwrap();

        let names: Vec<String> = discover_html_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["C.HTML", "a.htm", "b.html"]);
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("/in/tablet-01.html"), Path::new("/vault")),
            PathBuf::from("/vault/tablet-01.md")
        );
    }

    #[test]
    fn test_tag_inventory_continues_past_unreadable_files() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a.html");
        let second = dir.path().join("c.html");
        fs::write(&first, "<p>x</p>").unwrap();
        fs::write(&second, "<div><span>y</span></div>").unwrap();
        let missing = dir.path().join("b.html");

        let inventory = corpus_tag_inventory(&[first, missing.clone(), second]);

        assert!(inventory.tags.contains("p"));
        assert!(inventory.tags.contains("span"));
        assert_eq!(inventory.failures.len(), 1);
        assert_eq!(inventory.failures[0].0, missing);
        assert!(matches!(inventory.failures[0].1, ConvertError::Io(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = convert_file(dir.path().join("absent.html"), &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, ConvertError::Io(_)));
    }
}
