//! Small documents in the shape of the corpus export.
use std::fs;
use std::path::{Path, PathBuf};

/// A complete chapter: title, headings, labelled paragraphs, inline formats and a link.
pub const CHAPTER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8"/>
    <title>Selected Writings</title>
    <style>p.brl-margin { margin: 0 }</style>
  </head>
  <body>
    <div>
      <h1>Selected Writings</h1>
      <h2>Part One</h2>
      <p><a class="of" id="p1"></a>Say: the <i>first</i> duty is to <b>know</b>.</p>
      <p>Consult the <a href="https://example.org/notes">notes</a><sup>1</sup> for details.</p>
      <h3>A <em>short</em> section</h3>
      <p><u>Underlined</u> words   spread
         across several lines.</p>
    </div>
  </body>
</html>
"#;

/// Uses an element outside the vocabulary.
pub const WITH_SCRIPT: &str = r#"<html><head><title>Broken</title></head>
<body><p>Before the script.</p><script>alert(1)</script></body></html>"#;

/// Anchor with neither label markers nor an href.
pub const WITH_BARE_ANCHOR: &str =
    r#"<html><head><title>Bare</title></head><body><p><a name="x">x</a></p></body></html>"#;

/// Writes `(file name, contents)` pairs into `dir` and returns their paths.
pub fn write_documents<P: AsRef<Path>>(
    dir: P,
    documents: &[(&str, &str)],
) -> std::io::Result<Vec<PathBuf>> {
    documents
        .iter()
        .map(|(name, contents)| {
            let path = dir.as_ref().join(name);
            fs::write(&path, contents)?;
            Ok(path)
        })
        .collect()
}
