use std::fs;
use std::path::Path;

use crate::app::infrastructure::error::Result;

/// Extensions accepted by drag-and-drop regardless of MIME type.
const DROPPABLE_EXTENSIONS: &[&str] = &["md", "js", "html", "css", "py", "java", "cpp", "c", "json", "xml", "csv"];

/// Extensions offered by the replace dialog.
const REPLACE_EXTENSIONS: &[&str] = &["txt", "md", "js", "html", "css", "py", "java", "cpp", "c", "json", "xml", "csv"];

/// Read a file as text, returning its display name and contents.
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn read_text_file(path: &Path) -> Result<(String, String)> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    Ok((display_name(path), text))
}

/// File name component of `path`, or the whole path when it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Whether a dropped file should be imported.
pub fn is_droppable(file_name: &str, mime: Option<&str>) -> bool {
    if mime.is_some_and(|m| m.starts_with("text/")) {
        return true;
    }
    DROPPABLE_EXTENSIONS
        .iter()
        .any(|ext| file_name.len() > ext.len() && file_name.ends_with(&format!(".{}", ext)))
}

/// Filter for the replace dialog.
/// Format: "Description\tPattern", one filter per line.
pub fn import_filter() -> String {
    format!("Text Files\t*.{{{}}}", REPLACE_EXTENSIONS.join(","))
}
