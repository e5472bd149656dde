//! Default output filenames derived from the input name and operation.

use std::path::{Path, PathBuf};

/// Default name for a merged document.
pub const MERGED_NAME: &str = "merged.pdf";

/// Default name for a chained DOCX conversion with no explicit output.
pub const CONVERTED_DOCX_NAME: &str = "result.docx";

/// `"<input> page(s) <start>[ - <end>].pdf"`
pub fn extract_output(input: &Path, start: u32, end: u32) -> PathBuf {
    let suffix = if end != start {
        format!(" - {}", end)
    } else {
        String::new()
    };
    PathBuf::from(format!(
        "{} page(s) {}{}.pdf",
        input.display(),
        start,
        suffix
    ))
}

/// `"<input>-compressed.pdf"`
pub fn compress_output(input: &Path) -> PathBuf {
    PathBuf::from(format!("{}-compressed.pdf", input.display()))
}

/// Input name with its extension swapped (e.g. `report.docx` → `report.pdf`).
pub fn with_extension(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}
