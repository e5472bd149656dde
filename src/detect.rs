//! PDF format detection and validation.

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Check that `data` starts with a PDF header and return the version string.
///
/// # Returns
/// * `Ok(version)` (e.g. `"1.7"`) if the data starts with a valid PDF header
/// * `Err(Error::UnreadableDocument)` otherwise
pub fn pdf_version(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnreadableDocument(
            "missing %PDF header: not a PDF file".into(),
        ));
    }

    let version_bytes = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnreadableDocument(format!(
            "unrecognized PDF version '{}'",
            version
        )));
    }

    Ok(version)
}

/// Check if a version string looks like "1.0" .. "2.0".
fn is_valid_version(version: &str) -> bool {
    let chars: Vec<char> = version.chars().collect();
    chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

/// Check if bytes represent a PDF document.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    pdf_version(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        assert_eq!(pdf_version(data).unwrap(), "1.7");
    }

    #[test]
    fn test_detect_pdf_2_0() {
        assert_eq!(pdf_version(b"%PDF-2.0\n%binary").unwrap(), "2.0");
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = pdf_version(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnreadableDocument(_))));
    }

    #[test]
    fn test_detect_too_short() {
        assert!(pdf_version(b"%PDF").is_err());
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
        assert!(!is_pdf_bytes(b""));
    }

    #[test]
    fn test_version_validation() {
        assert!(is_valid_version("1.0"));
        assert!(is_valid_version("2.0"));
        assert!(!is_valid_version("ab"));
        assert!(!is_valid_version("abc"));
    }
}
