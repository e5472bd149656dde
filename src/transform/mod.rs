//! Document transformation services.
//!
//! [`TransformService`] is the seam between the chain interpreter and the
//! engines that actually manipulate documents. The executor only ever talks
//! to this trait, so tests can substitute a mock and the PDF/office engines
//! can evolve independently.

mod office;
mod pdf;

pub use office::{find_soffice, LibreOffice};
pub use pdf::PdfTransformService;

#[cfg(test)]
pub(crate) use pdf::test_pdf_bytes;

use crate::document::DocumentHandle;
use crate::error::Result;
use std::path::Path;

/// Page-document transformation operations.
///
/// All page numbers are 1-based and inclusive. Methods returning `Vec<u8>`
/// produce a complete serialized document.
pub trait TransformService: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self, doc: &DocumentHandle) -> Result<usize>;

    /// Serialize pages `start..=end` as a new document.
    ///
    /// Callers must ensure `1 <= start <= end <= page_count` beforehand.
    fn extract_subrange(&self, doc: &DocumentHandle, start: u32, end: u32) -> Result<Vec<u8>>;

    /// Concatenate the documents page-by-page, in the given order.
    fn concatenate(&self, docs: &[DocumentHandle]) -> Result<Vec<u8>>;

    /// Re-encode the document with compressed streams.
    ///
    /// Must not fail on already-compressed input; a further lossless pass
    /// is acceptable.
    fn recompress(&self, doc: &DocumentHandle) -> Result<Vec<u8>>;

    /// Write a DOCX rendering of the document to `output`.
    ///
    /// # Errors
    ///
    /// [`Error::ConversionUnsupported`] when no office converter is
    /// available on this system (see [`supports_office_conversion`]).
    ///
    /// [`Error::ConversionUnsupported`]: crate::Error::ConversionUnsupported
    /// [`supports_office_conversion`]: TransformService::supports_office_conversion
    fn convert_to_docx(&self, doc: &DocumentHandle, output: &Path) -> Result<()>;

    /// Convert a DOCX file into PDF bytes.
    ///
    /// Fails with `ConversionUnsupported` under the same conditions as
    /// [`convert_to_docx`](TransformService::convert_to_docx).
    fn convert_from_docx(&self, input: &Path) -> Result<Vec<u8>>;

    /// Whether DOCX conversion is available on this system.
    ///
    /// Checked once at service construction, not per call site.
    fn supports_office_conversion(&self) -> bool;
}
