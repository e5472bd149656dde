//! # pdfchain
//!
//! PDF page manipulation with chainable operations.
//!
//! This library powers the `pdfchain` CLI: it extracts page ranges, merges
//! and compresses PDF documents, converts to and from DOCX, and — its core —
//! interprets *command chains*, where trailing command-line tokens describe
//! further operations applied to the evolving in-memory result without
//! intermediate files:
//!
//! ```text
//! pdfchain extract report.pdf 1 5 merge appendix.pdf compress
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfchain::{extract_pages, run_chain, PdfTransformService};
//! use std::path::Path;
//!
//! fn main() -> pdfchain::Result<()> {
//!     let service = PdfTransformService::new();
//!
//!     // Pages 1-5 of a document, then a chain compressing the result.
//!     let doc = extract_pages("report.pdf", 1, 5)?;
//!     let tokens = vec!["compress".to_string()];
//!     let outcome = run_chain(doc, &tokens, &service, Path::new("result.docx"))?;
//!
//!     if let Some(result) = outcome.document {
//!         result.save("out.pdf")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Failure containment
//!
//! Parse errors abort before any document is touched. A failing *execution*
//! stage, by contrast, stops the chain but keeps the last good result: the
//! [`ExecutionOutcome`] carries both the best-effort document and the stage
//! failure, so already-computed work is never lost to a later bad step.

pub mod batch;
pub mod chain;
pub mod detect;
pub mod document;
pub mod error;
pub mod naming;
pub mod transform;

// Re-export commonly used types
pub use batch::{convert_dir, list_files_with_suffix, merge_dir, BatchReport, FileOutcome};
pub use chain::{
    execute, parse, CommandDescriptor, ExecutionOutcome, Operation, Pipeline, StageFailure,
};
pub use document::DocumentHandle;
pub use error::{Error, Result};
pub use transform::{LibreOffice, PdfTransformService, TransformService};

use std::path::Path;

/// Parse chain tokens and execute them against `initial`.
///
/// Returns `Err` only for parse errors; execution failures are contained in
/// the returned [`ExecutionOutcome`].
pub fn run_chain(
    initial: DocumentHandle,
    tokens: &[String],
    service: &dyn TransformService,
    default_docx: &Path,
) -> Result<ExecutionOutcome> {
    let pipeline = parse(tokens)?;
    Ok(execute(initial, &pipeline, service, default_docx))
}

/// Extract pages `start..=end` (1-based, inclusive) from a PDF file.
///
/// # Example
///
/// ```no_run
/// let doc = pdfchain::extract_pages("document.pdf", 2, 4)?;
/// doc.save("pages-2-4.pdf")?;
/// # Ok::<(), pdfchain::Error>(())
/// ```
pub fn extract_pages<P: AsRef<Path>>(path: P, start: u32, end: u32) -> Result<DocumentHandle> {
    let service = PdfTransformService::new();
    let doc = DocumentHandle::from_path(path)?;
    let data = service.extract_subrange(&doc, start, end)?;
    Ok(DocumentHandle::from_bytes(data))
}

/// Merge PDF files into one document, in the given order.
pub fn merge_files<P: AsRef<Path>>(paths: &[P]) -> Result<DocumentHandle> {
    let service = PdfTransformService::new();
    let handles = paths
        .iter()
        .map(DocumentHandle::from_path)
        .collect::<Result<Vec<_>>>()?;
    let data = service.concatenate(&handles)?;
    Ok(DocumentHandle::from_bytes(data))
}

/// Re-encode a PDF file with compressed streams.
pub fn compress_file<P: AsRef<Path>>(path: P) -> Result<DocumentHandle> {
    let service = PdfTransformService::new();
    let doc = DocumentHandle::from_path(path)?;
    let data = service.recompress(&doc)?;
    Ok(DocumentHandle::from_bytes(data))
}
