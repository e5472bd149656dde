//! Directory batch operations: bulk DOCX conversion and bulk merging.

use crate::document::DocumentHandle;
use crate::error::{Error, Result};
use crate::transform::TransformService;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// List files in `dir` (non-recursive) whose name ends with `suffix`,
/// sorted by filename so batch results are deterministic.
pub fn list_files_with_suffix(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotFound(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.len() > suffix.len() && n.to_lowercase().ends_with(suffix))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Outcome of one file in a batch conversion.
#[derive(Debug, Serialize)]
pub struct FileOutcome {
    /// Input file.
    pub input: PathBuf,
    /// Output file, present on success.
    pub output: Option<PathBuf>,
    /// Error description, present on failure.
    pub error: Option<String>,
}

impl FileOutcome {
    /// Whether this file converted successfully.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated result of a batch conversion.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    /// Per-file outcomes, in filename order.
    pub files: Vec<FileOutcome>,
    /// Number of files converted.
    pub succeeded: usize,
    /// Number of files that failed.
    pub failed: usize,
}

impl BatchReport {
    fn from_outcomes(files: Vec<FileOutcome>) -> Self {
        let succeeded = files.iter().filter(|f| f.is_success()).count();
        let failed = files.len() - succeeded;
        Self {
            files,
            succeeded,
            failed,
        }
    }
}

/// Convert every `.docx` file in `dir` to a sibling `.pdf`.
///
/// Files are dispatched to the rayon worker pool; each worker operates on
/// its own input/output pair, so one failure never cancels or corrupts the
/// others. Outcomes are collected and reported together.
///
/// Fails up front (before converting anything) when the directory does not
/// exist or the converter is unavailable.
pub fn convert_dir(dir: &Path, service: &dyn TransformService) -> Result<BatchReport> {
    if !service.supports_office_conversion() {
        return Err(Error::ConversionUnsupported(
            "directory conversion requires an office converter".into(),
        ));
    }
    let inputs = list_files_with_suffix(dir, ".docx")?;

    let files: Vec<FileOutcome> = inputs
        .par_iter()
        .map(|input| {
            let output = input.with_extension("pdf");
            match convert_one(input, &output, service) {
                Ok(()) => FileOutcome {
                    input: input.clone(),
                    output: Some(output),
                    error: None,
                },
                Err(e) => {
                    log::warn!("conversion failed for {}: {}", input.display(), e);
                    FileOutcome {
                        input: input.clone(),
                        output: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    Ok(BatchReport::from_outcomes(files))
}

fn convert_one(input: &Path, output: &Path, service: &dyn TransformService) -> Result<()> {
    let data = service.convert_from_docx(input)?;
    fs::write(output, data)?;
    Ok(())
}

/// Concatenate every `.pdf` file in `dir` (filename order) into one handle.
pub fn merge_dir(dir: &Path, service: &dyn TransformService) -> Result<DocumentHandle> {
    let inputs = list_files_with_suffix(dir, ".pdf")?;
    if inputs.is_empty() {
        return Err(Error::NotFound(dir.join("*.pdf")));
    }

    let handles = inputs
        .into_iter()
        .map(DocumentHandle::from_path)
        .collect::<Result<Vec<_>>>()?;
    let data = service.concatenate(&handles)?;
    Ok(DocumentHandle::from_bytes(data))
}
