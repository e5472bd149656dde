//! Pipeline executor: interprets a parsed chain against a document handle.

use super::{Operation, Pipeline};
use crate::document::DocumentHandle;
use crate::error::{Error, Result};
use crate::transform::TransformService;
use std::path::Path;

/// Why and where a chain stopped early.
#[derive(Debug)]
pub struct StageFailure {
    /// Zero-based index of the failed stage in the pipeline.
    pub stage: usize,
    /// Keyword of the failed operation.
    pub operation: &'static str,
    /// The underlying error.
    pub error: Error,
}

/// Result of executing a pipeline.
///
/// The chain degrades gracefully: when a stage fails, `document` holds the
/// last successfully produced handle (the failing stage's input) and
/// `failure` records what went wrong, so callers can both keep the
/// best-effort result and tell partial from full success.
///
/// `document` is `None` only when the chain ended at a successful terminal
/// stage, which writes its own output.
#[derive(Debug)]
pub struct ExecutionOutcome {
    /// Best-effort result, or `None` after a successful terminal stage.
    pub document: Option<DocumentHandle>,
    /// Number of stages that completed.
    pub completed: usize,
    /// The failure that stopped the chain, if any.
    pub failure: Option<StageFailure>,
}

impl ExecutionOutcome {
    /// Whether every stage ran to completion.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Execute `pipeline` in order against `initial`.
///
/// Each stage consumes the current handle and produces its successor via
/// the transform service. A failing stage stops the chain; the outcome then
/// carries the failing stage's input as the best-effort result. A terminal
/// stage ([`Operation::ConvertToDocx`]) writes to its own output path — or
/// to `default_docx` when none was given in the chain — and ends the
/// pipeline without producing a further handle.
pub fn execute(
    initial: DocumentHandle,
    pipeline: &Pipeline,
    service: &dyn TransformService,
    default_docx: &Path,
) -> ExecutionOutcome {
    let mut current = initial;

    for (stage, operation) in pipeline.iter().enumerate() {
        log::debug!("stage {}: {}", stage, operation.name());

        match run_stage(&current, operation, service, default_docx) {
            Ok(Some(next)) => current = next,
            Ok(None) => {
                // Terminal stage wrote its own output.
                return ExecutionOutcome {
                    document: None,
                    completed: stage + 1,
                    failure: None,
                };
            }
            Err(error) => {
                log::warn!("stage {} ({}) failed: {}", stage, operation.name(), error);
                return ExecutionOutcome {
                    document: Some(current),
                    completed: stage,
                    failure: Some(StageFailure {
                        stage,
                        operation: operation.name(),
                        error,
                    }),
                };
            }
        }
    }

    ExecutionOutcome {
        document: Some(current),
        completed: pipeline.len(),
        failure: None,
    }
}

/// Run one stage. `Ok(Some(_))` is the successor handle; `Ok(None)` means a
/// terminal stage consumed the chain.
fn run_stage(
    current: &DocumentHandle,
    operation: &Operation,
    service: &dyn TransformService,
    default_docx: &Path,
) -> Result<Option<DocumentHandle>> {
    match operation {
        Operation::Extract { start, end } => {
            let pages = service.page_count(current)?;
            if *end as usize > pages {
                return Err(Error::InvalidPageRange(format!(
                    "page {} is past the end (document has {} pages)",
                    end, pages
                )));
            }
            let data = service.extract_subrange(current, *start, *end)?;
            Ok(Some(DocumentHandle::from_bytes(data)))
        }
        Operation::Merge { documents } => {
            let mut inputs = Vec::with_capacity(documents.len() + 1);
            inputs.push(current.clone());
            for path in documents {
                inputs.push(DocumentHandle::from_path(path)?);
            }
            let data = service.concatenate(&inputs)?;
            Ok(Some(DocumentHandle::from_bytes(data)))
        }
        Operation::Compress => {
            let data = service.recompress(current)?;
            Ok(Some(DocumentHandle::from_bytes(data)))
        }
        Operation::ConvertToDocx { output } => {
            let path = output.as_deref().unwrap_or(default_docx);
            service.convert_to_docx(current, path)?;
            Ok(None)
        }
    }
}
