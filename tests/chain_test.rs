//! End-to-end tests for the chain interpreter through the public API.
//!
//! A mock transform service models a document as one byte per page, which
//! makes stage results easy to assert without real PDF plumbing.

mod common;

use std::path::Path;
use std::sync::Mutex;

use pdfchain::{run_chain, DocumentHandle, Error, Result, TransformService};

/// Mock service for testing: one byte per page, records every call.
struct RecordingService {
    calls: Mutex<Vec<String>>,
    docx_supported: bool,
}

impl RecordingService {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            docx_supported: true,
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl TransformService for RecordingService {
    fn page_count(&self, doc: &DocumentHandle) -> Result<usize> {
        Ok(doc.bytes()?.len())
    }

    fn extract_subrange(&self, doc: &DocumentHandle, start: u32, end: u32) -> Result<Vec<u8>> {
        self.record(format!("extract {start} {end}"));
        let bytes = doc.bytes()?;
        Ok(bytes[(start as usize - 1)..(end as usize)].to_vec())
    }

    fn concatenate(&self, docs: &[DocumentHandle]) -> Result<Vec<u8>> {
        self.record(format!("concatenate x{}", docs.len()));
        let mut out = Vec::new();
        for doc in docs {
            out.extend(doc.bytes()?);
        }
        Ok(out)
    }

    fn recompress(&self, doc: &DocumentHandle) -> Result<Vec<u8>> {
        self.record("recompress".to_string());
        doc.bytes()
    }

    fn convert_to_docx(&self, _doc: &DocumentHandle, output: &Path) -> Result<()> {
        self.record(format!("convert-to-docx {}", output.display()));
        if !self.docx_supported {
            return Err(Error::ConversionUnsupported("no converter".into()));
        }
        Ok(())
    }

    fn convert_from_docx(&self, input: &Path) -> Result<Vec<u8>> {
        self.record(format!("convert-from-docx {}", input.display()));
        Ok(vec![1])
    }

    fn supports_office_conversion(&self) -> bool {
        self.docx_supported
    }
}

fn toks(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}

fn pages(n: u8) -> DocumentHandle {
    DocumentHandle::from_bytes((1..=n).collect())
}

#[test]
fn test_chain_runs_stages_in_order() {
    let service = RecordingService::new();
    let outcome = run_chain(
        pages(5),
        &toks(&["extract", "2", "4", "compress"]),
        &service,
        Path::new("r.docx"),
    )
    .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.completed, 2);
    assert_eq!(outcome.document.unwrap().bytes().unwrap(), vec![2, 3, 4]);
    assert_eq!(service.calls(), vec!["extract 2 4", "recompress"]);
}

#[test]
fn test_malformed_chain_aborts_without_touching_document() {
    let service = RecordingService::new();
    // "exxtract" is not a keyword, so it and "3" are swept into extract's
    // argument run and tripped by arity validation
    let result = run_chain(
        pages(5),
        &toks(&["extract", "1", "2", "exxtract", "3"]),
        &service,
        Path::new("r.docx"),
    );

    // a parse error anywhere rejects the whole chain before execution
    assert!(matches!(
        result,
        Err(Error::Arity {
            command: "extract",
            found: 4,
            ..
        })
    ));
    assert!(service.calls().is_empty());
}

#[test]
fn test_unknown_command_aborts_without_touching_document() {
    let service = RecordingService::new();
    let result = run_chain(
        pages(5),
        &toks(&["exxtract", "1", "2"]),
        &service,
        Path::new("r.docx"),
    );

    assert!(matches!(result, Err(Error::UnknownCommand(ref c)) if c == "exxtract"));
    assert!(service.calls().is_empty());
}

#[test]
fn test_arity_error_aborts() {
    let service = RecordingService::new();
    let result = run_chain(pages(5), &toks(&["extract"]), &service, Path::new("r.docx"));
    assert!(matches!(result, Err(Error::Arity { .. })));
    assert!(service.calls().is_empty());
}

#[test]
fn test_non_numeric_page_aborts() {
    let service = RecordingService::new();
    let result = run_chain(
        pages(5),
        &toks(&["extract", "one", "two"]),
        &service,
        Path::new("r.docx"),
    );
    assert!(matches!(result, Err(Error::InvalidPageRange(_))));
}

#[test]
fn test_merge_list_ends_at_first_non_pdf_token() {
    let dir = tempfile::tempdir().unwrap();
    let a = common::write_pdf(dir.path(), "a.pdf", 1);
    let b = common::write_pdf(dir.path(), "b.pdf", 1);

    let service = RecordingService::new();
    let tokens = vec![
        "merge".to_string(),
        a.display().to_string(),
        b.display().to_string(),
        "compress".to_string(),
    ];
    let outcome = run_chain(pages(2), &tokens, &service, Path::new("r.docx")).unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.completed, 2);
    // current document plus both .pdf references went into the merge
    assert_eq!(service.calls(), vec!["concatenate x3", "recompress"]);
}

#[test]
fn test_execution_failure_keeps_last_good_result() {
    let service = RecordingService::new();
    let outcome = run_chain(
        pages(5),
        &toks(&["extract", "1", "3", "extract", "9", "9", "compress"]),
        &service,
        Path::new("r.docx"),
    )
    .unwrap();

    assert!(!outcome.is_complete());
    let failure = outcome.failure.as_ref().unwrap();
    assert_eq!(failure.stage, 1);
    assert_eq!(failure.operation, "extract");
    assert!(matches!(failure.error, Error::InvalidPageRange(_)));
    // the first extraction survives; compress never ran
    assert_eq!(outcome.document.unwrap().bytes().unwrap(), vec![1, 2, 3]);
    assert_eq!(service.calls(), vec!["extract 1 3"]);
}

#[test]
fn test_terminal_conversion_consumes_document() {
    let service = RecordingService::new();
    let outcome = run_chain(
        pages(3),
        &toks(&["compress", "convert-to-docx"]),
        &service,
        Path::new("default.docx"),
    )
    .unwrap();

    assert!(outcome.is_complete());
    assert!(outcome.document.is_none());
    assert_eq!(
        service.calls(),
        vec!["recompress", "convert-to-docx default.docx"]
    );
}

#[test]
fn test_terminal_conversion_with_explicit_output() {
    let service = RecordingService::new();
    let outcome = run_chain(
        pages(3),
        &toks(&["convert-to-docx", "named.docx"]),
        &service,
        Path::new("default.docx"),
    )
    .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(service.calls(), vec!["convert-to-docx named.docx"]);
}

#[test]
fn test_parsepdf_alias_for_terminal_conversion() {
    let service = RecordingService::new();
    let outcome = run_chain(
        pages(3),
        &toks(&["parsepdf"]),
        &service,
        Path::new("default.docx"),
    )
    .unwrap();

    assert!(outcome.is_complete());
    assert!(outcome.document.is_none());
    assert_eq!(service.calls(), vec!["convert-to-docx default.docx"]);
}

#[test]
fn test_empty_chain_passes_document_through() {
    let service = RecordingService::new();
    let outcome = run_chain(pages(4), &[], &service, Path::new("r.docx")).unwrap();
    assert!(outcome.is_complete());
    assert_eq!(outcome.completed, 0);
    assert_eq!(outcome.document.unwrap().bytes().unwrap(), vec![1, 2, 3, 4]);
    assert!(service.calls().is_empty());
}

#[test]
fn test_single_page_extract_defaults_end_to_start() {
    let service = RecordingService::new();
    let outcome = run_chain(
        pages(5),
        &toks(&["extract", "3", "compress"]),
        &service,
        Path::new("r.docx"),
    )
    .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.document.unwrap().bytes().unwrap(), vec![3]);
    assert_eq!(service.calls(), vec!["extract 3 3", "recompress"]);
}
