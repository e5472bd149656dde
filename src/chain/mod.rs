//! The command-chain interpreter: tokens → operations → executed pipeline.
//!
//! Trailing CLI tokens such as `extract 1 3 compress` are parsed once into a
//! typed [`Pipeline`] of [`Operation`]s ([`parse`]), then interpreted in
//! order against an evolving [`DocumentHandle`] ([`execute`]). Parsing and
//! execution are deliberately separate phases: parse errors abort the whole
//! invocation before any document is touched, while execution failures are
//! contained so already-computed work is never thrown away.
//!
//! [`DocumentHandle`]: crate::DocumentHandle

pub mod command;
mod executor;
mod parser;

pub use command::{descriptor_for, first_non_document_index, is_keyword, CommandDescriptor};
pub use executor::{execute, ExecutionOutcome, StageFailure};
pub use parser::parse;

use std::path::PathBuf;

/// One validated chain step.
///
/// Produced by [`parse`]; the executor's `match` over this enum is
/// exhaustive, so adding a command here forces both phases to handle it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Keep pages `start..=end` (1-based, inclusive). The parser defaults
    /// `end` to `start` when only one page number is given, so
    /// `1 <= start <= end` always holds here; `end <= page_count` is
    /// checked at execution time.
    Extract { start: u32, end: u32 },
    /// Append the pages of `documents`, in order, after the current
    /// document. Never empty.
    Merge { documents: Vec<PathBuf> },
    /// Re-encode the current document with compressed streams.
    Compress,
    /// Write a DOCX rendering of the current document and end the chain.
    ConvertToDocx { output: Option<PathBuf> },
}

impl Operation {
    /// Canonical keyword for this operation, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Extract { .. } => "extract",
            Operation::Merge { .. } => "merge",
            Operation::Compress => "compress",
            Operation::ConvertToDocx { .. } => "convert-to-docx",
        }
    }

    /// Whether this operation ends the chain.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Operation::ConvertToDocx { .. })
    }
}

/// An ordered sequence of operations, in original token order.
pub type Pipeline = Vec<Operation>;
