//! The fixed command vocabulary and its arity rules.

/// Arity and dispatch rules for one chain command.
///
/// The table below is the single source of truth for the chain vocabulary;
/// both the parser and the executor dispatch off the [`Operation`]s produced
/// from it, so a command cannot exist in one phase and be forgotten in the
/// other.
///
/// [`Operation`]: crate::chain::Operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Canonical keyword.
    pub name: &'static str,
    /// Accepted alternative spellings.
    pub aliases: &'static [&'static str],
    /// Minimum number of plain arguments.
    pub min_args: usize,
    /// Maximum number of plain arguments; `None` means unbounded.
    pub max_args: Option<usize>,
    /// Whether executing this command ends the chain regardless of
    /// remaining tokens.
    pub terminal: bool,
}

/// The complete, fixed command table.
pub const COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor {
        name: "extract",
        aliases: &[],
        min_args: 1,
        max_args: Some(2),
        terminal: false,
    },
    CommandDescriptor {
        name: "merge",
        aliases: &[],
        min_args: 1,
        max_args: None,
        terminal: false,
    },
    CommandDescriptor {
        name: "compress",
        aliases: &[],
        min_args: 0,
        max_args: Some(0),
        terminal: false,
    },
    CommandDescriptor {
        name: "convert-to-docx",
        // "parsepdf" is the historical chain spelling of the same operation.
        aliases: &["parsepdf"],
        min_args: 0,
        max_args: Some(1),
        terminal: true,
    },
];

/// Look up the descriptor for a keyword (or one of its aliases).
pub fn descriptor_for(keyword: &str) -> Option<&'static CommandDescriptor> {
    COMMANDS
        .iter()
        .find(|d| d.name == keyword || d.aliases.contains(&keyword))
}

/// Whether a token is a recognized command keyword.
pub fn is_keyword(token: &str) -> bool {
    descriptor_for(token).is_some()
}

/// Index of the first token that does not look like a PDF file reference.
///
/// A token qualifies as a file reference iff it carries a `.pdf` suffix
/// (case-insensitive) and is not a command keyword. Returns `tokens.len()`
/// when every token qualifies. This is purely syntactic: whether the path
/// exists or really is a PDF is checked later by the transform service.
pub fn first_non_document_index(tokens: &[String]) -> usize {
    tokens
        .iter()
        .position(|t| is_keyword(t) || !has_pdf_suffix(t))
        .unwrap_or(tokens.len())
}

fn has_pdf_suffix(token: &str) -> bool {
    has_suffix(token, b".pdf")
}

/// Whether a token looks like a DOCX output path. The terminal conversion
/// command only accepts an argument of this shape; anything else after it
/// is ignored, not consumed.
pub(crate) fn has_docx_suffix(token: &str) -> bool {
    has_suffix(token, b".docx")
}

fn has_suffix(token: &str, suffix: &[u8]) -> bool {
    let bytes = token.as_bytes();
    bytes.len() > suffix.len()
        && bytes[bytes.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}
