//! Chain parser: groups a flat token stream into validated operations.

use super::command::{
    descriptor_for, first_non_document_index, has_docx_suffix, is_keyword, CommandDescriptor,
};
use super::{Operation, Pipeline};
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Parse trailing command-line tokens into a [`Pipeline`].
///
/// Tokens are consumed left to right: each iteration pops one keyword, then
/// greedily consumes its arguments until the next recognized keyword (or,
/// for `merge`, the first token without a `.pdf` suffix), and validates the
/// run against the command's arity rule. An empty token stream yields an
/// empty pipeline.
///
/// Parsing stops at the first terminal command; any tokens after it are
/// skipped with a warning.
///
/// # Errors
///
/// * [`Error::UnknownCommand`] — a token where a keyword is expected is not
///   in the vocabulary
/// * [`Error::Arity`] — wrong number of arguments before the next keyword
/// * [`Error::InvalidPageRange`] — extract arguments are not positive
///   integers, or `end < start`
pub fn parse(tokens: &[String]) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new();
    let mut pos = 0;

    while pos < tokens.len() {
        let keyword = &tokens[pos];
        let descriptor = descriptor_for(keyword)
            .ok_or_else(|| Error::UnknownCommand(keyword.clone()))?;
        pos += 1;

        let args = consume_arguments(descriptor, &tokens[pos..]);
        pos += args.len();

        let operation = build_operation(descriptor, args)?;
        let terminal = operation.is_terminal();
        pipeline.push(operation);

        if terminal {
            if pos < tokens.len() {
                log::warn!(
                    "ignoring {} token(s) after terminal command '{}'",
                    tokens.len() - pos,
                    descriptor.name
                );
            }
            break;
        }
    }

    Ok(pipeline)
}

/// The argument run for one command: tokens up to the next keyword, or up
/// to the command's own boundary rule.
fn consume_arguments<'a>(descriptor: &CommandDescriptor, rest: &'a [String]) -> &'a [String] {
    let end = if descriptor.terminal {
        // A terminal command ends the chain, so the only argument it can
        // take is an explicit output path; any other following token is
        // left to be skipped, not consumed.
        usize::from(rest.first().is_some_and(|t| has_docx_suffix(t)))
    } else if descriptor.max_args.is_none() {
        // Unbounded commands (merge) take consecutive file references; the
        // suffix heuristic ends the run.
        first_non_document_index(rest)
    } else {
        rest.iter()
            .position(|t| is_keyword(t))
            .unwrap_or(rest.len())
    };
    &rest[..end]
}

fn build_operation(descriptor: &CommandDescriptor, args: &[String]) -> Result<Operation> {
    let found = args.len();
    if found < descriptor.min_args || descriptor.max_args.is_some_and(|max| found > max) {
        return Err(Error::Arity {
            command: descriptor.name,
            expected: arity_description(descriptor),
            found,
        });
    }

    match descriptor.name {
        "extract" => {
            let start = parse_page_number(&args[0])?;
            let end = match args.get(1) {
                Some(token) => parse_page_number(token)?,
                None => start,
            };
            if end < start {
                return Err(Error::InvalidPageRange(format!(
                    "end page {} is before start page {}",
                    end, start
                )));
            }
            Ok(Operation::Extract { start, end })
        }
        "merge" => Ok(Operation::Merge {
            documents: args.iter().map(PathBuf::from).collect(),
        }),
        "compress" => Ok(Operation::Compress),
        "convert-to-docx" => Ok(Operation::ConvertToDocx {
            output: args.first().map(PathBuf::from),
        }),
        other => unreachable!("command '{other}' missing from build_operation"),
    }
}

fn arity_description(descriptor: &CommandDescriptor) -> &'static str {
    match (descriptor.min_args, descriptor.max_args) {
        (0, Some(0)) => "none",
        (0, Some(1)) => "at most 1",
        (1, Some(2)) => "1 or 2",
        (1, None) => "1 or more",
        _ => "a different count",
    }
}

fn parse_page_number(token: &str) -> Result<u32> {
    let page: u32 = token.parse().map_err(|_| {
        Error::InvalidPageRange(format!("'{}' is not a page number", token))
    })?;
    if page < 1 {
        return Err(Error::InvalidPageRange("page numbers start at 1".into()));
    }
    Ok(page)
}
