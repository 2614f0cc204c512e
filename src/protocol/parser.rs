//! Command line parsing
//!
//! Splits a command line into its verb and the remainder handed to the handler.

use crate::error::CommandError;

/// A command line split into a lower-cased verb and its arguments.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandLine<'a> {
    pub verb: String,
    pub args: &'a str,
}

/// Parses `VERB[ SP remainder]`.
///
/// Surrounding whitespace is ignored. The remainder is everything after the
/// first space, or empty. Only a space separates the verb. An empty line is a
/// syntax error.
pub fn parse_command(line: &str) -> Result<CommandLine<'_>, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(CommandError::SyntaxError);
    }

    let (verb, args) = trimmed
        .split_once(' ')
        .unwrap_or((trimmed, ""));

    Ok(CommandLine {
        verb: verb.to_ascii_lowercase(),
        args,
    })
}
