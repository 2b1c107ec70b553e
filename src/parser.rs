//! Splitting an input line into statements and building the command list.

use crate::command::CommandList;
use crate::lexer;

/// Bytes that end a statement.
pub const SEPARATORS: [u8; 2] = [b';', b'\n'];

fn is_separator(byte: &u8) -> bool {
    SEPARATORS.contains(byte)
}

/// Return the first non-empty statement of `input` and the bytes after it.
///
/// Leading separators are skipped, so consecutive separators never produce an
/// empty segment. Returns `None` once nothing but separators remains.
pub fn next_statement(input: &[u8]) -> Option<(&[u8], &[u8])> {
    let skip = input.iter().position(|b| !is_separator(b))?;
    let start = &input[skip..];
    match start.iter().position(is_separator) {
        Some(end) => Some((&start[..end], &start[end + 1..])),
        None => Some((start, &[][..])),
    }
}

/// Iterator over the raw statements of one line, left to right.
///
/// Segments may still be whitespace-only; those are dropped later by
/// [`lexer::parse_command`].
pub struct Statements<'a> {
    rest: &'a [u8],
}

impl<'a> Statements<'a> {
    pub fn new(line: &'a [u8]) -> Self {
        Self { rest: line }
    }

    /// Bytes not yet consumed by the iterator.
    pub fn remainder(&self) -> &'a [u8] {
        self.rest
    }
}

impl<'a> Iterator for Statements<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let (statement, rest) = next_statement(self.rest)?;
        self.rest = rest;
        Some(statement)
    }
}

/// Parse a whole input line into the commands it contains.
///
/// Always returns a list; a line holding only whitespace and separators
/// yields an empty one.
pub fn split_line(line: &[u8]) -> CommandList {
    let mut commands = CommandList::new();
    for statement in Statements::new(line) {
        if let Some(command) = lexer::parse_command(statement) {
            commands.push(command);
        }
    }
    commands
}
