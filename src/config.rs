//! Startup arguments and per-session settings.

use argh::FromArgs;
use std::path::PathBuf;

/// Maximum bytes of one read, terminator included. Longer lines are delivered
/// in several pieces.
pub const MAX_LINE_LEN: usize = 4096;

/// Smallest usable line length: one payload byte plus the terminator slot.
/// Readers treat anything lower as this value.
pub const MIN_LINE_LEN: usize = 2;

/// Prompt written before each interactive read.
pub const PROMPT: &str = "prompt> ";

/// A line exactly equal to this ends the session.
pub const QUIT_KEYWORD: &str = "quit\n";

#[derive(FromArgs, Debug)]
/// Run commands from a batch file, or interactively from standard input.
/// Commands on one line are separated by ';' and run concurrently.
pub struct Args {
    #[argh(positional)]
    /// file with one line of commands per line; reads the terminal when omitted.
    pub batch_file: Option<PathBuf>,
}

impl Args {
    /// Input mode selected by these arguments.
    pub fn mode(&self) -> Mode {
        match &self.batch_file {
            Some(path) => Mode::Batch(path.clone()),
            None => Mode::Interactive,
        }
    }
}

/// Where lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Standard input, with a prompt before each line.
    Interactive,
    /// A command file, no prompt.
    Batch(PathBuf),
}

impl Mode {
    pub fn is_interactive(&self) -> bool {
        matches!(self, Mode::Interactive)
    }
}

/// What to do when a child cannot replace its image with the requested program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecFailurePolicy {
    /// Count the child as completed with status 0 and say nothing.
    #[default]
    Swallow,
    /// Print a diagnostic and count the child as completed with exit code 127.
    Report,
}

/// Exit code of a child whose program could not be executed.
const EXEC_FAILED: i32 = 127;

impl ExecFailurePolicy {
    /// Raw wait status the failed child contributes to the line status.
    ///
    /// On Unix this is encoded the way `wait` reports a normal exit, so it
    /// combines with the statuses of real children.
    pub fn status(self) -> i32 {
        match self {
            ExecFailurePolicy::Swallow => 0,
            #[cfg(unix)]
            ExecFailurePolicy::Report => EXEC_FAILED << 8,
            #[cfg(not(unix))]
            ExecFailurePolicy::Report => EXEC_FAILED,
        }
    }
}

/// Settings shared by the reader, the launcher and the session loop.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Written before each interactive read.
    pub prompt: String,
    /// Bytes per read, terminator included; values below [`MIN_LINE_LEN`]
    /// act as [`MIN_LINE_LEN`].
    pub max_line_len: usize,
    /// Line that ends the session, newline included.
    pub quit_keyword: String,
    /// Handling of children whose program could not be executed.
    pub exec_failure: ExecFailurePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt: PROMPT.to_string(),
            max_line_len: MAX_LINE_LEN,
            quit_keyword: QUIT_KEYWORD.to_string(),
            exec_failure: ExecFailurePolicy::default(),
        }
    }
}
