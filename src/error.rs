//! Error kinds raised by the input, launch and startup stages.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The input source could not be opened. Fatal at startup.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot start line editor: {0}")]
    Editor(#[from] rustyline::error::ReadlineError),
}

/// Reading the next line failed for a reason other than end-of-input.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    #[error("line editor failed: {0}")]
    Editor(rustyline::error::ReadlineError),
}

/// Failures of the process launcher.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Creating a new process failed. Later commands on the line were not spawned.
    #[error("fork failed for {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Waiting for a spawned child failed.
    #[error("wait failed: {source}")]
    Wait {
        #[source]
        source: io::Error,
    },
}
