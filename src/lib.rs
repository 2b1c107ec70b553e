//! A tiny line-oriented command runner.
//!
//! Each input line is split on `;` into statements, every statement becomes a
//! [`Command`], and all commands of a line are launched as concurrent child
//! processes. The runner waits for every child of the line before it reads the
//! next one. Input comes either from a batch file or, interactively, from the
//! terminal with a `prompt> ` prompt.
//!
//! The main entry point is [`Interpreter`], which drives the read → split →
//! launch loop over any [`LineSource`]. The [`syscall`] module describes the
//! process and thread entry points of the teaching kernel this runner was
//! written against; it is a boundary only and carries no scheduler.

pub mod command;
pub mod config;
pub mod error;
pub mod external;
pub mod input;
mod interpreter;
pub mod lexer;
pub mod logging;
pub mod parser;
pub mod syscall;

/// Convenient re-exports of the types most callers need.
pub use command::{Command, CommandList, ExitCode};
pub use config::{Args, ExecFailurePolicy, Mode, SessionConfig};
pub use input::LineSource;
pub use interpreter::{Interpreter, State};
