//! Launching the commands of one line as child processes.
//!
//! All commands are spawned first, left to right, and then the launcher waits
//! until every spawned child has finished. Children run concurrently and may
//! finish in any order.

use crate::command::{Command, CommandList, ExitCode};
use crate::config::ExecFailurePolicy;
use crate::error::LaunchError;
use log::{debug, error};
use std::io;
use std::process::ExitStatus;

/// Raw OS error for "exec format error" on Linux and the BSDs.
const ENOEXEC: i32 = 8;

/// Result of asking for one command to be started.
#[derive(Debug)]
pub enum Spawned<C> {
    /// A child process exists and has to be waited for.
    Running(C),
    /// The child could not replace its image with the program. It counts as
    /// spawned and already finished.
    ImageFailed(io::Error),
}

/// A child process that can be waited for.
pub trait RunningChild {
    /// Process id of the child.
    fn id(&self) -> u32;

    /// Block until the child terminates and return its raw wait status.
    fn wait(&mut self) -> io::Result<i32>;
}

/// Creates one child process per command.
///
/// The default implementation is [`SystemSpawner`]; tests can plug in their
/// own to simulate failures.
pub trait Spawner {
    type Child: RunningChild;

    /// Start `command`. An `Err` means no process could be created at all.
    fn spawn(&mut self, command: &Command) -> io::Result<Spawned<Self::Child>>;
}

/// Spawns real operating-system processes with `std::process::Command`.
///
/// The program name is looked up in `PATH` the same way `execvp` does, and
/// standard streams are inherited from this process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

/// A child started by [`SystemSpawner`].
#[derive(Debug)]
pub struct SystemChild(std::process::Child);

impl RunningChild for SystemChild {
    fn id(&self) -> u32 {
        self.0.id()
    }

    fn wait(&mut self) -> io::Result<i32> {
        let status = self.0.wait()?;
        debug!("pid {} exited with {}", self.0.id(), exit_code(status));
        Ok(raw_status(status))
    }
}

impl Spawner for SystemSpawner {
    type Child = SystemChild;

    fn spawn(&mut self, command: &Command) -> io::Result<Spawned<SystemChild>> {
        match std::process::Command::new(command.program())
            .args(command.args())
            .spawn()
        {
            Ok(child) => Ok(Spawned::Running(SystemChild(child))),
            Err(err) if is_image_failure(&err) => Ok(Spawned::ImageFailed(err)),
            Err(err) => Err(err),
        }
    }
}

/// Whether a spawn error describes the program or its arguments rather than
/// a failure to create a process.
pub fn is_image_failure(err: &io::Error) -> bool {
    use io::ErrorKind::*;
    matches!(
        err.kind(),
        NotFound | PermissionDenied | NotADirectory | ArgumentListTooLong | InvalidInput
    ) || err.raw_os_error() == Some(ENOEXEC)
}

/// Raw wait status, suitable for OR-ing into a line status.
#[cfg(unix)]
fn raw_status(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.into_raw()
}

#[cfg(not(unix))]
fn raw_status(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Shell-style exit code: the exit status, or 128 + signal number.
#[cfg(unix)]
fn exit_code(status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(code) = status.code() {
        code
    } else if let Some(signal) = status.signal() {
        128 + signal
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> ExitCode {
    status.code().unwrap_or(-1)
}

/// What happened while launching one line.
#[derive(Debug)]
pub struct LaunchReport {
    /// Commands for which a child was spawned, image failures included.
    pub spawned: usize,
    /// Children that have been waited for.
    pub completed: usize,
    /// Raw statuses of all completed children, OR-ed together.
    pub status: ExitCode,
    /// First failure, if spawning stopped early or a wait failed.
    pub failure: Option<LaunchError>,
}

impl LaunchReport {
    /// `Ok(status)` when every command was launched and waited for.
    pub fn into_result(self) -> Result<ExitCode, LaunchError> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(self.status),
        }
    }
}

/// Runs command lists, one child per command, and waits for all of them.
pub struct Launcher<S = SystemSpawner> {
    spawner: S,
    exec_failure: ExecFailurePolicy,
}

impl Launcher<SystemSpawner> {
    pub fn system(exec_failure: ExecFailurePolicy) -> Self {
        Self::new(SystemSpawner, exec_failure)
    }
}

impl<S: Spawner> Launcher<S> {
    pub fn new(spawner: S, exec_failure: ExecFailurePolicy) -> Self {
        Self {
            spawner,
            exec_failure,
        }
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Spawn every command of `commands` in order, then wait for all of them.
    ///
    /// The pid of each started child is stored in its command. If a process
    /// cannot be created, the remaining commands are not spawned, but the
    /// children already running are still waited for.
    pub fn execute(&mut self, commands: &mut CommandList) -> LaunchReport {
        let mut children = Vec::with_capacity(commands.len());
        let mut report = LaunchReport {
            spawned: 0,
            completed: 0,
            status: 0,
            failure: None,
        };

        for command in commands.iter_mut() {
            match self.spawner.spawn(command) {
                Ok(Spawned::Running(child)) => {
                    let pid = child.id();
                    debug!("spawned pid {} for {}", pid, command.program().to_string_lossy());
                    command.set_pid(pid);
                    children.push(child);
                    report.spawned += 1;
                }
                Ok(Spawned::ImageFailed(err)) => {
                    report.spawned += 1;
                    report.completed += 1;
                    match self.exec_failure {
                        ExecFailurePolicy::Swallow => {
                            debug!("{}: {} (ignored)", command.program().to_string_lossy(), err);
                        }
                        ExecFailurePolicy::Report => {
                            eprintln!("{}: {}", command.program().to_string_lossy(), err);
                        }
                    }
                    report.status |= self.exec_failure.status();
                }
                Err(source) => {
                    eprintln!("Error: fork failed");
                    error!("fork failed for {}: {}", command.program().to_string_lossy(), source);
                    report.failure = Some(LaunchError::Spawn {
                        program: command.program().to_string_lossy().into_owned(),
                        source,
                    });
                    break;
                }
            }
        }

        for mut child in children {
            match child.wait() {
                Ok(status) => report.status |= status,
                Err(source) => {
                    error!("wait for pid {} failed: {}", child.id(), source);
                    if report.failure.is_none() {
                        report.failure = Some(LaunchError::Wait { source });
                    }
                }
            }
            report.completed += 1;
        }

        debug!(
            "line done: {} spawned, {} completed, status {}",
            report.spawned, report.completed, report.status
        );
        report
    }
}
