use crate::command::ExitCode;
use crate::config::SessionConfig;
use crate::external::{Launcher, Spawner, SystemSpawner};
use crate::input::LineSource;
use crate::parser;
use anyhow::Context;
use log::{debug, error};

/// Session state. `Terminated` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Terminated,
}

/// The read → split → launch loop.
///
/// Each iteration reads one line, parses it into a command list, runs every
/// command of the line concurrently and waits for all of them. The line and
/// its commands are dropped at the end of the iteration whatever the outcome.
///
/// Example
/// ```
/// use line_shell::input::BatchSource;
/// use line_shell::{Interpreter, State};
/// let mut sh = Interpreter::default();
/// let mut input = BatchSource::new("\n ; \nquit\nnever reached\n".as_bytes(), 4096);
/// assert_eq!(sh.run(&mut input), 0);
/// assert_eq!(sh.state(), State::Terminated);
/// ```
pub struct Interpreter<S = SystemSpawner> {
    config: SessionConfig,
    launcher: Launcher<S>,
    state: State,
    lines_run: usize,
}

impl Interpreter<SystemSpawner> {
    /// Create an interpreter that launches real processes.
    pub fn new(config: SessionConfig) -> Self {
        let launcher = Launcher::system(config.exec_failure);
        Self::with_launcher(config, launcher)
    }
}

impl<S: Spawner> Interpreter<S> {
    /// Create an interpreter with a custom spawner.
    pub fn with_spawner(config: SessionConfig, spawner: S) -> Self {
        let launcher = Launcher::new(spawner, config.exec_failure);
        Self::with_launcher(config, launcher)
    }

    fn with_launcher(config: SessionConfig, launcher: Launcher<S>) -> Self {
        Self {
            config,
            launcher,
            state: State::Running,
            lines_run: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Number of lines handed to the launcher so far.
    pub fn lines_run(&self) -> usize {
        self.lines_run
    }

    pub fn spawner(&self) -> &S {
        self.launcher.spawner()
    }

    /// Parse and run one raw line, waiting for all of its commands.
    ///
    /// Returns the OR-ed raw statuses of the line's children.
    pub fn run_line(&mut self, line: &[u8]) -> anyhow::Result<ExitCode> {
        let mut commands = parser::split_line(line);
        self.lines_run += 1;
        if commands.is_empty() {
            return Ok(0);
        }
        self.launcher
            .execute(&mut commands)
            .into_result()
            .with_context(|| {
                let text = String::from_utf8_lossy(line);
                format!("line {:?} did not run completely", text.trim_end())
            })
    }

    /// Run one iteration: read a line, then run it unless it ends the session.
    pub fn step(&mut self, source: &mut dyn LineSource) -> State {
        if self.state == State::Terminated {
            return self.state;
        }

        let line = match source.next_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("end of input");
                self.state = State::Terminated;
                return self.state;
            }
            Err(err) => {
                error!("{}", err);
                self.state = State::Terminated;
                return self.state;
            }
        };

        if line == self.config.quit_keyword.as_bytes() {
            debug!("quit requested");
            self.state = State::Terminated;
            return self.state;
        }

        match self.run_line(&line) {
            Ok(status) => debug!("line status {}", status),
            Err(err) => debug!("{:#}", err),
        }
        self.state
    }

    /// Run until end of input or the quit keyword.
    ///
    /// Per-line failures never end the session, and the session itself always
    /// finishes successfully.
    pub fn run(&mut self, source: &mut dyn LineSource) -> ExitCode {
        while self.step(source) == State::Running {}
        0
    }
}

impl Default for Interpreter<SystemSpawner> {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
