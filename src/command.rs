use std::ffi::{OsStr, OsString};

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// Aggregated line statuses are raw wait statuses OR-ed together, so they only
/// carry "zero or not" reliably.
pub type ExitCode = i32;

/// Turn raw input bytes into an argument, keeping every byte on Unix.
#[cfg(unix)]
pub fn os_string_from_bytes(bytes: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes.to_vec())
}

#[cfg(not(unix))]
pub fn os_string_from_bytes(bytes: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Append `item`, doubling the capacity first when the vector is full.
///
/// `Vec` already grows geometrically, but its exact factor is unspecified.
/// Command and argument lists promise doubling, so growth is requested here
/// explicitly.
fn push_doubling<T>(items: &mut Vec<T>, item: T) {
    if items.len() == items.capacity() {
        let additional = items.capacity().max(1);
        items.reserve_exact(additional);
    }
    items.push(item);
}

/// One parsed invocation: a program name, its argument vector, and the pid
/// of the child process once it has been spawned.
///
/// `argv()[0]` is always the program name, so the vector can be handed to
/// process creation as-is. Arguments are kept as the bytes that were read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    argv: Vec<OsString>,
    pid: Option<u32>,
}

impl Command {
    /// Create a command with no arguments besides the program name.
    ///
    /// Returns `None` for an empty program name: blank statements produce no
    /// command at all rather than an empty one.
    pub fn new(program: impl Into<OsString>) -> Option<Self> {
        let program = program.into();
        if program.is_empty() {
            return None;
        }
        let mut argv = Vec::with_capacity(1);
        argv.push(program);
        Some(Self { argv, pid: None })
    }

    /// Append one argument after the ones already present.
    pub fn push_arg(&mut self, arg: impl Into<OsString>) {
        push_doubling(&mut self.argv, arg.into());
    }

    /// Name of the program to run.
    pub fn program(&self) -> &OsStr {
        &self.argv[0]
    }

    /// Full argument vector, starting with the program name.
    pub fn argv(&self) -> &[OsString] {
        &self.argv
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[OsString] {
        &self.argv[1..]
    }

    /// Allocated slots of the argument vector.
    pub fn arg_capacity(&self) -> usize {
        self.argv.capacity()
    }

    /// Pid of the spawned child, if this command has been launched.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Record the pid of the child running this command.
    ///
    /// The slot is written once; later writes are ignored.
    pub(crate) fn set_pid(&mut self, pid: u32) {
        if self.pid.is_none() {
            self.pid = Some(pid);
        }
    }
}

/// Ordered commands parsed from one input line.
///
/// Order of the list is the spawn order and the cleanup order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandList {
    commands: Vec<Command>,
}

impl CommandList {
    /// An empty list with room for one command.
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(1),
        }
    }

    /// Append a command at the end of the list.
    pub fn push(&mut self, command: Command) {
        push_doubling(&mut self.commands, command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.commands.capacity()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Command> {
        self.commands.iter_mut()
    }

    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }
}

impl Default for CommandList {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a CommandList {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut CommandList {
    type Item = &'a mut Command;
    type IntoIter = std::slice::IterMut<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl IntoIterator for CommandList {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}
