//! Acquiring input lines from a batch file or from the terminal.
//!
//! Every source hands out at most `max_len - 1` bytes per call, stopping after
//! the first newline. A longer line is returned in consecutive pieces, and the
//! newline is kept so `"quit\n"` can be matched literally. Lines are raw bytes;
//! nothing is decoded on the way to the launcher.

use crate::config::MIN_LINE_LEN;
use crate::error::{ReadError, SourceError};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Something the session loop can pull lines from.
pub trait LineSource {
    /// Read the next raw line, terminator included when present.
    ///
    /// Returns `Ok(None)` at end of input.
    fn next_line(&mut self) -> Result<Option<Vec<u8>>, ReadError>;
}

/// Payload bytes per read for a configured line length.
fn payload_limit(max_len: usize) -> usize {
    max_len.max(MIN_LINE_LEN) - 1
}

/// Read one bounded line from `reader`.
///
/// Reads until a newline has been consumed or `max_len - 1` bytes have been
/// collected, whichever comes first. A `max_len` below [`MIN_LINE_LEN`] is
/// treated as [`MIN_LINE_LEN`]. Returns `None` when the input ends before any
/// byte is read.
pub fn read_line<R: BufRead + ?Sized>(reader: &mut R, max_len: usize) -> io::Result<Option<Vec<u8>>> {
    let limit = payload_limit(max_len);
    let mut line = Vec::new();

    while line.len() < limit {
        let available = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            break;
        }

        let room = limit - line.len();
        let window = &available[..available.len().min(room)];
        match window.iter().position(|&b| b == b'\n') {
            Some(newline) => {
                line.extend_from_slice(&window[..=newline]);
                reader.consume(newline + 1);
                break;
            }
            None => {
                let taken = window.len();
                line.extend_from_slice(window);
                reader.consume(taken);
            }
        }
    }

    if line.is_empty() {
        Ok(None)
    } else {
        Ok(Some(line))
    }
}

/// Split off and return the first `max_len - 1` bytes of `pending`.
fn take_chunk(pending: &mut Vec<u8>, max_len: usize) -> Vec<u8> {
    let limit = payload_limit(max_len);
    if pending.len() <= limit {
        return std::mem::take(pending);
    }
    let rest = pending.split_off(limit);
    std::mem::replace(pending, rest)
}

/// Lines from a command file. No prompt is written.
pub struct BatchSource<R> {
    reader: R,
    max_len: usize,
}

impl BatchSource<BufReader<File>> {
    /// Open `path` for reading.
    pub fn open(path: &Path, max_len: usize) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file), max_len))
    }
}

impl<R: BufRead> BatchSource<R> {
    pub fn new(reader: R, max_len: usize) -> Self {
        Self { reader, max_len }
    }
}

impl<R: BufRead> LineSource for BatchSource<R> {
    fn next_line(&mut self) -> Result<Option<Vec<u8>>, ReadError> {
        Ok(read_line(&mut self.reader, self.max_len)?)
    }
}

/// Lines from a plain stream, writing the prompt to `output` before each read.
///
/// Used for interactive mode when standard input is not a terminal.
pub struct PromptedSource<R, W> {
    reader: R,
    output: W,
    prompt: String,
    max_len: usize,
}

impl<R: BufRead, W: Write> PromptedSource<R, W> {
    pub fn new(reader: R, output: W, prompt: impl Into<String>, max_len: usize) -> Self {
        Self {
            reader,
            output,
            prompt: prompt.into(),
            max_len,
        }
    }

    /// Give back the prompt sink, e.g. to inspect what was written.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> LineSource for PromptedSource<R, W> {
    fn next_line(&mut self) -> Result<Option<Vec<u8>>, ReadError> {
        self.output.write_all(self.prompt.as_bytes())?;
        self.output.flush()?;
        Ok(read_line(&mut self.reader, self.max_len)?)
    }
}

/// Lines typed at the terminal, read through a line editor with history.
///
/// The editor returns lines without terminator; the newline is restored so
/// both modes hand the same text to the session loop. Ctrl-C gives an empty
/// line and Ctrl-D ends the input.
pub struct InteractiveSource {
    editor: DefaultEditor,
    prompt: String,
    max_len: usize,
    pending: Vec<u8>,
}

impl InteractiveSource {
    pub fn new(prompt: impl Into<String>, max_len: usize) -> Result<Self, SourceError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            prompt: prompt.into(),
            max_len,
            pending: Vec::new(),
        })
    }
}

impl LineSource for InteractiveSource {
    fn next_line(&mut self) -> Result<Option<Vec<u8>>, ReadError> {
        if !self.pending.is_empty() {
            return Ok(Some(take_chunk(&mut self.pending, self.max_len)));
        }

        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor
                        .add_history_entry(line.as_str())
                        .map_err(ReadError::Editor)?;
                }
                self.pending = line.into_bytes();
                self.pending.push(b'\n');
                Ok(Some(take_chunk(&mut self.pending, self.max_len)))
            }
            Err(ReadlineError::Interrupted) => Ok(Some(b"\n".to_vec())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(ReadError::Editor(err)),
        }
    }
}
