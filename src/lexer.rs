//! Splitting a single statement into words.
//!
//! There is no quoting, escaping or expansion: a word is a maximal run of
//! non-whitespace bytes, and any run of whitespace separates two words.
//! Bytes are not decoded, so arguments reach the program unchanged.

use crate::command::{Command, os_string_from_bytes};

/// Whitespace as understood by the C locale: space, `\t`, `\n`, `\v`, `\f`, `\r`.
pub fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}

/// Iterate over the whitespace-delimited words of `statement`, left to right.
pub fn words(statement: &[u8]) -> impl Iterator<Item = &[u8]> {
    statement
        .split(|&byte| is_space(byte))
        .filter(|word| !word.is_empty())
}

/// Parse one raw statement into a [`Command`].
///
/// The first word is the program name and the remaining words are appended
/// as arguments in order. A statement that is empty or holds only whitespace
/// yields `None`; this is not an error.
pub fn parse_command(statement: &[u8]) -> Option<Command> {
    let mut words = words(statement);
    let mut command = Command::new(os_string_from_bytes(words.next()?))?;
    for word in words {
        command.push_arg(os_string_from_bytes(word));
    }
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_echo_with_arguments() {
        let cmd = parse_command(b"echo a b c").unwrap();
        assert_eq!(cmd.program(), "echo");
        assert_eq!(cmd.argv(), ["echo", "a", "b", "c"]);
    }

    #[test]
    fn test_whitespace_runs_are_single_delimiters() {
        let cmd = parse_command(b"  \t ls   -l\t\t-a \x0B /tmp  \r").unwrap();
        assert_eq!(cmd.argv(), ["ls", "-l", "-a", "/tmp"]);
    }

    #[test]
    fn test_blank_statement_is_dropped() {
        assert!(parse_command(b"").is_none());
        assert!(parse_command(b"    ").is_none());
        assert!(parse_command(b" \t\r\x0C ").is_none());
    }

    #[test]
    fn test_argument_count_matches_word_count() {
        for line in ["pwd", "a b", " x  y  z ", "one two three four five six seven"] {
            let cmd = parse_command(line.as_bytes()).unwrap();
            let tokens = line.split_whitespace().count();
            assert_eq!(cmd.argv().len(), tokens);
            assert_eq!(cmd.argv()[0].as_os_str(), cmd.program());
        }
    }

    #[test]
    fn test_quotes_are_not_special() {
        let cmd = parse_command(b"echo \"hello world\"").unwrap();
        assert_eq!(cmd.argv(), ["echo", "\"hello", "world\""]);
    }

    #[test]
    #[cfg(unix)]
    fn test_non_utf8_word_is_kept_byte_for_byte() {
        use std::os::unix::ffi::OsStrExt;

        let cmd = parse_command(b"touch caf\xe9 \xff\xfe").unwrap();
        assert_eq!(cmd.args()[0].as_bytes(), b"caf\xe9");
        assert_eq!(cmd.args()[1].as_bytes(), b"\xff\xfe");
    }
}
