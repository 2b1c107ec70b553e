#![cfg(unix)]

use line_shell::input::BatchSource;
use line_shell::{Interpreter, SessionConfig, State};
use std::fs;
use std::path::Path;
use std::process::Command;

fn write_batch(dir: &Path, contents: impl AsRef<[u8]>) -> std::path::PathBuf {
    let path = dir.join("commands.txt");
    fs::write(&path, contents).expect("write batch file");
    path
}

#[test]
fn test_batch_file_runs_every_command_of_every_line() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    let c = dir.path().join("c");
    let script = format!(
        "touch {}; touch {}\n   \ntouch {}\n",
        a.display(),
        b.display(),
        c.display()
    );
    let path = write_batch(dir.path(), &script);

    let mut source = BatchSource::open(&path, 4096).unwrap();
    let mut sh = Interpreter::new(SessionConfig::default());

    assert_eq!(sh.run(&mut source), 0);
    assert_eq!(sh.state(), State::Terminated);
    assert!(a.exists() && b.exists() && c.exists());
}

#[test]
fn test_quit_line_skips_the_rest_of_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let before = dir.path().join("before");
    let after = dir.path().join("after");
    let script = format!(
        "touch {}\nquit\ntouch {}\n",
        before.display(),
        after.display()
    );
    let path = write_batch(dir.path(), &script);

    let mut source = BatchSource::open(&path, 4096).unwrap();
    assert_eq!(Interpreter::default().run(&mut source), 0);

    assert!(before.exists());
    assert!(!after.exists());
}

#[test]
fn test_next_line_waits_for_all_children_of_previous_line() {
    let dir = tempfile::tempdir().unwrap();
    let slow = dir.path().join("slow.sh");
    fs::write(&slow, "sleep 0.3\ntouch \"$1\"\n").unwrap();
    let marker = dir.path().join("marker");
    let copy = dir.path().join("copy");
    // The copy only succeeds if the slow child of the first line has finished.
    let script = format!(
        "sh {} {}; true\ncp {} {}\n",
        slow.display(),
        marker.display(),
        marker.display(),
        copy.display()
    );
    let path = write_batch(dir.path(), &script);

    let mut source = BatchSource::open(&path, 4096).unwrap();
    Interpreter::default().run(&mut source);

    assert!(marker.exists());
    assert!(copy.exists());
}

#[test]
fn test_non_utf8_file_name_is_passed_through() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    let mut script = b"touch ".to_vec();
    script.extend_from_slice(dir.path().as_os_str().as_bytes());
    script.extend_from_slice(b"/caf\xe9\n");
    let path = write_batch(dir.path(), &script);

    let status = Command::new(env!("CARGO_BIN_EXE_line_shell"))
        .arg(&path)
        .status()
        .expect("run line_shell");

    assert!(status.success());
    assert!(dir.path().join(OsStr::from_bytes(b"caf\xe9")).exists());
}

#[test]
fn test_binary_exits_successfully_on_quit() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_batch(dir.path(), "true; false\nno-such-program-31337\nquit\n");

    let output = Command::new(env!("CARGO_BIN_EXE_line_shell"))
        .arg(&path)
        .output()
        .expect("run line_shell");

    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "batch mode must not print a prompt");
}

#[test]
fn test_binary_exits_successfully_at_end_of_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_batch(dir.path(), "true\n");

    let status = Command::new(env!("CARGO_BIN_EXE_line_shell"))
        .arg(&path)
        .status()
        .expect("run line_shell");

    assert!(status.success());
}

#[test]
fn test_binary_fails_when_batch_file_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");

    let output = Command::new(env!("CARGO_BIN_EXE_line_shell"))
        .arg(&missing)
        .output()
        .expect("run line_shell");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Opening input stream failed."));
}

#[test]
fn test_binary_prompts_when_reading_piped_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new(env!("CARGO_BIN_EXE_line_shell"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("run line_shell");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"   \nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "prompt> prompt> ");
}
