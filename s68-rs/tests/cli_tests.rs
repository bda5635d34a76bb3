/// Binary tests: run programs through the `s68` executable and check its
/// stdout, stderr and exit status.
///
/// Programs are supplied either as a file path (written to a temporary file)
/// or piped on stdin, in which case the front end runs non-interactively.

use std::io::Write;
use std::process::{Command, Output, Stdio};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Path to the `s68` binary built by this Cargo workspace.
fn binary() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_s68"))
}

fn run_file(program: &str) -> Output {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(program.as_bytes()).expect("write program");
    Command::new(binary())
        .arg(file.path())
        .output()
        .expect("failed to run s68")
}

fn run_stdin(program: &str) -> Output {
    let mut child = Command::new(binary())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn s68");
    {
        let stdin = child.stdin.as_mut().expect("stdin not open");
        stdin.write_all(program.as_bytes()).expect("write to stdin");
    }
    child.wait_with_output().expect("wait failed")
}

fn stdout_lines(out: &Output) -> Vec<String> {
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(str::to_owned)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn file_program_output() {
    let out = run_file("0 = split(\"a,b,c\", \",\")\nforeach 1 in 0 do\nprint uppercase(1)\nendfor\n");
    assert!(out.status.success());
    assert_eq!(stdout_lines(&out), vec!["A", "B", "C"]);
}

#[test]
fn missing_file() {
    let out = Command::new(binary())
        .arg("/nonexistent/prog.s68")
        .output()
        .expect("failed to run s68");
    assert_eq!(out.status.code(), Some(1));
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("Error: File '/nonexistent/prog.s68' not found"), "stderr: {err}");
}

#[test]
fn error_reports_line_and_keeps_partial_output() {
    let out = run_file("print \"before\"\nprint 9\nprint \"after\"\n");
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout_lines(&out), vec!["before"]);
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("Error: line 2: name error: Variable '9' not defined"), "stderr: {err}");
}

#[test]
fn stdin_program_stops_at_exit() {
    let out = run_stdin("0 = \"hi\"\nprint 0\nexit\nprint \"ignored\"\n");
    assert!(out.status.success());
    // Piped stdin is not a terminal: no banner, no output header.
    assert_eq!(stdout_lines(&out), vec!["hi"]);
}

#[test]
fn stdin_empty_program() {
    let out = run_stdin("");
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn loop_limit_flag() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"0 = \"a\"\nwhile 0 equals \"a\" do\nprint 0\nendwhile\n")
        .expect("write program");
    let out = Command::new(binary())
        .args(["--max-iterations", "2"])
        .arg(file.path())
        .output()
        .expect("failed to run s68");
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout_lines(&out), vec!["a", "a"]);
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("While loop exceeded maximum iterations (2)"), "stderr: {err}");
}
