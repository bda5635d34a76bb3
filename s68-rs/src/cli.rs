//! Command-line front end.
//!
//! Usage:
//!   s68 [-d] [-v…] [--max-iterations N] [--max-depth N] [<file>]
//!
//! With `<file>` the program is read from disk.  Without it, lines are
//! collected from stdin until EOF or a line reading `exit`, and the
//! collected text is run as one program.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{Config, DEFAULT_MAX_DEPTH, DEFAULT_MAX_WHILE_ITERATIONS};

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "S68_LOG";

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "s68", version, about = "strings68 interpreter")]
pub struct CliArgs {
    /// Program file to run (reads stdin when omitted).
    pub file: Option<PathBuf>,

    /// Debug logging to stderr.
    #[arg(short, long)]
    pub debug: bool,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Body executions allowed per `while` statement.
    #[arg(long, default_value_t = DEFAULT_MAX_WHILE_ITERATIONS)]
    pub max_iterations: usize,

    /// Maximum block plus expression nesting.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

impl CliArgs {
    /// Interpreter limits selected on the command line.
    pub fn config(&self) -> Config {
        Config::new()
            .max_while_iterations(self.max_iterations)
            .max_depth(self.max_depth)
    }

    /// Log filter implied by `-d`/`-v`, if any.  `None` defers to
    /// [`LOG_ENV`], falling back to warnings only.
    pub fn log_filter(&self) -> Option<&'static str> {
        match (self.debug, self.verbose) {
            (_, v) if v >= 2 => Some("trace"),
            (true, _) | (_, 1) => Some("debug"),
            _ => None,
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()`, exiting with usage on error.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[&str]) -> Result<CliArgs, clap::Error> {
    CliArgs::try_parse_from(std::iter::once("s68").chain(argv.iter().copied()))
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Install the global `tracing` subscriber.  Logs go to stderr so that
/// program output on stdout stays clean.
pub fn init_logging(args: &CliArgs) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = match args.log_filter() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let formatter = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true);

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::registry()
        .with(formatter)
        .with(filter)
        .try_init();
}

// ── Interactive collection ────────────────────────────────────────────────────

/// Read program lines from `input` until EOF or a line whose trimmed text is
/// `exit`.  The `exit` line itself is not part of the program.
pub fn collect_program<R: BufRead>(input: R) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in input.lines() {
        let line = line?;
        if line.trim() == "exit" {
            break;
        }
        lines.push(line);
    }
    Ok(lines)
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Write the program's output lines to `out`.  In interactive mode a
/// successful run is introduced by a blank line and `=== Output ===`; a
/// failed run shows its partial output without the header.
pub fn write_output<W: Write>(
    out: &mut W,
    lines: &[String],
    interactive: bool,
    succeeded: bool,
) -> io::Result<()> {
    if interactive && succeeded {
        writeln!(out)?;
        writeln!(out, "=== Output ===")?;
    }
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args() {
        let a = parse_argv(&[]).unwrap();
        assert!(a.file.is_none());
        assert!(!a.debug);
        assert_eq!(a.config(), Config::default());
        assert_eq!(a.log_filter(), None);
    }

    #[test]
    fn file_positional() {
        let a = parse_argv(&["prog.s68"]).unwrap();
        assert_eq!(a.file, Some(PathBuf::from("prog.s68")));
    }

    #[test]
    fn limits() {
        let a = parse_argv(&["--max-iterations", "50", "--max-depth", "9"]).unwrap();
        assert_eq!(a.config(), Config { max_while_iterations: 50, max_depth: 9 });
    }

    #[test]
    fn debug_flag() {
        let a = parse_argv(&["-d", "x"]).unwrap();
        assert!(a.debug);
        assert_eq!(a.log_filter(), Some("debug"));
    }

    #[test]
    fn verbose_counts() {
        assert_eq!(parse_argv(&["-v"]).unwrap().log_filter(), Some("debug"));
        assert_eq!(parse_argv(&["-vv"]).unwrap().log_filter(), Some("trace"));
    }

    #[test]
    fn too_many_positional() {
        assert!(parse_argv(&["a", "b"]).is_err());
    }

    #[test]
    fn unknown_flag() {
        assert!(parse_argv(&["-z"]).is_err());
    }

    #[test]
    fn bad_limit() {
        assert!(parse_argv(&["--max-iterations", "lots"]).is_err());
    }

    fn rendered(lines: &[&str], interactive: bool, succeeded: bool) -> String {
        let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        let mut out = Vec::new();
        write_output(&mut out, &lines, interactive, succeeded).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn interactive_success_has_header() {
        assert_eq!(rendered(&["a", "b"], true, true), "\n=== Output ===\na\nb\n");
    }

    #[test]
    fn interactive_failure_omits_header() {
        assert_eq!(rendered(&["partial"], true, false), "partial\n");
    }

    #[test]
    fn non_interactive_never_has_header() {
        assert_eq!(rendered(&["x"], false, true), "x\n");
        assert_eq!(rendered(&[], false, false), "");
    }

    #[test]
    fn collect_stops_at_exit() {
        let src = "0 = \"a\"\nprint 0\n  exit  \nprint \"never\"\n";
        let lines = collect_program(src.as_bytes()).unwrap();
        assert_eq!(lines, vec!["0 = \"a\"", "print 0"]);
    }

    #[test]
    fn collect_until_eof() {
        let lines = collect_program("print \"x\"".as_bytes()).unwrap();
        assert_eq!(lines, vec!["print \"x\""]);
    }
}
