use std::io::{self, IsTerminal};
use std::process;

use s68::cli;
use s68::Interpreter;

fn main() {
    let args = cli::parse_args();
    cli::init_logging(&args);

    let interactive = args.file.is_none() && io::stdin().is_terminal();

    // ── Acquire the program text ──────────────────────────────────────────────
    let code = match &args.file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(code) => code,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                eprintln!("Error: File '{}' not found", path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => {
            if interactive {
                println!("strings68 Interpreter v{}", env!("CARGO_PKG_VERSION"));
                println!("Enter code (Ctrl+D or 'exit' to run):");
                println!();
            }
            let lines = match cli::collect_program(io::stdin().lock()) {
                Ok(lines) => lines,
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
            if lines.is_empty() {
                return;
            }
            lines.join("\n")
        }
    };

    // ── Run ───────────────────────────────────────────────────────────────────
    let mut interp = Interpreter::with_config(args.config());
    let result = interp.interpret(&code);

    if let Err(e) = cli::write_output(&mut io::stdout().lock(), interp.output(), interactive, result.is_ok()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    if let Err(e) = result {
        tracing::debug!(line = e.line, kind = ?e.kind(), "interpretation failed");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
