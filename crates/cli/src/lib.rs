#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `minifind` front end: it parses the command line,
//! walks every operand with [`filefind::FileFinder`] and prints one path per
//! line.
//!
//! # Design
//!
//! [`run`] accepts an iterator of arguments together with handles for standard
//! output and error so tests can drive it without spawning a process. A
//! [`clap`](https://docs.rs/clap/) command definition recognises
//! `--depth-first`, `--follow`, `--cross-filesystems`, a repeatable `-v` and
//! the `--debug`/`--info` category lists. Diagnostics recorded by the engine
//! through the `logging` crate are flushed to standard error as the walk
//! progresses.
//!
//! # Errors
//!
//! Usage errors exit with status `2`, traversal and output failures with `1`.
//! A missing operand is reported through the `skip` info category and does
//! not change the exit status.
//!
//! # Examples
//!
//! ```
//! use cli::run;
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = run(["minifind", "--help"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(String::from_utf8(stdout).unwrap().contains("Usage:"));
//! ```

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;

use filefind::{Advance, FileFinderBuilder};

mod command;

use command::{PROGRAM_NAME, ParsedArgs, parse_args, render_help, render_usage};

/// Exit status for a completed walk.
const EXIT_SUCCESS: i32 = 0;
/// Exit status for traversal or output failures.
const EXIT_FAILURE: i32 = 1;
/// Exit status for command-line usage errors.
const EXIT_USAGE: i32 = 2;

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Runs the CLI using the provided argument iterator and output handles.
///
/// The function returns the process exit code that should be used by the caller.
#[allow(clippy::module_name_repetitions)]
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, stdout, stderr),
        Err(error) => {
            let _ = write!(stderr, "{error}");
            EXIT_USAGE
        }
    }
}

fn execute<Out, Err>(parsed: ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    let ParsedArgs {
        show_help,
        show_version,
        targets,
        options,
        verbosity,
    } = parsed;

    if show_help {
        if stdout.write_all(render_help().as_bytes()).is_err() {
            return EXIT_FAILURE;
        }
        return EXIT_SUCCESS;
    }

    if show_version {
        if writeln!(stdout, "{PROGRAM_NAME} {}", env!("CARGO_PKG_VERSION")).is_err() {
            return EXIT_FAILURE;
        }
        return EXIT_SUCCESS;
    }

    if targets.is_empty() {
        let _ = writeln!(stderr, "{}", render_usage());
        return EXIT_USAGE;
    }

    logging::init_tracing(verbosity);
    logging::drain_events();

    let mut finder = match FileFinderBuilder::with_targets(targets)
        .options(options)
        .build()
    {
        Ok(finder) => finder,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            return EXIT_FAILURE;
        }
    };

    let mut count: u64 = 0;
    loop {
        match finder.advance() {
            Ok(Advance::Found) => {
                if flush_diagnostics(stderr).is_err() {
                    return EXIT_FAILURE;
                }
                let Some(path) = finder.current_path() else {
                    continue;
                };
                if let Err(error) = write_path(stdout, path) {
                    let _ = writeln!(stderr, "{PROGRAM_NAME}: error writing output: {error}");
                    return EXIT_FAILURE;
                }
                count += 1;
            }
            Ok(Advance::End) => break,
            Err(error) => {
                let _ = flush_diagnostics(stderr);
                let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
                return EXIT_FAILURE;
            }
        }
    }

    tracing::info!(target: "minifind::stats", "{count} entries listed");

    if stdout.flush().is_err() || flush_diagnostics(stderr).is_err() {
        return EXIT_FAILURE;
    }
    EXIT_SUCCESS
}

/// Writes every buffered diagnostic event to `stderr`, one per line.
fn flush_diagnostics<W: Write>(stderr: &mut W) -> io::Result<()> {
    for event in logging::drain_events() {
        writeln!(stderr, "{event}")?;
    }
    Ok(())
}

#[cfg(unix)]
fn write_path<W: Write>(stdout: &mut W, path: &Path) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;

    stdout.write_all(path.as_os_str().as_bytes())?;
    stdout.write_all(b"\n")
}

#[cfg(not(unix))]
fn write_path<W: Write>(stdout: &mut W, path: &Path) -> io::Result<()> {
    writeln!(stdout, "{}", path.display())
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(u8::try_from(clamped).unwrap_or(u8::MAX))
}
