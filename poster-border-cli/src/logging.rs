//! Logger setup: plain messages on stdout, optionally mirrored to a file.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::error::CliError;

/// Dependencies that are chatty at debug level.
const NOISY_MODULES: &[&str] = &["reqwest", "hyper", "hyper_util", "h2", "rustls"];

/// Install the global logger.
///
/// Normal output is the bare message. `verbose` adds timestamps and debug
/// messages, `quiet` keeps only warnings and errors. `RUST_LOG` overrides
/// both. With `logfile`, everything is also written there without ANSI codes.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::new();
    builder.filter_level(level);
    for module in NOISY_MODULES {
        builder.filter_module(module, LevelFilter::Warn);
    }
    builder.parse_default_env();

    if verbose {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }

    match logfile {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::logging(format!("Cannot create {}: {}", path.display(), e))
            })?;
            builder.target(Target::Pipe(Box::new(TeeWriter::new(io::stdout(), file))));
        }
        None => {
            builder.target(Target::Stdout);
        }
    }

    builder
        .try_init()
        .map_err(|e| CliError::logging(e.to_string()))
}

/// Writes everything to the console and an ANSI-stripped copy to a file.
pub(crate) struct TeeWriter<C: Write, F: Write> {
    console: C,
    file: strip_ansi_escapes::Writer<F>,
}

impl<C: Write, F: Write> TeeWriter<C, F> {
    pub(crate) fn new(console: C, file: F) -> Self {
        Self {
            console,
            file: strip_ansi_escapes::Writer::new(file),
        }
    }
}

impl<C: Write, F: Write> Write for TeeWriter<C, F> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console.flush()?;
        self.file.flush()
    }
}

#[cfg(test)]
#[path = "tests/logging_tests.rs"]
mod tests;
