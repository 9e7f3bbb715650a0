use std::io::{self, Write};

use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::engine::RunStats;

/// Filter for the stderr diagnostic stream.
///
/// Verbose mode echoes every derived row at `debug`. Otherwise environment
/// directives apply on top of a `warn` default, so invalid-taxon and
/// write-failure diagnostics surface even with `RUST_LOG` unset.
pub fn diagnostic_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
    }
}

pub struct JsonOutput;

impl JsonOutput {
    /// Prints the end-of-run summary to stdout. Table rows only ever go to
    /// the table files, so stdout stays free for this.
    pub fn print_summary(stats: &RunStats) -> io::Result<()> {
        Self::print_json(stats)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
