//! GitHub Actions implementation of [`Host`].
//!
//! Secrets and failures are workflow commands on stdout (`::add-mask::`,
//! `::error::`). Outputs are appended to the `$GITHUB_OUTPUT` file as
//! heredoc records; without that file the legacy `::set-output` command is
//! printed instead.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use activitysmith_core::{Host, SecretSink};
use uuid::Uuid;

use crate::logging::SecretRegistry;

pub struct GitHubHost<W: Write> {
    out: W,
    output_file: Option<PathBuf>,
    secrets: SecretRegistry,
}

impl<W: Write> GitHubHost<W> {
    pub fn new(out: W, output_file: Option<PathBuf>, secrets: SecretRegistry) -> Self {
        Self {
            out,
            output_file,
            secrets,
        }
    }
}

impl<W: Write> SecretSink for GitHubHost<W> {
    fn set_secret(&mut self, secret: &str) {
        self.secrets.add(secret);
        // Our own log writer masks it regardless; the command only matters
        // for output the runner captures from elsewhere.
        if let Err(e) = issue(&mut self.out, "add-mask", &[], secret) {
            tracing::warn!("could not register secret with the runner: {e}");
        }
    }
}

impl<W: Write> Host for GitHubHost<W> {
    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        match &self.output_file {
            Some(path) => {
                let record = key_value_record(name, value)?;
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(record.as_bytes())
            }
            None => {
                writeln!(self.out)?;
                issue(&mut self.out, "set-output", &[("name", name)], value)
            }
        }
    }

    fn set_failed(&mut self, message: &str) {
        if let Err(e) = issue(&mut self.out, "error", &[], message) {
            tracing::warn!("could not report failure to the runner: {e}");
        }
    }
}

/// Write `::command key=value,…::message`.
fn issue<W: Write>(
    out: &mut W,
    command: &str,
    properties: &[(&str, &str)],
    message: &str,
) -> io::Result<()> {
    let mut line = format!("::{command}");
    if !properties.is_empty() {
        let props: Vec<String> = properties
            .iter()
            .map(|(k, v)| format!("{k}={}", escape_property(v)))
            .collect();
        line.push(' ');
        line.push_str(&props.join(","));
    }
    line.push_str("::");
    line.push_str(&escape_data(message));
    writeln!(out, "{line}")?;
    out.flush()
}

fn key_value_record(name: &str, value: &str) -> io::Result<String> {
    let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
    if name.contains(&delimiter) || value.contains(&delimiter) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("output '{name}' contains the record delimiter"),
        ));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
