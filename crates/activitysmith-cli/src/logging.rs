use std::io::{self, Write};
use std::sync::{Arc, RwLock};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const MASK: &str = "***";

/// Values that must never reach the log, shared between the host (which
/// registers them) and the log writer (which scrubs them).
#[derive(Debug, Clone, Default)]
pub struct SecretRegistry(Arc<RwLock<Vec<String>>>);

impl SecretRegistry {
    pub fn add(&self, secret: &str) {
        if secret.is_empty() {
            return;
        }
        let mut secrets = self.0.write().unwrap_or_else(|e| e.into_inner());
        if !secrets.iter().any(|s| s == secret) {
            secrets.push(secret.to_string());
            // Longest first, so a secret containing another is masked whole.
            secrets.sort_by_key(|s| std::cmp::Reverse(s.len()));
        }
    }

    pub fn redact(&self, text: &str) -> String {
        let secrets = self.0.read().unwrap_or_else(|e| e.into_inner());
        secrets
            .iter()
            .fold(text.to_string(), |acc, secret| acc.replace(secret.as_str(), MASK))
    }
}

/// Writer that scrubs registered secrets from everything passed through it.
pub struct Redacting<W> {
    inner: W,
    secrets: SecretRegistry,
}

impl<W: Write> Write for Redacting<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        self.inner.write_all(self.secrets.redact(&text).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// `MakeWriter` handing out redacting stdout writers to the subscriber.
pub struct RedactingStdout {
    secrets: SecretRegistry,
}

impl<'a> MakeWriter<'a> for RedactingStdout {
    type Writer = Redacting<io::Stdout>;

    fn make_writer(&'a self) -> Self::Writer {
        Redacting {
            inner: io::stdout(),
            secrets: self.secrets.clone(),
        }
    }
}

/// Install the global subscriber. `debug` mirrors the runner's debug mode;
/// `RUST_LOG` directives still apply on top.
pub fn init(secrets: SecretRegistry, debug: bool) {
    let default_level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .with_target(false)
        .without_time()
        .with_writer(RedactingStdout { secrets })
        .init();
}
