//! The workflow platform as seen by the job: a place to register secrets,
//! publish outputs, and report a failed run.

use std::io;

/// Names of the outputs the job publishes.
pub mod outputs {
    pub const OK: &str = "ok";
    pub const RESPONSE: &str = "response";
    pub const LIVE_ACTIVITY_ID: &str = "live_activity_id";
    pub const TIME: &str = "time";
}

/// Registers values the platform must mask in every later log line.
pub trait SecretSink {
    fn set_secret(&mut self, secret: &str);
}

pub trait Host: SecretSink {
    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()>;

    /// Mark the job as failed. The process exit code is left to the caller.
    fn set_failed(&mut self, message: &str);
}
