pub mod config;
pub mod content;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod send;
pub mod types;

pub use config::{Config, RawInputs};
pub use dispatch::{dispatch, OperationResult};
pub use error::{ActivitySmithError, Result, ValidationError};
pub use host::{Host, SecretSink};
pub use send::send;
pub use types::{ActionKind, Secret};
