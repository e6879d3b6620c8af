use activitysmith_client::ActivitySmithApi;
use chrono::Utc;
use tracing::warn;

use crate::config::{Config, RawInputs};
use crate::dispatch::dispatch;
use crate::error::Result;
use crate::host::{outputs, Host};

/// Run the job: load the inputs, make the request, record the outputs.
///
/// Input errors are returned straight away and leave every output unset.
/// Once the request has been attempted, `time` is written exactly once. A
/// failed request then fails the job only when the `errors` input is on;
/// otherwise it is logged through the outputs (`ok=false`) and swallowed.
/// A failure to write `time` never hides the request failure.
pub async fn send<C, F, H>(inputs: RawInputs, host: &mut H, connect: F) -> Result<()>
where
    C: ActivitySmithApi,
    F: FnOnce(&str) -> activitysmith_client::Result<C>,
    H: Host + ?Sized,
{
    let config = Config::load(inputs, host)?;

    let outcome = dispatch(&config, connect, host).await;
    let recorded = host.set_output(outputs::TIME, &Utc::now().timestamp().to_string());

    match outcome {
        Err(err) if config.errors => {
            if let Err(e) = recorded {
                warn!("could not record the time output: {e}");
            }
            host.set_failed(err.message());
            Err(err)
        }
        _ => Ok(recorded?),
    }
}
