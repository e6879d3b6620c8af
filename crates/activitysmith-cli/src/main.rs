mod github;
mod logging;

use std::io;
use std::path::PathBuf;

use activitysmith_client::{Client, DEFAULT_BASE_URL};
use activitysmith_core::{send, RawInputs, Secret};
use clap::Parser;

use github::GitHubHost;
use logging::SecretRegistry;

/// Every input also reads the `INPUT_*` variable the runner sets for it.
#[derive(Parser)]
#[command(
    name = "activitysmith-action",
    about = "Send ActivitySmith push notifications and start, update, or end Live Activities from a workflow",
    version
)]
struct Cli {
    /// send_push_notification | start_live_activity | update_live_activity | end_live_activity
    #[arg(long, env = "INPUT_ACTION", default_value = "")]
    action: String,

    /// ActivitySmith API key
    #[arg(long, env = "INPUT_API-KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Fail the job when the request fails
    #[arg(long, env = "INPUT_ERRORS", default_value = "false")]
    errors: String,

    /// Live Activity to update or end
    #[arg(long, env = "INPUT_LIVE-ACTIVITY-ID", default_value = "")]
    live_activity_id: String,

    /// Inline JSON or YAML request body
    #[arg(long, env = "INPUT_PAYLOAD", default_value = "")]
    payload: String,

    /// Separator for nested keys written flat in the payload (e.g. ".")
    #[arg(long, env = "INPUT_PAYLOAD-DELIMITER", default_value = "")]
    payload_delimiter: String,

    /// Path to a JSON or YAML request body
    #[arg(long, env = "INPUT_PAYLOAD-FILE-PATH", default_value = "")]
    payload_file_path: String,

    /// API base URL
    #[arg(long, env = "ACTIVITYSMITH_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// File the runner collects step outputs from
    #[arg(long, env = "GITHUB_OUTPUT")]
    output_file: Option<PathBuf>,
}

impl Cli {
    fn inputs(&self) -> RawInputs {
        RawInputs {
            action: self.action.clone(),
            api_key: Secret::new(self.api_key.clone()),
            errors: self.errors.clone(),
            live_activity_id: self.live_activity_id.clone(),
            payload: self.payload.clone(),
            payload_delimiter: self.payload_delimiter.clone(),
            payload_file_path: self.payload_file_path.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // The runner sets RUNNER_DEBUG=1 when step debug logging is enabled.
    let debug = std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1");
    let secrets = SecretRegistry::default();
    logging::init(secrets.clone(), debug);

    if let Err(e) = run(&cli, secrets.clone()).await {
        eprintln!("error: {}", secrets.redact(&describe(&e)));
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, secrets: SecretRegistry) -> anyhow::Result<()> {
    let mut host = GitHubHost::new(io::stdout(), cli.output_file.clone(), secrets);
    send(cli.inputs(), &mut host, |api_key| {
        Client::with_base_url(api_key, &cli.api_url)
    })
    .await?;
    Ok(())
}

/// The error chain joined by `: `, skipping causes that repeat the message
/// of the error wrapping them.
fn describe(err: &anyhow::Error) -> String {
    let mut parts: Vec<String> = Vec::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
    }
    parts.join(": ")
}
