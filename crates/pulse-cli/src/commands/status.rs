use std::process::ExitCode;
use std::time::Duration;

use pulse_config::{BackendConfig, PulseConfig};
use pulse_core::responses::StatusResponse;
use pulse_store::BackendClient;
use pulse_store::health::{self, HealthReport};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::StatusArgs;
use crate::output::output;
use crate::progress::Progress;

const PROBE_INTERVAL: Duration = Duration::from_secs(1);

/// Handle `pulse status`. Works without a configured backend.
pub async fn handle(
    args: &StatusArgs,
    config: &PulseConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    let response = match unconfigured(&config.backend) {
        Some(response) => response,
        None => {
            let client = BackendClient::new(&config.backend)?;
            let report = check(&client, args.wait).await;
            from_report(client.base_url(), report)
        }
    };

    output(&response, flags.format)?;
    Ok(if response.healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn check(client: &BackendClient, wait: Option<u64>) -> HealthReport {
    let Some(secs) = wait else {
        return health::probe(client).await;
    };

    let spinner = Progress::spinner("Waiting for backend...");
    let report = health::wait_until_healthy(
        client,
        Duration::from_secs(secs),
        PROBE_INTERVAL,
        |elapsed| {
            spinner.set_message(&format!("Waiting for backend... {}s", elapsed.as_secs()));
        },
    )
    .await;

    if report.healthy {
        spinner.finish_clear();
    } else {
        spinner.finish_err("backend did not become healthy");
    }
    report
}

/// `Some` when the backend URL is missing or invalid.
fn unconfigured(backend: &BackendConfig) -> Option<StatusResponse> {
    let error = backend.endpoint().err()?;
    let configured = backend.is_configured();
    Some(StatusResponse {
        configured,
        url: configured.then(|| backend.url.trim().to_string()),
        healthy: false,
        version: None,
        error: Some(error.to_string()),
    })
}

fn from_report(url: &str, report: HealthReport) -> StatusResponse {
    StatusResponse {
        configured: true,
        url: Some(url.to_string()),
        healthy: report.healthy,
        version: report.version,
        error: report.last_error,
    }
}
