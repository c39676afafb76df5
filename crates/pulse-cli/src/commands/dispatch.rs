use std::process::ExitCode;

use anyhow::Context;
use pulse_config::PulseConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
///
/// `status` runs on configuration alone; every other command needs a backend.
pub async fn dispatch(
    command: Commands,
    config: PulseConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Status(args) => commands::status::handle(&args, &config, flags).await,
        Commands::View(args) => commands::view::handle(&args, &backend(config)?, flags).await,
        Commands::Update(args) => commands::update::handle(&args, &backend(config)?, flags).await,
    }
}

fn backend(config: PulseConfig) -> anyhow::Result<AppContext> {
    AppContext::init(config).context("failed to initialize pulse application context")
}
