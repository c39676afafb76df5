use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use pulse_core::snapshot::Snapshot;
use pulse_store::{PollingSource, RecordSource};
use pulse_views::{DisplayOptions, DisplayView, LOADING_MESSAGE};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ViewArgs;
use crate::context::AppContext;
use crate::output::output_display;
use crate::progress::Progress;

/// Handle `pulse view`.
pub async fn handle(
    args: &ViewArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    let view = DisplayView::new(DisplayOptions::from(&ctx.config.display));
    if args.watch {
        watch(&view, ctx, flags).await?;
    } else {
        once(&view, ctx, flags).await?;
    }
    Ok(ExitCode::SUCCESS)
}

async fn once(view: &DisplayView, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let spinner = Progress::spinner(LOADING_MESSAGE);
    let records = match ctx.client.list_records().await {
        Ok(records) => {
            spinner.finish_clear();
            records
        }
        Err(error) => {
            spinner.finish_err("failed to load records");
            return Err(error).context("failed to load records");
        }
    };

    output_display(&view.project(&Snapshot::from(records)), flags.format)
}

/// Re-render on every delivered snapshot until Ctrl-C.
async fn watch(view: &DisplayView, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let source = PollingSource::spawn(Arc::clone(&ctx.client), ctx.config.sync.poll_interval());
    let mut feed = source.subscribe();

    loop {
        let state = {
            let snapshot = feed.borrow_and_update();
            view.project(&snapshot)
        };
        output_display(&state, flags.format)?;

        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl-C")?;
                tracing::debug!("interrupted, stopping watch");
                return Ok(());
            }
            changed = feed.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
        }
    }
}
