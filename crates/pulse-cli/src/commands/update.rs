use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use pulse_core::entities::Record;
use pulse_core::ids::RecordId;
use pulse_core::responses::{UpdateOutcome, UpdateResponse};
use pulse_store::{PollingSource, RecordSource};
use pulse_views::form::{self, SelectorState};
use pulse_views::{LOADING_MESSAGE, Message, UpdateForm};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::UpdateArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `pulse update`: wait for the first delivery, select, edit, submit.
///
/// Name and value validation is left to the form so the user sees the same
/// messages as any other client. Exits with failure on an error message.
pub async fn handle(
    args: &UpdateArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    validate_update_args(args)?;
    let id = RecordId::parse(args.id.as_str())?;

    let source = PollingSource::spawn(Arc::clone(&ctx.client), ctx.config.sync.poll_interval());
    let form = UpdateForm::attach(&source, Arc::clone(&ctx.client));

    let spinner = Progress::spinner(LOADING_MESSAGE);
    let wait = Duration::from_secs(ctx.config.backend.request_timeout_secs.max(1));
    let selector = match tokio::time::timeout(wait, first_delivery(&form)).await {
        Ok(selector) => {
            spinner.finish_clear();
            selector?
        }
        Err(_) => {
            spinner.finish_err("no records received");
            bail!(
                "no records received from {} within {}s",
                ctx.client.base_url(),
                wait.as_secs()
            );
        }
    };

    if matches!(selector, SelectorState::Empty { .. }) {
        bail!(form::EMPTY_MESSAGE);
    }
    if !form.select(&id) {
        bail!("record '{id}' is not in the current record set");
    }
    let before = source.current().find(&id).cloned();

    if let Some(name) = &args.name {
        form.edit_name(name.as_str());
    }
    if let Some(value) = &args.value {
        form.edit_value(value.as_str());
    }

    let message = form
        .submit()
        .await
        .context("update form closed before the submission settled")?;
    tracing::debug!(%id, error = message.is_error(), "submission settled");

    let response = response_for(&message, before);
    output(&response, flags.format)?;

    Ok(match response.outcome {
        UpdateOutcome::Success => ExitCode::SUCCESS,
        UpdateOutcome::Error => ExitCode::FAILURE,
    })
}

fn validate_update_args(args: &UpdateArgs) -> anyhow::Result<()> {
    if args.name.is_none() && args.value.is_none() {
        bail!("update requires at least one of --name or --value");
    }
    Ok(())
}

/// Resolves once the form's selector leaves the loading state.
async fn first_delivery<W>(form: &UpdateForm<W>) -> anyhow::Result<SelectorState> {
    let mut views = form.views();
    let view = views
        .wait_for(|view| !matches!(view.selector, SelectorState::Loading { .. }))
        .await
        .context("update form closed while waiting for records")?;
    Ok(view.selector.clone())
}

fn response_for(message: &Message, record: Option<Record>) -> UpdateResponse {
    let outcome = if message.is_error() {
        UpdateOutcome::Error
    } else {
        UpdateOutcome::Success
    };
    UpdateResponse {
        outcome,
        message: message.text().to_string(),
        record,
    }
}
