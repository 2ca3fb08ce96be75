//! One diff-to-action cycle: collect, prompt, complete, confirm, apply.

use std::time::Duration;

use tracing::{debug, info};

use crate::action::{ActionKind, Applied, apply};
use crate::config::Settings;
use crate::confirm::{ConfirmationOutcome, Prompter};
use crate::error::PipelineError;
use crate::git::{Vcs, collect};
use crate::llm::{CompletionGateway, GeneratedMessage, complete_with_timeout, validate};
use crate::prompt::build;

/// What a completed cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub kind: ActionKind,
    pub message: GeneratedMessage,
    pub outcome: ConfirmationOutcome,
    pub applied: Applied,
}

/// Run a single cycle for `kind`.
///
/// Every stage failure aborts the cycle before any later stage runs, so a
/// failed diff read never reaches the network and a failed completion never
/// reaches the operator. Rejection and cancellation are normal outcomes.
pub async fn run<V, G, P>(
    kind: ActionKind,
    settings: &Settings,
    vcs: &V,
    gateway: &G,
    prompter: &mut P,
    limit: Duration,
) -> Result<RunOutcome, PipelineError>
where
    V: Vcs + ?Sized,
    G: CompletionGateway + ?Sized,
    P: Prompter + ?Sized,
{
    let diff = collect(vcs)?;
    let spec = settings.prompt_spec(kind)?;
    debug!("Prompt locale {}, budget {}", spec.locale, spec.max_length);
    let prompt = build(&spec, &diff)?;

    let raw = complete_with_timeout(gateway, &prompt, limit).await?;
    let message = validate(&raw, kind, spec.max_length)?;

    let outcome = prompter
        .confirm(kind, message.as_str())
        .map_err(PipelineError::Confirmation)?;
    info!("Operator chose {:?} for {}", outcome, kind);

    let applied = apply(vcs, outcome, message.as_str(), kind)?;
    prompter.finish(kind, outcome);

    Ok(RunOutcome {
        kind,
        message,
        outcome,
        applied,
    })
}
