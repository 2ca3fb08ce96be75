//! Completion service seam and the timeout wrapper around it.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::CompletionError;
use crate::prompt::RenderedPrompt;

/// Default ceiling for one completion request (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable to override the default timeout.
const TIMEOUT_ENV_VAR: &str = "COMBO_COMPLETION_TIMEOUT";

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    /// Number of candidates requested.
    pub n: u8,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    /// Low randomness, a single candidate, 200 tokens.
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 1.0,
            n: 1,
            max_tokens: 200,
        }
    }
}

/// A text-generation backend.
///
/// Implementations return every candidate the service produced, in order.
/// Choosing among them is left to [`complete_with_timeout`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(
        &self,
        prompt: &RenderedPrompt,
        params: &GenerationParams,
    ) -> Result<Vec<String>, CompletionError>;
}

/// Get the configured timeout duration.
///
/// Reads `COMBO_COMPLETION_TIMEOUT` (seconds) if set, otherwise 30 seconds.
pub fn completion_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

/// Run one request bounded by `limit` and return the first usable candidate.
///
/// A candidate is usable when it is non-empty after trimming. Zero usable
/// candidates is [`CompletionError::EmptyResponse`]; hitting the limit is
/// [`CompletionError::Timeout`]. There is no retry.
pub async fn complete_with_timeout<G: CompletionGateway + ?Sized>(
    gateway: &G,
    prompt: &RenderedPrompt,
    limit: Duration,
) -> Result<String, CompletionError> {
    let params = GenerationParams::default();
    debug!(
        "Requesting completion: system prompt {} chars, diff {} bytes, {:?}",
        prompt.system.chars().count(),
        prompt.user.len(),
        params
    );

    let candidates = timeout(limit, gateway.complete(prompt, &params))
        .await
        .map_err(|_| {
            warn!("Completion request exceeded {}s", limit.as_secs());
            CompletionError::Timeout(limit.as_secs())
        })??;

    debug!("Completion returned {} candidate(s)", candidates.len());
    candidates
        .into_iter()
        .find(|c| !c.trim().is_empty())
        .ok_or(CompletionError::EmptyResponse)
}
