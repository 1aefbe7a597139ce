//! Resilience wrapper providing retry with exponential backoff.
//!
//! The wrapper retries transient failures (rate limits, server errors,
//! responses without usable content) with exponential backoff and
//! deterministic jitter. Permanent errors like bad credentials or malformed
//! model JSON are surfaced immediately.

use std::time::Duration;

use async_trait::async_trait;
// Deterministic jitter only; no RNG
use tokio::time::sleep;

use crate::error::MealPlanError;
use crate::generate::TextGenerator;

/// Configuration for retry and backoff behavior.
#[derive(Clone, Debug)]
pub struct ResilienceConfig {
    /// Maximum number of attempts including the first one
    pub max_attempts: usize,
    /// Initial backoff delay in milliseconds
    pub base_delay_ms: u64,
    /// Maximum backoff delay in milliseconds
    pub max_delay_ms: u64,
    /// Whether to subtract deterministic jitter from backoff delays
    pub jitter: bool,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ResilienceConfig {
    /// Creates a default configuration: three attempts, delays doubling from
    /// one second.
    pub fn defaults() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 8_000,
            jitter: true,
        }
    }
}

/// Computes the backoff delay in milliseconds for a given attempt index.
pub(crate) fn backoff_delay_ms(cfg: &ResilienceConfig, attempt_index: usize) -> u64 {
    let mut delay = cfg
        .base_delay_ms
        .saturating_mul(1u64 << attempt_index.min(16));
    delay = delay.min(cfg.max_delay_ms);
    if cfg.jitter {
        let span = (delay / 2).max(1);
        let jitter = ((attempt_index as u64)
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1))
            % span;
        delay = delay.saturating_sub(jitter);
    }
    delay
}

/// Whether a failed attempt is worth retrying.
///
/// `HttpError` covers transport failures only; HTTP statuses are classified
/// by the backend, and any status outside 429/5xx arrives here as a
/// non-retryable class.
fn is_retryable(err: &MealPlanError) -> bool {
    match err {
        MealPlanError::HttpError(_) => true,
        MealPlanError::ProviderError(_) => true,
        MealPlanError::ResponseFormatError { .. } => true,
        MealPlanError::JsonError { .. } => false,
        MealPlanError::RetryExceeded { .. } => false,
        MealPlanError::AuthError(_) => false,
        MealPlanError::InvalidRequest(_) => false,
    }
}

/// Retry wrapper around a [`TextGenerator`].
pub struct ResilientGenerator {
    inner: Box<dyn TextGenerator>,
    cfg: ResilienceConfig,
}

impl ResilientGenerator {
    /// Creates a new resilient wrapper around an existing generator.
    pub fn new(inner: Box<dyn TextGenerator>, cfg: ResilienceConfig) -> Self {
        Self { inner, cfg }
    }

    async fn backoff_sleep(&self, attempt_index: usize) {
        let delay = backoff_delay_ms(&self.cfg, attempt_index);
        log::warn!("Transient API failure, retrying in {delay} ms");
        sleep(Duration::from_millis(delay)).await;
    }
}

#[async_trait]
impl TextGenerator for ResilientGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, MealPlanError> {
        let mut attempts_left = self.cfg.max_attempts;
        let mut idx = 0usize;
        let mut last_err: Option<MealPlanError> = None;
        while attempts_left > 0 {
            match self.inner.generate(prompt).await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    if !is_retryable(&e) {
                        return Err(e);
                    }
                    if attempts_left == 1 {
                        return Err(MealPlanError::RetryExceeded {
                            attempts: self.cfg.max_attempts,
                            last_error: e.to_string(),
                        });
                    }
                    last_err = Some(e);
                    self.backoff_sleep(idx).await;
                    attempts_left -= 1;
                    idx += 1;
                }
            }
        }
        Err(MealPlanError::RetryExceeded {
            attempts: self.cfg.max_attempts,
            last_error: last_err.map(|e| e.to_string()).unwrap_or_default(),
        })
    }
}
