//! Builder for configuring and instantiating the meal planner.
//!
//! Provides a fluent interface for setting the API key, model and generation
//! parameters, and assembles the retry-wrapped Gemini client behind a
//! [`MealPlanner`].

use crate::backends::gemini::Gemini;
use crate::error::MealPlanError;
use crate::generate::TextGenerator;
use crate::plan::MealPlan;
use crate::prompt::{response_schema, PlanRequest, SYSTEM_PROMPT};
use crate::resilient::{ResilienceConfig, ResilientGenerator};

/// Builder for configuring and instantiating a [`MealPlanner`].
///
/// # Example
/// ```no_run
/// use mealplan::planner::PlannerBuilder;
///
/// let planner = PlannerBuilder::new()
///     .api_key(std::env::var("GEMINI_API_KEY").unwrap_or_default())
///     .model("gemini-2.5-flash")
///     .temperature(0.7)
///     .build()
///     .expect("Failed to build planner");
/// ```
#[derive(Default)]
pub struct PlannerBuilder {
    /// API key for authentication
    api_key: Option<String>,
    /// Model identifier to use
    model: Option<String>,
    /// Base URL override for API requests
    base_url: Option<String>,
    /// Temperature parameter for controlling response randomness (0.0-1.0)
    temperature: Option<f32>,
    /// Maximum tokens to generate in responses
    max_tokens: Option<u32>,
    /// Request timeout duration in seconds
    timeout_seconds: Option<u64>,
    /// System instruction override
    system: Option<String>,
    /// Whether to wrap the client in the retry layer
    resilient: bool,
    /// Retry and backoff settings
    resilience: ResilienceConfig,
}

impl PlannerBuilder {
    /// Creates a new builder with retries enabled and default backoff.
    pub fn new() -> Self {
        Self {
            resilient: true,
            resilience: ResilienceConfig::defaults(),
            ..Self::default()
        }
    }

    /// Sets the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model identifier to use.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the base URL for API requests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the temperature for controlling response randomness (0.0-1.0).
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the request timeout in seconds.
    pub fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Overrides the system instruction.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Enables or disables the retry layer.
    pub fn resilient(mut self, resilient: bool) -> Self {
        self.resilient = resilient;
        self
    }

    /// Sets the number of attempts (including the first one).
    pub fn resilient_attempts(mut self, attempts: usize) -> Self {
        self.resilience.max_attempts = attempts;
        self
    }

    /// Sets the initial and maximum backoff delays in milliseconds.
    pub fn resilient_backoff(mut self, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        self.resilience.base_delay_ms = base_delay_ms;
        self.resilience.max_delay_ms = max_delay_ms;
        self
    }

    /// Builds and returns a configured [`MealPlanner`].
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured.
    pub fn build(self) -> Result<MealPlanner, MealPlanError> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| MealPlanError::AuthError("No API key provided".to_string()))?;

        let mut client = Gemini::new(
            api_key,
            self.model,
            response_schema(),
            Some(self.system.unwrap_or_else(|| SYSTEM_PROMPT.to_string())),
            self.temperature,
            self.max_tokens,
            self.timeout_seconds,
        );
        if let Some(base_url) = self.base_url {
            client = client.with_base_url(base_url);
        }

        let generator: Box<dyn TextGenerator> = if self.resilient {
            Box::new(ResilientGenerator::new(Box::new(client), self.resilience))
        } else {
            Box::new(client)
        };

        Ok(MealPlanner { generator })
    }
}

/// Generates structured meal plans from user requirements.
pub struct MealPlanner {
    generator: Box<dyn TextGenerator>,
}

impl std::fmt::Debug for MealPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MealPlanner").finish_non_exhaustive()
    }
}

impl MealPlanner {
    /// Generates a meal plan for the given requirements.
    ///
    /// Builds the prompt, issues one (retry-wrapped) generation request and
    /// parses the returned text as a [`MealPlan`]. Text that is not valid
    /// JSON for the plan shape is surfaced as a `JsonError` carrying the raw
    /// text, and is never retried.
    pub async fn generate_plan(&self, request: &PlanRequest) -> Result<MealPlan, MealPlanError> {
        let prompt = request.user_query();
        log::debug!("Generating plan for: {}", request.requirements_line());

        let text = self.generator.generate(&prompt).await?;

        let plan: MealPlan =
            serde_json::from_str(text.trim()).map_err(|e| MealPlanError::JsonError {
                message: format!("Model returned non-JSON data: {e}"),
                raw_text: text.clone(),
            })?;

        log::info!("Generated plan with {} day(s)", plan.days.len());
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_an_api_key() {
        let err = PlannerBuilder::new().build().unwrap_err();
        assert!(matches!(err, MealPlanError::AuthError(_)));

        let err = PlannerBuilder::new().api_key("").build().unwrap_err();
        assert!(matches!(err, MealPlanError::AuthError(_)));
    }

    #[test]
    fn build_accepts_full_configuration() {
        let planner = PlannerBuilder::new()
            .api_key("test-key")
            .model("gemini-2.5-flash")
            .temperature(0.7)
            .max_tokens(8192)
            .timeout_seconds(30)
            .resilient_attempts(3)
            .resilient_backoff(100, 1_000)
            .build();
        assert!(planner.is_ok());
    }
}
