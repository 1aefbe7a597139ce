//! Trait seam between the retry layer and the HTTP backend.

use async_trait::async_trait;

use crate::error::MealPlanError;

/// A provider that turns one prompt into one generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends a single generation request for `prompt`.
    ///
    /// # Returns
    ///
    /// The generated text or an error
    async fn generate(&self, prompt: &str) -> Result<String, MealPlanError>;
}
