//! mealplan generates structured 7-day meal plans with the Gemini API.
//!
//! # Overview
//! This crate turns user-entered dietary requirements into a prompt plus a
//! JSON response schema, sends one `generateContent` request to the Gemini
//! API (retried with exponential backoff on transient failures), and parses
//! the schema-enforced JSON answer into a typed meal plan that renders as a
//! table. It ships two thin clients over the same core: a one-shot CLI and a
//! small server-rendered web app.
//!
//! # Example
//! ```no_run
//! use mealplan::planner::PlannerBuilder;
//! use mealplan::prompt::PlanRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let planner = PlannerBuilder::new()
//!         .api_key(std::env::var("GEMINI_API_KEY").unwrap_or_default())
//!         .build()?;
//!
//!     let request = PlanRequest {
//!         diet: "Balanced".into(),
//!         daily_calories: 2000,
//!         preferences: Some("High protein, quick preparation".into()),
//!         ..Default::default()
//!     };
//!
//!     let plan = planner.generate_plan(&request).await?;
//!     println!("{}", mealplan::render::text_table(&mealplan::plan::flatten(&plan)));
//!     Ok(())
//! }
//! ```

/// Gemini backend implementation
pub mod backends;

/// Error types and handling
pub mod error;

/// Trait seam between retry layer and backend
pub mod generate;

/// Meal plan data model and flattening
pub mod plan;

/// Builder and plan generation orchestration
pub mod planner;

/// Prompt, requirements and response schema
pub mod prompt;

/// Table rendering (text and HTML)
pub mod render;

/// Retry wrapper with exponential backoff
pub mod resilient;

/// Secret store for the API key and default model
pub mod secret_store;

#[cfg(feature = "api")]
pub mod api;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
/// This is a no-op if the feature is not enabled.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
