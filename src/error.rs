use std::fmt;

/// Error types that can occur when generating a meal plan.
#[derive(Debug)]
pub enum MealPlanError {
    /// HTTP transport errors (connection refused, timeout, etc.)
    HttpError(String),
    /// Authentication and authorization errors (bad or missing API key)
    AuthError(String),
    /// Invalid request parameters or a missing resource
    InvalidRequest(String),
    /// Server-side errors reported by the API (rate limit, 5xx)
    ProviderError(String),
    /// The response arrived but carried no usable generated text
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// The generated text is not valid JSON for the requested schema
    JsonError { message: String, raw_text: String },
    /// All retry attempts were exhausted
    RetryExceeded { attempts: usize, last_error: String },
}

impl fmt::Display for MealPlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealPlanError::HttpError(e) => write!(f, "HTTP Error: {e}"),
            MealPlanError::AuthError(e) => write!(f, "Auth Error: {e}"),
            MealPlanError::InvalidRequest(e) => write!(f, "Invalid Request: {e}"),
            MealPlanError::ProviderError(e) => write!(f, "Provider Error: {e}"),
            MealPlanError::ResponseFormatError { message, .. } => {
                write!(f, "Response Format Error: {message}")
            }
            MealPlanError::JsonError { message, .. } => {
                write!(f, "JSON Parse Error: {message}")
            }
            MealPlanError::RetryExceeded {
                attempts,
                last_error,
            } => {
                write!(
                    f,
                    "Retry limit reached after {attempts} attempts: {last_error}"
                )
            }
        }
    }
}

impl std::error::Error for MealPlanError {}

/// Converts reqwest HTTP errors into MealPlanErrors
impl From<reqwest::Error> for MealPlanError {
    fn from(err: reqwest::Error) -> Self {
        MealPlanError::HttpError(err.to_string())
    }
}
