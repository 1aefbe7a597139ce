use serde::{Deserialize, Serialize};

use crate::plan::{MealPlan, MealRow};
use crate::prompt::PlanRequest;

/// Form payload submitted by the plan page
#[derive(Debug, Deserialize)]
pub struct PlanForm {
    /// Diet type, e.g. "Keto", "Vegan"
    #[serde(default)]
    pub diet: String,
    /// Daily calorie target
    pub calories: u32,
    /// Free-text preferences and dislikes
    #[serde(default)]
    pub preferences: String,
    /// Preferred cuisine
    #[serde(default)]
    pub cuisine: String,
    /// Comma-separated allergen list
    #[serde(default)]
    pub allergens: String,
}

impl PlanForm {
    /// Converts the raw form fields into a plan request, dropping blanks and
    /// splitting the allergen list on commas.
    pub fn into_request(self) -> PlanRequest {
        let non_blank = |s: String| {
            let trimmed = s.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        };
        PlanRequest {
            diet: non_blank(self.diet).unwrap_or_else(|| "Balanced".to_string()),
            daily_calories: self.calories,
            preferences: non_blank(self.preferences),
            cuisine: non_blank(self.cuisine),
            allergens: self
                .allergens
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Response payload from the JSON plan endpoint
#[derive(Serialize)]
pub struct PlanResponse {
    /// The parsed plan as returned by the model
    pub plan: MealPlan,
    /// The plan flattened into table rows
    pub rows: Vec<MealRow>,
}
