//! Request builder: user requirements, system instruction and response schema.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// System instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "\
You are an expert nutritionist and meal planner. Your sole task is to generate a comprehensive 7-day meal plan based on the user's specific dietary requirements.

RULES:
1. The response MUST be a JSON array that strictly adheres to the provided JSON schema.
2. The total calories for the 7-day plan must meet the user's daily target as closely as possible, spread across the three meals.
3. Every ingredient must be simple and easily available.
4. DO NOT include any text or markdown outside of the JSON structure.
";

/// User-entered dietary requirements collected by the clients.
///
/// The CLI collects diet/calories/preferences; the web form additionally
/// offers cuisine and allergen fields. All of them fold into one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Diet type, e.g. "Keto", "Vegan", "Balanced"
    pub diet: String,
    /// Daily calorie target
    pub daily_calories: u32,
    /// Free-text preferences and dislikes
    #[serde(default)]
    pub preferences: Option<String>,
    /// Preferred cuisine, e.g. "Mediterranean"
    #[serde(default)]
    pub cuisine: Option<String>,
    /// Ingredients to exclude entirely
    #[serde(default)]
    pub allergens: Vec<String>,
}

impl PlanRequest {
    /// Composes the natural-language requirements line embedded in the prompt.
    pub fn requirements_line(&self) -> String {
        let mut line = format!(
            "Diet: {}. Daily Calorie Target: {}.",
            self.diet, self.daily_calories
        );
        if let Some(cuisine) = self.cuisine.as_deref().filter(|c| !c.trim().is_empty()) {
            line.push_str(&format!(" Cuisine: {}.", cuisine.trim()));
        }
        if !self.allergens.is_empty() {
            line.push_str(&format!(" Allergens to avoid: {}.", self.allergens.join(", ")));
        }
        if let Some(prefs) = self.preferences.as_deref().filter(|p| !p.trim().is_empty()) {
            line.push_str(&format!(" Preferences: {}.", prefs.trim()));
        }
        line
    }

    /// The full user prompt for one generation request.
    pub fn user_query(&self) -> String {
        format!(
            "Generate a 7-day meal plan for a diet of: {}",
            self.requirements_line()
        )
    }
}

/// JSON schema for one meal object.
fn meal_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "mealName": {"type": "STRING"},
            "ingredients": {"type": "ARRAY", "items": {"type": "STRING"}},
            "calories": {"type": "INTEGER"}
        },
        "propertyOrdering": ["mealName", "ingredients", "calories"]
    })
}

/// The response schema attached to every request.
///
/// An array of day objects with fixed breakfast/lunch/dinner slots. The
/// `propertyOrdering` keys are Gemini-specific and keep the generated keys in
/// a stable order.
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "day": {"type": "STRING"},
                "breakfast": meal_schema(),
                "lunch": meal_schema(),
                "dinner": meal_schema(),
            },
            "propertyOrdering": ["day", "breakfast", "lunch", "dinner"]
        }
    })
}
