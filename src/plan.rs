//! Meal plan data model and table flattening.
//!
//! The model mirrors the JSON shape requested from the API: an ordered
//! sequence of day entries, each carrying either the three fixed meal slots
//! (breakfast/lunch/dinner) or an ordered list of meal entries. No local
//! validation or repair is performed beyond deserialization; schema
//! conformance is delegated to the model via the response schema.

use serde::{Deserialize, Serialize};

/// A single meal: name, ingredient list and calorie count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    /// Display name of the dish
    pub meal_name: String,
    /// Ordered list of ingredients
    pub ingredients: Vec<String>,
    /// Calorie count for this meal
    pub calories: u32,
}

/// A meal entry in the free-form day shape, optionally labeled with a slot
/// name ("Breakfast", "Snack", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(flatten)]
    pub meal: Meal,
}

/// One day of the plan.
///
/// The API is asked for the fixed three-slot shape, but some models answer
/// with a `meals` array instead; both are accepted and flattened the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DayEntry {
    /// Fixed breakfast/lunch/dinner slots
    Slots {
        day: String,
        breakfast: Meal,
        lunch: Meal,
        dinner: Meal,
    },
    /// Ordered sequence of meal entries
    Meals { day: String, meals: Vec<MealEntry> },
}

impl DayEntry {
    /// Label of the day ("Monday", "Day 1", ...).
    pub fn day(&self) -> &str {
        match self {
            DayEntry::Slots { day, .. } => day,
            DayEntry::Meals { day, .. } => day,
        }
    }

    /// Total calories across the meals of this day, saturating on overflow
    /// since the counts are model-supplied.
    pub fn total_calories(&self) -> u32 {
        match self {
            DayEntry::Slots {
                breakfast,
                lunch,
                dinner,
                ..
            } => breakfast
                .calories
                .saturating_add(lunch.calories)
                .saturating_add(dinner.calories),
            DayEntry::Meals { meals, .. } => meals
                .iter()
                .fold(0u32, |acc, m| acc.saturating_add(m.meal.calories)),
        }
    }
}

/// A full generated plan: an ordered sequence of day entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealPlan {
    pub days: Vec<DayEntry>,
}

/// One row of the flattened table view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealRow {
    pub day: String,
    pub slot: String,
    pub name: String,
    /// Ingredients joined with ", "
    pub ingredients: String,
    pub calories: u32,
}

impl MealRow {
    fn new(day: &str, slot: impl Into<String>, meal: &Meal) -> Self {
        Self {
            day: day.to_string(),
            slot: slot.into(),
            name: meal.meal_name.clone(),
            ingredients: meal.ingredients.join(", "),
            calories: meal.calories,
        }
    }
}

/// Flattens the nested plan into table rows, preserving day and meal order.
pub fn flatten(plan: &MealPlan) -> Vec<MealRow> {
    let mut rows = Vec::new();
    for entry in &plan.days {
        match entry {
            DayEntry::Slots {
                day,
                breakfast,
                lunch,
                dinner,
            } => {
                rows.push(MealRow::new(day, "Breakfast", breakfast));
                rows.push(MealRow::new(day, "Lunch", lunch));
                rows.push(MealRow::new(day, "Dinner", dinner));
            }
            DayEntry::Meals { day, meals } => {
                for (i, m) in meals.iter().enumerate() {
                    let slot = m.slot.clone().unwrap_or_else(|| format!("Meal {}", i + 1));
                    rows.push(MealRow::new(day, slot, &m.meal));
                }
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(name: &str, calories: u32) -> Meal {
        Meal {
            meal_name: name.to_string(),
            ingredients: vec!["oats".to_string(), "milk".to_string()],
            calories,
        }
    }

    #[test]
    fn parses_fixed_slot_day() {
        let json = r#"[{
            "day": "Monday",
            "breakfast": {"mealName": "Porridge", "ingredients": ["oats", "milk"], "calories": 350},
            "lunch": {"mealName": "Lentil soup", "ingredients": ["lentils"], "calories": 550},
            "dinner": {"mealName": "Grilled salmon", "ingredients": ["salmon", "rice"], "calories": 700}
        }]"#;
        let plan: MealPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.days.len(), 1);
        assert_eq!(plan.days[0].day(), "Monday");
        assert_eq!(plan.days[0].total_calories(), 1600);
    }

    #[test]
    fn parses_meal_sequence_day() {
        let json = r#"[{
            "day": "Tuesday",
            "meals": [
                {"slot": "Brunch", "mealName": "Shakshuka", "ingredients": ["eggs", "tomato"], "calories": 500},
                {"mealName": "Chicken salad", "ingredients": ["chicken"], "calories": 600}
            ]
        }]"#;
        let plan: MealPlan = serde_json::from_str(json).unwrap();
        let rows = flatten(&plan);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].slot, "Brunch");
        assert_eq!(rows[1].slot, "Meal 2");
        assert_eq!(rows[1].ingredients, "chicken");
    }

    #[test]
    fn total_calories_saturates_on_absurd_counts() {
        let slots = DayEntry::Slots {
            day: "Monday".to_string(),
            breakfast: meal("Porridge", u32::MAX),
            lunch: meal("Soup", u32::MAX),
            dinner: meal("Stir fry", 700),
        };
        assert_eq!(slots.total_calories(), u32::MAX);

        let meals = DayEntry::Meals {
            day: "Tuesday".to_string(),
            meals: vec![
                MealEntry {
                    slot: None,
                    meal: meal("Feast", u32::MAX),
                },
                MealEntry {
                    slot: None,
                    meal: meal("Second feast", u32::MAX),
                },
            ],
        };
        assert_eq!(meals.total_calories(), u32::MAX);
    }

    #[test]
    fn flatten_preserves_day_and_slot_order() {
        let plan = MealPlan {
            days: vec![
                DayEntry::Slots {
                    day: "Monday".to_string(),
                    breakfast: meal("Porridge", 300),
                    lunch: meal("Soup", 500),
                    dinner: meal("Stir fry", 700),
                },
                DayEntry::Slots {
                    day: "Tuesday".to_string(),
                    breakfast: meal("Yogurt", 250),
                    lunch: meal("Wrap", 550),
                    dinner: meal("Curry", 750),
                },
            ],
        };
        let rows = flatten(&plan);
        let labels: Vec<_> = rows
            .iter()
            .map(|r| format!("{} {}", r.day, r.slot))
            .collect();
        assert_eq!(
            labels,
            [
                "Monday Breakfast",
                "Monday Lunch",
                "Monday Dinner",
                "Tuesday Breakfast",
                "Tuesday Lunch",
                "Tuesday Dinner",
            ]
        );
    }

    #[test]
    fn joins_ingredients_with_comma() {
        let rows = flatten(&MealPlan {
            days: vec![DayEntry::Slots {
                day: "Monday".to_string(),
                breakfast: meal("Porridge", 300),
                lunch: meal("Soup", 500),
                dinner: meal("Stir fry", 700),
            }],
        });
        assert_eq!(rows[0].ingredients, "oats, milk");
    }
}
