use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single normalized food candidate returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSuggestion {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_per_100g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Provider that produced this entry, for attribution only
    pub source: String,
}

impl FoodSuggestion {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        FoodSuggestion {
            name: name.into(),
            calories_per_100g: None,
            image_url: None,
            source: source.into(),
        }
    }

    pub fn with_calories(mut self, calories: f64) -> Self {
        self.calories_per_100g = Some(calories);
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Key used for duplicate detection: trimmed and case-folded name.
    pub fn dedup_key(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// The nutrition APIs this crate knows how to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenFoodFacts,
    Usda,
    TheMealDb,
}

impl ProviderKind {
    /// Identifier used in configuration and in `FoodSuggestion::source`
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenFoodFacts => "openfoodfacts",
            ProviderKind::Usda => "usda",
            ProviderKind::TheMealDb => "themealdb",
        }
    }

    /// Default priority order used to resolve name collisions
    pub fn default_order() -> Vec<ProviderKind> {
        vec![
            ProviderKind::OpenFoodFacts,
            ProviderKind::Usda,
            ProviderKind::TheMealDb,
        ]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openfoodfacts" | "open_food_facts" => Ok(ProviderKind::OpenFoodFacts),
            "usda" => Ok(ProviderKind::Usda),
            "themealdb" | "the_meal_db" => Ok(ProviderKind::TheMealDb),
            other => Err(other.to_string()),
        }
    }
}

/// Meal slot a logged item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// A meal as handed to the meal log writer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    pub name: String,
    pub calories: u32,
    pub slot: MealSlot,
    /// Reference to an uploaded photo, if one was taken
    pub photo_ref: Option<String>,
    pub date: NaiveDate,
}

impl MealEntry {
    /// Prefill a meal from a picked suggestion, rounding its calories
    pub fn from_suggestion(suggestion: &FoodSuggestion, slot: MealSlot, date: NaiveDate) -> Self {
        MealEntry {
            name: suggestion.name.trim().to_string(),
            calories: suggestion
                .calories_per_100g
                .map(|c| c.round().max(0.0) as u32)
                .unwrap_or(0),
            slot,
            photo_ref: None,
            date,
        }
    }
}

/// Items logged for one day and slot, with their calorie sum
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DaySummary {
    pub entries: Vec<MealEntry>,
    pub total_calories: u32,
}

impl DaySummary {
    pub fn from_entries(entries: Vec<MealEntry>) -> Self {
        let total_calories = entries.iter().map(|e| e.calories).sum();
        DaySummary {
            entries,
            total_calories,
        }
    }
}

/// A chat message between a coach and a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub conversation_id: String,
    pub sender: String,
    pub recipient: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}
