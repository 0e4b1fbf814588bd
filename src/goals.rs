use crate::errors::ValidationError;
use crate::models::{parse_count, parse_positive, FieldValue};
use serde::{Deserialize, Serialize};

/// Daily intake before the activity adjustment is applied.
pub const BASE_CALORIES: i32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Very,
    Extra,
}

impl ActivityLevel {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim() {
            "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "very" => Ok(Self::Very),
            "extra" => Ok(Self::Extra),
            "" => Err(ValidationError::MissingFields),
            other => Err(ValidationError::UnknownKind {
                what: "activity level",
                value: other.to_string(),
            }),
        }
    }

    pub fn calorie_adjustment(self) -> i32 {
        match self {
            Self::Sedentary => -500,
            Self::Light => -400,
            Self::Moderate => -300,
            Self::Very => -200,
            Self::Extra => -100,
        }
    }

    pub fn exercise_recommendation(self) -> &'static str {
        match self {
            Self::Sedentary => "30 minutes of light exercise 3 times per week",
            Self::Light => "45 minutes of moderate exercise 3-4 times per week",
            Self::Moderate => "1 hour of exercise 4-5 times per week",
            Self::Very => "1 hour of intense exercise 6 times per week",
            Self::Extra => "1-2 hours of intense exercise 6 times per week",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalForm {
    #[serde(default)]
    pub current_weight: Option<FieldValue>,
    #[serde(default)]
    pub target_weight: Option<FieldValue>,
    #[serde(default)]
    pub timeframe: Option<FieldValue>,
    #[serde(default)]
    pub activity_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalPlan {
    pub current_weight: f64,
    pub target_weight: f64,
    pub weight_to_lose: f64,
    pub weekly_target: f64,
    pub daily_calories: i32,
    pub exercise_recommendation: &'static str,
}

pub fn plan(form: &GoalForm) -> Result<GoalPlan, ValidationError> {
    let current_weight = parse_positive(form.current_weight.as_ref(), "current weight")?;
    let target_weight = parse_positive(form.target_weight.as_ref(), "target weight")?;
    let weeks = match parse_count(form.timeframe.as_ref(), "timeframe") {
        Ok(weeks) => weeks,
        Err(ValidationError::InvalidNumber { .. }) => return Err(ValidationError::InvalidTimeframe),
        Err(other) => return Err(other),
    };
    let level = match form.activity_level.as_deref() {
        Some(level) => ActivityLevel::parse(level)?,
        None => return Err(ValidationError::MissingFields),
    };

    let weight_to_lose = current_weight - target_weight;
    Ok(GoalPlan {
        current_weight,
        target_weight,
        weight_to_lose,
        weekly_target: weight_to_lose / f64::from(weeks),
        daily_calories: BASE_CALORIES + level.calorie_adjustment(),
        exercise_recommendation: level.exercise_recommendation(),
    })
}
