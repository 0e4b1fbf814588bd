use crate::errors::ValidationError;
use crate::notify::Notification;
use crate::store::{SortColumn, Statistics, WeightRow};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One weight measurement in kg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub date: NaiveDate,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: Uuid,
    pub name: String,
    pub calories: u32,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Cardio,
    Strength,
    Flexibility,
    Hiit,
}

impl WorkoutKind {
    pub const ALL: [WorkoutKind; 4] = [
        WorkoutKind::Cardio,
        WorkoutKind::Strength,
        WorkoutKind::Flexibility,
        WorkoutKind::Hiit,
    ];

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cardio" => Ok(Self::Cardio),
            "strength" => Ok(Self::Strength),
            "flexibility" => Ok(Self::Flexibility),
            "hiit" => Ok(Self::Hiit),
            "" => Err(ValidationError::MissingFields),
            other => Err(ValidationError::UnknownKind {
                what: "workout type",
                value: other.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cardio => "cardio",
            Self::Strength => "strength",
            Self::Flexibility => "flexibility",
            Self::Hiit => "hiit",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub date: NaiveDate,
    pub kind: WorkoutKind,
    pub duration_minutes: u32,
    pub calories: u32,
    #[serde(default)]
    pub notes: String,
}

/// A form field that may arrive as a JSON number or as the raw input string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeightForm {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub weight: Option<FieldValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoodForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub calories: Option<FieldValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutForm {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub duration: Option<FieldValue>,
    #[serde(default)]
    pub calories: Option<FieldValue>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub fn required_text(value: Option<&str>) -> Result<&str, ValidationError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ValidationError::MissingFields),
    }
}

pub fn parse_date(value: Option<&str>) -> Result<NaiveDate, ValidationError> {
    let text = required_text(value)?;
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(text.to_string()))
}

/// Parses a strictly positive, finite number.
pub fn parse_positive(value: Option<&FieldValue>, field: &'static str) -> Result<f64, ValidationError> {
    let number = match value {
        None => return Err(ValidationError::MissingFields),
        Some(FieldValue::Number(number)) => *number,
        Some(FieldValue::Text(text)) => {
            let text = required_text(Some(text.as_str()))?;
            text.parse::<f64>()
                .map_err(|_| ValidationError::InvalidNumber { field })?
        }
    };

    if number.is_finite() && number > 0.0 {
        Ok(number)
    } else {
        Err(ValidationError::InvalidNumber { field })
    }
}

/// Parses a strictly positive whole number.
pub fn parse_count(value: Option<&FieldValue>, field: &'static str) -> Result<u32, ValidationError> {
    let number = parse_positive(value, field)?;
    if number.fract() != 0.0 || number > f64::from(u32::MAX) {
        return Err(ValidationError::InvalidNumber { field });
    }
    Ok(number as u32)
}

/// `Oct 19, 2026`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `10/19/2026`
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

#[derive(Debug, Serialize)]
pub struct WeightsResponse {
    pub entries: Vec<WeightRow>,
    pub stats: Statistics,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub sort: SortColumn,
}

/// Pointer position relative to the canvas, plus the canvas width.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PointerQuery {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
}

/// A successful command together with the refreshed view.
#[derive(Debug, Serialize)]
pub struct Mutation<T: Serialize> {
    pub notification: Notification,
    #[serde(flatten)]
    pub body: T,
}
