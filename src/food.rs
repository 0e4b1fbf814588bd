use crate::errors::{StoreError, ValidationError};
use crate::models::{parse_count, required_text, FoodEntry, FoodForm};
use crate::storage::{load_collection, persist_collection, KeyValueStore};
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

pub const FOOD_KEY: &str = "foodEntries";

#[derive(Debug, Clone, Serialize)]
pub struct FoodDay {
    pub date: NaiveDate,
    pub total_calories: u32,
    pub entries: Vec<FoodEntry>,
}

/// Food eaten, with calories, written through to a [`KeyValueStore`].
#[derive(Debug)]
pub struct FoodLog<S> {
    backend: S,
    entries: Vec<FoodEntry>,
}

impl<S: KeyValueStore> FoodLog<S> {
    pub fn open(mut backend: S) -> Self {
        let entries = load_collection(&mut backend, FOOD_KEY);
        Self { backend, entries }
    }

    pub fn entries(&self) -> &[FoodEntry] {
        &self.entries
    }

    pub fn submit(&mut self, form: &FoodForm) -> Result<FoodEntry, StoreError> {
        self.submit_at(form, Local::now())
    }

    pub fn submit_at(&mut self, form: &FoodForm, now: DateTime<Local>) -> Result<FoodEntry, StoreError> {
        let name = required_text(form.name.as_deref())?;
        let calories = parse_count(form.calories.as_ref(), "calories")?;
        self.add_at(name, calories, now)
    }

    pub fn add_at(&mut self, name: &str, calories: u32, now: DateTime<Local>) -> Result<FoodEntry, StoreError> {
        let name = required_text(Some(name))?;
        if calories == 0 {
            return Err(ValidationError::InvalidNumber { field: "calories" }.into());
        }

        let entry = FoodEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            calories,
            timestamp: now,
        };
        self.entries.push(entry.clone());
        if let Err(err) = self.persist() {
            self.entries.pop();
            return Err(err);
        }
        Ok(entry)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<FoodEntry, StoreError> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| ValidationError::NotFound {
                what: "food entry",
                id: id.to_string(),
            })?;

        let removed = self.entries.remove(position);
        if let Err(err) = self.persist() {
            self.entries.insert(position, removed);
            return Err(err);
        }
        Ok(removed)
    }

    /// Entries logged on `date` (local time), in the order they were added.
    pub fn on(&self, date: NaiveDate) -> Vec<FoodEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.timestamp.date_naive() == date)
            .cloned()
            .collect()
    }

    pub fn total_calories(&self, date: NaiveDate) -> u32 {
        self.entries
            .iter()
            .filter(|entry| entry.timestamp.date_naive() == date)
            .fold(0u32, |sum, entry| sum.saturating_add(entry.calories))
    }

    pub fn day(&self, date: NaiveDate) -> FoodDay {
        FoodDay {
            date,
            total_calories: self.total_calories(date),
            entries: self.on(date),
        }
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        persist_collection(&mut self.backend, FOOD_KEY, &self.entries)
    }
}
