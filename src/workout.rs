use crate::errors::{StoreError, ValidationError};
use crate::models::{parse_count, parse_date, Workout, WorkoutForm, WorkoutKind};
use crate::storage::{load_collection, persist_collection, KeyValueStore};
use serde::Serialize;
use uuid::Uuid;

pub const WORKOUT_KEY: &str = "workouts";
pub const CHART_WINDOW: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub name: &'static str,
    pub description: &'static str,
}

const fn suggestion(name: &'static str, description: &'static str) -> Suggestion {
    Suggestion { name, description }
}

const CARDIO: [Suggestion; 3] = [
    suggestion("Running", "30 minutes at moderate pace"),
    suggestion("Cycling", "45 minutes at varying intensity"),
    suggestion("Swimming", "30 minutes of laps"),
];

const STRENGTH: [Suggestion; 3] = [
    suggestion("Push-ups", "3 sets of 15 reps"),
    suggestion("Squats", "4 sets of 12 reps"),
    suggestion("Deadlifts", "3 sets of 10 reps"),
];

const FLEXIBILITY: [Suggestion; 3] = [
    suggestion("Yoga Flow", "20 minutes of basic poses"),
    suggestion("Static Stretching", "Hold each stretch for 30 seconds"),
    suggestion("Pilates", "30 minutes of core exercises"),
];

const HIIT: [Suggestion; 3] = [
    suggestion("Burpees", "30 seconds work, 15 seconds rest"),
    suggestion("Mountain Climbers", "45 seconds work, 15 seconds rest"),
    suggestion("Jump Rope", "1 minute work, 30 seconds rest"),
];

pub fn suggestions(kind: WorkoutKind) -> &'static [Suggestion] {
    match kind {
        WorkoutKind::Cardio => &CARDIO,
        WorkoutKind::Strength => &STRENGTH,
        WorkoutKind::Flexibility => &FLEXIBILITY,
        WorkoutKind::Hiit => &HIIT,
    }
}

#[derive(Debug)]
pub struct WorkoutLog<S> {
    backend: S,
    workouts: Vec<Workout>,
}

impl<S: KeyValueStore> WorkoutLog<S> {
    pub fn open(mut backend: S) -> Self {
        let workouts = load_collection(&mut backend, WORKOUT_KEY);
        Self { backend, workouts }
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn submit(&mut self, form: &WorkoutForm) -> Result<Workout, StoreError> {
        let date = parse_date(form.date.as_deref())?;
        let kind = match form.kind.as_deref() {
            Some(kind) => WorkoutKind::parse(kind)?,
            None => return Err(ValidationError::MissingFields.into()),
        };
        let duration_minutes = parse_count(form.duration.as_ref(), "duration")?;
        let calories = parse_count(form.calories.as_ref(), "calories")?;

        let workout = Workout {
            id: Uuid::new_v4(),
            date,
            kind,
            duration_minutes,
            calories,
            notes: form.notes.as_deref().unwrap_or_default().trim().to_string(),
        };
        self.add(workout.clone())?;
        Ok(workout)
    }

    pub fn add(&mut self, workout: Workout) -> Result<(), StoreError> {
        self.workouts.push(workout);
        if let Err(err) = self.persist() {
            self.workouts.pop();
            return Err(err);
        }
        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Workout, StoreError> {
        let position = self
            .workouts
            .iter()
            .position(|workout| workout.id == id)
            .ok_or_else(|| ValidationError::NotFound {
                what: "workout",
                id: id.to_string(),
            })?;

        let removed = self.workouts.remove(position);
        if let Err(err) = self.persist() {
            self.workouts.insert(position, removed);
            return Err(err);
        }
        Ok(removed)
    }

    /// Newest first.
    pub fn listing(&self) -> Vec<Workout> {
        let mut sorted = self.workouts.clone();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    /// The `count` most recent workouts, oldest first.
    pub fn recent(&self, count: usize) -> Vec<Workout> {
        let mut sorted = self.workouts.clone();
        sorted.sort_by_key(|workout| workout.date);
        let skip = sorted.len().saturating_sub(count);
        sorted.split_off(skip)
    }

    pub fn all(&self) -> &[Workout] {
        &self.workouts
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        persist_collection(&mut self.backend, WORKOUT_KEY, &self.workouts)
    }
}
