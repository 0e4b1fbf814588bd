use crate::food::FoodLog;
use crate::models::{Sample, Workout};
use crate::storage::KeyValueStore;
use crate::store::{Statistics, WeightStore};
use crate::workout::WorkoutLog;
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

const WEEK_COUNT: usize = 4;

#[derive(Debug, Serialize)]
pub struct DailyPoint {
    pub date: String,
    pub calories_in: u32,
    pub calories_burned: u32,
    pub workout_minutes: u32,
    pub net: i64,
}

#[derive(Debug, Serialize)]
pub struct WeeklyPoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub workouts: usize,
    pub workout_minutes: u32,
    pub calories_burned: u32,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub last_7_days: Vec<DailyPoint>,
    pub weekly_totals: Vec<WeeklyPoint>,
    pub latest_weight: Option<Sample>,
    pub weight: Statistics,
}

pub fn build_dashboard<S: KeyValueStore>(
    weights: &WeightStore<S>,
    food: &FoodLog<S>,
    workouts: &WorkoutLog<S>,
) -> DashboardResponse {
    build_dashboard_at(Local::now().date_naive(), weights, food, workouts)
}

pub fn build_dashboard_at<S: KeyValueStore>(
    today: NaiveDate,
    weights: &WeightStore<S>,
    food: &FoodLog<S>,
    workouts: &WorkoutLog<S>,
) -> DashboardResponse {
    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let calories_in = food.total_calories(date);
        let (calories_burned, workout_minutes) = burned_on(workouts.all(), date, date);
        last_7_days.push(DailyPoint {
            date: date.to_string(),
            calories_in,
            calories_burned,
            workout_minutes,
            net: i64::from(calories_in) - i64::from(calories_burned),
        });
    }

    let current_week_start = week_start(today);
    let mut weekly_totals = Vec::with_capacity(WEEK_COUNT);
    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);
        let (calories_burned, workout_minutes) = burned_on(workouts.all(), start, end);

        weekly_totals.push(WeeklyPoint {
            week: week_label(start),
            start_date: start.to_string(),
            end_date: end.to_string(),
            workouts: workouts
                .all()
                .iter()
                .filter(|w| w.date >= start && w.date <= end)
                .count(),
            workout_minutes,
            calories_burned,
        });
    }

    DashboardResponse {
        last_7_days,
        weekly_totals,
        latest_weight: weights.latest(),
        weight: weights.statistics(),
    }
}

/// (calories burned, minutes) over the inclusive range.
fn burned_on(workouts: &[Workout], start: NaiveDate, end: NaiveDate) -> (u32, u32) {
    workouts
        .iter()
        .filter(|w| w.date >= start && w.date <= end)
        .fold((0u32, 0u32), |(calories, minutes), w| {
            (
                calories.saturating_add(w.calories),
                minutes.saturating_add(w.duration_minutes),
            )
        })
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
