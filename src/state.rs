use crate::config::Config;
use crate::errors::AppError;
use crate::food::FoodLog;
use crate::storage::{FileStore, KeyValueStore};
use crate::store::WeightStore;
use crate::workout::WorkoutLog;
use std::sync::{Arc, Mutex};

/// Every log of one profile, sharing a single backing store.
#[derive(Debug)]
pub struct Tracker<S> {
    pub weights: WeightStore<S>,
    pub food: FoodLog<S>,
    pub workouts: WorkoutLog<S>,
}

impl<S: KeyValueStore + Clone> Tracker<S> {
    pub fn open(backend: S) -> Self {
        Self {
            weights: WeightStore::open(backend.clone()),
            food: FoodLog::open(backend.clone()),
            workouts: WorkoutLog::open(backend),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub chart_width: f64,
    tracker: Arc<Mutex<Tracker<FileStore>>>,
}

impl AppState {
    /// Loads every log from disk. Blocks; call it off the async runtime.
    pub fn new(config: &Config) -> Self {
        Self {
            chart_width: config.chart_width,
            tracker: Arc::new(Mutex::new(Tracker::open(FileStore::new(&config.data_dir)))),
        }
    }

    /// Runs `command` with exclusive access to the tracker on the blocking
    /// thread pool. Commands that mutate a log write to disk before returning.
    pub async fn run<T, F>(&self, command: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Tracker<FileStore>) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let tracker = Arc::clone(&self.tracker);
        tokio::task::spawn_blocking(move || {
            let mut tracker = tracker.lock().map_err(AppError::internal)?;
            command(&mut tracker)
        })
        .await
        .map_err(AppError::internal)?
    }
}
