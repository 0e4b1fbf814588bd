pub mod app;
pub mod chart;
pub mod config;
pub mod errors;
pub mod faq;
pub mod food;
pub mod goals;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod ui;
pub mod workout;

pub use app::router;
pub use config::Config;
pub use state::{AppState, Tracker};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::WeightStore;
