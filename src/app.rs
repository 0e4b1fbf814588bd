use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/weights", get(handlers::list_weights).post(handlers::add_weight))
        .route("/api/weights/:index", delete(handlers::delete_weight))
        .route("/api/weights/stats", get(handlers::weight_stats))
        .route("/api/weights/hover", get(handlers::weight_hover))
        .route("/api/weights/chart.svg", get(handlers::weight_chart))
        .route("/api/food", get(handlers::list_food).post(handlers::add_food))
        .route("/api/food/:id", delete(handlers::delete_food))
        .route("/api/workouts", get(handlers::list_workouts).post(handlers::add_workout))
        .route("/api/workouts/:id", delete(handlers::delete_workout))
        .route("/api/workouts/suggestions/:kind", get(handlers::workout_suggestions))
        .route("/api/workouts/chart.svg", get(handlers::workout_chart))
        .route("/api/goals", post(handlers::plan_goals))
        .route("/api/faq", get(handlers::faq))
        .route("/api/dashboard", get(handlers::dashboard))
        .with_state(state)
}
