use crate::chart::{CalorieChart, SvgSurface, Tooltip, WeightChart};
use crate::config::clamp_width;
use crate::errors::{AppError, ValidationError};
use crate::faq::{search, FaqAccordion, FaqItem};
use crate::food::FoodDay;
use crate::goals::{plan, GoalForm, GoalPlan};
use crate::models::{
    FoodForm, ListQuery, Mutation, PointerQuery, Workout, WorkoutForm, WorkoutKind, WeightForm,
    WeightsResponse,
};
use crate::notify::Notification;
use crate::state::AppState;
use crate::stats::{build_dashboard, DashboardResponse};
use crate::storage::KeyValueStore;
use crate::store::{SortColumn, Statistics, WeightStore};
use crate::ui::render_weight_page;
use crate::workout::{suggestions, Suggestion, CHART_WINDOW};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

const WORKOUT_CHART_HEIGHT: f64 = 320.0;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let width = state.chart_width;
    state
        .run(move |tracker| {
            let chart = WeightChart::new(width);
            let mut surface = SvgSurface::new();
            chart.draw(&tracker.weights, &mut surface);

            Ok(Html(render_weight_page(
                &tracker.weights.listing(SortColumn::Date),
                &tracker.weights.statistics(),
                &surface.finish(),
            )))
        })
        .await
}

pub async fn list_weights(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<WeightsResponse>, AppError> {
    let Query(query) = query?;
    state
        .run(move |tracker| Ok(Json(weights_view(&tracker.weights, query.sort))))
        .await
}

pub async fn add_weight(
    State(state): State<AppState>,
    form: Result<Json<WeightForm>, JsonRejection>,
) -> Result<Json<Mutation<WeightsResponse>>, AppError> {
    let Json(form) = form?;
    state
        .run(move |tracker| {
            let sample = tracker.weights.submit(&form)?;
            info!("logged weight {} kg for {}", sample.weight, sample.date);

            Ok(Json(Mutation {
                notification: Notification::success("Entry added successfully"),
                body: weights_view(&tracker.weights, SortColumn::Date),
            }))
        })
        .await
}

pub async fn delete_weight(
    State(state): State<AppState>,
    index: Result<Path<usize>, PathRejection>,
) -> Result<Json<Mutation<WeightsResponse>>, AppError> {
    let Path(index) = index?;
    state
        .run(move |tracker| {
            let removed = tracker.weights.remove(index)?;
            info!("deleted weight entry for {}", removed.date);

            Ok(Json(Mutation {
                notification: Notification::success("Entry deleted"),
                body: weights_view(&tracker.weights, SortColumn::Date),
            }))
        })
        .await
}

pub async fn weight_stats(State(state): State<AppState>) -> Result<Json<Statistics>, AppError> {
    state
        .run(|tracker| Ok(Json(tracker.weights.statistics())))
        .await
}

pub async fn weight_hover(
    State(state): State<AppState>,
    pointer: Result<Query<PointerQuery>, QueryRejection>,
) -> Result<Json<Option<Tooltip>>, AppError> {
    let Query(pointer) = pointer?;
    let (Some(x), Some(y)) = (pointer.x, pointer.y) else {
        return Err(ValidationError::MissingFields.into());
    };
    let width = clamp_width(pointer.width, state.chart_width);
    state
        .run(move |tracker| {
            let mut chart = WeightChart::new(width);
            Ok(Json(chart.pointer_move(&tracker.weights, x, y)))
        })
        .await
}

/// The weight chart as SVG, with the marker under the pointer enlarged.
pub async fn weight_chart(
    State(state): State<AppState>,
    pointer: Result<Query<PointerQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(pointer) = pointer?;
    let width = clamp_width(pointer.width, state.chart_width);
    state
        .run(move |tracker| {
            let mut chart = WeightChart::new(width);
            if let (Some(x), Some(y)) = (pointer.x, pointer.y) {
                chart.pointer_move(&tracker.weights, x, y);
            }

            let mut surface = SvgSurface::new();
            chart.draw(&tracker.weights, &mut surface);
            Ok(svg_response(surface.finish()))
        })
        .await
}

pub async fn list_food(State(state): State<AppState>) -> Result<Json<FoodDay>, AppError> {
    state
        .run(|tracker| Ok(Json(tracker.food.day(Local::now().date_naive()))))
        .await
}

pub async fn add_food(
    State(state): State<AppState>,
    form: Result<Json<FoodForm>, JsonRejection>,
) -> Result<Json<Mutation<FoodDay>>, AppError> {
    let Json(form) = form?;
    state
        .run(move |tracker| {
            let entry = tracker.food.submit(&form)?;
            info!("logged {} ({} kcal)", entry.name, entry.calories);

            Ok(Json(Mutation {
                notification: Notification::success("Food added successfully"),
                body: tracker.food.day(entry.timestamp.date_naive()),
            }))
        })
        .await
}

pub async fn delete_food(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Mutation<FoodDay>>, AppError> {
    let Path(id) = id?;
    state
        .run(move |tracker| {
            tracker.food.remove(id)?;

            Ok(Json(Mutation {
                notification: Notification::success("Food entry deleted"),
                body: tracker.food.day(Local::now().date_naive()),
            }))
        })
        .await
}

#[derive(Debug, Serialize)]
pub struct WorkoutsResponse {
    pub workouts: Vec<Workout>,
}

pub async fn list_workouts(State(state): State<AppState>) -> Result<Json<WorkoutsResponse>, AppError> {
    state
        .run(|tracker| {
            Ok(Json(WorkoutsResponse {
                workouts: tracker.workouts.listing(),
            }))
        })
        .await
}

pub async fn add_workout(
    State(state): State<AppState>,
    form: Result<Json<WorkoutForm>, JsonRejection>,
) -> Result<Json<Mutation<WorkoutsResponse>>, AppError> {
    let Json(form) = form?;
    state
        .run(move |tracker| {
            let workout = tracker.workouts.submit(&form)?;
            info!("logged {} workout on {}", workout.kind, workout.date);

            Ok(Json(Mutation {
                notification: Notification::success("Workout added successfully!"),
                body: WorkoutsResponse {
                    workouts: tracker.workouts.listing(),
                },
            }))
        })
        .await
}

pub async fn delete_workout(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Mutation<WorkoutsResponse>>, AppError> {
    let Path(id) = id?;
    state
        .run(move |tracker| {
            tracker.workouts.remove(id)?;

            Ok(Json(Mutation {
                notification: Notification::success("Workout deleted successfully!"),
                body: WorkoutsResponse {
                    workouts: tracker.workouts.listing(),
                },
            }))
        })
        .await
}

pub async fn workout_suggestions(
    kind: Result<Path<String>, PathRejection>,
) -> Result<Json<&'static [Suggestion]>, AppError> {
    let Path(kind) = kind?;
    let kind = WorkoutKind::parse(&kind)?;
    Ok(Json(suggestions(kind)))
}

pub async fn workout_chart(
    State(state): State<AppState>,
    pointer: Result<Query<PointerQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(pointer) = pointer?;
    let chart = CalorieChart::new(
        clamp_width(pointer.width, state.chart_width),
        WORKOUT_CHART_HEIGHT,
    );
    let recent = state
        .run(|tracker| Ok(tracker.workouts.recent(CHART_WINDOW)))
        .await?;

    let mut surface = SvgSurface::new();
    chart.draw(&recent, &mut surface);
    Ok(svg_response(surface.finish()))
}

pub async fn plan_goals(
    form: Result<Json<GoalForm>, JsonRejection>,
) -> Result<Json<GoalPlan>, AppError> {
    let Json(form) = form?;
    Ok(Json(plan(&form)?))
}

#[derive(Debug, Default, Deserialize)]
pub struct FaqQuery {
    pub q: Option<String>,
    pub open: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct FaqView {
    pub index: usize,
    pub open: bool,
    #[serde(flatten)]
    pub item: FaqItem,
}

pub async fn faq(
    query: Result<Query<FaqQuery>, QueryRejection>,
) -> Result<Json<Vec<FaqView>>, AppError> {
    let Query(query) = query?;
    let mut accordion = FaqAccordion::default();
    if let Some(index) = query.open {
        accordion.toggle(index);
    }

    let items = search(query.q.as_deref().unwrap_or_default())
        .into_iter()
        .map(|(index, item)| FaqView {
            index,
            open: accordion.open_item() == Some(index),
            item,
        })
        .collect();
    Ok(Json(items))
}

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, AppError> {
    state
        .run(|tracker| {
            Ok(Json(build_dashboard(
                &tracker.weights,
                &tracker.food,
                &tracker.workouts,
            )))
        })
        .await
}

fn weights_view<S: KeyValueStore>(weights: &WeightStore<S>, sort: SortColumn) -> WeightsResponse {
    WeightsResponse {
        entries: weights.listing(sort),
        stats: weights.statistics(),
    }
}

fn svg_response(svg: String) -> Response {
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response()
}
