use crate::catalog::Catalog;
use crate::errors::AppError;
use crate::models::{ClearedResponse, Entry, HabitsUpdate, NewEntry, Summary, SummaryQuery};
use crate::reflection::TimeWindow;
use crate::session::UserId;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};

pub async fn get_catalog(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.journal.catalog().clone())
}

pub async fn list_entries(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<Vec<Entry>>, AppError> {
    Ok(Json(state.journal.entries(user.as_str()).await?))
}

pub async fn create_entry(
    State(state): State<AppState>,
    user: UserId,
    Json(payload): Json<NewEntry>,
) -> Result<(StatusCode, Json<Entry>), AppError> {
    let entry = state.journal.add_entry(user.as_str(), payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_habits(
    State(state): State<AppState>,
    user: UserId,
    Path(day): Path<String>,
    Json(payload): Json<HabitsUpdate>,
) -> Result<Json<Entry>, AppError> {
    let day = parse_day(&day)?;
    let entry = state
        .journal
        .update_habits(user.as_str(), day, payload.habit_ids)
        .await?;
    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    user: UserId,
    Path(day): Path<String>,
) -> Result<Json<Entry>, AppError> {
    let day = parse_day(&day)?;
    Ok(Json(state.journal.remove_entry(user.as_str(), day).await?))
}

pub async fn clear_entries(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<ClearedResponse>, AppError> {
    let removed = state.journal.clear(user.as_str()).await?;
    Ok(Json(ClearedResponse { removed }))
}

pub async fn reset_samples(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<Vec<Entry>>, AppError> {
    let entries = state
        .journal
        .reset_with_samples(user.as_str(), Utc::now())
        .await?;
    Ok(Json(entries))
}

pub async fn get_summary(
    State(state): State<AppState>,
    user: UserId,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Summary>, AppError> {
    let window = match query.window.as_deref() {
        Some(raw) => raw.parse::<TimeWindow>()?,
        None => TimeWindow::default(),
    };
    Ok(Json(state.journal.summary(user.as_str(), window).await?))
}

fn parse_day(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(format!("'{raw}' is not a YYYY-MM-DD day")))
}
