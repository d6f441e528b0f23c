use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/catalog", get(handlers::get_catalog))
        .route(
            "/api/entries",
            get(handlers::list_entries)
                .post(handlers::create_entry)
                .delete(handlers::clear_entries),
        )
        .route("/api/entries/samples", post(handlers::reset_samples))
        .route("/api/entries/:day", delete(handlers::delete_entry))
        .route("/api/entries/:day/habits", put(handlers::update_habits))
        .route("/api/summary", get(handlers::get_summary))
        .with_state(state)
}
