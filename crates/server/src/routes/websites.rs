use super::AppState;
use crate::error::{ApiError, LIST_FAILED, LOOKUP_FAILED};
use axum::Json;
use axum::extract::{Path, State};
use radar_core::Website;

pub async fn list_websites(State(state): State<AppState>) -> Result<Json<Vec<Website>>, ApiError> {
    state
        .service
        .list()
        .await
        .map(Json)
        .map_err(|e| ApiError::new(LIST_FAILED, e))
}

pub async fn get_website(
    State(state): State<AppState>, Path(hostname): Path<String>,
) -> Result<Json<Website>, ApiError> {
    state
        .service
        .get_by_hostname(&hostname)
        .await
        .map(Json)
        .map_err(|e| ApiError::new(LOOKUP_FAILED, e))
}
