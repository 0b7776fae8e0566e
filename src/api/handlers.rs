use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use serde::Serialize;
use std::sync::Arc;

use crate::model::{Record, RecordId, Save};
use crate::seed;
use crate::store::Store;

pub type AppState<S> = Arc<S>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// GET /{resource} - every row of the shape as a JSON array.
pub async fn list_records<S: Store, T: Record>(
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<T>>, (StatusCode, Json<ErrorResponse>)> {
    match store.list::<T>().await {
        Ok(records) => Ok(Json(records)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

/// POST /{resource} - insert the body as a new row. The response carries
/// the stored record including its assigned identifier; any identifier in
/// the body is ignored.
pub async fn create_record<S: Store, T: Record>(
    State(store): State<AppState<S>>,
    RequestJson(record): RequestJson<T>,
) -> Result<(StatusCode, Json<T>), (StatusCode, Json<ErrorResponse>)> {
    match store.save(Save::New(record)).await {
        Ok(Some(created)) => Ok((StatusCode::CREATED, Json(created))),
        Ok(None) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&format!(
                "insert into {} returned no row",
                T::TABLE
            ))),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

/// PUT /{resource}/{id} - overwrite the row with the path identifier. The
/// path identifier is authoritative; any identifier in the body is ignored.
pub async fn update_record<S: Store, T: Record>(
    State(store): State<AppState<S>>,
    Path(id): Path<RecordId>,
    RequestJson(record): RequestJson<T>,
) -> Result<Json<T>, (StatusCode, Json<ErrorResponse>)> {
    match store.save(Save::Existing(id, record)).await {
        Ok(Some(updated)) => Ok(Json(updated)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(&format!(
                "No row with id {} in {}",
                id,
                T::TABLE
            ))),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

/// DELETE /{resource}/{id} - 204 if a row was removed, 404 otherwise.
pub async fn delete_record<S: Store, T: Record>(
    State(store): State<AppState<S>>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    match store.delete::<T>(id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(&format!(
                "No row with id {} in {}",
                id,
                T::TABLE
            ))),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

/// GET /reset-database - drop, recreate, and reseed every table.
pub async fn reset_database<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(e) = store.reset().await {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        ));
    }

    if let Err(e) = seed::load_seed_data(&*store).await {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        ));
    }

    Ok(Json(serde_json::json!({
        "message": "Database has been reset successfully."
    })))
}
