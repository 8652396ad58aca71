//! HTTP handlers for `/books` and `/books/{id}`.
//!
//! Every outcome is a 200 envelope: success, `failed` with a message for an
//! unknown id, or a bare `failed` when the store rejects the operation.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use bookshelf_http::{ApiError, Envelope};
use serde_json::json;

use super::models::BookPayload;
use super::store::{BookStore, StoreError};

/// Store handle shared by all handlers
pub type SharedStore = Arc<dyn BookStore>;

/// Routes relative to the module mount point
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(store)
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => missing(&id),
            StoreError::Constraint(cause) => {
                tracing::warn!(error = %cause, "book rejected by store constraint");
                ApiError::failed(StoreError::Constraint(cause))
            }
            other => ApiError::failed(other),
        }
    }
}

/// Not-found reported against the id exactly as the caller wrote it
fn missing(raw_id: &str) -> ApiError {
    ApiError::not_found(format!("Book #{raw_id} does not exist"))
}

fn read_payload(payload: Result<Json<BookPayload>, JsonRejection>) -> Result<BookPayload, ApiError> {
    match payload {
        Ok(Json(payload)) => Ok(payload),
        Err(rejection) => {
            tracing::warn!(reason = %rejection.body_text(), "unreadable book payload");
            Err(ApiError::failed(rejection))
        }
    }
}

/// GET /books
async fn list_books(State(store): State<SharedStore>) -> Result<Envelope, ApiError> {
    let books = store.find_all().await?;
    Ok(Envelope::success().with("result", json!(books)))
}

/// POST /books
async fn create_book(
    State(store): State<SharedStore>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Envelope, ApiError> {
    let payload = read_payload(payload)?;
    let book = store.create(&payload).await?;
    tracing::info!(book_id = book.id, "book added");
    Ok(Envelope::success())
}

/// GET /books/{id}
async fn get_book(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
) -> Result<Envelope, ApiError> {
    let book = store
        .find_by_id(&raw_id)
        .await?
        .ok_or_else(|| missing(&raw_id))?;
    Ok(Envelope::success().with("result", json!(book)))
}

/// PUT /books/{id}
async fn update_book(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Envelope, ApiError> {
    if store.find_by_id(&raw_id).await?.is_none() {
        return Err(missing(&raw_id));
    }

    let payload = read_payload(payload)?;
    store.update(&raw_id, &payload).await?;
    tracing::info!(book_id = %raw_id, "book updated");
    Ok(Envelope::success())
}

/// DELETE /books/{id}
async fn delete_book(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
) -> Result<Envelope, ApiError> {
    if store.find_by_id(&raw_id).await?.is_none() {
        return Err(missing(&raw_id));
    }

    store.delete(&raw_id).await?;
    tracing::info!(book_id = %raw_id, "book deleted");
    Ok(Envelope::success())
}
