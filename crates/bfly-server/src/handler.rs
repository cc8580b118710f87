use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::Json;
use bfly_store::{RecordStore, StoreResult};
use bfly_types::{Butterfly, Rating, Record, User};
use bfly_validate::{parse_butterfly, parse_rating, parse_user, ValidationResult};
use serde_json::{json, Value};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Liveness check.
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Server is running!" }))
}

pub async fn get_butterfly(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Butterfly>> {
    with_store(&state, move |store| store.butterfly(&id))
        .await?
        .map(Json)
        .ok_or(ServerError::NotFound)
}

pub async fn create_butterfly(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Json<Butterfly>> {
    let draft = parse_body(&headers, &body, parse_butterfly)?;
    let butterfly = draft.into_record(state.ids.generate());
    append(&state, butterfly.clone()).await?;
    Ok(Json(butterfly))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<User>> {
    with_store(&state, move |store| store.user(&id))
        .await?
        .map(Json)
        .ok_or(ServerError::NotFound)
}

pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Json<User>> {
    let draft = parse_body(&headers, &body, parse_user)?;
    let user = draft.into_record(state.ids.generate());
    append(&state, user.clone()).await?;
    Ok(Json(user))
}

/// Ratings by one user, lowest score first.
///
/// A user with no ratings is a 404, not an empty list.
pub async fn get_user_ratings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ServerResult<Json<Vec<Rating>>> {
    let ratings = with_store(&state, move |store| store.ratings_for_user(&user_id)).await?;
    if ratings.is_empty() {
        return Err(ServerError::NotFound);
    }
    Ok(Json(ratings))
}

pub async fn create_rating(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Json<Rating>> {
    let draft = parse_body(&headers, &body, parse_rating)?;
    let rating = draft.into_record(state.ids.generate());
    append(&state, rating.clone()).await?;
    Ok(Json(rating))
}

/// Decode a JSON body and run it through a typed validator.
///
/// Only bodies declared as JSON are read. An empty body is rejected the same
/// way as an invalid one.
fn parse_body<T>(
    headers: &HeaderMap,
    body: &[u8],
    parse: fn(&Value) -> ValidationResult<T>,
) -> ServerResult<T> {
    if !is_json_content(headers) {
        return Err(ServerError::InvalidBody("content type is not JSON".into()));
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ServerError::InvalidBody("empty body".into()));
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ServerError::InvalidBody(e.to_string()))?;
    parse(&value).map_err(|e| ServerError::InvalidBody(e.to_string()))
}

/// `application/json` or any `application/*+json` type, parameters ignored.
fn is_json_content(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

/// Run a store call on the blocking pool.
///
/// Store methods take a `std::sync::RwLock` and the file store writes and
/// syncs to disk, so neither may run on an async worker.
async fn with_store<T, F>(state: &AppState, f: F) -> ServerResult<T>
where
    F: FnOnce(&dyn RecordStore) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    let result = tokio::task::spawn_blocking(move || f(store.as_ref()))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;
    Ok(result?)
}

async fn append(state: &AppState, record: impl Into<Record>) -> ServerResult<()> {
    let record = record.into();
    let collection = record.collection();
    let id = record.id().clone();
    with_store(state, move |store| store.append(record)).await?;
    tracing::info!(collection = %collection, id = %id, "created record");
    Ok(())
}
