use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{PlateForm, PlateView, RateRequest, SpinParams, SpinResponse},
    repo,
    repo_types::CATEGORIES,
    search::{SearchMode, SearchParams},
    services,
};
use crate::{
    auth::services::{AuthUser, OptionalAuthUser},
    error::AppError,
    images::services::UploadItem,
    state::AppState,
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/plates", get(list_plates))
        .route("/plates/:id", get(get_plate))
        .route("/search", get(search_plates))
        .route("/spin", get(spin_plate))
        .route("/categories", get(list_categories))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/plates", post(create_plate_multipart))
        .route("/plates/:id/rating", post(rate_plate))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_plates(State(state): State<AppState>) -> Result<Json<Vec<PlateView>>, AppError> {
    let plates = repo::list_all(&state.db).await?;
    Ok(Json(services::to_views(&state, plates).await))
}

#[instrument(skip(state))]
pub async fn get_plate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PlateView>, AppError> {
    let plate = repo::get(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Plate"))?;
    Ok(Json(services::to_view(&state, plate).await))
}

/// GET /search?q=...  or  GET /search?radius=..&lat=..&lng=..
#[instrument(skip(state))]
pub async fn search_plates(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PlateView>>, AppError> {
    let mode = params.mode();
    if let SearchMode::Text(_) = mode {
        if params.radius.is_some() || params.lat.is_some() || params.lng.is_some() {
            warn!("incomplete or malformed radius search; using text search");
        }
    }
    let plates = services::search(&state.db, &mode).await?;
    Ok(Json(services::to_views(&state, plates).await))
}

#[instrument(skip(state))]
pub async fn spin_plate(
    State(state): State<AppState>,
    Query(params): Query<SpinParams>,
) -> Result<Json<SpinResponse>, AppError> {
    let zipcode = params.zipcode;
    let plate = match services::spin(&state.db, &zipcode).await? {
        Some(p) => Some(services::to_view(&state, p).await),
        None => None,
    };
    Ok(Json(SpinResponse { zipcode, plate }))
}

pub async fn list_categories() -> Json<&'static [&'static str]> {
    Json(CATEGORIES)
}

/// POST /plates (multipart)
/// Text fields per plate column, optional file field `photo`.
#[instrument(skip(state, mp))]
pub async fn create_plate_multipart(
    State(state): State<AppState>,
    OptionalAuthUser(user_id): OptionalAuthUser,
    mut mp: Multipart,
) -> Result<(StatusCode, HeaderMap, Json<PlateView>), AppError> {
    let mut form = PlateForm::default();
    let mut photo = None;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "photo" {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            let has_file = field.file_name().map(|f| !f.is_empty()).unwrap_or(false);
            let body = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(e.to_string()))?;
            if has_file && !body.is_empty() {
                photo = Some(UploadItem { body, content_type });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::validation(e.to_string()))?;
            form.set(&name, value);
        }
    }

    let plate = services::create_plate(&state, user_id, form, photo).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/plates/{}", plate.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((
        StatusCode::CREATED,
        headers,
        Json(services::to_view(&state, plate).await),
    ))
}

#[instrument(skip(state, body))]
pub async fn rate_plate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<RateRequest>,
) -> Result<Json<PlateView>, AppError> {
    let plate =
        services::rate_plate(&state.db, user_id, id, body.rating, body.comment.as_deref()).await?;
    Ok(Json(services::to_view(&state, plate).await))
}
