use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument};

use super::repo;
use crate::{
    auth::services::AuthUser,
    error::AppError,
    plates::{self, PlateView},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub plate_id: i64,
    pub added: bool,
}

pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/plates/:id/favorite", post(favorite_plate))
        .route("/me/favorites", get(list_favorites))
}

#[instrument(skip(state))]
pub async fn favorite_plate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(plate_id): Path<i64>,
) -> Result<Json<FavoriteResponse>, AppError> {
    if plates::repo::get(&state.db, plate_id).await?.is_none() {
        return Err(AppError::NotFound("Plate"));
    }
    let added = repo::add(&state.db, user_id, plate_id).await?;
    if added {
        info!(user_id, plate_id, "plate favorited");
    }
    Ok(Json(FavoriteResponse { plate_id, added }))
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<PlateView>>, AppError> {
    let favorites = repo::list_for_user(&state.db, user_id).await?;
    Ok(Json(plates::to_views(&state, favorites).await))
}
