mod dto;
pub mod geo;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod search;
mod services;
pub mod spin;

pub use dto::PlateView;
pub use services::to_views;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
