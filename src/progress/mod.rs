pub mod handlers;
pub mod repo;
pub mod upload;

use crate::state::AppState;
use axum::Router;

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    handlers::progress_routes(max_upload_bytes)
}
