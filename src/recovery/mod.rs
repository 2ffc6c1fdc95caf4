//! Password recovery: emailed single-use reset tokens.

mod dto;
pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::recovery_routes()
}
