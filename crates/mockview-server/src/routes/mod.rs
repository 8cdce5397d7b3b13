pub mod health;
pub mod interview;

use axum::Router;
use crate::state::AppState;

pub fn configure(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(interview::routes(state))
}
