use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/dashboard/user",
            get(handlers::dashboard::user_dashboard),
        )
        .route(
            "/api/dashboard/provider",
            get(handlers::dashboard::provider_dashboard),
        )
}
