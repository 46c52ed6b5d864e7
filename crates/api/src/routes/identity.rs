use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/register/user",
            post(handlers::identity::register_user),
        )
        .route(
            "/api/register/provider",
            post(handlers::identity::register_provider),
        )
        .route("/api/login", post(handlers::identity::login))
}
