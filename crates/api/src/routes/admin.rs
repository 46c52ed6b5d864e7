use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/dashboard/admin", get(handlers::admin::admin_dashboard))
        .route(
            "/api/accounts/:username",
            delete(handlers::admin::delete_account),
        )
}
