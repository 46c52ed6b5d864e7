use axum::{
    routing::{delete, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/slots", post(handlers::slot::create_slot))
        .route("/api/slots/:id", delete(handlers::slot::delete_slot))
}
