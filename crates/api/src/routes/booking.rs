use axum::{
    routing::{delete, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/slots/:id/book", post(handlers::booking::book_slot))
        .route(
            "/api/slots/:id/booking",
            delete(handlers::booking::cancel_booking),
        )
}
