pub mod extract;
pub mod handlers;

pub use handlers::*;

use crate::service::ReconciliationService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

/// All routes of the service
pub fn router(service: Arc<ReconciliationService>) -> Router {
    let reconcile_routes = Router::new()
        .route("/api/gstr2b/reconcile", post(handlers::reconcile))
        .route("/api/gstr2b/reconcile/csv", post(handlers::reconcile_csv))
        .with_state(service);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/gstr2b/filter", post(handlers::filter_results))
        .route("/api/gstr2b/export", post(handlers::export_results))
        .merge(reconcile_routes)
        .layer(ServiceBuilder::new())
}
