use std::sync::Arc;

use axum::extract::Extension;
use axum::routing;
use axum::Router;
use common::http::Json;

use crate::health::Health;
use crate::health::HealthStatus;

async fn check(Extension(provider): Extension<Arc<Health>>) -> Json<HealthStatus> {
    Json(provider.check().await)
}

pub fn attach_routes(router: Router) -> Router {
    router.route("/health", routing::get(check))
}
