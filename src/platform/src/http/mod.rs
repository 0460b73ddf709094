pub mod health;
pub mod pull_requests;
pub mod statistics;
pub mod teams;
pub mod users;

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::middleware;
use axum::Extension;
use axum::Router;
use common::config::Config;
use common::http::print_request_response;
use tower::ServiceBuilder;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::PlatformError;
use crate::PlatformProvider;
use crate::Result;

pub(crate) fn query_param<T>(query: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    match query {
        Ok(Query(v)) => Ok(v),
        Err(err) => Err(PlatformError::BadRequest(err.body_text())),
    }
}

pub fn attach_routes(mut router: Router, platform: &Arc<PlatformProvider>, cfg: Config) -> Router {
    router = health::attach_routes(router);
    router = teams::attach_routes(router);
    router = users::attach_routes(router);
    router = pull_requests::attach_routes(router);
    router = statistics::attach_routes(router);

    router = router
        .layer(Extension(platform.health.clone()))
        .layer(Extension(platform.teams.clone()))
        .layer(Extension(platform.users.clone()))
        .layer(Extension(platform.pull_requests.clone()))
        .layer(Extension(platform.statistics.clone()))
        .layer(Extension(cfg.auth));

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(middleware::from_fn(print_request_response)),
    )
}
