use std::sync::Arc;

use axum::extract::Extension;
use axum::routing;
use axum::Router;
use common::http::Json;

use crate::statistics::PrStatusStats;
use crate::statistics::Statistics;
use crate::statistics::TeamStats;
use crate::statistics::UserAssignmentStats;
use crate::Context;
use crate::Result;

async fn assignments(
    ctx: Context,
    Extension(provider): Extension<Arc<Statistics>>,
) -> Result<Json<Vec<UserAssignmentStats>>> {
    Ok(Json(provider.assignments_by_users(ctx).await?))
}

async fn pull_requests(
    ctx: Context,
    Extension(provider): Extension<Arc<Statistics>>,
) -> Result<Json<Vec<PrStatusStats>>> {
    Ok(Json(provider.pr_count_by_status(ctx).await?))
}

async fn teams(
    ctx: Context,
    Extension(provider): Extension<Arc<Statistics>>,
) -> Result<Json<Vec<TeamStats>>> {
    Ok(Json(provider.team_statistics(ctx).await?))
}

pub fn attach_routes(router: Router) -> Router {
    router.nest(
        "/api/stats",
        Router::new()
            .route("/assignments", routing::get(assignments))
            .route("/pullRequests", routing::get(pull_requests))
            .route("/teams", routing::get(teams)),
    )
}
