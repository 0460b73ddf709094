use std::sync::Arc;

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::routing;
use axum::Router;
use common::http::Json;

use crate::pull_requests::CreatePullRequestRequest;
use crate::pull_requests::MergePullRequestRequest;
use crate::pull_requests::PullRequest;
use crate::pull_requests::PullRequests;
use crate::pull_requests::ReassignRequest;
use crate::pull_requests::ReassignResponse;
use crate::Context;
use crate::Result;

async fn create(
    ctx: Context,
    Extension(provider): Extension<Arc<PullRequests>>,
    Json(request): Json<CreatePullRequestRequest>,
) -> Result<(StatusCode, Json<PullRequest>)> {
    Ok((StatusCode::CREATED, Json(provider.create(ctx, request).await?)))
}

async fn merge(
    ctx: Context,
    Extension(provider): Extension<Arc<PullRequests>>,
    Json(request): Json<MergePullRequestRequest>,
) -> Result<Json<PullRequest>> {
    Ok(Json(provider.merge(ctx, request).await?))
}

async fn reassign(
    ctx: Context,
    Extension(provider): Extension<Arc<PullRequests>>,
    Json(request): Json<ReassignRequest>,
) -> Result<Json<ReassignResponse>> {
    Ok(Json(provider.reassign(ctx, request).await?))
}

pub fn attach_routes(router: Router) -> Router {
    router.nest(
        "/api/pullRequest",
        Router::new()
            .route("/create", routing::post(create))
            .route("/merge", routing::post(merge))
            .route("/reassign", routing::post(reassign)),
    )
}
