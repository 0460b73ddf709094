use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::Extension;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing;
use axum::Router;
use common::http::Json;

use crate::http::query_param;
use crate::teams::CreateTeamRequest;
use crate::teams::GetTeamRequest;
use crate::teams::Team;
use crate::teams::Teams;
use crate::Context;
use crate::Result;

async fn create(
    ctx: Context,
    Extension(provider): Extension<Arc<Teams>>,
    Json(request): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<Team>)> {
    Ok((StatusCode::CREATED, Json(provider.create(ctx, request).await?)))
}

async fn get(
    ctx: Context,
    Extension(provider): Extension<Arc<Teams>>,
    query: std::result::Result<Query<GetTeamRequest>, QueryRejection>,
) -> Result<Json<Team>> {
    let request = query_param(query)?;
    Ok(Json(provider.get(ctx, &request.team_name).await?))
}

pub fn attach_routes(router: Router) -> Router {
    router.nest(
        "/api/team",
        Router::new()
            .route("/add", routing::post(create))
            .route("/get", routing::get(get)),
    )
}
