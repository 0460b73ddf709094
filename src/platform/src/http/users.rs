use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::Extension;
use axum::extract::Query;
use axum::routing;
use axum::Router;
use common::http::Json;

use crate::http::query_param;
use crate::users::GetReviewRequest;
use crate::users::SetIsActiveRequest;
use crate::users::User;
use crate::users::UserReviews;
use crate::users::Users;
use crate::Context;
use crate::Result;

async fn set_is_active(
    ctx: Context,
    Extension(provider): Extension<Arc<Users>>,
    Json(request): Json<SetIsActiveRequest>,
) -> Result<Json<User>> {
    Ok(Json(provider.set_is_active(ctx, request).await?))
}

async fn get_review(
    ctx: Context,
    Extension(provider): Extension<Arc<Users>>,
    query: std::result::Result<Query<GetReviewRequest>, QueryRejection>,
) -> Result<Json<UserReviews>> {
    let request = query_param(query)?;
    Ok(Json(provider.get_reviews(ctx, &request.user_id).await?))
}

pub fn attach_routes(router: Router) -> Router {
    router.nest(
        "/api/users",
        Router::new()
            .route("/setIsActive", routing::post(set_is_active))
            .route("/getReview", routing::get(get_review)),
    )
}
