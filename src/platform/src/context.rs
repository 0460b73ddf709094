use axum::async_trait;
use axum::extract::Extension;
use axum::http::request::Parts;
use axum_core::extract::FromRequestParts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use common::config;
use common::rbac::has_permission;
use common::rbac::Permission;
use common::rbac::Role;

use crate::error::AuthError;
use crate::PlatformError;
use crate::Result;

/// Caller identity resolved from the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub role: Role,
}

impl Context {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    pub fn check_permission(&self, permission: Permission) -> Result<()> {
        if has_permission(self.role, &permission) {
            return Ok(());
        }

        Err(PlatformError::Forbidden("admin access required".to_string()))
    }
}

pub fn resolve_role(token: &str, cfg: &config::Auth) -> Result<Role> {
    if token == cfg.admin_token {
        Ok(Role::Admin)
    } else if token == cfg.user_token {
        Ok(Role::User)
    } else {
        Err(AuthError::InvalidToken.into())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where S: Send + Sync
{
    type Rejection = PlatformError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> core::result::Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_err| AuthError::CantParseBearerHeader)?;

        let Extension(auth_cfg) = Extension::<config::Auth>::from_request_parts(parts, state)
            .await
            .map_err(|err| PlatformError::Internal(err.to_string()))?;

        Ok(Context::new(resolve_role(bearer.token(), &auth_cfg)?))
    }
}
