use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::{claims::TokenKind, jwt::JwtKeys};
use crate::{error::AppError, store::Store, types::Role};

/// Extracts and validates the bearer access token. The token's subject must
/// still exist; the role is taken from the token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Self-or-admin access to a user-scoped resource.
    pub fn ensure_can_access(&self, user_id: Uuid) -> Result<(), AppError> {
        if self.id == user_id || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Access to another user's data is not allowed"))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
    Store: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header"))?;

        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(_) => {
                warn!("invalid or expired token");
                return Err(AppError::unauthorized("Invalid or expired token"));
            }
        };

        if claims.kind != TokenKind::Access {
            return Err(AppError::unauthorized("Access token required"));
        }

        let store = Store::from_ref(state);
        if store.users.find_by_id(claims.sub).await?.is_none() {
            warn!(user_id = %claims.sub, "token for deleted user");
            return Err(AppError::unauthorized("User no longer exists"));
        }

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

/// Authenticated caller holding the admin role.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
    Store: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            warn!(user_id = %user.id, "admin route denied");
            return Err(AppError::unauthorized("Admin role required"));
        }
        Ok(AdminUser(user))
    }
}
