use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use super::session::CurrentSession;
use crate::auth::{authorize, Capability, Principal};
use crate::error::ApiError;

fn principal(parts: &Parts) -> Option<&Principal> {
    parts
        .extensions
        .get::<CurrentSession>()
        .and_then(|session| session.principal.as_ref())
}

/// Any signed-in user
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

/// A signed-in admin
#[derive(Debug, Clone)]
pub struct AdminUser(pub Principal);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize(principal(parts), Capability::Authenticated).map(|p| AuthUser(p.clone()))
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize(principal(parts), Capability::Admin).map(|p| AdminUser(p.clone()))
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentSession>().cloned().unwrap_or_default())
    }
}
