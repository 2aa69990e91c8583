//! Middleware for bearer token validation
//!
//! `require_bearer` validates the `Authorization: Bearer` header with a
//! [`TokenService`] and stores the resulting [`Identity`] in the request
//! extensions, where handlers pick it up through [`CurrentUser`].

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::{debug, warn};

use crate::{jwt::TokenService, models::Identity, routes::AuthRejection};

/// Reject requests without a valid bearer token
pub async fn require_bearer(
    State(tokens): State<TokenService>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let Some(Authorization(bearer)) = req.headers().typed_get::<Authorization<Bearer>>() else {
        debug!("Request without bearer token");
        return Err(AuthRejection::Unauthorized);
    };

    let identity = tokens.verify(bearer.token()).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        AuthRejection::from(e)
    })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Identity of the caller, as established by [`require_bearer`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthRejection::Unauthorized)
    }
}
