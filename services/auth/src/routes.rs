//! Authentication service routes

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::{
    error::{AuthError, ErrorClass, RegistrationError},
    models::{CreateUser, LoginCredentials, PublicUser},
    service::AuthService,
};

/// Response for token generation
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Create the router for the authentication service
pub fn create_router(service: AuthService) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/create/user", post(create_user))
        .route("/auth/token", post(login_for_access_token))
        .with_state(service)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User registration endpoint
pub async fn create_user(
    State(service): State<AuthService>,
    Json(payload): Json<CreateUser>,
) -> Result<impl IntoResponse, RegistrationRejection> {
    let user = service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

/// OAuth2 password-grant token endpoint
pub async fn login_for_access_token(
    State(service): State<AuthService>,
    Form(credentials): Form<LoginCredentials>,
) -> Result<impl IntoResponse, AuthRejection> {
    let access_token = service
        .login(&credentials.username, &credentials.password)
        .await?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// Externally visible authentication failure.
///
/// Every internal reason maps onto one of these, so a client cannot tell an
/// unknown username from a wrong password, or an expired token from a forged
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// Login failed
    Unauthenticated,
    /// Bearer token missing or rejected
    Unauthorized,
    InternalServerError,
}

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        match err.class() {
            ErrorClass::Unauthenticated => AuthRejection::Unauthenticated,
            ErrorClass::Unauthorized => AuthRejection::Unauthorized,
            ErrorClass::Internal => {
                error!("Authentication failed internally: {}", err);
                AuthRejection::InternalServerError
            }
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AuthRejection::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Incorrect username or password")
            }
            AuthRejection::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Could not validate credentials")
            }
            AuthRejection::InternalServerError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Registration failure response
#[derive(Debug)]
pub struct RegistrationRejection(RegistrationError);

impl From<RegistrationError> for RegistrationRejection {
    fn from(err: RegistrationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for RegistrationRejection {
    fn into_response(self) -> Response {
        let (status, detail) = match self.0 {
            RegistrationError::Invalid(msg) => (StatusCode::BAD_REQUEST, msg),
            RegistrationError::Conflict(what) => {
                (StatusCode::CONFLICT, format!("{} is already registered", what))
            }
            RegistrationError::Auth(err) => {
                error!("Registration failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
