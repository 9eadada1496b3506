use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::EngineError;
use serde::Serialize;

pub use auth::{AuthError, TokenSigner};
pub use server::{ServerState, router, run_with_listener};

mod auth;
mod expenses;
mod groups;
mod memberships;
mod server;
mod user;

pub enum ServerError {
    Engine(EngineError),
    Auth(AuthError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::PasswordHash(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::PasswordHash(hash_err) => {
            tracing::error!("password hash error: {hash_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Auth(err) => (StatusCode::UNAUTHORIZED, format!("invalid token: {err}")),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, axum::Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Generic(rejection.body_text())
    }
}

/// JSON extractor that funnels binding failures through [`ServerError`], so
/// malformed bodies come back as 400 with the same `{"error": ...}` shape as
/// every other failure.
#[derive(axum::extract::FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
