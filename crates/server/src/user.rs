//! User registration, login, token validation and the user directory.

use api_types::token::{TokenStatus, TokenValidate};
use api_types::user::{AuthResponse, Login, Register, UserView, UsersGet};
use axum::{extract::State, http::StatusCode};
use engine::EngineError;

use crate::{Json, ServerError, server::ServerState};

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Register>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    let user_id = state
        .engine
        .register_user(&payload.username, &payload.password)
        .await?;
    let token = state.tokens.issue(user_id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user_id,
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<Login>,
) -> Result<Json<AuthResponse>, ServerError> {
    let user_id = state
        .engine
        .authenticate_user(&payload.username, &payload.password)
        .await?;
    let token = state.tokens.issue(user_id);

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user_id,
        token,
    }))
}

/// Check a token and confirm the user it names still exists.
pub async fn validate_token(
    State(state): State<ServerState>,
    Json(payload): Json<TokenValidate>,
) -> Result<Json<TokenStatus>, ServerError> {
    let user_id = state.tokens.verify(&payload.token)?;

    if !state.engine.user_exists(user_id).await? {
        return Err(ServerError::Engine(EngineError::KeyNotFound(
            "user".to_string(),
        )));
    }

    Ok(Json(TokenStatus {
        message: "Token is valid".to_string(),
        user_id,
        valid: true,
    }))
}

/// List every registered user except the caller.
pub async fn list(
    State(state): State<ServerState>,
    Json(payload): Json<UsersGet>,
) -> Result<Json<Vec<UserView>>, ServerError> {
    let user_id = state.tokens.verify(&payload.token)?;

    let users = state
        .engine
        .list_users(user_id)
        .await?
        .into_iter()
        .map(|(id, username)| UserView { id, username })
        .collect();

    Ok(Json(users))
}
