//! Membership management endpoints (adding is owner-only).

use api_types::Ack;
use api_types::membership::{MemberAdd, MemberView, MembersGet, MembersResponse};
use axum::extract::State;

use crate::{Json, ServerError, server::ServerState};

pub async fn add_member(
    State(state): State<ServerState>,
    Json(payload): Json<MemberAdd>,
) -> Result<Json<Ack>, ServerError> {
    let actor_id = state.tokens.verify(&payload.token)?;

    state
        .engine
        .add_group_member(payload.group_id, payload.user_id, actor_id)
        .await?;

    Ok(Json(Ack {
        message: "User added to group successfully".to_string(),
    }))
}

pub async fn list_members(
    State(state): State<ServerState>,
    Json(payload): Json<MembersGet>,
) -> Result<Json<MembersResponse>, ServerError> {
    let actor_id = state.tokens.verify(&payload.token)?;

    let users = state
        .engine
        .group_members(payload.group_id, actor_id)
        .await?
        .into_iter()
        .map(|(id, username)| MemberView { id, username })
        .collect();

    Ok(Json(MembersResponse { users }))
}
