//! Group API endpoints.

use api_types::group::{GroupCreated, GroupNew, GroupView, GroupsGet};
use axum::{extract::State, http::StatusCode};

use crate::{Json, ServerError, server::ServerState};

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<GroupCreated>), ServerError> {
    let user_id = state.tokens.verify(&payload.token)?;

    let group_id = state.engine.new_group(&payload.name, user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(GroupCreated {
            message: "Group created successfully".to_string(),
            group_id,
        }),
    ))
}

/// List the caller's groups, ordered by name.
pub async fn list(
    State(state): State<ServerState>,
    Json(payload): Json<GroupsGet>,
) -> Result<Json<Vec<GroupView>>, ServerError> {
    let user_id = state.tokens.verify(&payload.token)?;

    let groups = state
        .engine
        .groups_for_user(user_id)
        .await?
        .into_iter()
        .map(|group| GroupView {
            id: group.id,
            name: group.name,
            owner_id: group.owner_id,
        })
        .collect();

    Ok(Json(groups))
}
