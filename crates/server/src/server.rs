use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{auth::TokenSigner, expenses, groups, memberships, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub tokens: TokenSigner,
}

async fn ping() -> &'static str {
    "pong"
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/register", post(user::register))
        .route("/login", post(user::login))
        .route("/expenses", post(expenses::add).delete(expenses::remove))
        .route("/expenses/get", post(expenses::list))
        .route("/expenses/update", post(expenses::update))
        .route("/groups", post(groups::create))
        .route("/groups/get", post(groups::list))
        .route("/groups/members/get", post(memberships::list_members))
        .route("/groups/members/add", post(memberships::add_member))
        .route("/validate/token", post(user::validate_token))
        .route("/users/get", post(user::list))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    tokens: TokenSigner,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        tokens,
    };

    axum::serve(listener, router(state)).await
}
