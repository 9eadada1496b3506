//! Credential store: registration, login and the user directory.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, users};

use super::{Engine, normalize_required_text, with_tx};

/// Application-wide value concatenated to every password before hashing.
/// bcrypt already salts per password; this only ties hashes to this service.
const PASSWORD_PEPPER: &str = "f3b1c9d47a20e8515b6d03c4a7f9e2d8";

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

fn hash_password(password: &str) -> ResultEngine<String> {
    bcrypt::hash(format!("{password}{PASSWORD_PEPPER}"), bcrypt::DEFAULT_COST)
        .map_err(EngineError::PasswordHash)
}

fn verify_password(password: &str, password_hash: &str) -> ResultEngine<bool> {
    bcrypt::verify(format!("{password}{PASSWORD_PEPPER}"), password_hash)
        .map_err(EngineError::PasswordHash)
}

impl Engine {
    /// Create a new user and return its id.
    pub async fn register_user(&self, username: &str, password: &str) -> ResultEngine<i32> {
        let username = normalize_required_text(username, "username")?;
        if password.is_empty() {
            return Err(EngineError::Validation(
                "password must not be empty".to_string(),
            ));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(EngineError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }

        let password_hash = hash_password(password)?;

        with_tx!(self, |tx| {
            let taken = users::Entity::find()
                .filter(users::Column::Username.eq(username.clone()))
                .one(&tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(username));
            }

            let user = users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password_hash: ActiveValue::Set(password_hash),
                ..Default::default()
            }
            .insert(&tx)
            .await?;

            Ok(user.id)
        })
    }

    /// Check a username/password pair and return the user id.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the
    /// caller.
    pub async fn authenticate_user(&self, username: &str, password: &str) -> ResultEngine<i32> {
        if username.is_empty() || password.is_empty() {
            return Err(EngineError::Validation(
                "username and password are required".to_string(),
            ));
        }

        let user = with_tx!(self, |tx| {
            users::Entity::find()
                .filter(users::Column::Username.eq(username))
                .one(&tx)
                .await
                .map_err(EngineError::from)
        })?
        .ok_or(EngineError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(EngineError::InvalidCredentials);
        }
        Ok(user.id)
    }

    /// List every other user as `(id, username)`, ordered by username.
    pub async fn list_users(&self, actor_id: i32) -> ResultEngine<Vec<(i32, String)>> {
        with_tx!(self, |tx| {
            let rows = users::Entity::find()
                .filter(users::Column::Id.ne(actor_id))
                .order_by_asc(users::Column::Username)
                .all(&tx)
                .await?;
            Ok(rows.into_iter().map(|u| (u.id, u.username)).collect())
        })
    }
}
