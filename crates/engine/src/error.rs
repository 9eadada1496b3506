//! The module contains the errors the engine can throw.
//!
//! Each variant corresponds to one failure class the HTTP layer maps to a
//! status code: [`Validation`] is a malformed request, [`InvalidCredentials`]
//! a failed login, [`Forbidden`] an authenticated actor without rights on the
//! target, [`KeyNotFound`] a missing entity and [`ExistingKey`] a uniqueness
//! violation.
//!
//! [`Validation`]: EngineError::Validation
//! [`InvalidCredentials`]: EngineError::InvalidCredentials
//! [`Forbidden`]: EngineError::Forbidden
//! [`KeyNotFound`]: EngineError::KeyNotFound
//! [`ExistingKey`]: EngineError::ExistingKey
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error("\"{0}\" already present")]
    ExistingKey(String),
    #[error("password hashing failed")]
    PasswordHash(#[source] bcrypt::BcryptError),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::PasswordHash(a), Self::PasswordHash(b)) => a.to_string() == b.to_string(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
