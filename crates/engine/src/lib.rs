pub use error::EngineError;
pub use ops::{Engine, EngineBuilder};

mod error;
mod ops;

pub mod expenses;
pub mod groups;
pub mod memberships;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
