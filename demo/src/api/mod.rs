//! Annotated handlers. `fast-wgen` turns the `@router` lines into
//! `load_router.rs`.

pub mod health;
pub mod user;

use thiserror::Error;

/// Handler failures, rendered into the envelope message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("user {0} not found")]
    NotFound(u32),

    #[error("invalid user id '{0}'")]
    BadId(String),

    #[error("user store unavailable")]
    Unavailable,
}
