//! Errors raised by repository operations that enforce domain rules.

use thrush_core::error::CoreError;

/// A repository failure: either a rule violation or a database error.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;
