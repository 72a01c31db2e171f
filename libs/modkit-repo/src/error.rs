use std::time::Duration;

use sea_orm::DbErr;

/// Errors produced by repository operations.
#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    /// Database error reported by the engine, passed through unchanged.
    #[error("database error: {0}")]
    Db(#[from] DbErr),

    /// A single-record lookup matched nothing.
    #[error("record not found in `{table}`")]
    NotFound { table: String },

    /// A write addressed by primary key was given a model whose key is unset.
    #[error("`{table}` record has no primary key value")]
    MissingKey { table: String },

    /// The execution context deadline elapsed before the database answered.
    #[error("query timed out after {} ms", after.as_millis())]
    Timeout { after: Duration },

    /// The execution context was cancelled.
    #[error("query cancelled")]
    Cancelled,
}

impl RepoError {
    /// True when the error means "no matching record", whichever layer reported it.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Db(DbErr::RecordNotFound(_))
        )
    }
}

/// Single-record lookup failure that keeps the original cause and says
/// whether it was a "not found" condition.
#[derive(thiserror::Error, Debug)]
#[error("{cause}")]
pub struct NotFoundOr {
    #[source]
    pub cause: RepoError,
    pub not_found: bool,
}

impl NotFoundOr {
    #[must_use]
    pub fn new(cause: RepoError) -> Self {
        let not_found = cause.is_not_found();
        Self { cause, not_found }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.not_found
    }

    #[must_use]
    pub fn into_cause(self) -> RepoError {
        self.cause
    }
}

impl From<RepoError> for NotFoundOr {
    fn from(cause: RepoError) -> Self {
        Self::new(cause)
    }
}

impl From<DbErr> for NotFoundOr {
    fn from(err: DbErr) -> Self {
        Self::new(RepoError::Db(err))
    }
}

/// Repository configuration could not be extracted.
#[derive(thiserror::Error, Debug)]
#[error("invalid repository config: {0}")]
pub struct ConfigError(#[from] Box<figment::Error>);
