//! Per-call execution context: an optional deadline and an optional
//! cancellation token applied to every statement a repository runs.

use std::future::Future;
use std::time::Duration;

use sea_orm::DbErr;
use tokio_util::sync::CancellationToken;

use crate::error::RepoError;

/// Execution context bound into a repository view.
///
/// The default context has no deadline and cannot be cancelled.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct ExecCtx {
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl ExecCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail statements that take longer than `after` with [`RepoError::Timeout`].
    pub fn with_timeout(mut self, after: Duration) -> Self {
        self.timeout = Some(after);
        self
    }

    /// Abort statements with [`RepoError::Cancelled`] once `token` fires.
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[must_use]
    pub fn cancel_token(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    /// Drive `fut` under this context.
    ///
    /// # Errors
    /// Returns the engine error unchanged, [`RepoError::Timeout`] when the
    /// deadline elapses, or [`RepoError::Cancelled`] when the token fires first.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        let bounded = async {
            match self.timeout {
                Some(after) => tokio::time::timeout(after, fut)
                    .await
                    .map_err(|_| RepoError::Timeout { after })?
                    .map_err(RepoError::from),
                None => fut.await.map_err(RepoError::from),
            }
        };

        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => Err(RepoError::Cancelled),
                    res = bounded => res,
                }
            }
            None => bounded.await,
        }
    }
}
