//! Configuration for repository templates.

use std::time::Duration;

use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::ctx::ExecCtx;
use crate::error::ConfigError;

/// Repository template configuration, usually read from a module's config section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Deadline applied to every statement run through repositories built
    /// from this config. `None` disables the deadline.
    #[serde(with = "humantime_serde")]
    pub query_timeout: Option<Duration>,

    /// Log the rendered SQL of each statement at debug level.
    pub log_statements: bool,
}

impl RepoConfig {
    /// Extract the config stored under `key`; a missing key yields the default.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the section exists but does not deserialize.
    pub fn from_figment(figment: &Figment, key: &str) -> Result<Self, ConfigError> {
        if !figment.contains(key) {
            return Ok(Self::default());
        }
        figment
            .extract_inner(key)
            .map_err(|e| ConfigError::from(Box::new(e)))
    }

    /// Execution context carrying the configured deadline.
    pub fn exec_ctx(&self) -> ExecCtx {
        match self.query_timeout {
            Some(after) => ExecCtx::new().with_timeout(after),
            None => ExecCtx::new(),
        }
    }
}
