use std::env;

use crate::types::{ConfigName, DatasetId};

/// Environment variable consulted by [`BuilderConfig::with_token_from_env`].
pub const HUB_TOKEN_ENV: &str = "HUGGING_FACE_HUB_TOKEN";

/// Validation strictness requested from the foreign materializer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerificationMode {
    /// Skip checksum/size/split verification during materialization.
    NoChecks,
    /// Run every verification the materializer supports.
    AllChecks,
}

impl VerificationMode {
    /// Wire string understood by foreign materializers.
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationMode::NoChecks => "no_checks",
            VerificationMode::AllChecks => "all_checks",
        }
    }
}

/// Configuration for a [`DatasetBuilder`](crate::builder::DatasetBuilder).
#[derive(Clone, Debug)]
pub struct BuilderConfig {
    /// Foreign dataset identifier.
    pub dataset_id: DatasetId,
    /// Optional foreign configuration name.
    pub config_name: Option<ConfigName>,
    /// Authentication token passed to the materializer's login.
    ///
    /// Threaded through explicitly; the ambient environment is consulted
    /// only when the caller opts in via [`BuilderConfig::with_token_from_env`].
    pub auth_token: Option<String>,
    /// Worker threads per split conversion; `None` converts inline.
    pub conversion_workers: Option<usize>,
    /// Validation strictness requested from the materializer.
    pub verification: VerificationMode,
}

impl BuilderConfig {
    /// Create a config for `dataset_id` with inline conversion and no checks.
    pub fn new(dataset_id: impl Into<DatasetId>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            config_name: None,
            auth_token: None,
            conversion_workers: None,
            verification: VerificationMode::NoChecks,
        }
    }

    /// Select a foreign configuration name.
    pub fn with_config_name(mut self, config_name: impl Into<ConfigName>) -> Self {
        self.config_name = Some(config_name.into());
        self
    }

    /// Set an explicit authentication token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Fall back to the `HUGGING_FACE_HUB_TOKEN` environment variable when
    /// no explicit token was set.
    ///
    /// Intended for outermost entry points only, keeping environment reads
    /// out of library internals.
    pub fn with_token_from_env(mut self) -> Self {
        if self.auth_token.is_none() {
            self.auth_token = env::var(HUB_TOKEN_ENV).ok();
        }
        self
    }

    /// Distribute per-split conversion over `workers` threads.
    pub fn with_conversion_workers(mut self, workers: usize) -> Self {
        self.conversion_workers = Some(workers);
        self
    }

    /// Request a verification mode from the materializer.
    pub fn with_verification(mut self, verification: VerificationMode) -> Self {
        self.verification = verification;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_style_setters_compose() {
        let config = BuilderConfig::new("squad")
            .with_config_name("plain_text")
            .with_auth_token("secret")
            .with_conversion_workers(4)
            .with_verification(VerificationMode::AllChecks);
        assert_eq!(config.dataset_id, "squad");
        assert_eq!(config.config_name.as_deref(), Some("plain_text"));
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.conversion_workers, Some(4));
        assert_eq!(config.verification, VerificationMode::AllChecks);
    }

    #[test]
    fn env_fallback_never_overrides_an_explicit_token() {
        let config = BuilderConfig::new("squad")
            .with_auth_token("explicit")
            .with_token_from_env();
        assert_eq!(config.auth_token.as_deref(), Some("explicit"));
    }

    #[test]
    fn verification_modes_have_stable_wire_strings() {
        assert_eq!(VerificationMode::NoChecks.as_str(), "no_checks");
        assert_eq!(VerificationMode::AllChecks.as_str(), "all_checks");
    }
}
