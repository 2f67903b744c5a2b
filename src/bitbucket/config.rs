//! Credential and endpoint configuration for the Bitbucket API
//!
//! Credentials are read from the environment once, at configuration time,
//! and carried as explicit state by [`BitbucketConfig`]. Nothing in this
//! crate reads the environment after a config has been constructed.

use std::time::Duration;

use url::Url;

use super::error::BitbucketError;

/// Environment variable holding the Bitbucket account username
pub const BITBUCKET_USERNAME_VAR: &str = "BITBUCKET_USERNAME";

/// Environment variable holding the Bitbucket app password
pub const BITBUCKET_APP_PASSWORD_VAR: &str = "BITBUCKET_APP_PASSWORD";

/// Default origin of the Bitbucket Cloud 2.0 REST API
pub const DEFAULT_API_BASE: &str = "https://api.bitbucket.org/2.0";

/// Fails on the first missing environment variable in `required`
///
/// This is a pure precondition check: it performs no network I/O and does
/// not read the variable values beyond testing for presence. An empty
/// string counts as present.
///
/// # Errors
///
/// Returns [`BitbucketError::MissingEnvVar`] naming the first variable in
/// `required` that is not set.
pub fn check_required_env_vars(required: &[&str]) -> Result<(), BitbucketError> {
    for var in required {
        if std::env::var_os(var).is_none() {
            return Err(BitbucketError::MissingEnvVar((*var).to_string()));
        }
    }
    Ok(())
}

/// Connection settings for [`BitbucketClient`](super::client::BitbucketClient)
///
/// Holds the HTTP Basic credentials, the API origin and an optional
/// per-request timeout. The timeout is not part of the upstream behavior
/// this crate mirrors, but long-hanging requests are otherwise
/// uninterruptible, so the knob is exposed here.
#[derive(Debug, Clone)]
pub struct BitbucketConfig {
    /// Bitbucket account username used for HTTP Basic authentication
    pub username: String,

    /// App password paired with the username
    pub app_password: String,

    /// Origin of the REST API, `https://api.bitbucket.org/2.0` by default
    pub api_base: Url,

    /// Per-request timeout applied to the underlying HTTP client
    /// When None, requests wait indefinitely
    pub timeout: Option<Duration>,
}

impl BitbucketConfig {
    /// Creates a config for the default Bitbucket Cloud API origin
    pub fn new<S: Into<String>>(username: S, app_password: S) -> Self {
        BitbucketConfig {
            username: username.into(),
            app_password: app_password.into(),
            api_base: Url::parse(DEFAULT_API_BASE).expect("default API base must be a valid URL"),
            timeout: None,
        }
    }

    /// Builds a config from `BITBUCKET_USERNAME` and `BITBUCKET_APP_PASSWORD`
    ///
    /// # Errors
    ///
    /// Returns [`BitbucketError::MissingEnvVar`] naming the first variable
    /// that is absent, without attempting any network call.
    pub fn from_env() -> Result<Self, BitbucketError> {
        check_required_env_vars(&[BITBUCKET_USERNAME_VAR, BITBUCKET_APP_PASSWORD_VAR])?;

        let username = std::env::var(BITBUCKET_USERNAME_VAR)
            .map_err(|_| BitbucketError::MissingEnvVar(BITBUCKET_USERNAME_VAR.to_string()))?;
        let app_password = std::env::var(BITBUCKET_APP_PASSWORD_VAR)
            .map_err(|_| BitbucketError::MissingEnvVar(BITBUCKET_APP_PASSWORD_VAR.to_string()))?;

        Ok(Self::new(username, app_password))
    }

    /// Replaces the API origin, mainly used to point tests at a mock server
    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    /// Sets a per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
