//! Client configuration loaded from `TEAMCITY_*` environment variables.

use serde::Deserialize;

/// Environment prefix for [`ClientConfig`].
pub const ENV_PREFIX: &str = "TEAMCITY_";

/// Server location handed to the transport collaborator.
///
/// Each field maps to `TEAMCITY_<FIELD>`:
///   - `TEAMCITY_ADDRESS`   (default `http://localhost:8112`)
///   - `TEAMCITY_REST_PATH` (default `/app/rest`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Base address of the server.
    #[serde(default = "default_address")]
    pub address: String,

    /// Path of the REST root below `address`.
    #[serde(default = "default_rest_path")]
    pub rest_path: String,
}

fn default_address() -> String {
    "http://localhost:8112".to_string()
}

fn default_rest_path() -> String {
    "/app/rest".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            rest_path: default_rest_path(),
        }
    }
}

impl ClientConfig {
    /// Load from `TEAMCITY_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(ENV_PREFIX).from_env()
    }

    /// Load from explicit `(key, value)` pairs using the same prefix rules
    /// as [`ClientConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX).from_iter(vars)
    }

    /// `address` and `rest_path` joined with exactly one slash.
    #[must_use]
    pub fn rest_url(&self) -> String {
        let base = self.address.trim_end_matches('/');
        let path = self.rest_path.trim_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }
}
