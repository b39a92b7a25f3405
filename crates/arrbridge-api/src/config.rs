use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;

/// Connection settings for one backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub url: String,
    pub api_key: String,
    /// Preferred root folder; when unset the first folder the backend
    /// lists is used.
    pub root_folder: Option<String>,
}

impl EndpointConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            root_folder: None,
        }
    }

    /// Join an API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.url.trim_end_matches('/'))
    }
}

/// Immutable settings for both backends, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub movie: EndpointConfig,
    pub series: EndpointConfig,
    pub quality_profile_id: u32,
}

impl BackendConfig {
    pub fn endpoint(&self, kind: BackendKind) -> &EndpointConfig {
        match kind {
            BackendKind::Movie => &self.movie,
            BackendKind::Series => &self.series,
        }
    }
}
