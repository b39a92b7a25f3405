//! The named operations exposed to a conversational caller.
//!
//! Each tool checks configuration first, then delegates to
//! [`MediaBackendClient`]. Lookup failures are folded into the returned
//! structure; only configuration problems surface as [`BridgeError`].

use arrbridge_api::client::movie_placeholder_title;
use arrbridge_api::{
    AddOperationResult, BackendKind, BackendStatus, HttpTransport, MediaBackendClient,
    MediaSearchResult, Transport,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::AppConfig;
use crate::error::BridgeError;

/// Term used to probe lookup connectivity in `test_config`.
const PROBE_TERM: &str = "test";

// ── Tool results ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub results: Vec<MediaSearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_found: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub searched_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Outcome of the automatic add, when one was attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_added: Option<AddOperationResult>,
}

impl SearchResponse {
    fn found(query: &str, noun: &str, results: Vec<MediaSearchResult>) -> Self {
        let empty = results.is_empty();
        Self {
            total_found: (!empty).then_some(results.len()),
            searched_query: Some(query.to_string()),
            message: empty.then(|| format!("No {noun} found matching '{query}'")),
            error: None,
            auto_added: None,
            results,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            results: Vec::new(),
            total_found: None,
            searched_query: None,
            message: None,
            error: Some(error),
            auto_added: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unconfigured {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigReport {
    Missing(Unconfigured),
    Loaded(Box<ConfigStatus>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigStatus {
    pub config_loaded: bool,
    pub radarr_url: String,
    pub sonarr_url: String,
    pub radarr_api_key_set: bool,
    pub sonarr_api_key_set: bool,
    pub tvdb_api_key_set: bool,
    pub quality_profile_id: u32,
    pub radarr_root_folder: Option<String>,
    pub sonarr_root_folder: Option<String>,
    pub radarr_search: SearchProbe,
    pub sonarr_search: SearchProbe,
}

/// Result of a lookup connectivity probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "connectivity", rename_all = "snake_case")]
pub enum SearchProbe {
    Success { test_results: usize },
    Failed { error: String },
    NoApiKey,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServerReport {
    Missing(Unconfigured),
    Status(ServerStatus),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerStatus {
    pub movie_backend: BackendStatus,
    pub series_backend: BackendStatus,
    pub timestamp: DateTime<Utc>,
}

// ── Dispatch ────────────────────────────────────────────────────

/// A tool invocation: `{"tool": "<name>", "arguments": {...}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "tool", content = "arguments", rename_all = "snake_case")]
pub enum ToolCall {
    SearchMovies {
        title: String,
    },
    AddMovieById {
        tmdb_id: u64,
        #[serde(default)]
        root_folder: Option<String>,
    },
    SearchAndAddShow {
        description: String,
        #[serde(default)]
        auto_add: bool,
    },
    AddShowByTvdbId {
        tvdb_id: u64,
        title: String,
        #[serde(default)]
        root_folder: Option<String>,
    },
    TestConfig,
    GetServerStatus,
}

/// Name, description and JSON input schema of a tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: serde_json::Value,
}

/// All tools, in the order they are advertised.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    let root_folder = json!({
        "type": "string",
        "description": "Optional root folder path (e.g. \"/storage/movies\")"
    });

    vec![
        ToolDefinition {
            name: "search_movies",
            description: "Search for movies by title using Radarr's built-in lookup.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "Movie title only (e.g. \"The Matrix\" or \"Primer\")"
                    }
                },
                "required": ["title"]
            }),
        },
        ToolDefinition {
            name: "add_movie_by_id",
            description: "Add a specific movie to Radarr using its TMDb ID.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "tmdb_id": { "type": "integer", "description": "The Movie Database ID" },
                    "root_folder": root_folder
                },
                "required": ["tmdb_id"]
            }),
        },
        ToolDefinition {
            name: "search_and_add_show",
            description: "Search for TV shows with a natural language description and \
                optionally add the single match to Sonarr.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "description": {
                        "type": "string",
                        "description": "Description of the show (e.g. \"British time travel show with the Doctor\")"
                    },
                    "auto_add": {
                        "type": "boolean",
                        "description": "Add automatically when exactly one show matches",
                        "default": false
                    }
                },
                "required": ["description"]
            }),
        },
        ToolDefinition {
            name: "add_show_by_tvdb_id",
            description: "Add a specific TV show to Sonarr using its TVDB ID.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "tvdb_id": { "type": "integer", "description": "The TV Database ID" },
                    "title": { "type": "string", "description": "Title of the show" },
                    "root_folder": root_folder
                },
                "required": ["tvdb_id", "title"]
            }),
        },
        ToolDefinition {
            name: "test_config",
            description: "Report the loaded configuration and test lookup connectivity.",
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: "get_server_status",
            description: "Check the status and connectivity of the Radarr and Sonarr servers.",
            input_schema: json!({ "type": "object", "properties": {} }),
        },
    ]
}

// ── Tool surface ────────────────────────────────────────────────

struct Configured<T> {
    config: AppConfig,
    client: MediaBackendClient<T>,
}

/// The tool surface. Built either from a loaded [`AppConfig`] or
/// unconfigured, in which case every tool reports the missing setup.
pub struct MediaTools<T = HttpTransport> {
    inner: Option<Configured<T>>,
}

impl MediaTools<HttpTransport> {
    pub fn from_config(config: AppConfig) -> Result<Self, BridgeError> {
        let transport = HttpTransport::new(config.request_timeout())?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> MediaTools<T> {
    pub fn with_transport(config: AppConfig, transport: T) -> Self {
        let client = MediaBackendClient::with_transport(config.backend_config(), transport);
        Self {
            inner: Some(Configured { config, client }),
        }
    }

    pub fn unconfigured() -> Self {
        Self { inner: None }
    }

    pub fn client(&self) -> Option<&MediaBackendClient<T>> {
        self.inner.as_ref().map(|c| &c.client)
    }

    /// The client for `kind`'s tools, provided config is loaded and the
    /// backend's API key is set.
    fn require(&self, kind: BackendKind) -> Result<&MediaBackendClient<T>, BridgeError> {
        let inner = self
            .inner
            .as_ref()
            .ok_or(BridgeError::NotConfigured(kind.name()))?;
        if inner.client.config().endpoint(kind).api_key.is_empty() {
            return Err(BridgeError::MissingApiKey(kind.name()));
        }
        Ok(&inner.client)
    }

    pub async fn search_movies(&self, title: &str) -> SearchResponse {
        tracing::info!(title, "Searching for movies");

        let client = match self.require(BackendKind::Movie) {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "Movie search unavailable");
                return SearchResponse::failed(e.to_string());
            }
        };

        match client.search_movies(title).await {
            Ok(results) => SearchResponse::found(title, "movies", results),
            Err(e) => {
                let error = format!("Error during movie search: {e}");
                tracing::error!(%error);
                SearchResponse::failed(error)
            }
        }
    }

    pub async fn add_movie_by_id(
        &self,
        tmdb_id: u64,
        root_folder: Option<&str>,
    ) -> Result<AddOperationResult, BridgeError> {
        let client = self.require(BackendKind::Movie)?;
        let title = movie_placeholder_title(tmdb_id);
        Ok(client.add_movie(tmdb_id, &title, root_folder).await)
    }

    /// Search shows; with `auto_add`, add the match when the search
    /// produced exactly one show that carries a TVDB id.
    pub async fn search_and_add_show(
        &self,
        description: &str,
        auto_add: bool,
    ) -> Result<SearchResponse, BridgeError> {
        let client = self.require(BackendKind::Series)?;

        let results = match client.search_shows(description).await {
            Ok(results) => results,
            Err(e) => {
                let error = format!("Error during show search: {e}");
                tracing::error!(%error);
                return Ok(SearchResponse::failed(error));
            }
        };

        let mut response = SearchResponse::found(description, "shows", results);
        if auto_add {
            if let [show] = response.results.as_slice() {
                match show.tvdb_id {
                    Some(tvdb_id) => {
                        let outcome = client.add_series(tvdb_id, &show.title, None).await;
                        tracing::info!(success = outcome.success, message = %outcome.message, "Auto-add result");
                        response.auto_added = Some(outcome);
                    }
                    None => {
                        tracing::warn!(title = %show.title, "Cannot auto-add - no TVDB ID available");
                    }
                }
            }
        }
        Ok(response)
    }

    pub async fn add_show_by_tvdb_id(
        &self,
        tvdb_id: u64,
        title: &str,
        root_folder: Option<&str>,
    ) -> Result<AddOperationResult, BridgeError> {
        let client = self.require(BackendKind::Series)?;
        Ok(client.add_series(tvdb_id, title, root_folder).await)
    }

    pub async fn test_config(&self) -> ConfigReport {
        tracing::info!("Testing configuration");

        let Some(Configured { config, client }) = &self.inner else {
            return ConfigReport::Missing(Unconfigured {
                error: "No configuration loaded".into(),
            });
        };

        let radarr_search = probe(client, BackendKind::Movie).await;
        let sonarr_search = probe(client, BackendKind::Series).await;

        ConfigReport::Loaded(Box::new(ConfigStatus {
            config_loaded: true,
            radarr_url: config.radarr.url.clone(),
            sonarr_url: config.sonarr.url.clone(),
            radarr_api_key_set: !config.radarr.api_key.is_empty(),
            sonarr_api_key_set: !config.sonarr.api_key.is_empty(),
            tvdb_api_key_set: config.tvdb_api_key.is_some(),
            quality_profile_id: config.quality_profile_id,
            radarr_root_folder: config.radarr.root_folder.clone(),
            sonarr_root_folder: config.sonarr.root_folder.clone(),
            radarr_search,
            sonarr_search,
        }))
    }

    pub async fn get_server_status(&self) -> ServerReport {
        let Some(inner) = &self.inner else {
            return ServerReport::Missing(Unconfigured {
                error: "Server not configured".into(),
            });
        };

        let movie_backend = inner.client.check_status(BackendKind::Movie).await;
        let series_backend = inner.client.check_status(BackendKind::Series).await;

        ServerReport::Status(ServerStatus {
            movie_backend,
            series_backend,
            timestamp: Utc::now(),
        })
    }

    /// Run a tool call and serialize its result.
    pub async fn dispatch(&self, call: ToolCall) -> Result<serde_json::Value, BridgeError> {
        tracing::debug!(?call, "Dispatching tool call");
        let value = match call {
            ToolCall::SearchMovies { title } => serde_json::to_value(self.search_movies(&title).await)?,
            ToolCall::AddMovieById {
                tmdb_id,
                root_folder,
            } => serde_json::to_value(self.add_movie_by_id(tmdb_id, root_folder.as_deref()).await?)?,
            ToolCall::SearchAndAddShow {
                description,
                auto_add,
            } => serde_json::to_value(self.search_and_add_show(&description, auto_add).await?)?,
            ToolCall::AddShowByTvdbId {
                tvdb_id,
                title,
                root_folder,
            } => serde_json::to_value(
                self.add_show_by_tvdb_id(tvdb_id, &title, root_folder.as_deref())
                    .await?,
            )?,
            ToolCall::TestConfig => serde_json::to_value(self.test_config().await)?,
            ToolCall::GetServerStatus => serde_json::to_value(self.get_server_status().await)?,
        };
        Ok(value)
    }
}

async fn probe<T: Transport>(client: &MediaBackendClient<T>, kind: BackendKind) -> SearchProbe {
    if client.config().endpoint(kind).api_key.is_empty() {
        return SearchProbe::NoApiKey;
    }
    let lookup = match kind {
        BackendKind::Movie => client.search_movies(PROBE_TERM).await,
        BackendKind::Series => client.search_shows(PROBE_TERM).await,
    };
    match lookup {
        Ok(results) => SearchProbe::Success {
            test_results: results.len(),
        },
        Err(e) => SearchProbe::Failed {
            error: e.to_string(),
        },
    }
}
