use crate::backend::{BackendKind, CREATED_STATUS, ROOT_FOLDER_PATH, SYSTEM_STATUS_PATH};
use crate::config::BackendConfig;
use crate::error::{ApiError, TransportError};
use crate::transport::{HttpTransport, Transport, DEFAULT_TIMEOUT};
use crate::types::{
    AddOperationResult, BackendStatus, CreatedResource, LookupRecord, MediaSearchResult,
    RootFolder,
};

/// Client for the movie (Radarr) and series (Sonarr) backends.
///
/// Every operation is a short sequence of independent round trips; the
/// client holds no state besides its configuration and transport.
pub struct MediaBackendClient<T = HttpTransport> {
    config: BackendConfig,
    transport: T,
}

impl MediaBackendClient<HttpTransport> {
    pub fn new(config: BackendConfig) -> Result<Self, TransportError> {
        Ok(Self::with_transport(config, HttpTransport::new(DEFAULT_TIMEOUT)?))
    }
}

impl<T: Transport> MediaBackendClient<T> {
    pub fn with_transport(config: BackendConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Look up movies by title. At most 10 hits, in backend relevance order.
    pub async fn search_movies(&self, query: &str) -> Result<Vec<MediaSearchResult>, ApiError> {
        self.search(BackendKind::Movie, query).await
    }

    /// Look up series by title or description. At most 5 hits.
    pub async fn search_shows(&self, query: &str) -> Result<Vec<MediaSearchResult>, ApiError> {
        self.search(BackendKind::Series, query).await
    }

    /// Add a movie by TMDb id. An empty title is replaced by a placeholder;
    /// the backend fills in the real one.
    pub async fn add_movie(
        &self,
        tmdb_id: u64,
        title: &str,
        root_folder: Option<&str>,
    ) -> AddOperationResult {
        let title = if title.is_empty() {
            movie_placeholder_title(tmdb_id)
        } else {
            title.to_string()
        };
        self.add(BackendKind::Movie, tmdb_id, title, root_folder).await
    }

    /// Add a series by TVDB id.
    pub async fn add_series(
        &self,
        tvdb_id: u64,
        title: &str,
        root_folder: Option<&str>,
    ) -> AddOperationResult {
        self.add(BackendKind::Series, tvdb_id, title.to_string(), root_folder)
            .await
    }

    /// List a backend's root folders. Failures are logged and yield an
    /// empty list.
    pub async fn list_root_folders(&self, kind: BackendKind) -> Vec<RootFolder> {
        let endpoint = self.config.endpoint(kind);
        let url = endpoint.endpoint(ROOT_FOLDER_PATH);

        let resp = match self.transport.get(&url, &endpoint.api_key, &[]).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(backend = kind.name(), error = %e, "Failed to get root folders");
                return Vec::new();
            }
        };

        if !resp.is_success() {
            tracing::error!(
                backend = kind.name(),
                status = resp.status,
                "Failed to get root folders"
            );
            return Vec::new();
        }

        resp.json().unwrap_or_else(|e| {
            tracing::error!(backend = kind.name(), error = %e, "Malformed root folder list");
            Vec::new()
        })
    }

    /// Probe `system/status`. Never fails; errors land in the returned status.
    pub async fn check_status(&self, kind: BackendKind) -> BackendStatus {
        let endpoint = self.config.endpoint(kind);
        let url = endpoint.endpoint(SYSTEM_STATUS_PATH);

        match self.transport.get(&url, &endpoint.api_key, &[]).await {
            Ok(resp) if resp.is_success() => match resp.json() {
                Ok(system) => BackendStatus::connected(system),
                Err(e) => BackendStatus::error(format!("invalid status response: {e}")),
            },
            Ok(resp) => BackendStatus::error(format!(
                "{} returned status {}: {}",
                kind.name(),
                resp.status,
                resp.body
            )),
            Err(e) => BackendStatus::error(e.to_string()),
        }
    }

    async fn search(
        &self,
        kind: BackendKind,
        query: &str,
    ) -> Result<Vec<MediaSearchResult>, ApiError> {
        let backend = kind.name();
        let endpoint = self.config.endpoint(kind);
        let url = endpoint.endpoint(kind.lookup_path());

        tracing::info!(backend, %url, term = query, "Lookup request");

        let resp = self
            .transport
            .get(&url, &endpoint.api_key, &[("term", query)])
            .await
            .map_err(|e| {
                tracing::error!(backend, term = query, error = %e, "Lookup failed");
                ApiError::transport(backend, e)
            })?;

        tracing::info!(backend, status = resp.status, "Lookup response");

        match resp.status {
            401 => {
                tracing::error!(backend, "Authentication failed - check your API key");
                return Err(ApiError::Auth { backend });
            }
            404 => {
                tracing::error!(backend, "Lookup endpoint not found");
                return Err(ApiError::NotFound { backend });
            }
            _ if !resp.is_success() => {
                return Err(ApiError::status(backend, resp.status, &resp.body));
            }
            _ => {}
        }

        let records: Vec<LookupRecord> = resp.json().map_err(|e| ApiError::Backend {
            backend,
            status: Some(resp.status),
            message: format!("invalid lookup response: {e}"),
        })?;

        tracing::info!(backend, count = records.len(), term = query, "Lookup returned results");
        if let Some(first) = records.first() {
            tracing::debug!(backend, title = ?first.title, year = ?first.year, "First lookup result");
        }

        Ok(records
            .into_iter()
            .take(kind.search_limit())
            .map(|r| r.into_search_result(kind.media_kind()))
            .collect())
    }

    /// Root folder precedence: explicit argument, configured default, then
    /// the first folder the backend lists.
    async fn resolve_root_folder(
        &self,
        kind: BackendKind,
        explicit: Option<&str>,
    ) -> Option<String> {
        if let Some(path) = explicit.filter(|p| !p.is_empty()) {
            tracing::info!(backend = kind.name(), path, "Using specified root folder");
            return Some(path.to_string());
        }

        if let Some(path) = self
            .config
            .endpoint(kind)
            .root_folder
            .as_deref()
            .filter(|p| !p.is_empty())
        {
            tracing::info!(backend = kind.name(), path, "Using configured root folder");
            return Some(path.to_string());
        }

        match self.list_root_folders(kind).await.into_iter().next() {
            Some(folder) => {
                tracing::info!(backend = kind.name(), path = %folder.path, "Using auto-detected root folder");
                Some(folder.path)
            }
            None => {
                tracing::warn!(
                    backend = kind.name(),
                    "No root folders found - add will likely be rejected"
                );
                None
            }
        }
    }

    async fn add(
        &self,
        kind: BackendKind,
        catalog_id: u64,
        title: String,
        root_folder: Option<&str>,
    ) -> AddOperationResult {
        let backend = kind.name();
        let root_folder = self.resolve_root_folder(kind, root_folder).await;
        let payload = kind.add_payload(
            catalog_id,
            title.clone(),
            self.config.quality_profile_id,
            root_folder,
        );
        let body = match serde_json::to_value(&payload) {
            Ok(body) => body,
            Err(e) => return AddOperationResult::failed(format!("invalid add request: {e}")),
        };

        let endpoint = self.config.endpoint(kind);
        let url = endpoint.endpoint(kind.add_path());

        match self.transport.post_json(&url, &endpoint.api_key, &body).await {
            Ok(resp) if resp.status == CREATED_STATUS => {
                let media_id = resp.json::<CreatedResource>().ok().and_then(|c| c.id);
                tracing::info!(backend, catalog_id, ?media_id, "Added title");
                AddOperationResult::added(
                    format!("Successfully added '{title}' to {backend}"),
                    media_id,
                )
            }
            Ok(resp) => {
                tracing::warn!(backend, catalog_id, status = resp.status, "Add rejected");
                AddOperationResult::failed(format!(
                    "Failed to add {}: {}",
                    kind.item_noun(),
                    resp.body
                ))
            }
            Err(e) => {
                tracing::error!(backend, error = %e, "Add request failed");
                AddOperationResult::failed(format!("Error communicating with {backend}: {e}"))
            }
        }
    }
}

/// Title sent when adding a movie by id alone.
pub fn movie_placeholder_title(tmdb_id: u64) -> String {
    format!("Movie (TMDb ID: {tmdb_id})")
}
