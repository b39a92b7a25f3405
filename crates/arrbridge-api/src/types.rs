use serde::{Deserialize, Serialize};

/// Overview text used when a lookup hit has none.
pub const NO_OVERVIEW: &str = "No overview available";

// ── Normalized results ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

/// A lookup hit from either backend in a uniform shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSearchResult {
    pub title: String,
    pub year: Option<u32>,
    pub overview: String,
    pub tmdb_id: Option<u64>,
    pub tvdb_id: Option<u64>,
    pub poster_path: Option<String>,
    pub media_type: MediaKind,
}

impl MediaSearchResult {
    /// The catalog id the owning backend needs to add this title, if the
    /// lookup returned one.
    pub fn catalog_id(&self) -> Option<u64> {
        match self.media_type {
            MediaKind::Movie => self.tmdb_id,
            MediaKind::Tv => self.tvdb_id,
        }
    }
}

/// Outcome of an add request. Backend rejections and network failures are
/// reported here rather than as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOperationResult {
    pub success: bool,
    pub message: String,
    pub media_id: Option<u64>,
}

impl AddOperationResult {
    pub fn added(message: impl Into<String>, media_id: Option<u64>) -> Self {
        Self {
            success: true,
            message: message.into(),
            media_id,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            media_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootFolder {
    pub path: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub free_space: Option<u64>,
}

/// Result of a `system/status` probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendStatus {
    pub connected: bool,
    pub detail: StatusDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatusDetail {
    /// The backend's own status document.
    System(serde_json::Value),
    Error(String),
}

impl BackendStatus {
    pub fn connected(system: serde_json::Value) -> Self {
        Self {
            connected: true,
            detail: StatusDetail::System(system),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            connected: false,
            detail: StatusDetail::Error(message.into()),
        }
    }
}

// ── Wire types ──────────────────────────────────────────────────

/// A single entry from `movie/lookup` or `series/lookup`. Only the fields we
/// normalize are read; lookups often return partial records.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRecord {
    pub title: Option<String>,
    pub year: Option<u32>,
    pub overview: Option<String>,
    pub tmdb_id: Option<u64>,
    pub tvdb_id: Option<u64>,
    pub remote_poster: Option<String>,
}

impl LookupRecord {
    pub fn into_search_result(self, media_type: MediaKind) -> MediaSearchResult {
        // The backends report 0 for unknown years and ids.
        let present = |v: Option<u64>| v.filter(|id| *id > 0);

        MediaSearchResult {
            title: self.title.unwrap_or_else(|| "Unknown".into()),
            year: self.year.filter(|y| *y > 0),
            overview: self.overview.unwrap_or_else(|| NO_OVERVIEW.into()),
            tmdb_id: present(self.tmdb_id),
            tvdb_id: match media_type {
                MediaKind::Movie => None,
                MediaKind::Tv => present(self.tvdb_id),
            },
            poster_path: self.remote_poster,
            media_type,
        }
    }
}

/// Body of a successful add.
#[derive(Debug, Deserialize)]
pub struct CreatedResource {
    pub id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AddPayload {
    Movie(MoviePayload),
    Series(SeriesPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePayload {
    pub title: String,
    pub tmdb_id: u64,
    pub quality_profile_id: u32,
    pub monitored: bool,
    pub minimum_availability: &'static str,
    pub add_options: MovieAddOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_folder_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieAddOptions {
    pub search_for_movie: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPayload {
    pub title: String,
    pub tvdb_id: u64,
    pub quality_profile_id: u32,
    pub monitored: bool,
    pub season_folder: bool,
    pub add_options: SeriesAddOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_folder_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesAddOptions {
    pub search_for_missing_episodes: bool,
}

impl AddPayload {
    pub fn movie(
        tmdb_id: u64,
        title: String,
        quality_profile_id: u32,
        root_folder_path: Option<String>,
    ) -> Self {
        AddPayload::Movie(MoviePayload {
            title,
            tmdb_id,
            quality_profile_id,
            monitored: true,
            minimum_availability: "announced",
            add_options: MovieAddOptions {
                search_for_movie: true,
            },
            root_folder_path,
        })
    }

    pub fn series(
        tvdb_id: u64,
        title: String,
        quality_profile_id: u32,
        root_folder_path: Option<String>,
    ) -> Self {
        AddPayload::Series(SeriesPayload {
            title,
            tvdb_id,
            quality_profile_id,
            monitored: true,
            season_folder: true,
            add_options: SeriesAddOptions {
                search_for_missing_episodes: true,
            },
            root_folder_path,
        })
    }

    pub fn root_folder_path(&self) -> Option<&str> {
        match self {
            AddPayload::Movie(p) => p.root_folder_path.as_deref(),
            AddPayload::Series(p) => p.root_folder_path.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_movie_lookup() {
        let json = r#"[
            {
                "title": "Primer",
                "originalTitle": "Primer",
                "year": 2004,
                "overview": "Friends/fledgling entrepreneurs invent a device...",
                "tmdbId": 14337,
                "imdbId": "tt0390384",
                "remotePoster": "https://image.tmdb.org/t/p/original/primer.jpg",
                "images": []
            },
            { "title": "Primer: Director's Notes", "year": 0, "tmdbId": 0 }
        ]"#;

        let records: Vec<LookupRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);

        let mut results = records
            .into_iter()
            .map(|r| r.into_search_result(MediaKind::Movie));
        let primer = results.next().unwrap();
        assert_eq!(primer.title, "Primer");
        assert_eq!(primer.year, Some(2004));
        assert_eq!(primer.tmdb_id, Some(14337));
        assert_eq!(primer.catalog_id(), Some(14337));
        assert_eq!(
            primer.poster_path.as_deref(),
            Some("https://image.tmdb.org/t/p/original/primer.jpg")
        );

        let notes = results.next().unwrap();
        assert_eq!(notes.year, None);
        assert_eq!(notes.tmdb_id, None);
        assert_eq!(notes.overview, NO_OVERVIEW);
    }

    #[test]
    fn test_series_record_keeps_both_catalog_ids() {
        let record: LookupRecord = serde_json::from_str(
            r#"{ "title": "Doctor Who", "year": 2005, "tvdbId": 78804, "tmdbId": 57243 }"#,
        )
        .unwrap();
        let show = record.into_search_result(MediaKind::Tv);
        assert_eq!(show.media_type, MediaKind::Tv);
        assert_eq!(show.tvdb_id, Some(78804));
        assert_eq!(show.tmdb_id, Some(57243));
        assert_eq!(show.catalog_id(), Some(78804));
    }

    #[test]
    fn test_series_without_tvdb_id_cannot_be_added() {
        let record: LookupRecord =
            serde_json::from_str(r#"{ "title": "Obscure Pilot", "tvdbId": 0 }"#).unwrap();
        let show = record.into_search_result(MediaKind::Tv);
        assert_eq!(show.catalog_id(), None);
    }

    #[test]
    fn test_empty_record_defaults() {
        let result = LookupRecord::default().into_search_result(MediaKind::Movie);
        assert_eq!(result.title, "Unknown");
        assert_eq!(result.overview, NO_OVERVIEW);
        assert!(result.poster_path.is_none());
    }

    #[test]
    fn test_movie_payload_shape() {
        let payload = AddPayload::movie(603, "The Matrix".into(), 4, Some("/movies".into()));
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "The Matrix",
                "tmdbId": 603,
                "qualityProfileId": 4,
                "monitored": true,
                "minimumAvailability": "announced",
                "addOptions": { "searchForMovie": true },
                "rootFolderPath": "/movies"
            })
        );
    }

    #[test]
    fn test_series_payload_omits_missing_root_folder() {
        let payload = AddPayload::series(78804, "Doctor Who".into(), 1, None);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["tvdbId"], 78804);
        assert_eq!(json["seasonFolder"], true);
        assert_eq!(json["addOptions"]["searchForMissingEpisodes"], true);
        assert!(json.get("rootFolderPath").is_none());
    }

    #[test]
    fn test_status_detail_serializes_untagged() {
        let down = serde_json::to_value(BackendStatus::error("connection refused")).unwrap();
        assert_eq!(
            down,
            serde_json::json!({ "connected": false, "detail": "connection refused" })
        );

        let up = serde_json::to_value(BackendStatus::connected(
            serde_json::json!({ "version": "5.2.6" }),
        ))
        .unwrap();
        assert_eq!(up["detail"]["version"], "5.2.6");
    }
}
