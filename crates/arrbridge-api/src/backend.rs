//! Per-backend descriptor.
//!
//! Radarr and Sonarr expose the same v3 API shape; only paths, result
//! limits and the add payload differ.

use crate::types::{AddPayload, MediaKind};

pub const ROOT_FOLDER_PATH: &str = "/api/v3/rootfolder";
pub const SYSTEM_STATUS_PATH: &str = "/api/v3/system/status";

/// HTTP status a backend returns when a title was added.
pub const CREATED_STATUS: u16 = 201;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Movie,
    Series,
}

impl BackendKind {
    pub const ALL: &[BackendKind] = &[Self::Movie, Self::Series];

    /// Display name used in logs and user-facing messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Movie => "Radarr",
            Self::Series => "Sonarr",
        }
    }

    pub fn lookup_path(self) -> &'static str {
        match self {
            Self::Movie => "/api/v3/movie/lookup",
            Self::Series => "/api/v3/series/lookup",
        }
    }

    pub fn add_path(self) -> &'static str {
        match self {
            Self::Movie => "/api/v3/movie",
            Self::Series => "/api/v3/series",
        }
    }

    /// Maximum number of lookup hits handed back to the caller.
    pub fn search_limit(self) -> usize {
        match self {
            Self::Movie => 10,
            Self::Series => 5,
        }
    }

    pub fn media_kind(self) -> MediaKind {
        match self {
            Self::Movie => MediaKind::Movie,
            Self::Series => MediaKind::Tv,
        }
    }

    /// Noun used in add failure messages.
    pub fn item_noun(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }

    pub fn add_payload(
        self,
        catalog_id: u64,
        title: String,
        quality_profile_id: u32,
        root_folder_path: Option<String>,
    ) -> AddPayload {
        match self {
            Self::Movie => AddPayload::movie(catalog_id, title, quality_profile_id, root_folder_path),
            Self::Series => {
                AddPayload::series(catalog_id, title, quality_profile_id, root_folder_path)
            }
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
