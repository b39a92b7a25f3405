//! Client for the Radarr (movies) and Sonarr (series) v3 APIs.
//!
//! Both backends share one request/normalization path; [`BackendKind`]
//! carries everything that differs between them.

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;
pub mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use backend::BackendKind;
pub use client::MediaBackendClient;
pub use config::{BackendConfig, EndpointConfig};
pub use error::{ApiError, TransportError};
pub use transport::{HttpTransport, RawResponse, Transport};
pub use types::{AddOperationResult, BackendStatus, MediaKind, MediaSearchResult, RootFolder};
