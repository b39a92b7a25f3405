use thiserror::Error;

/// Setup mistakes. These are the only failures a tool call raises; every
/// runtime backend problem is reported inside the tool's result instead.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Server not configured. Please set up {0} API key.")]
    NotConfigured(&'static str),

    #[error("{0} API key not configured")]
    MissingApiKey(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] arrbridge_api::TransportError),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
