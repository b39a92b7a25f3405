pub mod config;
pub mod error;
pub mod tools;

pub use config::AppConfig;
pub use error::BridgeError;
pub use tools::{MediaTools, ToolCall};
