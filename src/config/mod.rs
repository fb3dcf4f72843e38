/// Application configuration loading from config.toml
pub mod app;

/// Token lookup from environment variables
pub mod secrets;

pub use app::{AppConfig, LibraryConfig, TrackerConfig, load_app_configuration};
