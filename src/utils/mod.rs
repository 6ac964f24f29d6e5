/// Environment-backed application configuration.
pub mod config;

pub use config::AppConfig;
