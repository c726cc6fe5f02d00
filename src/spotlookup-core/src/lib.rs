pub mod config;
pub mod logging;
pub mod models;
pub mod paths;
pub mod provider;
pub mod provider_contract;

pub use config::{
    Config, ConfigError, LogLevel, LoggingConfig, LookupConfig, ValidationError, WebApiConfig,
};
pub use logging::{init_logging, LoggingError, LoggingGuard};
pub use paths::{AppDirs, DirsError};
pub use provider::{LibraryProvider, ProviderCapabilities, ProviderError, ProviderResult};

pub const APP_NAME: &str = "spotlookup";
pub const APP_AUTHOR: &str = "Spotlookup";
pub const APP_QUALIFIER: &str = "io";
