//! Media catalog access: connection settings, section lookup, collection
//! listing and poster download.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{CollectionSource, PlexClient, PosterSource};
pub use config::{
    CatalogConfig, CatalogFileConfig, ConfigSource, ConfigSources, DEFAULT_TIMEOUT_SECS,
    DEFAULT_TOKEN_HEADER, ENV_TOKEN, ENV_URL, config_path, config_sources, file_config,
    save_to_file,
};
pub use error::CatalogError;
pub use types::{CollectionItem, LibrarySection};
