use poster_border_catalog::CatalogError;
use poster_border_lib::PipelineError;
use poster_border_render::RenderError;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Catalog request failed
    #[error("{0}")]
    Catalog(#[from] CatalogError),

    /// Pipeline could not run
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Border settings rejected
    #[error("Invalid border settings: {0}")]
    Border(#[from] RenderError),

    /// Missing or inconsistent arguments
    #[error("{0}")]
    Usage(String),

    /// Logger setup failed
    #[error("Logging error: {0}")]
    Logging(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub(crate) fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }
}
