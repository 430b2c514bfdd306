use poster_border_catalog::CatalogError;
use poster_border_render::RenderError;
use thiserror::Error;

/// Errors raised while preparing or running the poster pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Talking to the catalog failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Decoding, transforming or encoding an image failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// I/O error in the asset directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The asset directory path is unusable
    #[error("Invalid asset directory: {0}")]
    AssetDirectory(String),
}

impl PipelineError {
    pub fn asset_directory(msg: impl Into<String>) -> Self {
        Self::AssetDirectory(msg.into())
    }
}
