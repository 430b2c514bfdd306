/// Errors that can occur while talking to the media catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned HTTP {status} for {path}")]
    Status { status: u16, path: String },

    #[error("Library \"{name}\" not found (available: {})", .available.join(", "))]
    LibraryNotFound { name: String, available: Vec<String> },

    #[error("No poster assigned to \"{title}\"")]
    NoPoster { title: String },

    #[error("Refusing to send the access token to {url} (not on the configured server)")]
    ForeignUrl { url: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
