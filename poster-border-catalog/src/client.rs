use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::types::{CollectionItem, LibrarySection, MetadataResponse, SectionsResponse};

/// Library item type number the server uses for collections.
const COLLECTION_TYPE: u32 = 18;

/// Anything that can hand over the poster bytes for a collection.
pub trait PosterSource {
    fn fetch_poster(&self, item: &CollectionItem) -> Result<Vec<u8>, CatalogError>;
}

/// Anything that can list the collections of a named library.
pub trait CollectionSource {
    /// Fails with [`CatalogError::LibraryNotFound`] for an unknown library.
    fn list_collections(&self, library_name: &str) -> Result<Vec<CollectionItem>, CatalogError>;
}

/// Blocking HTTP client for a Plex Media Server catalog.
pub struct PlexClient {
    http: Client,
    base_url: String,
}

impl PlexClient {
    /// Build a client that sends the access token with every request.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let header = HeaderName::from_bytes(config.token_header.as_bytes()).map_err(|e| {
            CatalogError::Config(format!(
                "Invalid token header name \"{}\": {e}",
                config.token_header
            ))
        })?;
        let mut token = HeaderValue::from_str(&config.token)
            .map_err(|_| CatalogError::Config("Token contains invalid characters".to_string()))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header, token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// List every library section on the server.
    pub fn list_sections(&self) -> Result<Vec<LibrarySection>, CatalogError> {
        let resp: SectionsResponse = self.get_json("/library/sections")?;
        Ok(resp
            .media_container
            .directory
            .into_iter()
            .map(LibrarySection::from)
            .collect())
    }

    /// List the collections of the library section titled `library_name`.
    ///
    /// An unknown library is an error, never an empty list.
    pub fn list_collections(&self, library_name: &str) -> Result<Vec<CollectionItem>, CatalogError> {
        let sections = self.list_sections()?;
        let section = find_section(&sections, library_name)?;
        log::debug!(
            "Library \"{}\" is section {} ({})",
            section.title,
            section.key,
            section.kind
        );

        let resp: MetadataResponse = self.get_json(&collections_path(&section.key))?;
        Ok(resp
            .media_container
            .metadata
            .into_iter()
            .map(CollectionItem::from)
            .collect())
    }

    fn get(&self, path: &str) -> Result<Response, CatalogError> {
        let url = join_url(&self.base_url, path)?;
        log::debug!("GET {}", url);

        let resp = self.http.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }
        Ok(resp)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let text = self.get(path)?.text()?;
        serde_json::from_str(&text).map_err(|e| {
            let preview: String = text.chars().take(200).collect();
            CatalogError::Api(format!("Failed to parse {path}: {e}. Response: {preview}"))
        })
    }
}

impl CollectionSource for PlexClient {
    fn list_collections(&self, library_name: &str) -> Result<Vec<CollectionItem>, CatalogError> {
        PlexClient::list_collections(self, library_name)
    }
}

impl PosterSource for PlexClient {
    fn fetch_poster(&self, item: &CollectionItem) -> Result<Vec<u8>, CatalogError> {
        let poster_ref = item.poster_ref.as_deref().ok_or_else(|| CatalogError::NoPoster {
            title: item.title.clone(),
        })?;
        let bytes = self.get(poster_ref)?.bytes()?;
        Ok(bytes.to_vec())
    }
}

/// Pick the section whose title matches exactly.
pub(crate) fn find_section<'a>(
    sections: &'a [LibrarySection],
    name: &str,
) -> Result<&'a LibrarySection, CatalogError> {
    sections
        .iter()
        .find(|s| s.title == name)
        .ok_or_else(|| CatalogError::LibraryNotFound {
            name: name.to_string(),
            available: sections.iter().map(|s| s.title.clone()).collect(),
        })
}

pub(crate) fn collections_path(section_key: &str) -> String {
    format!("/library/sections/{}/all?type={}", section_key, COLLECTION_TYPE)
}

/// Append a server-relative path to the base URL.
///
/// Absolute URLs are used as-is only when they point at the same origin as
/// `base_url`, since every request carries the access token.
pub(crate) fn join_url(base_url: &str, path: &str) -> Result<String, CatalogError> {
    if path.starts_with("http://") || path.starts_with("https://") {
        let foreign = || CatalogError::ForeignUrl {
            url: path.to_string(),
        };
        let target = Url::parse(path).map_err(|_| foreign())?;
        let base = Url::parse(base_url)
            .map_err(|e| CatalogError::Config(format!("Invalid server URL \"{base_url}\": {e}")))?;
        if target.origin() != base.origin() {
            return Err(foreign());
        }
        return Ok(path.to_string());
    }
    if path.starts_with('/') {
        Ok(format!("{}{}", base_url, path))
    } else {
        Ok(format!("{}/{}", base_url, path))
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
