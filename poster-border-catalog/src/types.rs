use serde::Deserialize;

/// Top-level response wrapper from `/library/sections`.
#[derive(Debug, Deserialize)]
pub struct SectionsResponse {
    #[serde(rename = "MediaContainer")]
    pub media_container: SectionsContainer,
}

#[derive(Debug, Deserialize)]
pub struct SectionsContainer {
    #[serde(rename = "Directory", default)]
    pub directory: Vec<SectionDirectory>,
}

/// One library section as the server describes it.
#[derive(Debug, Deserialize, Clone)]
pub struct SectionDirectory {
    pub key: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Top-level response wrapper from `/library/sections/<key>/all`.
#[derive(Debug, Deserialize)]
pub struct MetadataResponse {
    #[serde(rename = "MediaContainer")]
    pub media_container: MetadataContainer,
}

#[derive(Debug, Deserialize)]
pub struct MetadataContainer {
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<MetadataEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetadataEntry {
    pub title: String,
    #[serde(default)]
    pub thumb: Option<String>,
}

/// A library section in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySection {
    pub key: String,
    pub title: String,
    /// Section type reported by the server (e.g. "movie", "show")
    pub kind: String,
}

impl From<SectionDirectory> for LibrarySection {
    fn from(dir: SectionDirectory) -> Self {
        Self {
            key: dir.key,
            title: dir.title,
            kind: dir.kind,
        }
    }
}

/// A collection listed in a library section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionItem {
    /// Display title as stored in the catalog
    pub title: String,
    /// Server-relative path of the poster image, if one is assigned
    pub poster_ref: Option<String>,
}

impl CollectionItem {
    pub fn new(title: impl Into<String>, poster_ref: Option<String>) -> Self {
        Self {
            title: title.into(),
            poster_ref,
        }
    }
}

impl From<MetadataEntry> for CollectionItem {
    fn from(entry: MetadataEntry) -> Self {
        // The server sometimes sends an empty thumb instead of omitting it
        let poster_ref = entry.thumb.filter(|t| !t.trim().is_empty());
        Self {
            title: entry.title,
            poster_ref,
        }
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
