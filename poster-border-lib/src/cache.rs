use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use poster_border_render as render;

use crate::error::PipelineError;
use crate::sanitize::SanitizedTitle;

/// Subdirectory holding downloaded (cropped) posters.
pub const ORIGINALS_DIR: &str = "originals";
/// Subdirectory holding bordered posters.
pub const MODIFIED_DIR: &str = "modified";

/// Where the two cached copies of one collection poster live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub original: PathBuf,
    pub modified: PathBuf,
}

/// Build the cache paths for `title` under `asset_dir`.
pub fn resolve_paths(asset_dir: &Path, title: &SanitizedTitle) -> AssetPaths {
    let file_name = title.file_name();
    AssetPaths {
        original: asset_dir.join(ORIGINALS_DIR).join(&file_name),
        modified: asset_dir.join(MODIFIED_DIR).join(&file_name),
    }
}

/// Create `originals/` and `modified/` under `asset_dir`. Existing
/// directories are fine.
pub fn ensure_directories(asset_dir: &Path) -> Result<(), PipelineError> {
    if asset_dir.is_file() {
        return Err(PipelineError::asset_directory(format!(
            "{} is a file",
            asset_dir.display()
        )));
    }
    fs::create_dir_all(asset_dir.join(ORIGINALS_DIR))?;
    fs::create_dir_all(asset_dir.join(MODIFIED_DIR))?;
    Ok(())
}

/// Result of checking the cache for one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// A bordered poster is already there
    Modified(PathBuf),
    /// Only the downloaded poster is there
    Original(PathBuf),
    /// Nothing cached
    Miss,
}

/// Storage for downloaded and bordered posters, keyed by sanitized title.
pub trait AssetCache {
    /// Make the cache ready for writes.
    fn prepare(&self) -> Result<(), PipelineError>;

    /// Check what is cached for `title`, modified copy first.
    fn lookup(&self, title: &SanitizedTitle) -> CacheLookup;

    fn load_original(&self, title: &SanitizedTitle) -> Result<DynamicImage, PipelineError>;

    fn store_original(
        &self,
        title: &SanitizedTitle,
        image: &DynamicImage,
    ) -> Result<PathBuf, PipelineError>;

    fn store_modified(
        &self,
        title: &SanitizedTitle,
        image: &DynamicImage,
    ) -> Result<PathBuf, PipelineError>;
}

/// File-presence cache in an asset directory.
///
/// There is no invalidation: a file that exists is a hit.
#[derive(Debug, Clone)]
pub struct FsAssetCache {
    root: PathBuf,
}

impl FsAssetCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn paths(&self, title: &SanitizedTitle) -> AssetPaths {
        resolve_paths(&self.root, title)
    }
}

impl AssetCache for FsAssetCache {
    fn prepare(&self) -> Result<(), PipelineError> {
        ensure_directories(&self.root)
    }

    fn lookup(&self, title: &SanitizedTitle) -> CacheLookup {
        let paths = self.paths(title);
        if paths.modified.is_file() {
            CacheLookup::Modified(paths.modified)
        } else if paths.original.is_file() {
            CacheLookup::Original(paths.original)
        } else {
            CacheLookup::Miss
        }
    }

    fn load_original(&self, title: &SanitizedTitle) -> Result<DynamicImage, PipelineError> {
        Ok(render::load_poster(&self.paths(title).original)?)
    }

    fn store_original(
        &self,
        title: &SanitizedTitle,
        image: &DynamicImage,
    ) -> Result<PathBuf, PipelineError> {
        let path = self.paths(title).original;
        render::save_png(image, &path)?;
        log::debug!("Saved {}", path.display());
        Ok(path)
    }

    fn store_modified(
        &self,
        title: &SanitizedTitle,
        image: &DynamicImage,
    ) -> Result<PathBuf, PipelineError> {
        let path = self.paths(title).modified;
        render::save_png(image, &path)?;
        log::debug!("Saved {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
