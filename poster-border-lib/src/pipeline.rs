use std::collections::HashSet;
use std::fmt;

use image::DynamicImage;
use poster_border_catalog::{CollectionItem, CollectionSource, PosterSource};
use poster_border_render::{self as render, BorderStyle};

use crate::cache::{AssetCache, CacheLookup};
use crate::error::PipelineError;
use crate::report::{ItemReport, Outcome, Phase, RunCounters, SkipReason};
use crate::sanitize::{SanitizedTitle, sanitize};

/// What to do with each collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Action {
    /// Fetch and cache the cropped poster
    #[default]
    Download,
    /// Fetch if needed, then write a bordered copy
    Upload,
    /// Only list collections, touch nothing
    List,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Upload => "upload",
            Self::List => "list",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options controlling a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub action: Action,
    pub border: BorderStyle,
    /// Ignore cached files and fetch/render everything again
    pub force: bool,
    /// Maximum number of collections to process
    pub limit: Option<usize>,
}

/// Progress information for callbacks.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// The library was found and its collections listed
    Listed { library: String, total: usize },
    /// Starting on an item
    Started {
        title: SanitizedTitle,
        index: usize,
        total: usize,
    },
    /// Fetching the poster from the catalog
    Downloading { title: SanitizedTitle },
    /// Rendering and saving the bordered copy
    Uploading { title: SanitizedTitle },
    /// Item reached its terminal state
    Finished(ItemReport),
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub reports: Vec<ItemReport>,
    pub counters: RunCounters,
}

/// Look up `library_name` and process every collection in it.
///
/// An unknown library fails before the asset directory is touched.
pub fn run<C>(
    catalog: &C,
    library_name: &str,
    cache: &dyn AssetCache,
    options: &PipelineOptions,
    progress: &dyn Fn(PipelineEvent),
) -> Result<RunSummary, PipelineError>
where
    C: CollectionSource + PosterSource,
{
    let items = catalog.list_collections(library_name)?;
    log::debug!(
        "Library \"{}\" has {} collection(s)",
        library_name,
        items.len()
    );
    progress(PipelineEvent::Listed {
        library: library_name.to_string(),
        total: options.limit.map_or(items.len(), |max| items.len().min(max)),
    });
    process_all(&items, catalog, cache, options, progress)
}

/// Process `items` in order, one at a time.
///
/// Item failures are recorded in the reports; only preparing the cache can
/// fail the whole run.
pub fn process_all(
    items: &[CollectionItem],
    source: &dyn PosterSource,
    cache: &dyn AssetCache,
    options: &PipelineOptions,
    progress: &dyn Fn(PipelineEvent),
) -> Result<RunSummary, PipelineError> {
    if options.action != Action::List {
        cache.prepare()?;
    }

    let items = match options.limit {
        Some(max) if max < items.len() => &items[..max],
        _ => items,
    };

    let mut seen = HashSet::new();
    let mut summary = RunSummary::default();

    for (index, item) in items.iter().enumerate() {
        let title = sanitize(&item.title);
        if !seen.insert(title.clone()) {
            log::warn!(
                "\"{}\" maps to the same file name as an earlier collection ({})",
                item.title,
                title.file_name()
            );
        }

        progress(PipelineEvent::Started {
            title,
            index,
            total: items.len(),
        });

        let report = process_collection(item, source, cache, options, progress);
        progress(PipelineEvent::Finished(report.clone()));
        summary.reports.push(report);
    }

    summary.counters = summary.reports.iter().collect();
    Ok(summary)
}

/// Run one collection through the pipeline.
///
/// Never fails: every error ends up in the report's outcome.
pub fn process_collection(
    item: &CollectionItem,
    source: &dyn PosterSource,
    cache: &dyn AssetCache,
    options: &PipelineOptions,
    progress: &dyn Fn(PipelineEvent),
) -> ItemReport {
    let title = sanitize(&item.title);
    let mut downloaded = false;

    let outcome = 'outcome: {
        if options.action == Action::List {
            break 'outcome Outcome::Skipped(SkipReason::ActionIsList);
        }
        if item.poster_ref.is_none() {
            break 'outcome Outcome::Skipped(SkipReason::NoPoster);
        }

        let lookup = if options.force {
            CacheLookup::Miss
        } else {
            cache.lookup(&title)
        };

        let image = match lookup {
            CacheLookup::Modified(_) => {
                break 'outcome Outcome::Skipped(SkipReason::ModifiedExists);
            }
            CacheLookup::Original(_) if options.action == Action::Download => {
                break 'outcome Outcome::Skipped(SkipReason::OriginalExists);
            }
            CacheLookup::Original(path) => {
                log::debug!("Using cached original {}", path.display());
                match cache.load_original(&title) {
                    Ok(image) => render::crop_to_aspect(image),
                    Err(e) => break 'outcome errored(Phase::Loading, e),
                }
            }
            CacheLookup::Miss => {
                progress(PipelineEvent::Downloading {
                    title: title.clone(),
                });
                match download(item, &title, source, cache) {
                    Ok(image) => {
                        downloaded = true;
                        image
                    }
                    Err(e) => break 'outcome errored(Phase::Downloading, e),
                }
            }
        };

        if options.action == Action::Download {
            break 'outcome Outcome::Downloaded;
        }

        progress(PipelineEvent::Uploading {
            title: title.clone(),
        });
        match upload(&image, &title, cache, &options.border) {
            Ok(()) => Outcome::Uploaded,
            Err(e) => errored(Phase::Uploading, e),
        }
    };

    ItemReport {
        title,
        downloaded,
        outcome,
    }
}

/// Fetch, decode, crop and cache the original poster.
fn download(
    item: &CollectionItem,
    title: &SanitizedTitle,
    source: &dyn PosterSource,
    cache: &dyn AssetCache,
) -> Result<DynamicImage, PipelineError> {
    let bytes = source.fetch_poster(item)?;
    let image = render::crop_to_aspect(render::decode_poster(&bytes)?);
    cache.store_original(title, &image)?;
    Ok(image)
}

/// Draw the border and cache the bordered copy.
fn upload(
    image: &DynamicImage,
    title: &SanitizedTitle,
    cache: &dyn AssetCache,
    style: &BorderStyle,
) -> Result<(), PipelineError> {
    let bordered = render::apply_border(image, style)?;
    cache.store_modified(title, &DynamicImage::ImageRgb8(bordered))?;
    Ok(())
}

fn errored(phase: Phase, error: PipelineError) -> Outcome {
    Outcome::Errored {
        phase,
        message: error.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
