use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;

use image::{GenericImageView, Rgb, RgbImage};
use poster_border_catalog::CatalogError;

use super::*;

/// Poster source serving PNGs keyed by poster ref.
#[derive(Default)]
struct FakeSource {
    posters: HashMap<String, Vec<u8>>,
    fetches: Cell<usize>,
}

impl FakeSource {
    fn with_poster(mut self, poster_ref: &str, width: u32, height: u32) -> Self {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([40, 80, 120])));
        self.posters
            .insert(poster_ref.to_string(), render::encode_png(&img).unwrap());
        self
    }

    fn with_bytes(mut self, poster_ref: &str, bytes: &[u8]) -> Self {
        self.posters.insert(poster_ref.to_string(), bytes.to_vec());
        self
    }
}

impl PosterSource for FakeSource {
    fn fetch_poster(&self, item: &CollectionItem) -> Result<Vec<u8>, CatalogError> {
        self.fetches.set(self.fetches.get() + 1);
        let poster_ref = item.poster_ref.as_deref().unwrap_or_default();
        self.posters
            .get(poster_ref)
            .cloned()
            .ok_or_else(|| CatalogError::Status {
                status: 404,
                path: poster_ref.to_string(),
            })
    }
}

/// In-memory cache that records what was stored.
#[derive(Default)]
struct MemoryCache {
    originals: RefCell<HashMap<SanitizedTitle, DynamicImage>>,
    modified: RefCell<HashMap<SanitizedTitle, DynamicImage>>,
    prepared: Cell<bool>,
    fail_modified: bool,
}

impl AssetCache for MemoryCache {
    fn prepare(&self) -> Result<(), PipelineError> {
        self.prepared.set(true);
        Ok(())
    }

    fn lookup(&self, title: &SanitizedTitle) -> CacheLookup {
        if self.modified.borrow().contains_key(title) {
            CacheLookup::Modified(PathBuf::from(format!("modified/{}", title.file_name())))
        } else if self.originals.borrow().contains_key(title) {
            CacheLookup::Original(PathBuf::from(format!("originals/{}", title.file_name())))
        } else {
            CacheLookup::Miss
        }
    }

    fn load_original(&self, title: &SanitizedTitle) -> Result<DynamicImage, PipelineError> {
        self.originals
            .borrow()
            .get(title)
            .cloned()
            .ok_or_else(|| PipelineError::Io(std::io::ErrorKind::NotFound.into()))
    }

    fn store_original(
        &self,
        title: &SanitizedTitle,
        image: &DynamicImage,
    ) -> Result<PathBuf, PipelineError> {
        self.originals
            .borrow_mut()
            .insert(title.clone(), image.clone());
        Ok(PathBuf::from(title.file_name()))
    }

    fn store_modified(
        &self,
        title: &SanitizedTitle,
        image: &DynamicImage,
    ) -> Result<PathBuf, PipelineError> {
        if self.fail_modified {
            return Err(PipelineError::Io(std::io::Error::other("disk full")));
        }
        self.modified
            .borrow_mut()
            .insert(title.clone(), image.clone());
        Ok(PathBuf::from(title.file_name()))
    }
}

fn item(title: &str, poster_ref: Option<&str>) -> CollectionItem {
    CollectionItem::new(title, poster_ref.map(str::to_string))
}

fn options(action: Action) -> PipelineOptions {
    PipelineOptions {
        action,
        ..PipelineOptions::default()
    }
}

fn process(
    item: &CollectionItem,
    source: &FakeSource,
    cache: &MemoryCache,
    options: &PipelineOptions,
) -> ItemReport {
    process_collection(item, source, cache, options, &|_| {})
}

#[test]
fn test_action_names() {
    assert_eq!(Action::default(), Action::Download);
    assert_eq!(Action::Upload.to_string(), "upload");
    assert_eq!(Action::List.as_str(), "list");
}

#[test]
fn test_list_action_skips_everything() {
    let source = FakeSource::default().with_poster("/p/1", 20, 30);
    let cache = MemoryCache::default();
    let report = process(&item("One", Some("/p/1")), &source, &cache, &options(Action::List));

    assert_eq!(report.outcome, Outcome::Skipped(SkipReason::ActionIsList));
    assert!(!report.downloaded);
    assert_eq!(source.fetches.get(), 0);
}

#[test]
fn test_missing_poster_is_skipped() {
    let source = FakeSource::default();
    let cache = MemoryCache::default();
    let report = process(&item("One", None), &source, &cache, &options(Action::Upload));

    assert_eq!(report.outcome, Outcome::Skipped(SkipReason::NoPoster));
    assert_eq!(source.fetches.get(), 0);
}

#[test]
fn test_download_crops_and_stores_original() {
    let source = FakeSource::default().with_poster("/p/1", 300, 300);
    let cache = MemoryCache::default();
    let report = process(
        &item("Star Wars: Collection", Some("/p/1")),
        &source,
        &cache,
        &options(Action::Download),
    );

    assert_eq!(report.outcome, Outcome::Downloaded);
    assert!(report.downloaded);
    assert_eq!(report.title.as_str(), "Star Wars Collection");

    let originals = cache.originals.borrow();
    let stored = originals.get(&report.title).unwrap();
    assert_eq!(stored.dimensions(), (200, 300));
    assert!(cache.modified.borrow().is_empty());
}

#[test]
fn test_upload_writes_bordered_copy() {
    let source = FakeSource::default().with_poster("/p/1", 1000, 1500);
    let cache = MemoryCache::default();
    let report = process(&item("One", Some("/p/1")), &source, &cache, &options(Action::Upload));

    assert_eq!(report.outcome, Outcome::Uploaded);
    assert!(report.downloaded);

    let modified = cache.modified.borrow();
    let bordered = modified.get(&report.title).unwrap().to_rgb8();
    assert_eq!(*bordered.get_pixel(0, 0), Rgb([255, 255, 255]));
    assert_eq!(*bordered.get_pixel(20, 20), Rgb([0, 0, 0]));
    assert_eq!(*bordered.get_pixel(500, 750), Rgb([40, 80, 120]));
}

#[test]
fn test_upload_reuses_cached_original() {
    let source = FakeSource::default();
    let cache = MemoryCache::default();
    let title = sanitize("One");
    cache.originals.borrow_mut().insert(
        title.clone(),
        DynamicImage::ImageRgb8(RgbImage::new(200, 300)),
    );

    let report = process(&item("One", Some("/p/1")), &source, &cache, &options(Action::Upload));
    assert_eq!(report.outcome, Outcome::Uploaded);
    assert!(!report.downloaded);
    assert_eq!(source.fetches.get(), 0);
    assert!(cache.modified.borrow().contains_key(&title));
}

#[test]
fn test_download_with_cached_original_is_skipped() {
    let source = FakeSource::default().with_poster("/p/1", 20, 30);
    let cache = MemoryCache::default();
    cache.originals.borrow_mut().insert(
        sanitize("One"),
        DynamicImage::ImageRgb8(RgbImage::new(20, 30)),
    );

    let report = process(&item("One", Some("/p/1")), &source, &cache, &options(Action::Download));
    assert_eq!(report.outcome, Outcome::Skipped(SkipReason::OriginalExists));
    assert_eq!(source.fetches.get(), 0);
}

#[test]
fn test_modified_exists_is_skipped() {
    let source = FakeSource::default().with_poster("/p/1", 20, 30);
    let cache = MemoryCache::default();
    cache.modified.borrow_mut().insert(
        sanitize("One"),
        DynamicImage::ImageRgb8(RgbImage::new(20, 30)),
    );

    for action in [Action::Download, Action::Upload] {
        let report = process(&item("One", Some("/p/1")), &source, &cache, &options(action));
        assert_eq!(report.outcome, Outcome::Skipped(SkipReason::ModifiedExists));
    }
    assert_eq!(source.fetches.get(), 0);
}

#[test]
fn test_force_ignores_cache() {
    let source = FakeSource::default().with_poster("/p/1", 20, 30);
    let cache = MemoryCache::default();
    cache.modified.borrow_mut().insert(
        sanitize("One"),
        DynamicImage::ImageRgb8(RgbImage::new(20, 30)),
    );

    let opts = PipelineOptions {
        action: Action::Upload,
        force: true,
        ..PipelineOptions::default()
    };
    let report = process(&item("One", Some("/p/1")), &source, &cache, &opts);
    assert_eq!(report.outcome, Outcome::Uploaded);
    assert_eq!(source.fetches.get(), 1);
}

#[test]
fn test_fetch_failure_is_download_error() {
    let source = FakeSource::default();
    let cache = MemoryCache::default();
    let report = process(&item("One", Some("/missing")), &source, &cache, &options(Action::Upload));

    match &report.outcome {
        Outcome::Errored { phase, message } => {
            assert_eq!(*phase, Phase::Downloading);
            assert!(message.contains("404"), "{message}");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(!report.downloaded);
    assert!(cache.originals.borrow().is_empty());
}

#[test]
fn test_undecodable_poster_is_download_error() {
    let source = FakeSource::default().with_bytes("/p/1", b"<html>nope</html>");
    let cache = MemoryCache::default();
    let report = process(&item("One", Some("/p/1")), &source, &cache, &options(Action::Download));

    assert!(matches!(
        report.outcome,
        Outcome::Errored {
            phase: Phase::Downloading,
            ..
        }
    ));
    assert!(cache.originals.borrow().is_empty());
}

#[test]
fn test_store_failure_is_upload_error() {
    let source = FakeSource::default().with_poster("/p/1", 20, 30);
    let cache = MemoryCache {
        fail_modified: true,
        ..MemoryCache::default()
    };
    let report = process(&item("One", Some("/p/1")), &source, &cache, &options(Action::Upload));

    assert_eq!(
        report.outcome,
        Outcome::Errored {
            phase: Phase::Uploading,
            message: "I/O error: disk full".to_string(),
        }
    );
    // The original still made it into the cache
    assert!(report.downloaded);
    assert_eq!(cache.originals.borrow().len(), 1);
}

#[test]
fn test_process_all_events_and_counters() {
    let source = FakeSource::default()
        .with_poster("/p/1", 20, 30)
        .with_poster("/p/2", 40, 40);
    let cache = MemoryCache::default();
    let items = [
        item("One", Some("/p/1")),
        item("Two", Some("/p/2")),
        item("Three", None),
        item("Four", Some("/gone")),
    ];

    let events: RefCell<Vec<PipelineEvent>> = RefCell::new(Vec::new());
    let record = |e: PipelineEvent| events.borrow_mut().push(e);
    let summary = process_all(&items, &source, &cache, &options(Action::Upload), &record).unwrap();

    assert!(cache.prepared.get());
    assert_eq!(summary.reports.len(), 4);
    let c = summary.counters;
    assert_eq!(c.collections, 4);
    assert_eq!(c.skipped, 1);
    assert_eq!(c.modified, 2);
    assert_eq!(c.uploaded, 2);
    assert_eq!(c.downloaded, 2);
    assert_eq!(c.errored, 1);

    let events = events.into_inner();
    let finished = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::Finished(_)))
        .count();
    assert_eq!(finished, 4);
    assert!(matches!(
        events.first(),
        Some(PipelineEvent::Started { index: 0, total: 4, .. })
    ));
}

#[test]
fn test_process_all_respects_limit() {
    let source = FakeSource::default().with_poster("/p/1", 20, 30);
    let cache = MemoryCache::default();
    let items = [
        item("One", Some("/p/1")),
        item("Two", Some("/p/1")),
        item("Three", Some("/p/1")),
    ];
    let opts = PipelineOptions {
        limit: Some(2),
        ..PipelineOptions::default()
    };

    let summary = process_all(&items, &source, &cache, &opts, &|_| {}).unwrap();
    assert_eq!(summary.counters.collections, 2);
    assert_eq!(source.fetches.get(), 2);
}

#[test]
fn test_list_action_does_not_prepare_cache() {
    let source = FakeSource::default();
    let cache = MemoryCache::default();
    let items = [item("One", Some("/p/1"))];

    let summary = process_all(&items, &source, &cache, &options(Action::List), &|_| {}).unwrap();
    assert!(!cache.prepared.get());
    assert_eq!(summary.counters.skipped, 1);
}

#[test]
fn test_colliding_titles_share_cache_entry() {
    let source = FakeSource::default().with_poster("/p/1", 20, 30);
    let cache = MemoryCache::default();
    let items = [item("AC/DC", Some("/p/1")), item("ACDC", Some("/p/1"))];

    let summary = process_all(&items, &source, &cache, &options(Action::Download), &|_| {}).unwrap();
    assert_eq!(summary.reports[0].outcome, Outcome::Downloaded);
    assert_eq!(
        summary.reports[1].outcome,
        Outcome::Skipped(SkipReason::OriginalExists)
    );
    assert_eq!(source.fetches.get(), 1);
}
