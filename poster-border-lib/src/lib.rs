//! Collection poster pipeline: title sanitizing, the on-disk asset cache and
//! the per-item download/border driver.

pub mod cache;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod sanitize;
pub mod util;

pub use cache::{
    AssetCache, AssetPaths, CacheLookup, FsAssetCache, ensure_directories, resolve_paths,
};
pub use error::PipelineError;
pub use pipeline::{
    Action, PipelineEvent, PipelineOptions, RunSummary, process_all, process_collection, run,
};
pub use report::{ItemReport, Outcome, Phase, RunCounters, SkipReason};
pub use sanitize::{SanitizedTitle, sanitize};
