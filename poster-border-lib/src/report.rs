use std::fmt;

use crate::sanitize::SanitizedTitle;

/// Why an item was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ActionIsList,
    NoPoster,
    ModifiedExists,
    OriginalExists,
}

impl SkipReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::ActionIsList => "Action is list",
            Self::NoPoster => "No poster found",
            Self::ModifiedExists => "Modified already exists",
            Self::OriginalExists => "Original already exists",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Step an item was in when it failed.
///
/// Besides the `Downloading` and `Uploading` steps a run walks through,
/// `Loading` marks a cached original that could not be read back from the
/// asset directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fetching, decoding or saving the original
    Downloading,
    /// Reading a cached original from disk
    Loading,
    /// Rendering or saving the bordered copy
    Uploading,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Downloading => write!(f, "Downloading"),
            Self::Loading => write!(f, "Loading"),
            Self::Uploading => write!(f, "Uploading"),
        }
    }
}

/// Terminal state of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    /// Original fetched and stored; nothing more to do for this action
    Downloaded,
    /// Bordered copy written
    Uploaded,
    Errored { phase: Phase, message: String },
}

impl Outcome {
    /// Status word shown in the progress column.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Skipped(_) => "SKIPPED",
            Self::Downloaded => "DOWNLOADED",
            Self::Uploaded => "UPLOADED",
            Self::Errored { .. } => "ERRORED",
        }
    }

    /// Text shown after the status word.
    pub fn detail(&self) -> String {
        match self {
            Self::Skipped(reason) => reason.to_string(),
            Self::Downloaded | Self::Uploaded => String::new(),
            Self::Errored { phase, message } => format!("{phase}: {message}"),
        }
    }
}

/// What happened to one collection during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub title: SanitizedTitle,
    /// The poster was fetched from the catalog during this run
    pub downloaded: bool,
    pub outcome: Outcome,
}

/// Totals for a run, folded from item reports.
///
/// Every item lands in exactly one bucket for its action:
///
/// - download: `skipped + downloaded + errored == collections`
/// - upload: `skipped + modified + errored == collections`
/// - list: `skipped == collections`
///
/// `modified` counts bordered copies written, so it equals `uploaded` and is
/// zero for download and list runs. `downloaded` counts fetches, so during
/// an upload run it overlaps the other buckets: an upload that fails after
/// a successful fetch still counts one download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub collections: usize,
    pub skipped: usize,
    pub modified: usize,
    pub downloaded: usize,
    pub uploaded: usize,
    pub errored: usize,
}

impl RunCounters {
    pub fn record(&mut self, report: &ItemReport) {
        self.collections += 1;
        if report.downloaded {
            self.downloaded += 1;
        }
        match report.outcome {
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Downloaded => {}
            Outcome::Uploaded => {
                self.modified += 1;
                self.uploaded += 1;
            }
            Outcome::Errored { .. } => self.errored += 1,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errored > 0
    }
}

impl<'a> FromIterator<&'a ItemReport> for RunCounters {
    fn from_iter<I: IntoIterator<Item = &'a ItemReport>>(iter: I) -> Self {
        let mut counters = Self::default();
        for report in iter {
            counters.record(report);
        }
        counters
    }
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
