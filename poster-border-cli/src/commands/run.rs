use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use poster_border_catalog::{CatalogConfig, PlexClient};
use poster_border_lib::util::normalize_path;
use poster_border_lib::{
    Action, FsAssetCache, ItemReport, Outcome, PipelineEvent, PipelineOptions, RunCounters,
};
use poster_border_render::BorderStyle;

use crate::cli_types::RunArgs;
use crate::error::CliError;

const TITLE_WIDTH: usize = 50;
const STATUS_WIDTH: usize = 15;
const RULE_WIDTH: usize = 100;

/// How a completed run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunStatus {
    Success,
    /// The loop finished but at least one item errored
    ItemErrors,
}

/// Process every collection of the requested library.
pub(crate) fn run_collections(args: RunArgs, quiet: bool) -> Result<RunStatus, CliError> {
    let library_name = args
        .library_name
        .clone()
        .ok_or_else(|| CliError::usage("--library-name is required"))?;
    let asset_directory = args
        .asset_directory
        .clone()
        .ok_or_else(|| CliError::usage("--asset-directory is required"))?;

    print_arguments(&args, &library_name, &asset_directory);

    let border = BorderStyle {
        outer_percent: args.outer_border_percent,
        inner_percent: args.inner_border_percent,
        outer_color: args.outer_border_color,
        inner_color: args.inner_border_color,
    };
    border.validate()?;

    let options = PipelineOptions {
        action: args.action.into(),
        border,
        force: args.force,
        limit: args.limit,
    };

    let config = CatalogConfig::load().map_err(|e| {
        log::warn!("Run 'poster-border config setup' to configure the Plex connection.");
        CliError::config(e.to_string())
    })?;
    log::debug!("Catalog server: {}", config.base_url);
    let client = PlexClient::new(&config)?;

    let asset_dir = normalize_path(&asset_directory);
    let cache = FsAssetCache::new(&asset_dir);

    let pb = spinner(quiet);
    pb.set_message(format!("Fetching collections of \"{}\"...", library_name));

    let handle = |event: PipelineEvent| on_event(&pb, event);
    let result = poster_border_lib::run(&client, &library_name, &cache, &options, &handle);
    pb.finish_and_clear();
    let summary = result?;

    print_summary(&summary.counters);

    if summary.counters.has_errors() {
        Ok(RunStatus::ItemErrors)
    } else {
        Ok(RunStatus::Success)
    }
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
        pb.set_style(style.tick_chars("/-\\|"));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn on_event(pb: &ProgressBar, event: PipelineEvent) {
    match event {
        PipelineEvent::Listed { library, total } => {
            log::debug!("{} collection(s) to process in \"{}\"", total, library);
            pb.suspend(|| {
                log::info!("Processing collections:");
                log::info!("{}", "_".repeat(RULE_WIDTH));
            });
        }
        PipelineEvent::Started {
            title,
            index,
            total,
        } => {
            pb.set_message(format!("[{}/{}] {}", index + 1, total, title));
        }
        PipelineEvent::Downloading { title } => {
            pb.set_message(format!(
                "{} {}",
                title,
                "downloading...".if_supports_color(Stdout, |t| t.dimmed())
            ));
        }
        PipelineEvent::Uploading { title } => {
            pb.set_message(format!(
                "{} {}",
                title,
                "adding border...".if_supports_color(Stdout, |t| t.dimmed())
            ));
        }
        PipelineEvent::Finished(report) => {
            pb.suspend(|| log_item(&report));
        }
    }
}

fn log_item(report: &ItemReport) {
    let (title, status, detail) = item_columns(report);
    match &report.outcome {
        Outcome::Skipped(_) => log::info!(
            "{}{}{}",
            title,
            status.if_supports_color(Stdout, |t| t.dimmed()),
            detail.if_supports_color(Stdout, |t| t.dimmed()),
        ),
        Outcome::Downloaded | Outcome::Uploaded => log::info!(
            "{}{}{}",
            title,
            status.if_supports_color(Stdout, |t| t.green()),
            detail,
        ),
        Outcome::Errored { .. } => log::warn!(
            "{}{}{}",
            title,
            status.if_supports_color(Stdout, |t| t.red()),
            detail,
        ),
    }
}

/// Padded title and status columns plus the free-form detail.
pub(crate) fn item_columns(report: &ItemReport) -> (String, String, String) {
    (
        format!("{:<width$}", report.title.as_str(), width = TITLE_WIDTH),
        format!("{:<width$}", report.outcome.status(), width = STATUS_WIDTH),
        report.outcome.detail(),
    )
}

fn print_arguments(args: &RunArgs, library_name: &str, asset_directory: &Path) {
    let action: Action = args.action.into();
    log::info!("{}", "Script Arguments:".if_supports_color(Stdout, |t| t.bold()));
    log::info!("  Action: {}", action);
    log::info!("  Library Name: {}", library_name);
    log::info!("  Asset Directory: {}", asset_directory.display());
    log::info!("  Outer Border Percent: {:?}", args.outer_border_percent);
    log::info!("  Inner Border Percent: {:?}", args.inner_border_percent);
    log::info!("  Outer Border Color: {}", args.outer_border_color);
    log::info!("  Inner Border Color: {}", args.inner_border_color);
    if args.force {
        log::info!(
            "  {}",
            "Force: cached posters are ignored".if_supports_color(Stdout, |t| t.dimmed())
        );
    }
    if let Some(n) = args.limit {
        log::info!(
            "  {}",
            format!("Limit: {} collections", n).if_supports_color(Stdout, |t| t.dimmed())
        );
    }
    log::info!("");
}

/// Lines of the end-of-run totals block.
pub(crate) fn summary_lines(counters: &RunCounters) -> Vec<String> {
    vec![
        "Total Counts:".to_string(),
        format!("  Collections: {}", counters.collections),
        format!("    Skipped: {}", counters.skipped),
        format!("    Modified: {}", counters.modified),
        format!("      Downloaded: {}", counters.downloaded),
        format!("      Uploaded: {}", counters.uploaded),
        format!("    Errors: {}", counters.errored),
    ]
}

fn print_summary(counters: &RunCounters) {
    log::info!("");
    log::info!("{}", "_".repeat(RULE_WIDTH));
    log::info!("");
    for line in summary_lines(counters) {
        if line.trim_start().starts_with("Errors") && counters.has_errors() {
            log::info!("{}", line.if_supports_color(Stdout, |t| t.red()));
        } else {
            log::info!("{}", line);
        }
    }
    log::info!("");
    log::info!("{}", "Done".if_supports_color(Stdout, |t| t.bold()));
}

#[cfg(test)]
#[path = "../tests/run_tests.rs"]
mod tests;
