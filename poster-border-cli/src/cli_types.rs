//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use poster_border_lib::Action;
use poster_border_render::BorderColor;

#[derive(Parser)]
#[command(name = "poster-border")]
#[command(about = "Download Plex collection posters and frame them with a double border", long_about = None)]
#[command(subcommand_negates_reqs = true)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Arguments for processing the collections of a library.
#[derive(Args, Clone, Debug)]
pub(crate) struct RunArgs {
    /// What to do with each collection poster
    #[arg(long, value_enum, default_value_t = ActionArg::Download)]
    pub action: ActionArg,

    /// Name of the Plex library
    #[arg(long, required = true)]
    pub library_name: Option<String>,

    /// Directory holding the originals/ and modified/ poster folders
    #[arg(long, required = true)]
    pub asset_directory: Option<PathBuf>,

    /// Outer border size as a percentage of the image width
    #[arg(long, default_value_t = 2.0)]
    pub outer_border_percent: f64,

    /// Inner border size as a percentage of the image width
    #[arg(long, default_value_t = 1.0)]
    pub inner_border_percent: f64,

    /// Outer border color (name, #rrggbb or rgb(r, g, b))
    #[arg(long, default_value = "white")]
    pub outer_border_color: BorderColor,

    /// Inner border color (name, #rrggbb or rgb(r, g, b))
    #[arg(long, default_value = "black")]
    pub inner_border_color: BorderColor,

    /// Ignore cached posters: download and render everything again
    #[arg(long)]
    pub force: bool,

    /// Maximum number of collections to process
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ActionArg {
    /// Download and crop posters into originals/
    Download,
    /// Also write bordered posters into modified/
    Upload,
    /// List collections without touching any files
    List,
}

impl From<ActionArg> for Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Download => Action::Download,
            ActionArg::Upload => Action::Upload,
            ActionArg::List => Action::List,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Manage the Plex connection settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub(crate) enum ConfigAction {
    /// Show current settings and their sources
    Show,

    /// Interactively set up the server URL and token
    Setup,

    /// Test the settings against the Plex server
    Test,

    /// Print the config file path
    Path,
}

#[cfg(test)]
#[path = "tests/cli_types_tests.rs"]
mod tests;
