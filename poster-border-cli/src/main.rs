//! poster-border CLI
//!
//! Downloads Plex collection posters into an asset directory and writes
//! copies framed with a double border.

mod cli_types;
mod commands;
mod error;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands, ConfigAction};
use commands::run::RunStatus;

/// Exit code when the run finished but some collections failed.
const EXIT_ITEM_ERRORS: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Setup => commands::config::run_config_setup(),
            ConfigAction::Test => commands::config::run_config_test(cli.quiet),
            ConfigAction::Path => commands::config::run_config_path(),
        }
        .map(|()| RunStatus::Success),
        None => commands::run::run_collections(cli.run, cli.quiet),
    };

    match result {
        Ok(RunStatus::Success) => ExitCode::SUCCESS,
        Ok(RunStatus::ItemErrors) => ExitCode::from(EXIT_ITEM_ERRORS),
        Err(e) => {
            log::error!(
                "{} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e
            );
            ExitCode::FAILURE
        }
    }
}
