use std::io::Write;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use poster_border_catalog::{
    CatalogConfig, CatalogFileConfig, ConfigSource, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_HEADER,
    PlexClient,
};

use crate::error::CliError;

pub(crate) fn mask_value(s: &str) -> String {
    if s.chars().count() <= 2 {
        "****".to_string()
    } else {
        format!("{}****", s.chars().take(2).collect::<String>())
    }
}

/// Show current settings and their sources.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = poster_border_catalog::config_path();
    let sources = poster_border_catalog::config_sources();
    let file = poster_border_catalog::file_config().unwrap_or_default();

    log::info!(
        "{}",
        "Plex Connection Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    log::info!("");

    let get_value = |source: &ConfigSource,
                     from_file: Option<String>,
                     default: Option<String>,
                     is_secret: bool|
     -> Option<String> {
        let value = match source {
            ConfigSource::Missing => None,
            ConfigSource::Default => default,
            ConfigSource::EnvVar(var) => std::env::var(var).ok(),
            ConfigSource::ConfigFile => from_file,
        }?;
        Some(if is_secret { mask_value(&value) } else { value })
    };

    let fields: [(&str, &ConfigSource, Option<String>); 4] = [
        (
            "base_url",
            &sources.base_url,
            get_value(&sources.base_url, file.base_url.clone(), None, false),
        ),
        (
            "token",
            &sources.token,
            get_value(&sources.token, file.token.clone(), None, true),
        ),
        (
            "token_header",
            &sources.token_header,
            get_value(
                &sources.token_header,
                file.token_header.clone(),
                Some(DEFAULT_TOKEN_HEADER.to_string()),
                false,
            ),
        ),
        (
            "timeout_secs",
            &sources.timeout_secs,
            get_value(
                &sources.timeout_secs,
                file.timeout_secs.map(|t| t.to_string()),
                Some(DEFAULT_TIMEOUT_SECS.to_string()),
                false,
            ),
        ),
    ];

    for (name, source, value) in fields {
        let source_str = format!("({})", source);
        let label = format!("{}:", name);
        match value {
            Some(v) => log::info!(
                "  {} {} {}",
                label.if_supports_color(Stdout, |t| t.cyan()),
                v,
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            ),
            None => log::info!(
                "  {} {} {}",
                label.if_supports_color(Stdout, |t| t.cyan()),
                "not set".if_supports_color(Stdout, |t| t.yellow()),
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            ),
        }
    }
    Ok(())
}

fn read_line(prompt: &str, default: Option<&str>, required: bool) -> Result<Option<String>, CliError> {
    loop {
        match default {
            Some(def) => print!("  {} [{}]: ", prompt, def),
            None => print!("  {}: ", prompt),
        }
        std::io::stdout().flush()?;

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input)? == 0 {
            return Err(CliError::usage("Setup aborted (end of input)"));
        }
        let trimmed = input.trim();

        if trimmed.is_empty() {
            if let Some(def) = default {
                return Ok(Some(def.to_string()));
            }
            if required {
                println!(
                    "    {}",
                    "This field is required.".if_supports_color(Stdout, |t| t.yellow()),
                );
                continue;
            }
            return Ok(None);
        }
        return Ok(Some(trimmed.to_string()));
    }
}

/// Interactively set up the connection settings.
pub(crate) fn run_config_setup() -> Result<(), CliError> {
    println!(
        "{}",
        "Plex Connection Setup".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    let existing = poster_border_catalog::file_config().unwrap_or_default();

    let base_url = read_line("Server URL", existing.base_url.as_deref(), true)?;

    // Keep the stored token unless a new one is typed
    let masked = existing.token.as_deref().map(mask_value);
    let token = match read_line("Token", masked.as_deref(), true)? {
        Some(t) if Some(&t) == masked.as_ref() => existing.token.clone(),
        other => other,
    };

    println!();
    println!(
        "  {}",
        "Advanced (press Enter to keep the default):".if_supports_color(Stdout, |t| t.dimmed()),
    );
    let token_header = read_line(
        "Token header",
        Some(existing.token_header.as_deref().unwrap_or(DEFAULT_TOKEN_HEADER)),
        false,
    )?;
    let default_timeout = existing
        .timeout_secs
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
        .to_string();
    let timeout = read_line("Timeout (seconds)", Some(&default_timeout), false)?;
    let timeout_secs = match timeout {
        Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
            CliError::usage(format!("Timeout must be a whole number of seconds, got \"{raw}\""))
        })?),
        None => None,
    };

    let entered = CatalogFileConfig {
        base_url,
        token,
        token_header,
        timeout_secs,
    };
    let config = CatalogConfig::resolve(|_| None, Some(&entered))
        .map_err(|e| CliError::config(e.to_string()))?;

    let path = poster_border_catalog::save_to_file(&config)?;
    println!();
    println!(
        "{} Settings saved to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

/// Test the settings against the Plex server.
pub(crate) fn run_config_test(quiet: bool) -> Result<(), CliError> {
    let config = CatalogConfig::load().map_err(|e| {
        log::warn!("Run 'poster-border config setup' to configure the Plex connection.");
        CliError::config(e.to_string())
    })?;

    log::info!("Testing connection to {}...", config.base_url);

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("/-\\|"));
        }
        pb.set_message("Connecting...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let result = PlexClient::new(&config).and_then(|client| client.list_sections());
    pb.finish_and_clear();

    let sections = result.map_err(|e| {
        log::warn!(
            "{} Connection failed",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
        );
        CliError::from(e)
    })?;

    log::info!(
        "{} Connected!",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
    );
    log::info!("");
    if sections.is_empty() {
        log::info!("  No library sections found.");
    } else {
        log::info!("  Libraries:");
        for section in &sections {
            log::info!(
                "    {} {}",
                section.title,
                format!("({})", section.kind).if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
    Ok(())
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let path = poster_border_catalog::config_path()
        .ok_or_else(|| CliError::config("Could not determine config directory"))?;
    log::info!("{}", path.display());
    Ok(())
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;
