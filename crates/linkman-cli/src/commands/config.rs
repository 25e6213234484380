//! Config command handlers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use linkman_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "database": config.database_path(),
                    "fetch_titles": config.fetch_titles,
                    "fetch_timeout_secs": config.fetch_timeout_secs,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.database_path().display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:           {}", config.data_dir.display());
            println!("  fetch_titles:       {}", config.fetch_titles);
            println!("  fetch_timeout_secs: {}", config.fetch_timeout_secs);
            println!(
                "  log_file:           {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Database:    {}", config.database_path().display());
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    set_in(&save_path, &key, &value)?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Update one key in the config file at `path`
fn set_in(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_from_path(path).context("Failed to load configuration")?;

    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "fetch_titles" => {
            config.fetch_titles = value
                .parse()
                .context("Invalid value for fetch_titles. Use 'true' or 'false'.")?;
        }
        "fetch_timeout_secs" => {
            config.fetch_timeout_secs = value
                .parse()
                .context("Invalid value for fetch_timeout_secs. Use a number of seconds.")?;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, fetch_titles, fetch_timeout_secs, log_file",
                key
            );
        }
    }

    config
        .save_to_path(path)
        .context("Failed to save configuration")
}
