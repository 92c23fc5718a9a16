//! Configuration display.

use std::path::Path;

use console::style;

use causelist::config::default_config_path;
use causelist::Settings;

/// Print the effective settings as TOML.
pub fn cmd_config(settings: &Settings, explicit: Option<&Path>) -> anyhow::Result<()> {
    let source = match explicit {
        Some(path) => path.display().to_string(),
        None => match default_config_path() {
            Some(path) if path.exists() => path.display().to_string(),
            _ => "built-in defaults".to_string(),
        },
    };

    eprintln!("{} Source: {}", style("→").dim(), source);
    print!("{}", settings.to_toml()?);
    Ok(())
}
