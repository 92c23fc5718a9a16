//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod config_cmd;
mod fetch;
mod links;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use causelist::{SelectionCriteria, Settings};

#[derive(Parser)]
#[command(name = "causelist")]
#[command(about = "Download court cause lists from the eCourts portal")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides the default location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// The cascading form selection, as given on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct CriteriaArgs {
    /// State label (matched against the dropdown text)
    #[arg(long)]
    state: Option<String>,
    /// District label
    #[arg(long)]
    district: Option<String>,
    /// Court complex label
    #[arg(long)]
    complex: Option<String>,
    /// Court label (omit for all courts in the complex)
    #[arg(long, default_value = "")]
    court: String,
    /// Cause list date (default: today, YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,
}

impl CriteriaArgs {
    fn into_criteria(self) -> SelectionCriteria {
        let date = self.date.unwrap_or_else(today);
        SelectionCriteria::new(
            self.state.unwrap_or_default(),
            self.district.unwrap_or_default(),
            self.complex.unwrap_or_default(),
            self.court,
            date,
        )
    }
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[derive(Subcommand)]
enum Commands {
    /// Fill the cause list form, harvest document links and download them
    Fetch {
        #[command(flatten)]
        criteria: CriteriaArgs,
        /// Destination directory (default: output_dir from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List document links without downloading
    Links {
        #[command(flatten)]
        criteria: CriteriaArgs,
        /// Harvest a saved results page instead of opening the portal
        #[arg(long)]
        html: Option<PathBuf>,
        /// Base URL for resolving relative links in --html
        #[arg(long, requires = "html")]
        base: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Fetch { criteria, output } => {
            fetch::cmd_fetch(settings, criteria.into_criteria(), output).await
        }
        Commands::Links {
            criteria,
            html,
            base,
        } => match html {
            Some(file) => links::cmd_links_offline(&settings, &file, base.as_deref()).await,
            None => links::cmd_links(settings, criteria.into_criteria()).await,
        },
        Commands::Config => config_cmd::cmd_config(&settings, cli.config.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fetch_arguments() {
        let cli = Cli::parse_from([
            "causelist",
            "fetch",
            "--state",
            "Karnataka",
            "--district",
            "Bengaluru Urban",
            "--complex",
            "City Civil Court",
            "--date",
            "2024-05-01",
            "-o",
            "/tmp/lists",
        ]);

        let Commands::Fetch { criteria, output } = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(output, Some(PathBuf::from("/tmp/lists")));
        assert_eq!(
            criteria.into_criteria(),
            SelectionCriteria::new(
                "Karnataka",
                "Bengaluru Urban",
                "City Civil Court",
                "",
                "2024-05-01"
            )
        );
    }

    #[test]
    fn date_defaults_to_today() {
        let criteria = CriteriaArgs::default().into_criteria();
        assert_eq!(criteria.date, today());
        assert!(chrono::NaiveDate::parse_from_str(&criteria.date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn base_requires_html() {
        assert!(Cli::try_parse_from(["causelist", "links", "--base", "http://x/"]).is_err());
        assert!(Cli::try_parse_from([
            "causelist",
            "links",
            "--html",
            "page.html",
            "--base",
            "http://x/"
        ])
        .is_ok());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["causelist", "config", "-v", "-c", "alt.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }
}
