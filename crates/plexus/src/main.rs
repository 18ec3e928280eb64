// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plexus - singleton plugin registry.
//!
//! Binary entry point: inspect the plugins and configuration a context sees.

mod list;
mod show_config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Plexus - singleton plugin registry.
#[derive(Parser, Debug)]
#[command(name = "plexus", version, about, long_about = None)]
struct Cli {
    /// Load this file instead of the standard configuration hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit JSON for scripting.
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every known plugin.
    List {
        /// Only plugins of this capability (short or full type name).
        #[arg(long)]
        capability: Option<String>,
    },
    /// Print the resolved configuration.
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => plexus_config::load_and_validate_path(path),
        None => plexus_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            plexus_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.context.log_level);

    let result = match cli.command {
        Commands::List { capability } => {
            list::run_list(&config, capability.as_deref(), cli.json, cli.plain)
        }
        Commands::Config => show_config::run_config(&config, cli.json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("plexus: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber; output goes to stderr.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("plexus={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use plexus::Context;
    use plexus_config::PlexusConfig;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["plexus", "list", "--json", "--capability", "Converter"]);
        assert!(cli.json);
        match cli.command {
            Commands::List { capability } => assert_eq!(capability.as_deref(), Some("Converter")),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn list_filters_by_capability() {
        let context = Context::new(PlexusConfig::default());
        let converters = list::summaries(&context, Some("Converter"));
        assert!(converters.iter().any(|s| s.name == "WideningConverter"));
        assert!(list::summaries(&context, Some("Nothing")).is_empty());
    }

    #[test]
    fn plain_listing_has_no_escape_codes() {
        let context = Context::new(PlexusConfig::default());
        let text = list::render_text(context.name(), &list::summaries(&context, None), false);
        assert!(text.contains("WideningConverter"));
        assert!(text.contains("origin:     discovered:builtin"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn config_renders_as_toml_and_json() {
        let config = PlexusConfig::default();
        let toml = show_config::render(&config, false).unwrap();
        assert!(toml.contains("[plugins]"));
        assert!(toml.contains("default_mode = \"rw\""));
        let json = show_config::render(&config, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["context"]["name"], "plexus");
    }
}
