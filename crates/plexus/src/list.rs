// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `plexus list` command implementation.
//!
//! Builds a context from the loaded configuration and prints every plugin
//! the plugin service knows, optionally narrowed to one capability.

use std::io::IsTerminal;

use plexus::Context;
use plexus_config::PlexusConfig;
use plexus_core::PlexusError;
use plexus_plugin::PluginSummary;

/// Run the `plexus list` command.
pub fn run_list(
    config: &PlexusConfig,
    capability: Option<&str>,
    json: bool,
    plain: bool,
) -> Result<(), PlexusError> {
    let context = Context::new(config.clone());
    let summaries = summaries(&context, capability);

    if json {
        let out = serde_json::to_string_pretty(&summaries)
            .map_err(|e| PlexusError::Internal(format!("failed to encode plugin list: {e}")))?;
        println!("{out}");
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print!("{}", render_text(context.name(), &summaries, use_color));
    }
    context.dispose();
    Ok(())
}

/// Summaries of known plugins, filtered by capability short or full name.
pub fn summaries(context: &Context, capability: Option<&str>) -> Vec<PluginSummary> {
    context
        .plugins()
        .plugins()
        .iter()
        .filter(|d| match capability {
            Some(wanted) => {
                let key = d.capability();
                key.short_name() == wanted || key.name() == wanted
            }
            None => true,
        })
        .map(|d| d.summary())
        .collect()
}

pub fn render_text(context_name: &str, summaries: &[PluginSummary], use_color: bool) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "  {context_name}: {} plugin(s)", summaries.len());
    let _ = writeln!(out, "  {}", "-".repeat(35));
    if summaries.is_empty() {
        let _ = writeln!(out, "    (none)");
    }
    for summary in summaries {
        let name = if use_color {
            use colored::Colorize;
            summary.name.bold().to_string()
        } else {
            summary.name.clone()
        };
        let _ = writeln!(out, "    {name}");
        let _ = writeln!(out, "      class:      {}", summary.class);
        let _ = writeln!(out, "      capability: {}", summary.capability);
        let _ = writeln!(out, "      origin:     {}", summary.origin);
    }
    let _ = writeln!(out);
    out
}
