//! CLI definition using clap derive.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ticket_aging_core::{AgeBucket, Status, Variant};

#[derive(Parser)]
#[command(name = "ticket-aging", about = "Ticket-aging summary table")]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/ticket-aging/config.toml)
    #[arg(long, short = 'c', global = true, env = "TICKET_AGING_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the table once
    Table(TableOpts),
    /// Print rows as JSON
    Json(JsonOpts),
    /// Re-print the table whenever the snapshot changes
    Watch(WatchOpts),
    /// Interactive table (hover, tooltips, age dropdown)
    Tui(TuiOpts),
}

/// Selection flags shared by every command.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ViewOpts {
    /// Snapshot JSON (membersData + departmentsMap)
    pub snapshot: PathBuf,

    /// Age columns to show (sevenDays, twoWeeks, month)
    #[arg(long, value_delimiter = ',')]
    pub ages: Vec<AgeBucket>,

    /// Break counts out per status (open, hold, escalated, unassigned, inProgress)
    #[arg(long = "status", value_delimiter = ',')]
    pub statuses: Vec<Status>,

    /// Restrict to one department id
    #[arg(long)]
    pub department: Option<String>,

    /// Restrict to these agent names (with --department; repeatable)
    #[arg(long = "agent")]
    pub agents: Vec<String>,

    /// One row per department instead of per agent
    #[arg(long)]
    pub department_view: bool,

    /// Layout preset: basic, filtered, departmental
    #[arg(long)]
    pub variant: Option<Variant>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct TableOpts {
    #[command(flatten)]
    pub view: ViewOpts,

    /// Color output: auto, always, never
    #[arg(long, default_value = "auto")]
    pub color: String,

    /// Append the ticket IDs behind every non-zero age cell
    #[arg(long)]
    pub tooltips: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct JsonOpts {
    #[command(flatten)]
    pub view: ViewOpts,

    /// Include ticket-ID lists for every age cell
    #[arg(long)]
    pub tooltips: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct WatchOpts {
    #[command(flatten)]
    pub view: ViewOpts,

    /// Refresh interval in seconds
    #[arg(long, default_value_t = 5)]
    pub interval: u64,

    /// Color output: auto, always, never
    #[arg(long, default_value = "auto")]
    pub color: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct TuiOpts {
    #[command(flatten)]
    pub view: ViewOpts,

    /// How often to check the snapshot file for changes, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub reload_ms: u64,
}

/// Default config path: `$XDG_CONFIG_HOME/ticket-aging/config.toml`, falling
/// back to `~/.config/ticket-aging/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir).join("ticket-aging/config.toml"));
        }
    }
    let home = std::env::var("HOME").ok().filter(|h| !h.is_empty())?;
    Some(PathBuf::from(home).join(".config/ticket-aging/config.toml"))
}
