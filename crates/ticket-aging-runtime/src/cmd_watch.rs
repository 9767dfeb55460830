//! `ticket-aging watch`: live-refresh table view.

use std::time::Duration;

use ticket_aging_core::{Snapshot, TableModel, Theme};

use crate::cmd_table::format_report;
use crate::context::resolve_color;
use crate::settings::Settings;
use crate::snapshot::{ModelCache, SnapshotSource};

/// Entry point for `ticket-aging watch`.
pub async fn cmd_watch(
    settings: &Settings,
    mut source: SnapshotSource,
    interval: u64,
    color: &str,
) -> anyhow::Result<()> {
    let use_color = resolve_color(color);
    let mut cache = ModelCache::default();

    loop {
        let reload_error = match source.reload_if_changed() {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("snapshot reload failed: {e:#}");
                Some(format!("{e:#}"))
            }
        };

        // Clear screen + cursor home
        print!("\x1b[2J\x1b[H");

        let model = cache.get(&source, &settings.config, &settings.selection)?;
        println!(
            "{}",
            format_frame(
                model,
                source.snapshot(),
                &settings.config.theme,
                use_color,
                reload_error.as_deref(),
            )
        );

        let footer = format!(
            "ticket-aging watch {} every {interval}s, Ctrl-C to quit",
            source.path().display()
        );
        if use_color {
            println!("\n\x1b[2m{footer}\x1b[0m");
        } else {
            println!("\n{footer}");
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(interval.max(1))) => {}
            _ = tokio::signal::ctrl_c() => { break; }
        }
    }

    Ok(())
}

/// One refresh: the report, plus a note when the last reload failed and the
/// previous snapshot is still on screen.
pub fn format_frame(
    model: &TableModel,
    snapshot: &Snapshot,
    theme: &Theme,
    use_color: bool,
    reload_error: Option<&str>,
) -> String {
    let mut out = format_report(model, snapshot, theme, use_color, false);
    if let Some(error) = reload_error {
        out.push_str(&format!("\n\n(showing previous snapshot: {error})"));
    }
    out
}
