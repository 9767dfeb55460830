//! `ticket-aging table`: print the aging table once.

use chrono::Utc;
use ticket_aging_core::{Cell, Snapshot, TableModel, Theme};

use crate::context::{ansi_fg, as_of, fit, resolve_color, truncate_text};
use crate::display::{status_indicator, status_legend};
use crate::settings::Settings;
use crate::snapshot::{ModelCache, SnapshotSource};

/// Longest name shown before truncation.
const MAX_NAME_WIDTH: usize = 32;
const COLUMN_GAP: &str = "  ";

/// Entry point for `ticket-aging table`.
pub fn cmd_table(
    settings: &Settings,
    source: &SnapshotSource,
    color: &str,
    tooltips: bool,
) -> anyhow::Result<()> {
    let use_color = resolve_color(color);
    let mut cache = ModelCache::default();
    let model = cache.get(source, &settings.config, &settings.selection)?;
    let output = format_report(
        model,
        source.snapshot(),
        &settings.config.theme,
        use_color,
        tooltips,
    );
    println!("{output}");
    Ok(())
}

/// Title line, table, legend and (optionally) the ticket-ID listing.
pub fn format_report(
    model: &TableModel,
    snapshot: &Snapshot,
    theme: &Theme,
    use_color: bool,
    tooltips: bool,
) -> String {
    let mut out = format_title(model, snapshot, theme, use_color);
    out.push('\n');
    out.push_str(&format_table(model, theme, use_color));
    if !model.statuses.is_empty() && !model.is_empty() {
        out.push('\n');
        out.push_str(&status_legend(&model.statuses));
    }
    if tooltips {
        let listing = format_tooltips(model, snapshot);
        if !listing.is_empty() {
            out.push_str("\n\n");
            out.push_str(&listing);
        }
    }
    out
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn format_title(model: &TableModel, snapshot: &Snapshot, theme: &Theme, use_color: bool) -> String {
    let title = if use_color {
        format!("\x1b[1m{}\x1b[0m", ansi_fg(&model.title, &theme.header_bg))
    } else {
        model.title.clone()
    };
    let age = as_of(snapshot.generated_at, Utc::now());
    if age.is_empty() {
        title
    } else if use_color {
        format!("{title}  \x1b[2m{age}\x1b[0m")
    } else {
        format!("{title}  {age}")
    }
}

/// Plain text of a cell plus its colored rendering.
fn render_cell(cell: &Cell, theme: &Theme, use_color: bool) -> (String, String) {
    match cell {
        Cell::Text(text) => {
            let plain = truncate_text(text, MAX_NAME_WIDTH);
            (plain.clone(), plain)
        }
        Cell::Count(n) => (n.to_string(), n.to_string()),
        Cell::Indicators(indicators) => {
            let parts: Vec<(String, String)> = indicators
                .iter()
                .map(|i| {
                    let plain = format!("{}{}", status_indicator(i.status), i.count);
                    let colored = if use_color {
                        ansi_fg(&plain, theme.status.get(i.status))
                    } else {
                        plain.clone()
                    };
                    (plain, colored)
                })
                .collect();
            let plain = parts.iter().map(|(p, _)| p.as_str()).collect::<Vec<_>>().join(" ");
            let colored = parts.iter().map(|(_, c)| c.as_str()).collect::<Vec<_>>().join(" ");
            (plain, colored)
        }
    }
}

/// Pad a possibly colored cell using the width of its plain text.
fn pad(plain: &str, colored: &str, width: usize, left: bool) -> String {
    let fitted = fit(plain, width, left);
    if plain == colored {
        fitted
    } else {
        fitted.replacen(plain, colored, 1)
    }
}

/// Header, separator and one line per row. An empty model prints its
/// empty-state message across the full table width.
pub fn format_table(model: &TableModel, theme: &Theme, use_color: bool) -> String {
    let rows: Vec<Vec<(String, String)>> = (0..model.len())
        .map(|row| {
            model
                .cells(row)
                .iter()
                .map(|cell| render_cell(cell, theme, use_color))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = model
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .filter_map(|cells| cells.get(i))
                .map(|(plain, _)| plain.chars().count())
                .chain(std::iter::once(column.label.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let total_width =
        widths.iter().sum::<usize>() + COLUMN_GAP.len() * widths.len().saturating_sub(1);

    let header = model
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| fit(column.label, *width, column.is_text()))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);

    let mut out = String::new();
    if use_color {
        out.push_str(&format!("\x1b[1m{}\x1b[0m", ansi_fg(&header, &theme.header_fg)));
    } else {
        out.push_str(&header);
    }
    out.push('\n');
    let separator = "\u{2500}".repeat(total_width);
    if use_color {
        out.push_str(&ansi_fg(&separator, &theme.border));
    } else {
        out.push_str(&separator);
    }

    if model.is_empty() {
        out.push('\n');
        out.push_str(fit(&model.empty_message, total_width, false).trim_end());
        return out;
    }

    for cells in &rows {
        out.push('\n');
        let line = cells
            .iter()
            .zip(model.columns.iter().zip(&widths))
            .map(|((plain, colored), (column, width))| pad(plain, colored, *width, column.is_text()))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        out.push_str(line.trim_end());
    }
    out
}

/// Ticket IDs behind every non-zero age cell, one line per cell (or per
/// status indicator when statuses are broken out).
pub fn format_tooltips(model: &TableModel, snapshot: &Snapshot) -> String {
    let mut lines = Vec::new();
    for row in 0..model.len() {
        let name = model.row_name(row).unwrap_or_default();
        let cells = model.cells(row);
        for col in model.age_columns() {
            let label = model.columns[col].label;
            match cells.get(col) {
                Some(Cell::Count(n)) if *n > 0 => {
                    if let Some(ids) = model.tooltip(snapshot, row, col, None) {
                        lines.push(format!("{name} \u{00b7} {label}: {ids}"));
                    }
                }
                Some(Cell::Indicators(indicators)) => {
                    for indicator in indicators.iter().filter(|i| i.count > 0) {
                        if let Some(ids) = model.tooltip(snapshot, row, col, Some(indicator.status)) {
                            lines.push(format!(
                                "{name} \u{00b7} {label} \u{00b7} {}: {ids}",
                                indicator.status.label()
                            ));
                        }
                    }
                }
                _ => {}
            }
        }
    }
    lines.join("\n")
}
