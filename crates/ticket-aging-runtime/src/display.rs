use ticket_aging_core::Status;

/// Status indicator symbols used across TUI and table output.
pub const INDICATOR_OPEN: &str = "●";
pub const INDICATOR_HOLD: &str = "◐";
pub const INDICATOR_ESCALATED: &str = "▲";
pub const INDICATOR_UNASSIGNED: &str = "○";
pub const INDICATOR_IN_PROGRESS: &str = "◆";

/// Map a ticket status to its indicator symbol.
pub fn status_indicator(status: Status) -> &'static str {
    match status {
        Status::Open => INDICATOR_OPEN,
        Status::Hold => INDICATOR_HOLD,
        Status::Escalated => INDICATOR_ESCALATED,
        Status::Unassigned => INDICATOR_UNASSIGNED,
        Status::InProgress => INDICATOR_IN_PROGRESS,
    }
}

/// Legend line for the statuses broken out in a table, e.g. `● Open  ◐ Hold`.
pub fn status_legend(statuses: &[Status]) -> String {
    statuses
        .iter()
        .map(|s| format!("{} {}", status_indicator(*s), s.label()))
        .collect::<Vec<_>>()
        .join("  ")
}
