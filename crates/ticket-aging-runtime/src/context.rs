//! Display helpers for CLI output: color resolution, relative time, text fitting.

use chrono::{DateTime, Utc};

/// Resolve --color flag to bool.
pub fn resolve_color(color: &str) -> bool {
    use std::io::IsTerminal;
    match color {
        "always" => true,
        "never" => false,
        _ => std::io::stdout().is_terminal(),
    }
}

/// Relative-time helper: seconds -> human string. Timestamps in the future
/// read as "just now".
pub fn relative_time(seconds: i64) -> String {
    let s = seconds.max(0).unsigned_abs();
    if s < 60 {
        "just now".to_string()
    } else if s < 3600 {
        format!("{}m ago", s / 60)
    } else if s < 86400 {
        format!("{}h ago", s / 3600)
    } else if s < 86400 * 30 {
        format!("{}d ago", s / 86400)
    } else {
        format!("{}w ago", s / (86400 * 7))
    }
}

/// "as of 3h ago" suffix for a snapshot timestamp; empty when unknown.
pub fn as_of(generated_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    generated_at
        .map(|at| format!("as of {}", relative_time((now - at).num_seconds())))
        .unwrap_or_default()
}

/// Right-truncate to `max_len` characters, appending `…` if truncated.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}\u{2026}")
    }
}

/// Pad or center `text` to `width` display characters.
pub fn fit(text: &str, width: usize, left: bool) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let pad = width - len;
    if left {
        format!("{text}{}", " ".repeat(pad))
    } else {
        let before = pad / 2;
        format!("{}{text}{}", " ".repeat(before), " ".repeat(pad - before))
    }
}

/// Parse a theme color (`#rrggbb` or a basic color name) into RGB.
pub fn parse_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let rgb = u32::from_str_radix(hex, 16).ok()?;
        return Some(((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8));
    }
    match color.to_ascii_lowercase().as_str() {
        "black" => Some((0, 0, 0)),
        "white" => Some((255, 255, 255)),
        "red" => Some((205, 49, 49)),
        "green" => Some((13, 188, 121)),
        "yellow" => Some((229, 229, 16)),
        "blue" => Some((36, 114, 200)),
        "magenta" => Some((188, 63, 188)),
        "cyan" => Some((17, 168, 205)),
        "gray" | "grey" => Some((128, 128, 128)),
        _ => None,
    }
}

/// Wrap `text` in a 24-bit ANSI foreground color; unparseable colors leave
/// the text plain.
pub fn ansi_fg(text: &str, color: &str) -> String {
    match parse_rgb(color) {
        Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
        None => text.to_string(),
    }
}
