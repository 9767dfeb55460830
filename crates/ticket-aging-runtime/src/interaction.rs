//! Small interaction state machines used by the TUI: row hover, double-click
//! detection and close-control visibility.

use std::time::{Duration, Instant};

/// Two clicks closer together than this count as a double-click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// Single hovered row; purely visual.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HoverState {
    row: Option<usize>,
}

impl HoverState {
    pub fn enter(&mut self, row: usize) {
        self.row = Some(row);
    }

    pub fn leave(&mut self) {
        self.row = None;
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn is_hovered(&self, row: usize) -> bool {
        self.row == Some(row)
    }

    /// Move the hover by `delta` rows, clamped to `len`. Starts at the first
    /// row when nothing is hovered.
    pub fn step(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.row = None;
            return;
        }
        let next = match self.row {
            None => 0,
            Some(row) => row.saturating_add_signed(delta).min(len - 1),
        };
        self.row = Some(next);
    }

    /// Drop the hover if the table shrank underneath it.
    pub fn clamp(&mut self, len: usize) {
        if self.row.is_some_and(|row| row >= len) {
            self.row = len.checked_sub(1);
        }
    }
}

/// Detects two left clicks on the same cell within [`DOUBLE_CLICK_WINDOW`].
#[derive(Debug, Default)]
pub struct DoubleClickDetector {
    last: Option<(Instant, u16, u16)>,
}

impl DoubleClickDetector {
    /// Record a click; returns true when it completes a double-click.
    pub fn click(&mut self, at: Instant, column: u16, row: u16) -> bool {
        let double = matches!(
            self.last,
            Some((prev, c, r)) if c == column && r == row && at.duration_since(prev) <= DOUBLE_CLICK_WINDOW
        );
        self.last = if double { None } else { Some((at, column, row)) };
        double
    }
}

/// The close control shows only when a close callback exists and the age
/// dropdown is not covering it.
pub fn close_control_visible(dropdown_open: bool, has_on_close: bool) -> bool {
    has_on_close && !dropdown_open
}

/// First visible row so that `selected` stays inside a window of `height`.
pub fn scroll_offset(selected: Option<usize>, offset: usize, height: usize) -> usize {
    let Some(selected) = selected else {
        return offset;
    };
    if height == 0 {
        return selected;
    }
    if selected < offset {
        selected
    } else if selected >= offset + height {
        selected + 1 - height
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_enter_and_leave() {
        let mut hover = HoverState::default();
        assert_eq!(hover.row(), None);
        hover.enter(2);
        assert!(hover.is_hovered(2));
        assert!(!hover.is_hovered(1));
        hover.leave();
        assert_eq!(hover.row(), None);
    }

    #[test]
    fn hover_step_clamps() {
        let mut hover = HoverState::default();
        hover.step(1, 3);
        assert_eq!(hover.row(), Some(0));
        hover.step(5, 3);
        assert_eq!(hover.row(), Some(2));
        hover.step(-10, 3);
        assert_eq!(hover.row(), Some(0));
        hover.step(1, 0);
        assert_eq!(hover.row(), None);
    }

    #[test]
    fn hover_clamp_after_shrink() {
        let mut hover = HoverState::default();
        hover.enter(4);
        hover.clamp(2);
        assert_eq!(hover.row(), Some(1));
        hover.clamp(0);
        assert_eq!(hover.row(), None);
    }

    #[test]
    fn double_click_within_window() {
        let mut detector = DoubleClickDetector::default();
        let t0 = Instant::now();
        assert!(!detector.click(t0, 5, 5));
        assert!(detector.click(t0 + Duration::from_millis(200), 5, 5));
        // A third click starts a new pair.
        assert!(!detector.click(t0 + Duration::from_millis(300), 5, 5));
    }

    #[test]
    fn slow_or_moved_clicks_are_single() {
        let mut detector = DoubleClickDetector::default();
        let t0 = Instant::now();
        assert!(!detector.click(t0, 1, 1));
        assert!(!detector.click(t0 + Duration::from_millis(900), 1, 1));
        assert!(!detector.click(t0 + Duration::from_millis(950), 2, 1));
    }

    #[test]
    fn close_control_hidden_while_dropdown_open() {
        assert!(close_control_visible(false, true));
        assert!(!close_control_visible(true, true));
        assert!(!close_control_visible(false, false));
    }

    #[test]
    fn scroll_offset_follows_selection() {
        assert_eq!(scroll_offset(None, 3, 5), 3);
        assert_eq!(scroll_offset(Some(1), 3, 5), 1);
        assert_eq!(scroll_offset(Some(9), 0, 5), 5);
        assert_eq!(scroll_offset(Some(4), 2, 5), 2);
    }
}
