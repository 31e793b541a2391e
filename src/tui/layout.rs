//! Window-relative layout.
//!
//! Every function here is a pure function of the window size. Screens call
//! them from `update_positions` and cache the result until the next resize,
//! so resizing back to a previous size always reproduces the same bounds.

use ratatui::layout::{Constraint, Layout, Rect, Size};

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowSize {
    pub width: u16,
    pub height: u16,
}

impl WindowSize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// The whole window as a rectangle at the origin.
    pub const fn area(self) -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }

    /// Whether the window is at least `min` in both dimensions.
    pub const fn fits(self, min: Self) -> bool {
        self.width >= min.width && self.height >= min.height
    }
}

impl From<Size> for WindowSize {
    fn from(size: Size) -> Self {
        Self::new(size.width, size.height)
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rectangle of at most `width` x `height` centred in `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Whether the cell at (`column`, `row`) lies inside `rect`.
pub const fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && row >= rect.y
        && (column as u32) < rect.x as u32 + rect.width as u32
        && (row as u32) < rect.y as u32 + rect.height as u32
}

/// Top row, owned by the persistent overlay.
pub const fn header_area(window: WindowSize) -> Rect {
    Rect {
        x: 0,
        y: 0,
        width: window.width,
        height: if window.height > 0 { 1 } else { 0 },
    }
}

/// Bottom row, owned by the overlay's status bar.
pub const fn status_area(window: WindowSize) -> Rect {
    Rect {
        x: 0,
        y: window.height.saturating_sub(1),
        width: window.width,
        height: if window.height > 1 { 1 } else { 0 },
    }
}

/// Everything between the header and the status bar.
pub const fn content_area(window: WindowSize) -> Rect {
    Rect {
        x: 0,
        y: if window.height > 0 { 1 } else { 0 },
        width: window.width,
        height: window.height.saturating_sub(2),
    }
}

/// Bounds for a modal message box.
pub fn dialog_bounds(window: WindowSize) -> Rect {
    let width = window.width.saturating_sub(4).min(56);
    centered_rect(width, 8, window.area())
}

// ============================================================================
// Screen layouts
// ============================================================================

/// Bounds of a data-entry screen: input column on the left, info and
/// listing panels on the right, a button bar along the bottom.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormLayout {
    pub title: Rect,
    pub fields: Vec<Rect>,
    pub buttons: Vec<Rect>,
    pub info: Rect,
    pub table: Rect,
    pub dialog: Rect,
}

impl FormLayout {
    /// Field bounds by position, or an empty rectangle past the end.
    pub fn field(&self, index: usize) -> Rect {
        self.fields.get(index).copied().unwrap_or_default()
    }

    pub fn button(&self, index: usize) -> Rect {
        self.buttons.get(index).copied().unwrap_or_default()
    }
}

/// Compute a [`FormLayout`] with `fields` input rows and `buttons` buttons.
pub fn form_layout(window: WindowSize, fields: usize, buttons: usize) -> FormLayout {
    let content = content_area(window);
    let [title, main, bar] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(content);
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(main);

    let rows = Layout::vertical(
        std::iter::repeat(Constraint::Length(3))
            .take(fields)
            .chain(std::iter::once(Constraint::Min(0))),
    )
    .split(left);

    let [info, table] = Layout::vertical([Constraint::Length(7), Constraint::Min(0)]).areas(right);

    FormLayout {
        title,
        fields: rows.iter().take(fields).copied().collect(),
        buttons: split_evenly(bar, buttons),
        info,
        table,
        dialog: dialog_bounds(window),
    }
}

/// Bounds of the main menu: a centred column of buttons and a summary line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuLayout {
    pub title: Rect,
    pub buttons: Vec<Rect>,
    pub summary: Rect,
    pub dialog: Rect,
}

impl MenuLayout {
    pub fn button(&self, index: usize) -> Rect {
        self.buttons.get(index).copied().unwrap_or_default()
    }
}

pub fn menu_layout(window: WindowSize, buttons: usize) -> MenuLayout {
    let content = content_area(window);
    let column = centered_rect(32, menu_height(buttons), content);
    let [title, list, summary] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(2),
    ])
    .areas(column);

    let rows = Layout::vertical(std::iter::repeat(Constraint::Length(3)).take(buttons)).split(list);

    MenuLayout {
        title,
        buttons: rows.to_vec(),
        summary,
        dialog: dialog_bounds(window),
    }
}

/// Bounds of the persistent overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayLayout {
    pub session: Rect,
    pub style: Rect,
    pub logout: Rect,
    pub status: Rect,
}

pub fn overlay_layout(window: WindowSize) -> OverlayLayout {
    let [session, style, logout] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(18),
        Constraint::Length(10),
    ])
    .areas(header_area(window));

    OverlayLayout {
        session,
        style,
        logout,
        status: status_area(window),
    }
}

/// Rows needed by a menu column: three per button plus title and summary.
fn menu_height(buttons: usize) -> u16 {
    u16::try_from(buttons)
        .unwrap_or(u16::MAX)
        .saturating_mul(3)
        .saturating_add(4)
}

fn split_evenly(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let ratio = u32::try_from(count).unwrap_or(u32::MAX);
    Layout::horizontal(std::iter::repeat(Constraint::Ratio(1, ratio)).take(count))
        .split(area)
        .to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_rows() {
        let window = WindowSize::new(80, 24);
        assert_eq!(header_area(window), Rect::new(0, 0, 80, 1));
        assert_eq!(status_area(window), Rect::new(0, 23, 80, 1));
        assert_eq!(content_area(window), Rect::new(0, 1, 80, 22));
    }

    #[test]
    fn test_degenerate_window() {
        let window = WindowSize::new(0, 0);
        assert_eq!(content_area(window).height, 0);
        assert_eq!(form_layout(window, 4, 6).fields.len(), 4);
    }

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(40, 40, area), area);
    }

    #[test]
    fn test_hit() {
        let rect = Rect::new(2, 2, 3, 1);
        assert!(hit(rect, 2, 2));
        assert!(hit(rect, 4, 2));
        assert!(!hit(rect, 5, 2));
        assert!(!hit(rect, 2, 3));
    }

    #[test]
    fn test_form_layout_is_pure() {
        let a = form_layout(WindowSize::new(100, 30), 5, 6);
        let _ = form_layout(WindowSize::new(61, 20), 5, 6);
        let b = form_layout(WindowSize::new(100, 30), 5, 6);
        assert_eq!(a, b);
        assert_eq!(a.buttons.len(), 6);
        assert!(a.fields.iter().all(|r| r.height == 3));
    }

    #[test]
    fn test_buttons_fill_bar() {
        let layout = form_layout(WindowSize::new(60, 20), 2, 2);
        let total: u16 = layout.buttons.iter().map(|r| r.width).sum();
        assert_eq!(total, 60);
    }

    #[test]
    fn test_menu_height_saturates() {
        assert_eq!(menu_height(5), 19);
        assert_eq!(menu_height(21_844), u16::MAX);
        assert_eq!(menu_height(usize::MAX), u16::MAX);
    }

    #[test]
    fn test_overlay_layout_right_aligned() {
        let layout = overlay_layout(WindowSize::new(80, 24));
        assert_eq!(layout.logout.x + layout.logout.width, 80);
        assert_eq!(layout.status.y, 23);
    }
}
