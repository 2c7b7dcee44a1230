//! Reusable rendering helpers shared by screens.

pub mod console;
pub mod status_indicator;

use ratatui::layout::Rect;

/// Rect of at most `width` x `height` centred in `area`.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
