//! Lab palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

use routerlab_core::{Indicator, NodeTone};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ACCENT_PURPLE: Color = Color::Rgb(189, 147, 249); // #bd93f9
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const AMBER: Color = Color::Rgb(255, 184, 108); // #ffb86c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 85, 85); // #ff5555
pub const CONTROLLER_BLUE: Color = Color::Rgb(98, 160, 255); // #62a0ff

// ── Neutrals ──────────────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Status colours ────────────────────────────────────────────────────

/// Dot colour for a router card. `None` means the dot is drawn uncoloured.
pub fn indicator_color(indicator: Indicator) -> Option<Color> {
    match indicator {
        Indicator::Green => Some(SUCCESS_GREEN),
        Indicator::Red => Some(ERROR_RED),
        Indicator::Neutral => None,
    }
}

pub fn indicator_style(indicator: Indicator) -> Style {
    indicator_color(indicator).map_or_else(Style::default, |c| Style::default().fg(c))
}

/// Node colour on the topology canvas.
pub fn tone_color(tone: NodeTone) -> Color {
    match tone {
        NodeTone::Up => SUCCESS_GREEN,
        NodeTone::Down => ERROR_RED,
        NodeTone::Transitional => AMBER,
        NodeTone::Controller => CONTROLLER_BLUE,
        NodeTone::Unknown => BORDER_GRAY,
    }
}

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ACCENT_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn address() -> Style {
    Style::default().fg(CORAL)
}

pub fn body_text() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Action button on an unselected card, or an unfocused button.
pub fn button() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// The button Enter would activate.
pub fn button_active() -> Style {
    Style::default()
        .fg(BG_DARK)
        .bg(ACCENT_PURPLE)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default()
        .fg(ACCENT_PURPLE)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn timestamp() -> Style {
    Style::default().fg(AMBER)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn overlay_background() -> Style {
    Style::default().bg(BG_DARK)
}

pub fn selected_row() -> Style {
    Style::default()
        .fg(ACCENT_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}
