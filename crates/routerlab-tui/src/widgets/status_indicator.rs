//! Router status dot: green when connected, red when unauthorized.

use ratatui::text::Span;

use routerlab_core::Indicator;

use crate::theme;

pub const DOT: &str = "●";

/// Styled dot for an indicator. Neutral dots carry no colour.
pub fn indicator_span(indicator: Indicator) -> Span<'static> {
    Span::styled(DOT, theme::indicator_style(indicator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use routerlab_core::RouterStatus;

    #[test]
    fn only_exact_labels_are_coloured() {
        let fg = |s: &str| indicator_span(RouterStatus::from(s).indicator()).style.fg;
        assert_eq!(fg("connected"), Some(theme::SUCCESS_GREEN));
        assert_eq!(fg("unauthorized"), Some(theme::ERROR_RED));
        assert_eq!(fg("connected (sim)"), None);
        assert_eq!(fg("restarting (sim)"), None);
        assert_eq!(fg("pending"), None);
    }
}
