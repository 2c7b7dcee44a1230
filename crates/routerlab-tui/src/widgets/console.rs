//! Activity console: the tail of the lab's log, newest line at the bottom.

use std::collections::VecDeque;

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use routerlab_core::LogLine;

use crate::theme;

pub fn render_console(frame: &mut Frame, area: Rect, lines: &VecDeque<LogLine>) {
    let block = Block::default()
        .title(" Console ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible = usize::from(inner.height);
    let skip = lines.len().saturating_sub(visible);
    let text: Vec<Line> = lines
        .iter()
        .skip(skip)
        .map(|line| {
            Line::from(vec![
                Span::styled(
                    line.timestamp.format("%H:%M:%S ").to_string(),
                    theme::timestamp(),
                ),
                Span::styled(line.message.clone(), theme::body_text()),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(text), inner);
}
