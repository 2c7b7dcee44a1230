//! Topology screen: routers on a ring with the SDN controller in the middle,
//! and a ping selector beside it.

use std::f64::consts::{FRAC_PI_2, TAU};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use routerlab_core::{CONTROLLER_NODE, NodeTone, Topology};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

const RING_RADIUS: f64 = 1.0;
const NODE_RADIUS: f64 = 0.07;
const BOUND: f64 = 1.5;

/// Ring coordinates for `count` routers, first one at twelve o'clock,
/// continuing clockwise.
pub fn ring_positions(count: usize) -> Vec<(f64, f64)> {
    (0..count)
        .map(|i| {
            let angle = FRAC_PI_2 - TAU * i as f64 / count as f64;
            (RING_RADIUS * angle.cos(), RING_RADIUS * angle.sin())
        })
        .collect()
}

pub struct TopologyView {
    focused: bool,
    topology: Topology,
    ping_from: usize,
    ping_to: usize,
}

impl TopologyView {
    pub fn new() -> Self {
        Self {
            focused: false,
            topology: Topology::default(),
            ping_from: 0,
            ping_to: 1,
        }
    }

    fn router_ids(&self) -> Vec<&str> {
        self.topology
            .nodes
            .iter()
            .filter(|n| n.tone != NodeTone::Controller)
            .map(|n| n.id.as_str())
            .collect()
    }

    fn position_of(&self, id: &str) -> Option<(f64, f64)> {
        if id == CONTROLLER_NODE {
            return Some((0.0, 0.0));
        }
        let ids = self.router_ids();
        let idx = ids.iter().position(|r| *r == id)?;
        ring_positions(ids.len()).get(idx).copied()
    }

    fn ping_pair(&self) -> Option<(String, String)> {
        let ids = self.router_ids();
        let from = ids.get(self.ping_from)?;
        let to = ids.get(self.ping_to)?;
        Some(((*from).to_owned(), (*to).to_owned()))
    }

    fn cycle(idx: usize, len: usize) -> usize {
        if len == 0 { 0 } else { (idx + 1) % len }
    }

    fn paint(&self, ctx: &mut Context<'_>) {
        for edge in &self.topology.edges {
            let (Some((x1, y1)), Some((x2, y2))) =
                (self.position_of(&edge.from), self.position_of(&edge.to))
            else {
                continue;
            };
            let color = if edge.from == CONTROLLER_NODE {
                theme::CONTROLLER_BLUE
            } else {
                theme::BORDER_GRAY
            };
            ctx.draw(&CanvasLine {
                x1,
                y1,
                x2,
                y2,
                color,
            });
        }

        ctx.layer();

        for node in &self.topology.nodes {
            let Some((x, y)) = self.position_of(&node.id) else {
                continue;
            };
            let color = theme::tone_color(node.tone);
            ctx.draw(&Circle {
                x,
                y,
                radius: NODE_RADIUS,
                color,
            });
            ctx.print(
                x + NODE_RADIUS * 1.5,
                y,
                Span::styled(
                    node.id.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            );
        }
    }

    fn render_side_panel(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Ping ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (from, to) = self
            .ping_pair()
            .unwrap_or_else(|| ("-".to_owned(), "-".to_owned()));

        let legend = |tone: NodeTone, label: &'static str| {
            Line::from(vec![
                Span::styled(" ● ", Style::default().fg(theme::tone_color(tone))),
                Span::styled(label, theme::body_text()),
            ])
        };

        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(" From  ", theme::key_hint()),
                Span::styled(from, theme::selected_row()),
            ]),
            Line::from(vec![
                Span::styled(" To    ", theme::key_hint()),
                Span::styled(to, theme::selected_row()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(" f/t ", theme::key_hint_key()),
                Span::styled("cycle  ", theme::key_hint()),
                Span::styled("p ", theme::key_hint_key()),
                Span::styled("ping", theme::key_hint()),
            ]),
            Line::from(""),
            legend(NodeTone::Up, "connected"),
            legend(NodeTone::Down, "unauthorized / error"),
            legend(NodeTone::Transitional, "restarting"),
            legend(NodeTone::Controller, "controller"),
            legend(NodeTone::Unknown, "other"),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Default for TopologyView {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for TopologyView {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let len = self.router_ids().len();
        match key.code {
            KeyCode::Char('f') => self.ping_from = Self::cycle(self.ping_from, len),
            KeyCode::Char('t') => self.ping_to = Self::cycle(self.ping_to, len),
            KeyCode::Char('p') | KeyCode::Enter => {
                return Ok(self
                    .ping_pair()
                    .map(|(from, to)| Action::RequestPing { from, to }));
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::RoutersUpdated(routers) = action {
            self.topology = Topology::from_routers(routers);
            let len = self.router_ids().len();
            if self.ping_from >= len {
                self.ping_from = 0;
            }
            if self.ping_to >= len {
                self.ping_to = usize::from(len > 1);
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Topology ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [canvas_area, side_area] =
            Layout::horizontal([Constraint::Min(20), Constraint::Length(28)]).areas(inner);

        if self.topology.nodes.is_empty() {
            frame.render_widget(
                Paragraph::new(" No routers to draw").style(theme::key_hint()),
                canvas_area,
            );
        } else {
            let canvas = Canvas::default()
                .marker(Marker::Braille)
                .x_bounds([-BOUND, BOUND])
                .y_bounds([-BOUND, BOUND])
                .paint(|ctx| self.paint(ctx));
            frame.render_widget(canvas, canvas_area);
        }

        self.render_side_panel(frame, side_area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
