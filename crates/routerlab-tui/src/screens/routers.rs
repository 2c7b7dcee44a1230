//! Router list: one card per router with its action buttons, plus the
//! interface panel and BGP prompt overlays.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use routerlab_core::{Indicator, LinkState, Router, RouterSnapshot};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{centered_rect, status_indicator};

/// Rows taken by one card, borders included.
pub const CARD_HEIGHT: u16 = 5;

/// Per-card action buttons, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Connect,
    View,
    Restart,
    ShowInterfaces,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Self::Connect,
        Self::View,
        Self::Restart,
        Self::ShowInterfaces,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Connect => "Connect",
            Self::View => "View",
            Self::Restart => "Restart Router",
            Self::ShowInterfaces => "Show Interfaces",
        }
    }

    /// The request this button sends for router `id`.
    pub fn request(self, id: String) -> Action {
        match self {
            Self::Connect => Action::RequestConnect(id),
            Self::View => Action::RequestView(id),
            Self::Restart => Action::RequestRestart(id),
            Self::ShowInterfaces => Action::RequestShowInterfaces(id),
        }
    }
}

/// What a card shows for one router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterCard {
    pub id: String,
    pub address: String,
    pub status: String,
    pub indicator: Indicator,
}

impl From<&Router> for RouterCard {
    fn from(router: &Router) -> Self {
        Self {
            id: router.id.clone(),
            address: router.address(),
            status: router.status.to_string(),
            indicator: router.status.indicator(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BgpField {
    NeighborIp,
    NeighborAs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BgpPrompt {
    router: String,
    neighbor_ip: String,
    neighbor_as: String,
    field: BgpField,
}

impl BgpPrompt {
    fn new(router: String) -> Self {
        Self {
            router,
            neighbor_ip: String::new(),
            neighbor_as: String::new(),
            field: BgpField::NeighborIp,
        }
    }

    fn current_mut(&mut self) -> &mut String {
        match self.field {
            BgpField::NeighborIp => &mut self.neighbor_ip,
            BgpField::NeighborAs => &mut self.neighbor_as,
        }
    }

    fn switch_field(&mut self) {
        self.field = match self.field {
            BgpField::NeighborIp => BgpField::NeighborAs,
            BgpField::NeighborAs => BgpField::NeighborIp,
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Overlay {
    Interfaces { router: String, selected: usize },
    Bgp(BgpPrompt),
}

/// Card list over the current router snapshot.
pub struct RouterListView {
    focused: bool,
    routers: RouterSnapshot,
    selected: usize,
    control: usize,
    overlay: Option<Overlay>,
}

impl RouterListView {
    pub fn new() -> Self {
        Self {
            focused: false,
            routers: Arc::new(Vec::new()),
            selected: 0,
            control: 0,
            overlay: None,
        }
    }

    /// Cards for every router, in store order.
    pub fn cards(&self) -> Vec<RouterCard> {
        self.routers.iter().map(|r| RouterCard::from(r.as_ref())).collect()
    }

    fn selected_router(&self) -> Option<&Arc<Router>> {
        self.routers.get(self.selected)
    }

    fn selected_id(&self) -> Option<String> {
        self.selected_router().map(|r| r.id.clone())
    }

    fn move_selection(&mut self, delta: isize) {
        if self.routers.is_empty() {
            return;
        }
        let last = self.routers.len() as isize - 1;
        self.selected = (self.selected as isize + delta).clamp(0, last) as usize;
    }

    fn move_control(&mut self, delta: isize) {
        let last = Control::ALL.len() as isize - 1;
        self.control = (self.control as isize + delta).clamp(0, last) as usize;
    }

    fn active_control(&self) -> Control {
        Control::ALL[self.control.min(Control::ALL.len() - 1)]
    }

    fn request_selected(&self, control: Control) -> Option<Action> {
        self.selected_id().map(|id| control.request(id))
    }

    /// First card index drawn when `visible` cards fit.
    fn scroll_offset(&self, visible: usize) -> usize {
        if visible == 0 {
            return self.selected;
        }
        (self.selected + 1).saturating_sub(visible)
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = self.routers.len().saturating_sub(1);
            }
            KeyCode::Char('h') | KeyCode::Left => self.move_control(-1),
            KeyCode::Char('l') | KeyCode::Right => self.move_control(1),
            KeyCode::Enter => return self.request_selected(self.active_control()),
            KeyCode::Char('c') => return self.request_selected(Control::Connect),
            KeyCode::Char('v') => return self.request_selected(Control::View),
            KeyCode::Char('r') => return self.request_selected(Control::Restart),
            KeyCode::Char('i') => return self.request_selected(Control::ShowInterfaces),
            KeyCode::Char('I') => {
                if let Some(router) = self.selected_id() {
                    self.overlay = Some(Overlay::Interfaces {
                        router,
                        selected: 0,
                    });
                }
            }
            KeyCode::Char('b') => {
                if let Some(router) = self.selected_id() {
                    self.overlay = Some(Overlay::Bgp(BgpPrompt::new(router)));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_interfaces_key(&mut self, key: KeyEvent) -> Option<Action> {
        let Some(Overlay::Interfaces { router, selected }) = &mut self.overlay else {
            return None;
        };
        let count = self
            .routers
            .iter()
            .find(|r| r.id == *router)
            .map_or(0, |r| r.interfaces.len());

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.overlay = None,
            KeyCode::Char('j') | KeyCode::Down => {
                *selected = (*selected + 1).min(count.saturating_sub(1));
            }
            KeyCode::Char('k') | KeyCode::Up => *selected = selected.saturating_sub(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let interface = self
                    .routers
                    .iter()
                    .find(|r| r.id == *router)
                    .and_then(|r| r.interfaces.get_index(*selected))
                    .map(|(name, _)| name.clone())?;
                return Some(Action::RequestToggleInterface {
                    router: router.clone(),
                    interface,
                });
            }
            _ => {}
        }
        None
    }

    fn handle_bgp_key(&mut self, key: KeyEvent) -> Option<Action> {
        let Some(Overlay::Bgp(prompt)) = &mut self.overlay else {
            return None;
        };

        match key.code {
            KeyCode::Esc => self.overlay = None,
            KeyCode::Tab | KeyCode::BackTab => prompt.switch_field(),
            KeyCode::Backspace => {
                prompt.current_mut().pop();
            }
            KeyCode::Enter => match prompt.field {
                BgpField::NeighborIp => prompt.field = BgpField::NeighborAs,
                BgpField::NeighborAs => {
                    let action = Action::RequestConfigureBgp {
                        router: prompt.router.clone(),
                        neighbor_ip: prompt.neighbor_ip.trim().to_owned(),
                        neighbor_as: prompt.neighbor_as.trim().to_owned(),
                    };
                    self.overlay = None;
                    return Some(action);
                }
            },
            KeyCode::Char(c) if !c.is_control() => prompt.current_mut().push(c),
            _ => {}
        }
        None
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, card: &RouterCard, selected: bool) {
        let border = if selected && self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(format!(" {} ", card.id))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut buttons = vec![Span::raw(" ")];
        for (i, control) in Control::ALL.iter().enumerate() {
            let style = if selected && i == self.control {
                theme::button_active()
            } else {
                theme::button()
            };
            buttons.push(Span::styled(format!("[{}]", control.label()), style));
            buttons.push(Span::raw(" "));
        }

        let lines = vec![
            Line::from(vec![
                Span::raw(" "),
                Span::styled(card.address.clone(), theme::address()),
            ]),
            Line::from(vec![
                Span::raw(" "),
                status_indicator::indicator_span(card.indicator),
                Span::raw(" "),
                Span::styled(card.status.clone(), theme::body_text()),
            ]),
            Line::from(buttons),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_interfaces(&self, frame: &mut Frame, area: Rect, router_id: &str, selected: usize) {
        let Some(router) = self.routers.iter().find(|r| r.id == router_id) else {
            return;
        };
        let height = router.interfaces.len() as u16 + 4;
        let rect = centered_rect(area, 40, height);
        frame.render_widget(Clear, rect);

        let block = Block::default()
            .title(format!(" {router_id} Interfaces "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(theme::overlay_background());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let mut lines: Vec<Line> = router
            .interfaces
            .iter()
            .enumerate()
            .map(|(i, (name, state))| {
                let state_style = match state {
                    LinkState::Up => theme::indicator_style(Indicator::Green),
                    LinkState::Down => theme::indicator_style(Indicator::Red),
                };
                let name_style = if i == selected {
                    theme::selected_row()
                } else {
                    theme::body_text()
                };
                Line::from(vec![
                    Span::styled(format!(" {name:<10}"), name_style),
                    Span::styled(state.to_string(), state_style),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Enter ", theme::key_hint_key()),
            Span::styled("toggle  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("close", theme::key_hint()),
        ]));
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_bgp_prompt(&self, frame: &mut Frame, area: Rect, prompt: &BgpPrompt) {
        let rect = centered_rect(area, 48, 8);
        frame.render_widget(Clear, rect);

        let block = Block::default()
            .title(format!(" Configure BGP on {} ", prompt.router))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(theme::overlay_background());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let field = |label: &str, value: &str, active: bool| {
            let cursor = if active { "_" } else { "" };
            let style = if active {
                theme::selected_row()
            } else {
                theme::body_text()
            };
            Line::from(vec![
                Span::styled(format!(" {label:<12}"), theme::key_hint()),
                Span::styled(format!("{value}{cursor}"), style),
            ])
        };

        let lines = vec![
            Line::from(""),
            field(
                "Neighbor IP",
                &prompt.neighbor_ip,
                prompt.field == BgpField::NeighborIp,
            ),
            field(
                "Neighbor AS",
                &prompt.neighbor_as,
                prompt.field == BgpField::NeighborAs,
            ),
            Line::from(""),
            Line::from(vec![
                Span::styled(" Enter ", theme::key_hint_key()),
                Span::styled("next/apply  ", theme::key_hint()),
                Span::styled("Tab ", theme::key_hint_key()),
                Span::styled("switch  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Default for RouterListView {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for RouterListView {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match self.overlay {
            Some(Overlay::Interfaces { .. }) => self.handle_interfaces_key(key),
            Some(Overlay::Bgp(_)) => self.handle_bgp_key(key),
            None => self.handle_list_key(key),
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::RoutersUpdated(routers) = action {
            self.routers = Arc::clone(routers);
            self.selected = self.selected.min(self.routers.len().saturating_sub(1));

            let orphaned = match &self.overlay {
                Some(Overlay::Interfaces { router, .. }) => !self.routers.iter().any(|r| r.id == *router),
                Some(Overlay::Bgp(prompt)) => !self.routers.iter().any(|r| r.id == prompt.router),
                None => false,
            };
            if orphaned {
                self.overlay = None;
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Routers ({}) ", self.routers.len()))
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

        let [cards_area, hints_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        if self.routers.is_empty() {
            frame.render_widget(
                Paragraph::new("No routers in inventory")
                    .alignment(Alignment::Center)
                    .style(theme::key_hint()),
                cards_area,
            );
        } else {
            let visible = usize::from(cards_area.height / CARD_HEIGHT).max(1);
            let first = self.scroll_offset(visible);
            for (slot, (idx, card)) in self
                .cards()
                .iter()
                .enumerate()
                .skip(first)
                .take(visible)
                .enumerate()
            {
                let y = cards_area.y + slot as u16 * CARD_HEIGHT;
                let height = CARD_HEIGHT.min(cards_area.bottom().saturating_sub(y));
                if height == 0 {
                    break;
                }
                let rect = Rect::new(cards_area.x, y, cards_area.width, height);
                self.render_card(frame, rect, card, idx == self.selected);
            }
        }

        let hints = Line::from(vec![
            Span::styled(" j/k ", theme::key_hint_key()),
            Span::styled("select  ", theme::key_hint()),
            Span::styled("h/l ", theme::key_hint_key()),
            Span::styled("button  ", theme::key_hint()),
            Span::styled("c/v/r/i ", theme::key_hint_key()),
            Span::styled("actions  ", theme::key_hint()),
            Span::styled("I ", theme::key_hint_key()),
            Span::styled("interfaces  ", theme::key_hint()),
            Span::styled("b ", theme::key_hint_key()),
            Span::styled("bgp", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), hints_area);

        match &self.overlay {
            Some(Overlay::Interfaces { router, selected }) => {
                self.render_interfaces(frame, area, router, *selected);
            }
            Some(Overlay::Bgp(prompt)) => self.render_bgp_prompt(frame, area, prompt),
            None => {}
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn captures_input(&self) -> bool {
        self.overlay.is_some()
    }
}
