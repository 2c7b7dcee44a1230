//! Application core: event loop, screen management, action dispatch.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use routerlab_config::{Lab, UiSettings};
use routerlab_core::{ActivityLog, CoreError, LogLine, Simulator};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::event::{Event, EventReader, FrameRates};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::store_bridge::run_store_bridge;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::{centered_rect, console};

const CONSOLE_HEIGHT: u16 = 9;
const CONSOLE_CAPACITY: usize = 200;
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

pub struct App {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    /// Console tail, oldest first.
    console: VecDeque<LogLine>,
    notification: Option<(Notification, Instant)>,
    connected: usize,
    total: usize,
    simulator: Simulator,
    log: Arc<ActivityLog>,
    ui: UiSettings,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(lab: Lab, ui: UiSettings) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let mut screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();
        let active_screen = ScreenId::default();
        if let Some(screen) = screens.get_mut(&active_screen) {
            screen.set_focused(true);
        }

        Self {
            active_screen,
            screens,
            running: true,
            help_visible: false,
            console: VecDeque::with_capacity(CONSOLE_CAPACITY),
            notification: None,
            connected: 0,
            total: 0,
            simulator: lab.simulator,
            log: lab.log,
            ui,
            action_tx,
            action_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let bridge_cancel = CancellationToken::new();
        let bridge = tokio::spawn(run_store_bridge(
            Arc::clone(self.simulator.store()),
            Arc::clone(&self.log),
            self.action_tx.clone(),
            bridge_cancel.clone(),
        ));

        let mut events = EventReader::spawn(FrameRates::from(&self.ui));
        info!(routers = self.simulator.store().len(), "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
                if matches!(action, Action::Render | Action::Resize(..)) {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        bridge_cancel.cancel();
        if let Err(e) = bridge.await {
            warn!(error = %e, "store bridge task failed");
        }
        self.simulator.shutdown();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first, then the active screen. A screen that is
    /// collecting input sees every key except Ctrl+C.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        let capturing = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input());
        if capturing {
            return self.delegate_key(key);
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        let action = match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char(c @ '1'..='9') => {
                match ScreenId::from_number(c as u8 - b'0') {
                    Some(screen) => Action::SwitchScreen(screen),
                    None => return Ok(None),
                }
            }
            KeyCode::Tab | KeyCode::BackTab => Action::SwitchScreen(self.active_screen.next()),
            KeyCode::Char('A') => Action::RequestConnectAll,
            KeyCode::Char('F') => Action::RequestControllerFailure,
            _ => return self.delegate_key(key),
        };
        Ok(Some(action))
    }

    fn delegate_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.screens.get_mut(&self.active_screen) {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} -> {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                    if *target == ScreenId::Topology {
                        self.simulator.topology_opened();
                    }
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() >= NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
            }

            Action::Render | Action::Resize(..) => {}

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }

            Action::LogAppended(line) => {
                if self.console.len() == CONSOLE_CAPACITY {
                    self.console.pop_front();
                }
                self.console.push_back(line.clone());
            }

            Action::RoutersUpdated(routers) => {
                self.total = routers.len();
                self.connected = routers.iter().filter(|r| r.status.is_connected()).count();
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::RequestConnect(_)
            | Action::RequestView(_)
            | Action::RequestRestart(_)
            | Action::RequestShowInterfaces(_)
            | Action::RequestToggleInterface { .. }
            | Action::RequestConfigureBgp { .. }
            | Action::RequestPing { .. }
            | Action::RequestConnectAll
            | Action::RequestControllerFailure => {
                if let Err(e) = self.dispatch(action) {
                    warn!(error = %e, "router action rejected");
                    self.action_tx
                        .send(Action::Notify(Notification::error(e.to_string())))?;
                }
            }
        }

        Ok(())
    }

    /// Run a request against the simulator. Results surface through the
    /// store snapshot and the activity log.
    fn dispatch(&self, action: &Action) -> Result<(), CoreError> {
        let sim = &self.simulator;
        match action {
            Action::RequestConnect(id) => sim.connect(id).map(drop),
            Action::RequestView(id) => sim.view(id).map(drop),
            Action::RequestRestart(id) => sim.restart(id),
            Action::RequestShowInterfaces(id) => sim.show_interfaces(id).map(drop),
            Action::RequestToggleInterface { router, interface } => {
                sim.toggle_interface(router, interface).map(drop)
            }
            Action::RequestConfigureBgp {
                router,
                neighbor_ip,
                neighbor_as,
            } => sim.configure_bgp(router, neighbor_ip, neighbor_as).map(drop),
            Action::RequestPing { from, to } => sim.ping(from, to).map(drop),
            Action::RequestConnectAll => {
                sim.connect_all();
                Ok(())
            }
            Action::RequestControllerFailure => {
                sim.simulate_controller_failure();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content, console_area, tab_area, status_area] = Layout::vertical([
            Constraint::Min(6),
            Constraint::Length(CONSOLE_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content);
        }
        console::render_console(frame, console_area, &self.console);
        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        if let Some((notification, _)) = &self.notification {
            self.render_notification(frame, content, notification);
        }
        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();
        let selected = ScreenId::ALL
            .iter()
            .position(|&s| s == self.active_screen)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(selected);
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let pending = self.simulator.pending_restarts();
        let mut spans = vec![
            Span::raw(" "),
            Span::styled(
                format!("{}/{} connected", self.connected, self.total),
                Style::default().fg(theme::SUCCESS_GREEN),
            ),
        ];
        if pending > 0 {
            spans.push(Span::styled(
                format!("  {pending} restarting"),
                Style::default().fg(theme::AMBER),
            ));
        }
        spans.extend([
            Span::styled(" │ ", theme::key_hint()),
            Span::styled("A ", theme::key_hint_key()),
            Span::styled("connect all  ", theme::key_hint()),
            Span::styled("F ", theme::key_hint_key()),
            Span::styled("ODL failure  ", theme::key_hint()),
            Span::styled("? ", theme::key_hint_key()),
            Span::styled("help  ", theme::key_hint()),
            Span::styled("q ", theme::key_hint_key()),
            Span::styled("quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_notification(&self, frame: &mut Frame, area: Rect, notification: &Notification) {
        let width = (notification.message.chars().count() as u16 + 4).min(area.width);
        let rect = Rect::new(area.right().saturating_sub(width), area.y, width, 3.min(area.height));
        let color = theme::ERROR_RED;

        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .style(theme::overlay_background());
        frame.render_widget(
            Paragraph::new(format!(" {}", notification.message))
                .style(Style::default().fg(color))
                .block(block),
            rect,
        );
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let rect = centered_rect(area, 56, 20);
        frame.render_widget(Clear, rect);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(theme::overlay_background());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let heading = |text: &'static str| {
            Line::from(Span::styled(format!("  {text}"), Style::default().fg(theme::NEON_CYAN)))
        };
        let entry = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<10}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let text = vec![
            heading("Routers"),
            entry("j/k", "Select router"),
            entry("h/l", "Select button"),
            entry("Enter", "Press selected button"),
            entry("c v r i", "Connect / view / restart / interfaces"),
            entry("I", "Toggle interfaces"),
            entry("b", "Configure BGP neighbor"),
            Line::from(""),
            heading("Topology"),
            entry("f / t", "Cycle ping source / target"),
            entry("p", "Ping"),
            Line::from(""),
            heading("Global"),
            entry("A", "Connect all routers"),
            entry("F", "Simulate ODL failure"),
            entry("1-2 Tab", "Switch screen"),
            entry("q", "Quit"),
            Line::from(Span::styled("  Esc or ? to close", theme::key_hint())),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use routerlab_config::{Config, build_lab};

    fn app() -> App {
        let cfg = Config::default();
        App::new(build_lab(&cfg).unwrap(), cfg.ui)
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    /// Drain queued follow-up actions, as the event loop would.
    fn settle(app: &mut App) {
        while let Ok(action) = app.action_rx.try_recv() {
            app.process_action(&action).unwrap();
        }
    }

    fn sync_snapshot(app: &mut App) {
        let snap = app.simulator.store().snapshot();
        app.process_action(&Action::RoutersUpdated(snap)).unwrap();
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn global_keys() {
        let mut app = app();
        assert_eq!(app.handle_key_event(key('q')).unwrap(), Some(Action::Quit));
        assert_eq!(
            app.handle_key_event(key('2')).unwrap(),
            Some(Action::SwitchScreen(ScreenId::Topology))
        );
        assert_eq!(
            app.handle_key_event(key('A')).unwrap(),
            Some(Action::RequestConnectAll)
        );
        assert_eq!(
            app.handle_key_event(key('F')).unwrap(),
            Some(Action::RequestControllerFailure)
        );
        assert_eq!(app.handle_key_event(key('9')).unwrap(), None);
    }

    #[test]
    fn prompt_swallows_global_keys() {
        let mut app = app();
        sync_snapshot(&mut app);
        app.handle_key_event(key('b')).unwrap();
        assert_eq!(app.handle_key_event(key('q')).unwrap(), None);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key_event(ctrl_c).unwrap(), Some(Action::Quit));
    }

    #[test]
    fn opening_topology_screen_logs_once() {
        let mut app = app();
        app.process_action(&Action::SwitchScreen(ScreenId::Topology))
            .unwrap();
        app.process_action(&Action::SwitchScreen(ScreenId::Topology))
            .unwrap();
        assert_eq!(app.active_screen, ScreenId::Topology);
        assert_eq!(
            app.log.messages(),
            vec!["Topology window opened (triangle + ODL)."]
        );

        app.process_action(&Action::SwitchScreen(ScreenId::Routers))
            .unwrap();
        assert_eq!(app.log.messages().len(), 1);
    }

    #[test]
    fn connect_request_updates_store_and_log() {
        let mut app = app();
        app.process_action(&Action::RequestConnect("R2".into()))
            .unwrap();
        let r2 = app.simulator.store().get("R2").unwrap();
        assert_eq!(r2.status.as_str(), "connected (sim)");
        assert_eq!(app.log.messages(), vec!["R2: Simulating connect..."]);
    }

    #[test]
    fn unknown_router_raises_error_notification() {
        let mut app = app();
        app.process_action(&Action::RequestView("R9".into()))
            .unwrap();
        settle(&mut app);
        let (notification, _) = app.notification.clone().unwrap();
        assert!(notification.message.contains("R9"));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_from_tui_completes_after_delay() {
        let mut app = app();
        app.process_action(&Action::RequestRestart("R1".into()))
            .unwrap();
        let store = Arc::clone(app.simulator.store());
        assert_eq!(store.get("R1").unwrap().status.as_str(), "restarting (sim)");

        tokio::time::sleep(Duration::from_millis(2001)).await;
        assert_eq!(store.get("R1").unwrap().status.as_str(), "connected (sim)");
        assert_eq!(
            app.log.messages(),
            vec!["R1: Restart command simulated", "R1: Restart complete"]
        );
    }

    #[test]
    fn fleet_actions_reach_every_router() {
        let mut app = app();
        app.process_action(&Action::RequestControllerFailure)
            .unwrap();
        let snap = app.simulator.store().snapshot();
        assert!(snap.iter().all(|r| r.status.as_str() == "unauthorized (sim)"));

        sync_snapshot(&mut app);
        assert_eq!(app.connected, 0);
        app.process_action(&Action::RequestConnectAll).unwrap();
        sync_snapshot(&mut app);
        assert_eq!(app.connected, app.total);
    }

    #[test]
    fn console_shows_activity() {
        let mut app = app();
        sync_snapshot(&mut app);
        app.process_action(&Action::RequestShowInterfaces("R3".into()))
            .unwrap();
        for line in app.log.history() {
            app.process_action(&Action::LogAppended(line)).unwrap();
        }
        let text = screen_text(&app);
        assert!(text.contains("R3: Interfaces => Gig0/0, Gig0/1, Gig0/2 (simulated)"));
        assert!(text.contains("Routers (3)"));
    }

    #[test]
    fn console_is_bounded() {
        let mut app = app();
        let line = LogLine {
            timestamp: chrono::Utc::now(),
            message: "x".into(),
        };
        for _ in 0..CONSOLE_CAPACITY + 10 {
            app.process_action(&Action::LogAppended(line.clone())).unwrap();
        }
        assert_eq!(app.console.len(), CONSOLE_CAPACITY);
    }

    #[test]
    fn help_overlay_toggles() {
        let mut app = app();
        app.process_action(&Action::ToggleHelp).unwrap();
        assert!(screen_text(&app).contains("Keyboard Shortcuts"));
        assert_eq!(
            app.handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
                .unwrap(),
            Some(Action::ToggleHelp)
        );
    }
}
