//! Terminal event pump.
//!
//! A background tokio task merges crossterm input with two timers (a slow
//! tick and a render clock) into a single `mpsc` stream.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use routerlab_config::UiSettings;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Render,
}

/// Frame timing for the event pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRates {
    pub tick: Duration,
    pub render: Duration,
}

impl From<&UiSettings> for FrameRates {
    fn from(ui: &UiSettings) -> Self {
        Self {
            tick: Duration::from_millis(ui.tick_rate_ms),
            render: Duration::from_millis(ui.render_rate_ms),
        }
    }
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Spawn the pump on the current runtime.
    pub fn spawn(rates: FrameRates) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(tx, rates, cancel.clone()));
        Self { rx, cancel }
    }

    /// Next event, or `None` once the pump has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn pump(tx: mpsc::UnboundedSender<Event>, rates: FrameRates, cancel: CancellationToken) {
    let mut input = EventStream::new();
    let mut tick = interval(rates.tick);
    let mut render = interval(rates.render);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    render.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = tick.tick() => Event::Tick,
            _ = render.tick() => Event::Render,
            Some(Ok(raw)) = input.next() => match raw {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
                CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
                _ => continue,
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}
