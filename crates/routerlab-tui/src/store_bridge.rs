//! Store bridge: forwards router snapshots and activity lines into the
//! TUI's action channel.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use routerlab_core::{ActivityLog, RouterStore};

use crate::action::Action;

/// Run until cancelled or until the action channel closes.
///
/// Sends the current snapshot and retained log history first so screens
/// have data on the first frame.
pub async fn run_store_bridge(
    store: Arc<RouterStore>,
    log: Arc<ActivityLog>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut routers = store.subscribe();
    let mut lines = log.subscribe();

    let initial = routers.borrow_and_update().clone();
    if action_tx.send(Action::RoutersUpdated(initial)).is_err() {
        return;
    }
    for line in log.history() {
        if action_tx.send(Action::LogAppended(line)).is_err() {
            return;
        }
    }

    loop {
        let action = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = routers.changed() => {
                if changed.is_err() {
                    debug!("router store dropped");
                    break;
                }
                Action::RoutersUpdated(routers.borrow_and_update().clone())
            }
            line = lines.recv() => match line {
                Ok(line) => Action::LogAppended(line),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "console fell behind the activity log");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        };

        if action_tx.send(action).is_err() {
            break;
        }
    }

    debug!("store bridge stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use routerlab_core::{LogSink, Router};

    #[tokio::test]
    async fn forwards_snapshot_history_and_updates() {
        let store = Arc::new(
            RouterStore::from_routers([Router::new("R1", "10.0.0.1", 22, "connected")]).unwrap(),
        );
        let log = Arc::new(ActivityLog::new(10));
        log.log("boot");

        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_store_bridge(
            Arc::clone(&store),
            Arc::clone(&log),
            tx,
            cancel.clone(),
        ));

        let Some(Action::RoutersUpdated(snap)) = rx.recv().await else {
            panic!("expected initial snapshot");
        };
        assert_eq!(snap.len(), 1);
        let Some(Action::LogAppended(line)) = rx.recv().await else {
            panic!("expected history line");
        };
        assert_eq!(line.message, "boot");

        store
            .update("R1", |r| r.status = "unauthorized".into())
            .unwrap();
        let Some(Action::RoutersUpdated(snap)) = rx.recv().await else {
            panic!("expected updated snapshot");
        };
        assert_eq!(snap[0].status.as_str(), "unauthorized");

        log.log("R1: Simulating connect...");
        let Some(Action::LogAppended(line)) = rx.recv().await else {
            panic!("expected live line");
        };
        assert_eq!(line.message, "R1: Simulating connect...");

        cancel.cancel();
        task.await.unwrap();
    }
}
