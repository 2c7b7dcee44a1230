// ── Action simulator ──
//
// Every router action is simulated: status strings are swapped in the
// store and a human-readable line goes to the log sink. Restart is the only
// action with a deferred half, scheduled as a cancellable tokio task.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::CoreError;
use crate::log::LogSink;
use crate::model::{BgpNeighbor, LinkState, Router, RouterStatus};
use crate::store::RouterStore;
use crate::topology::Topology;

/// Delay between a restart request and its completion.
pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_millis(2000);

/// Tunables for the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorConfig {
    pub restart_delay: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            restart_delay: DEFAULT_RESTART_DELAY,
        }
    }
}

/// Drives simulated router actions against an injected [`RouterStore`].
///
/// Cheaply cloneable. Scheduled restart completions are tied to the
/// simulator's lifetime: [`shutdown()`](Self::shutdown) cancels all of them,
/// and a superseding action on the same router cancels its pending one.
#[derive(Clone)]
pub struct Simulator {
    inner: Arc<SimulatorInner>,
}

struct SimulatorInner {
    config: SimulatorConfig,
    store: Arc<RouterStore>,
    log: Arc<dyn LogSink>,
    cancel: CancellationToken,
    pending: Mutex<HashMap<String, PendingRestart>>,
    next_generation: AtomicU64,
}

struct PendingRestart {
    generation: u64,
    token: CancellationToken,
}

impl Simulator {
    pub fn new(config: SimulatorConfig, store: Arc<RouterStore>, log: Arc<dyn LogSink>) -> Self {
        Self {
            inner: Arc::new(SimulatorInner {
                config,
                store,
                log,
                cancel: CancellationToken::new(),
                pending: Mutex::new(HashMap::new()),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn store(&self) -> &Arc<RouterStore> {
        &self.inner.store
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.inner.config
    }

    // ── Per-router actions ───────────────────────────────────────

    /// Mark a router as connected.
    pub fn connect(&self, id: &str) -> Result<Arc<Router>, CoreError> {
        self.require(id)?;
        self.log(&format!("{id}: Simulating connect..."));
        self.cancel_pending(id);
        self.inner
            .store
            .update(id, |r| r.status = RouterStatus::connected_sim())
    }

    /// Report a router's address and status. No state change.
    pub fn view(&self, id: &str) -> Result<Arc<Router>, CoreError> {
        let router = self.require(id)?;
        self.log(&format!(
            "{}: IP={} Port={} Status={}",
            router.id, router.ip, router.port, router.status
        ));
        Ok(router)
    }

    /// Start a simulated restart.
    ///
    /// The router is `restarting (sim)` by the time this returns; after the
    /// configured delay it becomes `connected (sim)`. Must be called from
    /// within a tokio runtime.
    pub fn restart(&self, id: &str) -> Result<(), CoreError> {
        if self.inner.cancel.is_cancelled() {
            return Err(CoreError::ShutDown);
        }
        self.require(id)?;
        self.log(&format!("{id}: Restart command simulated"));

        let token = self.inner.cancel.child_token();
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        {
            // Status flip and registration are atomic with respect to completions.
            let mut pending = self.pending();
            self.inner
                .store
                .update(id, |r| r.status = RouterStatus::restarting_sim())?;
            let superseded = pending.insert(
                id.to_owned(),
                PendingRestart {
                    generation,
                    token: token.clone(),
                },
            );
            if let Some(previous) = superseded {
                debug!(router = id, "superseding pending restart");
                previous.token.cancel();
            }
        }

        let sim = self.clone();
        let id = id.to_owned();
        let delay = self.inner.config.restart_delay;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(router = %id, "restart completion cancelled");
                    sim.forget_pending(&id, generation);
                }
                () = tokio::time::sleep(delay) => sim.finish_restart(&id, generation),
            }
        });

        Ok(())
    }

    /// Log the router's interface names. No state change.
    pub fn show_interfaces(&self, id: &str) -> Result<Vec<String>, CoreError> {
        let router = self.require(id)?;
        let names: Vec<String> = router.interface_names().map(str::to_owned).collect();
        self.log(&format!(
            "{id}: Interfaces => {} (simulated)",
            names.join(", ")
        ));
        Ok(names)
    }

    /// Flip an interface between up and down. Returns the new state.
    pub fn toggle_interface(&self, id: &str, interface: &str) -> Result<LinkState, CoreError> {
        let router = self.inner.store.try_update(id, |r| {
            let state = r
                .interfaces
                .get_mut(interface)
                .ok_or_else(|| CoreError::InterfaceNotFound {
                    id: id.to_owned(),
                    interface: interface.to_owned(),
                })?;
            *state = state.toggled();
            Ok(())
        })?;

        let state = router
            .interfaces
            .get(interface)
            .copied()
            .unwrap_or(LinkState::Down);
        self.log(&format!("{id}: Interface {interface} set to {state}"));
        Ok(state)
    }

    /// Set the router's BGP neighbour from user-entered text.
    pub fn configure_bgp(
        &self,
        id: &str,
        neighbor_ip: &str,
        neighbor_as: &str,
    ) -> Result<BgpNeighbor, CoreError> {
        self.require(id)?;
        let neighbor = parse_bgp_neighbor(neighbor_ip, neighbor_as)?;
        self.inner.store.update(id, |r| r.bgp = Some(neighbor))?;
        self.log(&format!("{id}: BGP neighbor set to {neighbor}"));
        Ok(neighbor)
    }

    /// Simulated ping: succeeds iff both routers report a connected status.
    pub fn ping(&self, from: &str, to: &str) -> Result<bool, CoreError> {
        let source = self.require(from)?;
        let target = self.require(to)?;
        self.log(&format!("Pinging from {from} to {to}..."));

        let reachable = source.status.is_connected() && target.status.is_connected();
        if reachable {
            self.log("Ping successful!");
        } else {
            self.log("Ping failed (simulated)");
        }
        Ok(reachable)
    }

    // ── Fleet-wide actions ───────────────────────────────────────

    pub fn connect_all(&self) {
        self.cancel_all_pending();
        self.inner
            .store
            .update_all(|r| r.status = RouterStatus::connected_sim());
        self.log("All routers set to connected (simulated)");
    }

    /// Mark every router unauthorized, as if the SDN controller rejected them.
    pub fn simulate_controller_failure(&self) {
        self.cancel_all_pending();
        self.inner
            .store
            .update_all(|r| r.status = RouterStatus::unauthorized_sim());
        self.log("All routers set to unauthorized (simulated ODL failure)");
    }

    /// Record that a topology view was opened.
    pub fn topology_opened(&self) {
        self.log("Topology window opened (triangle + ODL).");
    }

    pub fn topology(&self) -> Topology {
        Topology::from_routers(&self.inner.store.snapshot())
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Cancel every scheduled restart completion.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.pending().clear();
        debug!("simulator shut down");
    }

    /// Number of restarts still waiting for their delay to elapse.
    pub fn pending_restarts(&self) -> usize {
        self.pending().len()
    }

    pub fn is_restart_pending(&self, id: &str) -> bool {
        self.pending().contains_key(id)
    }

    // ── Private helpers ──────────────────────────────────────────

    fn finish_restart(&self, id: &str, generation: u64) {
        // Held until the completion is published: a concurrent cancel must
        // either win outright or observe the finished restart.
        let mut pending = self.pending();
        match pending.get(id) {
            Some(entry) if entry.generation == generation => {
                pending.remove(id);
            }
            _ => return,
        }

        match self
            .inner
            .store
            .update(id, |r| r.status = RouterStatus::connected_sim())
        {
            Ok(_) => self.log(&format!("{id}: Restart complete")),
            Err(e) => debug!(router = id, error = %e, "restart target vanished"),
        }
    }

    /// Drop the registry entry of a cancelled completion, unless a newer
    /// restart has already replaced it.
    fn forget_pending(&self, id: &str, generation: u64) {
        let mut pending = self.pending();
        if pending.get(id).is_some_and(|e| e.generation == generation) {
            pending.remove(id);
        }
    }

    fn cancel_pending(&self, id: &str) {
        if let Some(entry) = self.pending().remove(id) {
            debug!(router = id, "cancelling pending restart");
            entry.token.cancel();
        }
    }

    fn cancel_all_pending(&self) {
        for (_, entry) in self.pending().drain() {
            entry.token.cancel();
        }
    }

    fn require(&self, id: &str) -> Result<Arc<Router>, CoreError> {
        self.inner
            .store
            .get(id)
            .ok_or_else(|| CoreError::not_found(id))
    }

    fn log(&self, message: &str) {
        self.inner.log.log(message);
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<String, PendingRestart>> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn parse_bgp_neighbor(neighbor_ip: &str, neighbor_as: &str) -> Result<BgpNeighbor, CoreError> {
    let neighbor_ip: IpAddr = neighbor_ip
        .trim()
        .parse()
        .map_err(|_| CoreError::invalid("neighbor_ip", format!("not an IP address: {neighbor_ip:?}")))?;
    let neighbor_as: u32 = neighbor_as
        .trim()
        .trim_start_matches("AS")
        .parse()
        .map_err(|_| CoreError::invalid("neighbor_as", format!("not an AS number: {neighbor_as:?}")))?;
    if neighbor_as == 0 {
        return Err(CoreError::invalid("neighbor_as", "AS 0 is reserved"));
    }
    Ok(BgpNeighbor {
        neighbor_ip,
        neighbor_as,
    })
}
