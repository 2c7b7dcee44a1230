// ── Ordered reactive router collection ──
//
// The snapshot held by the `watch` sender IS the state: every mutation goes
// through `send_if_modified`, so a change and its notification are atomic.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::CoreError;
use crate::model::Router;

/// Snapshot of every router, in insertion order.
pub type RouterSnapshot = Arc<Vec<Arc<Router>>>;

/// Explicitly owned router collection, injected into the simulator and the
/// views that render it.
///
/// Ids are unique. Iteration order is insertion order and never changes when
/// a router is updated in place.
pub struct RouterStore {
    snapshot: watch::Sender<RouterSnapshot>,
    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,
}

impl RouterStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (version, _) = watch::channel(0u64);
        Self { snapshot, version }
    }

    /// Build a store from an inventory, rejecting duplicate ids.
    pub fn from_routers(routers: impl IntoIterator<Item = Router>) -> Result<Self, CoreError> {
        let store = Self::new();
        for router in routers {
            store.insert(router)?;
        }
        Ok(store)
    }

    /// Append a router. Fails without touching the store if the id is taken.
    pub fn insert(&self, router: Router) -> Result<(), CoreError> {
        let id = router.id.clone();
        let inserted = self.snapshot.send_if_modified(|snap| {
            if snap.iter().any(|r| r.id == router.id) {
                return false;
            }
            Arc::make_mut(snap).push(Arc::new(router));
            true
        });

        if inserted {
            self.bump_version();
            Ok(())
        } else {
            Err(CoreError::DuplicateRouter { id })
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<Router>> {
        self.snapshot
            .borrow()
            .iter()
            .find(|r| r.id == id)
            .map(Arc::clone)
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> RouterSnapshot {
        Arc::clone(&self.snapshot.borrow())
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<RouterSnapshot> {
        self.snapshot.subscribe()
    }

    /// Mutate one router in place and publish the new snapshot.
    ///
    /// `f` runs while the snapshot is locked and must not call back into
    /// the store.
    pub fn update<F>(&self, id: &str, f: F) -> Result<Arc<Router>, CoreError>
    where
        F: FnOnce(&mut Router),
    {
        let mut updated = None;
        self.snapshot.send_if_modified(|snap| {
            let Some(pos) = snap.iter().position(|r| r.id == id) else {
                return false;
            };
            let Some(slot) = Arc::make_mut(snap).get_mut(pos) else {
                return false;
            };
            f(Arc::make_mut(slot));
            updated = Some(Arc::clone(slot));
            true
        });

        match updated {
            Some(router) => {
                self.bump_version();
                Ok(router)
            }
            None => Err(CoreError::not_found(id)),
        }
    }

    /// Try a fallible mutation on one router. Nothing is published when `f`
    /// returns an error.
    pub fn try_update<F>(&self, id: &str, f: F) -> Result<Arc<Router>, CoreError>
    where
        F: FnOnce(&mut Router) -> Result<(), CoreError>,
    {
        let current = self.get(id).ok_or_else(|| CoreError::not_found(id))?;
        let mut candidate = (*current).clone();
        f(&mut candidate)?;
        self.update(id, move |router| *router = candidate)
    }

    /// Mutate every router and publish once.
    pub fn update_all<F>(&self, mut f: F)
    where
        F: FnMut(&mut Router),
    {
        self.snapshot.send_modify(|snap| {
            for slot in Arc::make_mut(snap).iter_mut() {
                f(Arc::make_mut(slot));
            }
        });
        self.bump_version();
    }

    pub fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

impl Default for RouterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RouterStatus;
    use pretty_assertions::assert_eq;

    fn three() -> RouterStore {
        RouterStore::from_routers([
            Router::new("R1", "10.0.0.1", 22, "connected"),
            Router::new("R2", "10.0.0.2", 22, "unauthorized"),
            Router::new("R3", "10.0.0.3", 22, "pending"),
        ])
        .expect("unique ids")
    }

    fn ids(store: &RouterStore) -> Vec<String> {
        store.snapshot().iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn keeps_insertion_order() {
        let store = three();
        assert_eq!(ids(&store), ["R1", "R2", "R3"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn duplicate_insert_is_rejected_and_store_unchanged() {
        let store = three();
        let version = store.version();
        let err = store
            .insert(Router::new("R2", "10.9.9.9", 2222, "connected"))
            .expect_err("duplicate id");
        assert_eq!(err, CoreError::DuplicateRouter { id: "R2".into() });
        assert_eq!(store.len(), 3);
        assert_eq!(store.version(), version);
        assert_eq!(store.get("R2").map(|r| r.ip.clone()), Some("10.0.0.2".into()));
    }

    #[test]
    fn from_routers_rejects_duplicates() {
        let result = RouterStore::from_routers([
            Router::new("R1", "10.0.0.1", 22, "connected"),
            Router::new("R1", "10.0.0.2", 22, "connected"),
        ]);
        assert!(matches!(result, Err(CoreError::DuplicateRouter { id }) if id == "R1"));
    }

    #[test]
    fn update_mutates_in_place_without_reordering() {
        let store = three();
        let updated = store
            .update("R2", |r| r.status = RouterStatus::connected_sim())
            .expect("known router");
        assert_eq!(updated.status, RouterStatus::connected_sim());
        assert_eq!(ids(&store), ["R1", "R2", "R3"]);
        assert_eq!(store.get("R2").map(|r| r.status.clone()), Some(RouterStatus::connected_sim()));
    }

    #[test]
    fn update_unknown_router_fails() {
        let store = three();
        let version = store.version();
        let err = store.update("R9", |_| {}).expect_err("unknown router");
        assert_eq!(err, CoreError::RouterNotFound { id: "R9".into() });
        assert_eq!(store.version(), version);
    }

    #[test]
    fn try_update_discards_failed_mutation() {
        let store = three();
        let version = store.version();
        let result = store.try_update("R1", |r| {
            r.status = RouterStatus::new("half-applied");
            Err(CoreError::invalid("status", "rejected"))
        });
        assert!(result.is_err());
        assert_eq!(store.get("R1").map(|r| r.status.clone()), Some("connected".into()));
        assert_eq!(store.version(), version);
    }

    #[test]
    fn update_all_touches_every_router() {
        let store = three();
        store.update_all(|r| r.status = RouterStatus::unauthorized_sim());
        assert!(
            store
                .snapshot()
                .iter()
                .all(|r| r.status == RouterStatus::unauthorized_sim())
        );
    }

    #[test]
    fn old_snapshots_are_not_affected_by_updates() {
        let store = three();
        let before = store.snapshot();
        store
            .update("R1", |r| r.status = RouterStatus::restarting_sim())
            .expect("known router");
        assert_eq!(before.first().map(|r| r.status.as_str()), Some("connected"));
        assert_eq!(
            store.snapshot().first().map(|r| r.status.as_str()),
            Some("restarting (sim)")
        );
    }

    #[test]
    fn subscribers_see_changes() {
        let store = three();
        let mut rx = store.subscribe();
        rx.borrow_and_update();
        store
            .update("R3", |r| r.status = RouterStatus::connected_sim())
            .expect("known router");
        assert!(rx.has_changed().expect("sender alive"));
        let snap = rx.borrow_and_update().clone();
        assert_eq!(snap.get(2).map(|r| r.status.as_str()), Some("connected (sim)"));
    }
}
