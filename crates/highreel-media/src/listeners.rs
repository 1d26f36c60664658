// crates/highreel-media/src/listeners.rs
//
// Disposable subscriptions and the listener registry behind them.
//
// Every "on_*" call in this crate hands back a `Subscription`. Dropping it (or
// calling `dispose`) removes the callback from its registry. The tracker keeps
// its source subscriptions in a Vec and empties that Vec on detach, so a
// detached tracker never has a callback left registered on the source.
//
// Dispatch rules (`Listeners::emit_while`):
//   - The registry lock is never held while a callback runs, so callbacks may
//     subscribe, unsubscribe, or emit on other registries freely.
//   - Registration is re-checked right before each call: a listener removed
//     by an earlier callback in the same dispatch is skipped.

use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

type Callback<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Handle for one registered callback. Unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id:      Uuid,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(id: Uuid, release: impl FnOnce() + Send + 'static) -> Self {
        Self { id, release: Some(Box::new(release)) }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Remove the callback. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Ordered set of callbacks taking `&A`. Cloning shares the same set.
pub struct Listeners<A> {
    entries: Arc<Mutex<Vec<(Uuid, Callback<A>)>>>,
}

impl<A> Clone for Listeners<A> {
    fn clone(&self) -> Self {
        Self { entries: Arc::clone(&self.entries) }
    }
}

impl<A: 'static> Default for Listeners<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> Listeners<A> {
    pub fn new() -> Self {
        Self { entries: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn add(&self, callback: impl Fn(&A) + Send + Sync + 'static) -> Subscription {
        let id = Uuid::new_v4();
        let callback: Callback<A> = Arc::new(callback);
        self.entries.lock().push((id, callback));

        // Weak: an outstanding Subscription must not keep a dropped source's
        // registry alive.
        let entries = Arc::downgrade(&self.entries);
        Subscription::new(id, move || {
            if let Some(entries) = entries.upgrade() {
                entries.lock().retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn emit(&self, arg: &A) {
        self.emit_while(arg, || true);
    }

    /// Call every listener registered at the start of dispatch, in
    /// registration order, stopping as soon as `keep_going` returns false.
    pub fn emit_while(&self, arg: &A, mut keep_going: impl FnMut() -> bool) {
        let ids: Vec<Uuid> = self.entries.lock().iter().map(|(id, _)| *id).collect();
        for id in ids {
            if !keep_going() {
                return;
            }
            let callback = self.entries.lock()
                .iter()
                .find(|(entry_id, _)| *entry_id == id)
                .map(|(_, cb)| Arc::clone(cb));
            if let Some(callback) = callback {
                callback(arg);
            }
        }
    }
}
