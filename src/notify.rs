//! "Graph changed" notification with batching.
//!
//! A [`ChangeNotifier`] is a shared list of listeners plus a nesting counter.
//! While the counter is above zero, [`ChangeNotifier::raise`] is swallowed;
//! bringing the counter back to zero fires one [`GraphChanged`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::GraphError;

/// Marker delivered to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphChanged;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&GraphChanged)>;

#[derive(Default)]
struct Inner {
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    depth: Cell<usize>,
    next_id: Cell<u64>,
}

/// Cloning yields another handle to the same listeners and counter.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    inner: Rc<Inner>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&GraphChanged) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn is_batching(&self) -> bool {
        self.inner.depth.get() > 0
    }

    pub fn raise(&self) {
        if self.is_batching() {
            return;
        }
        // Listeners may subscribe or unsubscribe while being notified.
        let snapshot: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener(&GraphChanged);
        }
    }

    pub fn start_changes(&self) {
        self.inner.depth.set(self.inner.depth.get() + 1);
    }

    pub fn end_changes(&self) -> Result<(), GraphError> {
        let depth = self.inner.depth.get();
        if depth == 0 {
            return Err(GraphError::UnbalancedChanges);
        }
        self.inner.depth.set(depth - 1);
        if depth == 1 {
            self.raise();
        }
        Ok(())
    }

    /// Starts a batch that ends when the returned guard is dropped.
    pub fn batch(&self) -> ChangeBatch {
        self.start_changes();
        ChangeBatch {
            notifier: self.clone(),
        }
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listener_count())
            .field("depth", &self.inner.depth.get())
            .finish()
    }
}

#[must_use = "the batch ends as soon as the guard is dropped"]
pub struct ChangeBatch {
    notifier: ChangeNotifier,
}

impl Drop for ChangeBatch {
    fn drop(&mut self) {
        // The guard owns exactly one start_changes, so the counter is non-zero here.
        let _ = self.notifier.end_changes();
    }
}
