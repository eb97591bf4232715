//! `EventDispatcher` and its subscription view `EventApi`.
//!
//! # Design
//!
//! Both types are cheap `Rc` handles onto one shared state, so a dispatcher
//! can be owned by a component while listeners hold (or are handed) an
//! `EventApi` to the same subscriber table.  Everything runs on one logical
//! thread; interior mutability is `RefCell`/`Cell`, never a lock.
//!
//! Per kind, subscribers are kept in subscription order (`Vec`) next to an
//! address index (`HashSet`) so that [`EventApi::contains_listener`] is O(1)
//! and dispatch order is reproducible.

use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::ops::Deref;
use std::rc::Rc;

use tracing::trace;

use crate::{Event, EventError, EventResult, ListenerRef};

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

#[cfg(feature = "fx-hash")]
type Set<T> = rustc_hash::FxHashSet<T>;
#[cfg(not(feature = "fx-hash"))]
type Set<T> = std::collections::HashSet<T>;

/// Address of the listener allocation, used as its identity.
fn listener_key<E: Event>(listener: &ListenerRef<E>) -> usize {
    Rc::as_ptr(listener) as *const () as usize
}

fn kind_name<K: Debug>(kind: &K) -> String {
    format!("{kind:?}")
}

// ── Shared state ──────────────────────────────────────────────────────────────

/// Subscribers of one event kind.
struct Subscribers<E: Event> {
    order: Vec<ListenerRef<E>>,
    index: Set<usize>,
}

impl<E: Event> Default for Subscribers<E> {
    fn default() -> Self {
        Self { order: Vec::new(), index: Set::default() }
    }
}

impl<E: Event> Subscribers<E> {
    fn contains(&self, key: usize) -> bool {
        self.index.contains(&key)
    }

    fn insert(&mut self, listener: &ListenerRef<E>) {
        if self.index.insert(listener_key(listener)) {
            self.order.push(Rc::clone(listener));
        }
    }

    fn remove(&mut self, key: usize) {
        if self.index.remove(&key) {
            self.order.retain(|l| listener_key(l) != key);
        }
    }
}

/// A subscription change requested while a dispatch was in progress.
enum PendingOp<E: Event> {
    Add(ListenerRef<E>, Vec<E::Kind>),
    /// An empty kind list means "every kind it is subscribed to".
    Remove(ListenerRef<E>, Vec<E::Kind>),
}

struct DispatcherState<E: Event> {
    /// Supported kinds, in declaration order.
    supported: Vec<E::Kind>,
    listeners: RefCell<Map<E::Kind, Subscribers<E>>>,
    /// Number of dispatches currently on the stack.
    depth:     Cell<usize>,
    pending:   RefCell<Vec<PendingOp<E>>>,
}

impl<E: Event> DispatcherState<E> {
    fn check_supported(&self, kind: &E::Kind) -> EventResult<()> {
        if self.supported.contains(kind) {
            Ok(())
        } else {
            Err(EventError::UnsupportedKind(kind_name(kind)))
        }
    }

    fn is_dispatching(&self) -> bool {
        self.depth.get() > 0
    }

    /// Whether `key` will be subscribed to `kind` once pending changes apply.
    fn effectively_contains(&self, key: usize, kind: &E::Kind) -> bool {
        for op in self.pending.borrow().iter().rev() {
            match op {
                PendingOp::Add(l, kinds) if listener_key(l) == key && kinds.contains(kind) => {
                    return true;
                }
                PendingOp::Remove(l, kinds)
                    if listener_key(l) == key && (kinds.is_empty() || kinds.contains(kind)) =>
                {
                    return false;
                }
                _ => {}
            }
        }
        self.listeners
            .borrow()
            .get(kind)
            .is_some_and(|subs| subs.contains(key))
    }

    fn apply_add(&self, listener: &ListenerRef<E>, kinds: &[E::Kind]) {
        let mut listeners = self.listeners.borrow_mut();
        for kind in kinds {
            listeners.entry(*kind).or_default().insert(listener);
        }
    }

    fn apply_remove(&self, listener: &ListenerRef<E>, kinds: &[E::Kind]) {
        let key = listener_key(listener);
        let mut listeners = self.listeners.borrow_mut();
        if kinds.is_empty() {
            for subs in listeners.values_mut() {
                subs.remove(key);
            }
        } else {
            for kind in kinds {
                if let Some(subs) = listeners.get_mut(kind) {
                    subs.remove(key);
                }
            }
        }
    }

    /// Apply every queued change in request order.
    fn drain_pending(&self) {
        let ops: Vec<PendingOp<E>> = std::mem::take(&mut *self.pending.borrow_mut());
        if !ops.is_empty() {
            trace!(count = ops.len(), "applying deferred subscription changes");
        }
        for op in ops {
            match op {
                PendingOp::Add(l, kinds) => self.apply_add(&l, &kinds),
                PendingOp::Remove(l, kinds) => self.apply_remove(&l, &kinds),
            }
        }
    }
}

/// Decrements the dispatch depth even if a listener unwinds.
struct DepthGuard<'a>(&'a Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

// ── EventApi ──────────────────────────────────────────────────────────────────

/// Subscription side of a dispatcher.
///
/// Hand this out to code that must react to events but must not be able to
/// dispatch them.  Cloning is cheap; all clones view the same dispatcher.
pub struct EventApi<E: Event> {
    state: Rc<DispatcherState<E>>,
}

impl<E: Event> Clone for EventApi<E> {
    fn clone(&self) -> Self {
        Self { state: Rc::clone(&self.state) }
    }
}

impl<E: Event> EventApi<E> {
    /// Subscribe `listener` to `kinds`, or to every supported kind if `kinds`
    /// is empty.
    ///
    /// Subscribing twice to the same kind is a no-op.  Fails, without
    /// subscribing to anything, if any kind is unsupported.
    pub fn add_listener(&self, listener: ListenerRef<E>, kinds: &[E::Kind]) -> EventResult<()> {
        let state = &self.state;
        for kind in kinds {
            state.check_supported(kind)?;
        }
        let kinds: Vec<E::Kind> = if kinds.is_empty() {
            state.supported.clone()
        } else {
            kinds.to_vec()
        };

        if state.is_dispatching() {
            trace!(?kinds, "queueing listener addition until dispatch completes");
            state.pending.borrow_mut().push(PendingOp::Add(listener, kinds));
        } else {
            state.apply_add(&listener, &kinds);
        }
        Ok(())
    }

    /// Subscribe `listener` to every supported kind.
    pub fn add_listener_all(&self, listener: ListenerRef<E>) {
        let kinds = self.state.supported.clone();
        if self.state.is_dispatching() {
            self.state.pending.borrow_mut().push(PendingOp::Add(listener, kinds));
        } else {
            self.state.apply_add(&listener, &kinds);
        }
    }

    /// Unsubscribe `listener` from `kinds`.
    ///
    /// With explicit kinds, every `(listener, kind)` subscription must exist,
    /// otherwise nothing is removed and an error is returned.  An empty
    /// `kinds` removes the listener from whatever it is subscribed to.
    pub fn remove_listener(&self, listener: &ListenerRef<E>, kinds: &[E::Kind]) -> EventResult<()> {
        let state = &self.state;
        let key = listener_key(listener);
        for kind in kinds {
            state.check_supported(kind)?;
            if !state.effectively_contains(key, kind) {
                return Err(EventError::NotRegistered(kind_name(kind)));
            }
        }

        if state.is_dispatching() {
            trace!(?kinds, "queueing listener removal until dispatch completes");
            state
                .pending
                .borrow_mut()
                .push(PendingOp::Remove(Rc::clone(listener), kinds.to_vec()));
        } else {
            state.apply_remove(listener, kinds);
        }
        Ok(())
    }

    /// `true` if `listener` is currently subscribed to `kind`.
    ///
    /// Reflects applied subscriptions only: changes queued during an
    /// in-progress dispatch show up once it completes.
    pub fn contains_listener(&self, listener: &ListenerRef<E>, kind: E::Kind) -> bool {
        self.state
            .listeners
            .borrow()
            .get(&kind)
            .is_some_and(|subs| subs.contains(listener_key(listener)))
    }

    /// `true` if at least one listener is subscribed to `kind`.
    pub fn has_listener_for(&self, kind: E::Kind) -> bool {
        self.listener_count(kind) > 0
    }

    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.state
            .listeners
            .borrow()
            .get(&kind)
            .map_or(0, |subs| subs.order.len())
    }

    /// Supported kinds, in declaration order.
    pub fn supported_kinds(&self) -> &[E::Kind] {
        &self.state.supported
    }
}

// ── EventDispatcher ───────────────────────────────────────────────────────────

/// Dispatch side of the bus.  Dereferences to [`EventApi`] for subscription.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = EventDispatcher::new([Kind::Started, Kind::Stopped])?;
/// let listener: ListenerRef<Lifecycle> =
///     Rc::new(|e: &Lifecycle, _api: &EventApi<Lifecycle>| println!("{e:?}"));
/// dispatcher.add_listener(listener, &[Kind::Started])?;
/// dispatcher.dispatch(&Lifecycle::started())?;
/// ```
pub struct EventDispatcher<E: Event> {
    api: EventApi<E>,
}

impl<E: Event> Clone for EventDispatcher<E> {
    fn clone(&self) -> Self {
        Self { api: self.api.clone() }
    }
}

impl<E: Event> Deref for EventDispatcher<E> {
    type Target = EventApi<E>;

    fn deref(&self) -> &EventApi<E> {
        &self.api
    }
}

impl<E: Event> EventDispatcher<E> {
    /// Create a dispatcher supporting exactly `kinds` (duplicates ignored).
    pub fn new(kinds: impl IntoIterator<Item = E::Kind>) -> EventResult<Self> {
        let mut supported: Vec<E::Kind> = Vec::new();
        for kind in kinds {
            if !supported.contains(&kind) {
                supported.push(kind);
            }
        }
        if supported.is_empty() {
            return Err(EventError::NoSupportedKinds);
        }
        let state = DispatcherState {
            supported,
            listeners: RefCell::new(Map::default()),
            depth:     Cell::new(0),
            pending:   RefCell::new(Vec::new()),
        };
        Ok(Self { api: EventApi { state: Rc::new(state) } })
    }

    /// A subscription-only handle to this dispatcher.
    pub fn api(&self) -> EventApi<E> {
        self.api.clone()
    }

    /// Deliver `event` to every listener subscribed to its kind when the call
    /// began, in subscription order.
    pub fn dispatch(&self, event: &E) -> EventResult<()> {
        let state = &self.api.state;
        let kind = event.kind();
        state.check_supported(&kind)?;

        let snapshot: Vec<ListenerRef<E>> = state
            .listeners
            .borrow()
            .get(&kind)
            .map(|subs| subs.order.clone())
            .unwrap_or_default();
        trace!(?kind, listeners = snapshot.len(), depth = state.depth.get(), "dispatch");

        state.depth.set(state.depth.get() + 1);
        {
            let _guard = DepthGuard(&state.depth);
            for listener in &snapshot {
                listener.handle_event(event, &self.api);
            }
        }

        if !state.is_dispatching() {
            state.drain_pending();
        }
        Ok(())
    }

    /// `true` while a dispatch on this dispatcher is on the stack.
    pub fn is_dispatching(&self) -> bool {
        self.api.state.is_dispatching()
    }
}
