//! The `Event` and `Listener` traits.

use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use crate::EventApi;

/// Something that can be dispatched.
///
/// Every event reports a `Kind`; a dispatcher declares up front which kinds
/// it supports and listeners subscribe per kind.
pub trait Event: 'static {
    type Kind: Copy + Eq + Hash + Debug + 'static;

    fn kind(&self) -> Self::Kind;
}

/// Receives events from an [`EventDispatcher`][crate::EventDispatcher].
///
/// The `api` argument is a subscription handle to the dispatcher that is
/// delivering the event, so a listener can unsubscribe itself or subscribe
/// others from inside the callback.
///
/// Any `Fn(&E, &EventApi<E>)` closure is a listener.
pub trait Listener<E: Event>: 'static {
    fn handle_event(&self, event: &E, api: &EventApi<E>);
}

impl<E, F> Listener<E> for F
where
    E: Event,
    F: Fn(&E, &EventApi<E>) + 'static,
{
    fn handle_event(&self, event: &E, api: &EventApi<E>) {
        self(event, api)
    }
}

/// Shared listener handle.  Identity is the address of the `Rc` allocation,
/// so the same handle must be passed to add and remove.
pub type ListenerRef<E> = Rc<dyn Listener<E>>;
