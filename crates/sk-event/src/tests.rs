//! Unit tests for sk-event.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{Event, EventApi, EventDispatcher, EventError, ListenerRef};

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
enum Kind {
    Ping,
    Pong,
    Unused,
}

#[derive(Clone, Debug, PartialEq)]
struct Msg {
    kind: Kind,
    seq:  u32,
}

impl Event for Msg {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        self.kind
    }
}

fn ping(seq: u32) -> Msg {
    Msg { kind: Kind::Ping, seq }
}

fn pong(seq: u32) -> Msg {
    Msg { kind: Kind::Pong, seq }
}

type Log = Rc<RefCell<Vec<(&'static str, u32)>>>;

/// A listener that appends `(name, seq)` to `log` for every event it sees.
fn recorder(name: &'static str, log: &Log) -> ListenerRef<Msg> {
    let log = Rc::clone(log);
    Rc::new(move |e: &Msg, _api: &EventApi<Msg>| log.borrow_mut().push((name, e.seq)))
}

fn dispatcher() -> EventDispatcher<Msg> {
    EventDispatcher::new([Kind::Ping, Kind::Pong]).unwrap()
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod construction_tests {
    use super::*;

    #[test]
    fn empty_kind_set_rejected() {
        let result = EventDispatcher::<Msg>::new([]);
        assert!(matches!(result, Err(EventError::NoSupportedKinds)));
    }

    #[test]
    fn duplicate_kinds_collapsed() {
        let d = EventDispatcher::<Msg>::new([Kind::Ping, Kind::Ping, Kind::Pong]).unwrap();
        assert_eq!(d.supported_kinds(), &[Kind::Ping, Kind::Pong]);
    }
}

// ── Subscription ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod subscription_tests {
    use super::*;

    #[test]
    fn add_for_explicit_kinds() {
        let d = dispatcher();
        let log = Log::default();
        let l = recorder("a", &log);
        d.add_listener(Rc::clone(&l), &[Kind::Ping]).unwrap();
        assert!(d.contains_listener(&l, Kind::Ping));
        assert!(!d.contains_listener(&l, Kind::Pong));
    }

    #[test]
    fn empty_kinds_means_all() {
        let d = dispatcher();
        let log = Log::default();
        let l = recorder("a", &log);
        d.add_listener(Rc::clone(&l), &[]).unwrap();
        assert!(d.contains_listener(&l, Kind::Ping));
        assert!(d.contains_listener(&l, Kind::Pong));

        let l2 = recorder("b", &log);
        d.add_listener_all(Rc::clone(&l2));
        assert!(d.contains_listener(&l2, Kind::Pong));
    }

    #[test]
    fn add_is_idempotent() {
        let d = dispatcher();
        let log = Log::default();
        let l = recorder("a", &log);
        d.add_listener(Rc::clone(&l), &[Kind::Ping]).unwrap();
        d.add_listener(Rc::clone(&l), &[Kind::Ping]).unwrap();
        assert_eq!(d.listener_count(Kind::Ping), 1);
        d.dispatch(&ping(1)).unwrap();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn add_unsupported_kind_fails_without_side_effects() {
        let d = dispatcher();
        let log = Log::default();
        let l = recorder("a", &log);
        let err = d.add_listener(Rc::clone(&l), &[Kind::Ping, Kind::Unused]).unwrap_err();
        assert!(matches!(err, EventError::UnsupportedKind(_)));
        assert!(!d.contains_listener(&l, Kind::Ping));
    }

    #[test]
    fn remove_explicit_kind() {
        let d = dispatcher();
        let log = Log::default();
        let l = recorder("a", &log);
        d.add_listener(Rc::clone(&l), &[]).unwrap();
        d.remove_listener(&l, &[Kind::Ping]).unwrap();
        assert!(!d.contains_listener(&l, Kind::Ping));
        assert!(d.contains_listener(&l, Kind::Pong));
    }

    #[test]
    fn remove_unregistered_kind_fails() {
        let d = dispatcher();
        let log = Log::default();
        let l = recorder("a", &log);
        d.add_listener(Rc::clone(&l), &[Kind::Ping]).unwrap();
        let err = d.remove_listener(&l, &[Kind::Ping, Kind::Pong]).unwrap_err();
        assert_eq!(err, EventError::NotRegistered("Pong".into()));
        // Nothing removed.
        assert!(d.contains_listener(&l, Kind::Ping));
    }

    #[test]
    fn remove_with_empty_kinds_removes_everywhere() {
        let d = dispatcher();
        let log = Log::default();
        let l = recorder("a", &log);
        d.add_listener(Rc::clone(&l), &[]).unwrap();
        d.remove_listener(&l, &[]).unwrap();
        assert!(!d.contains_listener(&l, Kind::Ping));
        assert!(!d.contains_listener(&l, Kind::Pong));
        assert!(!d.has_listener_for(Kind::Ping));
    }

    #[test]
    fn api_shares_state_with_dispatcher() {
        let d = dispatcher();
        let api = d.api();
        let log = Log::default();
        let l = recorder("a", &log);
        api.add_listener(Rc::clone(&l), &[Kind::Pong]).unwrap();
        d.dispatch(&pong(3)).unwrap();
        assert_eq!(*log.borrow(), vec![("a", 3)]);
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    #[test]
    fn unsupported_kind_rejected() {
        let d = dispatcher();
        let err = d.dispatch(&Msg { kind: Kind::Unused, seq: 0 }).unwrap_err();
        assert!(matches!(err, EventError::UnsupportedKind(_)));
    }

    #[test]
    fn delivery_in_subscription_order() {
        let d = dispatcher();
        let log = Log::default();
        for name in ["a", "b", "c"] {
            d.add_listener(recorder(name, &log), &[Kind::Ping]).unwrap();
        }
        d.dispatch(&ping(1)).unwrap();
        assert_eq!(*log.borrow(), vec![("a", 1), ("b", 1), ("c", 1)]);
    }

    #[test]
    fn only_matching_kind_delivered() {
        let d = dispatcher();
        let log = Log::default();
        d.add_listener(recorder("a", &log), &[Kind::Pong]).unwrap();
        d.dispatch(&ping(1)).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn listener_added_during_dispatch_misses_current_event() {
        let d = dispatcher();
        let log = Log::default();
        let late = recorder("late", &log);

        let adder: ListenerRef<Msg> = {
            let late = Rc::clone(&late);
            Rc::new(move |_e: &Msg, api: &EventApi<Msg>| {
                api.add_listener(Rc::clone(&late), &[Kind::Ping]).unwrap();
            })
        };
        d.add_listener(adder, &[Kind::Ping]).unwrap();

        d.dispatch(&ping(1)).unwrap();
        assert!(log.borrow().is_empty());
        assert!(d.contains_listener(&late, Kind::Ping));

        d.dispatch(&ping(2)).unwrap();
        assert_eq!(*log.borrow(), vec![("late", 2)]);
    }

    #[test]
    fn self_removal_takes_effect_on_next_event() {
        let d = dispatcher();
        let log = Log::default();

        // The first listener removes itself; the second still sees the event.
        let me: Rc<RefCell<Option<ListenerRef<Msg>>>> = Rc::default();
        let quitter: ListenerRef<Msg> = {
            let me = Rc::clone(&me);
            let log = Rc::clone(&log);
            Rc::new(move |e: &Msg, api: &EventApi<Msg>| {
                log.borrow_mut().push(("quitter", e.seq));
                if let Some(handle) = me.borrow().as_ref() {
                    api.remove_listener(handle, &[Kind::Ping]).unwrap();
                }
            })
        };
        *me.borrow_mut() = Some(Rc::clone(&quitter));
        d.add_listener(Rc::clone(&quitter), &[Kind::Ping]).unwrap();
        d.add_listener(recorder("stayer", &log), &[Kind::Ping]).unwrap();

        d.dispatch(&ping(1)).unwrap();
        assert!(!d.contains_listener(&quitter, Kind::Ping));
        d.dispatch(&ping(2)).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![("quitter", 1), ("stayer", 1), ("stayer", 2)]
        );
        // Break the self-reference cycle.
        me.borrow_mut().take();
    }

    #[test]
    fn removed_listener_still_receives_in_progress_event() {
        let d = dispatcher();
        let log = Log::default();
        let victim = recorder("victim", &log);

        let remover: ListenerRef<Msg> = {
            let victim = Rc::clone(&victim);
            Rc::new(move |_e: &Msg, api: &EventApi<Msg>| {
                api.remove_listener(&victim, &[]).unwrap();
            })
        };
        d.add_listener(remover, &[Kind::Ping]).unwrap();
        d.add_listener(Rc::clone(&victim), &[Kind::Ping]).unwrap();

        d.dispatch(&ping(1)).unwrap();
        d.dispatch(&ping(2)).unwrap();
        assert_eq!(*log.borrow(), vec![("victim", 1)]);
    }

    #[test]
    fn queued_changes_apply_in_request_order() {
        let d = dispatcher();
        let log = Log::default();
        let target = recorder("target", &log);

        // Add then remove during the same dispatch: net effect is "not subscribed".
        let toggler: ListenerRef<Msg> = {
            let target = Rc::clone(&target);
            Rc::new(move |_e: &Msg, api: &EventApi<Msg>| {
                api.add_listener(Rc::clone(&target), &[Kind::Pong]).unwrap();
                api.remove_listener(&target, &[Kind::Pong]).unwrap();
            })
        };
        d.add_listener(toggler, &[Kind::Ping]).unwrap();
        d.dispatch(&ping(1)).unwrap();
        assert!(!d.contains_listener(&target, Kind::Pong));
    }

    #[test]
    fn removal_of_pending_addition_is_validated_against_queue() {
        let d = dispatcher();
        let log = Log::default();
        let target = recorder("target", &log);
        let outcome: Rc<RefCell<Vec<bool>>> = Rc::default();

        let probe: ListenerRef<Msg> = {
            let target = Rc::clone(&target);
            let outcome = Rc::clone(&outcome);
            Rc::new(move |_e: &Msg, api: &EventApi<Msg>| {
                // Not yet subscribed: removal must fail.
                outcome.borrow_mut().push(api.remove_listener(&target, &[Kind::Pong]).is_ok());
                api.add_listener(Rc::clone(&target), &[Kind::Pong]).unwrap();
                // Subscribed once the queue drains: removal is accepted.
                outcome.borrow_mut().push(api.remove_listener(&target, &[Kind::Pong]).is_ok());
            })
        };
        d.add_listener(probe, &[Kind::Ping]).unwrap();
        d.dispatch(&ping(1)).unwrap();
        assert_eq!(*outcome.borrow(), vec![false, true]);
    }

    #[test]
    fn nested_dispatch_defers_changes_until_outermost_returns() {
        let d = dispatcher();
        let log = Log::default();
        let late = recorder("late", &log);

        // On Ping: subscribe `late` to Pong, then dispatch Pong from inside.
        let relay: ListenerRef<Msg> = {
            let late = Rc::clone(&late);
            let inner = d.clone();
            Rc::new(move |e: &Msg, api: &EventApi<Msg>| {
                if e.kind == Kind::Ping {
                    api.add_listener(Rc::clone(&late), &[Kind::Pong]).unwrap();
                    inner.dispatch(&pong(e.seq)).unwrap();
                }
            })
        };
        d.add_listener(relay, &[Kind::Ping]).unwrap();
        d.add_listener(recorder("pong", &log), &[Kind::Pong]).unwrap();

        d.dispatch(&ping(1)).unwrap();
        // The nested Pong reached the existing listener but not `late`.
        assert_eq!(*log.borrow(), vec![("pong", 1)]);
        assert!(d.contains_listener(&late, Kind::Pong));
        assert!(!d.is_dispatching());
    }
}
