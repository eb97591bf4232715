//! The `State` trait — behavior attached to each state value.

use std::fmt::Debug;
use std::hash::Hash;

/// Bound for trigger events fed to a state machine.
pub trait Trigger: Copy + Eq + Hash + Debug + 'static {}

impl<T: Copy + Eq + Hash + Debug + 'static> Trigger for T {}

/// A state of a [`StateMachine`][crate::StateMachine] over triggers `E` and
/// context `C`.
///
/// All hooks have no-op defaults, so a plain enum with
/// `impl State<E, C> for MyState {}` is a valid state set.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
/// enum Door { Open, Closed }
///
/// impl State<Push, Counter> for Door {
///     fn on_entry(&self, _event: Push, ctx: &mut Counter) {
///         ctx.entries += 1;
///     }
/// }
/// ```
pub trait State<E: Trigger, C>: Copy + Eq + Hash + Debug + 'static {
    /// Called after every `StateMachine::handle` step on the state that is
    /// current at that point, with the trigger that was just processed
    /// (`None` when the machine was poked without a trigger).
    ///
    /// Returning `Some(next)` makes the machine process `next` immediately.
    fn handle(&self, _event: Option<E>, _context: &mut C) -> Option<E> {
        None
    }

    /// Called when the machine enters this state via `event`.
    fn on_entry(&self, _event: E, _context: &mut C) {}

    /// Called when the machine leaves this state via `event`.
    fn on_exit(&self, _event: E, _context: &mut C) {}
}
