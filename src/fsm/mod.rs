//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern expressed in safe Rust:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  StateTable                                                   │
//! │  ┌─────────────────┬───────────┬──────────┬────────────────┐  │
//! │  │ StateId          │ on_enter  │ on_exit  │ on_event       │  │
//! │  ├─────────────────┼───────────┼──────────┼────────────────┤  │
//! │  │ Idle             │ —         │ —        │ fn(ctx,ev)->.. │  │
//! │  │ AlertActive      │ fn(ctx)   │ fn(ctx)  │ fn(ctx,ev)->.. │  │
//! │  │ AwaitingCapture  │ fn(ctx)   │ —        │ fn(ctx,ev)->.. │  │
//! │  │ Classifying      │ fn(ctx)   │ —        │ fn(ctx,ev)->.. │  │
//! │  │ Actuating        │ —         │ —        │ fn(ctx,ev)->.. │  │
//! │  └─────────────────┴───────────┴──────────┴────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine hands each event to the **current** state's `on_event`.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the current
//! pointer.  All functions receive `&mut FsmContext`, which carries the
//! active alert, counters, and the action requests the service applies.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

use crate::events::DeviceEvent;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all device states.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    AlertActive = 1,
    AwaitingCapture = 2,
    Classifying = 3,
    Actuating = 4,
}

impl StateId {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert a `u8` index back to `StateId`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release (safe fallback).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::AlertActive,
            2 => Self::AwaitingCapture,
            3 => Self::Classifying,
            4 => Self::Actuating,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-event handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateEventFn = fn(&mut FsmContext, DeviceEvent) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_event: StateEventFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]) and dispatches
/// events against a mutable [`FsmContext`] threaded through every call.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `handle()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Dispatch one event to the current state.
    ///
    /// Returns `true` if a transition occurred.  Events the current state
    /// does not define a transition for are ignored (the handler may still
    /// request side effects, e.g. restarting the idle timer).
    pub fn handle(&mut self, event: DeviceEvent, ctx: &mut FsmContext) -> bool {
        let next = (self.table[self.current].on_event)(ctx, event);

        match next {
            Some(next_id) => {
                self.transition(next_id, ctx);
                true
            }
            None => false,
        }
    }

    /// Force an immediate transition (used by the service to step through
    /// the capture cycle's transient states).
    pub fn force_transition(&mut self, next: StateId, ctx: &mut FsmContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current state
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        // Enter new state
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
