//! Shared mutable context threaded through every state handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to: the active alert, the success counter, and the action
//! requests the service applies through its ports after each dispatch.
//! Think of it as the "blackboard" in a blackboard architecture.

use crate::pipeline::Classification;
use crate::pipeline::categories::Category;
use crate::protocol::frame::ActuationCode;

// ---------------------------------------------------------------------------
// Alerts and display hints
// ---------------------------------------------------------------------------

/// Which physical alarm the bin raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// A compartment is full.
    Overflow,
    /// The station has been knocked over.
    Tilt,
}

impl AlertKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overflow => "overflow alert",
            Self::Tilt => "tilt alert",
        }
    }
}

/// State hint forwarded to the display collaborator.  Purely
/// observational; nothing reads it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayHint {
    /// Home screen.
    Idle,
    Alert(AlertKind),
    /// A deposit was sensed and a still is being taken.
    CaptureStarted,
    /// Inference in progress (shown with the captured preview).
    Classifying,
    /// Item sorted into the compartment for `Category`.
    Sorted(Category),
    /// Classification failed; the item is held for operator retry.
    ClassifyFailed,
    /// Idle long enough that the promo video is playing.
    PlayingVideo,
}

impl DisplayHint {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Alert(kind) => kind.label(),
            Self::CaptureStarted => "capture triggered",
            Self::Classifying => "classifying",
            Self::Sorted(category) => category.label(),
            Self::ClassifyFailed => "classify failed",
            Self::PlayingVideo => "playing video",
        }
    }
}

// ---------------------------------------------------------------------------
// Action requests (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Idle-timer operation requested by a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCmd {
    Restart,
    Cancel,
}

/// Video playback operation requested by a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCmd {
    Play,
    Stop,
}

/// Side effects a state handler requests for the current event.
///
/// Handlers stay pure over the context; the service drains these after
/// every dispatch and performs the actual port calls.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ActionRequests {
    pub display: Option<DisplayHint>,
    /// Ask the service to run a capture/classify cycle.
    pub request_capture: bool,
    /// Reply frame to write onto the link.
    pub actuation: Option<ActuationCode>,
    pub idle_timer: Option<TimerCmd>,
    pub video: Option<VideoCmd>,
}

impl ActionRequests {
    /// Take the pending requests, leaving an empty set.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    /// Alarm currently shown, if any.  Set on entering `AlertActive`,
    /// cleared on leaving it.
    pub alert: Option<AlertKind>,

    /// Pending side effects for the service to apply.
    pub commands: ActionRequests,

    /// Successful (non-unrecognized) classifications since startup.
    /// Reporting only; never read for control flow.
    pub classified_total: u64,

    /// Outcome of the most recent cycle, for telemetry.
    pub last_result: Option<Classification>,
}

impl FsmContext {
    pub fn new() -> Self {
        Self {
            alert: None,
            commands: ActionRequests::default(),
            classified_total: 0,
            last_result: None,
        }
    }
}

impl Default for FsmContext {
    fn default() -> Self {
        Self::new()
    }
}
