//! Outbound application events.
//!
//! The [`StationService`](super::service::StationService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them — log to the terminal,
//! forward to telemetry, or record for assertions in tests.

use crate::fsm::StateId;
use crate::fsm::context::AlertKind;
use crate::pipeline::categories::Category;
use crate::protocol::frame::ActuationCode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(StateId),

    /// The ready frame went out after link open.
    ReadySent,

    /// The state machine transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A still was captured for classification.
    FrameCaptured { width: u32, height: u32 },

    /// A cycle finished with a usable category.
    Classified {
        category: Category,
        confidence: f32,
        /// Successful classifications since startup.
        total: u64,
    },

    /// A cycle finished without a usable category; the item is held.
    ClassifyFailed,

    /// A reply frame was written to the link.
    ActuationSent(ActuationCode),

    /// The bin raised an alarm.
    AlertRaised(AlertKind),

    /// The operator cleared the alarm.
    AlertCleared,

    /// Idle long enough that promo video playback started.
    VideoStarted,
}
