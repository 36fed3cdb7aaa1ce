//! Port traits — the hexagonal boundary between domain logic and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ StationService (domain)
//! ```
//!
//! Driven adapters (serial link, camera, display, event sinks) implement
//! these traits.  The [`StationService`](super::service::StationService)
//! consumes them via generics, so the domain core never touches hardware
//! directly and every behaviour is replayable against mocks.

use crate::error::{CaptureError, LinkError};
use crate::fsm::context::DisplayHint;
use crate::pipeline::image::RawFrame;
use crate::protocol::frame::FRAME_LEN;

// The engine contract lives with the pipeline that drives it; re-exported
// here so adapters only need one import path for ports.
pub use crate::pipeline::{InferencePort, InputTensor, OutputTensor, TensorKind};

// ───────────────────────────────────────────────────────────────
// Serial link port
// ───────────────────────────────────────────────────────────────

/// Byte-oriented serial channel to the bin controller.
///
/// Reads are polled by the intake pump; a read that times out reports
/// zero bytes rather than an error.  Writes are fire-and-forget — the
/// protocol has no acknowledgement beyond the heartbeat code.
pub trait LinkPort {
    /// Read up to `buf.len()` bytes.  Returns the number of bytes read,
    /// 0 if none arrived within the poll window.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError>;

    /// Write one complete reply frame.
    fn send(&mut self, frame: &[u8; FRAME_LEN]) -> Result<(), LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Camera port
// ───────────────────────────────────────────────────────────────

/// Still-capture collaborator.
///
/// Blocking is acceptable: the state machine refuses re-entrant capture
/// triggers while a cycle is in flight, and serial intake continues on
/// its own thread.
pub trait CameraPort {
    /// Take one still and return its packed pixel buffer.
    fn capture(&mut self) -> Result<RawFrame, CaptureError>;
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

/// Operator display / video collaborator.  Purely observational — nothing
/// it does feeds back into the control logic.
pub trait DisplayPort {
    /// Show a state hint, optionally with the captured still as preview.
    fn show(&mut self, hint: DisplayHint, preview: Option<&RawFrame>);

    /// Start looping the promotional video.
    fn play_video(&mut self);

    /// Stop video playback.  Idempotent.
    fn stop_video(&mut self);

    /// Cosmetic wall-clock refresh.
    fn refresh_clock(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (terminal log,
/// telemetry upload, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
