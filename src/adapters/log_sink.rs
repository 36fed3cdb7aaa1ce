//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger.  A future telemetry-upload adapter would implement the
//! same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::ReadySent => {
                info!("LINK  | ready frame sent");
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::FrameCaptured { width, height } => {
                info!("FRAME | captured {width}x{height}");
            }
            AppEvent::Classified {
                category,
                confidence,
                total,
            } => {
                info!(
                    "SORT  | #{} {} ({:.0}%)",
                    total,
                    category.label(),
                    confidence * 100.0
                );
            }
            AppEvent::ClassifyFailed => {
                info!("SORT  | failed, item held for retry");
            }
            AppEvent::ActuationSent(code) => {
                info!("LINK  | actuation 0x{:02X}", code.byte());
            }
            AppEvent::AlertRaised(kind) => {
                info!("ALERT | {}", kind.label());
            }
            AppEvent::AlertCleared => {
                info!("ALERT | cleared");
            }
            AppEvent::VideoStarted => {
                info!("VIDEO | playback started");
            }
        }
    }
}
