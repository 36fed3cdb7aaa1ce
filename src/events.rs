//! Device event queue.
//!
//! Events are produced by:
//! - the serial reader thread (decoded command frames)
//! - the control loop's own timers (idle→video timeout, display refresh)
//! - the classification pipeline (cycle completion)
//!
//! Events are consumed by the single control thread, which processes them
//! one at a time to completion — the state machine is never re-entered.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Reader thread│────▶│              │     │              │
//! │ Timers       │────▶│  Event Queue │────▶│ Control Loop │
//! │ Pipeline     │────▶│  (bounded)   │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```

use std::time::Instant;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use log::warn;

use crate::pipeline::Classification;

/// Maximum number of pending events before producers start dropping.
const EVENT_QUEUE_CAP: usize = 32;

/// Everything that can drive the device state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEvent {
    // ── Decoded command frames ────────────────────────────
    /// Operator cleared an active alert (0x00).
    CancelAlert,
    /// An item was deposited; capture and classify it (0x01).
    CaptureTrigger,
    /// The mechanical sorter finished moving the item (0x02).
    DepositComplete,
    /// A compartment is full (0x04).
    OverflowAlert,
    /// The station has been knocked over (0x08).
    TiltAlert,
    /// Link keep-alive (0xFF); acknowledged, ignored.
    Heartbeat,

    // ── Timers ────────────────────────────────────────────
    /// No activity since returning to idle; start promo video.
    IdleTimeout,
    /// Cosmetic wall-clock refresh.
    DisplayTick,

    // ── Pipeline ──────────────────────────────────────────
    /// A classification cycle finished (local engine or cloud fallback).
    ClassificationDone(Classification),
}

// ── Bounded event channel ─────────────────────────────────────
//
// Producers hold an `EventSender` clone; the control loop owns the sole
// `EventReceiver`.  A full queue drops the event rather than blocking a
// producer — the serial reader must never stall on a slow consumer.

/// Producer half of the event queue.
#[derive(Clone)]
pub struct EventSender(Sender<DeviceEvent>);

/// Consumer half of the event queue.
pub struct EventReceiver(Receiver<DeviceEvent>);

/// Create the station's event queue.
pub fn event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = bounded(EVENT_QUEUE_CAP);
    (EventSender(tx), EventReceiver(rx))
}

impl EventSender {
    /// Push an event.  Returns `false` if the queue was full (event dropped).
    pub fn push(&self, event: DeviceEvent) -> bool {
        match self.0.try_send(event) {
            Ok(()) => true,
            Err(_) => {
                warn!("event queue full, dropping {event:?}");
                false
            }
        }
    }
}

impl EventReceiver {
    /// Block until an event arrives or `deadline` passes.
    pub fn recv_deadline(&self, deadline: Instant) -> Option<DeviceEvent> {
        match self.0.recv_deadline(deadline) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Non-blocking pop, for draining in tests.
    pub fn try_recv(&self) -> Option<DeviceEvent> {
        self.0.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn push_then_recv_in_fifo_order() {
        let (tx, rx) = event_channel();
        assert!(tx.push(DeviceEvent::CaptureTrigger));
        assert!(tx.push(DeviceEvent::Heartbeat));
        assert_eq!(rx.try_recv(), Some(DeviceEvent::CaptureTrigger));
        assert_eq!(rx.try_recv(), Some(DeviceEvent::Heartbeat));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn full_queue_drops_instead_of_blocking() {
        let (tx, rx) = event_channel();
        for _ in 0..EVENT_QUEUE_CAP {
            assert!(tx.push(DeviceEvent::Heartbeat));
        }
        assert!(!tx.push(DeviceEvent::Heartbeat));
        drop(rx);
    }

    #[test]
    fn recv_deadline_times_out_when_empty() {
        let (_tx, rx) = event_channel();
        let deadline = Instant::now() + Duration::from_millis(5);
        assert_eq!(rx.recv_deadline(deadline), None);
    }
}
