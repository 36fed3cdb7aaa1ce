//! Application service — the hexagonal core.
//!
//! [`StationService`] owns the state machine, the classification pipeline,
//! and the idle countdown.  It exposes a clean, hardware-agnostic API.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  LinkPort ◀──▶ ┌─────────────────────────┐ ──▶ EventSink
//!  CameraPort ──▶│     StationService       │
//!  InferencePort │  FSM · Pipeline · Timer  │──▶ DisplayPort
//!               └─────────────────────────┘
//! ```
//!
//! The capture → classify → actuate cycle runs to completion inside one
//! event-handling turn, so queued events (alerts included) are deferred
//! until the machine is back in `Idle`.

use std::time::Instant;

use log::{info, warn};

use crate::config::StationConfig;
use crate::events::DeviceEvent;
use crate::fsm::context::{DisplayHint, FsmContext, TimerCmd, VideoCmd};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::pipeline::categories::Category;
use crate::pipeline::image::RawFrame;
use crate::pipeline::{Classification, Classifier, InferencePort};
use crate::protocol::frame::{self, ActuationCode};
use crate::timers::IdleTimer;

use super::events::AppEvent;
use super::ports::{CameraPort, DisplayPort, EventSink, LinkPort};

// ───────────────────────────────────────────────────────────────
// StationService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct StationService {
    fsm: Fsm,
    ctx: FsmContext,
    classifier: Classifier,
    /// Idle→video countdown; restarted whenever the machine settles back
    /// into `Idle`.
    idle_timer: IdleTimer,
    ready_sent: bool,
}

impl StationService {
    /// Construct the service from configuration.
    ///
    /// Does **not** announce readiness — call [`start`](Self::start) next.
    pub fn new(config: &StationConfig) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            ctx: FsmContext::new(),
            classifier: Classifier::from_config(config),
            idle_timer: IdleTimer::new(std::time::Duration::from_secs(
                u64::from(config.idle_video_timeout_secs),
            )),
            ready_sent: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the machine in `Idle` and send the ready frame.
    ///
    /// The ready frame goes out exactly once per process, immediately
    /// after the link opened and before any classification cycle.
    pub fn start(
        &mut self,
        link: &mut impl LinkPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        self.fsm.start(&mut self.ctx);

        if !self.ready_sent {
            match link.send(&frame::encode(ActuationCode::Ready)) {
                Ok(()) => {
                    self.ready_sent = true;
                    sink.emit(&AppEvent::ReadySent);
                }
                Err(e) => warn!("ready frame write failed: {e}"),
            }
        }

        display.show(DisplayHint::Idle, None);
        self.idle_timer.restart(Instant::now());
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("StationService started in {:?}", self.fsm.current_state());
    }

    // ── Event dispatch ────────────────────────────────────────

    /// Process one device event to completion.
    ///
    /// This is the single dispatch path for every event source: decoded
    /// command frames, timer expiries, and pipeline completions.  It must
    /// never be re-entered — the control loop serializes calls.
    pub fn handle_event(
        &mut self,
        event: DeviceEvent,
        hw: &mut (impl LinkPort + CameraPort),
        engine: &mut impl InferencePort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        // Cosmetic tick; never touches the state machine.
        if event == DeviceEvent::DisplayTick {
            display.refresh_clock();
            return;
        }

        // Pipeline completions (local or cloud fallback) share one entry.
        if let DeviceEvent::ClassificationDone(result) = event {
            self.on_classification_result(result, hw, display, sink);
            return;
        }

        let prev = self.fsm.current_state();
        self.fsm.handle(event, &mut self.ctx);
        let capture_requested = self.apply_commands(hw, display, sink, None);
        self.emit_state_change(prev, sink);

        if capture_requested {
            self.run_capture_cycle(hw, engine, display, sink);
        }
    }

    /// Complete a classification cycle with `result`.
    ///
    /// Public because the cloud fallback (when wired in) delivers its
    /// verdict through this same entry point.  Ignored unless a cycle is
    /// actually in flight.
    pub fn on_classification_result(
        &mut self,
        result: Classification,
        link: &mut impl LinkPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        let prev = self.fsm.current_state();
        if !matches!(prev, StateId::AwaitingCapture | StateId::Classifying) {
            warn!("classification result ignored in state {prev:?}");
            return;
        }

        self.fsm
            .handle(DeviceEvent::ClassificationDone(result), &mut self.ctx);
        let _ = self.apply_commands(link, display, sink, None);
        self.emit_state_change(prev, sink);

        if result.category == Category::Unrecognized {
            sink.emit(&AppEvent::ClassifyFailed);
        } else {
            sink.emit(&AppEvent::Classified {
                category: result.category,
                confidence: result.confidence,
                total: self.ctx.classified_total,
            });
        }

        // Reply written; the cycle is over.
        let actuating = self.fsm.current_state();
        self.fsm.force_transition(StateId::Idle, &mut self.ctx);
        self.emit_state_change(actuating, sink);
    }

    // ── Timers ────────────────────────────────────────────────

    /// Consume a pending idle-timer expiry, if any.
    pub fn poll_timers(&mut self, now: Instant) -> Option<DeviceEvent> {
        self.idle_timer
            .fired(now)
            .then_some(DeviceEvent::IdleTimeout)
    }

    /// Earliest deadline the control loop must wake for.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.idle_timer.deadline()
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current device state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Successful classifications since startup.
    pub fn classified_total(&self) -> u64 {
        self.ctx.classified_total
    }

    /// Outcome of the most recent cycle.
    pub fn last_result(&self) -> Option<Classification> {
        self.ctx.last_result
    }

    // ── Internal ──────────────────────────────────────────────

    /// Run the synchronous capture → classify leg of a cycle.
    fn run_capture_cycle(
        &mut self,
        hw: &mut (impl LinkPort + CameraPort),
        engine: &mut impl InferencePort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        let frame = match hw.capture() {
            Ok(frame) => frame,
            Err(e) => {
                // Recovered locally: the cycle completes as a failure and
                // the operator retries with another trigger.
                warn!("capture failed ({e}), rejecting item");
                self.on_classification_result(Classification::unrecognized(), hw, display, sink);
                return;
            }
        };

        sink.emit(&AppEvent::FrameCaptured {
            width: frame.width,
            height: frame.height,
        });

        let prev = self.fsm.current_state();
        self.fsm.force_transition(StateId::Classifying, &mut self.ctx);
        let _ = self.apply_commands(hw, display, sink, Some(&frame));
        self.emit_state_change(prev, sink);

        let result = match self.classifier.classify(engine, &frame) {
            Ok(result) => result,
            Err(e) => {
                warn!("inference failed ({e}), rejecting item");
                Classification::unrecognized()
            }
        };
        self.on_classification_result(result, hw, display, sink);
    }

    /// Translate the handlers' action requests into port calls.
    /// Returns `true` if a capture cycle was requested.
    fn apply_commands(
        &mut self,
        link: &mut impl LinkPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
        preview: Option<&RawFrame>,
    ) -> bool {
        let cmds = self.ctx.commands.take();

        match cmds.idle_timer {
            Some(TimerCmd::Restart) => self.idle_timer.restart(Instant::now()),
            Some(TimerCmd::Cancel) => self.idle_timer.cancel(),
            None => {}
        }

        match cmds.video {
            Some(VideoCmd::Play) => {
                display.play_video();
                sink.emit(&AppEvent::VideoStarted);
            }
            Some(VideoCmd::Stop) => display.stop_video(),
            None => {}
        }

        if let Some(hint) = cmds.display {
            display.show(hint, preview);
        }

        if let Some(code) = cmds.actuation {
            // Fire-and-forget: a failed write is logged, never retried.
            match link.send(&frame::encode(code)) {
                Ok(()) => sink.emit(&AppEvent::ActuationSent(code)),
                Err(e) => warn!("actuation write failed: {e}"),
            }
        }

        cmds.request_capture
    }

    fn emit_state_change(&self, from: StateId, sink: &mut impl EventSink) {
        let to = self.fsm.current_state();
        if to == from {
            return;
        }
        sink.emit(&AppEvent::StateChanged { from, to });

        if to == StateId::AlertActive {
            if let Some(kind) = self.ctx.alert {
                sink.emit(&AppEvent::AlertRaised(kind));
            }
        } else if from == StateId::AlertActive {
            sink.emit(&AppEvent::AlertCleared);
        }
    }
}
