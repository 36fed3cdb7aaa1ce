//! Integration tests: the service against mock hardware.

use std::time::{Duration, Instant};

use sortstation::app::events::AppEvent;
use sortstation::app::service::StationService;
use sortstation::config::StationConfig;
use sortstation::error::CaptureError;
use sortstation::events::DeviceEvent;
use sortstation::fsm::StateId;
use sortstation::fsm::context::{AlertKind, DisplayHint};
use sortstation::pipeline::Classification;
use sortstation::pipeline::categories::Category;
use sortstation::protocol::frame::ActuationCode;

use crate::mock_hw::{MockEngine, MockHardware, RecordingDisplay, RecordingSink};

struct Station {
    service: StationService,
    hw: MockHardware,
    engine: MockEngine,
    display: RecordingDisplay,
    sink: RecordingSink,
}

impl Station {
    fn started(engine: MockEngine) -> Self {
        let mut s = Self {
            service: StationService::new(&StationConfig::default()),
            hw: MockHardware::new(),
            engine,
            display: RecordingDisplay::new(),
            sink: RecordingSink::new(),
        };
        s.service
            .start(&mut s.hw, &mut s.display, &mut s.sink);
        s
    }

    fn handle(&mut self, event: DeviceEvent) {
        self.service.handle_event(
            event,
            &mut self.hw,
            &mut self.engine,
            &mut self.display,
            &mut self.sink,
        );
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn ready_frame_sent_once_at_startup() {
    let station = Station::started(MockEngine::silent());
    assert_eq!(station.hw.written, vec![[0x30, 0xCF, 0xCC, 0xCF, 0x30]]);
    assert!(station.sink.contains(&AppEvent::ReadySent));
    assert!(station.sink.contains(&AppEvent::Started(StateId::Idle)));
    assert_eq!(station.service.state(), StateId::Idle);
}

// ── Full cycle ────────────────────────────────────────────────

#[test]
fn capture_trigger_runs_a_full_recyclable_cycle() {
    // Index 5 lies in the recyclable span of the default partition.
    let mut station = Station::started(MockEngine::confident(5, 0.9));
    station.handle(DeviceEvent::CaptureTrigger);

    // One capture, one inference, reply 0x01 after the ready frame.
    assert_eq!(station.hw.captures, 1);
    assert_eq!(station.engine.invocations, 1);
    assert_eq!(station.hw.written_payloads(), vec![0xCC, 0x01]);
    assert_eq!(station.hw.last_written(), Some(&[0x30, 0xCF, 0x01, 0xCF, 0x30]));

    // Counter moved, machine settled back to Idle.
    assert_eq!(station.service.classified_total(), 1);
    assert_eq!(station.service.state(), StateId::Idle);

    assert!(station.sink.contains(&AppEvent::Classified {
        category: Category::Recyclable,
        confidence: 0.9,
        total: 1,
    }));
    assert!(
        station
            .sink
            .contains(&AppEvent::ActuationSent(ActuationCode::Recyclable))
    );

    // The display walked the whole cycle, with the preview while
    // classifying.
    assert_eq!(
        station.display.hints,
        vec![
            DisplayHint::Idle,
            DisplayHint::CaptureStarted,
            DisplayHint::Classifying,
            DisplayHint::Sorted(Category::Recyclable),
        ]
    );
    assert_eq!(station.display.previews, 1);
}

#[test]
fn cycle_walks_every_state_in_order() {
    let mut station = Station::started(MockEngine::confident(8, 0.8));
    station.handle(DeviceEvent::CaptureTrigger);

    let transitions: Vec<(StateId, StateId)> = station
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (StateId::Idle, StateId::AwaitingCapture),
            (StateId::AwaitingCapture, StateId::Classifying),
            (StateId::Classifying, StateId::Actuating),
            (StateId::Actuating, StateId::Idle),
        ]
    );
}

#[test]
fn low_confidence_cycle_sends_failure_code() {
    let mut station = Station::started(MockEngine::silent());
    station.handle(DeviceEvent::CaptureTrigger);

    assert_eq!(station.hw.last_written(), Some(&[0x30, 0xCF, 0xFF, 0xCF, 0x30]));
    assert_eq!(station.service.classified_total(), 0);
    assert_eq!(station.service.state(), StateId::Idle);
    assert!(station.sink.contains(&AppEvent::ClassifyFailed));
    assert_eq!(
        station.display.hints.last(),
        Some(&DisplayHint::ClassifyFailed)
    );
}

#[test]
fn reject_class_win_counts_as_failure() {
    let mut station = Station::started(MockEngine::confident(0, 0.99));
    station.handle(DeviceEvent::CaptureTrigger);

    assert_eq!(station.hw.written_payloads(), vec![0xCC, 0xFF]);
    assert_eq!(station.service.classified_total(), 0);
}

#[test]
fn capture_failure_recovers_as_failed_cycle() {
    let mut station = Station::started(MockEngine::confident(5, 0.9));
    station.hw.capture_failure = Some(CaptureError::CommandFailed);
    station.handle(DeviceEvent::CaptureTrigger);

    // No inference ran, the failure code went out, machine is Idle again.
    assert_eq!(station.engine.invocations, 0);
    assert_eq!(station.hw.written_payloads(), vec![0xCC, 0xFF]);
    assert_eq!(station.service.state(), StateId::Idle);

    // Operator retry works once the camera is back.
    station.hw.capture_failure = None;
    station.handle(DeviceEvent::CaptureTrigger);
    assert_eq!(station.service.classified_total(), 1);
}

#[test]
fn successive_cycles_accumulate_the_counter() {
    let mut station = Station::started(MockEngine::confident(2, 0.7));
    for _ in 0..3 {
        station.handle(DeviceEvent::CaptureTrigger);
    }
    assert_eq!(station.service.classified_total(), 3);
    assert_eq!(station.hw.written_payloads(), vec![0xCC, 0x04, 0x04, 0x04]);
}

// ── Alerts ────────────────────────────────────────────────────

#[test]
fn overflow_alert_blocks_capture_until_cancelled() {
    let mut station = Station::started(MockEngine::confident(5, 0.9));

    station.handle(DeviceEvent::OverflowAlert);
    assert_eq!(station.service.state(), StateId::AlertActive);
    assert!(
        station
            .sink
            .contains(&AppEvent::AlertRaised(AlertKind::Overflow))
    );
    // Alerts produce no outbound frame.
    assert_eq!(station.hw.written_payloads(), vec![0xCC]);

    // Capture trigger during the alert: no transition, no capture.
    station.handle(DeviceEvent::CaptureTrigger);
    assert_eq!(station.service.state(), StateId::AlertActive);
    assert_eq!(station.hw.captures, 0);

    station.handle(DeviceEvent::CancelAlert);
    assert_eq!(station.service.state(), StateId::Idle);
    assert!(station.sink.contains(&AppEvent::AlertCleared));

    // Capture works again afterwards.
    station.handle(DeviceEvent::CaptureTrigger);
    assert_eq!(station.hw.captures, 1);
}

#[test]
fn alert_cancels_idle_countdown() {
    let mut station = Station::started(MockEngine::silent());
    assert!(station.service.next_deadline().is_some());

    station.handle(DeviceEvent::TiltAlert);
    assert_eq!(station.service.next_deadline(), None);

    station.handle(DeviceEvent::CancelAlert);
    assert!(station.service.next_deadline().is_some());
}

// ── Idle timer and video ─────────────────────────────────────

#[test]
fn idle_timeout_starts_video_playback() {
    let mut station = Station::started(MockEngine::silent());

    let later = Instant::now() + Duration::from_secs(11);
    let event = station.service.poll_timers(later);
    assert_eq!(event, Some(DeviceEvent::IdleTimeout));

    station.handle(DeviceEvent::IdleTimeout);
    assert!(station.display.video_playing);
    assert!(station.sink.contains(&AppEvent::VideoStarted));
    assert_eq!(station.service.state(), StateId::Idle);
}

#[test]
fn capture_trigger_stops_video_and_countdown() {
    let mut station = Station::started(MockEngine::silent());
    station.handle(DeviceEvent::IdleTimeout);
    assert!(station.display.video_playing);

    station.handle(DeviceEvent::CaptureTrigger);
    assert!(!station.display.video_playing);
}

#[test]
fn deposit_complete_restarts_the_countdown() {
    let mut station = Station::started(MockEngine::silent());
    station.handle(DeviceEvent::DepositComplete);
    assert_eq!(station.service.state(), StateId::Idle);
    assert!(station.service.next_deadline().is_some());
    assert_eq!(station.display.hints.last(), Some(&DisplayHint::Idle));
}

// ── Odds and ends ────────────────────────────────────────────

#[test]
fn heartbeat_changes_nothing() {
    let mut station = Station::started(MockEngine::silent());
    let events_before = station.sink.events.len();

    station.handle(DeviceEvent::Heartbeat);
    assert_eq!(station.service.state(), StateId::Idle);
    assert_eq!(station.sink.events.len(), events_before);
    assert_eq!(station.hw.written_payloads(), vec![0xCC]);
}

#[test]
fn display_tick_only_refreshes_the_clock() {
    let mut station = Station::started(MockEngine::silent());
    station.handle(DeviceEvent::DisplayTick);
    station.handle(DeviceEvent::DisplayTick);
    assert_eq!(station.display.clock_refreshes, 2);
    assert_eq!(station.service.state(), StateId::Idle);
}

#[test]
fn stray_classification_result_is_ignored_in_idle() {
    let mut station = Station::started(MockEngine::silent());
    station.handle(DeviceEvent::ClassificationDone(Classification {
        category: Category::Kitchen,
        confidence: 0.9,
        index: 8,
    }));
    assert_eq!(station.service.state(), StateId::Idle);
    assert_eq!(station.service.classified_total(), 0);
    assert_eq!(station.hw.written_payloads(), vec![0xCC]);
}
