//! Sorting-station controller — main entry point.
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SerialLink       StillCamera      NullEngine     LogDisplay   │
//! │  (LinkPort)       (CameraPort)     (InferencePort)(DisplayPort)│
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            StationService (pure logic)                 │    │
//! │  │  FSM · Classification pipeline · Idle timer            │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Reader thread (frame pump) · Event queue · Display ticker     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::info;

use sortstation::adapters::camera::StillCamera;
use sortstation::adapters::display::LogDisplay;
use sortstation::adapters::engine::NullEngine;
use sortstation::adapters::hardware::StationHardware;
use sortstation::adapters::log_sink::LogEventSink;
use sortstation::adapters::serial::SerialLink;
use sortstation::app::ports::InferencePort;
use sortstation::app::service::StationService;
use sortstation::config::StationConfig;
use sortstation::error::Error;
use sortstation::events::{DeviceEvent, event_channel};
use sortstation::timers::DisplayTicker;

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    info!("SortStation v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Configuration ──────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => StationConfig::from_file(Path::new(&path))
            .with_context(|| format!("loading config {path}"))?,
        None => {
            info!("no config file given, using defaults");
            StationConfig::default()
        }
    };

    // ── 2. Serial link — fatal when absent, never retried ─────
    let link = SerialLink::open(&config)
        .map_err(Error::from)
        .context("serial device unavailable — check the cable and restart")?;

    // ── 3. Camera — probed now so a dead camera fails fast ────
    let mut camera = StillCamera::from_config(&config)
        .map_err(Error::from)
        .context("capture command invalid")?;
    camera
        .probe()
        .map_err(Error::from)
        .context("camera unavailable — check the connection and restart")?;
    info!("camera ready");

    // ── 4. Inference engine ───────────────────────────────────
    // The null engine rejects every item; swap in a real backend by
    // implementing InferencePort.
    let mut engine = NullEngine::new();
    engine
        .load_model(&config.model_path)
        .map_err(Error::from)
        .context("model load failed")?;
    engine
        .allocate()
        .map_err(Error::from)
        .context("tensor allocation failed")?;

    // ── 5. Event queue + serial reader thread ─────────────────
    let (events_tx, events_rx) = event_channel();
    let _reader = link
        .spawn_reader(events_tx)
        .map_err(Error::from)
        .context("reader thread failed to start")?;

    // ── 6. Construct the service ──────────────────────────────
    let mut hw = StationHardware::new(link, camera);
    let mut display = LogDisplay::new();
    let mut sink = LogEventSink::new();
    let mut service = StationService::new(&config);
    service.start(&mut hw, &mut display, &mut sink);

    info!("station ready, entering event loop");

    // ── 7. Event loop ─────────────────────────────────────────
    // One event processed to completion at a time; the loop sleeps until
    // the next queued event or the earliest timer deadline.
    let mut ticker = DisplayTicker::new(
        Duration::from_millis(u64::from(config.display_refresh_ms)),
        Instant::now(),
    );

    loop {
        let now = Instant::now();

        if ticker.poll(now) {
            service.handle_event(
                DeviceEvent::DisplayTick,
                &mut hw,
                &mut engine,
                &mut display,
                &mut sink,
            );
        }

        if let Some(event) = service.poll_timers(now) {
            service.handle_event(event, &mut hw, &mut engine, &mut display, &mut sink);
        }

        let mut deadline = ticker.deadline();
        if let Some(idle) = service.next_deadline() {
            deadline = deadline.min(idle);
        }

        if let Some(event) = events_rx.recv_deadline(deadline) {
            service.handle_event(event, &mut hw, &mut engine, &mut display, &mut sink);
        }
    }
}
