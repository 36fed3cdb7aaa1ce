//! Mock hardware adapters for integration tests.
//!
//! Records every port call so tests can assert on the full history
//! without touching a real serial port, camera, or inference engine.

use sortstation::app::events::AppEvent;
use sortstation::app::ports::{
    CameraPort, DisplayPort, EventSink, InferencePort, InputTensor, LinkPort, OutputTensor,
    TensorKind,
};
use sortstation::error::{CaptureError, InferenceError, LinkError};
use sortstation::fsm::context::DisplayHint;
use sortstation::pipeline::image::{PixelOrder, RawFrame};
use sortstation::protocol::frame::FRAME_LEN;

// ── MockHardware (link + camera) ─────────────────────────────

pub struct MockHardware {
    /// Every reply frame the service wrote, in order.
    pub written: Vec<[u8; FRAME_LEN]>,
    /// Scripted inbound reads, consumed front to back.
    pub reads: Vec<Vec<u8>>,
    /// Number of stills taken.
    pub captures: u32,
    /// When set, `capture()` fails with this error.
    pub capture_failure: Option<CaptureError>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            written: Vec::new(),
            reads: Vec::new(),
            captures: 0,
            capture_failure: None,
        }
    }

    pub fn last_written(&self) -> Option<&[u8; FRAME_LEN]> {
        self.written.last()
    }

    /// Payload bytes of every written frame (template stripped).
    pub fn written_payloads(&self) -> Vec<u8> {
        self.written.iter().map(|f| f[2]).collect()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkPort for MockHardware {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        if self.reads.is_empty() {
            return Ok(0);
        }
        let bytes = self.reads.remove(0);
        buf[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    fn send(&mut self, frame: &[u8; FRAME_LEN]) -> Result<(), LinkError> {
        self.written.push(*frame);
        Ok(())
    }
}

impl CameraPort for MockHardware {
    fn capture(&mut self) -> Result<RawFrame, CaptureError> {
        if let Some(err) = self.capture_failure {
            return Err(err);
        }
        self.captures += 1;
        // Small gradient still, enough to exercise resize + normalize.
        let (w, h) = (8u32, 8u32);
        let mut data = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for x in 0..w {
                data.extend_from_slice(&[(x * 32) as u8, (y * 32) as u8, 128]);
            }
        }
        Ok(RawFrame::new(w, h, PixelOrder::Rgb, data))
    }
}

// ── MockEngine ───────────────────────────────────────────────

/// Engine with a programmable float output vector.
pub struct MockEngine {
    pub output: Vec<f32>,
    pub invocations: u32,
}

#[allow(dead_code)]
impl MockEngine {
    /// All-zero output: every cycle fails classification.
    pub fn silent() -> Self {
        Self {
            output: vec![0.0; 10],
            invocations: 0,
        }
    }

    /// One confident class at `index`.
    pub fn confident(index: usize, confidence: f32) -> Self {
        let mut output = vec![0.0; 10];
        output[index] = confidence;
        Self {
            output,
            invocations: 0,
        }
    }
}

impl InferencePort for MockEngine {
    fn load_model(&mut self, _path: &str) -> Result<(), InferenceError> {
        Ok(())
    }

    fn allocate(&mut self) -> Result<(), InferenceError> {
        Ok(())
    }

    fn input_kind(&self) -> TensorKind {
        TensorKind::Float32
    }

    fn set_input(&mut self, _tensor: InputTensor) -> Result<(), InferenceError> {
        Ok(())
    }

    fn invoke(&mut self) -> Result<(), InferenceError> {
        self.invocations += 1;
        Ok(())
    }

    fn output(&self) -> Result<OutputTensor, InferenceError> {
        Ok(OutputTensor::Float(self.output.clone()))
    }
}

// ── RecordingDisplay ─────────────────────────────────────────

pub struct RecordingDisplay {
    pub hints: Vec<DisplayHint>,
    pub previews: u32,
    pub video_playing: bool,
    pub clock_refreshes: u32,
}

#[allow(dead_code)]
impl RecordingDisplay {
    pub fn new() -> Self {
        Self {
            hints: Vec::new(),
            previews: 0,
            video_playing: false,
            clock_refreshes: 0,
        }
    }
}

impl Default for RecordingDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for RecordingDisplay {
    fn show(&mut self, hint: DisplayHint, preview: Option<&RawFrame>) {
        if preview.is_some() {
            self.previews += 1;
        }
        self.hints.push(hint);
    }

    fn play_video(&mut self) {
        self.video_playing = true;
    }

    fn stop_video(&mut self) {
        self.video_playing = false;
    }

    fn refresh_clock(&mut self) {
        self.clock_refreshes += 1;
    }
}

// ── RecordingSink ────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
