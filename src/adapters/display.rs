//! Log-backed display adapter.
//!
//! The deployed station drives an operator screen with still previews and
//! looping promo video; this adapter narrates the same updates to the
//! logger so the core can run headless.  Rendering is out of scope for
//! the controller — any richer display implements the same port.

use log::{debug, info};

use crate::app::ports::DisplayPort;
use crate::fsm::context::DisplayHint;
use crate::pipeline::image::RawFrame;

/// Display adapter that logs every update.
pub struct LogDisplay {
    video_playing: bool,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self {
            video_playing: false,
        }
    }

    /// Whether the promo video is currently "on screen".
    pub fn video_playing(&self) -> bool {
        self.video_playing
    }
}

impl DisplayPort for LogDisplay {
    fn show(&mut self, hint: DisplayHint, preview: Option<&RawFrame>) {
        match preview {
            Some(frame) => info!(
                "DISPLAY | {} ({}x{} preview)",
                hint.label(),
                frame.width,
                frame.height
            ),
            None => info!("DISPLAY | {}", hint.label()),
        }
    }

    fn play_video(&mut self) {
        if !self.video_playing {
            self.video_playing = true;
            info!("DISPLAY | promo video looping");
        }
    }

    fn stop_video(&mut self) {
        if self.video_playing {
            self.video_playing = false;
            info!("DISPLAY | promo video stopped");
        }
    }

    fn refresh_clock(&mut self) {
        debug!(
            "DISPLAY | {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
    }
}
