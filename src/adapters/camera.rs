//! Still-camera adapter.
//!
//! The station's camera is driven through an external capture command
//! (`raspistill` on the deployed hardware) that writes a JPEG; the
//! adapter decodes it into the packed [`RawFrame`] the pipeline expects.
//! Both the command and the output path come from configuration, so a
//! different capture stack is a config change, not a code change.

use std::path::PathBuf;
use std::process::Command;

use log::info;

use crate::app::ports::CameraPort;
use crate::config::StationConfig;
use crate::error::CaptureError;
use crate::pipeline::image::{PixelOrder, RawFrame};

/// Command-driven still camera.
pub struct StillCamera {
    /// Capture program and arguments, `{out}` already substituted.
    command: Vec<String>,
    output: PathBuf,
}

impl StillCamera {
    pub fn from_config(config: &StationConfig) -> Result<Self, CaptureError> {
        let command: Vec<String> = config
            .capture_command
            .replace("{out}", &config.capture_path)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if command.is_empty() {
            return Err(CaptureError::CommandFailed);
        }
        Ok(Self {
            command,
            output: PathBuf::from(&config.capture_path),
        })
    }

    /// Take one throwaway still so a missing camera is caught at startup
    /// instead of on the first deposit.
    pub fn probe(&mut self) -> Result<(), CaptureError> {
        info!("probing camera: {}", self.command.join(" "));
        self.capture().map(|_| ())
    }
}

impl CameraPort for StillCamera {
    fn capture(&mut self) -> Result<RawFrame, CaptureError> {
        let status = Command::new(&self.command[0])
            .args(&self.command[1..])
            .status()
            .map_err(|_| CaptureError::CommandFailed)?;
        if !status.success() {
            return Err(CaptureError::CommandFailed);
        }

        let decoded = image::open(&self.output).map_err(|e| match e {
            image::ImageError::IoError(_) => CaptureError::MissingOutput,
            _ => CaptureError::DecodeFailed,
        })?;

        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(RawFrame::new(width, height, PixelOrder::Rgb, rgb.into_raw()))
    }
}
