//! Combined hardware adapter.
//!
//! Bundles the serial link and camera behind one value satisfying both
//! [`LinkPort`] and [`CameraPort`], which is what the service's event
//! dispatch expects — one mutable borrow, explicit port boundary.

use crate::app::ports::{CameraPort, LinkPort};
use crate::error::{CaptureError, LinkError};
use crate::pipeline::image::RawFrame;
use crate::protocol::frame::FRAME_LEN;

use super::camera::StillCamera;
use super::serial::SerialLink;

/// The station's physical I/O, seen through the port traits.
pub struct StationHardware {
    link: SerialLink,
    camera: StillCamera,
}

impl StationHardware {
    pub fn new(link: SerialLink, camera: StillCamera) -> Self {
        Self { link, camera }
    }
}

impl LinkPort for StationHardware {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        self.link.read(buf)
    }

    fn send(&mut self, frame: &[u8; FRAME_LEN]) -> Result<(), LinkError> {
        self.link.send(frame)
    }
}

impl CameraPort for StationHardware {
    fn capture(&mut self) -> Result<RawFrame, CaptureError> {
        self.camera.capture()
    }
}
