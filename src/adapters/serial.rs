//! Serial link adapter over a USB-attached port.
//!
//! Opens the bin controller's port at 115200-8N1 and runs the intake pump
//! on a dedicated reader thread, so classification cycles never stall
//! serial intake.  Missing or unopenable hardware is fatal at startup by
//! design — the operator is told to check the cabling.

use std::io::{Read, Write};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, warn};
use serialport::SerialPort;

use crate::app::ports::LinkPort;
use crate::config::StationConfig;
use crate::error::LinkError;
use crate::events::EventSender;
use crate::protocol::frame::FRAME_LEN;
use crate::protocol::io;

/// Poll window for one blocking read on the reader thread.
const READ_POLL_MS: u64 = 100;

/// Breather after a transient read error so a flapping port cannot spin
/// the reader thread hot.
const ERROR_BACKOFF_MS: u64 = 250;

/// The station's serial link.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    /// Enumerate and open the configured port.
    ///
    /// Fails with [`LinkError::NoDevice`] when no serial hardware is
    /// attached at all, [`LinkError::OpenFailed`] when the port exists but
    /// cannot be opened.  Neither is retried.
    pub fn open(config: &StationConfig) -> Result<Self, LinkError> {
        let available = serialport::available_ports().map_err(|_| LinkError::NoDevice)?;
        if available.is_empty() {
            return Err(LinkError::NoDevice);
        }

        info!(
            "opening serial port {} at {} baud",
            config.serial_port, config.baud_rate
        );
        let port = serialport::new(&config.serial_port, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(Duration::from_millis(READ_POLL_MS))
            .open()
            .map_err(|e| {
                warn!("serial open failed: {e}");
                LinkError::OpenFailed
            })?;

        info!("serial link up");
        Ok(Self { port })
    }

    /// Spawn the reader thread: a second handle onto the same port loops
    /// the intake pump and forwards decoded events.
    pub fn spawn_reader(&self, events: EventSender) -> Result<JoinHandle<()>, LinkError> {
        let port = self.port.try_clone().map_err(|_| LinkError::OpenFailed)?;
        let mut reader = Self { port };

        thread::Builder::new()
            .name("serial-reader".into())
            .spawn(move || reader_loop(&mut reader, &events))
            .map_err(|_| LinkError::OpenFailed)
    }
}

fn reader_loop(link: &mut SerialLink, events: &EventSender) {
    loop {
        match io::pump_once(link, events) {
            Ok(_) => {}
            Err(LinkError::Disconnected) => {
                warn!("serial link lost, reader thread exiting");
                return;
            }
            Err(e) => {
                warn!("serial read error: {e}");
                thread::sleep(Duration::from_millis(ERROR_BACKOFF_MS));
            }
        }
    }
}

impl LinkPort for SerialLink {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Err(LinkError::Disconnected),
            Err(_) => Err(LinkError::ReadFailed),
        }
    }

    fn send(&mut self, frame: &[u8; FRAME_LEN]) -> Result<(), LinkError> {
        self.port
            .write_all(frame)
            .and_then(|()| self.port.flush())
            .map_err(|_| LinkError::WriteFailed)
    }
}
