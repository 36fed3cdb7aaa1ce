//! Serial intake pump: read → decode → dispatch → enqueue.
//!
//! One [`pump_once`] call performs a single link read and forwards at most
//! one device event.  The hardware reader thread loops it so that serial
//! intake never stalls behind a classification cycle; tests drive it
//! directly with a mock link to replay byte sequences deterministically.

use log::trace;

use crate::app::ports::LinkPort;
use crate::error::LinkError;
use crate::events::EventSender;

use super::{dispatch, frame};

/// Scratch size for one read.  Signal frames are 5 bytes; the controller
/// never legitimately sends more than one frame per read burst.
const READ_BUF_SIZE: usize = 64;

/// Perform one intake step.
///
/// Returns `Ok(true)` when a valid frame produced an event, `Ok(false)`
/// when the read was empty, partial, or sub-protocol noise.  Read errors
/// propagate so the caller can decide whether the link is gone.
pub fn pump_once(link: &mut impl LinkPort, events: &EventSender) -> Result<bool, LinkError> {
    let mut buf = [0u8; READ_BUF_SIZE];
    let n = link.read(&mut buf)?;
    if n == 0 {
        return Ok(false);
    }

    let Some(decoded) = frame::decode(&buf[..n]) else {
        trace!("dropping {n} bytes of link noise");
        return Ok(false);
    };

    match dispatch::dispatch(decoded) {
        Some(event) => Ok(events.push(event)),
        None => Ok(false),
    }
}
