//! Fixed 5-byte frame codec.
//!
//! Wire format, both directions:
//! ```text
//! ┌───────┬───────┬─────────┬───────┬───────┐
//! │ START │ GUARD │ PAYLOAD │ GUARD │ START │
//! └───────┴───────┴─────────┴───────┴───────┘
//! ```
//!
//! Inbound signal frames use `03 FC · FC 03`; outbound replies use the
//! nibble-swapped pair `30 CF · CF 30`, so the two directions can never
//! cross-decode.  Each read is treated as a self-contained frame — there
//! is no reassembly buffer, and garbage simply decodes to nothing.

use crate::pipeline::categories::Category;

/// Frame length in bytes, both directions.
pub const FRAME_LEN: usize = 5;

const SIGNAL_START: u8 = 0x03;
const SIGNAL_GUARD: u8 = 0xFC;
const REPLY_START: u8 = 0x30;
const REPLY_GUARD: u8 = 0xCF;

// ---------------------------------------------------------------------------
// Inbound frame
// ---------------------------------------------------------------------------

/// A decoded inbound frame.  Immutable once decoded; the payload is an
/// opaque command code until the dispatcher interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub payload: u8,
}

/// Decode one inbound frame from a read buffer.
///
/// Returns a frame iff the buffer holds at least [`FRAME_LEN`] bytes and
/// both boundary pairs match the signal template.  Malformed input yields
/// `None`, never a fault.
pub fn decode(bytes: &[u8]) -> Option<Frame> {
    if bytes.len() < FRAME_LEN {
        return None;
    }
    if bytes[0] == SIGNAL_START
        && bytes[1] == SIGNAL_GUARD
        && bytes[3] == SIGNAL_GUARD
        && bytes[4] == SIGNAL_START
    {
        Some(Frame { payload: bytes[2] })
    } else {
        None
    }
}

/// Encode an outbound reply frame around an actuation code.
pub fn encode(code: ActuationCode) -> [u8; FRAME_LEN] {
    [
        REPLY_START,
        REPLY_GUARD,
        code.byte(),
        REPLY_GUARD,
        REPLY_START,
    ]
}

// ---------------------------------------------------------------------------
// Actuation codes (outbound payloads)
// ---------------------------------------------------------------------------

/// Byte sent back to the mechanical sorter selecting a compartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ActuationCode {
    Recyclable = 0x01,
    Kitchen = 0x02,
    Hazardous = 0x04,
    Other = 0x08,
    /// Reject/hold: classification produced nothing actionable.
    /// Canonical failure code; an 0xFD variant seen in one firmware
    /// revision is not emitted.
    ClassifyFailed = 0xFF,
    /// Sent exactly once after the link opens, before any cycle.
    Ready = 0xCC,
}

impl ActuationCode {
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// The actuation encoder: pure category → compartment mapping.
    pub const fn for_category(category: Category) -> Self {
        match category {
            Category::Recyclable => Self::Recyclable,
            Category::Kitchen => Self::Kitchen,
            Category::Hazardous => Self::Hazardous,
            Category::Other => Self::Other,
            Category::Unrecognized => Self::ClassifyFailed,
        }
    }
}
