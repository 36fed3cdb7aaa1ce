//! Unified error types for the sorting-station controller.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level control loop's error handling uniform.  All variants are `Copy`
//! so they can be cheaply passed through the service and state machine
//! without allocation.
//!
//! Note that a malformed serial frame is deliberately NOT an error: the
//! codec treats sub-protocol noise as "no frame" and the bytes are dropped.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level controller error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The serial link could not be opened, read, or written.
    Link(LinkError),
    /// A still capture failed.
    Capture(CaptureError),
    /// The inference engine failed.
    Inference(InferenceError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
    /// Startup wiring failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Capture(e) => write!(f, "capture: {e}"),
            Self::Inference(e) => write!(f, "inference: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Serial-link errors
// ---------------------------------------------------------------------------

/// Errors from the serial link.
///
/// `NoDevice` and `OpenFailed` are fatal at startup: the operator is told to
/// check the cabling and the process exits.  They are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// No serial device is attached to the host.
    NoDevice,
    /// A port exists but could not be opened.
    OpenFailed,
    /// A read from the open port failed.
    ReadFailed,
    /// A write to the open port failed.
    WriteFailed,
    /// The port vanished mid-session (USB unplug).
    Disconnected,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDevice => write!(f, "no serial device available"),
            Self::OpenFailed => write!(f, "port could not be opened"),
            Self::ReadFailed => write!(f, "read failed"),
            Self::WriteFailed => write!(f, "write failed"),
            Self::Disconnected => write!(f, "port disconnected"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Capture errors
// ---------------------------------------------------------------------------

/// Errors from the camera collaborator.
///
/// Mid-cycle capture failures are recovered locally: the cycle completes as
/// an unrecognized classification and the operator retries by triggering
/// another deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    /// The capture command could not be spawned or exited non-zero.
    CommandFailed,
    /// The captured still could not be decoded into pixels.
    DecodeFailed,
    /// The capture output file never appeared.
    MissingOutput,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandFailed => write!(f, "capture command failed"),
            Self::DecodeFailed => write!(f, "image decode failed"),
            Self::MissingOutput => write!(f, "capture produced no output"),
        }
    }
}

impl From<CaptureError> for Error {
    fn from(e: CaptureError) -> Self {
        Self::Capture(e)
    }
}

// ---------------------------------------------------------------------------
// Inference-engine errors
// ---------------------------------------------------------------------------

/// Errors from the inference-engine collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceError {
    /// The model file could not be loaded.
    ModelLoadFailed,
    /// Tensor allocation failed after model load.
    AllocateFailed,
    /// The input tensor was rejected (wrong element type or length).
    BadInput,
    /// The engine failed while running the graph.
    InvokeFailed,
    /// The output tensor is missing or has an unusable shape.
    BadOutput,
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelLoadFailed => write!(f, "model load failed"),
            Self::AllocateFailed => write!(f, "tensor allocation failed"),
            Self::BadInput => write!(f, "input tensor rejected"),
            Self::InvokeFailed => write!(f, "graph invocation failed"),
            Self::BadOutput => write!(f, "output tensor unusable"),
        }
    }
}

impl From<InferenceError> for Error {
    fn from(e: InferenceError) -> Self {
        Self::Inference(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Controller-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
