//! Framed serial protocol.
//!
//! Three layers, wire-format innermost:
//! - [`frame`] — the fixed 5-byte codec and actuation codes
//! - [`dispatch`] — payload byte → typed [`DeviceEvent`](crate::events::DeviceEvent)
//! - [`io`] — the read→decode→dispatch pump looped by the reader thread

pub mod dispatch;
pub mod frame;
pub mod io;
