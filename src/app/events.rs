//! Outbound status reports.
//!
//! The [`ControlService`](super::service::ControlService) emits one of
//! these per tick through the [`StatusSink`](super::ports::StatusSink)
//! port. Adapters decide where it goes — the log, the display webhook, or
//! both.

use serde::Serialize;

use crate::mode::Mode;
use crate::sensors::SensorSnapshot;

/// What the controller did this tick: the effective mode it commanded and
/// the snapshot it derived it from.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusReport {
    pub mode: Mode,
    pub snapshot: SensorSnapshot,
}
