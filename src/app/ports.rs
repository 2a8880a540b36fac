//! Port traits — the boundary between the control core and the outside
//! world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (the relay-board transport, the display webhook, the
//! bench simulator) implement these traits. The service consumes them via
//! generics, so the core never touches a bus or a socket directly. All
//! calls are synchronous and may be slow; the core treats them as such.

use crate::app::events::StatusReport;
use crate::error::Result;
use crate::relays::{RelayAddress, RelayState};

// ───────────────────────────────────────────────────────────────
// Input ports (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the selector lines.
pub trait DigitalInputPort {
    /// Read one digital input line. `true` = line asserted.
    fn read_digital(&mut self, channel: u8) -> Result<bool>;
}

/// Read-side port for the analog front-end.
pub trait AnalogInputPort {
    /// Read one raw analog sample. Nominally within the channel's
    /// `[0, full_scale_raw]` range; out-of-range samples pass through to
    /// calibration untouched.
    fn read_analog(&mut self, channel: u8) -> Result<i32>;
}

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: drive one relay to the given state.
///
/// No acknowledgement of downstream valve or pump *physical* state is
/// available — a successful write means the board accepted the command,
/// nothing more.
pub trait RelayPort {
    fn write_relay(&mut self, address: RelayAddress, state: RelayState) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Status sink (driven adapter: domain → display / telemetry)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget per-tick status.
///
/// Implementations must never block the loop indefinitely (short network
/// timeouts, no retries) and report their own failures through the log
/// rather than back to the core.
pub trait StatusSink {
    fn publish(&mut self, report: &StatusReport);
}
