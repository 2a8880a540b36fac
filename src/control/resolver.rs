//! The sanitize-cycle override.
//!
//! Prolonged SHOWER operation without outflow means greywater is sitting
//! in the recirculation loop. Once the outflow has been quiet for longer
//! than the inactivity limit, the resolver overrides the selector with a
//! time-boxed SANITIZE cycle, then hands control back. The machine is
//! driven purely by wall-clock comparisons made once per tick; there is
//! no scheduler and no timer callback.

use std::time::Instant;

use crate::config::SystemConfig;
use crate::mode::Mode;
use crate::sensors::SensorSnapshot;

/// Rolling timer state for the sanitize override.
///
/// Owned by the control service and threaded by value through
/// [`resolve_mode`]; nothing else mutates it. Initialized once at startup,
/// treating boot as flow activity.
#[derive(Debug, Clone, Copy)]
pub struct SanitizeTimer {
    /// Last tick at which outflow exceeded the activity threshold.
    pub last_flow_at: Instant,
    /// End of the current sanitize window.
    pub sanitize_until: Instant,
    /// Whether a forced sanitize cycle is in progress.
    pub sanitizing: bool,
}

impl SanitizeTimer {
    pub fn new(now: Instant) -> Self {
        Self {
            last_flow_at: now,
            sanitize_until: now,
            sanitizing: false,
        }
    }
}

/// Compute the effective mode for one tick.
///
/// Pure and total for fixed `(snapshot, timer, now)`; call exactly once
/// per tick with a non-decreasing `now`.
///
/// Outflow above the activity threshold resets the inactivity clock on
/// every tick regardless of selector position. The override itself only
/// applies while the selector sits on SHOWER — anywhere else the selected
/// mode passes straight through and any in-progress cycle is abandoned.
pub fn resolve_mode(
    snapshot: &SensorSnapshot,
    mut timer: SanitizeTimer,
    now: Instant,
    config: &SystemConfig,
) -> (Mode, SanitizeTimer) {
    if snapshot.flow_out > config.flow_active_threshold {
        timer.last_flow_at = now;
    }

    if snapshot.selected_mode != Mode::Shower {
        timer.sanitizing = false;
        return (snapshot.selected_mode, timer);
    }

    let idle = now.saturating_duration_since(timer.last_flow_at);
    if idle <= config.inactivity_limit() {
        return (Mode::Shower, timer);
    }

    if timer.sanitizing && now >= timer.sanitize_until {
        // Window elapsed: hand control back to the selector. The idle
        // clock keeps running, so the override re-arms on the very next
        // tick unless flow resumed during the window — or unless the
        // reset policy is enabled.
        timer.sanitizing = false;
        if config.reset_idle_after_sanitize {
            timer.last_flow_at = now;
        }
        return (Mode::Shower, timer);
    }

    // Arm the window. While the cycle is running this re-arms the
    // deadline each tick, so the window slides until flow resumes or the
    // selector moves.
    timer.sanitizing = true;
    timer.sanitize_until = now + config.sanitize_duration();
    (Mode::Sanitize, timer)
}
