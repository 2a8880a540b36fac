//! Control service — the hexagonal core.
//!
//! [`ControlService`] owns the sanitize timer and runs the one-way data
//! flow each tick: raw inputs → snapshot → effective mode → relay plan →
//! relay writes, plus a status report. All I/O flows through port traits
//! injected at call sites, so the whole service runs against mocks.
//!
//! ```text
//!  DigitalInputPort ──▶ ┌──────────────────────────┐ ──▶ StatusSink
//!  AnalogInputPort  ──▶ │      ControlService      │
//!      RelayPort    ◀── │  SensorHub · Resolver    │
//!                       └──────────────────────────┘
//! ```

use std::time::Instant;

use log::info;

use crate::config::{AppConfig, SystemConfig};
use crate::control::{SanitizeTimer, resolve_mode};
use crate::error::Result;
use crate::mode::Mode;
use crate::relays::{RelayMap, apply_plan};
use crate::sensors::SensorHub;

use super::events::StatusReport;
use super::ports::{AnalogInputPort, DigitalInputPort, RelayPort, StatusSink};

/// Orchestrates one full read–resolve–act cycle per tick.
///
/// Not re-entrant; one instance, one logical thread of control. The
/// sanitize timer lives here and is threaded by value through the
/// resolver — there is no hidden global state.
pub struct ControlService {
    hub: SensorHub,
    relays: RelayMap,
    system: SystemConfig,
    timer: SanitizeTimer,
    last_mode: Option<Mode>,
    tick_count: u64,
}

impl ControlService {
    /// Construct the service. The inactivity clock starts at "now": boot
    /// counts as flow activity.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            hub: SensorHub::from_config(&config.hw),
            relays: config.hw.relays.clone(),
            system: config.system.clone(),
            timer: SanitizeTimer::new(Instant::now()),
            last_mode: None,
            tick_count: 0,
        }
    }

    /// Drive every output to its de-energised state. Called once before
    /// the first tick so the plumbing starts from a known configuration.
    pub fn apply_safe_plan(&self, relays: &mut impl RelayPort) -> Result<()> {
        info!("applying safe plan (all outputs off)");
        apply_plan(&self.relays.safe_plan(), relays)
    }

    /// Run one control cycle against the wall clock.
    pub fn tick(
        &mut self,
        hw: &mut (impl DigitalInputPort + AnalogInputPort + RelayPort),
        sink: &mut impl StatusSink,
    ) -> Result<Mode> {
        self.tick_at(Instant::now(), hw, sink)
    }

    /// Run one control cycle at an injected instant.
    ///
    /// `now` must be non-decreasing across calls. Split out from
    /// [`tick`](Self::tick) so tests can drive the sanitize timer
    /// deterministically.
    pub fn tick_at(
        &mut self,
        now: Instant,
        hw: &mut (impl DigitalInputPort + AnalogInputPort + RelayPort),
        sink: &mut impl StatusSink,
    ) -> Result<Mode> {
        self.tick_count += 1;

        let snapshot = self.hub.acquire(&mut *hw)?;
        let (mode, timer) = resolve_mode(&snapshot, self.timer, now, &self.system);
        self.timer = timer;

        apply_plan(&self.relays.plan_for(mode), &mut *hw)?;

        if self.last_mode != Some(mode) {
            match self.last_mode {
                Some(prev) => info!("MODE | {prev} -> {mode}"),
                None => info!("MODE | startup -> {mode}"),
            }
            if mode != snapshot.selected_mode {
                info!("sanitize override engaged (selector on {})", snapshot.selected_mode);
            }
            self.last_mode = Some(mode);
        }

        sink.publish(&StatusReport { mode, snapshot });
        Ok(mode)
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Whether a forced sanitize cycle is currently in progress.
    pub fn sanitizing(&self) -> bool {
        self.timer.sanitizing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sim::SimulatedHardware;
    use crate::relays::RelayState;

    struct NullSink;
    impl StatusSink for NullSink {
        fn publish(&mut self, _report: &StatusReport) {}
    }

    struct CaptureSink(Vec<StatusReport>);
    impl StatusSink for CaptureSink {
        fn publish(&mut self, report: &StatusReport) {
            self.0.push(*report);
        }
    }

    #[test]
    fn tick_commands_the_selected_mode() {
        let config = AppConfig::default();
        let mut service = ControlService::new(&config);
        let mut sim = SimulatedHardware::new();
        sim.set_selector(Mode::Flush);

        let mode = service.tick(&mut sim, &mut NullSink).unwrap();
        assert_eq!(mode, Mode::Flush);
        assert_eq!(
            sim.relay(config.hw.relays.flush_valve),
            Some(RelayState::Open)
        );
        assert_eq!(
            sim.relay(config.hw.relays.drain_valve),
            Some(RelayState::Closed)
        );
        assert_eq!(service.tick_count(), 1);
    }

    #[test]
    fn status_report_carries_the_snapshot() {
        let config = AppConfig::default();
        let mut service = ControlService::new(&config);
        let mut sim = SimulatedHardware::new();
        sim.set_selector(Mode::Shower);
        sim.set_analog(config.hw.turbidity.channel, config.hw.turbidity.full_scale_raw / 2);
        let mut sink = CaptureSink(Vec::new());

        service.tick(&mut sim, &mut sink).unwrap();
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].mode, Mode::Shower);
        let expected = config.hw.turbidity.full_scale_value / 2.0;
        assert!((sink.0[0].snapshot.turbidity - expected).abs() < 0.1);
    }

    #[test]
    fn safe_plan_grounds_every_relay() {
        let config = AppConfig::default();
        let service = ControlService::new(&config);
        let mut sim = SimulatedHardware::new();

        service.apply_safe_plan(&mut sim).unwrap();
        for address in config.hw.relays.addresses() {
            assert_eq!(sim.relay(address), Some(RelayState::Closed));
        }
    }
}
