//! Relay addressing and the fixed per-mode actuation plans.
//!
//! A [`RelayPlan`] is an ordered list of relay target states. Order is part
//! of the contract: the downstream boards apply writes in call order with
//! no atomic batch semantics, so the sequence tabulated here is reproduced
//! exactly by [`apply_plan`]. Valves are written before the power tail in
//! every plan, and SANITIZE powers the supply pump before the drain pump
//! is released.

use serde::{Deserialize, Serialize};

use crate::app::ports::RelayPort;
use crate::error::Result;
use crate::mode::Mode;

/// One physical output on a relay bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelayAddress {
    /// Which board in the stack.
    pub bank: u8,
    /// Relay index on that board (0-based).
    pub relay: u8,
}

impl core::fmt::Display for RelayAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "bank {} relay {}", self.bank, self.relay)
    }
}

/// Commanded state of a relay contact.
///
/// `Open` means energised (wire value 1): an open valve, or a powered pump
/// or UV-C lamp. `Closed` (wire value 0) is the de-energised rest state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Closed,
    Open,
}

impl RelayState {
    /// The value written to the board: `Closed` = 0, `Open` = 1.
    pub const fn wire_value(self) -> u8 {
        match self {
            Self::Closed => 0,
            Self::Open => 1,
        }
    }
}

/// A single entry in a relay plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayCommand {
    pub address: RelayAddress,
    pub state: RelayState,
}

/// Every plan drives the same seven outputs.
pub const PLAN_LEN: usize = 7;

/// An ordered sequence of relay writes realising one mode.
pub type RelayPlan = [RelayCommand; PLAN_LEN];

// ---------------------------------------------------------------------------
// Relay map
// ---------------------------------------------------------------------------

/// Assignment of the system's seven outputs to physical relay addresses.
///
/// The set is fixed at startup: four valves, two pump power relays, UV-C
/// power. Addresses are validated for uniqueness by
/// [`AppConfig::validate`](crate::config::AppConfig::validate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayMap {
    pub post_filter_valve: RelayAddress,
    pub sani_loop_valve: RelayAddress,
    pub flush_valve: RelayAddress,
    pub drain_valve: RelayAddress,
    pub drain_pump: RelayAddress,
    pub supply_pump: RelayAddress,
    pub uvc: RelayAddress,
}

impl Default for RelayMap {
    fn default() -> Self {
        let at = |relay| RelayAddress { bank: 0, relay };
        Self {
            post_filter_valve: at(0),
            sani_loop_valve: at(1),
            flush_valve: at(2),
            drain_valve: at(3),
            drain_pump: at(4),
            supply_pump: at(5),
            uvc: at(6),
        }
    }
}

impl RelayMap {
    /// The fixed plan realising `mode`.
    ///
    /// Emission order is post-filter valve, sani-loop valve, flush valve,
    /// drain valve, then the power tail. SANITIZE's tail runs supply pump,
    /// UV-C, drain pump — the drain pump is released last so the sani loop
    /// is never briefly pulled toward the drain line.
    pub fn plan_for(&self, mode: Mode) -> RelayPlan {
        use RelayState::{Closed, Open};
        let cmd = |address, state| RelayCommand { address, state };
        match mode {
            Mode::Drain => [
                cmd(self.post_filter_valve, Closed),
                cmd(self.sani_loop_valve, Closed),
                cmd(self.flush_valve, Closed),
                cmd(self.drain_valve, Open),
                cmd(self.drain_pump, Open),
                cmd(self.supply_pump, Closed),
                cmd(self.uvc, Closed),
            ],
            Mode::Flush => [
                cmd(self.post_filter_valve, Closed),
                cmd(self.sani_loop_valve, Closed),
                cmd(self.flush_valve, Open),
                cmd(self.drain_valve, Closed),
                cmd(self.drain_pump, Open),
                cmd(self.supply_pump, Open),
                cmd(self.uvc, Closed),
            ],
            Mode::Shower => [
                cmd(self.post_filter_valve, Open),
                cmd(self.sani_loop_valve, Closed),
                cmd(self.flush_valve, Closed),
                cmd(self.drain_valve, Closed),
                cmd(self.drain_pump, Open),
                cmd(self.supply_pump, Open),
                cmd(self.uvc, Open),
            ],
            Mode::Sanitize => [
                cmd(self.post_filter_valve, Closed),
                cmd(self.sani_loop_valve, Open),
                cmd(self.flush_valve, Closed),
                cmd(self.drain_valve, Closed),
                cmd(self.supply_pump, Open),
                cmd(self.uvc, Closed),
                cmd(self.drain_pump, Closed),
            ],
        }
    }

    /// The all-off plan: every valve closed, every pump and the UV-C lamp
    /// unpowered. Applied once at startup before the first tick so the
    /// plumbing starts from a known state.
    pub fn safe_plan(&self) -> RelayPlan {
        use RelayState::Closed;
        let cmd = |address| RelayCommand {
            address,
            state: Closed,
        };
        [
            cmd(self.post_filter_valve),
            cmd(self.sani_loop_valve),
            cmd(self.flush_valve),
            cmd(self.drain_valve),
            cmd(self.drain_pump),
            cmd(self.supply_pump),
            cmd(self.uvc),
        ]
    }

    /// Every address in the map, in safe-plan order.
    pub fn addresses(&self) -> [RelayAddress; PLAN_LEN] {
        [
            self.post_filter_valve,
            self.sani_loop_valve,
            self.flush_valve,
            self.drain_valve,
            self.drain_pump,
            self.supply_pump,
            self.uvc,
        ]
    }
}

// ---------------------------------------------------------------------------
// Actuation
// ---------------------------------------------------------------------------

/// Issue one write per plan entry, in order, through the relay port.
///
/// No batching and no rollback: a failure part-way through leaves the
/// physical system in a mixed state, which the caller must treat as such.
/// The error identifies the address that failed; everything before it in
/// the plan has already been written.
pub fn apply_plan(plan: &RelayPlan, relays: &mut impl RelayPort) -> Result<()> {
    for command in plan {
        relays.write_relay(command.address, command.state)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::RelayState::{Closed, Open};

    fn map() -> RelayMap {
        RelayMap::default()
    }

    fn states(plan: &RelayPlan) -> Vec<(RelayAddress, RelayState)> {
        plan.iter().map(|c| (c.address, c.state)).collect()
    }

    #[test]
    fn drain_plan_matches_table() {
        let m = map();
        assert_eq!(
            states(&m.plan_for(Mode::Drain)),
            vec![
                (m.post_filter_valve, Closed),
                (m.sani_loop_valve, Closed),
                (m.flush_valve, Closed),
                (m.drain_valve, Open),
                (m.drain_pump, Open),
                (m.supply_pump, Closed),
                (m.uvc, Closed),
            ]
        );
    }

    #[test]
    fn flush_plan_matches_table() {
        let m = map();
        assert_eq!(
            states(&m.plan_for(Mode::Flush)),
            vec![
                (m.post_filter_valve, Closed),
                (m.sani_loop_valve, Closed),
                (m.flush_valve, Open),
                (m.drain_valve, Closed),
                (m.drain_pump, Open),
                (m.supply_pump, Open),
                (m.uvc, Closed),
            ]
        );
    }

    #[test]
    fn shower_plan_matches_table() {
        let m = map();
        assert_eq!(
            states(&m.plan_for(Mode::Shower)),
            vec![
                (m.post_filter_valve, Open),
                (m.sani_loop_valve, Closed),
                (m.flush_valve, Closed),
                (m.drain_valve, Closed),
                (m.drain_pump, Open),
                (m.supply_pump, Open),
                (m.uvc, Open),
            ]
        );
    }

    #[test]
    fn sanitize_plan_swaps_the_power_tail() {
        let m = map();
        // Supply pump, then UV-C, then drain pump — not the usual tail order.
        assert_eq!(
            states(&m.plan_for(Mode::Sanitize)),
            vec![
                (m.post_filter_valve, Closed),
                (m.sani_loop_valve, Open),
                (m.flush_valve, Closed),
                (m.drain_valve, Closed),
                (m.supply_pump, Open),
                (m.uvc, Closed),
                (m.drain_pump, Closed),
            ]
        );
    }

    #[test]
    fn safe_plan_grounds_every_output() {
        let m = map();
        let plan = m.safe_plan();
        assert_eq!(plan.len(), PLAN_LEN);
        for command in &plan {
            assert_eq!(command.state, Closed, "{} not grounded", command.address);
        }
    }

    #[test]
    fn every_plan_touches_each_output_exactly_once() {
        let m = map();
        for mode in [Mode::Drain, Mode::Flush, Mode::Shower, Mode::Sanitize] {
            let plan = m.plan_for(mode);
            for address in m.addresses() {
                let hits = plan.iter().filter(|c| c.address == address).count();
                assert_eq!(hits, 1, "{mode}: {address} written {hits} times");
            }
        }
    }

    #[test]
    fn wire_values() {
        assert_eq!(Closed.wire_value(), 0);
        assert_eq!(Open.wire_value(), 1);
    }
}
