//! In-memory hardware for bench-top runs and tests.
//!
//! Implements all three hardware ports with settable values, the same
//! fallback the appliance uses when it is not wired to a relay board
//! (`--simulate`). Relay writes are recorded in call order so tests can
//! assert on plan emission.

use std::collections::HashMap;

use crate::app::ports::{AnalogInputPort, DigitalInputPort, RelayPort};
use crate::config::HwConfig;
use crate::error::Result;
use crate::mode::Mode;
use crate::relays::{RelayAddress, RelayCommand, RelayState};

pub struct SimulatedHardware {
    select_channels: [u8; 3],
    digital: HashMap<u8, bool>,
    analog: HashMap<u8, i32>,
    relays: HashMap<RelayAddress, RelayState>,
    /// Every relay write in call order.
    pub writes: Vec<RelayCommand>,
}

impl SimulatedHardware {
    /// Simulator wired to the default channel assignments.
    pub fn new() -> Self {
        Self::for_config(&HwConfig::default())
    }

    /// Simulator wired to the given channel assignments.
    pub fn for_config(hw: &HwConfig) -> Self {
        Self {
            select_channels: hw.mode_select_channels,
            digital: HashMap::new(),
            analog: HashMap::new(),
            relays: HashMap::new(),
            writes: Vec::new(),
        }
    }

    /// Drive one digital line.
    pub fn set_digital(&mut self, channel: u8, asserted: bool) {
        self.digital.insert(channel, asserted);
    }

    /// Drive the three selector lines to the canonical pattern for `mode`.
    pub fn set_selector(&mut self, mode: Mode) {
        let bits = match mode {
            Mode::Drain => [false, false, false],
            Mode::Flush => [false, false, true],
            Mode::Shower => [false, true, false],
            Mode::Sanitize => [true, false, false],
        };
        for (channel, bit) in self.select_channels.into_iter().zip(bits) {
            self.digital.insert(channel, bit);
        }
    }

    /// Set the raw sample for one analog channel.
    pub fn set_analog(&mut self, channel: u8, raw: i32) {
        self.analog.insert(channel, raw);
    }

    /// Last commanded state of a relay, if it has ever been written.
    pub fn relay(&self, address: RelayAddress) -> Option<RelayState> {
        self.relays.get(&address).copied()
    }
}

impl Default for SimulatedHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitalInputPort for SimulatedHardware {
    fn read_digital(&mut self, channel: u8) -> Result<bool> {
        Ok(self.digital.get(&channel).copied().unwrap_or(false))
    }
}

impl AnalogInputPort for SimulatedHardware {
    fn read_analog(&mut self, channel: u8) -> Result<i32> {
        Ok(self.analog.get(&channel).copied().unwrap_or(0))
    }
}

impl RelayPort for SimulatedHardware {
    fn write_relay(&mut self, address: RelayAddress, state: RelayState) -> Result<()> {
        self.relays.insert(address, state);
        self.writes.push(RelayCommand { address, state });
        Ok(())
    }
}
