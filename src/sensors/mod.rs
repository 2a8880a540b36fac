//! Sensor acquisition — calibration and the aggregating [`SensorHub`].
//!
//! The hub reads the three selector lines and three analog channels
//! through the input ports and produces one immutable [`SensorSnapshot`]
//! per control tick.

pub mod calibration;

use serde::Serialize;

use crate::app::ports::{AnalogInputPort, DigitalInputPort};
use crate::config::HwConfig;
use crate::error::Result;
use crate::mode::Mode;
use calibration::AnalogChannel;

/// A point-in-time snapshot of every input the controller consumes.
///
/// Built once per tick from raw readings; immutable after creation and
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorSnapshot {
    /// Mode requested by the physical rotary selector.
    pub selected_mode: Mode,
    /// Inflow rate (L/min).
    pub flow_in: f32,
    /// Outflow rate (L/min) — drives the sanitize-cycle inactivity clock.
    pub flow_out: f32,
    /// Water turbidity (NTU).
    pub turbidity: f32,
}

/// Reads raw inputs through the ports and decodes them into a snapshot.
pub struct SensorHub {
    select_channels: [u8; 3],
    flow_in: AnalogChannel,
    flow_out: AnalogChannel,
    turbidity: AnalogChannel,
}

impl SensorHub {
    pub fn from_config(hw: &HwConfig) -> Self {
        Self {
            select_channels: hw.mode_select_channels,
            flow_in: hw.flow_in,
            flow_out: hw.flow_out,
            turbidity: hw.turbidity,
        }
    }

    /// Read every input and return a decoded snapshot.
    ///
    /// Port failures propagate unchanged; the loop decides what a failed
    /// tick means. Selector decode itself cannot fail — unknown bit
    /// patterns resolve to DRAIN by policy.
    pub fn acquire(
        &self,
        hw: &mut (impl DigitalInputPort + AnalogInputPort),
    ) -> Result<SensorSnapshot> {
        let mut bits = [false; 3];
        for (bit, channel) in bits.iter_mut().zip(self.select_channels) {
            *bit = hw.read_digital(channel)?;
        }

        let flow_in_raw = hw.read_analog(self.flow_in.channel)?;
        let flow_out_raw = hw.read_analog(self.flow_out.channel)?;
        let turbidity_raw = hw.read_analog(self.turbidity.channel)?;

        Ok(SensorSnapshot {
            selected_mode: Mode::from_select_bits(bits),
            flow_in: self.flow_in.decode(flow_in_raw),
            flow_out: self.flow_out.decode(flow_out_raw),
            turbidity: self.turbidity.decode(turbidity_raw),
        })
    }
}
