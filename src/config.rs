//! System configuration parameters.
//!
//! All tunable parameters and hardware assignments for the Infinistream
//! controller. Values are loaded from a JSON file at startup (every field
//! has a default) and validated once before the loop runs; nothing here
//! changes at tick time.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::relays::RelayMap;
use crate::sensors::calibration::AnalogChannel;

/// What the control loop does when a capability read or write fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IoErrorPolicy {
    /// Log and skip the tick, leaving actuators in their last commanded
    /// state.
    SkipTick,
    /// Log and exit; supervision restarts the process.
    Terminate,
}

/// Core tunable parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Outflow (L/min) above which the shower counts as in use.
    pub flow_active_threshold: f32,
    /// Shower inactivity (seconds) before a sanitize cycle is forced.
    pub inactivity_limit_secs: u64,
    /// Length of a forced sanitize cycle (seconds).
    pub sanitize_duration_secs: u64,
    /// Restart the inactivity clock when a sanitize window elapses. Off by
    /// default: the override re-arms on the next tick until flow resumes.
    pub reset_idle_after_sanitize: bool,
    /// Control loop period (milliseconds).
    pub tick_interval_ms: u64,
    /// Tick-time I/O failure policy.
    pub io_error_policy: IoErrorPolicy,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            flow_active_threshold: 0.1,
            inactivity_limit_secs: 12 * 60 * 60,
            sanitize_duration_secs: 5 * 60,
            reset_idle_after_sanitize: false,
            tick_interval_ms: 1000, // 1 Hz
            io_error_policy: IoErrorPolicy::SkipTick,
        }
    }
}

impl SystemConfig {
    pub fn inactivity_limit(&self) -> Duration {
        Duration::from_secs(self.inactivity_limit_secs)
    }

    pub fn sanitize_duration(&self) -> Duration {
        Duration::from_secs(self.sanitize_duration_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.flow_active_threshold < 0.0 {
            return Err(Error::Config("flow activity threshold must be >= 0"));
        }
        if self.sanitize_duration_secs == 0 {
            return Err(Error::Config("sanitize duration must be non-zero"));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick interval must be non-zero"));
        }
        Ok(())
    }
}

/// Hardware assignments: input channels, calibration, relay addresses and
/// collaborator endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HwConfig {
    /// The three selector lines, most significant bit first.
    pub mode_select_channels: [u8; 3],
    pub flow_in: AnalogChannel,
    pub flow_out: AnalogChannel,
    pub turbidity: AnalogChannel,
    pub relays: RelayMap,
    /// TCP endpoint of each relay bank, indexed by `RelayAddress::bank`.
    pub relay_banks: Vec<String>,
    /// Display webhook endpoint (MMM-Infinistream `/shower-update`).
    pub webhook_url: Option<String>,
}

impl Default for HwConfig {
    fn default() -> Self {
        let analog = |channel, full_scale_value| AnalogChannel {
            channel,
            full_scale_raw: 32767,
            full_scale_value,
            offset: 0.0,
        };
        Self {
            mode_select_channels: [3, 4, 5],
            flow_in: analog(0, 30.0),   // L/min
            flow_out: analog(1, 30.0),  // L/min
            turbidity: analog(2, 1000.0), // NTU
            relays: RelayMap::default(),
            relay_banks: vec!["192.168.1.120:17494".to_owned()],
            webhook_url: None,
        }
    }
}

/// Aggregate configuration as loaded from the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub system: SystemConfig,
    pub hw: HwConfig,
}

impl AppConfig {
    /// Startup validation. Every failure here is fatal before the loop
    /// starts; nothing validated here can fail again at tick time.
    pub fn validate(&self) -> Result<()> {
        self.system.validate()?;

        for channel in [&self.hw.flow_in, &self.hw.flow_out, &self.hw.turbidity] {
            channel.validate()?;
        }

        let select = self.hw.mode_select_channels;
        if select[0] == select[1] || select[0] == select[2] || select[1] == select[2] {
            return Err(Error::Config("mode select channels must be distinct"));
        }

        let addresses = self.hw.relays.addresses();
        for (i, a) in addresses.iter().enumerate() {
            if addresses[i + 1..].contains(a) {
                return Err(Error::Config("relay addresses must be distinct"));
            }
        }

        Ok(())
    }
}
