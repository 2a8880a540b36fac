//! Operating modes and rotary-selector decode.

use serde::{Deserialize, Serialize};

/// The operating regime of the appliance, as selected on the front panel
/// or forced by the sanitize-cycle override.
///
/// A closed tag set — there is no meaningful ordering between modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    /// Inert no-pump state; tank drains to the faucet.
    Drain,
    /// Tank through the filter to the faucet.
    Flush,
    /// Full recirculation: tank, heater, shower, filter, UV, tank.
    Shower,
    /// Closed sanitation loop: tank through UV back to the tank.
    Sanitize,
}

impl Mode {
    /// Decode the three selector lines into a mode.
    ///
    /// Bits form the value `b0<<2 | b1<<1 | b2`. Only one line is ever
    /// asserted by a healthy selector; every unused combination (`011`,
    /// `101`, `110`, `111`) decodes to [`Mode::Drain`], the inert state.
    /// The fallback is deliberate fail-safe policy, not an error path.
    pub fn from_select_bits(bits: [bool; 3]) -> Self {
        let value =
            u8::from(bits[0]) << 2 | u8::from(bits[1]) << 1 | u8::from(bits[2]);
        match value {
            0b001 => Self::Flush,
            0b010 => Self::Shower,
            0b100 => Self::Sanitize,
            _ => Self::Drain,
        }
    }

    /// Uppercase label, matching the display's vocabulary.
    pub fn label(self) -> &'static str {
        match self {
            Self::Drain => "DRAIN",
            Self::Flush => "FLUSH",
            Self::Shower => "SHOWER",
            Self::Sanitize => "SANITIZE",
        }
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_four_selector_positions() {
        assert_eq!(Mode::from_select_bits([false, false, false]), Mode::Drain);
        assert_eq!(Mode::from_select_bits([false, false, true]), Mode::Flush);
        assert_eq!(Mode::from_select_bits([false, true, false]), Mode::Shower);
        assert_eq!(Mode::from_select_bits([true, false, false]), Mode::Sanitize);
    }

    #[test]
    fn unused_patterns_fall_back_to_drain() {
        // 011, 101, 110, 111 — mid-rotation glitches or wiring faults.
        assert_eq!(Mode::from_select_bits([false, true, true]), Mode::Drain);
        assert_eq!(Mode::from_select_bits([true, false, true]), Mode::Drain);
        assert_eq!(Mode::from_select_bits([true, true, false]), Mode::Drain);
        assert_eq!(Mode::from_select_bits([true, true, true]), Mode::Drain);
    }

    #[test]
    fn serializes_uppercase_for_the_display() {
        assert_eq!(serde_json::to_string(&Mode::Shower).unwrap(), "\"SHOWER\"");
        assert_eq!(serde_json::to_string(&Mode::Sanitize).unwrap(), "\"SANITIZE\"");
    }

    #[test]
    fn label_matches_display() {
        for mode in [Mode::Drain, Mode::Flush, Mode::Shower, Mode::Sanitize] {
            assert_eq!(mode.label(), format!("{mode}"));
        }
    }
}
