//! Linear calibration for analog input channels.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Calibration descriptor mapping a raw ADC count to engineering units.
///
/// The raw/engineering-unit pair (`full_scale_raw`, `full_scale_value`)
/// defines the linear endpoint; `offset` shifts the whole line. Immutable
/// after startup validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalogChannel {
    /// Input channel number on the acquisition front-end.
    pub channel: u8,
    /// Raw count corresponding to `full_scale_value`. Must be non-zero.
    pub full_scale_raw: i32,
    /// Engineering-unit value at full scale.
    pub full_scale_value: f32,
    /// Engineering-unit value at a raw count of zero.
    pub offset: f32,
}

impl AnalogChannel {
    /// Reject the zero full-scale divisor. Called from startup validation
    /// so that [`decode`](Self::decode) stays total at tick time.
    pub fn validate(&self) -> Result<()> {
        if self.full_scale_raw == 0 {
            return Err(Error::Config(
                "analog channel full-scale raw count must be non-zero",
            ));
        }
        Ok(())
    }

    /// Convert a raw count to engineering units:
    /// `(raw / full_scale_raw) * full_scale_value + offset`.
    ///
    /// No clamping. Raw values outside `[0, full_scale_raw]` extrapolate
    /// linearly, so callers may see negative or over-range results — that
    /// is intentional pass-through, not an error.
    pub fn decode(&self, raw: i32) -> f32 {
        (raw as f32 / self.full_scale_raw as f32) * self.full_scale_value + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> AnalogChannel {
        AnalogChannel {
            channel: 1,
            full_scale_raw: 32767,
            full_scale_value: 30.0,
            offset: 2.0,
        }
    }

    #[test]
    fn zero_raw_decodes_to_offset() {
        assert_eq!(channel().decode(0), 2.0);
    }

    #[test]
    fn full_scale_raw_decodes_to_full_scale_plus_offset() {
        let c = channel();
        let value = c.decode(c.full_scale_raw);
        assert!((value - 32.0).abs() < 1e-4);
    }

    #[test]
    fn decode_is_linear_in_raw() {
        let c = AnalogChannel {
            channel: 0,
            full_scale_raw: 1000,
            full_scale_value: 10.0,
            offset: 0.0,
        };
        assert!((c.decode(250) - 2.5).abs() < 1e-6);
        assert!((c.decode(500) - 5.0).abs() < 1e-6);
        assert!((c.decode(750) - 7.5).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_raws_extrapolate() {
        let c = AnalogChannel {
            channel: 0,
            full_scale_raw: 100,
            full_scale_value: 10.0,
            offset: 0.0,
        };
        // Pass-through by contract: no clamping on either side.
        assert!((c.decode(-50) - -5.0).abs() < 1e-6);
        assert!((c.decode(200) - 20.0).abs() < 1e-6);
    }

    #[test]
    fn zero_full_scale_fails_validation() {
        let c = AnalogChannel {
            channel: 0,
            full_scale_raw: 0,
            full_scale_value: 10.0,
            offset: 0.0,
        };
        assert!(c.validate().is_err());
    }
}
