//! ==============================================================================
//! day.rs - per-day climate state
//! ==============================================================================
//!
//! purpose:
//!     every local calendar day gets its own random bias on temperature and
//!     humidity and its own amplitude scale. all hours of the day share them,
//!     so the daily mean never jumps from one hour to the next.
//!
//! relationships:
//!     - reads: climate.rs (monthly baseline for the day's month)
//!     - used by: generator.rs (rolls the state over when the day key changes)
//!
//! ==============================================================================

use crate::climate;
use crate::noise::uniform;
use crate::schedule::ScheduledInstant;

use chrono::NaiveDate;
use rand::Rng;

/// daily temperature bias range (°C)
const TEMP_BIAS: (f64, f64) = (-1.5, 1.5);
/// daily humidity bias range (%)
const HUMIDITY_BIAS: (f64, f64) = (-5.0, 5.0);
/// amplitude scale range applied to both curves
const AMPLITUDE_SCALE: (f64, f64) = (0.9, 1.15);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayState {
    pub day_key: NaiveDate,
    /// 0-based month the baseline was taken from
    pub month: u32,
    pub temp_mean: f64,
    /// amplitude after the daily scale
    pub temp_amplitude: f64,
    pub humidity_mean: f64,
    pub humidity_amplitude: f64,
    pub temp_bias: f64,
    pub humidity_bias: f64,
}

impl DayState {
    /// fresh draws for the instant's local day
    pub fn draw<R: Rng + ?Sized>(instant: &ScheduledInstant, rng: &mut R) -> Self {
        let params = climate::month_params(instant.month);
        let temp_bias = uniform(rng, TEMP_BIAS.0, TEMP_BIAS.1);
        let humidity_bias = uniform(rng, HUMIDITY_BIAS.0, HUMIDITY_BIAS.1);
        let scale = uniform(rng, AMPLITUDE_SCALE.0, AMPLITUDE_SCALE.1);

        Self {
            day_key: instant.day_key,
            month: instant.month,
            temp_mean: params.temp_mean,
            temp_amplitude: params.temp_amplitude * scale,
            humidity_mean: params.humidity_mean,
            humidity_amplitude: params.humidity_amplitude * scale,
            temp_bias,
            humidity_bias,
        }
    }

    pub fn covers(&self, instant: &ScheduledInstant) -> bool {
        self.day_key == instant.day_key
    }

    /// ratio of the scaled amplitude to the monthly baseline
    pub fn amplitude_scale(&self) -> f64 {
        self.temp_amplitude / climate::month_params(self.month).temp_amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::IST_OFFSET_MINUTES;
    use chrono::{FixedOffset, TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn instant(y: i32, m: u32, d: u32, h: u32) -> ScheduledInstant {
        let offset = FixedOffset::east_opt(IST_OFFSET_MINUTES * 60).unwrap();
        let local = offset.with_ymd_and_hms(y, m, d, h, 20, 0).unwrap();
        ScheduledInstant::from_utc(local.with_timezone(&Utc), offset)
    }

    #[test]
    fn test_draw_stays_in_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        for day in 1..=28 {
            let state = DayState::draw(&instant(2025, 1, day, 6), &mut rng);
            assert_eq!(state.month, 0);
            assert!((-1.5..1.5).contains(&state.temp_bias));
            assert!((-5.0..5.0).contains(&state.humidity_bias));
            let scale = state.amplitude_scale();
            assert!((0.9..1.15 + 1e-9).contains(&scale), "scale {scale}");
            assert!((state.humidity_amplitude / 10.0 - scale).abs() < 1e-9);
        }
    }

    #[test]
    fn test_covers_same_local_day_only() {
        let mut rng = StdRng::seed_from_u64(12);
        let state = DayState::draw(&instant(2025, 7, 1, 0), &mut rng);
        assert!(state.covers(&instant(2025, 7, 1, 23)));
        assert!(!state.covers(&instant(2025, 7, 2, 0)));
    }
}
