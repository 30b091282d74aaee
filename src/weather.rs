//! hourly temperature and humidity
//!
//! both follow a cosine day curve around the day's biased mean, get a small
//! proportional jitter, and are blended 80/20 with the previous hour when one
//! is carried. humidity runs in opposite phase to temperature.

use crate::climate::{diurnal, TEMPERATURE_PEAK_HOUR};
use crate::day::DayState;
use crate::noise::{blend, jitter};

use rand::Rng;

const TEMP_JITTER_PCT: f64 = 2.0;
const HUMIDITY_JITTER_PCT: f64 = 5.0;
const CONTINUITY_WEIGHT: f64 = 0.8;

pub const HUMIDITY_MIN: f64 = 25.0;
pub const HUMIDITY_MAX: f64 = 98.0;

/// humidity peaks twelve hours away from temperature
const HUMIDITY_PEAK_HOUR: f64 = TEMPERATURE_PEAK_HOUR - 12.0;

/// °C. not clamped.
pub fn temperature<R: Rng + ?Sized>(
    day: &DayState,
    hour: u32,
    previous: Option<f64>,
    rng: &mut R,
) -> f64 {
    let curve = diurnal(
        day.temp_mean + day.temp_bias,
        day.temp_amplitude,
        hour,
        TEMPERATURE_PEAK_HOUR,
    );
    blend(jitter(rng, curve, TEMP_JITTER_PCT), previous, CONTINUITY_WEIGHT)
}

/// %RH, always within [25, 98]
pub fn humidity<R: Rng + ?Sized>(
    day: &DayState,
    hour: u32,
    previous: Option<f64>,
    rng: &mut R,
) -> f64 {
    let curve = diurnal(
        day.humidity_mean + day.humidity_bias,
        day.humidity_amplitude,
        hour,
        HUMIDITY_PEAK_HOUR,
    );
    let current = jitter(rng, curve, HUMIDITY_JITTER_PCT).clamp(HUMIDITY_MIN, HUMIDITY_MAX);
    // both sides of the blend are already in range, so the result is too
    blend(current, previous, CONTINUITY_WEIGHT)
}
