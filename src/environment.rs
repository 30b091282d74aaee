//! ==============================================================================
//! environment.rs - derived environmental models
//! ==============================================================================
//!
//! purpose:
//!     everything that is computed from the hour's temperature/humidity plus the
//!     previous hour's state:
//!     - rain decision (with persistence, so rain comes in streaks)
//!     - air quality index (washout, commute peaks, night dip)
//!     - soil moisture (mean reverting towards a seasonal target, forced by
//!       rain and evaporation)
//!     - altitude and barometric pressure around the site elevation
//!     - heat index (rothfusz regression)
//!     - wifi signal strength of the node
//!
//! relationships:
//!     - reads: climate.rs (monthly rain probability, aqi baseline)
//!     - used by: generator.rs
//!
//! ==============================================================================

use crate::climate::{self, POST_MONSOON_MONTHS};
use crate::noise::{blend, jitter, uniform};

use rand::Rng;

// ==============================================================================
// rain
// ==============================================================================

const MONSOON_CONVECTION_BOOST: f64 = 0.10;
const HUMID_BOOST: f64 = 0.05;
const HUMID_THRESHOLD: f64 = 75.0;
const PERSIST_RAINING: f64 = 0.20;
const PERSIST_DRY: f64 = -0.05;

/// probability of rain this hour before the bernoulli draw
pub fn rain_probability(month: u32, hour: u32, humidity: f64, was_raining: bool) -> f64 {
    let base = climate::month_params(month).rain_probability;
    // late afternoon/evening convection during the monsoon
    let convection = if climate::is_monsoon(month) && (14..=21).contains(&hour) {
        MONSOON_CONVECTION_BOOST
    } else {
        0.0
    };
    let humid = if humidity > HUMID_THRESHOLD { HUMID_BOOST } else { 0.0 };
    let persistence = if was_raining { PERSIST_RAINING } else { PERSIST_DRY };

    (base + convection + humid + persistence).clamp(0.01, 0.98)
}

pub fn decide_rain<R: Rng + ?Sized>(
    month: u32,
    hour: u32,
    humidity: f64,
    was_raining: bool,
    rng: &mut R,
) -> bool {
    rng.gen::<f64>() < rain_probability(month, hour, humidity, was_raining)
}

// ==============================================================================
// air quality
// ==============================================================================

const AQI_FLOOR: f64 = 20.0;
const AQI_JITTER_PCT: f64 = 10.0;
const AQI_CONTINUITY_WEIGHT: f64 = 0.7;

pub fn air_quality<R: Rng + ?Sized>(
    month: u32,
    hour: u32,
    raining: bool,
    previous: Option<f64>,
    rng: &mut R,
) -> f64 {
    let mut aqi = climate::month_params(month).aqi_base;
    if raining {
        aqi -= 20.0; // washout
    }
    match hour {
        7..=10 => aqi += 10.0,  // morning commute
        18..=21 => aqi += 8.0,  // evening commute
        0..=4 => aqi -= 10.0,   // late night
        _ => {}
    }
    let aqi = jitter(rng, aqi.max(AQI_FLOOR), AQI_JITTER_PCT);
    blend(aqi, previous, AQI_CONTINUITY_WEIGHT)
}

// ==============================================================================
// soil moisture
// ==============================================================================

pub const MOISTURE_MIN: f64 = 5.0;
pub const MOISTURE_MAX: f64 = 85.0;
const MOISTURE_PULL: f64 = 0.05;

/// seasonal moisture the soil drifts towards
pub fn moisture_target(month: u32) -> f64 {
    if climate::is_monsoon(month) {
        55.0
    } else if POST_MONSOON_MONTHS.contains(&month) {
        35.0
    } else {
        25.0
    }
}

/// moisture lost this hour; grows when hot and when dry
pub fn evaporation(temperature: f64, humidity: f64) -> f64 {
    ((temperature - 25.0) * 0.12).max(0.0) + ((60.0 - humidity) * 0.04).max(0.0)
}

pub fn soil_moisture<R: Rng + ?Sized>(
    month: u32,
    raining: bool,
    temperature: f64,
    humidity: f64,
    previous: Option<f64>,
    rng: &mut R,
) -> f64 {
    let target = moisture_target(month);
    let mut moisture = match previous {
        Some(prev) => prev,
        None => jitter(rng, target, 10.0),
    };

    if raining {
        moisture += uniform(rng, 2.0, 6.0);
    }
    moisture -= evaporation(temperature, humidity);
    moisture += (target - moisture) * MOISTURE_PULL;

    moisture.clamp(MOISTURE_MIN, MOISTURE_MAX)
}

// ==============================================================================
// pressure / altitude
// ==============================================================================

/// pune sits at roughly 560 m AMSL
pub const SITE_ALTITUDE_M: f64 = 560.0;

/// standard atmosphere pressure (hPa) at `altitude_m`
pub fn pressure_at_altitude(altitude_m: f64) -> f64 {
    1013.25 * (1.0 - 2.25577e-5 * altitude_m).powf(5.25588)
}

/// (altitude m, pressure hPa), both jittered around the site baseline
pub fn barometer<R: Rng + ?Sized>(site_altitude_m: f64, rng: &mut R) -> (f64, f64) {
    let altitude = jitter(rng, site_altitude_m, 0.8);
    let pressure = jitter(rng, pressure_at_altitude(site_altitude_m), 1.2);
    (altitude, pressure)
}

// ==============================================================================
// heat index
// ==============================================================================

/// below this the rothfusz regression does not apply
pub const HEAT_INDEX_THRESHOLD_C: f64 = 26.7;

/// heat index (°C) from temperature (°C) and relative humidity (%)
pub fn heat_index(temp_c: f64, rh: f64) -> f64 {
    if temp_c < HEAT_INDEX_THRESHOLD_C {
        return temp_c;
    }
    let t = temp_c * 9.0 / 5.0 + 32.0;
    let r = rh;
    let hi_f = -42.379 + 2.04901523 * t + 10.14333127 * r
        - 0.22475541 * t * r
        - 6.83783e-3 * t * t
        - 5.481717e-2 * r * r
        + 1.22874e-3 * t * t * r
        + 8.5282e-4 * t * r * r
        - 1.99e-6 * t * t * r * r;
    (hi_f - 32.0) * 5.0 / 9.0
}

// ==============================================================================
// wifi
// ==============================================================================

/// typical indoor rssi, -48 to -72 dBm
pub fn wifi_strength<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    -(uniform(rng, 48.0, 72.0).round() as i32)
}
