//! ==============================================================================
//! climate.rs - monthly climate baselines for the site
//! ==============================================================================
//!
//! purpose:
//!     static lookup of per-month climate statistics for Pune, Maharashtra.
//!     every stochastic model in the crate is centered on these numbers.
//!
//! relationships:
//!     - used by: day.rs (daily means/amplitudes), environment.rs (rain, aqi)
//!     - used by: agronomy.rs (monsoon month set)
//!
//! ==============================================================================

use std::f64::consts::TAU;

/// months (0-based) that belong to the south-west monsoon
pub const MONSOON_MONTHS: [u32; 4] = [6, 7, 8, 9];

/// post-monsoon through winter months, used for the soil moisture target
pub const POST_MONSOON_MONTHS: [u32; 3] = [10, 11, 0];

/// local hour at which the temperature curve peaks
pub const TEMPERATURE_PEAK_HOUR: f64 = 15.0;

/// baseline statistics for one calendar month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateParams {
    /// mean daily temperature (°C)
    pub temp_mean: f64,
    /// half of the day/night temperature swing (°C)
    pub temp_amplitude: f64,
    /// mean relative humidity (%)
    pub humidity_mean: f64,
    /// half of the day/night humidity swing (%)
    pub humidity_amplitude: f64,
    /// baseline hourly rain probability (0-1)
    pub rain_probability: f64,
    /// baseline air-quality index
    pub aqi_base: f64,
}

impl ClimateParams {
    const fn new(
        temp_mean: f64,
        temp_amplitude: f64,
        humidity_mean: f64,
        humidity_amplitude: f64,
        rain_probability: f64,
        aqi_base: f64,
    ) -> Self {
        Self {
            temp_mean,
            temp_amplitude,
            humidity_mean,
            humidity_amplitude,
            rain_probability,
            aqi_base,
        }
    }
}

// ==============================================================================
// monthly table
// ==============================================================================
// index 0 is january. numbers are approximate daily means for pune.

const MONTHLY: [ClimateParams; 12] = [
    ClimateParams::new(22.0, 6.0, 45.0, 10.0, 0.02, 110.0),  // jan
    ClimateParams::new(24.0, 7.0, 40.0, 10.0, 0.03, 100.0),  // feb
    ClimateParams::new(28.0, 8.0, 35.0, 12.0, 0.04, 90.0),   // mar
    ClimateParams::new(31.0, 9.0, 35.0, 12.0, 0.05, 95.0),   // apr
    ClimateParams::new(33.0, 10.0, 40.0, 12.0, 0.08, 100.0), // may
    ClimateParams::new(29.0, 7.0, 70.0, 10.0, 0.72, 70.0),   // jun, monsoon onset
    ClimateParams::new(27.0, 5.0, 80.0, 8.0, 0.82, 60.0),    // jul, peak monsoon
    ClimateParams::new(27.0, 5.0, 82.0, 8.0, 0.76, 60.0),    // aug
    ClimateParams::new(28.0, 6.0, 75.0, 10.0, 0.58, 65.0),   // sep, retreating
    ClimateParams::new(28.0, 8.0, 55.0, 12.0, 0.57, 80.0),   // oct
    ClimateParams::new(26.0, 7.0, 45.0, 12.0, 0.06, 90.0),   // nov
    ClimateParams::new(23.0, 6.0, 45.0, 10.0, 0.03, 100.0),  // dec
];

/// used for any month index outside 0..=11
pub const FALLBACK: ClimateParams = ClimateParams::new(28.0, 7.0, 55.0, 10.0, 0.1, 85.0);

/// climate baseline for a 0-based month index
pub fn month_params(month: u32) -> ClimateParams {
    MONTHLY.get(month as usize).copied().unwrap_or(FALLBACK)
}

pub fn is_monsoon(month: u32) -> bool {
    MONSOON_MONTHS.contains(&month)
}

/// cosine day curve peaking at `peak_hour` (local time)
pub fn diurnal(mean: f64, amplitude: f64, hour: u32, peak_hour: f64) -> f64 {
    let radians = (hour as f64 - peak_hour) / 24.0 * TAU;
    mean + amplitude * radians.cos()
}

pub fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January", "February", "March", "April", "May", "June",
        "July", "August", "September", "October", "November", "December",
    ];
    NAMES[(month % 12) as usize]
}
