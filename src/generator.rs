//! ==============================================================================
//! generator.rs - stateful reading generator
//! ==============================================================================
//!
//! purpose:
//!     turns one scheduled instant into one full Reading. owns the only mutable
//!     model state:
//!     - DayState: replaced whenever the local day key changes
//!     - HourState: the previous reading's continuity fields, reset on rollover
//!
//! flow per instant:
//!
//!     instant ─► day rollover? ─► temperature/humidity ─► rain ─► aqi
//!                                                              │
//!     Reading ◄─ assemble ◄─ agronomy ◄─ wifi ◄─ moisture ◄─ barometer
//!        │
//!        └─► HourState for the next instant
//!
//! relationships:
//!     - uses: day.rs, weather.rs, environment.rs, agronomy.rs
//!     - used by: dispatch.rs (one call per scheduled instant)
//!
//! ==============================================================================

use crate::agronomy::{self, Recommendation};
use crate::day::DayState;
use crate::domain::{HourState, Raining, Reading};
use crate::environment::{self, SITE_ALTITUDE_M};
use crate::schedule::ScheduledInstant;
use crate::weather;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorSettings {
    /// carry the previous hour into smoothing and rain persistence.
    /// with this off every hour is generated as if it were the first of its day.
    pub continuity: bool,
    /// site elevation (m) the barometer is centered on
    pub altitude_m: f64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            continuity: true,
            altitude_m: SITE_ALTITUDE_M,
        }
    }
}

/// environmental part of one hour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub raining: bool,
    pub aqi: f64,
    pub altitude: f64,
    pub pressure: f64,
    pub moisture: f64,
    pub wifi_strength: i32,
}

pub struct ReadingGenerator<R> {
    rng: R,
    settings: GeneratorSettings,
    day: Option<DayState>,
    previous: Option<HourState>,
}

impl ReadingGenerator<StdRng> {
    /// seeded generator, or one seeded from os entropy
    pub fn from_seed(seed: Option<u64>, settings: GeneratorSettings) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng, settings)
    }
}

impl<R: Rng> ReadingGenerator<R> {
    pub fn new(rng: R, settings: GeneratorSettings) -> Self {
        Self {
            rng,
            settings,
            day: None,
            previous: None,
        }
    }

    pub fn day_state(&self) -> Option<&DayState> {
        self.day.as_ref()
    }

    pub fn hour_state(&self) -> Option<&HourState> {
        self.previous.as_ref()
    }

    /// make sure the held DayState covers the instant's local day.
    /// returns true when a new day was drawn.
    pub fn roll_day(&mut self, instant: &ScheduledInstant) -> bool {
        let held = self.day.map(|d| d.day_key);
        self.day_for(instant);
        held != Some(instant.day_key)
    }

    fn day_for(&mut self, instant: &ScheduledInstant) -> DayState {
        match self.day {
            Some(day) if day.covers(instant) => day,
            _ => {
                let day = DayState::draw(instant, &mut self.rng);
                tracing::debug!(
                    day = %day.day_key,
                    temp_bias = day.temp_bias,
                    humidity_bias = day.humidity_bias,
                    "day rollover"
                );
                self.day = Some(day);
                // each day starts its own smoothing baseline
                self.previous = None;
                day
            }
        }
    }

    /// simulate the environmental values for one hour of `day`
    pub fn conditions(
        &mut self,
        day: &DayState,
        hour: u32,
        previous: Option<&HourState>,
    ) -> HourlyConditions {
        let rng = &mut self.rng;
        let month = day.month;

        let temperature = weather::temperature(day, hour, previous.map(|p| p.temperature), rng);
        let humidity = weather::humidity(day, hour, previous.map(|p| p.humidity), rng);

        let was_raining = previous.is_some_and(|p| p.raining.is_raining());
        let raining = environment::decide_rain(month, hour, humidity, was_raining, rng);
        let aqi = environment::air_quality(month, hour, raining, previous.map(|p| p.aqi), rng);
        let (altitude, pressure) = environment::barometer(self.settings.altitude_m, rng);
        let moisture = environment::soil_moisture(
            month,
            raining,
            temperature,
            humidity,
            previous.map(|p| p.moisture),
            rng,
        );
        let wifi_strength = environment::wifi_strength(rng);

        HourlyConditions {
            temperature,
            humidity,
            raining,
            aqi,
            altitude,
            pressure,
            moisture,
            wifi_strength,
        }
    }

    /// generate the reading for `instant` and advance the carried state
    pub fn next_reading(&mut self, instant: &ScheduledInstant) -> Reading {
        let day = self.day_for(instant);
        let previous = if self.settings.continuity {
            self.previous
        } else {
            None
        };

        let conditions = self.conditions(&day, instant.hour, previous.as_ref());
        let recommendation = agronomy::recommend(day.month, &mut self.rng);
        let reading = assemble(instant, &conditions, recommendation);

        if self.settings.continuity {
            self.previous = Some(HourState::from(&reading));
        }
        reading
    }
}

/// compose one reading from its parts
pub fn assemble(
    instant: &ScheduledInstant,
    conditions: &HourlyConditions,
    recommendation: Recommendation,
) -> Reading {
    Reading {
        time: instant.utc,
        temperature: conditions.temperature,
        humidity: conditions.humidity,
        aqi: conditions.aqi,
        hi: environment::heat_index(conditions.temperature, conditions.humidity),
        alt: conditions.altitude,
        pres: conditions.pressure,
        moisture: conditions.moisture,
        raining: Raining::from(conditions.raining),
        wifi_strength: conditions.wifi_strength,
        best_crop: recommendation.crop.name().to_string(),
        recommended_fertilizer: recommendation.fertilizer.to_string(),
        npk_uptake_nitrogen: recommendation.uptake.nitrogen,
        npk_uptake_phosphorus: recommendation.uptake.phosphorus,
        npk_uptake_potassium: recommendation.uptake.potassium,
        harvestable_months: recommendation.harvest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate;
    use crate::schedule::IST_OFFSET_MINUTES;
    use chrono::{FixedOffset, TimeZone, Utc};

    fn ist(y: i32, m: u32, d: u32, h: u32) -> ScheduledInstant {
        let offset = FixedOffset::east_opt(IST_OFFSET_MINUTES * 60).unwrap();
        let local = offset.with_ymd_and_hms(y, m, d, h, 17, 42).unwrap();
        ScheduledInstant::from_utc(local.with_timezone(&Utc), offset)
    }

    #[test]
    fn test_july_afternoon_first_reading() {
        let mut generator = ReadingGenerator::from_seed(Some(42), GeneratorSettings::default());
        let reading = generator.next_reading(&ist(2025, 7, 15, 15));

        assert_eq!(reading.best_crop, "rice");
        assert_eq!(reading.recommended_fertilizer, "NPK 20-20-20");

        // trough of the humidity curve: mean + bias - scaled amplitude, ±5 % jitter
        let july = climate::month_params(6);
        let swing = july.humidity_amplitude * 1.15 + 5.0;
        let low = (july.humidity_mean - swing) * 0.95;
        let high = (july.humidity_mean + swing) * 1.05;
        assert!(reading.humidity >= low && reading.humidity <= high.min(98.0));

        let day = generator.day_state().unwrap();
        assert_eq!(day.month, 6);
    }

    #[test]
    fn test_day_terms_shared_within_a_day() {
        let mut generator = ReadingGenerator::from_seed(Some(7), GeneratorSettings::default());
        generator.next_reading(&ist(2025, 8, 3, 0));
        let first = *generator.day_state().unwrap();

        for hour in 1..24 {
            generator.next_reading(&ist(2025, 8, 3, hour));
            assert_eq!(generator.day_state().unwrap(), &first);
        }

        generator.next_reading(&ist(2025, 8, 4, 0));
        let next = generator.day_state().unwrap();
        assert_ne!(next.day_key, first.day_key);
        assert_ne!(next.temp_bias, first.temp_bias);
    }

    #[test]
    fn test_rollover_resets_hour_state() {
        let mut generator = ReadingGenerator::from_seed(Some(3), GeneratorSettings::default());
        generator.next_reading(&ist(2025, 8, 3, 23));
        assert!(generator.hour_state().is_some());

        let instant = ist(2025, 8, 4, 0);
        assert!(generator.roll_day(&instant));
        assert!(generator.hour_state().is_none());
        assert!(!generator.roll_day(&instant));
    }

    #[test]
    fn test_continuity_off_keeps_no_hour_state() {
        let settings = GeneratorSettings {
            continuity: false,
            ..GeneratorSettings::default()
        };
        let mut generator = ReadingGenerator::from_seed(Some(5), settings);
        for hour in 0..5 {
            generator.next_reading(&ist(2025, 9, 10, hour));
            assert!(generator.hour_state().is_none());
        }
    }

    #[test]
    fn test_hour_state_tracks_last_reading() {
        let mut generator = ReadingGenerator::from_seed(Some(8), GeneratorSettings::default());
        let reading = generator.next_reading(&ist(2025, 10, 1, 12));
        assert_eq!(generator.hour_state(), Some(&HourState::from(&reading)));
    }

    #[test]
    fn test_same_seed_same_readings() {
        let instants: Vec<_> = (0..48).map(|h| ist(2025, 7, 1 + h / 24, h % 24)).collect();
        let mut a = ReadingGenerator::from_seed(Some(99), GeneratorSettings::default());
        let mut b = ReadingGenerator::from_seed(Some(99), GeneratorSettings::default());
        for instant in &instants {
            assert_eq!(a.next_reading(instant), b.next_reading(instant));
        }
    }
}
