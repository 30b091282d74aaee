use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// rain flag, sent on the wire as "yes" / "no"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Raining {
    Yes,
    No,
}

impl Raining {
    pub fn is_raining(self) -> bool {
        self == Raining::Yes
    }
}

impl From<bool> for Raining {
    fn from(raining: bool) -> Self {
        if raining {
            Raining::Yes
        } else {
            Raining::No
        }
    }
}

/// one harvest month with its price draw (INR/kg)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestMonth {
    pub month: String,
    pub wholesale_price: f64,
    pub retail_price: f64,
}

/// a full synthetic sensor reading
/// field names match what the collector stores, do not rename
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(with = "iso_millis")]
    pub time: DateTime<Utc>,
    /// °C
    pub temperature: f64,
    /// relative humidity (%)
    pub humidity: f64,
    pub aqi: f64,
    /// heat index (°C)
    pub hi: f64,
    /// altitude (m)
    pub alt: f64,
    /// pressure (hPa)
    pub pres: f64,
    /// soil moisture (%)
    pub moisture: f64,
    pub raining: Raining,
    /// dBm, always negative
    pub wifi_strength: i32,
    pub best_crop: String,
    pub recommended_fertilizer: String,
    pub npk_uptake_nitrogen: f64,
    pub npk_uptake_phosphorus: f64,
    pub npk_uptake_potassium: f64,
    pub harvestable_months: Vec<HarvestMonth>,
}

/// the parts of the previous reading the next hour depends on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourState {
    pub temperature: f64,
    pub humidity: f64,
    pub raining: Raining,
    pub aqi: f64,
    pub moisture: f64,
}

impl From<&Reading> for HourState {
    fn from(r: &Reading) -> Self {
        Self {
            temperature: r.temperature,
            humidity: r.humidity,
            raining: r.raining,
            aqi: r.aqi,
            moisture: r.moisture,
        }
    }
}

/// `2025-07-01T00:12:34.000Z`
mod iso_millis {
    use super::*;

    pub fn serialize<S: Serializer>(time: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
