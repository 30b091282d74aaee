//! ==============================================================================
//! config.rs - feeder configuration loader
//! ==============================================================================
//!
//! purpose:
//!     defines the schema for `feeder.toml`.
//!     loads configuration from file or falls back to defaults, then applies
//!     environment overrides.
//!
//! structure:
//!     - TargetConfig: where readings are posted and how fast.
//!     - ScheduleConfig: start date, site utc offset, optional reading cap.
//!     - GeneratorConfig: seed, continuity toggle, site altitude.
//!     - RunConfig: preview (dry run) mode and where preview readings go.
//!     - LoggingConfig: default log level.
//!
//! environment overrides:
//!     DRY_RUN=true|false, LIMIT_N=<count>, FEEDER_SEED=<u64>,
//!     FEEDER_TARGET_URL=<url>
//!
//! ==============================================================================

use crate::dispatch::DispatchOptions;
use crate::environment::SITE_ALTITUDE_M;
use crate::error::ConfigError;
use crate::generator::GeneratorSettings;
use crate::schedule::IST_OFFSET_MINUTES;

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FeederConfig {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TargetConfig {
    pub url: String,
    /// pause between submissions
    pub delay_ms: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScheduleConfig {
    /// first local day; sampling starts at its midnight
    pub start_date: NaiveDate,
    pub utc_offset_minutes: i32,
    pub max_readings: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: Option<u64>,
    pub continuity: bool,
    pub altitude_m: f64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RunConfig {
    pub dry_run: bool,
    /// json-lines file for preview readings
    pub preview_output: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1/data".to_string(),
            delay_ms: 250,
            timeout_secs: 10,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap_or_default(),
            utc_offset_minutes: IST_OFFSET_MINUTES,
            max_readings: None,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            continuity: true,
            altitude_m: SITE_ALTITUDE_M,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl FeederConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FeederConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the first config file found, with default fallback.
    /// a file that exists but does not parse is an error, not a fallback.
    pub fn load_or_default() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let paths = [
            PathBuf::from("config").join("feeder.toml"),
            PathBuf::from("..").join("config").join("feeder.toml"),
        ];

        for path in paths {
            if path.exists() {
                let config = Self::load(&path)?;
                return Ok((config, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }

    /// apply DRY_RUN / LIMIT_N / FEEDER_SEED / FEEDER_TARGET_URL from the process env
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("DRY_RUN") {
            self.run.dry_run = match raw.trim() {
                "true" | "1" => true,
                "false" | "0" | "" => false,
                other => {
                    let message = format!("expected true/false, got {other:?}");
                    return Err(ConfigError::invalid("DRY_RUN", message));
                }
            };
        }
        if let Some(raw) = lookup("LIMIT_N") {
            let limit = raw
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::invalid("LIMIT_N", e.to_string()))?;
            self.schedule.max_readings = Some(limit);
        }
        if let Some(raw) = lookup("FEEDER_SEED") {
            let seed = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::invalid("FEEDER_SEED", e.to_string()))?;
            self.generator.seed = Some(seed);
        }
        if let Some(url) = lookup("FEEDER_TARGET_URL") {
            self.target.url = url;
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let max_offset = 24 * 60 - 1;
        if self.schedule.utc_offset_minutes.abs() > max_offset {
            return Err(ConfigError::invalid(
                "schedule.utc_offset_minutes",
                format!("must be within ±{max_offset}"),
            ));
        }
        // the barometric formula breaks down at the top of the model atmosphere
        if !(self.generator.altitude_m < 44_000.0) {
            return Err(ConfigError::invalid(
                "generator.altitude_m",
                "must be below 44000 m",
            ));
        }
        if self.target.url.trim().is_empty() && !self.run.dry_run {
            return Err(ConfigError::invalid("target.url", "must not be empty"));
        }
        Ok(())
    }

    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            continuity: self.generator.continuity,
            altitude_m: self.generator.altitude_m,
        }
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            delay: Duration::from_millis(self.target.delay_ms),
            max_submissions: self.schedule.max_readings,
            preview: self.run.dry_run,
            record: self.run.dry_run && self.run.preview_output.is_some(),
        }
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        let cap = self
            .schedule
            .max_readings
            .map_or_else(|| "none".to_string(), |n| n.to_string());
        let seed = self
            .generator
            .seed
            .map_or_else(|| "entropy".to_string(), |s| s.to_string());
        println!("┌─────────────────────────────────────────┐");
        println!("│          FEEDER CONFIGURATION           │");
        println!("├─────────────────────────────────────────┤");
        println!("│ Target: {}", self.target.url);
        println!("│ Delay: {}ms", self.target.delay_ms);
        println!(
            "│ Start: {} (UTC{:+}min)",
            self.schedule.start_date, self.schedule.utc_offset_minutes
        );
        println!("│ Cap: {}", cap);
        println!("│ Seed: {}", seed);
        println!("│ Continuity: {}", self.generator.continuity);
        println!("│ Dry run: {}", self.run.dry_run);
        println!("│ Log Level: {}", self.logging.level);
        println!("└─────────────────────────────────────────┘");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = FeederConfig::from_toml("").unwrap();
        assert_eq!(config.target.delay_ms, 250);
        assert_eq!(config.schedule.utc_offset_minutes, 330);
        assert_eq!(config.schedule.start_date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert!(config.generator.continuity);
        assert!(!config.run.dry_run);
    }

    #[test]
    fn test_parse_full_file() {
        let config = FeederConfig::from_toml(
            r#"
            [target]
            url = "http://collector.local/data"
            delay_ms = 100

            [schedule]
            start_date = "2025-08-15"
            max_readings = 48

            [generator]
            seed = 7
            continuity = false

            [run]
            dry_run = true
            preview_output = "preview.jsonl"
            "#,
        )
        .unwrap();

        assert_eq!(config.target.url, "http://collector.local/data");
        assert_eq!(config.target.timeout_secs, 10);
        assert_eq!(config.schedule.max_readings, Some(48));
        assert_eq!(config.generator.seed, Some(7));
        assert!(!config.generator_settings().continuity);

        let options = config.dispatch_options();
        assert!(options.preview);
        assert!(options.record);
        assert_eq!(options.delay, Duration::from_millis(100));
        assert_eq!(options.max_submissions, Some(48));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = FeederConfig::default();
        config
            .apply_overrides(env(&[("DRY_RUN", "true"), ("LIMIT_N", "12"), ("FEEDER_SEED", "99")]))
            .unwrap();
        assert!(config.run.dry_run);
        assert_eq!(config.schedule.max_readings, Some(12));
        assert_eq!(config.generator.seed, Some(99));
        // dry run without an output file keeps nothing in memory
        assert!(!config.dispatch_options().record);
    }

    #[test]
    fn test_bad_override_is_rejected() {
        let mut config = FeederConfig::default();
        let err = config.apply_overrides(env(&[("LIMIT_N", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "LIMIT_N"));

        let err = config.apply_overrides(env(&[("DRY_RUN", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_invalid_offset_rejected() {
        let err = FeederConfig::from_toml("[schedule]\nutc_offset_minutes = 1500\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
