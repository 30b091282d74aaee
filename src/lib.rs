//! ==============================================================================
//! lib.rs - cropsense feeder library root
//! ==============================================================================
//!
//! purpose:
//!     synthesizes hourly agronomy sensor readings for a site in pune (IST) and
//!     replays them, one per hour from a start date up to now, against a
//!     collector endpoint at a fixed pace.
//!
//! layers:
//!
//!     climate / noise            static baselines, random helpers
//!          │
//!     day / weather / environment / agronomy     per-day and per-hour models
//!          │
//!     generator                  stateful: instant ─► Reading
//!          │
//!     schedule ─► dispatch       time axis, paced submission or preview
//!
//!     config / error             feeder.toml + env overrides, typed failures
//!
//! ==============================================================================

pub mod agronomy;
pub mod climate;
pub mod config;
pub mod day;
pub mod dispatch;
pub mod domain;
pub mod environment;
pub mod error;
pub mod generator;
pub mod noise;
pub mod schedule;
pub mod weather;

pub use config::FeederConfig;
pub use dispatch::{DispatchOptions, DispatchReport, Dispatcher, HttpTransport, Transport};
pub use domain::{HarvestMonth, Raining, Reading};
pub use error::{ConfigError, ScheduleError, TransportError};
pub use generator::{GeneratorSettings, ReadingGenerator};
pub use schedule::{ScheduledInstant, TimeAxis};
