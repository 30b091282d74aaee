//! ==============================================================================
//! main.rs - cropsense feeder entry point
//! ==============================================================================
//!
//! purpose:
//!     replays a synthetic hourly sensor history against the collector.
//!     one reading per local hour from the configured start date up to the
//!     last completed hour, submitted one at a time with a fixed delay.
//!
//! responsibilities:
//!     - load feeder.toml and apply environment overrides
//!     - initialize tracing (RUST_LOG wins over the config level)
//!     - build the time axis once, fail before any submission if it is empty
//!     - drive the dispatcher against the http transport, or preview locally
//!     - optionally write preview readings as json lines
//!
//! architecture:
//!
//!     ┌─────────────────────────────────────────────────────────────┐
//!     │                      main (this file)                       │
//!     │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//!     │  │  time axis  │─►│  generator  │─►│     dispatcher      │  │
//!     │  │ (schedule)  │  │ (day/hour)  │  │ (paced, sequential) │  │
//!     │  └─────────────┘  └─────────────┘  └──────────┬──────────┘  │
//!     └──────────────────────────────────────────────┼─────────────┘
//!                                                    │ POST json
//!                                             ┌──────┴──────┐
//!                                             │  collector  │
//!                                             └─────────────┘
//!
//! ==============================================================================

use anyhow::{Context, Result};
use chrono::Utc;
use cropsense_feeder::{
    Dispatcher, FeederConfig, HttpTransport, Reading, ReadingGenerator, TimeAxis,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // startup banner
    println!("===========================================================");
    println!("  CropSense Feeder - synthetic agronomy sensor replay");
    println!("===========================================================");

    // step 1: load configuration
    let (config, source) = match load_config() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("[ERROR] Fatal: {:#}", e);
            return Err(e);
        }
    };

    // step 2: logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &source {
        Some(path) => tracing::info!("Loaded config from {}", path.display()),
        None => tracing::info!("No config file found, using defaults"),
    }
    config.print_summary();

    // step 3: build the time axis
    let axis = TimeAxis::new(config.schedule.start_date, config.schedule.utc_offset_minutes)?;
    let mut schedule_rng = match config.generator.seed {
        // keep minute/second jitter independent of the model stream
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };
    let instants = match axis.instants(Utc::now(), &mut schedule_rng) {
        Ok(instants) => instants,
        Err(e) => {
            tracing::error!("Fatal: cannot build schedule: {}", e);
            return Err(e.into());
        }
    };

    let options = config.dispatch_options();
    let preview = options.preview;
    let dispatcher = Dispatcher::new(options);
    tracing::info!(
        "Prepared {}/{} readings from {} 00:00 local to now",
        dispatcher.planned(instants.len()),
        instants.len(),
        config.schedule.start_date
    );

    // step 4: generator and transport
    let mut generator =
        ReadingGenerator::from_seed(config.generator.seed, config.generator_settings());
    let mut transport = HttpTransport::new(
        config.target.url.clone(),
        Duration::from_secs(config.target.timeout_secs),
    )
    .context("failed to build http client")?;

    if preview {
        tracing::info!("DRY RUN: readings are generated but not submitted");
    } else {
        tracing::info!("Submitting to {} every {}ms", transport.url(), config.target.delay_ms);
    }

    // step 5: dispatch loop
    let report = dispatcher.run(&instants, &mut generator, &mut transport).await;

    if let (true, Some(path)) = (preview, config.run.preview_output.as_deref()) {
        write_preview(path, &report.previewed)
            .with_context(|| format!("failed to write preview to {}", path.display()))?;
        tracing::info!("Wrote {} preview readings to {}", report.previewed.len(), path.display());
    }

    Ok(())
}

fn load_config() -> Result<(FeederConfig, Option<std::path::PathBuf>)> {
    let (mut config, source) = FeederConfig::load_or_default()?;
    config.apply_env()?;
    Ok((config, source))
}

/// one json object per line
fn write_preview(path: &Path, readings: &[Reading]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut out = BufWriter::new(file);
    for reading in readings {
        serde_json::to_writer(&mut out, reading)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
