//! ==============================================================================
//! dispatch.rs - paced replay of generated readings
//! ==============================================================================
//!
//! purpose:
//!     walks the scheduled instants in order, generates one reading per instant
//!     and either submits it through a Transport or records it (preview mode).
//!
//! guarantees:
//!     - strictly sequential: one reading is generated and submitted before the
//!       next one is generated. no concurrent in-flight requests.
//!     - readings go out in schedule order.
//!     - a failed submission is logged and counted, the loop keeps going.
//!     - a fixed delay separates consecutive submissions. no bursts, no backoff.
//!
//! relationships:
//!     - uses: generator.rs (reading per instant)
//!     - uses: Transport (HttpTransport in production, stubs in tests)
//!     - used by: main.rs
//!
//! ==============================================================================

use crate::domain::Reading;
use crate::error::TransportError;
use crate::generator::ReadingGenerator;
use crate::schedule::ScheduledInstant;

use rand::Rng;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// live mode logs every Nth submission
const LIVE_LOG_EVERY: usize = 50;
/// preview mode logs the first few readings and every Nth after that
const PREVIEW_LOG_FIRST: usize = 3;
const PREVIEW_LOG_EVERY: usize = 200;

// ==============================================================================
// transport boundary
// ==============================================================================

/// the single network primitive the feeder needs
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// submit one reading; the status code on success
    async fn submit(&mut self, reading: &Reading) -> Result<u16, TransportError>;
}

/// POSTs each reading as JSON to the collector
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for HttpTransport {
    async fn submit(&mut self, reading: &Reading) -> Result<u16, TransportError> {
        let body = serde_json::to_vec(reading)?;
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(status.as_u16())
    }
}

// ==============================================================================
// driver
// ==============================================================================

#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// pause between consecutive submissions
    pub delay: Duration,
    /// stop after this many readings
    pub max_submissions: Option<usize>,
    /// generate readings without submitting them
    pub preview: bool,
    /// keep preview readings in the report
    pub record: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(250),
            max_submissions: None,
            preview: false,
            record: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct DispatchReport {
    pub succeeded: usize,
    pub failed: usize,
    /// preview readings in schedule order, only kept when recording
    pub previewed: Vec<Reading>,
}

impl DispatchReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

pub struct Dispatcher {
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(options: DispatchOptions) -> Self {
        Self { options }
    }

    /// how many of `available` instants this run will process
    pub fn planned(&self, available: usize) -> usize {
        self.options
            .max_submissions
            .map_or(available, |cap| cap.min(available))
    }

    pub async fn run<R: Rng, T: Transport>(
        &self,
        instants: &[ScheduledInstant],
        generator: &mut ReadingGenerator<R>,
        transport: &mut T,
    ) -> DispatchReport {
        let total = self.planned(instants.len());
        let mut report = DispatchReport::default();

        for (i, instant) in instants.iter().take(total).enumerate() {
            let reading = generator.next_reading(instant);

            if self.options.preview {
                if i < PREVIEW_LOG_FIRST || i % PREVIEW_LOG_EVERY == 0 {
                    let n = i + 1;
                    match serde_json::to_string(&reading) {
                        Ok(json) => tracing::info!("[PREVIEW {}/{}] {}", n, total, json),
                        Err(e) => tracing::warn!("[PREVIEW {}/{}] unprintable: {}", n, total, e),
                    }
                }
                report.succeeded += 1;
                if self.options.record {
                    report.previewed.push(reading);
                }
                continue;
            }

            if i > 0 && !self.options.delay.is_zero() {
                tokio::time::sleep(self.options.delay).await;
            }

            match transport.submit(&reading).await {
                Ok(status) => {
                    report.succeeded += 1;
                    if i % LIVE_LOG_EVERY == 0 {
                        tracing::info!(
                            "[{}/{}] Posted time={} -> status={}",
                            i + 1,
                            total,
                            reading.time.to_rfc3339(),
                            status
                        );
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        "[{}/{}] Error posting time={}: {}",
                        i + 1,
                        total,
                        reading.time.to_rfc3339(),
                        e
                    );
                }
            }
        }

        tracing::info!("Done. Success={}, Failed={}.", report.succeeded, report.failed);
        report
    }
}
