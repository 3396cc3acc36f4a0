//! Acquisition: pulling daily exports from the Fitbit Web API
//!
//! One authenticated GET per (metric, date), response body written verbatim
//! to the metric's directory. A failed date is logged and skipped; the run
//! continues. Requests are paced with a fixed delay because Fitbit caps
//! clients at 150 requests per hour.
//!
//! Deliberately synchronous and serial: the rate limit makes concurrency
//! pointless here.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use crate::dates::DateRange;
use crate::error::FitpulseError;
use crate::metric::Metric;

/// Default pause between requests (150 requests/hour allowed; 30 s keeps a
/// full-day heart-rate pull comfortably under the cap)
pub const DEFAULT_DELAY: Duration = Duration::from_secs(30);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Acquisition configuration: credentials, storage root, pacing
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// OAuth bearer token for the Fitbit Web API
    pub token: String,
    /// Root directory for metric subdirectories
    pub data_dir: PathBuf,
    /// Pause between consecutive requests
    pub delay: Duration,
}

impl FetchConfig {
    pub fn new(token: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            token: token.into(),
            data_dir: data_dir.into(),
            delay: DEFAULT_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Outcome of one fetch run over a date range
#[derive(Debug, Clone, Serialize)]
pub struct FetchReport {
    pub metric: Metric,
    pub saved: Vec<NaiveDate>,
    pub failed: Vec<NaiveDate>,
}

impl FetchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fitbit Web API fetcher
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FitpulseError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    fn auth_headers(&self) -> Result<HeaderMap, FitpulseError> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", self.config.token)).map_err(
            |_| FitpulseError::ConfigError("token is not a valid header value".to_string()),
        )?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// Fetch one metric for every date in the range, ascending.
    ///
    /// A non-success response or transport error for a date is logged and
    /// the date recorded as failed; the loop continues. Only local I/O
    /// failures (unwritable data directory) abort the run.
    pub fn fetch_range(
        &self,
        metric: Metric,
        range: &DateRange,
    ) -> Result<FetchReport, FitpulseError> {
        let dir = self.config.data_dir.join(metric.dir_name());
        fs::create_dir_all(&dir)?;
        let headers = self.auth_headers()?;

        let mut report = FetchReport {
            metric,
            saved: Vec::new(),
            failed: Vec::new(),
        };

        let total = range.days();
        for (i, date) in range.iter().enumerate() {
            match self.fetch_one(metric, date, &headers)? {
                Some(body) => {
                    fs::write(dir.join(metric.file_name(date)), body)?;
                    info!(metric = metric.as_str(), %date, "saved");
                    report.saved.push(date);
                }
                None => report.failed.push(date),
            }
            // Pace every request, success or not; nothing follows the last.
            if i + 1 < total {
                thread::sleep(self.config.delay);
            }
        }
        Ok(report)
    }

    /// Fetch all metrics for the range, in acquisition order
    pub fn fetch_all(&self, range: &DateRange) -> Result<Vec<FetchReport>, FitpulseError> {
        Metric::all()
            .into_iter()
            .map(|metric| self.fetch_range(metric, range))
            .collect()
    }

    /// One request. `Ok(Some(body))` on success, `Ok(None)` on a per-date
    /// failure that the run should skip past.
    fn fetch_one(
        &self,
        metric: Metric,
        date: NaiveDate,
        headers: &HeaderMap,
    ) -> Result<Option<String>, FitpulseError> {
        let url = metric.request_url(date);
        let response = match self.client.get(&url).headers(headers.clone()).send() {
            Ok(r) => r,
            Err(e) => {
                warn!(metric = metric.as_str(), %date, error = %e, "request failed, skipping date");
                return Ok(None);
            }
        };
        if !response.status().is_success() {
            warn!(
                metric = metric.as_str(),
                %date,
                status = %response.status(),
                "non-success response, skipping date"
            );
            return Ok(None);
        }
        match response.text() {
            Ok(body) => Ok(Some(body)),
            Err(e) => {
                warn!(metric = metric.as_str(), %date, error = %e, "could not read body, skipping date");
                Ok(None)
            }
        }
    }
}
