//! Concurrent load testing for the availability API.
//!
//! Workers issue GET searches until the deadline, validate every body with
//! [`validate_search_response`], and report totals and latency percentiles.

use crate::api::{validate_search_response, AvailabilityQuery, SearchResponse};
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// HTTP client for the availability endpoint
#[derive(Debug, Clone)]
pub struct AvailabilityClient {
    api_url: String,
    client: reqwest::Client,
}

/// Response with timing
#[derive(Debug, Clone)]
pub struct TimedSearch {
    /// Decoded body
    pub response: SearchResponse,
    /// Total request latency
    pub latency: Duration,
}

impl AvailabilityClient {
    /// Client for `api_url` with a per-request timeout
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> ProbeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Api {
                message: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self::with_client(api_url, client))
    }

    /// Client reusing an existing `reqwest::Client`
    pub fn with_client(api_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// API root
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Run one search and validate the body
    pub async fn search(&self, query: &AvailabilityQuery) -> ProbeResult<TimedSearch> {
        let url = format!("{}/search", self.api_url);
        let start = Instant::now();

        let resp = self
            .client
            .get(&url)
            .query(&query.to_query_pairs())
            .send()
            .await
            .map_err(|e| ProbeError::Api {
                message: format!("request to {url} failed: {e}"),
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| ProbeError::Api {
            message: format!("reading body from {url} failed: {e}"),
        })?;
        let latency = start.elapsed();

        if !status.is_success() {
            return Err(ProbeError::Api {
                message: format!("{url} returned {}", status.as_u16()),
            });
        }

        let value: serde_json::Value = serde_json::from_str(&body)?;
        let issues = validate_search_response(&value);
        if let Some(first) = issues.first() {
            return Err(ProbeError::Api {
                message: format!("invalid body ({} issue(s)), first: {first}", issues.len()),
            });
        }
        let response = serde_json::from_value(value)?;
        Ok(TimedSearch { response, latency })
    }
}

/// Configuration for a load test run
#[derive(Debug, Clone)]
pub struct LoadTestConfig {
    /// Number of concurrent workers
    pub concurrency: usize,
    /// Total duration of the run
    pub duration: Duration,
    /// Searches to cycle through
    pub queries: Vec<AvailabilityQuery>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for LoadTestConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            duration: Duration::from_secs(30),
            queries: default_queries(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// How one request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Ok,
    Failed,
}

#[derive(Debug, Clone)]
struct RequestRecord {
    latency: Duration,
    outcome: Outcome,
}

/// Pass/fail limits applied to a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Highest acceptable p95 latency
    pub max_p95_ms: f64,
    /// Highest acceptable share of failed requests (0.0 - 1.0)
    pub max_error_rate: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_p95_ms: 2000.0,
            max_error_rate: 0.01,
        }
    }
}

/// Results from a load test run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadTestResult {
    /// Identifier of this run
    pub run_id: Uuid,
    /// Total requests sent
    pub total_requests: u64,
    /// Requests that returned a valid body
    pub successful: u64,
    /// Transport, status or validation failures
    pub failed: u64,
    /// Successful requests per second
    pub throughput_rps: f64,
    /// Median latency (ms)
    pub latency_p50_ms: f64,
    /// 95th percentile latency (ms)
    pub latency_p95_ms: f64,
    /// 99th percentile latency (ms)
    pub latency_p99_ms: f64,
    /// RFC 3339 timestamp of the run
    pub timestamp: String,
    /// Total elapsed wall time (seconds)
    pub elapsed_secs: f64,
    /// Concurrency level used
    pub concurrency: usize,
}

impl LoadTestResult {
    /// Failed share of all requests
    #[must_use]
    pub fn error_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.failed as f64 / self.total_requests as f64
        }
    }

    /// Every threshold the run broke (empty = pass)
    #[must_use]
    pub fn violations(&self, thresholds: &Thresholds) -> Vec<String> {
        let mut out = Vec::new();
        if self.latency_p95_ms > thresholds.max_p95_ms {
            out.push(format!(
                "p95 latency {:.1}ms exceeds {:.1}ms",
                self.latency_p95_ms, thresholds.max_p95_ms
            ));
        }
        if self.error_rate() > thresholds.max_error_rate {
            out.push(format!(
                "error rate {:.2}% exceeds {:.2}%",
                self.error_rate() * 100.0,
                thresholds.max_error_rate * 100.0
            ));
        }
        if self.total_requests == 0 {
            out.push("no requests completed".to_string());
        }
        out
    }
}

/// Load test executor
#[derive(Debug)]
pub struct LoadTest {
    client: AvailabilityClient,
    config: LoadTestConfig,
}

impl LoadTest {
    /// Create a load test
    pub fn new(client: AvailabilityClient, config: LoadTestConfig) -> Self {
        Self { client, config }
    }

    /// Run the load test and return aggregated results
    pub async fn run(&self) -> ProbeResult<LoadTestResult> {
        if self.config.queries.is_empty() {
            return Err(ProbeError::config("load test needs at least one query"));
        }
        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            api = self.client.api_url(),
            concurrency = self.config.concurrency,
            duration_secs = self.config.duration.as_secs_f64(),
            "starting load test"
        );

        let started = Instant::now();
        let deadline = started.checked_add(self.config.duration).ok_or_else(|| {
            ProbeError::config(format!(
                "load test duration of {}s is too long",
                self.config.duration.as_secs()
            ))
        })?;
        let mut handles = Vec::new();

        for worker_id in 0..self.config.concurrency.max(1) {
            let client = self.client.clone();
            let queries = self.config.queries.clone();

            handles.push(tokio::spawn(async move {
                let mut records = Vec::new();
                let mut idx = worker_id % queries.len();

                while Instant::now() < deadline {
                    let query = &queries[idx % queries.len()];
                    let start = Instant::now();
                    let record = match client.search(query).await {
                        Ok(timed) => RequestRecord {
                            latency: timed.latency,
                            outcome: Outcome::Ok,
                        },
                        Err(e) => {
                            debug!(worker_id, error = %e, "request failed");
                            RequestRecord {
                                latency: start.elapsed(),
                                outcome: Outcome::Failed,
                            }
                        }
                    };
                    records.push(record);
                    idx += 1;
                }
                records
            }));
        }

        let mut all_records = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(records) => all_records.extend(records),
                Err(e) => warn!(error = %e, "load test worker panicked"),
            }
        }

        let result = aggregate_results(
            run_id,
            &all_records,
            started.elapsed().as_secs_f64(),
            self.config.concurrency.max(1),
        );
        info!(
            %run_id,
            total = result.total_requests,
            failed = result.failed,
            p95_ms = result.latency_p95_ms,
            "load test finished"
        );
        Ok(result)
    }
}

fn aggregate_results(
    run_id: Uuid,
    records: &[RequestRecord],
    elapsed_secs: f64,
    concurrency: usize,
) -> LoadTestResult {
    let total = records.len() as u64;
    let successful = records.iter().filter(|r| r.outcome == Outcome::Ok).count() as u64;

    let mut latencies: Vec<f64> = records
        .iter()
        .filter(|r| r.outcome == Outcome::Ok)
        .map(|r| r.latency.as_secs_f64() * 1000.0)
        .collect();
    latencies.sort_by(f64::total_cmp);

    let throughput_rps = if elapsed_secs > 0.0 {
        successful as f64 / elapsed_secs
    } else {
        0.0
    };

    LoadTestResult {
        run_id,
        total_requests: total,
        successful,
        failed: total - successful,
        throughput_rps,
        latency_p50_ms: percentile(&latencies, 0.50),
        latency_p95_ms: percentile(&latencies, 0.95),
        latency_p99_ms: percentile(&latencies, 0.99),
        timestamp: chrono::Utc::now().to_rfc3339(),
        elapsed_secs,
        concurrency,
    }
}

/// Percentile of a sorted slice; 0.0 for an empty slice
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// One-way and return trips between the three branches, a week long and
/// starting four weeks from today
fn default_queries() -> Vec<AvailabilityQuery> {
    let pickup = chrono::Utc::now().date_naive() + chrono::Days::new(28);
    let dropoff = pickup + chrono::Days::new(7);
    let (from, to) = (pickup.format("%Y-%m-%d").to_string(), dropoff.format("%Y-%m-%d").to_string());
    [
        ("Auckland", "Auckland"),
        ("Auckland", "Christchurch"),
        ("Christchurch", "Queenstown"),
        ("Queenstown", "Auckland"),
    ]
    .into_iter()
    .filter_map(|(a, b)| AvailabilityQuery::new(a, b, &from, &to).ok())
    .collect()
}
