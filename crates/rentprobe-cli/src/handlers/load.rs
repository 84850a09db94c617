//! Load command handler

use crate::commands::LoadArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::handlers::search::{build_query, trip_dates, Trip};
use crate::output::Reporter;
use chrono::NaiveDate;
use rentprobe::{AvailabilityQuery, PassengerCount, PassengerLimits};
use std::time::Duration;

/// Parse a run length such as `30s`, `2m`, `1h` or bare seconds
pub fn parse_duration(s: &str) -> CliResult<Duration> {
    let s = s.trim();
    let invalid = || CliError::invalid_argument(format!("invalid duration {s:?}, use 30s, 2m or 1h"));
    let (digits, scale) = if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else {
        (s, 1)
    };
    let n: u64 = digits.parse().map_err(|_| invalid())?;
    if n == 0 {
        return Err(invalid());
    }
    let secs = n.checked_mul(scale).ok_or_else(invalid)?;
    Ok(Duration::from_secs(secs))
}

/// The search every worker sends, with missing dates relative to `today`
pub fn load_query(args: &LoadArgs, limits: &PassengerLimits, today: NaiveDate) -> CliResult<AvailabilityQuery> {
    let (from, to) = trip_dates(args.from.as_deref(), args.to.as_deref(), today);
    let trip = Trip {
        pickup: &args.pickup,
        dropoff: args.dropoff.as_deref(),
        from: &from,
        to: &to,
        passengers: PassengerCount::new(args.adults, args.children),
        licence: args.licence.as_deref(),
    };
    build_query(&trip, limits)
}

/// Execute the load command
#[cfg(feature = "load")]
pub async fn execute_load(config: &CliConfig, args: &LoadArgs, reporter: &Reporter) -> CliResult<()> {
    use crate::commands::LoadOutputFormat;
    use rentprobe::{AvailabilityClient, LoadTest, LoadTestConfig, Thresholds};

    let suite = config.suite()?;
    let api_url = args.api_url.clone().unwrap_or(suite.api_url);
    let duration = parse_duration(&args.duration)?;
    if args.concurrency == 0 {
        return Err(CliError::invalid_argument("--concurrency must be at least 1"));
    }
    let query = load_query(args, &suite.passengers, chrono::Utc::now().date_naive())?;
    let request_timeout = Duration::from_millis(args.request_timeout_ms);

    reporter.header("Availability load test");
    reporter.info(&format!(
        "{api_url} with {} worker(s) for {}s",
        args.concurrency,
        duration.as_secs()
    ));
    reporter.info(&format!(
        "{} to {}, {} to {}",
        query.pick_up_location, query.drop_off_location, query.pick_up_date, query.drop_off_date
    ));

    let client = AvailabilityClient::new(api_url, request_timeout)?;
    let test_config = LoadTestConfig {
        concurrency: args.concurrency,
        duration,
        queries: vec![query],
        request_timeout,
    };
    let result = LoadTest::new(client, test_config).run().await?;
    tracing::debug!(run_id = %result.run_id, total = result.total_requests, "load run complete");

    match args.format {
        LoadOutputFormat::Text => {
            println!("Run:          {}", result.run_id);
            println!("Requests:     {} ({} ok, {} failed)", result.total_requests, result.successful, result.failed);
            println!("Throughput:   {:.1} req/s", result.throughput_rps);
            println!(
                "Latency:      p50 {:.1}ms  p95 {:.1}ms  p99 {:.1}ms",
                result.latency_p50_ms, result.latency_p95_ms, result.latency_p99_ms
            );
            println!("Error rate:   {:.2}%", result.error_rate() * 100.0);
        }
        LoadOutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    if let Some(ref path) = args.output {
        std::fs::write(path, serde_json::to_string_pretty(&result)?)?;
        reporter.info(&format!("result written to {}", path.display()));
    }

    let thresholds = Thresholds {
        max_p95_ms: args.max_p95_ms,
        max_error_rate: args.max_error_rate,
    };
    let violations = result.violations(&thresholds);
    if violations.is_empty() {
        reporter.success("all thresholds met");
        Ok(())
    } else {
        for v in &violations {
            reporter.failure(v);
        }
        Err(CliError::ThresholdsViolated { violations })
    }
}

/// Execute the load command
#[cfg(not(feature = "load"))]
#[allow(clippy::unused_async)]
pub async fn execute_load(config: &CliConfig, args: &LoadArgs, _reporter: &Reporter) -> CliResult<()> {
    parse_duration(&args.duration)?;
    load_query(args, &config.suite()?.passengers, chrono::Utc::now().date_naive())?;
    Err(CliError::FeatureDisabled { feature: "load" })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod duration_tests {
        use super::*;

        #[test]
        fn test_suffixes() {
            assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
            assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
            assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
            assert_eq!(parse_duration(" 45 ").unwrap(), Duration::from_secs(45));
        }

        #[test]
        fn test_rejects_garbage_and_zero() {
            assert!(parse_duration("soon").is_err());
            assert!(parse_duration("0s").is_err());
            assert!(parse_duration("-5s").is_err());
        }

        #[test]
        fn test_rejects_overflowing_values() {
            assert!(parse_duration("6000000000000000h").is_err());
            assert!(parse_duration("400000000000000000m").is_err());
            assert_eq!(
                parse_duration(&format!("{}s", u64::MAX)).unwrap(),
                Duration::from_secs(u64::MAX)
            );
        }
    }

    mod query_tests {
        use super::*;
        use crate::commands::LoadOutputFormat;

        fn args() -> LoadArgs {
            LoadArgs {
                api_url: None,
                pickup: "Auckland".to_string(),
                dropoff: None,
                from: None,
                to: None,
                adults: 1,
                children: 0,
                licence: None,
                concurrency: 1,
                duration: "1s".to_string(),
                request_timeout_ms: 200,
                max_p95_ms: 2000.0,
                max_error_rate: 0.01,
                format: LoadOutputFormat::Json,
                output: None,
            }
        }

        fn today() -> NaiveDate {
            NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
        }

        #[test]
        fn test_query_from_args() {
            let mut a = args();
            a.pickup = "christchurch".to_string();
            a.dropoff = Some("QUEENSTOWN".to_string());
            a.from = Some("2027-01-05".to_string());
            a.to = Some("2027-01-19".to_string());
            a.adults = 2;
            a.children = 2;
            a.licence = Some("uk".to_string());

            let query = load_query(&a, &PassengerLimits::default(), today()).unwrap();
            assert_eq!(query.pick_up_location, "CHC");
            assert_eq!(query.drop_off_location, "ZQN");
            assert_eq!(query.pick_up_date, "2027-01-05");
            assert_eq!(query.drop_off_date, "2027-01-19");
            assert_eq!((query.adults, query.children), (2, 2));
            assert_eq!(query.drivers_licence_country, "GB");
        }

        #[test]
        fn test_default_dates_follow_today() {
            let query = load_query(&args(), &PassengerLimits::default(), today()).unwrap();
            assert_eq!(query.pick_up_location, "AKL");
            assert_eq!(query.drop_off_location, "AKL");
            assert_eq!(query.pick_up_date, "2026-11-11");
            assert_eq!(query.drop_off_date, "2026-11-18");
        }

        #[test]
        fn test_bad_trip_is_rejected() {
            let mut a = args();
            a.pickup = "Wellington".to_string();
            assert!(load_query(&a, &PassengerLimits::default(), today()).is_err());

            let mut a = args();
            a.from = Some("2027-01-19".to_string());
            a.to = Some("2027-01-05".to_string());
            assert!(load_query(&a, &PassengerLimits::default(), today()).is_err());
        }
    }

    #[cfg(feature = "load")]
    mod run_tests {
        use super::*;
        use crate::commands::LoadOutputFormat;

        #[tokio::test]
        async fn test_unreachable_api_breaks_thresholds() {
            let args = LoadArgs {
                api_url: Some("http://127.0.0.1:9".to_string()),
                pickup: "Queenstown".to_string(),
                dropoff: None,
                from: None,
                to: None,
                adults: 1,
                children: 0,
                licence: None,
                concurrency: 1,
                duration: "1s".to_string(),
                request_timeout_ms: 200,
                max_p95_ms: 2000.0,
                max_error_rate: 0.01,
                format: LoadOutputFormat::Json,
                output: None,
            };
            let err = execute_load(&CliConfig::new(), &args, &Reporter::new(false, true))
                .await
                .unwrap_err();
            assert!(matches!(err, CliError::ThresholdsViolated { .. }));
        }
    }
}
