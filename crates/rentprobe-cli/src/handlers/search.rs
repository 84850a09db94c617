//! Search command handler

use crate::commands::{SearchArgs, SearchFormat};
use crate::config::CliConfig;
use crate::error::CliResult;
use chrono::{Days, NaiveDate};
use rentprobe::{AvailabilityQuery, CalendarTarget, PassengerCount, PassengerLimits};
use tracing::debug;

const DEFAULT_LEAD_DAYS: u64 = 28;
const DEFAULT_TRIP_DAYS: u64 = 7;

/// Free-text trip as typed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trip<'a> {
    /// Pickup location
    pub pickup: &'a str,
    /// Drop-off location, `None` for a return to the pickup
    pub dropoff: Option<&'a str>,
    /// Pickup date, `YYYY-MM-DD`
    pub from: &'a str,
    /// Drop-off date, `YYYY-MM-DD`
    pub to: &'a str,
    /// Travelling party
    pub passengers: PassengerCount,
    /// Driver's licence country
    pub licence: Option<&'a str>,
}

impl<'a> From<&'a SearchArgs> for Trip<'a> {
    fn from(args: &'a SearchArgs) -> Self {
        Self {
            pickup: &args.pickup,
            dropoff: args.dropoff.as_deref(),
            from: &args.from,
            to: &args.to,
            passengers: PassengerCount::new(args.adults, args.children),
            licence: args.licence.as_deref(),
        }
    }
}

/// Fill missing trip dates: pickup four weeks after `today`, drop-off a week
/// after pickup.
///
/// An unparseable pickup date is passed through so the query builder reports it.
#[must_use]
pub fn trip_dates(from: Option<&str>, to: Option<&str>, today: NaiveDate) -> (String, String) {
    let iso = |d: NaiveDate| d.format("%Y-%m-%d").to_string();
    let from = from.map_or_else(|| iso(today + Days::new(DEFAULT_LEAD_DAYS)), String::from);
    let to = to.map_or_else(
        || {
            CalendarTarget::parse(&from)
                .map(|t| iso(t.date() + Days::new(DEFAULT_TRIP_DAYS)))
                .unwrap_or_else(|_| from.clone())
        },
        String::from,
    );
    (from, to)
}

/// Build the availability query the form would submit for `trip`.
///
/// Locations and the licence country go through the same normalizer as the
/// page object; the drop-off defaults to the pickup location.
pub fn build_query(trip: &Trip<'_>, limits: &PassengerLimits) -> CliResult<AvailabilityQuery> {
    let dropoff = trip.dropoff.unwrap_or(trip.pickup);
    limits.validate(trip.passengers)?;

    let mut query =
        AvailabilityQuery::new(trip.pickup, dropoff, trip.from, trip.to)?.with_passengers(trip.passengers);
    if let Some(licence) = trip.licence {
        query = query.with_licence_country(licence)?;
    }
    debug!(
        pickup = %query.pick_up_location,
        dropoff = %query.drop_off_location,
        from = %query.pick_up_date,
        to = %query.drop_off_date,
        "availability query built"
    );
    Ok(query)
}

/// Execute the search command
pub fn execute_search(config: &CliConfig, args: &SearchArgs) -> CliResult<()> {
    let suite = config.suite()?;
    let query = build_query(&Trip::from(args), &suite.passengers)?;
    let api_url = args.api_url.as_deref().unwrap_or(&suite.api_url);

    match args.format {
        SearchFormat::Url => println!("{}", query.url(api_url)),
        SearchFormat::Json => println!("{}", serde_json::to_string_pretty(&query)?),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(pickup: &str, dropoff: Option<&str>) -> SearchArgs {
        SearchArgs {
            pickup: pickup.to_string(),
            dropoff: dropoff.map(String::from),
            from: "2026-11-12".to_string(),
            to: "2026-11-20".to_string(),
            adults: 2,
            children: 1,
            licence: Some("uk".to_string()),
            api_url: None,
            format: SearchFormat::Url,
        }
    }

    #[test]
    fn test_build_query_normalizes() {
        let query = build_query(&Trip::from(&args("auckland", Some("QueensTown"))), &PassengerLimits::default()).unwrap();
        assert_eq!(query.pick_up_location, "AKL");
        assert_eq!(query.drop_off_location, "ZQN");
        assert_eq!(query.drivers_licence_country, "GB");
        assert_eq!((query.adults, query.children), (2, 1));
    }

    #[test]
    fn test_dropoff_defaults_to_pickup() {
        let query = build_query(&Trip::from(&args("Christchurch", None)), &PassengerLimits::default()).unwrap();
        assert_eq!(query.drop_off_location, "CHC");
    }

    #[test]
    fn test_passenger_limits_apply() {
        let mut a = args("Auckland", None);
        a.adults = 0;
        assert!(build_query(&Trip::from(&a), &PassengerLimits::default()).is_err());
    }

    #[test]
    fn test_trip_dates_default_relative_to_today() {
        let today = NaiveDate::from_ymd_opt(2026, 12, 20).unwrap();
        let (from, to) = trip_dates(None, None, today);
        assert_eq!((from.as_str(), to.as_str()), ("2027-01-17", "2027-01-24"));

        let (from, to) = trip_dates(Some("2027-03-01"), None, today);
        assert_eq!((from.as_str(), to.as_str()), ("2027-03-01", "2027-03-08"));

        let (_, to) = trip_dates(Some("soon"), None, today);
        assert_eq!(to, "soon");
    }
}
