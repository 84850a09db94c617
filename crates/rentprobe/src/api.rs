//! Availability API model.
//!
//! The search form submits the same fields the availability endpoint accepts
//! as query parameters. Responses are checked structurally by
//! [`validate_search_response`] before being decoded, so a load test can count
//! malformed bodies instead of aborting on the first one.

use crate::calendar::CalendarTarget;
use crate::domain::{normalize, COUNTRIES, LOCATIONS};
use crate::passengers::PassengerCount;
use crate::result::{ProbeError, ProbeResult};
use crate::selection::SelectionState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Licence country assumed when a selection does not name one
pub const DEFAULT_LICENCE_COUNTRY: &str = "NZ";

/// Query parameters of one availability search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    /// Pickup location code (e.g. "AKL")
    pub pick_up_location: String,
    /// Drop-off location code
    pub drop_off_location: String,
    /// Pickup date, `YYYY-MM-DD`
    pub pick_up_date: String,
    /// Drop-off date, `YYYY-MM-DD`
    pub drop_off_date: String,
    /// Number of adults
    pub adults: u8,
    /// Number of children
    pub children: u8,
    /// Licence country code (ISO 3166 alpha-2)
    pub drivers_licence_country: String,
}

impl AvailabilityQuery {
    /// Build a query from free-text locations and `YYYY-MM-DD` dates.
    ///
    /// Inputs go through the same normalizer and date grammar as the page
    /// object. Passengers default to one adult, the licence country to NZ.
    pub fn new(pickup: &str, dropoff: &str, pickup_date: &str, dropoff_date: &str) -> ProbeResult<Self> {
        let start = CalendarTarget::parse(pickup_date)?;
        let end = CalendarTarget::parse(dropoff_date)?;
        if end < start {
            return Err(ProbeError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        let passengers = PassengerCount::default();
        Ok(Self {
            pick_up_location: normalize(pickup, &LOCATIONS)?.code.to_string(),
            drop_off_location: normalize(dropoff, &LOCATIONS)?.code.to_string(),
            pick_up_date: start.to_string(),
            drop_off_date: end.to_string(),
            adults: passengers.adults,
            children: passengers.children,
            drivers_licence_country: DEFAULT_LICENCE_COUNTRY.to_string(),
        })
    }

    /// Query equivalent to what a page has selected so far.
    ///
    /// Pickup, drop-off and dates are required.
    pub fn from_selection(state: &SelectionState) -> ProbeResult<Self> {
        let missing = |what: &str| ProbeError::Api {
            message: format!("selection has no {what}"),
        };
        let pickup = state.pickup_location.ok_or_else(|| missing("pickup location"))?;
        let dropoff = state.dropoff_location.ok_or_else(|| missing("drop-off location"))?;
        let (start, end) = state.dates.ok_or_else(|| missing("dates"))?;

        let mut query = Self::new(pickup, dropoff, &start.to_string(), &end.to_string())?;
        if let Some(p) = state.passengers {
            query = query.with_passengers(p);
        }
        if let Some(country) = state.licence_country {
            query = query.with_licence_country(country)?;
        }
        Ok(query)
    }

    /// Set the passenger counts
    #[must_use]
    pub const fn with_passengers(mut self, passengers: PassengerCount) -> Self {
        self.adults = passengers.adults;
        self.children = passengers.children;
        self
    }

    /// Set the licence country from free text ("nz", "United Kingdom", ...)
    pub fn with_licence_country(mut self, raw: &str) -> ProbeResult<Self> {
        self.drivers_licence_country = normalize(raw, &COUNTRIES)?.code.to_string();
        Ok(self)
    }

    /// Parameters in the order the endpoint documents them
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("pickUpLocation", self.pick_up_location.clone()),
            ("dropOffLocation", self.drop_off_location.clone()),
            ("pickUpDate", self.pick_up_date.clone()),
            ("dropOffDate", self.drop_off_date.clone()),
            ("adults", self.adults.to_string()),
            ("children", self.children.to_string()),
            ("driversLicenceCountry", self.drivers_licence_country.clone()),
        ]
    }

    /// Full request URL below `api_url`.
    ///
    /// Every value is a code, a date or a number, so no escaping is needed.
    #[must_use]
    pub fn url(&self, api_url: &str) -> String {
        let query = self
            .to_query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}/search?{query}", api_url.trim_end_matches('/'))
    }
}

/// Body of a successful availability search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Matching vehicles
    pub results: Vec<SearchResult>,
    /// Total matches across all pages
    pub total: u64,
}

/// One available vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// What is being rented
    pub product: Product,
    /// What it costs
    pub pricing: Pricing,
    /// Booking details echoed back
    pub details: Details,
}

/// Vehicle product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product code
    pub code: String,
    /// Display name
    pub name: String,
    /// Vehicle class ("campervan", "car", ...)
    #[serde(default)]
    pub category: String,
}

/// Price breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    /// ISO 4217 currency code
    pub currency: String,
    /// Price per day
    pub daily_rate: f64,
    /// Price for the whole rental
    pub total: f64,
}

/// Booking details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    /// Pickup location code
    pub pick_up_location: String,
    /// Drop-off location code
    pub drop_off_location: String,
    /// Seat count
    #[serde(default)]
    pub seats: u8,
}

/// Decode a response body after validating it
pub fn parse_search_response(body: &str) -> ProbeResult<SearchResponse> {
    let value: Value = serde_json::from_str(body)?;
    let issues = validate_search_response(&value);
    if let Some(first) = issues.first() {
        return Err(ProbeError::Api {
            message: format!("{} validation issue(s), first: {first}", issues.len()),
        });
    }
    Ok(serde_json::from_value(value)?)
}

/// A structural problem in a response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// JSON path of the offending value, e.g. `results[2].pricing.total`
    pub path: String,
    /// What is wrong
    pub message: String,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every structural problem in an availability response (empty = valid)
#[must_use]
pub fn validate_search_response(body: &Value) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let Some(root) = body.as_object() else {
        issues.push(ValidationIssue::new("$", "expected an object"));
        return issues;
    };

    let results = match root.get("results") {
        Some(Value::Array(items)) => Some(items),
        Some(_) => {
            issues.push(ValidationIssue::new("results", "expected an array"));
            None
        }
        None => {
            issues.push(ValidationIssue::new("results", "missing"));
            None
        }
    };

    match root.get("total").map(Value::as_u64) {
        Some(Some(total)) => {
            if let Some(items) = results {
                if (total as usize) < items.len() {
                    issues.push(ValidationIssue::new(
                        "total",
                        format!("{total} is less than the {} results returned", items.len()),
                    ));
                }
            }
        }
        Some(None) => issues.push(ValidationIssue::new("total", "expected a non-negative integer")),
        None => issues.push(ValidationIssue::new("total", "missing")),
    }

    for (i, item) in results.into_iter().flatten().enumerate() {
        validate_result(&format!("results[{i}]"), item, &mut issues);
    }
    issues
}

fn validate_result(path: &str, item: &Value, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = item.as_object() else {
        issues.push(ValidationIssue::new(path, "expected an object"));
        return;
    };

    match obj.get("product").and_then(Value::as_object) {
        Some(product) => {
            for key in ["code", "name"] {
                require_text(&format!("{path}.product.{key}"), product.get(key), issues);
            }
        }
        None => issues.push(ValidationIssue::new(format!("{path}.product"), "missing or not an object")),
    }

    match obj.get("pricing").and_then(Value::as_object) {
        Some(pricing) => {
            let currency = format!("{path}.pricing.currency");
            match pricing.get("currency").and_then(Value::as_str) {
                Some(c) if c.len() == 3 && c.chars().all(|ch| ch.is_ascii_uppercase()) => {}
                Some(c) => issues.push(ValidationIssue::new(currency, format!("{c:?} is not a currency code"))),
                None => issues.push(ValidationIssue::new(currency, "missing or not a string")),
            }
            for key in ["dailyRate", "total"] {
                let p = format!("{path}.pricing.{key}");
                match pricing.get(key).and_then(Value::as_f64) {
                    Some(n) if n >= 0.0 => {}
                    Some(n) => issues.push(ValidationIssue::new(p, format!("{n} is negative"))),
                    None => issues.push(ValidationIssue::new(p, "missing or not a number")),
                }
            }
        }
        None => issues.push(ValidationIssue::new(format!("{path}.pricing"), "missing or not an object")),
    }

    match obj.get("details").and_then(Value::as_object) {
        Some(details) => {
            for key in ["pickUpLocation", "dropOffLocation"] {
                let p = format!("{path}.details.{key}");
                match details.get(key).and_then(Value::as_str) {
                    Some(code) if LOCATIONS.lookup_code(code).is_some() => {}
                    Some(code) => issues.push(ValidationIssue::new(p, format!("unknown location code {code:?}"))),
                    None => issues.push(ValidationIssue::new(p, "missing or not a string")),
                }
            }
        }
        None => issues.push(ValidationIssue::new(format!("{path}.details"), "missing or not an object")),
    }
}

fn require_text(path: &str, value: Option<&Value>, issues: &mut Vec<ValidationIssue>) {
    match value.and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => {}
        Some(_) => issues.push(ValidationIssue::new(path, "empty")),
        None => issues.push(ValidationIssue::new(path, "missing or not a string")),
    }
}
