//! In-memory model of the booking widget.
//!
//! [`MockBookingSite`] renders its current state into a flat list of virtual
//! elements on every query and resolves [`Selector`]s against that list, so the
//! interaction layer can be exercised without a browser. It models:
//!
//! - pickup and drop-off panels with a filtered "Locations" listbox
//! - a two-month calendar that only moves forward
//! - the passenger stepper popover with clamped counters
//! - the licence country combobox and its "Countries" listbox
//! - the search button and results landmark
//!
//! Only one popover is open at a time. Trigger labels are padded with
//! whitespace the way the real site renders them.
//!
//! CSS selectors are limited to a single `.class`.

use crate::calendar::{CalendarMonth, CalendarTarget};
use crate::domain::{COUNTRIES, LOCATIONS};
use crate::driver::PageDriver;
use crate::locator::{Role, Selector};
use crate::passengers::{PassengerCount, PassengerKind, PassengerLimits, Step};
use crate::result::{ProbeError, ProbeResult};
use crate::site::SiteContract;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

/// Months the calendar renders side by side
pub const VISIBLE_MONTHS: usize = 2;

/// Mutating call recorded by [`MockBookingSite`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `navigate(url)`
    Navigate(String),
    /// `click(selector)`, selector in display form
    Click(String),
    /// `fill(selector, text)`, selector in display form
    Fill(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Popover {
    Pickup,
    Dropoff,
    Calendar,
    Passengers,
    Countries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocationField {
    Pickup,
    Dropoff,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Inert,
    Open(Popover),
    ChooseLocation(LocationField, usize),
    NextMonth,
    Day(NaiveDate),
    Stepper(PassengerKind, Step),
    ChooseCountry(usize),
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputField {
    LocationQuery,
    Country,
}

#[derive(Debug, Clone)]
struct MockElement {
    role: Option<Role>,
    name: String,
    text: String,
    value: String,
    class: Option<String>,
    test_id: Option<String>,
    parent: Option<usize>,
    action: Action,
    input: Option<InputField>,
}

impl MockElement {
    fn new(role: Option<Role>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            role,
            text: name.clone(),
            name,
            value: String::new(),
            class: None,
            test_id: None,
            parent: None,
            action: Action::Inert,
            input: None,
        }
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Class taken from a `.class` selector
    fn class_from(mut self, css: &str) -> Self {
        self.class = css.trim().strip_prefix('.').map(String::from);
        self
    }

    fn test_id(mut self, id: &str) -> Self {
        self.test_id = Some(id.to_string());
        self
    }

    const fn parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    const fn input(mut self, input: InputField) -> Self {
        self.input = Some(input);
        self
    }
}

/// Simulated booking site implementing [`PageDriver`]
#[derive(Debug, Clone)]
pub struct MockBookingSite {
    site: SiteContract,
    locations: Vec<String>,
    countries: Vec<String>,
    limits: PassengerLimits,
    calendar_start: CalendarMonth,
    broken_locations: bool,
    broken_calendar: bool,
    broken_passengers: bool,
    stuck_next_month: bool,
    hidden_days: Vec<NaiveDate>,
    url: String,
    open: Option<Popover>,
    location_query: String,
    pickup: Option<String>,
    dropoff: Option<String>,
    month_offset: u32,
    pending_start: Option<NaiveDate>,
    range: Option<(NaiveDate, NaiveDate)>,
    passengers: PassengerCount,
    country_value: String,
    searched: bool,
    last_clicked_option: Option<usize>,
    history: Vec<MockCall>,
}

impl Default for MockBookingSite {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBookingSite {
    /// Site with the built-in locations and countries, calendar opening on
    /// the current month
    #[must_use]
    pub fn new() -> Self {
        Self {
            site: SiteContract::default(),
            locations: LOCATIONS.canonical_names().into_iter().map(String::from).collect(),
            countries: COUNTRIES.canonical_names().into_iter().map(String::from).collect(),
            limits: PassengerLimits::default(),
            calendar_start: CalendarMonth::of(Utc::now().date_naive()),
            broken_locations: false,
            broken_calendar: false,
            broken_passengers: false,
            stuck_next_month: false,
            hidden_days: Vec::new(),
            url: "about:blank".to_string(),
            open: None,
            location_query: String::new(),
            pickup: None,
            dropoff: None,
            month_offset: 0,
            pending_start: None,
            range: None,
            passengers: PassengerCount::default(),
            country_value: String::new(),
            searched: false,
            last_clicked_option: None,
            history: Vec::new(),
        }
    }

    /// Render with a different DOM contract
    #[must_use]
    pub fn with_site(mut self, site: SiteContract) -> Self {
        self.site = site;
        self
    }

    /// Replace the location options, in document order
    #[must_use]
    pub fn with_locations(mut self, locations: &[&str]) -> Self {
        self.locations = locations.iter().map(ToString::to_string).collect();
        self
    }

    /// Replace the licence country options, in document order
    #[must_use]
    pub fn with_countries(mut self, countries: &[&str]) -> Self {
        self.countries = countries.iter().map(ToString::to_string).collect();
        self
    }

    /// Counter limits enforced by the stepper buttons
    #[must_use]
    pub const fn with_passenger_limits(mut self, limits: PassengerLimits) -> Self {
        self.limits = limits;
        self
    }

    /// First month shown when the calendar opens
    #[must_use]
    pub const fn with_calendar_start(mut self, month: CalendarMonth) -> Self {
        self.calendar_start = month;
        self
    }

    /// Location triggers stop opening their panels
    #[must_use]
    pub const fn with_broken_location_panels(mut self) -> Self {
        self.broken_locations = true;
        self
    }

    /// Dates trigger stops opening the calendar
    #[must_use]
    pub const fn with_broken_calendar(mut self) -> Self {
        self.broken_calendar = true;
        self
    }

    /// Passengers trigger stops opening the popover
    #[must_use]
    pub const fn with_broken_passengers(mut self) -> Self {
        self.broken_passengers = true;
        self
    }

    /// Leave `date` out of its month panel, as a site does for blocked days
    #[must_use]
    pub fn with_hidden_day(mut self, date: NaiveDate) -> Self {
        self.hidden_days.push(date);
        self
    }

    /// Next-month button accepts clicks but the calendar stays put
    #[must_use]
    pub const fn with_stuck_next_month(mut self) -> Self {
        self.stuck_next_month = true;
        self
    }

    /// Mutating calls so far
    #[must_use]
    pub fn history(&self) -> &[MockCall] {
        &self.history
    }

    /// Forget recorded calls
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Number of recorded clicks on exactly `selector`
    #[must_use]
    pub fn clicks_on(&self, selector: &Selector) -> usize {
        let key = selector.to_string();
        self.history
            .iter()
            .filter(|c| matches!(c, MockCall::Click(s) if *s == key))
            .count()
    }

    /// Position in the option list of the last option clicked
    #[must_use]
    pub const fn last_clicked_option_index(&self) -> Option<usize> {
        self.last_clicked_option
    }

    /// Pickup location shown on the trigger
    #[must_use]
    pub fn pickup(&self) -> Option<&str> {
        self.pickup.as_deref()
    }

    /// Drop-off location shown on the trigger
    #[must_use]
    pub fn dropoff(&self) -> Option<&str> {
        self.dropoff.as_deref()
    }

    /// Completed date range
    #[must_use]
    pub fn selected_range(&self) -> Option<(CalendarTarget, CalendarTarget)> {
        self.range
            .map(|(a, b)| (CalendarTarget::from_date(a), CalendarTarget::from_date(b)))
    }

    /// Current counter values
    #[must_use]
    pub const fn passengers(&self) -> PassengerCount {
        self.passengers
    }

    /// Current combobox value
    #[must_use]
    pub fn licence_country(&self) -> &str {
        &self.country_value
    }

    /// Whether the search button has been clicked since the last navigation
    #[must_use]
    pub const fn searched(&self) -> bool {
        self.searched
    }

    fn visible_window(&self) -> Vec<CalendarMonth> {
        let mut month = self.calendar_start;
        for _ in 0..self.month_offset {
            month = month.succ();
        }
        let mut months = Vec::with_capacity(VISIBLE_MONTHS);
        for _ in 0..VISIBLE_MONTHS {
            months.push(month);
            month = month.succ();
        }
        months
    }

    fn dates_label(&self) -> String {
        let fmt = |d: NaiveDate| d.format("%-d %b %Y").to_string();
        match (self.range, self.pending_start) {
            (_, Some(start)) => format!("{} - ", fmt(start)),
            (Some((a, b)), None) => format!("{} - {}", fmt(a), fmt(b)),
            (None, None) => "Select dates".to_string(),
        }
    }

    /// Render the current state in document order
    fn render(&self) -> Vec<MockElement> {
        let site = &self.site;
        let mut els: Vec<MockElement> = Vec::new();
        let pad = |s: &str| format!("\n      {s}\n    ");

        for field in [LocationField::Pickup, LocationField::Dropoff] {
            let (trigger, input, label, popover) = match field {
                LocationField::Pickup => {
                    (&site.pickup_trigger, &site.pickup_input, &self.pickup, Popover::Pickup)
                }
                LocationField::Dropoff => {
                    (&site.dropoff_trigger, &site.dropoff_input, &self.dropoff, Popover::Dropoff)
                }
            };
            els.push(
                MockElement::new(Some(Role::Button), trigger.as_str())
                    .text(pad(label.as_deref().unwrap_or("Select location")))
                    .action(Action::Open(popover)),
            );
            if self.open == Some(popover) {
                els.push(
                    MockElement::new(Some(Role::TextBox), input.as_str())
                        .text("")
                        .value(self.location_query.clone())
                        .input(InputField::LocationQuery),
                );
                let list = els.len();
                els.push(MockElement::new(Some(Role::ListBox), site.location_listbox.as_str()).text(""));
                let query = self.location_query.trim().to_lowercase();
                for (i, name) in self.locations.iter().enumerate() {
                    if name.to_lowercase().contains(&query) {
                        els.push(
                            MockElement::new(Some(Role::Option), name.as_str())
                                .parent(list)
                                .action(Action::ChooseLocation(field, i)),
                        );
                    }
                }
            }
        }

        els.push(
            MockElement::new(Some(Role::Button), site.dates_trigger.as_str())
                .text(pad(&self.dates_label()))
                .action(Action::Open(Popover::Calendar)),
        );
        if self.open == Some(Popover::Calendar) {
            let dialog = els.len();
            els.push(MockElement::new(Some(Role::Dialog), "Choose dates").text(""));
            for month in self.visible_window() {
                let label = month.label();
                let panel = els.len();
                els.push(
                    MockElement::new(Some(Role::Grid), label.as_str())
                        .text("")
                        .parent(dialog),
                );
                els.push(
                    MockElement::new(None, label.as_str())
                        .text(pad(&label))
                        .class_from(&site.month_label_css)
                        .parent(panel),
                );
                for day in 1..=month.days() {
                    if let Some(date) = NaiveDate::from_ymd_opt(month.year(), month.month(), day)
                        .filter(|d| !self.hidden_days.contains(d))
                    {
                        els.push(
                            MockElement::new(Some(Role::Button), day.to_string())
                                .parent(panel)
                                .action(Action::Day(date)),
                        );
                    }
                }
            }
            els.push(
                MockElement::new(Some(Role::Button), site.next_month.as_str())
                    .text("›")
                    .parent(dialog)
                    .action(Action::NextMonth),
            );
        }

        els.push(
            MockElement::new(Some(Role::Button), site.passengers_trigger.as_str())
                .text(pad(&self.passengers.to_string()))
                .action(Action::Open(Popover::Passengers)),
        );
        if self.open == Some(Popover::Passengers) {
            let dialog = els.len();
            els.push(MockElement::new(Some(Role::Dialog), "Passengers").text(""));
            for kind in [PassengerKind::Adults, PassengerKind::Children] {
                let id = match kind {
                    PassengerKind::Adults => &site.adult_count_test_id,
                    PassengerKind::Children => &site.child_count_test_id,
                };
                for step in [Step::Decrease, Step::Increase] {
                    els.push(
                        MockElement::new(Some(Role::Button), format!("{} {}", step.verb(), kind.noun()))
                            .text(if step == Step::Increase { "+" } else { "-" })
                            .parent(dialog)
                            .action(Action::Stepper(kind, step)),
                    );
                }
                els.push(
                    MockElement::new(None, "")
                        .text(format!(" {} ", self.passengers.get(kind)))
                        .test_id(id)
                        .parent(dialog),
                );
            }
        }

        els.push(
            MockElement::new(Some(Role::ComboBox), site.licence_input.as_str())
                .text("")
                .value(self.country_value.clone())
                .input(InputField::Country)
                .action(Action::Open(Popover::Countries)),
        );
        if self.open == Some(Popover::Countries) {
            let list = els.len();
            els.push(MockElement::new(Some(Role::ListBox), site.country_listbox.as_str()).text(""));
            let query = self.country_value.trim().to_lowercase();
            for (i, name) in self.countries.iter().enumerate() {
                if name.to_lowercase().contains(&query) {
                    els.push(
                        MockElement::new(Some(Role::Option), name.as_str())
                            .parent(list)
                            .action(Action::ChooseCountry(i)),
                    );
                }
            }
        }

        els.push(
            MockElement::new(Some(Role::Button), site.search_button.as_str()).action(Action::Search),
        );
        if self.searched {
            let text = format!(
                "Vehicles from {} to {}",
                self.pickup.as_deref().unwrap_or("anywhere"),
                self.dropoff.as_deref().unwrap_or("anywhere")
            );
            els.push(
                MockElement::new(Some(Role::Status), "Search results")
                    .text(text)
                    .test_id(&site.results_test_id),
            );
        }

        els
    }

    fn resolve(&self, els: &[MockElement], selector: &Selector) -> Vec<usize> {
        match selector {
            Selector::Css(css) => match css.trim().strip_prefix('.') {
                Some(class) => (0..els.len()).filter(|&i| els[i].class.as_deref() == Some(class)).collect(),
                None => Vec::new(),
            },
            Selector::TestId(id) => (0..els.len())
                .filter(|&i| els[i].test_id.as_deref() == Some(id.as_str()))
                .collect(),
            Selector::Role { role, name, exact } => (0..els.len())
                .filter(|&i| {
                    let el = &els[i];
                    el.role == Some(*role)
                        && if *exact {
                            el.name.trim() == name.as_str()
                        } else {
                            el.name.to_lowercase().contains(&name.to_lowercase())
                        }
                })
                .collect(),
            Selector::Within { scope, inner } => {
                let inner = self.resolve(els, inner);
                self.resolve(els, scope)
                    .into_iter()
                    .flat_map(|s| {
                        inner
                            .iter()
                            .copied()
                            .filter(|&i| descends_from(els, i, s))
                            .collect::<Vec<_>>()
                    })
                    .collect()
            }
        }
    }

    fn first(&self, selector: &Selector) -> ProbeResult<MockElement> {
        let els = self.render();
        self.resolve(&els, selector)
            .first()
            .map(|&i| els[i].clone())
            .ok_or_else(|| ProbeError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Inert => {}
            Action::Open(popover) => self.open_popover(popover),
            Action::ChooseLocation(field, index) => {
                let name = self.locations.get(index).cloned();
                match field {
                    LocationField::Pickup => self.pickup = name,
                    LocationField::Dropoff => self.dropoff = name,
                }
                self.last_clicked_option = Some(index);
                self.open = None;
            }
            Action::NextMonth if self.stuck_next_month => {}
            Action::NextMonth => self.month_offset += 1,
            Action::Day(date) => match self.pending_start {
                Some(start) if date >= start => {
                    self.range = Some((start, date));
                    self.pending_start = None;
                    self.open = None;
                }
                _ => self.pending_start = Some(date),
            },
            Action::Stepper(kind, step) => self.step(kind, step),
            Action::ChooseCountry(index) => {
                if let Some(name) = self.countries.get(index) {
                    self.country_value.clone_from(name);
                }
                self.last_clicked_option = Some(index);
                self.open = None;
            }
            Action::Search => {
                self.open = None;
                self.searched = true;
            }
        }
    }

    fn open_popover(&mut self, popover: Popover) {
        let broken = match popover {
            Popover::Pickup | Popover::Dropoff => self.broken_locations,
            Popover::Calendar => self.broken_calendar,
            Popover::Passengers => self.broken_passengers,
            Popover::Countries => false,
        };
        if broken || self.open == Some(popover) {
            return;
        }
        if matches!(popover, Popover::Pickup | Popover::Dropoff) {
            self.location_query.clear();
        }
        if popover == Popover::Calendar {
            self.month_offset = 0;
            self.pending_start = None;
        }
        self.open = Some(popover);
    }

    fn step(&mut self, kind: PassengerKind, step: Step) {
        let mut next = self.passengers;
        let slot = match kind {
            PassengerKind::Adults => &mut next.adults,
            PassengerKind::Children => &mut next.children,
        };
        match step {
            Step::Increase => *slot = slot.saturating_add(1),
            Step::Decrease => *slot = slot.saturating_sub(1),
        }
        let within = next.adults >= self.limits.min_adults
            && next.adults <= self.limits.max_adults
            && next.children <= self.limits.max_children
            && next.total() <= u16::from(self.limits.max_total);
        if within {
            self.passengers = next;
        }
    }

    fn reset(&mut self) {
        self.open = None;
        self.location_query.clear();
        self.pickup = None;
        self.dropoff = None;
        self.month_offset = 0;
        self.pending_start = None;
        self.range = None;
        self.passengers = PassengerCount::default();
        self.country_value.clear();
        self.searched = false;
        self.last_clicked_option = None;
    }

    fn dump(&self) -> String {
        let mut out = format!("url: {}\n", self.url);
        for el in self.render() {
            let role = el.role.map_or("-", Role::as_str);
            let _ = writeln!(out, "{role}\t{:?}\t{:?}\t{:?}", el.name, el.text.trim(), el.value);
        }
        out
    }
}

fn descends_from(els: &[MockElement], mut node: usize, ancestor: usize) -> bool {
    while let Some(parent) = els[node].parent {
        if parent == ancestor {
            return true;
        }
        node = parent;
    }
    false
}

#[async_trait]
impl PageDriver for MockBookingSite {
    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        self.history.push(MockCall::Navigate(url.to_string()));
        self.url = url.to_string();
        self.reset();
        Ok(())
    }

    async fn click(&mut self, selector: &Selector) -> ProbeResult<()> {
        self.history.push(MockCall::Click(selector.to_string()));
        let el = self.first(selector)?;
        self.perform(el.action);
        Ok(())
    }

    async fn fill(&mut self, selector: &Selector, text: &str) -> ProbeResult<()> {
        self.history
            .push(MockCall::Fill(selector.to_string(), text.to_string()));
        let el = self.first(selector)?;
        match el.input {
            Some(InputField::LocationQuery) => self.location_query = text.to_string(),
            Some(InputField::Country) => {
                self.country_value = text.to_string();
                self.open = Some(Popover::Countries);
            }
            None => {
                return Err(ProbeError::driver(format!("{selector} is not an editable input")));
            }
        }
        Ok(())
    }

    async fn wait_for_visible(&self, selector: &Selector, timeout: Duration) -> ProbeResult<()> {
        if self.is_visible(selector).await? {
            return Ok(());
        }
        // Nothing changes while waiting; the page is driven by one caller
        tokio::time::sleep(timeout).await;
        Err(ProbeError::Timeout {
            selector: selector.to_string(),
            ms: timeout.as_millis() as u64,
        })
    }

    async fn is_visible(&self, selector: &Selector) -> ProbeResult<bool> {
        let els = self.render();
        Ok(!self.resolve(&els, selector).is_empty())
    }

    async fn text_content(&self, selector: &Selector) -> ProbeResult<String> {
        Ok(self.first(selector)?.text)
    }

    async fn all_text_contents(&self, selector: &Selector) -> ProbeResult<Vec<String>> {
        let els = self.render();
        Ok(self
            .resolve(&els, selector)
            .into_iter()
            .map(|i| els[i].text.clone())
            .collect())
    }

    async fn input_value(&self, selector: &Selector) -> ProbeResult<String> {
        Ok(self.first(selector)?.value)
    }

    async fn screenshot(&self, path: &Path) -> ProbeResult<()> {
        tokio::fs::write(path, self.dump()).await.map_err(|e| ProbeError::Screenshot {
            message: format!("{}: {e}", path.display()),
        })
    }

    async fn current_url(&self) -> ProbeResult<String> {
        Ok(self.url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_millis(10);

    mod rendering_tests {
        use super::*;

        #[tokio::test]
        async fn test_closed_page_shows_triggers_only() {
            let site = SiteContract::default();
            let mock = MockBookingSite::new();
            assert!(mock.is_visible(&site.pickup_trigger()).await.unwrap());
            assert!(!mock.is_visible(&site.pickup_scope().input).await.unwrap());
            assert!(!mock.is_visible(&site.month_labels()).await.unwrap());
            assert!(mock.is_visible(&site.licence_input()).await.unwrap());
        }

        #[tokio::test]
        async fn test_trigger_text_is_padded() {
            let site = SiteContract::default();
            let mock = MockBookingSite::new();
            let raw = mock.text_content(&site.passengers_trigger()).await.unwrap();
            assert_ne!(raw, raw.trim());
            assert_eq!(raw.trim(), "1 Adult");
        }

        #[tokio::test]
        async fn test_one_popover_at_a_time() {
            let site = SiteContract::default();
            let mut mock = MockBookingSite::new();
            mock.click(&site.pickup_trigger()).await.unwrap();
            mock.click(&site.dates_trigger()).await.unwrap();
            assert!(!mock.is_visible(&site.pickup_scope().input).await.unwrap());
            assert!(mock.is_visible(&site.month_labels()).await.unwrap());
        }

        #[tokio::test]
        async fn test_calendar_shows_two_months() {
            let site = SiteContract::default();
            let mut mock = MockBookingSite::new().with_calendar_start(CalendarMonth::new(2026, 12));
            mock.click(&site.dates_trigger()).await.unwrap();
            let labels = mock.all_text_contents(&site.month_labels()).await.unwrap();
            let labels: Vec<_> = labels.iter().map(|l| l.trim()).collect();
            assert_eq!(labels, vec!["December 2026", "January 2027"]);
        }

        #[tokio::test]
        async fn test_substring_role_match() {
            let mut mock = MockBookingSite::new();
            let site = SiteContract::default();
            mock.click(&site.pickup_trigger()).await.unwrap();
            let auck = Selector::role_containing(Role::Option, "AUCK");
            assert_eq!(mock.text_content(&auck).await.unwrap(), "Auckland");
        }
    }

    mod driver_tests {
        use super::*;

        #[tokio::test]
        async fn test_missing_element_click_fails() {
            let mut mock = MockBookingSite::new();
            let err = mock.click(&Selector::test_id("nope")).await.unwrap_err();
            assert!(matches!(err, ProbeError::ElementNotFound { .. }));
            assert_eq!(mock.history().len(), 1);
        }

        #[tokio::test]
        async fn test_wait_times_out() {
            let mock = MockBookingSite::new();
            let err = mock
                .wait_for_visible(&Selector::test_id("search-results"), WAIT)
                .await
                .unwrap_err();
            assert!(matches!(err, ProbeError::Timeout { ms: 10, .. }));
        }

        #[tokio::test]
        async fn test_navigate_resets_widgets() {
            let site = SiteContract::default();
            let mut mock = MockBookingSite::new();
            mock.click(&site.pickup_trigger()).await.unwrap();
            mock.click(&site.pickup_scope().option("Queenstown")).await.unwrap();
            assert_eq!(mock.pickup(), Some("Queenstown"));

            mock.navigate("https://rentals.test/").await.unwrap();
            assert_eq!(mock.pickup(), None);
            assert_eq!(mock.current_url().await.unwrap(), "https://rentals.test/");
        }

        #[tokio::test]
        async fn test_fill_non_input_fails() {
            let site = SiteContract::default();
            let mut mock = MockBookingSite::new();
            let err = mock.fill(&site.search_button(), "x").await.unwrap_err();
            assert!(matches!(err, ProbeError::Driver { .. }));
        }

        #[tokio::test]
        async fn test_screenshot_writes_dump() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("page.txt");
            let mock = MockBookingSite::new();
            mock.screenshot(&path).await.unwrap();
            let dump = std::fs::read_to_string(&path).unwrap();
            assert!(dump.contains("Choose your pickup location"));
        }
    }

    mod widget_tests {
        use super::*;

        #[tokio::test]
        async fn test_earlier_second_click_restarts_range() {
            let site = SiteContract::default();
            let mut mock = MockBookingSite::new().with_calendar_start(CalendarMonth::new(2026, 11));
            mock.click(&site.dates_trigger()).await.unwrap();
            mock.click(&site.day_cell("November 2026", 20)).await.unwrap();
            mock.click(&site.day_cell("November 2026", 12)).await.unwrap();
            assert!(mock.selected_range().is_none());
            mock.click(&site.day_cell("November 2026", 15)).await.unwrap();
            let (a, b) = mock.selected_range().unwrap();
            assert_eq!((a.to_string(), b.to_string()), ("2026-11-12".into(), "2026-11-15".into()));
            let label = mock.text_content(&site.dates_trigger()).await.unwrap();
            assert_eq!(label.trim(), "12 Nov 2026 - 15 Nov 2026");
        }

        #[tokio::test]
        async fn test_stepper_clamps_at_limits() {
            let site = SiteContract::default();
            let mut mock = MockBookingSite::new();
            mock.click(&site.passengers_trigger()).await.unwrap();
            let minus = site.passenger_stepper(PassengerKind::Adults, Step::Decrease);
            mock.click(&minus).await.unwrap();
            assert_eq!(mock.passengers(), PassengerCount::new(1, 0));
        }

        #[tokio::test]
        async fn test_country_fill_opens_filtered_list() {
            let site = SiteContract::default();
            let scope = site.country_scope();
            let mut mock = MockBookingSite::new();
            mock.fill(&scope.input, "new").await.unwrap();
            assert!(mock.is_visible(&scope.option("New Zealand")).await.unwrap());
            assert!(!mock.is_visible(&scope.option("Japan")).await.unwrap());
        }
    }
}
