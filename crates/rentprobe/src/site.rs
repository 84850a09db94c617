//! The booking site's DOM contract.
//!
//! Every accessible name, role, class and test id the interaction layer relies
//! on lives here. Operations build their selectors from a [`SiteContract`], so a
//! site redesign means editing (or overriding via config) this one value.

use crate::locator::{Role, Selector};
use crate::option::OptionScope;
use crate::passengers::{PassengerKind, Step};
use serde::{Deserialize, Serialize};

/// Literal hooks exposed by the booking widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteContract {
    /// Accessible name of the pickup location button
    pub pickup_trigger: String,
    /// Accessible name of the pickup search input
    pub pickup_input: String,
    /// Accessible name of the drop-off location button
    pub dropoff_trigger: String,
    /// Accessible name of the drop-off search input
    pub dropoff_input: String,
    /// Accessible name of the location suggestion listbox
    pub location_listbox: String,
    /// Accessible name of the date range button
    pub dates_trigger: String,
    /// CSS selector of the month label landmarks ("October 2026")
    pub month_label_css: String,
    /// Accessible name of the advance-month control
    pub next_month: String,
    /// Accessible name of the passengers button
    pub passengers_trigger: String,
    /// Test id of the adult counter
    pub adult_count_test_id: String,
    /// Test id of the child counter
    pub child_count_test_id: String,
    /// Accessible name of the licence country combobox
    pub licence_input: String,
    /// Accessible name of the country suggestion listbox
    pub country_listbox: String,
    /// Accessible name of the search button
    pub search_button: String,
    /// Test id of the results container
    pub results_test_id: String,
}

impl Default for SiteContract {
    fn default() -> Self {
        Self {
            pickup_trigger: "Choose your pickup location".to_string(),
            pickup_input: "Pick up from".to_string(),
            dropoff_trigger: "Choose your drop-off location".to_string(),
            dropoff_input: "Drop off at".to_string(),
            location_listbox: "Locations".to_string(),
            dates_trigger: "Choose your dates".to_string(),
            month_label_css: ".calendar-month-label".to_string(),
            next_month: "Next month".to_string(),
            passengers_trigger: "Passengers".to_string(),
            adult_count_test_id: "adult-count".to_string(),
            child_count_test_id: "child-count".to_string(),
            licence_input: "Driver's licence from".to_string(),
            country_listbox: "Countries".to_string(),
            search_button: "Search".to_string(),
            results_test_id: "search-results".to_string(),
        }
    }
}

impl SiteContract {
    /// Pickup location button
    #[must_use]
    pub fn pickup_trigger(&self) -> Selector {
        Selector::role(Role::Button, &self.pickup_trigger)
    }

    /// Drop-off location button
    #[must_use]
    pub fn dropoff_trigger(&self) -> Selector {
        Selector::role(Role::Button, &self.dropoff_trigger)
    }

    /// Option lookup scope for the pickup field
    #[must_use]
    pub fn pickup_scope(&self) -> OptionScope {
        OptionScope {
            widget: "pickup location",
            trigger: self.pickup_trigger(),
            input: Selector::role(Role::TextBox, &self.pickup_input),
            list: Selector::role(Role::ListBox, &self.location_listbox),
        }
    }

    /// Option lookup scope for the drop-off field
    #[must_use]
    pub fn dropoff_scope(&self) -> OptionScope {
        OptionScope {
            widget: "drop-off location",
            trigger: self.dropoff_trigger(),
            input: Selector::role(Role::TextBox, &self.dropoff_input),
            list: Selector::role(Role::ListBox, &self.location_listbox),
        }
    }

    /// Licence country combobox
    #[must_use]
    pub fn licence_input(&self) -> Selector {
        Selector::role(Role::ComboBox, &self.licence_input)
    }

    /// Option lookup scope for the licence country field.
    ///
    /// The combobox is always rendered, so it doubles as its own trigger.
    #[must_use]
    pub fn country_scope(&self) -> OptionScope {
        OptionScope {
            widget: "licence country",
            trigger: self.licence_input(),
            input: self.licence_input(),
            list: Selector::role(Role::ListBox, &self.country_listbox),
        }
    }

    /// Date range button
    #[must_use]
    pub fn dates_trigger(&self) -> Selector {
        Selector::role(Role::Button, &self.dates_trigger)
    }

    /// Month label landmarks, one per visible month
    #[must_use]
    pub fn month_labels(&self) -> Selector {
        Selector::css(&self.month_label_css)
    }

    /// Advance-month control
    #[must_use]
    pub fn next_month(&self) -> Selector {
        Selector::role(Role::Button, &self.next_month)
    }

    /// Panel holding one month's day cells
    #[must_use]
    pub fn month_panel(&self, label: &str) -> Selector {
        Selector::role(Role::Grid, label)
    }

    /// Day cell matched exactly inside one month panel
    #[must_use]
    pub fn day_cell(&self, month_label: &str, day: u32) -> Selector {
        self.month_panel(month_label)
            .within(Selector::role(Role::Button, day.to_string()))
    }

    /// Passengers button
    #[must_use]
    pub fn passengers_trigger(&self) -> Selector {
        Selector::role(Role::Button, &self.passengers_trigger)
    }

    /// Counter display for one passenger kind
    #[must_use]
    pub fn passenger_counter(&self, kind: PassengerKind) -> Selector {
        match kind {
            PassengerKind::Adults => Selector::test_id(&self.adult_count_test_id),
            PassengerKind::Children => Selector::test_id(&self.child_count_test_id),
        }
    }

    /// Stepper button ("Increase adults", "Decrease children", ...)
    #[must_use]
    pub fn passenger_stepper(&self, kind: PassengerKind, step: Step) -> Selector {
        Selector::role(Role::Button, format!("{} {}", step.verb(), kind.noun()))
    }

    /// Search button
    #[must_use]
    pub fn search_button(&self) -> Selector {
        Selector::role(Role::Button, &self.search_button)
    }

    /// Results container
    #[must_use]
    pub fn results(&self) -> Selector {
        Selector::test_id(&self.results_test_id)
    }
}
