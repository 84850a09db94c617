//! Per-page selection state and the dependency gate.
//!
//! A [`SelectionState`] is owned by exactly one page object. It is reset on
//! navigation and only mutated after a selection operation succeeds.

use crate::calendar::CalendarTarget;
use crate::passengers::PassengerCount;
use crate::result::{ProbeError, ProbeResult};

/// A selection that must succeed before a dependent operation may run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prerequisite {
    /// A pickup location has been chosen
    PickupLocation,
}

impl Prerequisite {
    /// Name of the operation that satisfies this prerequisite
    #[must_use]
    pub const fn operation(self) -> &'static str {
        match self {
            Self::PickupLocation => "select_pickup_location",
        }
    }
}

/// Last successful value of every field on the search form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Canonical pickup location
    pub pickup_location: Option<&'static str>,
    /// Canonical drop-off location
    pub dropoff_location: Option<&'static str>,
    /// Selected travel dates
    pub dates: Option<(CalendarTarget, CalendarTarget)>,
    /// Selected passengers
    pub passengers: Option<PassengerCount>,
    /// Canonical driver's licence country
    pub licence_country: Option<&'static str>,
}

impl SelectionState {
    /// Create an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every selection
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether `prerequisite` has been met
    #[must_use]
    pub const fn is_satisfied(&self, prerequisite: Prerequisite) -> bool {
        match prerequisite {
            Prerequisite::PickupLocation => self.pickup_location.is_some(),
        }
    }

    /// Whether nothing has been selected yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Fail with [`ProbeError::Precondition`] unless `prerequisite` is met.
pub fn assert_prerequisite(
    state: &SelectionState,
    prerequisite: Prerequisite,
    attempted: &'static str,
) -> ProbeResult<()> {
    if state.is_satisfied(prerequisite) {
        Ok(())
    } else {
        Err(ProbeError::Precondition {
            required: prerequisite.operation(),
            attempted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_blocks_without_pickup() {
        let state = SelectionState::new();
        let err = assert_prerequisite(&state, Prerequisite::PickupLocation, "select_dropoff_location")
            .unwrap_err();
        assert!(err.to_string().contains("select_pickup_location"));
    }

    #[test]
    fn test_gate_opens_after_pickup() {
        let mut state = SelectionState::new();
        state.pickup_location = Some("Auckland");
        assert!(assert_prerequisite(&state, Prerequisite::PickupLocation, "x").is_ok());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = SelectionState::new();
        state.pickup_location = Some("Auckland");
        state.licence_country = Some("New Zealand");
        assert!(!state.is_empty());

        state.reset();
        assert!(state.is_empty());
        assert!(!state.is_satisfied(Prerequisite::PickupLocation));
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = SelectionState::new();
        let b = SelectionState::new();
        a.pickup_location = Some("Queenstown");
        assert!(a.is_satisfied(Prerequisite::PickupLocation));
        assert!(!b.is_satisfied(Prerequisite::PickupLocation));
    }
}
