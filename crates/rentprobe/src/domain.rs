//! Fixed option sets and free-text normalization.
//!
//! Every field the booking widget accepts free text for (pickup/drop-off
//! location, driver's licence country) is backed by a [`Domain`]: an ordered,
//! fixed list of [`SupportedValue`]s. [`normalize`] maps raw input onto exactly
//! one canonical entry or fails with an error that lists every canonical name.
//!
//! Matching is exact after trimming, case folding and collapsing internal
//! whitespace. There is no prefix or substring matching: `"auck"` is rejected
//! rather than resolved to `"Auckland"`.

use crate::result::{ProbeError, ProbeResult};
use std::fmt;

/// One entry of a fixed enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SupportedValue {
    /// Authoritative display form, exactly as the widget renders it
    pub canonical: &'static str,
    /// Short code used by the availability API
    pub code: &'static str,
    /// Alternate accepted inputs (short codes, no-space variants)
    pub aliases: &'static [&'static str],
}

impl SupportedValue {
    /// Whether a folded input names this value
    fn accepts(&self, folded: &str) -> bool {
        fold(self.canonical) == folded || self.aliases.iter().any(|a| fold(a) == folded)
    }
}

impl fmt::Display for SupportedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical)
    }
}

/// An ordered, fixed set of supported values
#[derive(Debug, Clone, Copy)]
pub struct Domain {
    /// Name used in error messages ("location", "country")
    pub kind: &'static str,
    /// Entries in display order
    pub values: &'static [SupportedValue],
}

impl Domain {
    /// Canonical names in domain order
    #[must_use]
    pub fn canonical_names(&self) -> Vec<&'static str> {
        self.values.iter().map(|v| v.canonical).collect()
    }

    /// Canonical names joined with ", "
    #[must_use]
    pub fn supported_list(&self) -> String {
        self.canonical_names().join(", ")
    }

    /// Find the entry for an API code (case-insensitive)
    #[must_use]
    pub fn lookup_code(&self, code: &str) -> Option<&'static SupportedValue> {
        let code = code.trim();
        self.values.iter().find(|v| v.code.eq_ignore_ascii_case(code))
    }

    /// Normalize raw input against this domain
    pub fn normalize(&self, raw: &str) -> ProbeResult<&'static SupportedValue> {
        normalize(raw, self)
    }
}

/// Supported pickup/drop-off locations
pub static LOCATIONS: Domain = Domain {
    kind: "location",
    values: &[
        SupportedValue {
            canonical: "Auckland",
            code: "AKL",
            aliases: &["AKL"],
        },
        SupportedValue {
            canonical: "Christchurch",
            code: "CHC",
            aliases: &["CHC", "Chch"],
        },
        SupportedValue {
            canonical: "Queenstown",
            code: "ZQN",
            aliases: &["ZQN"],
        },
    ],
};

/// Supported driver's licence countries
pub static COUNTRIES: Domain = Domain {
    kind: "country",
    values: &[
        SupportedValue {
            canonical: "Australia",
            code: "AU",
            aliases: &["AU", "AUS"],
        },
        SupportedValue {
            canonical: "Canada",
            code: "CA",
            aliases: &["CA", "CAN"],
        },
        SupportedValue {
            canonical: "China",
            code: "CN",
            aliases: &["CN", "CHN"],
        },
        SupportedValue {
            canonical: "France",
            code: "FR",
            aliases: &["FR", "FRA"],
        },
        SupportedValue {
            canonical: "Germany",
            code: "DE",
            aliases: &["DE", "DEU"],
        },
        SupportedValue {
            canonical: "India",
            code: "IN",
            aliases: &["IN", "IND"],
        },
        SupportedValue {
            canonical: "Ireland",
            code: "IE",
            aliases: &["IE", "IRL"],
        },
        SupportedValue {
            canonical: "Japan",
            code: "JP",
            aliases: &["JP", "JPN"],
        },
        SupportedValue {
            canonical: "Netherlands",
            code: "NL",
            aliases: &["NL", "NLD", "The Netherlands"],
        },
        SupportedValue {
            canonical: "New Zealand",
            code: "NZ",
            aliases: &["NZ", "NZL", "NewZealand"],
        },
        SupportedValue {
            canonical: "Singapore",
            code: "SG",
            aliases: &["SG", "SGP"],
        },
        SupportedValue {
            canonical: "South Korea",
            code: "KR",
            aliases: &["KR", "KOR", "SouthKorea"],
        },
        SupportedValue {
            canonical: "Switzerland",
            code: "CH",
            aliases: &["CH", "CHE"],
        },
        SupportedValue {
            canonical: "United Kingdom",
            code: "GB",
            aliases: &["UK", "GB", "GBR", "UnitedKingdom", "Great Britain"],
        },
        SupportedValue {
            canonical: "United States",
            code: "US",
            aliases: &["US", "USA", "UnitedStates", "United States of America"],
        },
    ],
};

/// Trim, collapse internal whitespace runs and lowercase
fn fold(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Map free-text input onto one canonical value of `domain`.
///
/// # Errors
///
/// - [`ProbeError::EmptyInput`] if `raw` is empty after trimming
/// - [`ProbeError::UnsupportedValue`] if nothing matches; the message lists
///   every canonical name of the domain in order
pub fn normalize(raw: &str, domain: &Domain) -> ProbeResult<&'static SupportedValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProbeError::EmptyInput { kind: domain.kind });
    }

    let folded = fold(trimmed);
    domain
        .values
        .iter()
        .find(|v| v.accepts(&folded))
        .ok_or_else(|| ProbeError::UnsupportedValue {
            kind: domain.kind,
            input: trimmed.to_string(),
            supported: domain.supported_list(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    mod location_tests {
        use super::*;

        #[test]
        fn test_canonical_and_padding() {
            assert_eq!(normalize("  auckland  ", &LOCATIONS).unwrap().canonical, "Auckland");
            assert_eq!(normalize("QueensTown", &LOCATIONS).unwrap().canonical, "Queenstown");
            assert_eq!(normalize("\tCHRISTCHURCH\n", &LOCATIONS).unwrap().canonical, "Christchurch");
        }

        #[test]
        fn test_alias_codes() {
            assert_eq!(normalize("akl", &LOCATIONS).unwrap().canonical, "Auckland");
            assert_eq!(normalize("ZQN", &LOCATIONS).unwrap().canonical, "Queenstown");
        }

        #[test]
        fn test_unknown_lists_all_names() {
            let err = normalize("Wellington", &LOCATIONS).unwrap_err();
            assert!(matches!(err, ProbeError::UnsupportedValue { .. }));
            assert!(err.to_string().contains("Auckland, Christchurch, Queenstown"));
        }

        #[test]
        fn test_prefix_is_rejected() {
            let err = normalize("auck", &LOCATIONS).unwrap_err();
            assert!(matches!(err, ProbeError::UnsupportedValue { .. }));
        }

        #[test]
        fn test_empty_after_trim() {
            assert!(matches!(
                normalize("   ", &LOCATIONS),
                Err(ProbeError::EmptyInput { kind: "location" })
            ));
            assert!(matches!(normalize("", &LOCATIONS), Err(ProbeError::EmptyInput { .. })));
        }

        #[test]
        fn test_lookup_code() {
            assert_eq!(LOCATIONS.lookup_code("chc").unwrap().canonical, "Christchurch");
            assert!(LOCATIONS.lookup_code("WLG").is_none());
        }
    }

    mod country_tests {
        use super::*;

        #[test]
        fn test_short_codes() {
            assert_eq!(normalize("NZ", &COUNTRIES).unwrap().canonical, "New Zealand");
            assert_eq!(normalize("uk", &COUNTRIES).unwrap().canonical, "United Kingdom");
            assert_eq!(normalize("USA", &COUNTRIES).unwrap().canonical, "United States");
        }

        #[test]
        fn test_internal_whitespace_collapses() {
            assert_eq!(normalize("new   zealand", &COUNTRIES).unwrap().canonical, "New Zealand");
            assert_eq!(normalize("NewZealand", &COUNTRIES).unwrap().canonical, "New Zealand");
        }

        #[test]
        fn test_unknown_country_message() {
            let err = normalize("Atlantis", &COUNTRIES).unwrap_err();
            let msg = err.to_string();
            assert!(msg.starts_with("Unsupported country \"Atlantis\""));
            assert!(msg.contains("New Zealand"));
            assert!(msg.contains("United Kingdom"));
        }
    }

    mod invariant_tests {
        use super::*;

        fn assert_aliases_unique(domain: &Domain) {
            let mut owners: HashMap<String, &str> = HashMap::new();
            for value in domain.values {
                for key in std::iter::once(&value.canonical).chain(value.aliases.iter()) {
                    let previous = owners.insert(fold(key), value.canonical);
                    assert!(
                        previous.is_none() || previous == Some(value.canonical),
                        "{key} maps to both {previous:?} and {}",
                        value.canonical
                    );
                }
            }
        }

        #[test]
        fn test_every_alias_has_one_owner() {
            assert_aliases_unique(&LOCATIONS);
            assert_aliases_unique(&COUNTRIES);
        }

        #[test]
        fn test_normalize_returns_canonical_for_every_alias() {
            for domain in [&LOCATIONS, &COUNTRIES] {
                for value in domain.values {
                    for alias in value.aliases {
                        assert_eq!(normalize(alias, domain).unwrap().canonical, value.canonical);
                    }
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_case_and_padding_invariant(
            idx in 0usize..3,
            upper_mask in proptest::collection::vec(any::<bool>(), 12),
            left in "[ \t]{0,4}",
            right in "[ \t\n]{0,4}",
        ) {
            let value = &LOCATIONS.values[idx];
            let mixed: String = value
                .canonical
                .chars()
                .zip(upper_mask.iter().cycle())
                .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
                .collect();
            let input = format!("{left}{mixed}{right}");
            prop_assert_eq!(normalize(&input, &LOCATIONS).unwrap().canonical, value.canonical);
        }

        #[test]
        fn prop_strict_prefixes_rejected(idx in 0usize..3, cut in 1usize..7) {
            let canonical = LOCATIONS.values[idx].canonical;
            let prefix = &canonical[..cut.min(canonical.len() - 1)];
            let result = normalize(prefix, &LOCATIONS);
            prop_assert!(
                matches!(result, Err(ProbeError::UnsupportedValue { .. })),
                "prefix {} was accepted",
                prefix
            );
        }
    }
}
