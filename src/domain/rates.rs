//! Per-country CBM rates in euros and Tunisian dinars.
//!
//! The table is fixed at build time; 1 EUR is taken as roughly 3.35 TND.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RatePair {
    pub eur: f64,
    pub tnd: f64,
}

impl RatePair {
    pub const ZERO: RatePair = RatePair { eur: 0.0, tnd: 0.0 };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CountryRate {
    pub code: &'static str,
    pub rates: RatePair,
}

const RATE_TABLE: [CountryRate; 4] = [
    CountryRate {
        code: "FR",
        rates: RatePair {
            eur: 100.0,
            tnd: 335.0,
        },
    },
    CountryRate {
        code: "DE",
        rates: RatePair {
            eur: 120.0,
            tnd: 402.0,
        },
    },
    CountryRate {
        code: "IT",
        rates: RatePair {
            eur: 110.0,
            tnd: 368.5,
        },
    },
    CountryRate {
        code: "ES",
        rates: RatePair {
            eur: 95.0,
            tnd: 318.25,
        },
    },
];

/// Destinations in the order they are offered to the user.
pub fn countries() -> &'static [CountryRate] {
    &RATE_TABLE
}

pub fn lookup(code: &str) -> Option<RatePair> {
    RATE_TABLE
        .iter()
        .find(|entry| entry.code.eq_ignore_ascii_case(code.trim()))
        .map(|entry| entry.rates)
}

/// Unit rates for `code`, or a zero pair when the country is not in the table.
pub fn unit_rates(code: &str) -> RatePair {
    lookup(code).unwrap_or(RatePair::ZERO)
}

pub fn is_known(code: &str) -> bool {
    lookup(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_countries_resolve() {
        assert_eq!(lookup("FR"), Some(RatePair { eur: 100.0, tnd: 335.0 }));
        assert_eq!(lookup("es").map(|r| r.tnd), Some(318.25));
        assert_eq!(countries().len(), 4);
        assert_eq!(countries()[0].code, "FR");
    }

    #[test]
    fn unknown_country_yields_zero_rates() {
        assert_eq!(lookup("US"), None);
        assert_eq!(unit_rates("US"), RatePair::ZERO);
        assert!(!is_known(""));
    }
}
