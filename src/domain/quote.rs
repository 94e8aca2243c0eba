use serde::{Deserialize, Serialize};

use super::entities::Dimensions;
use super::rates::{unit_rates, RatePair};

/// Height used for cargo that cannot be stacked, in centimeters.
pub const NON_STACKABLE_HEIGHT_CM: f64 = 220.0;

const CUBIC_CM_PER_CBM: f64 = 1_000_000.0;

/// Total price of a shipment in both quoting currencies. Values are kept
/// unrounded; two-decimal display happens in the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub eur: f64,
    pub tnd: f64,
}

pub fn effective_height(dimensions: &Dimensions, is_stackable: bool) -> f64 {
    if is_stackable {
        dimensions.height
    } else {
        NON_STACKABLE_HEIGHT_CM
    }
}

/// Volume in CBM. Inputs are not checked: zero or negative dimensions give a
/// non-positive volume and are the validator's business.
pub fn compute_volume(dimensions: &Dimensions, is_stackable: bool) -> f64 {
    let height = effective_height(dimensions, is_stackable);
    (height * dimensions.length * dimensions.width) / CUBIC_CM_PER_CBM
}

pub fn compute_price(volume_cbm: f64, country_code: &str) -> PriceQuote {
    price_for_rates(volume_cbm, unit_rates(country_code))
}

pub fn price_for_rates(volume_cbm: f64, rates: RatePair) -> PriceQuote {
    PriceQuote {
        eur: volume_cbm * rates.eur,
        tnd: volume_cbm * rates.tnd,
    }
}
