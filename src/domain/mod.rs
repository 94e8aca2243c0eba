//! Quoting rules, form validation and the records they produce.

pub mod app_state;
pub mod entities;
pub mod quote;
pub mod quote_dialog;
pub mod rates;
pub mod validation;

#[allow(unused_imports)]
pub use app_state::{AppState, HealthStatus};
#[allow(unused_imports)]
pub use entities::{
    join_incoterms, Contact, Dimensions, Incoterm, Merchandise, MovementType, ShipmentForm,
    ShipmentRecord, StoredShipment, TransportType, ViewMode,
};
#[allow(unused_imports)]
pub use quote::{compute_price, compute_volume, effective_height, PriceQuote, NON_STACKABLE_HEIGHT_CM};
#[allow(unused_imports)]
pub use quote_dialog::{ConfirmError, PriceBreakdown, PriceLine, QuoteDialog, QuoteRejection};
#[allow(unused_imports)]
pub use rates::{countries, CountryRate, RatePair};
#[allow(unused_imports)]
pub use validation::{validate, FieldKey, FormErrors};
