use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::quote::{compute_volume, PriceQuote};
use super::validation::{validate, FormErrors};

/// Merchandise dimensions in centimeters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchandise {
    pub name: String,
    pub description: String,
    /// Kilograms. A field that failed to parse is carried as NaN so the
    /// validator can reject it.
    pub weight: f64,
    /// Zero means the field was left empty.
    pub package_count: u32,
    pub dimensions: Dimensions,
    pub is_stackable: bool,
}

impl Default for Merchandise {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            weight: 0.0,
            package_count: 1,
            dimensions: Dimensions::default(),
            is_stackable: true,
        }
    }
}

impl Merchandise {
    /// Volume in CBM, derived from the dimensions every time it is asked for.
    pub fn volume_cbm(&self) -> f64 {
        compute_volume(&self.dimensions, self.is_stackable)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportType {
    #[default]
    Maritime,
    Air,
    Road,
}

impl TransportType {
    pub const ALL: [TransportType; 3] = [
        TransportType::Maritime,
        TransportType::Air,
        TransportType::Road,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            TransportType::Maritime => "MARITIME",
            TransportType::Air => "AIR",
            TransportType::Road => "ROAD",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransportType::Maritime => "Maritime",
            TransportType::Air => "Air",
            TransportType::Road => "Road",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    #[default]
    Importation,
    Exportation,
}

impl MovementType {
    pub const ALL: [MovementType; 2] = [MovementType::Importation, MovementType::Exportation];

    pub fn label(&self) -> &'static str {
        match self {
            MovementType::Importation => "Importation",
            MovementType::Exportation => "Exportation",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trade terms offered on the form. Ordering follows the form layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Incoterm {
    #[serde(rename = "EXW")]
    Exw,
    #[serde(rename = "FOB")]
    Fob,
    #[serde(rename = "CIF")]
    Cif,
    #[serde(rename = "CFR")]
    Cfr,
    #[serde(rename = "DAP")]
    Dap,
    #[serde(rename = "DDP")]
    Ddp,
}

impl Incoterm {
    pub const ALL: [Incoterm; 6] = [
        Incoterm::Exw,
        Incoterm::Fob,
        Incoterm::Cif,
        Incoterm::Cfr,
        Incoterm::Dap,
        Incoterm::Ddp,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Incoterm::Exw => "EXW",
            Incoterm::Fob => "FOB",
            Incoterm::Cif => "CIF",
            Incoterm::Cfr => "CFR",
            Incoterm::Dap => "DAP",
            Incoterm::Ddp => "DDP",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Incoterm::Exw => "Ex Works (À l'usine)",
            Incoterm::Fob => "Free On Board (Franco à bord)",
            Incoterm::Cif => "Cost, Insurance and Freight (Coût, assurance et fret)",
            Incoterm::Cfr => "Cost and Freight (Coût et fret)",
            Incoterm::Dap => "Delivered At Place (Rendu au lieu de destination)",
            Incoterm::Ddp => "Delivered Duty Paid (Rendu droits acquittés)",
        }
    }
}

impl fmt::Display for Incoterm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

pub fn join_incoterms<'a>(terms: impl IntoIterator<Item = &'a Incoterm>) -> String {
    terms
        .into_iter()
        .map(Incoterm::code)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Everything the merchandise form holds between edits.
#[derive(Clone, Debug, PartialEq)]
pub struct ShipmentForm {
    pub merchandise: Merchandise,
    pub sender: Contact,
    pub destination: Contact,
    pub incoterms: BTreeSet<Incoterm>,
    pub transport: TransportType,
    pub movement: MovementType,
}

impl Default for ShipmentForm {
    fn default() -> Self {
        Self {
            merchandise: Merchandise::default(),
            sender: Contact::default(),
            destination: Contact::default(),
            incoterms: BTreeSet::from([Incoterm::Exw]),
            transport: TransportType::default(),
            movement: MovementType::default(),
        }
    }
}

impl ShipmentForm {
    pub fn validate(&self) -> FormErrors {
        validate(
            &self.merchandise,
            &self.sender,
            &self.destination,
            &self.incoterms,
        )
    }

    pub fn toggle_incoterm(&mut self, term: Incoterm) {
        if !self.incoterms.remove(&term) {
            self.incoterms.insert(term);
        }
    }
}

/// Snapshot committed to the shipment log from the quote dialog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRecord {
    pub merchandise: Merchandise,
    pub volume_cbm: f64,
    pub sender: Contact,
    pub destination: Contact,
    pub transport: TransportType,
    pub movement: MovementType,
    pub incoterms: Vec<Incoterm>,
    pub country: String,
    pub price: PriceQuote,
}

impl ShipmentRecord {
    pub fn incoterms_label(&self) -> String {
        join_incoterms(&self.incoterms)
    }

    /// First numeric field that JSON cannot carry (NaN or infinite), if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        let dims = &self.merchandise.dimensions;
        [
            ("weight", self.merchandise.weight),
            ("length", dims.length),
            ("width", dims.width),
            ("height", dims.height),
            ("volumeCbm", self.volume_cbm),
            ("price.eur", self.price.eur),
            ("price.tnd", self.price.tnd),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(field, _)| field)
    }
}

/// A record as held by the log: identifier and creation time plus the record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredShipment {
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(flatten)]
    pub record: ShipmentRecord,
}

/// Layout of the history page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Card,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Card => "card",
            ViewMode::List => "list",
        }
    }

    /// Anything other than the two known values falls back to cards.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim() {
            "list" => ViewMode::List,
            _ => ViewMode::Card,
        }
    }
}
