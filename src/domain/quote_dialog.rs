//! State behind the quote dialog: destination choice, price preview and the
//! confirm step that commits a record to the shipment log.

use thiserror::Error;
use tracing::{info, warn};

use super::entities::{ShipmentForm, ShipmentRecord, StoredShipment};
use super::quote::compute_price;
use super::rates;
use crate::infra::shipment_log::{ShipmentLog, ShipmentLogError};
use crate::util::persistence::KeyValueStore;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuoteDialog {
    pub country: Option<String>,
    pub volume_cbm: Option<f64>,
}

/// One currency column of the preview.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceLine {
    pub volume_cbm: f64,
    pub unit_rate: f64,
    pub total: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PriceBreakdown {
    pub country: String,
    pub eur: PriceLine,
    pub tnd: PriceLine,
}

/// Reasons the confirm action is refused before anything is written.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QuoteRejection {
    #[error("Please select a destination country")]
    NoCountry,
    #[error("No rates are configured for {0}")]
    UnknownCountry(String),
    #[error("Calculate the volume first")]
    NoVolume,
    #[error("The calculated volume is not a valid quantity; check the dimensions")]
    InvalidVolume,
}

#[derive(Debug, Error)]
pub enum ConfirmError {
    #[error("{0}")]
    Rejected(#[from] QuoteRejection),
    #[error("Failed to save data: {0}")]
    Save(#[from] ShipmentLogError),
}

impl QuoteDialog {
    pub fn open(volume_cbm: f64) -> Self {
        Self {
            country: None,
            volume_cbm: Some(volume_cbm),
        }
    }

    pub fn select_country(&mut self, code: &str) {
        let code = code.trim();
        self.country = if code.is_empty() {
            None
        } else {
            Some(code.to_ascii_uppercase())
        };
    }

    /// Price preview; `None` until both a country and a volume are known.
    pub fn breakdown(&self) -> Option<PriceBreakdown> {
        let (country, volume) = self.ready().ok()?;
        let rates = rates::unit_rates(country);
        Some(PriceBreakdown {
            country: country.to_string(),
            eur: line(volume, rates.eur),
            tnd: line(volume, rates.tnd),
        })
    }

    pub fn build_record(&self, form: &ShipmentForm) -> Result<ShipmentRecord, QuoteRejection> {
        let (country, volume) = self.ready()?;
        Ok(ShipmentRecord {
            merchandise: form.merchandise.clone(),
            volume_cbm: volume,
            sender: form.sender.clone(),
            destination: form.destination.clone(),
            transport: form.transport,
            movement: form.movement,
            incoterms: form.incoterms.iter().copied().collect(),
            country: country.to_string(),
            price: compute_price(volume, country),
        })
    }

    /// Builds the record and appends it to `log`. The form is only read, so
    /// a failed save leaves it ready for another attempt.
    pub fn confirm<S: KeyValueStore>(
        &self,
        form: &ShipmentForm,
        log: &ShipmentLog<S>,
    ) -> Result<StoredShipment, ConfirmError> {
        let record = self.build_record(form)?;
        match log.create(&record) {
            Ok(stored) => {
                info!(
                    id = %stored.id,
                    country = %stored.record.country,
                    eur = stored.record.price.eur,
                    "shipment saved"
                );
                Ok(stored)
            }
            Err(err) => {
                warn!("saving shipment failed: {err}");
                Err(err.into())
            }
        }
    }

    /// Country and volume, once both are usable for pricing.
    fn ready(&self) -> Result<(&str, f64), QuoteRejection> {
        let country = self.country.as_deref().ok_or(QuoteRejection::NoCountry)?;
        if !rates::is_known(country) {
            return Err(QuoteRejection::UnknownCountry(country.to_string()));
        }
        let volume = self.volume_cbm.ok_or(QuoteRejection::NoVolume)?;
        if !volume.is_finite() {
            return Err(QuoteRejection::InvalidVolume);
        }
        if volume <= 0.0 {
            return Err(QuoteRejection::NoVolume);
        }
        Ok((country, volume))
    }
}

fn line(volume_cbm: f64, unit_rate: f64) -> PriceLine {
    PriceLine {
        volume_cbm,
        unit_rate,
        total: volume_cbm * unit_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Contact, Dimensions, Incoterm, Merchandise};
    use crate::util::persistence::MemoryStore;

    fn form() -> ShipmentForm {
        let mut form = ShipmentForm::default();
        form.merchandise = Merchandise {
            name: "Textiles".to_string(),
            description: "Rolls of cotton".to_string(),
            weight: 120.0,
            package_count: 2,
            dimensions: Dimensions {
                length: 100.0,
                width: 50.0,
                height: 40.0,
            },
            is_stackable: true,
        };
        form.sender = Contact {
            name: "Atelier Sfax".to_string(),
            address: "Route de Tunis".to_string(),
            email: "atelier@example.com".to_string(),
            phone: "74000000".to_string(),
        };
        form.destination = Contact {
            name: "Maison Lyon".to_string(),
            address: "Rue de la Part-Dieu".to_string(),
            email: "lyon@example.com".to_string(),
            phone: "0400000000".to_string(),
        };
        form.incoterms.insert(Incoterm::Fob);
        form
    }

    #[test]
    fn breakdown_requires_country_and_volume() {
        let mut dialog = QuoteDialog::default();
        assert!(dialog.breakdown().is_none());

        dialog.select_country("fr");
        assert!(dialog.breakdown().is_none());

        dialog.volume_cbm = Some(0.2);
        let breakdown = dialog.breakdown().expect("preview");
        assert_eq!(breakdown.country, "FR");
        assert_eq!(breakdown.eur.unit_rate, 100.0);
        assert_eq!(format!("{:.2}", breakdown.eur.total), "20.00");
        assert_eq!(format!("{:.2}", breakdown.tnd.total), "67.00");
    }

    #[test]
    fn clearing_the_country_drops_the_preview() {
        let mut dialog = QuoteDialog::open(1.0);
        dialog.select_country("DE");
        assert!(dialog.breakdown().is_some());
        dialog.select_country("");
        assert_eq!(dialog.country, None);
        assert!(dialog.breakdown().is_none());
    }

    #[test]
    fn confirm_without_country_is_rejected_and_writes_nothing() {
        let log = ShipmentLog::new(MemoryStore::default());
        let dialog = QuoteDialog::open(0.2);

        let err = dialog.confirm(&form(), &log).unwrap_err();
        assert!(matches!(err, ConfirmError::Rejected(QuoteRejection::NoCountry)));
        assert_eq!(err.to_string(), "Please select a destination country");
        assert!(log.list().unwrap().is_empty());
    }

    #[test]
    fn confirm_rejects_missing_volume_and_unknown_country() {
        let log = ShipmentLog::new(MemoryStore::default());

        let mut dialog = QuoteDialog::default();
        dialog.select_country("FR");
        assert!(matches!(
            dialog.confirm(&form(), &log),
            Err(ConfirmError::Rejected(QuoteRejection::NoVolume))
        ));

        let mut dialog = QuoteDialog::open(0.0);
        dialog.select_country("FR");
        assert!(matches!(
            dialog.confirm(&form(), &log),
            Err(ConfirmError::Rejected(QuoteRejection::NoVolume))
        ));

        let mut dialog = QuoteDialog::open(1.0);
        dialog.select_country("US");
        assert!(matches!(
            dialog.confirm(&form(), &log),
            Err(ConfirmError::Rejected(QuoteRejection::UnknownCountry(_)))
        ));
    }

    #[test]
    fn non_finite_volume_gets_its_own_rejection() {
        let log = ShipmentLog::new(MemoryStore::default());
        for volume in [f64::INFINITY, f64::NAN] {
            let mut dialog = QuoteDialog::open(volume);
            dialog.select_country("FR");
            assert!(dialog.breakdown().is_none());

            let err = dialog.confirm(&form(), &log).unwrap_err();
            assert!(matches!(
                err,
                ConfirmError::Rejected(QuoteRejection::InvalidVolume)
            ));
            assert_ne!(err.to_string(), QuoteRejection::NoVolume.to_string());
        }
        assert!(log.list().unwrap().is_empty());
    }

    #[test]
    fn saved_price_matches_the_previewed_totals() {
        let log = ShipmentLog::new(MemoryStore::default());
        let mut dialog = QuoteDialog::open(1.1);
        dialog.select_country("es");

        let preview = dialog.breakdown().expect("preview");
        let stored = dialog.confirm(&form(), &log).expect("saved");
        assert_eq!(stored.record.price, compute_price(1.1, "ES"));
        assert_eq!(stored.record.price.eur, preview.eur.total);
        assert_eq!(stored.record.price.tnd, preview.tnd.total);
    }

    #[test]
    fn confirm_appends_priced_snapshot() {
        let log = ShipmentLog::new(MemoryStore::default());
        let form = form();
        let mut dialog = QuoteDialog::open(form.merchandise.volume_cbm());
        dialog.select_country("FR");

        let stored = dialog.confirm(&form, &log).expect("saved");
        assert_eq!(stored.record.country, "FR");
        assert_eq!(stored.record.incoterms, vec![Incoterm::Exw, Incoterm::Fob]);
        assert_eq!(stored.record.merchandise, form.merchandise);
        assert_eq!(format!("{:.2}", stored.record.price.eur), "20.00");

        let listed = log.list().unwrap();
        assert_eq!(listed.last(), Some(&stored));
    }

    #[test]
    fn failed_save_is_reported_and_log_is_unchanged() {
        let log = ShipmentLog::new(MemoryStore::with_capacity(16));
        let mut dialog = QuoteDialog::open(1.1);
        dialog.select_country("FR");

        let err = dialog.confirm(&form(), &log).unwrap_err();
        assert!(matches!(err, ConfirmError::Save(_)));
        assert!(err.to_string().starts_with("Failed to save data:"));
        assert!(log.list().unwrap().is_empty());
    }
}
