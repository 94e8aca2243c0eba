use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::entities::{Contact, Incoterm, Merchandise};

/// Form field a validation message is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Name,
    Description,
    PackageCount,
    Weight,
    Length,
    Width,
    Height,
    SenderName,
    SenderAddress,
    SenderEmail,
    SenderPhone,
    DestName,
    DestAddress,
    DestEmail,
    DestPhone,
    Incoterms,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Name => "name",
            FieldKey::Description => "description",
            FieldKey::PackageCount => "packageCount",
            FieldKey::Weight => "weight",
            FieldKey::Length => "length",
            FieldKey::Width => "width",
            FieldKey::Height => "height",
            FieldKey::SenderName => "senderName",
            FieldKey::SenderAddress => "senderAddress",
            FieldKey::SenderEmail => "senderEmail",
            FieldKey::SenderPhone => "senderPhone",
            FieldKey::DestName => "destName",
            FieldKey::DestAddress => "destAddress",
            FieldKey::DestEmail => "destEmail",
            FieldKey::DestPhone => "destPhone",
            FieldKey::Incoterms => "incoterms",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-keyed validation messages. Empty means the form can be submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors {
    entries: BTreeMap<FieldKey, String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Comma-separated keys, suitable for a "please fill in" summary.
    pub fn missing_fields(&self) -> String {
        self.entries
            .keys()
            .map(FieldKey::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn insert(&mut self, key: FieldKey, message: &str) {
        self.entries.insert(key, message.to_string());
    }

    fn require_text(&mut self, key: FieldKey, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.insert(key, message);
        }
    }

    fn require_positive(&mut self, key: FieldKey, value: f64, message: &str) {
        // Non-finite values cannot be stored as JSON numbers.
        if !(value.is_finite() && value > 0.0) {
            self.insert(key, message);
        }
    }
}

/// Checks every rule and collects all failures; nothing short-circuits.
pub fn validate(
    merchandise: &Merchandise,
    sender: &Contact,
    destination: &Contact,
    selected_terms: &BTreeSet<Incoterm>,
) -> FormErrors {
    let mut errors = FormErrors::default();

    errors.require_text(FieldKey::Name, &merchandise.name, "Name is required");
    errors.require_text(
        FieldKey::Description,
        &merchandise.description,
        "Description is required",
    );
    if merchandise.package_count < 1 {
        errors.insert(FieldKey::PackageCount, "Package count must be at least 1");
    }
    errors.require_positive(
        FieldKey::Weight,
        merchandise.weight,
        "Weight must be greater than 0",
    );

    // The entered height is checked even when stacking rules will override it.
    let dims = &merchandise.dimensions;
    errors.require_positive(FieldKey::Length, dims.length, "Length must be greater than 0");
    errors.require_positive(FieldKey::Width, dims.width, "Width must be greater than 0");
    errors.require_positive(FieldKey::Height, dims.height, "Height must be greater than 0");

    check_contact(
        &mut errors,
        sender,
        [
            (FieldKey::SenderName, "Sender name is required"),
            (FieldKey::SenderAddress, "Sender address is required"),
            (FieldKey::SenderEmail, "Sender email is required"),
            (FieldKey::SenderPhone, "Sender phone is required"),
        ],
    );
    check_contact(
        &mut errors,
        destination,
        [
            (FieldKey::DestName, "Destination name is required"),
            (FieldKey::DestAddress, "Destination address is required"),
            (FieldKey::DestEmail, "Destination email is required"),
            (FieldKey::DestPhone, "Destination phone is required"),
        ],
    );

    if selected_terms.is_empty() {
        errors.insert(FieldKey::Incoterms, "At least one Incoterm must be selected");
    }

    errors
}

fn check_contact(errors: &mut FormErrors, contact: &Contact, rules: [(FieldKey, &str); 4]) {
    let [name, address, email, phone] = rules;
    errors.require_text(name.0, &contact.name, name.1);
    errors.require_text(address.0, &contact.address, address.1);
    errors.require_text(email.0, &contact.email, email.1);
    errors.require_text(phone.0, &contact.phone, phone.1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Dimensions, ShipmentForm};

    fn contact(prefix: &str) -> Contact {
        Contact {
            name: format!("{prefix} Name"),
            address: format!("{prefix} Street 1"),
            email: format!("{prefix}@example.com"),
            phone: "+216 71 000 000".to_string(),
        }
    }

    fn filled_form() -> ShipmentForm {
        let mut form = ShipmentForm::default();
        form.merchandise = Merchandise {
            name: "Olive oil".to_string(),
            description: "Pallets of bottled oil".to_string(),
            weight: 480.0,
            package_count: 4,
            dimensions: Dimensions {
                length: 120.0,
                width: 80.0,
                height: 150.0,
            },
            is_stackable: true,
        };
        form.sender = contact("Sender");
        form.destination = contact("Receiver");
        form
    }

    #[test]
    fn complete_form_has_no_errors() {
        let errors = filled_form().validate();
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn blank_form_reports_every_field() {
        let mut form = ShipmentForm::default();
        form.incoterms.clear();
        form.merchandise.package_count = 0;

        let errors = form.validate();
        assert_eq!(errors.len(), 16);
        assert_eq!(errors.get(FieldKey::Name), Some("Name is required"));
        assert_eq!(
            errors.get(FieldKey::DestPhone),
            Some("Destination phone is required")
        );
        assert!(errors.contains(FieldKey::Incoterms));
        assert!(errors.missing_fields().starts_with("name, description, packageCount"));
    }

    #[test]
    fn whitespace_only_text_is_rejected() {
        let mut form = filled_form();
        form.merchandise.description = "   ".to_string();
        form.sender.email = "\t".to_string();

        let errors = form.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(FieldKey::Description));
        assert!(errors.contains(FieldKey::SenderEmail));
        assert!(!errors.contains(FieldKey::DestEmail));
    }

    #[test]
    fn weight_must_be_a_positive_number() {
        for weight in [0.0, -3.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut form = filled_form();
            form.merchandise.weight = weight;
            let errors = form.validate();
            assert_eq!(
                errors.get(FieldKey::Weight),
                Some("Weight must be greater than 0")
            );
        }
    }

    #[test]
    fn infinite_dimensions_are_rejected() {
        let mut form = filled_form();
        form.merchandise.dimensions.length = f64::INFINITY;
        form.merchandise.dimensions.height = f64::INFINITY;

        let errors = form.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(FieldKey::Length));
        assert!(errors.contains(FieldKey::Height));
        assert!(!errors.contains(FieldKey::Width));
    }

    #[test]
    fn entered_height_is_checked_even_when_not_stackable() {
        let mut form = filled_form();
        form.merchandise.is_stackable = false;
        form.merchandise.dimensions.height = 0.0;

        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(FieldKey::Height));
    }

    #[test]
    fn at_least_one_incoterm_is_required() {
        let mut form = filled_form();
        form.toggle_incoterm(Incoterm::Exw);
        assert!(form.incoterms.is_empty());
        assert!(form.validate().contains(FieldKey::Incoterms));

        form.toggle_incoterm(Incoterm::Ddp);
        assert!(form.validate().is_empty());
    }

    #[test]
    fn validation_is_deterministic() {
        let mut form = filled_form();
        form.destination.name.clear();
        assert_eq!(form.validate(), form.validate());
    }
}
