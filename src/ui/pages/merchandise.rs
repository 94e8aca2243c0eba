use dioxus::prelude::*;
use tracing::debug;

use crate::app::{Route, Services};
use crate::domain::{
    AppState, ConfirmError, Contact, FieldKey, FormErrors, Incoterm, MovementType, QuoteDialog,
    ShipmentForm, TransportType, NON_STACKABLE_HEIGHT_CM,
};
use crate::ui::components::field::{FormField, TextInput};
use crate::ui::components::quote_dialog::QuoteDialogView;
use crate::ui::components::toast::{push_toast, ToastKind, ToastMessage};
use crate::ui::theme::{self, format_fixed};

#[component]
pub fn MerchandisePage() -> Element {
    let services = use_context::<Services>();
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let nav = use_navigator();

    // Numeric fields keep the raw text so partial input like "1." survives
    // a re-render; the parsed value goes into the form on every keystroke.
    let initial = state.with(|st| st.form.merchandise.clone());
    let mut weight_input = use_signal(|| numeric_text(initial.weight));
    let mut count_input = use_signal(|| count_text(initial.package_count));
    let mut length_input = use_signal(|| numeric_text(initial.dimensions.length));
    let mut width_input = use_signal(|| numeric_text(initial.dimensions.width));
    let mut height_input = use_signal(|| numeric_text(initial.dimensions.height));

    let mut errors = use_signal(FormErrors::default);
    let mut volume = use_signal(|| None::<f64>);
    let mut dialog = use_signal(|| None::<QuoteDialog>);

    let on_calculate = move |_: MouseEvent| {
        let form = state.with(|st| st.form.clone());
        let found = form.validate();
        if !found.is_empty() {
            debug!(count = found.len(), fields = %found.missing_fields(), "form incomplete");
            push_toast(
                toasts,
                ToastKind::Warning,
                format!("Please fill in all required fields: {}", found.missing_fields()),
            );
            errors.set(found);
            return;
        }
        errors.set(found);
        let cbm = form.merchandise.volume_cbm();
        volume.set(Some(cbm));
        dialog.set(Some(QuoteDialog::open(cbm)));
    };

    let mut save_quote = move || {
        let Some(current) = dialog() else {
            return;
        };
        let form = state.with(|st| st.form.clone());
        match current.confirm(&form, &services.log) {
            Ok(_) => {
                dialog.set(None);
                state.with_mut(|st| st.form = ShipmentForm::default());
                push_toast(toasts, ToastKind::Success, "Shipment data saved successfully!");
                nav.push(Route::History {});
            }
            Err(ConfirmError::Rejected(reason)) => {
                push_toast(toasts, ToastKind::Warning, reason.to_string())
            }
            Err(err) => push_toast(toasts, ToastKind::Error, err.to_string()),
        }
    };

    let form = state.with(|st| st.form.clone());
    let errs = errors();
    let error_for = |key: FieldKey| errs.get(key).map(str::to_string);
    let merchandise = &form.merchandise;
    let stackable = merchandise.is_stackable;
    let height_text = if stackable {
        height_input()
    } else {
        numeric_text(NON_STACKABLE_HEIGHT_CM)
    };
    let volume_text = volume().map(format_fixed).unwrap_or_default();

    rsx! {
        form {
            class: "merchandise-form",
            onsubmit: move |evt: FormEvent| evt.prevent_default(),
            h1 { "Transport de Marchandises" }

            section { class: "merchandise-details-section",
                h2 { "Marchandise Expédiée" }
                div { class: "form-grid",
                    FormField { label: "Nom", error: error_for(FieldKey::Name),
                        TextInput {
                            value: merchandise.name.clone(),
                            input_type: "text",
                            placeholder: "Nom de la marchandise *",
                            invalid: errs.contains(FieldKey::Name),
                            oninput: move |value: String| edit_form(state, |f| f.merchandise.name = value),
                        }
                    }
                    FormField { label: "Poids (kg)", error: error_for(FieldKey::Weight),
                        TextInput {
                            value: weight_input(),
                            input_type: "number",
                            placeholder: "Poids (kg) *",
                            invalid: errs.contains(FieldKey::Weight),
                            oninput: move |value: String| {
                                let parsed = parse_decimal(&value);
                                weight_input.set(value);
                                edit_form(state, |f| f.merchandise.weight = parsed);
                            },
                        }
                    }
                    FormField { label: "Nombre de colis", error: error_for(FieldKey::PackageCount),
                        TextInput {
                            value: count_input(),
                            input_type: "number",
                            placeholder: "Nombre de colis *",
                            invalid: errs.contains(FieldKey::PackageCount),
                            oninput: move |value: String| {
                                let parsed = parse_count(&value);
                                count_input.set(value);
                                edit_form(state, |f| f.merchandise.package_count = parsed);
                            },
                        }
                    }
                }
                FormField { label: "Description", error: error_for(FieldKey::Description),
                    textarea {
                        class: theme::input_class(errs.contains(FieldKey::Description)),
                        placeholder: "Description de la marchandise *",
                        rows: "3",
                        value: "{merchandise.description}",
                        oninput: move |evt: FormEvent| {
                            let value = evt.value();
                            edit_form(state, |f| f.merchandise.description = value);
                        },
                    }
                }
            }

            div { class: "contact-grid",
                ContactSection {
                    title: "Expéditeur",
                    contact: form.sender.clone(),
                    keys: SENDER_KEYS,
                    errors: errs.clone(),
                    on_change: move |(field, value): (ContactField, String)| {
                        edit_form(state, |f| field.apply(&mut f.sender, value));
                    },
                }
                ContactSection {
                    title: "Destination",
                    contact: form.destination.clone(),
                    keys: DESTINATION_KEYS,
                    errors: errs.clone(),
                    on_change: move |(field, value): (ContactField, String)| {
                        edit_form(state, |f| field.apply(&mut f.destination, value));
                    },
                }
            }

            div { class: "form-group",
                label { class: "form-label", "Type de mouvement" }
                select {
                    class: "form-control",
                    value: form.movement.label(),
                    onchange: move |evt: FormEvent| {
                        if let Some(movement) = MovementType::from_label(&evt.value()) {
                            edit_form(state, |f| f.movement = movement);
                        }
                    },
                    for movement in MovementType::ALL {
                        option {
                            value: movement.label(),
                            selected: movement == form.movement,
                            "{movement.label()}"
                        }
                    }
                }
            }

            div { class: "form-group",
                label { class: "form-label", "Dimensions (cm) *" }
                div { class: "dimensions-inputs",
                    FormField { label: "Longueur", error: error_for(FieldKey::Length),
                        TextInput {
                            value: length_input(),
                            input_type: "number",
                            placeholder: "Longueur",
                            invalid: errs.contains(FieldKey::Length),
                            oninput: move |value: String| {
                                let parsed = parse_decimal(&value);
                                length_input.set(value);
                                edit_form(state, |f| f.merchandise.dimensions.length = parsed);
                            },
                        }
                    }
                    FormField { label: "Largeur", error: error_for(FieldKey::Width),
                        TextInput {
                            value: width_input(),
                            input_type: "number",
                            placeholder: "Largeur",
                            invalid: errs.contains(FieldKey::Width),
                            oninput: move |value: String| {
                                let parsed = parse_decimal(&value);
                                width_input.set(value);
                                edit_form(state, |f| f.merchandise.dimensions.width = parsed);
                            },
                        }
                    }
                    FormField { label: "Hauteur", error: error_for(FieldKey::Height),
                        TextInput {
                            value: height_text,
                            input_type: "number",
                            placeholder: "Hauteur",
                            invalid: errs.contains(FieldKey::Height),
                            disabled: !stackable,
                            oninput: move |value: String| {
                                let parsed = parse_decimal(&value);
                                height_input.set(value);
                                edit_form(state, |f| f.merchandise.dimensions.height = parsed);
                            },
                        }
                        if !stackable {
                            span { class: "info-message", "Hauteur fixée à 220cm (non gerbable)" }
                        }
                    }
                }
            }

            div { class: "form-group",
                label { class: "form-label", "Gerbable" }
                select {
                    class: "form-control",
                    value: if stackable { "Oui" } else { "Non" },
                    onchange: move |evt: FormEvent| {
                        let stackable = evt.value() != "Non";
                        // A blank height would otherwise fail validation behind a disabled input.
                        let prefill = !stackable && !(parse_decimal(&height_input()) > 0.0);
                        if prefill {
                            height_input.set(numeric_text(NON_STACKABLE_HEIGHT_CM));
                        }
                        edit_form(state, |f| {
                            f.merchandise.is_stackable = stackable;
                            if prefill {
                                f.merchandise.dimensions.height = NON_STACKABLE_HEIGHT_CM;
                            }
                        });
                    },
                    option { value: "Oui", selected: stackable, "Oui" }
                    option { value: "Non", selected: !stackable, "Non" }
                }
            }

            div { class: "form-group",
                label { class: "form-label", "Mode de transport" }
                select {
                    class: "form-control",
                    value: form.transport.code(),
                    onchange: move |evt: FormEvent| {
                        if let Some(transport) = TransportType::from_code(&evt.value()) {
                            edit_form(state, |f| f.transport = transport);
                        }
                    },
                    for transport in TransportType::ALL {
                        option {
                            value: transport.code(),
                            selected: transport == form.transport,
                            "{transport.label()}"
                        }
                    }
                }
            }

            section { class: "incoterms-section",
                h3 { "Incoterms" }
                div { class: "incoterms-container",
                    for term in Incoterm::ALL {
                        label { class: "incoterm-option",
                            input {
                                r#type: "checkbox",
                                class: "incoterm-checkbox",
                                checked: form.incoterms.contains(&term),
                                onchange: move |_| edit_form(state, |f| f.toggle_incoterm(term)),
                            }
                            span { class: "incoterm-code", "{term.code()}" }
                            span { class: "incoterm-description", "{term.description()}" }
                        }
                    }
                }
                if let Some(message) = error_for(FieldKey::Incoterms) {
                    div { class: "invalid-feedback", "{message}" }
                }
            }

            button {
                class: "{theme::BTN_PRIMARY} calculate-button",
                r#type: "button",
                onclick: on_calculate,
                "Calculer Volume"
            }
            div { class: "volume-result",
                p { "Volume total (CBM): {volume_text} m³" }
            }
        }

        if let Some(current) = dialog() {
            QuoteDialogView {
                dialog: current,
                form: form.clone(),
                on_country: move |code: String| {
                    dialog.with_mut(|open| {
                        if let Some(open) = open.as_mut() {
                            open.select_country(&code);
                        }
                    });
                },
                on_cancel: move |_| dialog.set(None),
                on_save: move |_| save_quote(),
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ContactField {
    Name,
    Address,
    Email,
    Phone,
}

impl ContactField {
    const ALL: [ContactField; 4] = [
        ContactField::Name,
        ContactField::Address,
        ContactField::Email,
        ContactField::Phone,
    ];

    fn placeholder(self) -> &'static str {
        match self {
            ContactField::Name => "Nom *",
            ContactField::Address => "Adresse *",
            ContactField::Email => "Email *",
            ContactField::Phone => "Téléphone *",
        }
    }

    fn input_type(self) -> &'static str {
        match self {
            ContactField::Email => "email",
            ContactField::Phone => "tel",
            _ => "text",
        }
    }

    fn read(self, contact: &Contact) -> String {
        match self {
            ContactField::Name => contact.name.clone(),
            ContactField::Address => contact.address.clone(),
            ContactField::Email => contact.email.clone(),
            ContactField::Phone => contact.phone.clone(),
        }
    }

    fn apply(self, contact: &mut Contact, value: String) {
        match self {
            ContactField::Name => contact.name = value,
            ContactField::Address => contact.address = value,
            ContactField::Email => contact.email = value,
            ContactField::Phone => contact.phone = value,
        }
    }
}

/// Validation keys in `ContactField::ALL` order.
const SENDER_KEYS: [FieldKey; 4] = [
    FieldKey::SenderName,
    FieldKey::SenderAddress,
    FieldKey::SenderEmail,
    FieldKey::SenderPhone,
];
const DESTINATION_KEYS: [FieldKey; 4] = [
    FieldKey::DestName,
    FieldKey::DestAddress,
    FieldKey::DestEmail,
    FieldKey::DestPhone,
];

#[component]
fn ContactSection(
    title: &'static str,
    contact: Contact,
    keys: [FieldKey; 4],
    errors: FormErrors,
    on_change: EventHandler<(ContactField, String)>,
) -> Element {
    rsx! {
        section { class: "contact-section",
            h2 { "{title}" }
            for (field, key) in ContactField::ALL.into_iter().zip(keys) {
                div { class: "form-group",
                    TextInput {
                        value: field.read(&contact),
                        input_type: field.input_type(),
                        placeholder: field.placeholder(),
                        invalid: errors.contains(key),
                        oninput: move |value: String| on_change.call((field, value)),
                    }
                    if let Some(message) = errors.get(key) {
                        div { class: "invalid-feedback", "{message}" }
                    }
                }
            }
        }
    }
}

fn edit_form(mut state: Signal<AppState>, apply: impl FnOnce(&mut ShipmentForm)) {
    state.with_mut(|st| apply(&mut st.form));
}

fn numeric_text(value: f64) -> String {
    if value > 0.0 {
        value.to_string()
    } else {
        String::new()
    }
}

fn count_text(value: u32) -> String {
    if value > 0 {
        value.to_string()
    } else {
        String::new()
    }
}

/// Blank input reads as zero; anything unparseable or not finite ("inf",
/// "1e400") becomes NaN so the validator rejects it instead of treating it
/// as empty.
fn parse_decimal(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(f64::NAN)
}

fn parse_count(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_parsing_distinguishes_blank_from_garbage() {
        assert_eq!(parse_decimal(""), 0.0);
        assert_eq!(parse_decimal("  "), 0.0);
        assert_eq!(parse_decimal("12.5"), 12.5);
        assert_eq!(parse_decimal("12,5"), 12.5);
        assert!(parse_decimal("abc").is_nan());
    }

    #[test]
    fn non_finite_decimals_read_as_invalid() {
        for raw in ["inf", "-inf", "infinity", "NaN", "1e400"] {
            assert!(parse_decimal(raw).is_nan(), "{raw} should be rejected");
        }
        assert_eq!(parse_decimal("1e3"), 1000.0);
    }

    #[test]
    fn package_count_defaults_to_zero() {
        assert_eq!(parse_count("3"), 3);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("-2"), 0);
        assert_eq!(parse_count("2.5"), 0);
    }

    #[test]
    fn blank_numbers_render_as_empty_inputs() {
        assert_eq!(numeric_text(0.0), "");
        assert_eq!(numeric_text(f64::NAN), "");
        assert_eq!(numeric_text(220.0), "220");
        assert_eq!(count_text(0), "");
        assert_eq!(count_text(1), "1");
    }

    #[test]
    fn contact_fields_write_their_own_slot() {
        let mut contact = Contact::default();
        for field in ContactField::ALL {
            field.apply(&mut contact, format!("{field:?}"));
        }
        assert_eq!(contact.name, "Name");
        assert_eq!(contact.address, "Address");
        assert_eq!(ContactField::Phone.read(&contact), "Phone");
    }
}
