use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::domain::{countries, join_incoterms, PriceLine, QuoteDialog, ShipmentForm};
use crate::ui::theme::{self, format_fixed};

#[component]
pub fn QuoteDialogView(
    dialog: QuoteDialog,
    form: ShipmentForm,
    on_country: EventHandler<String>,
    on_cancel: EventHandler<()>,
    on_save: EventHandler<()>,
) -> Element {
    let today = theme::format_timestamp(OffsetDateTime::now_utc());
    let selected = dialog.country.clone().unwrap_or_default();
    let volume = dialog.volume_cbm.map(format_fixed).unwrap_or_else(|| "-".to_string());
    let breakdown = dialog.breakdown();
    let merchandise = &form.merchandise;
    let terms = join_incoterms(&form.incoterms);
    let stacking = if merchandise.is_stackable { "Yes" } else { "No" };

    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal-dialog",
                div { class: "modal-header",
                    h2 { "Shipment quote" }
                    span { class: "modal-date", "{today}" }
                }
                div { class: "modal-body",
                    section { class: "quote-summary",
                        h3 { "Merchandise" }
                        dl {
                            dt { "Name" } dd { "{merchandise.name}" }
                            dt { "Packages" } dd { "{merchandise.package_count}" }
                            dt { "Weight" } dd { "{merchandise.weight} kg" }
                            dt { "Stackable" } dd { "{stacking}" }
                            dt { "Volume" } dd { "{volume} CBM" }
                            dt { "Transport" } dd { "{form.transport.label()} / {form.movement.label()}" }
                            dt { "Incoterms" } dd { "{terms}" }
                        }
                    }
                    section { class: "quote-contacts",
                        div {
                            h3 { "Sender" }
                            p { "{form.sender.name}" }
                            p { class: "muted", "{form.sender.address}" }
                        }
                        div {
                            h3 { "Destination" }
                            p { "{form.destination.name}" }
                            p { class: "muted", "{form.destination.address}" }
                        }
                    }
                    div { class: "form-group",
                        label { class: "form-label", "Destination country" }
                        select {
                            class: "form-control",
                            value: "{selected}",
                            onchange: move |evt: FormEvent| on_country.call(evt.value()),
                            option { value: "", "Select a country" }
                            for entry in countries() {
                                option {
                                    value: entry.code,
                                    selected: entry.code == selected,
                                    "{entry.code} - {entry.rates.eur}€/CBM"
                                }
                            }
                        }
                    }
                    if let Some(breakdown) = breakdown {
                        div { class: "quote-breakdown",
                            PriceTable { currency: "EUR", line: breakdown.eur }
                            PriceTable { currency: "TND", line: breakdown.tnd }
                        }
                    }
                }
                div { class: "modal-footer",
                    button {
                        class: theme::BTN_SECONDARY,
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        class: theme::BTN_PRIMARY,
                        onclick: move |_| on_save.call(()),
                        "Save"
                    }
                }
            }
        }
    }
}

#[component]
fn PriceTable(currency: &'static str, line: PriceLine) -> Element {
    let volume = format_fixed(line.volume_cbm);
    let rate = format_fixed(line.unit_rate);
    let total = format_fixed(line.total);

    rsx! {
        table { class: "price-table",
            caption { "{currency}" }
            tbody {
                tr { th { "Volume (CBM)" } td { "{volume}" } }
                tr { th { "Rate per CBM" } td { "{rate}" } }
                tr { class: "total", th { "Total" } td { "{total} {currency}" } }
            }
        }
    }
}
