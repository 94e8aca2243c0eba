use dioxus::prelude::*;

use crate::domain::StoredShipment;
use crate::ui::theme::{self, format_fixed};

#[component]
pub fn ShipmentCard(
    shipment: StoredShipment,
    confirming: bool,
    on_delete: EventHandler<String>,
    on_confirm: EventHandler<String>,
    on_cancel: EventHandler<()>,
) -> Element {
    let record = &shipment.record;
    let created = theme::format_timestamp(shipment.created_at);
    let volume = format_fixed(record.volume_cbm);
    let eur = format_fixed(record.price.eur);
    let tnd = format_fixed(record.price.tnd);
    let terms = record.incoterms_label();
    let id = shipment.id.clone();

    rsx! {
        article { class: "shipment-card",
            header { class: "shipment-card-header",
                h3 { "{record.merchandise.name}" }
                span { class: "badge", "{record.country}" }
            }
            p { class: "muted", "{created}" }
            p { class: "shipment-description", "{record.merchandise.description}" }
            dl {
                dt { "From" } dd { "{record.sender.name}" }
                dt { "To" } dd { "{record.destination.name}" }
                dt { "Transport" } dd { "{record.transport.label()} / {record.movement.label()}" }
                dt { "Incoterms" } dd { "{terms}" }
                dt { "Packages" } dd { "{record.merchandise.package_count} ({record.merchandise.weight} kg)" }
                dt { "Volume" } dd { "{volume} CBM" }
            }
            div { class: "shipment-price",
                span { "{eur} €" }
                span { "{tnd} TND" }
            }
            DeleteControls { id, confirming, on_delete, on_confirm, on_cancel }
        }
    }
}

/// Two-step delete: the first click asks, the second one deletes.
#[component]
pub fn DeleteControls(
    id: String,
    confirming: bool,
    on_delete: EventHandler<String>,
    on_confirm: EventHandler<String>,
    on_cancel: EventHandler<()>,
) -> Element {
    if confirming {
        let target = id.clone();
        return rsx! {
            div { class: "delete-confirm",
                span { "Delete this shipment?" }
                button {
                    class: theme::BTN_DANGER,
                    onclick: move |_| on_confirm.call(target.clone()),
                    "Confirm"
                }
                button {
                    class: theme::BTN_SECONDARY,
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
            }
        };
    }

    rsx! {
        button {
            class: theme::BTN_DANGER,
            onclick: move |_| on_delete.call(id.clone()),
            "Delete"
        }
    }
}
