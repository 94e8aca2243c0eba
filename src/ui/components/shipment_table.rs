use dioxus::prelude::*;

use crate::domain::StoredShipment;
use crate::ui::components::shipment_card::DeleteControls;
use crate::ui::theme::{self, format_fixed};

#[component]
pub fn ShipmentTable(
    shipments: Vec<StoredShipment>,
    confirming: Option<String>,
    on_delete: EventHandler<String>,
    on_confirm: EventHandler<String>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "table-responsive",
            table { class: "shipment-table",
                thead {
                    tr {
                        th { "Date" }
                        th { "Merchandise" }
                        th { "Sender" }
                        th { "Destination" }
                        th { "Country" }
                        th { "Incoterms" }
                        th { "Volume (CBM)" }
                        th { "Price (EUR)" }
                        th { "Price (TND)" }
                        th {}
                    }
                }
                tbody {
                    for shipment in shipments {
                        ShipmentRow {
                            key: "{shipment.id}",
                            confirming: confirming.as_deref() == Some(shipment.id.as_str()),
                            shipment: shipment.clone(),
                            on_delete,
                            on_confirm,
                            on_cancel,
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ShipmentRow(
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

    rsx! {
        tr {
            td { "{created}" }
            td { "{record.merchandise.name}" }
            td { "{record.sender.name}" }
            td { "{record.destination.name}" }
            td { "{record.country}" }
            td { "{terms}" }
            td { class: "numeric", "{volume}" }
            td { class: "numeric", "{eur}" }
            td { class: "numeric", "{tnd}" }
            td {
                DeleteControls {
                    id: shipment.id.clone(),
                    confirming,
                    on_delete,
                    on_confirm,
                    on_cancel,
                }
            }
        }
    }
}
