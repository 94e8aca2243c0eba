use dioxus::prelude::*;
use tracing::{error, warn};

use crate::app::Services;
use crate::domain::{AppState, ViewMode};
use crate::infra::shipment_log::ShipmentLogError;
use crate::ui::components::shipment_card::ShipmentCard;
use crate::ui::components::shipment_table::ShipmentTable;
use crate::ui::components::toast::{push_toast, ToastKind, ToastMessage};
use crate::ui::theme;
use crate::util::persistence::{save_view_mode, FileStore};

#[component]
pub fn HistoryPage() -> Element {
    let services = use_context::<Services>();
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let mut refresh_key = use_signal(|| 0u32);
    let mut pending_delete = use_signal(|| None::<String>);
    let mut confirm_clear = use_signal(|| false);

    // Reading the key subscribes this render to Refresh and Delete.
    let _ = refresh_key();
    let shipments = match services.log.list() {
        Ok(shipments) => shipments,
        Err(err) => {
            error!("loading shipment history failed: {err}");
            return rsx! { HistoryFallback {} };
        }
    };
    let view_mode = state.with(|st| st.view_mode);
    let confirming = pending_delete();

    let on_refresh = {
        let log = services.log.clone();
        move |_: MouseEvent| {
            log.invalidate();
            pending_delete.set(None);
            confirm_clear.set(false);
            refresh_key.with_mut(|key| *key += 1);
        }
    };
    let on_card = {
        let store = services.store.clone();
        move |_: MouseEvent| switch_view(state, &store, ViewMode::Card)
    };
    let on_list = {
        let store = services.store.clone();
        move |_: MouseEvent| switch_view(state, &store, ViewMode::List)
    };
    let on_delete = {
        let log = services.log.clone();
        move |id: String| {
            // The row may be stale if another window changed the log.
            log.invalidate();
            match log.get(&id) {
                Ok(_) => pending_delete.set(Some(id)),
                Err(err) => {
                    warn!(%id, "shipment vanished before delete: {err}");
                    push_toast(toasts, ToastKind::Warning, delete_failure_text(&err));
                    pending_delete.set(None);
                    refresh_key.with_mut(|key| *key += 1);
                }
            }
        }
    };
    let on_confirm = {
        let log = services.log.clone();
        move |id: String| {
            match log.delete(&id) {
                Ok(removed) => push_toast(
                    toasts,
                    ToastKind::Success,
                    format!("Shipment \"{}\" deleted.", removed.record.merchandise.name),
                ),
                Err(err) => {
                    warn!(%id, "deleting shipment failed: {err}");
                    push_toast(toasts, ToastKind::Error, delete_failure_text(&err));
                }
            }
            pending_delete.set(None);
            refresh_key.with_mut(|key| *key += 1);
        }
    };
    let on_clear = {
        let log = services.log.clone();
        move |_: MouseEvent| {
            match log.clear() {
                Ok(()) => push_toast(toasts, ToastKind::Success, "Shipment history cleared."),
                Err(err) => {
                    warn!("clearing shipment history failed: {err}");
                    push_toast(
                        toasts,
                        ToastKind::Error,
                        "Failed to clear shipment history. Please try again.",
                    );
                }
            }
            confirm_clear.set(false);
            pending_delete.set(None);
            refresh_key.with_mut(|key| *key += 1);
        }
    };

    let count = shipments.len();

    rsx! {
        div { class: "shipment-history",
            div { class: "shipment-history-header",
                h2 { "Historique des expéditions ({count})" }
                div { class: "view-toggle",
                    button {
                        class: theme::view_toggle(view_mode, ViewMode::Card),
                        title: "Card View",
                        onclick: on_card,
                        "Cards"
                    }
                    button {
                        class: theme::view_toggle(view_mode, ViewMode::List),
                        title: "List View",
                        onclick: on_list,
                        "List"
                    }
                }
                button { class: theme::BTN_SECONDARY, onclick: on_refresh, "Refresh" }
                if count > 0 {
                    if confirm_clear() {
                        button { class: theme::BTN_DANGER, onclick: on_clear, "Confirm clear" }
                        button {
                            class: theme::BTN_SECONDARY,
                            onclick: move |_| confirm_clear.set(false),
                            "Cancel"
                        }
                    } else {
                        button {
                            class: theme::BTN_SECONDARY,
                            onclick: move |_| confirm_clear.set(true),
                            "Clear history"
                        }
                    }
                }
            }

            if shipments.is_empty() {
                div { class: "empty-message",
                    "No shipment history found. Save a shipment to see it here."
                }
            } else if view_mode == ViewMode::List {
                ShipmentTable {
                    shipments,
                    confirming,
                    on_delete: on_delete.clone(),
                    on_confirm,
                    on_cancel: move |_| pending_delete.set(None),
                }
            } else {
                div { class: "shipment-cards",
                    for shipment in shipments {
                        ShipmentCard {
                            key: "{shipment.id}",
                            confirming: confirming.as_deref() == Some(shipment.id.as_str()),
                            shipment: shipment.clone(),
                            on_delete: on_delete.clone(),
                            on_confirm: on_confirm.clone(),
                            on_cancel: move |_| pending_delete.set(None),
                        }
                    }
                }
            }
        }
    }
}

/// Shown instead of the list when the stored history cannot be read.
#[component]
fn HistoryFallback() -> Element {
    rsx! {
        div { class: "shipment-history error",
            div { class: "shipment-history-header" }
            div { class: "error-message",
                "An error occurred while loading the shipment history. "
                "Please refresh the page and try again."
            }
        }
    }
}

fn delete_failure_text(err: &ShipmentLogError) -> &'static str {
    if err.is_not_found() {
        "This shipment no longer exists. The list has been refreshed."
    } else {
        "Failed to delete shipment. Please try again."
    }
}

fn switch_view(mut state: Signal<AppState>, store: &FileStore, mode: ViewMode) {
    state.with_mut(|st| st.view_mode = mode);
    if let Err(err) = save_view_mode(store, mode) {
        warn!("failed to persist view mode: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_shipment_gets_its_own_delete_message() {
        let gone = ShipmentLogError::UnknownId("abc".to_string());
        assert!(delete_failure_text(&gone).contains("no longer exists"));

        let corrupt = ShipmentLogError::NonFinite("weight");
        assert_eq!(
            delete_failure_text(&corrupt),
            "Failed to delete shipment. Please try again."
        );
    }
}
