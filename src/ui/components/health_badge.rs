use std::time::SystemTime;

use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::domain::AppState;
use crate::ui::theme;

#[component]
pub fn HealthBadge() -> Element {
    let state = use_context::<Signal<AppState>>();
    let (status, checked_at) = state.with(|st| (st.health.clone(), st.health_checked_at));
    let checked = checked_at
        .map(|at: SystemTime| theme::format_timestamp(OffsetDateTime::from(at)))
        .unwrap_or_else(|| "never".to_string());

    rsx! {
        div {
            class: theme::health_class(&status),
            span { class: "health-dot" }
            span { class: "health-label", "API {status.label()}" }
            span { class: "health-checked", "last check: {checked}" }
            if let Some(reason) = status.error() {
                span { class: "health-error", "{reason}" }
            }
        }
    }
}
