use dioxus::prelude::*;

use crate::app::Services;
use crate::domain::HealthStatus;

/// One-shot connection probe shown above the auth forms.
#[component]
pub fn ApiStatusLine() -> Element {
    let services = use_context::<Services>();
    let probe = use_resource(move || {
        let api = services.api.clone();
        async move {
            let Some(api) = api else {
                return Err("API client unavailable".to_string());
            };
            api.check_connection()
                .await
                .map(|report| report.to_status())
                .map_err(|err| err.user_message())
        }
    });

    let (class, message) = match &*probe.read() {
        None => ("api-status pending", "Checking API connection...".to_string()),
        Some(Ok(HealthStatus::Up)) => ("api-status success", "API connected successfully".to_string()),
        Some(Ok(status)) => {
            let reason = status.error().unwrap_or(status.label());
            ("api-status error", format!("API connection failed: {reason}"))
        }
        Some(Err(reason)) => ("api-status error", format!("API connection failed: {reason}")),
    };

    rsx! {
        div { class: class, "{message}" }
    }
}
