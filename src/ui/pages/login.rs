use dioxus::prelude::*;

use crate::app::{Route, Services};
use crate::domain::AppState;
use crate::ui::components::api_status::ApiStatusLine;
use crate::ui::theme;

#[component]
pub fn LoginPage() -> Element {
    let services = use_context::<Services>();
    let mut state = use_context::<Signal<AppState>>();
    let nav = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut loading = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        let Some(api) = services.api.clone() else {
            error.set(Some("API client unavailable".to_string()));
            return;
        };
        let email_value = email().trim().to_string();
        let password_value = password();
        if email_value.is_empty() || password_value.is_empty() {
            error.set(Some("Please enter your email and password.".to_string()));
            return;
        }

        error.set(None);
        loading.set(true);
        spawn(async move {
            let outcome = api.login(&email_value, &password_value).await;
            loading.set(false);
            match outcome {
                Ok(auth) => match auth.token {
                    Some(token) => {
                        state.with_mut(|st| st.session = Some(token));
                        nav.push(Route::Home {});
                    }
                    None => error.set(Some(
                        "Failed to login. The server did not return a session.".to_string(),
                    )),
                },
                Err(err) => {
                    if err.is_unauthorized() {
                        password.set(String::new());
                    }
                    error.set(Some(err.user_message()));
                }
            }
        });
    };

    let submit_label = if loading() { "Logging in..." } else { "Login" };

    rsx! {
        div { class: "auth-container",
            div { class: "auth-card",
                h2 { "Login" }
                if let Some(message) = error() {
                    div { class: "auth-error", "{message}" }
                }
                ApiStatusLine {}
                form { class: "auth-form", onsubmit: on_submit,
                    div { class: "form-group",
                        label { class: "form-label", "Email" }
                        input {
                            class: "form-control",
                            r#type: "email",
                            value: "{email}",
                            oninput: move |evt| email.set(evt.value()),
                        }
                    }
                    div { class: "form-group",
                        label { class: "form-label", "Password" }
                        input {
                            class: "form-control",
                            r#type: "password",
                            value: "{password}",
                            oninput: move |evt| password.set(evt.value()),
                        }
                    }
                    button {
                        class: theme::BTN_PRIMARY,
                        r#type: "submit",
                        disabled: loading(),
                        "{submit_label}"
                    }
                }
                p { class: "auth-switch",
                    "Don't have an account? "
                    button {
                        class: "link-button",
                        onclick: move |_| { nav.push(Route::Register {}); },
                        "Register"
                    }
                }
            }
        }
    }
}
