use dioxus::prelude::*;

use crate::app::{Route, Services};
use crate::infra::api::ApiError;
use crate::ui::components::api_status::ApiStatusLine;
use crate::ui::components::toast::{push_toast, ToastKind, ToastMessage};
use crate::ui::theme;

#[derive(Clone, Debug, Default, PartialEq)]
struct RegisterForm {
    name: String,
    email: String,
    password: String,
    confirm_password: String,
}

#[component]
pub fn RegisterPage() -> Element {
    let services = use_context::<Services>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let nav = use_navigator();

    let mut form = use_signal(RegisterForm::default);
    let mut error = use_signal(|| None::<String>);
    let mut loading = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        let values = form();
        if values.password != values.confirm_password {
            error.set(Some(ApiError::PasswordMismatch.to_string()));
            return;
        }
        let Some(api) = services.api.clone() else {
            error.set(Some("API client unavailable".to_string()));
            return;
        };

        error.set(None);
        loading.set(true);
        spawn(async move {
            let outcome = api
                .register(
                    values.name.trim(),
                    values.email.trim(),
                    &values.password,
                    &values.confirm_password,
                )
                .await;
            loading.set(false);
            match outcome {
                Ok(_) => {
                    push_toast(toasts, ToastKind::Success, "Account created. Please log in.");
                    nav.push(Route::Login {});
                }
                Err(err) => error.set(Some(err.user_message())),
            }
        });
    };

    let values = form();
    let submit_label = if loading() { "Registering..." } else { "Register" };

    rsx! {
        div { class: "auth-container",
            div { class: "auth-card",
                h2 { "Register" }
                if let Some(message) = error() {
                    div { class: "auth-error", "{message}" }
                }
                ApiStatusLine {}
                form { class: "auth-form", onsubmit: on_submit,
                    div { class: "form-group",
                        label { class: "form-label", "Full Name" }
                        input {
                            class: "form-control",
                            r#type: "text",
                            value: "{values.name}",
                            oninput: move |evt| form.with_mut(|f| f.name = evt.value()),
                        }
                    }
                    div { class: "form-group",
                        label { class: "form-label", "Email" }
                        input {
                            class: "form-control",
                            r#type: "email",
                            value: "{values.email}",
                            oninput: move |evt| form.with_mut(|f| f.email = evt.value()),
                        }
                    }
                    div { class: "form-group",
                        label { class: "form-label", "Password" }
                        input {
                            class: "form-control",
                            r#type: "password",
                            value: "{values.password}",
                            oninput: move |evt| form.with_mut(|f| f.password = evt.value()),
                        }
                    }
                    div { class: "form-group",
                        label { class: "form-label", "Confirm Password" }
                        input {
                            class: "form-control",
                            r#type: "password",
                            value: "{values.confirm_password}",
                            oninput: move |evt| form.with_mut(|f| f.confirm_password = evt.value()),
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
                    "Already have an account? "
                    button {
                        class: "link-button",
                        onclick: move |_| { nav.push(Route::Login {}); },
                        "Login"
                    }
                }
            }
        }
    }
}
