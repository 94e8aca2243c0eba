use dioxus::prelude::*;

use crate::ui::theme;

/// Label, control and inline validation message.
#[component]
pub fn FormField(label: &'static str, error: Option<String>, children: Element) -> Element {
    rsx! {
        div { class: "form-group",
            label { class: "form-label", "{label}" }
            {children}
            if let Some(message) = error {
                div { class: "invalid-feedback", "{message}" }
            }
        }
    }
}

#[component]
pub fn TextInput(
    value: String,
    input_type: &'static str,
    placeholder: &'static str,
    invalid: bool,
    #[props(default)] disabled: bool,
    oninput: EventHandler<String>,
) -> Element {
    rsx! {
        input {
            class: theme::input_class(invalid),
            r#type: input_type,
            value: "{value}",
            placeholder: placeholder,
            disabled: disabled,
            oninput: move |evt: FormEvent| oninput.call(evt.value()),
        }
    }
}
