use dioxus::prelude::*;

use crate::app::{Route, Services};
use crate::domain::AppState;
use crate::ui::components::health_badge::HealthBadge;
use crate::ui::components::toast::{push_toast, ToastKind, ToastMessage};
use crate::ui::pages::LoginPage;
use crate::ui::theme;

#[component]
pub fn Shell(children: Element) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let services = use_context::<Services>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    // Pages behind the shell need a session.
    if !state.with(|st| st.is_logged_in()) {
        return rsx! { LoginPage {} };
    }

    let on_logout = move |_: MouseEvent| {
        services.logout();
        state.with_mut(|st| st.sign_out());
        push_toast(toasts, ToastKind::Info, "You have been logged out.");
        nav.push(Route::Login {});
    };

    rsx! {
        div { class: "app-shell",
            header { class: "navbar",
                span { class: "navbar-brand", "Transport Management" }
                nav { class: "navbar-nav",
                    NavButton {
                        active: matches!(current_route, Route::Home {}),
                        onclick: move |_| { nav.push(Route::Home {}); },
                        label: "Home",
                    }
                    NavButton {
                        active: matches!(current_route, Route::History {}),
                        onclick: move |_| { nav.push(Route::History {}); },
                        label: "Historique",
                    }
                }
                button { class: "btn btn-logout", onclick: on_logout, "Logout" }
            }
            HealthBadge {}
            main { class: "container",
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    rsx! {
        button {
            class: theme::nav_link(active),
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
