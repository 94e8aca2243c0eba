use std::rc::Rc;
use std::time::SystemTime;

use dioxus::{prelude::*, signals::Signal};
use tracing::{error, info, warn};

use crate::{
    domain::{AppState, HealthStatus},
    infra::{api::ApiClient, shipment_log::ShipmentLog},
    ui::{
        components::toast::{Toast, ToastMessage},
        pages::{HistoryPage, LoginPage, MerchandisePage, RegisterPage},
        shell::Shell,
    },
    util::{
        assets,
        config::AppConfig,
        persistence::{clear_token, load_token, load_view_mode, FileStore},
    },
};

pub type AppLog = ShipmentLog<FileStore>;
pub type AppApi = ApiClient<FileStore>;

/// Long-lived collaborators shared with every page through context.
#[derive(Clone)]
pub struct Services {
    pub config: AppConfig,
    pub store: FileStore,
    pub log: Rc<AppLog>,
    /// `None` when the HTTP client could not be built; pages then report the
    /// API as unavailable instead of failing.
    pub api: Option<AppApi>,
}

impl Services {
    pub fn from_config(config: AppConfig) -> Self {
        let store = FileStore::new(&config.data_dir);
        info!(data_dir = %store.root().display(), "opening local data");
        let api = ApiClient::new(&config, store.clone())
            .map_err(|err| error!("failed to initialise API client: {err}"))
            .ok();
        if let Some(api) = &api {
            info!(api = %api.base_url(), "API client ready");
        }
        Self {
            log: Rc::new(ShipmentLog::new(store.clone())),
            store,
            api,
            config,
        }
    }

    pub fn session_token(&self) -> Option<String> {
        load_token(&self.store)
    }

    pub fn logout(&self) {
        match &self.api {
            Some(api) => api.logout(),
            None => {
                if let Err(err) = clear_token(&self.store) {
                    warn!("failed to clear session token: {err}");
                }
            }
        }
    }
}

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/history")]
    History {},
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
}

#[component]
pub fn App() -> Element {
    let services = use_hook(|| Services::from_config(AppConfig::from_env()));
    use_context_provider(|| services.clone());

    let state = use_signal({
        let services = services.clone();
        move || AppState::restore(services.session_token(), load_view_mode(&services.store))
    });
    use_context_provider(|| state);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    let _health = use_future({
        let services = services.clone();
        move || {
            let services = services.clone();
            async move { poll_health(services, state).await }
        }
    });

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

/// Refreshes the health indicator forever. Also notices when a 401 somewhere
/// evicted the stored token and drops the in-memory session with it.
async fn poll_health(services: Services, mut state: Signal<AppState>) {
    let Some(api) = services.api else {
        state.with_mut(|st| {
            st.record_health(
                HealthStatus::Down(Some("API client unavailable".to_string())),
                SystemTime::now(),
            )
        });
        return;
    };

    loop {
        let report = api.health().await;
        let token = api.session_token();
        state.with_mut(|st| {
            st.record_health(report.to_status(), SystemTime::now());
            if st.is_logged_in() && token.is_none() {
                info!("session token no longer stored, signing out");
                st.sign_out();
            }
        });
        tokio::time::sleep(services.config.health_interval).await;
    }
}

#[component]
pub fn Home() -> Element {
    rsx! { Shell { MerchandisePage {} } }
}

#[component]
pub fn History() -> Element {
    rsx! { Shell { HistoryPage {} } }
}

#[component]
pub fn Login() -> Element {
    rsx! { LoginPage {} }
}

#[component]
pub fn Register() -> Element {
    rsx! { RegisterPage {} }
}
