use std::time::SystemTime;

use super::entities::{ShipmentForm, ViewMode};

/// What the API's health endpoint last told us.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HealthStatus {
    #[default]
    Checking,
    Up,
    Down(Option<String>),
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Checking => "CHECKING",
            HealthStatus::Up => "UP",
            HealthStatus::Down(_) => "DOWN",
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            HealthStatus::Down(reason) => reason.as_deref(),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Opaque token from the auth API; its presence means "logged in".
    pub session: Option<String>,
    pub view_mode: ViewMode,
    pub health: HealthStatus,
    pub health_checked_at: Option<SystemTime>,
    /// Kept here so navigating away and back does not lose a half-filled form.
    pub form: ShipmentForm,
}

impl AppState {
    pub fn restore(session: Option<String>, view_mode: ViewMode) -> Self {
        Self {
            session,
            view_mode,
            ..Self::default()
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn record_health(&mut self, status: HealthStatus, checked_at: SystemTime) {
        self.health = status;
        self.health_checked_at = Some(checked_at);
    }

    pub fn sign_out(&mut self) {
        self.session = None;
        self.form = ShipmentForm::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_out_clears_session_and_form() {
        let mut state = AppState::restore(Some("token".to_string()), ViewMode::List);
        state.form.merchandise.name = "Draft".to_string();
        assert!(state.is_logged_in());

        state.sign_out();
        assert!(!state.is_logged_in());
        assert_eq!(state.form, ShipmentForm::default());
        assert_eq!(state.view_mode, ViewMode::List);
    }

    #[test]
    fn health_down_carries_reason() {
        let mut state = AppState::default();
        assert_eq!(state.health.label(), "CHECKING");
        state.record_health(
            HealthStatus::Down(Some("connection refused".to_string())),
            SystemTime::now(),
        );
        assert_eq!(state.health.label(), "DOWN");
        assert_eq!(state.health.error(), Some("connection refused"));
        assert!(state.health_checked_at.is_some());
    }
}
