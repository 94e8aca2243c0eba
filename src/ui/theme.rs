//! Class helpers and display formatting shared across pages.

use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};

use crate::domain::{HealthStatus, ViewMode};

// ============================================
// BUTTON STYLES
// ============================================

pub const BTN_PRIMARY: &str = "btn btn-primary";
pub const BTN_SECONDARY: &str = "btn btn-secondary";
pub const BTN_DANGER: &str = "btn btn-danger";

pub fn view_toggle(current: ViewMode, target: ViewMode) -> &'static str {
    if current == target {
        "btn btn-toggle active"
    } else {
        "btn btn-toggle"
    }
}

pub fn nav_link(active: bool) -> &'static str {
    if active {
        "nav-link active"
    } else {
        "nav-link"
    }
}

// ============================================
// FORM STYLES
// ============================================

pub fn input_class(has_error: bool) -> &'static str {
    if has_error {
        "form-control is-invalid"
    } else {
        "form-control"
    }
}

// ============================================
// STATUS STYLES
// ============================================

pub fn health_class(status: &HealthStatus) -> &'static str {
    match status {
        HealthStatus::Checking => "health-indicator checking",
        HealthStatus::Up => "health-indicator up",
        HealthStatus::Down(_) => "health-indicator down",
    }
}

// ============================================
// FORMATTING
// ============================================

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[day]/[month]/[year] [hour]:[minute]");

/// Two decimals, the way amounts and volumes are shown everywhere.
pub fn format_fixed(value: f64) -> String {
    format!("{value:.2}")
}

pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(TIMESTAMP_FORMAT)
        .map(|formatted| format!("{formatted} UTC"))
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn fixed_formatting_keeps_two_decimals() {
        assert_eq!(format_fixed(0.2), "0.20");
        assert_eq!(format_fixed(110.0), "110.00");
        assert_eq!(format_fixed(368.5 * 0.2), "73.70");
    }

    #[test]
    fn timestamps_render_day_first() {
        let at = datetime!(2024-03-05 14:07:00 UTC);
        assert_eq!(format_timestamp(at), "05/03/2024 14:07 UTC");
    }

    #[test]
    fn toggle_marks_the_current_mode() {
        assert_eq!(view_toggle(ViewMode::List, ViewMode::List), "btn btn-toggle active");
        assert_eq!(view_toggle(ViewMode::List, ViewMode::Card), "btn btn-toggle");
    }
}
