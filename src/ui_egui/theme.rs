//! Theme for the booking grid.
//!
//! Defines the GridTheme structure and the status-to-color mapping used
//! by booking blocks.

use egui::Color32;

use crate::models::booking::BookingStatus;

/// Colors used by the dashboard.
#[derive(Debug, Clone)]
pub struct GridTheme {
    pub is_dark: bool,

    /// Application background color
    pub app_background: Color32,

    /// Grid row background color
    pub row_background: Color32,

    /// Alternating row background color
    pub row_background_alt: Color32,

    /// Whole-hour grid line color
    pub hour_line: Color32,

    /// Half-hour grid line color
    pub half_hour_line: Color32,

    /// Current-time indicator color
    pub now_line: Color32,

    /// Primary text color
    pub text_primary: Color32,

    /// Secondary text color (row labels, time scale)
    pub text_secondary: Color32,

    /// Outline drawn around blocks with a staged change
    pub pending_outline: Color32,

    /// Fill tint for conflicting previews
    pub conflict_fill: Color32,
}

impl GridTheme {
    /// Create the default Light theme
    pub fn light() -> Self {
        Self {
            is_dark: false,
            app_background: Color32::from_rgb(245, 245, 245),
            row_background: Color32::from_rgb(255, 255, 255),
            row_background_alt: Color32::from_rgb(249, 249, 251),
            hour_line: Color32::from_rgb(200, 200, 205),
            half_hour_line: Color32::from_rgb(228, 228, 232),
            now_line: Color32::from_rgb(255, 100, 100),
            text_primary: Color32::from_rgb(40, 40, 40),
            text_secondary: Color32::from_rgb(100, 100, 100),
            pending_outline: Color32::from_rgb(255, 160, 40),
            conflict_fill: Color32::from_rgba_unmultiplied(220, 60, 60, 90),
        }
    }

    /// Create the default Dark theme
    pub fn dark() -> Self {
        Self {
            is_dark: true,
            app_background: Color32::from_rgb(28, 28, 30),
            row_background: Color32::from_rgb(36, 36, 40),
            row_background_alt: Color32::from_rgb(42, 42, 47),
            hour_line: Color32::from_rgb(70, 70, 78),
            half_hour_line: Color32::from_rgb(54, 54, 60),
            now_line: Color32::from_rgb(255, 110, 110),
            text_primary: Color32::from_rgb(230, 230, 230),
            text_secondary: Color32::from_rgb(150, 150, 155),
            pending_outline: Color32::from_rgb(255, 170, 60),
            conflict_fill: Color32::from_rgba_unmultiplied(230, 70, 70, 110),
        }
    }

    pub fn by_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    /// Block fill for a booking status. Unknown labels get the default.
    pub fn status_color(&self, status: &BookingStatus) -> Color32 {
        match status {
            BookingStatus::Confirmed => Color32::from_rgb(80, 145, 90),
            BookingStatus::NewBooking => Color32::from_rgb(90, 130, 200),
            BookingStatus::Other(_) => Color32::from_rgb(130, 130, 140),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_gets_default_color() {
        let theme = GridTheme::light();
        let default = theme.status_color(&BookingStatus::Other("waitlisted".to_string()));
        let confirmed = theme.status_color(&BookingStatus::Confirmed);
        assert_ne!(default, confirmed);
        assert_eq!(
            default,
            theme.status_color(&BookingStatus::Other("anything".to_string()))
        );
    }

    #[test]
    fn test_by_name_falls_back_to_light() {
        assert!(!GridTheme::by_name("unknown").is_dark);
        assert!(GridTheme::by_name("dark").is_dark);
    }
}
