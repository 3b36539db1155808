//! Color theme system for imgrev.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface
//! imgrev renders. Two built-in themes are provided:
//!
//! - `dark` uses ANSI 16 colors (`Color::Reset`, `Color::DarkGray`, etc.) so it
//!   works on any terminal including 256-color SSH sessions with no truecolor support.
//! - `catppuccin_mocha` uses the Catppuccin Mocha palette in RGB and requires truecolor.

use imgrev_core::ReviewStatus;
use ratatui::style::Color;

/// All color values used across imgrev's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the currently focused panel.
    pub border_active: Color,
    /// Border color for unfocused panels.
    pub border_inactive: Color,

    // Review status badges
    pub status_unreviewed: Color,
    pub status_approved: Color,
    pub status_flagged: Color,

    // Text
    /// Labels and secondary text (comment ids, timestamps, field names).
    pub text_muted: Color,
    /// Body text.
    pub text: Color,
    /// Highlighted gallery row.
    pub selection: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    /// Mode indicator color when in NORMAL mode.
    pub status_mode_normal: Color,
    /// Mode indicator color when in INSERT mode.
    pub status_mode_insert: Color,
    /// Transient messages shown at the end of the status bar.
    pub status_message: Color,

    // General
    /// Application background (used for clearing areas).
    pub background: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            status_unreviewed: Color::DarkGray,
            status_approved: Color::Green,
            status_flagged: Color::Red,

            text_muted: Color::DarkGray,
            text: Color::Reset,
            selection: Color::Cyan,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            status_message: Color::Yellow,

            background: Color::Reset,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let base = Color::Rgb(30, 30, 46); // #1e1e2e
        let text = Color::Rgb(205, 214, 244); // #cdd6f4

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            status_unreviewed: overlay1,
            status_approved: green,
            status_flagged: red,

            text_muted: overlay1,
            text,
            selection: lavender,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
            status_message: yellow,

            background: base,
        }
    }

    /// Resolves a theme name string to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup. The fallback is logged as a warning.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!("unknown theme '{other}', falling back to 'dark'");
                Self::dark()
            }
        }
    }

    /// Badge color for a review status.
    pub fn status_color(&self, status: ReviewStatus) -> Color {
        match status {
            ReviewStatus::Unreviewed => self.status_unreviewed,
            ReviewStatus::Approved => self.status_approved,
            ReviewStatus::Flagged => self.status_flagged,
        }
    }
}
