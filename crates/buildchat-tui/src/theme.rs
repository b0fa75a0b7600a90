//! Catppuccin-based color palettes for the TUI.

use ratatui::style::Color;
use std::str::FromStr;

/// Spinner frames shown while a request is outstanding.
pub const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub base: Color,
    pub surface: Color,

    // Foregrounds
    pub text: Color,
    pub muted: Color,

    // Accents
    pub primary: Color,

    // Semantic
    pub error: Color,

    // Message blocks
    pub user_bubble: Color,
    pub user_text: Color,
    pub system_bubble: Color,
    pub system_text: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (default dark theme).
    pub fn mocha() -> Self {
        Self {
            base: Color::Rgb(30, 30, 46),  // #1e1e2e
            surface: Color::Rgb(49, 50, 68), // #313244

            text: Color::Rgb(205, 214, 244),  // #cdd6f4
            muted: Color::Rgb(108, 112, 134), // #6c7086

            primary: Color::Rgb(137, 180, 250), // #89b4fa (blue)

            error: Color::Rgb(243, 139, 168), // #f38ba8 (red)

            user_bubble: Color::Rgb(30, 102, 245), // #1e66f5
            user_text: Color::Rgb(255, 255, 255),
            system_bubble: Color::Rgb(69, 71, 90), // #45475a
            system_text: Color::Rgb(205, 214, 244),

            border: Color::Rgb(69, 71, 90),             // #45475a
            border_focused: Color::Rgb(180, 190, 254), // #b4befe (lavender)
        }
    }

    /// Catppuccin Latte theme (light theme).
    pub fn latte() -> Self {
        Self {
            base: Color::Rgb(239, 241, 245),    // #eff1f5
            surface: Color::Rgb(230, 233, 239), // #e6e9ef

            text: Color::Rgb(76, 79, 105),    // #4c4f69
            muted: Color::Rgb(140, 143, 161), // #8c8fa1

            primary: Color::Rgb(30, 102, 245), // #1e66f5 (blue)

            error: Color::Rgb(210, 15, 57), // #d20f39 (red)

            user_bubble: Color::Rgb(30, 102, 245),
            user_text: Color::Rgb(255, 255, 255),
            system_bubble: Color::Rgb(204, 208, 218), // #ccd0da
            system_text: Color::Rgb(76, 79, 105),

            border: Color::Rgb(188, 192, 204),          // #bcc0cc
            border_focused: Color::Rgb(114, 135, 253), // #7287fd (lavender)
        }
    }

    /// High contrast theme for accessibility.
    pub fn high_contrast() -> Self {
        Self {
            base: Color::Black,
            surface: Color::Rgb(20, 20, 20),

            text: Color::White,
            muted: Color::Rgb(150, 150, 150),

            primary: Color::Cyan,

            error: Color::Red,

            user_bubble: Color::Blue,
            user_text: Color::White,
            system_bubble: Color::Rgb(40, 40, 40),
            system_text: Color::White,

            border: Color::White,
            border_focused: Color::Cyan,
        }
    }
}

/// Named theme selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    HighContrast,
}

impl ThemeName {
    pub fn theme(self) -> Theme {
        match self {
            ThemeName::Dark => Theme::mocha(),
            ThemeName::Light => Theme::latte(),
            ThemeName::HighContrast => Theme::high_contrast(),
        }
    }
}

impl FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dark" | "mocha" => Ok(ThemeName::Dark),
            "light" | "latte" => Ok(ThemeName::Light),
            "high-contrast" | "contrast" => Ok(ThemeName::HighContrast),
            other => Err(format!(
                "unknown theme '{other}' (expected dark, light or high-contrast)"
            )),
        }
    }
}
