//! Light/dark themes and their palettes
//!
//! The theme is host input handed to the renderer each frame; nothing in the
//! field depends on it.

use std::fmt;
use std::str::FromStr;

use catppuccin::PALETTE;

use crate::Color;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeError {
    input: String,
}

impl fmt::Display for ParseThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown theme '{}' (expected 'light' or 'dark')", self.input)
    }
}

impl std::error::Error for ParseThemeError {}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("light") {
            Ok(Theme::Light)
        } else if trimmed.eq_ignore_ascii_case("dark") {
            Ok(Theme::Dark)
        } else {
            Err(ParseThemeError {
                input: s.to_string(),
            })
        }
    }
}

/// Colors used to draw the field under one theme
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Color,
    /// Hue shared by particles and connections; alpha is applied per draw
    pub accent: Color,
}

// Emerald accents, one shade darker on light backgrounds
const LIGHT_ACCENT: (u8, u8, u8) = (5, 150, 105);
const DARK_ACCENT: (u8, u8, u8) = (16, 185, 129);

impl Palette {
    /// Emerald accent over a Latte (light) or Mocha (dark) base
    pub fn for_theme(theme: Theme) -> Self {
        let (flavor, (r, g, b)) = match theme {
            Theme::Light => (PALETTE.latte, LIGHT_ACCENT),
            Theme::Dark => (PALETTE.mocha, DARK_ACCENT),
        };

        Self {
            background: Color::from_catppuccin(&flavor.colors.base),
            accent: Color::from_srgb8(r, g, b),
        }
    }

    pub fn particle(&self, opacity: f32) -> Color {
        self.accent.with_alpha(opacity)
    }

    pub fn connection(&self, opacity: f32) -> Color {
        self.accent.with_alpha(opacity)
    }
}
