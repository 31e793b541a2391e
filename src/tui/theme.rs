//! Colour schemes for the screens and the overlay.
//!
//! The active theme is not global state: the frame driver owns a
//! [`ThemeName`] and hands the matching [`ColorScheme`] to the toolkit at the
//! start of every frame.

use ratatui::prelude::*;

/// Selectable themes, in style-selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    HighContrast,
}

impl ThemeName {
    pub const ALL: [Self; 3] = [Self::Dark, Self::Light, Self::HighContrast];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::HighContrast => "high-contrast",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            "high-contrast" | "highcontrast" | "hc" => Some(Self::HighContrast),
            _ => None,
        }
    }

    /// Position in [`ThemeName::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    pub fn colors(self) -> ColorScheme {
        match self {
            Self::Dark => ColorScheme::dark(),
            Self::Light => ColorScheme::light(),
            Self::HighContrast => ColorScheme::high_contrast(),
        }
    }
}

/// Semantic colours for UI elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub primary: Color,
    pub accent: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub background_alt: Color,
    pub text: Color,
    pub text_muted: Color,
    pub selection: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::dark()
    }
}

impl ColorScheme {
    /// Dark theme (default)
    pub const fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            accent: Color::Yellow,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            background_alt: Color::Rgb(30, 30, 40),
            text: Color::White,
            text_muted: Color::Gray,
            selection: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }

    /// Light theme
    pub const fn light() -> Self {
        Self {
            primary: Color::Rgb(0, 100, 150),
            accent: Color::Rgb(180, 140, 0),
            muted: Color::Rgb(150, 150, 150),
            border: Color::Rgb(180, 180, 180),
            border_focused: Color::Rgb(0, 100, 150),
            background_alt: Color::Rgb(240, 240, 245),
            text: Color::Rgb(30, 30, 30),
            text_muted: Color::Rgb(100, 100, 100),
            selection: Color::Rgb(200, 220, 240),
            success: Color::Rgb(0, 128, 0),
            warning: Color::Rgb(180, 140, 0),
            error: Color::Rgb(200, 0, 0),
        }
    }

    /// High contrast theme (accessibility)
    pub const fn high_contrast() -> Self {
        Self {
            primary: Color::LightCyan,
            accent: Color::LightYellow,
            muted: Color::Gray,
            border: Color::White,
            border_focused: Color::LightCyan,
            background_alt: Color::Rgb(20, 20, 20),
            text: Color::White,
            text_muted: Color::Gray,
            selection: Color::White,
            success: Color::LightGreen,
            warning: Color::LightYellow,
            error: Color::LightRed,
        }
    }

    // ------------------------------------------------------------------
    // Style presets
    // ------------------------------------------------------------------

    pub fn title(&self) -> Style {
        Style::default().fg(self.primary).bold()
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn label(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Buttons and focused list entries
    pub fn selected(&self) -> Style {
        Style::default().bg(self.selection).fg(self.text).bold()
    }

    pub fn disabled(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn status_bar(&self) -> Style {
        Style::default().bg(self.background_alt).fg(self.text_muted)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning).bold()
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error).bold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_names_roundtrip() {
        for theme in ThemeName::ALL {
            assert_eq!(ThemeName::from_name(theme.as_str()), Some(theme));
            assert_eq!(ThemeName::from_index(theme.index()), theme);
        }
        assert_eq!(ThemeName::from_name("HC"), Some(ThemeName::HighContrast));
        assert_eq!(ThemeName::from_name("sepia"), None);
    }

    #[test]
    fn test_out_of_range_index_falls_back() {
        assert_eq!(ThemeName::from_index(99), ThemeName::Dark);
    }

    #[test]
    fn test_schemes_differ() {
        assert_ne!(ColorScheme::dark(), ColorScheme::light());
        assert_ne!(ColorScheme::dark(), ColorScheme::high_contrast());
    }
}
