//! Theme colors, with optional hex overrides from the config file

use ratatui::style::Color;

use crate::config::ThemeConfig;

/// Theme colors for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub problematic: Color,  // Border of the always-rendering component
    pub optimized: Color,    // Border of the memoized component
    pub accent: Color,       // Active selection, key hints
    pub text: Color,
    pub text_dim: Color,
    pub inactive: Color,     // Unfocused borders
    pub header: Color,
    pub bg_selected: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired palette
        Self {
            problematic: Color::Rgb(243, 139, 168),
            optimized: Color::Rgb(166, 218, 149),
            accent: Color::Rgb(250, 179, 135),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(137, 180, 250),
            bg_selected: Color::Rgb(69, 71, 90),
        }
    }
}

impl Theme {
    /// Default palette with any valid overrides applied
    pub fn from_config(config: &ThemeConfig) -> Self {
        let mut theme = Self::default();

        let overrides = [
            (&config.problematic, &mut theme.problematic, "problematic"),
            (&config.optimized, &mut theme.optimized, "optimized"),
            (&config.accent, &mut theme.accent, "accent"),
        ];
        for (value, slot, name) in overrides {
            let Some(value) = value else { continue };
            match Self::parse_hex_color(value) {
                Some(color) => *slot = color,
                None => tracing::warn!("Ignoring invalid {} color: {:?}", name, value),
            }
        }

        theme
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    pub fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        match s.len() {
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16).ok()?;
                let g = u8::from_str_radix(&s[2..4], 16).ok()?;
                let b = u8::from_str_radix(&s[4..6], 16).ok()?;
                Some(Color::Rgb(r, g, b))
            }
            3 => {
                let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
                Some(Color::Rgb(r, g, b))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(Theme::parse_hex_color("0f0"), Some(Color::Rgb(0, 255, 0)));
        assert_eq!(Theme::parse_hex_color("#12345"), None);
        assert_eq!(Theme::parse_hex_color("#gggggg"), None);
        assert_eq!(Theme::parse_hex_color("#éé"), None);
        assert_eq!(Theme::parse_hex_color("#+fff00"), None);
        assert_eq!(Theme::parse_hex_color("+f0"), None);
    }

    #[test]
    fn test_overrides_fall_back_on_bad_values() {
        let config = ThemeConfig {
            problematic: Some("#010203".to_string()),
            optimized: Some("green".to_string()),
            accent: None,
        };
        let theme = Theme::from_config(&config);
        let defaults = Theme::default();

        assert_eq!(theme.problematic, Color::Rgb(1, 2, 3));
        assert_eq!(theme.optimized, defaults.optimized);
        assert_eq!(theme.accent, defaults.accent);
    }
}
