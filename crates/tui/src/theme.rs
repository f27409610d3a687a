use ratatui::style::Color;
use steamdash_core::config::ThemeConfig;

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary_fg: Color,
    pub accent: Color,
    pub muted: Color,
    pub selection_bg: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::LightBlue,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

impl Theme {
    /// Apply colour overrides from configuration. Returns the palette and a
    /// note naming any value that could not be parsed.
    pub fn from_config(config: &ThemeConfig) -> (Self, Option<String>) {
        let mut theme = Theme::default();
        let mut rejected = Vec::new();

        for (name, value, slot) in [
            ("accent", &config.accent, &mut theme.accent),
            ("success", &config.success, &mut theme.success),
            ("danger", &config.danger, &mut theme.danger),
        ] {
            let Some(raw) = value.as_deref() else {
                continue;
            };
            match parse_hex_color(raw) {
                Some(color) => *slot = color,
                None => rejected.push(format!("{name}={raw}")),
            }
        }

        let note = (!rejected.is_empty())
            .then(|| format!("Ignored invalid theme colours: {}", rejected.join(", ")));
        (theme, note)
    }
}

fn parse_hex_color(input: &str) -> Option<Color> {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(parse_hex_color("#3B82F6"), Some(Color::Rgb(0x3b, 0x82, 0xf6)));
        assert_eq!(parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
    }

    #[test]
    fn config_overrides_apply_and_report_rejects() {
        let config = ThemeConfig {
            accent: Some("#ff8800".to_string()),
            success: Some("green-ish".to_string()),
            danger: None,
        };
        let (theme, note) = Theme::from_config(&config);
        assert_eq!(theme.accent, Color::Rgb(0xff, 0x88, 0x00));
        assert_eq!(theme.success, Theme::default().success);
        assert!(note.unwrap_or_default().contains("success=green-ish"));
    }
}
