//! Color parsing and formatting.
//!
//! Theme files spell colors the way the board's web front end did: CSS
//! names (`lightblue`), hex (`#ff0000`, `#f00`) or `rgb(r, g, b)`.

use palette::Srgb;
use serde::{Deserialize, Deserializer, Serializer};

/// An 8-bit sRGB color.
pub type Color = Srgb<u8>;

/// Parse a color string.
///
/// ```
/// use theme::color::parse_color;
///
/// let red = parse_color("#ff0000").unwrap();
/// assert_eq!(parse_color("red"), Some(red));
/// assert_eq!(parse_color("rgb(255, 0, 0)"), Some(red));
/// ```
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();

    if value.starts_with('#') {
        return value.parse::<Color>().ok();
    }

    if value.starts_with("rgb") {
        return parse_rgb_color(value);
    }

    palette::named::from_str(&value.to_ascii_lowercase())
}

/// Format a color as `#rrggbb`.
pub fn format_color(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Parse `rgb(r, g, b)`; components are 0-255 or percentages.
fn parse_rgb_color(value: &str) -> Option<Color> {
    let components = value.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<&str> = components.split(',').collect();
    if parts.len() != 3 {
        return None;
    }

    let red = parse_rgb_component(parts[0])?;
    let green = parse_rgb_component(parts[1])?;
    let blue = parse_rgb_component(parts[2])?;
    Some(Srgb::new(red, green, blue))
}

fn parse_rgb_component(value: &str) -> Option<u8> {
    let value = value.trim();

    if let Some(percent) = value.strip_suffix('%') {
        let p = percent.trim().parse::<f32>().ok()?;
        if !(0.0..=100.0).contains(&p) {
            return None;
        }
        Some((p / 100.0 * 255.0).round() as u8)
    } else {
        value.parse::<u8>().ok()
    }
}

/// `serde(with = ...)` adapter storing colors as strings.
pub mod serde_color {
    use super::*;

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_color(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_color(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(parse_color("lightblue"), Some(Srgb::new(173, 216, 230)));
        assert_eq!(parse_color("Orange"), Some(Srgb::new(255, 165, 0)));
        assert_eq!(parse_color("not-a-color"), None);
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_color("#0000ff"), Some(Srgb::new(0, 0, 255)));
        assert_eq!(parse_color("#fff"), Some(Srgb::new(255, 255, 255)));
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[test]
    fn test_rgb_colors() {
        assert_eq!(parse_color("rgb(1, 2, 3)"), Some(Srgb::new(1, 2, 3)));
        assert_eq!(parse_color("rgb(100%, 0%, 0%)"), Some(Srgb::new(255, 0, 0)));
        assert_eq!(parse_color("rgb(1, 2)"), None);
        assert_eq!(parse_color("rgb(256, 0, 0)"), None);
    }

    #[test]
    fn test_format_round_trip() {
        let color = Srgb::new(255, 255, 224);
        assert_eq!(format_color(color), "#ffffe0");
        assert_eq!(parse_color(&format_color(color)), Some(color));
    }
}
