//! Utility functions for the converter: units, colors, names and tokens

use crate::types::{BASE_FONT_SIZE, IMPORTANT_MARKER, ROOT_FONT_SIZE};

/// RGBA color parsed from a CSS color value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Android color literal: `#RRGGBB` when opaque, `#AARRGGBB` otherwise
    pub fn to_android_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }
}

/// Convert a CSS length to an integer magnitude.
///
/// `px` and bare numbers truncate toward zero, `rem` and `em` are scaled by
/// [`ROOT_FONT_SIZE`] and [`BASE_FONT_SIZE`] and rounded. `auto` is `0`.
/// Anything else (percentages, keywords) is `None`.
pub fn convert_units(value: &str) -> Option<i64> {
    let value = value.trim();

    if value == "auto" {
        return Some(0);
    }
    if let Some(number) = value.strip_suffix("px") {
        return parse_number(number).map(|n| n.trunc() as i64);
    }
    // rem must be checked before em
    if let Some(number) = value.strip_suffix("rem") {
        return parse_number(number).map(|n| (n * ROOT_FONT_SIZE).round() as i64);
    }
    if let Some(number) = value.strip_suffix("em") {
        return parse_number(number).map(|n| (n * BASE_FONT_SIZE).round() as i64);
    }

    parse_number(value).map(|n| n.trunc() as i64)
}

/// Percentage value as a rounded integer, e.g. `"33.4%"` -> `33`
pub fn parse_percentage(value: &str) -> Option<i64> {
    value
        .trim()
        .strip_suffix('%')
        .and_then(parse_number)
        .map(|n| n.round() as i64)
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let starts_numeric = text
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
    if !starts_numeric {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`, `rgb()` and `rgba()` colors
pub fn parse_color(color_str: &str) -> Option<Color> {
    let trimmed = color_str.trim();

    if let Some(hex_str) = trimmed.strip_prefix('#') {
        return parse_hex_color(hex_str);
    }

    let lower = trimmed.to_ascii_lowercase();
    let args = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    parse_rgb_function(args)
}

fn parse_hex_color(hex_str: &str) -> Option<Color> {
    if !hex_str.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let short = |i: usize| u8::from_str_radix(&hex_str[i..i + 1].repeat(2), 16).ok();
    let long = |i: usize| u8::from_str_radix(&hex_str[i..i + 2], 16).ok();

    match hex_str.len() {
        3 => Some(Color::new(short(0)?, short(1)?, short(2)?, 255)),
        4 => Some(Color::new(short(0)?, short(1)?, short(2)?, short(3)?)),
        6 => Some(Color::new(long(0)?, long(2)?, long(4)?, 255)),
        8 => Some(Color::new(long(0)?, long(2)?, long(4)?, long(6)?)),
        _ => None,
    }
}

fn parse_rgb_function(args: &str) -> Option<Color> {
    // Both `rgb(1, 2, 3, 0.5)` and `rgb(1 2 3 / 50%)`
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |part: &str| -> Option<u8> {
        let value = match part.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? * 255.0 / 100.0,
            None => part.parse::<f64>().ok()?,
        };
        Some(value.round().clamp(0.0, 255.0) as u8)
    };

    let alpha = match parts.get(3) {
        Some(part) => {
            let fraction = match part.strip_suffix('%') {
                Some(pct) => pct.parse::<f64>().ok()? / 100.0,
                None => part.parse::<f64>().ok()?,
            };
            (fraction.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };

    Some(Color::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, alpha))
}

/// Normalize a CSS color to an upper-case Android color literal, if it is one
pub fn normalize_color(value: &str) -> Option<String> {
    parse_color(value).map(|color| color.to_android_hex())
}

/// True for `rgb(...)` and `rgba(...)` values, in any case
pub fn is_rgb_function(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower.starts_with("rgb(") || lower.starts_with("rgba(")
}

/// Android color literal for a custom property value, if it reads as a color.
///
/// Hex literals and color keywords (`red`, `transparent`) are upper-cased as
/// written, `rgb()`/`rgba()` are converted to hex. Numbers, dimensions and
/// multi-token values are not colors.
pub fn color_literal(value: &str) -> Option<String> {
    let value = value.trim();

    if let Some(hex_str) = value.strip_prefix('#') {
        return parse_hex_color(hex_str).map(|_| value.to_uppercase());
    }
    if is_rgb_function(value) {
        return normalize_color(value);
    }

    let is_keyword = value.chars().next().map_or(false, |c| c.is_ascii_alphabetic())
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    is_keyword.then(|| value.to_uppercase())
}

/// Replace characters Android resource names reject (hyphens included) with `_`
pub fn sanitize_resource_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '.' { c } else { '_' })
        .collect()
}

/// Upper-case the first character, e.g. `div` -> `Div`
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Remove every ` !important` marker from a value
pub fn strip_important(value: &str) -> String {
    let stripped = value.replace(IMPORTANT_MARKER, "");
    let trimmed = stripped.trim();
    trimmed
        .strip_suffix("!important")
        .map(|rest| rest.trim_end().to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Split a value on whitespace that is not nested inside parentheses
pub fn split_tokens(value: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;

    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if c.is_whitespace() && depth == 0 {
            if let Some(s) = start.take() {
                tokens.push(&value[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(&value[s..]);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_px_truncates() {
        assert_eq!(convert_units("12px"), Some(12));
        assert_eq!(convert_units("12.9px"), Some(12));
        assert_eq!(convert_units("-3.7px"), Some(-3));
        assert_eq!(convert_units("0px"), Some(0));
    }

    #[test]
    fn test_convert_rem_and_em() {
        assert_eq!(convert_units("1rem"), Some(12));
        assert_eq!(convert_units("1.5rem"), Some(18));
        assert_eq!(convert_units("0.3rem"), Some(4)); // 3.6
        assert_eq!(convert_units("1em"), Some(16));
        assert_eq!(convert_units("0.5em"), Some(8));
        assert_eq!(convert_units("1.1em"), Some(18)); // 17.6
    }

    #[test]
    fn test_convert_bare_and_keywords() {
        assert_eq!(convert_units("14"), Some(14));
        assert_eq!(convert_units("auto"), Some(0));
        assert_eq!(convert_units("50%"), None);
        assert_eq!(convert_units("large"), None);
        assert_eq!(convert_units("px"), None);
        assert_eq!(convert_units("inf"), None);
        assert_eq!(convert_units(""), None);
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("50%"), Some(50));
        assert_eq!(parse_percentage("33.6%"), Some(34));
        assert_eq!(parse_percentage("50px"), None);
    }

    #[test]
    fn test_parse_color() {
        let color = parse_color("#FF0000").unwrap();
        assert_eq!((color.r, color.g, color.b, color.a), (255, 0, 0, 255));

        let color = parse_color("#abc").unwrap();
        assert_eq!((color.r, color.g, color.b), (0xAA, 0xBB, 0xCC));

        let color = parse_color("#11223380").unwrap();
        assert_eq!(color.a, 0x80);
        assert_eq!(color.to_android_hex(), "#80112233");

        assert!(parse_color("#12345").is_none());
        assert!(parse_color("#GGHHII").is_none());
        assert!(parse_color("red").is_none());
    }

    #[test]
    fn test_parse_rgb_functions() {
        assert_eq!(normalize_color("rgb(17, 34, 51)").as_deref(), Some("#112233"));
        assert_eq!(normalize_color("rgba(255, 0, 0, 0.5)").as_deref(), Some("#80FF0000"));
        assert_eq!(normalize_color("rgb(255 255 255 / 100%)").as_deref(), Some("#FFFFFF"));
        assert!(normalize_color("rgb(1, 2)").is_none());
    }

    #[test]
    fn test_color_literal() {
        assert_eq!(color_literal("#abcdef"), Some("#ABCDEF".to_string()));
        assert_eq!(color_literal("#11223380"), Some("#11223380".to_string()));
        assert_eq!(color_literal("rgba(0, 0, 0, 0.5)"), Some("#80000000".to_string()));
        assert_eq!(color_literal("red"), Some("RED".to_string()));
        assert_eq!(color_literal(" transparent "), Some("TRANSPARENT".to_string()));
        assert_eq!(color_literal("8px"), None);
        assert_eq!(color_literal("0.5"), None);
        assert_eq!(color_literal("4px 8px"), None);
        assert_eq!(color_literal("#ggg"), None);
    }

    #[test]
    fn test_sanitize_resource_name() {
        assert_eq!(sanitize_resource_name("primary-button"), "primary_button");
        assert_eq!(sanitize_resource_name("card--large"), "card__large");
        assert_eq!(sanitize_resource_name("AppTheme.title"), "AppTheme.title");
        assert_eq!(capitalize_first("div"), "Div");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_strip_important() {
        assert_eq!(strip_important("red !important"), "red");
        assert_eq!(strip_important("4px 8px !important"), "4px 8px");
        assert_eq!(strip_important("red!important"), "red");
        assert_eq!(strip_important("red"), "red");
    }

    #[test]
    fn test_split_tokens() {
        assert_eq!(split_tokens("4px  8px"), vec!["4px", "8px"]);
        assert_eq!(
            split_tokens("var(--a, 1px 2px) 3px"),
            vec!["var(--a, 1px 2px)", "3px"]
        );
        assert!(split_tokens("   ").is_empty());
    }
}
