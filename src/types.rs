//! Core data types for the converter

use serde::{Deserialize, Serialize};
use std::fmt;

// --- Unit Conversion ---
/// Root font size used for `rem` values
pub const ROOT_FONT_SIZE: f64 = 12.0;
/// Base font size used for `em` values
pub const BASE_FONT_SIZE: f64 = 16.0;

// --- Markers ---
pub const CUSTOM_PROPERTY_PREFIX: &str = "--";
pub const IMPORTANT_MARKER: &str = " !important";
pub const ROOT_SELECTOR: &str = ":root";
pub const ANDROID_NAMESPACE: &str = "android:";
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// A single `property: value` pair inside a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub line: usize,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>, line: usize) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            line,
        }
    }

    /// Custom property name without its `--` marker
    pub fn custom_property_name(&self) -> Option<&str> {
        self.property.strip_prefix(CUSTOM_PROPERTY_PREFIX)
    }
}

/// A selector group with its declarations, in source order.
/// Loose top-level declarations form a rule with no selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    pub selectors: Vec<String>,
    pub declarations: Vec<Declaration>,
    pub line: usize,
}

/// One `<item>` of an Android style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndroidItem {
    /// Fully qualified attribute name, e.g. `android:textColor`
    pub name: String,
    pub value: String,
    /// Rendered inside an XML comment because the value holds an unresolved reference
    pub commented: bool,
}

impl AndroidItem {
    pub fn new(attribute: &str, value: impl Into<String>) -> Self {
        Self {
            name: format!("{}{}", ANDROID_NAMESPACE, attribute),
            value: value.into(),
            commented: false,
        }
    }
}

impl fmt::Display for AndroidItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A named bundle of items in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AndroidStyle {
    pub name: String,
    pub items: Vec<AndroidItem>,
}

impl AndroidStyle {
    /// Items rendered as `name=value` strings, in emission order
    pub fn attributes(&self) -> Vec<String> {
        self.items.iter().map(|item| item.to_string()).collect()
    }
}

/// A `<color>` resource produced from a custom property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorResource {
    pub name: String,
    pub value: String,
    pub commented: bool,
}

/// Which resource file to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// `<style>` resources from class and tag selectors
    #[default]
    Styles,
    /// `<color>` resources from custom properties
    Colors,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Styles => write!(f, "styles"),
            OutputMode::Colors => write!(f, "colors"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_property_detection() {
        let decl = Declaration::new("--brand", "#112233", 1);
        assert_eq!(decl.custom_property_name(), Some("brand"));

        let decl = Declaration::new("color", "red", 2);
        assert_eq!(decl.custom_property_name(), None);
    }

    #[test]
    fn test_item_attribute_string() {
        let style = AndroidStyle {
            name: "title".to_string(),
            items: vec![
                AndroidItem::new("textColor", "#FF0000"),
                AndroidItem::new("textSize", "12sp"),
            ],
        };
        assert_eq!(
            style.attributes(),
            vec!["android:textColor=#FF0000", "android:textSize=12sp"]
        );
    }

    #[test]
    fn test_output_mode_deserialize() {
        let mode: OutputMode = serde_json::from_str(r#""colors""#).unwrap();
        assert_eq!(mode, OutputMode::Colors);
        assert_eq!(OutputMode::default().to_string(), "styles");
    }
}
