//! Selector classification and style-name derivation

use crate::types::ROOT_SELECTOR;
use crate::utils::{capitalize_first, sanitize_resource_name};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorKind {
    /// `.name`
    Class(String),
    /// bare element name such as `div`
    Tag(String),
    /// `:root`, holder of custom properties
    Root,
    Unsupported(&'static str),
}

impl SelectorKind {
    /// Android style name, or `None` for selectors that emit no style
    pub fn style_name(&self) -> Option<String> {
        match self {
            SelectorKind::Class(name) => Some(sanitize_resource_name(name)),
            SelectorKind::Tag(name) => Some(capitalize_first(&sanitize_resource_name(name))),
            SelectorKind::Root | SelectorKind::Unsupported(_) => None,
        }
    }
}

pub fn classify_selector(selector: &str) -> SelectorKind {
    let selector = selector.trim();

    if selector == ROOT_SELECTOR {
        return SelectorKind::Root;
    }
    if let Some(reason) = unsupported_feature(selector) {
        return SelectorKind::Unsupported(reason);
    }

    if let Some(class_name) = selector.strip_prefix('.') {
        if class_name.contains('.') {
            return SelectorKind::Unsupported("compound selector");
        }
        if !is_identifier(class_name) {
            return SelectorKind::Unsupported("invalid class name");
        }
        return SelectorKind::Class(class_name.to_string());
    }

    if selector.contains('.') {
        return SelectorKind::Unsupported("compound selector");
    }
    if selector.starts_with(|c: char| c.is_ascii_alphabetic()) && is_identifier(selector) {
        return SelectorKind::Tag(selector.to_string());
    }

    SelectorKind::Unsupported("invalid selector")
}

fn unsupported_feature(selector: &str) -> Option<&'static str> {
    for c in selector.chars() {
        let reason = match c {
            c if c.is_whitespace() => "descendant combinator",
            '>' | '+' | '~' => "combinator",
            '[' | ']' => "attribute selector",
            ':' => "pseudo-class or pseudo-element",
            '#' => "id selector",
            '*' => "universal selector",
            '&' | '(' | ')' | ',' | '|' => "unsupported syntax",
            _ => continue,
        };
        return Some(reason);
    }
    None
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '-' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_selectors() {
        assert_eq!(classify_selector(".title"), SelectorKind::Class("title".to_string()));
        assert_eq!(
            classify_selector(".primary-button-large").style_name().as_deref(),
            Some("primary_button_large")
        );
    }

    #[test]
    fn test_tag_selectors() {
        assert_eq!(classify_selector("div"), SelectorKind::Tag("div".to_string()));
        assert_eq!(classify_selector("div").style_name().as_deref(), Some("Div"));
        assert_eq!(classify_selector("my-widget").style_name().as_deref(), Some("My_widget"));
    }

    #[test]
    fn test_root_selector_has_no_style() {
        assert_eq!(classify_selector(":root"), SelectorKind::Root);
        assert_eq!(SelectorKind::Root.style_name(), None);
    }

    #[test]
    fn test_rejected_selectors() {
        let rejected = [
            "a:hover",
            "button[disabled]",
            ".card .title",
            "ul > li",
            "h1 + p",
            "h1 ~ p",
            "#header",
            "*",
            ".a.b",
            "div.title",
            "p::before",
            ":root .x",
            ".1col",
            "",
        ];
        for selector in rejected {
            let kind = classify_selector(selector);
            assert!(
                matches!(kind, SelectorKind::Unsupported(_)),
                "'{}' should be rejected, got {:?}",
                selector,
                kind
            );
            assert_eq!(kind.style_name(), None);
        }
    }

    #[test]
    fn test_rejection_reasons() {
        assert_eq!(classify_selector("a:hover"), SelectorKind::Unsupported("pseudo-class or pseudo-element"));
        assert_eq!(classify_selector(".a .b"), SelectorKind::Unsupported("descendant combinator"));
        assert_eq!(classify_selector("input[type]"), SelectorKind::Unsupported("attribute selector"));
    }
}
