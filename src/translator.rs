//! CSS property to Android attribute translation
//!
//! [`translate`] is a pure function over one resolved declaration. Every
//! known property is a [`CssProperty`] variant; unknown properties translate
//! to [`Translation::None`] without complaint so the table can grow later.
//!
//! Values that still hold a `var(--name)` reference are passed through unit
//! conversion untouched and the resulting items are marked `commented`, with
//! the `--` marker removed so the text is legal inside an XML comment.

use crate::types::AndroidItem;
use crate::utils::{
    convert_units, is_rgb_function, normalize_color, parse_percentage, split_tokens, strip_important,
};
use crate::variable_context::contains_reference;

/// Result of translating one declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    None,
    Single(AndroidItem),
    Multiple(Vec<AndroidItem>),
}

impl Translation {
    pub fn is_none(&self) -> bool {
        matches!(self, Translation::None)
    }

    pub fn len(&self) -> usize {
        match self {
            Translation::None => 0,
            Translation::Single(_) => 1,
            Translation::Multiple(items) => items.len(),
        }
    }

    pub fn into_items(self) -> Vec<AndroidItem> {
        match self {
            Translation::None => Vec::new(),
            Translation::Single(item) => vec![item],
            Translation::Multiple(items) => items,
        }
    }

    fn map_items(self, f: impl Fn(AndroidItem) -> AndroidItem) -> Self {
        match self {
            Translation::None => Translation::None,
            Translation::Single(item) => Translation::Single(f(item)),
            Translation::Multiple(items) => Translation::Multiple(items.into_iter().map(f).collect()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Shorthand order: top, right, bottom, left
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "top" => Some(Side::Top),
            "right" => Some(Side::Right),
            "bottom" => Some(Side::Bottom),
            "left" => Some(Side::Left),
            _ => None,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Side::Top => "Top",
            Side::Right => "Right",
            Side::Bottom => "Bottom",
            Side::Left => "Left",
        }
    }
}

/// Box-model shorthand family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxEdge {
    Padding,
    Margin,
}

impl BoxEdge {
    fn attribute(self) -> &'static str {
        match self {
            BoxEdge::Padding => "padding",
            BoxEdge::Margin => "layout_margin",
        }
    }

    fn side_attribute(self, side: Side) -> String {
        format!("{}{}", self.attribute(), side.suffix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    fn attribute(self) -> &'static str {
        match self {
            Dimension::Width => "layout_width",
            Dimension::Height => "layout_height",
        }
    }
}

/// Every CSS property with an Android mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssProperty {
    Color,
    FontSize,
    FontWeight,
    FontFamily,
    BackgroundColor,
    TextDecoration,
    TextAlign,
    Opacity,
    Shorthand(BoxEdge),
    Edge(BoxEdge, Side),
    Size(Dimension),
}

impl CssProperty {
    pub fn from_name(name: &str) -> Option<Self> {
        let property = match name {
            "color" => CssProperty::Color,
            "font-size" => CssProperty::FontSize,
            "font-weight" => CssProperty::FontWeight,
            "font-family" => CssProperty::FontFamily,
            "background-color" => CssProperty::BackgroundColor,
            "text-decoration" => CssProperty::TextDecoration,
            "text-align" => CssProperty::TextAlign,
            "opacity" => CssProperty::Opacity,
            "padding" => CssProperty::Shorthand(BoxEdge::Padding),
            "margin" => CssProperty::Shorthand(BoxEdge::Margin),
            "width" => CssProperty::Size(Dimension::Width),
            "height" => CssProperty::Size(Dimension::Height),
            _ => {
                if let Some(side) = name.strip_prefix("padding-").and_then(Side::from_name) {
                    CssProperty::Edge(BoxEdge::Padding, side)
                } else if let Some(side) = name.strip_prefix("margin-").and_then(Side::from_name) {
                    CssProperty::Edge(BoxEdge::Margin, side)
                } else {
                    return None;
                }
            }
        };
        Some(property)
    }

    pub fn is_shorthand(&self) -> bool {
        matches!(self, CssProperty::Shorthand(_))
    }

    pub fn translate(&self, value: &str) -> Translation {
        match *self {
            CssProperty::Color => single("textColor", Some(color_value(value))),
            CssProperty::FontSize => single("textSize", dimension(value, "sp")),
            CssProperty::FontWeight => single("textStyle", Some(value.to_string())),
            CssProperty::FontFamily => single("fontFamily", Some(value.to_string())),
            CssProperty::BackgroundColor => single("background", Some(value.to_string())),
            CssProperty::TextDecoration => single("textDecoration", text_decoration(value)),
            CssProperty::TextAlign => single("gravity", text_align(value)),
            CssProperty::Opacity => single("alpha", opacity(value)),
            CssProperty::Shorthand(edge) => expand_shorthand(edge, value),
            CssProperty::Edge(edge, side) => single(&edge.side_attribute(side), dimension(value, "sp")),
            CssProperty::Size(dimension_kind) => size(dimension_kind, value),
        }
    }
}

/// Translate one declaration into zero or more Android items
pub fn translate(property: &str, value: &str) -> Translation {
    let Some(css_property) = CssProperty::from_name(property) else {
        return Translation::None;
    };

    let value = strip_important(value);
    css_property.translate(&value).map_items(mark_unresolved)
}

/// Comment out items still referencing a variable; `--` is illegal inside comments
fn mark_unresolved(mut item: AndroidItem) -> AndroidItem {
    if contains_reference(&item.value) {
        item.value = item.value.replace("--", "");
        item.commented = true;
    }
    item
}

fn single(attribute: &str, value: Option<String>) -> Translation {
    match value {
        Some(value) => Translation::Single(AndroidItem::new(attribute, value)),
        None => Translation::None,
    }
}

/// `rgb()` and `rgba()` become Android hex, anything else is upper-cased as written
fn color_value(value: &str) -> String {
    if contains_reference(value) {
        return value.to_string();
    }
    if is_rgb_function(value) {
        if let Some(hex) = normalize_color(value) {
            return hex;
        }
    }
    value.to_uppercase()
}

/// Unit-converted integer with `suffix`; unresolved references pass through
fn dimension(value: &str, suffix: &str) -> Option<String> {
    if contains_reference(value) {
        return Some(value.to_string());
    }
    convert_units(value).map(|n| format!("{}{}", n, suffix))
}

fn text_decoration(value: &str) -> Option<String> {
    if contains_reference(value) {
        return Some(value.to_string());
    }
    match value.trim().to_ascii_lowercase().as_str() {
        "underline" => Some("Underline".to_string()),
        "line-through" => Some("LineThrough".to_string()),
        _ => None,
    }
}

fn text_align(value: &str) -> Option<String> {
    if contains_reference(value) {
        return Some(value.to_string());
    }
    let gravity = match value.trim().to_ascii_lowercase().as_str() {
        "left" | "start" => "start",
        "center" => "center",
        "right" | "end" => "end",
        _ => return None,
    };
    Some(gravity.to_string())
}

fn opacity(value: &str) -> Option<String> {
    if contains_reference(value) {
        return Some(value.to_string());
    }
    let value = value.trim();
    if let Some(pct) = value.strip_suffix('%') {
        let fraction = pct.trim().parse::<f64>().ok()?.clamp(0.0, 100.0) / 100.0;
        return Some(format!("{}", fraction));
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|n| (0.0..=1.0).contains(n))
        .map(|_| value.to_string())
}

/// Weight from a rounded percentage: `50` -> `.50`, `5` -> `.05`, `150` -> `1.50`
pub fn format_weight(percentage: i64) -> String {
    let percentage = percentage.max(0);
    if percentage < 100 {
        format!(".{:02}", percentage)
    } else {
        format!("{}.{:02}", percentage / 100, percentage % 100)
    }
}

fn size(dimension_kind: Dimension, value: &str) -> Translation {
    if let Some(percentage) = parse_percentage(value) {
        return Translation::Multiple(vec![
            AndroidItem::new(dimension_kind.attribute(), "0dp"),
            AndroidItem::new("layout_weight", format_weight(percentage)),
        ]);
    }
    single(dimension_kind.attribute(), dimension(value, "dp"))
}

/// CSS box-model expansion of `padding` / `margin`.
///
/// One token maps to the all-sides attribute; two to four tokens map to one
/// item per side in top, right, bottom, left order. Any side that cannot be
/// converted drops the whole declaration.
fn expand_shorthand(edge: BoxEdge, value: &str) -> Translation {
    let tokens = split_tokens(value);

    let sides: [&str; 4] = match tokens.as_slice() {
        [all] => return single(edge.attribute(), dimension(all, "sp")),
        [vertical, horizontal] => [*vertical, *horizontal, *vertical, *horizontal],
        [top, horizontal, bottom] => [*top, *horizontal, *bottom, *horizontal],
        [top, right, bottom, left] => [*top, *right, *bottom, *left],
        _ => return Translation::None,
    };

    let mut items = Vec::with_capacity(4);
    for (side, token) in Side::ALL.iter().zip(sides) {
        let Some(converted) = dimension(token, "sp") else {
            return Translation::None;
        };
        items.push(AndroidItem::new(&edge.side_attribute(*side), converted));
    }
    Translation::Multiple(items)
}
