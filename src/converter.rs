//! Rule traversal: custom-property capture, style assembly and color export
//!
//! Rules are walked once in source order. Custom properties enter the
//! table at the point they are read, so every declaration is resolved
//! against exactly the definitions that precede it. In color mode each
//! custom property is resolved the same way when it is captured.

use crate::error::{Diagnostic, Diagnostics};
use crate::selector::{classify_selector, SelectorKind};
use crate::translator::{translate, CssProperty};
use crate::types::{AndroidItem, AndroidStyle, ColorResource, Declaration, OutputMode, Rule};
use crate::utils::{color_literal, sanitize_resource_name, split_tokens, strip_important};
use crate::variable_context::{CustomPropertyTable, Resolved, VariableResolver};
use crate::ConvertOptions;
use std::collections::HashMap;

/// Everything produced by one traversal
#[derive(Debug, Default)]
pub struct ConversionOutput {
    pub styles: Vec<AndroidStyle>,
    pub colors: Vec<ColorResource>,
    pub table: CustomPropertyTable,
    pub diagnostics: Diagnostics,
}

pub struct Converter<'a> {
    options: &'a ConvertOptions,
    resolver: VariableResolver,
    table: CustomPropertyTable,
    styles: StyleSet,
    captured: Vec<CapturedProperty>,
    diagnostics: Diagnostics,
}

/// A custom property resolved at the point it was defined
#[derive(Debug)]
struct CapturedProperty {
    name: String,
    line: usize,
    raw: String,
    resolved: Resolved,
}

impl<'a> Converter<'a> {
    pub fn new(options: &'a ConvertOptions) -> Self {
        let mut converter = Self {
            options,
            resolver: VariableResolver::new(),
            table: CustomPropertyTable::new(),
            styles: StyleSet::default(),
            captured: Vec::new(),
            diagnostics: Diagnostics::new(),
        };

        for (name, value) in &options.custom_variables {
            converter.define(name.trim_start_matches("--"), value.clone(), 0);
        }
        converter
    }

    pub fn process_rules(&mut self, rules: &[Rule]) {
        for rule in rules {
            self.process_rule(rule);
        }
    }

    fn process_rule(&mut self, rule: &Rule) {
        let targets = match self.options.mode {
            OutputMode::Styles => self.style_targets(rule),
            OutputMode::Colors => Vec::new(),
        };

        for declaration in &rule.declarations {
            if let Some(name) = declaration.custom_property_name() {
                self.define(name, strip_important(&declaration.value), declaration.line);
                continue;
            }
            if targets.is_empty() {
                continue;
            }
            if let Some(items) = self.translate_declaration(declaration) {
                for &target in &targets {
                    self.styles.set(target, &declaration.property, items.clone());
                }
            }
        }
    }

    /// Record a custom property. Color mode resolves it first, against the
    /// table as it stands before this definition.
    fn define(&mut self, name: &str, value: String, line: usize) {
        if self.options.mode == OutputMode::Colors {
            let resolved = self.resolver.resolve(&self.table, &value);
            self.report_resolution(&resolved);

            let captured = CapturedProperty {
                name: name.to_string(),
                line,
                raw: value.clone(),
                resolved,
            };
            match self.captured.iter_mut().find(|entry| entry.name == name) {
                Some(existing) => *existing = captured,
                None => self.captured.push(captured),
            }
        }

        self.table.define(name, value, line);
    }

    /// Style slots for every selector of `rule` that yields a style
    fn style_targets(&mut self, rule: &Rule) -> Vec<usize> {
        let mut targets = Vec::new();

        for selector in &rule.selectors {
            let kind = classify_selector(selector);
            match kind.style_name() {
                Some(name) => {
                    let name = match &self.options.style_prefix {
                        Some(prefix) => format!("{}{}", prefix, name),
                        None => name,
                    };
                    let slot = self.styles.ensure(&name);
                    if !targets.contains(&slot) {
                        targets.push(slot);
                    }
                }
                None => {
                    if let SelectorKind::Unsupported(reason) = kind {
                        self.diagnostics.push(Diagnostic::UnsupportedSelector {
                            line: rule.line,
                            selector: selector.clone(),
                            reason,
                        });
                    }
                }
            }
        }

        targets
    }

    fn translate_declaration(&mut self, declaration: &Declaration) -> Option<Vec<AndroidItem>> {
        let Some(css_property) = CssProperty::from_name(&declaration.property) else {
            log::trace!("Line {}: no mapping for '{}'", declaration.line, declaration.property);
            return None;
        };

        let value = strip_important(&declaration.value);
        let resolved = self.resolver.resolve(&self.table, &value);
        self.report_resolution(&resolved);

        if has_unsupported_keyword(&resolved.value) {
            self.diagnostics.push(Diagnostic::UnsupportedValue {
                line: declaration.line,
                property: declaration.property.clone(),
                value: resolved.value,
            });
            return None;
        }

        let items = translate(&declaration.property, &resolved.value).into_items();
        if items.is_empty() {
            let diagnostic = if css_property.is_shorthand() {
                Diagnostic::MalformedShorthand {
                    line: declaration.line,
                    property: declaration.property.clone(),
                    value: resolved.value,
                }
            } else {
                Diagnostic::UnsupportedValue {
                    line: declaration.line,
                    property: declaration.property.clone(),
                    value: resolved.value,
                }
            };
            self.diagnostics.push(diagnostic);
            return None;
        }

        if items.iter().any(|item| item.commented) {
            log::debug!(
                "Line {}: '{}' keeps references to {:?}",
                declaration.line,
                declaration.property,
                resolved.unresolved_names()
            );
            self.diagnostics.push(Diagnostic::UnresolvedVariable {
                line: declaration.line,
                property: declaration.property.clone(),
                value,
            });
        }

        Some(items)
    }

    fn report_resolution(&mut self, resolved: &Resolved) {
        for name in &resolved.cycles {
            self.diagnostics.push(Diagnostic::VariableCycle { name: name.clone() });
        }
        for name in &resolved.truncated {
            self.diagnostics.push(Diagnostic::ExpansionLimit { name: name.clone() });
        }
    }

    /// Color resources from the captured properties, in definition order
    fn build_colors(&mut self) -> Vec<ColorResource> {
        let mut colors = Vec::new();

        for property in std::mem::take(&mut self.captured) {
            let name = sanitize_resource_name(&property.name);
            let resolved = property.resolved;

            if !resolved.is_fully_resolved() {
                log::debug!(
                    "Line {}: '--{}' keeps references to {:?}",
                    property.line,
                    property.name,
                    resolved.unresolved_names()
                );
                self.diagnostics.push(Diagnostic::UnresolvedVariable {
                    line: property.line,
                    property: format!("--{}", property.name),
                    value: property.raw,
                });
                colors.push(ColorResource {
                    name,
                    value: resolved.value.replace("--", ""),
                    commented: true,
                });
                continue;
            }

            match color_literal(&resolved.value) {
                Some(value) => colors.push(ColorResource {
                    name,
                    value,
                    commented: false,
                }),
                None => self.diagnostics.push(Diagnostic::NotAColor {
                    name: property.name,
                    value: resolved.value,
                }),
            }
        }

        colors
    }

    pub fn finish(mut self) -> ConversionOutput {
        let colors = match self.options.mode {
            OutputMode::Colors => self.build_colors(),
            OutputMode::Styles => Vec::new(),
        };

        ConversionOutput {
            styles: self.styles.into_styles(),
            colors,
            table: self.table,
            diagnostics: self.diagnostics,
        }
    }
}

/// `auto`, `inherit` and `calc()` have no stable Android equivalent
fn has_unsupported_keyword(value: &str) -> bool {
    split_tokens(value).iter().any(|token| {
        let token = token.to_ascii_lowercase();
        token == "auto" || token == "inherit" || token.starts_with("calc(")
    })
}

#[derive(Debug, Default)]
struct StyleEntry {
    name: String,
    /// Items per CSS property, in first-occurrence order
    properties: Vec<(String, Vec<AndroidItem>)>,
}

/// Styles in first-encounter order; repeated selectors merge
#[derive(Debug, Default)]
struct StyleSet {
    entries: Vec<StyleEntry>,
    index: HashMap<String, usize>,
}

impl StyleSet {
    fn ensure(&mut self, name: &str) -> usize {
        if let Some(&slot) = self.index.get(name) {
            return slot;
        }
        let slot = self.entries.len();
        self.entries.push(StyleEntry {
            name: name.to_string(),
            properties: Vec::new(),
        });
        self.index.insert(name.to_string(), slot);
        slot
    }

    /// Last write wins, at the position of the first write
    fn set(&mut self, slot: usize, property: &str, items: Vec<AndroidItem>) {
        let entry = &mut self.entries[slot];
        match entry.properties.iter_mut().find(|(name, _)| name == property) {
            Some((_, existing)) => *existing = items,
            None => entry.properties.push((property.to_string(), items)),
        }
    }

    fn into_styles(self) -> Vec<AndroidStyle> {
        self.entries
            .into_iter()
            .map(|entry| AndroidStyle {
                name: entry.name,
                items: entry.properties.into_iter().flat_map(|(_, items)| items).collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_stylesheet;

    fn run(source: &str, options: &ConvertOptions) -> ConversionOutput {
        let rules = parse_stylesheet(source);
        let mut converter = Converter::new(options);
        converter.process_rules(&rules);
        converter.finish()
    }

    fn styles(source: &str) -> ConversionOutput {
        run(source, &ConvertOptions::default())
    }

    #[test]
    fn test_title_example() {
        let output = styles(".title { color: #FF0000; font-size: 1rem; }");
        assert_eq!(output.styles.len(), 1);
        assert_eq!(output.styles[0].name, "title");
        assert_eq!(
            output.styles[0].attributes(),
            vec!["android:textColor=#FF0000", "android:textSize=12sp"]
        );
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_variable_defined_before_use() {
        let output = styles("--brand: #112233;\n.btn { background-color: var(--brand); }");
        let item = &output.styles[0].items[0];
        assert_eq!(item.value, "#112233");
        assert!(!item.commented);
    }

    #[test]
    fn test_forward_reference_is_unresolved() {
        let output = styles(".btn { background-color: var(--brand); }\n--brand: #112233;");
        let item = &output.styles[0].items[0];
        assert!(item.commented);
        assert_eq!(item.value, "var(brand)");
        assert!(output
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::UnresolvedVariable { line: 1, .. })));
        // The later definition is still recorded
        assert_eq!(output.table.get("brand"), Some("#112233"));
    }

    #[test]
    fn test_root_variables_feed_later_rules() {
        let source = ":root {\n  --gap: 4px 8px;\n  color: red;\n}\n.card { padding: var(--gap); }";
        let output = styles(source);
        assert_eq!(output.styles.len(), 1);
        assert_eq!(output.styles[0].name, "card");
        assert_eq!(output.styles[0].items.len(), 4);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_custom_properties_never_become_items() {
        let output = styles(".a { --local: 3px; margin-top: var(--local); }");
        assert_eq!(output.styles[0].attributes(), vec!["android:layout_marginTop=3sp"]);
    }

    #[test]
    fn test_rejected_selectors_produce_no_style() {
        let output = styles("a:hover { color: red; }\nbutton[disabled] { color: gray; }\n.card .title { color: blue; }");
        assert!(output.styles.is_empty());
        assert_eq!(output.diagnostics.len(), 3);
    }

    #[test]
    fn test_selector_group_shares_declarations() {
        let output = styles(".a, div, .b:hover { font-weight: bold; }");
        let names: Vec<_> = output.styles.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "Div"]);
        assert_eq!(output.styles[1].attributes(), vec!["android:textStyle=bold"]);
    }

    #[test]
    fn test_unsupported_values_are_skipped() {
        let output = styles(".a { width: auto; margin: 0 auto; height: calc(100% - 4px); color: inherit; font-size: 12px; }");
        assert_eq!(output.styles[0].attributes(), vec!["android:textSize=12sp"]);
        assert_eq!(output.diagnostics.len(), 4);
    }

    #[test]
    fn test_unknown_property_is_silent() {
        let output = styles(".a { cursor: pointer; color: #abc; }");
        assert_eq!(output.styles[0].attributes(), vec!["android:textColor=#ABC"]);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_last_write_wins_at_first_position() {
        let output = styles(".a { color: red; font-size: 10px; color: blue; }\n.a { font-size: 2rem; }");
        assert_eq!(
            output.styles[0].attributes(),
            vec!["android:textColor=BLUE", "android:textSize=24sp"]
        );
    }

    #[test]
    fn test_invalid_override_keeps_earlier_value() {
        let output = styles(".a { font-size: 10px; font-size: calc(1px + 2px); }");
        assert_eq!(output.styles[0].attributes(), vec!["android:textSize=10sp"]);
    }

    #[test]
    fn test_style_prefix_and_seed_variables() {
        let mut options = ConvertOptions::default();
        options.style_prefix = Some("AppTheme.".to_string());
        options.custom_variables.insert("accent".to_string(), "#FF8800".to_string());

        let output = run(".chip-label { color: var(--accent); }", &options);
        assert_eq!(output.styles[0].name, "AppTheme.chip_label");
        assert_eq!(output.styles[0].attributes(), vec!["android:textColor=#FF8800"]);
    }

    #[test]
    fn test_color_mode() {
        let mut options = ConvertOptions::default();
        options.mode = OutputMode::Colors;

        let source = ":root {\n  --brand-primary: #abcdef;\n  --text: var(--brand-primary);\n  --spacing: 8px;\n  --shade: rgba(0, 0, 0, 0.5);\n  --later: var(--missing);\n}\n.a:hover { color: red; }";
        let output = run(source, &options);

        assert!(output.styles.is_empty());
        let colors: Vec<_> = output
            .colors
            .iter()
            .map(|c| (c.name.as_str(), c.value.as_str(), c.commented))
            .collect();
        assert_eq!(
            colors,
            vec![
                ("brand_primary", "#ABCDEF", false),
                ("text", "#ABCDEF", false),
                ("shade", "#80000000", false),
                ("later", "var(missing)", true),
            ]
        );
        assert!(output.diagnostics.iter().any(|d| matches!(d, Diagnostic::NotAColor { name, .. } if name == "spacing")));
        // Selectors are not classified in color mode
        assert!(!output.diagnostics.iter().any(|d| matches!(d, Diagnostic::UnsupportedSelector { .. })));
    }

    #[test]
    fn test_cycle_is_reported_and_commented() {
        let output = styles("--a: var(--b);\n--b: var(--a);\n.x { color: var(--a); }");
        assert!(output.styles[0].items[0].commented);
        assert!(output.diagnostics.iter().any(|d| matches!(d, Diagnostic::VariableCycle { .. })));
    }

    fn colors_of(output: &ConversionOutput) -> Vec<(&str, &str, bool)> {
        output
            .colors
            .iter()
            .map(|c| (c.name.as_str(), c.value.as_str(), c.commented))
            .collect()
    }

    fn color_options() -> ConvertOptions {
        ConvertOptions {
            mode: OutputMode::Colors,
            ..Default::default()
        }
    }

    #[test]
    fn test_color_mode_forward_reference_is_unresolved() {
        let output = run("--text: var(--brand);\n--brand: #112233;", &color_options());

        assert_eq!(
            colors_of(&output),
            vec![("text", "var(brand)", true), ("brand", "#112233", false)]
        );
        assert!(output
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::UnresolvedVariable { line: 1, property, .. } if property == "--text")));
    }

    #[test]
    fn test_color_mode_redefinition_keeps_position() {
        let output = run(":root { --a: #111111; --b: var(--a); --a: #222222; }", &color_options());
        assert_eq!(
            colors_of(&output),
            vec![("a", "#222222", false), ("b", "#111111", false)]
        );
    }

    #[test]
    fn test_color_mode_named_colors() {
        let output = run(
            ":root { --brand: red; --bg: white; --clear: transparent; --gap: 8px; }",
            &color_options(),
        );

        assert_eq!(
            colors_of(&output),
            vec![
                ("brand", "RED", false),
                ("bg", "WHITE", false),
                ("clear", "TRANSPARENT", false),
            ]
        );
        assert_eq!(output.diagnostics.len(), 1);
        assert!(matches!(output.diagnostics.iter().next(), Some(Diagnostic::NotAColor { name, .. }) if name == "gap"));
    }

    #[test]
    fn test_color_mode_hex_is_upper_cased_as_written() {
        let output = run(":root { --a: #fff; --b: #11223380; }", &color_options());
        assert_eq!(
            colors_of(&output),
            vec![("a", "#FFF", false), ("b", "#11223380", false)]
        );
    }

    #[test]
    fn test_doubling_chain_stays_bounded() {
        let mut source = String::from("--v0: 1px;\n");
        for level in 1..40 {
            source.push_str(&format!("--v{level}: var(--v{prev}) var(--v{prev});\n", prev = level - 1));
        }
        source.push_str(".a { padding: var(--v39); }");

        let output = styles(&source);
        assert!(output.styles[0].items.iter().all(|item| item.value.len() < 64 * 1024));
        assert!(output.diagnostics.iter().any(|d| matches!(d, Diagnostic::ExpansionLimit { .. })));

        let output = run(&source, &color_options());
        assert!(output.colors.iter().all(|color| color.value.len() < 64 * 1024));
        assert!(output.diagnostics.iter().any(|d| matches!(d, Diagnostic::ExpansionLimit { .. })));
    }

    #[test]
    fn test_spaced_reference_is_commented() {
        let output = styles(".a { background-color: var( --missing); }");
        let item = &output.styles[0].items[0];
        assert!(item.commented);
        assert_eq!(item.value, "var( missing)");
        assert!(output
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::UnresolvedVariable { .. })));
    }
}
