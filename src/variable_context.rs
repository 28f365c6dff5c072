//! Custom property tracking and `var()` substitution
//!
//! The [`CustomPropertyTable`] is filled in source order while rules are
//! traversed, so a reference can only see definitions that appeared before
//! it. The [`VariableResolver`] substitutes `var(--name)` and
//! `var(--name, fallback)` references recursively against the table as it
//! stands at the moment of the lookup. Each resolve call carries a
//! substitution budget so self-multiplying chains stay bounded.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Substitutions allowed in a single resolve call
pub const MAX_SUBSTITUTIONS: usize = 256;

static REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"var\(\s*--([A-Za-z0-9_-]+)\s*").expect("var() pattern is a valid regex")
});

/// True when `value` still holds a `var(--name` reference, with or without inner spaces
pub fn contains_reference(value: &str) -> bool {
    REFERENCE_PATTERN.is_match(value)
}

/// One `--name: value` definition as written in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomProperty {
    pub name: String,
    pub value: String,
    pub line: usize,
}

/// Custom properties in first-definition order; redefinitions replace the value
#[derive(Debug, Clone, Default)]
pub struct CustomPropertyTable {
    entries: Vec<CustomProperty>,
    index: HashMap<String, usize>,
}

impl CustomPropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or redefine a property. `name` excludes the `--` marker.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>, line: usize) {
        let name = name.into();
        let value = value.into();

        if let Some(&position) = self.index.get(&name) {
            let existing = &mut self.entries[position];
            log::debug!(
                "Line {}: custom property '--{}' redefined. Previous definition at line {}",
                line, name, existing.line
            );
            existing.value = value;
            existing.line = line;
        } else {
            self.index.insert(name.clone(), self.entries.len());
            self.entries.push(CustomProperty { name, value, line });
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&position| self.entries[position].value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomProperty> {
        self.entries.iter()
    }
}

/// Outcome of resolving one value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    /// Referenced names with no definition and no fallback
    pub unresolved: Vec<String>,
    /// Names at which a reference cycle was cut
    pub cycles: Vec<String>,
    /// Names left unexpanded once the substitution budget ran out
    pub truncated: Vec<String>,
}

impl Resolved {
    /// True when no `var(--...)` reference is left in the value
    pub fn is_fully_resolved(&self) -> bool {
        !contains_reference(&self.value)
    }

    /// Every name that kept its reference, in encounter order without repeats
    pub fn unresolved_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.unresolved.iter().chain(&self.cycles).chain(&self.truncated) {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}

pub struct VariableResolver {
    max_substitutions: usize,
}

impl Default for VariableResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableResolver {
    pub fn new() -> Self {
        Self::with_limit(MAX_SUBSTITUTIONS)
    }

    pub fn with_limit(max_substitutions: usize) -> Self {
        Self { max_substitutions }
    }

    /// Substitute every `var()` reference in `raw` using `table`
    pub fn resolve(&self, table: &CustomPropertyTable, raw: &str) -> Resolved {
        let mut resolved = Resolved::default();
        if !raw.contains("var(") {
            resolved.value = raw.to_string();
            return resolved;
        }

        let mut chain = Vec::new();
        let mut budget = self.max_substitutions;
        resolved.value = self.substitute(table, raw, &mut chain, &mut budget, &mut resolved);
        resolved
    }

    /// `chain` holds the names currently being expanded; seeing one again is a cycle.
    /// `budget` counts down once per table or fallback expansion.
    fn substitute(
        &self,
        table: &CustomPropertyTable,
        text: &str,
        chain: &mut Vec<String>,
        budget: &mut usize,
        resolved: &mut Resolved,
    ) -> String {
        let mut output = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(captures) = REFERENCE_PATTERN.captures(rest) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                break;
            };
            let name = name.as_str();
            let after = &rest[whole.end()..];

            let Some((fallback, consumed)) = split_reference_tail(after) else {
                // Unterminated reference, keep the remainder verbatim
                break;
            };

            output.push_str(&rest[..whole.start()]);
            let reference = &rest[whole.start()..whole.end() + consumed];

            let expansion = table.get(name).or(fallback);

            if chain.iter().any(|seen| seen == name) {
                resolved.cycles.push(name.to_string());
                output.push_str(reference);
            } else if expansion.is_some() && *budget == 0 {
                if !resolved.truncated.iter().any(|seen| seen == name) {
                    resolved.truncated.push(name.to_string());
                }
                output.push_str(reference);
            } else if let Some(value) = table.get(name) {
                *budget -= 1;
                chain.push(name.to_string());
                let expanded = self.substitute(table, value.trim(), chain, budget, resolved);
                chain.pop();
                output.push_str(&expanded);
            } else if let Some(fallback) = fallback {
                *budget -= 1;
                let expanded = self.substitute(table, fallback.trim(), chain, budget, resolved);
                output.push_str(&expanded);
            } else {
                resolved.unresolved.push(name.to_string());
                output.push_str(reference);
            }

            rest = &after[consumed..];
        }

        output.push_str(rest);
        output
    }
}

/// Given the text after `var(--name`, return the optional fallback and the
/// number of bytes up to and including the closing parenthesis
fn split_reference_tail(after: &str) -> Option<(Option<&str>, usize)> {
    if after.starts_with(')') {
        return Some((None, 1));
    }
    if !after.starts_with(',') {
        return None;
    }

    let mut depth = 0usize;
    for (i, c) in after.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some((Some(&after[1..i]), i + 1)),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}
