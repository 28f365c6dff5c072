//! Stylesheet parser: source text to a flat list of rules
//!
//! Parsing never fails. Fragments that do not form a `property: value`
//! pair are dropped, at-rules and nested blocks are skipped with a
//! diagnostic, and an unterminated block at end of input still yields the
//! declarations read so far.

use crate::error::{Diagnostic, Diagnostics};
use crate::types::{Declaration, Rule, CUSTOM_PROPERTY_PREFIX};

/// Rules in source order together with the diagnostics raised while reading them
#[derive(Debug, Default)]
pub struct ParsedStylesheet {
    pub rules: Vec<Rule>,
    pub diagnostics: Diagnostics,
}

/// Parse `source` and return only the rules
pub fn parse_stylesheet(source: &str) -> Vec<Rule> {
    Parser::new(source).parse().rules
}

pub struct Parser {
    chars: Vec<char>,
    position: usize,
    line: usize,
    diagnostics: Diagnostics,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self {
            chars: strip_comments(source).chars().collect(),
            position: 0,
            line: 1,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn parse(mut self) -> ParsedStylesheet {
        let mut rules: Vec<Rule> = Vec::new();
        let mut prelude = String::new();
        let mut prelude_line = self.line;

        while let Some(c) = self.advance() {
            match c {
                '{' => {
                    let head = prelude.trim().to_string();
                    prelude.clear();

                    if head.starts_with('@') {
                        self.skip_block();
                        self.diagnostics.push(Diagnostic::UnsupportedAtRule {
                            line: prelude_line,
                            name: at_rule_name(&head),
                        });
                        continue;
                    }

                    let body_line = self.line;
                    let body = self.read_block();
                    let selectors = split_selectors(&head);
                    if selectors.is_empty() {
                        continue;
                    }

                    rules.push(Rule {
                        selectors,
                        declarations: parse_declarations(&body, body_line),
                        line: prelude_line,
                    });
                }
                ';' => {
                    let statement = prelude.trim().to_string();
                    prelude.clear();
                    self.handle_statement(&statement, prelude_line, &mut rules);
                }
                '}' => {
                    // Stray closing brace at top level
                    prelude.clear();
                }
                _ => {
                    if prelude.trim().is_empty() && !c.is_whitespace() {
                        prelude_line = self.line;
                    }
                    prelude.push(c);
                }
            }
        }

        let trailing = prelude.trim().to_string();
        if !trailing.is_empty() {
            self.handle_statement(&trailing, prelude_line, &mut rules);
        }

        ParsedStylesheet {
            rules,
            diagnostics: self.diagnostics,
        }
    }

    /// A top-level fragment terminated by `;` (or end of input)
    fn handle_statement(&mut self, statement: &str, line: usize, rules: &mut Vec<Rule>) {
        if statement.is_empty() {
            return;
        }
        if statement.starts_with('@') {
            self.diagnostics.push(Diagnostic::UnsupportedAtRule {
                line,
                name: at_rule_name(statement),
            });
            return;
        }

        let Some(declaration) = parse_declaration(statement, line) else {
            log::debug!("Line {}: dropping unparseable fragment '{}'", line, statement);
            return;
        };

        // Consecutive loose declarations share one selector-less rule
        if let Some(rule) = rules.last_mut().filter(|rule| rule.selectors.is_empty()) {
            rule.declarations.push(declaration);
        } else {
            rules.push(Rule {
                selectors: Vec::new(),
                declarations: vec![declaration],
                line,
            });
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.position).copied()?;
        self.position += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Read a declaration block up to its closing brace, dropping nested blocks
    fn read_block(&mut self) -> String {
        let mut body = String::new();
        let mut quote: Option<char> = None;

        while let Some(c) = self.advance() {
            if let Some(q) = quote {
                body.push(c);
                if c == q {
                    quote = None;
                }
                continue;
            }

            match c {
                '"' | '\'' => {
                    quote = Some(c);
                    body.push(c);
                }
                '}' => return body,
                '{' => {
                    // Nested rule: its prelude is the text since the last `;`
                    let cut = body.rfind(';').map_or(0, |i| i + 1);
                    let nested = body[cut..].trim().to_string();
                    let newlines = body[cut..].matches('\n').count();
                    body.truncate(cut);
                    // Keep line numbering of later declarations intact
                    body.extend(std::iter::repeat('\n').take(newlines));
                    let line = self.line;
                    self.skip_block();
                    body.extend(std::iter::repeat('\n').take(self.line - line));
                    if !nested.is_empty() {
                        self.diagnostics.push(Diagnostic::UnsupportedSelector {
                            line,
                            selector: nested,
                            reason: "nested rule",
                        });
                    }
                }
                _ => body.push(c),
            }
        }

        body
    }

    /// Skip to the brace closing the block just opened
    fn skip_block(&mut self) {
        let mut depth = 0usize;
        let mut quote: Option<char> = None;

        while let Some(c) = self.advance() {
            if let Some(q) = quote {
                if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => quote = Some(c),
                '{' => depth += 1,
                '}' if depth == 0 => return,
                '}' => depth -= 1,
                _ => {}
            }
        }
    }
}

/// Replace `/* ... */` comments with spaces, keeping newlines so line numbers survive
fn strip_comments(source: &str) -> String {
    let mut output = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let mut previous = '\0';
            for inner in chars.by_ref() {
                if previous == '*' && inner == '/' {
                    break;
                }
                if inner == '\n' {
                    output.push('\n');
                }
                previous = inner;
            }
            output.push(' ');
            continue;
        }
        output.push(c);
    }

    output
}

fn at_rule_name(head: &str) -> String {
    head.trim_start_matches('@')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// Split a selector group on top-level commas
fn split_selectors(head: &str) -> Vec<String> {
    let mut selectors = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in head.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                selectors.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    selectors.push(current);

    selectors
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split a block body on `;` outside parentheses and quotes
fn parse_declarations(body: &str, start_line: usize) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    let mut segment = String::new();
    let mut segment_line = start_line;
    let mut line = start_line;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in body.chars() {
        if c == '\n' {
            line += 1;
        }

        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                declarations.extend(parse_declaration(&segment, segment_line));
                segment.clear();
                continue;
            }
            _ => {}
        }

        if segment.trim().is_empty() && !c.is_whitespace() {
            segment_line = line;
        }
        segment.push(c);
    }
    declarations.extend(parse_declaration(&segment, segment_line));

    declarations
}

fn parse_declaration(segment: &str, line: usize) -> Option<Declaration> {
    let (property, value) = segment.split_once(':')?;
    let property = property.trim();
    let value = value.trim().trim_end_matches(';').trim();

    if property.is_empty() || value.is_empty() {
        return None;
    }
    if !property
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return None;
    }

    // Custom property names are case-sensitive
    let property = if property.starts_with(CUSTOM_PROPERTY_PREFIX) {
        property.to_string()
    } else {
        property.to_ascii_lowercase()
    };

    Some(Declaration::new(property, value, line))
}
