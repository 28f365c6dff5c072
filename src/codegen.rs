//! Android resource XML generation

use crate::types::{AndroidItem, AndroidStyle, ColorResource, XML_DECLARATION};

pub struct CodeGenerator {
    output: String,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// `<resources>` document with one `<style>` per entry
    pub fn generate_styles(mut self, styles: &[AndroidStyle]) -> String {
        self.output.push_str("<resources>\n");
        for style in styles {
            self.write_style(style);
        }
        self.output.push_str("</resources>");
        self.output
    }

    /// XML declaration plus a `<resources>` document of `<color>` entries
    pub fn generate_colors(mut self, colors: &[ColorResource]) -> String {
        self.output.push_str(XML_DECLARATION);
        self.output.push('\n');
        self.output.push_str("<resources>\n");
        for color in colors {
            let element = format!(
                "<color name=\"{}\">{}</color>",
                escape_attribute(&color.name),
                escape_text(&color.value)
            );
            self.write_line(1, &element, color.commented);
        }
        self.output.push_str("</resources>");
        self.output
    }

    fn write_style(&mut self, style: &AndroidStyle) {
        self.output
            .push_str(&format!("\t<style name=\"{}\">\n", escape_attribute(&style.name)));
        for item in &style.items {
            self.write_item(item);
        }
        self.output.push_str("\t</style>\n");
    }

    fn write_item(&mut self, item: &AndroidItem) {
        let element = format!(
            "<item name=\"{}\">{}</item>",
            escape_attribute(&item.name),
            escape_text(&item.value)
        );
        self.write_line(2, &element, item.commented);
    }

    fn write_line(&mut self, indent: usize, element: &str, commented: bool) {
        for _ in 0..indent {
            self.output.push('\t');
        }
        if commented {
            self.output.push_str(&comment(element));
        } else {
            self.output.push_str(element);
        }
        self.output.push('\n');
    }
}

/// Wrap in an XML comment; comment bodies may not contain `--`
fn comment(body: &str) -> String {
    let mut body = body.to_string();
    while body.contains("--") {
        body = body.replace("--", "-");
    }
    let body = body.trim_end_matches('-').trim_end();
    format!("<!-- {} -->", body)
}

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attribute(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
