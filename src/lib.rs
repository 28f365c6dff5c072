//! CSS to Android resource XML converter
//!
//! Translates stylesheet source into Android `styles.xml` (from class and
//! tag selectors) or `colors.xml` (from custom properties).
//!
//! # Basic Usage
//!
//! ```rust
//! use css2android::convert_source;
//!
//! let xml = convert_source(".title { color: #FF0000; font-size: 1rem; }");
//! assert!(xml.contains(r#"<item name="android:textSize">12sp</item>"#));
//! ```
//!
//! # Conversion Pipeline
//!
//! 1. **Parse** - split the stylesheet into rules and declarations
//! 2. **Traverse** - capture custom properties in source order, classify
//!    selectors, resolve `var()` references against the definitions seen so far
//! 3. **Translate** - map each declaration to zero or more Android items
//! 4. **Generate** - serialize styles or colors as resource XML
//!
//! The core never fails. Anything it cannot translate becomes a
//! [`Diagnostic`], logged through the `log` facade and returned in
//! [`Conversion::diagnostics`].

pub mod types;
pub mod error;
pub mod utils;
pub mod parser;
pub mod selector;
pub mod variable_context;
pub mod translator;
pub mod converter;
pub mod codegen;
pub mod cli;

use serde::Serialize;
use std::collections::BTreeMap;

// Re-export commonly used types and functions
pub use error::{ConvertError, Diagnostic, Diagnostics, Result};
pub use types::*;
pub use utils::{color_literal, convert_units, normalize_color, sanitize_resource_name};
pub use parser::{parse_stylesheet, ParsedStylesheet, Parser};
pub use selector::{classify_selector, SelectorKind};
pub use variable_context::{contains_reference, CustomProperty, CustomPropertyTable, Resolved, VariableResolver};
pub use translator::{translate, CssProperty, Translation};
pub use converter::{ConversionOutput, Converter};
pub use codegen::CodeGenerator;
pub use cli::Cli;

/// Converter version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Conversion options and settings
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Which resource document to produce
    pub mode: OutputMode,

    /// Log pipeline phases at debug level
    pub debug_mode: bool,

    /// Prepended to every style name, e.g. `AppTheme.`
    pub style_prefix: Option<String>,

    /// Custom properties defined before the stylesheet is read (names without `--`)
    pub custom_variables: BTreeMap<String, String>,
}

/// Conversion statistics and metrics
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionStats {
    /// Source size in bytes
    pub source_size: u64,

    /// Generated XML size in bytes
    pub output_size: u64,

    pub rule_count: usize,
    pub style_count: usize,
    pub item_count: usize,
    pub color_count: usize,
    pub custom_property_count: usize,

    /// Items and colors emitted comment-wrapped
    pub unresolved_count: usize,

    pub diagnostic_count: usize,

    /// Conversion time in milliseconds
    pub convert_time_ms: u64,
}

/// A finished conversion
#[derive(Debug)]
pub struct Conversion {
    pub xml: String,
    pub styles: Vec<AndroidStyle>,
    pub colors: Vec<ColorResource>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: ConversionStats,
}

/// Convert stylesheet text to styles XML with default options
pub fn convert_source(source: &str) -> String {
    convert_source_with_options(source, &ConvertOptions::default()).xml
}

/// Convert stylesheet text with custom options. Never fails.
pub fn convert_source_with_options(source: &str, options: &ConvertOptions) -> Conversion {
    let start_time = std::time::Instant::now();

    if options.debug_mode {
        log::debug!("Starting {} conversion", options.mode);
        log::debug!("Source length: {} characters", source.len());
    }

    // Phase 1: Parsing
    let parsed = Parser::new(source).parse();
    if options.debug_mode {
        log::debug!("Phase 1 complete. Parsed {} rules", parsed.rules.len());
    }

    // Phase 2: Traversal and translation
    let mut converter = Converter::new(options);
    converter.process_rules(&parsed.rules);
    let output = converter.finish();
    if options.debug_mode {
        log::debug!(
            "Phase 2 complete. {} styles, {} colors, {} custom properties",
            output.styles.len(),
            output.colors.len(),
            output.table.len()
        );
    }

    // Phase 3: XML generation
    let xml = match options.mode {
        OutputMode::Styles => CodeGenerator::new().generate_styles(&output.styles),
        OutputMode::Colors => CodeGenerator::new().generate_colors(&output.colors),
    };

    let mut diagnostics = parsed.diagnostics;
    diagnostics.append(output.diagnostics);
    let diagnostics = diagnostics.into_vec();

    let item_count = output.styles.iter().map(|style| style.items.len()).sum();
    let unresolved_count = output
        .styles
        .iter()
        .flat_map(|style| style.items.iter())
        .filter(|item| item.commented)
        .count()
        + output.colors.iter().filter(|color| color.commented).count();

    let stats = ConversionStats {
        source_size: source.len() as u64,
        output_size: xml.len() as u64,
        rule_count: parsed.rules.len(),
        style_count: output.styles.len(),
        item_count,
        color_count: output.colors.len(),
        custom_property_count: output.table.len(),
        unresolved_count,
        diagnostic_count: diagnostics.len(),
        convert_time_ms: start_time.elapsed().as_millis() as u64,
    };

    if options.debug_mode {
        log::debug!("Phase 3 complete. Full stats: {:?}", stats);
    }

    Conversion {
        xml,
        styles: output.styles,
        colors: output.colors,
        diagnostics,
        stats,
    }
}

/// Convert a stylesheet file with default options
pub fn convert_file(input_path: &str, output_path: &str) -> Result<ConversionStats> {
    convert_file_with_options(input_path, output_path, &ConvertOptions::default())
}

/// Read `input_path`, convert it, and write the XML verbatim to `output_path`
pub fn convert_file_with_options(
    input_path: &str,
    output_path: &str,
    options: &ConvertOptions,
) -> Result<ConversionStats> {
    use std::fs;

    if options.debug_mode {
        log::info!("{} v{}", NAME, VERSION);
        log::info!("Converting '{}' to '{}' ({})...", input_path, output_path, options.mode);
        log::debug!("Convert options: {:?}", options);
    }

    let source = fs::read_to_string(input_path).map_err(|e| ConvertError::FileNotFound {
        path: format!("{}: {}", input_path, e),
    })?;

    let conversion = convert_source_with_options(&source, options);

    fs::write(output_path, &conversion.xml)?;

    log::info!(
        "Wrote {} ({} bytes, {} diagnostics)",
        output_path,
        conversion.stats.output_size,
        conversion.stats.diagnostic_count
    );

    Ok(conversion.stats)
}
