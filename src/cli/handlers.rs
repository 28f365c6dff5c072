// FILE: src/cli/handlers.rs
use crate::{convert_file_with_options, ConversionStats, ConvertError, ConvertOptions, OutputMode, Result};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Instant;

// --- CONVERT ---
pub fn handle_convert_command(cli: &super::Cli, matches: &clap::ArgMatches) -> Result<()> {
    let (Some(input_path), Some(output_path)) = (
        matches.get_one::<String>("input"),
        matches.get_one::<String>("output"),
    ) else {
        return Err(ConvertError::invalid_format("Usage: css2android <input-css-file> <output-xml-file>"));
    };

    if !Path::new(input_path).exists() {
        return Err(ConvertError::FileNotFound {
            path: format!("Input CSS file '{}' not found.", input_path),
        });
    }

    let options = cli.build_convert_options(matches)?;

    if matches.get_flag("watch") {
        watch_and_convert(input_path, output_path, options)
    } else {
        let stats = convert_single_file(input_path, output_path, &options)?;
        if matches.get_flag("stats") {
            print_stats(&stats)?;
        }
        Ok(())
    }
}

fn convert_single_file(
    input_path: &str,
    output_path: &str,
    options: &ConvertOptions,
) -> Result<ConversionStats> {
    let convert_start = Instant::now();
    let stats = convert_file_with_options(input_path, output_path, options)?;

    let kind = match options.mode {
        OutputMode::Styles => "styles",
        OutputMode::Colors => "colors",
    };
    println!("Android {} XML file generated: {}", kind, output_path);
    if stats.diagnostic_count > 0 {
        println!("   {} diagnostics (run with -v for details)", stats.diagnostic_count);
    }
    log::info!("Converted in {}ms", convert_start.elapsed().as_millis());

    Ok(stats)
}

fn print_stats(stats: &ConversionStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats)
        .map_err(|e| ConvertError::invalid_format(format!("Failed to serialize stats: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn watch_and_convert(input_path: &str, output_path: &str, options: ConvertOptions) -> Result<()> {
    println!("Watching {} for changes...", input_path);

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                if let Err(e) = tx.send(event) {
                    eprintln!("Watch error: {}", e);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| ConvertError::watch(format!("Failed to create file watcher: {}", e)))?;

    watcher
        .watch(Path::new(input_path), RecursiveMode::NonRecursive)
        .map_err(|e| ConvertError::watch(format!("Failed to watch file: {}", e)))?;

    if let Err(e) = convert_single_file(input_path, output_path, &options) {
        eprintln!("Initial conversion failed: {}", e);
    }

    loop {
        match rx.recv() {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    continue;
                }
                log::info!("{} changed, converting again", input_path);
                if let Err(e) = convert_single_file(input_path, output_path, &options) {
                    eprintln!("Conversion failed: {}", e);
                }
            }
            Err(e) => {
                return Err(ConvertError::watch(format!("Watch channel closed: {}", e)));
            }
        }
    }
}
