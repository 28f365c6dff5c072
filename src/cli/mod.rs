// FILE: src/cli/mod.rs

mod config;
mod handlers;

pub use config::ConfigFile;

use crate::error::{ConvertError, Result};
use crate::{ConvertOptions, OutputMode};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::time::Instant;

pub struct Cli {
    config: ConfigFile,
    start_time: Instant,
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

impl Cli {
    pub fn new() -> Self {
        Self {
            config: ConfigFile::default(),
            start_time: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.start_time = Instant::now();
        let matches = self.build_cli().get_matches();

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        self.setup_logging(matches.get_count("verbose"));

        let result = handlers::handle_convert_command(self, &matches);
        log::debug!("Finished in {}ms", self.start_time.elapsed().as_millis());
        result
    }

    fn build_cli(&self) -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .author("css2android Development Team")
            .arg(Arg::new("input").help("Input CSS file").required(true).index(1))
            .arg(Arg::new("output").help("Output XML file").required(true).index(2))
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path (.json or .toml)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
            .arg(
                Arg::new("colors")
                    .long("colors")
                    .help("Generate colors.xml from custom properties instead of styles")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("prefix")
                    .short('p')
                    .long("prefix")
                    .value_name("PREFIX")
                    .help("Prefix for every style name, e.g. AppTheme."),
            )
            .arg(
                Arg::new("define")
                    .short('D')
                    .long("define")
                    .value_name("NAME=VALUE")
                    .help("Define a custom property before the stylesheet is read")
                    .action(ArgAction::Append),
            )
            .arg(
                Arg::new("debug")
                    .short('d')
                    .long("debug")
                    .help("Log every conversion phase")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("stats")
                    .long("stats")
                    .help("Print conversion statistics as JSON")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("watch")
                    .short('w')
                    .long("watch")
                    .help("Watch the input file and convert on every change")
                    .action(ArgAction::SetTrue),
            )
    }

    fn setup_logging(&self, verbose_count: u8) {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .init();
    }

    pub fn build_convert_options(&self, matches: &ArgMatches) -> Result<ConvertOptions> {
        let mut options = ConvertOptions::default();

        options.mode = if matches.get_flag("colors") {
            OutputMode::Colors
        } else {
            self.config.mode.unwrap_or_default()
        };
        options.debug_mode = matches.get_flag("debug") || self.config.debug.unwrap_or(false);
        options.style_prefix = matches
            .get_one::<String>("prefix")
            .cloned()
            .or_else(|| self.config.style_prefix.clone());

        if let Some(defines) = matches.get_many::<String>("define") {
            for define in defines {
                let Some((name, value)) = define.split_once('=') else {
                    return Err(ConvertError::invalid_format(format!(
                        "Invalid custom property definition: {}. Use NAME=VALUE format.",
                        define
                    )));
                };
                let name = name.trim().trim_start_matches("--");
                if name.is_empty() {
                    return Err(ConvertError::invalid_format(format!(
                        "Missing custom property name in: {}",
                        define
                    )));
                }
                options.custom_variables.insert(name.to_string(), value.trim().to_string());
            }
        }
        if let Some(config_vars) = &self.config.custom_variables {
            for (name, value) in config_vars {
                options
                    .custom_variables
                    .entry(name.trim_start_matches("--").to_string())
                    .or_insert_with(|| value.clone());
            }
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_build_convert_options() {
        let cli = Cli::new();
        let matches = cli
            .build_cli()
            .try_get_matches_from(vec![
                "css2android", "in.css", "out.xml",
                "--colors",
                "--prefix", "AppTheme.",
                "-D", "brand=#112233",
                "-D", "gap=4px",
                "--debug",
            ])
            .unwrap();

        let options = cli.build_convert_options(&matches).unwrap();
        assert_eq!(options.mode, OutputMode::Colors);
        assert_eq!(options.style_prefix.as_deref(), Some("AppTheme."));
        assert_eq!(options.custom_variables.get("brand").map(String::as_str), Some("#112233"));
        assert_eq!(options.custom_variables.get("gap").map(String::as_str), Some("4px"));
        assert!(options.debug_mode);
    }

    #[test]
    fn test_positional_arguments_are_required() {
        let cli = Cli::new();
        assert!(cli.build_cli().try_get_matches_from(vec!["css2android", "in.css"]).is_err());
        assert!(cli
            .build_cli()
            .try_get_matches_from(vec!["css2android", "a.css", "b.xml", "c.xml"])
            .is_err());
    }

    #[test]
    fn test_invalid_define() {
        let cli = Cli::new();
        let matches = cli
            .build_cli()
            .try_get_matches_from(vec!["css2android", "in.css", "out.xml", "-D", "brand"])
            .unwrap();
        assert!(matches!(
            cli.build_convert_options(&matches),
            Err(ConvertError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_config_values_yield_to_flags() {
        let mut vars = HashMap::new();
        vars.insert("brand".to_string(), "#000000".to_string());
        vars.insert("--accent".to_string(), "#FFFFFF".to_string());

        let mut cli = Cli::new();
        cli.config = ConfigFile {
            mode: Some(OutputMode::Colors),
            style_prefix: Some("Config.".to_string()),
            custom_variables: Some(vars),
            debug: None,
        };

        let matches = cli
            .build_cli()
            .try_get_matches_from(vec!["css2android", "in.css", "out.xml", "-D", "brand=#112233", "-p", "Cli."])
            .unwrap();
        let options = cli.build_convert_options(&matches).unwrap();

        assert_eq!(options.mode, OutputMode::Colors);
        assert_eq!(options.style_prefix.as_deref(), Some("Cli."));
        assert_eq!(options.custom_variables.get("brand").map(String::as_str), Some("#112233"));
        assert_eq!(options.custom_variables.get("accent").map(String::as_str), Some("#FFFFFF"));
        assert!(!options.debug_mode);
    }
}
