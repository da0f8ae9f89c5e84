//! Command-line interface components.
//!
//! The converter has always been invoked as
//! `agmip2monica -filename <path> -out <dir>`. Those single-dash spellings are
//! rewritten to clap's `--filename`/`--out` before parsing, and arguments the
//! converter does not know are dropped instead of rejected.

use crate::config::ConverterConfig;
use crate::constants::{
    DEFAULT_INPUT_FILENAME, DEFAULT_OUTPUT_DIR_NAME, EXIT_FAILURE, MONICA_DATE_FORMAT,
};
use crate::converter::Converter;
use crate::error::ConvertError;
use crate::models::ConversionStats;
use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use colored::*;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Parser, Debug, Clone)]
#[command(name = "agmip2monica")]
#[command(about = "Convert AgMIP JSON field-trial data to MONICA climate, site and crop files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(args_override_self = true)]
pub struct Args {
    /// AgMIP JSON input document
    #[arg(long = "filename", value_name = "PATH", default_value = DEFAULT_INPUT_FILENAME)]
    pub filename: PathBuf,

    /// Output directory (default: AgMIPToMonicaOut in the user's documents folder)
    #[arg(long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// JSON file overriding the default site and crop parameters
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors (the later of -v/-q wins)
    #[arg(short, long, overrides_with = "verbose")]
    pub quiet: bool,
}

/// Options that take a value, in both spellings
const VALUE_OPTIONS: &[(&str, &str)] = &[
    ("-filename", "--filename"),
    ("-out", "--out"),
    ("-config", "--config"),
];

/// Flags passed through to clap unchanged
const PASSTHROUGH_FLAGS: &[&str] = &[
    "-v",
    "--verbose",
    "-q",
    "--quiet",
    "-h",
    "--help",
    "-V",
    "--version",
];

/// Rewrite legacy single-dash options and separate out unknown arguments.
///
/// Returns the argument list for clap (program name first) and the ignored
/// arguments. An option without a following value is ignored.
pub fn normalize_args<I, T>(raw: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut raw = raw.into_iter().map(Into::into);
    let mut normalized = vec![raw.next().unwrap_or_else(|| "agmip2monica".to_string())];
    let mut ignored = Vec::new();

    while let Some(arg) = raw.next() {
        let option = VALUE_OPTIONS
            .iter()
            .find(|(legacy, long)| arg == *legacy || arg == *long);

        if let Some((_, long)) = option {
            match raw.next() {
                Some(value) => {
                    normalized.push(long.to_string());
                    normalized.push(value);
                }
                None => ignored.push(arg),
            }
        } else if VALUE_OPTIONS
            .iter()
            .any(|(_, long)| arg.starts_with(&format!("{}=", long)))
            || PASSTHROUGH_FLAGS.contains(&arg.as_str())
        {
            normalized.push(arg);
        } else {
            ignored.push(arg);
        }
    }

    (normalized, ignored)
}

impl Args {
    /// Parse the process arguments, accepting the legacy spellings.
    ///
    /// Help and version output exit normally; any other parse failure exits
    /// with the converter's failure code.
    pub fn parse_legacy() -> (Self, Vec<String>) {
        match Self::parse_legacy_from(std::env::args()) {
            Ok(parsed) => parsed,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => {
                let _ = e.print();
                std::process::exit(EXIT_FAILURE);
            }
        }
    }

    /// Parse an explicit argument list (program name first).
    /// A repeated option keeps its last value.
    pub fn parse_legacy_from<I, T>(raw: I) -> Result<(Self, Vec<String>), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let (normalized, ignored) = normalize_args(raw);
        Ok((Self::try_parse_from(normalized)?, ignored))
    }

    /// Output directory, defaulting to AgMIPToMonicaOut in the documents folder
    pub fn output_path(&self) -> crate::Result<PathBuf> {
        match &self.out {
            Some(path) => Ok(path.clone()),
            None => default_output_path().ok_or_else(|| ConvertError::InvalidOutputDirectory {
                path: PathBuf::from(DEFAULT_OUTPUT_DIR_NAME),
                reason: "cannot determine the user's documents folder".to_string(),
            }),
        }
    }

    /// Get the log level from the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// `<documents>/AgMIPToMonicaOut`, falling back to `<home>/Documents`
pub fn default_output_path() -> Option<PathBuf> {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .map(|documents| documents.join(DEFAULT_OUTPUT_DIR_NAME))
}

/// Set up structured logging based on CLI arguments
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("agmip2monica={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Resolve paths and configuration, then run the conversion
pub fn run(args: &Args, ignored: &[String]) -> anyhow::Result<ConversionStats> {
    for arg in ignored {
        warn!("Ignoring unknown argument '{}'", arg);
    }
    debug!("Command line arguments: {:?}", args);

    let output_path = args.output_path()?;

    let config = match &args.config_file {
        Some(path) => ConverterConfig::from_json_file(path)?,
        None => ConverterConfig::default(),
    };

    let converter = Converter::new(args.filename.clone(), output_path)?.with_config(config);

    converter
        .run()
        .with_context(|| format!("Failed to convert {}", args.filename.display()))
}

/// Print the end-of-run summary
pub fn print_summary(stats: &ConversionStats) {
    println!("\n{}", "Conversion complete".bright_green().bold());
    println!(
        "  {} {}",
        "Weather days:".bright_cyan(),
        stats.weather_days.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Soil layers:".bright_cyan(),
        stats.soil_layers.to_string().bright_white().bold()
    );
    println!(
        "  {} {} ({} crop)",
        "Worksteps:".bright_cyan(),
        stats.worksteps.to_string().bright_white().bold(),
        if stats.is_winter_crop { "winter" } else { "spring" }
    );
    if let (Some(planting), Some(harvest)) = (stats.planting_date, stats.harvest_date) {
        println!(
            "  {} {} to {}",
            "Season:".bright_cyan(),
            planting.format(MONICA_DATE_FORMAT),
            harvest.format(MONICA_DATE_FORMAT)
        );
    }
    if let Some(observed) = stats.observed_yield {
        println!("  {} {} kg/ha", "Observed yield:".bright_cyan(), observed);
    }
    if stats.diagnostics > 0 {
        println!(
            "  {} {}",
            "Diagnostics:".bright_yellow(),
            stats.diagnostics.to_string().bright_yellow().bold()
        );
    }
    for path in &stats.written_files {
        println!("  {} {}", "Wrote".bright_green(), path.display());
    }
    println!(
        "  {} {} ms",
        "Time:".bright_cyan(),
        stats.processing_time_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_options_rewritten() {
        let (normalized, ignored) =
            normalize_args(["prog", "-filename", "trial.json", "-out", "/tmp/out"]);
        assert_eq!(
            normalized,
            vec!["prog", "--filename", "trial.json", "--out", "/tmp/out"]
        );
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_unknown_arguments_ignored() {
        let (normalized, ignored) =
            normalize_args(["prog", "-foo", "bar", "--filename", "a.json", "-out"]);
        assert_eq!(normalized, vec!["prog", "--filename", "a.json"]);
        assert_eq!(ignored, vec!["-foo", "bar", "-out"]);
    }

    #[test]
    fn test_parse_defaults() {
        let (args, ignored) = Args::parse_legacy_from(["prog"]).unwrap();
        assert!(ignored.is_empty());
        assert_eq!(args.filename, PathBuf::from("Barley_IT_AgMIP.json"));
        assert!(args.out.is_none());
        assert_eq!(args.log_level(), "info");
    }

    #[test]
    fn test_parse_all_options() {
        let (args, _) = Args::parse_legacy_from([
            "prog",
            "-filename",
            "x.json",
            "-out",
            "outdir",
            "--config=cfg.json",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.filename, PathBuf::from("x.json"));
        assert_eq!(args.output_path().unwrap(), PathBuf::from("outdir"));
        assert_eq!(args.config_file, Some(PathBuf::from("cfg.json")));
        assert_eq!(args.log_level(), "debug");
    }

    #[test]
    fn test_repeated_options_keep_last_value() {
        let (args, _) = Args::parse_legacy_from([
            "prog",
            "-filename",
            "a.json",
            "-filename",
            "b.json",
            "--out",
            "first",
            "-out",
            "second",
        ])
        .unwrap();
        assert_eq!(args.filename, PathBuf::from("b.json"));
        assert_eq!(args.out, Some(PathBuf::from("second")));
    }

    #[test]
    fn test_later_verbosity_flag_wins() {
        let (args, _) = Args::parse_legacy_from(["prog", "-v", "-q"]).unwrap();
        assert_eq!(args.log_level(), "warn");

        let (args, _) = Args::parse_legacy_from(["prog", "-q", "-v"]).unwrap();
        assert_eq!(args.log_level(), "debug");

        let (args, _) = Args::parse_legacy_from(["prog", "-v", "-v"]).unwrap();
        assert_eq!(args.log_level(), "debug");
    }

    #[test]
    fn test_help_is_reported_as_display_help() {
        let error = Args::parse_legacy_from(["prog", "--help"]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_default_output_path_ends_with_fixed_name() {
        if let Some(path) = default_output_path() {
            assert!(path.ends_with(DEFAULT_OUTPUT_DIR_NAME));
        }
    }
}
