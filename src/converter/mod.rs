//! Conversion engine.
//!
//! Orchestrates a complete AgMIP to MONICA run using the per-domain
//! converters:
//! - [`weather`] daily weather series to `climate.csv`
//! - [`soil`] soil profile to `site-min.json`
//! - [`cultivation`] management events to `crop.json`
//!
//! The converters never depend on each other's output. Each returns its own
//! diagnostics, which the [`Converter`] merges in run order.

pub mod cultivation;
pub mod soil;
pub mod weather;

#[cfg(test)]
pub mod tests;

pub use cultivation::{CultivationConversion, convert_cultivation, crop_document};
pub use soil::{SoilConversion, convert_soil, site_document};
pub use weather::{WeatherConversion, convert_weather, render_climate_csv};

use crate::config::ConverterConfig;
use crate::document::AgMipDocument;
use crate::error::{ConvertError, Result};
use crate::models::{ConversionStats, Diagnostics};
use crate::writer::{OutputWriter, prepare_output_dir};

use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// All three conversions of one document, before anything is written
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    pub weather: WeatherConversion,
    pub soil: SoilConversion,
    pub cultivation: CultivationConversion,
}

impl ConversionOutput {
    /// Diagnostics of all converters in run order
    pub fn diagnostics(&self) -> Diagnostics {
        let mut merged = Diagnostics::new();
        merged.merge(self.weather.diagnostics.clone());
        merged.merge(self.soil.diagnostics.clone());
        merged.merge(self.cultivation.diagnostics.clone());
        merged
    }
}

/// Run the three converters on an in-memory document
pub fn convert_document(
    document: &AgMipDocument,
    config: &ConverterConfig,
) -> Result<ConversionOutput> {
    Ok(ConversionOutput {
        weather: convert_weather(document)?,
        soil: convert_soil(document)?,
        cultivation: convert_cultivation(document, &config.crop)?,
    })
}

/// File-based conversion of one AgMIP document into an output directory
#[derive(Debug)]
pub struct Converter {
    input_path: PathBuf,
    output_path: PathBuf,
    config: ConverterConfig,
    writer: OutputWriter,
}

impl Converter {
    /// Check the input file and prepare the output directory
    pub fn new(input_path: PathBuf, output_path: PathBuf) -> Result<Self> {
        if !input_path.is_file() {
            return Err(ConvertError::InputNotFound { path: input_path });
        }

        prepare_output_dir(&output_path)?;

        let config = ConverterConfig::default();
        Ok(Self {
            writer: OutputWriter::new(output_path.clone(), config.files.clone()),
            input_path,
            output_path,
            config,
        })
    }

    /// Configure the converter
    pub fn with_config(mut self, config: ConverterConfig) -> Self {
        self.writer = OutputWriter::new(self.output_path.clone(), config.files.clone());
        self.config = config;
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Main conversion entry point.
    ///
    /// Each output file is written as soon as its conversion succeeds, so a
    /// failure in a later step leaves the earlier files in place.
    pub fn run(&self) -> Result<ConversionStats> {
        let start_time = Instant::now();
        println!("{}", "Starting AgMIP to MONICA conversion".bright_green().bold());
        println!("  {} {}", "Input:".bright_cyan(), self.input_path.display());
        println!("  {} {}", "Output:".bright_cyan(), self.output_path.display());

        let document = AgMipDocument::from_file(&self.input_path)?;
        let mut stats = ConversionStats {
            output_path: self.output_path.clone(),
            ..Default::default()
        };
        let mut diagnostics = Diagnostics::new();

        // Step 1: weather
        println!("\n{}", "Converting weather...".bright_yellow());
        let weather = convert_weather(&document)?;
        stats.written_files.push(self.writer.write_climate(&weather.days)?);
        stats.weather_days = weather.days.len();
        diagnostics.merge(weather.diagnostics);

        // Step 2: soil
        println!("{}", "Converting soil profile...".bright_yellow());
        let soil = convert_soil(&document)?;
        let site = site_document(&soil.layers, &self.config.site);
        stats.written_files.push(self.writer.write_site(&site)?);
        stats.soil_layers = soil.layers.len();
        diagnostics.merge(soil.diagnostics);

        // Step 3: crop rotation
        println!("{}", "Converting crop rotation...".bright_yellow());
        let cultivation = convert_cultivation(&document, &self.config.crop)?;
        let crop = crop_document(&cultivation.worksteps, &self.config.crop);
        stats.written_files.push(self.writer.write_crop(&crop)?);
        stats.worksteps = cultivation.worksteps.len();
        stats.is_winter_crop = cultivation.is_winter_crop;
        stats.planting_date = Some(cultivation.planting_date);
        stats.harvest_date = Some(cultivation.harvest_date);
        stats.observed_yield = cultivation.observed_yield;
        diagnostics.merge(cultivation.diagnostics);

        // Step 4: diagnostics
        stats.diagnostics = diagnostics.len();
        if let Some(path) = self.writer.write_diagnostics(&diagnostics)? {
            warn!(
                "{} records had missing fields, see {}",
                diagnostics.len(),
                path.display()
            );
            stats.written_files.push(path);
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();
        info!(
            "Conversion finished in {} ms: {} days, {} layers, {} worksteps",
            stats.processing_time_ms, stats.weather_days, stats.soil_layers, stats.worksteps
        );
        Ok(stats)
    }
}
