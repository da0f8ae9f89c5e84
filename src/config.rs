//! Configuration management.
//!
//! The fixed parameter blocks written into `site-min.json` and `crop.json`
//! live here as plain structs. Their `Default` impls reproduce the reference
//! MONICA setup; a JSON file passed with `--config` can override any subset.

use crate::constants::{CLIMATE_FILENAME, CROP_FILENAME, DIAGNOSTICS_FILENAME, SITE_FILENAME};
use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Site constants and include references for `site-min.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteDefaults {
    /// Site latitude in degrees
    pub latitude: f64,

    /// Slope (unitless)
    pub slope: i64,

    /// Height above sea level in m
    pub height_nn: i64,

    /// Atmospheric N deposition in kg N ha-1 y-1
    pub n_deposition: i64,

    /// Leaching depth in m
    pub leaching_depth: f64,

    /// Height of the wind speed measurement in m
    pub wind_speed_height: f64,

    pub soil_temperature_file: String,
    pub environment_file: String,
    pub soil_organic_file: String,
    pub soil_transport_file: String,
    pub soil_moisture_file: String,
}

impl Default for SiteDefaults {
    fn default() -> Self {
        Self {
            latitude: 52.80939865112305,
            slope: 0,
            height_nn: 0,
            n_deposition: 30,
            leaching_depth: 2.0,
            wind_speed_height: 2.5,
            soil_temperature_file: "general/soil-temperature.json".to_string(),
            environment_file: "general/environment.json".to_string(),
            soil_organic_file: "general/soil-organic.json".to_string(),
            soil_transport_file: "general/soil-transport.json".to_string(),
            soil_moisture_file: "general/soil-moisture.json".to_string(),
        }
    }
}

/// Where the crop code of a planting event comes from when it carries a `crid` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CropCodeSource {
    /// Reuse the event type string (`"planting"`) as the crop code.
    /// Matches the files produced by earlier converter releases.
    EventName,
    /// Use the value of the `crid` field.
    CropId,
}

/// One crop variant block of `crop.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropVariant {
    /// Key under `crops` and the id referenced by Sowing worksteps
    pub id: String,
    pub is_winter_crop: bool,
    pub cultivar_file: String,
}

/// Crop, fertilizer and rotation constants for `crop.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropDefaults {
    /// Crop code assumed for events without a `crid`
    pub default_crop_code: String,

    pub crop_code_source: CropCodeSource,

    /// AgMIP crop code that maps onto the winter/spring variants below
    pub mapped_crop_code: String,

    pub winter_variant: CropVariant,
    pub spring_variant: CropVariant,

    pub species_file: String,
    pub residue_file: String,

    /// Tillage depth in m
    pub tillage_depth: f64,

    /// Key under `fert-params` referenced by MineralFertilization worksteps
    pub mineral_fertilizer_id: String,
    pub mineral_fertilizer_file: String,
    pub organic_fertilizer_id: String,
    pub organic_fertilizer_file: String,

    pub crop_parameters_file: String,
}

impl Default for CropDefaults {
    fn default() -> Self {
        Self {
            default_crop_code: "BAR".to_string(),
            crop_code_source: CropCodeSource::EventName,
            mapped_crop_code: "BAR".to_string(),
            winter_variant: CropVariant {
                id: "WG".to_string(),
                is_winter_crop: true,
                cultivar_file: "crops/barley/winter-barley.json".to_string(),
            },
            spring_variant: CropVariant {
                id: "SG".to_string(),
                is_winter_crop: false,
                cultivar_file: "crops/barley/spring-barley.json".to_string(),
            },
            species_file: "crops/barley.json".to_string(),
            residue_file: "crop-residues/barley.json".to_string(),
            tillage_depth: 0.30,
            mineral_fertilizer_id: "AN".to_string(),
            mineral_fertilizer_file: "mineral-fertilisers/AN.json".to_string(),
            organic_fertilizer_id: "CADLM".to_string(),
            organic_fertilizer_file: "organic-fertilisers/CADLM.json".to_string(),
            crop_parameters_file: "general/crop.json".to_string(),
        }
    }
}

/// Names of the files written to the output directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFiles {
    pub climate: String,
    pub site: String,
    pub crop: String,
    pub diagnostics: String,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            climate: CLIMATE_FILENAME.to_string(),
            site: SITE_FILENAME.to_string(),
            crop: CROP_FILENAME.to_string(),
            diagnostics: DIAGNOSTICS_FILENAME.to_string(),
        }
    }
}

/// Global configuration for a conversion run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub site: SiteDefaults,
    pub crop: CropDefaults,
    pub files: OutputFiles,
}

impl ConverterConfig {
    /// Load a configuration from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ConvertError::configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            ConvertError::configuration(format!("cannot parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject configurations that would produce unusable output
    pub fn validate(&self) -> Result<()> {
        if self.crop.winter_variant.id == self.crop.spring_variant.id {
            return Err(ConvertError::configuration(format!(
                "winter and spring crop variants share the id '{}'",
                self.crop.winter_variant.id
            )));
        }
        let files = [
            &self.files.climate,
            &self.files.site,
            &self.files.crop,
            &self.files.diagnostics,
        ];
        if files.iter().any(|name| name.trim().is_empty()) {
            return Err(ConvertError::configuration("output file names must not be empty"));
        }
        Ok(())
    }

    /// Replace the site defaults
    pub fn with_site(mut self, site: SiteDefaults) -> Self {
        self.site = site;
        self
    }

    /// Replace the crop defaults
    pub fn with_crop(mut self, crop: CropDefaults) -> Self {
        self.crop = crop;
        self
    }
}
