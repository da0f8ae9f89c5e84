//! Soil profile conversion.
//!
//! Maps the layers of the first AgMIP soil profile onto MONICA
//! `SoilProfileParameters` and wraps them in the site skeleton of
//! `site-min.json`.

use crate::config::SiteDefaults;
use crate::constants::{
    INCLUDE_FROM_FILE, soil_fields,
    units::{CM_TO_M, DEPTH_TOLERANCE_CM, G_PER_CM3_TO_KG_PER_M3, PERCENT_TO_FRACTION},
};
use crate::document::{AgMipDocument, check_fields, parse_f64_or_zero};
use crate::error::{ConvertError, Result};
use crate::models::{Diagnostics, SoilLayer};
use serde_json::{Value, json};
use tracing::{debug, info};

/// Converted soil profile and its diagnostics
#[derive(Debug, Clone, Default)]
pub struct SoilConversion {
    pub layers: Vec<SoilLayer>,
    pub diagnostics: Diagnostics,
}

/// Soil layer values as found in the AgMIP record (cm, g/cm3, %)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgMipSoilLayer {
    pub depth: f64,
    pub top_depth: f64,
    pub base_depth: f64,
    pub organic_carbon: f64,
    pub bulk_density: f64,
    pub sand: f64,
    pub clay: f64,
    pub saturation: f64,
    pub wilting_point: f64,
    pub field_capacity: f64,
}

impl AgMipSoilLayer {
    /// Read a layer record; missing values become zero
    pub fn from_record(record: &Value) -> Result<Self> {
        Ok(Self {
            depth: parse_f64_or_zero(record, soil_fields::DEPTH)?,
            top_depth: parse_f64_or_zero(record, soil_fields::TOP_DEPTH)?,
            base_depth: parse_f64_or_zero(record, soil_fields::BASE_DEPTH)?,
            organic_carbon: parse_f64_or_zero(record, soil_fields::ORGANIC_CARBON)?,
            bulk_density: parse_f64_or_zero(record, soil_fields::BULK_DENSITY)?,
            sand: parse_f64_or_zero(record, soil_fields::SAND)?,
            clay: parse_f64_or_zero(record, soil_fields::CLAY)?,
            saturation: parse_f64_or_zero(record, soil_fields::SATURATION)?,
            wilting_point: parse_f64_or_zero(record, soil_fields::WILTING_POINT)?,
            field_capacity: parse_f64_or_zero(record, soil_fields::FIELD_CAPACITY)?,
        })
    }

    /// Convert to MONICA units after checking that the stated depth matches
    /// the top/base boundaries.
    pub fn to_monica(&self, layer_index: usize) -> Result<SoilLayer> {
        let span = self.base_depth - self.top_depth;
        let deviation = (span - self.depth).abs();
        if deviation.is_nan() || deviation > DEPTH_TOLERANCE_CM {
            return Err(ConvertError::SoilDepthMismatch {
                layer: layer_index,
                expected: span,
                found: self.depth,
            });
        }

        Ok(SoilLayer {
            thickness: self.depth * CM_TO_M,
            organic_carbon: self.organic_carbon,
            bulk_density: self.bulk_density * G_PER_CM3_TO_KG_PER_M3,
            sand: self.sand * PERCENT_TO_FRACTION,
            clay: self.clay * PERCENT_TO_FRACTION,
            pore_volume: self.saturation * PERCENT_TO_FRACTION,
            permanent_wilting_point: self.wilting_point * PERCENT_TO_FRACTION,
            field_capacity: self.field_capacity * PERCENT_TO_FRACTION,
        })
    }
}

/// Convert every layer of the first soil profile, top to bottom.
/// A depth mismatch in any layer aborts the whole conversion.
pub fn convert_soil(document: &AgMipDocument) -> Result<SoilConversion> {
    let records = document.soil_layers()?;
    let mut conversion = SoilConversion {
        layers: Vec::with_capacity(records.len()),
        diagnostics: Diagnostics::new(),
    };

    for (index, record) in records.iter().enumerate() {
        if let Some(report) = check_fields(record, soil_fields::REQUIRED, "soil") {
            conversion.diagnostics.push(report);
        }

        let layer = AgMipSoilLayer::from_record(record)?.to_monica(index)?;
        debug!(
            "Soil layer {}: thickness={} m, bulk density={} kg m-3",
            index, layer.thickness, layer.bulk_density
        );
        conversion.layers.push(layer);
    }

    info!("Converted {} soil layers", conversion.layers.len());
    Ok(conversion)
}

fn include(file: &str) -> Value {
    json!([INCLUDE_FROM_FILE, file])
}

fn layer_json(layer: &SoilLayer) -> Value {
    json!({
        "Thickness": [layer.thickness, "m"],
        "SoilOrganicCarbon": [layer.organic_carbon, "%"],
        "SoilBulkDensity": [layer.bulk_density, "kg m-3"],
        "Sand": layer.sand,
        "Clay": layer.clay,
        "PoreVolume": layer.pore_volume,
        "PermanentWiltingPoint": layer.permanent_wilting_point,
        "FieldCapacity": layer.field_capacity,
    })
}

/// Build the `site-min.json` document
pub fn site_document(layers: &[SoilLayer], site: &SiteDefaults) -> Value {
    let profile: Vec<Value> = layers.iter().map(layer_json).collect();

    json!({
        "SiteParameters": {
            "Latitude": site.latitude,
            "Slope": site.slope,
            "HeightNN": [site.height_nn, "m"],
            "NDeposition": [site.n_deposition, "kg N ha-1 y-1"],
            "SoilProfileParameters": profile,
        },
        "SoilTemperatureParameters": include(&site.soil_temperature_file),
        "EnvironmentParameters": {
            "=": include(&site.environment_file),
            "LeachingDepth": site.leaching_depth,
            "WindSpeedHeight": site.wind_speed_height,
        },
        "SoilOrganicParameters": include(&site.soil_organic_file),
        "SoilTransportParameters": include(&site.soil_transport_file),
        "SoilMoistureParameters": include(&site.soil_moisture_file),
    })
}
