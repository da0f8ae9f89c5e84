//! Crop rotation conversion.
//!
//! Derives MONICA worksteps from the management events of the first AgMIP
//! experiment, appends the harvest, sorts the rotation by date and wraps it in
//! the crop/fertilizer skeleton of `crop.json`.

use crate::config::{CropCodeSource, CropDefaults, CropVariant};
use crate::constants::{INCLUDE_FROM_FILE, MONICA_DATE_FORMAT, event_types, management_fields};
use crate::document::{
    AgMipDocument, check_fields, get_optional_field, parse_f64_or_zero, parse_optional_string,
    parse_required_date,
};
use crate::error::Result;
use crate::models::{CropReference, Diagnostics, Workstep, WorkstepKind};
use chrono::{Datelike, NaiveDate};
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

/// Crop rotation derived from one experiment
#[derive(Debug, Clone)]
pub struct CultivationConversion {
    /// Sorted ascending by date, harvest included
    pub worksteps: Vec<Workstep>,
    pub planting_date: NaiveDate,
    pub harvest_date: NaiveDate,
    pub is_winter_crop: bool,
    /// Observed harvest yield (dry weight) in kg/ha
    pub observed_yield: Option<f64>,
    pub diagnostics: Diagnostics,
}

/// A crop is a winter crop when it is harvested earlier in the calendar
/// year than it was planted.
pub fn is_winter_crop(planting_date: NaiveDate, harvest_date: NaiveDate) -> bool {
    harvest_date.ordinal() < planting_date.ordinal()
}

/// Variant table lookup: the mapped crop code splits into the winter or
/// spring variant, every other code is unmapped.
pub fn crop_reference(crop_code: &str, winter: bool, crop: &CropDefaults) -> CropReference {
    if crop_code == crop.mapped_crop_code {
        let variant = if winter {
            &crop.winter_variant
        } else {
            &crop.spring_variant
        };
        CropReference::Variant(variant.id.clone())
    } else {
        CropReference::Unmapped {
            crop_code: crop_code.to_string(),
        }
    }
}

/// Crop code of a planting event
fn crop_code_for_event(event: &Value, crop: &CropDefaults) -> String {
    if get_optional_field(event, management_fields::CROP_ID).is_none() {
        return crop.default_crop_code.clone();
    }

    let field = match crop.crop_code_source {
        CropCodeSource::EventName => management_fields::EVENT_TYPE,
        CropCodeSource::CropId => management_fields::CROP_ID,
    };
    parse_optional_string(event, field).unwrap_or_default()
}

/// Derive exactly one workstep from a management event
pub fn workstep_from_event(event: &Value, winter: bool, crop: &CropDefaults) -> Result<Workstep> {
    let date = parse_required_date(event, management_fields::EVENT_DATE)?;
    let event_type = parse_optional_string(event, management_fields::EVENT_TYPE).unwrap_or_default();

    let kind = match event_type.as_str() {
        event_types::PLANTING => {
            let crop_code = crop_code_for_event(event, crop);
            let reference = crop_reference(&crop_code, winter, crop);
            if let CropReference::Unmapped { crop_code } = &reference {
                warn!("No crop variant known for crop code '{}'", crop_code);
            }
            WorkstepKind::Sowing {
                crop: reference,
                plant_density: parse_f64_or_zero(event, management_fields::PLANT_POPULATION)?,
            }
        }
        event_types::FERTILIZER => WorkstepKind::MineralFertilization {
            amount: parse_f64_or_zero(event, management_fields::FERTILIZER_AMOUNT)?,
            partition: crop.mineral_fertilizer_id.clone(),
        },
        event_types::TILLAGE => WorkstepKind::Tillage {
            depth: crop.tillage_depth,
        },
        _ => {
            debug!("Unknown management event type '{}' on {}", event_type, date);
            WorkstepKind::Unknown {
                event_type: event_type.clone(),
            }
        }
    };

    Ok(Workstep::new(date, kind))
}

/// Build the sorted rotation for the first experiment
pub fn convert_cultivation(
    document: &AgMipDocument,
    crop: &CropDefaults,
) -> Result<CultivationConversion> {
    let management = document.management()?;
    let planting_date = parse_required_date(management, management_fields::PLANTING_DATE)?;
    let harvest_date = parse_required_date(management, management_fields::HARVEST_DATE)?;
    let winter = is_winter_crop(planting_date, harvest_date);

    let events = document.events()?;
    let mut diagnostics = Diagnostics::new();
    let mut worksteps = Vec::with_capacity(events.len() + 1);

    for event in events {
        if let Some(report) =
            check_fields(event, management_fields::EVENT_REQUIRED, "management event")
        {
            diagnostics.push(report);
        }
        worksteps.push(workstep_from_event(event, winter, crop)?);
    }

    worksteps.push(Workstep::new(harvest_date, WorkstepKind::Harvest));

    // Stable: same-day steps keep their event order, harvest after them
    worksteps.sort_by_key(|step| step.date);

    let observed_yield = match document.observed_yield() {
        Ok(value) => value,
        Err(e) => {
            warn!("Ignoring observed yield: {}", e);
            None
        }
    };

    info!(
        "Derived {} worksteps ({} crop, planted {}, harvested {})",
        worksteps.len(),
        if winter { "winter" } else { "spring" },
        planting_date,
        harvest_date
    );

    Ok(CultivationConversion {
        worksteps,
        planting_date,
        harvest_date,
        is_winter_crop: winter,
        observed_yield,
        diagnostics,
    })
}

fn include(file: &str) -> Value {
    json!([INCLUDE_FROM_FILE, file])
}

fn variant_json(variant: &CropVariant, crop: &CropDefaults) -> Value {
    json!({
        "is-winter-crop": variant.is_winter_crop,
        "cropParams": {
            "species": include(&crop.species_file),
            "cultivar": include(&variant.cultivar_file),
        },
        "residueParams": include(&crop.residue_file),
    })
}

/// Serialize one workstep in MONICA's shape for its type
pub fn workstep_json(step: &Workstep) -> Value {
    let mut object = Map::new();
    object.insert(
        "date".to_string(),
        json!(step.date.format(MONICA_DATE_FORMAT).to_string()),
    );
    object.insert("type".to_string(), json!(step.kind.type_name()));

    match &step.kind {
        WorkstepKind::Sowing {
            crop,
            plant_density,
        } => {
            if let Some(id) = crop.variant_id() {
                object.insert("crop".to_string(), json!(["ref", "crops", id]));
            }
            object.insert(
                "PlantDensity".to_string(),
                json!([plant_density, "plants m-2"]),
            );
        }
        WorkstepKind::Tillage { depth } => {
            object.insert("depth".to_string(), json!([depth, "m"]));
        }
        WorkstepKind::MineralFertilization { amount, partition } => {
            object.insert("amount".to_string(), json!([amount, "kg N"]));
            object.insert(
                "partition".to_string(),
                json!(["ref", "fert-params", partition]),
            );
        }
        WorkstepKind::Harvest | WorkstepKind::Unknown { .. } => {}
    }

    Value::Object(object)
}

/// Build the `crop.json` document
pub fn crop_document(worksteps: &[Workstep], crop: &CropDefaults) -> Value {
    let mut fert_params = Map::new();
    fert_params.insert(
        crop.mineral_fertilizer_id.clone(),
        include(&crop.mineral_fertilizer_file),
    );
    fert_params.insert(
        crop.organic_fertilizer_id.clone(),
        include(&crop.organic_fertilizer_file),
    );

    let mut crops = Map::new();
    for variant in [&crop.winter_variant, &crop.spring_variant] {
        crops.insert(variant.id.clone(), variant_json(variant, crop));
    }

    let steps: Vec<Value> = worksteps.iter().map(workstep_json).collect();

    json!({
        "fert-params": fert_params,
        "crops": crops,
        "cropRotation": [ { "worksteps": steps } ],
        "CropParameters": include(&crop.crop_parameters_file),
    })
}
