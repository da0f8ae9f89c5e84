//! Tests for crop rotation derivation and the crop document

use super::*;
use crate::config::{CropCodeSource, CropDefaults};
use crate::converter::cultivation::{
    convert_cultivation, crop_document, crop_reference, is_winter_crop, workstep_from_event,
    workstep_json,
};
use crate::error::ConvertError;
use crate::models::{CropReference, Workstep, WorkstepKind};
use chrono::Datelike;

fn type_names(steps: &[Workstep]) -> Vec<&'static str> {
    steps.iter().map(|s| s.kind.type_name()).collect()
}

fn sowing_crop(steps: &[Workstep]) -> CropReference {
    steps
        .iter()
        .find_map(|s| match &s.kind {
            WorkstepKind::Sowing { crop, .. } => Some(crop.clone()),
            _ => None,
        })
        .expect("rotation has a sowing step")
}

#[test]
fn test_winter_crop_classification() {
    let planting = ymd(2019, 10, 27);
    let harvest = ymd(2020, 7, 18);
    assert_eq!(planting.ordinal(), 300);
    assert_eq!(harvest.ordinal(), 200);
    assert!(is_winter_crop(planting, harvest));

    let planting = ymd(2020, 4, 9);
    assert_eq!(planting.ordinal(), 100);
    assert!(!is_winter_crop(planting, harvest));
}

#[test]
fn test_winter_barley_references_wg() {
    let document = experiment_document(
        "20191027",
        "20200718",
        json!([ { "event": "planting", "date": "20191027" } ]),
    );
    let conversion = convert_cultivation(&document, &CropDefaults::default()).unwrap();

    assert!(conversion.is_winter_crop);
    assert_eq!(
        sowing_crop(&conversion.worksteps),
        CropReference::Variant("WG".to_string())
    );
}

#[test]
fn test_spring_barley_references_sg() {
    let document = experiment_document(
        "20200409",
        "20200718",
        json!([ { "event": "planting", "date": "20200409" } ]),
    );
    let conversion = convert_cultivation(&document, &CropDefaults::default()).unwrap();

    assert!(!conversion.is_winter_crop);
    assert_eq!(
        sowing_crop(&conversion.worksteps),
        CropReference::Variant("SG".to_string())
    );
}

#[test]
fn test_worksteps_sorted_with_harvest_last() {
    let document = experiment_document(
        "20200315",
        "20200801",
        json!([
            { "event": "planting", "date": "20200315" },
            { "event": "tillage", "date": "20200301" }
        ]),
    );
    let conversion = convert_cultivation(&document, &CropDefaults::default()).unwrap();

    assert_eq!(
        type_names(&conversion.worksteps),
        vec!["Tillage", "Sowing", "Harvest"]
    );
    let dates: Vec<_> = conversion.worksteps.iter().map(|s| s.date).collect();
    assert_eq!(
        dates,
        vec![ymd(2020, 3, 1), ymd(2020, 3, 15), ymd(2020, 8, 1)]
    );
}

#[test]
fn test_same_day_steps_keep_event_order() {
    let document = experiment_document(
        "20200315",
        "20200410",
        json!([
            { "event": "fertilizer", "date": "20200410", "feamn": 40 },
            { "event": "tillage", "date": "20200410" },
            { "event": "planting", "date": "20200315" }
        ]),
    );
    let conversion = convert_cultivation(&document, &CropDefaults::default()).unwrap();

    assert_eq!(
        type_names(&conversion.worksteps),
        vec!["Sowing", "MineralFertilization", "Tillage", "Harvest"]
    );
}

#[test]
fn test_unknown_event_retained() {
    let document = experiment_document(
        "20200315",
        "20200801",
        json!([
            { "event": "planting", "date": "20200315" },
            { "event": "irrigation", "date": "20200601", "irval": 25 }
        ]),
    );
    let conversion = convert_cultivation(&document, &CropDefaults::default()).unwrap();

    assert_eq!(conversion.worksteps.len(), 3);
    assert_eq!(
        conversion.worksteps[1].kind,
        WorkstepKind::Unknown {
            event_type: "irrigation".to_string()
        }
    );
    assert_eq!(
        workstep_json(&conversion.worksteps[1]),
        json!({ "date": "2020-06-01", "type": "unknown type" })
    );
}

#[test]
fn test_fertilizer_amount_and_default() {
    let crop = CropDefaults::default();

    let step = workstep_from_event(
        &json!({ "event": "fertilizer", "date": "20200410", "feamn": "60" }),
        false,
        &crop,
    )
    .unwrap();
    assert_eq!(
        workstep_json(&step),
        json!({
            "date": "2020-04-10",
            "type": "MineralFertilization",
            "amount": [60.0, "kg N"],
            "partition": ["ref", "fert-params", "AN"]
        })
    );

    let step = workstep_from_event(
        &json!({ "event": "fertilizer", "date": "20200410" }),
        false,
        &crop,
    )
    .unwrap();
    assert_eq!(
        step.kind,
        WorkstepKind::MineralFertilization {
            amount: 0.0,
            partition: "AN".to_string()
        }
    );
}

#[test]
fn test_sowing_and_tillage_shapes() {
    let crop = CropDefaults::default();

    let sowing = workstep_from_event(
        &json!({ "event": "planting", "date": "20191027", "plpop": 320 }),
        true,
        &crop,
    )
    .unwrap();
    assert_eq!(
        workstep_json(&sowing),
        json!({
            "date": "2019-10-27",
            "type": "Sowing",
            "crop": ["ref", "crops", "WG"],
            "PlantDensity": [320.0, "plants m-2"]
        })
    );

    let tillage =
        workstep_from_event(&json!({ "event": "tillage", "date": "20190920" }), true, &crop)
            .unwrap();
    assert_eq!(
        workstep_json(&tillage),
        json!({ "date": "2019-09-20", "type": "Tillage", "depth": [0.3, "m"] })
    );

    let harvest = Workstep::new(ymd(2020, 7, 1), WorkstepKind::Harvest);
    assert_eq!(
        workstep_json(&harvest),
        json!({ "date": "2020-07-01", "type": "Harvest" })
    );
}

#[test]
fn test_crop_id_uses_event_name_by_default() {
    let crop = CropDefaults::default();
    let event = json!({ "event": "planting", "date": "20200409", "crid": "BAR" });

    let step = workstep_from_event(&event, false, &crop).unwrap();
    assert_eq!(
        step.kind,
        WorkstepKind::Sowing {
            crop: CropReference::Unmapped {
                crop_code: "planting".to_string()
            },
            plant_density: 0.0
        }
    );
    let rendered = workstep_json(&step);
    assert!(rendered.get("crop").is_none());
    assert_eq!(rendered["PlantDensity"], json!([0.0, "plants m-2"]));
}

#[test]
fn test_crop_id_source_reads_crid() {
    let crop = CropDefaults {
        crop_code_source: CropCodeSource::CropId,
        ..Default::default()
    };

    let barley = json!({ "event": "planting", "date": "20200409", "crid": "BAR" });
    let step = workstep_from_event(&barley, false, &crop).unwrap();
    assert_eq!(workstep_json(&step)["crop"], json!(["ref", "crops", "SG"]));

    let maize = json!({ "event": "planting", "date": "20200409", "crid": "MAZ" });
    let step = workstep_from_event(&maize, false, &crop).unwrap();
    assert!(workstep_json(&step).get("crop").is_none());
}

#[test]
fn test_crop_reference_table() {
    let crop = CropDefaults::default();
    assert_eq!(
        crop_reference("BAR", true, &crop),
        CropReference::Variant("WG".to_string())
    );
    assert_eq!(
        crop_reference("BAR", false, &crop),
        CropReference::Variant("SG".to_string())
    );
    assert_eq!(
        crop_reference("WHT", true, &crop),
        CropReference::Unmapped {
            crop_code: "WHT".to_string()
        }
    );
}

#[test]
fn test_missing_dates_are_fatal() {
    let document = experiment_document("", "20200801", json!([]));
    assert!(matches!(
        convert_cultivation(&document, &CropDefaults::default()),
        Err(ConvertError::InvalidDate { .. })
    ));

    let document = experiment_document(
        "20200315",
        "20200801",
        json!([ { "event": "tillage", "date": "03/01/2020" } ]),
    );
    assert!(matches!(
        convert_cultivation(&document, &CropDefaults::default()),
        Err(ConvertError::InvalidDate { .. })
    ));
}

#[test]
fn test_event_without_type_reported_and_kept() {
    let document = experiment_document(
        "20200315",
        "20200801",
        json!([ { "date": "20200320" } ]),
    );
    let conversion = convert_cultivation(&document, &CropDefaults::default()).unwrap();

    assert_eq!(type_names(&conversion.worksteps), vec!["unknown type", "Harvest"]);
    assert_eq!(conversion.diagnostics.reports.len(), 1);
    assert_eq!(conversion.diagnostics.reports[0].kind, "management event");
    assert_eq!(conversion.diagnostics.reports[0].missing, vec!["event"]);
}

#[test]
fn test_observed_yield_read() {
    let conversion = convert_cultivation(&sample_document(), &CropDefaults::default()).unwrap();
    assert_eq!(conversion.observed_yield, Some(5230.0));
    assert_eq!(conversion.planting_date, ymd(2020, 3, 15));
    assert_eq!(conversion.harvest_date, ymd(2020, 8, 1));
}

#[test]
fn test_crop_document_skeleton() {
    let conversion = convert_cultivation(&sample_document(), &CropDefaults::default()).unwrap();
    let document = crop_document(&conversion.worksteps, &CropDefaults::default());

    let keys: Vec<&str> = document
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["fert-params", "crops", "cropRotation", "CropParameters"]);

    assert_eq!(
        document["fert-params"],
        json!({
            "AN": ["include-from-file", "mineral-fertilisers/AN.json"],
            "CADLM": ["include-from-file", "organic-fertilisers/CADLM.json"]
        })
    );

    let crop_ids: Vec<&str> = document["crops"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(crop_ids, vec!["WG", "SG"]);
    assert_eq!(
        document["crops"]["WG"],
        json!({
            "is-winter-crop": true,
            "cropParams": {
                "species": ["include-from-file", "crops/barley.json"],
                "cultivar": ["include-from-file", "crops/barley/winter-barley.json"]
            },
            "residueParams": ["include-from-file", "crop-residues/barley.json"]
        })
    );
    assert_eq!(
        document["crops"]["SG"]["cropParams"]["cultivar"],
        json!(["include-from-file", "crops/barley/spring-barley.json"])
    );
    assert_eq!(document["crops"]["SG"]["is-winter-crop"], json!(false));

    let steps = document["cropRotation"][0]["worksteps"].as_array().unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[0]["type"], json!("Tillage"));
    assert_eq!(steps[3]["type"], json!("Harvest"));
    assert_eq!(
        document["CropParameters"],
        json!(["include-from-file", "general/crop.json"])
    );
}
