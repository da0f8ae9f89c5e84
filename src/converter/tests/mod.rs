//! Tests for the conversion engine
//!
//! Converter-level tests use small hand-built AgMIP documents; the pipeline
//! tests run the file-based converter against a temporary directory.

pub mod cultivation_tests;

use crate::document::AgMipDocument;
use chrono::NaiveDate;
use serde_json::{Value, json};

/// Build a calendar date for assertions
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A complete daily weather record
pub fn weather_record(date: &str, wind_km_per_day: f64) -> Value {
    json!({
        "w_date": date,
        "tavd": 5.5,
        "tmin": 1.0,
        "tmax": 10.25,
        "srad": 8.0,
        "rain": 2.4,
        "rhavd": 80,
        "wind": wind_km_per_day,
    })
}

/// A complete soil layer record (cm, g/cm3, %)
pub fn soil_record(top: f64, base: f64, depth: f64) -> Value {
    json!({
        "depth": depth,
        "sllt": top,
        "sllb": base,
        "sloc": 1.2,
        "sabdm": 1.3,
        "slsnd": 40,
        "slcly": 20,
        "slsat": 45,
        "slwp": 12,
        "slfc1": 30,
    })
}

/// A minimal but complete AgMIP document for a spring barley trial
pub fn sample_value() -> Value {
    json!({
        "experiments": [ {
            "exname": "BARLEY_TEST",
            "management": {
                "pdate": "20200315",
                "hadate": "20200801",
                "events": [
                    { "event": "planting", "date": "20200315", "plpop": 300 },
                    { "event": "tillage", "date": "20200301" },
                    { "event": "fertilizer", "date": "20200410", "feamn": "60" }
                ]
            },
            "observed": { "hwam": "5230" }
        } ],
        "weathers": [ {
            "wst_id": "TEST",
            "dailyWeather": [
                weather_record("20200301", 86.4),
                weather_record("20200302", 172.8),
                weather_record("20200303", 0.0)
            ]
        } ],
        "soils": [ {
            "soil_id": "TEST",
            "soilLayer": [
                soil_record(0.0, 30.0, 30.0),
                soil_record(30.0, 60.0, 30.0)
            ]
        } ]
    })
}

pub fn sample_document() -> AgMipDocument {
    AgMipDocument::from_value(sample_value())
}

/// Document with only an experiment, for cultivation tests
pub fn experiment_document(pdate: &str, hadate: &str, events: Value) -> AgMipDocument {
    AgMipDocument::from_value(json!({
        "experiments": [ {
            "management": { "pdate": pdate, "hadate": hadate, "events": events }
        } ]
    }))
}
