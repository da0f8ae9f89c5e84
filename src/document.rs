//! Access layer over the AgMIP JSON exchange document.
//!
//! The document is kept as an untyped `serde_json::Value` tree. Section
//! accessors return the first experiment, weather series and soil profile;
//! field helpers report absence instead of failing so converters can collect
//! diagnostics and carry on.

use crate::constants::{AGMIP_DATE_FORMAT, AGMIP_DATE_PATTERN, management_fields, sections};
use crate::error::{ConvertError, Result};
use crate::models::MissingFieldReport;
use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(AGMIP_DATE_PATTERN).expect("AgMIP date pattern is valid"));

/// Parsed AgMIP document
#[derive(Debug, Clone)]
pub struct AgMipDocument {
    root: Value,
}

impl AgMipDocument {
    /// Wrap an already parsed tree
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parse document text
    pub fn parse(text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text)?;
        if !root.is_object() {
            return Err(ConvertError::missing_section("document root object"));
        }
        Ok(Self { root })
    }

    /// Read and parse a document file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let document = Self::parse(&text)?;
        debug!("Parsed AgMIP document {} ({} bytes)", path.display(), text.len());
        Ok(document)
    }

    /// First element of a top-level array section
    fn first_of(&self, section: &str) -> Result<&Value> {
        let entries = self
            .root
            .get(section)
            .and_then(Value::as_array)
            .ok_or_else(|| ConvertError::missing_section(section))?;

        if entries.len() > 1 {
            debug!(
                "{} entries in '{}', only the first is converted",
                entries.len(),
                section
            );
        }

        entries
            .first()
            .ok_or_else(|| ConvertError::missing_section(format!("{}[0]", section)))
    }

    /// Non-empty record list nested in the first element of a section
    fn records_of(&self, section: &str, list: &str) -> Result<&[Value]> {
        let records = self
            .first_of(section)?
            .get(list)
            .and_then(Value::as_array)
            .ok_or_else(|| ConvertError::missing_section(format!("{}[0].{}", section, list)))?;

        if records.is_empty() {
            return Err(ConvertError::missing_section(format!(
                "{}[0].{} (empty)",
                section, list
            )));
        }
        Ok(records.as_slice())
    }

    /// Daily records of the first weather series
    pub fn daily_weather(&self) -> Result<&[Value]> {
        self.records_of(sections::WEATHERS, sections::DAILY_WEATHER)
    }

    /// Layers of the first soil profile, top to bottom
    pub fn soil_layers(&self) -> Result<&[Value]> {
        self.records_of(sections::SOILS, sections::SOIL_LAYER)
    }

    /// First experiment
    pub fn experiment(&self) -> Result<&Value> {
        self.first_of(sections::EXPERIMENTS)
    }

    /// Management block of the first experiment
    pub fn management(&self) -> Result<&Value> {
        self.experiment()?
            .get(sections::MANAGEMENT)
            .filter(|v| v.is_object())
            .ok_or_else(|| {
                ConvertError::missing_section(format!(
                    "{}[0].{}",
                    sections::EXPERIMENTS,
                    sections::MANAGEMENT
                ))
            })
    }

    /// Management events of the first experiment; an absent list is empty
    pub fn events(&self) -> Result<&[Value]> {
        match self.management()?.get(sections::EVENTS) {
            Some(Value::Array(events)) => Ok(events.as_slice()),
            Some(Value::Null) | None => {
                warn!("Experiment has no management events");
                Ok(&[])
            }
            Some(_) => Err(ConvertError::missing_section(format!(
                "{}[0].{}.{} (not a list)",
                sections::EXPERIMENTS,
                sections::MANAGEMENT,
                sections::EVENTS
            ))),
        }
    }

    /// Observed harvest yield (dry weight, kg/ha) of the first experiment
    pub fn observed_yield(&self) -> Result<Option<f64>> {
        match self.experiment()?.get(sections::OBSERVED) {
            Some(observed) => parse_optional_f64(observed, management_fields::OBSERVED_YIELD),
            None => Ok(None),
        }
    }
}

/// Get a field value, treating null and empty strings as absent
pub fn get_optional_field<'a>(record: &'a Value, field_name: &str) -> Option<&'a Value> {
    record.get(field_name).filter(|value| match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}

/// Names from `required` that the record does not carry
pub fn missing_fields(record: &Value, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| get_optional_field(record, name).is_none())
        .map(|name| name.to_string())
        .collect()
}

/// Presence check producing a diagnostics entry when anything is missing
pub fn check_fields(record: &Value, required: &[&str], kind: &str) -> Option<MissingFieldReport> {
    let missing = missing_fields(record, required);
    if missing.is_empty() {
        return None;
    }

    warn!("Missing {} parameter: {}", kind, missing.join(", "));

    let record_text = serde_json::to_string_pretty(record).unwrap_or_else(|_| record.to_string());
    Some(MissingFieldReport {
        kind: kind.to_string(),
        record_text,
        missing,
    })
}

/// Parse an optional numeric field. AgMIP stores numbers either as JSON
/// numbers or as numeric strings; `NaN` and infinities are rejected.
pub fn parse_optional_f64(record: &Value, field_name: &str) -> Result<Option<f64>> {
    let Some(value) = get_optional_field(record, field_name) else {
        return Ok(None);
    };

    match value {
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| ConvertError::invalid_value(field_name, n.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| ConvertError::invalid_value(field_name, s.as_str())),
        other => Err(ConvertError::invalid_value(field_name, other.to_string())),
    }
}

/// Numeric field with the zero fallback used for missing values
pub fn parse_f64_or_zero(record: &Value, field_name: &str) -> Result<f64> {
    Ok(parse_optional_f64(record, field_name)?.unwrap_or(0.0))
}

/// Optional field rendered as text (strings as-is, other scalars via JSON)
pub fn parse_optional_string(record: &Value, field_name: &str) -> Option<String> {
    get_optional_field(record, field_name).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Parse a fixed-format AgMIP date (`YYYYMMDD`)
pub fn parse_agmip_date(field_name: &str, value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if !DATE_SHAPE.is_match(trimmed) {
        return Err(ConvertError::invalid_date(field_name, value));
    }
    NaiveDate::parse_from_str(trimmed, AGMIP_DATE_FORMAT)
        .map_err(|_| ConvertError::invalid_date(field_name, value))
}

/// Parse a required date field; absence is reported as an invalid (empty) date
pub fn parse_required_date(record: &Value, field_name: &str) -> Result<NaiveDate> {
    let text = parse_optional_string(record, field_name)
        .ok_or_else(|| ConvertError::invalid_date(field_name, ""))?;
    parse_agmip_date(field_name, &text)
}
