//! Error handling for AgMIP to MONICA conversion.
//!
//! Missing fields are not errors: they are collected as diagnostics by the
//! converters. The variants below are the fatal conditions that abort a run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input file {path} does not exist!")]
    InputNotFound { path: PathBuf },

    #[error("Invalid output directory: {path} - {reason}")]
    InvalidOutputDirectory { path: PathBuf, reason: String },

    #[error("Missing section in input document: {section}")]
    MissingSection { section: String },

    #[error("Invalid date for {field}: '{value}' (expected YYYYMMDD)")]
    InvalidDate { field: String, value: String },

    #[error("Invalid value for {field}: '{value}' (expected a number)")]
    InvalidValue { field: String, value: String },

    #[error(
        "Soil layer {layer}: soil_layer_base_depth - soil_layer_top_depth should equal depth \
         (expected {expected} cm, found {found} cm)"
    )]
    SoilDepthMismatch {
        layer: usize,
        expected: f64,
        found: f64,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ConvertError {
    /// Create a missing section error
    pub fn missing_section(section: impl Into<String>) -> Self {
        Self::MissingSection {
            section: section.into(),
        }
    }

    /// Create an invalid date error
    pub fn invalid_date(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidDate {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an invalid numeric value error
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
