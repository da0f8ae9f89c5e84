//! AgMIP to MONICA converter library
//!
//! Converts agronomic field-trial data in the AgMIP JSON exchange format
//! into the input files of the MONICA crop-growth simulator.
//!
//! This library provides tools for:
//! - Reading the first experiment, weather series and soil profile of an AgMIP document
//! - Converting daily weather to MONICA's `climate.csv`
//! - Converting soil layers to MONICA site parameters (`site-min.json`)
//! - Deriving a sorted crop rotation from management events (`crop.json`)
//! - Collecting missing-field diagnostics without aborting the run

pub mod cli;
pub mod config;
pub mod constants;
pub mod converter;
pub mod document;
pub mod error;
pub mod models;
pub mod writer;

// Re-export commonly used types
pub use config::{ConverterConfig, CropCodeSource, CropDefaults, SiteDefaults};
pub use converter::{ConversionOutput, Converter, convert_document};
pub use document::AgMipDocument;
pub use error::{ConvertError, Result};
pub use models::{
    ConversionStats, CropReference, DailyWeather, Diagnostics, MissingFieldReport, SoilLayer,
    Workstep, WorkstepKind,
};
