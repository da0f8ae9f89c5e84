//! Core data structures for AgMIP to MONICA conversion.
//!
//! Converted records in MONICA units, management worksteps, the missing-field
//! diagnostics each converter returns, and run statistics.

use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;

/// One day of weather in MONICA units
#[derive(Debug, Clone, PartialEq)]
pub struct DailyWeather {
    pub date: NaiveDate,
    /// Average temperature in degree Celsius
    pub tavg: f64,
    /// Minimum temperature in degree Celsius
    pub tmin: f64,
    /// Maximum temperature in degree Celsius
    pub tmax: f64,
    /// Global radiation in MJ m-2 d-1
    pub globrad: f64,
    /// Precipitation in mm
    pub precip: f64,
    /// Relative humidity in %
    pub relhumid: f64,
    /// Wind speed in m/s
    pub wind: f64,
}

/// One soil profile layer in MONICA units
#[derive(Debug, Clone, PartialEq)]
pub struct SoilLayer {
    /// Layer thickness in m
    pub thickness: f64,
    /// Soil organic carbon in % (g[C]/100g[soil])
    pub organic_carbon: f64,
    /// Bulk density in kg m-3
    pub bulk_density: f64,
    /// Fractions of one
    pub sand: f64,
    pub clay: f64,
    pub pore_volume: f64,
    pub permanent_wilting_point: f64,
    pub field_capacity: f64,
}

/// Crop variant referenced by a Sowing workstep
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CropReference {
    /// Variant id under `crops` in crop.json
    Variant(String),
    /// No variant is known for this crop code; the Sowing block carries no crop
    Unmapped { crop_code: String },
}

impl CropReference {
    pub fn variant_id(&self) -> Option<&str> {
        match self {
            CropReference::Variant(id) => Some(id),
            CropReference::Unmapped { .. } => None,
        }
    }
}

/// Type-specific part of a workstep
#[derive(Debug, Clone, PartialEq)]
pub enum WorkstepKind {
    Sowing {
        crop: CropReference,
        /// Plants per square meter
        plant_density: f64,
    },
    MineralFertilization {
        /// kg N
        amount: f64,
        /// Key under `fert-params`
        partition: String,
    },
    Tillage {
        /// m
        depth: f64,
    },
    Harvest,
    /// Event type the converter does not know; kept in the rotation as-is
    Unknown { event_type: String },
}

impl WorkstepKind {
    /// MONICA workstep `type` string
    pub fn type_name(&self) -> &'static str {
        match self {
            WorkstepKind::Sowing { .. } => "Sowing",
            WorkstepKind::MineralFertilization { .. } => "MineralFertilization",
            WorkstepKind::Tillage { .. } => "Tillage",
            WorkstepKind::Harvest => "Harvest",
            WorkstepKind::Unknown { .. } => "unknown type",
        }
    }
}

/// A dated farm-management action in the crop rotation
#[derive(Debug, Clone, PartialEq)]
pub struct Workstep {
    pub date: NaiveDate,
    pub kind: WorkstepKind,
}

impl Workstep {
    pub fn new(date: NaiveDate, kind: WorkstepKind) -> Self {
        Self { date, kind }
    }
}

/// Required fields absent from one input record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFieldReport {
    /// Record kind, e.g. "weather" or "soil"
    pub kind: String,
    /// Pretty-printed JSON of the offending record
    pub record_text: String,
    pub missing: Vec<String>,
}

impl fmt::Display for MissingFieldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing {} parameter in :\r\n", self.kind)?;
        write!(f, "{}\r\n", self.record_text)?;
        write!(f, "Missing: \r\n")?;
        write!(f, "{}", self.missing.join("\r\n"))?;
        write!(f, "\r\n\r\n")
    }
}

/// Diagnostics produced by a single converter or a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub reports: Vec<MissingFieldReport>,
    /// Records that were dropped, with the reason
    pub skipped: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: MissingFieldReport) {
        self.reports.push(report);
    }

    pub fn skip(&mut self, reason: impl Into<String>) {
        self.skipped.push(reason.into());
    }

    /// Append another converter's diagnostics after this one's
    pub fn merge(&mut self, other: Diagnostics) {
        self.reports.extend(other.reports);
        self.skipped.extend(other.skipped);
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty() && self.skipped.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.len() + self.skipped.len()
    }

    /// Text of the diagnostics file
    pub fn render(&self) -> String {
        let mut text: String = self.reports.iter().map(|r| r.to_string()).collect();
        for reason in &self.skipped {
            text.push_str("Skipped record: ");
            text.push_str(reason);
            text.push_str("\r\n\r\n");
        }
        text
    }
}

/// Conversion statistics reported at the end of a run
#[derive(Debug, Default)]
pub struct ConversionStats {
    pub weather_days: usize,
    pub soil_layers: usize,
    pub worksteps: usize,
    pub is_winter_crop: bool,
    pub planting_date: Option<NaiveDate>,
    pub harvest_date: Option<NaiveDate>,
    /// Observed harvest yield (dry weight) in kg/ha, if the experiment has one
    pub observed_yield: Option<f64>,
    pub diagnostics: usize,
    pub output_path: PathBuf,
    pub written_files: Vec<PathBuf>,
    pub processing_time_ms: u128,
}
