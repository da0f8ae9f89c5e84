//! Application constants for the AgMIP to MONICA converter
//!
//! Field names of the AgMIP exchange format, MONICA output layout,
//! unit conversion factors and CLI defaults.

// =============================================================================
// CLI Defaults
// =============================================================================

/// Input document used when `-filename` is not given (relative to the working directory)
pub const DEFAULT_INPUT_FILENAME: &str = "Barley_IT_AgMIP.json";

/// Directory below the user's documents folder used when `-out` is not given
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "AgMIPToMonicaOut";

/// Exit status for every failed run
pub const EXIT_FAILURE: i32 = 10;

// =============================================================================
// Output Files
// =============================================================================

pub const CLIMATE_FILENAME: &str = "climate.csv";
pub const SITE_FILENAME: &str = "site-min.json";
pub const CROP_FILENAME: &str = "crop.json";
pub const DIAGNOSTICS_FILENAME: &str = "filenameErrorOut.txt";

// =============================================================================
// Date Handling
// =============================================================================

/// AgMIP calendar dates: 4-digit year, 2-digit month, 2-digit day
pub const AGMIP_DATE_FORMAT: &str = "%Y%m%d";

/// Exact shape of an AgMIP date string
pub const AGMIP_DATE_PATTERN: &str = r"^\d{8}$";

/// ISO date format written to MONICA files
pub const MONICA_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Unit Conversion
// =============================================================================

pub mod units {
    /// km/day -> m/s
    pub const KM_PER_DAY_PER_M_PER_S: f64 = 86.4;

    /// cm -> m
    pub const CM_TO_M: f64 = 0.01;

    /// g/cm3 -> kg/m3
    pub const G_PER_CM3_TO_KG_PER_M3: f64 = 1000.0;

    /// percent -> fraction of one
    pub const PERCENT_TO_FRACTION: f64 = 0.01;

    /// Allowed difference between (base - top) and the stated layer depth, in cm
    pub const DEPTH_TOLERANCE_CM: f64 = 0.001;
}

// =============================================================================
// AgMIP Document Structure
// =============================================================================

pub mod sections {
    pub const EXPERIMENTS: &str = "experiments";
    pub const WEATHERS: &str = "weathers";
    pub const SOILS: &str = "soils";
    pub const DAILY_WEATHER: &str = "dailyWeather";
    pub const SOIL_LAYER: &str = "soilLayer";
    pub const MANAGEMENT: &str = "management";
    pub const EVENTS: &str = "events";
    pub const OBSERVED: &str = "observed";
}

/// Daily weather record fields
pub mod weather_fields {
    pub const DATE: &str = "w_date";
    pub const RAIN: &str = "rain";
    pub const TAVG: &str = "tavd";
    pub const TMIN: &str = "tmin";
    pub const TMAX: &str = "tmax";
    pub const HUMIDITY: &str = "rhavd";
    pub const RADIATION: &str = "srad";
    pub const WIND: &str = "wind";

    pub const REQUIRED: &[&str] = &[DATE, RAIN, TAVG, TMIN, TMAX, HUMIDITY, RADIATION, WIND];
}

/// Soil layer fields
pub mod soil_fields {
    /// Layer thickness in cm (not part of the published AgMIP standard)
    pub const DEPTH: &str = "depth";
    pub const TOP_DEPTH: &str = "sllt";
    pub const BASE_DEPTH: &str = "sllb";
    pub const ORGANIC_CARBON: &str = "sloc";
    pub const BULK_DENSITY: &str = "sabdm";
    pub const SAND: &str = "slsnd";
    pub const CLAY: &str = "slcly";
    pub const SATURATION: &str = "slsat";
    pub const WILTING_POINT: &str = "slwp";
    pub const FIELD_CAPACITY: &str = "slfc1";

    pub const REQUIRED: &[&str] = &[
        DEPTH,
        TOP_DEPTH,
        BASE_DEPTH,
        ORGANIC_CARBON,
        BULK_DENSITY,
        SAND,
        CLAY,
        SATURATION,
        WILTING_POINT,
        FIELD_CAPACITY,
    ];
}

/// Experiment management fields
pub mod management_fields {
    pub const PLANTING_DATE: &str = "pdate";
    pub const HARVEST_DATE: &str = "hadate";
    pub const OBSERVED_YIELD: &str = "hwam";

    pub const EVENT_DATE: &str = "date";
    pub const EVENT_TYPE: &str = "event";
    pub const CROP_ID: &str = "crid";
    pub const FERTILIZER_AMOUNT: &str = "feamn";
    pub const PLANT_POPULATION: &str = "plpop";

    pub const EVENT_REQUIRED: &[&str] = &[EVENT_DATE, EVENT_TYPE];
}

/// Management event type strings
pub mod event_types {
    pub const PLANTING: &str = "planting";
    pub const FERTILIZER: &str = "fertilizer";
    pub const TILLAGE: &str = "tillage";
}

// =============================================================================
// MONICA Climate CSV
// =============================================================================

/// Column names of climate.csv
pub const CLIMATE_COLUMNS: &[&str] = &[
    "iso-date", "tavg", "tmin", "tmax", "wind", "globrad", "precip", "relhumid",
];

/// Units row of climate.csv
pub const CLIMATE_UNITS: &[&str] = &[
    "",
    "C_deg",
    "C_deg",
    "C_deg",
    "m/s",
    "MJ m-2 d-1",
    "mm",
    "%",
];

/// MONICA include directive used by by-reference parameter blocks
pub const INCLUDE_FROM_FILE: &str = "include-from-file";
