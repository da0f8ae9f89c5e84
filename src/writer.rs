//! Output writing for MONICA input files.
//!
//! Every file is written as a whole and overwrites an existing one.

use crate::config::OutputFiles;
use crate::converter::weather::write_climate_csv;
use crate::error::{ConvertError, Result};
use crate::models::{DailyWeather, Diagnostics};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Make sure the output directory exists, creating it if needed
pub fn prepare_output_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() || path.to_string_lossy().trim().is_empty() {
        return Err(ConvertError::InvalidOutputDirectory {
            path: path.to_path_buf(),
            reason: "path is empty".to_string(),
        });
    }

    if path.is_dir() {
        return Ok(());
    }

    if path.exists() {
        return Err(ConvertError::InvalidOutputDirectory {
            path: path.to_path_buf(),
            reason: "path exists and is not a directory".to_string(),
        });
    }

    fs::create_dir_all(path).map_err(|e| ConvertError::InvalidOutputDirectory {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!("Created output directory {}", path.display());
    Ok(())
}

/// Writes the converted documents into one output directory
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
    files: OutputFiles,
}

impl OutputWriter {
    pub fn new(output_dir: PathBuf, files: OutputFiles) -> Self {
        Self { output_dir, files }
    }

    fn target(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// Write `climate.csv`
    pub fn write_climate(&self, days: &[DailyWeather]) -> Result<PathBuf> {
        let path = self.target(&self.files.climate);
        let file = File::create(&path)?;
        write_climate_csv(days, BufWriter::new(file))?;
        debug!("Wrote {} days to {}", days.len(), path.display());
        Ok(path)
    }

    /// Write `site-min.json`
    pub fn write_site(&self, document: &Value) -> Result<PathBuf> {
        self.write_json(&self.files.site, document)
    }

    /// Write `crop.json`
    pub fn write_crop(&self, document: &Value) -> Result<PathBuf> {
        self.write_json(&self.files.crop, document)
    }

    fn write_json(&self, file_name: &str, document: &Value) -> Result<PathBuf> {
        let path = self.target(file_name);
        let text = serde_json::to_string_pretty(document)?;
        fs::write(&path, text)?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Write the diagnostics report; nothing is written when there is nothing to report
    pub fn write_diagnostics(&self, diagnostics: &Diagnostics) -> Result<Option<PathBuf>> {
        if diagnostics.is_empty() {
            return Ok(None);
        }

        let path = self.target(&self.files.diagnostics);
        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(diagnostics.render().as_bytes())?;
        writer.flush()?;
        debug!(
            "Wrote {} diagnostics entries to {}",
            diagnostics.len(),
            path.display()
        );
        Ok(Some(path))
    }
}
