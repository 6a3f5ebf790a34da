use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::aggregate::IntensityBounds;
use crate::data::model::FilterCriteria;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "HEATSPOT_CONFIG";
/// Config file picked up from the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "heatspot.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings.  Every field is optional in the JSON file.
///
/// ```json
/// {
///   "boundary_path": "data/tha_admbnda_adm1.geojson",
///   "detections_dir": "data/df_thai",
///   "region_field": "ADM1_TH",
///   "label_fields": ["ADM1_EN"],
///   "min_intensity": 250.0,
///   "max_intensity": 400.0,
///   "default_exact": "2025-04-10",
///   "default_start": "2025-04-01",
///   "default_end": "2025-04-10",
///   "font_path": "/usr/share/fonts/truetype/tlwg/Garuda.ttf"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub boundary_path: PathBuf,
    pub detections_dir: PathBuf,
    /// Attribute holding the unique region name.
    pub region_field: String,
    /// Extra attributes shown in the map tooltip.
    pub label_fields: Vec<String>,
    pub min_intensity: f64,
    pub max_intensity: f64,
    pub default_exact: NaiveDate,
    pub default_start: NaiveDate,
    pub default_end: NaiveDate,
    /// Font with Thai glyphs; egui's built-in fonts have none.
    pub font_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let day = |d| NaiveDate::from_ymd_opt(2025, 4, d).unwrap_or_default();
        Self {
            boundary_path: PathBuf::from("sample_data/boundaries.geojson"),
            detections_dir: PathBuf::from("sample_data/detections"),
            region_field: "ADM1_TH".to_string(),
            label_fields: vec!["ADM1_EN".to_string()],
            min_intensity: IntensityBounds::DEFAULT_MIN,
            max_intensity: IntensityBounds::DEFAULT_MAX,
            default_exact: day(10),
            default_start: day(1),
            default_end: day(10),
            font_path: None,
        }
    }
}

impl DashboardConfig {
    /// Load from `$HEATSPOT_CONFIG`, else `./heatspot.json`, else defaults.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => {
                log::info!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Read and validate a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check the intensity window and default date range.
    pub fn validate(&self) -> Result<()> {
        self.intensity_bounds()?;
        FilterCriteria::range(self.default_start, self.default_end)?;
        Ok(())
    }

    pub fn intensity_bounds(&self) -> Result<IntensityBounds> {
        Ok(IntensityBounds::new(self.min_intensity, self.max_intensity)?)
    }
}
