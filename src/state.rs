use std::path::PathBuf;

use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::data::aggregate::{aggregate, IntensityBounds};
use crate::data::cache::{DatasetCache, Versioned};
use crate::data::error::DataError;
use crate::data::filter::filter_by_date;
use crate::data::loader::{load_boundaries, load_detections};
use crate::data::model::{Aggregation, DetectionTable, FilterCriteria, RegionCount, RegionLayer};

// ---------------------------------------------------------------------------
// Filter controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Exact,
    Range,
}

/// Ordering of the count table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableSort {
    #[default]
    CountDesc,
    CountAsc,
    NameAsc,
}

/// Reorder `rows` for display. `rows` must start out in ranking order so that
/// tied counts stay in region order.
pub fn sort_counts(rows: &mut [RegionCount], sort: TableSort) {
    match sort {
        TableSort::CountDesc => rows.sort_by(|a, b| b.count.cmp(&a.count)),
        TableSort::CountAsc => rows.sort_by(|a, b| a.count.cmp(&b.count)),
        TableSort::NameAsc => rows.sort_by(|a, b| a.region.cmp(&b.region)),
    }
}

/// Inputs of one pipeline run; a rerun happens only when this changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PipelineKey {
    regions_version: u64,
    detections_version: u64,
    criteria: FilterCriteria,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,
    pub bounds: IntensityBounds,

    pub cache: DatasetCache,
    pub boundary_path: PathBuf,
    pub detections_dir: PathBuf,

    /// Loaded boundary layer (None until loaded successfully).
    pub regions: Option<Versioned<RegionLayer>>,
    /// Loaded detections (None until loaded successfully).
    pub detections: Option<Versioned<DetectionTable>>,

    pub mode: FilterMode,
    pub exact_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Result of the last pipeline run.
    pub result: Option<Aggregation>,
    /// Detections passing the last filter.
    pub filtered_len: usize,
    last_key: Option<PipelineKey>,

    /// Ordering of the count table.
    pub table_sort: TableSort,
    /// Count table rows in display order.
    pub table_rows: Vec<RegionCount>,

    /// Problem with the current filter controls, shown next to them.
    pub filter_error: Option<String>,
    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, bounds: IntensityBounds) -> Self {
        Self {
            bounds,
            cache: DatasetCache::new(),
            boundary_path: config.boundary_path.clone(),
            detections_dir: config.detections_dir.clone(),
            regions: None,
            detections: None,
            mode: FilterMode::Exact,
            exact_date: config.default_exact,
            start_date: config.default_start,
            end_date: config.default_end,
            result: None,
            filtered_len: 0,
            last_key: None,
            table_sort: TableSort::default(),
            table_rows: Vec::new(),
            filter_error: None,
            status_message: None,
            config,
        }
    }

    /// Criteria described by the current controls.
    pub fn criteria(&self) -> Result<FilterCriteria, DataError> {
        match self.mode {
            FilterMode::Exact => Ok(FilterCriteria::exact(self.exact_date)),
            FilterMode::Range => FilterCriteria::range(self.start_date, self.end_date),
        }
    }

    /// Make sure both datasets are loaded, going through the cache.
    ///
    /// Failures are logged and shown in the status line; the previous
    /// dataset (if any) stays in place.
    pub fn ensure_loaded(&mut self) {
        let name_field = self.config.region_field.clone();
        let regions = self
            .cache
            .regions(&self.boundary_path, |p| load_boundaries(p, &name_field));
        let detections = self.cache.detections(&self.detections_dir, load_detections);

        let mut errors = Vec::new();
        match regions {
            Ok(v) => self.regions = Some(v),
            Err(e) => {
                log::error!("Failed to load boundaries: {e:#}");
                errors.push(format!("Boundaries: {e:#}"));
            }
        }
        match detections {
            Ok(v) => self.detections = Some(v),
            Err(e) => {
                log::error!("Failed to load detections: {e:#}");
                errors.push(format!("Detections: {e:#}"));
            }
        }
        self.status_message = (!errors.is_empty()).then(|| errors.join("  |  "));
    }

    /// Rerun filter + aggregation if datasets or criteria changed.
    ///
    /// Works on the datasets held by the state only; loading happens in
    /// `ensure_loaded`.
    pub fn refresh(&mut self) {
        let criteria = match self.criteria() {
            Ok(c) => {
                self.filter_error = None;
                c
            }
            Err(e) => {
                self.filter_error = Some(e.to_string());
                return;
            }
        };

        let (Some(regions), Some(detections)) = (&self.regions, &self.detections) else {
            return;
        };

        let key = PipelineKey {
            regions_version: regions.version,
            detections_version: detections.version,
            criteria,
        };
        if self.last_key == Some(key) {
            return;
        }

        let filtered = filter_by_date(&detections.value.detections, &criteria);
        let result = aggregate(&regions.value, &filtered, &self.bounds);
        log::debug!(
            "{criteria:?}: {} of {} detections, {} matched",
            filtered.len(),
            detections.value.len(),
            result.matched
        );

        self.filtered_len = filtered.len();
        self.result = Some(result);
        self.last_key = Some(key);
        self.rebuild_table();
    }

    /// Change the count table ordering.
    pub fn set_table_sort(&mut self, sort: TableSort) {
        self.table_sort = sort;
        self.rebuild_table();
    }

    fn rebuild_table(&mut self) {
        self.table_rows = self
            .result
            .as_ref()
            .map(|r| r.ranking.clone())
            .unwrap_or_default();
        sort_counts(&mut self.table_rows, self.table_sort);
    }

    /// Switch to a different boundary file.
    pub fn set_boundary_path(&mut self, path: PathBuf) {
        self.boundary_path = path;
        self.regions = None;
        self.ensure_loaded();
    }

    /// Switch to a different detection directory.
    pub fn set_detections_dir(&mut self, dir: PathBuf) {
        self.detections_dir = dir;
        self.detections = None;
        self.ensure_loaded();
    }

    /// Re-read both datasets from disk.
    pub fn reload(&mut self) {
        self.cache.clear();
        self.ensure_loaded();
    }
}
