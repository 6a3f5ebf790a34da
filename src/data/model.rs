use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use geo::{BoundingRect, Contains, MultiPolygon, Point};
use rstar::{RTree, RTreeObject, AABB};
use serde::Serialize;

use super::error::DataError;

// ---------------------------------------------------------------------------
// AttributeValue – a single region attribute
// ---------------------------------------------------------------------------

/// A dynamically-typed attribute value read from the boundary file.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{s}"),
            AttributeValue::Integer(i) => write!(f, "{i}"),
            AttributeValue::Float(v) => write!(f, "{v:.4}"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Region / RegionLayer – the boundary dataset
// ---------------------------------------------------------------------------

/// One administrative region (province).
#[derive(Debug, Clone)]
pub struct Region {
    /// Unique region name, e.g. the Thai province name.
    pub name: String,
    /// Outline in WGS84 longitude/latitude.
    pub geometry: MultiPolygon<f64>,
    /// Remaining scalar attributes (timestamp-valued ones are dropped at load).
    pub attributes: BTreeMap<String, AttributeValue>,
}

/// Bounding box of one region, indexed in the R-tree.
#[derive(Debug, Clone)]
struct RegionEnvelope {
    index: usize,
    min: [f64; 2],
    max: [f64; 2],
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

/// All regions in file order plus a bounding-box index for point lookup.
#[derive(Debug, Clone)]
pub struct RegionLayer {
    pub regions: Vec<Region>,
    index: RTree<RegionEnvelope>,
}

impl RegionLayer {
    /// Build the layer, rejecting duplicate region names.
    pub fn new(regions: Vec<Region>) -> Result<Self, DataError> {
        let mut seen = std::collections::BTreeSet::new();
        for region in &regions {
            if !seen.insert(region.name.as_str()) {
                return Err(DataError::DuplicateRegion(region.name.clone()));
            }
        }

        let envelopes: Vec<RegionEnvelope> = regions
            .iter()
            .enumerate()
            .filter_map(|(index, region)| {
                let rect = region.geometry.bounding_rect()?;
                Some(RegionEnvelope {
                    index,
                    min: [rect.min().x, rect.min().y],
                    max: [rect.max().x, rect.max().y],
                })
            })
            .collect();

        Ok(RegionLayer {
            regions,
            index: RTree::bulk_load(envelopes),
        })
    }

    /// Index of the first region (in file order) whose interior contains `point`.
    ///
    /// Points on a shared edge are not contained by either neighbour and
    /// come back as `None`.
    pub fn locate(&self, point: Point<f64>) -> Option<usize> {
        let probe = AABB::from_point([point.x(), point.y()]);
        let mut candidates: Vec<usize> = self
            .index
            .locate_in_envelope_intersecting(&probe)
            .map(|env| env.index)
            .collect();
        candidates.sort_unstable();
        candidates
            .into_iter()
            .find(|&i| self.regions[i].geometry.contains(&point))
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the layer has no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Detection / DetectionTable – the heat-spot dataset
// ---------------------------------------------------------------------------

/// Geographic position of a detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Point in (x = longitude, y = latitude) order, matching the region layer.
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// A single satellite heat-spot detection (one row of the source files).
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// `None` when the source file has no coordinate columns or the row is null.
    pub coordinates: Option<Coordinates>,
    /// Acquisition date, calendar-day granularity.
    pub acq_date: NaiveDate,
    /// Brightness temperature; 1.0 when the source has none.
    pub intensity: f64,
}

/// Brightness used when the source has no `brightness` value.
pub const DEFAULT_INTENSITY: f64 = 1.0;

/// Every detection from every discovered file, concatenated.
#[derive(Debug, Clone, Default)]
pub struct DetectionTable {
    pub detections: Vec<Detection>,
    /// Number of files that contributed rows.
    pub source_files: usize,
}

impl DetectionTable {
    /// Number of detections.
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Earliest and latest acquisition date, if any rows exist.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.detections.first()?.acq_date;
        Some(self.detections.iter().fold((first, first), |(lo, hi), d| {
            (lo.min(d.acq_date), hi.max(d.acq_date))
        }))
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria
// ---------------------------------------------------------------------------

/// Which dates to keep.  A `Range` is always ordered (`start <= end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCriteria {
    Exact(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
}

impl FilterCriteria {
    pub fn exact(date: NaiveDate) -> Self {
        FilterCriteria::Exact(date)
    }

    /// Inclusive range; rejects `start > end`.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, DataError> {
        if start > end {
            return Err(DataError::InvertedDateRange { start, end });
        }
        Ok(FilterCriteria::Range { start, end })
    }

    /// Whether `date` passes the criteria.
    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            FilterCriteria::Exact(d) => date == d,
            FilterCriteria::Range { start, end } => start <= date && date <= end,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived results
// ---------------------------------------------------------------------------

/// Number of filtered detections inside one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionCount {
    pub region: String,
    pub count: usize,
}

/// A detection position with its heat weight in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedDetection {
    pub latitude: f64,
    pub longitude: f64,
    pub weight: f64,
}

/// Output of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// One entry per region, in region-layer order.
    pub counts: Vec<RegionCount>,
    /// Same entries sorted by count, highest first; ties keep region order.
    pub ranking: Vec<RegionCount>,
    /// Heat layer: every filtered detection that has coordinates.
    pub points: Vec<NormalizedDetection>,
    /// Detections assigned to a region.
    pub matched: usize,
    /// Detections outside every region, or without coordinates.
    pub unmatched: usize,
}

impl Aggregation {
    /// Largest per-region count (0 for an empty layer).
    pub fn max_count(&self) -> usize {
        self.counts.iter().map(|c| c.count).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{date, square};

    #[test]
    fn locate_finds_containing_region() {
        let layer = RegionLayer::new(vec![
            square("A", 0.0, 0.0, 1.0, 1.0),
            square("B", 2.0, 2.0, 3.0, 3.0),
        ])
        .unwrap();

        assert_eq!(layer.locate(Point::new(0.5, 0.5)), Some(0));
        assert_eq!(layer.locate(Point::new(2.5, 2.9)), Some(1));
        assert_eq!(layer.locate(Point::new(5.0, 5.0)), None);
        // Between the two envelopes.
        assert_eq!(layer.locate(Point::new(1.5, 1.5)), None);
    }

    #[test]
    fn locate_prefers_first_region_on_overlap() {
        let layer = RegionLayer::new(vec![
            square("outer", 0.0, 0.0, 10.0, 10.0),
            square("inner", 4.0, 4.0, 6.0, 6.0),
        ])
        .unwrap();
        assert_eq!(layer.locate(Point::new(5.0, 5.0)), Some(0));
    }

    #[test]
    fn shared_edge_is_not_interior() {
        let layer = RegionLayer::new(vec![
            square("west", 0.0, 0.0, 1.0, 1.0),
            square("east", 1.0, 0.0, 2.0, 1.0),
        ])
        .unwrap();
        assert_eq!(layer.locate(Point::new(1.0, 0.5)), None);
    }

    #[test]
    fn duplicate_region_names_are_rejected() {
        let err = RegionLayer::new(vec![
            square("A", 0.0, 0.0, 1.0, 1.0),
            square("A", 2.0, 2.0, 3.0, 3.0),
        ])
        .unwrap_err();
        assert_eq!(err, DataError::DuplicateRegion("A".into()));
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        let start = date(2025, 4, 10);
        let end = date(2025, 4, 1);
        assert_eq!(
            FilterCriteria::range(start, end),
            Err(DataError::InvertedDateRange { start, end })
        );
        assert!(FilterCriteria::range(end, start).is_ok());
        assert!(FilterCriteria::range(start, start).is_ok());
    }

    #[test]
    fn range_matches_inclusive_bounds() {
        let c = FilterCriteria::range(date(2025, 4, 1), date(2025, 4, 3)).unwrap();
        assert!(c.matches(date(2025, 4, 1)));
        assert!(c.matches(date(2025, 4, 3)));
        assert!(!c.matches(date(2025, 3, 31)));
        assert!(!c.matches(date(2025, 4, 4)));
    }

    #[test]
    fn date_span_covers_all_rows() {
        let row = |d| Detection {
            coordinates: None,
            acq_date: d,
            intensity: DEFAULT_INTENSITY,
        };
        let table = DetectionTable {
            detections: vec![row(date(2025, 4, 5)), row(date(2025, 4, 1)), row(date(2025, 4, 9))],
            source_files: 1,
        };
        assert_eq!(table.date_span(), Some((date(2025, 4, 1), date(2025, 4, 9))));
        assert_eq!(DetectionTable::default().date_span(), None);
    }
}
