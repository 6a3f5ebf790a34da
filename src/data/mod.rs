//! Data layer: core types, loading, caching, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  boundaries.geojson        detections/**/*.parquet|*.csv
//!        │                              │
//!        ▼                              ▼
//!   ┌──────────┐                  ┌──────────┐
//!   │  loader   │ → RegionLayer   │  loader   │ → DetectionTable
//!   └──────────┘                  └──────────┘
//!        │                              │
//!        └──────────────┬───────────────┘
//!                       ▼
//!                 ┌──────────┐
//!                 │  cache    │  versioned Arc<…> per source path
//!                 └──────────┘
//!                       │
//!                       ▼
//!                 ┌──────────┐
//!                 │  filter   │  FilterCriteria → matching detections
//!                 └──────────┘
//!                       │
//!                       ▼
//!                ┌────────────┐
//!                │ aggregate   │  region counts, ranking, heat weights
//!                └────────────┘
//!                       │
//!                       ▼
//!                 ┌──────────┐
//!                 │  export   │  ranking → CSV
//!                 └──────────┘
//! ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use geo::{polygon, MultiPolygon};

    use super::model::{Coordinates, Detection, Region};

    /// Axis-aligned square region with the given corners.
    pub fn square(name: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> Region {
        Region {
            name: name.to_string(),
            geometry: MultiPolygon(vec![polygon![
                (x: x0, y: y0),
                (x: x1, y: y0),
                (x: x1, y: y1),
                (x: x0, y: y1),
                (x: x0, y: y0),
            ]]),
            attributes: BTreeMap::new(),
        }
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Detection at (lat, lon) on 2025-04-10.
    pub fn detection(latitude: f64, longitude: f64, intensity: f64) -> Detection {
        Detection {
            coordinates: Some(Coordinates {
                latitude,
                longitude,
            }),
            acq_date: date(2025, 4, 10),
            intensity,
        }
    }

    /// Detection on the given date with a fixed in-range position.
    pub fn dated(y: i32, m: u32, d: u32) -> Detection {
        Detection {
            coordinates: Some(Coordinates {
                latitude: 0.5,
                longitude: 0.5,
            }),
            acq_date: date(y, m, d),
            intensity: 300.0,
        }
    }
}
