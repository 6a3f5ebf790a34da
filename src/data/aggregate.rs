use super::error::DataError;
use super::model::{Aggregation, Detection, NormalizedDetection, RegionCount, RegionLayer};

// ---------------------------------------------------------------------------
// Intensity normalization
// ---------------------------------------------------------------------------

/// Brightness window mapped onto heat weights `[0, 1]`.
///
/// Only constructible with finite `min < max`, so `weight` never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityBounds {
    min: f64,
    max: f64,
}

impl IntensityBounds {
    /// Default brightness window for VIIRS/MODIS fire pixels, in kelvin.
    pub const DEFAULT_MIN: f64 = 250.0;
    pub const DEFAULT_MAX: f64 = 400.0;

    pub fn new(min: f64, max: f64) -> Result<Self, DataError> {
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(DataError::InvalidIntensityBounds { min, max });
        }
        Ok(IntensityBounds { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamp `intensity` into the window.
    pub fn clamp(&self, intensity: f64) -> f64 {
        intensity.clamp(self.min, self.max)
    }

    /// Linear heat weight of `intensity` after clamping.
    pub fn weight(&self, intensity: f64) -> f64 {
        (self.clamp(intensity) - self.min) / (self.max - self.min)
    }
}

impl Default for IntensityBounds {
    fn default() -> Self {
        IntensityBounds {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

// ---------------------------------------------------------------------------
// Spatial aggregation
// ---------------------------------------------------------------------------

/// Count `detections` per region and build the heat layer.
///
/// Every region appears in the result, with 0 when nothing falls inside it.
/// Detections outside all regions, or without coordinates, are counted as
/// unmatched but still contribute a heat point when they have a position.
pub fn aggregate(
    layer: &RegionLayer,
    detections: &[&Detection],
    bounds: &IntensityBounds,
) -> Aggregation {
    let mut per_region = vec![0usize; layer.len()];
    let mut points = Vec::new();
    let mut matched = 0;

    if detections.iter().any(|d| d.coordinates.is_some()) {
        points.reserve(detections.len());
        for detection in detections {
            let Some(coords) = detection.coordinates else {
                continue;
            };
            if let Some(idx) = layer.locate(coords.to_point()) {
                per_region[idx] += 1;
                matched += 1;
            }
            points.push(NormalizedDetection {
                latitude: coords.latitude,
                longitude: coords.longitude,
                weight: bounds.weight(detection.intensity),
            });
        }
    } else if !detections.is_empty() {
        log::warn!(
            "{} detections carry no coordinates, skipping spatial join",
            detections.len()
        );
    }

    let counts: Vec<RegionCount> = layer
        .regions
        .iter()
        .zip(per_region)
        .map(|(region, count)| RegionCount {
            region: region.name.clone(),
            count,
        })
        .collect();

    let mut ranking = counts.clone();
    // sort_by is stable: equal counts keep region order.
    ranking.sort_by(|a, b| b.count.cmp(&a.count));

    log::debug!(
        "aggregated {} detections: {matched} matched, {} heat points",
        detections.len(),
        points.len()
    );

    Aggregation {
        counts,
        ranking,
        points,
        matched,
        unmatched: detections.len() - matched,
    }
}
