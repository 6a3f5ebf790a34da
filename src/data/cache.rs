use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use super::model::{DetectionTable, RegionLayer};

// ---------------------------------------------------------------------------
// Versioned dataset cache
// ---------------------------------------------------------------------------

/// A shared dataset plus the version it was assigned when loaded.
///
/// Versions are unique per cache, so `(regions.version, detections.version)`
/// fingerprints the inputs of a pipeline run.
#[derive(Debug)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: Arc<T>,
}

impl<T> Clone for Versioned<T> {
    fn clone(&self) -> Self {
        Versioned {
            version: self.version,
            value: Arc::clone(&self.value),
        }
    }
}

#[derive(Debug)]
struct Entry<T> {
    source: PathBuf,
    data: Versioned<T>,
}

/// Session cache for the two base datasets.
///
/// Each dataset is loaded lazily on first request for a given source path and
/// reused until invalidated or requested for a different path. The loader is
/// passed in by the caller, so tests can inject their own.
#[derive(Debug, Default)]
pub struct DatasetCache {
    regions: Option<Entry<RegionLayer>>,
    detections: Option<Entry<DetectionTable>>,
    last_version: u64,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached region layer for `source`, loading it with `load` on a miss.
    pub fn regions<F>(&mut self, source: &Path, load: F) -> Result<Versioned<RegionLayer>>
    where
        F: FnOnce(&Path) -> Result<RegionLayer>,
    {
        get_or_load(&mut self.regions, &mut self.last_version, source, load)
    }

    /// Cached detection table for `source`, loading it with `load` on a miss.
    pub fn detections<F>(&mut self, source: &Path, load: F) -> Result<Versioned<DetectionTable>>
    where
        F: FnOnce(&Path) -> Result<DetectionTable>,
    {
        get_or_load(&mut self.detections, &mut self.last_version, source, load)
    }

    pub fn invalidate_regions(&mut self) {
        self.regions = None;
    }

    pub fn invalidate_detections(&mut self) {
        self.detections = None;
    }

    /// Drop both datasets; versions keep increasing.
    pub fn clear(&mut self) {
        self.invalidate_regions();
        self.invalidate_detections();
    }
}

fn get_or_load<T, F>(
    slot: &mut Option<Entry<T>>,
    last_version: &mut u64,
    source: &Path,
    load: F,
) -> Result<Versioned<T>>
where
    F: FnOnce(&Path) -> Result<T>,
{
    if let Some(entry) = slot {
        if entry.source == source {
            return Ok(entry.data.clone());
        }
    }

    let value = load(source)?;
    *last_version += 1;
    let data = Versioned {
        version: *last_version,
        value: Arc::new(value),
    };
    *slot = Some(Entry {
        source: source.to_path_buf(),
        data: data.clone(),
    });
    Ok(data)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use anyhow::anyhow;

    use super::*;
    use crate::data::test_support::square;

    fn layer() -> RegionLayer {
        RegionLayer::new(vec![square("A", 0.0, 0.0, 1.0, 1.0)]).unwrap()
    }

    #[test]
    fn loads_once_per_source() {
        let mut cache = DatasetCache::new();
        let calls = Cell::new(0);
        let load = |_: &Path| {
            calls.set(calls.get() + 1);
            Ok(layer())
        };

        let a = cache.regions(Path::new("p.geojson"), load).unwrap();
        let b = cache.regions(Path::new("p.geojson"), load).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(a.version, b.version);
        assert!(Arc::ptr_eq(&a.value, &b.value));
    }

    #[test]
    fn invalidation_and_new_source_reload() {
        let mut cache = DatasetCache::new();
        let calls = Cell::new(0);
        let load = |_: &Path| {
            calls.set(calls.get() + 1);
            Ok(DetectionTable::default())
        };

        let first = cache.detections(Path::new("a"), load).unwrap();
        cache.invalidate_detections();
        let second = cache.detections(Path::new("a"), load).unwrap();
        let third = cache.detections(Path::new("b"), load).unwrap();
        assert_eq!(calls.get(), 3);
        assert!(first.version < second.version);
        assert!(second.version < third.version);

        cache.clear();
        let fourth = cache.detections(Path::new("b"), load).unwrap();
        assert_eq!(calls.get(), 4);
        assert!(third.version < fourth.version);
    }

    #[test]
    fn versions_are_unique_across_datasets() {
        let mut cache = DatasetCache::new();
        let regions = cache.regions(Path::new("r"), |_| Ok(layer())).unwrap();
        let detections = cache
            .detections(Path::new("d"), |_| Ok(DetectionTable::default()))
            .unwrap();
        assert_ne!(regions.version, detections.version);
    }

    #[test]
    fn failed_load_caches_nothing() {
        let mut cache = DatasetCache::new();
        let err = cache
            .regions(Path::new("r"), |_| Err(anyhow!("unreadable")))
            .unwrap_err();
        assert_eq!(err.to_string(), "unreadable");

        let calls = Cell::new(0);
        cache
            .regions(Path::new("r"), |_| {
                calls.set(calls.get() + 1);
                Ok(layer())
            })
            .unwrap();
        assert_eq!(calls.get(), 1);
    }
}
