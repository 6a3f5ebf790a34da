use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use geo::{CoordsIter, Geometry, MultiPolygon};
use geojson::{GeoJson, JsonObject};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{
    AttributeValue, Coordinates, Detection, DetectionTable, Region, RegionLayer, DEFAULT_INTENSITY,
};

/// Column names of the detection files.
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const ACQ_DATE: &str = "acq_date";
pub const BRIGHTNESS: &str = "brightness";

/// `crs` names accepted as WGS84 longitude/latitude.
const GEOGRAPHIC_CRS: [&str; 4] = [
    "urn:ogc:def:crs:OGC:1.3:CRS84",
    "urn:ogc:def:crs:EPSG::4326",
    "EPSG:4326",
    "OGC:CRS84",
];

// ---------------------------------------------------------------------------
// Boundary loader
// ---------------------------------------------------------------------------

/// Load the province boundary layer from a GeoJSON file.
///
/// Preconditions checked here rather than during aggregation:
/// * every polygon feature has a text `name_field` attribute, unique across the layer
/// * the layer is WGS84 longitude/latitude (legacy `crs` member and coordinate range)
/// * at least one polygon region exists
///
/// Non-polygon features are skipped. Attributes holding dates or timestamps
/// are dropped.
pub fn load_boundaries(path: &Path, name_field: &str) -> Result<RegionLayer> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading boundary file {}", path.display()))?;
    let geojson: GeoJson = text
        .parse()
        .with_context(|| format!("parsing GeoJSON {}", path.display()))?;

    let (features, foreign_members) = match geojson {
        GeoJson::FeatureCollection(fc) => (fc.features, fc.foreign_members),
        GeoJson::Feature(f) => (vec![f], None),
        GeoJson::Geometry(_) => bail!(
            "{}: expected features carrying a '{name_field}' attribute, found a bare geometry",
            path.display()
        ),
    };
    check_crs(foreign_members.as_ref())?;

    let mut regions = Vec::with_capacity(features.len());
    for (i, feature) in features.into_iter().enumerate() {
        let Some(gj) = feature.geometry else {
            log::warn!("feature {i} has no geometry, skipped");
            continue;
        };
        let geom: Geometry<f64> = gj
            .value
            .try_into()
            .with_context(|| format!("feature {i}: invalid geometry"))?;
        let geometry: MultiPolygon<f64> = match geom {
            Geometry::Polygon(p) => p.into(),
            Geometry::MultiPolygon(m) => m,
            _ => {
                log::warn!("feature {i} is not a polygon, skipped");
                continue;
            }
        };
        check_geographic(&geometry)?;

        let mut properties = feature.properties.unwrap_or_default();
        let name = match properties.remove(name_field) {
            Some(JsonValue::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => {
                return Err(DataError::MissingRegionName {
                    feature: i,
                    field: name_field.to_string(),
                }
                .into());
            }
        };

        regions.push(Region {
            name,
            geometry,
            attributes: scalar_attributes(properties),
        });
    }

    if regions.is_empty() {
        return Err(DataError::EmptyBoundaries {
            path: path.to_path_buf(),
        }
        .into());
    }

    let layer = RegionLayer::new(regions)
        .with_context(|| format!("building region layer from {}", path.display()))?;
    log::info!("Loaded {} regions from {}", layer.len(), path.display());
    Ok(layer)
}

fn check_crs(members: Option<&JsonObject>) -> Result<(), DataError> {
    let name = members
        .and_then(|m| m.get("crs"))
        .and_then(|crs| crs.pointer("/properties/name"))
        .and_then(|v| v.as_str());
    match name {
        None => Ok(()),
        Some(n) if GEOGRAPHIC_CRS.iter().any(|g| g.eq_ignore_ascii_case(n)) => Ok(()),
        Some(n) => Err(DataError::UnsupportedCrs(n.to_string())),
    }
}

fn check_geographic(geometry: &MultiPolygon<f64>) -> Result<(), DataError> {
    match geometry
        .coords_iter()
        .find(|c| !(-180.0..=180.0).contains(&c.x) || !(-90.0..=90.0).contains(&c.y))
    {
        Some(c) => Err(DataError::NotGeographic { x: c.x, y: c.y }),
        None => Ok(()),
    }
}

/// Convert feature properties to typed attributes, dropping temporal values.
fn scalar_attributes(properties: JsonObject) -> BTreeMap<String, AttributeValue> {
    properties
        .into_iter()
        .filter(|(_, val)| !matches!(val, JsonValue::String(s) if parse_acq_date(s).is_some()))
        .map(|(key, val)| (key, json_to_attribute(val)))
        .collect()
}

fn json_to_attribute(val: JsonValue) -> AttributeValue {
    match val {
        JsonValue::String(s) => AttributeValue::String(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                AttributeValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                AttributeValue::Float(f)
            } else {
                AttributeValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => AttributeValue::Bool(b),
        JsonValue::Null => AttributeValue::Null,
        other => AttributeValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Detection loader
// ---------------------------------------------------------------------------

/// Load and concatenate every detection file below `dir`.
///
/// Files are discovered recursively and read in sorted path order:
/// * `.parquet` / `.pq` – columnar detections (recommended)
/// * `.csv`             – FIRMS-style CSV with a header row
///
/// `acq_date` is required in every file; `latitude`, `longitude` and
/// `brightness` are optional. A directory with no detection files yields an
/// empty table.
pub fn load_detections(dir: &Path) -> Result<DetectionTable> {
    let mut files = Vec::new();
    discover_files(dir, &mut files)?;

    if files.is_empty() {
        log::warn!("No detection files found under {}", dir.display());
        return Ok(DetectionTable::default());
    }

    let mut table = DetectionTable::default();
    let mut skipped = 0;
    for file in &files {
        let rows = load_detection_file(file)
            .with_context(|| format!("loading detections from {}", file.display()))?;
        skipped += rows.skipped;
        table.detections.extend(rows.detections);
        table.source_files += 1;
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} detections with a missing or unparseable {ACQ_DATE}");
    }
    if !table.detections.iter().any(|d| d.coordinates.is_some()) {
        log::warn!("No detection carries {LATITUDE}/{LONGITUDE}; the map layer will be empty");
    }
    log::info!(
        "Loaded {} detections from {} files under {}",
        table.len(),
        table.source_files,
        dir.display()
    );
    Ok(table)
}

fn discover_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading detection directory {}", dir.display()))?
        .map(|entry| entry.and_then(|e| Ok((e.path(), e.file_type()?))))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("listing {}", dir.display()))?;
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    // `file_type` does not follow symlinks, so linked directories are skipped.
    for (path, file_type) in entries {
        if file_type.is_dir() {
            discover_files(&path, out)?;
        } else if detection_format(&path).is_some() {
            out.push(path);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetectionFormat {
    Parquet,
    Csv,
}

fn detection_format(path: &Path) -> Option<DetectionFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "parquet" | "pq" => Some(DetectionFormat::Parquet),
        "csv" => Some(DetectionFormat::Csv),
        _ => None,
    }
}

/// Rows read from one file, plus how many were dropped for a bad date.
#[derive(Debug, Default)]
struct FileRows {
    detections: Vec<Detection>,
    skipped: usize,
}

impl FileRows {
    fn push(
        &mut self,
        date: Option<NaiveDate>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        brightness: Option<f64>,
    ) {
        let Some(acq_date) = date else {
            self.skipped += 1;
            return;
        };
        let coordinates = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };
        self.detections.push(Detection {
            coordinates,
            acq_date,
            intensity: brightness.unwrap_or(DEFAULT_INTENSITY),
        });
    }
}

fn load_detection_file(path: &Path) -> Result<FileRows> {
    match detection_format(path) {
        Some(DetectionFormat::Parquet) => load_parquet(path),
        Some(DetectionFormat::Csv) => load_csv(path),
        None => bail!("Unsupported file extension: {}", path.display()),
    }
}

// -- CSV --

#[derive(Debug, Deserialize)]
struct CsvDetection {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
    #[serde(default)]
    acq_date: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    brightness: Option<f64>,
}

fn load_csv(path: &Path) -> Result<FileRows> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?;
    if !headers.iter().any(|h| h == ACQ_DATE) {
        return Err(DataError::MissingColumn {
            path: path.to_path_buf(),
            column: ACQ_DATE.to_string(),
        }
        .into());
    }

    let mut rows = FileRows::default();
    for (row_no, result) in reader.deserialize::<CsvDetection>().enumerate() {
        let rec = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(
            rec.acq_date.as_deref().and_then(parse_acq_date),
            rec.latitude.filter(|v| v.is_finite()),
            rec.longitude.filter(|v| v.is_finite()),
            rec.brightness.filter(|v| v.is_finite()),
        );
    }
    Ok(rows)
}

// -- Parquet --

/// Load detections from a Parquet file.
///
/// Works with files written by **Pandas** (`df.to_parquet()`), where
/// `acq_date` is usually a string or `datetime64` column, and by
/// **Polars** / Arrow writers using `Date32`.
fn load_parquet(path: &Path) -> Result<FileRows> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = FileRows::default();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let date_idx = schema
            .index_of(ACQ_DATE)
            .map_err(|_| DataError::MissingColumn {
                path: path.to_path_buf(),
                column: ACQ_DATE.to_string(),
            })?;
        let dates = date_column(batch.column(date_idx))?;
        let lat = f64_column(&batch, LATITUDE)?;
        let lon = f64_column(&batch, LONGITUDE)?;
        let brightness = f64_column(&batch, BRIGHTNESS)?;

        for (row, date) in dates.into_iter().enumerate() {
            rows.push(
                date,
                value_at(lat.as_ref(), row),
                value_at(lon.as_ref(), row),
                value_at(brightness.as_ref(), row),
            );
        }
    }

    Ok(rows)
}

// -- Parquet / Arrow helpers --

/// Reduce an `acq_date` column to calendar dates.
fn date_column(col: &ArrayRef) -> Result<Vec<Option<NaiveDate>>> {
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let strings = cast(col, &DataType::Utf8).context("casting acq_date to Utf8")?;
            Ok(strings
                .as_string::<i32>()
                .iter()
                .map(|v| v.and_then(parse_acq_date))
                .collect())
        }
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            let days = cast(col, &DataType::Date32).context("casting acq_date to Date32")?;
            let days = days.as_primitive::<Date32Type>();
            Ok((0..days.len())
                .map(|i| {
                    if days.is_null(i) {
                        None
                    } else {
                        days.value_as_date(i)
                    }
                })
                .collect())
        }
        other => bail!("column '{ACQ_DATE}' has unsupported type {other:?}"),
    }
}

/// Look up an optional numeric column and widen it to `Float64`.
fn f64_column(batch: &RecordBatch, name: &str) -> Result<Option<Float64Array>> {
    let Ok(idx) = batch.schema().index_of(name) else {
        return Ok(None);
    };
    let col = cast(batch.column(idx), &DataType::Float64)
        .with_context(|| format!("column '{name}' is not numeric"))?;
    Ok(Some(col.as_primitive::<Float64Type>().clone()))
}

fn value_at(col: Option<&Float64Array>, row: usize) -> Option<f64> {
    let col = col?;
    if col.is_null(row) {
        return None;
    }
    Some(col.value(row)).filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

/// Parse a date or timestamp string down to its calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DD HH:MM:SS`
/// (with `T` or space, optional fraction).
pub fn parse_acq_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float32Array, StringArray, TimestampMicrosecondArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::test_support::date;

    fn col<A: Array + 'static>(array: A) -> ArrayRef {
        Arc::new(array)
    }

    fn write_parquet(path: &Path, columns: Vec<(&str, ArrayRef)>) {
        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, arr)| Field::new(*name, arr.data_type().clone(), true))
            .collect();
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(
            schema.clone(),
            columns.into_iter().map(|(_, arr)| arr).collect(),
        )
        .unwrap();
        let file = std::fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "ADM1_TH": "กรุงเทพมหานคร",
                    "ADM1_EN": "Bangkok",
                    "ADM1_PCODE": "TH10",
                    "Shape_Area": 0.13,
                    "date": "2019-02-18",
                    "validOn": "2022-01-22T00:00:00"
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[100.3, 13.5], [100.9, 13.5], [100.9, 14.0], [100.3, 14.0], [100.3, 13.5]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ADM1_TH": "เชียงใหม่", "ADM1_EN": "Chiang Mai" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[98.0, 18.0], [99.5, 18.0], [99.5, 20.0], [98.0, 20.0], [98.0, 18.0]]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ADM1_TH": "label point" },
                "geometry": { "type": "Point", "coordinates": [100.0, 15.0] }
            }
        ]
    }"#;

    #[test]
    fn boundaries_load_polygons_and_drop_temporal_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provinces.geojson");
        std::fs::write(&path, BOUNDARIES).unwrap();

        let layer = load_boundaries(&path, "ADM1_TH").unwrap();
        assert_eq!(layer.len(), 2);

        let bangkok = &layer.regions[0];
        assert_eq!(bangkok.name, "กรุงเทพมหานคร");
        assert_eq!(
            bangkok.attributes.get("ADM1_EN"),
            Some(&AttributeValue::String("Bangkok".into()))
        );
        assert_eq!(
            bangkok.attributes.get("Shape_Area"),
            Some(&AttributeValue::Float(0.13))
        );
        assert!(!bangkok.attributes.contains_key("date"));
        assert!(!bangkok.attributes.contains_key("validOn"));
        assert!(!bangkok.attributes.contains_key("ADM1_TH"));

        assert_eq!(layer.locate(geo::Point::new(98.9, 18.8)), Some(1));
    }

    #[test]
    fn boundaries_missing_name_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provinces.geojson");
        std::fs::write(&path, BOUNDARIES).unwrap();

        let err = load_boundaries(&path, "NAME_1").unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::MissingRegionName {
                feature: 0,
                field: "NAME_1".into()
            })
        );
    }

    #[test]
    fn boundaries_reject_projected_crs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("utm.geojson");
        std::fs::write(
            &path,
            r#"{
                "type": "FeatureCollection",
                "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::32647" } },
                "features": []
            }"#,
        )
        .unwrap();

        let err = load_boundaries(&path, "ADM1_TH").unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::UnsupportedCrs("urn:ogc:def:crs:EPSG::32647".into()))
        );
    }

    #[test]
    fn boundaries_reject_projected_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meters.geojson");
        std::fs::write(
            &path,
            r#"{"type": "FeatureCollection", "features": [{
                "type": "Feature",
                "properties": { "ADM1_TH": "x" },
                "geometry": { "type": "Polygon", "coordinates": [[[660000, 1500000], [670000, 1500000], [670000, 1510000], [660000, 1500000]]] }
            }]}"#,
        )
        .unwrap();

        let err = load_boundaries(&path, "ADM1_TH").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::NotGeographic { .. })
        ));
    }

    #[test]
    fn boundaries_empty_or_missing_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.geojson");
        std::fs::write(&path, r#"{"type": "FeatureCollection", "features": []}"#).unwrap();

        let err = load_boundaries(&path, "ADM1_TH").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::EmptyBoundaries { .. })
        ));

        assert!(load_boundaries(&dir.path().join("nope.geojson"), "ADM1_TH").is_err());
    }

    #[test]
    fn detections_concatenate_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("later").join("04");
        std::fs::create_dir_all(&nested).unwrap();

        write_parquet(
            &dir.path().join("a.parquet"),
            vec![
                ("latitude", col(Float64Array::from(vec![13.7, 18.8]))),
                ("longitude", col(Float32Array::from(vec![100.5f32, 98.9]))),
                ("acq_date", col(StringArray::from(vec!["2025-04-09", "2025-04-10 06:12:00"]))),
                ("brightness", col(Float64Array::from(vec![Some(330.5), None]))),
            ],
        );

        let at = |h| {
            date(2025, 4, 11)
                .and_hms_opt(h, 30, 0)
                .unwrap()
                .and_utc()
                .timestamp_micros()
        };
        write_parquet(
            &nested.join("b.parquet"),
            vec![
                ("latitude", col(Float64Array::from(vec![14.0, 15.0, 16.0]))),
                ("longitude", col(Float64Array::from(vec![100.0, 101.0, 102.0]))),
                (
                    "acq_date",
                    col(TimestampMicrosecondArray::from(vec![Some(at(1)), Some(at(23)), None])),
                ),
            ],
        );

        std::fs::write(
            nested.join("c.csv"),
            "latitude,longitude,brightness,acq_date,confidence\n\
             12.5,101.2,360.1,2025-04-12,n\n\
             12.6,101.3,,2025-04-12,h\n\
             12.7,101.4,300,not-a-date,l\n",
        )
        .unwrap();
        std::fs::write(nested.join("notes.txt"), "ignored").unwrap();

        let table = load_detections(dir.path()).unwrap();
        assert_eq!(table.source_files, 3);
        // one CSV row and one parquet row had no usable date
        assert_eq!(table.len(), 6);

        let first = &table.detections[0];
        assert_eq!(first.acq_date, date(2025, 4, 9));
        assert_eq!(first.intensity, 330.5);
        let coords = first.coordinates.unwrap();
        assert_eq!(coords.latitude, 13.7);
        assert!((coords.longitude - 100.5).abs() < 1e-6);

        assert_eq!(table.detections[1].acq_date, date(2025, 4, 10));
        assert_eq!(table.detections[1].intensity, DEFAULT_INTENSITY);

        assert_eq!(table.detections[2].acq_date, date(2025, 4, 11));
        assert_eq!(table.detections[3].acq_date, date(2025, 4, 11));
        assert_eq!(table.detections[3].intensity, DEFAULT_INTENSITY);

        assert_eq!(table.detections[4].intensity, 360.1);
        assert_eq!(table.detections[5].intensity, DEFAULT_INTENSITY);
        assert_eq!(table.date_span(), Some((date(2025, 4, 9), date(2025, 4, 12))));
    }

    #[test]
    fn detections_without_coordinates_still_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("dates_only.csv"),
            "acq_date,brightness\n2025-04-10,320\n2025-04-10,310\n",
        )
        .unwrap();

        let table = load_detections(dir.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.detections.iter().all(|d| d.coordinates.is_none()));
    }

    #[test]
    fn detections_missing_date_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_parquet(
            &dir.path().join("bad.parquet"),
            vec![("latitude", col(Float64Array::from(vec![1.0])))],
        );

        let err = load_detections(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::MissingColumn { column, .. }) if column == ACQ_DATE
        ));
    }

    #[test]
    fn empty_detection_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let table = load_detections(dir.path()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.source_files, 0);

        assert!(load_detections(&dir.path().join("missing")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("2025");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("d.csv"), "acq_date\n2025-04-10\n").unwrap();
        std::os::unix::fs::symlink(dir.path(), nested.join("loop")).unwrap();

        let table = load_detections(dir.path()).unwrap();
        assert_eq!(table.source_files, 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn acq_date_formats() {
        let d = date(2025, 4, 10);
        assert_eq!(parse_acq_date("2025-04-10"), Some(d));
        assert_eq!(parse_acq_date(" 2025-04-10 "), Some(d));
        assert_eq!(parse_acq_date("2025-04-10 18:45:00"), Some(d));
        assert_eq!(parse_acq_date("2025-04-10T18:45:00.250"), Some(d));
        assert_eq!(parse_acq_date("2025-04-10T18:45:00+07:00"), Some(d));
        assert_eq!(parse_acq_date("10/04/2025"), None);
        assert_eq!(parse_acq_date("Bangkok"), None);
    }
}
