use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;
use serde_json::json;

/// Synthetic provinces: (Thai name, English name, lon0, lat0, lon1, lat1).
const PROVINCES: [(&str, &str, f64, f64, f64, f64); 6] = [
    ("เชียงใหม่", "Chiang Mai", 97.5, 17.5, 99.5, 20.0),
    ("เชียงราย", "Chiang Rai", 99.5, 19.0, 100.7, 20.5),
    ("น่าน", "Nan", 100.3, 17.8, 101.4, 19.0),
    ("ตาก", "Tak", 97.5, 15.5, 99.5, 17.5),
    ("กาญจนบุรี", "Kanchanaburi", 98.3, 13.5, 99.8, 15.5),
    ("กรุงเทพมหานคร", "Bangkok", 100.3, 13.5, 100.95, 14.0),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn write_boundaries(path: &Path) -> Result<()> {
    let features: Vec<_> = PROVINCES
        .iter()
        .enumerate()
        .map(|(i, &(th, en, x0, y0, x1, y1))| {
            json!({
                "type": "Feature",
                "properties": {
                    "ADM1_TH": th,
                    "ADM1_EN": en,
                    "ADM1_PCODE": format!("TH{:02}", 50 + i),
                    "validOn": "2022-01-22",
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]],
                },
            })
        })
        .collect();
    let collection = json!({ "type": "FeatureCollection", "features": features });
    let text = serde_json::to_string_pretty(&collection)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

/// One day of detections: clustered around a few fire centres in the north,
/// plus scattered points, some outside every synthetic province.
fn day_detections(rng: &mut SimpleRng, day: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let centres = [(18.8, 98.9), (19.9, 99.8), (16.9, 98.6), (14.5, 99.0)];
    let n = 40 + day * 12;

    let mut lat = Vec::with_capacity(n);
    let mut lon = Vec::with_capacity(n);
    let mut brightness = Vec::with_capacity(n);
    for k in 0..n {
        if k % 5 == 0 {
            lat.push(rng.uniform(5.5, 20.5));
            lon.push(rng.uniform(97.3, 105.7));
        } else {
            let (clat, clon) = centres[k % centres.len()];
            lat.push(rng.gauss(clat, 0.25));
            lon.push(rng.gauss(clon, 0.25));
        }
        brightness.push(rng.gauss(320.0, 35.0));
    }
    (lat, lon, brightness)
}

fn write_day(path: &Path, date: NaiveDate, rows: (Vec<f64>, Vec<f64>, Vec<f64>)) -> Result<usize> {
    let (lat, lon, brightness) = rows;
    let n = lat.len();
    let date = date.format("%Y-%m-%d").to_string();

    let schema = Arc::new(Schema::new(vec![
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
        Field::new("brightness", DataType::Float64, false),
        Field::new("acq_date", DataType::Utf8, false),
        Field::new("satellite", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(lat)),
            Arc::new(Float64Array::from(lon)),
            Arc::new(Float64Array::from(brightness)),
            Arc::new(StringArray::from(vec![date.as_str(); n])),
            Arc::new(StringArray::from(vec!["N"; n])),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(n)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let root = Path::new("sample_data");
    let month_dir = root.join("detections").join("2025").join("04");
    std::fs::create_dir_all(&month_dir).context("creating sample_data directories")?;

    write_boundaries(&root.join("boundaries.geojson"))?;

    let first = NaiveDate::from_ymd_opt(2025, 4, 1).context("invalid start date")?;
    let mut total = 0;
    for day in 0..12 {
        let date = first + Duration::days(day as i64);
        let path = month_dir.join(format!("viirs_{}.parquet", date.format("%Y%m%d")));
        total += write_day(&path, date, day_detections(&mut rng, day))?;
    }

    println!(
        "Wrote {} provinces and {total} detections to {}",
        PROVINCES.len(),
        root.display()
    );
    Ok(())
}
