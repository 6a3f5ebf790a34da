use std::path::Path;

use anyhow::{Context, Result};

use super::model::RegionCount;

/// Write the count table to `path` as CSV (`region,count`), in the given order.
pub fn export_counts(path: &Path, counts: &[RegionCount]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    if counts.is_empty() {
        // `serialize` emits the header with the first row only.
        writer
            .write_record(["region", "count"])
            .context("writing CSV header")?;
    }
    for row in counts {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts.csv");
        let counts = vec![
            RegionCount {
                region: "เชียงใหม่".into(),
                count: 12,
            },
            RegionCount {
                region: "Bangkok".into(),
                count: 0,
            },
        ];

        export_counts(&path, &counts).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "region,count\nเชียงใหม่,12\nBangkok,0\n");
    }

    #[test]
    fn empty_table_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts.csv");
        export_counts(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "region,count\n");
    }
}
