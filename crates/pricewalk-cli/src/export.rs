//! CSV output for scraped records.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use pricewalk_core::ProductRecord;

/// Writes `records` to `path` with a `title,url,price,currency,page,position`
/// header. An empty slice writes nothing and creates no file.
pub(crate) fn write_csv(records: &[ProductRecord], path: &Path) -> anyhow::Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_records(records, file).with_context(|| format!("failed to write {}", path.display()))
}

pub(crate) fn write_records<W: Write>(records: &[ProductRecord], out: W) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_writer(out);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ProductRecord> {
        vec![
            ProductRecord::new(
                "Sample Product 1",
                "https://www.example.com/product-1",
                "19.99",
                "$",
                1,
                1,
            )
            .unwrap(),
            ProductRecord::new(
                "Desk, Lamp \"XL\"",
                "https://www.example.com/product-2",
                "1299.00",
                "€",
                2,
                5,
            )
            .unwrap(),
        ]
    }

    #[test]
    fn writes_header_then_rows_in_order() {
        let mut buf = Vec::new();
        let written = write_records(&sample(), &mut buf).unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "title,url,price,currency,page,position");
        assert_eq!(
            lines[1],
            "Sample Product 1,https://www.example.com/product-1,19.99,$,1,1"
        );
        assert_eq!(
            lines[2],
            "\"Desk, Lamp \"\"XL\"\"\",https://www.example.com/product-2,1299.00,€,2,5"
        );
    }

    #[test]
    fn empty_batch_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        assert_eq!(write_csv(&[], &path).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn writes_file_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        assert_eq!(write_csv(&sample(), &path).unwrap(), 2);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.csv");
        let err = write_csv(&sample(), &path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to create"));
    }
}
