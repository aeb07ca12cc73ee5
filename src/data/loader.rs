use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::{Attribute, AttributeKind, Dataset, Row, Schema, Value};

/// Name of the trailing column that carries row weights on output.
pub const WEIGHT_COLUMN: &str = "weight";

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Load a dataset from a CSV file; the relation is named after the file stem.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let relation = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("data")
        .to_string();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    read_csv(file, &relation)
}

/// CSV layout: header row with attribute names, one row per instance.
/// A column is numeric when every non-missing cell parses as a number,
/// otherwise nominal. Empty and `?` cells are missing.
pub fn read_csv<R: Read>(source: R, relation: &str) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: {} cells but {} columns",
                record.len(),
                headers.len()
            );
        }
        cells.push(record.iter().map(|c| c.trim().to_string()).collect());
    }

    let kinds: Vec<AttributeKind> = (0..headers.len())
        .map(|col| guess_kind(cells.iter().map(|row| row[col].as_str())))
        .collect();

    let attributes = headers
        .into_iter()
        .zip(&kinds)
        .map(|(name, kind)| Attribute::new(name, *kind))
        .collect();

    let rows = cells
        .iter()
        .map(|row| {
            let values = row
                .iter()
                .zip(&kinds)
                .map(|(cell, kind)| to_value(cell, *kind))
                .collect();
            Row::new(values)
        })
        .collect();

    Ok(Dataset::new(Schema::new(relation, attributes), rows))
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || cell == "?"
}

fn guess_kind<'a>(mut column: impl Iterator<Item = &'a str>) -> AttributeKind {
    if column.all(|cell| is_missing(cell) || cell.parse::<f64>().is_ok()) {
        AttributeKind::Numeric
    } else {
        AttributeKind::Nominal
    }
}

fn to_value(cell: &str, kind: AttributeKind) -> Value {
    if is_missing(cell) {
        return Value::Missing;
    }
    match kind {
        AttributeKind::Numeric => cell
            .parse::<f64>()
            .map(Value::Numeric)
            .unwrap_or(Value::Missing),
        _ => Value::Nominal(cell.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// Write `dataset` as CSV with a trailing [`WEIGHT_COLUMN`] of row weights.
pub fn write_csv<W: Write>(dataset: &Dataset, sink: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);

    let mut header: Vec<&str> = dataset
        .schema
        .attributes
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    header.push(WEIGHT_COLUMN);
    writer.write_record(&header).context("writing CSV header")?;

    for (row_no, row) in dataset.rows.iter().enumerate() {
        let mut record: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
        record.push(row.weight.to_string());
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}
