//! CSV loading for the trade dataset.
//!
//! The header must name every column in [`COLUMNS`] exactly, without padding;
//! extra columns are ignored. Cell values are trimmed.
//! Optional numeric cells that fail to parse become `None`. Rows with a missing
//! or unparseable required field are dropped and counted.

use super::record::{RecordStore, TradeRecord};
use anyhow::Context;
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Columns the input must carry, by exact name.
pub const COLUMNS: [&str; 16] = [
    "year",
    "reporter_iso3",
    "partner_iso3",
    "product_code",
    "distance_km",
    "fta_active",
    "adval_tariff_pct",
    "reporter_gdp_bln",
    "partner_gdp_bln",
    "reporter_pop_m",
    "partner_pop_m",
    "reporter_cpi",
    "partner_cpi",
    "export_value_usd_mln",
    "quantity_tonnes",
    "unit_price_usd_per_tonne",
];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("schema mismatch, missing column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Outcome of a load: the store plus how many rows were read and dropped.
#[derive(Debug)]
pub struct LoadReport {
    pub store: RecordStore,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// Loads the dataset from a CSV file on disk.
pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<LoadReport> {
    let path = path.as_ref();
    debug!("Loading trade data from {}", path.display());
    let file = File::open(path)
        .with_context(|| format!("Failed to open trade data: {}", path.display()))?;
    let report = load_from_reader(file)
        .with_context(|| format!("Failed to load trade data: {}", path.display()))?;
    info!(
        rows_read = report.rows_read,
        rows_dropped = report.rows_dropped,
        "Loaded {} trade records",
        report.store.len()
    );
    Ok(report)
}

/// Loads the dataset from any CSV source with a header row.
pub fn load_from_reader<R: Read>(reader: R) -> Result<LoadReport, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Fields)
        .from_reader(reader);

    let columns = ColumnIndex::resolve(reader.headers()?)?;

    let mut records = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_dropped = 0usize;

    for (idx, row) in reader.records().enumerate() {
        rows_read += 1;
        // header is line 1
        let line = idx + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(line, "Skipping unreadable row: {e}");
                rows_dropped += 1;
                continue;
            }
        };

        match columns.parse(&row) {
            Some(record) => records.push(record),
            None => {
                debug!(line, "Dropping row with missing required field");
                rows_dropped += 1;
            }
        }
    }

    if rows_dropped > 0 {
        warn!("Dropped {rows_dropped} of {rows_read} rows during load");
    }

    Ok(LoadReport {
        store: RecordStore::new(records),
        rows_read,
        rows_dropped,
    })
}

/// Position of each known column in the header.
struct ColumnIndex([usize; COLUMNS.len()]);

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let mut positions = [0usize; COLUMNS.len()];
        let mut missing = Vec::new();

        for (slot, name) in positions.iter_mut().zip(COLUMNS) {
            match headers.iter().position(|h| h == name) {
                Some(pos) => *slot = pos,
                None => missing.push(name.to_string()),
            }
        }

        if missing.is_empty() {
            Ok(Self(positions))
        } else {
            Err(LoadError::MissingColumns(missing))
        }
    }

    fn cell<'r>(&self, row: &'r StringRecord, column: usize) -> Option<&'r str> {
        row.get(self.0[column]).filter(|s| !s.is_empty())
    }

    fn text(&self, row: &StringRecord, column: usize) -> Option<String> {
        self.cell(row, column).map(String::from)
    }

    fn number(&self, row: &StringRecord, column: usize) -> Option<f64> {
        self.cell(row, column)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    fn integer(&self, row: &StringRecord, column: usize) -> Option<i64> {
        let raw = self.cell(row, column)?;
        raw.parse::<i64>().ok().or_else(|| {
            // integral floats such as "2019.0"
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && v.fract() == 0.0)
                .map(|v| v as i64)
        })
    }

    fn parse(&self, row: &StringRecord) -> Option<TradeRecord> {
        let year = i32::try_from(self.integer(row, 0)?).ok()?;
        Some(TradeRecord {
            year,
            reporter_iso3: self.text(row, 1)?,
            partner_iso3: self.text(row, 2)?,
            product_code: self.text(row, 3)?,
            distance_km: self.number(row, 4),
            fta_active: self.integer(row, 5)?,
            adval_tariff_pct: self.number(row, 6),
            reporter_gdp_bln: self.number(row, 7),
            partner_gdp_bln: self.number(row, 8),
            reporter_pop_m: self.number(row, 9),
            partner_pop_m: self.number(row, 10),
            reporter_cpi: self.number(row, 11),
            partner_cpi: self.number(row, 12),
            export_value_usd_mln: self.number(row, 13)?,
            quantity_tonnes: self.number(row, 14),
            unit_price_usd_per_tonne: self.number(row, 15),
        })
    }
}
