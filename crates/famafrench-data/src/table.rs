//! Raw and cleaned factor tables.
//!
//! [`RawTable::parse`] turns the published text into tagged rows without ever
//! failing on an individual field. [`RawTable::clean`] keeps only complete
//! rows and produces a [`CleanTable`], the form that is cached and analysed.

use crate::coerce::{Coerced, coerce_factor, coerce_period};
use crate::error::{DataError, Result, TableError};
use crate::factor::{Factor, FactorRow, PeriodKey};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Non-blank lines preceding the column header in the source text.
pub const PREAMBLE_LINES: usize = 2;

/// Fields per line: the period key plus one per factor.
pub const FIELDS_PER_ROW: usize = 1 + Factor::ALL.len();

/// Header of the first column in a cache artifact.
pub const PERIOD_COLUMN: &str = "period";

/// One source line after field coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// Period key
    pub key: Coerced<i64>,
    /// Factor values in [`Factor::ALL`] order
    pub values: [Coerced<f64>; 4],
}

impl RawRow {
    /// Coerce the fields of one line. Absent trailing fields are missing.
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        let mut fields = fields.into_iter();
        let key = fields.next().map_or(Coerced::Missing, coerce_period);
        let values = std::array::from_fn(|_| fields.next().map_or(Coerced::Missing, coerce_factor));
        Self { key, values }
    }

    /// Whether the key and every value parsed.
    pub fn is_complete(&self) -> bool {
        !self.key.is_missing() && self.values.iter().all(|v| !v.is_missing())
    }

    /// The typed row, if complete.
    pub fn to_factor_row(&self) -> Option<FactorRow> {
        let key = self.key.value()?;
        let mut values = [0.0; 4];
        for (slot, value) in values.iter_mut().zip(self.values) {
            *slot = value.value()?;
        }
        Some(FactorRow::new(PeriodKey::new(key), values))
    }
}

impl From<&FactorRow> for RawRow {
    fn from(row: &FactorRow) -> Self {
        Self {
            key: Coerced::Value(row.period.get()),
            values: row.values().map(Coerced::Value),
        }
    }
}

/// Source rows in file order, before cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    rows: Vec<RawRow>,
}

impl RawTable {
    /// Create a table from already coerced rows.
    pub const fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    /// Parse the published delimited text.
    ///
    /// Blank lines are ignored. The first [`PREAMBLE_LINES`] non-blank lines
    /// are skipped and the next one must be the column header. Every later
    /// line becomes a [`RawRow`], however malformed its fields are.
    ///
    /// # Errors
    /// Returns [`DataError::Load`] when the header is absent or names
    /// unexpected columns, or when a line has more than [`FIELDS_PER_ROW`]
    /// fields.
    pub fn parse(payload: &str, resource: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(payload.as_bytes());

        let mut records = reader
            .records()
            .filter(|r| r.as_ref().map_or(true, |rec| !is_blank(rec)));

        for _ in 0..PREAMBLE_LINES {
            if records.next().transpose().map_err(|e| DataError::load(resource, e))?.is_none() {
                return Err(DataError::load(resource, "payload ends before the column header"));
            }
        }

        let header = records
            .next()
            .transpose()
            .map_err(|e| DataError::load(resource, e))?
            .ok_or_else(|| DataError::load(resource, "payload has no column header"))?;
        check_header(&header, resource)?;

        let mut rows = Vec::new();
        for record in records {
            let record = record.map_err(|e| DataError::load(resource, e))?;
            if record.len() > FIELDS_PER_ROW {
                let line = record.position().map_or(0, |p| p.line());
                return Err(DataError::load(
                    resource,
                    format!("line {line} has {} fields, expected {FIELDS_PER_ROW}", record.len()),
                ));
            }
            rows.push(RawRow::from_fields(record.iter()));
        }

        debug!(resource, rows = rows.len(), "parsed raw factor table");
        Ok(Self { rows })
    }

    /// Rows in source order.
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop every row with a missing key or value.
    ///
    /// # Errors
    /// Returns [`TableError`] when no row survives or a key repeats.
    pub fn clean(&self) -> std::result::Result<CleanTable, TableError> {
        let rows: Vec<FactorRow> = self.rows.iter().filter_map(RawRow::to_factor_row).collect();
        let dropped = self.rows.len() - rows.len();
        debug!(kept = rows.len(), dropped, "cleaned factor table");
        CleanTable::from_rows(rows)
    }
}

impl From<&CleanTable> for RawTable {
    fn from(table: &CleanTable) -> Self {
        Self::new(table.rows().iter().map(RawRow::from).collect())
    }
}

/// Complete factor rows with unique keys, sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanTable {
    rows: Vec<FactorRow>,
}

impl CleanTable {
    /// Validate and sort a set of rows.
    ///
    /// # Errors
    /// Returns [`TableError`] for an empty set, a repeated key or a
    /// non-finite value.
    pub fn from_rows(rows: Vec<FactorRow>) -> std::result::Result<Self, TableError> {
        let mut by_key = BTreeMap::new();
        for row in rows {
            if !row.is_finite() {
                return Err(TableError::NonFinite(row.period));
            }
            if by_key.insert(row.period, row).is_some() {
                return Err(TableError::DuplicateKey(row.period));
            }
        }
        if by_key.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(Self {
            rows: by_key.into_values().collect(),
        })
    }

    /// Rows sorted by period key.
    pub fn rows(&self) -> &[FactorRow] {
        &self.rows
    }

    /// Iterate over rows.
    pub fn iter(&self) -> std::slice::Iter<'_, FactorRow> {
        self.rows.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false for a validated table; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a period key.
    pub fn get(&self, key: PeriodKey) -> Option<&FactorRow> {
        self.rows
            .binary_search_by_key(&key, |r| r.period)
            .ok()
            .map(|i| &self.rows[i])
    }

    /// Read a cache artifact.
    ///
    /// Columns are taken as already numeric; no coercion is applied.
    ///
    /// # Errors
    /// Returns [`DataError::Format`] if the file cannot be read or is not a
    /// well-formed table.
    pub fn read_csv(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| DataError::format(path, e))?;
        Self::read_from(file).map_err(|reason| DataError::format(path, reason))
    }

    /// Read a table from CSV with header `period,Mkt-RF,SMB,HML,RF`.
    pub fn read_from<R: Read>(reader: R) -> std::result::Result<Self, String> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers = reader.headers().map_err(|e| e.to_string())?.clone();
        let expected: Vec<&str> = std::iter::once(PERIOD_COLUMN)
            .chain(Factor::ALL.iter().map(Factor::column))
            .collect();
        if headers.iter().collect::<Vec<_>>() != expected {
            return Err(format!("unexpected header {:?}", headers.iter().collect::<Vec<_>>()));
        }

        let rows = reader
            .deserialize::<FactorRow>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.to_string())?;
        Self::from_rows(rows).map_err(|e| e.to_string())
    }

    /// Write the table as a cache artifact.
    ///
    /// The file is written next to `path` and renamed into place, so a reader
    /// never observes a partial artifact.
    ///
    /// # Errors
    /// Returns [`DataError::Persist`] on any write failure.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let tmp_path = path.with_extension("csv.tmp");
        let result = std::fs::File::create(&tmp_path)
            .map_err(|e| e.to_string())
            .and_then(|file| self.write_to(file))
            .and_then(|()| std::fs::rename(&tmp_path, path).map_err(|e| e.to_string()));

        if let Err(reason) = result {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(DataError::persist(path, reason));
        }
        Ok(())
    }

    /// Write the table as CSV. Floats are written in shortest round-trip form.
    pub fn write_to<W: Write>(&self, writer: W) -> std::result::Result<(), String> {
        let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
        for row in &self.rows {
            writer.serialize(row).map_err(|e| e.to_string())?;
        }
        writer.flush().map_err(|e| e.to_string())
    }
}

impl<'a> IntoIterator for &'a CleanTable {
    type Item = &'a FactorRow;
    type IntoIter = std::slice::Iter<'a, FactorRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

fn check_header(header: &StringRecord, resource: &str) -> Result<()> {
    if header.len() != FIELDS_PER_ROW {
        return Err(DataError::load(
            resource,
            format!("column header has {} fields, expected {FIELDS_PER_ROW}", header.len()),
        ));
    }
    for (name, factor) in header.iter().skip(1).zip(Factor::ALL) {
        if name != factor.column() {
            return Err(DataError::load(
                resource,
                format!("unexpected column {name:?}, expected {:?}", factor.column()),
            ));
        }
    }
    Ok(())
}
