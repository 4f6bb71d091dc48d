//! Flat CSV tables
//!
//! The caller's column list is authoritative: the header is exactly those
//! columns (minus denylisted provider-internal fields) plus `artist_name`.
//! Fields outside the list are dropped; listed fields missing from a record
//! render as empty cells.

use crate::models::{default_denylist, FieldMap, FieldValue, ARTIST_NAME_COLUMN};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Table read/write errors
#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Where the `artist_name` column goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtistColumn {
    Leading,
    #[default]
    Trailing,
}

/// Records to write
#[derive(Debug, Clone, Copy)]
pub enum TableRecords<'a> {
    /// Artist name → fields; the key becomes the `artist_name` cell
    Keyed(&'a [(String, FieldMap)]),
    /// Rows that carry their own `artist_name` field
    Flat(&'a [FieldMap]),
}

impl TableRecords<'_> {
    pub fn len(&self) -> usize {
        match self {
            TableRecords::Keyed(records) => records.len(),
            TableRecords::Flat(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// CSV writer with a fixed column layout
#[derive(Debug, Clone)]
pub struct TableWriter {
    columns: Vec<String>,
    artist_column: ArtistColumn,
}

impl TableWriter {
    /// Writer for `columns`, excluding the default provider-internal denylist
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_denylist(columns, &default_denylist())
    }

    /// Writer for `columns`, excluding `denylist`
    pub fn with_denylist<I, S>(columns: I, denylist: &[String]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept: Vec<String> = Vec::new();
        for column in columns {
            let column = column.as_ref();
            if column == ARTIST_NAME_COLUMN
                || denylist.iter().any(|d| d == column)
                || kept.iter().any(|k| k == column)
            {
                continue;
            }
            kept.push(column.to_string());
        }

        Self {
            columns: kept,
            artist_column: ArtistColumn::default(),
        }
    }

    pub fn artist_column(mut self, position: ArtistColumn) -> Self {
        self.artist_column = position;
        self
    }

    /// Header row
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.columns.len() + 1);
        if self.artist_column == ArtistColumn::Leading {
            header.push(ARTIST_NAME_COLUMN.to_string());
        }
        header.extend(self.columns.iter().cloned());
        if self.artist_column == ArtistColumn::Trailing {
            header.push(ARTIST_NAME_COLUMN.to_string());
        }
        header
    }

    /// Write the table to `path`, replacing any existing file
    ///
    /// Returns the number of data rows written.
    pub fn write(&self, records: TableRecords<'_>, path: &Path) -> Result<usize, TableError> {
        if records.is_empty() {
            tracing::debug!(path = %path.display(), "No records, writing header only");
        }

        let file = std::fs::File::create(path)?;
        let rows = self.write_to(records, file)?;

        tracing::info!(path = %path.display(), rows, "Wrote table");
        Ok(rows)
    }

    /// Write the table to any writer
    pub fn write_to<W: Write>(&self, records: TableRecords<'_>, writer: W) -> Result<usize, TableError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        csv_writer.write_record(self.header())?;

        match records {
            TableRecords::Keyed(entries) => {
                for (artist_name, fields) in entries {
                    csv_writer.write_record(self.row(artist_name, fields))?;
                }
            }
            TableRecords::Flat(rows) => {
                for fields in rows {
                    let artist_name = fields
                        .get(ARTIST_NAME_COLUMN)
                        .map(FieldValue::to_string)
                        .unwrap_or_default();
                    csv_writer.write_record(self.row(&artist_name, fields))?;
                }
            }
        }

        csv_writer.flush()?;
        Ok(records.len())
    }

    fn row(&self, artist_name: &str, fields: &FieldMap) -> Vec<String> {
        let mut cells = Vec::with_capacity(self.columns.len() + 1);
        if self.artist_column == ArtistColumn::Leading {
            cells.push(artist_name.to_string());
        }
        for column in &self.columns {
            cells.push(fields.get(column).map(FieldValue::to_string).unwrap_or_default());
        }
        if self.artist_column == ArtistColumn::Trailing {
            cells.push(artist_name.to_string());
        }
        cells
    }
}

/// Write artist-keyed records with the default layout
pub fn write_table(
    records: &[(String, FieldMap)],
    path: &Path,
    columns: &[&str],
) -> Result<usize, TableError> {
    TableWriter::new(columns.iter().copied()).write(TableRecords::Keyed(records), path)
}

/// Read a table written by [`TableWriter`] back into rows
///
/// Cells parse as integer, then float, then text; empty cells are omitted.
pub fn read_table(path: &Path) -> Result<Vec<FieldMap>, TableError> {
    let mut reader = csv::ReaderBuilder::new().from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: FieldMap = headers
            .iter()
            .zip(record.iter())
            .filter_map(|(name, cell)| FieldValue::parse_cell(cell).map(|v| (name, v)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}
