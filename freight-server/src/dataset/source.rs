//! Tabular sources and typed row access.
//!
//! The store only needs header names and row iteration from a source, so
//! anything tabular can back it. `CsvSource` is the implementation used by
//! the server.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::DomainError;

use super::LoadError;

/// A source of header-labelled text rows.
pub trait TabularSource {
    /// Name used in error messages (usually the file path).
    fn name(&self) -> &str;

    /// The header row.
    fn headers(&mut self) -> Result<Vec<String>, LoadError>;

    /// The next data row, or `None` at end of input.
    fn next_record(&mut self) -> Result<Option<Vec<String>>, LoadError>;
}

/// CSV-backed tabular source.
pub struct CsvSource {
    name: String,
    reader: csv::Reader<Box<dyn Read + Send>>,
    record: csv::StringRecord,
}

impl CsvSource {
    /// Open a CSV file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| LoadError::unreadable(&name, e))?;
        Ok(Self::from_reader(name, file))
    }

    /// Read CSV from any reader.
    pub fn from_reader<R: Read + Send + 'static>(name: impl Into<String>, reader: R) -> Self {
        let boxed: Box<dyn Read + Send> = Box::new(reader);
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(boxed);

        Self {
            name: name.into(),
            reader,
            record: csv::StringRecord::new(),
        }
    }
}

impl TabularSource for CsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn headers(&mut self) -> Result<Vec<String>, LoadError> {
        match self.reader.headers() {
            Ok(headers) => Ok(headers.iter().map(str::to_string).collect()),
            Err(e) => Err(LoadError::unreadable(&self.name, e)),
        }
    }

    fn next_record(&mut self) -> Result<Option<Vec<String>>, LoadError> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => Ok(Some(self.record.iter().map(str::to_string).collect())),
            Ok(false) => Ok(None),
            Err(e) => Err(LoadError::unreadable(&self.name, e)),
        }
    }
}

/// Header name to cell position.
struct Columns(HashMap<String, usize>);

impl Columns {
    fn from_headers(headers: &[String]) -> Self {
        let mut map = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            // First occurrence wins
            map.entry(header.trim().to_string()).or_insert(idx);
        }
        Columns(map)
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.0.get(column).copied()
    }
}

/// A data row with access by column name.
pub struct Row<'a> {
    name: &'a str,
    number: usize,
    columns: &'a Columns,
    cells: &'a [String],
}

impl Row<'_> {
    /// 1-based row number in the source; the header is row 1.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Raw text of a cell. Missing trailing cells read as empty.
    pub fn text(&self, column: &str) -> &str {
        self.columns
            .position(column)
            .and_then(|idx| self.cells.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Parse a cell, attaching row and column context on failure.
    pub fn parse_with<T>(
        &self,
        column: &'static str,
        parse: impl FnOnce(&str) -> Result<T, DomainError>,
    ) -> Result<T, LoadError> {
        parse(self.text(column)).map_err(|error| LoadError::InvalidCell {
            name: self.name.to_string(),
            row: self.number,
            column,
            error,
        })
    }
}

/// Read every row of a source after checking the required columns exist.
///
/// `parse` is called once per data row; the first error aborts the read.
pub fn read_rows<S, T, F>(
    source: &mut S,
    required: &[&'static str],
    mut parse: F,
) -> Result<Vec<T>, LoadError>
where
    S: TabularSource + ?Sized,
    F: FnMut(&Row<'_>) -> Result<T, LoadError>,
{
    let headers = source.headers()?;
    let columns = Columns::from_headers(&headers);
    let name = source.name().to_string();

    for &column in required {
        if columns.position(column).is_none() {
            return Err(LoadError::MissingColumn { name, column });
        }
    }

    let mut rows = Vec::new();
    let mut number = 1;
    while let Some(cells) = source.next_record()? {
        number += 1;
        let row = Row {
            name: &name,
            number,
            columns: &columns,
            cells: &cells,
        };
        rows.push(parse(&row)?);
    }

    Ok(rows)
}
