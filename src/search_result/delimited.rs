use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::StringRecord;

use super::ConversionError;

/// Tab-separated engine export with its header resolved
pub(crate) struct DelimitedFile {
    path: PathBuf,
    headers: Vec<String>,
    case_insensitive: bool,
    reader: csv::Reader<Box<dyn BufRead>>,
}

/// A resolved column: header name and position
#[derive(Debug, Clone, Copy)]
pub(crate) struct Column {
    pub name: &'static str,
    pub index: usize,
}

impl DelimitedFile {
    /// Open a tab-separated file, skipping `skip_lines` lines before the header
    pub fn open(path: &Path, skip_lines: usize) -> Result<Self, ConversionError> {
        let mut reader: Box<dyn BufRead> = Box::new(BufReader::new(File::open(path)?));
        let mut discarded = String::new();
        for _ in 0..skip_lines {
            discarded.clear();
            reader.read_line(&mut discarded)?;
        }

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            case_insensitive: false,
            reader: csv_reader,
        })
    }

    /// Match column names ignoring case
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Position of a column, if present
    pub fn optional(&self, name: &'static str) -> Option<Column> {
        self.headers
            .iter()
            .position(|h| {
                if self.case_insensitive {
                    h.eq_ignore_ascii_case(name)
                } else {
                    h == name
                }
            })
            .map(|index| Column { name, index })
    }

    /// Position of a column that must be present
    pub fn require(&self, name: &'static str) -> Result<Column, ConversionError> {
        self.optional(name)
            .ok_or_else(|| ConversionError::MissingColumn {
                file: self.path.clone(),
                column: name.to_string(),
            })
    }

    /// Visit every data record in file order
    pub fn for_each_record<F>(mut self, mut visit: F) -> Result<(), ConversionError>
    where
        F: FnMut(&Record<'_>) -> Result<(), ConversionError>,
    {
        let mut record = StringRecord::new();
        while self.reader.read_record(&mut record)? {
            let line = record.position().map_or(0, |p| p.line());
            visit(&Record {
                record: &record,
                file: &self.path,
                line,
            })?;
        }
        Ok(())
    }
}

/// One data record with enough context for error messages
pub(crate) struct Record<'a> {
    record: &'a StringRecord,
    file: &'a Path,
    line: u64,
}

impl Record<'_> {
    /// Trimmed cell content; cells beyond the record end read as empty
    pub fn str(&self, column: Column) -> &str {
        self.record.get(column.index).map_or("", str::trim)
    }

    /// Cell content of an optional column, `None` when absent or empty
    pub fn opt_str(&self, column: Option<Column>) -> Option<&str> {
        column.map(|c| self.str(c)).filter(|s| !s.is_empty())
    }

    pub fn invalid(&self, column: &str, value: &str) -> ConversionError {
        ConversionError::InvalidValue {
            file: self.file.to_path_buf(),
            line: self.line,
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    /// Parse a required cell
    pub fn parse<T: FromStr>(&self, column: Column) -> Result<T, ConversionError> {
        let value = self.str(column);
        value.parse().map_err(|_| self.invalid(column.name, value))
    }

    /// Parse an optional cell; absent columns and empty cells give `None`
    pub fn parse_opt<T: FromStr>(&self, column: Option<Column>) -> Result<Option<T>, ConversionError> {
        match column {
            Some(column) => match self.opt_str(Some(column)) {
                Some(value) => value
                    .parse()
                    .map(Some)
                    .map_err(|_| self.invalid(column.name, value)),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    /// Parse an integer cell that may be written as a float (`1234.0`)
    pub fn parse_integer(&self, column: Column) -> Result<i64, ConversionError> {
        let value = self.str(column);
        parse_integer(value).ok_or_else(|| self.invalid(column.name, value))
    }
}

/// Integer from text, accepting integral floats
pub(crate) fn parse_integer(value: &str) -> Option<i64> {
    if let Ok(v) = value.parse::<i64>() {
        return Some(v);
    }
    let v = value.parse::<f64>().ok()?;
    (v.fract() == 0.0 && v.is_finite()).then_some(v as i64)
}
