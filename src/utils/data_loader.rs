//! Data loading and saving utilities

use crate::error::{DraftError, Result};
use crate::table::Table;
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Field values read as missing, in addition to empty fields
pub const DEFAULT_NULL_VALUES: [&str; 6] = ["NA", "N/A", "NaN", "nan", "null", "NULL"];

/// Delimited-file loader
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Field separator; `None` picks one from the file extension
    delimiter: Option<u8>,
    /// Rows scanned for type inference; `None` scans the whole file
    infer_schema_length: Option<usize>,
    null_values: Vec<String>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            delimiter: None,
            infer_schema_length: None,
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Set the field separator
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Limit type inference to the first `n` rows
    pub fn with_infer_schema_length(mut self, n: usize) -> Self {
        self.infer_schema_length = Some(n);
        self
    }

    /// Separator used for `path`: explicit, tab for `.tsv`, comma otherwise
    pub fn delimiter_for(&self, path: &Path) -> u8 {
        self.delimiter.unwrap_or_else(|| {
            match path.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
                _ => b',',
            }
        })
    }

    /// Load a delimited file with a header row into a polars frame
    pub fn load_frame(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| DraftError::io(path, e))?;
        let separator = self.delimiter_for(path);
        check_field_counts(&bytes, separator).map_err(|reason| DraftError::format(path, reason))?;

        let null_values = self.null_values.iter().map(|s| s.as_str().into()).collect();
        let parse_opts = CsvParseOptions::default()
            .with_separator(separator)
            .with_missing_is_null(true)
            .with_null_values(Some(NullValues::AllColumns(null_values)));

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
            .map_err(|e| DraftError::format(path, e.to_string()))?;

        if df.width() == 0 {
            return Err(DraftError::format(path, "no header row"));
        }
        Ok(df)
    }

    /// Load a delimited file into a [`Table`]
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<Table> {
        let path = path.as_ref();
        let df = self.load_frame(path)?;
        let table = Table::from_frame(&df).map_err(|e| DraftError::format(path, e.to_string()))?;
        debug!(
            path = %path.display(),
            rows = table.n_rows(),
            columns = table.n_cols(),
            "Loaded dataset"
        );
        Ok(table)
    }
}

/// Check that every record has as many fields as the header.
///
/// The CSV reader pads short rows with nulls, which the row filter would then
/// drop without a trace. Quoted separators and line breaks are not counted;
/// blank lines are skipped.
fn check_field_counts(bytes: &[u8], separator: u8) -> std::result::Result<(), String> {
    let mut expected: Option<usize> = None;
    let mut row = 0;
    let mut fields = 1;
    let mut in_quotes = false;
    let mut has_content = false;

    let mut end_record = |fields: usize| -> std::result::Result<(), String> {
        match expected {
            None => expected = Some(fields),
            Some(n) => {
                row += 1;
                if fields != n {
                    return Err(format!("row {} has {} fields, expected {}", row, fields, n));
                }
            }
        }
        Ok(())
    };

    for &b in bytes {
        match b {
            b'"' => {
                in_quotes = !in_quotes;
                has_content = true;
            }
            b'\n' if !in_quotes => {
                if has_content {
                    end_record(fields)?;
                }
                fields = 1;
                has_content = false;
            }
            b'\r' if !in_quotes => {}
            b if b == separator && !in_quotes => {
                fields += 1;
                has_content = true;
            }
            _ => has_content = true,
        }
    }
    if has_content {
        end_record(fields)?;
    }
    Ok(())
}

/// Save tables to delimited files
pub struct DataSaver;

impl DataSaver {
    /// Write `table` with a header row and no index column
    pub fn save_csv(table: &Table, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path).map_err(|e| DraftError::io(path, e))?;
        Self::write_csv(table, &mut file).map_err(|e| match e {
            DraftError::DataError(reason) => DraftError::io(path, std::io::Error::other(reason)),
            other => other,
        })
    }

    fn write_csv(table: &Table, file: &mut File) -> Result<()> {
        let mut df = table.to_frame()?;
        CsvWriter::new(file)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut df)?;
        Ok(())
    }
}

/// Writes a set of named tables into one directory as a unit.
///
/// Every table is first written to a temporary file next to its destination;
/// the temporaries are renamed into place only once all of them were written.
/// If a rename fails, files already renamed are removed again.
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    dir: PathBuf,
}

impl DatasetWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write each `(file name, table)` pair, returning the final paths
    pub fn commit(&self, outputs: &[(&str, &Table)]) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir).map_err(|e| DraftError::io(&self.dir, e))?;

        let mut staged = Vec::with_capacity(outputs.len());
        for (name, table) in outputs {
            let dest = self.dir.join(name);
            let mut tmp = tempfile::Builder::new()
                .prefix(".staged-")
                .suffix(".tmp")
                .tempfile_in(&self.dir)
                .map_err(|e| DraftError::io(&dest, e))?;
            DataSaver::write_csv(table, tmp.as_file_mut()).map_err(|e| match e {
                DraftError::DataError(reason) => {
                    DraftError::io(&dest, std::io::Error::other(reason))
                }
                other => other,
            })?;
            staged.push((tmp, dest));
        }

        let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
        for (tmp, dest) in staged {
            match tmp.persist(&dest) {
                Ok(_) => written.push(dest),
                Err(err) => {
                    for path in &written {
                        if let Err(e) = fs::remove_file(path) {
                            warn!(
                                path = %path.display(),
                                error = %e,
                                "Failed to roll back output file"
                            );
                        }
                    }
                    return Err(DraftError::io(&dest, err.error));
                }
            }
        }

        Ok(written)
    }
}
