//! Loading a metrics spreadsheet into a polars `DataFrame`.
//!
//! Every loaded column is `String`, with nulls for empty cells. Typing is
//! left to the cleaner so that Excel and CSV input go through exactly the
//! same normalization.

use crate::error::{Result, ResultExt, TrackerError};
use crate::types::MissingCount;
use crate::utils::{excel_serial_to_date, format_float_cell};
use calamine::{Data, Reader, open_workbook_auto};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Spreadsheet formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Anything calamine can open (xlsx, xlsm, xlsb, xls, ods).
    Workbook,
    Csv,
}

impl InputFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            "csv" => Ok(Self::Csv),
            _ => Err(TrackerError::UnsupportedFormat {
                path: path.display().to_string(),
                extension,
            }),
        }
    }
}

/// Reads metric spreadsheets from disk.
pub struct TableLoader;

impl TableLoader {
    /// Load the table at `path`, keeping the original headers.
    ///
    /// Fails if the file is missing, unreadable, or of an unknown type.
    pub fn load(path: &Path) -> Result<DataFrame> {
        let format = InputFormat::from_path(path)?;
        info!("Loading dataset from: {}", path.display());

        let df = match format {
            InputFormat::Workbook => Self::load_workbook(path),
            InputFormat::Csv => Self::load_csv(path),
        }
        .context(format!("Failed to load {}", path.display()))?;

        info!("Dataset loaded successfully: {:?}", df.shape());
        Ok(df)
    }

    /// Read the first worksheet; its first row is the header.
    fn load_workbook(path: &Path) -> Result<DataFrame> {
        let mut workbook = open_workbook_auto(path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| TrackerError::EmptyWorkbook(path.display().to_string()))?;
        debug!("Reading worksheet '{}'", sheet_name);

        let range = workbook.worksheet_range(&sheet_name)?;
        let mut rows = range.rows();

        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| cell_to_string(cell).unwrap_or_default())
                .collect(),
            None => Vec::new(),
        };

        let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for row in rows {
            for (idx, column) in columns.iter_mut().enumerate() {
                column.push(row.get(idx).and_then(cell_to_string));
            }
        }

        let series: Vec<Column> = unique_headers(&headers)
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Series::new(name.into(), values).into_column())
            .collect();

        Ok(DataFrame::new(series)?)
    }

    /// Read a CSV file with every column as `String`.
    fn load_csv(path: &Path) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        empty_strings_to_null(df)
    }
}

/// Null counts per column, in column order.
pub fn missing_value_counts(df: &DataFrame) -> Vec<MissingCount> {
    df.get_columns()
        .iter()
        .map(|col| MissingCount {
            column: col.name().to_string(),
            missing: col.null_count(),
        })
        .collect()
}

/// Convert one spreadsheet cell to its textual form; blanks become `None`.
fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_float_cell(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            excel_serial_to_date(serial).map(|date| {
                let seconds = ((serial.fract() * 86_400.0).round() as u32).min(86_399);
                if seconds == 0 {
                    date.format("%Y-%m-%d").to_string()
                } else {
                    format!(
                        "{} {:02}:{:02}:{:02}",
                        date.format("%Y-%m-%d"),
                        seconds / 3600,
                        (seconds % 3600) / 60,
                        seconds % 60
                    )
                }
            })
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Make headers non-empty and distinct: blanks become `column_<n>`,
/// repeats get a `_<k>` suffix.
fn unique_headers(headers: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let base = if header.trim().is_empty() {
                format!("column_{}", idx + 1)
            } else {
                header.clone()
            };
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                base
            } else {
                format!("{}_{}", base, *count - 1)
            }
        })
        .collect()
}

/// Treat empty or whitespace-only strings as missing.
fn empty_strings_to_null(mut df: DataFrame) -> Result<DataFrame> {
    let column_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    for col_name in &column_names {
        let series = df.column(col_name)?.as_materialized_series().clone();
        if series.dtype() != &DataType::String {
            continue;
        }
        let cleaned: Vec<Option<String>> = series
            .str()?
            .into_iter()
            .map(|opt| opt.filter(|s| !s.trim().is_empty()).map(|s| s.to_string()))
            .collect();
        df.replace(col_name, Series::new(col_name.as_str().into(), cleaned))?;
    }

    Ok(df)
}
