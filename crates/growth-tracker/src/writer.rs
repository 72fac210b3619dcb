//! Persisting the cleaned table.
//!
//! The output extension picks the format: `.xlsx` through `rust_xlsxwriter`,
//! `.csv` through the polars CSV writer.

use crate::error::{Result, ResultExt, TrackerError};
use crate::utils::{collect_f64, collect_strings, epoch_days_to_date, is_numeric_dtype};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

/// Output formats the writer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            _ => Err(TrackerError::UnsupportedFormat {
                path: path.display().to_string(),
                extension,
            }),
        }
    }
}

/// Writes the cleaned table to disk.
pub struct TableWriter;

impl TableWriter {
    /// Write `df` to `path` with a header row and no index column,
    /// replacing any existing file and creating parent directories.
    pub fn write(df: &DataFrame, path: &Path) -> Result<()> {
        let format = OutputFormat::from_path(path)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        match format {
            OutputFormat::Xlsx => Self::write_xlsx(df, path),
            OutputFormat::Csv => Self::write_csv(df, path),
        }
        .context(format!("Failed to write {}", path.display()))?;

        info!("Cleaned data saved: {}", path.display());
        Ok(())
    }

    fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        let mut df = df.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)?;
        Ok(())
    }

    fn write_xlsx(df: &DataFrame, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Sheet1")?;

        let header_format = Format::new().set_bold();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        for (idx, column) in df.get_columns().iter().enumerate() {
            let col = u16::try_from(idx).map_err(|_| {
                TrackerError::Internal(format!("Too many columns for a worksheet: {}", idx + 1))
            })?;
            worksheet.write_string_with_format(0, col, column.name().as_str(), &header_format)?;
            write_column(worksheet, col, column.as_materialized_series(), &date_format)?;
        }

        workbook.save(path)?;
        Ok(())
    }
}

/// Write one column's cells below the header; nulls stay blank.
fn write_column(
    worksheet: &mut Worksheet,
    col: u16,
    series: &Series,
    date_format: &Format,
) -> Result<()> {
    let dtype = series.dtype();

    if dtype == &DataType::Date {
        let days = series.cast(&DataType::Int32)?;
        for (row, value) in days.i32()?.into_iter().enumerate() {
            let Some(date) = value.and_then(epoch_days_to_date) else {
                continue;
            };
            let row = cell_row(row)?;
            match excel_date(date) {
                Some(datetime) => {
                    worksheet.write_datetime_with_format(row, col, &datetime, date_format)?;
                }
                // Excel only holds 1900-9999; keep other dates as ISO text.
                None => {
                    worksheet.write_string(row, col, date.format("%Y-%m-%d").to_string())?;
                }
            }
        }
    } else if is_numeric_dtype(dtype) {
        for (row, value) in collect_f64(series)?.into_iter().enumerate() {
            if let Some(value) = value {
                worksheet.write_number(cell_row(row)?, col, value)?;
            }
        }
    } else {
        let strings = series.cast(&DataType::String)?;
        for (row, value) in collect_strings(&strings)?.into_iter().enumerate() {
            if let Some(value) = value {
                worksheet.write_string(cell_row(row)?, col, value)?;
            }
        }
    }

    Ok(())
}

/// Excel date for `date`, `None` outside the range Excel can store.
fn excel_date(date: NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(date.year()).ok()?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok()
}

/// Worksheet row of the `idx`-th data row; row 0 is the header.
fn cell_row(idx: usize) -> Result<u32> {
    u32::try_from(idx + 1)
        .map_err(|_| TrackerError::Internal(format!("Row {} exceeds worksheet limits", idx)))
}
