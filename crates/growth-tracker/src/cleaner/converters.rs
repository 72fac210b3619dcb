//! Type conversion functions for data cleaning.
//!
//! Both converters are total: a value that cannot be converted becomes null
//! (dates) or zero (numbers) and is counted, never reported as an error.

use crate::error::Result;
use crate::types::ColumnKind;
use crate::utils::{date_to_epoch_days, parse_date_value, parse_numeric_value};
use polars::prelude::*;

/// View any series as strings so the converters accept typed input too.
fn as_string_series(series: &Series) -> Result<Series> {
    if series.dtype() == &DataType::String {
        Ok(series.clone())
    } else {
        Ok(series.cast(&DataType::String)?)
    }
}

/// Convert a series to `Date`.
///
/// Returns the converted series and the number of present values that could
/// not be parsed (those are now null).
pub(crate) fn string_to_date(series: &Series) -> Result<(Series, usize)> {
    if series.dtype() == &DataType::Date {
        return Ok((series.clone(), 0));
    }

    let str_series = as_string_series(series)?;
    let mut days: Vec<Option<i32>> = Vec::with_capacity(str_series.len());
    let mut unparsed = 0;

    for opt_val in str_series.str()?.into_iter() {
        match opt_val {
            Some(val) => match parse_date_value(val) {
                Some(date) => days.push(Some(date_to_epoch_days(date))),
                None => {
                    unparsed += 1;
                    days.push(None);
                }
            },
            None => days.push(None),
        }
    }

    let converted = Series::new(series.name().clone(), days).cast(&DataType::Date)?;
    Ok((converted, unparsed))
}

/// Convert a series to `Int64` or `Float64` depending on `kind`.
///
/// Nulls and values that do not parse become zero. Integer targets truncate
/// toward zero. Returns the converted series and how many values were
/// replaced by zero.
pub(crate) fn string_to_numeric(series: &Series, kind: ColumnKind) -> Result<(Series, usize)> {
    let str_series = as_string_series(series)?;
    let mut coerced = 0;

    let parsed: Vec<f64> = str_series
        .str()?
        .into_iter()
        .map(|opt_val| match opt_val.and_then(parse_numeric_value) {
            Some(value) => value,
            None => {
                coerced += 1;
                0.0
            }
        })
        .collect();

    let converted = match kind {
        ColumnKind::Integer => {
            let ints: Vec<i64> = parsed.into_iter().map(|v| v.trunc() as i64).collect();
            Series::new(series.name().clone(), ints)
        }
        _ => Series::new(series.name().clone(), parsed),
    };

    Ok((converted, coerced))
}
