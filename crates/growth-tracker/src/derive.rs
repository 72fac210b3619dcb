//! Derived columns computed from the cleaned table.

use crate::error::{Result, TrackerError};
use crate::types::{NET_SUBSCRIBERS, SUBS_GAINED, SUBS_LOST};
use polars::prelude::*;
use tracing::debug;

/// Append `net_subscribers = subs_gained - subs_lost`.
///
/// Replaces an existing `net_subscribers` column. Both inputs must already be
/// numeric; nulls (which cleaning rules out) propagate as null.
pub fn add_net_subscribers(df: DataFrame) -> Result<DataFrame> {
    for name in [SUBS_GAINED, SUBS_LOST] {
        if df.column(name).is_err() {
            return Err(TrackerError::ColumnNotFound(name.to_string()));
        }
    }

    let df = df
        .lazy()
        .with_column(
            (col(SUBS_GAINED).cast(DataType::Int64) - col(SUBS_LOST).cast(DataType::Int64))
                .alias(NET_SUBSCRIBERS),
        )
        .collect()?;

    debug!("Derived '{}' for {} rows", NET_SUBSCRIBERS, df.height());
    Ok(df)
}
