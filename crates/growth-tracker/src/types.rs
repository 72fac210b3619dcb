//! Core types shared across the tracker: the column schema of a video
//! metrics table and the records produced by the reporting stage.

use serde::{Deserialize, Serialize};

/// How a column is treated by the cleaner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Free text, filled with a sentinel when missing.
    Text,
    /// Calendar date, nulled when unparseable.
    Date,
    /// Whole numbers, coerced to zero when invalid.
    Integer,
    /// Real numbers, coerced to zero when invalid.
    Float,
}

/// One column of the video metrics schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Header as it appears in the input spreadsheet.
    pub header: &'static str,
    /// Header after normalization.
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Value substituted for missing cells; `None` leaves nulls alone.
    pub fill: Option<&'static str>,
}

impl ColumnSpec {
    const fn new(
        header: &'static str,
        name: &'static str,
        kind: ColumnKind,
        fill: Option<&'static str>,
    ) -> Self {
        Self {
            header,
            name,
            kind,
            fill,
        }
    }

    /// Whether the column is coerced to a number during cleaning.
    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, ColumnKind::Integer | ColumnKind::Float)
    }
}

pub const VIDEO_ID: &str = "video_id";
pub const TITLE: &str = "title";
pub const CATEGORY: &str = "category";
pub const UPLOAD_DATE: &str = "upload_date";
pub const VIEWS: &str = "views";
pub const LIKES: &str = "likes";
pub const CTR: &str = "ctr_%";
pub const WATCH_TIME: &str = "watch_time_(min)";
pub const SUBS_GAINED: &str = "subs_gained";
pub const SUBS_LOST: &str = "subs_lost";
pub const NET_SUBSCRIBERS: &str = "net_subscribers";

/// Header of the date column in the raw input.
pub const UPLOAD_DATE_HEADER: &str = "Upload Date";

/// The input schema in spreadsheet order.
pub const SCHEMA: [ColumnSpec; 10] = [
    ColumnSpec::new("Video ID", VIDEO_ID, ColumnKind::Text, Some("Unknown")),
    ColumnSpec::new("Title", TITLE, ColumnKind::Text, Some("Untitled")),
    ColumnSpec::new("Category", CATEGORY, ColumnKind::Text, Some("Unknown")),
    ColumnSpec::new(UPLOAD_DATE_HEADER, UPLOAD_DATE, ColumnKind::Date, None),
    ColumnSpec::new("Views", VIEWS, ColumnKind::Integer, Some("0")),
    ColumnSpec::new("Likes", LIKES, ColumnKind::Integer, Some("0")),
    ColumnSpec::new("CTR %", CTR, ColumnKind::Float, Some("0")),
    ColumnSpec::new("Watch Time (min)", WATCH_TIME, ColumnKind::Float, Some("0")),
    ColumnSpec::new("Subs Gained", SUBS_GAINED, ColumnKind::Integer, Some("0")),
    ColumnSpec::new("Subs Lost", SUBS_LOST, ColumnKind::Integer, Some("0")),
];

/// Columns that must never be null once cleaning has finished.
pub fn required_columns() -> impl Iterator<Item = &'static ColumnSpec> {
    SCHEMA.iter().filter(|spec| spec.fill.is_some())
}

/// Columns coerced to numbers, by normalized name.
pub fn numeric_columns() -> impl Iterator<Item = &'static ColumnSpec> {
    SCHEMA.iter().filter(|spec| spec.is_numeric())
}

/// Look up a column by its normalized name.
pub fn column_by_name(name: &str) -> Option<&'static ColumnSpec> {
    SCHEMA.iter().find(|spec| spec.name == name)
}

/// Missing cells in one column of the raw input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

/// Row count of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Mean views of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMean {
    pub category: String,
    pub mean_views: f64,
}

/// One line of the net subscriber ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedVideo {
    /// Position of the row in the cleaned table.
    pub row: usize,
    pub title: String,
    pub net_subscribers: i64,
}
