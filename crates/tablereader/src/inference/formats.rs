//! Candidate temporal formats, most common first.

use crate::parse::TemporalFormat;
use crate::schema::ColumnType;

pub const DATE_FORMATS: &[TemporalFormat] = &[
    TemporalFormat::new("%Y-%m-%d", "YYYY-MM-DD"),
    TemporalFormat::new("%Y/%m/%d", "YYYY/MM/DD"),
    TemporalFormat::new("%m/%d/%Y", "MM/DD/YYYY"),
    TemporalFormat::new("%m/%d/%y", "MM/DD/YY"),
    TemporalFormat::new("%d/%m/%Y", "DD/MM/YYYY"),
    TemporalFormat::new("%d/%m/%y", "DD/MM/YY"),
    TemporalFormat::new("%d.%m.%Y", "DD.MM.YYYY"),
    TemporalFormat::new("%d.%m.%y", "DD.MM.YY"),
    TemporalFormat::new("%b %d, %Y", "Mon DD, YYYY"),
    TemporalFormat::new("%B %d, %Y", "Month DD, YYYY"),
    TemporalFormat::new("%d %b %Y", "DD Mon YYYY"),
    TemporalFormat::new("%d %B %Y", "DD Month YYYY"),
];

pub const DATETIME_FORMATS: &[TemporalFormat] = &[
    TemporalFormat::new("%Y-%m-%d %H:%M:%S", "YYYY-MM-DD HH:MM:SS"),
    TemporalFormat::new("%Y-%m-%d %H:%M", "YYYY-MM-DD HH:MM"),
    TemporalFormat::new("%m/%d/%Y %H:%M:%S", "MM/DD/YYYY HH:MM:SS"),
    TemporalFormat::new("%m/%d/%Y %I:%M:%S %p", "MM/DD/YYYY hh:MM:SS AM/PM"),
    TemporalFormat::new("%m/%d/%Y %I:%M %p", "MM/DD/YYYY hh:MM AM/PM"),
    TemporalFormat::new("%d/%m/%Y %H:%M:%S", "DD/MM/YYYY HH:MM:SS"),
    TemporalFormat::new("%d/%m/%Y %H:%M", "DD/MM/YYYY HH:MM"),
];

pub const TIME_FORMATS: &[TemporalFormat] = &[
    TemporalFormat::new("%H:%M:%S", "HH:MM:SS"),
    TemporalFormat::new("%H:%M", "HH:MM"),
    TemporalFormat::new("%I:%M:%S %p", "hh:MM:SS AM/PM"),
    TemporalFormat::new("%I:%M %p", "hh:MM AM/PM"),
];

/// Ordered candidates for a column type; empty for non-temporal types.
pub fn candidates(column_type: ColumnType) -> &'static [TemporalFormat] {
    match column_type {
        ColumnType::Date => DATE_FORMATS,
        ColumnType::DateTime => DATETIME_FORMATS,
        ColumnType::Time => TIME_FORMATS,
        ColumnType::Number | ColumnType::Str => &[],
    }
}
