//! Time ranges and timestamp formatting for `BETWEEN` predicates.

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::{datetime, format_description};

use crate::{Error, Result};

/// Instant used for the bounds of a zero [`TimeRange`].
pub const ZERO_INSTANT: OffsetDateTime = datetime!(0001-01-01 0:00 UTC);

const UTC_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

const OFFSET_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
);

/// A time with a beginning and an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub from: OffsetDateTime,
    pub to: OffsetDateTime,
}

impl TimeRange {
    pub fn new(from: OffsetDateTime, to: OffsetDateTime) -> Self {
        Self { from, to }
    }

    /// Whether both bounds are unset.
    pub fn is_zero(&self) -> bool {
        self.from == ZERO_INSTANT && self.to == ZERO_INSTANT
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::new(ZERO_INSTANT, ZERO_INSTANT)
    }
}

/// Format an instant for a query parameter.
///
/// `format` is a `time` format description such as `[year]-[month]-[day]`.
/// Without one the instant is written as `2020-01-03T00:00:00Z`, keeping a
/// non-UTC offset as `+hh:mm` and dropping fractional seconds. `field` is only
/// used to label errors.
pub fn format_instant(instant: &OffsetDateTime, format: Option<&str>, field: &str) -> Result<String> {
    let formatted = match format {
        Some(format) => {
            let items = time::format_description::parse(format)
                .map_err(|e| Error::invalid_time_format(field, e))?;
            instant.format(&items)
        }
        None if instant.offset().is_utc() => instant.format(UTC_FORMAT),
        None => instant.format(OFFSET_FORMAT),
    };
    formatted.map_err(|e| Error::invalid_time_format(field, e))
}
