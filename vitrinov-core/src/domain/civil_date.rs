//! Civil dates in the America/El_Salvador calendar
//!
//! The backend keys every transaction by a plain calendar date computed in
//! El Salvador time. Dates shown to the user and sent to the API must come
//! from here, never from the device timezone, or users outside UTC-6 see
//! their sales land on the wrong day.
//!
//! El Salvador has not observed daylight saving time since 1988, so a
//! fixed UTC-6 offset is exact.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Utc};

use super::result::{Error, Result};

/// UTC offset of America/El_Salvador in seconds
pub const EL_SALVADOR_UTC_OFFSET_SECS: i32 = -6 * 3600;

/// Wire format used by every API date parameter
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

fn el_salvador() -> FixedOffset {
    FixedOffset::east_opt(EL_SALVADOR_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Calendar date of an instant in El Salvador
pub fn civil_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&el_salvador()).date_naive()
}

/// Today's date in El Salvador
pub fn civil_today() -> NaiveDate {
    civil_date(Utc::now())
}

/// `YYYY-MM-DD` for an instant, in El Salvador
pub fn to_api_date(instant: DateTime<Utc>) -> String {
    format_api_date(civil_date(instant))
}

/// `YYYY-MM-DD`
pub fn format_api_date(date: NaiveDate) -> String {
    date.format(API_DATE_FORMAT).to_string()
}

/// `DD/MM/YYYY`
pub fn to_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Parse a user or API supplied date: `YYYY-MM-DD` or `DD/MM/YYYY`
pub fn parse_api_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, API_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, DISPLAY_DATE_FORMAT))
        .ok()
}

/// Normalize a date coming from the backend.
///
/// Plain dates pass through; full timestamps are reduced to their UTC
/// calendar date (that is how the server stores charge/pickup dates).
pub fn normalize_backend_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, API_DATE_FORMAT) {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Strict `YYYY-MM-DD` parse for form fields
pub fn parse_form_date(value: &str, message: &str) -> Result<NaiveDate> {
    let value = value.trim();
    let well_formed = value.len() == 10
        && value
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    if !well_formed {
        return Err(Error::validation(message));
    }
    NaiveDate::parse_from_str(value, API_DATE_FORMAT).map_err(|_| Error::validation(message))
}

/// Section label for a transaction date key: `"3 de mayo de 2024"`.
///
/// Keys that are not `YYYY-MM-DD` are returned verbatim.
pub fn group_label(date_key: &str) -> String {
    match NaiveDate::parse_from_str(date_key, API_DATE_FORMAT) {
        Ok(date) => format!(
            "{} de {} de {}",
            date.day(),
            MONTHS[date.month0() as usize],
            date.year()
        ),
        Err(_) => date_key.to_string(),
    }
}

/// Spanish month name (lowercase), 1-based
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTHS.get(month.checked_sub(1)? as usize).copied()
}

/// Inclusive range of civil dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::validation(
                "La fecha inicial no puede ser posterior a la fecha final.",
            ));
        }
        Ok(Self { start, end })
    }

    /// Single-day range
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Today in El Salvador
    pub fn today() -> Self {
        Self::day(civil_today())
    }

    /// First of the month up to `today`
    pub fn current_month(today: NaiveDate) -> Self {
        let start = today.with_day(1).unwrap_or(today);
        Self { start, end: today }
    }

    /// Move the start; drags the end along if it would end up before it
    pub fn with_start(self, start: NaiveDate) -> Self {
        Self {
            start,
            end: self.end.max(start),
        }
    }

    /// Move the end; drags the start along if it would end up after it
    pub fn with_end(self, end: NaiveDate) -> Self {
        Self {
            start: self.start.min(end),
            end,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn start_param(&self) -> String {
        format_api_date(self.start)
    }

    pub fn end_param(&self) -> String {
        format_api_date(self.end)
    }
}
