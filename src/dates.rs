//! Date parsing and calendar arithmetic shared by the write and report paths.

use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, macros::format_description};

use crate::Error;

/// Parse a calendar date in `YYYY-MM-DD` format.
///
/// # Errors
/// Returns [Error::InvalidDate] if the string has the wrong shape or names a
/// day that does not exist.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    let format = format_description!("[year]-[month]-[day]");

    Date::parse(text, &format).map_err(|_| Error::InvalidDate(text.to_string()))
}

/// Parse a timestamp in `YYYY-MM-DD HH:MM:SS` format, interpreted as UTC.
///
/// This is the format offline clients use for the `created_at` fields in sync
/// uploads.
pub fn parse_datetime(text: &str) -> Result<OffsetDateTime, Error> {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

    PrimitiveDateTime::parse(text, &format)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|_| Error::InvalidDate(text.to_string()))
}

/// The same calendar day `months` months earlier, clamping the day-of-month
/// to the target month's length (March 31 minus one month is February 28).
pub fn months_back(date: Date, months: u32) -> Date {
    let total = date.year() * 12 + i32::from(u8::from(date.month())) - 1 - months as i32;
    let year = total.div_euclid(12);
    // rem_euclid(12) + 1 is always in 1..=12.
    let month = Month::try_from((total.rem_euclid(12) + 1) as u8).unwrap();
    let day = date.day().min(month.length(year));

    Date::from_calendar_date(year, month, day).unwrap()
}

/// The first day of the month containing `date`.
pub fn start_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap()
}

/// The first day of the month after the month containing `date`.
pub fn start_of_next_month(date: Date) -> Date {
    let first = start_of_month(date);

    match first.month() {
        Month::December => Date::from_calendar_date(first.year() + 1, Month::January, 1).unwrap(),
        month => Date::from_calendar_date(first.year(), month.next(), 1).unwrap(),
    }
}

/// Midnight UTC at the start of `date`, for binding as a timestamp lower or
/// upper bound in SQL comparisons against `created_at` columns.
pub fn day_start(date: Date) -> OffsetDateTime {
    date.midnight().assume_utc()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::Error;

    use super::{months_back, parse_date, parse_datetime, start_of_month, start_of_next_month};

    #[test]
    fn parse_date_accepts_iso_calendar_dates() {
        assert_eq!(parse_date("2025-07-04"), Ok(date!(2025 - 07 - 04)));
    }

    #[test]
    fn parse_date_rejects_malformed_input() {
        for text in ["07/04/2025", "2025-13-01", "2025-02-30", "soon", ""] {
            assert_eq!(
                parse_date(text),
                Err(Error::InvalidDate(text.to_string())),
                "{text:?} should not parse"
            );
        }
    }

    #[test]
    fn parse_datetime_accepts_space_separated_timestamps() {
        let parsed = parse_datetime("2025-07-04 13:45:00").unwrap();

        assert_eq!(parsed.date(), date!(2025 - 07 - 04));
        assert_eq!(parsed.hour(), 13);
    }

    #[test]
    fn parse_datetime_rejects_bare_dates() {
        assert!(parse_datetime("2025-07-04").is_err());
    }

    #[test]
    fn months_back_walks_calendar_months() {
        assert_eq!(months_back(date!(2025 - 07 - 15), 1), date!(2025 - 06 - 15));
        assert_eq!(months_back(date!(2025 - 01 - 15), 1), date!(2024 - 12 - 15));
        assert_eq!(months_back(date!(2025 - 07 - 15), 12), date!(2024 - 07 - 15));
    }

    #[test]
    fn months_back_clamps_to_month_length() {
        assert_eq!(months_back(date!(2025 - 03 - 31), 1), date!(2025 - 02 - 28));
        assert_eq!(months_back(date!(2024 - 03 - 31), 1), date!(2024 - 02 - 29));
        assert_eq!(months_back(date!(2025 - 07 - 31), 1), date!(2025 - 06 - 30));
    }

    #[test]
    fn month_bounds() {
        assert_eq!(start_of_month(date!(2025 - 07 - 15)), date!(2025 - 07 - 01));
        assert_eq!(
            start_of_next_month(date!(2025 - 07 - 15)),
            date!(2025 - 08 - 01)
        );
        assert_eq!(
            start_of_next_month(date!(2025 - 12 - 03)),
            date!(2026 - 01 - 01)
        );
    }
}
