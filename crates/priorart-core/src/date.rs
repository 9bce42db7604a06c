//! Archive date formatting.

use chrono::NaiveDate;

/// Format an 8-digit `YYYYMMDD` archive date as `MM/DD/YYYY`.
///
/// Anything that is not exactly 8 characters, or is not a valid calendar
/// date, passes through unchanged; malformed dates degrade to their raw
/// form rather than aborting reconstruction.
#[must_use]
pub fn format_archive_date(raw: &str) -> String {
    if raw.len() != 8 {
        return raw.to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y%m%d") {
        Ok(date) => date.format("%m/%d/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_eight_digit_dates() {
        assert_eq!(format_archive_date("20160526"), "05/26/2016");
        assert_eq!(format_archive_date("19991231"), "12/31/1999");
    }

    #[test]
    fn wrong_length_passes_through() {
        assert_eq!(format_archive_date(""), "");
        assert_eq!(format_archive_date("2016"), "2016");
        assert_eq!(format_archive_date("201605260"), "201605260");
    }

    #[test]
    fn invalid_calendar_date_passes_through() {
        assert_eq!(format_archive_date("20161332"), "20161332");
        assert_eq!(format_archive_date("2016ABCD"), "2016ABCD");
    }
}
