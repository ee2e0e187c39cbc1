//! Date normalization for UK-style dates

use chrono::NaiveDate;

/// Convert `dd/mm/yyyy` to `yyyy-mm-dd`
///
/// Day and month are zero-padded. Anything that is not three all-digit
/// parts with a four-digit year is returned unchanged.
pub fn normalize_date(text: &str) -> String {
    let parts: Vec<&str> = text.trim().split('/').collect();

    if let [day, month, year] = parts.as_slice() {
        let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if numeric(*day) && numeric(*month) && numeric(*year) && year.len() == 4 {
            return format!("{}-{:0>2}-{:0>2}", year, month, day);
        }
    }

    text.to_string()
}

/// Parse an ISO `yyyy-mm-dd` date, also accepting anything [`normalize_date`] can fix
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&normalize_date(text), "%Y-%m-%d").ok()
}
