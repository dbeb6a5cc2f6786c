//! Date-range detection for experience entries ("Jan 2020 - Present", "03/2019 – 06/2021").

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

const DATE: &str = r"(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+\d{4}|\d{1,2}/\d{4}|\d{4})";

static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)(?P<start>{DATE})\s*(?:-|–|—|to|until)\s*(?P<end>{DATE}|present|current|now|today)"
    ))
    .unwrap()
});

static MONTH_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<mon>[a-z]{3})[a-z]*\.?\s+(?P<year>\d{4})$").unwrap()
});

static NUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<mon>\d{1,2})/(?P<year>\d{4})$").unwrap());

/// A date range found in a line, resolved to whole months.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub raw: String,
    pub months: u32,
}

/// Finds the first date range in `line`. Open ranges ("Present") end at `reference`.
pub fn find_date_range(line: &str, reference: NaiveDate) -> Option<DateRange> {
    let caps = RANGE_RE.captures(line)?;
    let start = parse_month(caps.name("start")?.as_str(), reference)?;
    let end = parse_month(caps.name("end")?.as_str(), reference)?;

    let months = (end.0 - start.0) * 12 + (end.1 as i32 - start.1 as i32);
    Some(DateRange {
        raw: caps.get(0)?.as_str().trim().to_string(),
        months: months.max(0) as u32,
    })
}

/// Parses one side of a range into (year, month). Year-only values count from January.
fn parse_month(text: &str, reference: NaiveDate) -> Option<(i32, u32)> {
    let text = text.trim();
    let lower = text.to_lowercase();
    if matches!(lower.as_str(), "present" | "current" | "now" | "today") {
        return Some((reference.year(), reference.month()));
    }
    if let Some(caps) = MONTH_YEAR_RE.captures(text) {
        let month = month_number(&caps["mon"].to_lowercase())?;
        return Some((caps["year"].parse().ok()?, month));
    }
    if let Some(caps) = NUMERIC_RE.captures(text) {
        let month: u32 = caps["mon"].parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        return Some((caps["year"].parse().ok()?, month));
    }
    if text.len() == 4 {
        return Some((text.parse().ok()?, 1));
    }
    None
}

fn month_number(abbrev: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    MONTHS
        .iter()
        .position(|m| *m == abbrev)
        .map(|i| i as u32 + 1)
}

/// True when the line uses a `MM/YYYY` date, the format ATS parsers read most reliably.
pub fn uses_numeric_dates(text: &str) -> bool {
    static NUMERIC_ANYWHERE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{1,2}/\d{4}\b").unwrap());
    NUMERIC_ANYWHERE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_month_name_range() {
        let range = find_date_range("Software Engineer, Jan 2020 - Mar 2022", reference()).unwrap();
        assert_eq!(range.months, 26);
        assert_eq!(range.raw, "Jan 2020 - Mar 2022");
    }

    #[test]
    fn test_open_range_uses_reference_date() {
        let range = find_date_range("September 2023 – Present", reference()).unwrap();
        assert_eq!(range.months, 9);
    }

    #[test]
    fn test_numeric_range() {
        let range = find_date_range("03/2019 to 06/2021", reference()).unwrap();
        assert_eq!(range.months, 27);
    }

    #[test]
    fn test_year_only_range() {
        let range = find_date_range("Analyst | 2018 - 2020", reference()).unwrap();
        assert_eq!(range.months, 24);
    }

    #[test]
    fn test_reversed_range_clamps_to_zero() {
        let range = find_date_range("2022 - 2020", reference()).unwrap();
        assert_eq!(range.months, 0);
    }

    #[test]
    fn test_no_range() {
        assert!(find_date_range("Built data pipelines in 2021", reference()).is_none());
    }

    #[test]
    fn test_invalid_numeric_month_degrades() {
        assert!(find_date_range("13/2019 - 06/2021", reference()).is_none());
    }

    #[test]
    fn test_uses_numeric_dates() {
        assert!(uses_numeric_dates("01/2020 - 03/2022"));
        assert!(!uses_numeric_dates("Jan 2020 - Mar 2022"));
    }
}
