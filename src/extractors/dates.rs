// src/extractors/dates.rs
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::extractors::table::clean_text;

const MONTH_NAMES: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

// 1990-01-05, 1990/1/5, 1990.01.05
static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})\b").expect("Failed to compile ISO_DATE_RE")
});

// January 5, 1990 / Jan. 5th 1990 / January 5
static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b{MONTH_NAMES}\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b,?(?:\s+(\d{{4}})\b)?"
    ))
    .expect("Failed to compile MONTH_DAY_RE")
});

// 5 January 1990 / 5th Jan 1990 / 5 January
static DAY_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+{MONTH_NAMES}\b\.?,?(?:\s+(\d{{4}})\b)?"
    ))
    .expect("Failed to compile DAY_MONTH_RE")
});

// 1/5/1990 (US order)
static US_NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("Failed to compile US_NUMERIC_RE")
});

fn month_from_name(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_ascii_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn number<T: std::str::FromStr>(caps: &Captures, idx: usize) -> Option<T> {
    caps.get(idx)?.as_str().parse().ok()
}

fn year_or(caps: &Captures, idx: usize, fallback_year: Option<i32>) -> Option<i32> {
    match caps.get(idx) {
        Some(m) => m.as_str().parse().ok(),
        None => fallback_year,
    }
}

/// Leniently parses an issue-date cell into a calendar date.
///
/// Accepts ISO dates, "January 5, 1990", "5 January 1990" and "1/5/1990" anywhere
/// in the text. Forms without a year take `fallback_year`; without one they give
/// `None`. Anything unparseable gives `None` and the caller drops the row.
pub fn parse_issue_date(raw: &str, fallback_year: Option<i32>) -> Option<NaiveDate> {
    let text = clean_text(raw);
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = ISO_DATE_RE.captures(&text) {
        return NaiveDate::from_ymd_opt(number(&caps, 1)?, number(&caps, 2)?, number(&caps, 3)?);
    }

    if let Some(caps) = MONTH_DAY_RE.captures(&text) {
        let month = month_from_name(caps.get(1)?.as_str())?;
        return NaiveDate::from_ymd_opt(year_or(&caps, 3, fallback_year)?, month, number(&caps, 2)?);
    }

    if let Some(caps) = DAY_MONTH_RE.captures(&text) {
        let month = month_from_name(caps.get(2)?.as_str())?;
        return NaiveDate::from_ymd_opt(year_or(&caps, 3, fallback_year)?, month, number(&caps, 1)?);
    }

    if let Some(caps) = US_NUMERIC_RE.captures(&text) {
        return NaiveDate::from_ymd_opt(number(&caps, 3)?, number(&caps, 1)?, number(&caps, 2)?);
    }

    None
}
