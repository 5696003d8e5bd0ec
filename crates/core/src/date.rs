//! Publication dates found in page markup.
//!
//! Dates are only recognized in a small set of unambiguous shapes; anything
//! else is treated as absent rather than guessed at.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Serialize, Serializer};

/// A date taken from a page, with whatever precision the page provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishedDate {
    /// Timestamp with a UTC offset, e.g. `2024-01-15T10:30:00Z`.
    DateTime(DateTime<FixedOffset>),
    /// Timestamp without an offset, e.g. `2024-01-15T10:30:00`.
    LocalDateTime(NaiveDateTime),
    /// Calendar date only, e.g. `2024-01-15` or `January 15, 2024`.
    Date(NaiveDate),
}

static ISO_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?")
        .expect("timestamp regex is valid")
});

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("date regex is valid"));

const MONTHS: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b{}\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b", MONTHS))
        .expect("month-day-year regex is valid")
});

static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+{}\.?,?\s+(\d{{4}})\b", MONTHS))
        .expect("day-month-year regex is valid")
});

impl PublishedDate {
    /// Parses a machine-readable value such as a meta tag `content` or a
    /// `datetime` attribute. The whole value must be one recognized shape.
    pub fn parse_structured(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(Self::DateTime(dt));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M%z", "%Y-%m-%d %H:%M:%S%z"] {
            if let Ok(dt) = DateTime::parse_from_str(value, format) {
                return Some(Self::DateTime(dt));
            }
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
                return Some(Self::LocalDateTime(dt));
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Some(Self::Date(date));
        }

        Self::find_in_text(value).filter(|_| value.len() <= 40)
    }

    /// Finds the first recognizable date inside visible text.
    ///
    /// Recognized shapes: ISO timestamps, `YYYY-MM-DD`, `Month D, YYYY` and
    /// `D Month YYYY` (full or abbreviated English month names).
    pub fn find_in_text(text: &str) -> Option<Self> {
        if let Some(m) = ISO_TIMESTAMP.find(text)
            && let Some(date) = Self::parse_timestamp(m.as_str())
        {
            return Some(date);
        }

        if let Some(caps) = ISO_DATE.captures(text)
            && let Some(date) = ymd(&caps[1], &caps[2], &caps[3])
        {
            return Some(Self::Date(date));
        }

        if let Some(caps) = MONTH_DAY_YEAR.captures(text)
            && let Some(month) = month_number(&caps[1])
            && let Some(date) = ymd(&caps[3], &month.to_string(), &caps[2])
        {
            return Some(Self::Date(date));
        }

        if let Some(caps) = DAY_MONTH_YEAR.captures(text)
            && let Some(month) = month_number(&caps[2])
            && let Some(date) = ymd(&caps[3], &month.to_string(), &caps[1])
        {
            return Some(Self::Date(date));
        }

        None
    }

    fn parse_timestamp(value: &str) -> Option<Self> {
        let normalized = value.replacen(' ', "T", 1);
        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
            return Some(Self::DateTime(dt));
        }
        if let Ok(dt) = DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%z") {
            return Some(Self::DateTime(dt));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
            .map(Self::LocalDateTime)
    }

    /// Formats the date as ISO 8601, preserving the original precision.
    pub fn to_iso8601(&self) -> String {
        match self {
            Self::DateTime(dt) => dt.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
            Self::LocalDateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            Self::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }
}

impl fmt::Display for PublishedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for PublishedDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
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
