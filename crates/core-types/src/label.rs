use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The identifying label of a single observation.
///
/// Labels are parsed once from their raw text. Date-like labels are ordered chronologically,
/// numeric labels (integers such as `42` and decimals such as `1871.01`) by value, and anything
/// else lexicographically. Mixed kinds compare by kind: every date sorts before every number,
/// which sorts before every text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Label {
    Date(NaiveDateTime),
    Index(i64),
    Number(f64),
    Text(String),
}

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

impl Label {
    /// Parses a raw label, falling back to `Label::Text` when it is neither a date nor a finite
    /// number.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        for format in DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
                return Label::Date(datetime);
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Label::Date(date.and_time(chrono::NaiveTime::MIN));
        }
        // Month-only labels such as "2025-01".
        if raw.len() == 7 {
            if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
                return Label::Date(date.and_time(chrono::NaiveTime::MIN));
            }
        }
        if let Ok(index) = raw.parse::<i64>() {
            return Label::Index(index);
        }
        match raw.parse::<f64>() {
            Ok(number) if number.is_finite() => Label::Number(number),
            _ => Label::Text(raw.to_string()),
        }
    }

    /// Renders the label for output tables. Dates use `date_format` (a chrono format string);
    /// other labels are rendered verbatim.
    pub fn render(&self, date_format: &str) -> String {
        match self {
            Label::Date(datetime) => datetime.format(date_format).to_string(),
            other => other.to_string(),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Label::Date(_) => 0,
            Label::Index(_) | Label::Number(_) => 1,
            Label::Text(_) => 2,
        }
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Label::Date(a), Label::Date(b)) => a.cmp(b),
            (Label::Index(a), Label::Index(b)) => a.cmp(b),
            (Label::Number(a), Label::Number(b)) => a.total_cmp(b),
            // An integer and a decimal of equal value stay distinct: the integer goes first.
            (Label::Index(a), Label::Number(b)) => (*a as f64).total_cmp(b).then(Ordering::Less),
            (Label::Number(a), Label::Index(b)) => a.total_cmp(&(*b as f64)).then(Ordering::Greater),
            (Label::Text(a), Label::Text(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Label {}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Label::Date(datetime) => datetime.hash(state),
            Label::Index(index) => index.hash(state),
            Label::Number(number) => number.to_bits().hash(state),
            Label::Text(text) => text.hash(state),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Date(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S")),
            Label::Index(index) => write!(f, "{index}"),
            Label::Number(number) => write!(f, "{number}"),
            Label::Text(text) => f.write_str(text),
        }
    }
}
