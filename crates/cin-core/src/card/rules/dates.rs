//! Date extraction for identity cards.

use chrono::NaiveDate;

use super::patterns::{DATE_FRENCH_LONG, DATE_NUMERIC};
use super::{ExtractionMatch, FieldExtractor};

/// Two-digit MRZ years above this value belong to the 1900s.
pub const MRZ_CENTURY_PIVOT: u32 = 26;

/// Date extractor.
///
/// Returns dates exactly as printed (`12/05/1990`, `12-05-1990` or
/// `12 mai 1990`); the card is the source of truth for the formatting.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        // DD/MM/YYYY or DD-MM-YYYY
        for caps in DATE_NUMERIC.captures_iter(text) {
            let m = caps.get(1).unwrap();
            results.push(
                ExtractionMatch::new(m.as_str().to_string(), 0.9, m.as_str())
                    .with_position(m.start(), m.end()),
            );
        }

        // French long format: "12 mai 1990"
        for caps in DATE_FRENCH_LONG.captures_iter(text) {
            let m = caps.get(1).unwrap();
            results.push(
                ExtractionMatch::new(m.as_str().to_string(), 0.85, m.as_str())
                    .with_position(m.start(), m.end()),
            );
        }

        results
    }
}

/// Extract the first date printed in the text.
pub fn extract_date(text: &str) -> Option<String> {
    DateExtractor::new().extract(text).map(|m| m.value)
}

/// Convert an MRZ `YYMMDD` date to `DD/MM/YYYY`.
///
/// Years above [`MRZ_CENTURY_PIVOT`] are placed in the 1900s, the others in
/// the 2000s. Returns `None` for anything that is not a calendar date.
pub fn mrz_date_to_dmy(yymmdd: &str) -> Option<String> {
    if yymmdd.len() != 6 || !yymmdd.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let yy: u32 = yymmdd[0..2].parse().ok()?;
    let month: u32 = yymmdd[2..4].parse().ok()?;
    let day: u32 = yymmdd[4..6].parse().ok()?;

    let year = if yy > MRZ_CENTURY_PIVOT { 1900 + yy } else { 2000 + yy };

    NaiveDate::from_ymd_opt(year as i32, month, day).map(|d| d.format("%d/%m/%Y").to_string())
}
