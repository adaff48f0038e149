//! CIN (national identity card number) extraction.

use super::patterns::{CIN_LABELED, CIN_STANDALONE};
use super::{ExtractionMatch, FieldExtractor};

/// CIN number extractor.
///
/// A CIN is one or two letters followed by six or seven digits. Values are
/// returned upper-cased.
pub struct CinExtractor;

impl CinExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CinExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CinExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        // Bare number first: it is what the card prints under the photo
        for caps in CIN_STANDALONE.captures_iter(text) {
            let m = caps.get(1).unwrap();
            results.push(
                ExtractionMatch::new(m.as_str().to_uppercase(), 0.9, m.as_str())
                    .with_position(m.start(), m.end()),
            );
        }

        // "N° AB123456", also glued forms like "NoAB123456"
        for caps in CIN_LABELED.captures_iter(text) {
            let cin = caps[1].to_uppercase();
            if results.iter().any(|r| r.value == cin) {
                continue;
            }

            let full_match = caps.get(0).unwrap();
            results.push(
                ExtractionMatch::new(cin, 0.8, full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            );
        }

        results
    }
}

/// Extract the CIN number from text.
pub fn extract_cin_number(text: &str) -> Option<String> {
    CinExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_cin_formats() {
        assert_eq!(extract_cin_number("A123456"), Some("A123456".to_string()));
        assert_eq!(extract_cin_number("AB1234567"), Some("AB1234567".to_string()));
        assert_eq!(extract_cin_number("A12345"), None);
    }

    #[test]
    fn test_extract_cin_in_sentence() {
        let text = "ROYAUME DU MAROC\nCARTE NATIONALE D'IDENTITE\nBE 654321\nBE654321";
        assert_eq!(extract_cin_number(text), Some("BE654321".to_string()));
    }

    #[test]
    fn test_extract_cin_lowercase_is_uppercased() {
        assert_eq!(extract_cin_number("cin: jb123456"), Some("JB123456".to_string()));
    }

    #[test]
    fn test_extract_cin_labeled_glued() {
        // no word boundary between "No" and the number
        let extractor = CinExtractor::new();
        let result = extractor.extract("NoAB123456").unwrap();
        assert_eq!(result.value, "AB123456");
        assert!(result.confidence < 0.9);
    }

    #[test]
    fn test_extract_all_skips_duplicates() {
        let extractor = CinExtractor::new();
        let results = extractor.extract_all("N° AB123456");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].position, Some((4, 12)));
    }
}
