//! Rule-based card parser.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::card::{CardRecord, CardSide};
use crate::models::config::ExtractionConfig;
use crate::ocr::{RawText, TextFragment};

use super::rules::{
    cin::extract_cin_number,
    dates::extract_date,
    mrz::parse_mrz,
    patterns::{BIRTH_KEYWORDS, NAME_LABEL_KEYWORDS, PARENT_KEYWORDS},
    side::{contains_any, SideScore},
};
use super::{CardExtractor, Result};

/// Result of card extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted card data.
    pub record: CardRecord,
    /// Raw extracted text.
    pub raw_text: String,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Card parser applying the keyword and regex rules.
pub struct CardParser {
    /// Merge MRZ fields into the record.
    parse_mrz: bool,
    /// Run the per-fragment keyword pass.
    fragment_keywords: bool,
}

impl CardParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            parse_mrz: true,
            fragment_keywords: true,
        }
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_mrz(config.parse_mrz)
            .with_fragment_keywords(config.fragment_keywords)
    }

    /// Set MRZ parsing.
    pub fn with_mrz(mut self, enabled: bool) -> Self {
        self.parse_mrz = enabled;
        self
    }

    /// Set the fragment keyword pass.
    pub fn with_fragment_keywords(mut self, enabled: bool) -> Self {
        self.fragment_keywords = enabled;
        self
    }

    /// Parse card fields from a block of text.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing card from {} characters of text", text.len());

        let score = SideScore::of(text);
        debug!("Side keywords: {} front, {} back", score.front, score.back);

        let mut record = CardRecord {
            side: Some(score.side()),
            cin_number: extract_cin_number(text),
            date_of_birth: extract_date(text),
            ..CardRecord::default()
        };

        if self.parse_mrz {
            let mrz = parse_mrz(text);
            if !mrz.is_empty() {
                debug!("MRZ fields found: {:?}", mrz);
                record.fill_missing(mrz.into_record());
            }
        }

        if record.cin_number.is_none() {
            warnings.push("Could not extract CIN number".to_string());
        }
        if record.date_of_birth.is_none() && record.side == Some(CardSide::Front) {
            warnings.push("Could not extract date of birth".to_string());
        }

        ExtractionResult {
            record,
            raw_text: text.to_string(),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Parse card fields from OCR output.
    ///
    /// Runs [`CardParser::parse`] on the full text. Positioned fragments are
    /// then checked one by one: name labels are skipped, a birth label may
    /// carry the date when the full text did not, and a parent label marks
    /// the back of the card.
    pub fn parse_raw(&self, raw: &RawText) -> ExtractionResult {
        let mut result = self.parse(&raw.full_text());

        if let Some(fragments) = raw.fragments().filter(|_| self.fragment_keywords) {
            apply_fragment_keywords(&mut result.record, fragments);
        }

        result
    }
}

fn apply_fragment_keywords(record: &mut CardRecord, fragments: &[TextFragment]) {
    for fragment in fragments {
        let text = fragment.text.trim();
        let lower = text.to_lowercase();

        if contains_any(&lower, NAME_LABEL_KEYWORDS) {
            continue;
        }

        if contains_any(&lower, BIRTH_KEYWORDS) {
            if record.date_of_birth.is_none() {
                record.date_of_birth = extract_date(text);
            }
        } else if contains_any(&lower, PARENT_KEYWORDS) {
            if record.side != Some(CardSide::Back) {
                debug!("Parent label {:?} marks the back side", text);
            }
            record.side = Some(CardSide::Back);
        }
    }
}

impl Default for CardParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CardExtractor for CardParser {
    fn extract(&self, raw: &RawText) -> Result<CardRecord> {
        if raw.is_blank() {
            return Err(ExtractionError::NoText);
        }

        let result = self.parse_raw(raw);

        for warning in &result.warnings {
            debug!("{}", warning);
        }

        Ok(result.record)
    }

    fn extract_from_text(&self, text: &str) -> Result<CardRecord> {
        if text.trim().is_empty() {
            return Err(ExtractionError::NoText);
        }
        Ok(self.parse(text).record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fragment(text: &str) -> TextFragment {
        TextFragment {
            text: text.to_string(),
            confidence: 0.9,
            bbox: [0.0; 8],
        }
    }

    #[test]
    fn test_parse_front_side() {
        let text = r#"
            ROYAUME DU MAROC
            CARTE NATIONALE D'IDENTITE
            ALAMI
            MOHAMED
            Né le 12/05/1990
            à RABAT
            AB123456
            Valable jusqu'au 01/01/2030
        "#;

        let result = CardParser::new().parse(text);

        assert_eq!(result.record.side, Some(CardSide::Front));
        assert_eq!(result.record.cin_number.as_deref(), Some("AB123456"));
        assert_eq!(result.record.date_of_birth.as_deref(), Some("12/05/1990"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_parse_back_side() {
        let text = "Fils de AHMED\net de FATIMA\nAdresse 12 RUE ATLAS FES\nNom du père";
        let result = CardParser::new().parse(text);

        assert_eq!(result.record.side, Some(CardSide::Back));
        assert!(result.record.date_of_birth.is_none());
        assert_eq!(result.warnings, vec!["Could not extract CIN number".to_string()]);
    }

    #[test]
    fn test_no_match_leaves_fields_unset() {
        let result = CardParser::new().parse("lorem ipsum");

        assert_eq!(
            result.record,
            CardRecord {
                side: Some(CardSide::Front),
                ..CardRecord::default()
            }
        );
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_mrz_fills_only_missing_fields() {
        let text = "CARTE NATIONALE BE654321 Né le 01/02/1985\n\
                    IDMARAB1234567<8<<<<<<<<<<<<<<\n\
                    9005123M3001014MAR<<<<<<<<<<<6\n\
                    BENNANI<<YOUSSEF<<<<<<<<<<<<<<";

        let record = CardParser::new().parse(text).record;

        // printed values win over the MRZ
        assert_eq!(record.cin_number.as_deref(), Some("BE654321"));
        assert_eq!(record.date_of_birth.as_deref(), Some("01/02/1985"));
        // names only come from the MRZ
        assert_eq!(record.last_name_fr.as_deref(), Some("BENNANI"));
        assert_eq!(record.first_name_fr.as_deref(), Some("YOUSSEF"));
    }

    #[test]
    fn test_mrz_only() {
        let text = "IDMARAB1234567<8<<<<<<<<<<<<<<\n9005123M3001014MAR<<<<<<<<<<<6\nBENNANI<<YOUSSEF<<<<<";
        let record = CardParser::new().parse(text).record;

        assert_eq!(record.cin_number.as_deref(), Some("AB1234567"));
        assert_eq!(record.date_of_birth.as_deref(), Some("12/05/1990"));
    }

    #[test]
    fn test_mrz_disabled() {
        let text = "BENNANI<<YOUSSEF<<<<<";
        let record = CardParser::new().with_mrz(false).parse(text).record;
        assert!(record.last_name_fr.is_none());
    }

    #[test]
    fn test_fragments_parent_label_forces_back() {
        // front keywords outnumber back ones in the joined text
        let fragments = vec![
            fragment("Carte nationale"),
            fragment("Date de naissance"),
            fragment("Lieu de naissance"),
            fragment("Père: AHMED"),
        ];

        let joined = CardParser::new().parse("Carte nationale Date de naissance Lieu de naissance Père: AHMED");
        assert_eq!(joined.record.side, Some(CardSide::Front));

        let record = CardParser::new().parse_raw(&RawText::Fragments(fragments)).record;
        assert_eq!(record.side, Some(CardSide::Back));
    }

    #[test]
    fn test_fragments_name_labels_are_skipped() {
        // two front and two back keywords in the joined text, a tie
        let fragments = vec![
            fragment("Carte nationale"),
            fragment("Date de naissance"),
            fragment("Nom du père"),
        ];

        let record = CardParser::new().parse_raw(&RawText::Fragments(fragments)).record;
        assert_eq!(record.side, Some(CardSide::Front));
    }

    #[test]
    fn test_fragments_birth_label_takes_precedence_over_parent() {
        let fragments = vec![
            fragment("Carte nationale"),
            fragment("Date de naissance"),
            fragment("née de père inconnu"),
        ];

        let record = CardParser::new().parse_raw(&RawText::Fragments(fragments)).record;
        assert_eq!(record.side, Some(CardSide::Front));
        assert!(record.date_of_birth.is_none());
    }

    #[test]
    fn test_fragments_keyword_pass_disabled() {
        let fragments = vec![
            fragment("Carte nationale"),
            fragment("Date de naissance"),
            fragment("Père: AHMED"),
        ];
        let record = CardParser::new()
            .with_fragment_keywords(false)
            .parse_raw(&RawText::Fragments(fragments))
            .record;
        assert_eq!(record.side, Some(CardSide::Front));
    }

    #[test]
    fn test_fragments_birth_label_does_not_overwrite() {
        let fragments = vec![
            fragment("01/01/2000"),
            fragment("née le 12/05/1990"),
        ];
        let record = CardParser::new().parse_raw(&RawText::Fragments(fragments)).record;
        assert_eq!(record.date_of_birth.as_deref(), Some("01/01/2000"));
    }

    #[test]
    fn test_extract_dispatches_on_raw_text() {
        let parser = CardParser::new();

        let plain = parser.extract(&RawText::Plain("AB123456".to_string())).unwrap();
        assert_eq!(plain.cin_number.as_deref(), Some("AB123456"));

        let fragments = parser
            .extract(&RawText::Fragments(vec![fragment("Mère"), fragment("X765432")]))
            .unwrap();
        assert_eq!(fragments.side, Some(CardSide::Back));
        assert_eq!(fragments.cin_number.as_deref(), Some("X765432"));
    }

    #[test]
    fn test_blank_text_is_an_error() {
        let parser = CardParser::new();
        assert!(matches!(
            parser.extract(&RawText::Plain(" \n ".to_string())),
            Err(ExtractionError::NoText)
        ));
        assert!(matches!(parser.extract_from_text(""), Err(ExtractionError::NoText)));
        assert!(matches!(
            parser.extract(&RawText::Fragments(Vec::new())),
            Err(ExtractionError::NoText)
        ));
    }
}
