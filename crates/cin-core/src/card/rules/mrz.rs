//! Machine Readable Zone (TD1, three lines) parsing.
//!
//! OCR output rarely keeps the MRZ intact, so the parser does not validate
//! line lengths or check digits. It looks for the individual fields anywhere
//! in the text with line breaks flattened to spaces.

use crate::models::card::CardRecord;

use super::dates::mrz_date_to_dmy;
use super::patterns::{MRZ_BIRTH_LOOSE, MRZ_CIN, MRZ_LINE2_BIRTH, MRZ_NAMES};

/// Fields decoded from an MRZ.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MrzFields {
    pub cin_number: Option<String>,
    /// Birth date as `DD/MM/YYYY`.
    pub date_of_birth: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
}

impl MrzFields {
    pub fn is_empty(&self) -> bool {
        self.cin_number.is_none()
            && self.date_of_birth.is_none()
            && self.last_name.is_none()
            && self.first_name.is_none()
    }

    /// Partial record holding the decoded fields.
    pub fn into_record(self) -> CardRecord {
        CardRecord {
            cin_number: self.cin_number,
            date_of_birth: self.date_of_birth,
            last_name_fr: self.last_name,
            first_name_fr: self.first_name,
            ..CardRecord::default()
        }
    }
}

/// Parse MRZ fields out of raw OCR text.
pub fn parse_mrz(text: &str) -> MrzFields {
    let text = text.replace(['\n', '\r'], " ");

    let mut fields = MrzFields {
        cin_number: MRZ_CIN.captures(&text).map(|c| c[1].to_string()),
        date_of_birth: birth_date(&text),
        ..MrzFields::default()
    };

    if let Some(caps) = MRZ_NAMES.captures(&text) {
        fields.last_name = unfill(&caps[1]);
        fields.first_name = unfill(&caps[2]);
    }

    fields
}

fn birth_date(text: &str) -> Option<String> {
    // Full line-2 shape first, then any six digits followed by a check
    // digit or sex marker.
    MRZ_LINE2_BIRTH
        .captures_iter(text)
        .chain(MRZ_BIRTH_LOOSE.captures_iter(text))
        .find_map(|caps| mrz_date_to_dmy(&caps[1]))
}

/// Replace `<` fillers with spaces.
fn unfill(field: &str) -> Option<String> {
    let value = field.replace('<', " ").trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MRZ: &str = "IDMARAB1234567<8<<<<<<<<<<<<<<\n\
                       9005123M3001014MAR<<<<<<<<<<<6\n\
                       EL<ALAMI<<MOHAMED<AMINE<<<<<<<";

    #[test]
    fn test_parse_full_mrz() {
        let fields = parse_mrz(MRZ);

        assert_eq!(
            fields,
            MrzFields {
                cin_number: Some("AB1234567".to_string()),
                date_of_birth: Some("12/05/1990".to_string()),
                last_name: Some("EL ALAMI".to_string()),
                first_name: Some("MOHAMED AMINE".to_string()),
            }
        );
    }

    #[test]
    fn test_line2_shape_beats_earlier_digits() {
        // the document number alone would read as 01/01/1990
        let text = "I<MAR9001012<<<<\n0505127F3001014MAR";
        assert_eq!(parse_mrz(text).date_of_birth, Some("12/05/2005".to_string()));
    }

    #[test]
    fn test_loose_birth_date() {
        assert_eq!(parse_mrz("xx 9005123M").date_of_birth, Some("12/05/1990".to_string()));
        assert_eq!(parse_mrz("xx 900512M").date_of_birth, Some("12/05/1990".to_string()));
    }

    #[test]
    fn test_invalid_dates_skipped() {
        assert_eq!(parse_mrz("9999991 x").date_of_birth, None);
    }

    #[test]
    fn test_no_mrz() {
        let fields = parse_mrz("Royaume du Maroc carte nationale");
        assert!(fields.is_empty());
        assert_eq!(fields.into_record(), CardRecord::default());
    }

    #[test]
    fn test_lowercase_not_mrz() {
        assert!(parse_mrz("alami<<mohamed ab123456").is_empty());
    }
}
