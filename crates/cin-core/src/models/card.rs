//! Identity card data model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which face of the card was photographed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardSide {
    /// Photo side: names, date and place of birth, MRZ.
    Front,
    /// Reverse side: parents, address.
    Back,
}

impl CardSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardSide::Front => "FRONT",
            CardSide::Back => "BACK",
        }
    }
}

impl fmt::Display for CardSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields extracted from a national identity card.
///
/// Every field is optional and starts unset. Fields suffixed `_fr` hold the
/// Latin-script value, `_ar` the Arabic-script value. Unset fields are
/// serialized as `null` so the JSON shape never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub side: Option<CardSide>,
    pub cin_number: Option<String>,
    pub first_name_fr: Option<String>,
    pub last_name_fr: Option<String>,
    pub first_name_ar: Option<String>,
    pub last_name_ar: Option<String>,
    pub date_of_birth: Option<String>,
    pub place_of_birth_fr: Option<String>,
    pub place_of_birth_ar: Option<String>,
    pub father_name_fr: Option<String>,
    pub mother_name_fr: Option<String>,
    pub father_name_ar: Option<String>,
    pub mother_name_ar: Option<String>,
    pub address_fr: Option<String>,
    pub address_ar: Option<String>,
}

macro_rules! text_fields {
    ($mac:ident) => {
        $mac!(
            cin_number,
            first_name_fr,
            last_name_fr,
            first_name_ar,
            last_name_ar,
            date_of_birth,
            place_of_birth_fr,
            place_of_birth_ar,
            father_name_fr,
            mother_name_fr,
            father_name_ar,
            mother_name_ar,
            address_fr,
            address_ar
        )
    };
}

impl CardRecord {
    /// Create a record with every field unset.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Record returned when no OCR could be performed: only the side is
    /// guessed, as the front.
    pub fn fallback() -> Self {
        Self {
            side: Some(CardSide::Front),
            ..Self::default()
        }
    }

    /// Copy every field of `other` that is unset in `self`.
    ///
    /// Fields already populated in `self` are left untouched.
    pub fn fill_missing(&mut self, other: CardRecord) {
        if self.side.is_none() {
            self.side = other.side;
        }

        macro_rules! fill {
            ($($field:ident),*) => {
                $(
                    if self.$field.is_none() {
                        self.$field = other.$field;
                    }
                )*
            };
        }
        text_fields!(fill);
    }

    /// Names and values of the populated fields, in declaration order.
    pub fn populated_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(side) = self.side {
            fields.push(("side", side.to_string()));
        }

        macro_rules! collect {
            ($($field:ident),*) => {
                $(
                    if let Some(value) = &self.$field {
                        fields.push((stringify!($field), value.clone()));
                    }
                )*
            };
        }
        text_fields!(collect);

        fields
    }

    /// Whether no field at all has been extracted.
    pub fn is_empty(&self) -> bool {
        self.populated_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_record_serializes_nulls() {
        let json = serde_json::to_value(CardRecord::empty()).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 15);
        assert!(obj.values().all(|v| v.is_null()));
        assert!(obj.contains_key("cin_number"));
        assert!(obj.contains_key("mother_name_ar"));
    }

    #[test]
    fn test_fallback_sets_only_side() {
        let record = CardRecord::fallback();
        assert_eq!(record.side, Some(CardSide::Front));
        assert_eq!(record.populated_fields().len(), 1);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["side"], "FRONT");
    }

    #[test]
    fn test_fill_missing_keeps_existing_values() {
        let mut record = CardRecord {
            side: Some(CardSide::Back),
            cin_number: Some("AB123456".to_string()),
            ..CardRecord::default()
        };

        let other = CardRecord {
            side: Some(CardSide::Front),
            cin_number: Some("ZZ999999".to_string()),
            last_name_fr: Some("ALAOUI".to_string()),
            ..CardRecord::default()
        };

        record.fill_missing(other);

        assert_eq!(record.side, Some(CardSide::Back));
        assert_eq!(record.cin_number.as_deref(), Some("AB123456"));
        assert_eq!(record.last_name_fr.as_deref(), Some("ALAOUI"));
        assert!(record.first_name_fr.is_none());
    }

    #[test]
    fn test_side_round_trip_names() {
        assert_eq!(serde_json::to_string(&CardSide::Back).unwrap(), "\"BACK\"");
        assert_eq!(CardSide::Front.to_string(), "FRONT");
    }
}
