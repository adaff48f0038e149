//! Common regex patterns and keyword lists for identity card extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Keywords printed on the front of the card (lowercase).
pub const FRONT_KEYWORDS: &[&str] = &[
    "date de naissance",
    "date of birth",
    "lieu de naissance",
    "né(e) le",
    "ne(e) le",
    "carte nationale",
];

/// Keywords printed on the back of the card (lowercase).
pub const BACK_KEYWORDS: &[&str] = &[
    "père",
    "pere",
    "mère",
    "mere",
    "mother",
    "father",
    "adresse",
    "address",
    "nom du père",
    "nom de la mère",
];

/// Fragment keywords that only appear next to parent names.
pub const PARENT_KEYWORDS: &[&str] = &["père", "pere", "mère", "mere"];

/// Fragment keywords marking a name label ("nom", "prénom"). Such fragments
/// carry no value.
pub const NAME_LABEL_KEYWORDS: &[&str] = &["nom"];

/// Fragment keywords announcing the birth date.
pub const BIRTH_KEYWORDS: &[&str] = &["né", "née"];

lazy_static! {
    // CIN number: 1-2 letters followed by 6-7 digits
    pub static ref CIN_STANDALONE: Regex = Regex::new(
        r"(?i)\b([A-Z]{1,2}\d{6,7})\b"
    ).unwrap();

    pub static ref CIN_LABELED: Regex = Regex::new(
        r"(?i)\bN[°o]?\s*:?\s*([A-Z]{1,2}\d{6,7})\b"
    ).unwrap();

    // Dates as printed on the card
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{2}[/-]\d{2}[/-]\d{4})\b"
    ).unwrap();

    pub static ref DATE_FRENCH_LONG: Regex = Regex::new(
        r"(?i)\b(\d{1,2}\s+(?:janvier|février|fevrier|mars|avril|mai|juin|juillet|août|aout|septembre|octobre|novembre|décembre|decembre)\s+\d{4})\b"
    ).unwrap();

    // MRZ (TD1). Matched case-sensitively: the zone is always upper case.
    pub static ref MRZ_CIN: Regex = Regex::new(
        r"([A-Z]{1,2}\d{6,7})"
    ).unwrap();

    // Line 2: birth date, check digit, sex, expiry date, check digit
    pub static ref MRZ_LINE2_BIRTH: Regex = Regex::new(
        r"(\d{6})\d[MF<]\d{6}\d"
    ).unwrap();

    // Six digits followed by a check digit or the sex marker
    pub static ref MRZ_BIRTH_LOOSE: Regex = Regex::new(
        r"(\d{6})[0-9M]"
    ).unwrap();

    // Line 3: SURNAME<<GIVEN<NAMES
    pub static ref MRZ_NAMES: Regex = Regex::new(
        r"\b([A-Z]{2,}(?:<[A-Z]+)*)<<([A-Z]+(?:<[A-Z]+)*)"
    ).unwrap();
}
