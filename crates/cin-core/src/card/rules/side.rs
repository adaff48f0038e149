//! Card side detection from printed keywords.

use crate::models::card::CardSide;

use super::patterns::{BACK_KEYWORDS, FRONT_KEYWORDS};

/// Number of distinct front and back keywords found in a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideScore {
    pub front: usize,
    pub back: usize,
}

impl SideScore {
    /// Score a text. Each keyword counts once, however often it appears.
    pub fn of(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self {
            front: count_present(&lower, FRONT_KEYWORDS),
            back: count_present(&lower, BACK_KEYWORDS),
        }
    }

    /// Back only when it strictly outnumbers front.
    pub fn side(&self) -> CardSide {
        if self.back > self.front {
            CardSide::Back
        } else {
            CardSide::Front
        }
    }
}

/// Detect whether a text was read from the front or the back of the card.
pub fn detect_side(text: &str) -> CardSide {
    SideScore::of(text).side()
}

/// Whether the lowercased `text` contains any of `keywords`.
pub(crate) fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| lower.contains(k))
}

fn count_present(lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| lower.contains(*k)).count()
}
