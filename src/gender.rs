use serde::{Deserialize, Serialize};

/// Grammatical-gender signal detected from a claimant's given name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Feminine,
    Masculine,
    Unknown,
}

/// Pluggable classifier mapping a claimant name line to a gender signal.
///
/// The default implementation is a blunt frequency-list lookup; keeping it
/// behind a trait lets the lookup table be replaced without touching the
/// agreement pass's control flow.
pub trait GenderClassifier {
    fn classify(&self, name: &str) -> Gender;
}

/// Feminine given names frequently seen in hearing records.
const FEMININE_GIVEN_NAMES: &[&str] = &[
    "victoria", "paula", "maria", "carmen", "rosa", "ana", "elena", "fatima",
    "aisha", "amina", "zainab", "mariam", "sara", "leila", "yasmin", "nour",
    "hanan", "samira", "layla", "rania",
];

/// Masculine given names frequently seen in hearing records.
const MASCULINE_GIVEN_NAMES: &[&str] = &[
    "ibrahim", "mohamed", "mohammed", "ahmed", "hassan", "ali", "omar",
    "youssef", "khalid", "hamza", "said", "mustafa", "abdullah", "karim",
    "tarek", "walid", "rami", "bilal",
];

/// Name-frequency classifier backed by two static given-name lists.
///
/// Matching is a case-insensitive substring test against the full name line,
/// feminine names checked first.
#[derive(Debug, Clone)]
pub struct NameListClassifier {
    feminine: &'static [&'static str],
    masculine: &'static [&'static str],
}

impl Default for NameListClassifier {
    fn default() -> Self {
        Self {
            feminine: FEMININE_GIVEN_NAMES,
            masculine: MASCULINE_GIVEN_NAMES,
        }
    }
}

impl GenderClassifier for NameListClassifier {
    fn classify(&self, name: &str) -> Gender {
        let lowered = name.to_lowercase();
        if self.feminine.iter().any(|given| lowered.contains(given)) {
            Gender::Feminine
        } else if self.masculine.iter().any(|given| lowered.contains(given)) {
            Gender::Masculine
        } else {
            Gender::Unknown
        }
    }
}

/// Aggregate the gender signal over several claimants.
///
/// If at least one claimant classifies feminine the aggregate is feminine;
/// otherwise masculine if at least one classifies masculine; otherwise
/// unknown.
pub fn detect_gender<'a>(
    classifier: &dyn GenderClassifier,
    claimants: impl IntoIterator<Item = &'a str>,
) -> Gender {
    let mut saw_masculine = false;
    for claimant in claimants {
        match classifier.classify(claimant) {
            Gender::Feminine => return Gender::Feminine,
            Gender::Masculine => saw_masculine = true,
            Gender::Unknown => {}
        }
    }
    if saw_masculine {
        Gender::Masculine
    } else {
        Gender::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_feminine() {
        let classifier = NameListClassifier::default();
        assert_eq!(classifier.classify("Victoria AGUILAR ROMERO"), Gender::Feminine);
    }

    #[test]
    fn test_classify_masculine() {
        let classifier = NameListClassifier::default();
        assert_eq!(classifier.classify("Ahmed Hassan"), Gender::Masculine);
    }

    #[test]
    fn test_classify_unknown() {
        let classifier = NameListClassifier::default();
        assert_eq!(classifier.classify("Jean Tremblay"), Gender::Unknown);
    }

    #[test]
    fn test_feminine_takes_priority_over_masculine() {
        let classifier = NameListClassifier::default();
        let gender = detect_gender(&classifier, ["Ahmed Hassan", "Maria Lopez"]);
        assert_eq!(gender, Gender::Feminine);
    }

    #[test]
    fn test_all_unknown_stays_unknown() {
        let classifier = NameListClassifier::default();
        let gender = detect_gender(&classifier, ["Jean Tremblay"]);
        assert_eq!(gender, Gender::Unknown);
    }
}
