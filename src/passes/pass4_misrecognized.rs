use tracing::{debug, info};

use crate::models::{Correction, CorrectionKind, RuleCategory, RuleDictionary};

use super::PassOutput;

/// Pass 4: phonetically misrecognized words.
///
/// Exact, case-sensitive literal replacement: casing can be the only thing
/// disambiguating two different intended words, so no case folding happens
/// here. Match positions are not tracked for literal replacement.
pub fn pass4_misrecognized(text: &str, dictionary: &RuleDictionary) -> PassOutput {
    let mut corrected = text.to_string();
    let mut corrections = Vec::new();

    for (incorrect, correct) in dictionary.rules(RuleCategory::Misrecognition) {
        let occurrences = corrected.matches(incorrect.as_str()).count();
        if occurrences == 0 {
            continue;
        }

        corrected = corrected.replace(incorrect.as_str(), correct);
        debug!(incorrect = %incorrect, correct = %correct, occurrences, "misrecognized word corrected");
        corrections.push(Correction {
            pass_number: 4,
            kind: CorrectionKind::Misrecognized,
            incorrect: incorrect.clone(),
            correct: correct.clone(),
            occurrences,
            positions: Vec::new(),
            source: None,
        });
    }

    info!(applied = corrections.len(), "pass 4 done");
    PassOutput {
        text: corrected,
        corrections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> RuleDictionary {
        let mut dictionary = RuleDictionary::default();
        dictionary.insert_rule(RuleCategory::Misrecognition, "Créait", "Vous craignez");
        dictionary.insert_rule(RuleCategory::Misrecognition, "affairement", "avortement");
        dictionary
    }

    #[test]
    fn test_exact_replacement() {
        let output = pass4_misrecognized("Le diagnostic montre affairement", &dictionary());
        assert_eq!(output.text, "Le diagnostic montre avortement");
        assert_eq!(output.corrections.len(), 1);
        assert_eq!(output.corrections[0].occurrences, 1);
    }

    #[test]
    fn test_case_sensitive() {
        // Lowercase "créait" is a legitimate verb form and must survive.
        let output = pass4_misrecognized("Créait un retour, il créait un lien", &dictionary());
        assert_eq!(output.text, "Vous craignez un retour, il créait un lien");
        assert_eq!(output.corrections.len(), 1);
    }

    #[test]
    fn test_counts_all_occurrences() {
        let output = pass4_misrecognized("affairement et affairement", &dictionary());
        assert_eq!(output.corrections[0].occurrences, 2);
        assert_eq!(output.text, "avortement et avortement");
    }

    #[test]
    fn test_empty_category_is_a_no_op() {
        let output = pass4_misrecognized("Créait", &RuleDictionary::default());
        assert_eq!(output.text, "Créait");
        assert!(output.corrections.is_empty());
    }
}
