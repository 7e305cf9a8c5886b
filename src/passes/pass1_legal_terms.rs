use regex::NoExpand;
use tracing::{debug, info, warn};

use crate::models::{Correction, CorrectionKind, RuleCategory, RuleDictionary};

use super::{ci_literal, PassOutput};

/// Pass 1: legal terminology.
///
/// Case-insensitive whole-fragment substitution of every legal-terms rule,
/// in dictionary iteration order, all occurrences of a rule replaced in one
/// operation. The replacement is the dictionary's correct form verbatim.
pub fn pass1_legal_terms(text: &str, dictionary: &RuleDictionary) -> PassOutput {
    let rules = dictionary.rules(RuleCategory::LegalTerm);
    if rules.is_empty() {
        warn!("legal-terms category is empty; no legal corrections available");
        return PassOutput::unchanged(text);
    }

    let mut corrected = text.to_string();
    let mut corrections = Vec::new();

    for (incorrect, correct) in rules {
        let pattern = ci_literal(incorrect);
        let positions: Vec<usize> = pattern.find_iter(&corrected).map(|m| m.start()).collect();
        if positions.is_empty() {
            continue;
        }

        corrected = pattern.replace_all(&corrected, NoExpand(correct)).into_owned();
        debug!(
            incorrect = %incorrect,
            correct = %correct,
            occurrences = positions.len(),
            "legal term corrected"
        );
        corrections.push(Correction {
            pass_number: 1,
            kind: CorrectionKind::LegalTerm,
            incorrect: incorrect.clone(),
            correct: correct.clone(),
            occurrences: positions.len(),
            positions,
            source: None,
        });
    }

    info!(applied = corrections.len(), "pass 1 done");
    PassOutput {
        text: corrected,
        corrections,
    }
}
