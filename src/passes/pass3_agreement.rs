use regex::Captures;
use tracing::{debug, info, warn};

use crate::gender::{detect_gender, Gender, GenderClassifier};
use crate::models::{CaseMetadata, Correction, CorrectionKind, RuleCategory, RuleDictionary};
use crate::textutil::mirror_case;

use super::{ci_word, PassOutput};

/// Pass 3: grammatical gender agreement.
///
/// The agreement category maps masculine forms to feminine forms only, so
/// substitution happens solely when the claimant gender signal is feminine.
/// A masculine signal needs no rewrite and an undetermined signal must not
/// guess; both leave the text untouched.
pub fn pass3_agreement(
    text: &str,
    dictionary: &RuleDictionary,
    metadata: &CaseMetadata,
    classifier: &dyn GenderClassifier,
) -> PassOutput {
    let claimants = metadata.participants.claimants();
    if claimants.is_empty() {
        debug!("no claimant in metadata; gender detection disabled");
        return PassOutput::unchanged(text);
    }

    let gender = detect_gender(classifier, claimants.iter().copied());
    match gender {
        Gender::Feminine => {}
        Gender::Masculine => {
            info!("masculine gender detected; no agreement corrections needed");
            return PassOutput::unchanged(text);
        }
        Gender::Unknown => {
            warn!("claimant gender undetermined; agreement pass skipped");
            return PassOutput::unchanged(text);
        }
    }

    let mut corrected = text.to_string();
    let mut corrections = Vec::new();

    for (masculine, feminine) in dictionary.rules(RuleCategory::Agreement) {
        let pattern = ci_word(masculine);
        let positions: Vec<usize> = pattern.find_iter(&corrected).map(|m| m.start()).collect();
        if positions.is_empty() {
            continue;
        }

        corrected = pattern
            .replace_all(&corrected, |caps: &Captures| mirror_case(&caps[0], feminine))
            .into_owned();
        debug!(masculine = %masculine, feminine = %feminine, occurrences = positions.len(), "agreement corrected");
        corrections.push(Correction {
            pass_number: 3,
            kind: CorrectionKind::GenderAgreement,
            incorrect: masculine.clone(),
            correct: feminine.clone(),
            occurrences: positions.len(),
            positions,
            source: None,
        });
    }

    info!(applied = corrections.len(), "pass 3 done");
    PassOutput {
        text: corrected,
        corrections,
    }
}
