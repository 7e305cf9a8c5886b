use regex::{Captures, NoExpand};
use tracing::{debug, info};

use crate::models::{CaseMetadata, Correction, CorrectionKind, RuleCategory, RuleDictionary};
use crate::textutil::{mirror_case, starts_uppercase, title_case};

use super::{ci_literal, PassOutput};

const METADATA_SOURCE: &str = "case-metadata";

/// Pass 2: proper nouns, accents, and metadata-driven name variants.
///
/// Sub-stage (a) applies the proper-nouns category case-insensitively. When
/// the dictionary's correct form starts with a capital it is used verbatim
/// (proper nouns keep their canonical casing); otherwise the replacement
/// mirrors the matched span's casing.
///
/// Sub-stage (b) rewrites plausible mis-transcriptions of each claimant name
/// back to the canonical form recorded in the case metadata.
pub fn pass2_proper_nouns(
    text: &str,
    dictionary: &RuleDictionary,
    metadata: &CaseMetadata,
) -> PassOutput {
    let mut corrected = text.to_string();
    let mut corrections = Vec::new();

    for (incorrect, correct) in dictionary.rules(RuleCategory::ProperNoun) {
        let pattern = ci_literal(incorrect);
        let positions: Vec<usize> = pattern.find_iter(&corrected).map(|m| m.start()).collect();
        if positions.is_empty() {
            continue;
        }

        corrected = if starts_uppercase(correct) {
            pattern.replace_all(&corrected, NoExpand(correct)).into_owned()
        } else {
            pattern
                .replace_all(&corrected, |caps: &Captures| mirror_case(&caps[0], correct))
                .into_owned()
        };

        debug!(incorrect = %incorrect, correct = %correct, occurrences = positions.len(), "proper noun corrected");
        corrections.push(Correction {
            pass_number: 2,
            kind: CorrectionKind::ProperNounAccent,
            incorrect: incorrect.clone(),
            correct: correct.clone(),
            occurrences: positions.len(),
            positions,
            source: None,
        });
    }

    for claimant in metadata.participants.claimants() {
        correct_name_variants(&mut corrected, claimant, &mut corrections);
    }

    info!(applied = corrections.len(), "pass 2 done");
    PassOutput {
        text: corrected,
        corrections,
    }
}

/// Replace mis-transcribed variants of one claimant name with its canonical
/// metadata form.
fn correct_name_variants(text: &mut String, canonical: &str, corrections: &mut Vec<Correction>) {
    let parts: Vec<&str> = canonical.split_whitespace().collect();
    if parts.len() < 2 {
        return;
    }
    let given = parts[0];
    let family = parts[1..].join(" ");
    let hyphenated_family = family.replace(' ', "-");

    let variants = [
        format!("{family}-{given}"),
        format!("{hyphenated_family}-{given}"),
        format!("{hyphenated_family} {given}"),
        format!("{given} {}", title_case(&family.to_lowercase())),
    ];

    let mut seen: Vec<String> = Vec::new();

    for variant in variants {
        // A variant identical to the canonical form would be a
        // self-replacement; equal variants only need one rewrite.
        if variant == canonical || seen.contains(&variant) {
            continue;
        }
        seen.push(variant.clone());

        // Spans already carrying the canonical casing are left alone: only
        // genuinely mis-transcribed occurrences count.
        let pattern = ci_literal(&variant);
        let positions: Vec<usize> = pattern
            .find_iter(text)
            .filter(|m| m.as_str() != canonical)
            .map(|m| m.start())
            .collect();
        if positions.is_empty() {
            continue;
        }

        *text = pattern
            .replace_all(text, |caps: &Captures| {
                let matched = &caps[0];
                if matched == canonical {
                    matched.to_string()
                } else {
                    canonical.to_string()
                }
            })
            .into_owned();
        debug!(variant = %variant, canonical = %canonical, occurrences = positions.len(), "name variant corrected");
        corrections.push(Correction {
            pass_number: 2,
            kind: CorrectionKind::MetadataName,
            incorrect: variant,
            correct: canonical.to_string(),
            occurrences: positions.len(),
            positions,
            source: Some(METADATA_SOURCE.to_string()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Participants;

    fn dictionary() -> RuleDictionary {
        let mut dictionary = RuleDictionary::default();
        dictionary.insert_rule(RuleCategory::ProperNoun, "Etat", "État");
        dictionary.insert_rule(RuleCategory::ProperNoun, "Michoacan", "Michoacán");
        dictionary.insert_rule(RuleCategory::ProperNoun, "etage", "étage");
        dictionary
    }

    fn metadata_with_claimant(name: &str) -> CaseMetadata {
        CaseMetadata {
            participants: Participants {
                demandeur: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_capitalized_dictionary_form_is_used_verbatim() {
        let output = pass2_proper_nouns("L'Etat a répondu", &dictionary(), &CaseMetadata::default());
        assert_eq!(output.text, "L'État a répondu");
        assert_eq!(output.corrections.len(), 1);
        assert_eq!(output.corrections[0].kind, CorrectionKind::ProperNounAccent);
    }

    #[test]
    fn test_proper_noun_keeps_canonical_casing_even_for_lowercase_match() {
        let output =
            pass2_proper_nouns("vers michoacan hier", &dictionary(), &CaseMetadata::default());
        assert_eq!(output.text, "vers Michoacán hier");
    }

    #[test]
    fn test_lowercase_dictionary_form_mirrors_match_casing() {
        let output = pass2_proper_nouns(
            "ETAGE un, Etage deux, etage trois",
            &dictionary(),
            &CaseMetadata::default(),
        );
        assert_eq!(output.text, "ÉTAGE un, Étage deux, étage trois");
    }

    #[test]
    fn test_family_first_variant_restored_to_canonical() {
        let metadata = metadata_with_claimant("Victoria AGUILAR ROMERO");
        let text = "Madame Aguilar Romero-Victoria est présente";
        let output = pass2_proper_nouns(text, &RuleDictionary::default(), &metadata);

        assert_eq!(output.text, "Madame Victoria AGUILAR ROMERO est présente");
        assert_eq!(output.corrections.len(), 1);
        assert_eq!(output.corrections[0].kind, CorrectionKind::MetadataName);
        assert_eq!(output.corrections[0].source.as_deref(), Some("case-metadata"));
    }

    #[test]
    fn test_hyphenated_variants_restored() {
        let metadata = metadata_with_claimant("Victoria AGUILAR ROMERO");
        let output = pass2_proper_nouns(
            "AGUILAR-ROMERO-Victoria puis AGUILAR-ROMERO Victoria",
            &RuleDictionary::default(),
            &metadata,
        );
        assert_eq!(
            output.text,
            "Victoria AGUILAR ROMERO puis Victoria AGUILAR ROMERO"
        );
        assert_eq!(output.corrections.len(), 2);
    }

    #[test]
    fn test_title_cased_variant_restored() {
        let metadata = metadata_with_claimant("Victoria AGUILAR ROMERO");
        let output = pass2_proper_nouns(
            "Victoria Aguilar Romero témoigne",
            &RuleDictionary::default(),
            &metadata,
        );
        assert_eq!(output.text, "Victoria AGUILAR ROMERO témoigne");
    }

    #[test]
    fn test_canonical_name_is_not_self_replaced() {
        // A claimant whose family name is already title-cased: the fourth
        // variant equals the canonical form and must be skipped.
        let metadata = metadata_with_claimant("Ahmed Hassan");
        let output =
            pass2_proper_nouns("Ahmed Hassan est présent", &RuleDictionary::default(), &metadata);
        assert_eq!(output.text, "Ahmed Hassan est présent");
        assert!(output.corrections.is_empty());
    }

    #[test]
    fn test_single_token_claimant_is_skipped() {
        let metadata = metadata_with_claimant("Victoria");
        let output = pass2_proper_nouns("Victoria", &RuleDictionary::default(), &metadata);
        assert!(output.corrections.is_empty());
    }
}
