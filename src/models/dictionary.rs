use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::report::CandidateCorrection;

/// Rule categories, one per rewrite pass.
///
/// The category set is closed: the pass-to-category mapping is a static
/// property of the pipeline, not a key looked up by name at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Legal terminology (articles, statutes, fixed legal expressions).
    LegalTerm,
    /// Proper nouns and missing accents.
    ProperNoun,
    /// Grammatical gender agreement (masculine form to feminine form).
    Agreement,
    /// Phonetically misrecognized words, matched case-sensitively.
    Misrecognition,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 4] = [
        RuleCategory::LegalTerm,
        RuleCategory::ProperNoun,
        RuleCategory::Agreement,
        RuleCategory::Misrecognition,
    ];

    /// Wire key used in the persisted dictionary JSON.
    pub fn key(self) -> &'static str {
        match self {
            RuleCategory::LegalTerm => "pass1_termes_juridiques",
            RuleCategory::ProperNoun => "pass2_noms_propres_accents",
            RuleCategory::Agreement => "pass3_accords_grammaticaux",
            RuleCategory::Misrecognition => "pass4_mots_mal_reconnus",
        }
    }

    /// Number of the pass that consumes this category.
    pub fn pass_number(self) -> u8 {
        match self {
            RuleCategory::LegalTerm => 1,
            RuleCategory::ProperNoun => 2,
            RuleCategory::Agreement => 3,
            RuleCategory::Misrecognition => 4,
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Versioned table of incorrect-to-correct text fragments, partitioned by
/// pass category.
///
/// Rules iterate in deterministic (lexicographic) key order. Two rules whose
/// match spans overlap are an unsupported dictionary configuration: whichever
/// applies first wins, and no conflict resolution is attempted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDictionary {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(rename = "pass1_termes_juridiques", default)]
    pub(crate) legal_terms: BTreeMap<String, String>,
    #[serde(rename = "pass2_noms_propres_accents", default)]
    pub(crate) proper_nouns: BTreeMap<String, String>,
    #[serde(rename = "pass3_accords_grammaticaux", default)]
    pub(crate) agreement: BTreeMap<String, String>,
    #[serde(rename = "pass4_mots_mal_reconnus", default)]
    pub(crate) misrecognized: BTreeMap<String, String>,
}

impl Default for RuleDictionary {
    fn default() -> Self {
        Self {
            version: default_version(),
            legal_terms: BTreeMap::new(),
            proper_nouns: BTreeMap::new(),
            agreement: BTreeMap::new(),
            misrecognized: BTreeMap::new(),
        }
    }
}

/// Outcome of merging one candidate into the dictionary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleConflict {
    pub category: RuleCategory,
    pub key: String,
    pub existing: String,
    pub proposed: String,
}

/// Accounting for one enrichment transaction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichmentSummary {
    /// Net additions per category wire key.
    pub added_by_category: BTreeMap<&'static str, usize>,
    /// Candidates whose key already existed with a different value; reported,
    /// never applied.
    pub conflicts: Vec<RuleConflict>,
    /// Candidates whose key already existed with the identical value.
    pub duplicates_skipped: usize,
}

impl EnrichmentSummary {
    pub fn net_additions(&self) -> usize {
        self.added_by_category.values().sum()
    }
}

impl RuleDictionary {
    /// Rules of one category, in deterministic iteration order.
    pub fn rules(&self, category: RuleCategory) -> &BTreeMap<String, String> {
        match category {
            RuleCategory::LegalTerm => &self.legal_terms,
            RuleCategory::ProperNoun => &self.proper_nouns,
            RuleCategory::Agreement => &self.agreement,
            RuleCategory::Misrecognition => &self.misrecognized,
        }
    }

    fn rules_mut(&mut self, category: RuleCategory) -> &mut BTreeMap<String, String> {
        match category {
            RuleCategory::LegalTerm => &mut self.legal_terms,
            RuleCategory::ProperNoun => &mut self.proper_nouns,
            RuleCategory::Agreement => &mut self.agreement,
            RuleCategory::Misrecognition => &mut self.misrecognized,
        }
    }

    /// Insert a rule directly, bypassing enrichment accounting. Intended for
    /// construction in callers and tests; a key equal to its value is
    /// rejected.
    pub fn insert_rule(
        &mut self,
        category: RuleCategory,
        incorrect: impl Into<String>,
        correct: impl Into<String>,
    ) {
        let incorrect = incorrect.into();
        let correct = correct.into();
        if incorrect == correct {
            warn!(key = %incorrect, "rule maps a fragment to itself; dropped");
            return;
        }
        self.rules_mut(category).insert(incorrect, correct);
    }

    pub fn total_entries(&self) -> usize {
        RuleCategory::ALL
            .iter()
            .map(|&c| self.rules(c).len())
            .sum()
    }

    /// Drop rules that map a key to itself. Invoked after loading an external
    /// dictionary file.
    pub fn sanitize(&mut self) {
        for category in RuleCategory::ALL {
            let degenerate: Vec<String> = self
                .rules(category)
                .iter()
                .filter(|(k, v)| k == v)
                .map(|(k, _)| k.clone())
                .collect();
            for key in degenerate {
                warn!(category = category.key(), %key, "dropping self-mapping rule");
                self.rules_mut(category).remove(&key);
            }
        }
    }

    /// Merge candidate corrections into a new dictionary value.
    ///
    /// Pure transaction: `self` is left untouched and the enriched copy is
    /// returned together with the merge accounting. Existing keys are never
    /// overwritten; a candidate that collides with a different value is
    /// reported as a conflict and not applied.
    pub fn enrich(&self, candidates: &[CandidateCorrection]) -> (RuleDictionary, EnrichmentSummary) {
        let mut enriched = self.clone();
        let mut summary = EnrichmentSummary::default();

        for candidate in candidates {
            if candidate.incorrect == candidate.correct {
                warn!(key = %candidate.incorrect, "candidate maps a fragment to itself; dropped");
                continue;
            }
            let rules = enriched.rules_mut(candidate.category);
            match rules.get(&candidate.incorrect) {
                None => {
                    rules.insert(candidate.incorrect.clone(), candidate.correct.clone());
                    *summary
                        .added_by_category
                        .entry(candidate.category.key())
                        .or_default() += 1;
                }
                Some(existing) if *existing == candidate.correct => {
                    summary.duplicates_skipped += 1;
                }
                Some(existing) => {
                    summary.conflicts.push(RuleConflict {
                        category: candidate.category,
                        key: candidate.incorrect.clone(),
                        existing: existing.clone(),
                        proposed: candidate.correct.clone(),
                    });
                }
            }
        }

        (enriched, summary)
    }

    /// Increment the last dotted component of the version string
    /// (`"2.1"` becomes `"2.2"`). A non-numeric component leaves the version
    /// unchanged.
    pub fn bump_version(&mut self) {
        let mut parts: Vec<String> = self.version.split('.').map(str::to_string).collect();
        match parts.last().and_then(|p| p.parse::<u32>().ok()) {
            Some(minor) => {
                if let Some(last) = parts.last_mut() {
                    *last = (minor + 1).to_string();
                }
                self.version = parts.join(".");
            }
            None => {
                warn!(version = %self.version, "version is not dotted-numeric; left unchanged");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(category: RuleCategory, incorrect: &str, correct: &str) -> CandidateCorrection {
        CandidateCorrection {
            incorrect: incorrect.to_string(),
            correct: correct.to_string(),
            confidence: 0.9,
            category,
            rationale: String::new(),
        }
    }

    #[test]
    fn test_enrich_adds_new_rules() {
        let dictionary = RuleDictionary::default();
        let candidates = vec![candidate(RuleCategory::LegalTerm, "en virtu", "en vertu")];

        let (enriched, summary) = dictionary.enrich(&candidates);

        assert_eq!(summary.net_additions(), 1);
        assert_eq!(
            enriched.rules(RuleCategory::LegalTerm).get("en virtu"),
            Some(&"en vertu".to_string())
        );
        // The original value is untouched.
        assert!(dictionary.rules(RuleCategory::LegalTerm).is_empty());
    }

    #[test]
    fn test_enrich_conflicting_key_is_reported_not_applied() {
        let mut dictionary = RuleDictionary::default();
        dictionary.insert_rule(RuleCategory::LegalTerm, "article 87", "article 96");
        let candidates = vec![candidate(RuleCategory::LegalTerm, "article 87", "article 97")];

        let (enriched, summary) = dictionary.enrich(&candidates);

        assert_eq!(summary.net_additions(), 0);
        assert_eq!(summary.conflicts.len(), 1);
        assert_eq!(summary.conflicts[0].existing, "article 96");
        assert_eq!(summary.conflicts[0].proposed, "article 97");
        assert_eq!(
            enriched.rules(RuleCategory::LegalTerm).get("article 87"),
            Some(&"article 96".to_string())
        );
    }

    #[test]
    fn test_enrich_identical_duplicate_adds_nothing() {
        let mut dictionary = RuleDictionary::default();
        dictionary.insert_rule(RuleCategory::LegalTerm, "en virtu", "en vertu");
        let candidates = vec![candidate(RuleCategory::LegalTerm, "en virtu", "en vertu")];

        let (enriched, summary) = dictionary.enrich(&candidates);

        assert_eq!(summary.net_additions(), 0);
        assert_eq!(summary.duplicates_skipped, 1);
        assert!(summary.conflicts.is_empty());
        assert_eq!(enriched.total_entries(), 1);
    }

    #[test]
    fn test_bump_version() {
        let mut dictionary = RuleDictionary {
            version: "2.1".to_string(),
            ..Default::default()
        };
        dictionary.bump_version();
        assert_eq!(dictionary.version, "2.2");

        dictionary.version = "1.9".to_string();
        dictionary.bump_version();
        assert_eq!(dictionary.version, "1.10");
    }

    #[test]
    fn test_wire_format_round_trip() {
        let json = r#"{
            "version": "2.1",
            "pass1_termes_juridiques": {"article 87": "article 96"},
            "pass2_noms_propres_accents": {"Etat": "État"},
            "pass3_accords_grammaticaux": {},
            "pass4_mots_mal_reconnus": {"Créait": "Vous craignez"}
        }"#;

        let dictionary: RuleDictionary = serde_json::from_str(json).unwrap();
        assert_eq!(dictionary.version, "2.1");
        assert_eq!(dictionary.total_entries(), 3);

        let encoded = serde_json::to_string(&dictionary).unwrap();
        assert!(encoded.contains("pass1_termes_juridiques"));
        assert!(encoded.contains("pass4_mots_mal_reconnus"));
    }

    #[test]
    fn test_missing_version_defaults() {
        let dictionary: RuleDictionary = serde_json::from_str("{}").unwrap();
        assert_eq!(dictionary.version, "1.0");
        assert_eq!(dictionary.total_entries(), 0);
    }

    #[test]
    fn test_sanitize_drops_self_mapping() {
        let json = r#"{"pass1_termes_juridiques": {"article 96": "article 96", "en virtu": "en vertu"}}"#;
        let mut dictionary: RuleDictionary = serde_json::from_str(json).unwrap();
        dictionary.sanitize();
        assert_eq!(dictionary.total_entries(), 1);
        assert!(dictionary.rules(RuleCategory::LegalTerm).contains_key("en virtu"));
    }
}
