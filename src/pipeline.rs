use tracing::info;

use crate::gender::GenderClassifier;
use crate::models::{
    CaseMetadata, CommissionerRoster, QualityReport, RuleCategory, RuleDictionary, Severity,
    Warning, WarningKind,
};
use crate::passes::{
    pass1_legal_terms, pass2_proper_nouns, pass3_agreement, pass4_misrecognized,
    pass5_cross_validation, pass6_quality,
};

/// Result of one full pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub corrected_text: String,
    pub report: QualityReport,
}

/// Run the full correction pipeline, passes 1 through 6.
///
/// The passes are threaded as an explicit fold: each rewrite pass is a pure
/// function of the previous pass's text plus the shared read-only dictionary
/// and metadata, and corrections accumulate across the run. No I/O happens
/// here; the caller owns loading and persistence.
pub fn run_pipeline(
    raw_text: &str,
    metadata: &CaseMetadata,
    dictionary: &RuleDictionary,
    roster: Option<&CommissionerRoster>,
    classifier: &dyn GenderClassifier,
) -> PipelineOutput {
    info!(
        chars = raw_text.chars().count(),
        dictionary_entries = dictionary.total_entries(),
        dictionary_version = %dictionary.version,
        "starting correction pipeline"
    );

    let mut warnings = empty_category_warnings(dictionary);
    let mut corrections = Vec::new();

    let pass1 = pass1_legal_terms(raw_text, dictionary);
    corrections.extend(pass1.corrections);

    let pass2 = pass2_proper_nouns(&pass1.text, dictionary, metadata);
    corrections.extend(pass2.corrections);

    let pass3 = pass3_agreement(&pass2.text, dictionary, metadata, classifier);
    corrections.extend(pass3.corrections);

    let pass4 = pass4_misrecognized(&pass3.text, dictionary);
    corrections.extend(pass4.corrections);

    warnings.extend(pass5_cross_validation(&pass4.text, metadata, roster));

    let report = pass6_quality(raw_text, &pass4.text, &corrections, warnings);

    info!(
        corrections = report.statistics.total_corrections,
        warnings = report.warnings.len(),
        score = report.quality.score,
        "correction pipeline finished"
    );

    PipelineOutput {
        corrected_text: pass4.text,
        report,
    }
}

/// Degraded-data warnings for empty rule categories. Never fatal: the
/// affected pass simply applies nothing.
fn empty_category_warnings(dictionary: &RuleDictionary) -> Vec<Warning> {
    RuleCategory::ALL
        .iter()
        .filter(|&&category| dictionary.rules(category).is_empty())
        .map(|&category| {
            Warning::new(
                category.pass_number(),
                WarningKind::EmptyRuleCategory,
                Severity::Info,
                format!(
                    "Catégorie '{}' vide - pass {} sans effet",
                    category.key(),
                    category.pass_number()
                ),
            )
            .with_related(vec![category.key().to_string()])
        })
        .collect()
}
