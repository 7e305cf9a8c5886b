use std::collections::BTreeMap;

use chrono::Utc;
use tracing::info;

use crate::models::{
    Correction, QualityAssessment, QualityLevel, QualityReport, ReportStatistics, Warning,
};

/// Corrections from these passes weigh double in the score: legal terms and
/// phonetic confusions indicate more severe transcription failures than the
/// cosmetic passes 2 and 3.
const CRITICAL_PASSES: [u8; 2] = [1, 4];

/// Threshold above which an extra review recommendation is appended.
const CRITICAL_CORRECTIONS_ALERT: usize = 10;

/// Pass 6: final quality assessment and report.
///
/// The score measures the defect density of the *input* text: it is computed
/// from the corrections the pipeline had to apply, not from residual defects
/// of the corrected output. A heavily corrected transcript scores low even
/// when its corrected form is now clean; this property is what the
/// auto-optimizer's convergence is defined against.
pub fn pass6_quality(
    original_text: &str,
    corrected_text: &str,
    corrections: &[Correction],
    warnings: Vec<Warning>,
) -> QualityReport {
    let mut by_pass: BTreeMap<u8, usize> = BTreeMap::new();
    let mut by_kind = BTreeMap::new();
    for correction in corrections {
        *by_pass.entry(correction.pass_number).or_default() += 1;
        *by_kind.entry(correction.kind).or_default() += 1;
    }

    let critical: usize = CRITICAL_PASSES
        .iter()
        .map(|p| by_pass.get(p).copied().unwrap_or(0))
        .sum();
    let moderate: usize = [2u8, 3]
        .iter()
        .map(|p| by_pass.get(p).copied().unwrap_or(0))
        .sum();

    let score = (100i64 - 2 * critical as i64 - moderate as i64).clamp(0, 100) as u8;
    let level = QualityLevel::from_score(score);

    let mut recommendations = vec![level.review_recommendation().to_string()];
    if critical > CRITICAL_CORRECTIONS_ALERT {
        recommendations.push(format!(
            "{critical} corrections critiques - vérifier les termes juridiques"
        ));
    }

    let length_before = original_text.chars().count();
    let length_after = corrected_text.chars().count();
    let change_ratio = (length_after as f64 - length_before as f64)
        / (length_before.max(1) as f64)
        * 100.0;
    let change_ratio = (change_ratio * 100.0).round() / 100.0;

    info!(score, ?level, total = corrections.len(), "pass 6 done");

    QualityReport {
        timestamp: Utc::now().to_rfc3339(),
        statistics: ReportStatistics {
            total_corrections: corrections.len(),
            corrections_by_pass: by_pass,
            corrections_by_kind: by_kind,
            text_length_before: length_before,
            text_length_after: length_after,
            change_ratio,
        },
        quality: QualityAssessment {
            score,
            level,
            critical_corrections: critical,
            moderate_corrections: moderate,
        },
        recommendations,
        warnings,
        corrections: corrections.to_vec(),
    }
}
