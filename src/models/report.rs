use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::dictionary::RuleCategory;

/// What kind of rewrite produced a correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionKind {
    LegalTerm,
    ProperNounAccent,
    MetadataName,
    GenderAgreement,
    Misrecognized,
}

/// One applied rewrite rule, immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub pass_number: u8,
    pub kind: CorrectionKind,
    pub incorrect: String,
    pub correct: String,
    pub occurrences: usize,
    /// Match start offsets in the text as it stood when the rule ran. Empty
    /// for literal replacements where positions are not tracked.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<usize>,
    /// Provenance for corrections not driven by the dictionary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Severity tier for cross-validation warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    MissingFileNumber,
    MissingCommissioner,
    CommissionerNotInRoster,
    CommissionerValidationUnavailable,
    MissingParticipant,
    MissingDate,
    EmptyRuleCategory,
}

/// Informational finding; never fails the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub pass_number: u8,
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
    /// Metadata fields or values the warning relates to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
}

impl Warning {
    pub fn new(
        pass_number: u8,
        kind: WarningKind,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            pass_number,
            kind,
            severity,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub fn with_related(mut self, related: Vec<String>) -> Self {
        self.related = related;
        self
    }
}

/// Quality tier derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityLevel {
    Excellent,
    Good,
    Fair,
    Insufficient,
}

impl QualityLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => QualityLevel::Excellent,
            70..=84 => QualityLevel::Good,
            50..=69 => QualityLevel::Fair,
            _ => QualityLevel::Insufficient,
        }
    }

    /// Fixed human-review-time recommendation for this tier.
    pub fn review_recommendation(self) -> &'static str {
        match self {
            QualityLevel::Excellent => "Qualité EXCELLENTE : Spot-check seulement (5-10 min)",
            QualityLevel::Good => "Qualité BONNE : Révision rapide (15-20 min)",
            QualityLevel::Fair => "Qualité PASSABLE : Révision approfondie (30-40 min)",
            QualityLevel::Insufficient => {
                "Qualité INSUFFISANTE : Révision manuelle complète requise"
            }
        }
    }
}

/// Aggregate counts over one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStatistics {
    pub total_corrections: usize,
    pub corrections_by_pass: BTreeMap<u8, usize>,
    pub corrections_by_kind: BTreeMap<CorrectionKind, usize>,
    /// Character counts, not bytes.
    pub text_length_before: usize,
    pub text_length_after: usize,
    /// Relative length change in percent, rounded to two decimals.
    pub change_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub score: u8,
    pub level: QualityLevel,
    /// Pass 1 + Pass 4 correction count (severe transcription failures).
    pub critical_corrections: usize,
    /// Pass 2 + Pass 3 correction count (cosmetic and grammatical).
    pub moderate_corrections: usize,
}

/// Per-run quality report, produced once by Pass 6 and immutable thereafter.
///
/// The score characterizes the defect density of the *input* text (how much
/// correction it needed), not the residual defects of the corrected output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub timestamp: String,
    pub statistics: ReportStatistics,
    pub quality: QualityAssessment,
    pub recommendations: Vec<String>,
    pub warnings: Vec<Warning>,
    pub corrections: Vec<Correction>,
}

/// Auto-detected correction proposal, gated on confidence before it may
/// enrich the dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateCorrection {
    pub incorrect: String,
    pub correct: String,
    pub confidence: f64,
    pub category: RuleCategory,
    pub rationale: String,
}
