pub mod detectors;

pub use detectors::detect_residual_errors;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::gender::GenderClassifier;
use crate::io::StoreError;
use crate::models::{
    CaseMetadata, CommissionerRoster, QualityLevel, QualityReport, RuleDictionary,
};
use crate::pipeline::run_pipeline;

pub const DEFAULT_TARGET_SCORE: u8 = 85;
pub const DEFAULT_MAX_ITERATIONS: usize = 3;

/// Candidates below this confidence are never merged into the dictionary.
pub const MIN_CANDIDATE_CONFIDENCE: f64 = 0.8;

/// Persistence seam for the enriched dictionary.
///
/// The optimizer treats load → enrich → backup → save as one logical
/// transaction but never touches the filesystem itself; implementations own
/// the storage. Concurrent optimizer runs against the same dictionary are
/// unsupported and must be serialized by the caller.
pub trait DictionaryStore {
    /// Preserve the pre-enrichment dictionary before it is replaced.
    fn backup(&mut self, dictionary: &RuleDictionary) -> Result<(), StoreError>;
    /// Persist the enriched dictionary as the new current version.
    fn save(&mut self, dictionary: &RuleDictionary) -> Result<(), StoreError>;
}

/// In-memory store for pure callers and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub backups: Vec<RuleDictionary>,
    pub saved: Option<RuleDictionary>,
}

impl DictionaryStore for MemoryStore {
    fn backup(&mut self, dictionary: &RuleDictionary) -> Result<(), StoreError> {
        self.backups.push(dictionary.clone());
        Ok(())
    }

    fn save(&mut self, dictionary: &RuleDictionary) -> Result<(), StoreError> {
        self.saved = Some(dictionary.clone());
        Ok(())
    }
}

/// Terminal state of the optimization loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerOutcome {
    /// The target score was reached.
    TargetReached,
    /// The iteration budget ran out before the target was reached.
    IterationLimit,
    /// No detectable residual errors, or every candidate was already in the
    /// dictionary.
    NoProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration: usize,
    pub score: u8,
    pub corrections: usize,
    pub level: QualityLevel,
}

/// Score trajectory and outcome of one optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub trajectory: Vec<IterationRecord>,
    pub final_score: u8,
    pub improvement: i32,
    pub iterations: usize,
    pub target_reached: bool,
    pub outcome: OptimizerOutcome,
}

#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    pub target_score: u8,
    pub max_iterations: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            target_score: DEFAULT_TARGET_SCORE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Full result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub report: OptimizationReport,
    /// Corrected text of the last iteration.
    pub final_text: String,
    /// Quality report of the last iteration.
    pub final_quality: QualityReport,
}

/// Iteratively enrich the dictionary until the target score is reached.
///
/// Each iteration re-runs the full pipeline — on the raw input first, then on
/// the previous iteration's corrected output — reads the resulting score, and
/// on a miss mines the corrected text for residual-error candidates.
/// Surviving candidates (confidence ≥ 0.8) are merged conflict-safely into
/// the dictionary, which is backed up and persisted through `store` before
/// the next round. Failing to reach the target is a normal terminal state,
/// not an error; only persistence can fail.
pub fn run_optimizer(
    raw_text: &str,
    metadata: &CaseMetadata,
    dictionary: &mut RuleDictionary,
    roster: Option<&CommissionerRoster>,
    classifier: &dyn GenderClassifier,
    store: &mut dyn DictionaryStore,
    config: &OptimizerConfig,
) -> Result<OptimizationResult, StoreError> {
    let max_iterations = config.max_iterations.max(1);
    let mut current_text = raw_text.to_string();
    let mut trajectory: Vec<IterationRecord> = Vec::new();
    let mut outcome = OptimizerOutcome::IterationLimit;
    let mut final_quality: Option<QualityReport> = None;

    for iteration in 1..=max_iterations {
        info!(iteration, max_iterations, "optimizer iteration");

        let output = run_pipeline(&current_text, metadata, dictionary, roster, classifier);
        let score = output.report.quality.score;
        trajectory.push(IterationRecord {
            iteration,
            score,
            corrections: output.report.statistics.total_corrections,
            level: output.report.quality.level,
        });
        current_text = output.corrected_text;
        final_quality = Some(output.report);

        if score >= config.target_score {
            info!(score, target = config.target_score, "target score reached");
            outcome = OptimizerOutcome::TargetReached;
            break;
        }
        if iteration == max_iterations {
            info!(max_iterations, "iteration limit reached without enrichment");
            outcome = OptimizerOutcome::IterationLimit;
            break;
        }

        let candidates: Vec<_> = detect_residual_errors(&current_text)
            .into_iter()
            .filter(|c| c.confidence >= MIN_CANDIDATE_CONFIDENCE)
            .collect();
        if candidates.is_empty() {
            info!("no residual errors detectable; stopping");
            outcome = OptimizerOutcome::NoProgress;
            break;
        }
        info!(candidates = candidates.len(), "residual-error candidates found");

        let (mut enriched, summary) = dictionary.enrich(&candidates);
        for conflict in &summary.conflicts {
            warn!(
                category = conflict.category.key(),
                key = %conflict.key,
                existing = %conflict.existing,
                proposed = %conflict.proposed,
                "enrichment conflict; existing rule kept"
            );
        }
        if summary.net_additions() == 0 {
            info!("every candidate already present; stopping");
            outcome = OptimizerOutcome::NoProgress;
            break;
        }

        store.backup(dictionary)?;
        enriched.bump_version();
        store.save(&enriched)?;
        info!(
            additions = summary.net_additions(),
            version = %enriched.version,
            "dictionary enriched and persisted"
        );
        *dictionary = enriched;
    }

    let first_score = trajectory.first().map(|r| r.score).unwrap_or(0);
    let final_score = trajectory.last().map(|r| r.score).unwrap_or(0);
    let iterations = trajectory.len();
    let report = OptimizationReport {
        final_score,
        improvement: i32::from(final_score) - i32::from(first_score),
        iterations,
        target_reached: outcome == OptimizerOutcome::TargetReached,
        outcome,
        trajectory,
    };

    info!(
        final_score = report.final_score,
        improvement = report.improvement,
        iterations = report.iterations,
        ?report.outcome,
        "optimization finished"
    );

    Ok(OptimizationResult {
        report,
        final_text: current_text,
        final_quality: final_quality.expect("at least one iteration always runs"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gender::NameListClassifier;
    use crate::models::RuleCategory;

    fn run(
        text: &str,
        dictionary: &mut RuleDictionary,
        config: &OptimizerConfig,
    ) -> (OptimizationResult, MemoryStore) {
        let mut store = MemoryStore::default();
        let result = run_optimizer(
            text,
            &CaseMetadata::default(),
            dictionary,
            None,
            &NameListClassifier::default(),
            &mut store,
            config,
        )
        .unwrap();
        (result, store)
    }

    #[test]
    fn test_clean_text_reaches_target_immediately() {
        let mut dictionary = RuleDictionary::default();
        let (result, store) = run("Un texte propre.", &mut dictionary, &OptimizerConfig::default());

        assert_eq!(result.report.outcome, OptimizerOutcome::TargetReached);
        assert_eq!(result.report.iterations, 1);
        assert_eq!(result.report.final_score, 100);
        assert!(store.backups.is_empty());
        assert!(store.saved.is_none());
    }

    #[test]
    fn test_residual_errors_enrich_and_converge() {
        // Enough pass-1 hits to start below the target, plus one residual
        // error ("en virtu") the dictionary does not cover yet.
        let mut dictionary = RuleDictionary::default();
        for i in 0..8 {
            dictionary.insert_rule(
                RuleCategory::LegalTerm,
                format!("faute{i}"),
                format!("forme{i}"),
            );
        }
        let mut text = String::from("Le demandeur agit en virtu des faits. ");
        for i in 0..8 {
            text.push_str(&format!("Il y a faute{i} au dossier. "));
        }

        let (result, store) = run(&text, &mut dictionary, &OptimizerConfig::default());

        // Iteration 1: 8 critical corrections, score 84 < 85. The detector
        // proposes "en virtu" -> "en vertu", the dictionary grows, and
        // iteration 2 runs on the already-corrected text where only the new
        // rule fires: score 98.
        assert_eq!(result.report.outcome, OptimizerOutcome::TargetReached);
        assert_eq!(result.report.iterations, 2);
        assert_eq!(result.report.trajectory[0].score, 84);
        assert!(result.report.trajectory[1].score >= 85);
        assert!(result.report.improvement > 0);
        assert!(result.final_text.contains("en vertu"));
        assert_eq!(store.backups.len(), 1);
        assert_eq!(
            dictionary.rules(RuleCategory::Misrecognition).get("en virtu"),
            Some(&"en vertu".to_string())
        );
    }

    #[test]
    fn test_version_bumped_on_persist() {
        let mut dictionary = RuleDictionary {
            version: "2.1".to_string(),
            ..Default::default()
        };
        for i in 0..8 {
            dictionary.insert_rule(
                RuleCategory::LegalTerm,
                format!("faute{i}"),
                format!("forme{i}"),
            );
        }
        let mut text = String::from("en virtu des faits. ");
        for i in 0..8 {
            text.push_str(&format!("faute{i}. "));
        }

        let (_result, store) = run(&text, &mut dictionary, &OptimizerConfig::default());

        assert_eq!(dictionary.version, "2.2");
        assert_eq!(store.backups[0].version, "2.1");
        assert_eq!(store.saved.as_ref().unwrap().version, "2.2");
    }

    #[test]
    fn test_no_detectable_errors_is_no_progress() {
        // Below target but nothing the detectors recognize.
        let mut dictionary = RuleDictionary::default();
        for i in 0..10 {
            dictionary.insert_rule(
                RuleCategory::LegalTerm,
                format!("faute{i}"),
                format!("forme{i}"),
            );
        }
        let mut text = String::new();
        for i in 0..10 {
            text.push_str(&format!("Il y a faute{i} au dossier. "));
        }

        let (result, store) = run(&text, &mut dictionary, &OptimizerConfig::default());

        assert_eq!(result.report.outcome, OptimizerOutcome::NoProgress);
        assert_eq!(result.report.iterations, 1);
        assert!(store.saved.is_none());
    }

    #[test]
    fn test_iteration_limit_without_enrichment_on_last_round() {
        let mut dictionary = RuleDictionary::default();
        for i in 0..10 {
            dictionary.insert_rule(
                RuleCategory::LegalTerm,
                format!("faute{i}"),
                format!("forme{i}"),
            );
        }
        let mut text = String::new();
        for i in 0..10 {
            text.push_str(&format!("faute{i}. "));
        }

        let config = OptimizerConfig {
            target_score: 85,
            max_iterations: 1,
        };
        let (result, store) = run(&text, &mut dictionary, &config);

        assert_eq!(result.report.outcome, OptimizerOutcome::IterationLimit);
        assert_eq!(result.report.iterations, 1);
        assert!(!result.report.target_reached);
        // The last iteration never enriches.
        assert!(store.backups.is_empty());
    }

    #[test]
    fn test_conflicting_candidate_is_reported_not_applied() {
        // The dictionary already maps "en virtu" to a different value. The
        // case-sensitive pass 4 leaves "En Virtu" in the text, the detector
        // proposes "en virtu" -> "en vertu", and the merge refuses to
        // overwrite: zero net additions, so the loop stops.
        let mut dictionary = RuleDictionary::default();
        dictionary.insert_rule(RuleCategory::Misrecognition, "en virtu", "en raison");
        for i in 0..8 {
            dictionary.insert_rule(
                RuleCategory::LegalTerm,
                format!("faute{i}"),
                format!("forme{i}"),
            );
        }
        let mut text = String::from("En Virtu des faits. ");
        for i in 0..8 {
            text.push_str(&format!("faute{i}. "));
        }

        let (result, store) = run(&text, &mut dictionary, &OptimizerConfig::default());

        assert_eq!(result.report.outcome, OptimizerOutcome::NoProgress);
        assert!(store.saved.is_none());
        assert_eq!(
            dictionary.rules(RuleCategory::Misrecognition).get("en virtu"),
            Some(&"en raison".to_string())
        );
    }
}
