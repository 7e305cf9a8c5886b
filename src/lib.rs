pub mod gender;
pub mod io;
pub mod models;
pub mod optimizer;
pub mod passes;
pub mod pipeline;
pub mod segmenter;
pub mod textutil;

pub use gender::{detect_gender, Gender, GenderClassifier, NameListClassifier};
pub use io::{
    load_dictionary, load_metadata, load_roster, read_transcript, split_interventions,
    JsonDictionaryStore, StoreError,
};
pub use models::{
    CandidateCorrection, CaseMetadata, CommissionerRoster, Correction, CorrectionKind,
    HearingType, QualityLevel, QualityReport, RuleCategory, RuleDictionary, Severity, Warning,
    WarningKind,
};
pub use optimizer::{
    run_optimizer, DictionaryStore, MemoryStore, OptimizationReport, OptimizationResult,
    OptimizerConfig, OptimizerOutcome,
};
pub use pipeline::{run_pipeline, PipelineOutput};
pub use segmenter::{build_paragraphs, map_speakers, structure_dialogue, Paragraph};
