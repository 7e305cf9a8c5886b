pub mod pass1_legal_terms;
pub mod pass2_proper_nouns;
pub mod pass3_agreement;
pub mod pass4_misrecognized;
pub mod pass5_cross_validation;
pub mod pass6_quality;

pub use pass1_legal_terms::*;
pub use pass2_proper_nouns::*;
pub use pass3_agreement::*;
pub use pass4_misrecognized::*;
pub use pass5_cross_validation::*;
pub use pass6_quality::*;

use regex::Regex;

use crate::models::Correction;

/// Output of one rewrite pass: the new text plus the corrections it applied.
#[derive(Debug, Clone)]
pub struct PassOutput {
    pub text: String,
    pub corrections: Vec<Correction>,
}

impl PassOutput {
    pub fn unchanged(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            corrections: Vec::new(),
        }
    }
}

/// Case-insensitive matcher for a literal fragment.
pub(crate) fn ci_literal(fragment: &str) -> Regex {
    Regex::new(&format!("(?i){}", regex::escape(fragment))).expect("escaped literal pattern")
}

/// Case-insensitive whole-word matcher for a literal fragment.
pub(crate) fn ci_word(fragment: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(fragment)))
        .expect("escaped word-boundary pattern")
}
