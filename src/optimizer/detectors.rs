use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::{CandidateCorrection, RuleCategory};

static ARTICLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\barticle\s+(\d+)\b").expect("article regex"));
static PARAGRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bparagraphe\s+(\d+)\b").expect("paragraph regex"));
static LOWERCASE_LAW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:de|selon|en vertu de)\s+la\s+loi\b").expect("law regex"));
static CARTEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bcartel\s+national\b").expect("cartel regex"));
static MODAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:qu'il|qu'elle|qui)\s+soit\s+(?:être|avoir|faire|démontrer|prouver)\b")
        .expect("modal regex")
});
static MISSING_ACCENT_ETAT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bEtat\b").expect("etat regex"));
static A_RAISON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\ba\s+raison\s+de\b").expect("a raison regex"));
static CONDITIONAL_RETURN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bSi\s+vous\s+(?:reveniez|retourniez)\b").expect("conditional return regex")
});
static EN_VIRTU_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\ben\s+virtu\b").expect("en virtu regex"));

/// Article numbers that are legitimate in this document corpus.
const STANDARD_ARTICLES: [&str; 2] = ["96", "97"];

/// Run the four residual-error detectors over a corrected text.
///
/// Each detector emits candidates with a fixed confidence; filtering against
/// the enrichment threshold is the optimizer's job, not the detectors'.
pub fn detect_residual_errors(text: &str) -> Vec<CandidateCorrection> {
    let mut candidates = Vec::new();
    candidates.extend(detect_malformed_citations(text));
    candidates.extend(detect_homophones(text));
    candidates.extend(detect_missing_accents(text));
    candidates.extend(detect_mistranscribed_expressions(text));
    debug!(candidates = candidates.len(), "residual error detection done");
    candidates
}

/// Malformed legal citations: out-of-range article numbers, `paragraphe 97`
/// missing its `(1)`, and lowercase `la loi` when the statute is cited in
/// full elsewhere.
fn detect_malformed_citations(text: &str) -> Vec<CandidateCorrection> {
    let mut candidates = Vec::new();

    for caps in ARTICLE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let number = &caps[1];
        if !STANDARD_ARTICLES.contains(&number) {
            candidates.push(CandidateCorrection {
                incorrect: whole.as_str().to_string(),
                correct: "article 96".to_string(),
                confidence: 0.95,
                category: RuleCategory::LegalTerm,
                rationale: format!("article {number} hors du cadre attendu (96/97)"),
            });
        }
    }

    for caps in PARAGRAPH_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        // The citation is well formed when a subsection follows immediately.
        if text.as_bytes().get(whole.end()) == Some(&b'(') {
            continue;
        }
        if &caps[1] == "97" {
            candidates.push(CandidateCorrection {
                incorrect: whole.as_str().to_string(),
                correct: "paragraphe 97(1)".to_string(),
                confidence: 0.90,
                category: RuleCategory::LegalTerm,
                rationale: "le paragraphe 97 s'écrit 97(1)".to_string(),
            });
        }
    }

    if text.contains("Loi sur l'Immigration") {
        for m in LOWERCASE_LAW_RE.find_iter(text) {
            candidates.push(CandidateCorrection {
                incorrect: m.as_str().to_string(),
                correct: m.as_str().replace("la loi", "la Loi"),
                confidence: 0.85,
                category: RuleCategory::LegalTerm,
                rationale: "référence législative : la Loi prend la majuscule".to_string(),
            });
        }
    }

    candidates
}

/// Known homophone confusions.
fn detect_homophones(text: &str) -> Vec<CandidateCorrection> {
    let mut candidates = Vec::new();

    if CARTEL_RE.is_match(text) {
        candidates.push(CandidateCorrection {
            incorrect: "cartel national de documentation".to_string(),
            correct: "Cartable national de documentation".to_string(),
            confidence: 0.95,
            category: RuleCategory::ProperNoun,
            rationale: "cartable (classeur) et non cartel".to_string(),
        });
    }

    for m in MODAL_RE.find_iter(text) {
        candidates.push(CandidateCorrection {
            incorrect: m.as_str().to_string(),
            correct: m.as_str().replace(" soit ", " doit "),
            confidence: 0.90,
            category: RuleCategory::ProperNoun,
            rationale: "contexte modal (obligation) : doit".to_string(),
        });
    }

    candidates
}

/// Missing accents on common words.
fn detect_missing_accents(text: &str) -> Vec<CandidateCorrection> {
    let mut candidates = Vec::new();

    if let Some(m) = MISSING_ACCENT_ETAT_RE.find(text) {
        candidates.push(CandidateCorrection {
            incorrect: m.as_str().to_string(),
            correct: "État".to_string(),
            confidence: 0.95,
            category: RuleCategory::ProperNoun,
            rationale: "État prend la majuscule accentuée".to_string(),
        });
    }

    if let Some(m) = A_RAISON_RE.find(text) {
        candidates.push(CandidateCorrection {
            incorrect: m.as_str().to_string(),
            correct: "en raison de".to_string(),
            confidence: 0.95,
            category: RuleCategory::ProperNoun,
            rationale: "expression de causalité : en raison de".to_string(),
        });
    }

    candidates
}

/// Idiomatic expressions the recognizer renders wrong.
fn detect_mistranscribed_expressions(text: &str) -> Vec<CandidateCorrection> {
    let mut candidates = Vec::new();

    if let Some(m) = CONDITIONAL_RETURN_RE.find(text) {
        candidates.push(CandidateCorrection {
            incorrect: m.as_str().to_string(),
            correct: "Advenant votre retour".to_string(),
            confidence: 0.85,
            category: RuleCategory::LegalTerm,
            rationale: "style juridique : advenant (conditionnel formel)".to_string(),
        });
    }

    if EN_VIRTU_RE.is_match(text) {
        candidates.push(CandidateCorrection {
            incorrect: "en virtu".to_string(),
            correct: "en vertu".to_string(),
            confidence: 1.0,
            category: RuleCategory::Misrecognition,
            rationale: "orthographe : en vertu".to_string(),
        });
    }

    candidates
}
