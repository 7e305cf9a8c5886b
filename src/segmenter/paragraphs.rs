use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::HearingType;

use super::roles::{GENERIC_ROLE, PRINCIPAL_ROLE};

/// Discourse-transition markers that open a new paragraph.
pub const TRANSITION_MARKERS: &[&str] = &[
    "Donc,",
    "D'abord,",
    "Concernant",
    "Ma décision",
    "Advenant",
    "Vous avez",
    "Vous êtes",
    "On dit",
    "Parmi",
    "J'ai également",
    "J'ai aussi",
    "Tout cela",
    "En ce qui concerne",
    "Pour les raisons",
    "Finalement,",
    "En conclusion,",
    "Une fois",
    "Si vous",
];

/// Enumeration openers that also break paragraphs.
const ENUMERATION_OPENERS: &[&str] = &[
    "Le premier ",
    "Le deuxième ",
    "Le troisième ",
    "Le dernier ",
    "Un des derniers ",
];

/// Soft maximum paragraph length in characters.
const MAX_PARAGRAPH_CHARS: usize = 500;

/// Inline diarization tags (`[A] `) left over by the transcript source.
static SPEAKER_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([A-Z])\]\s*").expect("speaker tag regex"));

/// One output paragraph. `leads_principal` marks paragraphs opening with the
/// principal role prefix; the downstream document formatter uses the flag to
/// decide bold emphasis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub leads_principal: bool,
}

/// Split role-tagged dialogue text into paragraph units.
///
/// Inline diarization tags are stripped first. The walk is line by line: a
/// new paragraph starts on a transition marker, an enumeration opener, a
/// speaker-role prefix, or when the running buffer has grown past the length
/// threshold. Blank lines flush the buffer.
pub fn build_paragraphs(text: &str) -> Vec<Paragraph> {
    let cleaned = SPEAKER_TAG_RE.replace_all(text, "");

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in cleaned.lines() {
        let line = line.trim();
        if line.is_empty() {
            flush(&mut paragraphs, &mut current);
            continue;
        }

        let breaks = starts_with_transition(line)
            || starts_with_enumeration(line)
            || starts_with_role_prefix(line)
            || current.chars().count() > MAX_PARAGRAPH_CHARS;

        if breaks {
            flush(&mut paragraphs, &mut current);
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(line);
    }
    flush(&mut paragraphs, &mut current);

    info!(paragraphs = paragraphs.len(), "paragraphs built");

    paragraphs
        .into_iter()
        .map(|text| {
            let leads_principal = text.starts_with(&format!("{PRINCIPAL_ROLE} :"));
            Paragraph {
                text,
                leads_principal,
            }
        })
        .collect()
}

fn flush(paragraphs: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        paragraphs.push(trimmed.to_string());
    }
    current.clear();
}

fn starts_with_transition(line: &str) -> bool {
    TRANSITION_MARKERS.iter().any(|m| line.starts_with(m))
}

fn starts_with_enumeration(line: &str) -> bool {
    ENUMERATION_OPENERS.iter().any(|m| line.starts_with(m))
}

/// Whether the line opens with a known role prefix (`COMMISSAIRE : ...`),
/// including synthesized overflow roles.
fn starts_with_role_prefix(line: &str) -> bool {
    if line.starts_with("LOCUTEUR_") && line.contains(" :") {
        return true;
    }
    let types = [HearingType::Spr, HearingType::Sar, HearingType::Si, HearingType::Sai];
    types
        .into_iter()
        .flat_map(|t| t.expected_roles().iter().copied())
        .chain([GENERIC_ROLE])
        .any(|role| {
            line.strip_prefix(role)
                .is_some_and(|rest| rest.starts_with(" :"))
        })
}
