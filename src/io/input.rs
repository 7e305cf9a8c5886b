use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::models::{CaseMetadata, CommissionerRoster, RuleDictionary};

use super::StoreError;

/// Speaker marker at the start of a transcript line, in the spellings the
/// upstream speech-to-text collaborators emit.
static SPEAKER_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:Speaker|Locuteur|LOCUTEUR)\s+([A-Z]):\s*(.*)$").expect("speaker marker regex")
});

fn read_to_string(path: &Path) -> Result<String, StoreError> {
    std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T, StoreError> {
    serde_json::from_str(content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a raw transcript text file.
pub fn read_transcript(path: &Path) -> Result<String, StoreError> {
    read_to_string(path)
}

/// Load case metadata produced by the external cover-sheet extraction.
pub fn load_metadata(path: &Path) -> Result<CaseMetadata, StoreError> {
    let content = read_to_string(path)?;
    parse_json(path, &content)
}

/// Load the rule dictionary, dropping degenerate rules and logging its
/// version and size the way the surrounding workflow expects.
pub fn load_dictionary(path: &Path) -> Result<RuleDictionary, StoreError> {
    let content = read_to_string(path)?;
    let mut dictionary: RuleDictionary = parse_json(path, &content)?;
    dictionary.sanitize();
    info!(
        path = %path.display(),
        version = %dictionary.version,
        entries = dictionary.total_entries(),
        "dictionary loaded"
    );
    Ok(dictionary)
}

/// Load the optional commissioner roster cache.
pub fn load_roster(path: &Path) -> Result<CommissionerRoster, StoreError> {
    let content = read_to_string(path)?;
    let roster: CommissionerRoster = parse_json(path, &content)?;
    info!(path = %path.display(), members = roster.members.len(), "roster loaded");
    Ok(roster)
}

/// Group transcript text by diarization label.
///
/// Glue for callers that receive a flat transcript: lines opening with a
/// speaker marker accumulate under that label until the next marker. Text
/// before the first marker is ignored.
pub fn split_interventions(text: &str) -> BTreeMap<String, String> {
    let mut interventions: BTreeMap<String, String> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        if let Some(caps) = SPEAKER_MARKER_RE.captures(line.trim()) {
            let label = caps[1].to_string();
            let rest = caps[2].to_string();
            let entry = interventions.entry(label.clone()).or_default();
            if !entry.is_empty() {
                entry.push('\n');
            }
            entry.push_str(&rest);
            current = Some(label);
        } else if let Some(label) = &current {
            let entry = interventions
                .get_mut(label)
                .expect("current label always has an entry");
            entry.push('\n');
            entry.push_str(line);
        }
    }

    interventions
}
