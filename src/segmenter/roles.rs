use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::models::HearingType;

/// Role assigned to the most prolix speaker of a single-speaker document.
pub const PRINCIPAL_ROLE: &str = "COMMISSAIRE";

/// Role assigned to residual speakers of a single-speaker document.
pub const GENERIC_ROLE: &str = "AUTRE";

/// Map opaque diarization labels to domain roles.
///
/// `interventions` holds the transcribed text per diarization label. For
/// single-speaker document types the label with the largest character volume
/// becomes the principal role and everything else the generic role. For
/// multi-speaker types, labels ranked by descending volume are assigned the
/// type's fixed role list in order; labels beyond the list get a synthesized
/// `LOCUTEUR_<label>` role. Volume ties break on the label itself so the
/// mapping is deterministic.
pub fn map_speakers(
    interventions: &BTreeMap<String, String>,
    hearing_type: HearingType,
) -> BTreeMap<String, String> {
    if interventions.is_empty() {
        warn!("no speaker interventions to map");
        return BTreeMap::new();
    }

    let mut ranked: Vec<(&String, usize)> = interventions
        .iter()
        .map(|(label, text)| (label, text.chars().count()))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut mapping = BTreeMap::new();

    if hearing_type.is_single_speaker() {
        for (rank, (label, volume)) in ranked.iter().enumerate() {
            let role = if rank == 0 { PRINCIPAL_ROLE } else { GENERIC_ROLE };
            info!(label = %label, role, volume, "speaker mapped");
            mapping.insert((*label).clone(), role.to_string());
        }
    } else {
        let expected = hearing_type.expected_roles();
        for (rank, (label, volume)) in ranked.iter().enumerate() {
            let role = match expected.get(rank) {
                Some(role) => (*role).to_string(),
                None => format!("LOCUTEUR_{label}"),
            };
            info!(label = %label, role = %role, volume, "speaker mapped");
            mapping.insert((*label).clone(), role);
        }
    }

    mapping
}

/// Rewrite upstream speaker markers into role prefixes.
///
/// The speech-to-text collaborators emit `Speaker A:` (and the French
/// spellings) at turn starts; those markers become `"<ROLE> : "` prefixes.
pub fn structure_dialogue(text: &str, mapping: &BTreeMap<String, String>) -> String {
    let mut structured = text.to_string();

    for (label, role) in mapping {
        let replacement = format!("{role} :");
        for marker in [
            format!("Speaker {label}:"),
            format!("Locuteur {label}:"),
            format!("LOCUTEUR {label}:"),
        ] {
            structured = structured.replace(&marker, &replacement);
        }
    }

    structured
}
