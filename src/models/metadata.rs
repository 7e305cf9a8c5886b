use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Hearing section types.
///
/// SPR hearings are rendered as a single-speaker document (the panel
/// member's reasons); the other sections are multi-speaker dialogues with a
/// fixed expected cast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HearingType {
    /// Refugee protection division.
    #[default]
    Spr,
    /// Refugee appeal division.
    Sar,
    /// Immigration division.
    Si,
    /// Immigration appeal division.
    Sai,
}

impl HearingType {
    /// Section code as it appears in work orders and the roster cache.
    pub fn code(self) -> &'static str {
        match self {
            HearingType::Spr => "SPR",
            HearingType::Sar => "SAR",
            HearingType::Si => "SI",
            HearingType::Sai => "SAI",
        }
    }

    /// Ordered role list for multi-speaker sections, most prolix speaker
    /// first.
    pub fn expected_roles(self) -> &'static [&'static str] {
        match self {
            HearingType::Spr => &["COMMISSAIRE"],
            HearingType::Sar => &[
                "COMMISSAIRE",
                "DEMANDEUR D'ASILE",
                "CONSEIL",
                "INTERPRÈTE",
                "REPRÉSENTANT DU MINISTRE",
            ],
            HearingType::Si => &[
                "COMMISSAIRE",
                "PERSONNE CONCERNÉE",
                "CONSEIL",
                "REPRÉSENTANT DU MINISTRE",
                "INTERPRÈTE",
            ],
            HearingType::Sai => &[
                "COMMISSAIRE",
                "APPELANT",
                "CONSEIL DE L'APPELANT",
                "REPRÉSENTANT DU MINISTRE",
                "INTERPRÈTE",
            ],
        }
    }

    /// Whether the rendered document carries a single principal speaker.
    pub fn is_single_speaker(self) -> bool {
        matches!(self, HearingType::Spr)
    }
}

/// Case file identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dossier {
    #[serde(default)]
    pub numero: Option<String>,
}

/// Participant names by role. Unknown roles (counsel variants, ministry
/// representatives) are captured in `autres`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participants {
    #[serde(default)]
    pub demandeur: Option<String>,
    #[serde(default)]
    pub commissaire: Option<String>,
    #[serde(default)]
    pub interprete: Option<String>,
    #[serde(flatten)]
    pub autres: BTreeMap<String, String>,
}

impl Participants {
    /// Claimant name lines; multiple claimants are newline-delimited in the
    /// source metadata.
    pub fn claimants(&self) -> Vec<&str> {
        self.demandeur
            .as_deref()
            .map(|names| {
                names
                    .split('\n')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All non-empty (role, name) pairs except the panel member, who gets a
    /// dedicated elevated check.
    pub fn secondary_roles(&self) -> Vec<(String, &str)> {
        let mut roles = Vec::new();
        if let Some(name) = self.demandeur.as_deref().filter(|n| !n.is_empty()) {
            roles.push(("demandeur".to_string(), name));
        }
        if let Some(name) = self.interprete.as_deref().filter(|n| !n.is_empty()) {
            roles.push(("interprete".to_string(), name));
        }
        for (role, name) in &self.autres {
            if !name.is_empty() {
                roles.push((role.clone(), name.as_str()));
            }
        }
        roles
    }
}

/// Hearing session facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Audience {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub lieu: Option<String>,
    #[serde(default)]
    pub date_decision: Option<String>,
}

/// Work-order facts relevant to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    #[serde(rename = "type", default)]
    pub hearing_type: HearingType,
}

/// Structured facts about one case, produced by an external cover-sheet
/// extraction step. Read-only input; every field degrades gracefully when
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseMetadata {
    #[serde(default)]
    pub dossier: Dossier,
    #[serde(default)]
    pub participants: Participants,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default)]
    pub work_order: WorkOrder,
}

/// Externally maintained roster of valid panel member names.
///
/// Keys are member names; values list the section codes the member sits on
/// (an empty list means all sections). Lookup is case-insensitive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommissionerRoster {
    pub members: HashMap<String, Vec<String>>,
}

impl CommissionerRoster {
    fn normalize(name: &str) -> String {
        name.trim().to_uppercase()
    }

    /// Whether `name` is a roster member valid for the given section.
    pub fn validate(&self, name: &str, hearing_type: HearingType) -> bool {
        let wanted = Self::normalize(name);
        self.members.iter().any(|(member, sections)| {
            Self::normalize(member) == wanted
                && (sections.is_empty() || sections.iter().any(|s| s == hearing_type.code()))
        })
    }

    /// Roster names sharing a name token with the query, for manual review
    /// hints. Tokens shorter than three characters are ignored.
    pub fn suggestions(&self, name: &str) -> Vec<String> {
        let query = Self::normalize(name);
        let tokens: Vec<&str> = query
            .split_whitespace()
            .filter(|t| t.chars().count() >= 3)
            .collect();
        let mut matches: Vec<String> = self
            .members
            .keys()
            .filter(|member| {
                let normalized = Self::normalize(member);
                normalized != query
                    && tokens
                        .iter()
                        .any(|t| normalized.split_whitespace().any(|m| m == *t))
            })
            .cloned()
            .collect();
        matches.sort();
        matches.truncate(3);
        matches
    }
}
