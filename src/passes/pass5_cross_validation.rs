use tracing::{debug, info, warn};

use crate::models::{
    CaseMetadata, CommissionerRoster, Severity, Warning, WarningKind,
};

/// Pass 5: cross-validation against case metadata.
///
/// Pure, non-mutating consistency checks over the corrected text. Every
/// unmet expectation yields exactly one warning; nothing here ever fails the
/// pipeline.
pub fn pass5_cross_validation(
    text: &str,
    metadata: &CaseMetadata,
    roster: Option<&CommissionerRoster>,
) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let text_upper = text.to_uppercase();

    // File number: exact, case-sensitive presence.
    if let Some(numero) = metadata.dossier.numero.as_deref().filter(|n| !n.is_empty()) {
        if text.contains(numero) {
            debug!(numero, "file number present");
        } else {
            warn!(numero, "file number absent from transcript");
            warnings.push(
                Warning::new(
                    5,
                    WarningKind::MissingFileNumber,
                    Severity::High,
                    format!("Numéro de dossier {numero} absent du texte"),
                )
                .with_related(vec![numero.to_string()]),
            );
        }
    }

    // Panel member: elevated check against the roster cache.
    if let Some(commissaire) = metadata
        .participants
        .commissaire
        .as_deref()
        .filter(|n| !n.is_empty())
    {
        if !text_upper.contains(&commissaire.to_uppercase()) {
            warn!(name = commissaire, "commissioner name absent from transcript");
            warnings.push(
                Warning::new(
                    5,
                    WarningKind::MissingCommissioner,
                    Severity::High,
                    format!("Nom du commissaire '{commissaire}' absent du texte"),
                )
                .with_related(vec![commissaire.to_string()]),
            );
        }

        let hearing_type = metadata.work_order.hearing_type;
        match roster {
            Some(roster) => {
                if roster.validate(commissaire, hearing_type) {
                    debug!(name = commissaire, "commissioner validated against roster");
                } else {
                    let suggestions = roster.suggestions(commissaire);
                    let mut message = format!(
                        "Nom du commissaire '{commissaire}' introuvable dans la liste officielle ({})",
                        hearing_type.code()
                    );
                    if !suggestions.is_empty() {
                        message.push_str(&format!(" - suggestions : {}", suggestions.join(", ")));
                    }
                    warn!(name = commissaire, "commissioner not in official roster");
                    warnings.push(
                        Warning::new(5, WarningKind::CommissionerNotInRoster, Severity::High, message)
                            .with_related(
                                std::iter::once(commissaire.to_string())
                                    .chain(suggestions)
                                    .collect(),
                            ),
                    );
                }
            }
            None => {
                warnings.push(
                    Warning::new(
                        5,
                        WarningKind::CommissionerValidationUnavailable,
                        Severity::Info,
                        format!(
                            "Liste officielle des commissaires non disponible - valider manuellement : {commissaire} ({})",
                            hearing_type.code()
                        ),
                    )
                    .with_related(vec![commissaire.to_string()]),
                );
            }
        }
    }

    // Other participants: case-insensitive presence, one warning per absent
    // name (a multi-claimant field is checked name by name).
    for (role, name) in metadata.participants.secondary_roles() {
        for name in name.split('\n').map(str::trim).filter(|n| !n.is_empty()) {
            if text_upper.contains(&name.to_uppercase()) {
                debug!(role, name, "participant present");
            } else {
                warn!(role, name, "participant absent from transcript");
                warnings.push(
                    Warning::new(
                        5,
                        WarningKind::MissingParticipant,
                        Severity::Medium,
                        format!("{role} '{name}' absent du texte"),
                    )
                    .with_related(vec![role.clone(), name.to_string()]),
                );
            }
        }
    }

    // Hearing date: case-insensitive presence.
    if let Some(date) = metadata.audience.date.as_deref().filter(|d| !d.is_empty()) {
        if text.to_lowercase().contains(&date.to_lowercase()) {
            debug!(date, "hearing date present");
        } else {
            warnings.push(
                Warning::new(
                    5,
                    WarningKind::MissingDate,
                    Severity::Low,
                    format!("Date d'audience '{date}' absente du texte"),
                )
                .with_related(vec![date.to_string()]),
            );
        }
    }

    info!(warnings = warnings.len(), "pass 5 done");
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Audience, Dossier, HearingType, Participants, WorkOrder};
    use std::collections::HashMap;

    fn metadata() -> CaseMetadata {
        CaseMetadata {
            dossier: Dossier {
                numero: Some("MC3-03924".to_string()),
            },
            participants: Participants {
                demandeur: Some("Victoria AGUILAR ROMERO".to_string()),
                commissaire: Some("Marie TREMBLAY".to_string()),
                interprete: None,
                autres: Default::default(),
            },
            audience: Audience {
                date: Some("15 janvier 2026".to_string()),
                ..Default::default()
            },
            work_order: WorkOrder {
                hearing_type: HearingType::Spr,
            },
        }
    }

    fn roster() -> CommissionerRoster {
        let mut members = HashMap::new();
        members.insert("Marie TREMBLAY".to_string(), vec!["SPR".to_string()]);
        CommissionerRoster { members }
    }

    #[test]
    fn test_complete_text_yields_no_warnings() {
        let text = "Dossier MC3-03924, madame Victoria Aguilar Romero, \
                    commissaire Marie Tremblay, audience du 15 janvier 2026";
        let warnings = pass5_cross_validation(text, &metadata(), Some(&roster()));
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn test_missing_file_number_is_high() {
        let text = "madame Victoria Aguilar Romero, commissaire Marie Tremblay, 15 janvier 2026";
        let warnings = pass5_cross_validation(text, &metadata(), Some(&roster()));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::MissingFileNumber);
        assert_eq!(warnings[0].severity, Severity::High);
    }

    #[test]
    fn test_missing_participant_is_medium() {
        let text = "Dossier MC3-03924, commissaire Marie Tremblay, 15 janvier 2026";
        let warnings = pass5_cross_validation(text, &metadata(), Some(&roster()));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::MissingParticipant);
        assert_eq!(warnings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_missing_date_is_low() {
        let text = "Dossier MC3-03924, Victoria Aguilar Romero, Marie Tremblay";
        let warnings = pass5_cross_validation(text, &metadata(), Some(&roster()));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::MissingDate);
        assert_eq!(warnings[0].severity, Severity::Low);
    }

    #[test]
    fn test_absent_roster_degrades_to_info() {
        let text = "Dossier MC3-03924, Victoria Aguilar Romero, Marie Tremblay, 15 janvier 2026";
        let warnings = pass5_cross_validation(text, &metadata(), None);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].kind,
            WarningKind::CommissionerValidationUnavailable
        );
        assert_eq!(warnings[0].severity, Severity::Info);
    }

    #[test]
    fn test_commissioner_rejected_by_roster_is_high() {
        let mut m = metadata();
        m.participants.commissaire = Some("Jeanne TREMBLAY".to_string());
        let text = "Dossier MC3-03924, Victoria Aguilar Romero, Jeanne Tremblay, 15 janvier 2026";
        let warnings = pass5_cross_validation(text, &m, Some(&roster()));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::CommissionerNotInRoster);
        assert_eq!(warnings[0].severity, Severity::High);
        assert!(warnings[0].message.contains("Marie TREMBLAY"));
    }

    #[test]
    fn test_empty_metadata_checks_nothing() {
        let warnings = pass5_cross_validation("texte", &CaseMetadata::default(), None);
        assert!(warnings.is_empty());
    }
}
