//! The two instruments served by the relay.

use super::bands::{Band, BandTable};
use super::definition::{
    DefinitionError, Factor, Question, QuestionnaireDefinition, QuestionnaireKind, ReportCopy,
    ValueDomain,
};

const ANSWER_DOMAIN: ValueDomain = ValueDomain { min: 0, max: 2 };

const TRAIT_LABELS: [&str; 20] = [
    "Glibness/Charm",
    "Grandiose self",
    "Stimulation need",
    "Pathological lying",
    "Conning/Manipulative",
    "Lack remorse",
    "Shallow affect",
    "Callous/No empathy",
    "Parasitic lifestyle",
    "Poor behavior ctrl",
    "Promiscuous",
    "Early problems",
    "No long-term goals",
    "Impulsivity",
    "Irresponsibility",
    "Fail accept resp",
    "Short relationships",
    "Juvenile delinq",
    "Criminal versatility",
    "Revocation/Repeat",
];

const REACTION_LABELS: [&str; 7] = [
    "Revenge Fantasies",
    "Media Violence",
    "Untraceable Punishment",
    "Power/Control",
    "Accidental Harm",
    "Schadenfreude",
    "Exploiting Weaknesses",
];

pub const INTERPERSONAL_ITEMS: [u8; 8] = [1, 2, 4, 5, 6, 7, 8, 16];
pub const LIFESTYLE_ITEMS: [u8; 12] = [3, 9, 10, 11, 12, 13, 14, 15, 17, 18, 19, 20];

pub fn definition_for(kind: QuestionnaireKind) -> Result<QuestionnaireDefinition, DefinitionError> {
    match kind {
        QuestionnaireKind::TraitInventory => trait_inventory(),
        QuestionnaireKind::Reactions => reactions_inventory(),
    }
}

/// 20-item trait inventory with two factors, max score 40.
pub fn trait_inventory() -> Result<QuestionnaireDefinition, DefinitionError> {
    let bands = BandTable::new(vec![
        Band {
            key: "veryLow",
            lower: 0,
            upper: Some(12),
            title: "Very Low (0-12)",
            marker: "🟢",
            description: "Typical range",
        },
        Band {
            key: "low",
            lower: 13,
            upper: Some(19),
            title: "Some Traits (13-19)",
            marker: "🟡",
            description: "Common in general population",
        },
        Band {
            key: "moderate",
            lower: 20,
            upper: Some(29),
            title: "Moderate (20-29)",
            marker: "🟠",
            description: "Worth self-reflection",
        },
        Band {
            key: "high",
            lower: 30,
            upper: None,
            title: "High (30+)",
            marker: "🔴",
            description: "Strongly elevated",
        },
    ])?;

    let factors = vec![
        Factor {
            key: "factor1",
            short_name: "F1",
            title: "Interpersonal/Affective",
            heading: "FACTOR 1 ANSWERS",
            subtitle: Some("Primary"),
            items: INTERPERSONAL_ITEMS.to_vec(),
        },
        Factor {
            key: "factor2",
            short_name: "F2",
            title: "Lifestyle/Antisocial",
            heading: "FACTOR 2 ANSWERS",
            subtitle: Some("Secondary"),
            items: LIFESTYLE_ITEMS.to_vec(),
        },
    ];

    QuestionnaireDefinition::new(
        QuestionnaireKind::TraitInventory,
        numbered(&TRAIT_LABELS),
        factors,
        ANSWER_DOMAIN,
        bands,
        ReportCopy {
            title: "PCL-R Quiz Submission",
            score_caption: "Total Score",
            contact_subtitle: Some("Optional"),
            disclaimer: "Not a clinical diagnosis",
        },
    )
}

/// 7-item fantasy-tendency inventory without factors, max score 14.
pub fn reactions_inventory() -> Result<QuestionnaireDefinition, DefinitionError> {
    let bands = BandTable::new(vec![
        Band {
            key: "low",
            lower: 0,
            upper: Some(3),
            title: "Low (0-3)",
            marker: "🟢",
            description: "Low tendency",
        },
        Band {
            key: "moderate",
            lower: 4,
            upper: Some(7),
            title: "Moderate (4-7)",
            marker: "🟡",
            description: "Some darker ideas appear",
        },
        Band {
            key: "higher",
            lower: 8,
            upper: Some(11),
            title: "Higher (8-11)",
            marker: "🟠",
            description: "Leans toward control/payback",
        },
        Band {
            key: "veryHigh",
            lower: 12,
            upper: None,
            title: "Very High (12-14)",
            marker: "🔴",
            description: "Strong pull toward power/revenge",
        },
    ])?;

    QuestionnaireDefinition::new(
        QuestionnaireKind::Reactions,
        numbered(&REACTION_LABELS),
        Vec::new(),
        ANSWER_DOMAIN,
        bands,
        ReportCopy {
            title: "Inner Reactions Quiz",
            score_caption: "Score",
            contact_subtitle: None,
            disclaimer: "Not a diagnosis - for self-reflection only",
        },
    )
}

fn numbered(labels: &[&'static str]) -> Vec<Question> {
    labels
        .iter()
        .zip(1u8..)
        .map(|(&label, id)| Question { id, label })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_definitions_are_well_formed() {
        for kind in QuestionnaireKind::ordered() {
            let definition = definition_for(kind).expect("catalog definition validates");
            assert_eq!(definition.kind(), kind);
        }
    }

    #[test]
    fn trait_inventory_shape() {
        let definition = trait_inventory().expect("valid");
        assert_eq!(definition.questions().len(), 20);
        assert_eq!(definition.max_score(), 40);
        let maxima: Vec<u32> = definition
            .factors()
            .iter()
            .map(|factor| definition.factor_max(factor))
            .collect();
        assert_eq!(maxima, vec![16, 24]);
        assert_eq!(definition.label(16), Some("Fail accept resp"));
    }

    #[test]
    fn reactions_inventory_shape() {
        let definition = reactions_inventory().expect("valid");
        assert_eq!(definition.questions().len(), 7);
        assert_eq!(definition.max_score(), 14);
        assert!(!definition.has_factors());
        assert_eq!(definition.label(7), Some("Exploiting Weaknesses"));
    }

    #[test]
    fn every_total_lands_in_exactly_one_band() {
        for kind in QuestionnaireKind::ordered() {
            let definition = definition_for(kind).expect("valid");
            for total in 0..=definition.max_score() {
                let matching = definition
                    .bands()
                    .bands()
                    .iter()
                    .filter(|band| band.contains(total))
                    .count();
                assert_eq!(matching, 1, "{kind:?} total {total}");
            }
        }
    }

    #[test]
    fn band_boundaries_match_published_ranges() {
        let traits = trait_inventory().expect("valid");
        let key = |total| traits.bands().classify(total).expect("band").key;
        assert_eq!(key(0), "veryLow");
        assert_eq!(key(12), "veryLow");
        assert_eq!(key(13), "low");
        assert_eq!(key(19), "low");
        assert_eq!(key(20), "moderate");
        assert_eq!(key(29), "moderate");
        assert_eq!(key(30), "high");
        assert_eq!(key(40), "high");

        let reactions = reactions_inventory().expect("valid");
        let key = |total| reactions.bands().classify(total).expect("band").key;
        assert_eq!(key(3), "low");
        assert_eq!(key(4), "moderate");
        assert_eq!(key(7), "moderate");
        assert_eq!(key(8), "higher");
        assert_eq!(key(11), "higher");
        assert_eq!(key(12), "veryHigh");
        assert_eq!(key(14), "veryHigh");
    }

    #[test]
    fn overlapping_factor_is_rejected() {
        let base = reactions_inventory().expect("valid");
        let factors = vec![
            Factor {
                key: "a",
                short_name: "A",
                title: "A",
                heading: "A",
                subtitle: None,
                items: vec![1, 2, 3, 4],
            },
            Factor {
                key: "b",
                short_name: "B",
                title: "B",
                heading: "B",
                subtitle: None,
                items: vec![4, 5, 6, 7],
            },
        ];
        let err = QuestionnaireDefinition::new(
            QuestionnaireKind::Reactions,
            base.questions().to_vec(),
            factors,
            base.domain(),
            base.bands().clone(),
            base.copy().clone(),
        )
        .expect_err("question 4 is in both factors");
        assert_eq!(err, DefinitionError::OverlappingFactors { id: 4 });
    }

    #[test]
    fn partial_partition_is_rejected() {
        let base = reactions_inventory().expect("valid");
        let factors = vec![Factor {
            key: "a",
            short_name: "A",
            title: "A",
            heading: "A",
            subtitle: None,
            items: vec![1, 2, 3],
        }];
        let err = QuestionnaireDefinition::new(
            QuestionnaireKind::Reactions,
            base.questions().to_vec(),
            factors,
            base.domain(),
            base.bands().clone(),
            base.copy().clone(),
        )
        .expect_err("items 4..=7 uncovered");
        assert_eq!(
            err,
            DefinitionError::IncompletePartition {
                uncovered: vec![4, 5, 6, 7]
            }
        );
    }
}
