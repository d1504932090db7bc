//! Ten edge-case detectors over the aggregated state.
//!
//! Each detector is independent of the others except
//! [`EdgeCase::UnresolvedAmbiguity`], which counts how many of the other nine
//! fired and therefore runs last. A detected case carries a restriction on how
//! the profile may be interpreted and the evidence that would resolve it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{GateConfig, SelectionConfig};
use crate::model::Dimension;
use crate::scoring::dimension::DimensionComposite;
use crate::scoring::gate::GateDecision;
use crate::scoring::signature::Signature;
use crate::scoring::validity::ValidityResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeCase {
    ExpensiveStrength,
    SuppressedGrounding,
    PerfectSelfReport,
    ContradictoryResponses,
    FlatProfile,
    MissingReflection,
    PartialCompletion,
    ExtremePolarization,
    HighLoadInterference,
    UnresolvedAmbiguity,
}

impl EdgeCase {
    pub const ALL: [EdgeCase; 10] = [
        Self::ExpensiveStrength,
        Self::SuppressedGrounding,
        Self::PerfectSelfReport,
        Self::ContradictoryResponses,
        Self::FlatProfile,
        Self::MissingReflection,
        Self::PartialCompletion,
        Self::ExtremePolarization,
        Self::HighLoadInterference,
        Self::UnresolvedAmbiguity,
    ];

    pub fn restriction(self) -> &'static str {
        match self {
            Self::ExpensiveStrength => {
                "Add cost language to the signature description. The strength is real but expensive under load."
            }
            Self::SuppressedGrounding => {
                "Treat the grounding dimension as a priority regardless of Net Energy. Other scores may be inflated without grounding."
            }
            Self::PerfectSelfReport => {
                "Suppress archetype language. Use hypothesis framing only."
            }
            Self::ContradictoryResponses => {
                "Use directional language. Response patterns suggest context-specific differences."
            }
            Self::FlatProfile => {
                "Suppress the archetype. Report an undifferentiated profile and orient on access scores."
            }
            Self::MissingReflection => {
                "Cap confidence at moderate. Suppress reflection-dependent coaching prompts."
            }
            Self::PartialCompletion => {
                "Label results as preliminary and suppress specific predictions."
            }
            Self::ExtremePolarization => {
                "Note single-dimension dominance. The second dimension may not be a true strength."
            }
            Self::HighLoadInterference => {
                "Distortion may be amplifying noise. Prioritize stabilization before interpreting patterns."
            }
            Self::UnresolvedAmbiguity => {
                "Multiple conflicting signals. Use preliminary framing for all outputs."
            }
        }
    }

    pub fn required_next_evidence(self) -> &'static str {
        match self {
            Self::ExpensiveStrength => {
                "Retest after load reduction to see whether distortion drops while capacity holds."
            }
            Self::SuppressedGrounding => {
                "Coach debrief focused on grounding access and body awareness."
            }
            Self::PerfectSelfReport => "Mini-interview or 360 feedback to validate the self-report.",
            Self::ContradictoryResponses => {
                "Retest or coach debrief to explore work versus life splits."
            }
            Self::FlatProfile => {
                "Retest after intentional reflection, or a coach debrief to explore priorities."
            }
            Self::MissingReflection => "Complete the reflection prompts.",
            Self::PartialCompletion => "Complete the remaining sections.",
            Self::ExtremePolarization => {
                "Retest or debrief to confirm whether the second dimension is resourced."
            }
            Self::HighLoadInterference => {
                "Retest after four to six weeks of stabilization practice."
            }
            Self::UnresolvedAmbiguity => "45-minute coach debrief to resolve the ambiguity.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeCaseResult {
    pub case: EdgeCase,
    pub detected: bool,
    /// Present only when detected.
    pub restriction: Option<String>,
    pub required_next_evidence: Option<String>,
}

impl EdgeCaseResult {
    fn new(case: EdgeCase, detected: bool) -> Self {
        Self {
            case,
            detected,
            restriction: detected.then(|| case.restriction().to_string()),
            required_next_evidence: detected.then(|| case.required_next_evidence().to_string()),
        }
    }
}

/// Everything the detectors read.
#[derive(Debug, Clone, Copy)]
pub struct EdgeCaseInputs<'a> {
    pub dimensions: &'a BTreeMap<Dimension, DimensionComposite>,
    pub validity: &'a ValidityResult,
    pub reflections_answered: usize,
    pub signature: Option<&'a Signature>,
    pub gate: &'a GateDecision,
    pub efficiency_ratio: Option<f64>,
}

fn shine(dimensions: &BTreeMap<Dimension, DimensionComposite>, d: Dimension) -> Option<f64> {
    dimensions.get(&d).and_then(|c| c.shine_0_4)
}

fn expensive_strength(inputs: &EdgeCaseInputs<'_>, cfg: &SelectionConfig) -> bool {
    let Some(sig) = inputs.signature else {
        return false;
    };
    [sig.top1, sig.top2].iter().any(|d| {
        inputs.dimensions.get(d).is_some_and(|c| {
            matches!((c.shine_0_4, c.eclipse_0_4), (Some(s), Some(e))
                if s >= cfg.expensive_strength_shine && e >= cfg.expensive_strength_eclipse)
        })
    })
}

fn suppressed_grounding(inputs: &EdgeCaseInputs<'_>, cfg: &SelectionConfig) -> bool {
    let Some(grounding) = shine(inputs.dimensions, Dimension::GROUNDING) else {
        return false;
    };
    let others_high = Dimension::ALL
        .into_iter()
        .filter(|&d| d != Dimension::GROUNDING)
        .filter(|&d| {
            shine(inputs.dimensions, d).is_some_and(|s| s >= cfg.suppressed_grounding_other_shine)
        })
        .count();
    grounding < cfg.suppressed_grounding_shine && others_high >= cfg.suppressed_grounding_other_count
}

fn perfect_self_report(inputs: &EdgeCaseInputs<'_>, cfg: &SelectionConfig) -> bool {
    inputs.validity.social_desirability.extreme
        && Dimension::ALL
            .into_iter()
            .all(|d| shine(inputs.dimensions, d).is_some_and(|s| s >= cfg.perfect_report_shine))
}

fn extreme_polarization(inputs: &EdgeCaseInputs<'_>, cfg: &SelectionConfig) -> bool {
    let Some(sig) = inputs.signature else {
        return false;
    };
    let ne = |d: Dimension| inputs.dimensions.get(&d).and_then(|c| c.net_energy_0_100);
    matches!((ne(sig.top1), ne(sig.top2)), (Some(a), Some(b))
        if a > cfg.polarization_top && b < cfg.polarization_second)
}

fn high_load_interference(inputs: &EdgeCaseInputs<'_>, gate_cfg: &GateConfig) -> bool {
    inputs.gate.is_stabilize()
        && (inputs.validity.social_desirability.elevated
            || inputs.validity.inconsistency.flag
            || inputs
                .efficiency_ratio
                .is_some_and(|r| r < gate_cfg.efficiency_burnout))
}

/// All ten results, in [`EdgeCase::ALL`] order.
pub fn detect_edge_cases(
    inputs: &EdgeCaseInputs<'_>,
    cfg: &SelectionConfig,
    gate_cfg: &GateConfig,
) -> Vec<EdgeCaseResult> {
    let mut results = vec![
        EdgeCaseResult::new(EdgeCase::ExpensiveStrength, expensive_strength(inputs, cfg)),
        EdgeCaseResult::new(EdgeCase::SuppressedGrounding, suppressed_grounding(inputs, cfg)),
        EdgeCaseResult::new(EdgeCase::PerfectSelfReport, perfect_self_report(inputs, cfg)),
        EdgeCaseResult::new(
            EdgeCase::ContradictoryResponses,
            inputs.validity.inconsistency.flag,
        ),
        EdgeCaseResult::new(
            EdgeCase::FlatProfile,
            inputs.signature.is_some_and(|s| s.flat_profile),
        ),
        EdgeCaseResult::new(EdgeCase::MissingReflection, inputs.reflections_answered == 0),
        EdgeCaseResult::new(EdgeCase::PartialCompletion, inputs.validity.missingness.flag),
        EdgeCaseResult::new(EdgeCase::ExtremePolarization, extreme_polarization(inputs, cfg)),
        EdgeCaseResult::new(
            EdgeCase::HighLoadInterference,
            high_load_interference(inputs, gate_cfg),
        ),
    ];

    let fired = results.iter().filter(|r| r.detected).count();
    results.push(EdgeCaseResult::new(
        EdgeCase::UnresolvedAmbiguity,
        fired >= cfg.ambiguity_min_cases,
    ));
    results
}

/// Whether `case` fired in `results`.
pub fn detected(results: &[EdgeCaseResult], case: EdgeCase) -> bool {
    results.iter().any(|r| r.case == case && r.detected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::pair_code;
    use crate::scoring::gate::{GateMode, GateReason};
    use crate::scoring::math::to_100;
    use crate::scoring::signature::RankingMetric;

    fn dim(d: Dimension, shine: f64, eclipse: f64) -> DimensionComposite {
        DimensionComposite {
            dimension: d,
            name: d.name().to_string(),
            shine_0_4: Some(shine),
            access_0_4: Some(shine),
            eclipse_0_4: Some(eclipse),
            shine_0_100: Some(to_100(shine)),
            access_0_100: Some(to_100(shine)),
            eclipse_0_100: Some(to_100(eclipse)),
            net_energy_0_100: Some((to_100(shine) - to_100(eclipse) + 100.0) / 2.0),
            subfacet_count: 4,
            partial: false,
        }
    }

    fn signature(top1: Dimension, top2: Dimension, flat: bool) -> Signature {
        Signature {
            top1,
            top2,
            pair_code: pair_code(top1, top2),
            metric: RankingMetric::NetEnergy,
            flat_profile: flat,
            close_call: false,
        }
    }

    fn proceed() -> GateDecision {
        GateDecision {
            mode: GateMode::Proceed,
            reasons: vec![],
        }
    }

    fn run(
        dims: &BTreeMap<Dimension, DimensionComposite>,
        validity: &ValidityResult,
        sig: Option<&Signature>,
        gate: &GateDecision,
        reflections: usize,
    ) -> Vec<EdgeCaseResult> {
        let inputs = EdgeCaseInputs {
            dimensions: dims,
            validity,
            reflections_answered: reflections,
            signature: sig,
            gate,
            efficiency_ratio: Some(1.2),
        };
        detect_edge_cases(&inputs, &SelectionConfig::default(), &GateConfig::default())
    }

    #[test]
    fn always_reports_ten_cases_in_order() {
        let results = run(&BTreeMap::new(), &ValidityResult::default(), None, &proceed(), 1);
        let order: Vec<_> = results.iter().map(|r| r.case).collect();
        assert_eq!(order, EdgeCase::ALL.to_vec());
        assert!(results.iter().all(|r| !r.detected && r.restriction.is_none()));
    }

    #[test]
    fn suppressed_grounding_needs_four_high_others() {
        let mut dims: BTreeMap<_, _> = Dimension::ALL
            .into_iter()
            .map(|d| (d, dim(d, 3.5, 0.5)))
            .collect();
        dims.insert(Dimension::R3, dim(Dimension::R3, 0.5, 3.5));
        let results = run(&dims, &ValidityResult::default(), None, &proceed(), 1);
        assert!(detected(&results, EdgeCase::SuppressedGrounding));

        for d in [Dimension::R1, Dimension::R2, Dimension::R4, Dimension::R5, Dimension::R6] {
            dims.insert(d, dim(d, 2.0, 1.0));
        }
        let results = run(&dims, &ValidityResult::default(), None, &proceed(), 1);
        assert!(!detected(&results, EdgeCase::SuppressedGrounding));
    }

    #[test]
    fn expensive_strength_and_polarization_follow_the_signature() {
        let mut dims: BTreeMap<_, _> = Dimension::ALL
            .into_iter()
            .map(|d| (d, dim(d, 2.0, 2.0)))
            .collect();
        dims.insert(Dimension::R4, dim(Dimension::R4, 3.0, 2.6));
        dims.insert(Dimension::R7, dim(Dimension::R7, 4.0, 0.0));
        let sig = signature(Dimension::R7, Dimension::R4, false);
        let results = run(&dims, &ValidityResult::default(), Some(&sig), &proceed(), 1);
        assert!(detected(&results, EdgeCase::ExpensiveStrength));
        // R7 NE 100, R4 NE 55
        assert!(detected(&results, EdgeCase::ExtremePolarization));
        assert!(!detected(&results, EdgeCase::UnresolvedAmbiguity));
    }

    #[test]
    fn three_cases_make_the_profile_ambiguous() {
        let mut validity = ValidityResult::default();
        validity.inconsistency.flag = true;
        validity.missingness.flag = true;
        let sig = signature(Dimension::R1, Dimension::R2, true);
        let results = run(&BTreeMap::new(), &validity, Some(&sig), &proceed(), 0);
        assert!(detected(&results, EdgeCase::ContradictoryResponses));
        assert!(detected(&results, EdgeCase::FlatProfile));
        assert!(detected(&results, EdgeCase::MissingReflection));
        assert!(detected(&results, EdgeCase::PartialCompletion));
        let last = results.last().unwrap();
        assert_eq!(last.case, EdgeCase::UnresolvedAmbiguity);
        assert!(last.detected);
        assert!(last.restriction.is_some());
    }

    #[test]
    fn high_load_interference_needs_stabilize_and_a_concern() {
        let gate = GateDecision {
            mode: GateMode::Stabilize,
            reasons: vec![GateReason::LoadHigh],
        };
        let mut validity = ValidityResult::default();
        let results = run(&BTreeMap::new(), &validity, None, &gate, 1);
        assert!(!detected(&results, EdgeCase::HighLoadInterference));

        validity.social_desirability.elevated = true;
        let results = run(&BTreeMap::new(), &validity, None, &gate, 1);
        assert!(detected(&results, EdgeCase::HighLoadInterference));
    }
}
