//! Executive signals: advisory reads derived from dimension and practice
//! composites, moderated by the gate and by validity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::content::ResolvedSignal;
use crate::model::{Dimension, Practice};
use crate::scoring::confidence::ConfidenceBand;
use crate::scoring::dimension::DimensionComposite;
use crate::scoring::gate::GateDecision;
use crate::scoring::math::mean;
use crate::scoring::practice::PracticeComposite;
use crate::scoring::validity::ValidityResult;

/// Number of signals surfaced in the output.
pub const TOP_SIGNALS: usize = 6;
/// Drivers an elevated signal needs before it becomes an outcome tag.
const OUTCOME_TAG_MIN_DRIVERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalBand {
    Low,
    Moderate,
    Elevated,
    High,
}

impl SignalBand {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            Some(s) if s >= 3.5 => Self::High,
            Some(s) if s >= 2.5 => Self::Elevated,
            Some(s) if s >= 1.5 => Self::Moderate,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSignal {
    pub signal_id: String,
    pub label: String,
    pub category: String,
    pub band: SignalBand,
    pub base_score_0_4: Option<f64>,
    pub confidence: ConfidenceBand,
    /// `Rays: R1, R3` and `Tools: T004`, when present.
    pub drivers: Vec<String>,
    pub moderation: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeTag {
    pub tag_id: String,
    pub label: String,
    pub confidence: ConfidenceBand,
    pub evidence: Vec<String>,
}

fn base_score(
    dimensions_involved: &[Dimension],
    practices_involved: &[Practice],
    dimensions: &BTreeMap<Dimension, DimensionComposite>,
    practices: &BTreeMap<Practice, PracticeComposite>,
) -> Option<f64> {
    let values: Vec<f64> = dimensions_involved
        .iter()
        .filter_map(|d| dimensions.get(d).and_then(DimensionComposite::access_or_shine))
        .chain(
            practices_involved
                .iter()
                .filter_map(|p| practices.get(p).and_then(PracticeComposite::access_or_usage)),
        )
        .collect();
    mean(&values)
}

fn join_codes<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every signal in catalog order.
///
/// Under a stabilize gate every band is capped at `Moderate`, so `Elevated`
/// drops along with `High`. A stabilizing profile therefore never yields an
/// outcome tag.
pub fn compute_signals(
    signals: &[ResolvedSignal],
    dimensions: &BTreeMap<Dimension, DimensionComposite>,
    practices: &BTreeMap<Practice, PracticeComposite>,
    gate: &GateDecision,
    confidence: ConfidenceBand,
    validity: &ValidityResult,
) -> Vec<ExecutiveSignal> {
    let mut moderation = Vec::new();
    if validity.social_desirability.elevated {
        moderation.push("Social desirability elevated; scores may be inflated".to_string());
    }
    if validity.inconsistency.flag {
        moderation.push("Inconsistency detected".to_string());
    }

    signals
        .iter()
        .map(|signal| {
            let predictors = &signal.predictors;
            let base = base_score(&predictors.dimensions, &predictors.practices, dimensions, practices);
            let mut band = SignalBand::from_score(base);
            // Potential under load is not reported as realised.
            if gate.is_stabilize() {
                band = band.min(SignalBand::Moderate);
            }

            let mut drivers = Vec::new();
            if !predictors.dimensions.is_empty() {
                drivers.push(format!("Rays: {}", join_codes(&predictors.dimensions)));
            }
            if !predictors.practices.is_empty() {
                drivers.push(format!("Tools: {}", join_codes(&predictors.practices)));
            }

            ExecutiveSignal {
                signal_id: signal.definition.signal_id.clone(),
                label: signal.definition.label.clone(),
                category: signal.definition.category.clone(),
                band,
                base_score_0_4: base,
                confidence,
                drivers,
                moderation: moderation.clone(),
            }
        })
        .collect()
}

/// The highest-banded signals; catalog order breaks ties.
pub fn top_signals(signals: &[ExecutiveSignal]) -> Vec<ExecutiveSignal> {
    let mut ranked = signals.to_vec();
    ranked.sort_by(|a, b| b.band.cmp(&a.band));
    ranked.truncate(TOP_SIGNALS);
    ranked
}

pub fn outcome_tags(signals: &[ExecutiveSignal]) -> Vec<OutcomeTag> {
    signals
        .iter()
        .filter(|s| s.band >= SignalBand::Elevated && s.drivers.len() >= OUTCOME_TAG_MIN_DRIVERS)
        .map(|s| OutcomeTag {
            tag_id: s.signal_id.clone(),
            label: s.label.clone(),
            confidence: s.confidence,
            evidence: s.drivers.clone(),
        })
        .collect()
}
