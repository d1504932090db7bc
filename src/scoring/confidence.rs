//! Confidence band from validity, gate and reflection depth.

use serde::{Deserialize, Serialize};

use crate::config::ValidityConfig;
use crate::scoring::gate::GateDecision;
use crate::scoring::validity::ValidityResult;

/// Ordered so `min`/`max` express caps and floors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceBand {
    Low,
    Moderate,
    High,
}

/// Attention, speed, straightlining and coverage: any one forces low.
pub fn hard_flags(validity: &ValidityResult) -> bool {
    validity.attention.flag
        || validity.speed.flag
        || validity.straightlining.flag
        || validity.missingness.flag
}

fn soft_flags(validity: &ValidityResult) -> bool {
    validity.social_desirability.elevated
        || validity.inconsistency.flag
        || validity.infrequency.flag
}

pub fn resolve_confidence(
    validity: &ValidityResult,
    gate: &GateDecision,
    cfg: &ValidityConfig,
) -> ConfidenceBand {
    let depth = validity.reflection.depth_avg_0_3;
    let thin_reflection = depth.map_or(true, |d| d < cfg.reflection_strong_depth);

    if hard_flags(validity)
        || (validity.social_desirability.extreme && thin_reflection)
        || (validity.inconsistency.flag
            && validity.inconsistency.mean_diff >= cfg.inconsistency_low_mean)
    {
        return ConfidenceBand::Low;
    }

    let band = if !thin_reflection && !soft_flags(validity) {
        ConfidenceBand::High
    } else {
        ConfidenceBand::Moderate
    };

    if gate.is_stabilize() {
        band.min(ConfidenceBand::Moderate)
    } else {
        band
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::gate::{GateMode, GateReason};

    fn proceed() -> GateDecision {
        GateDecision {
            mode: GateMode::Proceed,
            reasons: vec![],
        }
    }

    fn stabilize() -> GateDecision {
        GateDecision {
            mode: GateMode::Stabilize,
            reasons: vec![GateReason::LoadHigh],
        }
    }

    fn clean(depth: Option<f64>) -> ValidityResult {
        let mut v = ValidityResult::default();
        v.reflection.depth_avg_0_3 = depth;
        v
    }

    #[test]
    fn defaults_to_moderate_without_reflection() {
        let band = resolve_confidence(&clean(None), &proceed(), &ValidityConfig::default());
        assert_eq!(band, ConfidenceBand::Moderate);
    }

    #[test]
    fn deep_reflection_and_clean_data_is_high_unless_stabilizing() {
        let cfg = ValidityConfig::default();
        assert_eq!(resolve_confidence(&clean(Some(2.5)), &proceed(), &cfg), ConfidenceBand::High);
        assert_eq!(
            resolve_confidence(&clean(Some(2.5)), &stabilize(), &cfg),
            ConfidenceBand::Moderate
        );
    }

    #[test]
    fn any_hard_flag_is_low() {
        let cfg = ValidityConfig::default();
        let mut v = clean(Some(3.0));
        v.speed.flag = true;
        assert_eq!(resolve_confidence(&v, &proceed(), &cfg), ConfidenceBand::Low);

        let mut v = clean(Some(3.0));
        v.missingness.flag = true;
        assert_eq!(resolve_confidence(&v, &proceed(), &cfg), ConfidenceBand::Low);
    }

    #[test]
    fn extreme_desirability_needs_reflection_to_avoid_low() {
        let cfg = ValidityConfig::default();
        let mut v = clean(Some(1.0));
        v.social_desirability.elevated = true;
        v.social_desirability.extreme = true;
        assert_eq!(resolve_confidence(&v, &proceed(), &cfg), ConfidenceBand::Low);

        v.reflection.depth_avg_0_3 = Some(2.0);
        assert_eq!(resolve_confidence(&v, &proceed(), &cfg), ConfidenceBand::Moderate);
    }
}
