//! Coaching gate and the performance-vs-presence delta.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::GateConfig;
use crate::model::Dimension;
use crate::scoring::dimension::DimensionComposite;
use crate::scoring::indices::SystemIndices;
use crate::scoring::math::mean;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateMode {
    Stabilize,
    Proceed,
}

/// Why the gate closed. Foundation reasons come first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GateReason {
    FoundationEclipseOverShine { dimension: Dimension },
    FoundationAccessLow { dimension: Dimension },
    EfficiencyDepleting,
    RiskCountElevated,
    LoadHigh,
    GroundingAccessLow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDecision {
    pub mode: GateMode,
    pub reasons: Vec<GateReason>,
}

impl GateDecision {
    pub fn is_stabilize(&self) -> bool {
        self.mode == GateMode::Stabilize
    }
}

pub fn resolve_gate(
    dimensions: &BTreeMap<Dimension, DimensionComposite>,
    indices: &SystemIndices,
    cfg: &GateConfig,
) -> GateDecision {
    let mut reasons = Vec::new();

    for d in Dimension::FOUNDATION {
        let Some(c) = dimensions.get(&d) else {
            continue;
        };
        if let (Some(s), Some(e)) = (c.shine_0_4, c.eclipse_0_4) {
            if e > s {
                reasons.push(GateReason::FoundationEclipseOverShine { dimension: d });
            }
        }
        if c.access_0_4.is_some_and(|a| a <= cfg.access_low) {
            reasons.push(GateReason::FoundationAccessLow { dimension: d });
        }
    }

    if indices
        .efficiency_ratio
        .is_some_and(|r| r < cfg.efficiency_depleting)
    {
        reasons.push(GateReason::EfficiencyDepleting);
    }
    if indices
        .risk_count
        .is_some_and(|r| r >= cfg.risk_count_elevated)
    {
        reasons.push(GateReason::RiskCountElevated);
    }
    if indices.load_0_4.is_some_and(|l| l >= cfg.load_high) {
        reasons.push(GateReason::LoadHigh);
    }
    if dimensions
        .get(&Dimension::GROUNDING)
        .and_then(|c| c.access_0_4)
        .is_some_and(|a| a <= cfg.access_low)
    {
        reasons.push(GateReason::GroundingAccessLow);
    }

    let mode = if reasons.is_empty() {
        GateMode::Proceed
    } else {
        GateMode::Stabilize
    };
    GateDecision { mode, reasons }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaStatus {
    Elevated,
    NotElevated,
    Unknown,
}

/// High output dimensions while the grounding dimension is depleted or
/// distorted: possible over-performance masking depletion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresenceDelta {
    pub status: DeltaStatus,
    pub flag: bool,
    pub output_mean_0_4: Option<f64>,
}

pub fn presence_delta(
    dimensions: &BTreeMap<Dimension, DimensionComposite>,
    cfg: &GateConfig,
) -> PresenceDelta {
    let outputs: Vec<f64> = Dimension::OUTPUT
        .iter()
        .filter_map(|d| dimensions.get(d).and_then(|c| c.shine_0_4))
        .collect();
    let unknown = |output_mean| PresenceDelta {
        status: DeltaStatus::Unknown,
        flag: false,
        output_mean_0_4: output_mean,
    };
    let Some(output_mean) = mean(&outputs) else {
        return unknown(None);
    };

    let grounding = dimensions.get(&Dimension::GROUNDING);
    let access = grounding.and_then(|c| c.access_0_4);
    let eclipse = grounding.and_then(|c| c.eclipse_0_4);
    if access.is_none() && eclipse.is_none() {
        return unknown(Some(output_mean));
    }

    let depleted = access.is_some_and(|a| a <= cfg.access_low)
        || eclipse.is_some_and(|e| e >= cfg.grounding_distortion_high);
    let elevated = output_mean >= cfg.output_high && depleted;
    PresenceDelta {
        status: if elevated {
            DeltaStatus::Elevated
        } else {
            DeltaStatus::NotElevated
        },
        flag: elevated,
        output_mean_0_4: Some(output_mean),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::math::to_100;

    fn dim(d: Dimension, shine: f64, access: f64, eclipse: f64) -> DimensionComposite {
        DimensionComposite {
            dimension: d,
            name: d.name().to_string(),
            shine_0_4: Some(shine),
            access_0_4: Some(access),
            eclipse_0_4: Some(eclipse),
            shine_0_100: Some(to_100(shine)),
            access_0_100: Some(to_100(access)),
            eclipse_0_100: Some(to_100(eclipse)),
            net_energy_0_100: Some((to_100(shine) - to_100(eclipse) + 100.0) / 2.0),
            subfacet_count: 4,
            partial: false,
        }
    }

    fn healthy() -> BTreeMap<Dimension, DimensionComposite> {
        Dimension::ALL
            .into_iter()
            .map(|d| (d, dim(d, 3.0, 3.0, 1.0)))
            .collect()
    }

    fn healthy_indices() -> SystemIndices {
        SystemIndices {
            efficiency_ratio: Some(1.5),
            risk_count: Some(0),
            load_0_4: Some(1.0),
            load_0_100: Some(25.0),
            ..SystemIndices::default()
        }
    }

    #[test]
    fn healthy_profile_proceeds() {
        let gate = resolve_gate(&healthy(), &healthy_indices(), &GateConfig::default());
        assert_eq!(gate.mode, GateMode::Proceed);
        assert!(gate.reasons.is_empty());
    }

    #[test]
    fn foundation_depletion_wins_over_healthy_indices() {
        let mut dims = healthy();
        dims.insert(Dimension::R2, dim(Dimension::R2, 2.0, 3.0, 2.5));
        let gate = resolve_gate(&dims, &healthy_indices(), &GateConfig::default());
        assert_eq!(gate.mode, GateMode::Stabilize);
        assert_eq!(
            gate.reasons,
            vec![GateReason::FoundationEclipseOverShine {
                dimension: Dimension::R2
            }]
        );
    }

    #[test]
    fn load_alone_stabilizes() {
        let mut idx = healthy_indices();
        idx.load_0_4 = Some(3.0);
        let gate = resolve_gate(&healthy(), &idx, &GateConfig::default());
        assert_eq!(gate.reasons, vec![GateReason::LoadHigh]);
    }

    #[test]
    fn presence_delta_states() {
        let cfg = GateConfig::default();
        assert_eq!(presence_delta(&healthy(), &cfg).status, DeltaStatus::NotElevated);

        let mut dims = healthy();
        for d in Dimension::OUTPUT {
            dims.insert(d, dim(d, 3.5, 3.5, 0.5));
        }
        dims.insert(Dimension::R3, dim(Dimension::R3, 3.0, 2.0, 1.0));
        let delta = presence_delta(&dims, &cfg);
        assert_eq!(delta.status, DeltaStatus::Elevated);
        assert!(delta.flag);

        assert_eq!(presence_delta(&BTreeMap::new(), &cfg).status, DeltaStatus::Unknown);
    }
}
