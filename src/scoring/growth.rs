//! Growth focus: the one trait dimension to train next.
//!
//! The three lowest Net Energy dimensions are candidates. Each gets a movement
//! readiness score (a partial weighted mean of access, practice readiness and
//! reflection depth) and the most ready one wins. When even the best is not
//! ready, selection falls back to the lowest foundation candidate, then to the
//! lowest candidate overall. The overflow dimension never takes part.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ReadinessConfig;
use crate::model::{Dimension, Practice};
use crate::scoring::dimension::DimensionComposite;
use crate::scoring::math::{mean, partial_weighted_mean};
use crate::scoring::practice::PracticeComposite;

const CANDIDATE_COUNT: usize = 3;

/// Ordered from most to least ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Routing {
    Stretch,
    Standard,
    StabilizeMicro,
    StabilizeRetest,
}

impl Routing {
    pub fn from_readiness(readiness: Option<f64>, cfg: &ReadinessConfig) -> Self {
        match readiness {
            Some(r) if r >= cfg.stretch_min => Self::Stretch,
            Some(r) if r >= cfg.standard_min => Self::Standard,
            Some(r) if r >= cfg.stabilize_micro_min => Self::StabilizeMicro,
            _ => Self::StabilizeRetest,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stretch => "STRETCH",
            Self::Standard => "STANDARD",
            Self::StabilizeMicro => "STABILIZE_MICRO",
            Self::StabilizeRetest => "STABILIZE_RETEST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionBasis {
    /// Highest readiness among the candidates.
    Readiness,
    /// Nobody was ready; lowest foundation candidate.
    Foundation,
    /// Nobody was ready and no foundation candidate; lowest overall.
    LowestOverall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthCandidate {
    pub dimension: Dimension,
    pub net_energy_0_100: f64,
    pub readiness: Option<f64>,
    pub access_0_4: Option<f64>,
    pub practice_readiness: Option<f64>,
    pub reflection_0_4: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthFocus {
    pub dimension: Dimension,
    pub readiness: Option<f64>,
    pub routing: Routing,
    pub basis: SelectionBasis,
    /// Lowest Net Energy first.
    pub candidates: Vec<GrowthCandidate>,
}

/// Mean of access-or-usage over the dimension's two mapped practices.
pub fn practice_readiness(
    dimension: Dimension,
    practices: &BTreeMap<Practice, PracticeComposite>,
) -> Option<f64> {
    let values: Vec<f64> = dimension
        .practices()
        .iter()
        .filter_map(|p| practices.get(p).and_then(PracticeComposite::access_or_usage))
        .collect();
    mean(&values)
}

pub fn readiness(
    access: Option<f64>,
    practice: Option<f64>,
    reflection: Option<f64>,
    cfg: &ReadinessConfig,
) -> Option<f64> {
    partial_weighted_mean(&[
        (access, cfg.access_weight),
        (practice, cfg.practice_weight),
        (reflection, cfg.reflection_weight),
    ])
}

/// `None` when no trait dimension carries Net Energy.
pub fn select_growth_focus(
    dimensions: &BTreeMap<Dimension, DimensionComposite>,
    practices: &BTreeMap<Practice, PracticeComposite>,
    reflection_0_4: Option<f64>,
    cfg: &ReadinessConfig,
) -> Option<GrowthFocus> {
    let mut eligible: Vec<(Dimension, f64)> = Dimension::trait_dimensions()
        .filter_map(|d| Some((d, dimensions.get(&d)?.net_energy_0_100?)))
        .collect();
    // Stable: equal Net Energy keeps dimension order.
    eligible.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    eligible.truncate(CANDIDATE_COUNT);
    if eligible.is_empty() {
        return None;
    }

    let candidates: Vec<GrowthCandidate> = eligible
        .iter()
        .map(|&(dimension, net_energy_0_100)| {
            let access_0_4 = dimensions.get(&dimension).and_then(|c| c.access_0_4);
            let practice = practice_readiness(dimension, practices);
            GrowthCandidate {
                dimension,
                net_energy_0_100,
                readiness: readiness(access_0_4, practice, reflection_0_4, cfg),
                access_0_4,
                practice_readiness: practice,
                reflection_0_4,
            }
        })
        .collect();

    // First maximum wins, so ties go to the lower Net Energy candidate.
    let best = candidates
        .iter()
        .filter_map(|c| Some((c, c.readiness?)))
        .fold(None::<(&GrowthCandidate, f64)>, |acc, (c, r)| match acc {
            Some((_, best)) if best >= r => acc,
            _ => Some((c, r)),
        });

    let (chosen, basis) = match best {
        Some((c, r)) if r >= cfg.low_threshold => (c, SelectionBasis::Readiness),
        _ => match candidates.iter().find(|c| c.dimension.is_foundation()) {
            Some(c) => (c, SelectionBasis::Foundation),
            None => (&candidates[0], SelectionBasis::LowestOverall),
        },
    };

    let (dimension, readiness) = (chosen.dimension, chosen.readiness);
    Some(GrowthFocus {
        dimension,
        readiness,
        routing: Routing::from_readiness(readiness, cfg),
        basis,
        candidates,
    })
}
