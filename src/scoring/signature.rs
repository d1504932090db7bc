//! Signature: the top two trait dimensions with deterministic tie-breaks.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::SelectionConfig;
use crate::model::{pair_code, Dimension};
use crate::scoring::dimension::DimensionComposite;
use crate::scoring::math::population_sd;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    NetEnergy,
    /// Fewer than two dimensions had Net Energy.
    Shine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub top1: Dimension,
    pub top2: Dimension,
    /// Sorted ascending: `R1-R5`.
    pub pair_code: String,
    pub metric: RankingMetric,
    pub flat_profile: bool,
    /// A near-tie changed the winner of either slot.
    pub close_call: bool,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    dimension: Dimension,
    score: f64,
}

fn candidates(
    dimensions: &BTreeMap<Dimension, DimensionComposite>,
    metric: impl Fn(&DimensionComposite) -> Option<f64>,
) -> Vec<Candidate> {
    Dimension::trait_dimensions()
        .filter_map(|d| {
            let score = dimensions.get(&d).and_then(&metric)?;
            Some(Candidate { dimension: d, score })
        })
        .collect()
}

/// Tie-break chain: higher access, then lower eclipse, then lower number.
pub fn better(
    a: Dimension,
    b: Dimension,
    dimensions: &BTreeMap<Dimension, DimensionComposite>,
) -> Dimension {
    let (ca, cb) = (dimensions.get(&a), dimensions.get(&b));
    let access = (ca.and_then(|c| c.access_0_4), cb.and_then(|c| c.access_0_4));
    if let (Some(x), Some(y)) = access {
        if x != y {
            return if x > y { a } else { b };
        }
    }
    let eclipse = (ca.and_then(|c| c.eclipse_0_4), cb.and_then(|c| c.eclipse_0_4));
    if let (Some(x), Some(y)) = eclipse {
        if x != y {
            return if x < y { a } else { b };
        }
    }
    a.min(b)
}

/// Resolve the leader of `ranked` against every candidate within the tie
/// threshold of it. Returns the winner and whether the leader was displaced.
fn resolve_slot(
    ranked: &[Candidate],
    threshold: f64,
    dimensions: &BTreeMap<Dimension, DimensionComposite>,
) -> Option<(Dimension, bool)> {
    let leader = ranked.first()?;
    let mut winner = leader.dimension;
    let mut displaced = false;
    for c in ranked {
        if (c.score - leader.score).abs() <= threshold {
            let next = better(winner, c.dimension, dimensions);
            if next != winner {
                displaced = true;
            }
            winner = next;
        }
    }
    Some((winner, displaced))
}

/// `None` when fewer than two trait dimensions carry a score.
pub fn select_signature(
    dimensions: &BTreeMap<Dimension, DimensionComposite>,
    cfg: &SelectionConfig,
) -> Option<Signature> {
    let mut metric = RankingMetric::NetEnergy;
    let mut eligible = candidates(dimensions, |c| c.net_energy_0_100);
    if eligible.len() < 2 {
        metric = RankingMetric::Shine;
        eligible = candidates(dimensions, |c| c.shine_0_100);
    }
    if eligible.len() < 2 {
        return None;
    }

    let scores: Vec<f64> = eligible.iter().map(|c| c.score).collect();
    let flat_profile = eligible.len() >= cfg.flat_min_candidates
        && population_sd(&scores).is_some_and(|sd| sd < cfg.flat_sd);

    // Stable sort keeps dimension order among exact ties.
    let mut ranked = eligible;
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let (top1, close1) = resolve_slot(&ranked, cfg.tie_threshold, dimensions)?;
    let remaining: Vec<Candidate> = ranked.into_iter().filter(|c| c.dimension != top1).collect();
    let (top2, close2) = resolve_slot(&remaining, cfg.tie_threshold, dimensions)?;

    Some(Signature {
        top1,
        top2,
        pair_code: pair_code(top1, top2),
        metric,
        flat_profile,
        close_call: close1 || close2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::math::to_100;

    fn dim(d: Dimension, shine: f64, access: Option<f64>, eclipse: Option<f64>) -> DimensionComposite {
        let shine_100 = to_100(shine);
        let eclipse_100 = eclipse.map(to_100);
        DimensionComposite {
            dimension: d,
            name: d.name().to_string(),
            shine_0_4: Some(shine),
            access_0_4: access,
            eclipse_0_4: eclipse,
            shine_0_100: Some(shine_100),
            access_0_100: access.map(to_100),
            eclipse_0_100: eclipse_100,
            net_energy_0_100: eclipse_100.map(|e| (shine_100 - e + 100.0) / 2.0),
            subfacet_count: 4,
            partial: false,
        }
    }

    fn spread() -> BTreeMap<Dimension, DimensionComposite> {
        Dimension::ALL
            .into_iter()
            .map(|d| {
                let shine = 0.4 * f64::from(d.number()) - 0.4;
                (d, dim(d, shine, Some(2.0), Some(1.0)))
            })
            .collect()
    }

    #[test]
    fn overflow_dimension_never_enters_the_signature() {
        let sig = select_signature(&spread(), &SelectionConfig::default()).unwrap();
        assert_eq!(sig.top1, Dimension::R8);
        assert_eq!(sig.top2, Dimension::R7);
        assert_eq!(sig.pair_code, "R7-R8");
        assert!(!sig.flat_profile);
        assert!(!sig.close_call);
    }

    #[test]
    fn near_tie_goes_to_higher_access() {
        let mut dims = spread();
        // R6 NE 1 point below R8, but with more access under pressure.
        let r8 = dims[&Dimension::R8].clone();
        let mut r6 = dim(Dimension::R6, r8.shine_0_4.unwrap() - 0.08, Some(3.5), Some(1.0));
        r6.net_energy_0_100 = r8.net_energy_0_100.map(|ne| ne - 1.0);
        dims.insert(Dimension::R6, r6);

        for _ in 0..3 {
            let sig = select_signature(&dims, &SelectionConfig::default()).unwrap();
            assert_eq!(sig.top1, Dimension::R6);
            assert_eq!(sig.top2, Dimension::R8);
            assert!(sig.close_call);
        }
    }

    #[test]
    fn exact_tie_falls_through_to_lower_number() {
        let dims: BTreeMap<_, _> = Dimension::ALL
            .into_iter()
            .map(|d| (d, dim(d, 2.0, Some(2.0), Some(1.0))))
            .collect();
        let sig = select_signature(&dims, &SelectionConfig::default()).unwrap();
        assert_eq!((sig.top1, sig.top2), (Dimension::R1, Dimension::R2));
        assert!(sig.flat_profile);
    }

    #[test]
    fn tie_break_chain_order() {
        let mut dims = BTreeMap::new();
        dims.insert(Dimension::R2, dim(Dimension::R2, 3.0, Some(2.0), Some(1.0)));
        dims.insert(Dimension::R5, dim(Dimension::R5, 3.0, Some(2.0), Some(0.5)));
        assert_eq!(better(Dimension::R2, Dimension::R5, &dims), Dimension::R5);
        dims.insert(Dimension::R5, dim(Dimension::R5, 3.0, Some(1.0), Some(0.5)));
        assert_eq!(better(Dimension::R2, Dimension::R5, &dims), Dimension::R2);
        dims.insert(Dimension::R5, dim(Dimension::R5, 3.0, Some(2.0), Some(1.0)));
        assert_eq!(better(Dimension::R5, Dimension::R2, &dims), Dimension::R2);
    }

    #[test]
    fn falls_back_to_shine_without_eclipse() {
        let dims: BTreeMap<_, _> = Dimension::ALL
            .into_iter()
            .map(|d| (d, dim(d, 0.3 * f64::from(d.number()), None, None)))
            .collect();
        let sig = select_signature(&dims, &SelectionConfig::default()).unwrap();
        assert_eq!(sig.metric, RankingMetric::Shine);
        assert_eq!(sig.top1, Dimension::R8);
    }
}
