//! System-wide indices: efficiency ratio, risk count, load snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Dimension;
use crate::scoring::dimension::DimensionComposite;
use crate::scoring::math::{mean, to_100};
use crate::scoring::ScoredItem;

/// Smoothing added to both sums of the efficiency ratio.
const EFFICIENCY_SMOOTHING: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemIndices {
    /// `(sum shine + 5) / (sum eclipse + 5)`. Below 1.0 the system is net
    /// depleting.
    pub efficiency_ratio: Option<f64>,
    pub efficiency_partial: bool,
    /// Dimensions whose eclipse exceeds their shine.
    pub risk_count: Option<u32>,
    pub risk_partial: bool,
    /// Mean of the dedicated load bank.
    pub load_0_4: Option<f64>,
    pub load_0_100: Option<f64>,
    pub load_partial: bool,
}

pub fn system_indices(
    dimensions: &BTreeMap<Dimension, DimensionComposite>,
    load_items: &[ScoredItem<'_>],
) -> SystemIndices {
    let total = Dimension::ALL.len();

    let shines: Vec<f64> = dimensions.values().filter_map(|d| d.shine_0_4).collect();
    let eclipses: Vec<f64> = dimensions.values().filter_map(|d| d.eclipse_0_4).collect();
    let efficiency_ratio = (!shines.is_empty() && !eclipses.is_empty()).then(|| {
        (shines.iter().sum::<f64>() + EFFICIENCY_SMOOTHING)
            / (eclipses.iter().sum::<f64>() + EFFICIENCY_SMOOTHING)
    });
    let efficiency_partial = shines.len() < total || eclipses.len() < total;

    let mut usable = 0usize;
    let mut risk = 0u32;
    for d in dimensions.values() {
        if let (Some(s), Some(e)) = (d.shine_0_4, d.eclipse_0_4) {
            usable += 1;
            if e > s {
                risk += 1;
            }
        }
    }

    let load_values: Vec<f64> = load_items
        .iter()
        .filter_map(|s| s.score.capacity.or(s.score.distortion))
        .collect();
    let load_0_4 = mean(&load_values);

    SystemIndices {
        efficiency_ratio,
        efficiency_partial,
        risk_count: (usable > 0).then_some(risk),
        risk_partial: usable < total,
        load_0_4,
        load_0_100: load_0_4.map(to_100),
        load_partial: load_values.len() < load_items.len() || load_items.is_empty(),
    }
}
