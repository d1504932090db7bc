//! Dimension ("ray") composites from subfacet composites.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::UsabilityConfig;
use crate::model::{Bucket, Dimension, SubfacetId};
use crate::scoring::math::{mean, to_100};
use crate::scoring::subfacet::SubfacetComposite;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionComposite {
    pub dimension: Dimension,
    pub name: String,
    /// Baseline capacity.
    pub shine_0_4: Option<f64>,
    /// Capacity under pressure.
    pub access_0_4: Option<f64>,
    /// Distortion under pressure.
    pub eclipse_0_4: Option<f64>,
    pub shine_0_100: Option<f64>,
    pub access_0_100: Option<f64>,
    pub eclipse_0_100: Option<f64>,
    /// `(shine - eclipse + 100) / 2`; 50 means balanced.
    pub net_energy_0_100: Option<f64>,
    /// Subfacets that contributed to shine.
    pub subfacet_count: usize,
    /// Shine reported from fewer than four subfacets.
    pub partial: bool,
}

impl DimensionComposite {
    pub fn bucket_mean(&self, bucket: Bucket) -> Option<f64> {
        match bucket {
            Bucket::Baseline => self.shine_0_4,
            Bucket::UnderPressure => self.access_0_4,
            Bucket::Distortion => self.eclipse_0_4,
        }
    }

    /// Access if measured, else shine.
    pub fn access_or_shine(&self) -> Option<f64> {
        self.access_0_4.or(self.shine_0_4)
    }
}

fn bucket_coverage(sf: &SubfacetComposite, bucket: Bucket) -> Option<f64> {
    match bucket {
        Bucket::Baseline => sf.bucket_coverage.baseline,
        Bucket::UnderPressure => sf.bucket_coverage.under_pressure,
        Bucket::Distortion => sf.bucket_coverage.distortion,
    }
}

/// Mean of subfacet bucket means, or `None` below quorum. The quorum is
/// capped by how many subfacets the bank defines for the bucket at all.
fn quorum_mean(subfacets: &[&SubfacetComposite], bucket: Bucket, quorum: usize) -> (Option<f64>, usize) {
    let defined = subfacets
        .iter()
        .filter(|sf| bucket_coverage(sf, bucket).is_some())
        .count();
    let values: Vec<f64> = subfacets.iter().filter_map(|sf| sf.bucket_mean(bucket)).collect();
    let required = quorum.min(defined).max(1);
    if values.len() < required {
        return (None, values.len());
    }
    (mean(&values), values.len())
}

/// All nine dimension composites; dimensions without items come back empty.
pub fn dimension_composites(
    subfacets: &BTreeMap<SubfacetId, SubfacetComposite>,
    cfg: &UsabilityConfig,
) -> BTreeMap<Dimension, DimensionComposite> {
    Dimension::ALL
        .into_iter()
        .map(|dimension| {
            let members: Vec<&SubfacetComposite> = SubfacetId::all_for(dimension)
                .iter()
                .filter_map(|id| subfacets.get(id))
                .collect();

            let (shine, shine_count) = quorum_mean(&members, Bucket::Baseline, cfg.dimension_quorum);
            let (access, _) = quorum_mean(&members, Bucket::UnderPressure, cfg.dimension_quorum);
            let (eclipse, _) = quorum_mean(&members, Bucket::Distortion, cfg.dimension_quorum);

            let shine_100 = shine.map(to_100);
            let eclipse_100 = eclipse.map(to_100);
            let net_energy = match (shine_100, eclipse_100) {
                (Some(s), Some(e)) => Some((s - e + 100.0) / 2.0),
                _ => None,
            };

            let composite = DimensionComposite {
                dimension,
                name: dimension.name().to_string(),
                shine_0_4: shine,
                access_0_4: access,
                eclipse_0_4: eclipse,
                shine_0_100: shine_100,
                access_0_100: access.map(to_100),
                eclipse_0_100: eclipse_100,
                net_energy_0_100: net_energy,
                subfacet_count: if shine.is_some() { shine_count } else { 0 },
                partial: shine.is_some() && shine_count < 4,
            };
            (dimension, composite)
        })
        .collect()
}
