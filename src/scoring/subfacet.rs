//! Subfacet composites: scored dimension items grouped by subfacet.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::UsabilityConfig;
use crate::model::{Bucket, ItemKey, SubfacetId};
use crate::scoring::aggregate::BucketSet;
use crate::scoring::ScoredItem;

/// Answered share per bucket; `None` where the bank has no items.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketCoverage {
    pub baseline: Option<f64>,
    pub under_pressure: Option<f64>,
    pub distortion: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubfacetComposite {
    pub subfacet: SubfacetId,
    pub name: String,
    pub shine_0_4: Option<f64>,
    pub access_0_4: Option<f64>,
    pub eclipse_0_4: Option<f64>,
    pub item_count: usize,
    pub coverage: f64,
    pub usable: bool,
    pub high_confidence: bool,
    pub bucket_coverage: BucketCoverage,
}

impl SubfacetComposite {
    pub fn bucket_mean(&self, bucket: Bucket) -> Option<f64> {
        match bucket {
            Bucket::Baseline => self.shine_0_4,
            Bucket::UnderPressure => self.access_0_4,
            Bucket::Distortion => self.eclipse_0_4,
        }
    }
}

fn min_items(cfg: &UsabilityConfig, bucket: Bucket) -> usize {
    match bucket {
        Bucket::Baseline => cfg.subfacet_min_baseline,
        Bucket::UnderPressure => cfg.subfacet_min_under_pressure,
        Bucket::Distortion => cfg.subfacet_min_distortion,
    }
}

/// One composite per subfacet that the dimension bank defines.
pub fn subfacet_composites(
    scored: &[ScoredItem<'_>],
    cfg: &UsabilityConfig,
) -> BTreeMap<SubfacetId, SubfacetComposite> {
    let mut groups: BTreeMap<SubfacetId, (BucketSet, Option<&str>)> = BTreeMap::new();
    for s in scored {
        let ItemKey::Subfacet(id) = s.item.key else {
            continue;
        };
        let entry = groups.entry(id).or_default();
        entry.0.push(s);
        if entry.1.is_none() {
            entry.1 = s.item.item.subfacet_name.as_deref();
        }
    }

    groups
        .into_iter()
        .map(|(id, (buckets, name))| {
            let mean_for =
                |b: Bucket| buckets.get(b).usable_mean(min_items(cfg, b), cfg.subfacet_usable_fraction);
            let coverage = buckets.coverage();
            let composite = SubfacetComposite {
                subfacet: id,
                name: name.unwrap_or_else(|| id.name()).to_string(),
                shine_0_4: mean_for(Bucket::Baseline),
                access_0_4: mean_for(Bucket::UnderPressure),
                eclipse_0_4: mean_for(Bucket::Distortion),
                item_count: buckets.total(),
                coverage,
                usable: coverage >= cfg.subfacet_usable_fraction,
                high_confidence: coverage >= cfg.subfacet_high_confidence_fraction,
                bucket_coverage: BucketCoverage {
                    baseline: buckets.baseline.coverage(),
                    under_pressure: buckets.under_pressure.coverage(),
                    distortion: buckets.distortion.coverage(),
                },
            };
            (id, composite)
        })
        .collect()
}
