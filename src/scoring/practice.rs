//! Practice ("tool") composites. Same bucket pattern as subfacets, keyed by
//! practice code, with one floor for every bucket.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::UsabilityConfig;
use crate::model::{ItemKey, Practice};
use crate::scoring::aggregate::{BucketSet, BucketTally};
use crate::scoring::ScoredItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeComposite {
    pub practice: Practice,
    pub name: String,
    /// Baseline use of the practice.
    pub usage_0_4: Option<f64>,
    /// Use under pressure.
    pub access_0_4: Option<f64>,
    pub distortion_0_4: Option<f64>,
    pub item_count: usize,
    pub coverage: f64,
}

impl PracticeComposite {
    /// Access if measured, else usage.
    pub fn access_or_usage(&self) -> Option<f64> {
        self.access_0_4.or(self.usage_0_4)
    }
}

/// One composite for each of the twelve practices.
pub fn practice_composites(
    scored: &[ScoredItem<'_>],
    cfg: &UsabilityConfig,
) -> BTreeMap<Practice, PracticeComposite> {
    let mut groups: BTreeMap<Practice, BucketSet> = BTreeMap::new();
    for s in scored {
        if let ItemKey::Practice(p) = s.item.key {
            groups.entry(p).or_default().push(s);
        }
    }

    Practice::ALL
        .into_iter()
        .map(|practice| {
            let buckets = groups.remove(&practice).unwrap_or_default();
            let gate = |t: &BucketTally| {
                t.usable_mean(cfg.practice_min_items, cfg.practice_usable_fraction)
            };
            let composite = PracticeComposite {
                practice,
                name: practice.name().to_string(),
                usage_0_4: gate(&buckets.baseline),
                access_0_4: gate(&buckets.under_pressure),
                distortion_0_4: gate(&buckets.distortion),
                item_count: buckets.total(),
                coverage: buckets.coverage(),
            };
            (practice, composite)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ResolvedItem;
    use crate::model::{Domain, Item, PressureMode};
    use crate::scoring::ItemScore;

    #[test]
    fn practice_needs_three_answers_per_bucket() {
        let items: Vec<ResolvedItem> = (0..4)
            .map(|i| {
                let item = Item::frequency(format!("T004-{i}"), Domain::Practice, "T004")
                    .with_pressure(PressureMode::UnderPressure);
                ResolvedItem {
                    bucket: item.bucket(),
                    key: ItemKey::Practice(Practice::T004),
                    item,
                }
            })
            .collect();
        fn score(items: &[ResolvedItem], answered: usize) -> Vec<ScoredItem<'_>> {
            items
                .iter()
                .enumerate()
                .map(|(i, item)| ScoredItem {
                    item,
                    score: if i < answered {
                        ItemScore {
                            normalized: Some(2.0),
                            capacity: Some(2.0),
                            ..ItemScore::default()
                        }
                    } else {
                        ItemScore::default()
                    },
                })
                .collect()
        }

        let cfg = UsabilityConfig::default();
        let two = practice_composites(&score(&items, 2), &cfg);
        assert_eq!(two[&Practice::T004].access_0_4, None);
        assert_eq!(two[&Practice::T004].coverage, 0.5);

        let three = practice_composites(&score(&items, 3), &cfg);
        assert_eq!(three[&Practice::T004].access_0_4, Some(2.0));
        assert_eq!(three[&Practice::T004].access_or_usage(), Some(2.0));
        assert_eq!(three.len(), 12);
        assert_eq!(three[&Practice::T001].item_count, 0);
    }
}
