//! Bucket aggregation shared by subfacet and practice composites.

use crate::model::Bucket;
use crate::scoring::math::mean;
use crate::scoring::ScoredItem;

/// Answered values and bank size for one bucket of one group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketTally {
    pub values: Vec<f64>,
    /// Items the bank defines for this bucket, answered or not.
    pub total: usize,
}

impl BucketTally {
    pub fn answered(&self) -> usize {
        self.values.len()
    }

    /// Answered share of the bank; `None` when the bank has no items here.
    pub fn coverage(&self) -> Option<f64> {
        (self.total > 0).then(|| self.answered() as f64 / self.total as f64)
    }

    /// Mean of answered values, gated by `max(min_items, fraction * total)`.
    pub fn usable_mean(&self, min_items: usize, fraction: f64) -> Option<f64> {
        let threshold = (min_items as f64).max(fraction * self.total as f64);
        if self.total == 0 || (self.answered() as f64) < threshold {
            return None;
        }
        mean(&self.values)
    }
}

/// One tally per bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketSet {
    pub baseline: BucketTally,
    pub under_pressure: BucketTally,
    pub distortion: BucketTally,
}

impl BucketSet {
    pub fn get(&self, bucket: Bucket) -> &BucketTally {
        match bucket {
            Bucket::Baseline => &self.baseline,
            Bucket::UnderPressure => &self.under_pressure,
            Bucket::Distortion => &self.distortion,
        }
    }

    fn get_mut(&mut self, bucket: Bucket) -> &mut BucketTally {
        match bucket {
            Bucket::Baseline => &mut self.baseline,
            Bucket::UnderPressure => &mut self.under_pressure,
            Bucket::Distortion => &mut self.distortion,
        }
    }

    pub fn push(&mut self, scored: &ScoredItem<'_>) {
        let bucket = scored.item.bucket;
        let tally = self.get_mut(bucket);
        tally.total += 1;
        if let Some(v) = scored.score.bucket_value(bucket) {
            tally.values.push(v);
        }
    }

    pub fn answered(&self) -> usize {
        Bucket::ALL.iter().map(|b| self.get(*b).answered()).sum()
    }

    pub fn total(&self) -> usize {
        Bucket::ALL.iter().map(|b| self.get(*b).total).sum()
    }

    /// Answered share across all buckets; 0 when the group has no items.
    pub fn coverage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.answered() as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(values: &[f64], total: usize) -> BucketTally {
        BucketTally {
            values: values.to_vec(),
            total,
        }
    }

    #[test]
    fn floor_dominates_small_banks() {
        // 8 items: max(6, 3.2) = 6
        assert_eq!(tally(&[2.0; 5], 8).usable_mean(6, 0.4), None);
        assert_eq!(tally(&[2.0; 6], 8).usable_mean(6, 0.4), Some(2.0));
    }

    #[test]
    fn fraction_dominates_large_banks() {
        // 20 items: max(6, 8) = 8
        assert_eq!(tally(&[1.0; 7], 20).usable_mean(6, 0.4), None);
        assert_eq!(tally(&[1.0; 8], 20).usable_mean(6, 0.4), Some(1.0));
    }

    #[test]
    fn empty_bank_has_no_coverage() {
        let t = tally(&[], 0);
        assert_eq!(t.coverage(), None);
        assert_eq!(t.usable_mean(0, 0.0), None);
    }
}
