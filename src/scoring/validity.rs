//! Response-quality heuristics.
//!
//! Seven independent checks, each fed only its own item subset and each
//! reporting its underlying scalar next to its flag. Reflection-depth flags
//! ride along so confidence resolution has one record to read.

use std::collections::BTreeMap;

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ValidityConfig;
use crate::model::{Dimension, ItemKey, ResponseFormat, SubfacetId, ValidityScale};
use crate::scoring::dimension::DimensionComposite;
use crate::scoring::item::FREQUENCY_LABELS;
use crate::scoring::math::{mean, population_sd};
use crate::scoring::reflection::ReflectionIndices;
use crate::scoring::subfacet::SubfacetComposite;
use crate::scoring::ScoredItem;

static KEY_SCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"KEY_SCORE\s*=\s*([0-4])").expect("Invalid key score regex"));
static KEY_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"KEY\s*=\s*(Never|Rarely|Sometimes|Often|Almost always)")
        .expect("Invalid key label regex")
});

// =============================================================================
// Results
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SocialDesirability {
    pub mean_0_4: Option<f64>,
    pub elevated: bool,
    pub extreme: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Inconsistency {
    pub pairs_compared: usize,
    pub flagged_pairs: usize,
    /// Mean absolute gap across complete pairs; 0 when none.
    pub mean_diff: f64,
    pub caution: bool,
    pub flag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Attention {
    pub checks: usize,
    pub misses: usize,
    pub flag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Infrequency {
    pub hits: usize,
    pub flag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Speed {
    /// 0 when timestamps are absent, unparseable, or out of order.
    pub duration_seconds: f64,
    pub caution: bool,
    pub flag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Straightlining {
    pub longest_run: usize,
    pub sd: Option<f64>,
    pub caution: bool,
    pub flag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Missingness {
    /// Dimensions lacking shine or eclipse.
    pub incomplete_dimensions: usize,
    /// Subfacets whose baseline coverage is below the high-confidence share.
    pub low_coverage_subfacets: usize,
    /// Mean baseline coverage across subfacets.
    pub overall_coverage: f64,
    pub flag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReflectionQuality {
    pub depth_avg_0_3: Option<f64>,
    pub strong: bool,
    pub thin: bool,
    pub missing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidityResult {
    pub social_desirability: SocialDesirability,
    pub inconsistency: Inconsistency,
    pub attention: Attention,
    pub infrequency: Infrequency,
    pub speed: Speed,
    pub straightlining: Straightlining,
    pub missingness: Missingness,
    pub reflection: ReflectionQuality,
}

// =============================================================================
// Heuristics
// =============================================================================

fn scale_items<'s, 'a>(
    validity: &'s [ScoredItem<'a>],
    scale: ValidityScale,
) -> impl Iterator<Item = &'s ScoredItem<'a>> {
    validity
        .iter()
        .filter(move |s| s.item.key == ItemKey::Validity(scale))
}

pub fn social_desirability(validity: &[ScoredItem<'_>], cfg: &ValidityConfig) -> SocialDesirability {
    let values: Vec<f64> = scale_items(validity, ValidityScale::SocialDesirability)
        .filter_map(|s| s.score.capacity)
        .collect();
    let m = mean(&values);
    SocialDesirability {
        mean_0_4: m,
        elevated: m.is_some_and(|v| v >= cfg.sd_elevated),
        extreme: m.is_some_and(|v| v >= cfg.sd_extreme),
    }
}

/// Pairs are validity items sharing a `pair_id`; only complete pairs count.
pub fn inconsistency(validity: &[ScoredItem<'_>], cfg: &ValidityConfig) -> Inconsistency {
    let mut pairs: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for s in validity {
        let Some(pair_id) = s.item.item.pair_id.as_deref() else {
            continue;
        };
        if let Some(v) = s.score.capacity {
            pairs.entry(pair_id).or_default().push(v);
        }
    }

    let diffs: Vec<f64> = pairs
        .values()
        .filter(|v| v.len() == 2)
        .map(|v| (v[0] - v[1]).abs())
        .collect();
    let flagged_pairs = diffs
        .iter()
        .filter(|d| **d >= cfg.inconsistency_pair_diff)
        .count();
    let mean_diff = mean(&diffs).unwrap_or(0.0);
    Inconsistency {
        pairs_compared: diffs.len(),
        flagged_pairs,
        mean_diff,
        caution: mean_diff >= cfg.inconsistency_caution_mean,
        flag: flagged_pairs >= cfg.inconsistency_flag_pairs,
    }
}

fn expected_frequency(notes: Option<&str>) -> Option<f64> {
    let notes = notes?;
    if let Some(cap) = KEY_SCORE.captures(notes) {
        return cap[1].parse().ok();
    }
    let cap = KEY_LABEL.captures(notes)?;
    FREQUENCY_LABELS
        .iter()
        .find(|(label, _)| *label == &cap[1])
        .map(|(_, v)| *v)
}

/// A check counts as missed only when it was answered with something other
/// than its key; unanswered checks are missingness, not inattention.
pub fn attention(validity: &[ScoredItem<'_>], cfg: &ValidityConfig) -> Attention {
    let mut checks = 0;
    let mut misses = 0;
    for s in scale_items(validity, ValidityScale::Attention) {
        checks += 1;
        let item = &s.item.item;
        let missed = match item.response_format {
            ResponseFormat::ForcedChoice => {
                let keyed = item
                    .keyed_option
                    .as_deref()
                    .map(|k| k.trim().to_ascii_uppercase());
                match (keyed, s.score.chosen_option) {
                    (Some(k), Some(chosen)) => k != chosen.to_string(),
                    _ => false,
                }
            }
            ResponseFormat::Frequency => match (expected_frequency(item.notes.as_deref()), s.score.normalized) {
                (Some(expected), Some(answer)) => expected != answer,
                _ => false,
            },
        };
        if missed {
            misses += 1;
        }
    }
    Attention {
        checks,
        misses,
        flag: misses >= cfg.attention_flag_misses,
    }
}

pub fn infrequency(validity: &[ScoredItem<'_>], cfg: &ValidityConfig) -> Infrequency {
    let hits = scale_items(validity, ValidityScale::Infrequency)
        .filter(|s| s.score.capacity.is_some_and(|v| v >= cfg.infrequency_high_score))
        .count();
    Infrequency {
        hits,
        flag: hits >= cfg.infrequency_flag_hits,
    }
}

fn session_seconds(start: Option<&str>, end: Option<&str>) -> Option<f64> {
    let (start, end) = (start?, end?);
    let parse = |raw: &str| match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(ts) => Some(ts),
        Err(err) => {
            warn!(timestamp = raw, error = %err, "unparseable session timestamp");
            None
        }
    };
    let (start, end) = (parse(start)?, parse(end)?);
    let millis = (end - start).num_milliseconds();
    (millis > 0).then(|| millis as f64 / 1000.0)
}

/// Hard floor always applies; the pilot-median checks only when a median
/// is supplied.
pub fn speed(
    start_ts: Option<&str>,
    end_ts: Option<&str>,
    pilot_median_seconds: Option<f64>,
    cfg: &ValidityConfig,
) -> Speed {
    let Some(duration) = session_seconds(start_ts, end_ts) else {
        return Speed::default();
    };
    let median = pilot_median_seconds.filter(|m| m.is_finite() && *m > 0.0);
    let mut flag = duration < cfg.speed_floor_seconds;
    let mut caution = false;
    if let Some(median) = median {
        flag |= duration < cfg.speed_flag_fraction * median;
        caution = duration < cfg.speed_caution_fraction * median;
    }
    Speed {
        duration_seconds: duration,
        caution: caution || flag,
        flag,
    }
}

/// Capacity values in bank order across every bank.
pub fn straightlining<'s, 'a: 's>(
    items: impl Iterator<Item = &'s ScoredItem<'a>>,
    cfg: &ValidityConfig,
) -> Straightlining {
    let seq: Vec<f64> = items.filter_map(|s| s.score.capacity).collect();
    if seq.is_empty() {
        return Straightlining::default();
    }

    let mut longest = 1;
    let mut current = 1;
    for pair in seq.windows(2) {
        if pair[0] == pair[1] {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
    }

    let sd = population_sd(&seq);
    let low_variance = sd.is_some_and(|v| v < cfg.straightline_low_sd);
    Straightlining {
        longest_run: longest,
        sd,
        caution: longest >= cfg.straightline_caution_run,
        flag: longest >= cfg.straightline_flag_run || low_variance,
    }
}

pub fn missingness(
    dimensions: &BTreeMap<Dimension, DimensionComposite>,
    subfacets: &BTreeMap<SubfacetId, SubfacetComposite>,
    high_confidence_fraction: f64,
    cfg: &ValidityConfig,
) -> Missingness {
    let incomplete_dimensions = Dimension::ALL
        .iter()
        .filter(|d| {
            dimensions
                .get(*d)
                .map_or(true, |c| c.shine_0_4.is_none() || c.eclipse_0_4.is_none())
        })
        .count();

    let coverages: Vec<f64> = subfacets
        .values()
        .filter_map(|sf| sf.bucket_coverage.baseline)
        .collect();
    let low_coverage_subfacets = coverages
        .iter()
        .filter(|c| **c < high_confidence_fraction)
        .count();

    Missingness {
        incomplete_dimensions,
        low_coverage_subfacets,
        overall_coverage: mean(&coverages).unwrap_or(0.0),
        flag: incomplete_dimensions >= cfg.missing_dimensions_flag
            || low_coverage_subfacets >= cfg.low_coverage_subfacets_flag,
    }
}

pub fn reflection_quality(indices: &ReflectionIndices, cfg: &ValidityConfig) -> ReflectionQuality {
    let depth = indices.depth_avg_0_3;
    ReflectionQuality {
        depth_avg_0_3: depth,
        strong: depth.is_some_and(|d| d >= cfg.reflection_strong_depth),
        thin: depth.is_some_and(|d| d >= cfg.reflection_thin_depth && d < cfg.reflection_strong_depth),
        missing: depth.map_or(true, |d| d < cfg.reflection_thin_depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ResolvedItem;
    use crate::model::{Domain, Item};
    use crate::scoring::ItemScore;

    fn validity_item(id: &str, code: &str) -> ResolvedItem {
        let item = Item::frequency(id, Domain::Validity, code);
        ResolvedItem {
            bucket: item.bucket(),
            key: ItemKey::Validity(ValidityScale::from_code(Some(code))),
            item,
        }
    }

    fn answered(v: f64) -> ItemScore {
        ItemScore {
            normalized: Some(v),
            capacity: Some(v),
            ..ItemScore::default()
        }
    }

    fn cfg() -> ValidityConfig {
        ValidityConfig::default()
    }

    #[test]
    fn social_desirability_thresholds() {
        let items: Vec<_> = (0..4).map(|i| validity_item(&format!("sd{i}"), "VAL_SD")).collect();
        let scored: Vec<_> = items
            .iter()
            .map(|item| ScoredItem { item, score: answered(4.0) })
            .collect();
        let sd = social_desirability(&scored, &cfg());
        assert_eq!(sd.mean_0_4, Some(4.0));
        assert!(sd.elevated && sd.extreme);
    }

    #[test]
    fn inconsistency_needs_two_wide_pairs() {
        let items: Vec<_> = ["a1", "a2", "b1", "b2", "c1"]
            .iter()
            .map(|id| {
                let mut r = validity_item(id, "VAL_INC");
                r.item.pair_id = Some(id[..1].to_string());
                r
            })
            .collect();
        let values = [0.0, 4.0, 1.0, 4.0, 2.0];
        let scored: Vec<_> = items
            .iter()
            .zip(values)
            .map(|(item, v)| ScoredItem { item, score: answered(v) })
            .collect();
        let inc = inconsistency(&scored, &cfg());
        assert_eq!(inc.pairs_compared, 2);
        assert_eq!(inc.flagged_pairs, 2);
        assert_eq!(inc.mean_diff, 3.5);
        assert!(inc.flag);
    }

    #[test]
    fn attention_counts_wrong_answers_only() {
        let items: Vec<_> = (0..3)
            .map(|i| {
                let mut r = validity_item(&format!("att{i}"), "VAL_ATT");
                r.item.notes = Some("KEY=Never".to_string());
                r
            })
            .collect();
        let scores = [answered(0.0), answered(3.0), ItemScore::default()];
        let scored: Vec<_> = items
            .iter()
            .zip(scores)
            .map(|(item, score)| ScoredItem { item, score })
            .collect();
        let att = attention(&scored, &cfg());
        assert_eq!(att.checks, 3);
        assert_eq!(att.misses, 1);
        assert!(!att.flag);
    }

    #[test]
    fn speed_floor_and_pilot_median() {
        let c = cfg();
        let s = speed(Some("2024-01-01T10:00:00Z"), Some("2024-01-01T10:05:00Z"), None, &c);
        assert_eq!(s.duration_seconds, 300.0);
        assert!(s.flag);

        let s = speed(
            Some("2024-01-01T10:00:00Z"),
            Some("2024-01-01T10:10:00Z"),
            Some(3000.0),
            &c,
        );
        assert!(s.flag, "600s is under a quarter of a 3000s median");

        let s = speed(
            Some("2024-01-01T10:00:00Z"),
            Some("2024-01-01T10:20:00Z"),
            Some(3000.0),
            &c,
        );
        assert!(!s.flag);
        assert!(s.caution);

        let s = speed(Some("garbage"), Some("2024-01-01T10:20:00Z"), None, &c);
        assert_eq!(s, Speed::default());
        let s = speed(Some("2024-01-01T10:20:00Z"), Some("2024-01-01T10:00:00Z"), None, &c);
        assert_eq!(s, Speed::default());
    }

    #[test]
    fn straightlining_run_and_variance() {
        let items: Vec<_> = (0..20).map(|i| validity_item(&format!("x{i}"), "VAL_SD")).collect();
        let scored: Vec<_> = items
            .iter()
            .enumerate()
            .map(|(i, item)| ScoredItem {
                item,
                score: answered(if i % 2 == 0 { 1.0 } else { 3.0 }),
            })
            .collect();
        let sl = straightlining(scored.iter(), &cfg());
        assert_eq!(sl.longest_run, 1);
        assert!(!sl.flag);

        let flat: Vec<_> = items
            .iter()
            .map(|item| ScoredItem { item, score: answered(2.0) })
            .collect();
        let sl = straightlining(flat.iter(), &cfg());
        assert_eq!(sl.longest_run, 20);
        assert!(sl.caution && sl.flag);
    }

    #[test]
    fn reflection_quality_bands() {
        let with = |d: Option<f64>| ReflectionIndices {
            depth_avg_0_3: d,
            ..ReflectionIndices::default()
        };
        assert!(reflection_quality(&with(Some(2.5)), &cfg()).strong);
        assert!(reflection_quality(&with(Some(1.5)), &cfg()).thin);
        assert!(reflection_quality(&with(Some(0.5)), &cfg()).missing);
        assert!(reflection_quality(&with(None), &cfg()).missing);
    }
}
