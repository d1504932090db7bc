//! Tunable thresholds for the scoring pipeline.
//!
//! Every constant the pipeline compares against lives here so an item bank of
//! a different density can be scored without code changes. `Default` carries
//! the calibrated values for the 143-item bank.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};

// ---------------------------------------------------------------------
//  Config
// ---------------------------------------------------------------------

/// Configuration for one [`crate::ScoringContext`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    pub usability: UsabilityConfig,
    pub forced_choice: ForcedChoiceConfig,
    pub readiness: ReadinessConfig,
    pub validity: ValidityConfig,
    pub gate: GateConfig,
    pub selection: SelectionConfig,
}

impl ScoringConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ScoringError::io(path, e))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let u = &self.usability;
        check_fraction("usability.subfacet_usable_fraction", u.subfacet_usable_fraction)?;
        check_fraction(
            "usability.subfacet_high_confidence_fraction",
            u.subfacet_high_confidence_fraction,
        )?;
        check_fraction("usability.practice_usable_fraction", u.practice_usable_fraction)?;
        if u.subfacet_high_confidence_fraction < u.subfacet_usable_fraction {
            return Err(ScoringError::Config(
                "usability.subfacet_high_confidence_fraction must be >= subfacet_usable_fraction"
                    .to_string(),
            ));
        }
        if !(1..=4).contains(&u.dimension_quorum) {
            return Err(ScoringError::Config(format!(
                "usability.dimension_quorum must be in 1..=4 (got {})",
                u.dimension_quorum
            )));
        }

        let fc = &self.forced_choice;
        for (name, v) in [("keyed_score", fc.keyed_score), ("non_keyed_score", fc.non_keyed_score)] {
            if !(0.0..=4.0).contains(&v) {
                return Err(ScoringError::Config(format!(
                    "forced_choice.{name} must be within 0..=4 (got {v})"
                )));
            }
        }

        let r = &self.readiness;
        for (name, w) in [
            ("access_weight", r.access_weight),
            ("practice_weight", r.practice_weight),
            ("reflection_weight", r.reflection_weight),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(ScoringError::Config(format!(
                    "readiness.{name} must be finite and non-negative (got {w})"
                )));
            }
        }
        if r.access_weight + r.practice_weight + r.reflection_weight <= 0.0 {
            return Err(ScoringError::Config(
                "readiness weights must sum to a positive value".to_string(),
            ));
        }
        if !(r.stretch_min >= r.standard_min && r.standard_min >= r.stabilize_micro_min) {
            return Err(ScoringError::Config(
                "readiness routing bands must be ordered stretch >= standard >= stabilize_micro"
                    .to_string(),
            ));
        }

        let v = &self.validity;
        if v.sd_extreme < v.sd_elevated {
            return Err(ScoringError::Config(
                "validity.sd_extreme must be >= sd_elevated".to_string(),
            ));
        }
        check_fraction("validity.speed_caution_fraction", v.speed_caution_fraction)?;
        check_fraction("validity.speed_flag_fraction", v.speed_flag_fraction)?;
        if v.straightline_flag_run < v.straightline_caution_run {
            return Err(ScoringError::Config(
                "validity.straightline_flag_run must be >= straightline_caution_run".to_string(),
            ));
        }

        let s = &self.selection;
        if s.tie_threshold < 0.0 || s.flat_sd < 0.0 {
            return Err(ScoringError::Config(
                "selection thresholds must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ScoringError::Config(format!(
            "{name} must be within [0, 1] (got {value})"
        )));
    }
    Ok(())
}

// -- Usability floors ----------------------------------------------------

/// When a subfacet, practice or dimension composite carries enough data to
/// report. Bucket floors are tied to bank density: baseline buckets are
/// item-dense, pressure buckets are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsabilityConfig {
    /// Absolute minimum answered items for a subfacet's baseline bucket.
    pub subfacet_min_baseline: usize,
    /// Absolute minimum answered items for a subfacet's under-pressure bucket.
    pub subfacet_min_under_pressure: usize,
    /// Absolute minimum answered items for a subfacet's distortion bucket.
    pub subfacet_min_distortion: usize,
    /// A bucket also needs this fraction of its bank items answered.
    pub subfacet_usable_fraction: f64,
    /// Overall subfacet coverage at or above this is high-confidence.
    pub subfacet_high_confidence_fraction: f64,
    pub practice_min_items: usize,
    pub practice_usable_fraction: f64,
    /// Subfacets (out of 4) that must report a bucket before the dimension does.
    pub dimension_quorum: usize,
}

impl Default for UsabilityConfig {
    fn default() -> Self {
        Self {
            subfacet_min_baseline: 6,
            subfacet_min_under_pressure: 2,
            subfacet_min_distortion: 1,
            subfacet_usable_fraction: 0.40,
            subfacet_high_confidence_fraction: 0.60,
            practice_min_items: 3,
            practice_usable_fraction: 0.40,
            dimension_quorum: 3,
        }
    }
}

// -- Forced choice -------------------------------------------------------

/// Binary fallback for scenario items without explicit `A=4;B=3;...` scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForcedChoiceConfig {
    pub keyed_score: f64,
    pub non_keyed_score: f64,
}

impl Default for ForcedChoiceConfig {
    fn default() -> Self {
        Self {
            keyed_score: 4.0,
            non_keyed_score: 2.0,
        }
    }
}

// -- Growth-focus readiness ---------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    pub access_weight: f64,
    pub practice_weight: f64,
    pub reflection_weight: f64,
    /// Below this, selection falls back to foundation / lowest dimension.
    pub low_threshold: f64,
    pub stretch_min: f64,
    pub standard_min: f64,
    pub stabilize_micro_min: f64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            access_weight: 0.45,
            practice_weight: 0.35,
            reflection_weight: 0.20,
            low_threshold: 3.0,
            stretch_min: 3.4,
            standard_min: 3.0,
            stabilize_micro_min: 2.4,
        }
    }
}

// -- Validity heuristics -------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidityConfig {
    pub sd_elevated: f64,
    pub sd_extreme: f64,
    /// A pair whose absolute difference reaches this is flagged.
    pub inconsistency_pair_diff: f64,
    pub inconsistency_flag_pairs: usize,
    pub inconsistency_caution_mean: f64,
    /// Mean pair gap at which an inconsistency flag drops confidence to low.
    pub inconsistency_low_mean: f64,
    pub attention_flag_misses: usize,
    pub infrequency_high_score: f64,
    pub infrequency_flag_hits: usize,
    pub speed_floor_seconds: f64,
    pub speed_caution_fraction: f64,
    pub speed_flag_fraction: f64,
    pub straightline_caution_run: usize,
    pub straightline_flag_run: usize,
    pub straightline_low_sd: f64,
    pub missing_dimensions_flag: usize,
    pub low_coverage_subfacets_flag: usize,
    pub reflection_strong_depth: f64,
    pub reflection_thin_depth: f64,
}

impl Default for ValidityConfig {
    fn default() -> Self {
        Self {
            sd_elevated: 3.2,
            sd_extreme: 3.6,
            inconsistency_pair_diff: 3.0,
            inconsistency_flag_pairs: 2,
            inconsistency_caution_mean: 1.5,
            inconsistency_low_mean: 2.0,
            attention_flag_misses: 2,
            infrequency_high_score: 3.0,
            infrequency_flag_hits: 2,
            speed_floor_seconds: 360.0,
            speed_caution_fraction: 0.45,
            speed_flag_fraction: 0.25,
            straightline_caution_run: 12,
            straightline_flag_run: 18,
            straightline_low_sd: 0.35,
            missing_dimensions_flag: 3,
            low_coverage_subfacets_flag: 6,
            reflection_strong_depth: 2.0,
            reflection_thin_depth: 1.0,
        }
    }
}

// -- Gate ----------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Efficiency ratio below this means the system is net depleting.
    pub efficiency_depleting: f64,
    pub efficiency_burnout: f64,
    pub risk_count_elevated: u32,
    /// Risk count at which load level is reported as high.
    pub risk_count_high: u32,
    pub load_high: f64,
    pub load_elevated: f64,
    pub load_moderate: f64,
    /// Under-pressure capacity at or below this counts as depleted.
    pub access_low: f64,
    pub grounding_distortion_high: f64,
    pub output_high: f64,
    /// Distortion-minus-capacity gap beyond which a modifier is reported.
    pub distortion_modifier_gap: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            efficiency_depleting: 1.0,
            efficiency_burnout: 0.8,
            risk_count_elevated: 3,
            risk_count_high: 6,
            load_high: 3.0,
            load_elevated: 2.0,
            load_moderate: 1.0,
            access_low: 2.2,
            grounding_distortion_high: 2.8,
            output_high: 3.2,
            distortion_modifier_gap: 0.8,
        }
    }
}

// -- Signature / edge-case selection ------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Net Energy points within which two dimensions count as tied.
    pub tie_threshold: f64,
    /// Population sd of candidate Net Energy below which the profile is flat.
    pub flat_sd: f64,
    pub flat_min_candidates: usize,
    pub expensive_strength_shine: f64,
    pub expensive_strength_eclipse: f64,
    pub suppressed_grounding_shine: f64,
    pub suppressed_grounding_other_shine: f64,
    pub suppressed_grounding_other_count: usize,
    pub perfect_report_shine: f64,
    pub polarization_top: f64,
    pub polarization_second: f64,
    pub ambiguity_min_cases: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            tie_threshold: 2.0,
            flat_sd: 5.0,
            flat_min_candidates: 3,
            expensive_strength_shine: 3.0,
            expensive_strength_eclipse: 2.5,
            suppressed_grounding_shine: 2.0,
            suppressed_grounding_other_shine: 3.0,
            suppressed_grounding_other_count: 4,
            perfect_report_shine: 3.2,
            polarization_top: 85.0,
            polarization_second: 60.0,
            ambiguity_min_cases: 3,
        }
    }
}
