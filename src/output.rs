//! The scored profile handed to reports, persistence and QA tooling.
//!
//! Owns every stage result by value. Maps are keyed by display codes
//! (`R1`, `R3b`, `T004`) so the JSON reads the way the instrument does.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::ArchetypeBlock;
use crate::error::{Result, ScoringError};
use crate::model::{Dimension, Practice};
use crate::response::Tier;
use crate::scoring::confidence::ConfidenceBand;
use crate::scoring::dimension::DimensionComposite;
use crate::scoring::edge_cases::EdgeCaseResult;
use crate::scoring::gate::{GateDecision, PresenceDelta};
use crate::scoring::growth::{GrowthFocus, Routing};
use crate::scoring::indices::SystemIndices;
use crate::scoring::practice::PracticeComposite;
use crate::scoring::reflection::ReflectionIndices;
use crate::scoring::signals::{ExecutiveSignal, OutcomeTag};
use crate::scoring::signature::Signature;
use crate::scoring::subfacet::SubfacetComposite;
use crate::scoring::validity::ValidityResult;

pub const INSTRUMENT_VERSION: &str = "v1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub run: RunMetadata,
    pub data_quality: DataQuality,
    pub dimensions: BTreeMap<String, DimensionOutput>,
    pub practices: BTreeMap<String, PracticeComposite>,
    pub load: LoadBlock,
    pub signature: SignatureBlock,
    pub acting: ActingBlock,
    /// The highest-banded executive signals.
    pub signals: Vec<ExecutiveSignal>,
    pub outcome_tags: Vec<OutcomeTag>,
    pub recommendations: Recommendations,
    pub edge_cases: Vec<EdgeCaseResult>,
    pub indices: SystemIndices,
    pub profile_flag: ProfileFlag,
    pub reflection: ReflectionIndices,
    pub validity: ValidityResult,
}

impl PipelineOutput {
    /// blake3 over the compact JSON encoding. Equal outputs hash equal.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&bytes).to_hex().to_string()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ScoringError::io(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn dimension(&self, d: Dimension) -> Option<&DimensionOutput> {
        self.dimensions.get(d.code())
    }
}

// =============================================================================
// Run metadata and data quality
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextMix {
    Work,
    Life,
    Mixed,
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: String,
    pub instrument_version: String,
    pub tier: Tier,
    pub content_fingerprint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_context: Option<String>,
    pub context_mix: ContextMix,
}

/// Reported validity concerns, in a fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidityFlag {
    SocialDesirability,
    ImpressionManagement,
    Inconsistency,
    Speeding,
    Straightlining,
    Attention,
    Infrequency,
    LowReflectionDepth,
    Missingness,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPlan {
    pub why: String,
    pub recommended_next_step: String,
    pub timing: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    pub confidence: ConfidenceBand,
    pub validity_flags: Vec<ValidityFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_plan: Option<ValidationPlan>,
}

// =============================================================================
// Dimensions and load
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistortionModifier {
    Amplified,
    Muted,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionOutput {
    pub composite: DimensionComposite,
    pub distortion_modifier: DistortionModifier,
    pub subfacets: BTreeMap<String, SubfacetComposite>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadLevel {
    Low,
    Moderate,
    Elevated,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBlock {
    pub level: LoadLevel,
    /// `round((1 - load/4) * 100)`; 50 when load is unknown.
    pub recovery_access: i64,
    /// `round(load_0_100)`; 50 when load is unknown.
    pub load_pressure: i64,
    pub presence_delta: PresenceDelta,
    pub gate: GateDecision,
    pub gate_summary: String,
}

// =============================================================================
// Signature and growth focus
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureDimension {
    pub dimension: Dimension,
    pub name: String,
    pub why_resourced: String,
    pub under_load_distortion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthBlock {
    pub focus: GrowthFocus,
    pub name: String,
    pub why_this_is_next: String,
    pub work_rep: String,
    pub life_rep: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Signature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<ArchetypeBlock>,
    pub top_two: Vec<SignatureDimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth: Option<GrowthBlock>,
    pub growth_selection_basis: Vec<String>,
}

// =============================================================================
// Acting status and recommendations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActingStatus {
    Flagged,
    Watch,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LanguageMode {
    ValidationRequired,
    Directional,
    Standard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActingBlock {
    pub status: ActingStatus,
    pub language_mode: LanguageMode,
    pub evidence: Vec<String>,
    pub next_step: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityMode {
    ToolsFirst,
    RepsOnly,
    ToolsAndReps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRecommendation {
    pub practice: Practice,
    pub label: String,
    pub why_now: String,
    pub steps: Vec<String>,
    pub time_cost_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyFocus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    pub focus_rep: String,
    pub minimum_effective_dose: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub priority_mode: PriorityMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<Routing>,
    pub tools: Vec<ToolRecommendation>,
    pub weekly_focus: WeeklyFocus,
    pub coaching_questions: Vec<String>,
    pub what_not_to_do_yet: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileFlag {
    Standard,
    Partial,
    Undifferentiated,
}
