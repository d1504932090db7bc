//! Scoring orchestrator: responses in, profile out, in one synchronous pass.
//!
//! Stage order is fixed:
//! 1. **Items**: every bank item scored against the packet
//! 2. **Reflections**: heuristic depth per prompt
//! 3. **Composites**: subfacets, then dimensions and practices
//! 4. **Indices and gate**
//! 5. **Validity and confidence**
//! 6. **Signature and growth focus**, then edge cases
//! 7. **Signals and archetype**, then output assembly
//!
//! Nothing here keeps state between calls. Identical context and packet give
//! byte-identical output.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::catalog::{ArchetypeBlock, Catalog};
use crate::config::{GateConfig, ScoringConfig};
use crate::content::ScoringContext;
use crate::error::Result;
use crate::model::{Context, Dimension, ItemBanks, Practice, SubfacetId};
use crate::output::{
    ActingBlock, ActingStatus, ContextMix, DataQuality, DimensionOutput, DistortionModifier,
    GrowthBlock, LanguageMode, LoadBlock, LoadLevel, PipelineOutput, PriorityMode, ProfileFlag,
    Recommendations, RunMetadata, SignatureBlock, SignatureDimension, ToolRecommendation,
    ValidationPlan, ValidityFlag, WeeklyFocus, INSTRUMENT_VERSION,
};
use crate::response::ResponsePacket;
use crate::scoring::archetype::match_archetype;
use crate::scoring::confidence::{resolve_confidence, ConfidenceBand};
use crate::scoring::dimension::{dimension_composites, DimensionComposite};
use crate::scoring::edge_cases::{detect_edge_cases, EdgeCaseInputs};
use crate::scoring::gate::{presence_delta, resolve_gate, DeltaStatus, GateDecision, PresenceDelta};
use crate::scoring::growth::{select_growth_focus, GrowthFocus, Routing, SelectionBasis};
use crate::scoring::indices::{system_indices, SystemIndices};
use crate::scoring::practice::practice_composites;
use crate::scoring::reflection::reflection_indices;
use crate::scoring::signals::{compute_signals, outcome_tags, top_signals};
use crate::scoring::signature::{select_signature, Signature};
use crate::scoring::subfacet::{subfacet_composites, SubfacetComposite};
use crate::scoring::validity::{self, ValidityResult};
use crate::scoring::{ScoredBanks, ScoredItem};

/// Score one packet against a loaded context.
///
/// `pilot_median_seconds` enables the relative speed checks; the hard speed
/// floor applies either way. Errors only on a structurally broken packet.
pub fn score_assessment(
    ctx: &ScoringContext,
    packet: &ResponsePacket,
    pilot_median_seconds: Option<f64>,
) -> Result<PipelineOutput> {
    packet.validate()?;
    let run_id = packet.run_id.as_str();
    let cfg = ctx.config();
    warn_unknown_responses(ctx, packet);

    // -- Items and reflections ------------------------------------------------
    let scored = ScoredBanks::score(ctx, packet);
    let reflection = reflection_indices(ctx.reflection_prompts(), packet, ctx.depth_scorer());
    debug!(
        run_id,
        answered = scored.iter().filter(|s| !s.score.missing).count(),
        reflections = reflection.answered_count,
        "items scored"
    );

    // -- Composites -----------------------------------------------------------
    let subfacets = subfacet_composites(&scored.dimension, &cfg.usability);
    let dimensions = dimension_composites(&subfacets, &cfg.usability);
    let practices = practice_composites(&scored.practice, &cfg.usability);
    debug!(
        run_id,
        subfacets = subfacets.len(),
        dimensions_with_shine = dimensions.values().filter(|d| d.shine_0_4.is_some()).count(),
        "composites built"
    );

    // -- Indices and gate -----------------------------------------------------
    let indices = system_indices(&dimensions, &scored.load);
    let gate = resolve_gate(&dimensions, &indices, &cfg.gate);
    let delta = presence_delta(&dimensions, &cfg.gate);
    debug!(run_id, gate = ?gate.mode, reasons = gate.reasons.len(), "gate resolved");

    // -- Validity and confidence ----------------------------------------------
    let validity = ValidityResult {
        social_desirability: validity::social_desirability(&scored.validity, &cfg.validity),
        inconsistency: validity::inconsistency(&scored.validity, &cfg.validity),
        attention: validity::attention(&scored.validity, &cfg.validity),
        infrequency: validity::infrequency(&scored.validity, &cfg.validity),
        speed: validity::speed(
            packet.start_ts.as_deref(),
            packet.end_ts.as_deref(),
            pilot_median_seconds,
            &cfg.validity,
        ),
        straightlining: validity::straightlining(scored.iter(), &cfg.validity),
        missingness: validity::missingness(
            &dimensions,
            &subfacets,
            cfg.usability.subfacet_high_confidence_fraction,
            &cfg.validity,
        ),
        reflection: validity::reflection_quality(&reflection, &cfg.validity),
    };
    let confidence = resolve_confidence(&validity, &gate, &cfg.validity);
    debug!(run_id, confidence = ?confidence, "confidence resolved");

    // -- Signature, growth focus, edge cases ----------------------------------
    let signature = select_signature(&dimensions, &cfg.selection);
    let growth = select_growth_focus(
        &dimensions,
        &practices,
        reflection.depth_scaled_0_4,
        &cfg.readiness,
    );
    debug!(
        run_id,
        signature = signature.as_ref().map(|s| s.pair_code.as_str()),
        growth_focus = growth.as_ref().map(|g| g.dimension.code()),
        "selection complete"
    );

    let edge_cases = detect_edge_cases(
        &EdgeCaseInputs {
            dimensions: &dimensions,
            validity: &validity,
            reflections_answered: reflection.answered_count,
            signature: signature.as_ref(),
            gate: &gate,
            efficiency_ratio: indices.efficiency_ratio,
        },
        &cfg.selection,
        &cfg.gate,
    );

    // -- Signals and archetype ------------------------------------------------
    let all_signals = compute_signals(
        ctx.signals(),
        &dimensions,
        &practices,
        &gate,
        confidence,
        &validity,
    );
    let archetype = match_archetype(ctx.catalog(), signature.as_ref()).cloned();
    debug!(
        run_id,
        signals = all_signals.len(),
        archetype = archetype.as_ref().map(|a| a.name.as_str()),
        "signals computed"
    );

    // -- Assembly -------------------------------------------------------------
    let acting = acting_status(&delta, &gate);
    let validity_flags = validity_flags(&validity);
    let profile_flag = profile_flag(&validity, signature.as_ref());

    Ok(PipelineOutput {
        run: RunMetadata {
            run_id: packet.run_id.clone(),
            instrument_version: INSTRUMENT_VERSION.to_string(),
            tier: packet.tier,
            content_fingerprint: ctx.fingerprint().to_string(),
            state_context: packet.state_context.clone(),
            context_mix: context_mix(&scored.dimension),
        },
        data_quality: data_quality(confidence, validity_flags),
        dimensions: dimension_outputs(&dimensions, &subfacets, &cfg.gate),
        practices: practices
            .iter()
            .map(|(p, c)| (p.code().to_string(), c.clone()))
            .collect(),
        load: load_block(&indices, delta, gate.clone(), &cfg.gate),
        signature: signature_block(signature.clone(), archetype.clone(), growth.clone()),
        acting: acting_block(acting, confidence, &delta, growth.as_ref()),
        signals: top_signals(&all_signals),
        outcome_tags: outcome_tags(&all_signals),
        recommendations: recommendations(&gate, growth.as_ref(), archetype.as_ref(), signature.as_ref()),
        edge_cases,
        indices,
        profile_flag,
        reflection,
        validity,
    })
}

fn warn_unknown_responses(ctx: &ScoringContext, packet: &ResponsePacket) {
    let unknown: Vec<&str> = packet
        .responses
        .keys()
        .filter(|id| !ctx.defines_item(id))
        .map(String::as_str)
        .collect();
    if let Some(first) = unknown.first() {
        warn!(
            run_id = %packet.run_id,
            count = unknown.len(),
            first,
            "ignoring responses for items no bank defines"
        );
    }
}

// =============================================================================
// Derived blocks
// =============================================================================

/// Which contexts the answered dimension items cover. Items tagged for both
/// count toward each.
pub fn context_mix(dimension_items: &[ScoredItem<'_>]) -> ContextMix {
    let (mut work, mut life) = (false, false);
    for s in dimension_items.iter().filter(|s| !s.score.missing) {
        match s.item.item.context {
            Context::Work => work = true,
            Context::Life => life = true,
            Context::Both => {
                work = true;
                life = true;
            }
        }
    }
    match (work, life) {
        (true, true) => ContextMix::Mixed,
        (true, false) => ContextMix::Work,
        (false, true) => ContextMix::Life,
        (false, false) => ContextMix::General,
    }
}

/// Flags in reporting order. Extreme social desirability supersedes the
/// milder impression-management flag.
pub fn validity_flags(v: &ValidityResult) -> Vec<ValidityFlag> {
    let mut flags = Vec::new();
    if v.social_desirability.extreme {
        flags.push(ValidityFlag::SocialDesirability);
    } else if v.social_desirability.elevated {
        flags.push(ValidityFlag::ImpressionManagement);
    }
    let rest = [
        (v.inconsistency.flag, ValidityFlag::Inconsistency),
        (v.speed.flag, ValidityFlag::Speeding),
        (v.straightlining.flag, ValidityFlag::Straightlining),
        (v.attention.flag, ValidityFlag::Attention),
        (v.infrequency.flag, ValidityFlag::Infrequency),
        (v.reflection.missing, ValidityFlag::LowReflectionDepth),
        (v.missingness.flag, ValidityFlag::Missingness),
    ];
    flags.extend(rest.into_iter().filter(|(on, _)| *on).map(|(_, f)| f));
    flags
}

fn data_quality(confidence: ConfidenceBand, validity_flags: Vec<ValidityFlag>) -> DataQuality {
    let low = confidence == ConfidenceBand::Low;
    let quality_notes = (!validity_flags.is_empty()).then(|| {
        let tail = if low {
            "Results are preliminary."
        } else {
            "Interpret results with these indicators in mind."
        };
        format!("{} validity flag(s) detected. {tail}", validity_flags.len())
    });
    let validation_plan = low.then(|| ValidationPlan {
        why: "Validity concerns reduce confidence in the current results.".to_string(),
        recommended_next_step: "COACH_DEBRIEF".to_string(),
        timing: "Within 2 weeks".to_string(),
    });
    DataQuality {
        confidence,
        validity_flags,
        quality_notes,
        validation_plan,
    }
}

pub fn distortion_modifier(c: &DimensionComposite, gap: f64) -> DistortionModifier {
    match (c.shine_0_4, c.eclipse_0_4) {
        (Some(s), Some(e)) if e - s > gap => DistortionModifier::Amplified,
        (Some(s), Some(e)) if s - e > gap => DistortionModifier::Muted,
        _ => DistortionModifier::None,
    }
}

fn dimension_outputs(
    dimensions: &BTreeMap<Dimension, DimensionComposite>,
    subfacets: &BTreeMap<SubfacetId, SubfacetComposite>,
    cfg: &GateConfig,
) -> BTreeMap<String, DimensionOutput> {
    dimensions
        .iter()
        .map(|(d, composite)| {
            let members = SubfacetId::all_for(*d)
                .iter()
                .filter_map(|id| subfacets.get(id).map(|sf| (id.to_string(), sf.clone())))
                .collect();
            let out = DimensionOutput {
                composite: composite.clone(),
                distortion_modifier: distortion_modifier(composite, cfg.distortion_modifier_gap),
                subfacets: members,
            };
            (d.code().to_string(), out)
        })
        .collect()
}

/// Load snapshot is primary; efficiency and risk count can only raise the
/// level. Unknown load reads as moderate.
pub fn load_level(indices: &SystemIndices, cfg: &GateConfig) -> LoadLevel {
    let Some(load) = indices.load_0_4 else {
        return LoadLevel::Moderate;
    };
    let efficiency_below = |t: f64| indices.efficiency_ratio.is_some_and(|r| r < t);
    let risk_at_least = |t: u32| indices.risk_count.is_some_and(|r| r >= t);

    if load >= cfg.load_high || efficiency_below(cfg.efficiency_burnout) || risk_at_least(cfg.risk_count_high) {
        LoadLevel::High
    } else if load >= cfg.load_elevated
        || efficiency_below(cfg.efficiency_depleting)
        || risk_at_least(cfg.risk_count_elevated)
    {
        LoadLevel::Elevated
    } else if load >= cfg.load_moderate {
        LoadLevel::Moderate
    } else {
        LoadLevel::Low
    }
}

fn load_block(
    indices: &SystemIndices,
    presence_delta: PresenceDelta,
    gate: GateDecision,
    cfg: &GateConfig,
) -> LoadBlock {
    let recovery_access = indices
        .load_0_4
        .map_or(50, |l| ((1.0 - l / 4.0) * 100.0).round() as i64);
    let load_pressure = indices.load_0_100.map_or(50, |l| l.round() as i64);
    let gate_summary = if gate.is_stabilize() {
        "Elevated load or reduced recovery access detected. Stabilization comes before stretch work."
    } else {
        "System is clear for progressive development work."
    };
    LoadBlock {
        level: load_level(indices, cfg),
        recovery_access,
        load_pressure,
        presence_delta,
        gate,
        gate_summary: gate_summary.to_string(),
    }
}

fn growth_basis_lines(growth: Option<&GrowthFocus>) -> Vec<String> {
    let Some(growth) = growth else {
        return Vec::new();
    };
    let applied = match growth.basis {
        SelectionBasis::Readiness => "Standard selection applied",
        SelectionBasis::Foundation => "Foundation priority applied (stabilize the first phase first)",
        SelectionBasis::LowestOverall => "No candidate ready to move; lowest dimension applied",
    };
    vec![
        "Lowest Net Energy among trait dimensions".to_string(),
        "Highest movement readiness".to_string(),
        applied.to_string(),
    ]
}

/// Line `index` of the archetype's micro-reps, when authored.
fn micro_rep(archetype: Option<&ArchetypeBlock>, index: usize) -> Option<String> {
    archetype.and_then(|a| a.micro_reps.get(index)).cloned()
}

fn signature_block(
    signature: Option<Signature>,
    archetype: Option<ArchetypeBlock>,
    growth: Option<GrowthFocus>,
) -> SignatureBlock {
    let top_two = signature
        .as_ref()
        .map(|sig| {
            let describe = |d: Dimension, why: String| SignatureDimension {
                dimension: d,
                name: d.name().to_string(),
                why_resourced: why,
                under_load_distortion: d.distortion_text().to_string(),
            };
            vec![
                describe(
                    sig.top1,
                    format!(
                        "{} ({}) shows the highest net access; this is where capacity flows most naturally.",
                        sig.top1.name(),
                        sig.top1.verb()
                    ),
                ),
                describe(
                    sig.top2,
                    format!(
                        "{} ({}) is the second power source; it fuels resilience and momentum.",
                        sig.top2.name(),
                        sig.top2.verb()
                    ),
                ),
            ]
        })
        .unwrap_or_default();

    let growth_selection_basis = growth_basis_lines(growth.as_ref());
    let growth = growth.map(|focus| {
        let d = focus.dimension;
        GrowthBlock {
            name: d.name().to_string(),
            why_this_is_next: format!(
                "{} ({}) has the highest growth impact right now; small investments here create meaningful change.",
                d.name(),
                d.verb()
            ),
            work_rep: micro_rep(archetype.as_ref(), 0).unwrap_or_else(|| {
                format!("Practice one {} micro-rep in your next work interaction.", d.name())
            }),
            life_rep: micro_rep(archetype.as_ref(), 1).unwrap_or_else(|| {
                format!(
                    "When you notice tension, apply one {} practice in your personal life.",
                    d.name()
                )
            }),
            focus,
        }
    });

    SignatureBlock {
        selection: signature,
        archetype,
        top_two,
        growth,
        growth_selection_basis,
    }
}

pub fn acting_status(delta: &PresenceDelta, gate: &GateDecision) -> ActingStatus {
    if delta.status == DeltaStatus::Elevated {
        ActingStatus::Flagged
    } else if gate.is_stabilize() {
        ActingStatus::Watch
    } else {
        ActingStatus::Clear
    }
}

pub fn language_mode(confidence: ConfidenceBand, acting: ActingStatus) -> LanguageMode {
    if confidence == ConfidenceBand::Low {
        LanguageMode::ValidationRequired
    } else if matches!(acting, ActingStatus::Flagged | ActingStatus::Watch) {
        LanguageMode::Directional
    } else {
        LanguageMode::Standard
    }
}

fn acting_block(
    status: ActingStatus,
    confidence: ConfidenceBand,
    delta: &PresenceDelta,
    growth: Option<&GrowthFocus>,
) -> ActingBlock {
    let evidence = if delta.flag {
        vec![
            "Output dimensions show high capacity while the grounding dimension shows low access or high distortion."
                .to_string(),
        ]
    } else {
        Vec::new()
    };
    let next_step = match status {
        ActingStatus::Flagged => match growth {
            Some(g) => format!(
                "Monitor with directional language. Prioritize {} practices.",
                g.dimension.name()
            ),
            None => "Monitor with directional language.".to_string(),
        },
        ActingStatus::Watch => {
            "The system is in stabilization mode. Focus on recovery practices before expansion."
                .to_string()
        }
        ActingStatus::Clear => {
            "The system is clear. Proceed with the standard development path.".to_string()
        }
    };
    ActingBlock {
        status,
        language_mode: language_mode(confidence, status),
        evidence,
        next_step,
    }
}

fn recommendations(
    gate: &GateDecision,
    growth: Option<&GrowthFocus>,
    archetype: Option<&ArchetypeBlock>,
    signature: Option<&Signature>,
) -> Recommendations {
    let stabilize = gate.is_stabilize();
    let routing = growth.map(|g| g.routing);
    let priority_mode = if stabilize {
        PriorityMode::ToolsFirst
    } else if routing == Some(Routing::Stretch) {
        PriorityMode::RepsOnly
    } else {
        PriorityMode::ToolsAndReps
    };

    let focus_name = growth.map_or("the growth focus", |g| g.dimension.name());
    let [first, second]: [Practice; 2] =
        growth.map_or(Practice::FALLBACK_PAIR, |g| g.dimension.practices());
    let label = |i: usize, p: Practice| {
        archetype
            .and_then(|a| a.starting_tools.get(i))
            .cloned()
            .unwrap_or_else(|| p.name().to_string())
    };

    let tools = vec![
        ToolRecommendation {
            practice: first,
            label: label(0, first),
            why_now: if stabilize {
                format!("Stabilizes the foundation before expanding {focus_name}.")
            } else {
                format!("Supports {focus_name} development with small, real reps.")
            },
            steps: vec![
                format!("Try one {} rep today; two minutes is enough", first.name()),
                "Notice what shifts, even slightly".to_string(),
                "Build consistency before intensity".to_string(),
            ],
            time_cost_minutes: 5,
        },
        ToolRecommendation {
            practice: second,
            label: label(1, second),
            why_now: if stabilize {
                format!("Creates safety for {focus_name} to come back online.")
            } else {
                format!("Builds {focus_name} range through intentional practice.")
            },
            steps: vec![
                format!("Start with one {} rep this week", second.name()),
                "Track what you notice".to_string(),
                "A two-minute rep counts. Keep the chain alive.".to_string(),
            ],
            time_cost_minutes: 5,
        },
    ];

    let weekly_focus = WeeklyFocus {
        dimension: growth.map(|g| g.dimension),
        focus_rep: micro_rep(archetype, 0)
            .unwrap_or_else(|| format!("Practice one {focus_name} micro-rep per day.")),
        minimum_effective_dose: "1 intentional rep per day, 5 minutes max".to_string(),
    };

    let coaching_questions = match archetype.filter(|a| !a.reflection_prompts.is_empty()) {
        Some(a) => a.reflection_prompts.iter().take(3).cloned().collect(),
        None => {
            let strengths = signature.map_or_else(
                || "your strongest dimensions".to_string(),
                |s| format!("{} and {}", s.top1.name(), s.top2.name()),
            );
            vec![
                format!("What does {focus_name} look like when it is working well in your life?"),
                format!("When do you most need {focus_name} at work?"),
                format!("How could {strengths} power this change?"),
            ]
        }
    };

    let what_not_to_do_yet = if stabilize {
        [
            "Avoid stretch goals until load stabilizes",
            "Do not force expansion in depleted dimensions",
            "Skip performance optimization; focus on recovery",
        ]
    } else {
        [
            "Do not try to improve every dimension at once",
            "Do not skip practice installation in week one",
            "Do not push intensity before consistency is established",
        ]
    };

    Recommendations {
        priority_mode,
        routing,
        tools,
        weekly_focus,
        coaching_questions,
        what_not_to_do_yet: what_not_to_do_yet.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn profile_flag(validity: &ValidityResult, signature: Option<&Signature>) -> ProfileFlag {
    if validity.missingness.flag {
        ProfileFlag::Partial
    } else if signature.is_some_and(|s| s.flat_profile) {
        ProfileFlag::Undifferentiated
    } else {
        ProfileFlag::Standard
    }
}

/// Score with a default configuration and the built-in catalog. Handy for
/// callers that already hold item banks in memory.
pub fn score_with_defaults(
    banks: ItemBanks,
    packet: &ResponsePacket,
) -> Result<PipelineOutput> {
    let ctx = ScoringContext::new(banks, Catalog::builtin(), ScoringConfig::default())?;
    score_assessment(&ctx, packet, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::gate::GateMode;
    use crate::scoring::math::to_100;

    fn dim(shine: Option<f64>, eclipse: Option<f64>) -> DimensionComposite {
        DimensionComposite {
            dimension: Dimension::R1,
            name: Dimension::R1.name().to_string(),
            shine_0_4: shine,
            access_0_4: None,
            eclipse_0_4: eclipse,
            shine_0_100: shine.map(to_100),
            access_0_100: None,
            eclipse_0_100: eclipse.map(to_100),
            net_energy_0_100: None,
            subfacet_count: 4,
            partial: false,
        }
    }

    #[test]
    fn distortion_modifier_needs_a_clear_gap() {
        assert_eq!(distortion_modifier(&dim(Some(1.0), Some(2.0)), 0.8), DistortionModifier::Amplified);
        assert_eq!(distortion_modifier(&dim(Some(3.0), Some(2.0)), 0.8), DistortionModifier::Muted);
        assert_eq!(distortion_modifier(&dim(Some(2.0), Some(2.5)), 0.8), DistortionModifier::None);
        assert_eq!(distortion_modifier(&dim(None, Some(4.0)), 0.8), DistortionModifier::None);
    }

    #[test]
    fn load_level_escalates_on_modifiers() {
        let cfg = GateConfig::default();
        let mut idx = SystemIndices {
            load_0_4: Some(0.5),
            efficiency_ratio: Some(1.4),
            risk_count: Some(0),
            ..SystemIndices::default()
        };
        assert_eq!(load_level(&idx, &cfg), LoadLevel::Low);
        idx.risk_count = Some(3);
        assert_eq!(load_level(&idx, &cfg), LoadLevel::Elevated);
        idx.efficiency_ratio = Some(0.7);
        assert_eq!(load_level(&idx, &cfg), LoadLevel::High);
        idx.load_0_4 = None;
        assert_eq!(load_level(&idx, &cfg), LoadLevel::Moderate);
    }

    #[test]
    fn validity_flags_keep_reporting_order() {
        let mut v = ValidityResult::default();
        v.missingness.flag = true;
        v.speed.flag = true;
        v.social_desirability.elevated = true;
        v.reflection.missing = true;
        assert_eq!(
            validity_flags(&v),
            vec![
                ValidityFlag::ImpressionManagement,
                ValidityFlag::Speeding,
                ValidityFlag::LowReflectionDepth,
                ValidityFlag::Missingness,
            ]
        );
        v.social_desirability.extreme = true;
        assert_eq!(validity_flags(&v)[0], ValidityFlag::SocialDesirability);
    }

    #[test]
    fn acting_and_language_modes() {
        let proceed = GateDecision {
            mode: GateMode::Proceed,
            reasons: vec![],
        };
        let delta = PresenceDelta {
            status: DeltaStatus::Elevated,
            flag: true,
            output_mean_0_4: Some(3.5),
        };
        let acting = acting_status(&delta, &proceed);
        assert_eq!(acting, ActingStatus::Flagged);
        assert_eq!(language_mode(ConfidenceBand::High, acting), LanguageMode::Directional);
        assert_eq!(language_mode(ConfidenceBand::Low, acting), LanguageMode::ValidationRequired);
        assert_eq!(
            language_mode(ConfidenceBand::High, ActingStatus::Clear),
            LanguageMode::Standard
        );
    }
}
