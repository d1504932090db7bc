use std::sync::Arc;

use rayscore::model::ItemBanks;
use rayscore::output::{
    ActingStatus, ContextMix, DistortionModifier, LanguageMode, LoadLevel, PriorityMode,
    ProfileFlag, ValidityFlag,
};
use rayscore::scoring::confidence::ConfidenceBand;
use rayscore::scoring::edge_cases::{detected, EdgeCase};
use rayscore::scoring::gate::GateMode;
use rayscore::scoring::growth::{Routing, SelectionBasis};
use rayscore::scoring::signals::SignalBand;
use rayscore::synthetic::{
    packet_from_fn, synthetic_banks, synthetic_packet, with_reflections, with_session_seconds,
    SyntheticProfile,
};
use rayscore::{
    score_assessment, Catalog, Dimension, PipelineOutput, ResponsePacket, ScoringConfig,
    ScoringContext,
};

const RESOURCED: SyntheticProfile = SyntheticProfile::Resourced {
    top: [Dimension::R2, Dimension::R6],
};

fn context() -> (ScoringContext, ItemBanks) {
    let banks = synthetic_banks();
    let ctx = ScoringContext::new(banks.clone(), Catalog::builtin(), ScoringConfig::default())
        .unwrap();
    (ctx, banks)
}

/// A full, clean session: every item, every reflection, twenty minutes.
fn complete_packet(banks: &ItemBanks, profile: SyntheticProfile) -> ResponsePacket {
    let packet = synthetic_packet("run-1", banks, profile);
    let packet = with_reflections(packet, &banks.reflection_prompts);
    with_session_seconds(packet, 1200)
}

fn score(ctx: &ScoringContext, packet: &ResponsePacket) -> PipelineOutput {
    score_assessment(ctx, packet, None).unwrap()
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let (ctx, banks) = context();
    let packet = complete_packet(&banks, RESOURCED);

    let runs: Vec<PipelineOutput> = (0..3).map(|_| score(&ctx, &packet)).collect();
    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[1], runs[2]);
    assert_eq!(runs[0].fingerprint(), runs[2].fingerprint());
    assert_eq!(runs[0].fingerprint().len(), 64);
}

#[test]
fn shared_context_scores_identically_across_threads() {
    let (ctx, banks) = context();
    let ctx = Arc::new(ctx);
    let packet = Arc::new(complete_packet(&banks, RESOURCED));
    let expected = score(&ctx, &packet).fingerprint();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ctx = Arc::clone(&ctx);
            let packet = Arc::clone(&packet);
            std::thread::spawn(move || score(&ctx, &packet).fingerprint())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

#[test]
fn output_survives_a_json_round_trip() {
    let (ctx, banks) = context();
    let output = score(&ctx, &complete_packet(&banks, SyntheticProfile::GroundingSuppressed));
    let raw = output.to_json_pretty().unwrap();
    let back: PipelineOutput = serde_json::from_str(&raw).unwrap();
    assert_eq!(back, output);
    assert_eq!(back.fingerprint(), output.fingerprint());
}

#[test]
fn state_context_is_echoed_but_never_scored() {
    let (ctx, banks) = context();
    let plain = complete_packet(&banks, RESOURCED);
    let mut labelled = plain.clone();
    labelled.state_context = Some("post-travel".to_string());

    let a = score(&ctx, &plain);
    let mut b = score(&ctx, &labelled);
    assert_eq!(b.run.state_context.as_deref(), Some("post-travel"));
    b.run.state_context = None;
    assert_eq!(a, b);
}

#[test]
fn responses_for_unknown_items_are_ignored() {
    let (ctx, banks) = context();
    let packet = complete_packet(&banks, RESOURCED);
    let mut noisy = packet.clone();
    noisy.set("NOT-AN-ITEM", 3.0);
    assert_eq!(score(&ctx, &packet), score(&ctx, &noisy));
}

#[test]
fn empty_run_id_is_a_contract_error() {
    let (ctx, banks) = context();
    let mut packet = complete_packet(&banks, RESOURCED);
    packet.run_id = String::new();
    assert!(score_assessment(&ctx, &packet, None).is_err());
}

#[test]
fn resourced_profile_reads_clean() {
    let (ctx, banks) = context();
    let out = score(&ctx, &complete_packet(&banks, RESOURCED));

    assert_eq!(out.load.gate.mode, GateMode::Proceed);
    assert_eq!(out.data_quality.confidence, ConfidenceBand::High);
    assert!(out.data_quality.validity_flags.is_empty());
    assert!(out.data_quality.validation_plan.is_none());
    assert_eq!(out.run.context_mix, ContextMix::Mixed);
    assert_eq!(out.profile_flag, ProfileFlag::Standard);

    let sig = out.signature.selection.as_ref().unwrap();
    assert_eq!(sig.top1, Dimension::R2);
    assert_eq!(sig.top2, Dimension::R6);
    assert_eq!(sig.pair_code, "R2-R6");
    assert!(!sig.flat_profile);
    assert_eq!(out.signature.archetype.as_ref().unwrap().pair_code, "R2-R6");
    assert_eq!(out.signature.top_two.len(), 2);

    let growth = out.signature.growth.as_ref().unwrap();
    assert_eq!(growth.focus.dimension, Dimension::R1);
    assert_eq!(growth.focus.basis, SelectionBasis::Readiness);
    assert_eq!(growth.focus.routing, Routing::Standard);
    assert_eq!(growth.focus.candidates.len(), 3);

    assert_eq!(out.acting.status, ActingStatus::Clear);
    assert_eq!(out.acting.language_mode, LanguageMode::Standard);
    assert_eq!(out.recommendations.priority_mode, PriorityMode::ToolsAndReps);
    assert_eq!(out.recommendations.tools.len(), 2);
    assert!(out.signals.len() <= 6);
    assert_eq!(out.edge_cases.len(), 10);
    assert!(out.edge_cases.iter().all(|e| !e.detected));
}

#[test]
fn grounding_suppression_stabilizes_the_system() {
    let (ctx, banks) = context();
    let out = score(&ctx, &complete_packet(&banks, SyntheticProfile::GroundingSuppressed));

    assert_eq!(out.load.gate.mode, GateMode::Stabilize);
    assert!(!out.load.gate.reasons.is_empty());
    assert_eq!(out.load.level, LoadLevel::Elevated);
    assert!(detected(&out.edge_cases, EdgeCase::SuppressedGrounding));

    // A clean respondent is still capped while the gate says stabilize.
    assert_eq!(out.data_quality.confidence, ConfidenceBand::Moderate);
    assert_eq!(out.acting.status, ActingStatus::Flagged);
    assert_eq!(out.acting.language_mode, LanguageMode::Directional);
    assert_eq!(out.recommendations.priority_mode, PriorityMode::ToolsFirst);

    assert!(out.signals.iter().all(|s| s.band <= SignalBand::Moderate));
    assert!(out.outcome_tags.is_empty());

    let grounding = out.dimension(Dimension::R3).unwrap();
    assert_eq!(grounding.distortion_modifier, DistortionModifier::Amplified);

    let growth = out.signature.growth.as_ref().unwrap();
    assert_eq!(growth.focus.dimension, Dimension::R3);
    assert_eq!(growth.focus.basis, SelectionBasis::Foundation);
    assert_eq!(growth.focus.routing, Routing::StabilizeRetest);

    let sig = out.signature.selection.as_ref().unwrap();
    assert!(sig.close_call);
    assert_ne!(sig.top1, Dimension::R3);
}

#[test]
fn uniform_answers_read_as_flat_and_unreliable() {
    let (ctx, banks) = context();
    let packet = with_session_seconds(
        synthetic_packet("uniform", &banks, SyntheticProfile::Uniform(2.0)),
        1200,
    );
    let out = score(&ctx, &packet);

    let sig = out.signature.selection.as_ref().unwrap();
    assert!(sig.flat_profile);
    // Every Net Energy ties, so the lowest-numbered dimensions win.
    assert_eq!(sig.pair_code, "R1-R2");
    assert_eq!(out.profile_flag, ProfileFlag::Undifferentiated);
    assert!(detected(&out.edge_cases, EdgeCase::FlatProfile));
    assert!(detected(&out.edge_cases, EdgeCase::MissingReflection));

    assert!(out.data_quality.confidence <= ConfidenceBand::Moderate);
    let flags = &out.data_quality.validity_flags;
    assert!(flags.contains(&ValidityFlag::Straightlining));
    assert!(flags.contains(&ValidityFlag::LowReflectionDepth));
    assert!(out.validity.reflection.missing);
}

#[test]
fn fast_sessions_drop_confidence_to_low() {
    let (ctx, banks) = context();
    let packet = with_session_seconds(
        with_reflections(synthetic_packet("fast", &banks, RESOURCED), &banks.reflection_prompts),
        120,
    );
    let out = score(&ctx, &packet);

    assert!(out.validity.speed.flag);
    assert_eq!(out.data_quality.confidence, ConfidenceBand::Low);
    assert!(out.data_quality.validity_flags.contains(&ValidityFlag::Speeding));
    assert_eq!(out.acting.language_mode, LanguageMode::ValidationRequired);
    let plan = out.data_quality.validation_plan.as_ref().unwrap();
    assert_eq!(plan.recommended_next_step, "COACH_DEBRIEF");
}

#[test]
fn pilot_median_enables_relative_speed_checks() {
    let (ctx, banks) = context();
    let packet = with_session_seconds(
        with_reflections(synthetic_packet("pilot", &banks, RESOURCED), &banks.reflection_prompts),
        600,
    );

    let without = score_assessment(&ctx, &packet, None).unwrap();
    assert!(!without.validity.speed.flag);

    let with = score_assessment(&ctx, &packet, Some(3000.0)).unwrap();
    assert!(with.validity.speed.flag);
    assert_eq!(with.data_quality.confidence, ConfidenceBand::Low);
}

#[test]
fn overflow_dimension_is_never_the_growth_focus() {
    let (ctx, banks) = context();
    let low = SyntheticProfile::Uniform(0.5);
    let packet = packet_from_fn("overflow", &banks, |item, ordinal| {
        if item.item_id.starts_with("R9") {
            low.answer(item, ordinal)
        } else {
            RESOURCED.answer(item, ordinal)
        }
    });
    let packet = with_session_seconds(with_reflections(packet, &banks.reflection_prompts), 1200);
    let out = score(&ctx, &packet);

    let r9 = out.dimension(Dimension::R9).unwrap();
    let lowest_trait = Dimension::ALL
        .into_iter()
        .filter(|d| *d != Dimension::R9)
        .filter_map(|d| out.dimension(d).unwrap().composite.net_energy_0_100)
        .fold(f64::INFINITY, f64::min);
    assert!(r9.composite.net_energy_0_100.unwrap() < lowest_trait);

    let growth = out.signature.growth.as_ref().unwrap();
    assert_ne!(growth.focus.dimension, Dimension::R9);
    assert!(growth
        .focus
        .candidates
        .iter()
        .all(|c| c.dimension != Dimension::R9));
    let sig = out.signature.selection.as_ref().unwrap();
    assert_ne!(sig.top1, Dimension::R9);
    assert_ne!(sig.top2, Dimension::R9);
}

#[test]
fn dimension_needs_three_of_four_subfacets() {
    let (ctx, banks) = context();
    let drop_baseline = |prefixes: &'static [&'static str]| {
        packet_from_fn("quorum", &banks, move |item, ordinal| {
            let baseline = item.item_id.len() == 6
                && item.item_id[4..].parse::<u32>().is_ok_and(|n| n <= 6);
            if baseline && prefixes.iter().any(|p| item.item_id.starts_with(p)) {
                None
            } else {
                RESOURCED.answer(item, ordinal)
            }
        })
    };

    let one_short = score(&ctx, &drop_baseline(&["R5a"]));
    let r5 = &one_short.dimension(Dimension::R5).unwrap().composite;
    assert!(r5.shine_0_4.is_some());
    assert!(r5.partial);

    let two_short = score(&ctx, &drop_baseline(&["R5a", "R5b"]));
    let r5 = &two_short.dimension(Dimension::R5).unwrap().composite;
    assert_eq!(r5.shine_0_4, None);
    assert_eq!(r5.net_energy_0_100, None);
    assert!(r5.eclipse_0_4.is_some());
    let sig = two_short.signature.selection.as_ref().unwrap();
    assert_ne!(sig.top1, Dimension::R5);
    assert_ne!(sig.top2, Dimension::R5);
}

#[test]
fn scale_endpoints_count_and_out_of_range_values_do_not() {
    let (ctx, banks) = context();
    let mut packet = complete_packet(&banks, RESOURCED);
    packet.set("R1b-01", 0.0);
    packet.set("R1b-02", 4.0);
    packet.set("R1c-01", 5.0);
    packet.set("R1c-02", -1.0);
    let out = score(&ctx, &packet);

    let r1 = out.dimension(Dimension::R1).unwrap();
    let r1b = &r1.subfacets["R1b"];
    assert_eq!(r1b.coverage, 1.0);
    assert!(r1b.shine_0_4.is_some());

    let r1c = &r1.subfacets["R1c"];
    assert!((r1c.coverage - 0.8).abs() < 1e-12);
    // Baseline floor is six answered items.
    assert_eq!(r1c.shine_0_4, None);
    assert!(r1.composite.partial);
}

#[test]
fn malformed_answers_score_as_unanswered() {
    let (ctx, banks) = context();
    let packet = complete_packet(&banks, RESOURCED);
    let mut raw = serde_json::to_value(&packet).unwrap();
    raw["responses"]["R1c-01"]["value"] = serde_json::json!(true);
    raw["responses"]["R1c-02"]["value"] = serde_json::json!({"a": 1});
    raw["responses"]["R1c-03"]["value"] = serde_json::json!("banana");
    let malformed = ResponsePacket::from_json_str(&raw.to_string()).unwrap();
    let out = score_assessment(&ctx, &malformed, None).unwrap();

    let mut dropped = raw.clone();
    for id in ["R1c-01", "R1c-02", "R1c-03"] {
        dropped["responses"].as_object_mut().unwrap().remove(id);
    }
    let dropped = ResponsePacket::from_json_str(&dropped.to_string()).unwrap();
    let expected = score_assessment(&ctx, &dropped, None).unwrap();

    let r1 = out.dimension(Dimension::R1).unwrap();
    assert!(r1.subfacets["R1c"].coverage < 1.0);
    assert_eq!(r1, expected.dimension(Dimension::R1).unwrap());
}

#[test]
fn out_of_range_literal_does_not_reject_the_packet() {
    let (ctx, banks) = context();
    let mut packet = complete_packet(&banks, RESOURCED);
    packet.responses.remove("R1c-01");
    let json = serde_json::to_string(&packet)
        .unwrap()
        .replacen("\"responses\":{", "\"responses\":{\"R1c-01\":{\"value\":1e400},", 1);
    let packet = ResponsePacket::from_json_str(&json).unwrap();
    let out = score_assessment(&ctx, &packet, None).unwrap();
    assert!(out.dimension(Dimension::R1).unwrap().subfacets["R1c"].coverage < 1.0);
}
