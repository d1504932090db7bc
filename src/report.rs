//! Markdown rendering for scored profiles.

use serde::Serialize;

use crate::model::Dimension;
use crate::output::PipelineOutput;
use crate::scoring::signals::SignalBand;

#[derive(Debug, Clone, Serialize)]
pub struct ReportOptions {
    pub include_subfacets: bool,
    /// List edge cases that did not fire as well as those that did.
    pub include_clear_edge_cases: bool,
    pub include_growth_candidates: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_subfacets: false,
            include_clear_edge_cases: false,
            include_growth_candidates: true,
        }
    }
}

fn fmt_opt(value: Option<f64>, places: usize) -> String {
    match value {
        Some(v) => format!("{v:.places$}"),
        None => "n/a".to_string(),
    }
}

pub fn render_report_markdown(output: &PipelineOutput, opts: &ReportOptions) -> String {
    let mut out = String::new();
    out.push_str("# Assessment Report\n\n");
    out.push_str(&format!("- Run: `{}`\n", output.run.run_id));
    out.push_str(&format!("- Output hash: `{}`\n", output.fingerprint()));
    out.push_str(&format!("- Content fingerprint: `{}`\n", output.run.content_fingerprint));
    out.push_str(&format!("- Instrument: {} ({:?})\n", output.run.instrument_version, output.run.tier));
    out.push_str(&format!("- Context mix: {:?}\n", output.run.context_mix));
    if let Some(state) = &output.run.state_context {
        out.push_str(&format!("- State context: {state}\n"));
    }
    out.push_str(&format!("- Confidence: {:?}\n", output.data_quality.confidence));
    out.push_str(&format!("- Profile: {:?}\n", output.profile_flag));
    if !output.data_quality.validity_flags.is_empty() {
        let flags: Vec<String> = output
            .data_quality
            .validity_flags
            .iter()
            .map(|f| format!("{f:?}"))
            .collect();
        out.push_str(&format!("- Validity flags: {}\n", flags.join(", ")));
    }
    if let Some(notes) = &output.data_quality.quality_notes {
        out.push_str(&format!("- Notes: {notes}\n"));
    }
    if let Some(plan) = &output.data_quality.validation_plan {
        out.push_str(&format!(
            "- Validation plan: {} ({})\n",
            plan.recommended_next_step, plan.timing
        ));
    }

    // -- Load ---------------------------------------------------------------
    let load = &output.load;
    out.push_str("\n## Load\n\n");
    out.push_str(&format!("- Level: {:?}\n", load.level));
    out.push_str(&format!("- Gate: {:?}\n", load.gate.mode));
    for reason in &load.gate.reasons {
        out.push_str(&format!("  - {reason:?}\n"));
    }
    out.push_str(&format!(
        "- Recovery access / load pressure: {} / {}\n",
        load.recovery_access, load.load_pressure
    ));
    out.push_str(&format!(
        "- Efficiency ratio: {}, risk count: {}\n",
        fmt_opt(output.indices.efficiency_ratio, 3),
        output
            .indices
            .risk_count
            .map_or_else(|| "n/a".to_string(), |r| r.to_string())
    ));
    out.push_str(&format!("- {}\n", load.gate_summary));
    out.push_str(&format!(
        "- Acting status: {:?} ({:?} language)\n",
        output.acting.status, output.acting.language_mode
    ));

    // -- Dimensions ---------------------------------------------------------
    out.push_str("\n## Dimensions\n\n");
    out.push_str("| Dimension | Shine | Access | Eclipse | Net Energy | Modifier |\n");
    out.push_str("|---|---|---|---|---|---|\n");
    for d in Dimension::ALL {
        let Some(dim) = output.dimension(d) else {
            continue;
        };
        let c = &dim.composite;
        out.push_str(&format!(
            "| {} {} | {} | {} | {} | {} | {:?} |\n",
            d.code(),
            d.name(),
            fmt_opt(c.shine_0_100, 1),
            fmt_opt(c.access_0_100, 1),
            fmt_opt(c.eclipse_0_100, 1),
            fmt_opt(c.net_energy_0_100, 1),
            dim.distortion_modifier
        ));
        if opts.include_subfacets {
            for (code, sf) in &dim.subfacets {
                out.push_str(&format!(
                    "|   {} {} | {} | {} | {} | | coverage {:.2} |\n",
                    code,
                    sf.name,
                    fmt_opt(sf.shine_0_4, 2),
                    fmt_opt(sf.access_0_4, 2),
                    fmt_opt(sf.eclipse_0_4, 2),
                    sf.coverage
                ));
            }
        }
    }

    // -- Signature and growth -----------------------------------------------
    let sig = &output.signature;
    out.push_str("\n## Signature\n\n");
    match &sig.selection {
        Some(selection) => {
            out.push_str(&format!(
                "- Pair: {} (ranked by {:?})\n",
                selection.pair_code, selection.metric
            ));
            if selection.close_call {
                out.push_str("- Close call: tie-break applied\n");
            }
            if let Some(archetype) = &sig.archetype {
                out.push_str(&format!("- Archetype: {}\n", archetype.name));
            }
            for top in &sig.top_two {
                out.push_str(&format!("- **{}**: {}\n", top.name, top.why_resourced));
                out.push_str(&format!("  - Under load: {}\n", top.under_load_distortion));
            }
        }
        None => out.push_str("- Not enough scored dimensions for a signature.\n"),
    }

    if let Some(growth) = &sig.growth {
        out.push_str("\n## Growth Focus\n\n");
        out.push_str(&format!(
            "- {} ({:?}, routing {})\n",
            growth.name,
            growth.focus.basis,
            growth.focus.routing.as_str()
        ));
        out.push_str(&format!("- {}\n", growth.why_this_is_next));
        out.push_str(&format!("- Work rep: {}\n", growth.work_rep));
        out.push_str(&format!("- Life rep: {}\n", growth.life_rep));
        if opts.include_growth_candidates {
            for c in &growth.focus.candidates {
                out.push_str(&format!(
                    "  - {} NE {:.1}, readiness {}, access {}, practice {}\n",
                    c.dimension,
                    c.net_energy_0_100,
                    fmt_opt(c.readiness, 2),
                    fmt_opt(c.access_0_4, 2),
                    fmt_opt(c.practice_readiness, 2)
                ));
            }
        }
    }

    // -- Signals ------------------------------------------------------------
    if !output.signals.is_empty() {
        out.push_str("\n## Executive Signals\n\n");
        for s in &output.signals {
            let marker = if s.band >= SignalBand::Elevated { "**" } else { "" };
            out.push_str(&format!(
                "- {marker}{}{marker} `{}` {:?} (base {})\n",
                s.label,
                s.signal_id,
                s.band,
                fmt_opt(s.base_score_0_4, 2)
            ));
        }
    }

    // -- Recommendations ----------------------------------------------------
    let rec = &output.recommendations;
    out.push_str("\n## Recommendations\n\n");
    out.push_str(&format!("- Priority: {:?}\n", rec.priority_mode));
    for tool in &rec.tools {
        out.push_str(&format!(
            "- `{}` {}: {} ({} min)\n",
            tool.practice, tool.label, tool.why_now, tool.time_cost_minutes
        ));
    }
    out.push_str(&format!("- Weekly focus: {}\n", rec.weekly_focus.focus_rep));
    out.push_str("\nNot yet:\n\n");
    for item in &rec.what_not_to_do_yet {
        out.push_str(&format!("- {item}\n"));
    }

    // -- Edge cases ---------------------------------------------------------
    let shown: Vec<_> = output
        .edge_cases
        .iter()
        .filter(|e| e.detected || opts.include_clear_edge_cases)
        .collect();
    if !shown.is_empty() {
        out.push_str("\n## Edge Cases\n\n");
        for e in shown {
            match &e.restriction {
                Some(restriction) => {
                    out.push_str(&format!("- {:?}: {}\n", e.case, restriction))
                }
                None => out.push_str(&format!("- {:?}: clear\n", e.case)),
            }
        }
    }

    out
}
