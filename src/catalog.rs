//! Executive-signal definitions and signature-pair archetype blocks.
//!
//! Both are descriptive content: the built-in catalog carries the 24 signals
//! and the 36 pair names, and a content root may replace the signals or
//! enrich archetypes with `signals.json` / `archetypes.json`.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{pair_code, Dimension, Practice};

static TOOL_PREDICTOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Tool:\s*([^,;]+)").expect("Invalid tool predictor regex"));

// =============================================================================
// Executive signals
// =============================================================================

/// One advisory signal as authored in content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDefinition {
    pub signal_id: String,
    pub label: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub definition: String,
    /// Comma-separated dimension names ("Intention, Presence").
    #[serde(default)]
    pub dimensions_involved: String,
    /// Free text; practices are referenced as `Tool: <name>`.
    #[serde(default)]
    pub primary_predictors: String,
}

/// Dimensions and practices a signal averages over, parsed once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Predictors {
    pub dimensions: Vec<Dimension>,
    pub practices: Vec<Practice>,
}

impl SignalDefinition {
    /// Parse predictors. Unrecognised names are skipped with a warning: a
    /// signal with no predictors simply bands as low.
    pub fn predictors(&self) -> Predictors {
        let mut out = Predictors::default();
        for name in self
            .dimensions_involved
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            match dimension_from_name(name) {
                Some(d) if !out.dimensions.contains(&d) => out.dimensions.push(d),
                Some(_) => {}
                None => warn!(signal = %self.signal_id, name, "unrecognised dimension in signal"),
            }
        }
        for cap in TOOL_PREDICTOR.captures_iter(&self.primary_predictors) {
            let name = cap[1].trim();
            match Practice::from_name(name) {
                Some(p) if !out.practices.contains(&p) => out.practices.push(p),
                Some(_) => {}
                None => warn!(signal = %self.signal_id, name, "unrecognised practice in signal"),
            }
        }
        out
    }
}

fn dimension_from_name(name: &str) -> Option<Dimension> {
    Dimension::ALL
        .into_iter()
        .find(|d| name.contains(d.short_name()))
        .or_else(|| name.contains("Light").then_some(Dimension::R9))
}

// =============================================================================
// Archetypes
// =============================================================================

/// Descriptive metadata for one signature pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArchetypeBlock {
    pub pair_code: String,
    pub name: String,
    #[serde(default)]
    pub essence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strengths: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_distortion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coaching_logic: Option<String>,
    /// Practice labels, in recommendation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub starting_tools: Vec<String>,
    /// Work micro-rep first, life micro-rep second.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub micro_reps: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reflection_prompts: Vec<String>,
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub signals: Vec<SignalDefinition>,
    /// Keyed by sorted pair code (`R1-R5`).
    pub archetypes: BTreeMap<String, ArchetypeBlock>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            signals: builtin_signals(),
            archetypes: builtin_archetypes(),
        }
    }

    /// Layer authored archetype blocks over the built-in ones. Blocks are
    /// re-keyed by their normalised pair code so `R5-R1` and `R1-R5` collide.
    pub fn merge_archetypes(&mut self, blocks: Vec<ArchetypeBlock>) {
        for mut block in blocks {
            let Some(code) = normalize_pair_code(&block.pair_code) else {
                warn!(pair_code = %block.pair_code, "skipping archetype with malformed pair code");
                continue;
            };
            block.pair_code = code.clone();
            self.archetypes.insert(code, block);
        }
    }

    pub fn archetype(&self, pair_code: &str) -> Option<&ArchetypeBlock> {
        self.archetypes.get(pair_code)
    }
}

fn normalize_pair_code(raw: &str) -> Option<String> {
    let (a, b) = raw.trim().split_once('-')?;
    let parse = |s: &str| {
        s.trim()
            .strip_prefix('R')
            .and_then(|n| n.parse::<u8>().ok())
            .and_then(Dimension::from_number)
    };
    let (a, b) = (parse(a)?, parse(b)?);
    (a != b).then(|| pair_code(a, b))
}

fn signal(
    id: &str,
    label: &str,
    category: &str,
    definition: &str,
    dimensions: &str,
    predictors: &str,
) -> SignalDefinition {
    SignalDefinition {
        signal_id: id.to_string(),
        label: label.to_string(),
        category: category.to_string(),
        definition: definition.to_string(),
        dimensions_involved: dimensions.to_string(),
        primary_predictors: predictors.to_string(),
    }
}

fn builtin_signals() -> Vec<SignalDefinition> {
    const CORE: &str = "Core 18";
    const EXEC: &str = "Exec 6";
    vec![
        signal("M001", "Daily Intentionality", CORE,
            "Sets direction before the day sets it.",
            "Intention", "Ray items, Tool: If/Then Planning"),
        signal("M002", "Time/Attention Architecture", CORE,
            "Structures time and attention around priorities.",
            "Intention, Presence", "Ray items, Tool: Presence Pause"),
        signal("M003", "Joy Access", CORE,
            "Reaches micro-joy independent of conditions.",
            "Joy", "Ray items, Tool: RAS Reset"),
        signal("M004", "Gratitude Practice", CORE,
            "Notices and reinforces what is working.",
            "Joy", "Ray items, Tool: REPs"),
        signal("M005", "Attention Stability", CORE,
            "Holds attention on one task or person.",
            "Presence", "Ray items, Tool: Presence Pause"),
        signal("M006", "Interoception", CORE,
            "Reads body signals before they become behavior.",
            "Presence", "Ray items, Tool: 90-Second Window"),
        signal("M007", "Fear Naming", CORE,
            "Identifies fear without fusing with it.",
            "Power", "Ray items, Tool: I Rise"),
        signal("M008", "Agency/Control Focus", CORE,
            "Acts on what is controllable.",
            "Power, Intention", "Ray items, Tool: Boundary of Light"),
        signal("M009", "Values Clarity", CORE,
            "Names what matters most.",
            "Purpose", "Ray items, Tool: If/Then Planning"),
        signal("M010", "Decision Alignment", CORE,
            "Makes choices that match stated values.",
            "Purpose, Intention", "Ray items, Tool: 143 Challenge"),
        signal("M011", "Identity Coherence", CORE,
            "Shows up as the same person across contexts.",
            "Authenticity", "Ray items, Tool: Go First"),
        signal("M012", "Boundary Setting", CORE,
            "Holds limits without aggression or collapse.",
            "Power, Authenticity", "Ray items, Tool: Boundary of Light"),
        signal("M013", "Attunement", CORE,
            "Reads emotional and social cues accurately.",
            "Connection", "Ray items, Tool: Question Loop"),
        signal("M014", "Conversation Agility", CORE,
            "Adapts in live conversation without losing the thread.",
            "Connection, Possibility", "Ray items, Tool: Question Loop"),
        signal("M015", "Openness", CORE,
            "Stays curious when certainty is tempting.",
            "Possibility", "Ray items, Tool: Watch Me"),
        signal("M016", "Opportunity Recognition", CORE,
            "Spots openings others miss.",
            "Possibility, Purpose", "Ray items, Tool: 143 Challenge"),
        signal("M017", "Modeling", CORE,
            "Demonstrates the behavior expected of others.",
            "Be The Light", "Ray items, Tool: REPs"),
        signal("M018", "Ripple Effect", CORE,
            "Lifts the capacity of people nearby.",
            "Be The Light, Connection", "Ray items, Tool: Witness"),
        signal("M019", "Burnout Risk", EXEC,
            "Recovery keeps pace with demand.",
            "Joy, Presence", "Ray items, Tool: RAS Reset, Tool: 90-Second Window"),
        signal("M020", "Reliability Under Pressure", EXEC,
            "Delivers consistently when stakes rise.",
            "Power, Presence, Intention", "Ray items, Tool: Presence Pause"),
        signal("M021", "Decision Quality", EXEC,
            "Decides with clarity rather than reactivity.",
            "Intention, Purpose, Possibility", "Ray items, Tool: If/Then Planning"),
        signal("M022", "Psychological Safety", EXEC,
            "Creates conditions where people speak up.",
            "Connection, Authenticity", "Ray items, Tool: Go First"),
        signal("M023", "Engagement", EXEC,
            "Sustains energy and meaning in the work.",
            "Joy, Purpose", "Ray items, Tool: 143 Challenge"),
        signal("M024", "Leadership Readiness", EXEC,
            "Ready to carry broader scope and influence.",
            "Be The Light, Power, Connection", "Ray items, Tool: Witness"),
    ]
}

const ARCHETYPE_NAMES: [(&str, &str); 36] = [
    ("R1-R2", "Strategic Optimist"),
    ("R1-R3", "Mindful Architect"),
    ("R1-R4", "Decisive Director"),
    ("R1-R5", "Mission Commander"),
    ("R1-R6", "True North Leader"),
    ("R1-R7", "Relational Strategist"),
    ("R1-R8", "Visionary Planner"),
    ("R1-R9", "Servant Architect"),
    ("R2-R3", "Present Celebrator"),
    ("R2-R4", "Confident Enthusiast"),
    ("R2-R5", "Joyful Missionary"),
    ("R2-R6", "Radiant Authentic"),
    ("R2-R7", "Relational Spark"),
    ("R2-R8", "Optimistic Explorer"),
    ("R2-R9", "Light Bringer"),
    ("R3-R4", "Grounded Commander"),
    ("R3-R5", "Mindful Mission"),
    ("R3-R6", "Present Truth"),
    ("R3-R7", "Deep Listener"),
    ("R3-R8", "Present Visionary"),
    ("R3-R9", "Calm Center"),
    ("R4-R5", "Driven Leader"),
    ("R4-R6", "Bold Authentic"),
    ("R4-R7", "Charismatic Connector"),
    ("R4-R8", "Risk-Taking Pioneer"),
    ("R4-R9", "Empowering Force"),
    ("R5-R6", "True Missionary"),
    ("R5-R7", "Community Builder"),
    ("R5-R8", "Visionary Missionary"),
    ("R5-R9", "Servant Leader"),
    ("R6-R7", "Trusted Confidant"),
    ("R6-R8", "Authentic Innovator"),
    ("R6-R9", "Truth Beacon"),
    ("R7-R8", "Network Cultivator"),
    ("R7-R9", "Relational Light"),
    ("R8-R9", "Visionary Servant"),
];

fn builtin_archetypes() -> BTreeMap<String, ArchetypeBlock> {
    ARCHETYPE_NAMES
        .iter()
        .filter_map(|(code, name)| {
            let (a, b) = code.split_once('-')?;
            let first = Dimension::from_number(a[1..].parse().ok()?)?;
            let second = Dimension::from_number(b[1..].parse().ok()?)?;
            let block = ArchetypeBlock {
                pair_code: (*code).to_string(),
                name: (*name).to_string(),
                essence: format!(
                    "{} ({}) paired with {} ({}).",
                    first.name(),
                    first.verb(),
                    second.name(),
                    second.verb()
                ),
                ..ArchetypeBlock::default()
            };
            Some(((*code).to_string(), block))
        })
        .collect()
}
