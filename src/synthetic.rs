//! Synthetic item banks and respondents for QA runs and tests.
//!
//! The banks mirror the structure of the production instrument at a density
//! that clears every usability floor: six baseline items (one reverse-keyed),
//! two under-pressure items and two distortion items per subfacet, three
//! usage and three access items per practice, a six-item load bank, and a
//! validity bank carrying every scale. Respondents are profile presets that
//! answer deterministically, with a zero-sum jitter so runs never look like
//! straightlining unless the profile asks for it.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Duration};

use crate::content::{
    DIMENSION_ITEMS_FILE, LOAD_ITEMS_FILE, PRACTICE_ITEMS_FILE, REFLECTION_PROMPTS_FILE,
    VALIDITY_ITEMS_FILE,
};
use crate::error::{Result, ScoringError};
use crate::model::{
    Bucket, Context, Dimension, Domain, Item, ItemBanks, Polarity, Practice, PressureMode,
    ReflectionPrompt, ResponseFormat, SubfacetId, ValidityScale,
};
use crate::response::{ResponsePacket, ResponseValue};
use crate::scoring::math::round_to;

const BASELINE_PER_SUBFACET: usize = 6;
const PRESSURE_PER_SUBFACET: usize = 2;
const DISTORTION_PER_SUBFACET: usize = 2;
const PRACTICE_PER_BUCKET: usize = 3;
const LOAD_ITEMS: usize = 6;

/// Zero-sum offsets, cycled per bucket so block means stay on target.
const BASELINE_JITTER: [f64; BASELINE_PER_SUBFACET] = [0.2, -0.2, 0.1, -0.1, 0.3, -0.3];
const PRESSURE_JITTER: [f64; 2] = [0.1, -0.1];

/// Fixed session start for synthetic timestamps (2026-01-05T09:00:00Z).
const SESSION_START_EPOCH: i64 = 1_767_603_600;

/// A reflection long and specific enough to score depth 3.
pub const DEEP_REFLECTION: &str = "Last week in a team meeting I noticed my chest get tight when a \
colleague pushed back on my plan. I paused, took one breath, and asked a question instead of \
defending. I chose to listen first, and next time I want to do that sooner. This week my plan is \
one small step each day: before I open email every morning I will run a two minute presence pause \
and write down one cue I noticed in my body. That practice helps me stay grounded when the \
pressure rises again.";

// =============================================================================
// Banks
// =============================================================================

/// Full synthetic banks, deterministic in content and order.
pub fn synthetic_banks() -> ItemBanks {
    ItemBanks {
        dimension_items: dimension_bank(),
        practice_items: practice_bank(),
        load_items: load_bank(),
        validity_items: validity_bank(),
        reflection_prompts: reflection_prompts(),
    }
}

fn dimension_bank() -> Vec<Item> {
    let mut items = Vec::new();
    for d in Dimension::ALL {
        for id in SubfacetId::all_for(d) {
            let code = id.to_string();
            let mut n = 0;
            let mut next_id = || {
                n += 1;
                format!("{code}-{n:02}")
            };
            for i in 0..BASELINE_PER_SUBFACET {
                let context = if i % 2 == 0 { Context::Work } else { Context::Life };
                let polarity = if i == BASELINE_PER_SUBFACET - 1 {
                    Polarity::Reverse
                } else {
                    Polarity::Normal
                };
                items.push(
                    Item::frequency(next_id(), Domain::Dimension, code.as_str())
                        .with_dimension(d)
                        .with_context(context)
                        .with_polarity(polarity),
                );
            }
            for _ in 0..PRESSURE_PER_SUBFACET {
                items.push(
                    Item::frequency(next_id(), Domain::Dimension, code.as_str())
                        .with_dimension(d)
                        .with_pressure(PressureMode::UnderPressure),
                );
            }
            for _ in 0..DISTORTION_PER_SUBFACET {
                items.push(
                    Item::frequency(next_id(), Domain::Dimension, code.as_str())
                        .with_dimension(d)
                        .with_pressure(PressureMode::UnderPressure)
                        .with_polarity(Polarity::Reverse),
                );
            }
        }
    }
    items
}

fn practice_bank() -> Vec<Item> {
    let mut items = Vec::new();
    for p in Practice::ALL {
        for i in 0..PRACTICE_PER_BUCKET * 2 {
            let pressure = if i < PRACTICE_PER_BUCKET {
                PressureMode::Baseline
            } else {
                PressureMode::UnderPressure
            };
            items.push(
                Item::frequency(format!("{}-{:02}", p.code(), i + 1), Domain::Practice, p.code())
                    .with_pressure(pressure),
            );
        }
    }
    items
}

fn load_bank() -> Vec<Item> {
    (1..=LOAD_ITEMS)
        .map(|i| Item::frequency(format!("LOAD-{i:02}"), Domain::Load, "LOAD"))
        .collect()
}

fn validity_bank() -> Vec<Item> {
    let mut items: Vec<Item> = (1..=4)
        .map(|i| Item::frequency(format!("VAL-SD-{i:02}"), Domain::Validity, "VAL_SD"))
        .collect();
    items.push(
        Item::frequency("VAL-ATT-01", Domain::Validity, "VAL_ATT")
            .with_notes("Instructed response. KEY_SCORE=0"),
    );
    items.push(
        Item::frequency("VAL-ATT-02", Domain::Validity, "VAL_ATT").with_forced_choice(Some("B")),
    );
    items.extend(
        (1..=2).map(|i| Item::frequency(format!("VAL-INF-{i:02}"), Domain::Validity, "VAL_INF")),
    );
    for pair in 1..=2 {
        for side in ['a', 'b'] {
            items.push(
                Item::frequency(format!("VAL-INC-{pair:02}{side}"), Domain::Validity, "VAL_INC")
                    .with_pair(format!("PAIR-{pair:02}")),
            );
        }
    }
    items
}

fn reflection_prompts() -> Vec<ReflectionPrompt> {
    Dimension::ALL
        .into_iter()
        .map(|d| ReflectionPrompt {
            prompt_id: format!("REF-{}", d.code()),
            dimension: Some(d.number()),
            prompt_text: format!(
                "Describe a recent moment when {} was hard to reach. What did you notice?",
                d.name()
            ),
        })
        .collect()
}

/// Write `banks` as a content root the loader accepts.
pub fn write_content_root(dir: impl AsRef<Path>, banks: &ItemBanks) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|e| ScoringError::io(dir, e))?;
    write_json(&dir.join(DIMENSION_ITEMS_FILE), &banks.dimension_items)?;
    write_json(&dir.join(PRACTICE_ITEMS_FILE), &banks.practice_items)?;
    write_json(&dir.join(LOAD_ITEMS_FILE), &banks.load_items)?;
    write_json(&dir.join(VALIDITY_ITEMS_FILE), &banks.validity_items)?;
    write_json(&dir.join(REFLECTION_PROMPTS_FILE), &banks.reflection_prompts)?;
    Ok(())
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let raw = serde_json::to_string_pretty(value)?;
    std::fs::write(path, raw).map_err(|e| ScoringError::io(path, e))
}

// =============================================================================
// Respondents
// =============================================================================

/// Target composite levels for one dimension, on 0-4.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levels {
    pub shine: f64,
    pub access: f64,
    pub eclipse: f64,
}

/// Deterministic respondent presets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyntheticProfile {
    /// The same raw answer on every frequency item and `A` on every
    /// forced-choice item.
    Uniform(f64),
    /// Healthy system with two clearly resourced dimensions.
    Resourced { top: [Dimension; 2] },
    /// Low grounding capacity beneath strong output dimensions.
    GroundingSuppressed,
}

impl SyntheticProfile {
    pub fn dimension_levels(&self, d: Dimension) -> Levels {
        let n = f64::from(d.number());
        match *self {
            Self::Uniform(v) => Levels {
                shine: v,
                access: v,
                eclipse: v,
            },
            Self::Resourced { top } if top.contains(&d) => Levels {
                shine: 3.6,
                access: 3.4,
                eclipse: 0.6,
            },
            Self::Resourced { .. } => Levels {
                shine: 2.4 + 0.05 * n,
                access: 2.5,
                eclipse: 1.2,
            },
            Self::GroundingSuppressed if d == Dimension::GROUNDING => Levels {
                shine: 1.4,
                access: 1.2,
                eclipse: 3.0,
            },
            Self::GroundingSuppressed => Levels {
                shine: 3.2 + 0.05 * n,
                access: 3.0,
                eclipse: 1.0,
            },
        }
    }

    /// (usage, access) for every practice.
    fn practice_levels(&self) -> (f64, f64) {
        match *self {
            Self::Uniform(v) => (v, v),
            Self::Resourced { .. } => (3.0, 3.2),
            Self::GroundingSuppressed => (2.0, 1.6),
        }
    }

    fn load_level(&self) -> f64 {
        match *self {
            Self::Uniform(v) => v,
            Self::Resourced { .. } => 1.2,
            Self::GroundingSuppressed => 2.4,
        }
    }

    fn jitter(&self, table: &[f64], ordinal: usize) -> f64 {
        match self {
            Self::Uniform(_) => 0.0,
            _ => table[ordinal % table.len()],
        }
    }

    /// Raw answer for `item`. `ordinal` counts items already answered in the
    /// same (key, bucket) block.
    pub fn answer(&self, item: &Item, ordinal: usize) -> Option<ResponseValue> {
        if item.response_format == ResponseFormat::ForcedChoice {
            let choice = match self {
                Self::Uniform(_) => "A".to_string(),
                _ => item.keyed_option.clone().unwrap_or_else(|| "A".to_string()),
            };
            return Some(ResponseValue::Text(choice));
        }

        let bucket = item.bucket();
        let raw = match item.domain {
            Domain::Dimension => {
                let id = SubfacetId::parse(item.subfacet_code.as_deref()?)?;
                let levels = self.dimension_levels(id.dimension);
                match bucket {
                    Bucket::Baseline => {
                        let target = levels.shine + self.jitter(&BASELINE_JITTER, ordinal);
                        match item.polarity {
                            Polarity::Normal => target,
                            Polarity::Reverse => 4.0 - target,
                        }
                    }
                    Bucket::UnderPressure => levels.access + self.jitter(&PRESSURE_JITTER, ordinal),
                    Bucket::Distortion => levels.eclipse + self.jitter(&PRESSURE_JITTER, ordinal),
                }
            }
            Domain::Practice => {
                let (usage, access) = self.practice_levels();
                let level = if bucket == Bucket::Baseline { usage } else { access };
                level + self.jitter(&PRESSURE_JITTER, ordinal)
            }
            Domain::Load => self.load_level() + self.jitter(&BASELINE_JITTER, ordinal),
            Domain::Validity => self.validity_answer(item)?,
        };
        Some(ResponseValue::Number(round_to(raw.clamp(0.0, 4.0), 2)))
    }

    /// A clean respondent: moderate self-presentation, keyed attention
    /// answers, no infrequent endorsements, consistent pairs.
    fn validity_answer(&self, item: &Item) -> Option<f64> {
        if let Self::Uniform(v) = *self {
            return Some(v);
        }
        let scale = ValidityScale::from_code(item.subfacet_code.as_deref());
        Some(match scale {
            ValidityScale::SocialDesirability => 2.0,
            ValidityScale::Attention => 0.0,
            ValidityScale::Infrequency => 0.0,
            ValidityScale::Inconsistency => 2.0,
            ValidityScale::Unclassified => return None,
        })
    }
}

/// Build a packet by asking `answer` for each item in bank order. Items
/// answered `None` are left out of the packet.
pub fn packet_from_fn(
    run_id: &str,
    banks: &ItemBanks,
    mut answer: impl FnMut(&Item, usize) -> Option<ResponseValue>,
) -> ResponsePacket {
    let mut packet = ResponsePacket::new(run_id);
    let mut ordinals: BTreeMap<(Option<&str>, Bucket), usize> = BTreeMap::new();
    let all = banks
        .dimension_items
        .iter()
        .chain(&banks.practice_items)
        .chain(&banks.load_items)
        .chain(&banks.validity_items);
    for item in all {
        let slot = ordinals
            .entry((item.subfacet_code.as_deref(), item.bucket()))
            .or_default();
        let ordinal = *slot;
        *slot += 1;
        if let Some(value) = answer(item, ordinal) {
            packet.set(item.item_id.clone(), value);
        }
    }
    packet
}

/// A packet answered by `profile`, without reflections or timestamps.
pub fn synthetic_packet(run_id: &str, banks: &ItemBanks, profile: SyntheticProfile) -> ResponsePacket {
    packet_from_fn(run_id, banks, |item, ordinal| profile.answer(item, ordinal))
}

/// Answer every prompt with the same deep reflection.
pub fn with_reflections(mut packet: ResponsePacket, prompts: &[ReflectionPrompt]) -> ResponsePacket {
    packet.reflection_responses = Some(
        prompts
            .iter()
            .map(|p| (p.prompt_id.clone(), DEEP_REFLECTION.to_string()))
            .collect(),
    );
    packet
}

/// Stamp a session of `seconds` starting at a fixed instant.
pub fn with_session_seconds(mut packet: ResponsePacket, seconds: i64) -> ResponsePacket {
    if let Some(start) = DateTime::from_timestamp(SESSION_START_EPOCH, 0) {
        let end = start + Duration::seconds(seconds);
        packet.start_ts = Some(start.to_rfc3339());
        packet.end_ts = Some(end.to_rfc3339());
    }
    packet
}
