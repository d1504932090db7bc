//! Raw response -> normalised item score.
//!
//! Malformed or out-of-range answers never error; they come back as a
//! missing score with every value field empty.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::ForcedChoiceConfig;
use crate::model::{Bucket, Item, Polarity, ResponseFormat};
use crate::response::ResponseValue;

static OPTION_SCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([ABCD])\s*=\s*([0-4])").expect("Invalid option score regex"));

/// Frequency anchors on the 0-4 scale.
pub const FREQUENCY_LABELS: [(&str, f64); 5] = [
    ("Never", 0.0),
    ("Rarely", 1.0),
    ("Sometimes", 2.0),
    ("Often", 3.0),
    ("Almost always", 4.0),
];

/// Value fields produced for one item in one run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ItemScore {
    /// Response on the 0-4 scale before routing.
    pub normalized: Option<f64>,
    /// Baseline or under-pressure capacity (reverse-keyed baseline flipped).
    pub capacity: Option<f64>,
    /// Under-pressure distortion, never reversed.
    pub distortion: Option<f64>,
    pub chosen_option: Option<char>,
    pub missing: bool,
}

impl ItemScore {
    fn missing() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    /// The value this item contributes to its bucket.
    pub fn bucket_value(&self, bucket: Bucket) -> Option<f64> {
        match bucket {
            Bucket::Baseline | Bucket::UnderPressure => self.capacity,
            Bucket::Distortion => self.distortion,
        }
    }
}

/// Map a frequency answer onto 0-4. Numbers outside the scale are missing,
/// not clamped.
pub fn frequency_value(raw: &ResponseValue) -> Option<f64> {
    match raw {
        ResponseValue::Number(n) => in_scale(*n),
        ResponseValue::Text(s) => {
            let trimmed = s.trim();
            FREQUENCY_LABELS
                .iter()
                .find(|(label, _)| label.eq_ignore_ascii_case(trimmed))
                .map(|(_, v)| *v)
                .or_else(|| trimmed.parse::<f64>().ok().and_then(in_scale))
        }
        ResponseValue::Malformed(_) => None,
    }
}

fn in_scale(n: f64) -> Option<f64> {
    (n.is_finite() && (0.0..=4.0).contains(&n)).then_some(n)
}

/// Explicit per-option scoring embedded in item notes (`A=4;B=3;C=1;D=0`).
fn option_scores(notes: Option<&str>) -> Option<[Option<f64>; 4]> {
    let notes = notes?;
    let mut scores = [None; 4];
    let mut any = false;
    for cap in OPTION_SCORE.captures_iter(notes) {
        let slot = match &cap[1] {
            "A" => 0,
            "B" => 1,
            "C" => 2,
            _ => 3,
        };
        scores[slot] = cap[2].parse::<f64>().ok();
        any = true;
    }
    any.then_some(scores)
}

fn option_slot(option: char) -> Option<usize> {
    match option {
        'A' => Some(0),
        'B' => Some(1),
        'C' => Some(2),
        'D' => Some(3),
        _ => None,
    }
}

/// Parse a forced-choice answer into an option letter A-D.
pub fn chosen_option(raw: &ResponseValue) -> Option<char> {
    let ResponseValue::Text(s) = raw else {
        return None;
    };
    let upper = s.trim().to_ascii_uppercase();
    let mut chars = upper.chars();
    let c = chars.next()?;
    (chars.next().is_none() && option_slot(c).is_some()).then_some(c)
}

fn forced_choice_score(item: &Item, option: char, fallback: &ForcedChoiceConfig) -> Option<f64> {
    if let Some(explicit) = option_scores(item.notes.as_deref()) {
        return option_slot(option).and_then(|slot| explicit[slot]);
    }
    let keyed = item.keyed_option.as_deref()?.trim().to_ascii_uppercase();
    if keyed == option.to_string() {
        Some(fallback.keyed_score)
    } else {
        Some(fallback.non_keyed_score)
    }
}

/// Score one item against its raw response.
pub fn score_item(
    item: &Item,
    raw: Option<&ResponseValue>,
    forced_choice: &ForcedChoiceConfig,
) -> ItemScore {
    let Some(raw) = raw else {
        return ItemScore::missing();
    };
    if matches!(raw, ResponseValue::Text(s) if s.trim().is_empty()) {
        return ItemScore::missing();
    }

    match item.response_format {
        ResponseFormat::Frequency => {
            let Some(x) = frequency_value(raw) else {
                return ItemScore::missing();
            };
            let mut score = ItemScore {
                normalized: Some(x),
                ..ItemScore::default()
            };
            match item.bucket() {
                Bucket::Baseline => {
                    score.capacity = Some(match item.polarity {
                        Polarity::Normal => x,
                        Polarity::Reverse => 4.0 - x,
                    })
                }
                Bucket::UnderPressure => score.capacity = Some(x),
                Bucket::Distortion => score.distortion = Some(x),
            }
            score
        }
        ResponseFormat::ForcedChoice => {
            let Some(option) = chosen_option(raw) else {
                return ItemScore::missing();
            };
            match forced_choice_score(item, option, forced_choice) {
                Some(value) => ItemScore {
                    normalized: Some(value),
                    capacity: Some(value),
                    distortion: None,
                    chosen_option: Some(option),
                    missing: false,
                },
                None => ItemScore {
                    chosen_option: Some(option),
                    ..ItemScore::missing()
                },
            }
        }
    }
}
