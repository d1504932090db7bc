//! Free-text reflection depth.
//!
//! The built-in scorer is a word-count + keyword heuristic, not semantic
//! understanding. It sits behind [`DepthScorer`] so a model-backed scorer
//! can replace it without touching aggregation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ReflectionPrompt;
use crate::response::ResponsePacket;
use crate::scoring::math::mean;

/// `text -> 0..=3`, or `None` for empty input.
pub trait DepthScorer: Send + Sync {
    fn score(&self, text: &str) -> Option<u8>;
}

const MIN_WORDS: usize = 15;
const MID_WORDS: usize = 40;
const DEEP_WORDS: usize = 80;

const SPECIFICITY: &[&str] = &[
    "meeting", "conversation", "moment", "yesterday", "last week", "morning", "when i",
    "i noticed", "i felt", "i realized", "specific", "example", "happened", "situation",
    "colleague", "partner", "boss", "team", "client",
];
const OWNERSHIP: &[&str] = &[
    "i chose", "i decided", "my choice", "i could have", "next time", "i will", "i want to",
    "instead of", "i took", "i paused", "my responsibility", "i own",
];
const BODY_STATE: &[&str] = &[
    "body", "tension", "breath", "stomach", "chest", "heart rate", "jaw", "shoulders",
    "racing", "calm", "grounded", "activated", "numb", "anxious", "overwhelmed", "tight",
];
const PRACTICE_REFERENCE: &[&str] = &[
    "watch me", "i rise", "go first", "reps", "143", "90-second", "ras reset",
    "presence pause", "boundary", "if/then", "question loop", "witness", "practice", "tool",
    "micro-rep", "cue",
];
const FORWARD_COMMITMENT: &[&str] = &[
    "next 7 days", "this week", "my plan", "i commit", "one rep", "going to", "will try",
    "start with", "small step", "daily", "each day", "every morning", "before i",
];

/// Keyword-category heuristic. Each of the five categories counts at most
/// once, when any of its phrases appears in the lowercased text.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordDepthScorer;

impl KeywordDepthScorer {
    fn categories_hit(lower: &str) -> usize {
        [SPECIFICITY, OWNERSHIP, BODY_STATE, PRACTICE_REFERENCE, FORWARD_COMMITMENT]
            .iter()
            .filter(|words| words.iter().any(|w| lower.contains(w)))
            .count()
    }
}

impl DepthScorer for KeywordDepthScorer {
    fn score(&self, text: &str) -> Option<u8> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let words = trimmed.split_whitespace().count();
        if words < MIN_WORDS {
            return Some(0);
        }
        let hits = Self::categories_hit(&trimmed.to_lowercase());
        let depth = if words >= DEEP_WORDS && hits >= 3 {
            3
        } else if words >= MID_WORDS && hits >= 2 {
            2
        } else if hits >= 1 || words >= MID_WORDS {
            1
        } else {
            0
        };
        Some(depth)
    }
}

/// Reflection summary across every prompt in the bank.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReflectionIndices {
    /// Mean depth on 0-3 over answered prompts.
    pub depth_avg_0_3: Option<f64>,
    /// `depth_avg_0_3 * 4/3`.
    pub depth_scaled_0_4: Option<f64>,
    pub answered_count: usize,
    pub by_prompt: BTreeMap<String, Option<u8>>,
}

pub fn reflection_indices(
    prompts: &[ReflectionPrompt],
    packet: &ResponsePacket,
    scorer: &dyn DepthScorer,
) -> ReflectionIndices {
    let mut by_prompt = BTreeMap::new();
    let mut depths = Vec::new();
    for prompt in prompts {
        let depth = packet
            .reflection(&prompt.prompt_id)
            .and_then(|text| scorer.score(text));
        if let Some(d) = depth {
            depths.push(f64::from(d));
        }
        by_prompt.insert(prompt.prompt_id.clone(), depth);
    }
    let avg = mean(&depths);
    ReflectionIndices {
        depth_avg_0_3: avg,
        depth_scaled_0_4: avg.map(|a| a * 4.0 / 3.0),
        answered_count: depths.len(),
        by_prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["filler"; n].join(" ")
    }

    #[test]
    fn empty_is_none_and_short_is_zero() {
        let s = KeywordDepthScorer;
        assert_eq!(s.score("   "), None);
        assert_eq!(s.score("I noticed tension in the meeting"), Some(0));
    }

    #[test]
    fn long_but_vague_scores_one() {
        assert_eq!(KeywordDepthScorer.score(&words(40)), Some(1));
        assert_eq!(KeywordDepthScorer.score(&words(20)), Some(0));
    }

    #[test]
    fn mid_length_with_one_category() {
        let text = format!("{} meeting", words(20));
        assert_eq!(KeywordDepthScorer.score(&text), Some(1));
    }

    #[test]
    fn two_categories_at_forty_words() {
        let text = format!("{} In the meeting I chose to wait", words(35));
        assert_eq!(KeywordDepthScorer.score(&text), Some(2));
    }

    #[test]
    fn deep_reflection_needs_three_categories_and_eighty_words() {
        let text = format!(
            "{} In the meeting I chose to slow my breath and this week I commit to it",
            words(70)
        );
        assert_eq!(KeywordDepthScorer.score(&text), Some(3));

        let thin = format!("{} In the meeting I chose", words(80));
        assert_eq!(KeywordDepthScorer.score(&thin), Some(2));
    }

    #[test]
    fn indices_over_prompts() {
        let prompts: Vec<ReflectionPrompt> = ["P1", "P2", "P3"]
            .iter()
            .map(|id| ReflectionPrompt {
                prompt_id: (*id).to_string(),
                dimension: None,
                prompt_text: String::new(),
            })
            .collect();
        let mut packet = ResponsePacket::new("r");
        let mut texts = BTreeMap::new();
        texts.insert("P1".to_string(), words(40));
        texts.insert("P2".to_string(), "short".to_string());
        packet.reflection_responses = Some(texts);

        let idx = reflection_indices(&prompts, &packet, &KeywordDepthScorer);
        assert_eq!(idx.answered_count, 2);
        assert_eq!(idx.depth_avg_0_3, Some(0.5));
        assert!((idx.depth_scaled_0_4.unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(idx.by_prompt.get("P3"), Some(&None));
    }
}
