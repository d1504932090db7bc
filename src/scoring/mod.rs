//! Pipeline stages, leaf-first.
//!
//! Each stage is a pure function of the context and the previous stages'
//! outputs. [`crate::pipeline::score_assessment`] wires them together.

pub mod aggregate;
pub mod archetype;
pub mod confidence;
pub mod dimension;
pub mod edge_cases;
pub mod gate;
pub mod growth;
pub mod indices;
pub mod item;
pub mod math;
pub mod practice;
pub mod reflection;
pub mod signals;
pub mod signature;
pub mod subfacet;
pub mod validity;

use crate::content::{ResolvedItem, ScoringContext};
use crate::response::ResponsePacket;

pub use item::ItemScore;

/// One item's score in one run, tied to its definition.
#[derive(Debug, Clone, Copy)]
pub struct ScoredItem<'a> {
    pub item: &'a ResolvedItem,
    pub score: ItemScore,
}

/// Scored items for every bank, each in bank order.
#[derive(Debug, Clone)]
pub struct ScoredBanks<'a> {
    pub dimension: Vec<ScoredItem<'a>>,
    pub practice: Vec<ScoredItem<'a>>,
    pub load: Vec<ScoredItem<'a>>,
    pub validity: Vec<ScoredItem<'a>>,
}

impl<'a> ScoredBanks<'a> {
    /// Score every bank item against the packet. Exactly one entry per item.
    pub fn score(ctx: &'a ScoringContext, packet: &ResponsePacket) -> Self {
        let fc = &ctx.config().forced_choice;
        let score_bank = |items: &'a [ResolvedItem]| -> Vec<ScoredItem<'a>> {
            items
                .iter()
                .map(|item| ScoredItem {
                    item,
                    score: item::score_item(&item.item, packet.value(item.id()), fc),
                })
                .collect()
        };
        Self {
            dimension: score_bank(ctx.dimension_items()),
            practice: score_bank(ctx.practice_items()),
            load: score_bank(ctx.load_items()),
            validity: score_bank(ctx.validity_items()),
        }
    }

    /// All scored items in bank order: dimension, practice, load, validity.
    pub fn iter(&self) -> impl Iterator<Item = &ScoredItem<'a>> {
        self.dimension
            .iter()
            .chain(&self.practice)
            .chain(&self.load)
            .chain(&self.validity)
    }
}
