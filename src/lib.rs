#![forbid(unsafe_code)]

//! # rayscore
//!
//! Deterministic scoring for a self-report leadership-capacity instrument.
//!
//! Raw answers to a fixed item bank go in; a structured profile comes out:
//! nine dimension composites with subfacet breakdowns, a two-dimension
//! signature, one growth-focus dimension, a load read with a coaching gate,
//! a data-quality confidence band, ten edge-case detectors and a set of
//! advisory executive signals.
//!
//! ```no_run
//! use rayscore::{score_assessment, ResponsePacket, ScoringContext};
//!
//! # fn main() -> rayscore::Result<()> {
//! let ctx = ScoringContext::load_dir("content/")?;
//! let packet = ResponsePacket::from_json_path("packet.json")?;
//! let output = score_assessment(&ctx, &packet, None)?;
//! println!("{}", output.fingerprint());
//! # Ok(())
//! # }
//! ```
//!
//! The context is immutable and can be shared across threads; every run is
//! a pure function of context and packet.

pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod response;
pub mod scoring;
pub mod synthetic;

pub use catalog::{ArchetypeBlock, Catalog, SignalDefinition};
pub use config::ScoringConfig;
pub use content::{ContextCache, ScoringContext};
pub use error::{Result, ScoringError};
pub use model::{Dimension, Item, ItemBanks, Practice, ReflectionPrompt, SubfacetId};
pub use output::PipelineOutput;
pub use pipeline::score_assessment;
pub use report::{render_report_markdown, ReportOptions};
pub use response::{ItemResponse, ResponsePacket, ResponseValue, Tier};
pub use scoring::reflection::{DepthScorer, KeywordDepthScorer};
