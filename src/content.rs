//! Read-only scoring context and the content-root loader.
//!
//! A [`ScoringContext`] is built once from item banks, a catalog and a
//! configuration, validated up front, and then shared by reference (or
//! `Arc`) across any number of concurrent scoring runs. Nothing inside it
//! is mutated after construction.
//!
//! [`ContextCache`] is the explicit replacement for memoised loaders: the
//! caller owns it, and an entry is reused only while the files under its
//! content root hash to the same value.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::catalog::{ArchetypeBlock, Catalog, Predictors, SignalDefinition};
use crate::config::ScoringConfig;
use crate::error::{Result, ScoringError};
use crate::model::{
    Bucket, Domain, Item, ItemBanks, ItemKey, Practice, ReflectionPrompt, SubfacetId, ValidityScale,
};
use crate::scoring::reflection::{DepthScorer, KeywordDepthScorer};

pub const DIMENSION_ITEMS_FILE: &str = "dimension_items.json";
pub const PRACTICE_ITEMS_FILE: &str = "practice_items.json";
pub const LOAD_ITEMS_FILE: &str = "load_items.json";
pub const VALIDITY_ITEMS_FILE: &str = "validity_items.json";
pub const REFLECTION_PROMPTS_FILE: &str = "reflection_prompts.json";
pub const SIGNALS_FILE: &str = "signals.json";
pub const ARCHETYPES_FILE: &str = "archetypes.json";
pub const CONFIG_FILE: &str = "config.json";

const REQUIRED_FILES: [&str; 5] = [
    DIMENSION_ITEMS_FILE,
    PRACTICE_ITEMS_FILE,
    LOAD_ITEMS_FILE,
    VALIDITY_ITEMS_FILE,
    REFLECTION_PROMPTS_FILE,
];
const OPTIONAL_FILES: [&str; 3] = [SIGNALS_FILE, ARCHETYPES_FILE, CONFIG_FILE];

// =============================================================================
// Resolved content
// =============================================================================

/// An item with its grouping key and bucket resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    pub item: Item,
    pub key: ItemKey,
    pub bucket: Bucket,
}

impl ResolvedItem {
    pub fn id(&self) -> &str {
        &self.item.item_id
    }
}

/// A signal definition with its predictors parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSignal {
    pub definition: SignalDefinition,
    pub predictors: Predictors,
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    banks: &'a ItemBanks,
    catalog: &'a Catalog,
    config: &'a ScoringConfig,
}

// =============================================================================
// ScoringContext
// =============================================================================

/// Validated, immutable reference data for scoring runs.
pub struct ScoringContext {
    dimension_items: Vec<ResolvedItem>,
    practice_items: Vec<ResolvedItem>,
    load_items: Vec<ResolvedItem>,
    validity_items: Vec<ResolvedItem>,
    reflection_prompts: Vec<ReflectionPrompt>,
    item_ids: BTreeSet<String>,
    catalog: Catalog,
    signals: Vec<ResolvedSignal>,
    config: ScoringConfig,
    depth_scorer: Arc<dyn DepthScorer>,
    fingerprint: String,
}

impl fmt::Debug for ScoringContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringContext")
            .field("dimension_items", &self.dimension_items.len())
            .field("practice_items", &self.practice_items.len())
            .field("load_items", &self.load_items.len())
            .field("validity_items", &self.validity_items.len())
            .field("reflection_prompts", &self.reflection_prompts.len())
            .field("signals", &self.signals.len())
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

impl ScoringContext {
    pub fn new(banks: ItemBanks, catalog: Catalog, config: ScoringConfig) -> Result<Self> {
        config.validate()?;

        let fingerprint = {
            let bytes = serde_json::to_vec(&FingerprintInput {
                banks: &banks,
                catalog: &catalog,
                config: &config,
            })?;
            blake3::hash(&bytes).to_hex().to_string()
        };

        let mut item_ids = BTreeSet::new();
        let ItemBanks {
            dimension_items,
            practice_items,
            load_items,
            validity_items,
            reflection_prompts,
        } = banks;

        let dimension_items = resolve_bank(dimension_items, Domain::Dimension, &mut item_ids)?;
        let practice_items = resolve_bank(practice_items, Domain::Practice, &mut item_ids)?;
        let load_items = resolve_bank(load_items, Domain::Load, &mut item_ids)?;
        let validity_items = resolve_bank(validity_items, Domain::Validity, &mut item_ids)?;

        let mut prompt_ids = BTreeSet::new();
        for prompt in &reflection_prompts {
            if !prompt_ids.insert(prompt.prompt_id.as_str()) {
                return Err(ScoringError::DuplicateId(prompt.prompt_id.clone()));
            }
        }

        let signals = catalog
            .signals
            .iter()
            .map(|definition| ResolvedSignal {
                predictors: definition.predictors(),
                definition: definition.clone(),
            })
            .collect();

        debug!(
            dimension_items = dimension_items.len(),
            practice_items = practice_items.len(),
            load_items = load_items.len(),
            validity_items = validity_items.len(),
            fingerprint = %fingerprint,
            "scoring context built"
        );

        Ok(Self {
            dimension_items,
            practice_items,
            load_items,
            validity_items,
            reflection_prompts,
            item_ids,
            catalog,
            signals,
            config,
            depth_scorer: Arc::new(KeywordDepthScorer),
            fingerprint,
        })
    }

    /// Swap the reflection depth scorer.
    pub fn with_depth_scorer(mut self, scorer: Arc<dyn DepthScorer>) -> Self {
        self.depth_scorer = scorer;
        self
    }

    /// Load a content root with its own `config.json` (or defaults).
    pub fn load_dir(root: impl AsRef<Path>) -> Result<Self> {
        Self::load_dir_with(root, None)
    }

    /// Load a content root; `config` overrides any `config.json` in it.
    pub fn load_dir_with(root: impl AsRef<Path>, config: Option<ScoringConfig>) -> Result<Self> {
        let root = root.as_ref();
        let banks = ItemBanks {
            dimension_items: read_json(&root.join(DIMENSION_ITEMS_FILE))?,
            practice_items: read_json(&root.join(PRACTICE_ITEMS_FILE))?,
            load_items: read_json(&root.join(LOAD_ITEMS_FILE))?,
            validity_items: read_json(&root.join(VALIDITY_ITEMS_FILE))?,
            reflection_prompts: read_json(&root.join(REFLECTION_PROMPTS_FILE))?,
        };

        let mut catalog = Catalog::builtin();
        if let Some(signals) = read_optional_json::<Vec<SignalDefinition>>(&root.join(SIGNALS_FILE))? {
            catalog.signals = signals;
        }
        if let Some(blocks) = read_optional_json::<Vec<ArchetypeBlock>>(&root.join(ARCHETYPES_FILE))? {
            catalog.merge_archetypes(blocks);
        }

        let config = match config {
            Some(config) => config,
            None => read_optional_json::<ScoringConfig>(&root.join(CONFIG_FILE))?.unwrap_or_default(),
        };

        Self::new(banks, catalog, config)
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn signals(&self) -> &[ResolvedSignal] {
        &self.signals
    }

    pub fn depth_scorer(&self) -> &dyn DepthScorer {
        self.depth_scorer.as_ref()
    }

    /// blake3 over the canonical JSON of banks, catalog and config.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn dimension_items(&self) -> &[ResolvedItem] {
        &self.dimension_items
    }

    pub fn practice_items(&self) -> &[ResolvedItem] {
        &self.practice_items
    }

    pub fn load_items(&self) -> &[ResolvedItem] {
        &self.load_items
    }

    pub fn validity_items(&self) -> &[ResolvedItem] {
        &self.validity_items
    }

    pub fn reflection_prompts(&self) -> &[ReflectionPrompt] {
        &self.reflection_prompts
    }

    /// Every item in bank order: dimension, practice, load, validity.
    pub fn items(&self) -> impl Iterator<Item = &ResolvedItem> {
        self.dimension_items
            .iter()
            .chain(&self.practice_items)
            .chain(&self.load_items)
            .chain(&self.validity_items)
    }

    pub fn defines_item(&self, item_id: &str) -> bool {
        self.item_ids.contains(item_id)
    }
}

fn resolve_bank(
    items: Vec<Item>,
    bank: Domain,
    seen: &mut BTreeSet<String>,
) -> Result<Vec<ResolvedItem>> {
    items
        .into_iter()
        .map(|item| {
            if item.domain != bank {
                return Err(ScoringError::WrongBank {
                    item_id: item.item_id.clone(),
                    found: item.domain.as_str(),
                    bank: bank.as_str(),
                });
            }
            if !seen.insert(item.item_id.clone()) {
                return Err(ScoringError::DuplicateId(item.item_id.clone()));
            }
            let key = resolve_key(&item)?;
            let bucket = item.bucket();
            Ok(ResolvedItem { item, key, bucket })
        })
        .collect()
}

fn resolve_key(item: &Item) -> Result<ItemKey> {
    let code = item.subfacet_code.as_deref().map(str::trim);
    match item.domain {
        Domain::Dimension => {
            let raw = code.unwrap_or_default();
            let id = SubfacetId::parse(raw).ok_or_else(|| ScoringError::UnknownSubfacet {
                item_id: item.item_id.clone(),
                code: raw.to_string(),
            })?;
            if let Some(declared) = item.dimension {
                if declared != id.dimension.number() {
                    return Err(ScoringError::DimensionMismatch {
                        item_id: item.item_id.clone(),
                        declared,
                        code: raw.to_string(),
                    });
                }
            }
            Ok(ItemKey::Subfacet(id))
        }
        Domain::Practice => {
            let raw = code.unwrap_or_default();
            Practice::from_code(raw)
                .map(ItemKey::Practice)
                .ok_or_else(|| ScoringError::UnknownPractice {
                    item_id: item.item_id.clone(),
                    code: raw.to_string(),
                })
        }
        Domain::Load => Ok(ItemKey::Load),
        Domain::Validity => Ok(ItemKey::Validity(ValidityScale::from_code(code))),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| ScoringError::io(path, e))?;
    Ok(serde_json::from_str(&raw)?)
}

fn read_optional_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    read_json(path).map(Some)
}

// =============================================================================
// ContextCache
// =============================================================================

struct CachedContext {
    disk_fingerprint: String,
    context: Arc<ScoringContext>,
}

/// Caller-owned cache of loaded content roots.
#[derive(Default)]
pub struct ContextCache {
    entries: BTreeMap<PathBuf, CachedContext>,
}

impl ContextCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the context for `root`, reloading when its files changed.
    pub fn get_or_load(&mut self, root: impl AsRef<Path>) -> Result<Arc<ScoringContext>> {
        let root = root.as_ref();
        let canonical = root
            .canonicalize()
            .map_err(|e| ScoringError::io(root, e))?;
        let disk_fingerprint = hash_content_root(&canonical)?;

        if let Some(entry) = self.entries.get(&canonical) {
            if entry.disk_fingerprint == disk_fingerprint {
                return Ok(Arc::clone(&entry.context));
            }
            debug!(root = %canonical.display(), "content root changed, reloading");
        }

        let context = Arc::new(ScoringContext::load_dir(&canonical)?);
        self.entries.insert(
            canonical,
            CachedContext {
                disk_fingerprint,
                context: Arc::clone(&context),
            },
        );
        Ok(context)
    }

    pub fn invalidate(&mut self, root: impl AsRef<Path>) {
        if let Ok(canonical) = root.as_ref().canonicalize() {
            self.entries.remove(&canonical);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn hash_content_root(root: &Path) -> Result<String> {
    let mut hasher = blake3::Hasher::new();
    for name in REQUIRED_FILES.iter().chain(OPTIONAL_FILES.iter()) {
        let path = root.join(name);
        hasher.update(name.as_bytes());
        hasher.update(b"|");
        if path.exists() {
            let bytes = std::fs::read(&path).map_err(|e| ScoringError::io(&path, e))?;
            hasher.update(&bytes);
        }
        hasher.update(b"|");
    }
    Ok(hasher.finalize().to_hex().to_string())
}
