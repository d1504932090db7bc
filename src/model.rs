//! Item-bank model: closed enums for every grouping key the pipeline uses.
//!
//! Dimensions, facets, practices, buckets and validity scales are enums so
//! aggregation is an exhaustive match rather than string plumbing. Raw codes
//! from content files (`R3b`, `T004`, `VAL_SD`) are parsed once, when a
//! [`crate::ScoringContext`] is built.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Dimensions
// =============================================================================

/// One of the nine leadership-capacity dimensions ("rays").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
}

/// Developmental phase a dimension belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Reconnect,
    Radiate,
    Become,
}

impl Dimension {
    pub const ALL: [Dimension; 9] = [
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
        Self::R8,
        Self::R9,
    ];

    /// Foundation dimensions: depletion here forces the stabilize gate and
    /// they take priority as a growth-focus fallback.
    pub const FOUNDATION: [Dimension; 3] = [Self::R1, Self::R2, Self::R3];

    /// The grounding dimension checked by the presence-delta and
    /// suppressed-grounding rules.
    pub const GROUNDING: Dimension = Self::R3;

    /// Output-oriented dimensions for the performance-vs-presence delta.
    pub const OUTPUT: [Dimension; 3] = [Self::R4, Self::R5, Self::R9];

    /// The overflow dimension: a state, not a trait. Never a growth focus and
    /// never part of a signature.
    pub const OVERFLOW: Dimension = Self::R9;

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::R1),
            2 => Some(Self::R2),
            3 => Some(Self::R3),
            4 => Some(Self::R4),
            5 => Some(Self::R5),
            6 => Some(Self::R6),
            7 => Some(Self::R7),
            8 => Some(Self::R8),
            9 => Some(Self::R9),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Self::R1 => 1,
            Self::R2 => 2,
            Self::R3 => 3,
            Self::R4 => 4,
            Self::R5 => 5,
            Self::R6 => 6,
            Self::R7 => 7,
            Self::R8 => 8,
            Self::R9 => 9,
        }
    }

    /// Dimensions that can appear in a signature or as a growth focus.
    pub fn trait_dimensions() -> impl Iterator<Item = Dimension> {
        Self::ALL.into_iter().filter(|d| !d.is_overflow())
    }

    pub fn is_overflow(self) -> bool {
        self == Self::OVERFLOW
    }

    pub fn is_foundation(self) -> bool {
        Self::FOUNDATION.contains(&self)
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::R1 => "R1",
            Self::R2 => "R2",
            Self::R3 => "R3",
            Self::R4 => "R4",
            Self::R5 => "R5",
            Self::R6 => "R6",
            Self::R7 => "R7",
            Self::R8 => "R8",
            Self::R9 => "R9",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::R1 => "Ray of Intention",
            Self::R2 => "Ray of Joy",
            Self::R3 => "Ray of Presence",
            Self::R4 => "Ray of Power",
            Self::R5 => "Ray of Purpose",
            Self::R6 => "Ray of Authenticity",
            Self::R7 => "Ray of Connection",
            Self::R8 => "Ray of Possibility",
            Self::R9 => "Be The Light",
        }
    }

    /// Short name used when matching free-text predictor lists.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::R1 => "Intention",
            Self::R2 => "Joy",
            Self::R3 => "Presence",
            Self::R4 => "Power",
            Self::R5 => "Purpose",
            Self::R6 => "Authenticity",
            Self::R7 => "Connection",
            Self::R8 => "Possibility",
            Self::R9 => "Be The Light",
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Self::R1 => "Choose",
            Self::R2 => "Expand",
            Self::R3 => "Anchor",
            Self::R4 => "Act",
            Self::R5 => "Align",
            Self::R6 => "Reveal",
            Self::R7 => "Attune",
            Self::R8 => "Explore",
            Self::R9 => "Inspire",
        }
    }

    pub fn phase(self) -> Phase {
        match self {
            Self::R1 | Self::R2 | Self::R3 => Phase::Reconnect,
            Self::R4 | Self::R5 | Self::R6 => Phase::Radiate,
            Self::R7 | Self::R8 | Self::R9 => Phase::Become,
        }
    }

    /// The two practices recommended when this dimension is the growth focus.
    pub fn practices(self) -> [Practice; 2] {
        use Practice::*;
        match self {
            Self::R1 => [T010, T001],
            Self::R2 => [T004, T007],
            Self::R3 => [T008, T006],
            Self::R4 => [T009, T002],
            Self::R5 => [T010, T005],
            Self::R6 => [T003, T002],
            Self::R7 => [T003, T011],
            Self::R8 => [T005, T001],
            Self::R9 => [T004, T012],
        }
    }

    /// How this dimension tends to distort under load, for report copy.
    pub fn distortion_text(self) -> &'static str {
        match self {
            Self::R1 => "Under pressure, scattered priorities and reactive drift may replace clear direction.",
            Self::R2 => "Under pressure, joy access may narrow; numbness or forced positivity may surface.",
            Self::R3 => "Under pressure, attention may fracture and reactivity may overtake grounding.",
            Self::R4 => "Under pressure, aggression or withdrawal may replace measured power.",
            Self::R5 => "Under pressure, cynicism or meaning-loss may surface and effort feels untethered.",
            Self::R6 => "Under pressure, masking or performative behavior may replace authenticity.",
            Self::R7 => "Under pressure, withdrawal or people-pleasing may replace genuine connection.",
            Self::R8 => "Under pressure, rigidity or overwhelm may replace open exploration.",
            Self::R9 => "Under pressure, overextension or withdrawal from influence may surface.",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Sorted pair code for two dimensions, always ascending: `R1-R5`.
pub fn pair_code(a: Dimension, b: Dimension) -> String {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    format!("{low}-{high}")
}

// =============================================================================
// Facets and subfacets
// =============================================================================

/// One of the four facets (a-d) inside a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    A,
    B,
    C,
    D,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Self::A, Self::B, Self::C, Self::D];

    fn from_char(c: char) -> Option<Self> {
        match c {
            'a' => Some(Self::A),
            'b' => Some(Self::B),
            'c' => Some(Self::C),
            'd' => Some(Self::D),
            _ => None,
        }
    }

    fn letter(self) -> char {
        match self {
            Self::A => 'a',
            Self::B => 'b',
            Self::C => 'c',
            Self::D => 'd',
        }
    }
}

/// Typed subfacet key, e.g. `R3b`. Serialized as its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubfacetId {
    pub dimension: Dimension,
    pub facet: Facet,
}

impl SubfacetId {
    pub fn new(dimension: Dimension, facet: Facet) -> Self {
        Self { dimension, facet }
    }

    /// Parse `R<1-9><a-d>`. Anything else is `None`.
    pub fn parse(code: &str) -> Option<Self> {
        let rest = code.trim().strip_prefix('R')?;
        let mut chars = rest.chars();
        let digit = chars.next()?.to_digit(10)?;
        let facet = Facet::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        let dimension = Dimension::from_number(u8::try_from(digit).ok()?)?;
        Some(Self { dimension, facet })
    }

    pub fn all_for(dimension: Dimension) -> [SubfacetId; 4] {
        Facet::ALL.map(|facet| SubfacetId { dimension, facet })
    }

    /// Canonical subfacet label.
    pub fn name(self) -> &'static str {
        use Dimension::*;
        use Facet::*;
        match (self.dimension, self.facet) {
            (R1, A) => "Daily Intentionality",
            (R1, B) => "Time/Attention Architecture",
            (R1, C) => "Boundary Clarity",
            (R1, D) => "Pre-Decision Practice",
            (R2, A) => "Joy Access",
            (R2, B) => "Gratitude Practice",
            (R2, C) => "Reinforcement Behavior",
            (R2, D) => "Recovery Integration",
            (R3, A) => "Attention Stability",
            (R3, B) => "Cognitive Flexibility",
            (R3, C) => "Body Signal Awareness",
            (R3, D) => "Emotional Regulation",
            (R4, A) => "Agency/Action Orientation",
            (R4, B) => "Boundary Enforcement",
            (R4, C) => "Conflict Engagement",
            (R4, D) => "Power Under Pressure",
            (R5, A) => "Purpose Clarity",
            (R5, B) => "Values Alignment",
            (R5, C) => "Meaningful Contribution",
            (R5, D) => "Long-Range Thinking",
            (R6, A) => "Self-Disclosure",
            (R6, B) => "Congruence",
            (R6, C) => "Vulnerability Tolerance",
            (R6, D) => "Identity Integration",
            (R7, A) => "Relational Safety Creation",
            (R7, B) => "Empathic Accuracy",
            (R7, C) => "Repair Initiation",
            (R7, D) => "Trust Building",
            (R8, A) => "Cognitive Openness",
            (R8, B) => "Divergent Thinking",
            (R8, C) => "Adaptive Flexibility",
            (R8, D) => "Creative Problem-Solving",
            (R9, A) => "Behavioral Modeling",
            (R9, B) => "Standard Setting",
            (R9, C) => "Generative Impact",
            (R9, D) => "Legacy Orientation",
        }
    }
}

impl fmt::Display for SubfacetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.dimension, self.facet.letter())
    }
}

impl Serialize for SubfacetId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SubfacetId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SubfacetId::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid subfacet code {raw:?}")))
    }
}

// =============================================================================
// Practices (tools)
// =============================================================================

/// One of the twelve coaching practices measured by the practice bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Practice {
    T001,
    T002,
    T003,
    T004,
    T005,
    T006,
    T007,
    T008,
    T009,
    T010,
    T011,
    T012,
}

impl Practice {
    pub const ALL: [Practice; 12] = [
        Self::T001,
        Self::T002,
        Self::T003,
        Self::T004,
        Self::T005,
        Self::T006,
        Self::T007,
        Self::T008,
        Self::T009,
        Self::T010,
        Self::T011,
        Self::T012,
    ];

    /// Recommended when the growth-focus dimension has no mapping.
    pub const FALLBACK_PAIR: [Practice; 2] = [Self::T008, Self::T010];

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code.trim())
    }

    /// Resolve a display name (or one of its known aliases) to a practice.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        match name {
            "Watch Me" => Some(Self::T001),
            "I Rise" => Some(Self::T002),
            "Go First" => Some(Self::T003),
            "REPs" | "REPs (Performance Sustained)" => Some(Self::T004),
            "143 Challenge" => Some(Self::T005),
            "90-Second Window" => Some(Self::T006),
            "RAS Reset" => Some(Self::T007),
            "Presence Pause" => Some(Self::T008),
            "Boundary of Light" => Some(Self::T009),
            "If/Then Planning" | "If/Then" => Some(Self::T010),
            "Question Loop" => Some(Self::T011),
            "Witness" | "Witness/Leading the Witness" | "Leading the Witness" => Some(Self::T012),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::T001 => "T001",
            Self::T002 => "T002",
            Self::T003 => "T003",
            Self::T004 => "T004",
            Self::T005 => "T005",
            Self::T006 => "T006",
            Self::T007 => "T007",
            Self::T008 => "T008",
            Self::T009 => "T009",
            Self::T010 => "T010",
            Self::T011 => "T011",
            Self::T012 => "T012",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::T001 => "Watch Me",
            Self::T002 => "I Rise",
            Self::T003 => "Go First",
            Self::T004 => "REPs",
            Self::T005 => "143 Challenge",
            Self::T006 => "90-Second Window",
            Self::T007 => "RAS Reset",
            Self::T008 => "Presence Pause",
            Self::T009 => "Boundary of Light",
            Self::T010 => "If/Then Planning",
            Self::T011 => "Question Loop",
            Self::T012 => "Witness",
        }
    }
}

impl fmt::Display for Practice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Item attributes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Dimension,
    Practice,
    Load,
    Validity,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dimension => "dimension",
            Self::Practice => "practice",
            Self::Load => "load",
            Self::Validity => "validity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Normal,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureMode {
    Baseline,
    UnderPressure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Never / Rarely / Sometimes / Often / Almost always, or 0-4.
    #[serde(rename = "frequency_0_4")]
    Frequency,
    /// Scenario with options A-D.
    #[serde(rename = "forced_choice_a_d")]
    ForcedChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    Work,
    Life,
    #[default]
    Both,
}

/// Scoring bucket an item feeds, fixed by (pressure mode, polarity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Baseline capacity ("shine"). Reverse-keyed items are flipped.
    Baseline,
    /// Capacity under pressure ("access").
    UnderPressure,
    /// Distortion under pressure ("eclipse"). Never reversed.
    Distortion,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Self::Baseline, Self::UnderPressure, Self::Distortion];

    pub fn of(pressure_mode: PressureMode, polarity: Polarity) -> Self {
        match (pressure_mode, polarity) {
            (PressureMode::Baseline, _) => Self::Baseline,
            (PressureMode::UnderPressure, Polarity::Normal) => Self::UnderPressure,
            (PressureMode::UnderPressure, Polarity::Reverse) => Self::Distortion,
        }
    }
}

/// Validity scale a validity item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityScale {
    SocialDesirability,
    Attention,
    Infrequency,
    Inconsistency,
    Unclassified,
}

impl ValidityScale {
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("VAL_SD") => Self::SocialDesirability,
            Some("VAL_ATT") => Self::Attention,
            Some("VAL_INF") => Self::Infrequency,
            Some("VAL_INC") => Self::Inconsistency,
            _ => Self::Unclassified,
        }
    }
}

/// Resolved grouping key for an item, computed once per context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum ItemKey {
    Subfacet(SubfacetId),
    Practice(Practice),
    Load,
    Validity(ValidityScale),
}

// =============================================================================
// Item definitions
// =============================================================================

/// Immutable item metadata from an item bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: String,
    pub domain: Domain,
    /// Dimension number 1-9 for dimension items.
    #[serde(default)]
    pub dimension: Option<u8>,
    /// `R3b` for dimension items, `T004` for practice items, `VAL_SD` etc.
    /// for validity items.
    #[serde(default)]
    pub subfacet_code: Option<String>,
    #[serde(default)]
    pub subfacet_name: Option<String>,
    #[serde(default)]
    pub context: Context,
    pub polarity: Polarity,
    pub pressure_mode: PressureMode,
    pub response_format: ResponseFormat,
    #[serde(default)]
    pub friction_rating: u8,
    /// Keyed option (A-D) for scenarios and forced-choice attention checks.
    #[serde(default)]
    pub keyed_option: Option<String>,
    /// Free-form notes; may carry `A=4;B=3;C=1;D=0` option scoring or
    /// `KEY_SCORE=0` / `KEY=Never` attention keys.
    #[serde(default)]
    pub notes: Option<String>,
    /// Inconsistency pair id for validity items.
    #[serde(default)]
    pub pair_id: Option<String>,
}

impl Item {
    /// Baseline, normal-polarity frequency item. Adjust with the `with_*`
    /// builders.
    pub fn frequency(item_id: impl Into<String>, domain: Domain, code: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            domain,
            dimension: None,
            subfacet_code: Some(code.into()),
            subfacet_name: None,
            context: Context::Both,
            polarity: Polarity::Normal,
            pressure_mode: PressureMode::Baseline,
            response_format: ResponseFormat::Frequency,
            friction_rating: 1,
            keyed_option: None,
            notes: None,
            pair_id: None,
        }
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = Some(dimension.number());
        self
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_pressure(mut self, pressure_mode: PressureMode) -> Self {
        self.pressure_mode = pressure_mode;
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn with_forced_choice(mut self, keyed_option: Option<&str>) -> Self {
        self.response_format = ResponseFormat::ForcedChoice;
        self.keyed_option = keyed_option.map(str::to_string);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_pair(mut self, pair_id: impl Into<String>) -> Self {
        self.pair_id = Some(pair_id.into());
        self
    }

    pub fn bucket(&self) -> Bucket {
        Bucket::of(self.pressure_mode, self.polarity)
    }
}

/// Free-text reflection prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectionPrompt {
    pub prompt_id: String,
    #[serde(default)]
    pub dimension: Option<u8>,
    #[serde(default)]
    pub prompt_text: String,
}

/// The four parallel item banks plus reflection prompts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemBanks {
    pub dimension_items: Vec<Item>,
    pub practice_items: Vec<Item>,
    pub load_items: Vec<Item>,
    pub validity_items: Vec<Item>,
    #[serde(default)]
    pub reflection_prompts: Vec<ReflectionPrompt>,
}
