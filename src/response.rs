//! Per-run response packet.
//!
//! Only the packet's structure is a contract: `run_id` and a `responses`
//! object. Anything inside an answer that cannot be read degrades to a
//! missing answer instead of rejecting the packet.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::Deserializer;
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::warn;

use crate::error::{Result, ScoringError};

/// Assessment tier the packet was collected under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "QUICK_43")]
    Quick43,
    #[default]
    #[serde(rename = "FULL_143")]
    Full143,
}

/// A raw answer: a number on the 0-4 scale, or text (a frequency label, a
/// numeric string, or a forced-choice letter).
///
/// Any other JSON (bools, arrays, objects, numbers outside f64 range) is kept
/// verbatim as `Malformed` and scores as missing.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    Number(f64),
    Text(String),
    Malformed(String),
}

impl ResponseValue {
    fn from_raw(raw: &RawValue) -> Self {
        let text = raw.get();
        if let Ok(n) = serde_json::from_str::<f64>(text) {
            return Self::Number(n);
        }
        if let Ok(s) = serde_json::from_str::<String>(text) {
            return Self::Text(s);
        }
        Self::Malformed(text.to_string())
    }
}

impl Serialize for ResponseValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Malformed(raw) => RawValue::from_string(raw.clone())
                .map_err(S::Error::custom)?
                .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ResponseValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Ok(Self::from_raw(&raw))
    }
}

impl From<f64> for ResponseValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for ResponseValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemResponse {
    #[serde(default)]
    pub value: Option<ResponseValue>,
    /// Client-side answer time (epoch millis); informational only.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<i64>,
}

impl ItemResponse {
    pub fn new(value: impl Into<ResponseValue>) -> Self {
        Self {
            value: Some(value.into()),
            timestamp: None,
        }
    }
}

/// Everything one respondent submitted for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePacket {
    pub run_id: String,
    #[serde(default)]
    pub tier: Tier,
    /// RFC 3339 start of the session.
    #[serde(default)]
    pub start_ts: Option<String>,
    #[serde(default)]
    pub end_ts: Option<String>,
    #[serde(default, deserialize_with = "lenient_responses")]
    pub responses: BTreeMap<String, ItemResponse>,
    #[serde(
        default,
        deserialize_with = "lenient_reflections",
        skip_serializing_if = "Option::is_none"
    )]
    pub reflection_responses: Option<BTreeMap<String, String>>,
    /// Caller-supplied state label (e.g. "post-travel"). Echoed, never scored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_context: Option<String>,
}

impl ResponsePacket {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            tier: Tier::default(),
            start_ts: None,
            end_ts: None,
            responses: BTreeMap::new(),
            reflection_responses: None,
            state_context: None,
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let packet: Self =
            serde_json::from_str(raw).map_err(|e| ScoringError::Packet(e.to_string()))?;
        packet.validate()?;
        Ok(packet)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ScoringError::io(path, e))?;
        Self::from_json_str(&raw)
    }

    /// Structural checks only; answer quality is the validity engine's job.
    pub fn validate(&self) -> Result<()> {
        if self.run_id.trim().is_empty() {
            return Err(ScoringError::Packet("run_id must be non-empty".to_string()));
        }
        Ok(())
    }

    pub fn value(&self, item_id: &str) -> Option<&ResponseValue> {
        self.responses.get(item_id).and_then(|r| r.value.as_ref())
    }

    pub fn reflection(&self, prompt_id: &str) -> Option<&str> {
        self.reflection_responses
            .as_ref()
            .and_then(|m| m.get(prompt_id))
            .map(String::as_str)
    }

    pub fn set(&mut self, item_id: impl Into<String>, value: impl Into<ResponseValue>) {
        self.responses
            .insert(item_id.into(), ItemResponse::new(value));
    }
}

// =============================================================================
// Lenient field readers
// =============================================================================

/// Non-integer timestamps are dropped.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<i64>, D::Error> {
    let raw = Option::<Box<RawValue>>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| serde_json::from_str::<i64>(r.get()).ok()))
}

/// `responses` must be an object; an entry that is not one reads as unanswered.
fn lenient_responses<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, ItemResponse>, D::Error> {
    let raw = BTreeMap::<String, Box<RawValue>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(item_id, entry)| {
            let response = serde_json::from_str::<ItemResponse>(entry.get()).unwrap_or_else(|err| {
                warn!(
                    item_id = %item_id,
                    error = %err,
                    "unreadable response entry, treating as unanswered"
                );
                ItemResponse::default()
            });
            (item_id, response)
        })
        .collect())
}

/// Non-string reflections are dropped, as is a non-object map.
fn lenient_reflections<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<BTreeMap<String, String>>, D::Error> {
    let Some(raw) = Option::<Box<RawValue>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let Ok(entries) = serde_json::from_str::<BTreeMap<String, Box<RawValue>>>(raw.get()) else {
        warn!("reflection_responses is not an object, ignoring it");
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .filter_map(|(prompt_id, text)| {
                serde_json::from_str::<String>(text.get())
                    .ok()
                    .map(|text| (prompt_id, text))
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_value_shapes() {
        let raw = r#"{
            "run_id": "run-1",
            "tier": "QUICK_43",
            "responses": {
                "a": {"value": 3},
                "b": {"value": "Often"},
                "c": {"value": null},
                "d": {}
            }
        }"#;
        let packet = ResponsePacket::from_json_str(raw).unwrap();
        assert_eq!(packet.tier, Tier::Quick43);
        assert_eq!(packet.value("a"), Some(&ResponseValue::Number(3.0)));
        assert_eq!(packet.value("b"), Some(&ResponseValue::Text("Often".into())));
        assert_eq!(packet.value("c"), None);
        assert_eq!(packet.value("d"), None);
    }

    #[test]
    fn empty_run_id_is_rejected() {
        let err = ResponsePacket::from_json_str(r#"{"run_id": "  "}"#).unwrap_err();
        assert!(matches!(err, ScoringError::Packet(_)));
    }

    #[test]
    fn non_object_packet_is_a_packet_error() {
        let err = ResponsePacket::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, ScoringError::Packet(_)));
    }

    #[test]
    fn malformed_answers_degrade_instead_of_rejecting() {
        let raw = r#"{
            "run_id": "run-2",
            "responses": {
                "bool": {"value": true},
                "list": {"value": [1]},
                "obj": {"value": {"a": 1}},
                "huge": {"value": 1e400},
                "stamp": {"value": 2, "timestamp": "yesterday"},
                "bare": 3
            },
            "reflection_responses": {"p1": 7, "p2": "kept"}
        }"#;
        let packet = ResponsePacket::from_json_str(raw).unwrap();
        assert_eq!(packet.value("bool"), Some(&ResponseValue::Malformed("true".into())));
        assert_eq!(packet.value("list"), Some(&ResponseValue::Malformed("[1]".into())));
        assert!(matches!(packet.value("obj"), Some(ResponseValue::Malformed(_))));
        assert_eq!(packet.value("huge"), Some(&ResponseValue::Malformed("1e400".into())));
        assert_eq!(packet.value("stamp"), Some(&ResponseValue::Number(2.0)));
        assert_eq!(packet.responses["stamp"].timestamp, None);
        assert_eq!(packet.value("bare"), None);
        assert_eq!(packet.reflection("p1"), None);
        assert_eq!(packet.reflection("p2"), Some("kept"));
    }

    #[test]
    fn malformed_values_survive_a_json_round_trip() {
        let raw = r#"{"run_id": "run-3", "responses": {"x": {"value": [1, 2]}}}"#;
        let packet = ResponsePacket::from_json_str(raw).unwrap();
        let again = ResponsePacket::from_json_str(&serde_json::to_string(&packet).unwrap()).unwrap();
        assert_eq!(again, packet);
    }

    #[test]
    fn non_object_responses_is_a_packet_error() {
        let err = ResponsePacket::from_json_str(r#"{"run_id": "r", "responses": [1]}"#).unwrap_err();
        assert!(matches!(err, ScoringError::Packet(_)));
    }

    #[test]
    fn missing_run_id_is_a_packet_error() {
        let err = ResponsePacket::from_json_str(r#"{"responses": {}}"#).unwrap_err();
        assert!(matches!(err, ScoringError::Packet(_)));
    }
}
