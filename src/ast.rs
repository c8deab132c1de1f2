//! Items produced by the declaration parser.
//!
//! The parser hands over a JSON document `{ "system": { "name": … }, "items": [ … ] }`
//! where every item carries a `type` discriminant. Attribute objects are
//! presence-based: a key like `initial` marks the attribute whatever its value is,
//! and one object may carry several such keys.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParsedSystem {
    pub system: SystemDeclaration,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SystemDeclaration {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Item {
    Process {
        name: String,
    },
    Clock {
        name: String,
        #[serde(default = "default_size")]
        amount: u32,
    },
    Int {
        name: String,
        #[serde(default = "default_size")]
        size: u32,
        min: i64,
        max: i64,
        init: i64,
    },
    Location {
        process_name: String,
        name: String,
        #[serde(default, deserialize_with = "location_attributes")]
        attributes: Vec<LocationAttribute>,
    },
    Edge {
        process_name: String,
        source: String,
        target: String,
        event: String,
        #[serde(default, deserialize_with = "edge_attributes")]
        attributes: Vec<EdgeAttribute>,
    },
    Sync {
        sync_constr: Vec<SyncParticipant>,
    },
    Event {
        name: String,
    },
}

fn default_size() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationAttribute {
    Initial,
    Invariant(Vec<Constraint>),
    Layout { x: f64, y: f64 },
    Labels(Vec<String>),
    Committed,
    Urgent,
}

impl LocationAttribute {
    /// Every recognized key of one attribute object yields an attribute, so
    /// `{ "initial": …, "urgent": … }` marks both. Unknown keys are ignored.
    pub fn from_map(map: &Map<String, Value>) -> Result<Vec<Self>, String> {
        let mut attributes = Vec::new();
        if map.contains_key("initial") {
            attributes.push(LocationAttribute::Initial);
        }
        if map.contains_key("invariant") {
            attributes.push(LocationAttribute::Invariant(field_or_default(
                map,
                "constraint",
            )?));
        }
        if map.contains_key("layout") {
            attributes.push(LocationAttribute::Layout {
                x: field_or_default(map, "x")?,
                y: field_or_default(map, "y")?,
            });
        }
        if map.contains_key("labels") {
            attributes.push(LocationAttribute::Labels(field_or_default(map, "labelList")?));
        }
        if map.contains_key("committed") {
            attributes.push(LocationAttribute::Committed);
        }
        if map.contains_key("urgent") {
            attributes.push(LocationAttribute::Urgent);
        }
        Ok(attributes)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EdgeAttribute {
    Provided(Vec<Constraint>),
    Do(Vec<Statement>),
}

impl EdgeAttribute {
    pub fn from_map(map: &Map<String, Value>) -> Result<Vec<Self>, String> {
        let mut attributes = Vec::new();
        if map.contains_key("provided") {
            attributes.push(EdgeAttribute::Provided(field_or_default(map, "constraint")?));
        }
        if map.contains_key("do") {
            attributes.push(EdgeAttribute::Do(field_or_default(map, "maths")?));
        }
        Ok(attributes)
    }
}

fn location_attributes<'de, D>(deserializer: D) -> Result<Vec<LocationAttribute>, D::Error>
where
    D: Deserializer<'de>,
{
    flatten_attribute_maps(deserializer, LocationAttribute::from_map)
}

fn edge_attributes<'de, D>(deserializer: D) -> Result<Vec<EdgeAttribute>, D::Error>
where
    D: Deserializer<'de>,
{
    flatten_attribute_maps(deserializer, EdgeAttribute::from_map)
}

fn flatten_attribute_maps<'de, D, T>(
    deserializer: D,
    from_map: fn(&Map<String, Value>) -> Result<Vec<T>, String>,
) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
{
    let maps: Vec<Map<String, Value>> = Vec::deserialize(deserializer)?;
    let mut attributes = Vec::new();
    for map in &maps {
        attributes.extend(from_map(map).map_err(de::Error::custom)?);
    }
    Ok(attributes)
}

fn field_or_default<T>(map: &Map<String, Value>, key: &str) -> Result<T, String>
where
    T: serde::de::DeserializeOwned + Default,
{
    match map.get(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(|err| format!("invalid '{key}': {err}")),
    }
}

/// Either side of a comparison or assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Number(serde_json::Number),
    Text(String),
}

impl Operand {
    /// Whether the operand denotes the integer zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Operand::Number(n) => n.as_i64() == Some(0) || n.as_u64() == Some(0),
            Operand::Text(text) => text.trim().parse::<i64>() == Ok(0),
        }
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(n) => write!(f, "{n}"),
            Operand::Text(text) => write!(f, "{text}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Constraint {
    Comparison { lhs: Operand, op: String, rhs: Operand },
    Term(String),
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Comparison { lhs, op, rhs } => write!(f, "{lhs}{op}{rhs}"),
            Constraint::Term(term) => write!(f, "{term}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Statement {
    Assignment { lhs: String, set: String, rhs: Operand },
    Term(String),
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Assignment { lhs, set, rhs } => write!(f, "{lhs}{set}{rhs}"),
            Statement::Term(term) => write!(f, "{term}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncParticipant {
    pub process: String,
    pub event: String,
    #[serde(default)]
    pub weak_sync: Value,
}

impl SyncParticipant {
    pub fn new(process: &str, event: &str, weak: bool) -> Self {
        Self {
            process: String::from(process),
            event: String::from(event),
            weak_sync: if weak { Value::from("?") } else { Value::Null },
        }
    }

    /// Truthiness of the weak-synchronization marker.
    pub fn is_weak(&self) -> bool {
        match &self.weak_sync {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}
