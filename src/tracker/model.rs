// sim-tracker - Status tracker cards for chat messages
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::error::TrackerError;
use serde::Serialize;
use serde_json::{Map, Value};

use super::format::GenericTree;

pub const UNKNOWN_DATE: &str = "Unknown Date";
pub const UNKNOWN_TIME: &str = "Unknown Time";

/// Top-level keys of the legacy shape that carry world data instead of a
/// character.
pub const LEGACY_WORLD_KEYS: &[&str] = &["current_date", "current_time"];

struct WorldField {
    sources: &'static [&'static str],
    default: &'static str,
}

const CURRENT_DATE: WorldField =
    WorldField { sources: &["current_date", "currentDate"], default: UNKNOWN_DATE };
const CURRENT_TIME: WorldField =
    WorldField { sources: &["current_time", "currentTime"], default: UNKNOWN_TIME };

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldData {
    pub current_date: String,
    pub current_time: String,
}

impl Default for WorldData {
    fn default() -> Self {
        Self { current_date: UNKNOWN_DATE.to_owned(), current_time: UNKNOWN_TIME.to_owned() }
    }
}

impl WorldData {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            current_date: resolve(fields, &CURRENT_DATE),
            current_time: resolve(fields, &CURRENT_TIME),
        }
    }
}

fn resolve(fields: &Map<String, Value>, field: &WorldField) -> String {
    field
        .sources
        .iter()
        .find_map(|key| fields.get(*key).and_then(display_text))
        .unwrap_or_else(|| field.default.to_owned())
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRecord {
    pub name: String,
    /// Source attributes, passed through untouched.
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTracker {
    pub world_data: WorldData,
    pub characters: Vec<CharacterRecord>,
}

/// The two schema variants a tracker block may use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerShape<'a> {
    /// `{ worldData: {...}, characters: [ {name, ...}, ... ] }`
    Current { world: Option<&'a Map<String, Value>>, characters: &'a [Value] },
    /// `{ current_date, current_time, <name>: {...}, ... }`
    Legacy(&'a Map<String, Value>),
}

impl<'a> TrackerShape<'a> {
    pub fn classify(tree: &'a GenericTree) -> Result<Self, TrackerError> {
        let Value::Object(root) = tree else {
            return Err(TrackerError::Shape { found: kind_name(tree) });
        };
        let world = root.get("worldData").filter(|v| is_truthy(v));
        match (world, root.get("characters")) {
            (Some(world), Some(Value::Array(characters))) => {
                Ok(Self::Current { world: world.as_object(), characters })
            }
            _ => Ok(Self::Legacy(root)),
        }
    }

    #[must_use]
    pub fn into_canonical(self) -> CanonicalTracker {
        match self {
            Self::Current { world, characters } => from_current(world, characters),
            Self::Legacy(root) => from_legacy(root),
        }
    }
}

/// Reconcile either schema variant into the canonical model.
pub fn reconcile(tree: &GenericTree) -> Result<CanonicalTracker, TrackerError> {
    TrackerShape::classify(tree).map(TrackerShape::into_canonical)
}

fn from_current(world: Option<&Map<String, Value>>, characters: &[Value]) -> CanonicalTracker {
    let world_data = world.map(WorldData::from_fields).unwrap_or_default();
    let characters = characters
        .iter()
        .map(|entry| match entry {
            Value::Object(fields) => {
                let mut attributes = fields.clone();
                let name = attributes
                    .shift_remove("name")
                    .and_then(|v| display_text(&v))
                    .unwrap_or_default();
                CharacterRecord { name, attributes }
            }
            other => CharacterRecord {
                name: display_text(other).unwrap_or_default(),
                attributes: Map::new(),
            },
        })
        .collect();
    CanonicalTracker { world_data, characters }
}

fn from_legacy(root: &Map<String, Value>) -> CanonicalTracker {
    let mut world = Map::new();
    let mut characters = Vec::new();
    for (key, value) in root {
        if LEGACY_WORLD_KEYS.contains(&key.as_str()) {
            world.insert(key.clone(), value.clone());
            continue;
        }
        let attributes = value.as_object().cloned().unwrap_or_default();
        characters.push(CharacterRecord { name: key.clone(), attributes });
    }
    CanonicalTracker { world_data: WorldData::from_fields(&world), characters }
}

/// Loose truthiness: null, false, zero and the empty string are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Scalar as display text, `None` when falsy or not a scalar.
pub(crate) fn display_text(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
