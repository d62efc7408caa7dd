//! Entity kind descriptor and entity record types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Marker suffix for directive fields.
///
/// A field whose name ends in this character carries call-time
/// configuration and is excluded from the persisted data projection and
/// from equality filtering.
pub const DIRECTIVE_MARKER: char = '$';

/// Directive field carrying a caller-supplied identifier on save.
pub const ID_HINT_FIELD: &str = "id$";

/// Sentinel hint value meaning "no identifier supplied".
const NO_HINT: i64 = -1;

/// Identifies a logical collection by an optional base namespace and a
/// mandatory name.
///
/// Two kinds are equal iff both fields match. Immutable once an entity
/// is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityKind {
    /// Optional namespace prefixed to every storage key of this kind.
    pub base: Option<String>,
    /// Collection name.
    pub name: String,
}

impl EntityKind {
    /// Create a kind with no base namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self { base: None, name: name.into() }
    }

    /// Create a kind under a base namespace.
    pub fn based(base: impl Into<String>, name: impl Into<String>) -> Self {
        Self { base: Some(base.into()), name: name.into() }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.base {
            Some(base) => write!(f, "{}/{}", base, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A single entity record: a kind, an optional identifier, and a map of
/// named field values.
///
/// Fields split into data fields (persisted) and directive fields
/// (names ending in [`DIRECTIVE_MARKER`], call-time configuration only).
/// The identifier is held outside the field map and re-attached by
/// [`Entity::data`] so the persisted payload is self-describing.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    kind: EntityKind,
    id: Option<String>,
    fields: Map<String, Value>,
}

impl Entity {
    /// Create an empty entity of the given kind.
    pub fn new(kind: EntityKind) -> Self {
        Self { kind, id: None, fields: Map::new() }
    }

    /// Builder-style field assignment.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Entity factory for decoded rows: pulls `id` out of the stored
    /// record and keeps the remaining fields.
    pub fn from_record(kind: EntityKind, mut record: Map<String, Value>) -> Self {
        let id = match record.remove("id") {
            Some(Value::String(id)) => Some(id),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };
        Self { kind, id, fields: record }
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Look up a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// The persisted projection: every non-directive field, plus the
    /// identifier under `id` when one is set.
    pub fn data(&self) -> Map<String, Value> {
        let mut data: Map<String, Value> = self
            .fields
            .iter()
            .filter(|(name, _)| !name.ends_with(DIRECTIVE_MARKER))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        if let Some(id) = &self.id {
            data.insert("id".to_string(), Value::String(id.clone()));
        }
        data
    }

    /// Take the `id$` directive, if one was supplied.
    ///
    /// The directive is removed from the field map either way. The
    /// `-1` sentinel (numeric or string) means "no hint".
    pub fn take_id_hint(&mut self) -> Option<String> {
        match self.fields.remove(ID_HINT_FIELD) {
            Some(Value::String(hint)) if hint != "-1" => Some(hint),
            Some(Value::Number(hint)) if hint.as_i64() != Some(NO_HINT) => {
                Some(hint.to_string())
            }
            _ => None,
        }
    }
}
