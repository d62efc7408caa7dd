//! Query input coercion and the normalized filter/options structure.

use serde_json::{Map, Value};

use crate::entity::DIRECTIVE_MARKER;

/// Sort direction for a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Interpret a directive value: any negative number means
    /// descending, everything else ascending.
    fn from_value(value: &Value) -> Self {
        if value.as_f64().is_some_and(|n| n < 0.0) {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

/// Heterogeneous query input as accepted by load/list/remove.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// No filter, no options.
    Empty,
    /// A bare identifier, equivalent to the filter `{"id": ..}`.
    Id(String),
    /// A filter/options mapping; keys ending in `'$'` are directives.
    Filter(Map<String, Value>),
}

impl Query {
    /// Coerce an arbitrary JSON value into a query, mirroring the
    /// accepted inputs: null, a bare id string, or a mapping.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(id) => Query::Id(id),
            Value::Object(filter) => Query::Filter(filter),
            _ => Query::Empty,
        }
    }
}

impl From<&str> for Query {
    fn from(id: &str) -> Self {
        Query::Id(id.to_string())
    }
}

/// Canonical filter/options form of a [`Query`].
///
/// Every option defaults to "unset"; normalization never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuery {
    /// Equality filters over non-directive fields.
    pub filter: Map<String, Value>,
    /// First listed sort field wins, others are ignored.
    pub sort: Option<(String, SortDirection)>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
    /// Operate on the kind's entire key range (remove only).
    pub all: bool,
    /// Return the removed entity's data rather than nothing.
    pub load: bool,
}

impl Default for NormalizedQuery {
    fn default() -> Self {
        Self { filter: Map::new(), sort: None, skip: None, limit: None, all: false, load: true }
    }
}

impl NormalizedQuery {
    pub fn normalize(query: &Query) -> Self {
        let mut normalized = Self::default();
        match query {
            Query::Empty => {}
            Query::Id(id) => {
                normalized.filter.insert("id".to_string(), Value::String(id.clone()));
            }
            Query::Filter(map) => {
                for (name, value) in map {
                    if !name.ends_with(DIRECTIVE_MARKER) {
                        normalized.filter.insert(name.clone(), value.clone());
                        continue;
                    }
                    match name.as_str() {
                        "sort$" => {
                            // Only the first listed sort field is honored.
                            if let Some(entry) =
                                value.as_object().and_then(|spec| spec.iter().next())
                            {
                                normalized.sort = Some((
                                    entry.0.clone(),
                                    SortDirection::from_value(entry.1),
                                ));
                            }
                        }
                        "skip$" => normalized.skip = value.as_u64().map(|n| n as usize),
                        "limit$" => normalized.limit = value.as_u64().map(|n| n as usize),
                        "all$" => normalized.all = value.as_bool().unwrap_or(false),
                        "load$" => normalized.load = value.as_bool().unwrap_or(true),
                        // Unrecognized directives configure nothing and
                        // never become equality filters.
                        _ => {}
                    }
                }
            }
        }
        normalized
    }

    /// The identifier filter, when the query carries one.
    pub fn id(&self) -> Option<&str> {
        self.filter.get("id").and_then(Value::as_str)
    }

    /// Whether a stored record satisfies every equality filter.
    ///
    /// Comparison is non-coercive deep equality. A field absent from the
    /// record only matches a null filter value.
    pub fn matches(&self, record: &Map<String, Value>) -> bool {
        self.filter.iter().all(|(name, expected)| {
            if name.ends_with(DIRECTIVE_MARKER) {
                return true;
            }
            match record.get(name) {
                Some(actual) => actual == expected,
                None => expected.is_null(),
            }
        })
    }
}
