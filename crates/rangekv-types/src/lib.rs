//! # Rangekv Types - Entity and Query Object Model
//!
//! Shared types consumed by the rangekv adapter: the entity kind
//! descriptor, the entity record with its directive-field split, the
//! heterogeneous query input and its normalized form, and the value
//! comparison helpers used by the sort engine.
//!
//! # Directive Fields
//!
//! Field names ending in [`DIRECTIVE_MARKER`] (`'$'`) configure an
//! operation rather than describe the record: they are never persisted
//! and never participate in equality filtering. Recognized directives
//! are `id$` (identifier hint on save) and the query options `sort$`,
//! `skip$`, `limit$`, `all$` and `load$`.

#![deny(unsafe_code)]

pub mod entity;
pub mod query;
pub mod value;

pub use entity::{DIRECTIVE_MARKER, Entity, EntityKind, ID_HINT_FIELD};
pub use query::{NormalizedQuery, Query, SortDirection};
pub use value::compare_values;
