//! Storage key encoding.
//!
//! Key schema, per entity kind (`base` optional):
//!
//! - `[{base}_]{name}_{id}` - one JSON record blob per entity
//! - `[{base}_]{name}_keyrange` - the kind's identifier counter
//!
//! Records of one kind share a common prefix and differ only in the
//! fixed-width identifier suffix, so a scan between the minimum and
//! maximum identifier covers exactly that kind. The counter key sorts
//! above every identifier key of its kind (`'k'` > `'9'`) and is never
//! touched by such a scan.
//!
//! Assumed, not enforced: `base` and `name` do not themselves embed the
//! `'_'` separator in a way that collides with another kind's prefix.

use rangekv_types::EntityKind;

/// Suffix of the per-kind counter key.
pub const COUNTER_SUFFIX: &str = "keyrange";

/// Default identifier width, in characters.
pub const DEFAULT_ID_WIDTH: usize = 20;

fn prefix(kind: &EntityKind) -> String {
    match &kind.base {
        Some(base) => format!("{}_{}_", base, kind.name),
        None => format!("{}_", kind.name),
    }
}

/// Build the storage key for one entity. Deterministic and pure.
#[inline]
pub fn encode(kind: &EntityKind, id: &str) -> Vec<u8> {
    format!("{}{}", prefix(kind), id).into_bytes()
}

/// Build the key of the kind's identifier counter.
#[inline]
pub fn counter(kind: &EntityKind) -> Vec<u8> {
    format!("{}{}", prefix(kind), COUNTER_SUFFIX).into_bytes()
}

/// Inclusive lower bound of the kind's identifier range: the all-`'0'`
/// identifier of the given width.
#[inline]
pub fn scan_start(kind: &EntityKind, width: usize) -> Vec<u8> {
    encode(kind, &"0".repeat(width))
}

/// Exclusive upper bound of the kind's identifier range.
///
/// The sentinel is the all-`'9'` identifier — the digit matching the
/// identifier alphabet — with a `'~'` terminator so an end-exclusive
/// scan still includes the maximal identifier while staying below the
/// counter key and any adjacent kind prefix.
#[inline]
pub fn scan_end(kind: &EntityKind, width: usize) -> Vec<u8> {
    let mut sentinel = "9".repeat(width);
    sentinel.push('~');
    encode(kind, &sentinel)
}
