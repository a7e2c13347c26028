//! Live-actor lookup helpers used by reconciliation.
//!
//! Display names are compared in normalized form: inline formatting markup
//! is stripped, case folded, whitespace collapsed. Two names differing only
//! in presentation markup are the same name.

use std::collections::HashSet;

use crate::types::{ActorId, ActorRecord, Location};

/// Strip inline formatting codes from a display name and canonicalize it
/// for comparison.
///
/// Formatting codes are a `§` or `&` immediately followed by a code
/// character; a `&` not followed by one is kept (it can legitimately appear
/// in names), a bare `§` never is.
pub fn normalize_display_name(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '§' || ch == '&' {
            if let Some(next) = chars.peek() {
                if next.is_ascii_alphanumeric() {
                    chars.next();
                    continue;
                }
            }
            if ch == '§' {
                continue;
            }
        }
        cleaned.push(ch);
    }
    cleaned
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether two display names are equal after normalization.
pub fn names_equal(a: &str, b: &str) -> bool {
    normalize_display_name(a) == normalize_display_name(b)
}

/// Read-only query view over a set of live actors.
///
/// Answers the two questions reconciliation asks: "which actor sits within
/// tolerance of this point" and "which actor carries this display name".
/// Iteration order is the order the slice was built in; first match wins.
pub struct SpatialIndex<'a> {
    actors: &'a [ActorRecord],
}

impl<'a> SpatialIndex<'a> {
    pub fn new(actors: &'a [ActorRecord]) -> Self {
        Self { actors }
    }

    /// First actor within `tolerance` world units of `point` (same world),
    /// skipping ids already claimed by another binding.
    pub fn first_within(
        &self,
        point: &Location,
        tolerance: f64,
        skip: &HashSet<ActorId>,
    ) -> Option<&'a ActorRecord> {
        self.actors.iter().find(|actor| {
            !skip.contains(&actor.id)
                && actor
                    .location
                    .distance(point)
                    .is_some_and(|d| d <= tolerance)
        })
    }

    /// First actor whose normalized display name equals the normalized
    /// `display_name`, skipping claimed ids.
    pub fn named(&self, display_name: &str, skip: &HashSet<ActorId>) -> Option<&'a ActorRecord> {
        let wanted = normalize_display_name(display_name);
        self.actors.iter().find(|actor| {
            !skip.contains(&actor.id) && normalize_display_name(&actor.display_name) == wanted
        })
    }
}
