//! Hit testing against the activated mask.

use crate::error::GameError;
use crate::mask::MaskStore;

/// How a sampled channel value is judged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HitRule {
    /// Only a fully saturated channel (255) counts. Masks are expected to be
    /// pure black and white without anti-aliasing.
    #[default]
    Exact,
    /// Any value at or above the threshold counts; tolerates soft mask edges.
    /// A threshold of 0 would accept empty pixels and is never built by config.
    AtLeast(u8),
}

impl HitRule {
    pub fn accepts(self, value: u8) -> bool {
        match self {
            HitRule::Exact => value == 255,
            HitRule::AtLeast(min) => value >= min,
        }
    }
}

/// Does the click at canvas pixel `(x, y)` land inside `armed`'s region?
///
/// The armed word's mask must already be the active surface of `store`
/// (activation happens on selection, not per click). Points off the canvas
/// are never inside, whatever the rule.
pub fn test(store: &MaskStore, rule: HitRule, armed: &str, x: f64, y: f64) -> Result<bool, GameError> {
    if store.active_word() != Some(armed) {
        return Err(GameError::MaskNotReady(armed.to_string()));
    }
    Ok(store.in_bounds(x, y) && rule.accepts(store.sample_alpha(x, y)))
}
