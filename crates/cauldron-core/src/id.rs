//! Stable effect identifiers

use std::fmt;

/// Handle to a live effect.
///
/// Effects are created and destroyed every few seconds, so other code refers to
/// them through this id instead of holding references into the manager's
/// storage. Ids are allocated by the owning manager and never reused.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct EffectId(u64);

impl EffectId {
    /// Create an EffectId from a raw value
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// The id following this one
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EffectId({})", self.0)
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        let id = EffectId::from_raw(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{id:?}"), "EffectId(42)");
    }

    #[test]
    fn test_next_is_ordered() {
        let id = EffectId::from_raw(7);
        assert!(id.next() > id);
        assert_eq!(id.next().raw(), 8);
    }
}
