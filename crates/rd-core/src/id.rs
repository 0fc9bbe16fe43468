use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for shape IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for shapes.
/// Internally a `Spur` index: 4 bytes and O(1) to compare or hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(Spur);

impl ShapeId {
    /// Intern a string as a ShapeId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        ShapeId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh ID with a type prefix (e.g. `rectangle_4`).
    ///
    /// Skips any candidate that was already interned, so IDs loaded from a
    /// document (`rectangle_0`, …) are never handed out twice.
    pub fn with_prefix(prefix: &str) -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        loop {
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("{prefix}_{n}");
            if INTERNER.get(&candidate).is_none() {
                return Self::intern(&candidate);
            }
        }
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ShapeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ShapeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ShapeId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = ShapeId::intern("hero_box");
        let b = ShapeId::intern("hero_box");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "hero_box");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = ShapeId::with_prefix("rectangle");
        let b = ShapeId::with_prefix("rectangle");
        assert_ne!(a, b);
    }

    #[test]
    fn generated_ids_skip_loaded_ones() {
        // Pretend a document already used the next few counter values.
        for n in 0..64 {
            ShapeId::intern(&format!("loaded_{n}"));
        }
        for _ in 0..64 {
            let id = ShapeId::with_prefix("loaded");
            let n: u64 = id.as_str().trim_start_matches("loaded_").parse().unwrap();
            assert!(n >= 64, "reused a loaded id: {id}");
        }
    }
}
