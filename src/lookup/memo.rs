use std::fmt::Debug;

/// Single-slot memo: remembers the last key and the value computed for it.
///
/// A lookup with the same key returns the stored value untouched; any other
/// key evicts the slot and recomputes.
#[derive(Debug)]
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
    computations: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            slot: None,
            computations: 0,
        }
    }
}

impl<K: PartialEq + Debug, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce(&K) -> V) -> &V {
        let entry = match self.slot.take() {
            Some((cached, value)) if cached == key => {
                tracing::debug!(target: "memo", ?key, "memo hit, reusing cached value");
                (cached, value)
            }
            _ => {
                tracing::debug!(target: "memo", ?key, "memo calculation running");
                let value = compute(&key);
                self.computations += 1;
                (key, value)
            }
        };
        &self.slot.insert(entry).1
    }

    /// How many times the compute closure has actually run
    pub fn computations(&self) -> u64 {
        self.computations
    }

    #[cfg(test)]
    pub fn cached_key(&self) -> Option<&K> {
        self.slot.as_ref().map(|(key, _)| key)
    }

    #[cfg(test)]
    pub fn clear(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_same_key_computes_once() {
        let mut memo = Memo::new();
        assert_eq!(*memo.get_or_compute(2, |k| k * 10), 20);
        assert_eq!(*memo.get_or_compute(2, |_| panic!("should not recompute")), 20);
        assert_eq!(memo.computations(), 1);
        assert_eq!(memo.cached_key(), Some(&2));
    }

    #[test]
    fn test_key_change_evicts_slot() {
        let mut memo = Memo::new();
        memo.get_or_compute(1, |k| k + 1);
        memo.get_or_compute(2, |k| k + 1);
        // Only one slot, so going back to 1 recomputes
        assert_eq!(*memo.get_or_compute(1, |k| k + 100), 101);
        assert_eq!(memo.computations(), 3);
    }

    #[test]
    fn test_hit_returns_value_computed_earlier() {
        let mut memo = Memo::new();
        let first = memo.get_or_compute(String::from("bob"), |k| Rc::new(k.len())).clone();
        let second = memo.get_or_compute(String::from("bob"), |_| Rc::new(0)).clone();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(*second, 3);
        assert_eq!(memo.computations(), 1);
    }

    #[test]
    fn test_clear_forces_recompute() {
        let mut memo = Memo::new();
        memo.get_or_compute("a", |_| 1);
        memo.clear();
        assert!(memo.cached_key().is_none());
        assert_eq!(*memo.get_or_compute("a", |_| 2), 2);
        assert_eq!(memo.computations(), 2);
    }
}
