//! A minimal single-key key-value store abstraction.

/// Storage and retrieval of values by a single key.
///
/// [`KeyChainTree`](crate::KeyChainTree) implements this by treating every
/// key as a chain of length one, so it can be passed wherever a plain
/// single-key store is expected.
pub trait KeyValueManager<K, V> {
    /// Returns a reference to the value stored under `key`, if any.
    fn try_get(&self, key: &K) -> Option<&V>;

    /// Stores `value` under `key`, returning the value it replaced.
    fn add(&mut self, key: K, value: V) -> Option<V>;

    /// Removes the value stored under `key`, returning it if it existed.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes all values.
    fn clear(&mut self);
}
