//! A map from chains of keys to values, based on a tree of hash maps.

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::iter;
use std::collections::hash_map::RandomState;
use tracing::trace;
use crate::error::{Error, Result};
use crate::manager::KeyValueManager;
use crate::node::Node;


/// A tree mapping a non-empty chain of keys to a single value.
///
/// Each level of the tree is a hash map keyed by one element of the chain.
/// Only the node at the end of a stored chain carries a value; the nodes
/// it passes through on the way are routing nodes, and looking one of them
/// up yields `None` unless a value was stored there explicitly.
///
/// Removing a chain removes the whole subtree under its last key, so every
/// longer chain starting with it is removed too.
#[derive(Debug)]
pub struct KeyChainTree<K, V, S = RandomState> {
    root: Node<K, V, S>,
    len: usize,
}

impl<K, V> KeyChainTree<K, V, RandomState> {
    /// Creates an empty tree. The same as `Default`.
    pub fn new() -> Self {
        KeyChainTree::with_hasher(RandomState::new())
    }
}

impl<K, V, S> Clone for KeyChainTree<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        KeyChainTree { root: self.root.clone(), len: self.len }
    }
}

impl<K, V, S: Default> Default for KeyChainTree<K, V, S> {
    fn default() -> Self {
        KeyChainTree::with_hasher(S::default())
    }
}

impl<K, V, S> KeyChainTree<K, V, S> {
    /// Creates an empty tree whose levels hash their keys with `hash_builder`.
    pub fn with_hasher(hash_builder: S) -> Self {
        KeyChainTree { root: Node::with_hasher(hash_builder), len: 0 }
    }

    /// Returns the number of chains that currently have a value.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if and only if no chain has a value.
    ///
    /// Routing nodes left behind by [`remove`](Self::remove) may still exist.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of nodes in the tree, not counting the root.
    pub fn node_count(&self) -> usize {
        self.root.descendant_count()
    }

    /// Removes every chain. The tree remains usable afterwards.
    pub fn clear(&mut self) {
        trace!(values = self.len, "clearing key chain tree");
        self.root.clear_children();
        self.len = 0;
    }

    /// Subtracts the values of a detached subtree and hands back its own value.
    fn release(&mut self, mut detached: Node<K, V, S>) -> Option<V> {
        let dropped = detached.value_count();
        self.len -= dropped;
        trace!(dropped, has_children = detached.has_children(), "detached subtree");
        detached.value.take()
    }
}

impl<K, V, S> KeyChainTree<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Stores `value` at the end of the chain `keys`, creating any missing
    /// nodes on the way.
    ///
    /// The previous value of the chain is replaced and returned, if there
    /// was one. Fails without touching the tree if `keys` is empty.
    pub fn add<I>(&mut self, keys: I, value: V) -> Result<Option<V>>
    where
        I: IntoIterator<Item = K>,
    {
        let mut keys = keys.into_iter().peekable();

        if keys.peek().is_none() {
            return Err(Error::empty_key_chain());
        }

        Ok(self.add_chain(keys, value))
    }

    /// Stores `value` under a single key. The same as `add([key], value)`.
    pub fn add_one(&mut self, key: K, value: V) -> Option<V> {
        self.add_chain(iter::once(key), value)
    }

    /// The caller guarantees that `keys` is not empty, otherwise the value
    /// would end up in the root.
    fn add_chain<I>(&mut self, keys: I, value: V) -> Option<V>
    where
        I: Iterator<Item = K>,
    {
        let mut node = &mut self.root;
        let mut created = 0_usize;

        for key in keys {
            let (child, is_new) = node.child_or_insert(key);
            created += usize::from(is_new);
            node = child;
        }

        let previous = node.value.replace(value);

        if previous.is_none() {
            self.len += 1;
        }

        trace!(created, replaced = previous.is_some(), "added key chain");

        previous
    }
}

impl<K, V, S> KeyChainTree<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Removes all routing nodes that do not lead to any value.
    ///
    /// [`remove`](Self::remove) never prunes the ancestors of what it
    /// detaches, so after removing many chains this frees the nodes that
    /// were left behind.
    pub fn compact(&mut self) {
        let before = self.root.descendant_count();
        self.root.compact();
        trace!(before, after = self.root.descendant_count(), "compacted key chain tree");
    }

    /// Returns a reference to the value stored at the end of `keys`.
    ///
    /// Yields `None` if some key of the chain is missing, or if the chain
    /// ends at a routing node without a value of its own.
    pub fn try_get<'q, Q, I>(&self, keys: I) -> Result<Option<&V>>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
    {
        let mut keys = keys.into_iter().peekable();

        if keys.peek().is_none() {
            return Err(Error::empty_key_chain());
        }

        Ok(self.root.search(keys).and_then(|node| node.value.as_ref()))
    }

    /// Returns a mutable reference to the value stored at the end of `keys`.
    pub fn try_get_mut<'q, Q, I>(&mut self, keys: I) -> Result<Option<&mut V>>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
    {
        let mut keys = keys.into_iter().peekable();

        if keys.peek().is_none() {
            return Err(Error::empty_key_chain());
        }

        Ok(self.root.search_mut(keys).and_then(|node| node.value.as_mut()))
    }

    /// Returns `true` if a value is stored at the end of `keys`.
    pub fn contains<'q, Q, I>(&self, keys: I) -> Result<bool>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
    {
        self.try_get(keys).map(|value| value.is_some())
    }

    /// Returns a reference to the value stored under a single key.
    pub fn try_get_one<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.root.child(key).and_then(|node| node.value.as_ref())
    }

    /// Removes the node at the end of `keys` along with everything below it.
    ///
    /// Any longer chain that starts with `keys` is removed as well. Returns
    /// the value stored at exactly `keys`, if there was one. A chain whose
    /// nodes do not exist is left alone. Ancestors that end up without
    /// children or value are kept; see [`compact`](Self::compact).
    pub fn remove<'q, Q, I>(&mut self, keys: I) -> Result<Option<V>>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
    {
        let mut keys = keys.into_iter();
        let Some(mut key) = keys.next() else {
            return Err(Error::empty_key_chain());
        };

        // walk to the parent of the last key
        let mut parent = &mut self.root;

        for next in keys {
            parent = match parent.child_mut(key) {
                Some(child) => child,
                None => return Ok(None),
            };
            key = next;
        }

        let Some(detached) = parent.detach(key) else {
            return Ok(None);
        };

        Ok(self.release(detached))
    }

    /// Removes the node under a single key along with everything below it.
    pub fn remove_one<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let detached = self.root.detach(key)?;
        self.release(detached)
    }
}

impl<K, V, S> KeyValueManager<K, V> for KeyChainTree<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    fn try_get(&self, key: &K) -> Option<&V> {
        self.try_get_one(key)
    }

    fn add(&mut self, key: K, value: V) -> Option<V> {
        self.add_one(key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_one(key)
    }

    fn clear(&mut self) {
        KeyChainTree::clear(self);
    }
}
