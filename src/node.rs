//! A single branching level of a [`KeyChainTree`](crate::KeyChainTree).

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use std::collections::{hash_map, HashMap};


/// One level of the tree: the children keyed by the next key of a chain,
/// and the value of the chain ending here, if any.
///
/// Every node is owned by exactly one parent (or by the tree, for the root),
/// so dropping a node releases its whole subtree.
///
/// Chains can be arbitrarily long, so nothing that visits a whole subtree
/// recurses per level: counting, compaction, cloning and dropping all keep
/// their pending nodes on an explicit stack.
#[derive(Debug)]
pub(crate) struct Node<K, V, S> {
    pub(crate) value: Option<V>,
    children: HashMap<K, Node<K, V, S>, S>,
}

impl<K, V, S> Node<K, V, S> {
    pub(crate) fn with_hasher(hash_builder: S) -> Self {
        Node {
            value: None,
            children: HashMap::with_hasher(hash_builder),
        }
    }

    pub(crate) fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Drops all children, leaving this node's own value in place.
    pub(crate) fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Number of set value slots in this node and all of its descendants.
    pub(crate) fn value_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            count += usize::from(node.value.is_some());
            stack.extend(node.children.values());
        }

        count
    }

    /// Number of nodes strictly below this one.
    pub(crate) fn descendant_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&Self> = self.children.values().collect();

        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.values());
        }

        count
    }

    /// An empty node with the same value and hash builder.
    fn shallow_clone(&self) -> Self
    where
        V: Clone,
        S: Clone,
    {
        Node {
            value: self.value.clone(),
            children: HashMap::with_capacity_and_hasher(
                self.children.len(),
                self.children.hasher().clone(),
            ),
        }
    }
}

impl<K, V, S> Drop for Node<K, V, S> {
    fn drop(&mut self) {
        // a leaf needs no help; anything deeper is unlinked level by level
        if self.children.is_empty() {
            return;
        }

        let mut stack: Vec<Self> = self.children.drain().map(|(_key, child)| child).collect();

        while let Some(mut node) = stack.pop() {
            stack.extend(node.children.drain().map(|(_key, child)| child));
        }
    }
}

/// A node taken out of the tree during compaction, waiting for its
/// children to be compacted before it is put back (or discarded).
struct Compaction<K, V, S> {
    key: K,
    node: Node<K, V, S>,
    pending: Vec<(K, Node<K, V, S>)>,
}

/// A copy under construction, with the original's children still to visit.
struct Replica<'a, K, V, S> {
    key: K,
    node: Node<K, V, S>,
    children: hash_map::Iter<'a, K, Node<K, V, S>>,
}

impl<K, V, S> Clone for Node<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        let mut root = self.shallow_clone();
        let mut root_children = self.children.iter();
        let mut stack: Vec<Replica<'_, K, V, S>> = Vec::new();

        loop {
            let next = match stack.last_mut() {
                Some(frame) => frame.children.next(),
                None => root_children.next(),
            };

            if let Some((key, child)) = next {
                stack.push(Replica {
                    key: key.clone(),
                    node: child.shallow_clone(),
                    children: child.children.iter(),
                });
                continue;
            }

            let Some(Replica { key, node, .. }) = stack.pop() else {
                break;
            };

            match stack.last_mut() {
                Some(parent) => parent.node.children.insert(key, node),
                None => root.children.insert(key, node),
            };
        }

        root
    }
}

impl<K, V, S> Node<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    pub(crate) fn child<Q>(&self, key: &Q) -> Option<&Self>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.children.get(key)
    }

    pub(crate) fn child_mut<Q>(&mut self, key: &Q) -> Option<&mut Self>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.children.get_mut(key)
    }

    /// Removes the child under `key` from this node, together with its subtree.
    pub(crate) fn detach<Q>(&mut self, key: &Q) -> Option<Self>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.children.remove(key)
    }

    /// Follows a chain of borrowed keys starting at this node.
    pub(crate) fn search<'q, Q, I>(&self, keys: I) -> Option<&Self>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
    {
        keys.into_iter().try_fold(self, |node, key| node.child(key))
    }

    pub(crate) fn search_mut<'q, Q, I>(&mut self, keys: I) -> Option<&mut Self>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
    {
        keys.into_iter().try_fold(self, |node, key| node.child_mut(key))
    }

    /// Deletes descendants that neither hold a value nor lead to one.
    ///
    /// Children are moved out of their parents on the way down and put back
    /// on the way up, once it is known whether anything below them survived.
    pub(crate) fn compact(&mut self) {
        let mut root_pending: Vec<(K, Self)> = self.children.drain().collect();
        let mut stack: Vec<Compaction<K, V, S>> = Vec::new();

        loop {
            let next = match stack.last_mut() {
                Some(frame) => frame.pending.pop(),
                None => root_pending.pop(),
            };

            if let Some((key, mut node)) = next {
                let pending = node.children.drain().collect();
                stack.push(Compaction { key, node, pending });
                continue;
            }

            let Some(Compaction { key, node, .. }) = stack.pop() else {
                break;
            };

            if node.value.is_none() && !node.has_children() {
                continue;
            }

            match stack.last_mut() {
                Some(parent) => parent.node.children.insert(key, node),
                None => self.children.insert(key, node),
            };
        }
    }
}

impl<K, V, S> Node<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Returns the child under `key`, creating an empty one if it does not
    /// exist yet. The second element is `true` if a node was created.
    pub(crate) fn child_or_insert(&mut self, key: K) -> (&mut Self, bool) {
        let hash_builder = self.children.hasher().clone();
        let mut created = false;

        let child = self.children.entry(key).or_insert_with(|| {
            created = true;
            Node::with_hasher(hash_builder)
        });

        (child, created)
    }
}
