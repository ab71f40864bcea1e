//! Iterable priority queue keyed priority → key → value.
//!
//! There is exactly one bucket (node) per distinct priority. A bucket holds an
//! insertion-ordered map of keys to values; a key appears at most once per bucket but
//! may appear in many buckets. Buckets live in a binary min-heap and are dropped as
//! soon as they become empty.

use std::hash::Hash;

use hashbrown::{HashMap, HashSet};
use indexmap::IndexMap;

pub type Priority = i32;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct NodeId(u64);

#[derive(Clone, Debug)]
struct Node<K, V> {
    priority: Priority,
    entries: IndexMap<K, V>,
}

#[derive(Clone, Debug)]
pub struct PriorityQueue<K, V>
where
    K: Hash + Eq,
{
    // Heap of node ids, root at index 0.
    heap: Vec<NodeId>,
    nodes: HashMap<NodeId, Node<K, V>>,
    by_priority: HashMap<Priority, NodeId>,
    // Every node that currently holds the key.
    by_key: HashMap<K, HashSet<NodeId>>,
    next_node: u64,
}

impl<K, V> Default for PriorityQueue<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self {
            heap: Vec::new(),
            nodes: HashMap::new(),
            by_priority: HashMap::new(),
            by_key: HashMap::new(),
            next_node: 0,
        }
    }
}

impl<K, V> PriorityQueue<K, V>
where
    K: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of key/value entries across all buckets.
    pub fn len(&self) -> usize {
        self.nodes.values().map(|n| n.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of live priority buckets.
    pub fn bucket_count(&self) -> usize {
        self.heap.len()
    }

    /// Lowest priority currently queued.
    pub fn peek_priority(&self) -> Option<Priority> {
        self.heap.first().map(|id| self.nodes[id].priority)
    }

    pub fn has(&self, priority: Priority, key: &K) -> bool {
        self.bucket(priority)
            .is_some_and(|node| node.entries.contains_key(key))
    }

    pub fn get(&self, priority: Priority, key: &K) -> Option<&V> {
        self.bucket(priority).and_then(|node| node.entries.get(key))
    }

    pub fn get_mut(&mut self, priority: Priority, key: &K) -> Option<&mut V> {
        let id = *self.by_priority.get(&priority)?;
        self.nodes.get_mut(&id)?.entries.get_mut(key)
    }

    /// Upsert `key` in the bucket for `priority`. An existing value is replaced in place
    /// (its insertion slot is kept) and returned.
    pub fn push(&mut self, priority: Priority, key: K, value: V) -> Option<V> {
        let id = match self.by_priority.get(&priority) {
            Some(&id) => id,
            None => self.insert_node(priority),
        };
        self.by_key.entry(key.clone()).or_default().insert(id);
        self.nodes
            .get_mut(&id)
            .and_then(|node| node.entries.insert(key, value))
    }

    /// Remove the oldest entry of the lowest-priority bucket.
    pub fn pop(&mut self) -> Option<(K, V)> {
        let id = *self.heap.first()?;
        let node = self.nodes.get_mut(&id)?;
        let popped = node.entries.shift_remove_index(0);
        let now_empty = node.entries.is_empty();

        if let Some((key, _)) = &popped {
            self.forget_key_in(key, id);
        }
        if now_empty {
            self.detach_node(id);
        }
        popped
    }

    /// Delete `key` from every bucket holding it. Returns false if the key was absent.
    pub fn remove_key(&mut self, key: &K) -> bool {
        let Some(ids) = self.by_key.remove(key) else {
            return false;
        };
        for id in ids {
            let empty = match self.nodes.get_mut(&id) {
                Some(node) => {
                    node.entries.shift_remove(key);
                    node.entries.is_empty()
                }
                None => false,
            };
            if empty {
                self.detach_node(id);
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.nodes.clear();
        self.by_priority.clear();
        self.by_key.clear();
    }

    fn bucket(&self, priority: Priority) -> Option<&Node<K, V>> {
        self.by_priority
            .get(&priority)
            .and_then(|id| self.nodes.get(id))
    }

    fn insert_node(&mut self, priority: Priority) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node = self.next_node.wrapping_add(1);
        self.nodes.insert(
            id,
            Node {
                priority,
                entries: IndexMap::new(),
            },
        );
        self.by_priority.insert(priority, id);
        self.heap.push(id);
        self.sift_up(self.heap.len() - 1);
        id
    }

    fn forget_key_in(&mut self, key: &K, id: NodeId) {
        if let Some(ids) = self.by_key.get_mut(key) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_key.remove(key);
            }
        }
    }

    fn detach_node(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            self.by_priority.remove(&node.priority);
        }
        if let Some(idx) = self.heap.iter().position(|&h| h == id) {
            self.heap.swap_remove(idx);
            if idx < self.heap.len() {
                self.sift_down(idx);
                self.sift_up(idx);
            }
        }
    }

    fn priority_at(&self, idx: usize) -> Priority {
        self.nodes[&self.heap[idx]].priority
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.priority_at(idx) >= self.priority_at(parent) {
                break;
            }
            self.heap.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;
            if left < len && self.priority_at(left) < self.priority_at(smallest) {
                smallest = left;
            }
            if right < len && self.priority_at(right) < self.priority_at(smallest) {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.heap.swap(idx, smallest);
            idx = smallest;
        }
    }
}

impl<K, V> PriorityQueue<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Snapshot iteration in priority-then-insertion order. The live queue is never
    /// touched, so it may be mutated while the iterator is alive.
    pub fn iter(&self) -> IntoIter<K, V> {
        self.clone().into_iter()
    }
}

/// Draining iterator; yields entries in the same order as repeated [`PriorityQueue::pop`].
pub struct IntoIter<K, V>
where
    K: Hash + Eq,
{
    queue: PriorityQueue<K, V>,
}

impl<K, V> Iterator for IntoIter<K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.queue.len();
        (n, Some(n))
    }
}

impl<K, V> IntoIterator for PriorityQueue<K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { queue: self }
    }
}

impl<K, V> IntoIterator for &PriorityQueue<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
