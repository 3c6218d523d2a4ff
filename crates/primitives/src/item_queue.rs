use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;
use std::str::FromStr;

use btcore_variant::Variant;
use thiserror::Error;

/// Errors from [`ItemQueue::to_file`]/[`ItemQueue::from_file`].
#[derive(Error, Debug)]
pub enum ItemQueueError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: std::io::Error },
    #[error("{path} does not hold a JSON array of strings")]
    MalformedFile { path: String },
    #[error("entry {entry:?} in {path} does not parse as a key")]
    UnparsableEntry { path: String, entry: String },
}

/// An ordered sequence of unique keys whose positions can be read and
/// rearranged, backed by an auxiliary index for `O(1)` lookups.
#[derive(Clone, Debug, Default)]
pub struct ItemQueue<K> {
    order: Vec<K>,
    positions: HashMap<K, usize>,
}

impl<K> ItemQueue<K>
where
    K: Clone + Eq + Hash,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            positions: HashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    #[must_use]
    pub fn get_pos(&self, key: &K) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Moves `key` to `pos` (clamped to the queue's length), inserting it if
    /// absent.
    pub fn set(&mut self, key: K, pos: usize) {
        if self.positions.contains_key(&key) {
            self.remove_from_order(&key);
        }
        let pos = pos.min(self.order.len());
        self.order.insert(pos, key.clone());
        self.reindex_from(pos);
    }

    /// Removes `key`, if present.
    pub fn erase(&mut self, key: &K) {
        if self.positions.contains_key(key) {
            self.remove_from_order(key);
        }
    }

    /// Removes and returns the front of the queue.
    pub fn pop(&mut self) -> Option<K> {
        if self.order.is_empty() {
            return None;
        }
        let key = self.order.remove(0);
        self.positions.remove(&key);
        self.reindex_from(0);
        Some(key)
    }

    fn remove_from_order(&mut self, key: &K) {
        if let Some(pos) = self.positions.remove(key) {
            self.order.remove(pos);
            self.reindex_from(pos);
        }
    }

    fn reindex_from(&mut self, from: usize) {
        for (i, k) in self.order.iter().enumerate().skip(from) {
            self.positions.insert(k.clone(), i);
        }
    }

    fn present_in_order_given(&self, keys: &[K]) -> Vec<K> {
        keys.iter().filter(|k| self.positions.contains_key(k)).cloned().collect()
    }

    /// Moves every key in `keys` that's present in the queue to the front,
    /// in the relative order they appear in `keys`. Unknown keys are
    /// ignored.
    pub fn move_top(&mut self, keys: &[K]) {
        let moving = self.present_in_order_given(keys);
        if moving.is_empty() {
            return;
        }
        let moving_set: std::collections::HashSet<&K> = moving.iter().collect();
        let mut rest: Vec<K> = self.order.iter().filter(|k| !moving_set.contains(k)).cloned().collect();
        let mut new_order = moving;
        new_order.append(&mut rest);
        self.rebuild(new_order);
    }

    /// Moves every key in `keys` that's present in the queue to the back,
    /// in the relative order they appear in `keys`. Unknown keys are
    /// ignored.
    pub fn move_bottom(&mut self, keys: &[K]) {
        let moving = self.present_in_order_given(keys);
        if moving.is_empty() {
            return;
        }
        let moving_set: std::collections::HashSet<&K> = moving.iter().collect();
        let mut new_order: Vec<K> = self.order.iter().filter(|k| !moving_set.contains(k)).cloned().collect();
        new_order.extend(moving);
        self.rebuild(new_order);
    }

    /// Moves each key in `keys` up one position, processed in ascending
    /// order of current position so two adjacent selected keys don't
    /// collide. Unknown keys are ignored.
    pub fn move_up(&mut self, keys: &[K]) {
        let mut positions: Vec<usize> = keys.iter().filter_map(|k| self.positions.get(k).copied()).collect();
        positions.sort_unstable();
        for pos in positions {
            if pos > 0 {
                self.order.swap(pos, pos - 1);
            }
        }
        self.reindex_from(0);
    }

    /// Moves each key in `keys` down one position, processed in descending
    /// order of current position so two adjacent selected keys don't
    /// collide. Unknown keys are ignored.
    pub fn move_down(&mut self, keys: &[K]) {
        let mut positions: Vec<usize> = keys.iter().filter_map(|k| self.positions.get(k).copied()).collect();
        positions.sort_unstable_by(|a, b| b.cmp(a));
        let last = self.order.len().saturating_sub(1);
        for pos in positions {
            if pos < last {
                self.order.swap(pos, pos + 1);
            }
        }
        self.reindex_from(0);
    }

    fn rebuild(&mut self, order: Vec<K>) {
        self.order = order;
        self.positions.clear();
        self.reindex_from(0);
    }
}

impl<K> ItemQueue<K>
where
    K: Clone + Eq + Hash + ToString + FromStr,
{
    /// Writes the queue, in order, as a JSON array of stringified keys, to
    /// `<dir>/queue.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ItemQueueError::Write`] if the file can't be written.
    pub fn to_file(&self, dir: &Path) -> Result<(), ItemQueueError> {
        let path = dir.join("queue.json");
        let entries = self.order.iter().map(|k| Variant::raw_string(k.to_string().into_bytes())).collect();
        let json = btcore_json::pretty(&Variant::Vector(entries));
        std::fs::write(&path, json).map_err(|source| ItemQueueError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    /// Reads a queue previously written by [`Self::to_file`] from
    /// `<dir>/queue.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ItemQueueError::Read`] if the file can't be read,
    /// [`ItemQueueError::MalformedFile`] if it isn't a JSON array of
    /// strings, or [`ItemQueueError::UnparsableEntry`] if an entry doesn't
    /// parse as `K`.
    pub fn from_file(dir: &Path) -> Result<Self, ItemQueueError> {
        let path = dir.join("queue.json");
        let text = std::fs::read_to_string(&path).map_err(|source| ItemQueueError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let path_str = path.display().to_string();
        let decoded =
            btcore_json::decode(&text, btcore_json::ParseMode::Owned).map_err(|_| ItemQueueError::MalformedFile {
                path: path_str.clone(),
            })?;
        let entries = decoded.vector().ok_or_else(|| ItemQueueError::MalformedFile { path: path_str.clone() })?;

        let mut queue = Self::new();
        for (i, entry) in entries.iter().enumerate() {
            let s = entry.str().ok_or_else(|| ItemQueueError::MalformedFile { path: path_str.clone() })?;
            let key = K::from_str(s).map_err(|_| ItemQueueError::UnparsableEntry {
                path: path_str.clone(),
                entry: s.to_string(),
            })?;
            queue.set(key, i);
        }
        Ok(queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_appends_new_keys_in_requested_position() {
        let mut q: ItemQueue<u32> = ItemQueue::new();
        q.set(1, 0);
        q.set(2, 1);
        q.set(3, 0);
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![3, 1, 2]);
    }

    #[test]
    fn erase_and_pop() {
        let mut q: ItemQueue<u32> = ItemQueue::new();
        q.set(1, 0);
        q.set(2, 1);
        q.set(3, 2);
        q.erase(&2);
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.get_pos(&3), Some(0));
    }

    #[test]
    fn move_top_preserves_relative_order_of_input_and_ignores_unknown() {
        let mut q: ItemQueue<u32> = ItemQueue::new();
        for k in [1, 2, 3, 4] {
            q.set(k, k as usize - 1);
        }
        q.move_top(&[3, 99, 1]);
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![3, 1, 2, 4]);
    }

    #[test]
    fn move_bottom_preserves_relative_order_of_input() {
        let mut q: ItemQueue<u32> = ItemQueue::new();
        for k in [1, 2, 3, 4] {
            q.set(k, k as usize - 1);
        }
        q.move_bottom(&[1, 3]);
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![2, 4, 1, 3]);
    }

    #[test]
    fn move_up_shifts_each_selected_key_by_one() {
        let mut q: ItemQueue<u32> = ItemQueue::new();
        for k in [1, 2, 3] {
            q.set(k, k as usize - 1);
        }
        q.move_up(&[3]);
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![1, 3, 2]);
    }

    #[test]
    fn move_down_shifts_each_selected_key_by_one() {
        let mut q: ItemQueue<u32> = ItemQueue::new();
        for k in [1, 2, 3] {
            q.set(k, k as usize - 1);
        }
        q.move_down(&[1]);
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![2, 1, 3]);
    }

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut q: ItemQueue<u32> = ItemQueue::new();
        q.set(10, 0);
        q.set(20, 1);
        q.to_file(dir.path()).unwrap();

        let reloaded: ItemQueue<u32> = ItemQueue::from_file(dir.path()).unwrap();
        assert_eq!(reloaded.iter().copied().collect::<Vec<_>>(), vec![10, 20]);
    }
}
