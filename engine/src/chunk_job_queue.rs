use std::{collections::VecDeque, hash::Hash};

use ahash::AHashSet;

/// FIFO of pending jobs with set semantics: a key is queued at most once.
pub struct ChunkJobQueue<K, V = K> {
    jobs: VecDeque<(K, V)>,
    queued: AHashSet<K>,
}

impl<K, V> Default for ChunkJobQueue<K, V>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ChunkJobQueue<K, V>
where
    K: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        ChunkJobQueue {
            jobs: VecDeque::new(),
            queued: AHashSet::new(),
        }
    }

    /// Appends a job unless one with the same key is already queued.
    /// Returns whether the job was added.
    pub fn push(&mut self, key: K, job: V) -> bool {
        if !self.queued.insert(key) {
            return false;
        }

        self.jobs.push_back((key, job));
        true
    }

    pub fn pop(&mut self) -> Option<(K, V)> {
        let (key, job) = self.jobs.pop_front()?;
        self.queued.remove(&key);
        Some((key, job))
    }

    pub fn contains(&self, key: K) -> bool {
        self.queued.contains(&key)
    }

    pub fn any(&self, mut predicate: impl FnMut(&K, &V) -> bool) -> bool {
        self.jobs.iter().any(|(key, job)| predicate(key, job))
    }

    /// Drops every queued job matching the predicate and returns how many were removed.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&K, &V) -> bool) -> usize {
        let before = self.jobs.len();
        let queued = &mut self.queued;
        self.jobs.retain(|(key, job)| {
            let remove = predicate(key, job);
            if remove {
                queued.remove(key);
            }
            !remove
        });
        before - self.jobs.len()
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.jobs.len();
        self.jobs.clear();
        self.queued.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = ChunkJobQueue::<u32>::new();
        for key in [3, 1, 2] {
            assert!(queue.push(key, key));
        }

        assert_eq!(queue.pop(), Some((3, 3)));
        assert_eq!(queue.pop(), Some((1, 1)));
        assert_eq!(queue.pop(), Some((2, 2)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_deduplication() {
        let mut queue = ChunkJobQueue::<u32, &str>::new();

        assert!(queue.push(1, "first"));
        assert!(!queue.push(1, "second"));
        assert_eq!(queue.len(), 1);
        assert!(queue.contains(1));

        assert_eq!(queue.pop(), Some((1, "first")));
        assert!(!queue.contains(1));

        // Can be queued again once it has left the queue
        assert!(queue.push(1, "third"));
    }

    #[test]
    fn test_remove_where() {
        let mut queue = ChunkJobQueue::<u32>::new();
        for key in 0..6 {
            queue.push(key, key);
        }

        assert!(queue.any(|_, job| *job == 4));
        assert_eq!(queue.remove_where(|key, _| key % 2 == 0), 3);
        assert!(!queue.any(|_, job| *job == 4));
        assert_eq!(queue.len(), 3);
        assert!(!queue.contains(2));
        assert!(queue.contains(3));
        assert_eq!(queue.pop(), Some((1, 1)));

        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
        assert!(!queue.contains(5));
    }
}
