//! Bounded entity pools
//!
//! Every live-entity collection in the simulation is a `BoundedPool`: inserting
//! past capacity evicts the oldest member instead of growing. `push_evicting`
//! narrows eviction to members the caller is willing to lose.

use std::collections::VecDeque;

/// FIFO-evicting collection with a hard capacity
#[derive(Debug, Clone)]
pub struct BoundedPool<T> {
    items: VecDeque<T>,
    capacity: usize,
    /// Members dropped by eviction since creation
    evicted: u64,
}

impl<T> BoundedPool<T> {
    /// Create an empty pool. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        }
    }

    /// Insert a member, returning the evicted oldest member if the pool was full
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() >= self.capacity {
            self.evicted += 1;
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    /// Insert a member, evicting the oldest member `evictable` accepts when full.
    /// If nothing may be evicted the new member is refused and handed back.
    pub fn push_evicting<F>(&mut self, item: T, evictable: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        if self.items.len() < self.capacity {
            self.items.push_back(item);
            return None;
        }
        let Some(victim) = self.items.iter().position(|member| evictable(member)) else {
            return Some(item);
        };
        self.evicted += 1;
        let evicted = self.items.remove(victim);
        self.items.push_back(item);
        evicted
    }

    /// Move the members out, leaving the pool empty with its capacity and counters
    pub fn detach(&mut self) -> VecDeque<T> {
        std::mem::take(&mut self.items)
    }

    /// Put detached members back ahead of anything inserted while they were out
    pub fn reattach(&mut self, mut items: VecDeque<T>) {
        items.append(&mut self.items);
        self.items = items;
        while self.items.len() > self.capacity {
            self.items.pop_front();
            self.evicted += 1;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots before the next insertion evicts
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.items.len()
    }

    pub fn evicted_total(&self) -> u64 {
        self.evicted
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    /// Single-pass sweep: `keep` may mutate each member and returns false to drop it.
    /// Oldest-first order is preserved.
    pub fn sweep<F>(&mut self, keep: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        self.items.retain_mut(keep);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a, T> IntoIterator for &'a BoundedPool<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
