use std::collections::VecDeque;

/// Fixed-capacity FIFO. Pushing past `max` drops the oldest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuffer<T> {
    max: usize,
    buf: VecDeque<T>,
}

impl<T> RingBuffer<T> {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            buf: VecDeque::with_capacity(max),
        }
    }

    /// Appends `item`, returning the entry evicted to make room (if any).
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.max == 0 {
            return Some(item);
        }
        let evicted = if self.buf.len() == self.max {
            self.buf.pop_front()
        } else {
            None
        };
        self.buf.push_back(item);
        evicted
    }

    /// Newest first.
    pub fn recent(&self, n: usize) -> Vec<&T> {
        self.buf.iter().rev().take(n).collect()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.buf.iter()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
