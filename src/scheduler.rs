//! Run-on-next-tick task queue.
//!
//! Work that must not run inside the caller's stack (for example a screen
//! load requested from the inactivity check) is posted here and executed
//! at the start of the following [`tick`](crate::HomeWind::tick). Tasks
//! posted while the queue is being drained wait for the next tick too.

use heapless::Deque;

use crate::config::TASK_QUEUE_DEPTH;

/// Deferred work items.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Deferred {
    EnterSoftPowersave,
}

/// Bounded FIFO of deferred tasks.
#[derive(Debug)]
pub struct TaskQueue {
    queue: Deque<Deferred, TASK_QUEUE_DEPTH>,
}

impl TaskQueue {
    pub const fn new() -> Self {
        Self { queue: Deque::new() }
    }

    /// Queue `task` for the next tick. Returns `false` if the queue is full.
    pub fn post(&mut self, task: Deferred) -> bool {
        self.queue.push_back(task).is_ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Remove the oldest task.
    pub fn pop(&mut self) -> Option<Deferred> {
        self.queue.pop_front()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo() {
        let mut q = TaskQueue::new();
        assert!(q.is_empty());
        assert!(q.post(Deferred::EnterSoftPowersave));
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop(), Some(Deferred::EnterSoftPowersave));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_full_queue_rejects() {
        let mut q = TaskQueue::new();
        for _ in 0..TASK_QUEUE_DEPTH {
            assert!(q.post(Deferred::EnterSoftPowersave));
        }
        assert!(!q.post(Deferred::EnterSoftPowersave));
    }
}
