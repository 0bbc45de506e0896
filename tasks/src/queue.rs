//! Priority-ordered work queue.
//!
//! Dequeue order is by priority (urgent first) with FIFO ties via a
//! monotonic insertion sequence. Priority orders selection only; it never
//! preempts a running task.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use uuid::Uuid;

use crate::error::Result;
use crate::task::{Task, TaskStatus};

#[derive(Debug)]
struct QueueEntry {
    task: Task,
    seq: u64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.task.priority == other.task.priority && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: higher priority first, then earlier insertion.
        self.task
            .priority
            .cmp(&other.task.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A queue of tasks awaiting a worker.
#[derive(Debug, Default)]
pub struct TaskQueue {
    entries: BinaryHeap<QueueEntry>,
    next_seq: u64,
}

impl TaskQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a pending task into the queue, transitioning it to `queued`.
    pub fn enqueue(&mut self, mut task: Task) -> Result<Uuid> {
        task.transition(TaskStatus::Queued)?;
        let id = task.id;
        self.entries.push(QueueEntry {
            task,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        Ok(id)
    }

    /// Remove and return the next task to run: highest priority first,
    /// FIFO within equal priority. The task remains `queued`; the worker
    /// that picks it up transitions it to `running`.
    pub fn dequeue(&mut self) -> Option<Task> {
        self.entries.pop().map(|entry| entry.task)
    }

    /// Cancel a queued task, removing it from consideration with no other
    /// side effects. Returns the cancelled task, or `None` if the id is
    /// not queued.
    pub fn cancel(&mut self, id: Uuid) -> Option<Task> {
        let mut cancelled = None;
        let entries = std::mem::take(&mut self.entries);
        for mut entry in entries {
            if entry.task.id == id && cancelled.is_none() {
                // queued -> cancelled is always legal.
                if entry.task.transition(TaskStatus::Cancelled).is_ok() {
                    cancelled = Some(entry.task);
                    continue;
                }
            }
            self.entries.push(entry);
        }
        cancelled
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
