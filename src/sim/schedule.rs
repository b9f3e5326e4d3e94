//! Deferred actions driven by the frame tick
//!
//! Nothing here blocks: a task counts down as `advance(dt)` is called and is
//! handed back once due. Each task holds a cancellation token; a cancelled
//! task is silently dropped the next time the scheduler advances.

use std::cell::Cell;
use std::rc::Rc;

/// Shared cancellation flag
///
/// Clones observe the same flag. Child tokens are cancelled when either
/// they or their parent are cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Rc<Cell<bool>>,
    parent: Option<Rc<Cell<bool>>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that is also cancelled by this one
    pub fn child(&self) -> Self {
        Self {
            flag: Rc::new(Cell::new(false)),
            parent: Some(Rc::clone(&self.flag)),
        }
    }

    pub fn cancel(&self) {
        self.flag.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.get() || self.parent.as_ref().is_some_and(|p| p.get())
    }
}

/// A pending action
#[derive(Debug)]
pub struct ScheduledTask<A> {
    pub action: A,
    /// Seconds until due
    pub remaining: f32,
    token: CancelToken,
}

/// Single-threaded task queue
#[derive(Debug)]
pub struct Scheduler<A> {
    tasks: Vec<ScheduledTask<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to run after `delay` seconds under `token`
    pub fn schedule(&mut self, action: A, delay: f32, token: CancelToken) {
        self.tasks.push(ScheduledTask {
            action,
            remaining: delay.max(0.0),
            token,
        });
    }

    /// Advance time and return due actions in scheduling order
    pub fn advance(&mut self, dt: f32) -> Vec<A> {
        self.tasks.retain(|task| !task.token.is_cancelled());
        for task in &mut self.tasks {
            task.remaining -= dt;
        }

        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.tasks.len());
        for task in self.tasks.drain(..) {
            if task.remaining <= 0.0 {
                due.push(task.action);
            } else {
                pending.push(task);
            }
        }
        self.tasks = pending;
        due
    }

    /// Cancel and drop everything queued
    pub fn cancel_all(&mut self) {
        for task in &self.tasks {
            task.token.cancel();
        }
        self.tasks.clear();
    }

    /// Number of live (not cancelled) tasks
    pub fn pending(&self) -> usize {
        self.tasks
            .iter()
            .filter(|task| !task.token.is_cancelled())
            .count()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }
}
