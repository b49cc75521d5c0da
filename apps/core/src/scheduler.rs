//! Coalescing of store mutations into one deferred rebuild per tick.
//!
//! The host drives the tick: it calls the engine's `flush` once the current
//! synchronous turn is over (its microtask checkpoint). A host that never
//! flushes leaves `pending` raised; reads that need fresh indexes still rebuild
//! inline, so only the flag is affected.

use crate::observable::{Observable, SubscriptionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tick {
    Idle,
    Scheduled,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct TickTicket {
    generation: u64,
}

#[derive(Debug)]
pub struct RebuildScheduler {
    pending: Observable<bool>,
    tick: Tick,
    generation: u64,
    completed: u64,
}

impl Default for RebuildScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RebuildScheduler {
    pub fn new() -> Self {
        Self::with_pending(Observable::new(false))
    }

    pub fn with_pending(pending: Observable<bool>) -> Self {
        Self {
            pending,
            tick: Tick::Idle,
            generation: 0,
            completed: 0,
        }
    }

    /// Raises `pending` immediately. Returns `true` when this mark scheduled a
    /// new tick, `false` when it joined one that is already queued.
    pub fn mark(&mut self) -> bool {
        self.generation += 1;
        self.pending.set(true);
        match self.tick {
            Tick::Idle => {
                self.tick = Tick::Scheduled;
                true
            }
            Tick::Scheduled => false,
            Tick::Running => {
                self.tick = Tick::Scheduled;
                true
            }
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.tick == Tick::Scheduled
    }

    pub fn begin(&mut self) -> Option<TickTicket> {
        if self.tick != Tick::Scheduled {
            return None;
        }
        self.tick = Tick::Running;
        Some(TickTicket {
            generation: self.generation,
        })
    }

    pub fn finish(&mut self, ticket: TickTicket) {
        self.completed += 1;
        // A mark during the rebuild keeps the follow-up tick scheduled.
        if self.tick == Tick::Running && ticket.generation == self.generation {
            self.tick = Tick::Idle;
            self.pending.set(false);
        }
    }

    pub fn pending(&self) -> bool {
        *self.pending.get()
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&bool) + 'static,
    {
        self.pending.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.pending.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::RebuildScheduler;

    #[test]
    fn burst_of_marks_schedules_one_tick() {
        let mut scheduler = RebuildScheduler::new();
        assert!(scheduler.mark());
        assert!(!scheduler.mark());
        assert!(!scheduler.mark());
        assert!(scheduler.pending());

        let ticket = scheduler.begin().unwrap();
        assert!(scheduler.begin().is_none());
        scheduler.finish(ticket);

        assert!(!scheduler.pending());
        assert_eq!(scheduler.completed(), 1);
        assert!(scheduler.begin().is_none());
    }

    #[test]
    fn mark_during_rebuild_schedules_follow_up() {
        let mut scheduler = RebuildScheduler::new();
        scheduler.mark();
        let ticket = scheduler.begin().unwrap();

        assert!(scheduler.mark());
        scheduler.finish(ticket);

        assert!(scheduler.pending());
        assert!(scheduler.is_scheduled());

        let follow_up = scheduler.begin().unwrap();
        scheduler.finish(follow_up);
        assert!(!scheduler.pending());
        assert_eq!(scheduler.completed(), 2);
    }

    #[test]
    fn idle_scheduler_has_nothing_to_run() {
        let mut scheduler = RebuildScheduler::new();
        assert!(!scheduler.pending());
        assert!(scheduler.begin().is_none());
        assert_eq!(scheduler.completed(), 0);
    }
}
