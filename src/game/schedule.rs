//! Deferred one-shot tasks on the control thread
//!
//! Delayed transitions ("next problem in 1.5s") are queued here and fired when
//! the owner advances the clock. Each task is stamped with the generation that
//! was current when it was scheduled; bumping the generation on restart turns
//! every outstanding task into a no-op.

/// A transition to run later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Replace the problem on the current planet
    NextProblem,
    /// Leave the current planet
    AdvanceStage,
    /// Show the arrival notification for a planet
    ShowStageFact { stage: usize },
    /// Hide the correct/incorrect overlay
    DismissFeedback,
    /// Hide the arrival notification
    DismissStageFact,
}

#[derive(Debug, Clone)]
struct Task {
    due_ms: u64,
    seq: u64,
    generation: u64,
    action: Deferred,
}

/// Generation-tagged timer queue
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    generation: u64,
    next_seq: u64,
    pending: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire `delay_ms` after `now_ms`
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, action: Deferred) {
        let task = Task {
            due_ms: now_ms.saturating_add(delay_ms),
            seq: self.next_seq,
            generation: self.generation,
            action,
        };
        self.next_seq += 1;

        // Keep sorted by (due, seq) so equal deadlines fire in scheduling order
        let pos = self
            .pending
            .iter()
            .position(|t| (t.due_ms, t.seq) > (task.due_ms, task.seq))
            .unwrap_or(self.pending.len());
        self.pending.insert(pos, task);
    }

    /// Make every outstanding task stale
    pub fn invalidate(&mut self) {
        self.generation += 1;
        log::debug!(
            "Scheduler generation {} ({} tasks superseded)",
            self.generation,
            self.pending.len()
        );
    }

    /// Pop the earliest task due at `now_ms`, skipping stale ones
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Deferred> {
        while self.pending.first().is_some_and(|t| t.due_ms <= now_ms) {
            let task = self.pending.remove(0);
            if task.generation == self.generation {
                return Some(task.action);
            }
            log::debug!("Dropping stale {:?} from generation {}", task.action, task.generation);
        }
        None
    }

    /// Live tasks still waiting
    pub fn pending(&self) -> usize {
        self.pending
            .iter()
            .filter(|t| t.generation == self.generation)
            .count()
    }

    /// Deadline of the next live task
    pub fn next_due(&self) -> Option<u64> {
        self.pending
            .iter()
            .find(|t| t.generation == self.generation)
            .map(|t| t.due_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut s = Scheduler::new();
        s.schedule(0, 3000, Deferred::NextProblem);
        s.schedule(0, 1500, Deferred::ShowStageFact { stage: 1 });
        s.schedule(0, 1500, Deferred::DismissFeedback);

        assert_eq!(s.pop_due(1000), None);
        assert_eq!(s.pop_due(1500), Some(Deferred::ShowStageFact { stage: 1 }));
        assert_eq!(s.pop_due(1500), Some(Deferred::DismissFeedback));
        assert_eq!(s.pop_due(2999), None);
        assert_eq!(s.next_due(), Some(3000));
        assert_eq!(s.pop_due(5000), Some(Deferred::NextProblem));
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_invalidate_drops_stale_tasks() {
        let mut s = Scheduler::new();
        s.schedule(0, 1500, Deferred::AdvanceStage);
        s.invalidate();
        s.schedule(100, 1500, Deferred::NextProblem);

        assert_eq!(s.pending(), 1);
        assert_eq!(s.next_due(), Some(1600));
        assert_eq!(s.pop_due(1500), None);
        assert_eq!(s.pop_due(1600), Some(Deferred::NextProblem));
    }
}
