//! Timed actions keyed by the logical simulation clock.

use std::time::Duration;

/// Ordered collection of actions waiting for the simulation clock to reach
/// their due time.
#[derive(Debug)]
pub(crate) struct Schedule<A> {
    now: Duration,
    next_sequence: u64,
    entries: Vec<ScheduledEntry<A>>,
}

#[derive(Debug)]
struct ScheduledEntry<A> {
    due: Duration,
    sequence: u64,
    action: A,
}

impl<A> Schedule<A> {
    /// Creates an empty schedule with the clock at zero.
    pub(crate) fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_sequence: 0,
            entries: Vec::new(),
        }
    }

    /// Current value of the simulation clock.
    pub(crate) fn now(&self) -> Duration {
        self.now
    }

    /// Queues an action to fire once `delay` elapsed from the current clock.
    pub(crate) fn schedule_after(&mut self, delay: Duration, action: A) {
        let due = self.now.saturating_add(delay);
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.entries.push(ScheduledEntry {
            due,
            sequence,
            action,
        });
    }

    /// Removes the earliest action due no later than `until`.
    ///
    /// Actions sharing a due time fire in insertion order. The clock moves to
    /// the due time of the returned action so follow-up actions scheduled
    /// while handling it are measured from the right instant.
    pub(crate) fn pop_due(&mut self, until: Duration) -> Option<A> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= until)
            .min_by_key(|(_, entry)| (entry.due, entry.sequence))
            .map(|(index, _)| index)?;

        let entry = self.entries.swap_remove(index);
        self.now = self.now.max(entry.due);
        Some(entry.action)
    }

    /// Moves the clock forward without firing anything.
    pub(crate) fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Drops every pending action.
    pub(crate) fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Number of pending actions.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_fire_in_due_then_insertion_order() {
        let mut schedule = Schedule::new();
        schedule.schedule_after(Duration::from_millis(300), "late");
        schedule.schedule_after(Duration::from_millis(100), "first");
        schedule.schedule_after(Duration::from_millis(100), "second");

        let until = Duration::from_millis(500);
        let mut fired = Vec::new();
        while let Some(action) = schedule.pop_due(until) {
            fired.push(action);
        }

        assert_eq!(fired, vec!["first", "second", "late"]);
        assert_eq!(schedule.now(), Duration::from_millis(300));
    }

    #[test]
    fn actions_wait_for_their_due_time() {
        let mut schedule = Schedule::new();
        schedule.schedule_after(Duration::from_millis(250), 1_u8);

        assert_eq!(schedule.pop_due(Duration::from_millis(249)), None);
        schedule.advance_to(Duration::from_millis(249));
        assert_eq!(schedule.pop_due(Duration::from_millis(250)), Some(1));
    }

    #[test]
    fn follow_up_actions_are_measured_from_the_firing_instant() {
        let mut schedule = Schedule::new();
        schedule.schedule_after(Duration::from_millis(100), 0_u32);

        let until = Duration::from_millis(350);
        let mut fired = Vec::new();
        while let Some(count) = schedule.pop_due(until) {
            fired.push((count, schedule.now()));
            schedule.schedule_after(Duration::from_millis(100), count + 1);
        }

        assert_eq!(
            fired,
            vec![
                (0, Duration::from_millis(100)),
                (1, Duration::from_millis(200)),
                (2, Duration::from_millis(300)),
            ]
        );
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn cancel_all_drops_pending_actions() {
        let mut schedule = Schedule::new();
        schedule.schedule_after(Duration::from_secs(1), ());
        schedule.schedule_after(Duration::from_secs(2), ());

        schedule.cancel_all();

        assert_eq!(schedule.len(), 0);
        assert_eq!(schedule.pop_due(Duration::from_secs(10)), None);
    }
}
