use std::time::Instant;

use crate::calc::gesture::{Effect, TimerKind};

/// Deadlines for the gesture timers, driven by whatever clock the caller passes in.
/// At most one deadline per kind exists at a time.
#[derive(Debug, Default, Clone)]
pub struct Timers {
    pending: Vec<(TimerKind, Instant)>,
}

impl Timers {
    /// Applies a timer effect. Non-timer effects are ignored.
    pub fn apply(&mut self, effect: &Effect, now: Instant) {
        match *effect {
            Effect::StartTimer(kind, after) => {
                self.cancel(kind);
                self.pending.push((kind, now + after));
            }
            Effect::CancelTimer(kind) => self.cancel(kind),
            Effect::Toggle(_) | Effect::SetPresence(..) => {}
        }
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.pending.retain(|(k, _)| *k != kind);
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns every timer whose deadline is at or before `now`,
    /// earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerKind> {
        let mut due: Vec<(TimerKind, Instant)> = Vec::new();
        self.pending.retain(|&(kind, deadline)| {
            if deadline <= now {
                due.push((kind, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(_, deadline)| deadline);
        due.into_iter().map(|(kind, _)| kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_start_then_due_after_deadline() {
        let t0 = Instant::now();
        let mut timers = Timers::default();
        timers.apply(&Effect::StartTimer(TimerKind::LongPress, ms(500)), t0);
        assert!(timers.take_due(t0 + ms(499)).is_empty());
        assert_eq!(timers.take_due(t0 + ms(500)), vec![TimerKind::LongPress]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_restart_replaces_existing_deadline() {
        let t0 = Instant::now();
        let mut timers = Timers::default();
        timers.apply(&Effect::StartTimer(TimerKind::LongPress, ms(500)), t0);
        timers.apply(&Effect::StartTimer(TimerKind::LongPress, ms(500)), t0 + ms(300));
        assert!(timers.take_due(t0 + ms(600)).is_empty());
        assert_eq!(timers.take_due(t0 + ms(800)), vec![TimerKind::LongPress]);
    }

    #[test]
    fn test_cancel_removes_only_that_kind() {
        let t0 = Instant::now();
        let mut timers = Timers::default();
        timers.apply(&Effect::StartTimer(TimerKind::LongPress, ms(500)), t0);
        timers.apply(&Effect::StartTimer(TimerKind::ReleaseGrace, ms(50)), t0);
        timers.apply(&Effect::CancelTimer(TimerKind::LongPress), t0);
        assert_eq!(timers.take_due(t0 + ms(1000)), vec![TimerKind::ReleaseGrace]);
    }

    #[test]
    fn test_due_timers_come_out_earliest_first() {
        let t0 = Instant::now();
        let mut timers = Timers::default();
        timers.apply(&Effect::StartTimer(TimerKind::LongPress, ms(500)), t0);
        timers.apply(&Effect::StartTimer(TimerKind::ReleaseGrace, ms(50)), t0);
        assert_eq!(
            timers.take_due(t0 + ms(1000)),
            vec![TimerKind::ReleaseGrace, TimerKind::LongPress]
        );
    }

    #[test]
    fn test_cancel_all() {
        let t0 = Instant::now();
        let mut timers = Timers::default();
        timers.apply(&Effect::StartTimer(TimerKind::LongPress, ms(500)), t0);
        timers.apply(&Effect::StartTimer(TimerKind::ReleaseGrace, ms(50)), t0);
        timers.cancel_all();
        assert!(timers.take_due(t0 + ms(1000)).is_empty());
    }
}
