use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Handle for a repeating timer. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Source of repeating ticks for autoplay.
pub trait Scheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

/// The timer the engine is currently listening to. Exists only while playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayState {
    pub timer: TimerId,
    pub interval: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    interval: Duration,
    next_due: Instant,
}

/// Poll-driven scheduler. The host loop calls [`IntervalScheduler::due`]
/// and forwards each returned id to the engine.
#[derive(Debug)]
pub struct IntervalScheduler {
    entries: BTreeMap<TimerId, Entry>,
    next_id: u64,
    clock: fn() -> Instant,
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::with_clock(Instant::now)
    }

    /// Use `clock` as the start time of newly scheduled timers.
    pub fn with_clock(clock: fn() -> Instant) -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
            clock,
        }
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn active_count(&self) -> usize {
        self.entries.len()
    }

    /// Earliest pending deadline, for hosts that sleep between polls.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.values().map(|e| e.next_due).min()
    }

    /// Timers whose deadline has passed at `now`, in deadline order.
    ///
    /// Each timer fires at most once per poll and its next deadline restarts
    /// from `now`, so a stalled host never replays the intervals it missed.
    pub fn due(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired: Vec<(Instant, TimerId)> = Vec::new();
        for (id, entry) in self.entries.iter_mut() {
            if entry.next_due <= now {
                fired.push((entry.next_due, *id));
                entry.next_due = now + entry.interval.max(Duration::from_nanos(1));
            }
        }
        fired.sort();
        fired.into_iter().map(|(_, id)| id).collect()
    }
}

impl Scheduler for IntervalScheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let start = (self.clock)();
        self.entries.insert(
            id,
            Entry {
                interval,
                next_due: start + interval,
            },
        );
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.entries.remove(&id);
    }
}
