// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use arrayvec::ArrayVec;

/// Maximum amount of events that can be pending at once.
const CAPACITY: usize = 16;
/// Point at which all times get rebased to avoid overflowing the timer.
const REBASE_AT: u32 = 0xF000_0000;

/// A scheduler used by the emulation cores to schedule peripherals.
/// It is generic over the possible events and keeps them in a list sorted
/// by execution time (soonest last), in combination with a circular u32 timer.
pub struct Scheduler<E: Kind> {
    /// Current time of the scheduler.
    time: u32,
    /// Time of the next event, `u32::MAX` if there is none.
    next: u32,
    /// Events currently awaiting execution.
    events: ArrayVec<ScheduledEvent<E>, CAPACITY>,
}

impl<E: Kind> Scheduler<E> {
    /// Schedule an event of the given kind after the given amount
    /// of cycles have elapsed from now.
    pub fn schedule(&mut self, kind: E, after: u32) {
        // We run this here since it is probably the least-run function.
        // We want to check the time as little as possible to save perf.
        self.check_time();

        let event = ScheduledEvent {
            kind,
            execute_at: self.time.saturating_add(after),
        };
        if self.events.try_push(event).is_err() {
            log::error!("Scheduler is full, dropping event scheduled in {after} cycles");
            return;
        }

        // Ensure the event list is still sorted
        // (Swap the new element further back until it is in the right spot)
        // Events due at the same time execute in the order they were scheduled.
        let mut idx = self.events.len() - 1;
        while idx > 0 && self.events[idx - 1].execute_at <= event.execute_at {
            self.events[idx] = self.events[idx - 1];
            idx -= 1;
        }
        self.events[idx] = event;
        self.update_next();
    }

    /// Advance the timer by the given amount of ticks.
    #[inline]
    pub fn advance(&mut self, by: u32) {
        self.time = self.time.saturating_add(by);
    }

    /// Take the next event that is due, if any.
    #[inline]
    pub fn get_next_pending(&mut self) -> Option<Event<E>> {
        if !self.has_events() {
            return None;
        }
        let event = self.events.pop()?;
        self.update_next();
        Some(Event {
            kind: event.kind,
            late_by: self.time - event.execute_at,
        })
    }

    /// Is any event due for execution?
    #[inline]
    pub fn has_events(&self) -> bool {
        self.next <= self.time
    }

    /// Return the next event immediately, and set the current time to
    /// the event's execution time. This is useful to skip idle time.
    /// Returns `None` if nothing is scheduled.
    pub fn pop(&mut self) -> Option<Event<E>> {
        let event = self.events.pop()?;
        self.time = self.time.max(event.execute_at);
        self.update_next();
        Some(Event {
            kind: event.kind,
            late_by: self.time - event.execute_at,
        })
    }

    /// Cancel all events of a given type.
    pub fn cancel(&mut self, evt: E) {
        self.events.retain(|e| e.kind != evt);
        self.update_next();
    }

    /// Is an event of the given kind awaiting execution?
    pub fn is_scheduled(&self, evt: E) -> bool {
        self.events.iter().any(|e| e.kind == evt)
    }

    /// Cycles left until the soonest event of the given kind executes.
    /// Zero if it is already due, `None` if it is not scheduled.
    pub fn remaining(&self, evt: E) -> Option<u32> {
        self.events
            .iter()
            .rev()
            .find(|e| e.kind == evt)
            .map(|e| e.execute_at.saturating_sub(self.time))
    }

    #[inline]
    pub fn now(&self) -> u32 {
        self.time
    }

    fn update_next(&mut self) {
        self.next = self.events.last().map_or(u32::MAX, |e| e.execute_at);
    }

    /// Checks to make sure the timer will not overflow by
    /// decrementing all times before that happens.
    #[inline]
    fn check_time(&mut self) {
        if self.time > REBASE_AT {
            self.time -= REBASE_AT;
            for event in &mut self.events {
                event.execute_at = event.execute_at.saturating_sub(REBASE_AT);
            }
            self.update_next();
        }
    }
}

impl<E: Kind> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            time: 0,
            next: u32::MAX,
            events: ArrayVec::new(),
        }
    }
}

/// An event awaiting execution
#[derive(Copy, Clone)]
struct ScheduledEvent<E: Kind> {
    /// Kind of event to execute
    kind: E,
    /// Time of the scheduler to execute it at
    execute_at: u32,
}

/// Trait for event kinds.
pub trait Kind: PartialEq + Copy + Clone {}

/// Event that is ready to be handled.
#[derive(Copy, Clone, Debug)]
pub struct Event<E: Kind> {
    /// The kind of event to handle
    pub kind: E,
    /// By how many ticks the event was delayed by. For example:
    /// - Event was scheduled to be executed at tick 1000
    /// - Scheduler ran until 1010 before the event got handled
    /// - `late_by` will be 1010 - 1000 = 10.
    pub late_by: u32,
}
