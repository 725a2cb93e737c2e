// Copyright 2026 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry<E> {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    event: E,
}

/// A cancellable timer queue on logical time. The owner advances time
/// explicitly and receives due events one at a time, so handling one event
/// may cancel others before they fire.
#[derive(Debug, Clone)]
pub struct Timers<E> {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry<E>>,
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timers<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Logical time elapsed since the queue was created.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fires once, `delay` from now.
    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        self.insert(delay, None, event)
    }

    /// Fires every `period`, starting one period from now.
    pub fn schedule_repeating(&mut self, period: Duration, event: E) -> TimerId {
        self.insert(period, Some(period), event)
    }

    fn insert(&mut self, delay: Duration, period: Option<Duration>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due: self.now + delay,
            period,
            event,
        });
        id
    }

    /// Returns whether the timer was still armed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Settles logical time at `until` once every due event has been taken.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl<E: Clone> Timers<E> {
    /// Takes the earliest event due no later than `until` and moves logical
    /// time to its due time. Events due at the same instant come out in the
    /// order they were scheduled. A repeating timer is re-armed one period
    /// later under the same id.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, E)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= until)
            .min_by_key(|(_, entry)| (entry.due, entry.id))
            .map(|(index, _)| index)?;
        let due = self.entries[index].due;
        self.now = self.now.max(due);
        let fired = match self.entries[index].period {
            Some(period) => {
                let entry = &mut self.entries[index];
                entry.due += period;
                (entry.id, entry.event.clone())
            }
            None => {
                let entry = self.entries.swap_remove(index);
                (entry.id, entry.event)
            }
        };
        Some(fired)
    }
}
