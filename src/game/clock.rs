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
use std::fmt;
use std::time::Duration;

use crate::board::{Color, Pair};

/// Time allotted to each side for the whole game.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeControl(Duration);

impl TimeControl {
    pub const PRESETS: [TimeControl; 6] = [
        Self::from_secs(60),
        Self::from_secs(180),
        Self::from_secs(300),
        Self::from_secs(600),
        Self::from_secs(900),
        Self::from_secs(1800),
    ];

    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    #[inline]
    pub fn per_side(&self) -> Duration {
        self.0
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::from_secs(300)
    }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        match (secs / 60, secs % 60) {
            (1, 0) => write!(f, "1 Minute"),
            (minutes, 0) => write!(f, "{minutes} Minutes"),
            _ => write!(f, "{secs} Seconds"),
        }
    }
}

/// Remaining time per side. At most one side's clock runs at a time.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ChessClock {
    remaining: Pair<Duration>,
    running: Option<Color>,
}

impl ChessClock {
    pub fn new(control: TimeControl) -> Self {
        Self {
            remaining: Pair::splat(control.per_side()),
            running: None,
        }
    }

    #[inline]
    pub fn remaining(&self, color: Color) -> Duration {
        self.remaining[color]
    }

    #[inline]
    pub fn running(&self) -> Option<Color> {
        self.running
    }

    pub fn start(&mut self, color: Color) {
        self.running = Some(color);
    }

    pub fn stop(&mut self) {
        self.running = None;
    }

    pub fn is_flagged(&self, color: Color) -> bool {
        self.remaining[color].is_zero()
    }

    /// Charges `elapsed` to the running side and returns that side if its
    /// time is now exhausted.
    pub fn tick(&mut self, elapsed: Duration) -> Option<Color> {
        let color = self.running?;
        self.remaining[color] = self.remaining[color].saturating_sub(elapsed);
        self.is_flagged(color).then_some(color)
    }

    /// The remaining time of `color` as `m:ss`.
    pub fn display(&self, color: Color) -> String {
        format_time(self.remaining[color])
    }
}

pub fn format_time(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
