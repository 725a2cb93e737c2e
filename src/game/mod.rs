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

//! Turn-driven play on top of the board rules
//!
//! A `GameState` is an immutable value: every accepted move or promotion
//! produces a new state. A `GameSession` owns the current state together
//! with the clock, the automated opponent and the timers that drive it.

use serde::{Deserialize, Serialize};

use crate::Color;

mod clock;
mod history;
mod policy;
mod session;
mod state;
mod timer;

pub use clock::*;
pub use history::*;
pub use policy::*;
pub use session::*;
pub use state::*;
pub use timer::*;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    Win(Color, WinReason),
    Draw(DrawReason),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinReason {
    Checkmate,
    TimeExpired,
    // Only reachable if a king was left capturable, which legal play prevents.
    KingCaptured,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    Stalemate,
}

impl GameResult {
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameResult::Win(color, _) => Some(*color),
            GameResult::Draw(_) => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, GameResult::Draw(_))
    }

    /// A human-readable explanation, e.g. "White wins by checkmate".
    pub fn reason(&self) -> String {
        match self {
            GameResult::Win(color, WinReason::Checkmate) => format!("{color} wins by checkmate"),
            GameResult::Win(color, WinReason::TimeExpired) => {
                format!("{} ran out of time. {color} wins", !*color)
            }
            GameResult::Win(color, WinReason::KingCaptured) => {
                format!("{color} captured the {} king", !*color)
            }
            GameResult::Draw(DrawReason::Stalemate) => {
                "Draw by stalemate: the side to move has no legal moves".to_string()
            }
        }
    }

    /// The movetext result token.
    pub fn token(&self) -> &'static str {
        match self {
            GameResult::Win(Color::White, _) => "1-0",
            GameResult::Win(Color::Black, _) => "0-1",
            GameResult::Draw(_) => "1/2-1/2",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_reasons() {
        let mate = GameResult::Win(Color::White, WinReason::Checkmate);
        assert_eq!(mate.reason(), "White wins by checkmate");
        assert_eq!(mate.winner(), Some(Color::White));
        assert_eq!(mate.token(), "1-0");

        let flag = GameResult::Win(Color::Black, WinReason::TimeExpired);
        assert_eq!(flag.reason(), "White ran out of time. Black wins");
        assert_eq!(flag.token(), "0-1");

        let draw = GameResult::Draw(DrawReason::Stalemate);
        assert!(draw.is_draw());
        assert_eq!(draw.winner(), None);
        assert_eq!(draw.token(), "1/2-1/2");
    }
}
