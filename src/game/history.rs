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

use super::GameResult;
use crate::board::{Color, Material, Move, Promotion};

use Color::*;

/// Ply counter. Even values are white's turn, odd values black's.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoveId(u16);

impl MoveId {
    pub const START: MoveId = MoveId(0);

    #[inline]
    pub fn new(move_count: u16, turn: Color) -> Self {
        match turn {
            White => Self(move_count * 2),
            Black => Self(move_count * 2 + 1),
        }
    }
    #[inline]
    pub fn turn(&self) -> Color {
        const TURNS: [Color; 2] = [White, Black];
        let index = self.value() % 2;
        TURNS[index]
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0 as usize
    }
    #[inline]
    pub fn move_count(&self) -> usize {
        self.value() / 2
    }
    #[inline]
    pub fn move_number(&self) -> usize {
        1 + self.move_count()
    }
    #[inline]
    pub fn at_start(&self) -> bool {
        self.0 == 0
    }
    #[inline]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Default for MoveId {
    #[inline]
    fn default() -> Self {
        MoveId::START
    }
}

/// One committed ply. A promoting move is recorded once the piece has been
/// chosen.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub id: MoveId,
    pub mv: Move,
    pub material: Material,
    pub captured: Option<Material>,
    pub promotion: Option<Promotion>,
    pub san: String,
}

impl MoveRecord {
    /// A sentence for the move list, e.g. "White moves P from e2 to e4".
    pub fn description(&self) -> String {
        let mut s = format!(
            "{} moves {} from {} to {}",
            self.material.color(),
            self.material.piece().letter(),
            self.mv.from,
            self.mv.to
        );
        if let Some(captured) = self.captured {
            s.push_str(&format!(", capturing {}", captured.piece().letter()));
        }
        if let Some(promotion) = self.promotion {
            s.push_str(&format!(", promoting to {promotion}"));
        }
        s
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.san)
    }
}

/// Numbered movetext with a trailing result token, e.g. `1. e4 e5 2. Nf3 *`.
pub fn movetext(history: &[MoveRecord], result: Option<&GameResult>) -> String {
    let mut parts: Vec<String> = Vec::new();
    for record in history {
        match record.id.turn() {
            White => parts.push(format!("{}.", record.id.move_number())),
            Black if parts.is_empty() => parts.push(format!("{}...", record.id.move_number())),
            Black => {}
        }
        parts.push(record.san.clone());
    }
    parts.push(result.map_or("*", GameResult::token).to_string());
    parts.join(" ")
}
