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

use super::attacks::Attacks;
use super::material::{Color, Material};
use super::moves::Move;
use super::position::Position;
use super::square::{Mask, Square};

/// A move that has passed the legality filter, together with what it
/// moves and what it takes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LegalMove {
    pub mv: Move,
    pub material: Material,
    pub captured: Option<Material>,
    pub promotes: bool,
}

impl LegalMove {
    #[inline]
    pub fn from(&self) -> Square {
        self.mv.from
    }
    #[inline]
    pub fn to(&self) -> Square {
        self.mv.to
    }
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

pub trait LegalMoves: Attacks {
    /// Destinations of the piece on `from` that do not leave its own king
    /// attacked. With `side` set, a piece of the other color yields nothing.
    fn legal_moves(&self, from: Square, side: Option<Color>) -> Mask {
        let pos: &Position = self.as_ref();
        let Some(material) = pos.contents(from) else {
            return Mask::empty();
        };
        let color = material.color();
        if side.is_some_and(|side| side != color) {
            return Mask::empty();
        }
        self.pseudo_moves(from)
            .iter()
            .filter(|&to| !pos.after_move(Move::new(from, to)).is_check(color))
            .collect()
    }

    fn is_legal_move(&self, mv: Move, color: Color) -> bool {
        mv.from != mv.to && self.legal_moves(mv.from, Some(color)).contains(mv.to)
    }

    /// Every legal move for `color`, ordered by source then destination
    /// square.
    fn legal_moves_for(&self, color: Color) -> Vec<LegalMove> {
        let pos: &Position = self.as_ref();
        pos.occupied_by(color)
            .iter()
            .flat_map(|from| {
                self.legal_moves(from, Some(color))
                    .iter()
                    .filter_map(move |to| self.describe(Move::new(from, to)))
            })
            .collect()
    }

    fn can_move(&self, color: Color) -> bool {
        let pos: &Position = self.as_ref();
        pos.occupied_by(color)
            .iter()
            .any(|from| !self.legal_moves(from, Some(color)).is_empty())
    }

    /// Describes `mv` on the current board. Does not check legality.
    fn describe(&self, mv: Move) -> Option<LegalMove> {
        let pos: &Position = self.as_ref();
        let material = pos.contents(mv.from)?;
        Some(LegalMove {
            mv,
            material,
            captured: pos.contents(mv.to),
            promotes: self.is_promotion(mv),
        })
    }
}

impl LegalMoves for Position {}
