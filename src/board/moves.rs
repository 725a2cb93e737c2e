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

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use thiserror::Error;

use super::material::{Color, Piece};
use super::position::Position;
use super::square::{Direction, Mask, Offset, Square, SquareParseError};

use Piece::*;

/// Why a move or promotion submission was turned down. None of these
/// change any state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("It is not your turn")]
    NotYourTurn,
    #[error("The game is not in progress")]
    WrongPhase,
    #[error("A promotion choice is pending")]
    PromotionPending,
    #[error("Not a legal move")]
    IllegalMove,
    #[error("There is no pawn awaiting promotion")]
    NoPendingPromotion,
    #[error("Malformed move input: {0}")]
    MalformedInput(#[from] SquareParseError),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// The pieces a pawn may become.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// Accepts a piece letter in either case, e.g. `'Q'` or `'n'`.
    pub fn from_char(c: char) -> Option<Self> {
        Piece::from_letter(c.to_ascii_uppercase()).and_then(|piece| piece.try_into().ok())
    }
}

impl From<Promotion> for Piece {
    fn from(value: Promotion) -> Self {
        match value {
            Promotion::Queen => Queen,
            Promotion::Rook => Rook,
            Promotion::Bishop => Bishop,
            Promotion::Knight => Knight,
        }
    }
}

impl TryFrom<Piece> for Promotion {
    type Error = Piece;

    fn try_from(piece: Piece) -> Result<Self, Self::Error> {
        match piece {
            Queen => Ok(Promotion::Queen),
            Rook => Ok(Promotion::Rook),
            Bishop => Ok(Promotion::Bishop),
            Knight => Ok(Promotion::Knight),
            Pawn | King => Err(piece),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let piece: Piece = (*self).into();
        write!(f, "{}", piece.letter())
    }
}

/// Destinations by piece-movement rules alone, ignoring whether the move
/// would leave the mover's own king attacked.
pub trait PseudoMoves: AsRef<Position> {
    fn pseudo_moves(&self, from: Square) -> Mask {
        let pos: &Position = self.as_ref();
        let Some(material) = pos.contents(from) else {
            return Mask::empty();
        };
        let color = material.color();
        match material.piece() {
            Pawn => self.pawn_moves(from, color),
            Knight => KNIGHT_MOVES[from] & !pos.occupied_by(color),
            Bishop => self.line_moves(from, color, Direction::diagonals()),
            Rook => self.line_moves(from, color, Direction::orthogonals()),
            Queen => self.line_moves(from, color, Direction::iter()),
            King => KING_MOVES[from] & !pos.occupied_by(color),
        }
    }

    fn pawn_moves(&self, from: Square, color: Color) -> Mask {
        let pos: &Position = self.as_ref();
        let forward = color.forward();
        let mut destinations = Mask::empty();
        if let Some(one) = from + forward {
            if !pos.is_occupied(one) {
                destinations |= one;
                if from.row() == color.pawn_row() {
                    if let Some(two) = from + forward.scaled(2) {
                        if !pos.is_occupied(two) {
                            destinations |= two;
                        }
                    }
                }
            }
        }
        // diagonal steps are capture-only
        for side in [-1, 1] {
            if let Some(target) = from + Offset::new(forward.dr, side) {
                if pos.occupied_by(!color).contains(target) {
                    destinations |= target;
                }
            }
        }
        destinations
    }

    fn line_moves<I>(&self, from: Square, color: Color, directions: I) -> Mask
    where
        I: Iterator<Item = Direction>,
    {
        let pos: &Position = self.as_ref();
        let mut destinations = Mask::empty();
        for dir in directions {
            let mut next = from + dir;
            while let Some(square) = next {
                match pos.contents(square) {
                    None => destinations |= square,
                    Some(material) => {
                        if material.color() != color {
                            destinations |= square;
                        }
                        break;
                    }
                }
                next = square + dir;
            }
        }
        destinations
    }

    /// Whether `mv` takes a pawn onto its promotion row.
    fn is_promotion(&self, mv: Move) -> bool {
        let pos: &Position = self.as_ref();
        pos.contents(mv.from).is_some_and(|material| {
            material.piece().is_pawn() && mv.to.row() == material.color().promotion_row()
        })
    }
}

impl PseudoMoves for Position {}

static KING_MOVES: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] = Direction::iter().filter_map(|dir| square + dir).collect();
    }
    array
});

static KNIGHT_MOVES: Lazy<[Mask; 64]> = Lazy::new(|| {
    const OFFSETS: [Offset; 8] = [
        Offset::new(-2, -1),
        Offset::new(-2, 1),
        Offset::new(2, -1),
        Offset::new(2, 1),
        Offset::new(-1, -2),
        Offset::new(-1, 2),
        Offset::new(1, -2),
        Offset::new(1, 2),
    ];
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] = OFFSETS.into_iter().filter_map(|offset| square + offset).collect();
    }
    array
});
