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
use std::ops::{Index, IndexMut, Not};
use strum_macros::{Display, EnumIter, EnumString};

use super::square::Offset;

/// A piece of a specific color. Materials are plain values: moving a piece
/// means removing one material and placing an equal one elsewhere.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Material {
    color: Color,
    piece: Piece,
}

impl Material {
    pub const WK: Self = Self::new(White, King);
    pub const WQ: Self = Self::new(White, Queen);
    pub const WR: Self = Self::new(White, Rook);
    pub const WB: Self = Self::new(White, Bishop);
    pub const WN: Self = Self::new(White, Knight);
    pub const WP: Self = Self::new(White, Pawn);

    pub const BK: Self = Self::new(Black, King);
    pub const BQ: Self = Self::new(Black, Queen);
    pub const BR: Self = Self::new(Black, Rook);
    pub const BB: Self = Self::new(Black, Bishop);
    pub const BN: Self = Self::new(Black, Knight);
    pub const BP: Self = Self::new(Black, Pawn);

    #[inline]
    pub const fn new(color: Color, piece: Piece) -> Self {
        Self { color, piece }
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    /// The same color with a different piece, as used by promotion.
    #[inline]
    pub const fn with_piece(self, piece: Piece) -> Self {
        Self::new(self.color, piece)
    }

    /// FEN letter: uppercase for white, lowercase for black.
    pub fn fen_char(&self) -> char {
        let c = self.piece.letter();
        match self.color {
            White => c,
            Black => c.to_ascii_lowercase(),
        }
    }

    pub fn from_fen_char(c: char) -> Option<Self> {
        let piece = Piece::from_letter(c.to_ascii_uppercase())?;
        let color = if c.is_ascii_uppercase() { White } else { Black };
        Some(Self::new(color, piece))
    }

    pub const fn symbol(&self) -> char {
        match (self.color, self.piece) {
            (White, King) => '♔',
            (White, Queen) => '♕',
            (White, Rook) => '♖',
            (White, Bishop) => '♗',
            (White, Knight) => '♘',
            (White, Pawn) => '♙',
            (Black, King) => '♚',
            (Black, Queen) => '♛',
            (Black, Rook) => '♜',
            (Black, Bishop) => '♝',
            (Black, Knight) => '♞',
            (Black, Pawn) => '♟',
        }
    }
}

use Color::{Black, White};

#[derive(
    Debug, Serialize, Deserialize, Display, EnumString, Clone, Copy, PartialEq, Eq, Hash, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Color {
    White,
    Black,
}

impl Color {
    // Orientation is fixed: white starts on rows 6-7 and advances toward row 0.
    // Every color-dependent row or direction is derived from these four.

    #[inline]
    pub const fn forward(&self) -> Offset {
        match self {
            White => Offset::new(-1, 0),
            Black => Offset::new(1, 0),
        }
    }
    #[inline]
    pub const fn back_row(&self) -> usize {
        match self {
            White => 7,
            Black => 0,
        }
    }
    #[inline]
    pub const fn pawn_row(&self) -> usize {
        match self {
            White => 6,
            Black => 1,
        }
    }
    #[inline]
    pub const fn promotion_row(&self) -> usize {
        match self {
            White => 0,
            Black => 7,
        }
    }
}

impl Not for Color {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            White => Black,
            Black => White,
        }
    }
}

/// A value per color, e.g. remaining clock time or occupancy.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pair<T> {
    white: T,
    black: T,
}

impl<T> Pair<T> {
    pub const fn new(white: T, black: T) -> Self {
        Self { white, black }
    }
}

impl<T: Clone> Pair<T> {
    pub fn splat(value: T) -> Self {
        Self::new(value.clone(), value)
    }
}

impl<T> Index<Color> for Pair<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        match index {
            White => &self.white,
            Black => &self.black,
        }
    }
}

impl<T> IndexMut<Color> for Pair<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        match index {
            White => &mut self.white,
            Black => &mut self.black,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
use Piece::{Bishop, King, Knight, Pawn, Queen, Rook};

impl Piece {
    /// Conventional material value. The king is priceless and counts as zero.
    pub const fn value(&self) -> u8 {
        match self {
            Pawn => 1,
            Knight | Bishop => 3,
            Rook => 5,
            Queen => 9,
            King => 0,
        }
    }

    pub const fn letter(&self) -> char {
        match self {
            Pawn => 'P',
            Knight => 'N',
            Bishop => 'B',
            Rook => 'R',
            Queen => 'Q',
            King => 'K',
        }
    }

    pub const fn from_letter(c: char) -> Option<Self> {
        match c {
            'P' => Some(Pawn),
            'N' => Some(Knight),
            'B' => Some(Bishop),
            'R' => Some(Rook),
            'Q' => Some(Queen),
            'K' => Some(King),
            _ => None,
        }
    }

    pub fn is_king(&self) -> bool {
        matches!(*self, King)
    }
    pub fn is_pawn(&self) -> bool {
        matches!(*self, Pawn)
    }
}
