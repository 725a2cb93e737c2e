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
use std::ops::Index;
use strum::IntoEnumIterator;

use super::material::{Color, Material, Pair, Piece};
use super::moves::Move;
use super::square::{Mask, Square};

use Piece::*;

/// The contents of the 64 squares. There is no memory of whose turn it
/// is, castling rights or en-passant targets; those live elsewhere or not at
/// all.
///
/// Occupancy masks are kept in sync with the squares on every placement and
/// removal so that move generation never has to scan the whole grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    squares: [Option<Material>; 64],
    pieces: Pair<Mask>,
    kings: Mask,
}

impl Default for Position {
    fn default() -> Self {
        Self::standard()
    }
}

impl Position {
    pub fn empty() -> Self {
        Self {
            squares: [None; 64],
            pieces: Pair::default(),
            kings: Mask::empty(),
        }
    }

    /// The standard initial arrangement, white on rows 6 and 7.
    pub fn standard() -> Self {
        const BACK_ROW: [Piece; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut position = Self::empty();
        for color in Color::iter() {
            for (col, piece) in BACK_ROW.into_iter().enumerate() {
                if let Some(square) = Square::from_coords(color.back_row(), col) {
                    position.place(square, Material::new(color, piece));
                }
                if let Some(square) = Square::from_coords(color.pawn_row(), col) {
                    position.place(square, Material::new(color, Pawn));
                }
            }
        }
        position
    }

    /// Builder-style placement, replacing whatever occupied `square`.
    pub fn with(mut self, square: Square, material: Material) -> Self {
        self.place(square, material);
        self
    }

    /// Builder-style removal.
    pub fn without(mut self, square: Square) -> Self {
        self.remove(square);
        self
    }

    #[inline]
    pub fn contents(&self, square: Square) -> Option<Material> {
        self.squares[square.to_index()]
    }

    #[inline]
    pub fn is_occupied(&self, square: Square) -> bool {
        self.squares[square.to_index()].is_some()
    }

    #[inline]
    pub fn occupied(&self) -> Mask {
        self.pieces[Color::White] | self.pieces[Color::Black]
    }

    #[inline]
    pub fn occupied_by(&self, color: Color) -> Mask {
        self.pieces[color]
    }

    #[inline]
    pub fn kings(&self, color: Color) -> Mask {
        self.kings & self.pieces[color]
    }

    /// The square of `color`'s king, or `None` if the board has none.
    pub fn king(&self, color: Color) -> Option<Square> {
        self.kings(color).iter().next()
    }

    /// Every occupied square with its material, in `(row, col)` order.
    pub fn materials(&self) -> impl Iterator<Item = (Square, Material)> + '_ {
        self.occupied()
            .iter()
            .filter_map(|square| self.contents(square).map(|material| (square, material)))
    }

    /// Row-major view of the board for rendering; `rows()[0]` is black's
    /// back rank.
    pub fn rows(&self) -> [[Option<Material>; 8]; 8] {
        let mut rows = [[None; 8]; 8];
        for (index, contents) in self.squares.iter().enumerate() {
            rows[index / 8][index % 8] = *contents;
        }
        rows
    }

    /// A copy of this position with `mv` applied. The receiver is untouched.
    pub fn after_move(&self, mv: Move) -> Self {
        let mut next = *self;
        next.apply(mv);
        next
    }

    /// Moves whatever stands on `mv.from` to `mv.to` and returns the
    /// captured material, if any.
    pub(crate) fn apply(&mut self, mv: Move) -> Option<Material> {
        match self.remove(mv.from) {
            Some(material) => self.place(mv.to, material),
            None => None,
        }
    }

    pub(crate) fn place(&mut self, square: Square, material: Material) -> Option<Material> {
        let replaced = self.remove(square);
        self.squares[square.to_index()] = Some(material);
        self.pieces[material.color()] |= square;
        if material.piece().is_king() {
            self.kings |= square;
        }
        replaced
    }

    pub(crate) fn remove(&mut self, square: Square) -> Option<Material> {
        let material = self.squares[square.to_index()].take()?;
        self.pieces[material.color()].reset(square);
        self.kings.reset(square);
        Some(material)
    }
}

impl Index<Square> for Position {
    type Output = Option<Material>;
    #[inline]
    fn index(&self, index: Square) -> &Self::Output {
        &self.squares[index.to_index()]
    }
}

impl AsRef<Self> for Position {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for contents in row {
                let c = contents.map(|material| material.fen_char()).unwrap_or('.');
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// Serialized as a list of occupied squares; serde has no support for
// 64-element arrays.
impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.materials())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries: Vec<(Square, Material)> = Vec::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .fold(Position::empty(), |position, (square, material)| {
                position.with(square, material)
            }))
    }
}
