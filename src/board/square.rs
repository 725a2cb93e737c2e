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
use std::ops::{Add, BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Sub};
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use strum_macros::EnumIter;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SquareParseError {
    #[error("expected a square name such as `e4`, found `{0}`")]
    InvalidName(String),
    #[error("expected a `row,col` pair with both values in 0..8, found `{0}`")]
    InvalidCoords(String),
}

/// One of the 64 squares. Declaration order follows `(row, col)` with row 0
/// being black's back rank, so `A8` is `(0, 0)` and `H1` is `(7, 7)`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Square {
    A8, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1,
}

use Square::{
    A8, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1,
};

impl Square {
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        const VALUES: [Square; 64] = [
            A8, B8, C8, D8, E8, F8, G8, H8,
            A7, B7, C7, D7, E7, F7, G7, H7,
            A6, B6, C6, D6, E6, F6, G6, H6,
            A5, B5, C5, D5, E5, F5, G5, H5,
            A4, B4, C4, D4, E4, F4, G4, H4,
            A3, B3, C3, D3, E3, F3, G3, H3,
            A2, B2, C2, D2, E2, F2, G2, H2,
            A1, B1, C1, D1, E1, F1, G1, H1,
        ];
        debug_assert!(index < 64);
        VALUES[index]
    }

    #[inline]
    pub const fn from_coords(row: usize, col: usize) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Self::from_index(row * 8 + col))
        } else {
            None
        }
    }

    /// Parses the `"row,col"` payload a board widget attaches to a dragged
    /// piece.
    pub fn from_row_col(payload: &str) -> Result<Self, SquareParseError> {
        let invalid = || SquareParseError::InvalidCoords(payload.to_string());
        let (row, col) = payload.split_once(',').ok_or_else(invalid)?;
        let row: usize = row.trim().parse().map_err(|_| invalid())?;
        let col: usize = col.trim().parse().map_err(|_| invalid())?;
        Self::from_coords(row, col).ok_or_else(invalid)
    }

    #[inline]
    pub const fn to_index(&self) -> usize {
        *self as usize
    }
    #[inline]
    pub const fn to_mask(&self) -> Mask {
        Mask::new(0x1 << (63 - self.to_index()))
    }
    #[inline]
    pub const fn row(&self) -> usize {
        self.to_index() / 8
    }
    #[inline]
    pub const fn col(&self) -> usize {
        self.to_index() % 8
    }
    #[inline]
    pub const fn coords(&self) -> (usize, usize) {
        (self.row(), self.col())
    }
    #[inline]
    pub const fn file_char(&self) -> char {
        (b'a' + self.col() as u8) as char
    }
    #[inline]
    pub const fn rank_char(&self) -> char {
        (b'8' - self.row() as u8) as char
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let invalid = || SquareParseError::InvalidName(name.to_string());
        let mut chars = name.chars();
        let (f, r) = match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => (f.to_ascii_lowercase(), r),
            _ => return Err(invalid()),
        };
        if !('a'..='h').contains(&f) || !('1'..='8').contains(&r) {
            return Err(invalid());
        }
        let col = f as usize - 'a' as usize;
        let row = '8' as usize - r as usize;
        Self::from_coords(row, col).ok_or_else(invalid)
    }
}

impl From<Square> for usize {
    fn from(value: Square) -> Self {
        value.to_index()
    }
}

/// A displacement in rows and columns. Negative `dr` points toward row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dr: isize,
    pub dc: isize,
}

impl Offset {
    pub const fn new(dr: isize, dc: isize) -> Self {
        Self { dr, dc }
    }

    pub const fn scaled(self, factor: isize) -> Self {
        Self::new(self.dr * factor, self.dc * factor)
    }
}

impl Add<Offset> for Square {
    type Output = Option<Square>;
    fn add(self, rhs: Offset) -> Self::Output {
        let row = self.row().checked_add_signed(rhs.dr)?;
        let col = self.col().checked_add_signed(rhs.dc)?;
        Square::from_coords(row, col)
    }
}

impl Sub for Square {
    type Output = Offset;
    fn sub(self, rhs: Self) -> Self::Output {
        Offset::new(
            self.row() as isize - rhs.row() as isize,
            self.col() as isize - rhs.col() as isize,
        )
    }
}

impl Index<Square> for [Mask; 64] {
    type Output = Mask;
    fn index(&self, square: Square) -> &Self::Output {
        &self[square.to_index()]
    }
}

impl IndexMut<Square> for [Mask; 64] {
    fn index_mut(&mut self, square: Square) -> &mut Self::Output {
        &mut self[square.to_index()]
    }
}

/// The eight compass directions as seen from white's side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    UpLeft,
    Up,
    UpRight,
    Left,
    Right,
    DownLeft,
    Down,
    DownRight,
}

use Direction::{Down, DownLeft, DownRight, Left, Right, Up, UpLeft, UpRight};

impl Direction {
    pub fn orthogonals() -> impl Iterator<Item = Self> {
        [Up, Left, Right, Down].into_iter()
    }
    pub fn diagonals() -> impl Iterator<Item = Self> {
        [UpLeft, UpRight, DownLeft, DownRight].into_iter()
    }
}

impl From<Direction> for Offset {
    fn from(value: Direction) -> Self {
        match value {
            UpLeft => Self::new(-1, -1),
            Up => Self::new(-1, 0),
            UpRight => Self::new(-1, 1),
            Left => Self::new(0, -1),
            Right => Self::new(0, 1),
            DownLeft => Self::new(1, -1),
            Down => Self::new(1, 0),
            DownRight => Self::new(1, 1),
        }
    }
}

impl Add<Direction> for Square {
    type Output = Option<Square>;
    fn add(self, rhs: Direction) -> Self::Output {
        let offset: Offset = rhs.into();
        self + offset
    }
}

/// A set of squares packed into a `u64`, one bit per square.
#[derive(Clone, Serialize, Deserialize, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mask(u64);

impl Mask {
    #[inline]
    pub const fn new(val: u64) -> Self {
        Self(val)
    }

    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn contains(&self, square: Square) -> bool {
        (self.0 & square.to_mask().0) != 0
    }

    #[inline]
    pub fn set(&mut self, square: Square) {
        self.0 |= square.to_mask().0;
    }

    #[inline]
    pub fn reset(&mut self, square: Square) {
        self.0 &= !square.to_mask().0;
    }

    pub fn iter(&self) -> MaskIter {
        MaskIter(self.0)
    }
}

impl FromIterator<Square> for Mask {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut mask = Mask::empty();
        for square in iter {
            mask.set(square);
        }
        mask
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            for col in 0..8 {
                let hit = Square::from_coords(row, col).is_some_and(|sq| self.contains(sq));
                write!(f, "{}", if hit { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Sub<Square> for Mask {
    type Output = Self;
    fn sub(self, rhs: Square) -> Self::Output {
        Self(self.0 & !rhs.to_mask().0)
    }
}

impl Not for Mask {
    type Output = Self;
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl BitOr for Mask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitOrAssign<Square> for Mask {
    fn bitor_assign(&mut self, rhs: Square) {
        self.0 |= rhs.to_mask().0;
    }
}

impl BitAnd for Mask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for Mask {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl IntoIterator for Mask {
    type Item = Square;
    type IntoIter = MaskIter;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Yields the squares of a mask in `(row, col)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskIter(u64);

impl Iterator for MaskIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 != 0 {
            let square = Square::from_index(self.0.leading_zeros() as usize);
            self.0 &= !square.to_mask().0;
            return Some(square);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for MaskIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_coords_follow_declaration_order() {
        assert_eq!(Square::from_coords(0, 0), Some(A8));
        assert_eq!(Square::from_coords(7, 4), Some(E1));
        assert_eq!(Square::from_coords(6, 4), Some(E2));
        assert_eq!(Square::from_coords(8, 0), None);
        for square in Square::iter() {
            let (row, col) = square.coords();
            assert_eq!(Square::from_coords(row, col), Some(square));
        }
    }

    #[test]
    fn test_algebraic_names() {
        assert_eq!(E4.to_string(), "e4");
        assert_eq!(A8.to_string(), "a8");
        assert_eq!("h1".parse::<Square>(), Ok(H1));
        assert_eq!("E2".parse::<Square>(), Ok(E2));
        assert!("i1".parse::<Square>().is_err());
        assert!("e9".parse::<Square>().is_err());
        assert!("e".parse::<Square>().is_err());
        assert!("e22".parse::<Square>().is_err());
    }

    #[test]
    fn test_row_col_payload() {
        assert_eq!(Square::from_row_col("6,4"), Ok(E2));
        assert_eq!(Square::from_row_col(" 0 , 7 "), Ok(H8));
        assert!(Square::from_row_col("6;4").is_err());
        assert!(Square::from_row_col("8,0").is_err());
        assert!(Square::from_row_col("-1,0").is_err());
        assert!(Square::from_row_col("").is_err());
    }

    #[test]
    fn test_offsets_stay_on_board() {
        assert_eq!(E2 + Direction::Up, Some(E3));
        assert_eq!(E2 + Direction::Down, Some(E1));
        assert_eq!(A8 + Direction::Up, None);
        assert_eq!(H1 + Direction::Right, None);
        assert_eq!(B1 + Offset::new(-2, -1), Some(A3));
        assert_eq!(B1 + Offset::new(-1, -2), None);
        assert_eq!(E4 - E2, Offset::new(-2, 0));
    }

    #[test]
    fn test_mask_iteration() {
        let mask: Mask = [H1, A8, E4].into_iter().collect();
        assert_eq!(mask.len(), 3);
        assert!(mask.contains(E4));
        assert!(!mask.contains(E5));
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![A8, E4, H1]);
        assert_eq!((mask - E4).len(), 2);
        assert!((mask & !mask).is_empty());
    }
}
