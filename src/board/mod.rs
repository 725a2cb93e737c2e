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

//! Chess board rules for a teaching application
//!
//! The _board_ layer knows where pieces stand and which moves they
//! may make. It knows nothing about turns, phases or clocks; those
//! belong to the `game` layer. The following features are supported:
//!
//! [x] Standard piece movement, including pawn double advances
//! [x] Check detection
//! [x] Legal move filtering (no move may leave its own king attacked)
//! [x] Promotion-eligible move detection
//! [x] FEN export and short algebraic notation
//! [ ] Castling
//! [ ] En passant
//!
//! Some of the key abstractions include:
//!
//! * A `Square` represents the coordinates for a single square on an
//!   8-by-8 board. Squares are named `A8` .. `H1` and are declared in
//!   `(row, col)` order, with row 0 being black's back rank. Squares
//!   convert to and from algebraic names (`"e4"`) and the `"row,col"`
//!   payload carried by a dragged piece.
//!
//! * A `Mask` is a 64-bit (u64) value in which each bit maps to a
//!   square on the board. Masks are used for occupancy and for move
//!   destinations. They can be combined or modified using bitwise
//!   `|`, `|=`, `&`, `&=` and `!` operators, and iterate in square
//!   order.
//!
//! * `Material` represents a piece of a specific color. A `Piece` has
//!   six variants and `Color` is either `White` or `Black`. Every
//!   orientation-dependent constant (pawn direction, pawn start row,
//!   promotion row) is a method on `Color`. `Promotion` has only the
//!   four variants a pawn may become and converts to and from `Piece`.
//!
//! * A `Position` holds the contents of each square and nothing else.
//!   Positions are small `Copy` values; `after_move` returns a new
//!   position and leaves the receiver untouched.
//!
//! * Rules are layered as traits over `AsRef<Position>`:
//!   `PseudoMoves` generates destinations by movement rules alone,
//!   `Attacks` builds check detection on top of it and `LegalMoves`
//!   discards destinations that would leave the mover's king attacked.
//!

mod attacks;
mod legal;
mod material;
mod moves;
mod notation;
mod position;
mod square;

pub use attacks::*;
pub use legal::*;
pub use material::*;
pub use moves::*;
pub use notation::*;
pub use position::*;
pub use square::*;
