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

use super::attacks::Attacks;
use super::legal::LegalMoves;
use super::material::{Color, Piece};
use super::moves::{Move, Promotion};
use super::position::Position;
use super::square::Square;

use Piece::*;

/// FEN for `position` with `turn` to move. Castling rights and en-passant
/// targets are not tracked, so those fields are always `-`, as is the
/// halfmove clock.
pub fn fen(position: &Position, turn: Color, move_number: usize) -> String {
    let mut s = String::new();
    for (index, row) in position.rows().iter().enumerate() {
        if index > 0 {
            s.push('/');
        }
        let mut empty = 0;
        for contents in row {
            match contents {
                Some(material) => {
                    if empty > 0 {
                        s.push_str(&empty.to_string());
                        empty = 0;
                    }
                    s.push(material.fen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            s.push_str(&empty.to_string());
        }
    }
    let side = match turn {
        Color::White => 'w',
        Color::Black => 'b',
    };
    format!("{s} {side} - - 0 {move_number}")
}

/// Short algebraic notation for `mv` played on `position`, which must be the
/// board before the move. `promotion` names the piece a promoting pawn
/// becomes.
pub fn to_san(position: &Position, mv: Move, promotion: Option<Promotion>) -> String {
    let Some(material) = position.contents(mv.from) else {
        return mv.to_string();
    };
    let mut s = format_move(position, mv, material.piece(), promotion);
    let mut next = position.after_move(mv);
    if let Some(promotion) = promotion {
        next.place(mv.to, material.with_piece(promotion.into()));
    }
    s.push_str(check_suffix(&next, !material.color()));
    s
}

fn format_move(
    position: &Position,
    mv: Move,
    piece: Piece,
    promotion: Option<Promotion>,
) -> String {
    let capture = position.is_occupied(mv.to);
    let mut s = String::new();

    if piece == Pawn {
        if capture {
            s.push(mv.from.file_char());
        }
    } else {
        s.push(piece.letter());
        disambiguate(position, piece, mv, &mut s);
    }
    if capture {
        s.push('x');
    }
    s.push_str(&mv.to.to_string());
    if let Some(promotion) = promotion {
        s.push('=');
        s.push_str(&promotion.to_string());
    }
    s
}

fn disambiguate(position: &Position, piece: Piece, mv: Move, s: &mut String) {
    let Some(color) = position.contents(mv.from).map(|material| material.color()) else {
        return;
    };
    let rivals: Vec<Square> = position
        .occupied_by(color)
        .iter()
        .filter(|&sq| sq != mv.from)
        .filter(|&sq| position.contents(sq).is_some_and(|m| m.piece() == piece))
        .filter(|&sq| position.legal_moves(sq, Some(color)).contains(mv.to))
        .collect();
    if rivals.is_empty() {
        return;
    }
    let same_file = rivals.iter().any(|sq| sq.col() == mv.from.col());
    let same_rank = rivals.iter().any(|sq| sq.row() == mv.from.row());
    if !same_file {
        s.push(mv.from.file_char());
    } else if !same_rank {
        s.push(mv.from.rank_char());
    } else {
        s.push(mv.from.file_char());
        s.push(mv.from.rank_char());
    }
}

fn check_suffix(next: &Position, defender: Color) -> &'static str {
    if !next.is_check(defender) {
        ""
    } else if next.can_move(defender) {
        "+"
    } else {
        "#"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;
    use Square::*;

    fn kings() -> Position {
        Position::empty()
            .with(E1, Material::WK)
            .with(E8, Material::BK)
    }

    #[test]
    fn test_start_fen() {
        assert_eq!(
            fen(&Position::standard(), Color::White, 1),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"
        );
    }

    #[test]
    fn test_fen_after_e4() {
        let position = Position::standard().after_move(Move::new(E2, E4));
        assert_eq!(
            fen(&position, Color::Black, 1),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b - - 0 1"
        );
    }

    #[test]
    fn test_pawn_moves() {
        let position = Position::standard();
        assert_eq!(to_san(&position, Move::new(E2, E4), None), "e4");
        assert_eq!(to_san(&position, Move::new(E2, E3), None), "e3");
        let position = position.with(D5, Material::BP).with(E4, Material::WP);
        assert_eq!(to_san(&position, Move::new(E4, D5), None), "exd5");
    }

    #[test]
    fn test_promotion() {
        let position = kings().with(B7, Material::WP).with(A8, Material::BR);
        assert_eq!(to_san(&position, Move::new(B7, B8), Some(Promotion::Queen)), "b8=Q+");
        assert_eq!(to_san(&position, Move::new(B7, A8), Some(Promotion::Knight)), "bxa8=N");
    }

    #[test]
    fn test_piece_moves() {
        let position = Position::standard();
        assert_eq!(to_san(&position, Move::new(G1, F3), None), "Nf3");
        let position = position.with(C4, Material::WB).without(F1);
        assert_eq!(to_san(&position, Move::new(C4, F7), None), "Bxf7+");
    }

    #[test]
    fn test_disambiguation_by_file() {
        let position = kings().with(A3, Material::WN).with(C3, Material::WN);
        assert_eq!(to_san(&position, Move::new(A3, B5), None), "Nab5");
        assert_eq!(to_san(&position, Move::new(C3, B5), None), "Ncb5");
    }

    #[test]
    fn test_disambiguation_by_rank() {
        let position = kings().with(G1, Material::WN).with(G3, Material::WN);
        assert_eq!(to_san(&position, Move::new(G1, E2), None), "N1e2");
    }

    #[test]
    fn test_checkmate_suffix() {
        let position = Position::standard()
            .after_move(Move::new(F2, F3))
            .after_move(Move::new(E7, E5))
            .after_move(Move::new(G2, G4));
        assert_eq!(to_san(&position, Move::new(D8, H4), None), "Qh4#");
    }
}
