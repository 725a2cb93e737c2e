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

use strum::IntoEnumIterator;
use tracing::warn;

use super::material::Color;
use super::moves::PseudoMoves;
use super::position::Position;
use super::square::{Mask, Square};

/// Attack queries built on pseudo-legal move generation: a square is
/// attacked by `color` when any of `color`'s pieces could move onto it.
pub trait Attacks: PseudoMoves {
    fn king_square(&self, color: Color) -> Option<Square> {
        let pos: &Position = self.as_ref();
        pos.king(color)
    }

    /// The squares of `by`'s pieces that could move onto `target`.
    fn attackers(&self, target: Square, by: Color) -> Mask {
        let pos: &Position = self.as_ref();
        pos.occupied_by(by)
            .iter()
            .filter(|&from| self.pseudo_moves(from).contains(target))
            .collect()
    }

    fn is_attacked(&self, target: Square, by: Color) -> bool {
        let pos: &Position = self.as_ref();
        pos.occupied_by(by)
            .iter()
            .any(|from| self.pseudo_moves(from).contains(target))
    }

    /// Whether `color`'s king is attacked. A board without that king cannot
    /// arise through `GameState`; it is reported and answered `false`.
    fn is_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => self.is_attacked(king, !color),
            None => {
                warn!(%color, "check test on a board without a king");
                false
            }
        }
    }

    /// The first king found in check, with its square.
    fn checked_king(&self) -> Option<(Color, Square)> {
        Color::iter().find_map(|color| {
            let king = self.king_square(color)?;
            self.is_attacked(king, !color).then_some((color, king))
        })
    }
}

impl Attacks for Position {}

#[cfg(test)]
mod tests {
    use crate::*;
    use Square::*;

    fn kings() -> Position {
        Position::empty()
            .with(E1, Material::WK)
            .with(E8, Material::BK)
    }

    #[test]
    fn test_no_check_at_start() {
        let position = Position::standard();
        assert!(!position.is_check(Color::White));
        assert!(!position.is_check(Color::Black));
        assert_eq!(position.checked_king(), None);
    }

    #[test]
    fn test_rook_check_along_file() {
        let position = kings().with(E5, Material::BR);
        assert!(position.is_check(Color::White));
        assert!(!position.is_check(Color::Black));
        assert_eq!(position.checked_king(), Some((Color::White, E1)));
    }

    #[test]
    fn test_blocked_rook_does_not_check() {
        let position = kings().with(E5, Material::BR).with(E3, Material::WN);
        assert!(!position.is_check(Color::White));
    }

    #[test]
    fn test_pawn_checks_diagonally_only() {
        let position = kings().with(D2, Material::BP);
        assert!(position.is_check(Color::White));
        let position = kings().with(E2, Material::BP);
        assert!(!position.is_check(Color::White));
    }

    #[test]
    fn test_knight_check() {
        let position = kings().with(F6, Material::WN);
        assert!(position.is_check(Color::Black));
        assert_eq!(position.attackers(E8, Color::White), F6.to_mask());
    }

    #[test]
    fn test_multiple_attackers() {
        let position = kings()
            .with(B4, Material::BB)
            .with(E4, Material::BQ)
            .with(D3, Material::BN);
        let attackers = position.attackers(E1, Color::Black);
        assert_eq!(attackers.len(), 3);
        assert!(attackers.contains(B4));
        assert!(attackers.contains(E4));
        assert!(attackers.contains(D3));
    }

    #[test]
    fn test_empty_square_attacks() {
        let position = Position::standard();
        assert!(position.is_attacked(F3, Color::White));
        assert!(!position.is_attacked(E4, Color::Black));
        assert!(position.is_attacked(F6, Color::Black));
    }

    #[test]
    fn test_missing_king_is_not_in_check() {
        let position = Position::empty().with(E1, Material::WK).with(E4, Material::BR);
        assert!(!position.is_check(Color::Black));
        assert!(position.is_check(Color::White));
    }

    #[test]
    fn test_check_matches_some_opposing_destination() {
        let position = kings()
            .with(B4, Material::BB)
            .with(D2, Material::WP)
            .with(H4, Material::BQ);
        let hit = position
            .occupied_by(Color::Black)
            .iter()
            .any(|from| position.pseudo_moves(from).contains(E1));
        assert_eq!(position.is_check(Color::White), hit);
    }
}
