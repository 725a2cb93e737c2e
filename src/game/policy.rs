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

#[cfg(feature = "random")]
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::debug;

use crate::board::{Color, LegalMove, LegalMoves, Piece, Position, Promotion};

use Piece::*;

/// The automated side always promotes to a queen.
pub const BOT_PROMOTION: Promotion = Promotion::Queen;

#[derive(
    Debug,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
)]
#[strum(ascii_case_insensitive)]
pub enum Difficulty {
    #[default]
    Beginner,
    Medium,
    Advanced,
}

impl Difficulty {
    /// Piece groups in preference order for quiet moves.
    pub fn tiers(&self) -> &'static [&'static [Piece]] {
        match self {
            Difficulty::Beginner => &[&[Pawn]],
            Difficulty::Medium => &[&[Knight, Bishop], &[Rook, Queen], &[Pawn]],
            Difficulty::Advanced => &[&[Rook, Queen], &[Knight, Bishop], &[Pawn]],
        }
    }

    /// Whether captures are ranked by value rather than treated alike.
    pub fn ranks_captures(&self) -> bool {
        matches!(self, Difficulty::Advanced)
    }

    /// Nominal rating reported to the coaching service.
    pub fn rating(&self) -> u16 {
        match self {
            Difficulty::Beginner => 1000,
            Difficulty::Medium => 1300,
            Difficulty::Advanced => 1600,
        }
    }
}

/// Picks one of the legal moves offered to the automated side.
pub trait MoveStrategy {
    fn name(&self) -> &str;

    /// `None` only when `moves` is empty.
    fn choose(&mut self, moves: &[LegalMove]) -> Option<LegalMove>;
}

/// Enumerates `side`'s legal moves on `position` and lets `strategy` pick.
pub fn select_move<S>(strategy: &mut S, position: &Position, side: Color) -> Option<LegalMove>
where
    S: MoveStrategy + ?Sized,
{
    let moves = position.legal_moves_for(side);
    let choice = strategy.choose(&moves);
    debug!(
        strategy = strategy.name(),
        options = moves.len(),
        choice = ?choice.map(|lm| lm.mv),
        "selected move"
    );
    choice
}

/// Always the first move offered. Deterministic, for tests and replays.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMove;

impl MoveStrategy for FirstMove {
    fn name(&self) -> &str {
        "first"
    }

    fn choose(&mut self, moves: &[LegalMove]) -> Option<LegalMove> {
        moves.first().copied()
    }
}

/// Uniform choice over every legal move.
#[cfg(feature = "random")]
#[derive(Debug, Clone)]
pub struct RandomMove {
    rng: StdRng,
}

#[cfg(feature = "random")]
impl RandomMove {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

#[cfg(feature = "random")]
impl Default for RandomMove {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "random")]
impl MoveStrategy for RandomMove {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&mut self, moves: &[LegalMove]) -> Option<LegalMove> {
        moves.choose(&mut self.rng).copied()
    }
}

/// Tiered heuristic: captures, then promotions, then the preferred piece
/// groups of the difficulty, then anything. The final pick within a tier is
/// random when the `random` feature is on and the first candidate otherwise.
#[derive(Debug, Clone)]
pub struct HeuristicPolicy {
    difficulty: Difficulty,
    rank_captures: bool,
    #[cfg(feature = "random")]
    rng: StdRng,
}

impl HeuristicPolicy {
    #[cfg(feature = "random")]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            rank_captures: difficulty.ranks_captures(),
            rng: StdRng::from_entropy(),
        }
    }

    #[cfg(not(feature = "random"))]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            rank_captures: difficulty.ranks_captures(),
        }
    }

    #[cfg(feature = "random")]
    pub fn seeded(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(difficulty)
        }
    }

    pub fn with_capture_ranking(mut self, rank_captures: bool) -> Self {
        self.rank_captures = rank_captures;
        self
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The moves the final random pick is made from.
    pub fn candidates(&self, moves: &[LegalMove]) -> Vec<LegalMove> {
        let captures: Vec<LegalMove> = moves
            .iter()
            .copied()
            .filter(LegalMove::is_capture)
            .collect();
        if !captures.is_empty() {
            return if self.rank_captures {
                best_captures(captures)
            } else {
                captures
            };
        }

        let promotions: Vec<LegalMove> = moves.iter().copied().filter(|lm| lm.promotes).collect();
        if !promotions.is_empty() {
            return promotions;
        }

        for group in self.difficulty.tiers() {
            let tier: Vec<LegalMove> = moves
                .iter()
                .copied()
                .filter(|lm| group.contains(&lm.material.piece()))
                .collect();
            if !tier.is_empty() {
                return tier;
            }
        }
        moves.to_vec()
    }
}

/// Keeps the captures taking the most valuable material, then among those
/// the ones made by the least valuable piece.
fn best_captures(captures: Vec<LegalMove>) -> Vec<LegalMove> {
    let taken = |lm: &LegalMove| lm.captured.map_or(0, |m| m.piece().value());
    let Some(most) = captures.iter().map(taken).max() else {
        return captures;
    };
    let captures: Vec<LegalMove> = captures.into_iter().filter(|lm| taken(lm) == most).collect();
    let Some(least) = captures.iter().map(|lm| lm.material.piece().value()).min() else {
        return captures;
    };
    captures
        .into_iter()
        .filter(|lm| lm.material.piece().value() == least)
        .collect()
}

impl MoveStrategy for HeuristicPolicy {
    fn name(&self) -> &str {
        "heuristic"
    }

    #[cfg(feature = "random")]
    fn choose(&mut self, moves: &[LegalMove]) -> Option<LegalMove> {
        self.candidates(moves).choose(&mut self.rng).copied()
    }

    #[cfg(not(feature = "random"))]
    fn choose(&mut self, moves: &[LegalMove]) -> Option<LegalMove> {
        self.candidates(moves).first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;
    use Square::*;

    fn black_moves(position: Position) -> Vec<LegalMove> {
        position.legal_moves_for(Color::Black)
    }

    fn captures_position() -> Position {
        Position::empty()
            .with(E1, Material::WK)
            .with(E8, Material::BK)
            .with(C6, Material::BN)
            .with(D4, Material::WP)
            .with(B4, Material::WR)
            .with(A5, Material::BP)
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("advanced".parse::<Difficulty>(), Ok(Difficulty::Advanced));
        assert_eq!("Medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default(), Difficulty::Beginner);
        assert_eq!(Difficulty::Medium.rating(), 1300);
    }

    #[test]
    fn test_only_captures_when_available() {
        let moves = black_moves(captures_position());
        let candidates = HeuristicPolicy::new(Difficulty::Beginner).candidates(&moves);
        assert_eq!(candidates.len(), 3);
        assert!(candidates.iter().all(|lm| lm.is_capture()));
    }

    #[test]
    fn test_ranked_captures() {
        let moves = black_moves(captures_position());
        let candidates = HeuristicPolicy::new(Difficulty::Advanced).candidates(&moves);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].mv, Move::new(A5, B4));

        let unranked = HeuristicPolicy::new(Difficulty::Advanced)
            .with_capture_ranking(false)
            .candidates(&moves);
        assert_eq!(unranked.len(), 3);
    }

    #[test]
    fn test_promotions_before_quiet_moves() {
        let position = Position::empty()
            .with(G1, Material::WK)
            .with(E8, Material::BK)
            .with(B2, Material::BP)
            .with(H8, Material::BR);
        let moves = black_moves(position);
        for difficulty in [Difficulty::Beginner, Difficulty::Advanced] {
            let candidates = HeuristicPolicy::new(difficulty).candidates(&moves);
            assert_eq!(candidates.len(), 1);
            assert_eq!(candidates[0].mv, Move::new(B2, B1));
            assert!(candidates[0].promotes);
        }
    }

    #[test]
    fn test_piece_tiers() {
        let position = Position::empty()
            .with(E1, Material::WK)
            .with(E8, Material::BK)
            .with(H8, Material::BR)
            .with(B8, Material::BN)
            .with(A7, Material::BP);
        let moves = black_moves(position);
        assert!(moves.iter().all(|lm| !lm.is_capture() && !lm.promotes));

        let pieces = |difficulty| -> Vec<Piece> {
            HeuristicPolicy::new(difficulty)
                .candidates(&moves)
                .iter()
                .map(|lm| lm.material.piece())
                .collect()
        };
        let beginner = pieces(Difficulty::Beginner);
        assert_eq!(beginner, vec![Pawn, Pawn]);
        let medium = pieces(Difficulty::Medium);
        assert_eq!(medium.len(), 3);
        assert!(medium.iter().all(|&p| p == Knight));
        let advanced = pieces(Difficulty::Advanced);
        assert!(!advanced.is_empty());
        assert!(advanced.iter().all(|&p| p == Rook));
    }

    #[test]
    fn test_fallback_to_any_move() {
        let position = Position::empty()
            .with(E1, Material::WK)
            .with(E8, Material::BK);
        let moves = black_moves(position);
        let candidates = HeuristicPolicy::new(Difficulty::Beginner).candidates(&moves);
        assert_eq!(candidates, moves);
        assert_eq!(candidates.len(), 5);
    }

    #[test]
    fn test_no_moves() {
        let mut policy = HeuristicPolicy::new(Difficulty::Medium);
        assert_eq!(policy.choose(&[]), None);
        assert_eq!(FirstMove.choose(&[]), None);
    }

    #[test]
    fn test_select_move_is_legal() {
        let position = Position::standard();
        let mut policy = HeuristicPolicy::new(Difficulty::Medium);
        let choice = select_move(&mut policy, &position, Color::Black).unwrap();
        assert_eq!(choice.material, Material::BN);
        assert!(position.is_legal_move(choice.mv, Color::Black));
    }

    #[cfg(feature = "random")]
    #[test]
    fn test_seeded_policy_is_repeatable() {
        let moves = Position::standard().legal_moves_for(Color::White);
        let picks = |seed| {
            let mut policy = HeuristicPolicy::seeded(Difficulty::Beginner, seed);
            (0..10).map(|_| policy.choose(&moves)).collect::<Vec<_>>()
        };
        assert_eq!(picks(7), picks(7));
        let mut random = RandomMove::seeded(3);
        for _ in 0..20 {
            let lm = random.choose(&moves).unwrap();
            assert!(moves.contains(&lm));
        }
    }
}
