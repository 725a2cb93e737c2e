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

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::Display;
use thiserror::Error;
use tracing::{debug, info};

use super::history::{movetext, MoveId, MoveRecord};
use super::{DrawReason, GameResult, WinReason};
use crate::board::{
    fen, to_san, Attacks, Color, LegalMoves, Mask, Material, Move, MoveError, Position,
    Promotion, PseudoMoves, Square,
};

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Setup,
    Playing,
    Ended,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("{0} must have exactly one king, found {1}")]
    KingCount(Color, usize),
    #[error("{0} is in check but it is not {0}'s move")]
    OpponentInCheck(Color),
}

/// A pawn that has reached its promotion row and is waiting for the mover to
/// pick a piece.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
struct PendingPromotion {
    mv: Move,
    material: Material,
    captured: Option<Material>,
    before: Position,
}

/// Everything a play screen shows about the game in one value.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub phase: Phase,
    pub turn: Color,
    pub check: Option<(Color, Square)>,
    pub result: Option<GameResult>,
    pub pending_promotion: Option<Square>,
}

/// A snapshot of a game. Transitions never modify the receiver; they return
/// the next state, or a `MoveError` and no state at all.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GameState {
    position: Position,
    move_id: MoveId,
    phase: Phase,
    result: Option<GameResult>,
    pending: Option<PendingPromotion>,
    last_move: Option<Move>,
    history: Vec<MoveRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A standard board in the `Setup` phase.
    pub fn new() -> Self {
        Self {
            position: Position::standard(),
            move_id: MoveId::START,
            phase: Phase::Setup,
            result: None,
            pending: None,
            last_move: None,
            history: Vec::new(),
        }
    }

    /// A fresh standard game in the `Playing` phase, white to move.
    pub fn start(&self) -> Self {
        info!("game started");
        Self {
            phase: Phase::Playing,
            ..Self::new()
        }
    }

    pub fn reset(&self) -> Self {
        Self::new()
    }

    /// Play from an arbitrary arrangement, e.g. a tutorial exercise. The
    /// side to move may already be mated or stalemated, in which case the
    /// returned state has ended. The other side must not be in check, or
    /// its king could be taken.
    pub fn from_position(position: Position, turn: Color) -> Result<Self, PositionError> {
        for color in Color::iter() {
            let kings = position.kings(color).len();
            if kings != 1 {
                return Err(PositionError::KingCount(color, kings));
            }
        }
        if position.is_check(!turn) {
            return Err(PositionError::OpponentInCheck(!turn));
        }
        let state = Self {
            position,
            move_id: MoveId::new(0, turn),
            phase: Phase::Playing,
            ..Self::new()
        };
        Ok(state.evaluate())
    }

    /// Rebuilds a game from the standard start. Each entry's promotion is
    /// required when its move reaches the promotion row.
    pub fn replay(moves: &[(Move, Option<Promotion>)]) -> anyhow::Result<Self> {
        let mut state = Self::new().start();
        for (ply, (mv, promotion)) in moves.iter().enumerate() {
            state = state
                .attempt_move(*mv)
                .with_context(|| format!("ply {}: {mv}", ply + 1))?;
            if state.pending_promotion().is_some() {
                let promotion =
                    promotion.ok_or_else(|| anyhow!("ply {}: {mv} needs a promotion", ply + 1))?;
                state = state
                    .choose_promotion(promotion)
                    .with_context(|| format!("ply {}: {mv}={promotion}", ply + 1))?;
            }
        }
        Ok(state)
    }

    /// Submits a move for whichever side owns the piece on `mv.from`.
    pub fn attempt_move(&self, mv: Move) -> Result<Self, MoveError> {
        self.ready_for_move()?;
        let material = self.position.contents(mv.from).ok_or(MoveError::IllegalMove)?;
        self.validate(mv, material.color())?;
        Ok(self.commit(mv, material))
    }

    /// Submits a move on behalf of `side`, which must be the side to move.
    pub fn attempt_move_as(&self, side: Color, mv: Move) -> Result<Self, MoveError> {
        self.ready_for_move()?;
        if side != self.turn() {
            return Err(MoveError::NotYourTurn);
        }
        let material = self.position.contents(mv.from).ok_or(MoveError::IllegalMove)?;
        self.validate(mv, material.color())?;
        Ok(self.commit(mv, material))
    }

    pub fn choose_promotion(&self, promotion: Promotion) -> Result<Self, MoveError> {
        let pending = self.pending.ok_or(MoveError::NoPendingPromotion)?;
        let mut next = self.clone();
        next.pending = None;
        next.position
            .place(pending.mv.to, pending.material.with_piece(promotion.into()));
        next.record(&pending, Some(promotion));
        next.move_id = next.move_id.next();
        Ok(next.evaluate())
    }

    /// `side` has run out of time. Only meaningful while playing.
    pub fn expire(&self, side: Color) -> Self {
        if self.phase != Phase::Playing {
            return self.clone();
        }
        let mut next = self.clone();
        next.pending = None;
        next.finish(GameResult::Win(!side, WinReason::TimeExpired));
        next
    }

    fn ready_for_move(&self) -> Result<(), MoveError> {
        if self.phase != Phase::Playing {
            return Err(MoveError::WrongPhase);
        }
        if self.pending.is_some() {
            return Err(MoveError::PromotionPending);
        }
        Ok(())
    }

    fn validate(&self, mv: Move, color: Color) -> Result<(), MoveError> {
        if color != self.turn() {
            return Err(MoveError::NotYourTurn);
        }
        if !self.position.is_legal_move(mv, color) {
            return Err(MoveError::IllegalMove);
        }
        Ok(())
    }

    fn commit(&self, mv: Move, material: Material) -> Self {
        let mut next = self.clone();
        let promotes = self.position.is_promotion(mv);
        let captured = next.position.apply(mv);
        next.last_move = Some(mv);
        let played = PendingPromotion {
            mv,
            material,
            captured,
            before: self.position,
        };
        debug!(%mv, "move accepted");

        if captured.is_some_and(|taken| taken.piece().is_king()) {
            next.record(&played, None);
            next.finish(GameResult::Win(material.color(), WinReason::KingCaptured));
            return next;
        }
        if promotes {
            next.pending = Some(played);
            return next;
        }
        next.record(&played, None);
        next.move_id = next.move_id.next();
        next.evaluate()
    }

    fn record(&mut self, played: &PendingPromotion, promotion: Option<Promotion>) {
        self.history.push(MoveRecord {
            id: self.move_id,
            mv: played.mv,
            material: played.material,
            captured: played.captured,
            promotion,
            san: to_san(&played.before, played.mv, promotion),
        });
    }

    /// Decides whether the side now to move can continue.
    fn evaluate(mut self) -> Self {
        let side = self.turn();
        if !self.position.can_move(side) {
            let result = if self.position.is_check(side) {
                GameResult::Win(!side, WinReason::Checkmate)
            } else {
                GameResult::Draw(DrawReason::Stalemate)
            };
            self.finish(result);
        }
        self
    }

    fn finish(&mut self, result: GameResult) {
        info!(reason = %result.reason(), "game over");
        self.phase = Phase::Ended;
        self.result = Some(result);
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }
    /// The side to move. During a pending promotion this is still the side
    /// that moved the pawn.
    #[inline]
    pub fn turn(&self) -> Color {
        self.move_id.turn()
    }
    #[inline]
    pub fn move_id(&self) -> MoveId {
        self.move_id
    }
    #[inline]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }
    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending.map(|pending| pending.mv.to)
    }
    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }
    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn check(&self) -> Option<(Color, Square)> {
        self.position.checked_king()
    }

    pub fn status(&self) -> Status {
        Status {
            phase: self.phase,
            turn: self.turn(),
            check: self.check(),
            result: self.result,
            pending_promotion: self.pending_promotion(),
        }
    }

    /// Squares to highlight for the piece on `from`; empty unless that piece
    /// belongs to the side to move and a move could be submitted now.
    pub fn legal_destinations(&self, from: Square) -> Mask {
        if self.ready_for_move().is_err() {
            return Mask::empty();
        }
        self.legal_moves(from, Some(self.turn()))
    }

    pub fn fen(&self) -> String {
        fen(&self.position, self.turn(), self.move_id.move_number())
    }

    pub fn movetext(&self) -> String {
        movetext(&self.history, self.result.as_ref())
    }
}

impl AsRef<Position> for GameState {
    fn as_ref(&self) -> &Position {
        &self.position
    }
}

impl PseudoMoves for GameState {}

impl Attacks for GameState {}

impl LegalMoves for GameState {}

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

    fn playing() -> GameState {
        GameState::new().start()
    }

    #[test]
    fn test_new_game_is_in_setup() {
        let state = GameState::new();
        assert_eq!(state.phase(), Phase::Setup);
        assert_eq!(state.turn(), Color::White);
        assert_eq!(
            state.attempt_move(Move::new(E2, E4)),
            Err(MoveError::WrongPhase)
        );
        assert!(state.legal_destinations(E2).is_empty());
    }

    #[test]
    fn test_first_move_and_turn_passing() {
        let state = playing();
        let next = state.attempt_move(Move::new(E2, E4)).unwrap();
        assert_eq!(next.position().contents(E4), Some(Material::WP));
        assert_eq!(next.turn(), Color::Black);
        assert_eq!(next.last_move(), Some(Move::new(E2, E4)));
        assert_eq!(next.history().len(), 1);
        assert_eq!(next.history()[0].san, "e4");
        assert_eq!(
            next.attempt_move(Move::new(D2, D4)),
            Err(MoveError::NotYourTurn)
        );
        // receiver is untouched
        assert_eq!(state.position().contents(E2), Some(Material::WP));
        assert_eq!(state.turn(), Color::White);
    }

    #[test]
    fn test_rejections_leave_state_unchanged() {
        let state = playing();
        assert_eq!(state.attempt_move(Move::new(E2, E5)), Err(MoveError::IllegalMove));
        assert_eq!(state.attempt_move(Move::new(E4, E5)), Err(MoveError::IllegalMove));
        assert_eq!(state.attempt_move(Move::new(E7, E5)), Err(MoveError::NotYourTurn));
        assert_eq!(
            state.attempt_move_as(Color::Black, Move::new(E7, E5)),
            Err(MoveError::NotYourTurn)
        );
        assert_eq!(
            state.attempt_move_as(Color::White, Move::new(E7, E5)),
            Err(MoveError::NotYourTurn)
        );
        assert_eq!(state, playing());
    }

    #[test]
    fn test_promotion_flow() {
        let position = kings().with(B7, Material::WP);
        let state = GameState::from_position(position, Color::White).unwrap();
        let pending = state.attempt_move(Move::new(B7, B8)).unwrap();
        assert_eq!(pending.pending_promotion(), Some(B8));
        assert_eq!(pending.turn(), Color::White);
        assert_eq!(pending.phase(), Phase::Playing);
        assert!(pending.history().is_empty());
        assert_eq!(
            pending.attempt_move(Move::new(E1, E2)),
            Err(MoveError::PromotionPending)
        );
        assert_eq!(
            pending.attempt_move(Move::new(E8, E7)),
            Err(MoveError::PromotionPending)
        );

        let promoted = pending.choose_promotion(Promotion::Queen).unwrap();
        assert_eq!(promoted.position().contents(B8), Some(Material::WQ));
        assert_eq!(promoted.turn(), Color::Black);
        assert_eq!(promoted.pending_promotion(), None);
        assert_eq!(promoted.history()[0].san, "b8=Q+");
        assert_eq!(promoted.check(), Some((Color::Black, E8)));
        assert_eq!(
            promoted.choose_promotion(Promotion::Rook),
            Err(MoveError::NoPendingPromotion)
        );
    }

    #[test]
    fn test_underpromotion() {
        let position = kings().with(G2, Material::BP);
        let state = GameState::from_position(position, Color::Black).unwrap();
        let state = state
            .attempt_move(Move::new(G2, G1))
            .and_then(|s| s.choose_promotion(Promotion::Knight))
            .unwrap();
        assert_eq!(state.position().contents(G1), Some(Material::BN));
        assert_eq!(state.turn(), Color::White);
    }

    #[test]
    fn test_checkmate_ends_game() {
        let position = kings()
            .with(A1, Material::WR)
            .with(D7, Material::BP)
            .with(E7, Material::BP)
            .with(F7, Material::BP);
        let state = GameState::from_position(position, Color::White).unwrap();
        let state = state.attempt_move(Move::new(A1, A8)).unwrap();
        assert_eq!(state.phase(), Phase::Ended);
        assert_eq!(
            state.result(),
            Some(GameResult::Win(Color::White, WinReason::Checkmate))
        );
        assert_eq!(state.history()[0].san, "Ra8#");
        assert_eq!(
            state.attempt_move(Move::new(E8, D8)),
            Err(MoveError::WrongPhase)
        );
    }

    #[test]
    fn test_stalemate_ends_game() {
        let position = Position::empty()
            .with(A8, Material::BK)
            .with(B6, Material::WK)
            .with(C4, Material::WQ);
        let state = GameState::from_position(position, Color::White).unwrap();
        let state = state.attempt_move(Move::new(C4, C7)).unwrap();
        assert_eq!(state.phase(), Phase::Ended);
        assert_eq!(state.result(), Some(GameResult::Draw(DrawReason::Stalemate)));
        assert_eq!(state.check(), None);
    }

    #[test]
    fn test_from_position_validates_kings() {
        let missing = Position::empty().with(E1, Material::WK);
        assert_eq!(
            GameState::from_position(missing, Color::White),
            Err(PositionError::KingCount(Color::Black, 0))
        );
        let extra = kings().with(A1, Material::WK);
        assert_eq!(
            GameState::from_position(extra, Color::White),
            Err(PositionError::KingCount(Color::White, 2))
        );
    }

    #[test]
    fn test_from_position_rejects_exposed_king() {
        let position = kings().with(E5, Material::WR);
        assert_eq!(
            GameState::from_position(position, Color::White),
            Err(PositionError::OpponentInCheck(Color::Black))
        );
        // the same board is fine with the checked side to move
        let state = GameState::from_position(position, Color::Black).unwrap();
        assert_eq!(state.phase(), Phase::Playing);
        assert_eq!(state.check(), Some((Color::Black, E8)));
    }

    #[test]
    fn test_king_capture_ends_game() {
        // not reachable through from_position, built directly
        let state = GameState {
            position: kings().with(E5, Material::WR),
            phase: Phase::Playing,
            ..GameState::new()
        };
        let next = state.attempt_move(Move::new(E5, E8)).unwrap();
        let result = GameResult::Win(Color::White, WinReason::KingCaptured);
        assert_eq!(next.phase(), Phase::Ended);
        assert_eq!(next.result(), Some(result));
        assert_eq!(result.reason(), "White captured the Black king");
        assert_eq!(next.position().contents(E8), Some(Material::WR));
        assert_eq!(next.position().king(Color::Black), None);

        let record = &next.history()[0];
        assert_eq!(record.mv, Move::new(E5, E8));
        assert_eq!(record.captured, Some(Material::BK));
        assert_eq!(record.san, "Rxe8");
        assert_eq!(next.movetext(), "1. Rxe8 1-0");
        assert_eq!(
            next.attempt_move(Move::new(E1, E2)),
            Err(MoveError::WrongPhase)
        );
    }

    #[test]
    fn test_from_position_already_mated() {
        let position = Position::empty()
            .with(H8, Material::BK)
            .with(F7, Material::WK)
            .with(G7, Material::WQ);
        let state = GameState::from_position(position, Color::Black).unwrap();
        assert_eq!(
            state.result(),
            Some(GameResult::Win(Color::White, WinReason::Checkmate))
        );
    }

    #[test]
    fn test_expire() {
        let state = playing().expire(Color::White);
        assert_eq!(state.phase(), Phase::Ended);
        assert_eq!(
            state.result(),
            Some(GameResult::Win(Color::Black, WinReason::TimeExpired))
        );
        // a second expiry after the end is ignored
        assert_eq!(state.expire(Color::Black), state);
        assert_eq!(GameState::new().expire(Color::White), GameState::new());
    }

    #[test]
    fn test_reset_after_end() {
        let ended = playing().expire(Color::Black);
        let reset = ended.reset();
        assert_eq!(reset.phase(), Phase::Setup);
        assert_eq!(reset.position(), &Position::standard());
        assert!(reset.history().is_empty());
        let restarted = ended.start();
        assert_eq!(restarted.phase(), Phase::Playing);
        assert_eq!(restarted.turn(), Color::White);
        assert_eq!(restarted.result(), None);
    }

    #[test]
    fn test_replay_fools_mate() {
        let moves = [
            (Move::new(F2, F3), None),
            (Move::new(E7, E5), None),
            (Move::new(G2, G4), None),
            (Move::new(D8, H4), None),
        ];
        let state = GameState::replay(&moves).unwrap();
        assert_eq!(
            state.result(),
            Some(GameResult::Win(Color::Black, WinReason::Checkmate))
        );
        assert_eq!(state.movetext(), "1. f3 e5 2. g4 Qh4# 0-1");
    }

    #[test]
    fn test_replay_reports_first_rejection() {
        let moves = [(Move::new(E2, E4), None), (Move::new(E4, E5), None)];
        let err = GameState::replay(&moves).unwrap_err();
        assert_eq!(err.downcast_ref::<MoveError>(), Some(&MoveError::NotYourTurn));
    }

    #[test]
    fn test_legal_destinations() {
        let state = playing();
        assert_eq!(state.legal_destinations(E2).len(), 2);
        assert!(state.legal_destinations(E7).is_empty());
        assert!(state.legal_destinations(E4).is_empty());
    }

    #[test]
    fn test_status_and_fen() {
        let state = playing().attempt_move(Move::new(E2, E4)).unwrap();
        let status = state.status();
        assert_eq!(status.phase, Phase::Playing);
        assert_eq!(status.turn, Color::Black);
        assert_eq!(status.check, None);
        assert_eq!(
            state.fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b - - 0 1"
        );
    }

    #[test]
    fn test_no_consecutive_moves_by_one_side() {
        let mut state = playing();
        let mut last = None;
        for mv in [
            Move::new(E2, E4),
            Move::new(E7, E5),
            Move::new(G1, F3),
            Move::new(B8, C6),
        ] {
            let mover = state.position().contents(mv.from).map(|m| m.color());
            assert_ne!(mover, last);
            state = state.attempt_move(mv).unwrap();
            last = mover;
        }
        assert_eq!(state.move_id().value(), 4);
    }
}
