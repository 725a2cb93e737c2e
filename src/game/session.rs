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
use std::time::Duration;
use tracing::{debug, info, warn};

use super::clock::ChessClock;
use super::history::MoveRecord;
use super::policy::{select_move, HeuristicPolicy, MoveStrategy, BOT_PROMOTION};
use super::state::{GameState, Phase, Status};
use super::timer::{TimerId, Timers};
use super::GameResult;
use crate::board::{Color, Mask, Move, MoveError, Promotion, Square};
use crate::config::GameConfig;

const CLOCK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// One human against the automated opponent, which plays the other color.
    VersusBot { human: Color },
    /// Two humans sharing one board.
    Local,
}

impl Mode {
    pub fn bot_side(&self) -> Option<Color> {
        match self {
            Mode::VersusBot { human } => Some(!*human),
            Mode::Local => None,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::VersusBot {
            human: Color::White,
        }
    }
}

/// Something the play screen should tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    MoveRejected(MoveError),
    PromotionRequired(Square),
    BotMoved(MoveRecord),
    GameOver(GameResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEvent {
    BotMove,
    ClockTick,
}

/// Drives one board: accepts human input, schedules the automated
/// opponent, runs the clock and replaces the `GameState` on every
/// transition. Time is logical and only moves forward through `advance`.
pub struct GameSession {
    config: GameConfig,
    state: GameState,
    clock: Option<ChessClock>,
    strategy: Box<dyn MoveStrategy>,
    timers: Timers<SessionEvent>,
    bot_timer: Option<TimerId>,
    clock_timer: Option<TimerId>,
    notices: Vec<Notice>,
}

impl GameSession {
    /// A session in the `Setup` phase using the heuristic opponent.
    pub fn new(config: GameConfig) -> Self {
        let strategy = Box::new(
            HeuristicPolicy::new(config.difficulty).with_capture_ranking(config.rank_captures),
        );
        Self::with_strategy(config, strategy)
    }

    pub fn with_strategy(config: GameConfig, strategy: Box<dyn MoveStrategy>) -> Self {
        Self {
            config,
            state: GameState::new(),
            clock: config.time_control.map(ChessClock::new),
            strategy,
            timers: Timers::new(),
            bot_timer: None,
            clock_timer: None,
            notices: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.teardown();
        self.clock = self.config.time_control.map(ChessClock::new);
        info!(mode = ?self.config.mode, "session started");
        let next = self.state.start();
        self.commit(next);
    }

    /// Back to `Setup` with a fresh board. Pending timers never fire.
    pub fn reset(&mut self) {
        self.teardown();
        self.clock = self.config.time_control.map(ChessClock::new);
        self.state = self.state.reset();
        self.notices.clear();
        info!("session reset");
    }

    /// Applies new settings and resets. A new opponent is built from them.
    pub fn configure(&mut self, config: GameConfig) {
        self.config = config;
        self.strategy = Box::new(
            HeuristicPolicy::new(config.difficulty).with_capture_ranking(config.rank_captures),
        );
        self.reset();
    }

    pub fn attempt_move(&mut self, from: Square, to: Square) -> Result<(), MoveError> {
        let mv = Move::new(from, to);
        let attempt = match self.config.mode {
            Mode::VersusBot { human } => self.state.attempt_move_as(human, mv),
            Mode::Local => self.state.attempt_move(mv),
        };
        match attempt {
            Ok(next) => {
                self.commit(next);
                Ok(())
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    /// A piece dragged from the square named by a `"row,col"` payload.
    pub fn attempt_drop(&mut self, payload: &str, to: Square) -> Result<(), MoveError> {
        match Square::from_row_col(payload) {
            Ok(from) => self.attempt_move(from, to),
            Err(err) => Err(self.reject(err.into())),
        }
    }

    pub fn choose_promotion(&mut self, promotion: Promotion) -> Result<(), MoveError> {
        match self.state.choose_promotion(promotion) {
            Ok(next) => {
                self.commit(next);
                Ok(())
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Moves logical time forward by `elapsed`, firing due timers in order.
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.timers.now() + elapsed;
        while let Some((id, event)) = self.timers.pop_due(until) {
            match event {
                SessionEvent::BotMove if self.bot_timer == Some(id) => {
                    self.bot_timer = None;
                    self.play_bot_move();
                }
                SessionEvent::ClockTick if self.clock_timer == Some(id) => self.tick_clock(),
                _ => debug!(?id, ?event, "stale timer ignored"),
            }
        }
        self.timers.advance_to(until);
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }
    #[inline]
    pub fn status(&self) -> Status {
        self.state.status()
    }
    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
    #[inline]
    pub fn clock(&self) -> Option<&ChessClock> {
        self.clock.as_ref()
    }
    /// Whether the automated opponent is waiting out its think delay.
    pub fn bot_thinking(&self) -> bool {
        self.bot_timer.is_some()
    }

    /// Highlight squares for a human picking up the piece on `from`.
    pub fn legal_destinations(&self, from: Square) -> Mask {
        if self.config.mode.bot_side() == Some(self.state.turn()) {
            return Mask::empty();
        }
        self.state.legal_destinations(from)
    }

    fn reject(&mut self, err: MoveError) -> MoveError {
        warn!(%err, "move rejected");
        self.notices.push(Notice::MoveRejected(err.clone()));
        err
    }

    fn play_bot_move(&mut self) {
        let Some(side) = self.config.mode.bot_side() else {
            return;
        };
        if self.state.phase() != Phase::Playing
            || self.state.pending_promotion().is_some()
            || self.state.turn() != side
        {
            debug!("bot timer fired out of turn");
            return;
        }
        let Some(choice) = select_move(self.strategy.as_mut(), self.state.position(), side) else {
            warn!(%side, "no move available for the automated side");
            return;
        };
        let next = self
            .state
            .attempt_move_as(side, choice.mv)
            .and_then(|next| match next.pending_promotion() {
                Some(_) => next.choose_promotion(BOT_PROMOTION),
                None => Ok(next),
            });
        match next {
            Ok(next) => {
                if let Some(record) = next.history().last() {
                    self.notices.push(Notice::BotMoved(record.clone()));
                }
                self.commit(next);
            }
            Err(err) => warn!(%err, mv = %choice.mv, "automated move rejected"),
        }
    }

    fn tick_clock(&mut self) {
        let Some(clock) = self.clock.as_mut() else {
            return;
        };
        if let Some(flagged) = clock.tick(CLOCK_PERIOD) {
            info!(%flagged, "time expired");
            let next = self.state.expire(flagged);
            self.commit(next);
        }
    }

    /// Installs `next` and brings timers, clock and notices in line with it.
    fn commit(&mut self, next: GameState) {
        let was_playing = self.state.phase() == Phase::Playing;
        self.state = next;
        self.cancel_timers();

        if self.state.phase() != Phase::Playing {
            if let Some(clock) = self.clock.as_mut() {
                clock.stop();
            }
            match self.state.result() {
                Some(result) if was_playing => self.notices.push(Notice::GameOver(result)),
                _ => {}
            }
            return;
        }

        if let Some(square) = self.state.pending_promotion() {
            if let Some(clock) = self.clock.as_mut() {
                clock.stop();
            }
            self.notices.push(Notice::PromotionRequired(square));
            return;
        }

        let turn = self.state.turn();
        if let Some(clock) = self.clock.as_mut() {
            clock.start(turn);
            self.clock_timer = Some(
                self.timers
                    .schedule_repeating(CLOCK_PERIOD, SessionEvent::ClockTick),
            );
        }
        if self.config.mode.bot_side() == Some(turn) {
            debug!(delay = ?self.config.think_delay, "automated move scheduled");
            self.bot_timer = Some(
                self.timers
                    .schedule(self.config.think_delay, SessionEvent::BotMove),
            );
        }
    }

    fn cancel_timers(&mut self) {
        for id in [self.bot_timer.take(), self.clock_timer.take()].into_iter().flatten() {
            self.timers.cancel(id);
        }
    }

    fn teardown(&mut self) {
        self.timers.cancel_all();
        self.bot_timer = None;
        self.clock_timer = None;
    }
}
