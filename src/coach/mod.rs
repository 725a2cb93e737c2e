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

//! Requests to an external coaching service
//!
//! The coaching service suggests moves during tutorials and reviews
//! finished games. How it produces its answers is not this crate's
//! concern: a `Coach` is a black box that may fail at any time. The
//! helpers here build requests from a borrowed `GameState` and turn
//! failures into `Feedback::Unavailable` so a play screen never breaks
//! because the service is down.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::game::{Difficulty, GameState};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoachError {
    #[error("coaching is not enabled")]
    Disabled,
    #[error("coaching request failed: {0}")]
    RequestFailed(String),
    #[error("failed to parse coaching response: {0}")]
    ParseError(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub fen: String,
    /// Movetext so far; empty before the first move.
    pub move_history: String,
    /// The tutorial step or topic being studied.
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

impl SuggestionRequest {
    pub fn for_game(state: &GameState, topic: impl Into<String>, question: Option<String>) -> Self {
        let move_history = if state.history().is_empty() {
            String::new()
        } else {
            state.movetext()
        };
        Self {
            fen: state.fen(),
            move_history,
            topic: topic.into(),
            question,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// A move in algebraic notation, or a short tip when no move fits.
    #[serde(rename = "move")]
    pub mv: String,
    pub explanation: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub game_history: String,
    pub player_rating: u16,
    pub opponent_rating: u16,
    pub user_name: String,
}

impl AnalysisRequest {
    /// A review of a game against the automated opponent at `difficulty`.
    pub fn for_game(
        state: &GameState,
        user_name: impl Into<String>,
        player_rating: u16,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            game_history: state.movetext(),
            player_rating,
            opponent_rating: difficulty.rating(),
            user_name: user_name.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub key_mistakes: Vec<String>,
    pub improvement_tips: Vec<String>,
}

pub trait Coach {
    fn name(&self) -> &str;
    fn suggest(&self, request: &SuggestionRequest) -> Result<Suggestion, CoachError>;
    fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis, CoachError>;
}

/// Stands in when no coaching service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCoach;

impl Coach for DisabledCoach {
    fn name(&self) -> &str {
        "disabled"
    }
    fn suggest(&self, _request: &SuggestionRequest) -> Result<Suggestion, CoachError> {
        Err(CoachError::Disabled)
    }
    fn analyze(&self, _request: &AnalysisRequest) -> Result<Analysis, CoachError> {
        Err(CoachError::Disabled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback<T> {
    Ready(T),
    Unavailable(String),
}

impl<T> Feedback<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Feedback::Ready(value) => Some(value),
            Feedback::Unavailable(_) => None,
        }
    }
}

fn degrade<T>(coach: &str, result: Result<T, CoachError>) -> Feedback<T> {
    match result {
        Ok(value) => Feedback::Ready(value),
        Err(err) => {
            warn!(coach, %err, "coaching unavailable");
            Feedback::Unavailable(err.to_string())
        }
    }
}

pub fn request_suggestion<C>(
    coach: &C,
    state: &GameState,
    topic: &str,
    question: Option<String>,
) -> Feedback<Suggestion>
where
    C: Coach + ?Sized,
{
    let request = SuggestionRequest::for_game(state, topic, question);
    degrade(coach.name(), coach.suggest(&request))
}

/// Asks for a review of `state`'s game. A game without moves has nothing to
/// review and is answered without calling the coach.
pub fn request_analysis<C>(
    coach: &C,
    state: &GameState,
    user_name: &str,
    player_rating: u16,
    difficulty: Difficulty,
) -> Feedback<Analysis>
where
    C: Coach + ?Sized,
{
    if state.history().is_empty() {
        return Feedback::Unavailable("no moves to analyze".to_string());
    }
    let request = AnalysisRequest::for_game(state, user_name, player_rating, difficulty);
    degrade(coach.name(), coach.analyze(&request))
}
