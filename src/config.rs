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

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::board::Color;
use crate::game::{Difficulty, Mode, TimeControl};

pub const TIME_CONTROL_VAR: &str = "CHESS_TIME_CONTROL";
pub const DIFFICULTY_VAR: &str = "CHESS_AI_DIFFICULTY";
pub const THINK_MS_VAR: &str = "CHESS_AI_THINK_MS";
pub const MODE_VAR: &str = "CHESS_MODE";
pub const HUMAN_COLOR_VAR: &str = "CHESS_HUMAN_COLOR";

/// Settings chosen on a play screen before a game starts.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub mode: Mode,
    /// `None` plays without a clock.
    pub time_control: Option<TimeControl>,
    pub difficulty: Difficulty,
    /// How long the automated opponent waits before moving.
    pub think_delay: Duration,
    pub rank_captures: bool,
}

impl GameConfig {
    pub const DEFAULT_THINK_DELAY: Duration = Duration::from_millis(700);

    /// Reads overrides from the environment. Invalid values are logged and
    /// replaced by their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env` but reading variables through `lookup`.
    pub fn from_lookup<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        Self::resolve(&lookup, false).unwrap_or_default()
    }

    /// Reads overrides through `lookup`, failing on the first invalid value.
    pub fn try_from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        Self::resolve(&lookup, true)
    }

    fn resolve<L>(lookup: &L, strict: bool) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let time_control = settle(field(lookup, TIME_CONTROL_VAR, parse_time_control), strict)?
            .unwrap_or(defaults.time_control);
        let difficulty = settle(field(lookup, DIFFICULTY_VAR, parse_difficulty), strict)?
            .unwrap_or(defaults.difficulty);
        let think_delay = settle(field(lookup, THINK_MS_VAR, parse_millis), strict)?
            .unwrap_or(defaults.think_delay);
        let human = settle(field(lookup, HUMAN_COLOR_VAR, parse_color), strict)?
            .unwrap_or(Color::White);
        let mode = settle(field(lookup, MODE_VAR, |raw| parse_mode(raw, human)), strict)?
            .unwrap_or(Mode::VersusBot { human });
        Ok(Self {
            mode,
            time_control,
            difficulty,
            think_delay,
            rank_captures: difficulty.ranks_captures(),
        })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let difficulty = Difficulty::default();
        Self {
            mode: Mode::default(),
            time_control: Some(TimeControl::default()),
            difficulty,
            think_delay: Self::DEFAULT_THINK_DELAY,
            rank_captures: difficulty.ranks_captures(),
        }
    }
}

fn field<L, T, P>(lookup: &L, key: &str, parse: P) -> Result<Option<T>>
where
    L: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Result<T>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => parse(raw.trim())
            .with_context(|| format!("invalid {key} `{raw}`"))
            .map(Some),
    }
}

fn settle<T>(value: Result<Option<T>>, strict: bool) -> Result<Option<T>> {
    match value {
        Err(err) if !strict => {
            warn!("{err:#}; using the default");
            Ok(None)
        }
        other => other,
    }
}

fn parse_time_control(raw: &str) -> Result<Option<TimeControl>> {
    if raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let secs: u64 = raw.parse().context("expected seconds or `none`")?;
    if secs == 0 {
        return Err(anyhow!("a time control must be at least one second"));
    }
    Ok(Some(TimeControl::from_secs(secs)))
}

fn parse_difficulty(raw: &str) -> Result<Difficulty> {
    raw.parse()
        .context("expected `beginner`, `medium` or `advanced`")
}

fn parse_millis(raw: &str) -> Result<Duration> {
    let millis: u64 = raw.parse().context("expected milliseconds")?;
    Ok(Duration::from_millis(millis))
}

fn parse_color(raw: &str) -> Result<Color> {
    raw.parse().context("expected `white` or `black`")
}

fn parse_mode(raw: &str, human: Color) -> Result<Mode> {
    match raw.to_ascii_lowercase().as_str() {
        "bot" => Ok(Mode::VersusBot { human }),
        "local" => Ok(Mode::Local),
        _ => Err(anyhow!("expected `bot` or `local`")),
    }
}
