use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::deck::{deck_from_seed, Card, CardColor};

/// 默认回合上限。
pub const DEFAULT_TURN_LIMIT: u32 = 15;

fn default_turn_limit() -> u32 {
    DEFAULT_TURN_LIMIT
}

/// 终局形态：全部配对成功，或回合耗尽。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameOutcome {
    Won { score: u32, turns: u32 },
    OutOfTurns { score: u32, turns: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    UnpairedColor { color: CardColor, count: usize },
    TooManyFlipped { count: usize },
    FlippedOutOfRange { index: usize },
    DuplicateFlipped { index: usize },
    FlippedAlreadyMatched { index: usize },
    DuplicateMatched { color: CardColor },
    MatchedColorMissing { color: CardColor },
    ScoreMismatch { score: u32, matched: usize },
    GameOverMismatch { game_over: bool, matched: usize, pairs: usize },
}

/// 翻牌游戏的完整状态，只通过 `rules::transition` 演进。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub deck: Vec<Card>,
    /// 当前翻开但尚未判定的卡牌下标（最多两个，按翻开顺序）。
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flipped: Vec<usize>,
    /// 已配对成功的花色。
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched: Vec<CardColor>,
    pub turns: u32,
    pub score: u32,
    /// 配对失败后为真，等待延迟翻回。
    #[serde(default)]
    pub pending_reset: bool,
    /// 全部配对完成时为真；回合耗尽不置位，由 `outcome` 统一判定。
    #[serde(default)]
    pub game_over: bool,
    #[serde(default = "default_turn_limit")]
    pub turn_limit: u32,
}

impl GameState {
    pub fn new(deck: Vec<Card>) -> Self {
        Self {
            deck,
            flipped: Vec::new(),
            matched: Vec::new(),
            turns: 0,
            score: 0,
            pending_reset: false,
            game_over: false,
            turn_limit: DEFAULT_TURN_LIMIT,
        }
    }

    /// 用种子生成可复现的新局。
    pub fn from_seed(seed: u64) -> Self {
        Self::new(deck_from_seed(seed))
    }

    pub fn with_turn_limit(mut self, turn_limit: u32) -> Self {
        self.turn_limit = turn_limit;
        self
    }

    /// 这副牌包含的配对总数。
    pub fn pair_count(&self) -> usize {
        self.deck.len() / 2
    }

    pub fn is_matched(&self, color: CardColor) -> bool {
        self.matched.contains(&color)
    }

    /// 渲染意义上的"正面朝上"：处于翻开队列，或所属花色已配对。
    pub fn is_face_up(&self, index: usize) -> bool {
        self.flipped.contains(&index)
            || self
                .deck
                .get(index)
                .map_or(false, |card| self.is_matched(card.color))
    }

    /// 此刻还能不能翻这张牌。越界、重复、已配对、队列已满都不行。
    pub fn can_flip(&self, index: usize) -> bool {
        self.flipped.len() < 2
            && !self.flipped.contains(&index)
            && self
                .deck
                .get(index)
                .map_or(false, |card| !self.is_matched(card.color))
    }

    /// 终局判定。全部配对的胜利优先于回合耗尽。
    pub fn outcome(&self) -> Option<GameOutcome> {
        if self.game_over {
            Some(GameOutcome::Won {
                score: self.score,
                turns: self.turns,
            })
        } else if self.turns >= self.turn_limit {
            Some(GameOutcome::OutOfTurns {
                score: self.score,
                turns: self.turns,
            })
        } else {
            None
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        let mut colors: Vec<CardColor> = Vec::new();
        for card in &self.deck {
            if !colors.contains(&card.color) {
                colors.push(card.color);
            }
        }
        for color in colors {
            let count = self.deck.iter().filter(|card| card.color == color).count();
            if count != 2 {
                return Err(IntegrityError::UnpairedColor { color, count });
            }
        }

        if self.flipped.len() > 2 {
            return Err(IntegrityError::TooManyFlipped {
                count: self.flipped.len(),
            });
        }
        let mut seen = HashSet::new();
        for &index in &self.flipped {
            if index >= self.deck.len() {
                return Err(IntegrityError::FlippedOutOfRange { index });
            }
            if !seen.insert(index) {
                return Err(IntegrityError::DuplicateFlipped { index });
            }
            if self.is_matched(self.deck[index].color) {
                return Err(IntegrityError::FlippedAlreadyMatched { index });
            }
        }

        let mut seen_colors = HashSet::new();
        for &color in &self.matched {
            if !seen_colors.insert(color) {
                return Err(IntegrityError::DuplicateMatched { color });
            }
            if !self.deck.iter().any(|card| card.color == color) {
                return Err(IntegrityError::MatchedColorMissing { color });
            }
        }

        if self.score as usize != self.matched.len() {
            return Err(IntegrityError::ScoreMismatch {
                score: self.score,
                matched: self.matched.len(),
            });
        }

        let complete = self.matched.len() == self.pair_count();
        if self.game_over != complete {
            return Err(IntegrityError::GameOverMismatch {
                game_over: self.game_over,
                matched: self.matched.len(),
                pairs: self.pair_count(),
            });
        }

        Ok(())
    }

    /// 示例中盘状态（已配对一组），方便前端调试。
    pub fn sample() -> Self {
        use super::rules::{transition, Action};

        let mut state = Self::from_seed(7);
        let first_color = state.deck[0].color;
        if let Some(partner) = (1..state.deck.len()).find(|&i| state.deck[i].color == first_color)
        {
            state = transition(&state, &Action::FlipCard { index: 0 });
            state = transition(&state, &Action::FlipCard { index: partner });
            state = transition(&state, &Action::CheckMatch);
            state = transition(&state, &Action::IncrementTurn);
        }
        state
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::from_seed(0)
    }
}
