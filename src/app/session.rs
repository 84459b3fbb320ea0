//! 会话编排：把点击和定时器回调翻译成动作序列，并广播游戏事件。

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{transition, Action, CardColor, GameOutcome, GameState};

/// 编排层对外广播的事件，渲染、定时器和诊断日志都由它驱动。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    CardFlipped { index: usize },
    MatchFound { color: CardColor, score: u32 },
    MatchFailed { first: usize, second: usize },
    CardsFlippedBack,
    TurnCompleted { turns: u32 },
    GameWon { score: u32, turns: u32 },
    TurnLimitReached { turns: u32 },
    GameRestarted,
}

/// 一局游戏的运行时外壳。
///
/// 状态本身只通过 `rules::transition` 演进；这里补上次序约定
/// （先判定配对再累计回合）、点击拦截和翻回定时器的纪元管理。
pub struct Session {
    state: GameState,
    epoch: u64,
    rng: SmallRng,
}

impl Session {
    /// 种子决定整个会话：首局牌序和之后每次重开的牌序。
    pub fn new(seed: u64) -> Self {
        Self {
            state: GameState::from_seed(seed),
            epoch: 0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        let mut rng = SmallRng::from_entropy();
        Self::new(rng.gen())
    }

    pub fn with_turn_limit(mut self, turn_limit: u32) -> Self {
        self.state = self.state.with_turn_limit(turn_limit);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// 当前翻回定时器的纪元。重开局会使旧纪元全部失效。
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// 处理一次卡牌点击。被拦截或被归约器拒绝时返回空事件。
    pub fn card_clicked(&mut self, index: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state.is_finished()
            || self.state.flipped.len() >= 2
            || self.state.flipped.contains(&index)
        {
            return events;
        }

        let queued_before = self.state.flipped.len();
        self.state = transition(&self.state, &Action::FlipCard { index });
        if self.state.flipped.len() == queued_before {
            // 归约器拒绝了这次翻牌（已配对的花色或越界下标）
            return events;
        }
        events.push(GameEvent::CardFlipped { index });

        if self.state.flipped.len() == 2 {
            self.complete_turn(&mut events);
        }
        events
    }

    /// 第二张牌落定后的固定次序：先判定配对，再累计回合。
    /// 两步之间没有任何外部输入能插进来。
    fn complete_turn(&mut self, events: &mut Vec<GameEvent>) {
        let (first, second) = match self.state.flipped.as_slice() {
            &[first, second] => (first, second),
            _ => return,
        };

        let score_before = self.state.score;
        self.state = transition(&self.state, &Action::CheckMatch);
        if self.state.score > score_before {
            if let Some(&color) = self.state.matched.last() {
                events.push(GameEvent::MatchFound {
                    color,
                    score: self.state.score,
                });
            }
        } else {
            events.push(GameEvent::MatchFailed { first, second });
        }

        self.state = transition(&self.state, &Action::IncrementTurn);
        events.push(GameEvent::TurnCompleted {
            turns: self.state.turns,
        });

        match self.state.outcome() {
            Some(GameOutcome::Won { score, turns }) => {
                events.push(GameEvent::GameWon { score, turns });
            }
            Some(GameOutcome::OutOfTurns { turns, .. }) => {
                events.push(GameEvent::TurnLimitReached { turns });
            }
            None => {}
        }
    }

    /// 翻回定时器到期。纪元不匹配说明局面已经重开，直接忽略。
    pub fn flip_back_elapsed(&mut self, epoch: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if epoch != self.epoch || !self.state.pending_reset {
            return events;
        }
        self.state = transition(&self.state, &Action::ResetFlipped);
        events.push(GameEvent::CardsFlippedBack);
        events
    }

    /// 重开一局：换新牌序、清零计数，并让未到期的翻回定时器作废。
    pub fn play_again(&mut self) -> Vec<GameEvent> {
        self.epoch = self.epoch.wrapping_add(1);
        let seed = self.rng.gen();
        self.state = transition(&self.state, &Action::ResetGame { seed });
        vec![GameEvent::GameRestarted]
    }
}
