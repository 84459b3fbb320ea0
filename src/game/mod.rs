//! 游戏核心逻辑模块（牌堆生成、状态、纯转移函数）。

pub mod deck;
pub mod rules;
pub mod state;

pub use deck::{deck_from_seed, generate_deck, Card, CardColor, DECK_SIZE};
pub use rules::{transition, Action};
pub use state::{GameOutcome, GameState, IntegrityError, DEFAULT_TURN_LIMIT};
