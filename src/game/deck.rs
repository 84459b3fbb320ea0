//! 牌堆生成：固定调色板，每种花色两张，洗牌后发出。

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// 配对用的卡牌花色。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CardColor {
    Olive,
    Sage,
    White,
    Brown,
}

impl CardColor {
    /// 全部花色，按固定顺序排列。
    pub const ALL: [CardColor; 4] = [
        CardColor::Olive,
        CardColor::Sage,
        CardColor::White,
        CardColor::Brown,
    ];

    /// 渲染层写入 `--card-color` 的 CSS 颜色值。
    pub fn css(self) -> &'static str {
        match self {
            CardColor::Olive => "#6B8E23",
            CardColor::Sage => "#cdd28c",
            CardColor::White => "#FFFFFF",
            CardColor::Brown => "#A52A2A",
        }
    }
}

/// 单张卡牌。是否已配对、是否翻开都记录在 `GameState` 里，牌面本身不变。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub color: CardColor,
}

impl Card {
    pub fn new(color: CardColor) -> Self {
        Self { color }
    }
}

/// 一副牌的张数（每种花色恰好两张）。
pub const DECK_SIZE: usize = CardColor::ALL.len() * 2;

/// 生成一副洗好的牌：每种花色两张，用 Fisher-Yates 均匀打乱。
pub fn generate_deck<R: Rng>(rng: &mut R) -> Vec<Card> {
    let mut deck: Vec<Card> = CardColor::ALL
        .iter()
        .flat_map(|&color| [Card::new(color), Card::new(color)])
        .collect();
    deck.shuffle(rng);
    deck
}

/// 用种子生成可复现的一副牌。
pub fn deck_from_seed(seed: u64) -> Vec<Card> {
    let mut rng = SmallRng::seed_from_u64(seed);
    generate_deck(&mut rng)
}
