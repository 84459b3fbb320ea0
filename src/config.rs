//! 构建期注入的应用配置（对应前端打包时的环境变量）。

use once_cell::sync::Lazy;

use crate::game::DEFAULT_TURN_LIMIT;

/// 配对失败后保持两张牌可见的时长（毫秒）。
pub const MISMATCH_DELAY_MS: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 部署基址，启动时打到控制台方便核对环境。
    pub base_url: Option<&'static str>,
    /// 回合上限，`TURN_LIMIT` 可在构建期覆盖。
    pub turn_limit: u32,
    pub mismatch_delay_ms: u32,
}

impl AppConfig {
    fn from_build_env() -> Self {
        Self {
            base_url: option_env!("APP_BASE_URL"),
            turn_limit: parse_turn_limit(option_env!("TURN_LIMIT")),
            mismatch_delay_ms: MISMATCH_DELAY_MS,
        }
    }
}

fn parse_turn_limit(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse().ok())
        .filter(|&limit| limit > 0)
        .unwrap_or(DEFAULT_TURN_LIMIT)
}

pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_build_env);
