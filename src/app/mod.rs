//! 展示与编排层（会话、DOM 渲染、宿主握手）。

pub mod host;
pub mod render;
pub mod session;

pub use host::{bootstrap_host, TelegramWebApp};
pub use render::BoardView;
pub use session::{GameEvent, Session};
