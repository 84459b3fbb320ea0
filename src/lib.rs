pub mod app;
pub mod config;
pub mod game;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::Event;

pub use app::{bootstrap_host, BoardView, GameEvent, Session, TelegramWebApp};
pub use config::{AppConfig, CONFIG, MISMATCH_DELAY_MS};
pub use game::{
    deck_from_seed, generate_deck, transition, Action, Card, CardColor, GameOutcome, GameState,
    IntegrityError, DECK_SIZE, DEFAULT_TURN_LIMIT,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
}

fn to_js_error(error: IntegrityError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

struct AppInner {
    session: Session,
    view: Option<BoardView>,
}

/// 游戏的浏览器外壳：挂载 DOM、委托点击、调度翻回定时器。
#[wasm_bindgen]
pub struct MemoryApp {
    inner: Rc<RefCell<AppInner>>,
    click_handler: Option<Closure<dyn FnMut(Event)>>,
}

#[wasm_bindgen]
impl MemoryApp {
    /// 不传种子则用系统熵开局。
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u32>) -> MemoryApp {
        let session = match seed {
            Some(seed) => Session::new(u64::from(seed)),
            None => Session::from_entropy(),
        }
        .with_turn_limit(CONFIG.turn_limit);
        MemoryApp {
            inner: Rc::new(RefCell::new(AppInner {
                session,
                view: None,
            })),
            click_handler: None,
        }
    }

    /// 挂载到 `root_id` 指向的元素：搭建牌桌、注册点击委托、完成宿主握手。
    pub fn mount(&mut self, root_id: &str) -> Result<(), JsValue> {
        if self.click_handler.is_some() {
            return Err(JsValue::from_str("app is already mounted"));
        }
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document to mount into"))?;
        let view = BoardView::mount(&document, root_id)?;

        let handler = {
            let inner = Rc::clone(&self.inner);
            Closure::wrap(Box::new(move |event: Event| {
                dispatch_click(&inner, &event);
            }) as Box<dyn FnMut(Event)>)
        };
        view.root()
            .add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;

        bootstrap_host(TelegramWebApp::detect().as_ref());

        {
            let mut inner = self.inner.borrow_mut();
            view.render(inner.session.state())?;
            inner.view = Some(view);
        }
        self.click_handler = Some(handler);
        Ok(())
    }

    /// 当前状态的 JSON 快照，排错用。
    #[wasm_bindgen(js_name = "stateJson")]
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.borrow().session.state()).map_err(serde_to_js_error)
    }

    /// 与点击终局面板里的"Заново"按钮等效。
    #[wasm_bindgen(js_name = "playAgain")]
    pub fn play_again(&self) {
        let events = self.inner.borrow_mut().session.play_again();
        react(&self.inner, &events);
    }
}

fn dispatch_click(inner: &Rc<RefCell<AppInner>>, event: &Event) {
    let events = {
        let mut guard = inner.borrow_mut();
        if let Some(index) = BoardView::clicked_card_index(event) {
            guard.session.card_clicked(index)
        } else if BoardView::clicked_play_again(event) {
            guard.session.play_again()
        } else {
            Vec::new()
        }
    };
    react(inner, &events);
}

/// 消化一批会话事件：失败配对启动翻回定时器，然后整体重绘。
fn react(inner: &Rc<RefCell<AppInner>>, events: &[GameEvent]) {
    if events.is_empty() {
        return;
    }
    if events
        .iter()
        .any(|event| matches!(event, GameEvent::MatchFailed { .. }))
    {
        schedule_flip_back(inner);
    }
    rerender(inner);
}

/// 翻回定时器。捕获当前纪元，到期时过了纪元检查才真正翻回，
/// 中途重开的局不会被旧定时器打扰。
fn schedule_flip_back(inner: &Rc<RefCell<AppInner>>) {
    let epoch = inner.borrow().session.epoch();
    let delay = CONFIG.mismatch_delay_ms;
    let inner = Rc::clone(inner);
    spawn_local(async move {
        TimeoutFuture::new(delay).await;
        let events = inner.borrow_mut().session.flip_back_elapsed(epoch);
        if !events.is_empty() {
            rerender(&inner);
        }
    });
}

fn rerender(inner: &Rc<RefCell<AppInner>>) {
    let guard = inner.borrow();
    if let Some(view) = &guard.view {
        if let Err(error) = view.render(guard.session.state()) {
            web_sys::console::warn_1(&error);
        }
    }
}

/// 生成一局全新状态；传种子可以复现同一副牌。
#[wasm_bindgen(js_name = "createGameState")]
pub fn create_game_state(seed: Option<u32>) -> Result<JsValue, JsValue> {
    let state = match seed {
        Some(seed) => GameState::from_seed(u64::from(seed)),
        None => GameState::from_seed(SmallRng::from_entropy().gen()),
    }
    .with_turn_limit(CONFIG.turn_limit);
    to_value(&state).map_err(JsValue::from)
}

/// 返回一个示例中盘状态，方便前端调试。
#[wasm_bindgen(js_name = "sampleGameState")]
pub fn sample_game_state() -> Result<JsValue, JsValue> {
    to_value(&GameState::sample()).map_err(JsValue::from)
}

/// 纯归约一步：输入状态与动作，返回新状态，入参不被修改。
#[wasm_bindgen(js_name = "applyAction")]
pub fn apply_action(state: JsValue, action: JsValue) -> Result<JsValue, JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    let action: Action = from_value(action).map_err(JsValue::from)?;
    to_value(&transition(&state, &action)).map_err(JsValue::from)
}

/// 终局判定：赢、回合耗尽，或进行中（null）。
#[wasm_bindgen(js_name = "gameOutcome")]
pub fn game_outcome(state: JsValue) -> Result<JsValue, JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    to_value(&state.outcome()).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "validateState")]
pub fn validate_state(state: JsValue) -> Result<(), JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    state.integrity_check().map_err(to_js_error)?;
    Ok(())
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
