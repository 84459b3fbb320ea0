//! DOM 渲染：把 `GameState` 映射成牌桌标记。
//!
//! 结构约定（样式表依赖这些类名）：
//! `.App > h1 + .info + .deck`，终局时追加 `.overlay` 和 `.game-over`。
//! 每张牌是一个 `.card` 单元格，翻开时加 `flipped show`，
//! 花色通过 `--card-color` 自定义属性交给样式表上色。

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement};

use crate::game::{GameOutcome, GameState};

const CARD_INDEX_ATTR: &str = "data-index";

/// 牌桌视图。挂载一次，之后每个状态快照整体重绘。
pub struct BoardView {
    document: Document,
    root: Element,
    score_line: Element,
    turns_line: Element,
    deck: Element,
}

impl BoardView {
    /// 在 `root_id` 指向的元素里搭好静态骨架。
    pub fn mount(document: &Document, root_id: &str) -> Result<Self, JsValue> {
        let root = document.get_element_by_id(root_id).ok_or_else(|| {
            JsValue::from_str(&format!("mount point #{root_id} not found"))
        })?;
        root.set_class_name("App");
        root.set_inner_html("");

        let title = document.create_element("h1")?;
        title.set_text_content(Some("Memory Game"));
        root.append_child(&title)?;

        let info = document.create_element("div")?;
        info.set_class_name("info");
        let score_line = document.create_element("p")?;
        info.append_child(&score_line)?;
        let turns_line = document.create_element("p")?;
        info.append_child(&turns_line)?;
        root.append_child(&info)?;

        let deck = document.create_element("div")?;
        deck.set_class_name("deck");
        root.append_child(&deck)?;

        Ok(Self {
            document: document.clone(),
            root,
            score_line,
            turns_line,
            deck,
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn render(&self, state: &GameState) -> Result<(), JsValue> {
        self.render_info(state);
        self.render_deck(state)?;
        self.render_overlay(state)?;
        Ok(())
    }

    fn render_info(&self, state: &GameState) {
        self.score_line
            .set_text_content(Some(&format!("Очки: {}", state.score)));
        self.turns_line.set_text_content(Some(&format!(
            "Попытки: {}/{}",
            state.turns, state.turn_limit
        )));
    }

    fn render_deck(&self, state: &GameState) -> Result<(), JsValue> {
        self.deck.set_inner_html("");
        for (index, card) in state.deck.iter().enumerate() {
            let cell = self.document.create_element("div")?;
            cell.set_class_name(if state.is_face_up(index) {
                "card flipped show"
            } else {
                "card"
            });
            cell.set_attribute(CARD_INDEX_ATTR, &index.to_string())?;
            if let Some(html) = cell.dyn_ref::<HtmlElement>() {
                html.style().set_property("--card-color", card.color.css())?;
            }
            self.deck.append_child(&cell)?;
        }
        Ok(())
    }

    fn render_overlay(&self, state: &GameState) -> Result<(), JsValue> {
        for selector in [".overlay", ".game-over"] {
            if let Some(stale) = self.root.query_selector(selector)? {
                stale.remove();
            }
        }
        let outcome = match state.outcome() {
            Some(outcome) => outcome,
            None => return Ok(()),
        };

        let overlay = self.document.create_element("div")?;
        overlay.set_class_name("overlay");
        self.root.append_child(&overlay)?;

        let panel = self.document.create_element("div")?;
        panel.set_class_name("game-over");
        let heading = self.document.create_element("h2")?;
        heading.set_text_content(Some(match outcome {
            GameOutcome::Won { .. } => "Вы выиграли!",
            GameOutcome::OutOfTurns { .. } => "Игра окончена!",
        }));
        panel.append_child(&heading)?;
        let button = self.document.create_element("button")?;
        button.set_text_content(Some("Заново"));
        panel.append_child(&button)?;
        self.root.append_child(&panel)?;
        Ok(())
    }

    /// 委托点击解析：落在某张牌上则给出它的下标。
    pub fn clicked_card_index(event: &Event) -> Option<usize> {
        let target = event.target()?;
        let cell = target
            .dyn_ref::<Element>()?
            .closest(".card")
            .ok()
            .flatten()?;
        cell.get_attribute(CARD_INDEX_ATTR)?.parse().ok()
    }

    /// 点击是否落在终局面板的"Заново"按钮上。
    pub fn clicked_play_again(event: &Event) -> bool {
        let target = match event.target() {
            Some(target) => target,
            None => return false,
        };
        target
            .dyn_ref::<Element>()
            .and_then(|element| element.closest(".game-over button").ok().flatten())
            .is_some()
    }
}
