//! Telegram WebApp 宿主对接。探测不到宿主时整个模块退化为空操作。

use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Function, Reflect};

use crate::config::CONFIG;

/// `window.Telegram.WebApp` 的句柄。
///
/// 游戏在普通浏览器里照常可玩，所以这里所有调用都是尽力而为：
/// 方法缺失或抛错一律按宿主不存在处理，不向玩家暴露任何错误。
pub struct TelegramWebApp {
    webapp: JsValue,
}

impl TelegramWebApp {
    /// 逐级探测 `window.Telegram.WebApp`，任何一级缺失都返回 `None`。
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let telegram = Reflect::get(window.as_ref(), &JsValue::from_str("Telegram")).ok()?;
        if !telegram.is_object() {
            return None;
        }
        let webapp = Reflect::get(&telegram, &JsValue::from_str("WebApp")).ok()?;
        if !webapp.is_object() {
            return None;
        }
        Some(Self { webapp })
    }

    /// 告知宿主界面已就绪。
    pub fn ready(&self) {
        self.invoke("ready");
    }

    /// 请求展开到全高视口。
    pub fn expand(&self) {
        self.invoke("expand");
    }

    fn invoke(&self, name: &str) {
        let method = match Reflect::get(&self.webapp, &JsValue::from_str(name)) {
            Ok(value) => value,
            Err(_) => return,
        };
        if let Some(function) = method.dyn_ref::<Function>() {
            let _ = function.call0(&self.webapp);
        }
    }
}

/// 挂载时的一次性宿主握手和启动诊断。
pub fn bootstrap_host(host: Option<&TelegramWebApp>) {
    let webapp = match host {
        Some(webapp) => webapp,
        None => return,
    };
    webapp.ready();
    webapp.expand();
    web_sys::console::log_1(&"Telegram WebApp инициализирован".into());
    match CONFIG.base_url {
        Some(base_url) => {
            web_sys::console::log_1(&format!("APP_BASE_URL: {base_url}").into());
        }
        None => {
            web_sys::console::log_1(&"APP_BASE_URL: (not set)".into());
        }
    }
}
