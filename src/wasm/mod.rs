//! WASM module: the app in the browser
//!
//! Provides BookmartApp for browser environments with:
//! - `window.ethereum` as the wallet provider
//! - `window.alert` for notices
//! - JS bindings via wasm-bindgen
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         BookmartApp (JS API)            │
//! │  connectWallet, navigate, watch         │
//! └─────────────────┬───────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────┐
//! │        App (session + router)           │
//! └────────┬───────────────────────┬────────┘
//!          │                       │
//! ┌────────▼─────────┐   ┌─────────▼────────┐
//! │ InjectedProvider │   │  AlertNotifier   │
//! │ window.ethereum  │   │  window.alert    │
//! └──────────────────┘   └──────────────────┘
//! ```

mod app;
mod notice;
mod provider;

pub use app::BookmartApp;
pub use notice::AlertNotifier;
pub use provider::InjectedProvider;

use wasm_bindgen::prelude::*;

/// Initialize WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Log to browser console
pub fn console_log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

macro_rules! log {
    ($($t:tt)*) => {
        crate::wasm::console_log(&format!($($t)*))
    }
}

pub(crate) use log;
