//! BookmartApp: the app root exposed to JavaScript via wasm-bindgen
//!
//! ```js
//! const app = new BookmartApp();            // or new BookmartApp("0x...")
//! app.watch(s => render(s));                 // {account, is_connected, is_admin, short_address}
//! await app.connectWallet();                 // true / false
//! const nav = await app.navigate("/admin");  // {location, view, params, redirected_from?}
//! ```

use super::log;
use super::notice::AlertNotifier;
use super::provider::InjectedProvider;
use crate::app::config::{parse_admin_address, AppConfig};
use crate::app::App;
use crate::provider::WalletProvider;
use serde::Serialize;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value.serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub struct BookmartApp {
    app: Rc<App>,
}

#[wasm_bindgen]
impl BookmartApp {
    /// Build the app against `window.ethereum` (if injected) and `window.alert`.
    #[wasm_bindgen(constructor)]
    pub fn new(admin_address: Option<String>) -> Result<BookmartApp, JsValue> {
        let mut config = AppConfig::new();
        if let Some(admin) = admin_address {
            let admin = parse_admin_address(&admin)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            config = config.with_admin_address(admin);
        }

        let provider = InjectedProvider::detect().map(|p| Rc::new(p) as Rc<dyn WalletProvider>);
        log!("[BookmartApp] Creating (provider injected: {})", provider.is_some());

        let app = App::new(config, provider, Rc::new(AlertNotifier))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { app: Rc::new(app) })
    }

    // =========================================================================
    // SESSION
    // =========================================================================

    #[wasm_bindgen(js_name = "connectWallet")]
    pub async fn connect_wallet(&self) -> bool {
        self.app.session().connect_wallet().await
    }

    #[wasm_bindgen(js_name = "disconnectWallet")]
    pub fn disconnect_wallet(&self) {
        self.app.session().disconnect_wallet();
    }

    #[wasm_bindgen(getter)]
    pub fn account(&self) -> Option<String> {
        self.app.session().account().map(|a| a.as_str().to_string())
    }

    #[wasm_bindgen(getter, js_name = "isConnected")]
    pub fn is_connected(&self) -> bool {
        self.app.session().is_connected()
    }

    #[wasm_bindgen(getter, js_name = "isAdmin")]
    pub fn is_admin(&self) -> bool {
        self.app.session().is_admin()
    }

    #[wasm_bindgen(getter, js_name = "shortAddress")]
    pub fn short_address(&self) -> String {
        self.app.session().short_address()
    }

    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.app.session().snapshot())
    }

    /// Call `callback(snapshot)` now and after every session change.
    #[wasm_bindgen]
    pub fn watch(&self, callback: js_sys::Function) {
        let rx = self.app.session().watch();
        let this = JsValue::NULL;
        wasm_bindgen_futures::spawn_local(async move {
            use futures::StreamExt;
            let mut rx = rx;
            while let Some(snapshot) = rx.next().await {
                match to_js(&snapshot) {
                    Ok(value) => { let _ = callback.call1(&this, &value); }
                    Err(e) => log!("[BookmartApp] snapshot encode failed: {:?}", e),
                }
            }
        });
    }

    // =========================================================================
    // ROUTING
    // =========================================================================

    /// Resolve a location through the admin guard.
    #[wasm_bindgen]
    pub async fn navigate(&self, path: String) -> Result<JsValue, JsValue> {
        let resolved = self.app.navigate(&path).await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&resolved)
    }

    /// Route table: `[{path, view, requires_admin}]`
    #[wasm_bindgen]
    pub fn routes(&self) -> Result<JsValue, JsValue> {
        #[derive(Serialize)]
        struct RouteInfo<'a> {
            path: &'a str,
            view: crate::router::View,
            requires_admin: bool,
        }
        let routes: Vec<RouteInfo> = self.app.router().routes().iter()
            .map(|r| RouteInfo { path: r.pattern.as_str(), view: r.view, requires_admin: r.meta.requires_admin })
            .collect();
        to_js(&routes)
    }

    #[wasm_bindgen(getter, js_name = "adminAddress")]
    pub fn admin_address(&self) -> String {
        self.app.config().admin_address.to_string()
    }
}
