//! InjectedProvider - `window.ethereum` behind the `WalletProvider` trait

use super::log;
use crate::core::address::Address;
use crate::core::paths::provider::{ACCOUNTS, ACCOUNTS_CHANGED, INJECTION_KEY, REQUEST_ACCOUNTS};
use crate::provider::{AccountsListener, ProviderError, ProviderResult, Subscription, WalletProvider};
use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

pub struct InjectedProvider {
    ethereum: JsValue,
}

impl InjectedProvider {
    /// `None` when the page has no injected wallet.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str(INJECTION_KEY)).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Self { ethereum })
    }

    async fn request(&self, method: &str) -> ProviderResult<Vec<Address>> {
        let args = Object::new();
        Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
            .map_err(|e| ProviderError::InvalidResponse(format!("build request: {:?}", e)))?;

        let request = method_fn(&self.ethereum, "request")?;
        let result = request.call1(&self.ethereum, &args).map_err(rejection)?;
        let promise = result.dyn_into::<Promise>()
            .map_err(|_| ProviderError::InvalidResponse(format!("{} did not return a promise", method)))?;
        let value = JsFuture::from(promise).await.map_err(rejection)?;
        parse_accounts(value)
    }
}

#[async_trait(?Send)]
impl WalletProvider for InjectedProvider {
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        self.request(REQUEST_ACCOUNTS).await
    }

    async fn accounts(&self) -> ProviderResult<Vec<Address>> {
        self.request(ACCOUNTS).await
    }

    fn on_accounts_changed(&self, listener: AccountsListener) -> Subscription {
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            match parse_accounts(value) {
                Ok(accounts) => listener(accounts),
                Err(e) => log!("[InjectedProvider] ignoring {}: {}", ACCOUNTS_CHANGED, e),
            }
        });

        let event = JsValue::from_str(ACCOUNTS_CHANGED);
        let registered = method_fn(&self.ethereum, "on")
            .and_then(|on| on.call2(&self.ethereum, &event, closure.as_ref()).map_err(rejection));
        if let Err(e) = registered {
            log!("[InjectedProvider] cannot listen for {}: {}", ACCOUNTS_CHANGED, e);
            return Subscription::detached();
        }

        let ethereum = self.ethereum.clone();
        Subscription::new(move || {
            if let Ok(remove) = method_fn(&ethereum, "removeListener") {
                let _ = remove.call2(&ethereum, &event, closure.as_ref());
            }
            // May run from inside the listener itself; free the closure once it has returned.
            wasm_bindgen_futures::spawn_local(async move { drop(closure) });
        })
    }
}

fn method_fn(target: &JsValue, name: &str) -> ProviderResult<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
        .ok_or_else(|| ProviderError::InvalidResponse(format!("provider has no {}()", name)))
}

/// Map a JS error (`{code, message}` per EIP-1193) to a `ProviderError`.
fn rejection(err: JsValue) -> ProviderError {
    let code = Reflect::get(&err, &JsValue::from_str("code")).ok().and_then(|c| c.as_f64());
    let message = Reflect::get(&err, &JsValue::from_str("message")).ok().and_then(|m| m.as_string());
    match (code, message) {
        (Some(code), message) => ProviderError::Rejected {
            code: code as i64,
            message: message.unwrap_or_default(),
        },
        (None, Some(message)) => ProviderError::Rejected { code: -1, message },
        (None, None) => ProviderError::Unavailable,
    }
}

fn parse_accounts(value: JsValue) -> ProviderResult<Vec<Address>> {
    if !Array::is_array(&value) {
        return Err(ProviderError::InvalidResponse(format!("expected account array, got {:?}", value)));
    }
    Array::from(&value)
        .iter()
        .map(|entry| {
            entry.as_string()
                .map(Address::new)
                .ok_or_else(|| ProviderError::InvalidResponse(format!("non-string account: {:?}", entry)))
        })
        .collect()
}
