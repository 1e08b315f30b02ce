//! Provider - the injected wallet seam (EIP-1193 subset)
//!
//! The app never holds keys. It asks whatever provider the environment
//! injected for account lists and listens for account changes.
//!
//! | Method | Provider call | Prompts user |
//! |--------|---------------|--------------|
//! | `request_accounts` | `eth_requestAccounts` | yes |
//! | `accounts` | `eth_accounts` | no |
//! | `on_accounts_changed` | `on("accountsChanged")` | - |
//!
//! A missing provider is modelled as `None` at the call site, not as an
//! error: both the guard and the session react to it with a notice.

mod memory;

pub use memory::MemoryProvider;

use crate::core::address::Address;
use async_trait::async_trait;
use std::rc::Rc;
use thiserror::Error;

/// EIP-1193 code for "user rejected the request".
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider rejected request ({code}): {message}")]
    Rejected { code: i64, message: String },
    #[error("provider unavailable")]
    Unavailable,
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn user_rejected() -> Self {
        ProviderError::Rejected {
            code: USER_REJECTED_CODE,
            message: "User rejected the request.".into(),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Callback for `accountsChanged`. Receives the full new account list.
pub type AccountsListener = Rc<dyn Fn(Vec<Address>)>;

#[async_trait(?Send)]
pub trait WalletProvider {
    /// `eth_requestAccounts`: may prompt the user for access.
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>>;

    /// `eth_accounts`: already-authorized accounts, never prompts.
    async fn accounts(&self) -> ProviderResult<Vec<Address>>;

    /// Register an `accountsChanged` listener. Dropping the returned
    /// subscription removes it.
    fn on_accounts_changed(&self, listener: AccountsListener) -> Subscription;
}

/// Handle for a registered listener. Unsubscribes on drop.
#[must_use = "dropping a Subscription removes the listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// A subscription with nothing to remove.
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.cancel.is_some()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_subscription_cancels_once() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let sub = Subscription::new(move || counter.set(counter.get() + 1));
        sub.unsubscribe();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_subscription_cancels_on_drop() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        {
            let _sub = Subscription::new(move || counter.set(counter.get() + 1));
        }
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_user_rejected_display() {
        let err = ProviderError::user_rejected();
        assert_eq!(err.to_string(), "provider rejected request (4001): User rejected the request.");
    }
}
