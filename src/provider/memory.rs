//! In-memory provider for tests and the CLI
//!
//! Models a wallet holding `accounts`. `eth_accounts` only reveals them once
//! the site is authorized, which `eth_requestAccounts` grants.

use super::{AccountsListener, ProviderError, ProviderResult, Subscription, WalletProvider};
use crate::core::address::Address;
use async_trait::async_trait;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct MemoryState {
    accounts: Vec<Address>,
    authorized: bool,
    reject_requests: Option<ProviderError>,
    fail_queries: Option<ProviderError>,
    listeners: Vec<(u64, AccountsListener)>,
    next_listener: u64,
    request_count: usize,
    query_count: usize,
}

#[derive(Clone, Default)]
pub struct MemoryProvider {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wallet holding `accounts`; the site has not been granted access yet.
    pub fn with_accounts<I, A>(accounts: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Address>,
    {
        let provider = Self::new();
        provider.state.borrow_mut().accounts = accounts.into_iter().map(Into::into).collect();
        provider
    }

    /// Wallet holding `accounts` that already authorized this site.
    pub fn authorized<I, A>(accounts: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Address>,
    {
        let provider = Self::with_accounts(accounts);
        provider.state.borrow_mut().authorized = true;
        provider
    }

    /// Every `eth_requestAccounts` fails with `err` (user denial, locked wallet).
    pub fn reject_requests(&self, err: ProviderError) {
        self.state.borrow_mut().reject_requests = Some(err);
    }

    /// Every `eth_accounts` fails with `err`.
    pub fn fail_queries(&self, err: ProviderError) {
        self.state.borrow_mut().fail_queries = Some(err);
    }

    /// Simulate the user switching or disconnecting accounts in the wallet.
    pub fn emit_accounts_changed<I, A>(&self, accounts: I)
    where
        I: IntoIterator<Item = A>,
        A: Into<Address>,
    {
        let accounts: Vec<Address> = accounts.into_iter().map(Into::into).collect();
        // Snapshot listeners so callbacks may subscribe/unsubscribe freely.
        let listeners: Vec<AccountsListener> = {
            let mut state = self.state.borrow_mut();
            state.accounts = accounts.clone();
            state.listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        for listener in listeners {
            listener(accounts.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Number of `eth_requestAccounts` calls seen.
    pub fn request_count(&self) -> usize {
        self.state.borrow().request_count
    }

    /// Number of `eth_accounts` calls seen.
    pub fn query_count(&self) -> usize {
        self.state.borrow().query_count
    }
}

#[async_trait(?Send)]
impl WalletProvider for MemoryProvider {
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        let mut state = self.state.borrow_mut();
        state.request_count += 1;
        if let Some(err) = &state.reject_requests {
            return Err(err.clone());
        }
        state.authorized = true;
        Ok(state.accounts.clone())
    }

    async fn accounts(&self) -> ProviderResult<Vec<Address>> {
        let mut state = self.state.borrow_mut();
        state.query_count += 1;
        if let Some(err) = &state.fail_queries {
            return Err(err.clone());
        }
        if state.authorized {
            Ok(state.accounts.clone())
        } else {
            Ok(Vec::new())
        }
    }

    fn on_accounts_changed(&self, listener: AccountsListener) -> Subscription {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_listener;
            state.next_listener += 1;
            state.listeners.push((id, listener));
            id
        };
        let weak = Rc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
            }
        })
    }
}
