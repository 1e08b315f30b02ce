//! Wallet session - connect/disconnect lifecycle over an injected provider
//!
//! One `WalletSession` is created by the application root and handed to
//! whatever needs it. Clones share state.
//!
//! ```text
//! connect_wallet ──► eth_requestAccounts ──► account = accounts[0]
//!                                        └─► on("accountsChanged")
//!                                               ├── []    → disconnect
//!                                               └── [a..] → account = a
//! disconnect_wallet ──► account = None, listener removed (no provider call)
//! ```
//!
//! Derived values (`is_connected`, `is_admin`, `short_address`) are computed
//! on read. `watch()` streams a snapshot after every change.

use crate::app::config::AppConfig;
use crate::core::address::Address;
use crate::notice::{Notice, Notifier};
use crate::provider::{Subscription, WalletProvider};
use futures::channel::mpsc;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, info};

/// Read-only view of the session, as pushed to watchers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub account: Option<Address>,
    pub is_connected: bool,
    pub is_admin: bool,
    pub short_address: String,
}

#[derive(Default)]
struct SessionState {
    account: Option<Address>,
    subscription: Option<Subscription>,
    watchers: Vec<mpsc::UnboundedSender<SessionSnapshot>>,
}

struct SessionInner {
    config: AppConfig,
    provider: Option<Rc<dyn WalletProvider>>,
    notifier: Rc<dyn Notifier>,
    state: RefCell<SessionState>,
}

#[derive(Clone)]
pub struct WalletSession {
    inner: Rc<SessionInner>,
}

impl WalletSession {
    pub fn new(
        config: AppConfig,
        provider: Option<Rc<dyn WalletProvider>>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                config,
                provider,
                notifier,
                state: RefCell::new(SessionState::default()),
            }),
        }
    }

    pub fn has_provider(&self) -> bool {
        self.inner.provider.is_some()
    }

    /// Ask the provider for access. Returns `false` (after a notice) when no
    /// provider is injected or the request fails.
    pub async fn connect_wallet(&self) -> bool {
        let Some(provider) = self.inner.provider.clone() else {
            self.inner.notifier.notify(Notice::InstallWalletToUse);
            return false;
        };

        let account = match provider.request_accounts().await {
            Ok(accounts) => accounts.into_iter().next(),
            Err(e) => {
                error!(error = %e, "Error connecting wallet");
                self.inner.notifier.notify(Notice::ConnectFailed);
                return false;
            }
        };
        let Some(account) = account else {
            error!("Error connecting wallet: provider granted no accounts");
            self.inner.notifier.notify(Notice::ConnectFailed);
            return false;
        };

        // Drop any listener from an earlier connect before installing a new one.
        let previous = self.inner.state.borrow_mut().subscription.take();
        drop(previous);

        let weak = Rc::downgrade(&self.inner);
        let subscription = provider.on_accounts_changed(Rc::new(move |accounts: Vec<Address>| {
            if let Some(inner) = weak.upgrade() {
                WalletSession { inner }.accounts_changed(accounts);
            }
        }));

        info!(account = %account, "Wallet connected");
        {
            let mut state = self.inner.state.borrow_mut();
            state.account = Some(account);
            state.subscription = Some(subscription);
        }
        self.publish();
        true
    }

    /// Clear the local session. Wallets cannot be disconnected remotely, so
    /// the provider is not contacted; the account listener is removed.
    pub fn disconnect_wallet(&self) {
        let subscription = {
            let mut state = self.inner.state.borrow_mut();
            state.account = None;
            state.subscription.take()
        };
        drop(subscription);
        debug!("Wallet session cleared");
        self.publish();
    }

    fn accounts_changed(&self, accounts: Vec<Address>) {
        match accounts.into_iter().next() {
            None => {
                debug!("Provider reported no accounts");
                self.disconnect_wallet();
            }
            Some(account) => {
                debug!(account = %account, "Active account changed");
                self.inner.state.borrow_mut().account = Some(account);
                self.publish();
            }
        }
    }

    pub fn account(&self) -> Option<Address> {
        self.inner.state.borrow().account.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.state.borrow().account.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.inner.state.borrow().account.as_ref()
            .map(|account| self.inner.config.is_admin(account))
            .unwrap_or(false)
    }

    pub fn short_address(&self) -> String {
        self.inner.state.borrow().account.as_ref()
            .map(Address::short)
            .unwrap_or_default()
    }

    /// True while an `accountsChanged` listener is installed.
    pub fn is_listening(&self) -> bool {
        self.inner.state.borrow().subscription.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            account: self.account(),
            is_connected: self.is_connected(),
            is_admin: self.is_admin(),
            short_address: self.short_address(),
        }
    }

    /// Subscribe to session changes. The current snapshot is delivered first.
    pub fn watch(&self) -> mpsc::UnboundedReceiver<SessionSnapshot> {
        let (tx, rx) = mpsc::unbounded();
        let _ = tx.unbounded_send(self.snapshot());
        self.inner.state.borrow_mut().watchers.push(tx);
        rx
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        self.inner.state.borrow_mut()
            .watchers
            .retain(|tx| tx.unbounded_send(snapshot.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::RecordingNotifier;
    use crate::provider::{MemoryProvider, ProviderError};
    use futures::executor::block_on;

    const ADMIN: &str = "0x6e7BCbD91a8560E7Dc44F9c2179eae315B9BcDb4";

    fn session_with(provider: Option<MemoryProvider>) -> (WalletSession, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let provider = provider.map(|p| Rc::new(p) as Rc<dyn WalletProvider>);
        let session = WalletSession::new(AppConfig::new(), provider, Rc::new(notifier.clone()));
        (session, notifier)
    }

    #[test]
    fn test_starts_disconnected() {
        let (session, _) = session_with(Some(MemoryProvider::new()));
        assert_eq!(session.account(), None);
        assert!(!session.is_connected());
        assert!(!session.is_admin());
        assert_eq!(session.short_address(), "");
    }

    #[test]
    fn test_connect_without_provider() {
        let (session, notifier) = session_with(None);
        assert!(!block_on(session.connect_wallet()));
        assert!(!session.is_connected());
        assert_eq!(notifier.notices(), vec![Notice::InstallWalletToUse]);
    }

    #[test]
    fn test_connect_takes_first_account() {
        let provider = MemoryProvider::with_accounts(["0xABCDEF0123456789", "0x2"]);
        let (session, notifier) = session_with(Some(provider.clone()));
        assert!(block_on(session.connect_wallet()));
        assert_eq!(session.account(), Some(Address::from("0xABCDEF0123456789")));
        assert!(session.is_connected());
        assert_eq!(session.short_address(), "0xABCD...6789");
        assert!(session.is_listening());
        assert_eq!(provider.listener_count(), 1);
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_connect_rejected() {
        let provider = MemoryProvider::with_accounts(["0x1"]);
        provider.reject_requests(ProviderError::user_rejected());
        let (session, notifier) = session_with(Some(provider.clone()));
        assert!(!block_on(session.connect_wallet()));
        assert!(!session.is_connected());
        assert_eq!(notifier.last(), Some(Notice::ConnectFailed));
        assert_eq!(provider.listener_count(), 0);
    }

    #[test]
    fn test_connect_with_empty_grant_fails() {
        let (session, notifier) = session_with(Some(MemoryProvider::new()));
        assert!(!block_on(session.connect_wallet()));
        assert!(!session.is_connected());
        assert_eq!(notifier.last(), Some(Notice::ConnectFailed));
    }

    #[test]
    fn test_admin_flag_follows_account() {
        let provider = MemoryProvider::with_accounts([ADMIN.to_lowercase()]);
        let (session, _) = session_with(Some(provider.clone()));
        assert!(block_on(session.connect_wallet()));
        assert!(session.is_admin());

        provider.emit_accounts_changed(["0x0000000000000000000000000000000000000001"]);
        assert!(!session.is_admin());
        assert!(session.is_connected());
    }

    #[test]
    fn test_empty_accounts_changed_disconnects() {
        let provider = MemoryProvider::with_accounts(["0x1"]);
        let (session, _) = session_with(Some(provider.clone()));
        assert!(block_on(session.connect_wallet()));

        provider.emit_accounts_changed(Vec::<Address>::new());
        assert!(!session.is_connected());
        assert_eq!(session.account(), None);
        assert!(!session.is_listening());
        assert_eq!(provider.listener_count(), 0);
    }

    #[test]
    fn test_reconnect_keeps_single_listener() {
        let provider = MemoryProvider::with_accounts(["0x1"]);
        let (session, _) = session_with(Some(provider.clone()));
        assert!(block_on(session.connect_wallet()));
        assert!(block_on(session.connect_wallet()));
        assert!(block_on(session.connect_wallet()));
        assert_eq!(provider.listener_count(), 1);
    }

    #[test]
    fn test_drop_removes_listener() {
        let provider = MemoryProvider::with_accounts(["0x1"]);
        let (session, _) = session_with(Some(provider.clone()));
        assert!(block_on(session.connect_wallet()));
        let clone = session.clone();
        drop(session);
        assert_eq!(provider.listener_count(), 1);
        drop(clone);
        assert_eq!(provider.listener_count(), 0);
    }

    #[test]
    fn test_watch_streams_changes() {
        use futures::StreamExt;

        let provider = MemoryProvider::with_accounts(["0x1111111111"]);
        let (session, _) = session_with(Some(provider.clone()));
        let mut rx = session.watch();

        assert!(block_on(session.connect_wallet()));
        provider.emit_accounts_changed(["0x2222222222"]);
        session.disconnect_wallet();
        drop(session);

        let snapshots: Vec<SessionSnapshot> = block_on(rx.by_ref().collect());
        let accounts: Vec<Option<&str>> = snapshots.iter()
            .map(|s| s.account.as_ref().map(Address::as_str))
            .collect();
        assert_eq!(accounts, vec![None, Some("0x1111111111"), Some("0x2222222222"), None]);
        assert_eq!(snapshots[1].short_address, "0x1111...1111");
        assert!(snapshots.iter().all(|s| s.is_connected == s.account.is_some()));
    }
}
