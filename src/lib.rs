//! Bookmart: book marketplace client. Routes, an admin guard, and a wallet
//! session over a browser-injected provider.
//!
//! # Architecture
//!
//! ```text
//! App (application root)
//!   │
//!   ├── AppConfig (admin address, single source)
//!   │
//!   ├── Router
//!   │     ├── "/"          → Home
//!   │     ├── "/book/:id"  → Book
//!   │     └── "/admin"     → Admin  ◄── AdminGuard (eth_accounts[0] == admin?)
//!   │
//!   └── WalletSession
//!         ├── connect_wallet    → eth_requestAccounts + accountsChanged listener
//!         ├── disconnect_wallet → local clear, listener removed
//!         └── watch             → snapshot stream (account, is_connected, is_admin, short_address)
//! ```
//!
//! Both the router guard and the session talk to the same `WalletProvider`
//! (absent when no wallet is injected) and surface problems through the same
//! `Notifier`.
//!
//! # Features
//!
//! - `native` - CLI and stderr logging (default)
//! - `wasm` - `window.ethereum` provider, `window.alert` notices, JS bindings
//!
//! # Usage
//!
//! ```ignore
//! use bookmart::{App, AppConfig, MemoryProvider, RecordingNotifier, WalletProvider};
//! use std::rc::Rc;
//!
//! let provider: Rc<dyn WalletProvider> = Rc::new(MemoryProvider::with_accounts(["0x6e7B..."]));
//! let app = App::new(AppConfig::new(), Some(provider), Rc::new(RecordingNotifier::new()))?;
//!
//! app.session().connect_wallet().await;
//! let resolved = app.navigate("/admin").await?;
//! ```

// =============================================================================
// Shared modules (compile everywhere)
// =============================================================================
pub mod app;
pub mod core;
pub mod notice;
pub mod provider;
pub mod router;
pub mod session;

// =============================================================================
// Native-only modules (CLI, stderr logging)
// =============================================================================
#[cfg(feature = "native")]
pub mod logging;

// =============================================================================
// WASM-only modules (browser, wasm-bindgen)
// =============================================================================
#[cfg(feature = "wasm")]
pub mod wasm;

// =============================================================================
// Re-exports: Shared
// =============================================================================
pub use app::config::{parse_admin_address, DEFAULT_ADMIN_ADDRESS};
pub use app::{App, AppConfig, ConfigError};
pub use crate::core::address::Address;
pub use crate::core::pattern::{Params, PatternError, RoutePattern};
pub use notice::{Notice, Notifier, RecordingNotifier, TracingNotifier};
pub use provider::{
    AccountsListener, MemoryProvider, ProviderError, ProviderResult, Subscription, WalletProvider,
};
pub use router::{AdminGuard, Navigation, Resolved, Route, RouteMatch, RouteMeta, Router, RouterError, View};
pub use session::{SessionSnapshot, WalletSession};

// =============================================================================
// Re-exports: WASM
// =============================================================================
#[cfg(feature = "wasm")]
pub use wasm::{AlertNotifier, BookmartApp, InjectedProvider};
