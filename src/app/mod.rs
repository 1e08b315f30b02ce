//! App - the application root
//!
//! Owns the one `WalletSession` and the `Router`, both built from the same
//! `AppConfig`, provider handle and notifier.

pub mod config;

pub use config::{AppConfig, ConfigError};

use crate::notice::Notifier;
use crate::provider::WalletProvider;
use crate::router::{AdminGuard, Resolved, Router, RouterError};
use crate::session::WalletSession;
use std::rc::Rc;

pub struct App {
    config: AppConfig,
    session: WalletSession,
    router: Router,
}

impl App {
    pub fn new(
        config: AppConfig,
        provider: Option<Rc<dyn WalletProvider>>,
        notifier: Rc<dyn Notifier>,
    ) -> Result<Self, RouterError> {
        let guard = AdminGuard::new(&config, provider.clone(), notifier.clone());
        let router = Router::new(Router::app_routes()?, guard);
        let session = WalletSession::new(config.clone(), provider, notifier);
        tracing::debug!(admin = %config.admin_address, provider = session.has_provider(), "App created");
        Ok(Self { config, session, router })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &WalletSession {
        &self.session
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub async fn navigate(&self, location: &str) -> Result<Resolved, RouterError> {
        self.router.navigate(location).await
    }
}
