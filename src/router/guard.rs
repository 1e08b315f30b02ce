//! AdminGuard - the `beforeEach` hook gating admin-only routes

use super::RouteMatch;
use crate::app::config::AppConfig;
use crate::core::address::Address;
use crate::core::paths::routes;
use crate::notice::{Notice, Notifier};
use crate::provider::WalletProvider;
use serde::Serialize;
use std::rc::Rc;
use tracing::{debug, warn};

/// Guard verdict for one navigation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "to", rename_all = "snake_case")]
pub enum Navigation {
    Allow,
    Redirect(String),
}

impl Navigation {
    fn home() -> Self {
        Navigation::Redirect(routes::HOME.into())
    }
}

pub struct AdminGuard {
    admin: Address,
    provider: Option<Rc<dyn WalletProvider>>,
    notifier: Rc<dyn Notifier>,
}

impl AdminGuard {
    pub fn new(
        config: &AppConfig,
        provider: Option<Rc<dyn WalletProvider>>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        Self { admin: config.admin_address.clone(), provider, notifier }
    }

    /// Non-admin targets pass untouched. Admin targets need an injected
    /// provider whose first authorized account is the admin address; anything
    /// else, a failed account query included, redirects home.
    pub async fn before_each(&self, to: &RouteMatch) -> Navigation {
        if !to.meta.requires_admin {
            return Navigation::Allow;
        }

        let Some(provider) = &self.provider else {
            warn!(location = %to.location, "Admin route requested without a wallet provider");
            self.notifier.notify(Notice::InstallWalletForAdmin);
            return Navigation::home();
        };

        match provider.accounts().await {
            Ok(accounts) => match accounts.first() {
                Some(account) if account.matches(&self.admin) => {
                    debug!(location = %to.location, account = %account, "Admin access granted");
                    Navigation::Allow
                }
                first => {
                    warn!(location = %to.location, account = ?first.map(Address::as_str), "Admin access denied");
                    self.notifier.notify(Notice::Unauthorized);
                    Navigation::home()
                }
            },
            Err(e) => {
                warn!(location = %to.location, error = %e, "Account query failed, treating as unauthorized");
                self.notifier.notify(Notice::Unauthorized);
                Navigation::home()
            }
        }
    }
}
