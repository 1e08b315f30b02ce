//! Path, method and environment constants
//!
//! Centralized registry for route paths and provider method names.

/// Route paths
pub mod routes {
    pub const HOME: &str = "/";
    pub const BOOK: &str = "/book/:id";
    pub const ADMIN: &str = "/admin";

    pub const BOOK_ID_PARAM: &str = "id";

    pub const ALL: &[&str] = &[HOME, BOOK, ADMIN];
}

/// EIP-1193 provider methods and events
pub mod provider {
    pub const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
    pub const ACCOUNTS: &str = "eth_accounts";
    pub const ACCOUNTS_CHANGED: &str = "accountsChanged";

    /// Property on `window` where the provider is injected
    pub const INJECTION_KEY: &str = "ethereum";
}

/// Environment variables
pub mod env {
    pub const ADMIN_ADDRESS: &str = "BOOKMART_ADMIN_ADDRESS";
    pub const LOG_JSON: &str = "BOOKMART_LOG_JSON";
}
