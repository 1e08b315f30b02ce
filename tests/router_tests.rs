//! Router Test Suite: navigation through the admin guard
//!
//! These tests verify:
//! 1. Unguarded routes pass regardless of provider state
//! 2. Admin route without a provider redirects home, no account query
//! 3. Admin route with the admin account (any casing) is allowed
//! 4. Admin route with another account or no account redirects home
//! 5. Account query failure redirects home instead of hanging
//! 6. Path params and unknown paths
//! 7. The configured admin address drives the guard

use bookmart::{
    App, AppConfig, MemoryProvider, Notice, ProviderError, RecordingNotifier, RouterError, View,
    WalletProvider,
};
use futures::executor::block_on;
use std::rc::Rc;

const ADMIN: &str = "0x6e7BCbD91a8560E7Dc44F9c2179eae315B9BcDb4";
const STRANGER: &str = "0x1111111111111111111111111111111111111111";

fn app_with(provider: Option<MemoryProvider>) -> (App, RecordingNotifier) {
    let notifier = RecordingNotifier::new();
    let provider = provider.map(|p| Rc::new(p) as Rc<dyn WalletProvider>);
    let app = App::new(AppConfig::new(), provider, Rc::new(notifier.clone())).expect("app");
    (app, notifier)
}

/// Test 1: Non-admin routes ignore the provider entirely
#[test]
fn unguarded_routes_always_allowed() {
    let failing = MemoryProvider::new();
    failing.fail_queries(ProviderError::Unavailable);

    for provider in [None, Some(MemoryProvider::new()), Some(failing.clone())] {
        let (app, notifier) = app_with(provider);
        for path in ["/", "/book/1", "/book/abc?from=home"] {
            let resolved = block_on(app.navigate(path)).expect("navigate");
            assert_eq!(resolved.location, path);
            assert_eq!(resolved.redirected_from, None);
        }
        assert!(notifier.notices().is_empty());
    }
    assert_eq!(failing.query_count(), 0);
}

/// Test 2: No provider → install prompt, home
#[test]
fn admin_without_provider_redirects_home() {
    let (app, notifier) = app_with(None);
    let resolved = block_on(app.navigate("/admin")).expect("navigate");
    assert_eq!(resolved.location, "/");
    assert_eq!(resolved.view, View::Home);
    assert_eq!(resolved.redirected_from.as_deref(), Some("/admin"));
    assert_eq!(notifier.notices(), vec![Notice::InstallWalletForAdmin]);
}

/// Test 3: Admin account matches case-insensitively
#[test]
fn admin_account_allowed() {
    for account in [ADMIN.to_string(), ADMIN.to_lowercase(), ADMIN.to_uppercase().replacen("0X", "0x", 1)] {
        let provider = MemoryProvider::authorized([account]);
        let (app, notifier) = app_with(Some(provider.clone()));
        let resolved = block_on(app.navigate("/admin")).expect("navigate");
        assert_eq!(resolved.location, "/admin");
        assert_eq!(resolved.view, View::Admin);
        assert_eq!(provider.query_count(), 1);
        assert_eq!(provider.request_count(), 0, "guard must not prompt");
        assert!(notifier.notices().is_empty());
    }
}

/// Test 4: Wrong or missing account → unauthorized, home
#[test]
fn non_admin_redirected_home() {
    let cases = [
        MemoryProvider::authorized([STRANGER]),
        MemoryProvider::authorized(Vec::<String>::new()),
        // Wallet holds the admin key but never granted this site access.
        MemoryProvider::with_accounts([ADMIN]),
    ];
    for provider in cases {
        let (app, notifier) = app_with(Some(provider));
        let resolved = block_on(app.navigate("/admin")).expect("navigate");
        assert_eq!(resolved.location, "/");
        assert_eq!(resolved.view, View::Home);
        assert_eq!(notifier.notices(), vec![Notice::Unauthorized]);
    }
}

/// Test 5: Rejected eth_accounts → unauthorized, home
#[test]
fn query_failure_redirects_home() {
    let provider = MemoryProvider::authorized([ADMIN]);
    provider.fail_queries(ProviderError::user_rejected());
    let (app, notifier) = app_with(Some(provider));
    let resolved = block_on(app.navigate("/admin")).expect("navigate");
    assert_eq!(resolved.location, "/");
    assert_eq!(notifier.notices(), vec![Notice::Unauthorized]);
}

/// Test 6: Params captured, unknown paths rejected
#[test]
fn params_and_not_found() {
    let (app, _) = app_with(None);
    let resolved = block_on(app.navigate("/book/978-0131103627")).expect("navigate");
    assert_eq!(resolved.view, View::Book);
    assert_eq!(resolved.params.get("id").map(String::as_str), Some("978-0131103627"));

    let err = block_on(app.navigate("/checkout")).unwrap_err();
    assert_eq!(err, RouterError::NotFound("/checkout".into()));
}

/// Test 7: Configured admin replaces the default in the guard
#[test]
fn configured_admin_address_used_by_guard() {
    let notifier = RecordingNotifier::new();
    let provider: Rc<dyn WalletProvider> = Rc::new(MemoryProvider::authorized([STRANGER]));
    let config = AppConfig::new().with_admin_address(STRANGER);
    let app = App::new(config, Some(provider), Rc::new(notifier.clone())).expect("app");
    let resolved = block_on(app.navigate("/admin")).expect("navigate");
    assert_eq!(resolved.view, View::Admin);
    assert!(notifier.notices().is_empty());
}
