//! Bookmart CLI - drive the router and wallet session from a terminal
//!
//! The browser's injected wallet is replaced by an in-memory provider whose
//! accounts come from the command line:
//!   bookmart routes                              → route table
//!   bookmart navigate /admin --account 0x6e7B... → {"location": "/admin", ...}
//!   bookmart navigate /admin --no-provider       → redirected to /
//!   bookmart connect --account 0xABCD...         → session snapshot
//!
//! Output format:
//!   --json     Output raw JSON (default for non-tty)
//!   --pretty   Pretty-print JSON (default for tty)

use anyhow::{anyhow, Context, Result};
use bookmart::logging::init_logging;
use bookmart::{
    parse_admin_address, App, AppConfig, MemoryProvider, ProviderError, RecordingNotifier,
    TracingNotifier, WalletProvider,
};
use bookmart::notice::Notifier;
use serde_json::{json, Value};
use std::env;
use std::io::IsTerminal;
use std::rc::Rc;
use tracing::debug;

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("bookmart {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("routes") => cmd_routes(&opts),
        Some("navigate") | Some("nav") => run(cmd_navigate(&opts)),
        Some("connect") => run(cmd_connect(&opts)),
        Some(cmd) => Err(anyhow!("Unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    let pretty = opts.pretty || (!opts.json && std::io::stdout().is_terminal());
    match result {
        Ok(output) => println!("{}", render(&output, pretty)),
        Err(e) => {
            eprintln!("{}", render(&json!({"error": format!("{:#}", e)}), pretty));
            std::process::exit(1);
        }
    }
}

fn render(value: &Value, pretty: bool) -> String {
    let rendered = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    rendered.unwrap_or_else(|_| value.to_string())
}

/// Provider and session types are single-threaded, so a current-thread runtime suffices.
fn run(fut: impl std::future::Future<Output = Result<Value>>) -> Result<Value> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    rt.block_on(fut)
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    path: Option<String>,
    accounts: Vec<String>,
    admin: Option<String>,
    no_provider: bool,
    reject: bool,
    json: bool,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--json" => opts.json = true,
                "--pretty" => opts.pretty = true,
                "--no-provider" => opts.no_provider = true,
                "--reject" => opts.reject = true,
                "--account" | "-a" => {
                    if i + 1 < args.len() {
                        opts.accounts.push(args[i + 1].clone());
                        i += 1;
                    }
                }
                "--admin" => {
                    if i + 1 < args.len() {
                        opts.admin = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                _ if !arg.starts_with('-') => positional.push(arg.clone()),
                _ => {} // Ignore unknown flags
            }
            i += 1;
        }

        // First positional is command, second is path
        let mut positional = positional.into_iter();
        opts.command = positional.next();
        opts.path = positional.next();
        opts
    }

    /// CLI flag beats `BOOKMART_ADMIN_ADDRESS`, which beats the default.
    fn config(&self) -> Result<AppConfig> {
        let config = AppConfig::from_env()?;
        match &self.admin {
            Some(admin) => Ok(config.with_admin_address(parse_admin_address(admin)?)),
            None => Ok(config),
        }
    }

    fn provider(&self, pre_authorized: bool) -> Option<MemoryProvider> {
        if self.no_provider {
            return None;
        }
        let provider = if pre_authorized {
            MemoryProvider::authorized(self.accounts.iter().map(String::as_str))
        } else {
            MemoryProvider::with_accounts(self.accounts.iter().map(String::as_str))
        };
        if self.reject {
            provider.reject_requests(ProviderError::user_rejected());
            provider.fail_queries(ProviderError::user_rejected());
        }
        Some(provider)
    }
}

fn print_usage() {
    println!(
        r#"bookmart - routes, admin guard and wallet session

USAGE:
    bookmart <command> [path] [options]

COMMANDS:
    routes                  Print the route table
    navigate <path>         Resolve a location through the admin guard
    connect                 Connect a wallet session and print its state

PROVIDER OPTIONS:
    --account, -a <addr>    Wallet account (repeat; first is active)
    --no-provider           Simulate a browser without an injected wallet
    --reject                Provider rejects every request
    --admin <addr>          Admin address (env: BOOKMART_ADMIN_ADDRESS)

OUTPUT OPTIONS:
    --json                  Raw JSON output
    --pretty                Pretty-print JSON
    --version, -V           Print version

EXAMPLES:
    bookmart navigate /book/42
    bookmart navigate /admin --account 0x6e7BCbD91a8560E7Dc44F9c2179eae315B9BcDb4
    bookmart connect --account 0xABCDEF0123456789 --json | jq .short_address
"#
    );
}

fn build_app(opts: &ParsedArgs, pre_authorized: bool) -> Result<(App, RecordingNotifier)> {
    let config = opts.config()?;
    let provider = opts.provider(pre_authorized).map(|p| Rc::new(p) as Rc<dyn WalletProvider>);
    let recorder = RecordingNotifier::new();
    let notifier: Rc<dyn Notifier> = Rc::new(Tee(recorder.clone()));
    let app = App::new(config, provider, notifier)?;
    Ok((app, recorder))
}

/// Records notices for the JSON output and logs them.
struct Tee(RecordingNotifier);

impl Notifier for Tee {
    fn notify(&self, notice: bookmart::Notice) {
        TracingNotifier.notify(notice);
        self.0.notify(notice);
    }
}

fn notices_json(recorder: &RecordingNotifier) -> Value {
    Value::Array(recorder.notices().iter()
        .map(|n| json!({"kind": n, "text": n.text()}))
        .collect())
}

fn cmd_routes(opts: &ParsedArgs) -> Result<Value> {
    let (app, _) = build_app(opts, true)?;
    let routes: Vec<Value> = app.router().routes().iter()
        .map(|r| json!({
            "path": r.pattern.as_str(),
            "view": r.view,
            "params": r.pattern.param_names().collect::<Vec<_>>(),
            "requires_admin": r.meta.requires_admin,
        }))
        .collect();
    Ok(json!({"count": routes.len(), "routes": routes}))
}

async fn cmd_navigate(opts: &ParsedArgs) -> Result<Value> {
    let path = opts.path.as_deref().ok_or_else(|| anyhow!("navigate requires a path"))?;
    let (app, recorder) = build_app(opts, true)?;
    debug!(path, "Navigating");
    let resolved = app.navigate(path).await?;
    let mut out = serde_json::to_value(&resolved)?;
    out["notices"] = notices_json(&recorder);
    Ok(out)
}

async fn cmd_connect(opts: &ParsedArgs) -> Result<Value> {
    let (app, recorder) = build_app(opts, false)?;
    let connected = app.session().connect_wallet().await;
    let mut out = serde_json::to_value(app.session().snapshot())?;
    out["connected"] = json!(connected);
    out["notices"] = notices_json(&recorder);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_navigate() {
        let opts = ParsedArgs::parse(&args(&["navigate", "/admin", "-a", "0x1", "--account", "0x2", "--json"]));
        assert_eq!(opts.command.as_deref(), Some("navigate"));
        assert_eq!(opts.path.as_deref(), Some("/admin"));
        assert_eq!(opts.accounts, vec!["0x1", "0x2"]);
        assert!(opts.json);
        assert!(!opts.no_provider);
    }

    #[test]
    fn test_no_provider_flag() {
        let opts = ParsedArgs::parse(&args(&["navigate", "/admin", "--no-provider"]));
        assert!(opts.provider(true).is_none());
    }

    #[test]
    fn test_invalid_admin_flag() {
        let opts = ParsedArgs::parse(&args(&["routes", "--admin", "nope"]));
        assert!(opts.config().is_err());
    }
}
