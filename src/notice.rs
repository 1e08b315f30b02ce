//! User-facing notices (blocking alerts in the browser)
//!
//! Text is fixed to the site's locale (Thai).

use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// Connect pressed with no provider injected
    InstallWalletToUse,
    /// Admin route requested with no provider injected
    InstallWalletForAdmin,
    /// Admin route requested by a non-admin account
    Unauthorized,
    /// Provider refused or failed the connect request
    ConnectFailed,
}

impl Notice {
    pub fn text(&self) -> &'static str {
        match self {
            Notice::InstallWalletToUse => "กรุณาติดตั้ง MetaMask เพื่อใช้งานระบบ",
            Notice::InstallWalletForAdmin => "กรุณาติดตั้ง MetaMask เพื่อเข้าถึงหน้า Admin",
            Notice::Unauthorized => "คุณไม่มีสิทธิ์เข้าถึงหน้า Admin",
            Notice::ConnectFailed => "ไม่สามารถเชื่อมต่อกระเป๋าเงินได้",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Surfaces notices to the user.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Keeps every notice in memory, in order.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    seen: Rc<RefCell<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.seen.borrow().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.seen.borrow().last().copied()
    }

    pub fn clear(&self) {
        self.seen.borrow_mut().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.seen.borrow_mut().push(notice);
    }
}

/// Emits notices as log events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::warn!(?notice, "{}", notice.text());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_prompts_differ_by_call_site() {
        assert_ne!(Notice::InstallWalletToUse.text(), Notice::InstallWalletForAdmin.text());
        assert!(Notice::InstallWalletForAdmin.text().contains("Admin"));
    }

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notice::ConnectFailed);
        notifier.notify(Notice::Unauthorized);
        assert_eq!(notifier.notices(), vec![Notice::ConnectFailed, Notice::Unauthorized]);
        assert_eq!(notifier.last(), Some(Notice::Unauthorized));
        notifier.clear();
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_notice_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Notice::InstallWalletForAdmin).unwrap(), "\"install_wallet_for_admin\"");
    }
}
