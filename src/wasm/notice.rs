//! Browser notices: blocking `window.alert`

use super::log;
use crate::notice::{Notice, Notifier};

#[derive(Clone, Copy, Debug, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, notice: Notice) {
        match web_sys::window() {
            Some(window) => {
                if window.alert_with_message(notice.text()).is_err() {
                    log!("[AlertNotifier] alert failed: {}", notice.text());
                }
            }
            None => log!("[AlertNotifier] no window: {}", notice.text()),
        }
    }
}
