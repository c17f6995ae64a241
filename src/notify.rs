//! User Notifications
//!
//! One user-facing message per failed operation.

/// Sink for user-facing error messages
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Shows messages with `window.alert`
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, message: &str) {
        let Some(window) = web_sys::window() else {
            log::error!("no window to alert: {}", message);
            return;
        };
        if let Err(e) = window.alert_with_message(message) {
            log::error!("alert failed: {:?}", e);
        }
    }
}
