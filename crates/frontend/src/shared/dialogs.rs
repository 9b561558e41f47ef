//! Blocking browser notifications
//!
//! Controllers talk to the user through [`Dialogs`] so that the same code
//! runs against `window.alert/confirm/prompt` in the browser and against a
//! recorder in tests.

use std::rc::Rc;

pub trait Dialogs {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
    /// `None` when the user dismisses the prompt
    fn prompt(&self, message: &str, default: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserDialogs;

impl Dialogs for BrowserDialogs {
    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn prompt(&self, message: &str, default: &str) -> Option<String> {
        web_sys::window()?
            .prompt_with_message_and_default(message, default)
            .ok()?
    }
}

impl<D: Dialogs + ?Sized> Dialogs for Rc<D> {
    fn alert(&self, message: &str) {
        (**self).alert(message)
    }

    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }

    fn prompt(&self, message: &str, default: &str) -> Option<String> {
        (**self).prompt(message, default)
    }
}
