//! Status line listing the shell commands the terminal front end understands.

/// Shell command hint for the status line.
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(
        key: &'static str,
        action: &'static str,
    ) -> Self {
        Self { key, action }
    }
}

/// Build a status line from a list of hints.
pub fn build_status_bar(hints: &[KeyHint]) -> String {
    hints
        .iter()
        .map(|h| format!("{}: {}", h.key, h.action))
        .collect::<Vec<_>>()
        .join(" │ ")
}

/// Commands handled by the shell itself rather than dispatched to the app.
pub mod hints {
    use super::KeyHint;

    pub const HELP: KeyHint = KeyHint::new(":help", "Commands");
    pub const SHOW: KeyHint = KeyHint::new(":show", "Redraw");
    pub const LOG: KeyHint = KeyHint::new(":log <level>", "Log level");
    pub const QUIT: KeyHint = KeyHint::new(":quit", "Quit");

    pub const ALL: [KeyHint; 4] = [HELP, SHOW, LOG, QUIT];
}
