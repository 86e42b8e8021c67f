//! Terminal rendering of the transcript.

use std::io::Write;

use super::display::ChatDisplay;
use crate::config::UiConfig;
use crate::message::{ChatMessage, Role};

/// Erase the current terminal line and return to column 0.
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Display that prints the transcript to a terminal.
///
/// Replies are printed incrementally: each update writes only the text
/// not yet on screen.
pub struct TerminalDisplay<W: Write> {
    out: W,
    ui: UiConfig,
    /// Print user messages (off when the user's own typing is already visible).
    echo_user: bool,
    /// Prompt written when the input regains focus.
    prompt: Option<String>,
    typing: bool,
    in_reply: bool,
    printed: usize,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, ui: UiConfig) -> Self {
        Self {
            out,
            ui,
            echo_user: true,
            prompt: None,
            typing: false,
            in_reply: false,
            printed: 0,
        }
    }

    pub fn echo_user(mut self, echo: bool) -> Self {
        self.echo_user = echo;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn label(&self, role: Role) -> &str {
        match role {
            Role::User => &self.ui.user_label,
            Role::Bot => &self.ui.bot_label,
        }
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            tracing::debug!(error = %e, "terminal write failed");
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.out.flush() {
            tracing::debug!(error = %e, "terminal flush failed");
        }
    }

    fn end_reply_line(&mut self) {
        if self.in_reply {
            self.write("\n");
            self.in_reply = false;
        }
    }
}

impl<W: Write> ChatDisplay for TerminalDisplay<W> {
    fn append_message(&mut self, message: &ChatMessage) {
        self.hide_typing();
        self.end_reply_line();
        if message.role == Role::User && !self.echo_user {
            return;
        }
        let line = format!("{}: {}\n", self.label(message.role), message.text);
        self.write(&line);
    }

    fn show_typing(&mut self) {
        let line = format!("{}: {}", self.ui.bot_label, self.ui.typing_indicator);
        self.write(&line);
        self.flush();
        self.typing = true;
    }

    fn hide_typing(&mut self) {
        if self.typing {
            self.write(CLEAR_LINE);
            self.typing = false;
        }
    }

    fn start_reply(&mut self) {
        self.end_reply_line();
        let head = format!("{}: ", self.ui.bot_label);
        self.write(&head);
        self.in_reply = true;
        self.printed = 0;
    }

    fn update_reply(&mut self, text: &str) {
        if text.len() >= self.printed && text.is_char_boundary(self.printed) {
            let fresh = text[self.printed..].to_string();
            self.write(&fresh);
        } else {
            // Not an extension of what is on screen; redraw the line
            let line = format!("{}{}: {}", CLEAR_LINE, self.ui.bot_label, text);
            self.write(&line);
        }
        self.printed = text.len();
    }

    fn scroll_to_bottom(&mut self) {
        self.flush();
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        if enabled {
            self.end_reply_line();
            self.flush();
        }
    }

    fn clear_input(&mut self) {}

    fn focus_input(&mut self) {
        if let Some(prompt) = self.prompt.clone() {
            self.write(&prompt);
            self.flush();
        }
    }
}
