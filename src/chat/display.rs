//! The display the client renders into.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::message::{ChatMessage, Role};

/// Operations the client needs from the surrounding UI.
///
/// Display operations cannot fail; an implementation that writes somewhere
/// fallible logs and carries on.
pub trait ChatDisplay {
    /// Append a finished message to the transcript.
    fn append_message(&mut self, message: &ChatMessage);

    /// Show the transient typing placeholder.
    fn show_typing(&mut self);

    /// Remove the typing placeholder. No-op when it is not shown.
    fn hide_typing(&mut self);

    /// Create an empty bot message that `update_reply` will fill.
    fn start_reply(&mut self);

    /// Replace the text of the reply started last.
    fn update_reply(&mut self, text: &str);

    fn scroll_to_bottom(&mut self);

    /// Enable or disable the input field and send control together.
    fn set_controls_enabled(&mut self, enabled: bool);

    fn clear_input(&mut self);

    fn focus_input(&mut self);
}

/// A display operation, as recorded by [`Transcript`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    Appended(Role),
    TypingShown,
    TypingHidden,
    ReplyStarted,
    ReplyUpdated,
    Scrolled,
    ControlsEnabled(bool),
    InputCleared,
    InputFocused,
}

#[derive(Debug)]
struct TranscriptState {
    messages: Vec<ChatMessage>,
    reply_index: Option<usize>,
    typing: bool,
    controls_enabled: bool,
    input_focused: bool,
    events: Vec<DisplayEvent>,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            reply_index: None,
            typing: false,
            controls_enabled: true,
            input_focused: false,
            events: Vec::new(),
        }
    }
}

/// In-memory display.
///
/// Clones share the same transcript, so one handle can be given to the
/// client while another inspects it.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    inner: Arc<Mutex<TranscriptState>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, TranscriptState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of all message nodes, including a reply still streaming.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state().messages.clone()
    }

    pub fn count(&self, role: Role) -> usize {
        self.state().messages.iter().filter(|m| m.role == role).count()
    }

    pub fn last_message(&self) -> Option<ChatMessage> {
        self.state().messages.last().cloned()
    }

    pub fn typing_visible(&self) -> bool {
        self.state().typing
    }

    pub fn controls_enabled(&self) -> bool {
        self.state().controls_enabled
    }

    pub fn input_focused(&self) -> bool {
        self.state().input_focused
    }

    /// Every display operation so far, in order.
    pub fn events(&self) -> Vec<DisplayEvent> {
        self.state().events.clone()
    }

    fn record(&self, event: DisplayEvent) {
        self.state().events.push(event);
    }
}

impl ChatDisplay for Transcript {
    fn append_message(&mut self, message: &ChatMessage) {
        let mut state = self.state();
        state.messages.push(message.clone());
        state.events.push(DisplayEvent::Appended(message.role));
    }

    fn show_typing(&mut self) {
        let mut state = self.state();
        state.typing = true;
        state.events.push(DisplayEvent::TypingShown);
    }

    fn hide_typing(&mut self) {
        let mut state = self.state();
        if state.typing {
            state.typing = false;
            state.events.push(DisplayEvent::TypingHidden);
        }
    }

    fn start_reply(&mut self) {
        let mut state = self.state();
        state.messages.push(ChatMessage::bot(""));
        let index = state.messages.len() - 1;
        state.reply_index = Some(index);
        state.events.push(DisplayEvent::ReplyStarted);
    }

    fn update_reply(&mut self, text: &str) {
        let mut state = self.state();
        if let Some(index) = state.reply_index {
            state.messages[index].text = text.to_string();
            state.events.push(DisplayEvent::ReplyUpdated);
        }
    }

    fn scroll_to_bottom(&mut self) {
        self.record(DisplayEvent::Scrolled);
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        let mut state = self.state();
        state.controls_enabled = enabled;
        if !enabled {
            state.input_focused = false;
        }
        state.events.push(DisplayEvent::ControlsEnabled(enabled));
    }

    fn clear_input(&mut self) {
        self.record(DisplayEvent::InputCleared);
    }

    fn focus_input(&mut self) {
        let mut state = self.state();
        state.input_focused = true;
        state.events.push(DisplayEvent::InputFocused);
    }
}
