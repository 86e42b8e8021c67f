//! Request lifecycle state.

/// Where the client is in a send.
///
/// Input controls are enabled exactly when the state is `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    /// Request issued, waiting for the response head.
    Sending,
    /// Response body being consumed.
    Streaming,
}

impl RequestState {
    pub fn is_idle(self) -> bool {
        self == RequestState::Idle
    }

    pub fn controls_enabled(self) -> bool {
        self.is_idle()
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(self, next: RequestState) -> bool {
        use RequestState::*;
        matches!(
            (self, next),
            (Idle, Sending) | (Sending, Streaming) | (Sending, Idle) | (Streaming, Idle)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Sending => "sending",
            RequestState::Streaming => "streaming",
        }
    }
}
