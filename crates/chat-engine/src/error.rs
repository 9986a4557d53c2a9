use thiserror::Error;

/// Reason a new chat was turned away at admission.
///
/// Both variants are expected business outcomes: the caller should retry
/// later or show a "busy" message. The `Display` text is part of the
/// client-facing contract.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// Outside office hours and the current team's queue is saturated
    #[error("queue is full")]
    QueueFull,

    /// During office hours, with both the current team and the overflow
    /// tier saturated
    #[error("queue and overflow are full")]
    QueueAndOverflowFull,
}

/// Error types for chat engine operations
///
/// # Examples
///
/// ```
/// use rvoip_chat_engine::{ChatQueueError, Refusal, Result};
///
/// fn start_chat() -> Result<()> {
///     Err(ChatQueueError::Refused(Refusal::QueueFull))
/// }
///
/// match start_chat() {
///     Ok(_) => println!("Chat queued"),
///     Err(ChatQueueError::Refused(reason)) => println!("Busy: {}", reason),
///     Err(e) => println!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum ChatQueueError {
    /// Admission refused the chat
    #[error("Chat refused - {0}")]
    Refused(Refusal),

    /// Caller broke an input contract (e.g. blank session id)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration validation, parsing or roster construction errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal invariant violations. These are defects, never transient
    /// conditions: the engine performs no I/O.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<Refusal> for ChatQueueError {
    fn from(reason: Refusal) -> Self {
        Self::Refused(reason)
    }
}

impl From<config::ConfigError> for ChatQueueError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl ChatQueueError {
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// The admission refusal carried by this error, if any
    pub fn refusal(&self) -> Option<Refusal> {
        match self {
            Self::Refused(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Result type for chat engine operations
pub type Result<T> = std::result::Result<T, ChatQueueError>;
