use super::event::PointerEventKind;
use super::model::ClickCode;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

/// Protocol violations. These signal a caller bug, not bad user data: the
/// gesture is aborted and the caller is expected to reset the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("tool with mode {expected} invoked while the canvas is in mode {actual}")]
    ModeMismatch { expected: i32, actual: i32 },
    #[error("illegal click code {code:?} for {tool} on {event:?}")]
    IllegalClickCode {
        tool: &'static str,
        event: PointerEventKind,
        code: ClickCode,
    },
    #[error("{tool} found a foreign in-progress drawing ({found})")]
    UnexpectedTransient {
        tool: &'static str,
        found: &'static str,
    },
    #[error("no tool registered for mode {0}")]
    UnknownMode(i32),
    #[error("unsupported zoom level {0}")]
    UnsupportedZoom(u32),
}
