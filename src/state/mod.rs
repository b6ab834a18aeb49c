//! Drawing-session protocol: click codes, pointer events and the per-document
//! session state tools advance.

pub mod error;
pub mod event;
pub mod machine;
pub mod model;

pub use error::{StateError, StateResult};
pub use event::{PointerEvent, PointerEventKind};
pub use machine::SessionState;
pub use model::ClickCode;
