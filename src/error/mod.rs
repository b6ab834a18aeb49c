use crate::editor::CanvasError;
use crate::script::ScriptError;
use crate::state::StateError;
use crate::storage::StorageError;
use crate::workspace::WorkspaceError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Script(#[from] ScriptError),
}
