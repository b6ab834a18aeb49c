//! Open documents plus the shared tool registry, as a host application
//! would hold them.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::editor::{CanvasError, CanvasModel, ToolRegistry};
use crate::state::{PointerEvent, StateError};
use crate::storage::{self, DocumentFormat, StorageError};

const UNTITLED_PREFIX: &str = "Untitled-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("no open document")]
    NoActiveDocument,
    #[error("unknown document {0}")]
    UnknownDocument(DocumentId),
    #[error("no tool named {0:?} is registered")]
    UnknownTool(String),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type WorkspaceResult<T> = std::result::Result<T, WorkspaceError>;

#[derive(Debug)]
pub struct Workspace {
    registry: ToolRegistry,
    documents: BTreeMap<DocumentId, CanvasModel>,
    active: Option<DocumentId>,
    next_id: u64,
    untitled_count: u32,
}

impl Workspace {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            documents: BTreeMap::new(),
            active: None,
            next_id: 1,
            untitled_count: 0,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Blank document named `Untitled-N`, made active with the first
    /// registered tool selected.
    pub fn new_document(
        &mut self,
        width: u32,
        height: u32,
        opaque_background: bool,
    ) -> WorkspaceResult<DocumentId> {
        let mut model = CanvasModel::new(width, height, opaque_background)?;
        model.set_name(format!("{UNTITLED_PREFIX}{}", self.untitled_count));
        self.untitled_count = self.untitled_count.saturating_add(1);
        Ok(self.insert(model))
    }

    pub fn open(&mut self, path: &Path) -> WorkspaceResult<DocumentId> {
        let model = storage::load_document(path)?;
        Ok(self.insert(model))
    }

    /// Takes ownership of `model` and makes it the active document.
    pub fn insert(&mut self, mut model: CanvasModel) -> DocumentId {
        if let Some(first) = self.registry.tools().next() {
            let name = first.name();
            self.registry.select(&mut model, name);
        }
        let id = DocumentId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        tracing::debug!(%id, name = model.name(), "document opened");
        self.documents.insert(id, model);
        self.active = Some(id);
        id
    }

    /// Hands the model back to the caller; dropping it releases the document.
    pub fn close(&mut self, id: DocumentId) -> Option<CanvasModel> {
        let model = self.documents.remove(&id)?;
        if self.active == Some(id) {
            self.active = self.documents.keys().next_back().copied();
        }
        tracing::debug!(%id, dirty = model.is_dirty(), "document closed");
        Some(model)
    }

    pub fn document(&self, id: DocumentId) -> Option<&CanvasModel> {
        self.documents.get(&id)
    }

    pub fn document_mut(&mut self, id: DocumentId) -> Option<&mut CanvasModel> {
        self.documents.get_mut(&id)
    }

    pub fn documents(&self) -> impl Iterator<Item = (DocumentId, &CanvasModel)> {
        self.documents.iter().map(|(id, model)| (*id, model))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active
    }

    pub fn set_active(&mut self, id: DocumentId) -> WorkspaceResult<()> {
        if !self.documents.contains_key(&id) {
            return Err(WorkspaceError::UnknownDocument(id));
        }
        self.active = Some(id);
        Ok(())
    }

    pub fn active(&self) -> WorkspaceResult<&CanvasModel> {
        self.active
            .and_then(|id| self.documents.get(&id))
            .ok_or(WorkspaceError::NoActiveDocument)
    }

    pub fn active_mut(&mut self) -> WorkspaceResult<&mut CanvasModel> {
        self.active
            .and_then(|id| self.documents.get_mut(&id))
            .ok_or(WorkspaceError::NoActiveDocument)
    }

    pub fn select_tool(&mut self, name: &str) -> WorkspaceResult<i32> {
        let Some(model) = self.active.and_then(|id| self.documents.get_mut(&id)) else {
            return Err(WorkspaceError::NoActiveDocument);
        };
        self.registry
            .select(model, name)
            .ok_or_else(|| WorkspaceError::UnknownTool(name.to_string()))
    }

    /// Routes `event` to the active document's tool. A protocol violation
    /// aborts the gesture and leaves the document with a fresh session.
    pub fn dispatch(&mut self, event: PointerEvent) -> WorkspaceResult<()> {
        let Some(model) = self.active.and_then(|id| self.documents.get_mut(&id)) else {
            return Err(WorkspaceError::NoActiveDocument);
        };
        if let Err(err) = self.registry.dispatch(model, event) {
            tracing::warn!(%err, ?event, "gesture aborted");
            model.reset_session();
            return Err(err.into());
        }
        Ok(())
    }

    pub fn save_active(&mut self, path: &Path, format: DocumentFormat) -> WorkspaceResult<PathBuf> {
        let model = self.active_mut()?;
        Ok(storage::save_document(model, path, format)?)
    }
}
