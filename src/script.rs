//! JSON gesture scripts: a recorded sequence of tool selections, pointer
//! events and model commands replayed against a fresh document.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::editor::FillMode;
use crate::geometry::Color;
use crate::state::PointerEvent;
use crate::workspace::{DocumentId, Workspace, WorkspaceError};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid script: {0}")]
    Json(#[from] serde_json::Error),
    #[error("step {index} failed: {source}")]
    Step {
        index: usize,
        #[source]
        source: WorkspaceError,
    },
}

pub type ScriptResult<T> = std::result::Result<T, ScriptError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureScript {
    /// Canvas size; the configured default when absent.
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub opaque_background: Option<bool>,
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    SelectTool { tool: String },
    Pointer { pointer: PointerEvent },
    SetFillMode { fill_mode: FillMode },
    SetPrimaryColor { color: Color },
    SetSecondaryColor { color: Color },
    Undo,
    Redo,
    Resize { width: u32, height: u32 },
    SetScaleFactor { scale_factor: u32 },
}

pub fn parse_script(source: &str) -> ScriptResult<GestureScript> {
    Ok(serde_json::from_str(source)?)
}

pub fn load_script(path: &Path) -> ScriptResult<GestureScript> {
    let source = std::fs::read_to_string(path)?;
    parse_script(&source)
}

/// Opens a new document in `workspace` and plays every step against it.
/// Stops at the first failing step.
pub fn run_script(
    workspace: &mut Workspace,
    script: &GestureScript,
    defaults: &AppConfig,
) -> ScriptResult<DocumentId> {
    let document = workspace
        .new_document(
            script.width.unwrap_or(defaults.canvas_width),
            script.height.unwrap_or(defaults.canvas_height),
            script.opaque_background.unwrap_or(defaults.opaque_background),
        )
        .map_err(|source| ScriptError::Step { index: 0, source })?;

    for (index, step) in script.steps.iter().enumerate() {
        apply_step(workspace, step).map_err(|source| ScriptError::Step {
            index: index + 1,
            source,
        })?;
    }

    tracing::info!(
        steps = script.steps.len(),
        drawables = workspace.active().map_or(0, |model| model.history().len()),
        "script replayed"
    );
    Ok(document)
}

fn apply_step(workspace: &mut Workspace, step: &ScriptStep) -> Result<(), WorkspaceError> {
    tracing::trace!(?step, "applying script step");
    match step {
        ScriptStep::SelectTool { tool } => {
            workspace.select_tool(tool)?;
        }
        ScriptStep::Pointer { pointer } => workspace.dispatch(*pointer)?,
        ScriptStep::SetFillMode { fill_mode } => workspace.active_mut()?.set_fill_mode(*fill_mode),
        ScriptStep::SetPrimaryColor { color } => workspace.active_mut()?.set_primary_color(*color),
        ScriptStep::SetSecondaryColor { color } => {
            workspace.active_mut()?.set_secondary_color(*color);
        }
        ScriptStep::Undo => {
            if !workspace.active_mut()?.undo() {
                tracing::debug!("undo step with empty history");
            }
        }
        ScriptStep::Redo => {
            if !workspace.active_mut()?.redo() {
                tracing::debug!("redo step with nothing to redo");
            }
        }
        ScriptStep::Resize { width, height } => workspace.active_mut()?.resize(*width, *height)?,
        ScriptStep::SetScaleFactor { scale_factor } => {
            workspace.active_mut()?.set_scale_factor(*scale_factor)?;
        }
    }
    Ok(())
}
