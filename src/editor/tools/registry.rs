use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{construct_tool, DrawingTool, ToolDescriptor, BUILTIN_TOOLS};
use crate::editor::CanvasModel;
use crate::state::{PointerEvent, StateError, StateResult};

const BUTTON_ICON_SIZE: (u32, u32) = (24, 24);
const MAX_FILL_MODE_ICON_WIDTH: u32 = 60;

/// 31-multiplier wrapping hash over UTF-16 code units. Tool mode codes are
/// derived from it, so it must stay stable across releases.
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// A tool plus the offset that made its mode code unique.
pub struct RegisteredTool {
    tool: Box<dyn DrawingTool>,
    offset: i32,
}

impl RegisteredTool {
    pub fn name(&self) -> &'static str {
        self.tool.descriptor().name
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        self.tool.descriptor()
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Mode identifier the canvas must hold for this tool to accept input.
    pub fn code(&self) -> i32 {
        name_hash(self.name()).wrapping_add(self.offset)
    }

    /// Forwards one pointer event, keeping the shared press count and
    /// reopening the session once a resolved gesture has every button up.
    pub fn handle(&self, model: &mut CanvasModel, event: PointerEvent) -> StateResult<()> {
        let code = self.code();
        if model.mode() != code {
            return Err(StateError::ModeMismatch {
                expected: code,
                actual: model.mode(),
            });
        }

        match event {
            PointerEvent::Pressed { point, right_click } => {
                model.session_mut().press();
                self.tool.pressed(model, point, right_click)
            }
            PointerEvent::Dragged { point } => self.tool.dragged(model, point),
            PointerEvent::Released { point } => {
                model.session_mut().release();
                let result = self.tool.released(model, point);
                model.session_mut().settle();
                result
            }
            PointerEvent::Clicked { point } => self.tool.clicked(model, point),
            PointerEvent::Moved { point } => self.tool.moved(model, point),
        }
    }
}

impl std::fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("name", &self.name())
            .field("offset", &self.offset)
            .field("code", &self.code())
            .finish()
    }
}

/// Mode code to tool lookup. Tools are added once at startup and never
/// removed.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: HashMap<i32, RegisteredTool>,
    order: Vec<i32>,
    asset_dir: Option<PathBuf>,
}

impl ToolRegistry {
    /// Empty registry. With an asset directory every tool's icons are
    /// checked on registration.
    pub fn new(asset_dir: Option<PathBuf>) -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
            asset_dir,
        }
    }

    pub fn with_builtin_tools(asset_dir: Option<PathBuf>) -> Self {
        Self::from_identifiers(BUILTIN_TOOLS, asset_dir)
    }

    /// Builds the registry from a tool discovery list, in order.
    pub fn from_identifiers<S: AsRef<str>>(identifiers: &[S], asset_dir: Option<PathBuf>) -> Self {
        let mut registry = Self::new(asset_dir);
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            match construct_tool(identifier) {
                Some(tool) => {
                    registry.register(tool);
                }
                None => tracing::warn!(identifier, "unknown tool identifier; skipping"),
            }
        }
        registry
    }

    /// Adds `tool` under the first free code at or after its name hash.
    /// Returns false, leaving the registry unchanged, when the tool is not
    /// well formed.
    pub fn register(&mut self, tool: Box<dyn DrawingTool>) -> bool {
        let descriptor = tool.descriptor();
        if !self.is_well_formed(&descriptor) {
            tracing::debug!(tool = descriptor.name, "tool failed well-formedness check");
            return false;
        }

        let mut code = name_hash(descriptor.name);
        let mut offset = 0i32;
        while self.tools.contains_key(&code) {
            code = code.wrapping_add(1);
            offset = offset.wrapping_add(1);
        }

        tracing::debug!(tool = descriptor.name, code, offset, "tool registered");
        self.tools.insert(code, RegisteredTool { tool, offset });
        self.order.push(code);
        true
    }

    fn is_well_formed(&self, descriptor: &ToolDescriptor) -> bool {
        if descriptor.name.is_empty() {
            return false;
        }
        let Some(asset_dir) = self.asset_dir.as_deref() else {
            return true;
        };

        match icon_dimensions(asset_dir, descriptor.button_icon) {
            Some(BUTTON_ICON_SIZE) => {}
            Some((width, height)) => {
                tracing::debug!(
                    tool = descriptor.name,
                    width,
                    height,
                    "button icon is not 24x24"
                );
                return false;
            }
            None => return false,
        }

        descriptor.fill_mode_icons.iter().all(|icon| {
            match icon_dimensions(asset_dir, icon) {
                Some((width, _)) if width <= MAX_FILL_MODE_ICON_WIDTH => true,
                Some((width, _)) => {
                    tracing::debug!(tool = descriptor.name, icon, width, "fill mode icon too wide");
                    false
                }
                None => false,
            }
        })
    }

    pub fn resolve(&self, mode: i32) -> Option<&RegisteredTool> {
        self.tools.get(&mode)
    }

    /// Code of the first tool registered under `name`.
    pub fn code_for(&self, name: &str) -> Option<i32> {
        self.tools().find(|tool| tool.name() == name).map(RegisteredTool::code)
    }

    /// Registered tools in registration order.
    pub fn tools(&self) -> impl Iterator<Item = &RegisteredTool> {
        self.order.iter().filter_map(|code| self.tools.get(code))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Makes `name` the active tool of `model`, starting from a fresh session.
    pub fn select(&self, model: &mut CanvasModel, name: &str) -> Option<i32> {
        let code = self.code_for(name)?;
        model.set_mode(code);
        model.reset_session();
        tracing::debug!(tool = name, code, "tool selected");
        Some(code)
    }

    pub fn dispatch(&self, model: &mut CanvasModel, event: PointerEvent) -> StateResult<()> {
        let tool = self
            .resolve(model.mode())
            .ok_or(StateError::UnknownMode(model.mode()))?;
        tracing::trace!(tool = tool.name(), ?event, "dispatching pointer event");
        tool.handle(model, event)
    }
}

fn icon_dimensions(asset_dir: &Path, icon: &str) -> Option<(u32, u32)> {
    let path = asset_dir.join(icon);
    match image::image_dimensions(&path) {
        Ok(dimensions) => Some(dimensions),
        Err(err) => {
            tracing::debug!(?err, ?path, "tool icon unreadable");
            None
        }
    }
}
