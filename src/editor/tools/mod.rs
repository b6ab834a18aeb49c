//! Drawing tools. Each tool is a small state machine over the canvas session;
//! the registry routes pointer events to the tool whose mode is active.

mod fill_bucket;
mod magnifier;
mod pencil;
mod polygon;
mod registry;
mod two_point;

pub use crate::geometry::{Color, ToolBounds, ToolPoint};
pub use fill_bucket::FillBucketTool;
pub use magnifier::{MagnifierTool, ZOOMED_IN, ZOOMED_OUT};
pub use pencil::PencilTool;
pub use polygon::PolygonTool;
pub use registry::{name_hash, RegisteredTool, ToolRegistry};
pub use two_point::{TwoPointShape, TwoPointTool};

use super::{CanvasModel, FillMode, ShapeStyle};
use crate::state::StateResult;

pub const LINE_TOOL: &str = "line";
pub const RECTANGLE_TOOL: &str = "rectangle";
pub const OVAL_TOOL: &str = "oval";
pub const POLYGON_TOOL: &str = "polygon";
pub const PENCIL_TOOL: &str = "pencil";
pub const FILL_BUCKET_TOOL: &str = "fill_bucket";
pub const MAGNIFIER_TOOL: &str = "magnifier";

/// Default tool discovery order.
pub const BUILTIN_TOOLS: &[&str] = &[
    LINE_TOOL,
    RECTANGLE_TOOL,
    OVAL_TOOL,
    POLYGON_TOOL,
    PENCIL_TOOL,
    FILL_BUCKET_TOOL,
    MAGNIFIER_TOOL,
];

const FILL_MODE_ICONS: &[&str] = &[
    "outline_only.png",
    "fill_other_color.png",
    "fill_same_color.png",
];

/// Resources a tool needs before it may be offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: &'static str,
    /// Toolbar button image, 24x24.
    pub button_icon: &'static str,
    /// One image per fill mode the tool honours, at most 60 pixels wide.
    pub fill_mode_icons: &'static [&'static str],
}

impl ToolDescriptor {
    pub const fn new(name: &'static str, button_icon: &'static str) -> Self {
        Self {
            name,
            button_icon,
            fill_mode_icons: &[],
        }
    }

    pub const fn with_fill_modes(self) -> Self {
        Self {
            fill_mode_icons: FILL_MODE_ICONS,
            ..self
        }
    }
}

/// The five-event contract every tool implements.
///
/// Tools are only reached through [`RegisteredTool`], which checks the canvas
/// mode, counts presses and releases, and reopens an ignored session once all
/// buttons are up. Implementations only advance their own click codes.
pub trait DrawingTool {
    fn descriptor(&self) -> ToolDescriptor;

    fn pressed(&self, model: &mut CanvasModel, point: ToolPoint, right_click: bool)
        -> StateResult<()>;

    fn dragged(&self, model: &mut CanvasModel, point: ToolPoint) -> StateResult<()>;

    fn released(&self, model: &mut CanvasModel, point: ToolPoint) -> StateResult<()>;

    fn clicked(&self, _model: &mut CanvasModel, _point: ToolPoint) -> StateResult<()> {
        Ok(())
    }

    fn moved(&self, _model: &mut CanvasModel, _point: ToolPoint) -> StateResult<()> {
        Ok(())
    }
}

/// Static constructor table behind the tool discovery list.
pub fn construct_tool(name: &str) -> Option<Box<dyn DrawingTool>> {
    let tool: Box<dyn DrawingTool> = match name {
        LINE_TOOL => Box::new(TwoPointTool::new(TwoPointShape::Line)),
        RECTANGLE_TOOL => Box::new(TwoPointTool::new(TwoPointShape::Rectangle)),
        OVAL_TOOL => Box::new(TwoPointTool::new(TwoPointShape::Oval)),
        POLYGON_TOOL => Box::new(PolygonTool),
        PENCIL_TOOL => Box::new(PencilTool),
        FILL_BUCKET_TOOL => Box::new(FillBucketTool),
        MAGNIFIER_TOOL => Box::new(MagnifierTool),
        _ => return None,
    };
    Some(tool)
}

/// Primary color for left clicks, secondary for right clicks.
pub(crate) fn click_color(model: &CanvasModel) -> Color {
    if model.session().is_right_click() {
        model.secondary_color()
    } else {
        model.primary_color()
    }
}

/// Border takes the click color; the interior takes the other color only in
/// [`FillMode::FillOtherColor`].
pub(crate) fn shape_style(model: &CanvasModel) -> ShapeStyle {
    let fill_mode = model.fill_mode();
    let (own, other) = if model.session().is_right_click() {
        (model.secondary_color(), model.primary_color())
    } else {
        (model.primary_color(), model.secondary_color())
    };
    ShapeStyle {
        border: own,
        fill: if fill_mode == FillMode::FillOtherColor {
            other
        } else {
            own
        },
        filled: fill_mode != FillMode::OutlineOnly,
    }
}
