use super::{DrawingTool, ToolDescriptor, ToolPoint, MAGNIFIER_TOOL};
use crate::editor::CanvasModel;
use crate::state::{StateError, StateResult};

pub const ZOOMED_OUT: u32 = 1;
pub const ZOOMED_IN: u32 = 5;

/// Toggles the display scale on click. Never touches pixels or history.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagnifierTool;

impl DrawingTool for MagnifierTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(MAGNIFIER_TOOL, "magnifier.png")
    }

    fn pressed(
        &self,
        _model: &mut CanvasModel,
        _point: ToolPoint,
        _right: bool,
    ) -> StateResult<()> {
        Ok(())
    }

    fn dragged(&self, _model: &mut CanvasModel, _point: ToolPoint) -> StateResult<()> {
        Ok(())
    }

    fn released(&self, _model: &mut CanvasModel, _point: ToolPoint) -> StateResult<()> {
        Ok(())
    }

    fn clicked(&self, model: &mut CanvasModel, _point: ToolPoint) -> StateResult<()> {
        let next = match model.scale_factor() {
            ZOOMED_OUT => ZOOMED_IN,
            ZOOMED_IN => ZOOMED_OUT,
            other => return Err(StateError::UnsupportedZoom(other)),
        };
        model
            .set_scale_factor(next)
            .map_err(|_| StateError::UnsupportedZoom(next))
    }
}
