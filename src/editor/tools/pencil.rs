use super::{click_color, DrawingTool, ToolDescriptor, ToolPoint, PENCIL_TOOL};
use crate::editor::drawable::PencilStroke;
use crate::editor::{CanvasModel, Drawable};
use crate::state::{ClickCode, PointerEventKind, StateError, StateResult};

/// Freehand one-pixel strokes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PencilTool;

impl PencilTool {
    fn extend(model: &mut CanvasModel, point: ToolPoint) -> StateResult<()> {
        let transient = model.transient_mut();
        let found = transient.kind().name();
        let stroke = transient.as_pencil_mut().ok_or(StateError::UnexpectedTransient {
            tool: PENCIL_TOOL,
            found,
        })?;
        stroke.append_point(point);
        Ok(())
    }
}

impl DrawingTool for PencilTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(PENCIL_TOOL, "pencil.png")
    }

    fn pressed(
        &self,
        model: &mut CanvasModel,
        point: ToolPoint,
        right_click: bool,
    ) -> StateResult<()> {
        match model.session().click_code() {
            ClickCode::NoClicks => {
                model.session_mut().set_right_click(right_click);
                model.session_mut().set_click_code(ClickCode::DragALine);
                let color = click_color(model);
                model.set_transient(Drawable::Pencil(PencilStroke::new(point, color)));
            }
            ClickCode::DragALine => model.cancel_gesture(),
            ClickCode::IgnoreAll => {}
            _ => return Err(model.session().illegal(PENCIL_TOOL, PointerEventKind::Pressed)),
        }
        Ok(())
    }

    fn dragged(&self, model: &mut CanvasModel, point: ToolPoint) -> StateResult<()> {
        match model.session().click_code() {
            ClickCode::DragALine => Self::extend(model, point),
            ClickCode::IgnoreAll => Ok(()),
            _ => Err(model.session().illegal(PENCIL_TOOL, PointerEventKind::Dragged)),
        }
    }

    fn released(&self, model: &mut CanvasModel, point: ToolPoint) -> StateResult<()> {
        match model.session().click_code() {
            ClickCode::DragALine => {
                Self::extend(model, point)?;
                let stroke = model.take_transient();
                model.finalize(stroke);
                Ok(())
            }
            ClickCode::IgnoreAll => Ok(()),
            _ => Err(model.session().illegal(PENCIL_TOOL, PointerEventKind::Released)),
        }
    }
}
