use super::{click_color, shape_style, DrawingTool, ToolDescriptor, ToolPoint, POLYGON_TOOL};
use crate::editor::drawable::{PolygonElement, PolylineElement};
use crate::editor::{CanvasModel, Drawable};
use crate::state::{ClickCode, PointerEventKind, StateResult};

/// Vertex-by-vertex polygon. Each press/release pair with the starting button
/// adds a vertex; pressing the other button closes the shape on release.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolygonTool;

impl PolygonTool {
    /// Shows the placed vertices plus a rubber-band segment to `point`.
    fn preview(model: &mut CanvasModel, point: ToolPoint) {
        let mut points = model.session().points().to_vec();
        points.push(point);
        let color = click_color(model);
        model.set_transient(Drawable::PolygonInProgress(PolylineElement { points, color }));
    }

    fn close(model: &mut CanvasModel, point: ToolPoint) {
        model.session_mut().push_point(point);
        let polygon = PolygonElement {
            points: model.session().points().to_vec(),
            style: shape_style(model),
            label: None,
        };
        model.finalize(Drawable::Polygon(polygon));
    }
}

impl DrawingTool for PolygonTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(POLYGON_TOOL, "polygon.png").with_fill_modes()
    }

    fn pressed(
        &self,
        model: &mut CanvasModel,
        point: ToolPoint,
        right_click: bool,
    ) -> StateResult<()> {
        match model.session().click_code() {
            ClickCode::NoClicks => {
                let session = model.session_mut();
                session.push_point(point);
                session.set_right_click(right_click);
                session.set_click_code(ClickCode::DragALine);
            }
            ClickCode::DragALine => model.cancel_gesture(),
            ClickCode::ClickWaiting => {
                if model.session().is_right_click() == right_click {
                    model.session_mut().set_click_code(ClickCode::DragALine);
                    Self::preview(model, point);
                } else {
                    model.session_mut().set_click_code(ClickCode::FinalClick);
                }
            }
            ClickCode::IgnoreAll => {}
            _ => return Err(model.session().illegal(POLYGON_TOOL, PointerEventKind::Pressed)),
        }
        Ok(())
    }

    fn dragged(&self, model: &mut CanvasModel, point: ToolPoint) -> StateResult<()> {
        match model.session().click_code() {
            ClickCode::DragALine | ClickCode::FinalClick => Self::preview(model, point),
            ClickCode::IgnoreAll => {}
            _ => return Err(model.session().illegal(POLYGON_TOOL, PointerEventKind::Dragged)),
        }
        Ok(())
    }

    fn released(&self, model: &mut CanvasModel, point: ToolPoint) -> StateResult<()> {
        match model.session().click_code() {
            ClickCode::DragALine => {
                let session = model.session_mut();
                session.push_point(point);
                session.set_click_code(ClickCode::ClickWaiting);
            }
            ClickCode::FinalClick => Self::close(model, point),
            ClickCode::IgnoreAll => {}
            _ => return Err(model.session().illegal(POLYGON_TOOL, PointerEventKind::Released)),
        }
        Ok(())
    }

    fn moved(&self, model: &mut CanvasModel, point: ToolPoint) -> StateResult<()> {
        match model.session().click_code() {
            ClickCode::ClickWaiting => Self::preview(model, point),
            ClickCode::NoClicks | ClickCode::IgnoreAll => {}
            _ => return Err(model.session().illegal(POLYGON_TOOL, PointerEventKind::Moved)),
        }
        Ok(())
    }
}
