use super::{click_color, DrawingTool, ToolDescriptor, ToolPoint, FILL_BUCKET_TOOL};
use crate::editor::drawable::FillRegionElement;
use crate::editor::{CanvasModel, Drawable};
use crate::state::StateResult;

/// Recolors the connected region under the press. Fill mode does not apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillBucketTool;

impl DrawingTool for FillBucketTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(FILL_BUCKET_TOOL, "paint_can.png")
    }

    fn pressed(
        &self,
        model: &mut CanvasModel,
        point: ToolPoint,
        right_click: bool,
    ) -> StateResult<()> {
        let inside = u32::try_from(point.x).is_ok_and(|x| x < model.width())
            && u32::try_from(point.y).is_ok_and(|y| y < model.height());
        if !inside {
            tracing::debug!(x = point.x, y = point.y, "fill seed outside the canvas");
            return Ok(());
        }

        model.session_mut().set_right_click(right_click);
        let color = click_color(model);
        model.finalize(Drawable::FillRegion(FillRegionElement {
            seed: point,
            color,
            label: None,
        }));
        Ok(())
    }

    fn dragged(&self, _model: &mut CanvasModel, _point: ToolPoint) -> StateResult<()> {
        Ok(())
    }

    fn released(&self, _model: &mut CanvasModel, _point: ToolPoint) -> StateResult<()> {
        Ok(())
    }
}
