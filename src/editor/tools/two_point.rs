use super::{
    click_color, shape_style, DrawingTool, ToolBounds, ToolDescriptor, ToolPoint, LINE_TOOL,
    OVAL_TOOL, RECTANGLE_TOOL,
};
use crate::editor::drawable::{LineElement, ShapeElement};
use crate::editor::{CanvasModel, Drawable};
use crate::state::{ClickCode, PointerEventKind, StateError, StateResult};

/// Shapes defined by an anchor and the current pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoPointShape {
    Line,
    Rectangle,
    Oval,
}

impl TwoPointShape {
    const fn tool_name(self) -> &'static str {
        match self {
            Self::Line => LINE_TOOL,
            Self::Rectangle => RECTANGLE_TOOL,
            Self::Oval => OVAL_TOOL,
        }
    }

    fn build(self, model: &CanvasModel, anchor: ToolPoint, current: ToolPoint) -> Drawable {
        match self {
            Self::Line => Drawable::Line(LineElement {
                from: anchor,
                to: current,
                color: click_color(model),
                label: None,
            }),
            Self::Rectangle | Self::Oval => {
                let shape = ShapeElement {
                    bounds: ToolBounds::from_corners(anchor, current),
                    style: shape_style(model),
                    label: None,
                };
                if self == Self::Rectangle {
                    Drawable::Rectangle(shape)
                } else {
                    Drawable::Oval(shape)
                }
            }
        }
    }
}

/// Press to anchor, drag to preview, release to commit. A second press
/// before the release cancels.
#[derive(Debug, Clone, Copy)]
pub struct TwoPointTool {
    shape: TwoPointShape,
}

impl TwoPointTool {
    pub const fn new(shape: TwoPointShape) -> Self {
        Self { shape }
    }

    pub const fn shape(&self) -> TwoPointShape {
        self.shape
    }

    fn preview(&self, model: &mut CanvasModel, point: ToolPoint) -> StateResult<()> {
        let anchor = model.session().anchor().ok_or_else(|| {
            model
                .session()
                .illegal(self.shape.tool_name(), PointerEventKind::Dragged)
        })?;
        let drawable = self.shape.build(model, anchor, point);
        model.set_transient(drawable);
        Ok(())
    }
}

impl DrawingTool for TwoPointTool {
    fn descriptor(&self) -> ToolDescriptor {
        match self.shape {
            TwoPointShape::Line => ToolDescriptor::new(LINE_TOOL, "line.png"),
            TwoPointShape::Rectangle => {
                ToolDescriptor::new(RECTANGLE_TOOL, "rectangle.png").with_fill_modes()
            }
            TwoPointShape::Oval => ToolDescriptor::new(OVAL_TOOL, "oval.png").with_fill_modes(),
        }
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
                session.set_anchor(point);
                session.set_right_click(right_click);
                session.set_click_code(ClickCode::OneClick);
                Ok(())
            }
            ClickCode::OneClick => {
                model.cancel_gesture();
                Ok(())
            }
            ClickCode::IgnoreAll => Ok(()),
            _ => Err(model
                .session()
                .illegal(self.shape.tool_name(), PointerEventKind::Pressed)),
        }
    }

    fn dragged(&self, model: &mut CanvasModel, point: ToolPoint) -> StateResult<()> {
        match model.session().click_code() {
            ClickCode::OneClick => self.preview(model, point),
            ClickCode::IgnoreAll => Ok(()),
            _ => Err(model
                .session()
                .illegal(self.shape.tool_name(), PointerEventKind::Dragged)),
        }
    }

    fn released(&self, model: &mut CanvasModel, point: ToolPoint) -> StateResult<()> {
        match model.session().click_code() {
            ClickCode::OneClick => {
                self.preview(model, point)?;
                let drawable = model.take_transient();
                if drawable.is_nothing() {
                    return Err(StateError::UnexpectedTransient {
                        tool: self.shape.tool_name(),
                        found: drawable.kind().name(),
                    });
                }
                model.finalize(drawable);
                Ok(())
            }
            ClickCode::IgnoreAll => Ok(()),
            _ => Err(model
                .session()
                .illegal(self.shape.tool_name(), PointerEventKind::Released)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::tools::test_support::{
        click, drag, feed, moved, press, release, session_for, PRIMARY, SECONDARY,
    };
    use crate::editor::{FillMode, ShapeStyle};
    use crate::geometry::Color;

    fn committed_shape(model: &CanvasModel) -> ShapeElement {
        match model.history().last() {
            Some(Drawable::Rectangle(shape)) | Some(Drawable::Oval(shape)) => *shape,
            other => panic!("expected a committed shape, found {other:?}"),
        }
    }

    #[test]
    fn rectangle_gesture_commits_normalized_bounds() {
        let (registry, mut model) = session_for(RECTANGLE_TOOL);

        feed(
            &registry,
            &mut model,
            &[press(10, 10, false), drag(50, 50), release(50, 50)],
        );

        let shape = committed_shape(&model);
        assert_eq!(shape.bounds, ToolBounds::new(10, 10, 40, 40));
        assert!(!shape.style.filled);
        assert_eq!(shape.style.border, PRIMARY);
        assert_eq!(model.history()[0].name().as_deref(), Some("Rectangle-0"));
        assert_eq!(model.session().click_code(), ClickCode::NoClicks);
        assert!(model.transient().is_nothing());
    }

    #[test]
    fn dragging_up_and_left_still_yields_a_top_left_corner() {
        let (registry, mut model) = session_for(OVAL_TOOL);

        feed(
            &registry,
            &mut model,
            &[press(40, 30, false), drag(20, 35), release(5, 2)],
        );

        assert_eq!(committed_shape(&model).bounds, ToolBounds::new(5, 2, 35, 28));
    }

    #[test]
    fn drag_updates_the_preview_without_committing() {
        let (registry, mut model) = session_for(RECTANGLE_TOOL);

        feed(&registry, &mut model, &[press(1, 1, false), drag(5, 9)]);

        assert_eq!(model.transient().bounds(), Some(ToolBounds::new(1, 1, 4, 8)));
        assert!(model.history().is_empty());
        assert_eq!(model.session().click_code(), ClickCode::OneClick);
    }

    #[test]
    fn right_click_with_fill_other_color_swaps_colors() {
        let (registry, mut model) = session_for(RECTANGLE_TOOL);
        model.set_fill_mode(FillMode::FillOtherColor);

        feed(
            &registry,
            &mut model,
            &[press(2, 2, true), drag(8, 8), release(8, 8)],
        );

        assert_eq!(
            committed_shape(&model).style,
            ShapeStyle {
                border: SECONDARY,
                fill: PRIMARY,
                filled: true
            }
        );
        assert_eq!(*model.pixels().get_pixel(5, 5), PRIMARY.to_pixel());
        assert_eq!(*model.pixels().get_pixel(2, 2), SECONDARY.to_pixel());
    }

    #[test]
    fn line_uses_the_click_color_and_both_endpoints() {
        let (registry, mut model) = session_for(LINE_TOOL);

        feed(&registry, &mut model, &[press(3, 4, true), release(9, 4)]);

        match model.history() {
            [Drawable::Line(line)] => {
                assert_eq!(line.from, ToolPoint::new(3, 4));
                assert_eq!(line.to, ToolPoint::new(9, 4));
                assert_eq!(line.color, SECONDARY);
            }
            other => panic!("expected one line, found {other:?}"),
        }
        assert_eq!(*model.pixels().get_pixel(6, 4), SECONDARY.to_pixel());
    }

    #[test]
    fn second_press_cancels_and_next_gesture_starts_cleanly() {
        let (registry, mut model) = session_for(RECTANGLE_TOOL);

        feed(
            &registry,
            &mut model,
            &[press(1, 1, false), drag(6, 6), press(6, 6, true)],
        );
        assert_eq!(model.session().click_code(), ClickCode::IgnoreAll);
        assert!(model.transient().is_nothing());

        feed(&registry, &mut model, &[drag(7, 7), release(7, 7)]);
        assert_eq!(model.session().click_code(), ClickCode::IgnoreAll);
        feed(&registry, &mut model, &[release(7, 7)]);
        assert_eq!(model.session().click_code(), ClickCode::NoClicks);
        assert!(model.history().is_empty());
        assert_eq!(*model.pixels().get_pixel(1, 1), Color::WHITE.to_pixel());

        feed(
            &registry,
            &mut model,
            &[press(2, 2, false), drag(4, 4), release(4, 4)],
        );
        assert_eq!(model.history().len(), 1);
        assert_eq!(committed_shape(&model).bounds, ToolBounds::new(2, 2, 2, 2));
    }

    #[test]
    fn clicks_and_moves_are_ignored() {
        let (registry, mut model) = session_for(OVAL_TOOL);

        feed(&registry, &mut model, &[moved(3, 3), click(3, 3)]);

        assert_eq!(model.session().click_code(), ClickCode::NoClicks);
        assert!(model.transient().is_nothing());
    }

    #[test]
    fn drag_without_a_press_is_a_protocol_violation() {
        let (registry, mut model) = session_for(LINE_TOOL);

        let err = registry
            .dispatch(&mut model, drag(3, 3))
            .expect_err("drag in NoClicks must fail");

        assert!(matches!(
            err,
            StateError::IllegalClickCode {
                tool: LINE_TOOL,
                event: PointerEventKind::Dragged,
                code: ClickCode::NoClicks
            }
        ));
    }
}
