use std::fmt;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::{fill, raster};
use crate::geometry::{Color, ToolBounds, ToolPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawableKind {
    Line,
    Rectangle,
    Oval,
    PolygonInProgress,
    Polygon,
    Pencil,
    FillRegion,
    Nothing,
}

impl DrawableKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Line => "Line",
            Self::Rectangle => "Rectangle",
            Self::Oval => "Oval",
            Self::PolygonInProgress => "PolygonInProgress",
            Self::Polygon => "Polygon",
            Self::Pencil => "Scribble",
            Self::FillRegion => "FillRegion",
            Self::Nothing => "Nothing",
        }
    }

    /// Kinds that can sit in history and therefore get a display counter.
    pub const fn is_committable(self) -> bool {
        !matches!(self, Self::PolygonInProgress | Self::Nothing)
    }
}

/// Permanent display name handed out when a drawable is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawableLabel {
    pub kind: DrawableKind,
    pub index: u32,
}

impl fmt::Display for DrawableLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.name(), self.index)
    }
}

/// Per-document label counters, one per committable kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawableCounters {
    line: u32,
    rectangle: u32,
    oval: u32,
    polygon: u32,
    pencil: u32,
    fill_region: u32,
}

impl DrawableCounters {
    fn slot(&mut self, kind: DrawableKind) -> Option<&mut u32> {
        match kind {
            DrawableKind::Line => Some(&mut self.line),
            DrawableKind::Rectangle => Some(&mut self.rectangle),
            DrawableKind::Oval => Some(&mut self.oval),
            DrawableKind::Polygon => Some(&mut self.polygon),
            DrawableKind::Pencil => Some(&mut self.pencil),
            DrawableKind::FillRegion => Some(&mut self.fill_region),
            DrawableKind::PolygonInProgress | DrawableKind::Nothing => None,
        }
    }

    pub fn next_label(&mut self, kind: DrawableKind) -> Option<DrawableLabel> {
        let slot = self.slot(kind)?;
        let index = *slot;
        *slot = slot.saturating_add(1);
        Some(DrawableLabel { kind, index })
    }

    /// Raises the counter for `label.kind` so it never hands out
    /// `label.index` again.
    pub fn cover(&mut self, label: DrawableLabel) {
        if let Some(slot) = self.slot(label.kind) {
            *slot = (*slot).max(label.index.saturating_add(1));
        }
    }

    pub fn peek(&self, kind: DrawableKind) -> Option<u32> {
        let mut copy = *self;
        copy.slot(kind).map(|slot| *slot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub border: Color,
    pub fill: Color,
    pub filled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineElement {
    pub from: ToolPoint,
    pub to: ToolPoint,
    pub color: Color,
    #[serde(default)]
    pub label: Option<DrawableLabel>,
}

/// Geometry shared by rectangles and ovals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeElement {
    pub bounds: ToolBounds,
    pub style: ShapeStyle,
    #[serde(default)]
    pub label: Option<DrawableLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolylineElement {
    pub points: Vec<ToolPoint>,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolygonElement {
    pub points: Vec<ToolPoint>,
    pub style: ShapeStyle,
    #[serde(default)]
    pub label: Option<DrawableLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PencilStroke {
    pub points: Vec<ToolPoint>,
    pub color: Color,
    #[serde(default)]
    pub label: Option<DrawableLabel>,
}

impl PencilStroke {
    pub fn new(start: ToolPoint, color: Color) -> Self {
        Self {
            points: vec![start],
            color,
            label: None,
        }
    }

    pub fn append_point(&mut self, point: ToolPoint) {
        self.points.push(point);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillRegionElement {
    pub seed: ToolPoint,
    pub color: Color,
    #[serde(default)]
    pub label: Option<DrawableLabel>,
}

/// Everything that can be previewed on, or committed to, a canvas.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Drawable {
    Line(LineElement),
    Rectangle(ShapeElement),
    Oval(ShapeElement),
    PolygonInProgress(PolylineElement),
    Polygon(PolygonElement),
    Pencil(PencilStroke),
    FillRegion(FillRegionElement),
    #[default]
    Nothing,
}

impl Drawable {
    pub const fn kind(&self) -> DrawableKind {
        match self {
            Self::Line(_) => DrawableKind::Line,
            Self::Rectangle(_) => DrawableKind::Rectangle,
            Self::Oval(_) => DrawableKind::Oval,
            Self::PolygonInProgress(_) => DrawableKind::PolygonInProgress,
            Self::Polygon(_) => DrawableKind::Polygon,
            Self::Pencil(_) => DrawableKind::Pencil,
            Self::FillRegion(_) => DrawableKind::FillRegion,
            Self::Nothing => DrawableKind::Nothing,
        }
    }

    pub const fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    pub fn label(&self) -> Option<DrawableLabel> {
        match self {
            Self::Line(line) => line.label,
            Self::Rectangle(shape) | Self::Oval(shape) => shape.label,
            Self::Polygon(polygon) => polygon.label,
            Self::Pencil(stroke) => stroke.label,
            Self::FillRegion(fill) => fill.label,
            Self::PolygonInProgress(_) | Self::Nothing => None,
        }
    }

    /// Display name, present once the drawable has been committed.
    pub fn name(&self) -> Option<String> {
        self.label().map(|label| label.to_string())
    }

    fn label_slot(&mut self) -> Option<&mut Option<DrawableLabel>> {
        match self {
            Self::Line(line) => Some(&mut line.label),
            Self::Rectangle(shape) | Self::Oval(shape) => Some(&mut shape.label),
            Self::Polygon(polygon) => Some(&mut polygon.label),
            Self::Pencil(stroke) => Some(&mut stroke.label),
            Self::FillRegion(fill) => Some(&mut fill.label),
            Self::PolygonInProgress(_) | Self::Nothing => None,
        }
    }

    /// Assigns the permanent label unless one is already present.
    pub(crate) fn stamp_with(&mut self, counters: &mut DrawableCounters) {
        let kind = self.kind();
        if let Some(slot) = self.label_slot() {
            if slot.is_none() {
                *slot = counters.next_label(kind);
            }
        }
    }

    pub fn as_pencil_mut(&mut self) -> Option<&mut PencilStroke> {
        match self {
            Self::Pencil(stroke) => Some(stroke),
            _ => None,
        }
    }

    pub fn bounds(&self) -> Option<ToolBounds> {
        match self {
            Self::Rectangle(shape) | Self::Oval(shape) => Some(shape.bounds),
            Self::Line(line) => Some(ToolBounds::from_corners(line.from, line.to)),
            _ => None,
        }
    }

    /// Draws onto `image`. A fill region recolors whatever `image` currently
    /// holds, so its result depends on everything drawn before it.
    pub fn render(&self, image: &mut RgbaImage) {
        match self {
            Self::Line(line) => raster::draw_line(image, line.from, line.to, line.color),
            Self::Rectangle(shape) => {
                if shape.style.filled {
                    raster::fill_rect(image, shape.bounds, shape.style.fill);
                }
                raster::stroke_rect(image, shape.bounds, shape.style.border);
            }
            Self::Oval(shape) => {
                if shape.style.filled {
                    raster::fill_ellipse(image, shape.bounds, shape.style.fill);
                }
                raster::stroke_ellipse(image, shape.bounds, shape.style.border);
            }
            Self::PolygonInProgress(polyline) => {
                raster::draw_polyline(image, &polyline.points, polyline.color);
            }
            Self::Polygon(polygon) => {
                if polygon.style.filled {
                    raster::fill_polygon(image, &polygon.points, polygon.style.fill);
                }
                raster::stroke_polygon(image, &polygon.points, polygon.style.border);
            }
            Self::Pencil(stroke) => raster::draw_polyline(image, &stroke.points, stroke.color),
            Self::FillRegion(region) => {
                fill::flood_fill(image, region.seed, region.color);
            }
            Self::Nothing => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle() -> Drawable {
        Drawable::Rectangle(ShapeElement {
            bounds: ToolBounds::new(1, 1, 3, 3),
            style: ShapeStyle {
                border: Color::BLACK,
                fill: Color::new(0, 0, 255),
                filled: true,
            },
            label: None,
        })
    }

    #[test]
    fn counters_are_independent_per_kind() {
        let mut counters = DrawableCounters::default();
        let first = counters.next_label(DrawableKind::Line).expect("line label");
        let second = counters.next_label(DrawableKind::Line).expect("line label");
        let oval = counters.next_label(DrawableKind::Oval).expect("oval label");

        assert_eq!(first.to_string(), "Line-0");
        assert_eq!(second.to_string(), "Line-1");
        assert_eq!(oval.to_string(), "Oval-0");
        assert_eq!(counters.peek(DrawableKind::Line), Some(2));
        assert_eq!(counters.next_label(DrawableKind::Nothing), None);
    }

    #[test]
    fn stamping_is_applied_once() {
        let mut counters = DrawableCounters::default();
        let mut drawable = rectangle();
        assert_eq!(drawable.name(), None);

        drawable.stamp_with(&mut counters);
        drawable.stamp_with(&mut counters);

        assert_eq!(drawable.name().as_deref(), Some("Rectangle-0"));
        assert_eq!(counters.peek(DrawableKind::Rectangle), Some(1));
    }

    #[test]
    fn filled_rectangle_draws_border_over_fill() {
        let mut image = RgbaImage::from_pixel(6, 6, Color::WHITE.to_pixel());
        rectangle().render(&mut image);

        assert_eq!(*image.get_pixel(1, 1), Color::BLACK.to_pixel());
        assert_eq!(*image.get_pixel(2, 2), Color::new(0, 0, 255).to_pixel());
        assert_eq!(*image.get_pixel(4, 4), Color::BLACK.to_pixel());
        assert_eq!(*image.get_pixel(5, 5), Color::WHITE.to_pixel());
    }

    #[test]
    fn nothing_renders_nothing() {
        let mut image = RgbaImage::from_pixel(3, 3, Color::WHITE.to_pixel());
        let before = image.clone();
        Drawable::Nothing.render(&mut image);
        assert_eq!(image, before);
    }

    #[test]
    fn drawables_serialize_with_a_kind_tag() {
        let json = serde_json::to_value(rectangle()).expect("rectangle should serialize");
        assert_eq!(json["kind"], "rectangle");

        let back: Drawable = serde_json::from_value(json).expect("rectangle should deserialize");
        assert_eq!(back, rectangle());
    }
}
