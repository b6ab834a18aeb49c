//! Canvas document model: pixel buffer, committed drawables, undo/redo and
//! the interaction session tools drive.

pub mod drawable;
pub mod fill;
mod history;
pub mod raster;
mod resize;
pub mod tools;

use std::fmt;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Color;
use crate::state::SessionState;

pub use drawable::{Drawable, DrawableCounters, DrawableKind, DrawableLabel, ShapeStyle};
pub use tools::{DrawingTool, RegisteredTool, ToolDescriptor, ToolRegistry};

pub const MIN_SCALE_FACTOR: u32 = 1;
pub const MAX_SCALE_FACTOR: u32 = 5;
const DEFAULT_DOCUMENT_NAME: &str = "Untitled";

pub type CanvasResult<T> = std::result::Result<T, CanvasError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("scale factor {0} outside the supported range 1..=5")]
    ScaleOutOfRange(u32),
    #[error("invalid canvas dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("history entry {index} is a {kind:?}, which cannot be committed")]
    UncommittedDrawable { index: usize, kind: DrawableKind },
}

/// How shape tools treat the interior of closed shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    #[default]
    OutlineOnly,
    FillOtherColor,
    FillSameColor,
}

/// Signal delivered to observers from inside the mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelChange {
    Changed,
    Saved,
    SizeChanged,
    Rescaled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(ModelChange)>;

pub struct CanvasModel {
    pixels: RgbaImage,
    baseline: RgbaImage,
    history: Vec<Drawable>,
    redo_stack: Vec<Drawable>,
    transient: Drawable,
    session: SessionState,
    mode: i32,
    fill_mode: FillMode,
    primary_color: Color,
    secondary_color: Color,
    scale_factor: u32,
    dirty: bool,
    opaque_background: bool,
    counters: DrawableCounters,
    name: String,
    save_path: Option<PathBuf>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
}

fn validate_dimensions(width: u32, height: u32) -> CanvasResult<()> {
    if width == 0 || height == 0 {
        return Err(CanvasError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn background_color(opaque_background: bool) -> Color {
    if opaque_background {
        Color::WHITE
    } else {
        Color::TRANSPARENT
    }
}

impl CanvasModel {
    /// Blank canvas, white when `opaque_background` is set and transparent
    /// otherwise.
    pub fn new(width: u32, height: u32, opaque_background: bool) -> CanvasResult<Self> {
        validate_dimensions(width, height)?;
        let background = background_color(opaque_background).to_pixel();
        Ok(Self::from_baseline(
            RgbaImage::from_pixel(width, height, background),
            opaque_background,
        ))
    }

    /// Canvas whose background is an existing raster, as when opening a
    /// plain image file.
    pub fn from_raster(raster: RgbaImage) -> CanvasResult<Self> {
        validate_dimensions(raster.width(), raster.height())?;
        Ok(Self::from_baseline(raster, true))
    }

    /// Rebuilds a document from its background and committed drawables.
    /// Counters are raised past every stored label and unlabeled drawables
    /// are stamped, so later commits never reuse a display name.
    pub fn from_parts(
        baseline: RgbaImage,
        mut drawables: Vec<Drawable>,
        mut counters: DrawableCounters,
        opaque_background: bool,
    ) -> CanvasResult<Self> {
        validate_dimensions(baseline.width(), baseline.height())?;
        for (index, drawable) in drawables.iter().enumerate() {
            let kind = drawable.kind();
            if !kind.is_committable() {
                return Err(CanvasError::UncommittedDrawable { index, kind });
            }
            if let Some(label) = drawable.label() {
                counters.cover(label);
            }
        }
        for drawable in &mut drawables {
            drawable.stamp_with(&mut counters);
        }

        let mut model = Self::from_baseline(baseline, opaque_background);
        model.history = drawables;
        model.counters = counters;
        model.redraw();
        Ok(model)
    }

    fn from_baseline(baseline: RgbaImage, opaque_background: bool) -> Self {
        Self {
            pixels: baseline.clone(),
            baseline,
            history: Vec::new(),
            redo_stack: Vec::new(),
            transient: Drawable::Nothing,
            session: SessionState::new(),
            mode: 0,
            fill_mode: FillMode::default(),
            primary_color: Color::BLACK,
            secondary_color: Color::WHITE,
            scale_factor: MIN_SCALE_FACTOR,
            dirty: false,
            opaque_background,
            counters: DrawableCounters::default(),
            name: DEFAULT_DOCUMENT_NAME.to_string(),
            save_path: None,
            listeners: Vec::new(),
            next_listener_id: 1,
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(ModelChange) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id = self.next_listener_id.saturating_add(1);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(candidate, _)| *candidate != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: ModelChange) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(change);
        }
    }

    /// Replays every committed drawable over the baseline.
    pub fn redraw(&mut self) {
        let mut pixels = self.baseline.clone();
        for drawable in &self.history {
            drawable.render(&mut pixels);
        }
        self.pixels = pixels;
    }

    /// The committed image with the in-progress drawing on top.
    pub fn composite(&self) -> RgbaImage {
        let mut image = self.pixels.clone();
        self.transient.render(&mut image);
        image
    }

    pub fn transient(&self) -> &Drawable {
        &self.transient
    }

    pub fn transient_mut(&mut self) -> &mut Drawable {
        &mut self.transient
    }

    pub fn set_transient(&mut self, drawable: Drawable) {
        self.transient = drawable;
    }

    pub fn take_transient(&mut self) -> Drawable {
        std::mem::take(&mut self.transient)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    /// Drops the gesture in progress; input is ignored until every held
    /// button is released.
    pub fn cancel_gesture(&mut self) {
        tracing::debug!(code = ?self.session.click_code(), "gesture canceled");
        self.transient = Drawable::Nothing;
        self.session.abandon_gesture();
    }

    /// Required whenever the active tool changes: tools assume a fresh
    /// session when a gesture starts.
    pub fn reset_session(&mut self) {
        self.transient = Drawable::Nothing;
        self.session.reset();
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn baseline(&self) -> &RgbaImage {
        &self.baseline
    }

    pub fn history(&self) -> &[Drawable] {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn counters(&self) -> &DrawableCounters {
        &self.counters
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// On-screen size at the current scale factor.
    pub fn effective_size(&self) -> (u32, u32) {
        (
            self.width().saturating_mul(self.scale_factor),
            self.height().saturating_mul(self.scale_factor),
        )
    }

    pub fn mode(&self) -> i32 {
        self.mode
    }

    pub fn set_mode(&mut self, mode: i32) {
        self.mode = mode;
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn set_fill_mode(&mut self, fill_mode: FillMode) {
        self.fill_mode = fill_mode;
    }

    pub fn primary_color(&self) -> Color {
        self.primary_color
    }

    pub fn set_primary_color(&mut self, color: Color) {
        self.primary_color = color;
    }

    pub fn secondary_color(&self) -> Color {
        self.secondary_color
    }

    pub fn set_secondary_color(&mut self, color: Color) {
        self.secondary_color = color;
    }

    pub fn scale_factor(&self) -> u32 {
        self.scale_factor
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn has_opaque_background(&self) -> bool {
        self.opaque_background
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn save_path(&self) -> Option<&Path> {
        self.save_path.as_deref()
    }

    pub(crate) fn mark_saved(&mut self, path: PathBuf) {
        if let Some(file_name) = path.file_name() {
            self.name = file_name.to_string_lossy().into_owned();
        }
        self.save_path = Some(path);
        self.dirty = false;
        self.notify(ModelChange::Saved);
    }

    pub(crate) fn mark_loaded(&mut self, path: PathBuf) {
        if let Some(file_name) = path.file_name() {
            self.name = file_name.to_string_lossy().into_owned();
        }
        self.save_path = Some(path);
    }
}

impl fmt::Debug for CanvasModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasModel")
            .field("name", &self.name)
            .field("dimensions", &self.pixels.dimensions())
            .field("history", &self.history.len())
            .field("redo", &self.redo_stack.len())
            .field("transient", &self.transient.kind())
            .field("session", &self.session)
            .field("mode", &self.mode)
            .field("scale_factor", &self.scale_factor)
            .field("dirty", &self.dirty)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn recording_listener(
    model: &mut CanvasModel,
) -> std::rc::Rc<std::cell::RefCell<Vec<ModelChange>>> {
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = std::rc::Rc::clone(&seen);
    model.subscribe(move |change| sink.borrow_mut().push(change));
    seen
}
