use image::imageops;

use super::*;

impl CanvasModel {
    /// Crops or extends the canvas, keeping the top-left content. New area is
    /// white on opaque canvases and transparent otherwise; history is replayed
    /// over the resized baseline.
    pub fn resize(&mut self, width: u32, height: u32) -> CanvasResult<()> {
        validate_dimensions(width, height)?;

        let background = background_color(self.opaque_background).to_pixel();
        let mut baseline = RgbaImage::from_pixel(width, height, background);
        imageops::replace(&mut baseline, &self.baseline, 0, 0);
        self.baseline = baseline;
        self.redraw();
        self.dirty = true;

        tracing::debug!(width, height, "canvas resized");
        self.notify(ModelChange::SizeChanged);
        self.notify(ModelChange::Changed);
        Ok(())
    }

    /// Display zoom; pixel data is untouched.
    pub fn set_scale_factor(&mut self, scale_factor: u32) -> CanvasResult<()> {
        if !(MIN_SCALE_FACTOR..=MAX_SCALE_FACTOR).contains(&scale_factor) {
            return Err(CanvasError::ScaleOutOfRange(scale_factor));
        }
        self.scale_factor = scale_factor;
        self.notify(ModelChange::Rescaled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::drawable::LineElement;
    use crate::editor::recording_listener;
    use crate::geometry::ToolPoint;

    #[test]
    fn growing_keeps_content_and_whitens_new_area() {
        let mut model = CanvasModel::new(4, 4, true).expect("canvas should build");
        model.finalize(Drawable::Line(LineElement {
            from: ToolPoint::new(0, 0),
            to: ToolPoint::new(3, 0),
            color: Color::BLACK,
            label: None,
        }));
        let seen = recording_listener(&mut model);

        model.resize(6, 5).expect("resize should succeed");

        assert_eq!(model.dimensions(), (6, 5));
        assert_eq!(model.baseline().dimensions(), (6, 5));
        assert_eq!(*model.pixels().get_pixel(3, 0), Color::BLACK.to_pixel());
        assert_eq!(*model.pixels().get_pixel(5, 4), Color::WHITE.to_pixel());
        assert_eq!(
            seen.borrow().as_slice(),
            &[ModelChange::SizeChanged, ModelChange::Changed]
        );
    }

    #[test]
    fn growing_a_transparent_canvas_stays_transparent() {
        let mut model = CanvasModel::new(2, 2, false).expect("canvas should build");
        model.resize(3, 3).expect("resize should succeed");
        assert_eq!(*model.pixels().get_pixel(2, 2), Color::TRANSPARENT.to_pixel());
    }

    #[test]
    fn shrinking_crops_the_baseline() {
        let mut raster = RgbaImage::from_pixel(5, 5, Color::WHITE.to_pixel());
        raster.put_pixel(1, 1, Color::BLACK.to_pixel());
        raster.put_pixel(4, 4, Color::BLACK.to_pixel());
        let mut model = CanvasModel::from_raster(raster).expect("canvas should build");

        model.resize(2, 2).expect("resize should succeed");

        assert_eq!(model.dimensions(), (2, 2));
        assert_eq!(*model.pixels().get_pixel(1, 1), Color::BLACK.to_pixel());
    }

    #[test]
    fn resize_rejects_zero_dimensions() {
        let mut model = CanvasModel::new(2, 2, true).expect("canvas should build");
        assert!(model.resize(0, 2).is_err());
        assert_eq!(model.dimensions(), (2, 2));
    }

    #[test]
    fn scale_factor_outside_range_is_rejected_without_side_effects() {
        let mut model = CanvasModel::new(2, 2, true).expect("canvas should build");
        let seen = recording_listener(&mut model);

        assert_eq!(model.set_scale_factor(0), Err(CanvasError::ScaleOutOfRange(0)));
        assert_eq!(model.set_scale_factor(6), Err(CanvasError::ScaleOutOfRange(6)));
        assert_eq!(model.scale_factor(), 1);
        assert!(seen.borrow().is_empty());

        model.set_scale_factor(5).expect("scale 5 is valid");
        assert_eq!(model.effective_size(), (10, 10));
        assert_eq!(seen.borrow().as_slice(), &[ModelChange::Rescaled]);
        assert!(!model.is_dirty());
    }
}
