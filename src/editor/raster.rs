//! Pixel primitives over an RGBA raster.
//!
//! Pixels are written, not blended. Coordinates are clipped against the raster
//! so shapes may extend past the canvas edge. Outlines follow the usual
//! raster convention of covering `x..=x + width`, fills cover `x..x + width`.

use image::{Rgba, RgbaImage};

use crate::geometry::{Color, ToolBounds, ToolPoint};

fn put_pixel(image: &mut RgbaImage, x: i64, y: i64, pixel: Rgba<u8>) {
    let (width, height) = image.dimensions();
    if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
        return;
    }
    // both coordinates are within u32 range after the bounds check
    image.put_pixel(x as u32, y as u32, pixel);
}

fn fill_span(image: &mut RgbaImage, y: i64, from_x: i64, to_x: i64, pixel: Rgba<u8>) {
    let (width, height) = image.dimensions();
    if y < 0 || y >= i64::from(height) {
        return;
    }
    let start = from_x.max(0);
    let end = to_x.min(i64::from(width) - 1);
    for x in start..=end {
        image.put_pixel(x as u32, y as u32, pixel);
    }
}

/// Inclusive range `from..=to` clamped to `0..limit`.
fn clamp_range(from: i64, to: i64, limit: u32) -> std::ops::RangeInclusive<i64> {
    from.max(0)..=to.min(i64::from(limit) - 1)
}

/// Portion of the segment that lies on the raster, found by Liang-Barsky
/// clipping. Segments already inside come back unchanged.
fn clip_segment(image: &RgbaImage, from: ToolPoint, to: ToolPoint) -> Option<[(i64, i64); 2]> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }
    let (x0, y0) = (f64::from(from.x), f64::from(from.y));
    let dx = f64::from(to.x) - x0;
    let dy = f64::from(to.y) - y0;
    let (max_x, max_y) = (f64::from(width - 1), f64::from(height - 1));

    let (mut enter, mut leave) = (0.0f64, 1.0f64);
    for (direction, distance) in [(-dx, x0), (dx, max_x - x0), (-dy, y0), (dy, max_y - y0)] {
        if direction == 0.0 {
            if distance < 0.0 {
                return None;
            }
            continue;
        }
        let t = distance / direction;
        if direction < 0.0 {
            enter = enter.max(t);
        } else {
            leave = leave.min(t);
        }
        if enter > leave {
            return None;
        }
    }

    let at = |t: f64| ((x0 + t * dx).round() as i64, (y0 + t * dy).round() as i64);
    Some([at(enter), at(leave)])
}

pub fn draw_line(image: &mut RgbaImage, from: ToolPoint, to: ToolPoint, color: Color) {
    let Some([(mut x, mut y), (end_x, end_y)]) = clip_segment(image, from, to) else {
        return;
    };
    let pixel = color.to_pixel();
    let dx = (end_x - x).abs();
    let dy = -(end_y - y).abs();
    let step_x = if x < end_x { 1 } else { -1 };
    let step_y = if y < end_y { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put_pixel(image, x, y, pixel);
        if x == end_x && y == end_y {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x += step_x;
        }
        if doubled <= dx {
            err += dx;
            y += step_y;
        }
    }
}

/// Open chain of segments; a single point plots one pixel.
pub fn draw_polyline(image: &mut RgbaImage, points: &[ToolPoint], color: Color) {
    match points {
        [] => {}
        [only] => draw_line(image, *only, *only, color),
        _ => {
            for segment in points.windows(2) {
                draw_line(image, segment[0], segment[1], color);
            }
        }
    }
}

pub fn stroke_rect(image: &mut RgbaImage, bounds: ToolBounds, color: Color) {
    let left = bounds.x;
    let top = bounds.y;
    let right = i32::try_from(bounds.right()).unwrap_or(i32::MAX);
    let bottom = i32::try_from(bounds.bottom()).unwrap_or(i32::MAX);

    draw_line(image, ToolPoint::new(left, top), ToolPoint::new(right, top), color);
    draw_line(image, ToolPoint::new(right, top), ToolPoint::new(right, bottom), color);
    draw_line(image, ToolPoint::new(right, bottom), ToolPoint::new(left, bottom), color);
    draw_line(image, ToolPoint::new(left, bottom), ToolPoint::new(left, top), color);
}

pub fn fill_rect(image: &mut RgbaImage, bounds: ToolBounds, color: Color) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let pixel = color.to_pixel();
    for y in clamp_range(i64::from(bounds.y), bounds.bottom() - 1, image.height()) {
        fill_span(image, y, i64::from(bounds.x), bounds.right() - 1, pixel);
    }
}

struct Ellipse {
    center_x: f64,
    center_y: f64,
    radius_x: f64,
    radius_y: f64,
}

impl Ellipse {
    fn inscribed(bounds: ToolBounds) -> Self {
        let radius_x = f64::from(bounds.width) / 2.0;
        let radius_y = f64::from(bounds.height) / 2.0;
        Self {
            center_x: f64::from(bounds.x) + radius_x,
            center_y: f64::from(bounds.y) + radius_y,
            radius_x,
            radius_y,
        }
    }

    fn half_width_at(&self, y: f64) -> f64 {
        let t = (y - self.center_y) / self.radius_y;
        self.radius_x * (1.0 - t * t).max(0.0).sqrt()
    }

    fn half_height_at(&self, x: f64) -> f64 {
        let t = (x - self.center_x) / self.radius_x;
        self.radius_y * (1.0 - t * t).max(0.0).sqrt()
    }
}

pub fn stroke_ellipse(image: &mut RgbaImage, bounds: ToolBounds, color: Color) {
    if bounds.width == 0 || bounds.height == 0 {
        let corner = ToolPoint::new(bounds.x, bounds.y);
        let far = ToolPoint::new(
            i32::try_from(bounds.right()).unwrap_or(i32::MAX),
            i32::try_from(bounds.bottom()).unwrap_or(i32::MAX),
        );
        draw_line(image, corner, far, color);
        return;
    }

    let pixel = color.to_pixel();
    let ellipse = Ellipse::inscribed(bounds);

    // sample both axes so steep and shallow arcs stay connected
    // only samples whose own axis lands on the raster can plot
    for x in clamp_range(i64::from(bounds.x), bounds.right(), image.width()) {
        let offset = ellipse.half_height_at(x as f64);
        put_pixel(image, x, (ellipse.center_y - offset).round() as i64, pixel);
        put_pixel(image, x, (ellipse.center_y + offset).round() as i64, pixel);
    }
    for y in clamp_range(i64::from(bounds.y), bounds.bottom(), image.height()) {
        let offset = ellipse.half_width_at(y as f64);
        put_pixel(image, (ellipse.center_x - offset).round() as i64, y, pixel);
        put_pixel(image, (ellipse.center_x + offset).round() as i64, y, pixel);
    }
}

pub fn fill_ellipse(image: &mut RgbaImage, bounds: ToolBounds, color: Color) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let pixel = color.to_pixel();
    let ellipse = Ellipse::inscribed(bounds);

    for y in clamp_range(i64::from(bounds.y), bounds.bottom() - 1, image.height()) {
        let offset = ellipse.half_width_at(y as f64 + 0.5);
        let from_x = (ellipse.center_x - offset - 0.5).ceil() as i64;
        let to_x = (ellipse.center_x + offset - 0.5).floor() as i64;
        if from_x <= to_x {
            fill_span(image, y, from_x, to_x, pixel);
        }
    }
}

/// Closed outline through `points`.
pub fn stroke_polygon(image: &mut RgbaImage, points: &[ToolPoint], color: Color) {
    draw_polyline(image, points, color);
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if points.len() > 2 {
            draw_line(image, *last, *first, color);
        }
    }
}

/// Even-odd scanline fill sampled at pixel centers.
pub fn fill_polygon(image: &mut RgbaImage, points: &[ToolPoint], color: Color) {
    if points.len() < 3 {
        return;
    }
    let pixel = color.to_pixel();
    let min_y = points.iter().map(|p| p.y).min().unwrap_or(0);
    let max_y = points.iter().map(|p| p.y).max().unwrap_or(0);
    let mut crossings: Vec<f64> = Vec::with_capacity(points.len());

    for y in clamp_range(i64::from(min_y), i64::from(max_y) - 1, image.height()) {
        let scan_y = y as f64 + 0.5;
        crossings.clear();
        for (index, start) in points.iter().enumerate() {
            let end = points[(index + 1) % points.len()];
            let (y0, y1) = (f64::from(start.y), f64::from(end.y));
            if (y0 <= scan_y) == (y1 <= scan_y) {
                continue;
            }
            let t = (scan_y - y0) / (y1 - y0);
            let run = i64::from(end.x) - i64::from(start.x);
            crossings.push(f64::from(start.x) + t * run as f64);
        }
        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            let from_x = (pair[0] - 0.5).ceil() as i64;
            let to_x = (pair[1] - 0.5).floor() as i64;
            if from_x <= to_x {
                fill_span(image, y, from_x, to_x, pixel);
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn count_color(image: &RgbaImage, color: Color) -> usize {
    let pixel = color.to_pixel();
    image.pixels().filter(|candidate| **candidate == pixel).count()
}
