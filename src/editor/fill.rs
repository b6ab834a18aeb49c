use std::collections::VecDeque;

use image::RgbaImage;

use crate::geometry::{Color, ToolPoint};

/// Recolors the 4-connected region of the seed's color, returning how many
/// pixels changed.
///
/// Breadth-first over an explicit queue. A pixel is recolored at most once:
/// after the write it no longer matches the initial color.
pub fn flood_fill(image: &mut RgbaImage, seed: ToolPoint, color: Color) -> usize {
    let (width, height) = image.dimensions();
    let in_bounds =
        |x: i64, y: i64| x >= 0 && y >= 0 && x < i64::from(width) && y < i64::from(height);

    let (seed_x, seed_y) = (i64::from(seed.x), i64::from(seed.y));
    if !in_bounds(seed_x, seed_y) {
        return 0;
    }

    let initial = *image.get_pixel(seed_x as u32, seed_y as u32);
    let target = color.to_pixel();
    if initial == target {
        return 0;
    }

    let mut changed = 0;
    let mut queue = VecDeque::from([(seed_x, seed_y)]);
    while let Some((x, y)) = queue.pop_front() {
        if !in_bounds(x, y) {
            continue;
        }
        let pixel = image.get_pixel_mut(x as u32, y as u32);
        if *pixel != initial {
            continue;
        }
        *pixel = target;
        changed += 1;

        queue.push_back((x, y + 1));
        queue.push_back((x, y - 1));
        queue.push_back((x + 1, y));
        queue.push_back((x - 1, y));
    }

    tracing::trace!(changed, x = seed.x, y = seed.y, "flood fill complete");
    changed
}
