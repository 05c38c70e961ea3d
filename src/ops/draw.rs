// ============================================================================
// RASTERIZERS — freehand strokes, shape outlines, marquee preview
// ============================================================================
//
// Everything here writes through `Surface::set`, so off-canvas portions of a
// stroke or shape clip for free. Shape tools call these on every pointer
// move after restoring the gesture snapshot, which is what makes the live
// preview non-destructive.

use image::Rgba;
use std::f64::consts::PI;

use crate::canvas::{Rect, Surface};

/// Dash period (pixels) for the selection marquee preview.
const MARQUEE_DASH: i32 = 4;

/// Stamp a `width`-px square brush footprint centered on (`x`, `y`).
fn stamp(surface: &mut Surface, x: i32, y: i32, width: u32, color: Rgba<u8>) {
    if width <= 1 {
        surface.set(x, y, color);
        return;
    }
    let half = width as i32 / 2;
    surface.fill_rect(
        Rect::new(x - half, y - half, width, width),
        color,
    );
}

/// Walk a line with Bresenham, invoking `plot` at every covered coordinate.
fn bresenham(a: (i32, i32), b: (i32, i32), mut plot: impl FnMut(i32, i32)) {
    let (mut x, mut y) = a;
    let dx = (b.0 - a.0).abs();
    let dy = -(b.1 - a.1).abs();
    let sx = if a.0 < b.0 { 1 } else { -1 };
    let sy = if a.1 < b.1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        plot(x, y);
        if (x, y) == b {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// 1-px line from `a` to `b`.
pub fn line(surface: &mut Surface, a: (i32, i32), b: (i32, i32), color: Rgba<u8>) {
    bresenham(a, b, |x, y| surface.set(x, y, color));
}

/// Thick stroke segment between two consecutive freehand pointer positions.
/// Interpolating along the segment means fast pointer movement cannot leave
/// gaps in the stroke.
pub fn stroke_segment(
    surface: &mut Surface,
    a: (i32, i32),
    b: (i32, i32),
    width: u32,
    color: Rgba<u8>,
) {
    bresenham(a, b, |x, y| stamp(surface, x, y, width, color));
}

/// 1-px rectangle outline between two drag corners. A zero-extent drag
/// (click without movement) collapses to the single origin pixel.
pub fn rect_outline(surface: &mut Surface, a: (i32, i32), b: (i32, i32), color: Rgba<u8>) {
    let r = Rect::from_points(a, b);
    let (x0, y0) = (r.x, r.y);
    let (x1, y1) = ((r.right() - 1).max(x0), (r.bottom() - 1).max(y0));
    line(surface, (x0, y0), (x1, y0), color);
    line(surface, (x1, y0), (x1, y1), color);
    line(surface, (x1, y1), (x0, y1), color);
    line(surface, (x0, y1), (x0, y0), color);
}

/// 1-px ellipse outline inscribed in the drag bounding box, drawn as a
/// closed polyline with enough angular steps that adjacent samples touch.
pub fn ellipse_outline(surface: &mut Surface, a: (i32, i32), b: (i32, i32), color: Rgba<u8>) {
    let r = Rect::from_points(a, b);
    let cx = r.x as f64 + r.w as f64 / 2.0;
    let cy = r.y as f64 + r.h as f64 / 2.0;
    let rx = r.w as f64 / 2.0;
    let ry = r.h as f64 / 2.0;

    let steps = ((rx.max(ry) * 2.0 * PI).ceil() as usize).max(8);
    let mut prev: Option<(i32, i32)> = None;
    for i in 0..=steps {
        let theta = i as f64 / steps as f64 * 2.0 * PI;
        let px = (cx + rx * theta.cos()).round() as i32;
        let py = (cy + ry * theta.sin()).round() as i32;
        if let Some(p) = prev {
            line(surface, p, (px, py), color);
        }
        prev = Some((px, py));
    }
}

/// Five-point star inscribed in the drag bounding box: outer points at
/// angles `i·4π/5 − π/2`, connected in angle order (the 144° step draws the
/// crossing pentagram path), closed, stroked only.
pub fn star_outline(surface: &mut Surface, a: (i32, i32), b: (i32, i32), color: Rgba<u8>) {
    let r = Rect::from_points(a, b);
    let cx = r.x as f64 + r.w as f64 / 2.0;
    let cy = r.y as f64 + r.h as f64 / 2.0;
    let rx = r.w as f64 / 2.0;
    let ry = r.h as f64 / 2.0;

    let mut points = [(0i32, 0i32); 5];
    for (i, p) in points.iter_mut().enumerate() {
        let theta = i as f64 * 4.0 * PI / 5.0 - PI / 2.0;
        *p = (
            (cx + rx * theta.cos()).round() as i32,
            (cy + ry * theta.sin()).round() as i32,
        );
    }
    for i in 0..5 {
        line(surface, points[i], points[(i + 1) % 5], color);
    }
}

/// Dashed 1-px marquee rectangle for the selection drag preview.
pub fn dashed_rect(surface: &mut Surface, a: (i32, i32), b: (i32, i32), color: Rgba<u8>) {
    let r = Rect::from_points(a, b);
    let (x0, y0) = (r.x, r.y);
    let (x1, y1) = ((r.right() - 1).max(x0), (r.bottom() - 1).max(y0));

    let mut dash_plot = |surface: &mut Surface, x: i32, y: i32, t: i32| {
        if (t / MARQUEE_DASH) % 2 == 0 {
            surface.set(x, y, color);
        }
    };
    for x in x0..=x1 {
        dash_plot(surface, x, y0, x - x0);
        dash_plot(surface, x, y1, x - x0);
    }
    for y in y0..=y1 {
        dash_plot(surface, x0, y, y - y0);
        dash_plot(surface, x1, y, y - y0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BACKGROUND;

    const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn line_hits_both_endpoints() {
        let mut s = Surface::new(16, 16, BACKGROUND);
        line(&mut s, (2, 3), (12, 9), INK);
        assert_eq!(s.get(2, 3), Some(INK));
        assert_eq!(s.get(12, 9), Some(INK));
    }

    #[test]
    fn stroke_segment_has_no_gaps() {
        let mut s = Surface::new(64, 64, BACKGROUND);
        stroke_segment(&mut s, (0, 0), (60, 60), 5, INK);
        // Every diagonal pixel along the path sits inside the 5px footprint.
        for t in 0..=60 {
            assert_eq!(s.get(t, t), Some(INK), "gap at {}", t);
        }
    }

    #[test]
    fn zero_extent_rect_is_a_single_pixel() {
        let mut s = Surface::new(8, 8, BACKGROUND);
        rect_outline(&mut s, (3, 3), (3, 3), INK);
        assert_eq!(s.get(3, 3), Some(INK));
        for (x, y) in [(2, 2), (2, 3), (3, 2), (4, 4)] {
            assert_eq!(s.get(x, y), Some(BACKGROUND), "stray at ({}, {})", x, y);
        }

        let mut s = Surface::new(8, 8, BACKGROUND);
        dashed_rect(&mut s, (5, 5), (5, 5), INK);
        assert_eq!(s.get(5, 5), Some(INK));
        assert_eq!(s.get(4, 4), Some(BACKGROUND));
    }

    #[test]
    fn star_points_land_on_bounding_box() {
        let mut s = Surface::new(101, 101, BACKGROUND);
        star_outline(&mut s, (0, 0), (100, 100), INK);
        // Top point of the star: angle -PI/2 => (cx, top edge).
        assert_eq!(s.get(50, 0), Some(INK));
    }
}
