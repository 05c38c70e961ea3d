use image::{Rgba, RgbaImage};

/// Background color used for the eraser, emptied selection origins,
/// and freshly created canvases.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Default canvas dimensions for a new document.
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

/// Hard ceiling on total pixel count (~256 megapixels). Dimensions beyond
/// this are clamped to 1×1 rather than allowed to overflow allocations.
const MAX_PIXELS: u64 = 256_000_000;

// ============================================================================
// RECT — axis-aligned rectangle in surface coordinates
// ============================================================================

/// Axis-aligned rectangle. `x`/`y` may be negative (a selection dragged
/// partially off-canvas keeps its true position); `w`/`h` are always the
/// normalized non-negative extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a normalized rect from two corner points in any order.
    pub fn from_points(a: (i32, i32), b: (i32, i32)) -> Self {
        Self {
            x: a.0.min(b.0),
            y: a.1.min(b.1),
            w: (a.0 - b.0).unsigned_abs(),
            h: (a.1 - b.1).unsigned_abs(),
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Intersection with a `width`×`height` surface. `None` when the rect
    /// lies fully outside (region operations treat that as a no-op).
    pub fn clamped(&self, width: u32, height: u32) -> Option<Rect> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = self.right().min(width as i32);
        let y1 = self.bottom().min(height as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Rect::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32))
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

// ============================================================================
// SURFACE — the dense RGBA8 pixel buffer being edited
// ============================================================================

/// The in-memory pixel surface. Owns a dense `width × height × 4` RGBA
/// buffer; dimensions are fixed for the surface's lifetime (`resized`
/// produces a new surface). All mutation goes through these methods —
/// out-of-bounds access clamps or no-ops, it never wraps.
#[derive(Clone)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    pub fn new(width: u32, height: u32, color: Rgba<u8>) -> Self {
        let (width, height) = sanitize_dimensions(width, height);
        Self {
            pixels: RgbaImage::from_pixel(width, height, color),
        }
    }

    /// Wrap a decoded image as a surface (used by file open / share apply).
    pub fn from_image(image: RgbaImage) -> Self {
        let (w, h) = sanitize_dimensions(image.width(), image.height());
        if (w, h) != (image.width(), image.height()) {
            crate::log_warn!(
                "Surface::from_image: {}x{} rejected, using blank {}x{}",
                image.width(),
                image.height(),
                w,
                h
            );
            return Self::new(w, h, BACKGROUND);
        }
        Self { pixels: image }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgba<u8>> {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return None;
        }
        Some(*self.pixels.get_pixel(x as u32, y as u32))
    }

    /// Write one pixel; silently ignores out-of-bounds coordinates.
    pub fn set(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return;
        }
        self.pixels.put_pixel(x as u32, y as u32, color);
    }

    /// Copy the part of `rect` that intersects the surface into a new
    /// sub-image. Fully-outside rects yield `None`.
    pub fn read_region(&self, rect: Rect) -> Option<RgbaImage> {
        let clamped = rect.clamped(self.width(), self.height())?;
        let mut out = RgbaImage::new(clamped.w, clamped.h);
        for row in 0..clamped.h {
            let src_y = clamped.y as u32 + row;
            for col in 0..clamped.w {
                let src_x = clamped.x as u32 + col;
                out.put_pixel(col, row, *self.pixels.get_pixel(src_x, src_y));
            }
        }
        Some(out)
    }

    /// Composite `content` at (`x`, `y`) as a straight overwrite — alpha is
    /// copied, not blended. Pixels falling outside the surface are dropped.
    pub fn write_region(&mut self, x: i32, y: i32, content: &RgbaImage) {
        let rect = Rect::new(x, y, content.width(), content.height());
        let clamped = match rect.clamped(self.width(), self.height()) {
            Some(r) => r,
            None => return,
        };
        // Offset into the source image when the left/top edge was clipped.
        let src_off_x = (clamped.x - x) as u32;
        let src_off_y = (clamped.y - y) as u32;
        for row in 0..clamped.h {
            for col in 0..clamped.w {
                let px = *content.get_pixel(src_off_x + col, src_off_y + row);
                self.pixels
                    .put_pixel(clamped.x as u32 + col, clamped.y as u32 + row, px);
            }
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let clamped = match rect.clamped(self.width(), self.height()) {
            Some(r) => r,
            None => return,
        };
        for row in 0..clamped.h {
            for col in 0..clamped.w {
                self.pixels
                    .put_pixel(clamped.x as u32 + col, clamped.y as u32 + row, color);
            }
        }
    }

    pub fn clear(&mut self, color: Rgba<u8>) {
        for px in self.pixels.pixels_mut() {
            *px = color;
        }
    }

    /// New surface of the given dimensions with this surface's content
    /// copied into the top-left corner (cropped or white-padded).
    pub fn resized(&self, width: u32, height: u32) -> Surface {
        let mut out = Surface::new(width, height, BACKGROUND);
        out.write_region(0, 0, &self.pixels);
        out
    }

    /// Direct access to the backing image (encoders, flood fill).
    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// Raw RGBA bytes, row-major, length `width * height * 4`.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }
}

fn sanitize_dimensions(width: u32, height: u32) -> (u32, u32) {
    let total = width as u64 * height as u64;
    if width == 0 || height == 0 || total > MAX_PIXELS {
        (1, 1)
    } else {
        (width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_from_points_normalizes() {
        let r = Rect::from_points((30, 40), (10, 20));
        assert_eq!(r, Rect::new(10, 20, 20, 20));
    }

    #[test]
    fn rect_clamps_to_surface_intersection() {
        let r = Rect::new(-5, -5, 20, 20);
        assert_eq!(r.clamped(100, 100), Some(Rect::new(0, 0, 15, 15)));
        assert_eq!(Rect::new(200, 200, 10, 10).clamped(100, 100), None);
    }

    #[test]
    fn write_region_clips_partial_overlap() {
        let mut s = Surface::new(10, 10, BACKGROUND);
        let red = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        s.write_region(8, 8, &red);
        assert_eq!(s.get(9, 9), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(s.get(7, 7), Some(BACKGROUND));
        // Fully outside: no-op, no panic.
        s.write_region(50, 50, &red);
    }

    #[test]
    fn write_region_overwrites_alpha() {
        let mut s = Surface::new(4, 4, BACKGROUND);
        let ghost = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        s.write_region(1, 1, &ghost);
        // Straight overwrite: transparent pixels replace, they do not blend.
        assert_eq!(s.get(1, 1), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn degenerate_dimensions_fall_back_to_1x1() {
        let s = Surface::new(0, 600, BACKGROUND);
        assert_eq!((s.width(), s.height()), (1, 1));
    }
}
