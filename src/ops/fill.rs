// ============================================================================
// FLOOD FILL — exact-match, 4-connected region recolor
// ============================================================================

use image::Rgba;

use crate::canvas::Surface;

/// Flood-fill the 4-connected region containing (`x`, `y`) with `color`.
///
/// The target color is read at the seed; matching is exact RGBA equality
/// (no tolerance). The fill color is forced fully opaque. Traversal is an
/// iterative DFS over packed flat indices — a `Vec` stack, never recursion,
/// so deep regions cannot blow the call stack. The mask doubles as the
/// visited array, so every pixel is examined at most once.
///
/// Returns the number of recolored pixels; 0 means nothing changed (seed
/// out of bounds, or the region already had the fill color) and the caller
/// should skip its history push.
pub fn flood_fill(surface: &mut Surface, x: i32, y: i32, color: Rgba<u8>) -> usize {
    let w = surface.width() as usize;
    let h = surface.height() as usize;
    if x < 0 || y < 0 || x as usize >= w || y as usize >= h {
        return 0;
    }

    let fill = Rgba([color[0], color[1], color[2], 255]);
    let target = match surface.get(x, y) {
        Some(px) => px,
        None => return 0,
    };
    if target == fill {
        return 0;
    }

    let flat: &mut [u8] = surface.image_mut();

    #[inline(always)]
    fn pixel_at(flat: &[u8], idx: usize) -> [u8; 4] {
        let o = idx * 4;
        [flat[o], flat[o + 1], flat[o + 2], flat[o + 3]]
    }

    #[inline(always)]
    fn recolor(flat: &mut [u8], idx: usize, c: Rgba<u8>) {
        let o = idx * 4;
        flat[o..o + 4].copy_from_slice(&c.0);
    }

    let mut visited = vec![false; w * h];
    let mut stack: Vec<u32> = Vec::with_capacity(4096);

    let seed = y as usize * w + x as usize;
    visited[seed] = true;
    recolor(flat, seed, fill);
    stack.push(seed as u32);
    let mut filled = 1usize;

    while let Some(idx) = stack.pop() {
        let idx = idx as usize;
        let px = idx % w;
        let py = idx / w;

        // Visit the 4 neighbors that are in bounds, unvisited, and still
        // exactly the target color.
        let mut neighbors = [usize::MAX; 4];
        let mut n = 0;
        if px > 0 {
            neighbors[n] = idx - 1;
            n += 1;
        }
        if px + 1 < w {
            neighbors[n] = idx + 1;
            n += 1;
        }
        if py > 0 {
            neighbors[n] = idx - w;
            n += 1;
        }
        if py + 1 < h {
            neighbors[n] = idx + w;
            n += 1;
        }

        for &ni in &neighbors[..n] {
            if !visited[ni] && pixel_at(flat, ni) == target.0 {
                visited[ni] = true;
                recolor(flat, ni, fill);
                stack.push(ni as u32);
                filled += 1;
            }
        }
    }

    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BACKGROUND;

    #[test]
    fn fill_respects_exact_color_boundary() {
        let mut s = Surface::new(8, 8, BACKGROUND);
        // Wall one column: fill left of it must not cross.
        for y in 0..8 {
            s.set(4, y, Rgba([0, 0, 0, 255]));
        }
        let filled = flood_fill(&mut s, 0, 0, Rgba([255, 0, 0, 0]));
        assert_eq!(filled, 4 * 8);
        assert_eq!(s.get(3, 7), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(s.get(5, 0), Some(BACKGROUND));
    }

    #[test]
    fn near_match_does_not_spread() {
        let mut s = Surface::new(4, 1, BACKGROUND);
        s.set(1, 0, Rgba([254, 255, 255, 255]));
        flood_fill(&mut s, 0, 0, Rgba([0, 255, 0, 255]));
        // Off-by-one channel is a different color under exact matching.
        assert_eq!(s.get(1, 0), Some(Rgba([254, 255, 255, 255])));
    }
}
