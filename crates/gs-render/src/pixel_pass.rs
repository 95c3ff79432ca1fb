use gs_core::frame::{FrameBuffer, GlyphCell, GlyphGrid};

/// Taille du raster nécessaire pour une grille : deux pixels verticaux par cellule.
#[must_use]
pub fn raster_size(cols: u16, rows: u16) -> (u32, u32) {
    (u32::from(cols), u32::from(rows) * 2)
}

/// Rendu pixel par défaut en demi-blocs (`▄`).
///
/// Each terminal cell covers 2 vertical pixels. The top pixel's color goes
/// to bg, the bottom pixel's color goes to fg.
///
/// # Example
/// ```
/// use gs_core::frame::{FrameBuffer, GlyphGrid};
/// use gs_render::pixel_pass::render_halfblock;
///
/// let mut frame = FrameBuffer::new(2, 4);
/// frame.put_pixel(0, 1, [255, 0, 0, 255]);
/// let mut grid = GlyphGrid::new(2, 2);
/// render_halfblock(&frame, &mut grid);
/// let cell = grid.get(0, 0);
/// assert_eq!(cell.ch, '▄');
/// assert_eq!(cell.fg, Some((255, 0, 0)));
/// assert_eq!(cell.bg, Some((0, 0, 0)));
/// ```
pub fn render_halfblock(frame: &FrameBuffer, grid: &mut GlyphGrid) {
    if frame.is_empty() {
        grid.clear();
        return;
    }
    let (pixel_w, pixel_h) = raster_size(grid.width, grid.height);

    for cy in 0..grid.height {
        for cx in 0..grid.width {
            let px = scale(u32::from(cx), frame.width, pixel_w);
            let py_top = scale(u32::from(cy) * 2, frame.height, pixel_h);
            let py_bot = scale(u32::from(cy) * 2 + 1, frame.height, pixel_h);

            let (tr, tg, tb, _) = frame.pixel(px, py_top);
            let (br, bg, bb, _) = frame.pixel(px, py_bot);
            grid.set(
                cx,
                cy,
                GlyphCell {
                    ch: '▄',
                    fg: Some((br, bg, bb)),
                    bg: Some((tr, tg, tb)),
                },
            );
        }
    }
}

/// Pixel `i` of a `from`-wide axis mapped onto a `to`-wide one (`to > 0`).
#[inline(always)]
fn scale(i: u32, to: u32, from: u32) -> u32 {
    let mapped = u64::from(i) * u64::from(to) / u64::from(from.max(1));
    (mapped as u32).min(to - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_size_doubles_rows() {
        assert_eq!(raster_size(80, 24), (80, 48));
    }

    #[test]
    fn smaller_frame_is_stretched() {
        let mut frame = FrameBuffer::new(1, 2);
        frame.put_pixel(0, 0, [9, 9, 9, 255]);
        frame.put_pixel(0, 1, [7, 7, 7, 255]);
        let mut grid = GlyphGrid::new(3, 1);
        render_halfblock(&frame, &mut grid);
        for cx in 0..3 {
            let cell = grid.get(cx, 0);
            assert_eq!((cell.bg, cell.fg), (Some((9, 9, 9)), Some((7, 7, 7))));
        }
    }

    #[test]
    fn tall_grid_reads_the_bottom_row() {
        // 40 000 rows: 80 000 pixels, past the u32 product range.
        let mut frame = FrameBuffer::new(1, 80_000);
        frame.put_pixel(0, 79_999, [1, 2, 3, 255]);
        let mut grid = GlyphGrid::new(1, 40_000);
        render_halfblock(&frame, &mut grid);
        assert_eq!(grid.get(0, 39_999).fg, Some((1, 2, 3)));
        assert_eq!(scale(79_999, 80_000, 80_000), 79_999);
    }

    #[test]
    fn empty_frame_clears_grid() {
        let mut grid = GlyphGrid::new(2, 2);
        grid.set(1, 1, GlyphCell::plain('x'));
        render_halfblock(&FrameBuffer::default(), &mut grid);
        assert_eq!(grid.get(1, 1).ch, ' ');
    }
}
