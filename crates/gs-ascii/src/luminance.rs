use gs_core::config::SamplingStrategy;
use gs_core::frame::{FrameBuffer, luminance};

/// Échantillon RGBA représentant une cellule de glyphe.
pub type Sample = (u8, u8, u8, u8);

/// Pixel range `[start, end)` covered by cell `c` out of `cells` along an
/// axis of `pixels` pixels. Never empty when `pixels > 0`.
#[inline(always)]
fn span(c: u16, cells: u16, pixels: u32) -> (u32, u32) {
    // cells × pixels dépasse u32 sur les grilles très larges.
    let edge = |i: u64| (i * u64::from(pixels) / u64::from(cells.max(1))) as u32;
    let start = edge(u64::from(c)).min(pixels.saturating_sub(1));
    let end = edge(u64::from(c) + 1).clamp(start + 1, pixels.max(1));
    (start, end)
}

/// Sample the raster block under glyph cell (cx, cy) of a `cols × rows` grid.
///
/// # Example
/// ```
/// use gs_ascii::luminance::sample_cell;
/// use gs_core::config::SamplingStrategy;
/// use gs_core::frame::FrameBuffer;
///
/// let mut frame = FrameBuffer::new(2, 2);
/// frame.put_pixel(1, 1, [200, 200, 200, 255]);
/// let avg = sample_cell(&frame, 0, 0, 1, 1, SamplingStrategy::Average);
/// assert_eq!(avg, (50, 50, 50, 63));
/// let center = sample_cell(&frame, 0, 0, 1, 1, SamplingStrategy::Center);
/// assert_eq!(center, (200, 200, 200, 255));
/// ```
#[must_use]
pub fn sample_cell(
    frame: &FrameBuffer,
    cx: u16,
    cy: u16,
    cols: u16,
    rows: u16,
    strategy: SamplingStrategy,
) -> Sample {
    if frame.is_empty() {
        return (0, 0, 0, 0);
    }
    let (x0, x1) = span(cx, cols, frame.width);
    let (y0, y1) = span(cy, rows, frame.height);
    match strategy {
        SamplingStrategy::Center => frame.pixel((x0 + x1) / 2, (y0 + y1) / 2),
        SamplingStrategy::Average => {
            let mut sum = [0u32; 4];
            for y in y0..y1 {
                for x in x0..x1 {
                    let (r, g, b, a) = frame.pixel(x, y);
                    sum[0] += u32::from(r);
                    sum[1] += u32::from(g);
                    sum[2] += u32::from(b);
                    sum[3] += u32::from(a);
                }
            }
            let n = (x1 - x0) * (y1 - y0);
            let [r, g, b, a] = sum.map(|s| (s / n) as u8);
            (r, g, b, a)
        }
    }
}

/// Luminance of a sample; fully transparent samples count as background (0).
#[inline(always)]
#[must_use]
pub fn sample_luminance((r, g, b, a): Sample) -> u8 {
    if a == 0 { 0 } else { luminance(r, g, b) }
}

/// Apply contrast and brightness to a luminance value.
///
/// Contrast: multiply around 128. Brightness: offset.
/// Result clamped to [0, 255].
///
/// # Example
/// ```
/// use gs_ascii::luminance::adjust;
/// assert_eq!(adjust(77, 1.0, 0.0), 77);
/// assert_eq!(adjust(200, 3.0, 0.0), 255);
/// ```
#[inline(always)]
#[must_use]
pub fn adjust(lum: u8, contrast: f32, brightness: f32) -> u8 {
    let val = f32::from(lum);
    let adjusted = (val - 128.0) * contrast + 128.0 + brightness * 255.0;
    adjusted.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_tile_the_axis_without_gaps() {
        let mut next = 0;
        for c in 0..7 {
            let (start, end) = span(c, 7, 20);
            assert_eq!(start, next);
            assert!(end > start);
            next = end;
        }
        assert_eq!(next, 20);
    }

    #[test]
    fn wide_grid_spans_do_not_overflow() {
        // 40 000 cells at 4 samples per cell.
        assert_eq!(span(39_999, 40_000, 160_000), (159_996, 160_000));
        assert_eq!(span(u16::MAX - 1, u16::MAX, 262_140), (262_136, 262_140));
    }

    #[test]
    fn more_cells_than_pixels_still_sample_something() {
        let mut frame = FrameBuffer::new(2, 1);
        frame.fill([255, 255, 255, 255]);
        for cx in 0..5 {
            let s = sample_cell(&frame, cx, 0, 5, 3, SamplingStrategy::Average);
            assert_eq!(s, (255, 255, 255, 255));
        }
    }

    #[test]
    fn transparent_sample_is_dark() {
        assert_eq!(sample_luminance((255, 255, 255, 0)), 0);
        assert_eq!(sample_luminance((255, 255, 255, 1)), 255);
    }

    #[test]
    fn brightness_shifts_and_clamps() {
        assert_eq!(adjust(100, 1.0, 1.0), 255);
        assert_eq!(adjust(100, 1.0, -1.0), 0);
    }
}
