/// Couleur RGB 8 bits.
pub type Rgb = (u8, u8, u8);

/// Buffer de pixels réutilisable, RGBA row-major, 4 bytes par pixel.
///
/// Réalloué uniquement quand les dimensions changent.
///
/// # Example
/// ```
/// use gs_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, Default)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer pré-alloué aux dimensions données, rempli de noir transparent.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Resize in place. Returns `true` only when storage was reallocated.
    ///
    /// # Example
    /// ```
    /// use gs_core::frame::FrameBuffer;
    /// let mut fb = FrameBuffer::new(4, 4);
    /// assert!(!fb.resize(4, 4));
    /// assert!(fb.resize(8, 2));
    /// assert_eq!(fb.data.len(), 8 * 2 * 4);
    /// ```
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.data = vec![0u8; width as usize * height as usize * 4];
        true
    }

    /// `true` when the buffer holds no pixel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Remplit tout le buffer avec une couleur RGBA.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Écrit un pixel. Hors limites : ignoré.
    #[inline(always)]
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Accès au pixel (x, y) → (r, g, b, a). Hors limites : noir transparent.
    ///
    /// # Example
    /// ```
    /// use gs_core::frame::FrameBuffer;
    /// let mut fb = FrameBuffer::new(2, 2);
    /// fb.put_pixel(1, 1, [10, 20, 30, 255]);
    /// assert_eq!(fb.pixel(1, 1), (10, 20, 30, 255));
    /// assert_eq!(fb.pixel(5, 5), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        if x >= self.width || y >= self.height {
            return (0, 0, 0, 0);
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Luminance du pixel, pondération 0.30 / 0.59 / 0.11.
    ///
    /// # Example
    /// ```
    /// use gs_core::frame::FrameBuffer;
    /// let mut fb = FrameBuffer::new(1, 1);
    /// fb.put_pixel(0, 0, [255, 255, 255, 255]);
    /// assert_eq!(fb.luminance(0, 0), 255);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        let (r, g, b, a) = self.pixel(x, y);
        if a == 0 {
            return 0;
        }
        luminance(r, g, b)
    }
}

/// Luminance perceptuelle d'une couleur, pondération 0.30 / 0.59 / 0.11.
#[inline(always)]
#[must_use]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 30 + u32::from(g) * 59 + u32::from(b) * 11) / 100) as u8
}

/// Single cell in a glyph grid.
///
/// `None` colors defer to the owning surface's style.
///
/// # Example
/// ```
/// use gs_core::frame::GlyphCell;
/// let cell = GlyphCell::default();
/// assert_eq!(cell.ch, ' ');
/// assert!(cell.fg.is_none());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphCell {
    /// Caractère à afficher.
    pub ch: char,
    /// Couleur foreground, `None` = couleur de la surface.
    pub fg: Option<Rgb>,
    /// Couleur background, `None` = fond de la surface.
    pub bg: Option<Rgb>,
}

impl GlyphCell {
    /// A glyph drawn with the surface colors.
    #[must_use]
    pub const fn plain(ch: char) -> Self {
        Self {
            ch,
            fg: None,
            bg: None,
        }
    }
}

/// Grille de glyphes, row-major. Réutilisée d'une frame à l'autre.
///
/// # Example
/// ```
/// use gs_core::frame::{GlyphCell, GlyphGrid};
/// let mut grid = GlyphGrid::new(80, 24);
/// grid.set(0, 0, GlyphCell::plain('@'));
/// assert_eq!(grid.get(0, 0).ch, '@');
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphGrid {
    /// Flat array of cells, row-major.
    pub cells: Vec<GlyphCell>,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl GlyphGrid {
    /// Crée une grille pré-allouée remplie d'espaces.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![GlyphCell::plain(' '); usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    /// Resize and clear. Returns `true` only when storage was reallocated.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        *self = Self::new(width, height);
        true
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u16, y: u16, cell: GlyphCell) {
        self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)] = cell;
    }

    /// Get a cell reference at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> &GlyphCell {
        &self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// Clear all cells to plain spaces.
    pub fn clear(&mut self) {
        self.cells.fill(GlyphCell::plain(' '));
    }

    /// Rows as plain text, colors dropped.
    ///
    /// # Example
    /// ```
    /// use gs_core::frame::{GlyphCell, GlyphGrid};
    /// let mut grid = GlyphGrid::new(2, 2);
    /// grid.set(1, 0, GlyphCell::plain('#'));
    /// assert_eq!(grid.to_lines(), vec![" #".to_string(), "  ".to_string()]);
    /// ```
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        if self.width == 0 {
            return Vec::new();
        }
        self.cells
            .chunks(usize::from(self.width))
            .map(|row| row.iter().map(|c| c.ch).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_pixels_have_zero_luminance() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.put_pixel(0, 0, [255, 255, 255, 0]);
        assert_eq!(fb.luminance(0, 0), 0);
    }

    #[test]
    fn luminance_weights_favor_green() {
        assert!(luminance(0, 255, 0) > luminance(255, 0, 0));
        assert!(luminance(255, 0, 0) > luminance(0, 0, 255));
        assert_eq!(luminance(0, 0, 0), 0);
    }

    #[test]
    fn grid_resize_is_idempotent() {
        let mut grid = GlyphGrid::new(3, 3);
        assert!(grid.resize(4, 2));
        assert!(!grid.resize(4, 2));
        assert_eq!(grid.cells.len(), 8);
    }

    #[test]
    fn fill_paints_every_pixel() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.fill([1, 2, 3, 4]);
        assert!(fb.data.chunks_exact(4).all(|px| px == [1, 2, 3, 4]));
    }
}
