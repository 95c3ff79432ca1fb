use crate::frame::Rgb;

/// Teinte / saturation / valeur, chaque composante dans [0.0, 1.0].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsv {
    /// Hue, [0.0, 1.0).
    pub h: f32,
    /// Saturation.
    pub s: f32,
    /// Value.
    pub v: f32,
}

impl Hsv {
    /// Convertit une couleur RGB en HSV.
    ///
    /// # Example
    /// ```
    /// use gs_core::color::Hsv;
    /// let hsv = Hsv::from_rgb((0, 255, 0));
    /// assert!((hsv.h - 1.0 / 3.0).abs() < 0.01);
    /// assert!((hsv.s - 1.0).abs() < 0.01);
    /// ```
    #[must_use]
    pub fn from_rgb((r, g, b): Rgb) -> Self {
        let [r, g, b] = [r, g, b].map(|c| f32::from(c) / 255.0);
        let max = r.max(g).max(b);
        let delta = max - r.min(g).min(b);

        let s = if max > 0.0 { delta / max } else { 0.0 };
        let sector = if delta == 0.0 {
            0.0
        } else if max == r {
            ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        Self {
            h: sector / 6.0,
            s,
            v: max,
        }
    }

    /// Convertit en RGB.
    ///
    /// # Example
    /// ```
    /// use gs_core::color::Hsv;
    /// assert_eq!(Hsv { h: 0.0, s: 1.0, v: 1.0 }.to_rgb(), (255, 0, 0));
    /// ```
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(1.0) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let (v, s) = (self.v, self.s);
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match sector as u32 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        let to_u8 = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        (to_u8(r), to_u8(g), to_u8(b))
    }
}

/// Force V=1 : le glyphe porte la luminance, la couleur ne garde que la teinte.
///
/// # Example
/// ```
/// use gs_core::color::vivid;
/// let (r, g, b) = vivid((100, 20, 20), 1.0);
/// assert_eq!(r, 255);
/// assert!(g < 100 && b < 100);
/// ```
#[must_use]
pub fn vivid(rgb: Rgb, saturation: f32) -> Rgb {
    let hsv = Hsv::from_rgb(rgb);
    Hsv {
        s: (hsv.s * saturation).clamp(0.0, 1.0),
        v: 1.0,
        ..hsv
    }
    .to_rgb()
}

/// Palette 6×6×6 (cube web).
///
/// # Example
/// ```
/// use gs_core::color::quantize;
/// assert_eq!(quantize((255, 0, 130)), (255, 0, 153));
/// ```
#[must_use]
pub fn quantize((r, g, b): Rgb) -> Rgb {
    let level = |c: u8| (c / 43).min(5) * 51;
    (level(r), level(g), level(b))
}

/// Divise chaque canal par 4 (fond atténué).
#[must_use]
pub fn dim((r, g, b): Rgb) -> Rgb {
    (r / 4, g / 4, b / 4)
}
