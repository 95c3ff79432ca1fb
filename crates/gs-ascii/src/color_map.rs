use gs_core::color::{quantize, vivid};
use gs_core::config::ColorMode;
use gs_core::frame::Rgb;

/// Map a sampled color according to the selected color mode.
///
/// # Example
/// ```
/// use gs_ascii::color_map::map_color;
/// use gs_core::config::ColorMode;
/// assert_eq!(map_color((200, 50, 50), ColorMode::Direct, 1.0), (200, 50, 50));
/// assert_eq!(map_color((200, 50, 50), ColorMode::Quantized, 1.0), (204, 51, 51));
/// ```
#[must_use]
pub fn map_color(rgb: Rgb, mode: ColorMode, saturation: f32) -> Rgb {
    match mode {
        ColorMode::Direct => rgb,
        ColorMode::HsvBright => vivid(rgb, saturation),
        ColorMode::Quantized => quantize(rgb),
    }
}
