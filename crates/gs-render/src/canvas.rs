use gs_core::frame::{GlyphGrid, Rgb};
use gs_core::surface::Stage;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

#[inline(always)]
fn rgb((r, g, b): Rgb) -> Color {
    Color::Rgb(r, g, b)
}

/// Copie une grille dans le buffer à partir de (left, top), couleurs par défaut
/// `fg` / `bg` pour les cellules qui n'en portent pas.
fn blit(
    buf: &mut Buffer,
    area: Rect,
    grid: &GlyphGrid,
    (left, top): (u16, u16),
    fg: Color,
    bg: Color,
) {
    let cols = grid.width.min(area.width.saturating_sub(left));
    let rows = grid.height.min(area.height.saturating_sub(top));
    for cy in 0..rows {
        for cx in 0..cols {
            let cell = grid.get(cx, cy);
            let pos = (area.x + left + cx, area.y + top + cy);
            if let Some(out) = buf.cell_mut(pos) {
                out.set_char(cell.ch)
                    .set_fg(cell.fg.map_or(fg, rgb))
                    .set_bg(cell.bg.map_or(bg, rgb));
            }
        }
    }
}

/// Écrit le stage dans un `ratatui::Buffer` : couche de base puis overlays
/// du bas vers le haut, chacun à son décalage.
///
/// Pas de widget Canvas ratatui : écriture directe des cellules.
///
/// # Example
/// ```
/// use gs_core::frame::GlyphCell;
/// use gs_core::surface::{OverlayStyle, Stage};
/// use gs_render::canvas::present;
/// use ratatui::{buffer::Buffer, layout::Rect, style::Color};
///
/// let mut stage = Stage::new(4, 2);
/// stage.base_mut().set(0, 0, GlyphCell::plain('x'));
/// let id = stage.attach_overlay(OverlayStyle { left: 2, ..OverlayStyle::default() });
/// let overlay = stage.overlay_mut(id).unwrap();
/// overlay.resize(2, 1);
/// overlay.grid.set(0, 0, GlyphCell::plain('%'));
///
/// let area = Rect::new(0, 0, 4, 2);
/// let mut buf = Buffer::empty(area);
/// present(&mut buf, area, &stage);
/// assert_eq!(buf[(0, 0)].symbol(), "x");
/// assert_eq!(buf[(2, 0)].symbol(), "%");
/// assert_eq!(buf[(2, 0)].fg, Color::Rgb(255, 255, 255));
/// ```
pub fn present(buf: &mut Buffer, area: Rect, stage: &Stage) {
    blit(buf, area, stage.base(), (0, 0), Color::Reset, Color::Reset);
    for (_, surface) in stage.overlays() {
        let style = surface.style;
        blit(
            buf,
            area,
            &surface.grid,
            (style.left, style.top),
            rgb(style.foreground),
            rgb(style.background),
        );
    }
}

#[cfg(test)]
mod tests {
    use gs_core::frame::GlyphCell;
    use gs_core::surface::OverlayStyle;

    use super::*;

    fn stage_with_overlay(style: OverlayStyle, w: u16, h: u16) -> Stage {
        let mut stage = Stage::new(6, 3);
        stage.base_mut().set(5, 2, GlyphCell::plain('b'));
        let id = stage.attach_overlay(style);
        if let Some(overlay) = stage.overlay_mut(id) {
            overlay.resize(w, h);
            overlay.grid.cells.fill(GlyphCell::plain('o'));
        }
        stage
    }

    #[test]
    fn full_size_overlay_hides_the_base_layer() {
        let stage = stage_with_overlay(OverlayStyle::default(), 6, 3);
        let area = Rect::new(0, 0, 6, 3);
        let mut buf = Buffer::empty(area);
        present(&mut buf, area, &stage);
        assert_eq!(buf[(5, 2)].symbol(), "o");
        assert_eq!(buf[(5, 2)].bg, Color::Rgb(0, 0, 0));
    }

    #[test]
    fn overlay_is_clipped_to_the_area() {
        let style = OverlayStyle {
            top: 2,
            left: 4,
            ..OverlayStyle::default()
        };
        let stage = stage_with_overlay(style, 6, 3);
        let area = Rect::new(0, 0, 6, 3);
        let mut buf = Buffer::empty(area);
        present(&mut buf, area, &stage);
        assert_eq!(buf[(3, 2)].symbol(), " ");
        assert_eq!(buf[(4, 2)].symbol(), "o");
        assert_eq!(buf[(5, 2)].symbol(), "o");
        assert_eq!(buf[(5, 1)].symbol(), " ");
    }

    #[test]
    fn cell_colors_override_the_style() {
        let mut stage = Stage::new(2, 1);
        let id = stage.attach_overlay(OverlayStyle::default());
        let overlay = stage.overlay_mut(id).unwrap();
        overlay.resize(2, 1);
        overlay.grid.set(
            1,
            0,
            GlyphCell {
                ch: '#',
                fg: Some((10, 20, 30)),
                bg: Some((1, 2, 3)),
            },
        );
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        present(&mut buf, area, &stage);
        assert_eq!(buf[(1, 0)].fg, Color::Rgb(10, 20, 30));
        assert_eq!(buf[(1, 0)].bg, Color::Rgb(1, 2, 3));
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(255, 255, 255));
    }

    #[test]
    fn area_offset_is_respected() {
        let mut stage = Stage::new(1, 1);
        stage.base_mut().set(0, 0, GlyphCell::plain('z'));
        let area = Rect::new(3, 1, 1, 1);
        let mut buf = Buffer::empty(Rect::new(0, 0, 5, 3));
        present(&mut buf, area, &stage);
        assert_eq!(buf[(3, 1)].symbol(), "z");
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }
}
