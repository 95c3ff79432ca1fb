use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::fps::FpsCounter;

/// Ligne d'état en bas à droite : FPS, temps de frame et libellé du mode.
///
/// # Example
/// ```
/// use gs_render::{fps::FpsCounter, hud::draw_status};
/// use ratatui::{buffer::Buffer, layout::Rect};
///
/// let area = Rect::new(0, 0, 30, 2);
/// let mut buf = Buffer::empty(area);
/// draw_status(&mut buf, area, &FpsCounter::new(30), "ascii");
/// let last_row: String = (0..30).map(|x| buf[(x, 1)].symbol().to_string()).collect();
/// assert!(last_row.contains("ascii"));
/// ```
pub fn draw_status(buf: &mut Buffer, area: Rect, fps: &FpsCounter, label: &str) {
    if area.height == 0 {
        return;
    }
    let row = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
    let line = Line::from(vec![
        Span::styled(
            format!(" {:>5.1} fps ", fps.fps()),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ),
        Span::styled(
            format!(" {:>4.1} ms ", fps.frame_time().as_secs_f64() * 1000.0),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(format!(" {label} "), Style::default().fg(Color::Cyan)),
    ]);
    Paragraph::new(line)
        .alignment(Alignment::Right)
        .render(row, buf);
}
