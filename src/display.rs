use std::io;

use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::Color;
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

use crate::framebuffer::{Framebuffer, HEIGHT, WIDTH};

/// presents finished frames to the player
pub trait Display {
    fn present(&mut self, frame: &Framebuffer) -> io::Result<()>;
}

/// project one plane of the frame onto canvas coordinates. The canvas y
/// axis points up, so rows get negated to keep (0,0) top-left.
fn plane_points(frame: &Framebuffer, lit: bool) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            if frame.get(x, y) == lit {
                points.push((x as f64, -(y as f64)));
            }
        }
    }
    points
}

/// Terminal implementation of Display: one character cell per pixel,
/// inside a one-cell border
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl MonoTermDisplay {
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        let size = terminal.size()?;
        if size.width < WIDTH as u16 + 2 || size.height < HEIGHT as u16 + 2 {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "terminal is {}x{} but the frame needs {}x{}",
                    size.width,
                    size.height,
                    WIDTH + 2,
                    HEIGHT + 2
                ),
            ));
        }
        terminal.clear()?;
        Ok(MonoTermDisplay { terminal })
    }
}

impl Display for MonoTermDisplay {
    fn present(&mut self, frame: &Framebuffer) -> io::Result<()> {
        // NB. both planes get painted, so unlit pixels overwrite cells a
        // previous frame lit
        let lit = plane_points(frame, true);
        let unlit = plane_points(frame, false);
        let area = Rect::new(0, 0, WIDTH as u16 + 2, HEIGHT as u16 + 2);
        self.terminal.draw(|f| {
            let canvas = Canvas::default()
                .block(Block::default().title("CHIP-8").borders(Borders::ALL))
                .background_color(Color::Black)
                .x_bounds([0.0, (WIDTH - 1) as f64])
                .y_bounds([-((HEIGHT - 1) as f64), 0.0])
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &unlit,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &lit,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, area.intersection(f.size()));
        })?;
        Ok(())
    }
}

/// Display implementation that draws nothing and counts the frames it was
/// handed; useful for testing non-display routines
pub struct DummyDisplay {
    pub presented: usize,
}

impl DummyDisplay {
    pub fn new() -> Self {
        DummyDisplay { presented: 0 }
    }
}

impl Display for DummyDisplay {
    fn present(&mut self, _frame: &Framebuffer) -> io::Result<()> {
        self.presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_frame_has_no_lit_points() {
        let frame = Framebuffer::new();
        assert_eq!(plane_points(&frame, true).len(), 0);
        assert_eq!(plane_points(&frame, false).len(), WIDTH * HEIGHT);
    }

    #[test]
    fn test_points_flip_rows_for_the_canvas() {
        let mut frame = Framebuffer::new();
        frame.draw_row(8, 5, 0x80);
        assert_eq!(plane_points(&frame, true), vec![(8.0, -5.0)]);
    }

    #[test]
    fn test_dummy_display_counts_presents() -> io::Result<()> {
        let frame = Framebuffer::new();
        let mut display = DummyDisplay::new();
        display.present(&frame)?;
        display.present(&frame)?;
        assert_eq!(display.presented, 2);
        Ok(())
    }
}
