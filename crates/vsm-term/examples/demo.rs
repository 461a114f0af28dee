// SPDX-License-Identifier: MIT
//
// vsm-term demo — color-pair pressure.
//
// Paints every (fg, bg) combination of the palette, one cell each, so a
// 256-color terminal asks for far more pairs than the allocator's ceiling.
// Once the combinations outnumber the slots, every frame evicts round-robin:
// each pair is registered again after something else took its slot.
//
// Keys: `+`/`-` change how many colors per axis are used, `q` quits.
//
// Usage:
//   cargo run -p vsm-term --example demo

use vsm_term::cell::{Attr, CellColor, Style};
use vsm_term::event_loop::{Action, App, EventLoop};
use vsm_term::grid::Grid;
use vsm_term::input::Key;
use vsm_term::pairs::PairDriver;
use vsm_term::screen::Screen;

struct Demo {
    /// Colors per axis.
    colors: u16,
}

impl App for Demo {
    fn on_key(&mut self, key: Key) -> Action {
        if key.is_char('q') {
            return Action::Quit;
        }
        if key.is_char('+') {
            self.colors = (self.colors + 4).min(256);
        } else if key.is_char('-') {
            self.colors = self.colors.saturating_sub(4).max(4);
        }
        Action::Continue
    }

    fn paint(&mut self, grid: &mut Grid) {
        let rows = grid.height().saturating_sub(1);
        let mut x = 0;
        let mut y = 0;
        'fill: for fg in 0..self.colors {
            for bg in 0..self.colors {
                if y >= rows {
                    break 'fill;
                }
                let style = Style::DEFAULT
                    .with_fg(CellColor::Indexed(fg))
                    .with_bg(CellColor::Indexed(bg));
                grid.draw_string(x, y, "x", style);
                x += 1;
                if x >= grid.width() {
                    x = 0;
                    y += 1;
                }
            }
        }

        let status = format!(
            " {0}×{0} color combinations   + more   - fewer   q quit",
            self.colors
        );
        grid.draw_line(0, rows, ' ', Style::attr(Attr::REVERSE));
        grid.draw_string(0, rows, &status, Style::attr(Attr::REVERSE));
    }
}

fn main() -> std::io::Result<()> {
    let screen = Screen::detect();
    let colors = screen.palette().colors().clamp(4, 16);
    EventLoop::new(screen).run(&mut Demo { colors })
}
