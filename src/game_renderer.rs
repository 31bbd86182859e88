use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
    QueueableCommand,
};

use gridfall_engine::{Game, Phase};

use crate::{application::Settings, palette_presets::Palette};

/// Straightforward full-redraw renderer: board with border, next-piece panel,
/// score/level/lines sidebar and the keybinds legend.
#[derive(Clone, Copy, Debug, Default)]
pub struct GameRenderer {
    /// Skip redundant terminal clears between full redraws.
    cleared_once: bool,
}

impl GameRenderer {
    pub fn new() -> Self {
        Self {
            cleared_once: false,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render<T: Write>(
        &mut self,
        term: &mut T,
        game: &Game,
        score: u32,
        settings: &Settings,
        legend: &str,
        (x_main, y_main): (u16, u16),
        rerender_entire_view: bool,
    ) -> io::Result<()> {
        if !self.cleared_once || rerender_entire_view {
            term.queue(Clear(ClearType::All))?;
            self.cleared_once = true;
        }

        let state = game.state();
        let board = &state.board;
        let palette = settings.palette();
        let cell_width = usize::from(settings.graphics.cell_width.max(1));
        let board_width_chars = board.width() * cell_width;

        // Border-box and cells.
        term.queue(MoveTo(x_main, y_main))?.queue(Print(format!(
            "┌{}┐",
            "─".repeat(board_width_chars)
        )))?;
        for (row_idx, row) in board.rows().enumerate() {
            let y = y_main + 1 + u16::try_from(row_idx).unwrap_or(u16::MAX);
            term.queue(MoveTo(x_main, y))?.queue(Print("│"))?;
            for cell in row {
                match cell {
                    None => {
                        term.queue(Print(" ".repeat(cell_width)))?;
                    }
                    Some(tag) => {
                        let block = "█".repeat(cell_width);
                        match palette.get(tag) {
                            None => term.queue(Print(block))?,
                            Some(&color) => term.queue(PrintStyledContent(block.with(color)))?,
                        };
                    }
                }
            }
            term.queue(Print("│"))?;
        }
        let y_bottom = y_main + 1 + u16::try_from(board.height()).unwrap_or(u16::MAX);
        term.queue(MoveTo(x_main, y_bottom))?.queue(Print(format!(
            "└{}┘",
            "─".repeat(board_width_chars)
        )))?;

        // Sidebar.
        let x_side = x_main + u16::try_from(board_width_chars + 4).unwrap_or(u16::MAX);
        self.render_next_panel(term, game, palette, cell_width, (x_side, y_main + 1))?;
        for (dy, line) in [
            format!("SCORE {score:>7}"),
            format!("LEVEL {:>7}", state.level),
            format!("LINES {:>7}", state.lines_cleared),
        ]
        .iter()
        .enumerate()
        {
            term.queue(MoveTo(x_side, y_main + 8 + dy as u16))?
                .queue(Print(line))?;
        }

        // Overlays.
        let x_overlay = x_main + u16::try_from(board_width_chars / 2).unwrap_or(0);
        let y_overlay = y_main + u16::try_from(board.height() / 2).unwrap_or(0);
        if state.paused {
            term.queue(MoveTo(x_overlay.saturating_sub(4), y_overlay))?
                .queue(PrintStyledContent(" PAUSED ".bold().reverse()))?;
        }
        if matches!(game.phase(), Phase::GameOver) {
            term.queue(MoveTo(x_side, y_main + 12))?
                .queue(PrintStyledContent("GAME OVER".bold()))?;
        }

        // Legend.
        term.queue(MoveTo(x_main, y_bottom + 2))?
            .queue(PrintStyledContent(legend.to_owned().italic()))?;

        term.flush()
    }

    /// The upcoming shape, drawn in a small box of its own.
    fn render_next_panel<T: Write>(
        &mut self,
        term: &mut T,
        game: &Game,
        palette: &Palette,
        cell_width: usize,
        (x, y): (u16, u16),
    ) -> io::Result<()> {
        let next = game.state().next_shape;
        let grid = next.grid();
        term.queue(MoveTo(x, y))?.queue(Print("NEXT"))?;
        // Four preview rows always drawn, so a smaller shape blanks the rest.
        for row in 0..4 {
            term.queue(MoveTo(x, y + 1 + row as u16))?;
            for col in 0..4 {
                let filled = row < grid.side() && col < grid.side() && grid.is_filled(row, col);
                if filled {
                    let block = "█".repeat(cell_width);
                    let color = palette
                        .get(&next.color_tag())
                        .copied()
                        .unwrap_or(Color::Reset);
                    match color {
                        Color::Reset => term.queue(Print(block))?,
                        color => term.queue(PrintStyledContent(block.with(color)))?,
                    };
                } else {
                    term.queue(Print(" ".repeat(cell_width)))?;
                }
            }
        }
        Ok(())
    }
}
