use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
    QueueableCommand,
};

use crate::application::{Application, Menu, MenuUpdate, SessionStats};

impl<T: Write> Application<T> {
    pub(in crate::application) fn run_menu_game_over(
        &mut self,
        stats: SessionStats,
    ) -> io::Result<MenuUpdate> {
        let selection = ["Play Again", "Back to Title", "Quit"];
        let mut selected = 0usize;
        loop {
            let w_main: usize = Self::W_MAIN.into();
            let (x_main, y_main) = Self::fetch_main_xy();
            let y_selection = Self::H_MAIN / 6;

            self.term.queue(Clear(ClearType::All))?;

            self.term
                .queue(MoveTo(x_main, y_main + y_selection))?
                .queue(PrintStyledContent(
                    format!("{:^w_main$}", "* Game Over *").bold(),
                ))?;

            let stat_lines = [
                format!("score  {:>12}", stats.score),
                format!("level  {:>12}", stats.level),
                format!("lines  {:>12}", stats.lines_cleared),
                format!("pieces {:>12}", stats.pieces_locked),
                format!("seed   {:>12}", stats.seed),
            ];
            for (i, line) in stat_lines.iter().enumerate() {
                self.term
                    .queue(MoveTo(
                        x_main,
                        y_main + y_selection + 2 + u16::try_from(i).unwrap(),
                    ))?
                    .queue(Print(format!("{line:^w_main$}")))?;
            }

            let dy_selection = y_selection + 2 + u16::try_from(stat_lines.len()).unwrap() + 1;
            for (i, name) in selection.iter().enumerate() {
                self.term
                    .queue(MoveTo(
                        x_main,
                        y_main + dy_selection + u16::try_from(i).unwrap(),
                    ))?
                    .queue(Print(format!(
                        "{:^w_main$}",
                        if i == selected {
                            format!(">> {name} <<")
                        } else {
                            (*name).to_owned()
                        }
                    )))?;
            }

            self.term.flush()?;

            // Wait for new input.
            match event::read()? {
                // Quit application.
                Event::Key(KeyEvent {
                    code: KeyCode::Char('c' | 'C'),
                    modifiers: KeyModifiers::CONTROL,
                    kind: KeyEventKind::Press | KeyEventKind::Repeat,
                    state: _,
                }) => break Ok(MenuUpdate::Push(Menu::Quit)),
                // [Esc]: Back to the title screen.
                Event::Key(KeyEvent {
                    code: KeyCode::Esc | KeyCode::Char('q' | 'Q'),
                    kind: KeyEventKind::Press,
                    ..
                }) => break Ok(MenuUpdate::Push(Menu::Title)),
                // Confirm selection.
                Event::Key(KeyEvent {
                    code: KeyCode::Enter | KeyCode::Char('e' | 'E'),
                    kind: KeyEventKind::Press,
                    ..
                }) => {
                    break Ok(match selected {
                        0 => MenuUpdate::Push(self.menu_play_game()),
                        1 => MenuUpdate::Push(Menu::Title),
                        _ => MenuUpdate::Push(Menu::Quit),
                    });
                }
                // Move selector up.
                Event::Key(KeyEvent {
                    code: KeyCode::Up | KeyCode::Char('k' | 'K'),
                    kind: KeyEventKind::Press | KeyEventKind::Repeat,
                    ..
                }) => {
                    selected += selection.len() - 1;
                }
                // Move selector down.
                Event::Key(KeyEvent {
                    code: KeyCode::Down | KeyCode::Char('j' | 'J'),
                    kind: KeyEventKind::Press | KeyEventKind::Repeat,
                    ..
                }) => {
                    selected += 1;
                }
                // Other event: don't care.
                _ => {}
            }
            selected = selected.rem_euclid(selection.len());
        }
    }
}
