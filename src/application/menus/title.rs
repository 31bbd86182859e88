use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{Color, Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
    QueueableCommand,
};

use gridfall_engine::Shape;

use crate::application::{Application, Menu, MenuUpdate};

impl<T: Write> Application<T> {
    pub(in crate::application) fn run_menu_title(&mut self) -> io::Result<MenuUpdate> {
        let selection = ["New Game", "Quit"];
        let mut selected = 0usize;
        loop {
            let w_main: usize = Self::W_MAIN.into();
            let (x_main, y_main) = Self::fetch_main_xy();
            let y_selection = Self::H_MAIN / 5;

            let title = [
                "█▀▀ █▀▄ █ █▀▄ █▀▀ ▄▀▄ █   █  ",
                "█▄█ █▀▄ █ █▄▀ █▀  █▀█ █▄▄ █▄▄",
            ];
            let title_colors = [
                "111 222 3 444 555 666 0   0  ",
                "111 222 3 444 55  666 000 000",
            ];

            self.term.queue(Clear(ClearType::All))?;

            let dx_title = w_main.saturating_sub(title[0].chars().count()) / 2;

            for (dy, (bline, cline)) in title.iter().zip(title_colors).enumerate() {
                for (dx, (bchar, cchar)) in bline.chars().zip(cline.chars()).enumerate() {
                    self.term.queue(MoveTo(
                        x_main + u16::try_from(dx_title + dx).unwrap(),
                        y_main + y_selection + u16::try_from(dy).unwrap(),
                    ))?;

                    // Each letter is tinted like one of the playable shapes.
                    let color = cchar
                        .to_digit(10)
                        .and_then(|digit| {
                            let tag = Shape::PLAYABLE[digit as usize].color_tag();
                            self.settings.palette().get(&tag).copied()
                        })
                        .unwrap_or(Color::Reset);

                    self.term
                        .queue(PrintStyledContent(bchar.to_string().with(color)))?;
                }
            }

            let n_names = selection.len();
            for (i, name) in selection.iter().enumerate() {
                self.term
                    .queue(MoveTo(
                        x_main,
                        y_main + y_selection + 4 + u16::try_from(i).unwrap(),
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
            self.term
                .queue(MoveTo(
                    x_main,
                    y_main + y_selection + 4 + u16::try_from(n_names).unwrap() + 2,
                ))?
                .queue(Print(format!(
                    "{:^w_main$}",
                    format!("palette: ‹ {} ›", self.settings.palette_name()),
                )))?;
            self.term
                .queue(MoveTo(
                    x_main,
                    y_main + y_selection + 4 + u16::try_from(n_names).unwrap() + 4,
                ))?
                .queue(PrintStyledContent(
                    format!("{:^w_main$}", "(Controls: [↑|↓] [←|→] [Esc|Enter])").italic(),
                ))?;

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
                Event::Key(KeyEvent {
                    code: KeyCode::Esc | KeyCode::Char('q' | 'Q'),
                    kind: KeyEventKind::Press,
                    ..
                }) => {
                    selected = selection.len() - 1;
                }
                // Confirm selection.
                Event::Key(KeyEvent {
                    code: KeyCode::Enter | KeyCode::Char('e' | 'E'),
                    kind: KeyEventKind::Press,
                    ..
                }) => {
                    let menu = match selected {
                        0 => self.menu_play_game(),
                        _ => Menu::Quit,
                    };
                    break Ok(MenuUpdate::Push(menu));
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
                // Cycle the active color palette.
                Event::Key(KeyEvent {
                    code: code @ (KeyCode::Left | KeyCode::Right),
                    kind: KeyEventKind::Press | KeyEventKind::Repeat,
                    ..
                }) => {
                    self.settings.cycle_palette(matches!(code, KeyCode::Right));
                }
                // Other event: don't care.
                _ => {}
            }
            selected = selected.rem_euclid(selection.len());
        }
    }
}
