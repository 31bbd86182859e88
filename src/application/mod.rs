mod menus;

use std::{
    fs::File,
    io::{self, Read, Write},
    path::PathBuf,
};

use crossterm::{cursor, style, terminal, ExecutableCommand};

use gridfall_engine::{Game, ShapeSource};

use crate::{game_renderer::GameRenderer, keybinds_presets::*, palette_presets::*};

pub type Slots<T> = Vec<(String, T)>;

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct GraphicsSettings {
    pub palette_active: usize,
    /// How many terminal columns one board cell occupies.
    pub cell_width: u8,
    pub game_fps: f64,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            palette_active: 2,
            cell_width: 2,
            game_fps: 30.0,
        }
    }
}

#[derive(
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct NewGameSettings {
    custom_seed: Option<u64>,
    custom_board: Option<(usize, usize)>,
    /// Draw upcoming shapes with the no-repeat policy instead of the classic
    /// redraw-once one.
    distinct_shapes: bool,
}

#[serde_with::serde_as]
#[derive(PartialEq, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Settings {
    pub graphics: GraphicsSettings,
    keybinds_slot_active: usize,
    palette_slots: Slots<Palette>,
    // `KeyCode` cannot be a JSON map key, so keybind maps are stored as pair lists.
    #[serde_as(as = "Vec<(_, Vec<(_, _)>)>")]
    keybinds_slots: Slots<Keybinds>,
    new_game: NewGameSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let keybinds_slots = vec![
            ("Default".to_owned(), gridfall_default_keybinds()),
            ("Vim".to_owned(), vim_keybinds()),
        ];
        Self {
            graphics: GraphicsSettings::default(),
            keybinds_slot_active: 0,
            palette_slots: palette_slots(),
            keybinds_slots,
            new_game: NewGameSettings::default(),
        }
    }
}

impl Settings {
    pub fn keybinds(&self) -> &Keybinds {
        &self.keybinds_slots[self.keybinds_slot_active].1
    }

    pub fn palette(&self) -> &Palette {
        &self.palette_slots[self.graphics.palette_active].1
    }

    pub fn palette_name(&self) -> &str {
        &self.palette_slots[self.graphics.palette_active].0
    }

    fn cycle_palette(&mut self, forward: bool) {
        let n = self.palette_slots.len();
        self.graphics.palette_active = if forward {
            (self.graphics.palette_active + 1) % n
        } else {
            (self.graphics.palette_active + n - 1) % n
        };
    }
}

/// Summary of a finished round, shown on the game-over screen.
#[derive(
    PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, serde::Serialize, serde::Deserialize,
)]
pub struct SessionStats {
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub pieces_locked: u32,
    pub seed: u64,
}

#[derive(Debug)]
enum Menu {
    Title,
    PlayGame {
        game: Box<Game>,
        score: u32,
        game_renderer: Box<GameRenderer>,
    },
    Pause,
    GameOver(Box<SessionStats>),
    Quit,
}

impl std::fmt::Display for Menu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Menu::Title => "Title Screen",
            Menu::PlayGame { .. } => "New Game",
            Menu::Pause => "Pause",
            Menu::GameOver(_) => "Game Over",
            Menu::Quit => "Quit",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug)]
enum MenuUpdate {
    Pop,
    Push(Menu),
}

#[derive(PartialEq, Clone, Debug)]
pub struct Application<T: Write> {
    term: T,
    settings: Settings,
    save_settings_on_exit: bool,
}

impl<T: Write> Drop for Application<T> {
    fn drop(&mut self) {
        // (Try to) undo terminal setup.
        let _ = terminal::disable_raw_mode();
        let _ = self.term.execute(style::ResetColor);
        let _ = self.term.execute(cursor::Show);
        let _ = self.term.execute(terminal::LeaveAlternateScreen);

        // Save settings using file system.
        let savefile_path = Self::savefile_path();

        if self.save_settings_on_exit {
            if let Err(e) = self.store_savefile(savefile_path) {
                eprintln!("{e}");
            }
        } else if savefile_path.try_exists().is_ok_and(|exists| exists) {
            // Explicitly make sure we don't leave a stale savefile around.
            if let Err(e) = std::fs::remove_file(savefile_path) {
                eprintln!("{e}");
            }
        }
    }
}

impl<T: Write> Application<T> {
    pub const W_MAIN: u16 = 62;
    pub const H_MAIN: u16 = 24;

    pub const SAVEFILE_NAME: &'static str =
        concat!(".gridfall_", clap::crate_version!(), "_savefile.json");

    pub fn new(
        mut term: T,
        custom_start_seed: Option<u64>,
        custom_start_board: Option<(usize, usize)>,
        custom_fps: Option<f64>,
    ) -> Self {
        // Console prologue: Initialization.
        let _v = term.execute(terminal::EnterAlternateScreen);
        let _v = term.execute(terminal::SetTitle("Gridfall"));
        let _v = term.execute(cursor::Hide);
        let _v = terminal::enable_raw_mode();
        let mut app = Self {
            term,
            settings: Settings::default(),
            save_settings_on_exit: true,
        };

        // Actually load in settings; a missing or unreadable savefile just
        // leaves the defaults in place.
        let _v = app.load_savefile(Self::savefile_path());

        // Now that the settings are loaded, overlay flags set for this session.
        if custom_start_seed.is_some() {
            app.settings.new_game.custom_seed = custom_start_seed;
        }
        if custom_start_board.is_some() {
            app.settings.new_game.custom_board = custom_start_board;
        }
        if let Some(fps) = custom_fps {
            if fps > 0.0 {
                app.settings.graphics.game_fps = fps;
            }
        }
        app
    }

    pub(crate) fn fetch_main_xy() -> (u16, u16) {
        let (w_console, h_console) = terminal::size().unwrap_or((0, 0));
        (
            w_console.saturating_sub(Self::W_MAIN) / 2,
            h_console.saturating_sub(Self::H_MAIN) / 2,
        )
    }

    fn savefile_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::SAVEFILE_NAME)
    }

    fn store_savefile(&mut self, path: PathBuf) -> io::Result<()> {
        let save_state = (&self.save_settings_on_exit, &self.settings);
        let save_str = serde_json::to_string(&save_state)?;
        let mut file = File::create(path)?;

        let n_written = file.write(save_str.as_bytes())?;

        if n_written < save_str.len() {
            Err(io::Error::other(
                "attempt to write to file consumed `n < save_str.len()` bytes",
            ))
        } else {
            Ok(())
        }
    }

    fn load_savefile(&mut self, path: PathBuf) -> io::Result<()> {
        let mut file = File::open(path)?;
        let mut save_str = String::new();
        file.read_to_string(&mut save_str)?;
        (self.save_settings_on_exit, self.settings) = serde_json::from_str(&save_str)?;
        Ok(())
    }

    /// A fresh playing session from the current new-game settings.
    fn menu_play_game(&self) -> Menu {
        let mut builder = Game::builder();
        // Drawing the seed host-side keeps every session replayable via `--seed`.
        builder.seed(self.settings.new_game.custom_seed.unwrap_or_else(rand::random));
        if let Some((width, height)) = self.settings.new_game.custom_board {
            builder.width(width).height(height);
        }
        if self.settings.new_game.distinct_shapes {
            builder.shape_source(ShapeSource::distinct());
        }
        Menu::PlayGame {
            game: Box::new(builder.build()),
            score: 0,
            game_renderer: Box::new(GameRenderer::new()),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        let mut menu_stack = vec![Menu::Title];
        loop {
            // Retrieve active menu, stop application if stack is empty.
            let Some(menu) = menu_stack.last_mut() else {
                break;
            };
            // Open new menu screen, then store what it returns.
            let menu_update = match menu {
                Menu::Title => self.run_menu_title(),
                Menu::PlayGame {
                    game,
                    score,
                    game_renderer,
                } => self.run_menu_play_game(game, score, game_renderer.as_mut()),
                Menu::Pause => self.run_menu_pause(),
                Menu::GameOver(stats) => {
                    let stats = **stats;
                    self.run_menu_game_over(stats)
                }
                Menu::Quit => break,
            }?;

            // Change screen session depending on what response screen gave.
            match menu_update {
                MenuUpdate::Pop => {
                    if menu_stack.len() > 1 {
                        menu_stack.pop();
                    }
                }
                MenuUpdate::Push(menu) => {
                    if matches!(menu, Menu::Title | Menu::PlayGame { .. } | Menu::GameOver(_)) {
                        menu_stack.clear();
                    }
                    menu_stack.push(menu);
                }
            }
        }

        Ok(())
    }
}
