use std::{
    io::{self, Write},
    sync::mpsc,
    time::{Duration, Instant},
};

use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use gridfall_engine::{Event, Events, Game};

use crate::{
    application::{Application, Menu, MenuUpdate, SessionStats},
    game_renderer::GameRenderer,
    keybinds_presets::keybinds_legend,
    live_input_handler::{self, LiveTermSignal},
};

/// Points awarded for clearing 0..=4 lines at once, before the level
/// multiplier.
const SCORE_TABLE: [u32; 5] = [0, 40, 100, 300, 1200];

/// Drop interval per level; levels past the table end use the floor value.
const DROP_INTERVAL_MS: [u64; 10] = [799, 715, 632, 549, 466, 383, 300, 216, 133, 100];
const DROP_INTERVAL_FLOOR_MS: u64 = 83;

/// How long the final board (with its game-over glyph) stays on screen before
/// the game-over menu takes over.
const GAME_OVER_LINGER: Duration = Duration::from_millis(1200);

fn drop_interval_for_level(level: u32) -> Duration {
    let ms = usize::try_from(level)
        .ok()
        .and_then(|lvl| DROP_INTERVAL_MS.get(lvl).copied())
        .unwrap_or(DROP_INTERVAL_FLOOR_MS);
    Duration::from_millis(ms)
}

/// Scoring and speed-up policy live here in the host, fed by engine events.
fn absorb_events(game: &mut Game, events: Events, score: &mut u32, session_level: &mut u32) {
    for event in events {
        match event {
            Event::LinesCleared { count, .. } => {
                *score += SCORE_TABLE[count.min(4) as usize] * (*session_level + 1);
            }
            Event::LevelUp { level } => {
                *session_level = level;
                game.config.drop_interval = drop_interval_for_level(level);
            }
            Event::PieceLocked { .. } | Event::NextShape(_) | Event::GameOver => {}
        }
    }
}

impl<T: Write> Application<T> {
    pub(in crate::application) fn run_menu_play_game(
        &mut self,
        game: &mut Game,
        score: &mut u32,
        game_renderer: &mut GameRenderer,
    ) -> io::Result<MenuUpdate> {
        /* Our game loop recipe looks like this:
          * Enter 'update_and_render loop:
            - If game has ended, break loop.
            - Enter 'wait loop (budget based on next frame time):
              + Use player input to update game.
              + If budget ran out, break loop.
            - Do game.update() with the real time elapsed since the last tick.
            - Do game_renderer.render().
            - Continue 'update_and_render.
        */

        // Re-entering from the pause menu resumes play.
        game.set_paused(false);

        // Prepare channel from which to receive terminal inputs.
        let (input_sender, input_receiver) = mpsc::channel();

        // Spawn input handler thread.
        let _join_handle =
            live_input_handler::spawn(input_sender, self.settings.keybinds().clone());

        let legend = keybinds_legend(self.settings.keybinds());

        // Initial render.
        game_renderer.render(
            &mut self.term,
            game,
            *score,
            &self.settings,
            &legend,
            Self::fetch_main_xy(),
            true,
        )?;

        // Explicitly tells the renderer if entire screen needs to be re-drawn once.
        let mut rerender_entire_view = false;

        // How much time passes between each refresh.
        let frame_interval = Duration::from_secs_f64(self.settings.graphics.game_fps.recip());

        // The level the scoring multiplier is based on. Updated from `LevelUp`
        // events, which arrive after the line clear that caused them.
        let mut session_level = game.state().level;

        let mut last_update = Instant::now();
        let mut time_next_frame = last_update;

        // Main Game Loop

        let menu_update = 'update_and_render: loop {
            if game.ended() {
                // Show the final board (carrying the game-over glyph) for a
                // moment before moving on.
                game_renderer.render(
                    &mut self.term,
                    game,
                    *score,
                    &self.settings,
                    &legend,
                    Self::fetch_main_xy(),
                    false,
                )?;
                std::thread::sleep(GAME_OVER_LINGER);

                let state = game.state();
                let stats = SessionStats {
                    score: *score,
                    level: state.level,
                    lines_cleared: state.lines_cleared,
                    pieces_locked: state.pieces_locked,
                    seed: game.state_init().seed,
                };
                break 'update_and_render MenuUpdate::Push(Menu::GameOver(Box::new(stats)));
            }

            // Calculate the time of the next render we can catch.
            // We actually just skip a render if we missed the window anyway.
            let now = Instant::now();
            loop {
                time_next_frame += frame_interval;
                if time_next_frame < now {
                    continue;
                }
                break;
            }

            'wait: loop {
                // Compute duration left until we should stop waiting.
                let refresh_time_budget_remaining =
                    time_next_frame.saturating_duration_since(Instant::now());

                // Read terminal signal or finish waiting.
                match input_receiver.recv_timeout(refresh_time_budget_remaining) {
                    // Found a recognized game input: use it.
                    Ok(LiveTermSignal::RecognizedButton(button)) => {
                        let events = game.handle(button);
                        absorb_events(game, events, score, &mut session_level);
                    }

                    // Some other input that does not cause an in-game action: Process it.
                    Ok(LiveTermSignal::RawEvent(raw_event)) => match raw_event {
                        event::Event::Key(KeyEvent {
                            code,
                            modifiers,
                            kind: KeyEventKind::Press,
                            state: _,
                        }) => match (code, modifiers) {
                            // [Esc]: Leave for the pause menu.
                            (KeyCode::Esc, _) => {
                                game.set_paused(true);
                                break 'update_and_render MenuUpdate::Push(Menu::Pause);
                            }

                            // [Ctrl+C]: Abort program.
                            (KeyCode::Char('c' | 'C'), KeyModifiers::CONTROL) => {
                                break 'update_and_render MenuUpdate::Push(Menu::Quit);
                            }

                            // [P]: Freeze the game in place without leaving.
                            (KeyCode::Char('p' | 'P'), _) => {
                                let paused = game.state().paused;
                                game.set_paused(!paused);
                            }

                            // Other misc. key event: We don't care.
                            _ => continue 'wait,
                        },

                        event::Event::Resize(_, _) => {
                            // Need to redraw screen for proper centering etc.
                            rerender_entire_view = true;
                            break 'wait;
                        }

                        _ => {}
                    },

                    // Frame budget expired on its own: leave wait loop.
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        break 'wait;
                    }

                    // Input handler thread died... Pause game for now.
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        game.set_paused(true);
                        break 'update_and_render MenuUpdate::Push(Menu::Pause);
                    }
                }
            }

            // Tick the game with however much real time has passed.
            let now = Instant::now();
            let elapsed = now.saturating_duration_since(last_update);
            last_update = now;

            let events = game.update(elapsed);
            absorb_events(game, events, score, &mut session_level);

            // Render current state of the game.
            game_renderer.render(
                &mut self.term,
                game,
                *score,
                &self.settings,
                &legend,
                Self::fetch_main_xy(),
                rerender_entire_view,
            )?;

            rerender_entire_view = false;
        };

        Ok(menu_update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_interval_follows_table_then_floor() {
        assert_eq!(drop_interval_for_level(0), Duration::from_millis(799));
        assert_eq!(drop_interval_for_level(9), Duration::from_millis(100));
        assert_eq!(drop_interval_for_level(10), Duration::from_millis(83));
        assert_eq!(drop_interval_for_level(99), Duration::from_millis(83));
    }

    #[test]
    fn scoring_multiplies_by_level_plus_one() {
        let mut game = Game::builder().seed(1).build();
        let mut score = 0;
        let mut session_level = 0;

        let events = vec![Event::LinesCleared { count: 4, total: 4 }];
        absorb_events(&mut game, events, &mut score, &mut session_level);
        assert_eq!(score, 1200);

        let events = vec![
            Event::LinesCleared { count: 1, total: 5 },
            Event::LevelUp { level: 1 },
        ];
        absorb_events(&mut game, events, &mut score, &mut session_level);
        // The single clear still scores at the old level.
        assert_eq!(score, 1240);
        assert_eq!(session_level, 1);
        assert_eq!(game.config.drop_interval, Duration::from_millis(715));
    }

    #[test]
    fn zero_line_lock_scores_nothing() {
        let mut game = Game::builder().seed(1).build();
        let mut score = 0;
        let mut session_level = 3;

        let events = vec![Event::LinesCleared { count: 0, total: 0 }];
        absorb_events(&mut game, events, &mut score, &mut session_level);
        assert_eq!(score, 0);
    }
}
