/*!
This module handles what happens when [`Game::update`] and [`Game::handle`]
are called.
*/

use super::*;

impl Game {
    /// The main function used to advance the game state.
    ///
    /// One external clock calls this once per frame with the elapsed time.
    /// It advances the active piece's fall timer and, once the timer exceeds
    /// the configured drop interval, attempts descent: the piece is lifted off
    /// the board, moved down one row and re-stamped if the new position is
    /// valid. If not, the piece is moved back up, locked permanently, full
    /// lines are cleared, the level threshold is evaluated and the pending
    /// "next" shape is spawned. A blocked spawn ends the game.
    ///
    /// Returns all [`Event`]s this tick caused, in order. Updating a paused or
    /// ended game is a no-op, not an error.
    pub fn update(&mut self, elapsed: Duration) -> Events {
        let mut events = Events::new();
        if self.ended() || self.state.paused {
            return events;
        }
        self.state.clock += elapsed;

        let Some(mut piece) = self.state.active.take() else {
            return events;
        };
        piece.update(elapsed);

        if !piece.drop_ready(self.config.drop_interval) {
            self.state.active = Some(piece);
            return events;
        }
        piece.reset_timer();

        // Lift the piece off the board so it cannot collide with its own stamp.
        self.state.board.clear_piece(&piece);
        piece.move_down();

        if self.state.board.is_valid(&piece) {
            // Re-stamp; the board a renderer sees always carries the piece.
            self.state.board.insert_piece(&piece);
            self.state.active = Some(piece);
            return events;
        }

        // The piece hit a surface: restore the last valid position and lock.
        piece.move_up();
        self.phase = Phase::Locking;
        self.state.board.insert_piece(&piece);
        self.state.pieces_locked += 1;
        events.push(Event::PieceLocked { shape: piece.shape });

        let count = self.state.board.clear_full_lines();
        self.state.lines_cleared += count;
        events.push(Event::LinesCleared {
            count,
            total: self.state.lines_cleared,
        });

        if self.state.lines_cleared >= (self.state.level + 1) * self.config.level_up_interval {
            self.state.level += 1;
            events.push(Event::LevelUp {
                level: self.state.level,
            });
        }

        self.spawn_piece(&mut events);
        events
    }

    /// Applies a player command to the active piece.
    ///
    /// Every mutation follows unstamp → mutate → validate → rollback-if-invalid
    /// → restamp; an invalid placement is reverted with the inverse operation
    /// and never surfaces as an error. Commands on a paused or ended game are
    /// ignored.
    pub fn handle(&mut self, button: Button) -> Events {
        let mut events = Events::new();
        if self.ended() || self.state.paused {
            return events;
        }
        let Some(mut piece) = self.state.active.take() else {
            return events;
        };
        self.state.board.clear_piece(&piece);

        match button {
            Button::MoveLeft => {
                piece.move_left();
                if !self.state.board.is_valid(&piece) {
                    piece.move_right();
                }
            }
            Button::MoveRight => {
                piece.move_right();
                if !self.state.board.is_valid(&piece) {
                    piece.move_left();
                }
            }
            Button::RotateLeft => {
                piece.rotate_ccw();
                if !self.state.board.is_valid(&piece) {
                    piece.rotate_cw();
                }
            }
            Button::RotateRight => {
                piece.rotate_cw();
                if !self.state.board.is_valid(&piece) {
                    piece.rotate_ccw();
                }
            }
            Button::DropSoft => {
                piece.move_down();
                if self.state.board.is_valid(&piece) {
                    piece.reset_timer();
                } else {
                    piece.move_up();
                }
            }
            Button::DropHard => {
                piece.hard_drop(&self.state.board, self.config.drop_interval);
            }
        }

        self.state.board.insert_piece(&piece);
        self.state.active = Some(piece);
        events
    }

    /// Puts the pending "next" shape in play at the spawn position, or ends
    /// the game if the placement is blocked.
    pub(crate) fn spawn_piece(&mut self, events: &mut Events) {
        let piece = Piece::spawn(self.state.next_shape, self.state.board.width());

        if !self.state.board.is_valid(&piece) {
            // Spawn-blocked: terminal state, board repurposed for display.
            self.phase = Phase::GameOver;
            self.state.active = None;
            self.state.board.reset();
            let (col, row) = Self::GLYPH_POSITION;
            let glyph = Piece::new_at(Shape::Gameover, col, row);
            if self.state.board.is_valid(&glyph) {
                self.state.board.insert_piece(&glyph);
            }
            events.push(Event::GameOver);
            return;
        }

        self.state.board.insert_piece(&piece);
        self.state.active = Some(piece);
        self.phase = Phase::Falling;

        // Iterator is infinite.
        let next = self
            .state
            .shape_source
            .with_rng(&mut self.state.rng)
            .next()
            .unwrap();
        self.state.next_shape = next;
        events.push(Event::NextShape(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(100);

    fn test_game() -> Game {
        Game::builder().seed(42).build()
    }

    /// Advances the game until the active piece locks once.
    fn tick_until_lock(game: &mut Game) -> Events {
        for _ in 0..10_000 {
            let events = game.update(TICK);
            if events
                .iter()
                .any(|e| matches!(e, Event::PieceLocked { .. }))
            {
                return events;
            }
            if game.ended() {
                return events;
            }
        }
        panic!("piece never locked");
    }

    #[test]
    fn build_puts_first_piece_in_play() {
        let game = test_game();
        assert_eq!(*game.phase(), Phase::Falling);
        let piece = game.state().active.as_ref().unwrap();
        // The active piece's transient stamp is on the board.
        for (row, col) in piece.cells() {
            assert!(game.state().board.cell(row as usize, col as usize).is_some());
        }
    }

    #[test]
    fn same_seed_same_game() {
        let a = Game::builder().seed(7).build();
        let b = Game::builder().seed(7).build();
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn piece_falls_one_row_after_drop_interval() {
        let mut game = test_game();
        let start_row = game.state().active.as_ref().unwrap().row;
        // Strictly exceeding the default 799ms interval takes 8 ticks of 100ms.
        for _ in 0..7 {
            assert!(game.update(TICK).is_empty());
        }
        assert_eq!(game.state().active.as_ref().unwrap().row, start_row);
        game.update(TICK);
        assert_eq!(game.state().active.as_ref().unwrap().row, start_row + 1);
    }

    #[test]
    fn lock_emits_events_and_spawns_next() {
        let mut game = test_game();
        let expected_shape = game.state().active.as_ref().unwrap().shape;
        let expected_next = game.state().next_shape;

        game.handle(Button::DropHard);
        let events = tick_until_lock(&mut game);

        assert!(events.contains(&Event::PieceLocked {
            shape: expected_shape
        }));
        assert!(events.contains(&Event::LinesCleared { count: 0, total: 0 }));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::NextShape(_))));
        assert_eq!(game.state().pieces_locked, 1);
        // The pending shape went into play.
        assert_eq!(game.state().active.as_ref().unwrap().shape, expected_next);
        assert_eq!(*game.phase(), Phase::Falling);
    }

    #[test]
    fn hard_drop_locks_on_next_tick() {
        let mut game = test_game();
        game.handle(Button::DropHard);
        // Not locked yet: the timer sits exactly at the threshold.
        assert_eq!(game.state().pieces_locked, 0);
        let events = game.update(Duration::from_millis(1));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::PieceLocked { .. })));
    }

    #[test]
    fn sideways_moves_roll_back_at_walls() {
        let mut game = test_game();
        for _ in 0..20 {
            game.handle(Button::MoveLeft);
        }
        // Pinned against the left wall, never pushed through it.
        let piece = game.state().active.as_ref().unwrap().clone();
        assert!(piece.cells().any(|(_, col)| col == 0));
        let mut board = game.state().board.clone();
        board.clear_piece(&piece);
        assert!(board.is_valid(&piece));

        for _ in 0..20 {
            game.handle(Button::MoveRight);
        }
        let piece = game.state().active.as_ref().unwrap().clone();
        let width = game.state().board.width() as isize;
        assert!(piece.cells().any(|(_, col)| col == width - 1));
    }

    #[test]
    fn soft_drop_resets_fall_timer_only_on_success() {
        let mut game = test_game();
        game.update(Duration::from_millis(500));
        let row = game.state().active.as_ref().unwrap().row;
        game.handle(Button::DropSoft);
        let piece = game.state().active.as_ref().unwrap();
        assert_eq!(piece.row, row + 1);
        assert_eq!(piece.fall_timer, Duration::ZERO);

        // On the floor, soft drop is a no-op and keeps the timer.
        game.handle(Button::DropHard);
        let resting = game.state().active.as_ref().unwrap().row;
        game.handle(Button::DropSoft);
        let piece = game.state().active.as_ref().unwrap();
        assert_eq!(piece.row, resting);
        assert_eq!(piece.fall_timer, game.config.drop_interval);
    }

    #[test]
    fn rotation_never_leaves_piece_in_invalid_position() {
        let mut game = Game::builder().seed(1).width(10).height(20).build();
        for _ in 0..6 {
            game.handle(Button::MoveLeft);
            game.handle(Button::RotateRight);
            let piece = game.state().active.as_ref().unwrap().clone();
            let mut board = game.state().board.clone();
            board.clear_piece(&piece);
            assert!(board.is_valid(&piece));
        }
    }

    #[test]
    fn level_up_triggers_at_threshold_exactly_once() {
        let mut game = prepared_single_line_clear();
        game.state.lines_cleared = 9;

        game.handle(Button::DropHard);
        let events = tick_until_lock(&mut game);

        assert!(events.contains(&Event::LinesCleared { count: 1, total: 10 }));
        let level_ups: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, Event::LevelUp { .. }))
            .collect();
        assert_eq!(level_ups, [&Event::LevelUp { level: 1 }]);
        assert_eq!(game.state().level, 1);
    }

    #[test]
    fn no_level_up_below_threshold() {
        let mut game = prepared_single_line_clear();
        game.state.lines_cleared = 8;

        game.handle(Button::DropHard);
        let events = tick_until_lock(&mut game);

        assert!(events.contains(&Event::LinesCleared { count: 1, total: 9 }));
        assert!(!events.iter().any(|e| matches!(e, Event::LevelUp { .. })));
        assert_eq!(game.state().level, 0);
    }

    /// A game whose active piece is an O at column 0 with the bottom row
    /// otherwise filled, so that hard-dropping it clears exactly one line.
    fn prepared_single_line_clear() -> Game {
        let mut game = test_game();

        // Swap the active piece for an O pinned to the left wall.
        let spawned = game.state.active.take().unwrap();
        game.state.board.clear_piece(&spawned);
        let piece = Piece::new_at(Shape::O, 0, 0);
        game.state.board.insert_piece(&piece);
        game.state.active = Some(piece);

        // Fill the bottom row's columns 2..10 with two horizontal I-pieces.
        let height = game.state.board.height() as isize;
        for col in [2, 6] {
            let filler = Piece::new_at(Shape::I, col, height - 2);
            game.state.board.insert_piece(&filler);
        }
        game
    }

    #[test]
    fn blocked_spawn_ends_the_game() {
        let mut game = test_game();

        // Park the active piece at the bottom, then wall off the spawn rows.
        game.handle(Button::DropHard);
        for col in [2, 4, 6] {
            let blocker = Piece::new_at(Shape::O, col, 0);
            game.state.board.insert_piece(&blocker);
        }

        let events = tick_until_lock(&mut game);

        assert!(events.contains(&Event::GameOver));
        assert!(!events.iter().any(|e| matches!(e, Event::NextShape(_))));
        assert_eq!(*game.phase(), Phase::GameOver);
        assert!(game.state().active.is_none());

        // The board was reset for display and carries the glyph.
        let mut glyph_board = Board::new(10, 20);
        glyph_board.insert_piece(&Piece::new_at(Shape::Gameover, 1, 1));
        assert_eq!(game.state().board, glyph_board);

        // No further falling-piece logic mutates anything.
        assert!(game.update(TICK).is_empty());
        assert!(game.handle(Button::DropHard).is_empty());
        assert_eq!(game.state().board, glyph_board);
    }

    #[test]
    fn pause_skips_timer_advance_and_ignores_commands() {
        let mut game = test_game();
        let before = game.state().clone();

        game.set_paused(true);
        assert!(game.update(Duration::from_secs(10)).is_empty());
        assert!(game.handle(Button::MoveLeft).is_empty());
        game.set_paused(false);

        // Clock, piece and board are exactly as they were.
        assert_eq!(*game.state(), before);
    }
}
