/*!
# Gridfall Engine

`gridfall_engine` is the mechanics core of a falling-block puzzle game:
a rectangular board of cells, one active falling piece driven through movement,
rotation and collision checks, full-row detection and clearing, and the
score/level progression signal.

The engine knows nothing about rendering, timing sources or input devices;
a host drives it with elapsed-time ticks and button presses and reads back
state and [`Event`]s.

# Examples

```
use std::time::Duration;
use gridfall_engine::{Button, Event, Game};

// Starting up a game.
let mut game = Game::builder()
    .seed(42)
    /* ...Further optional configuration possible... */
    .build();

// The host clock ticks the game once per frame with the elapsed time;
// Pieces fall, lock, lines clear, new pieces spawn.
let events = game.update(Duration::from_millis(16));

// Player inputs are applied between ticks.
let _events = game.handle(Button::MoveLeft);

// Read most recent game state;
// This is how a UI can know how to render the board, etc.
let state = game.state();
for row in state.board.rows() {
    /* ...Draw each `Option<ColorTag>` cell... */
}

// React to outbound events - scoring policy lives entirely in the host.
for event in events {
    if let Event::LinesCleared { count, .. } = event {
        let _score_bonus = 100 * count;
    }
}
```
*/

#![warn(missing_docs)]

pub mod board;
pub mod shape_grid;
pub mod shape_source;
mod game_builder;
mod game_update;

use std::time::Duration;

use rand_chacha::ChaCha12Rng;

pub use board::Board;
pub use game_builder::GameBuilder;
pub use shape_grid::ShapeGrid;
pub use shape_source::ShapeSource;

/// Display color associated with a piece shape.
///
/// The engine only tags cells with an abstract color; how a tag maps to an
/// actual on-screen color is entirely up to the host.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorTag {
    /// Color of the 'I' shape.
    Cyan,
    /// Color of the 'J' shape.
    Blue,
    /// Color of the 'L' shape.
    Orange,
    /// Color of the 'O' shape.
    Yellow,
    /// Color of the 'S' shape.
    Green,
    /// Color of the 'T' shape.
    Purple,
    /// Color of the 'Z' shape.
    Red,
    /// Color of the terminal [`Shape::Gameover`] glyph.
    Black,
}

/// A single board slot; `None` is unoccupied.
///
/// Making the color tag part of the occupancy flag means an unoccupied cell
/// structurally cannot carry a stale color.
pub type Cell = Option<ColorTag>;

/// The internal PRNG used by a game.
pub type GameRng = ChaCha12Rng;

/// Convenient type alias for the events produced by one call into the game.
pub type Events = Vec<Event>;

/// One of the seven playable tetromino shapes, or the non-playable
/// end-of-game glyph.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// 'O'-shape; `██`.
    O = 0,
    /// 'I'-shape; `▄▄▄▄`.
    I = 1,
    /// 'S'-shape; `▄█▀`.
    S = 2,
    /// 'Z'-shape; `▀█▄`.
    Z = 3,
    /// 'T'-shape; `▄█▄`.
    T = 4,
    /// 'L'-shape; `▄▄█`.
    L = 5,
    /// 'J'-shape; `█▄▄`.
    J = 6,
    /// Non-rotatable, non-spawnable 8×8 glyph shown when the game ends.
    ///
    /// It is rendered through the ordinary [`Board::insert_piece`] path,
    /// which keeps the board/piece contract independent of gameplay.
    Gameover = 7,
}

/// An abstract game input a player can issue while a piece is falling.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Button {
    /// Moves the piece once to the left.
    MoveLeft = 0,
    /// Moves the piece once to the right.
    MoveRight,
    /// Rotate the piece by -90° (counter-clockwise).
    RotateLeft,
    /// Rotate the piece by +90° (clockwise).
    RotateRight,
    /// "Soft" dropping.
    /// This moves the piece down by one row and, on success, resets its fall timer.
    DropSoft,
    /// "Hard" dropping.
    /// This immediately drops the piece all the way down until it rests on a
    /// surface and forces it to lock on the next tick.
    DropHard,
}

/// An outbound notification produced by the game core.
///
/// The engine has zero knowledge of presentation; score formulas, level-based
/// speed-up and "next piece" preview panels are all host reactions to these.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// The active piece was permanently merged into the board.
    PieceLocked {
        /// The shape of the piece that locked.
        shape: Shape,
    },
    /// A lock event finished clearing full rows.
    ///
    /// Emitted after *every* lock; `count` may be `0`.
    LinesCleared {
        /// How many lines this lock event cleared.
        count: u32,
        /// The cumulative number of lines cleared this game.
        total: u32,
    },
    /// The level threshold `total_lines >= (level + 1) * level_up_interval`
    /// was crossed.
    LevelUp {
        /// The level that was just reached.
        level: u32,
    },
    /// A new upcoming shape was drawn from the [`ShapeSource`].
    NextShape(Shape),
    /// A new piece could not be placed at its spawn position; the game is over.
    GameOver,
}

/// The top-level lifecycle state of a game.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// A piece is active and uncommitted.
    Falling,
    /// A piece has landed and the board update (lock, line clears, spawn) is
    /// in progress. This phase never outlives a tick; it is observable to
    /// hosts only through the [`Event`]s emitted while it resolves.
    Locking,
    /// Terminal. The board has been reset for display and carries the
    /// [`Shape::Gameover`] glyph; no further gameplay mutation occurs.
    GameOver,
}

/// Configuration options of the game, which can be modified without hurting
/// internal invariants.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    /// How long a piece takes to fall one row on its own.
    ///
    /// Externally tunable at any time; a host may lower it as levels rise.
    pub drop_interval: Duration,
    /// How many cumulative line clears advance the level by one.
    ///
    /// Level-up is evaluated after every lock as
    /// `total_lines >= (level + 1) * level_up_interval`.
    pub level_up_interval: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            drop_interval: Duration::from_millis(799),
            level_up_interval: 10,
        }
    }
}

/// Some values that were used to help initialize the game.
///
/// Used for game reproducibility.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateInitialization {
    /// The value the game's PRNG was seeded with.
    pub seed: u64,
    /// The shape generation policy the game started with.
    pub shape_source: ShapeSource,
}

/// Struct storing internal game state that changes over the course of play.
#[derive(Eq, PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State {
    /// Total in-game time accumulated over all unpaused ticks.
    pub clock: Duration,
    /// The internal pseudo random number generator used.
    pub rng: GameRng,
    /// The method (and internal state) of shape generation used.
    pub shape_source: ShapeSource,
    /// The upcoming shape that will spawn once the active piece locks.
    pub next_shape: Shape,
    /// The playing grid. The single source of truth for locked cells; it also
    /// carries the active piece's transient stamp so that rendering needs no
    /// piece-specific logic.
    pub board: Board,
    /// The active falling piece, if any. The only mutable, uncommitted entity.
    pub active: Option<Piece>,
    /// The current level.
    pub level: u32,
    /// The total number of lines that have been cleared.
    pub lines_cleared: u32,
    /// How many pieces have been locked into the board so far.
    pub pieces_locked: u32,
    /// Whether the game is paused. Pausing skips the timer-advance step of a
    /// tick; piece position and board are otherwise unaffected.
    pub paused: bool,
}

/// An active piece in play.
///
/// A `Piece` does not own board cells; it is a transient overlay the [`Board`]
/// stamps and unstamps. Movement and rotation perform *no* validity checks -
/// the caller validates via [`Board::is_valid`] and rolls back with the
/// inverse operation if invalid.
#[derive(Eq, PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    /// Which shape the piece is.
    pub shape: Shape,
    /// The current 0/1 square matrix of the piece.
    ///
    /// Its side length is constant for the piece's lifetime; rotation
    /// permutes cells, never resizes.
    pub grid: ShapeGrid,
    /// Board column of the grid's top-left corner. May be negative transiently.
    pub col: isize,
    /// Board row of the grid's top-left corner. May be negative transiently.
    pub row: isize,
    /// Time accumulated since the piece last fell one row.
    pub fall_timer: Duration,
}

/// Main game struct representing a round of play.
#[derive(Eq, PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Game {
    /// Some internal configuration options of the `Game`.
    ///
    /// # Reproducibility
    /// Modifying a `Game`'s configuration after it was created might not make
    /// it easily reproducible anymore.
    pub config: Configuration,
    state_init: StateInitialization,
    state: State,
    phase: Phase,
}

impl Shape {
    /// All seven *playable* `Shape` variants in order.
    ///
    /// Note that `Shape::PLAYABLE[s as usize] == s` always holds.
    /// [`Shape::Gameover`] is deliberately absent; it never spawns.
    pub const PLAYABLE: [Self; 7] = {
        use Shape::*;
        [O, I, S, Z, T, L, J]
    };

    /// The side length of the shape's square matrix.
    pub const fn side(&self) -> usize {
        match self {
            Shape::O => 2,
            Shape::I => 4,
            Shape::Gameover => 8,
            Shape::S | Shape::Z | Shape::T | Shape::L | Shape::J => 3,
        }
    }

    /// The canonical (unrotated) matrix of the shape.
    pub fn grid(&self) -> ShapeGrid {
        #[rustfmt::skip]
        let rows: &[&[u8]] = match self {
            Shape::O => &[
                &[1, 1],
                &[1, 1],
            ],
            Shape::I => &[
                &[0, 0, 0, 0],
                &[1, 1, 1, 1],
                &[0, 0, 0, 0],
                &[0, 0, 0, 0],
            ],
            Shape::S => &[
                &[0, 1, 1],
                &[1, 1, 0],
                &[0, 0, 0],
            ],
            Shape::Z => &[
                &[1, 1, 0],
                &[0, 1, 1],
                &[0, 0, 0],
            ],
            Shape::T => &[
                &[0, 1, 0],
                &[1, 1, 1],
                &[0, 0, 0],
            ],
            Shape::L => &[
                &[0, 0, 1],
                &[1, 1, 1],
                &[0, 0, 0],
            ],
            Shape::J => &[
                &[1, 0, 0],
                &[1, 1, 1],
                &[0, 0, 0],
            ],
            Shape::Gameover => &[
                &[1, 0, 1, 0, 0, 1, 0, 1],
                &[0, 1, 0, 0, 0, 0, 1, 0],
                &[1, 0, 1, 0, 0, 1, 0, 1],
                &[0, 0, 0, 0, 0, 0, 0, 0],
                &[0, 0, 0, 0, 0, 0, 0, 0],
                &[0, 0, 1, 1, 1, 1, 0, 0],
                &[0, 1, 0, 0, 0, 0, 1, 0],
                &[0, 0, 0, 0, 0, 0, 0, 0],
            ],
        };
        ShapeGrid::from_rows(rows)
    }

    /// The display color tag assigned to the shape.
    pub const fn color_tag(&self) -> ColorTag {
        match self {
            Shape::I => ColorTag::Cyan,
            Shape::J => ColorTag::Blue,
            Shape::L => ColorTag::Orange,
            Shape::O => ColorTag::Yellow,
            Shape::S => ColorTag::Green,
            Shape::T => ColorTag::Purple,
            Shape::Z => ColorTag::Red,
            Shape::Gameover => ColorTag::Black,
        }
    }
}

impl Button {
    /// All `Button` enum variants.
    ///
    /// Note that `Button::VARIANTS[b as usize] == b` always holds.
    pub const VARIANTS: [Self; 6] = {
        use Button as B;
        [
            B::MoveLeft,
            B::MoveRight,
            B::RotateLeft,
            B::RotateRight,
            B::DropSoft,
            B::DropHard,
        ]
    };
}

impl Piece {
    /// Creates a new piece of the given shape at the spawn position for a
    /// board of the given width: horizontally centered, row `0`.
    pub fn spawn(shape: Shape, board_width: usize) -> Self {
        let width = board_width as isize;
        let side = shape.side() as isize;
        // ceil((width - side) / 2); the subtraction may go negative on boards
        // narrower than the shape, which simply fails the spawn validity check.
        let col = (width - side + 1).div_euclid(2);
        Self::new_at(shape, col, 0)
    }

    /// Creates a new piece of the given shape at an explicit position.
    pub fn new_at(shape: Shape, col: isize, row: isize) -> Self {
        Self {
            shape,
            grid: shape.grid(),
            col,
            row,
            fall_timer: Duration::ZERO,
        }
    }

    /// The display color tag of the piece.
    pub const fn color_tag(&self) -> ColorTag {
        self.shape.color_tag()
    }

    /// Iterates over the absolute board coordinates `(row, col)` of every
    /// filled cell of the piece.
    pub fn cells(&self) -> impl Iterator<Item = (isize, isize)> + '_ {
        self.grid
            .filled_cells()
            .map(|(r, c)| (self.row + r as isize, self.col + c as isize))
    }

    /// Accumulates elapsed time into the fall timer.
    pub fn update(&mut self, elapsed: Duration) {
        self.fall_timer += elapsed;
    }

    /// Whether the fall timer has exceeded (strictly) the given drop interval.
    pub fn drop_ready(&self, drop_interval: Duration) -> bool {
        self.fall_timer > drop_interval
    }

    /// Zeroes the fall timer.
    pub fn reset_timer(&mut self) {
        self.fall_timer = Duration::ZERO;
    }

    /// Translates the piece one row down. No validity check.
    pub fn move_down(&mut self) {
        self.row += 1;
    }

    /// Translates the piece one row up. No validity check.
    pub fn move_up(&mut self) {
        self.row -= 1;
    }

    /// Translates the piece one column left. No validity check.
    pub fn move_left(&mut self) {
        self.col -= 1;
    }

    /// Translates the piece one column right. No validity check.
    pub fn move_right(&mut self) {
        self.col += 1;
    }

    /// Rotates the shape matrix 90° clockwise. No wall kicks, no collision
    /// check; the caller validates and reverts with [`Piece::rotate_ccw`] if
    /// the new placement is invalid.
    pub fn rotate_cw(&mut self) {
        self.grid = self.grid.rotated_cw();
    }

    /// Rotates the shape matrix 90° counter-clockwise. See [`Piece::rotate_cw`].
    pub fn rotate_ccw(&mut self) {
        self.grid = self.grid.rotated_ccw();
    }

    /// Moves the piece down as far as the board reports it valid, then sets
    /// the fall timer *to* the drop-ready threshold so the next tick's time
    /// accumulation pushes it over and locks the piece immediately.
    ///
    /// Mutates position only; the caller is responsible for (un)stamping.
    pub fn hard_drop(&mut self, board: &Board, drop_interval: Duration) {
        while board.is_valid(self) {
            self.move_down();
        }
        self.move_up();
        self.fall_timer = drop_interval;
    }
}

impl Game {
    /// The conventional playing grid width.
    pub const DEFAULT_WIDTH: usize = 10;
    /// The conventional playing grid height.
    pub const DEFAULT_HEIGHT: usize = 20;

    /// Where the [`Shape::Gameover`] glyph is stamped on the reset board.
    pub(crate) const GLYPH_POSITION: (isize, isize) = (1, 1);

    /// Creates a blank new template representing a yet-to-be-started [`Game`]
    /// ready for configuration.
    pub fn builder() -> GameBuilder {
        GameBuilder::default()
    }

    /// Read accessor for the game's initial values.
    pub const fn state_init(&self) -> &StateInitialization {
        &self.state_init
    }

    /// Read accessor for the current game state.
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// Read accessor for the current lifecycle phase.
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether the game has reached its terminal state.
    pub const fn ended(&self) -> bool {
        matches!(self.phase, Phase::GameOver)
    }

    /// Sets the pause flag. While paused, ticks skip the timer-advance step
    /// and player commands are ignored.
    pub fn set_paused(&mut self, paused: bool) {
        self.state.paused = paused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_is_horizontally_centered() {
        // ceil((10 - side) / 2) for each side length.
        assert_eq!(Piece::spawn(Shape::O, 10).col, 4);
        assert_eq!(Piece::spawn(Shape::T, 10).col, 4);
        assert_eq!(Piece::spawn(Shape::I, 10).col, 3);
        assert_eq!(Piece::spawn(Shape::O, 10).row, 0);
    }

    #[test]
    fn spawn_on_too_narrow_board_is_off_grid() {
        let piece = Piece::spawn(Shape::I, 2);
        let board = Board::new(2, 20);
        assert!(!board.is_valid(&piece));
    }

    #[test]
    fn drop_ready_is_strict() {
        let interval = Duration::from_millis(799);
        let mut piece = Piece::spawn(Shape::T, 10);
        piece.update(interval);
        assert!(!piece.drop_ready(interval));
        piece.update(Duration::from_millis(1));
        assert!(piece.drop_ready(interval));
        piece.reset_timer();
        assert!(!piece.drop_ready(interval));
    }

    #[test]
    fn hard_drop_rests_on_highest_valid_row() {
        let board = Board::new(10, 20);
        let interval = Duration::from_millis(799);
        for shape in Shape::PLAYABLE {
            let mut piece = Piece::spawn(shape, board.width());
            piece.hard_drop(&board, interval);
            assert!(board.is_valid(&piece), "{shape:?} must rest validly");
            piece.move_down();
            assert!(!board.is_valid(&piece), "{shape:?} must rest maximally low");
            piece.move_up();
            // Forced to the threshold exactly: locks only once time passes.
            assert!(!piece.drop_ready(interval));
            piece.update(Duration::from_millis(1));
            assert!(piece.drop_ready(interval));
        }
    }

    #[test]
    fn hard_drop_onto_stack_rests_on_top() {
        let mut board = Board::new(10, 20);
        let mut floor = Piece::new_at(Shape::O, 4, 18);
        floor.hard_drop(&board, Duration::ZERO);
        board.insert_piece(&floor);

        let mut piece = Piece::spawn(Shape::O, board.width());
        piece.hard_drop(&board, Duration::ZERO);
        // O stack: the new piece sits directly above the old one.
        assert_eq!(piece.row, 16);
    }
}
