/*!
This module handles creation / initialization / building of [`Game`]s.
*/

use rand_chacha::rand_core::SeedableRng;

use super::*;

/// This builder exposes the ability to configure a new [`Game`] to varying
/// degrees.
///
/// Generally speaking, when using `GameBuilder`, you'll first call
/// [`GameBuilder::new`] or [`Game::builder`], then chain calls to methods to
/// set each field, then call [`GameBuilder::build`].
/// This will give you a [`Game`] as specified that you can then use as normal.
/// The `GameBuilder` is not used up and its configuration can be re-used to
/// initialize more [`Game`]s.
#[derive(PartialEq, Eq, Clone, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameBuilder {
    /// Many of the configuration options that will be set for the game.
    pub config: Configuration,
    /// The board width in cells, [`Game::DEFAULT_WIDTH`] if unset.
    pub width: Option<usize>,
    /// The board height in cells, [`Game::DEFAULT_HEIGHT`] if unset.
    pub height: Option<usize>,
    /// The value to seed the game's PRNG with, a fresh random one if unset.
    pub seed: Option<u64>,
    /// The method (and internal state) of shape generation used.
    pub shape_source: Option<ShapeSource>,
}

impl GameBuilder {
    /// Creates a blank new template representing a yet-to-be-started [`Game`]
    /// ready for configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a [`Game`] with the information specified by `self`.
    ///
    /// The returned game already has its first piece in play (stamped onto the
    /// board) and an upcoming shape drawn. On a board too small to spawn into,
    /// the game starts directly in [`Phase::GameOver`].
    pub fn build(&self) -> Game {
        let seed = self.seed.unwrap_or_else(rand::random);
        let mut rng = GameRng::seed_from_u64(seed);
        let mut shape_source = self.shape_source.unwrap_or_default();

        let state_init = StateInitialization { seed, shape_source };

        // Iterator is infinite.
        let next_shape = shape_source.with_rng(&mut rng).next().unwrap();

        let mut game = Game {
            config: self.config,
            state_init,
            state: State {
                clock: Duration::ZERO,
                rng,
                shape_source,
                next_shape,
                board: Board::new(
                    self.width.unwrap_or(Game::DEFAULT_WIDTH),
                    self.height.unwrap_or(Game::DEFAULT_HEIGHT),
                ),
                active: None,
                level: 0,
                lines_cleared: 0,
                pieces_locked: 0,
                paused: false,
            },
            phase: Phase::Falling,
        };

        // Put the first piece in play; its `NextShape` event has no audience yet.
        let mut events = Events::new();
        game.spawn_piece(&mut events);

        game
    }

    /// Sets the [`Configuration`] that will be used by [`Game`].
    pub fn config(&mut self, x: Configuration) -> &mut Self {
        self.config = x;
        self
    }
    /// How long a piece takes to fall one row on its own.
    pub fn drop_interval(&mut self, x: Duration) -> &mut Self {
        self.config.drop_interval = x;
        self
    }
    /// How many cumulative line clears advance the level by one.
    pub fn level_up_interval(&mut self, x: u32) -> &mut Self {
        self.config.level_up_interval = x;
        self
    }
    /// The board width in cells.
    pub fn width(&mut self, x: usize) -> &mut Self {
        self.width = Some(x);
        self
    }
    /// The board height in cells.
    pub fn height(&mut self, x: usize) -> &mut Self {
        self.height = Some(x);
        self
    }
    /// The value to seed the game's PRNG with.
    pub fn seed(&mut self, x: u64) -> &mut Self {
        self.seed = Some(x);
        self
    }
    /// The method (and internal state) of shape generation used.
    pub fn shape_source(&mut self, x: ShapeSource) -> &mut Self {
        self.shape_source = Some(x);
        self
    }
}
