mod game_over;
mod pause;
mod play_game;
mod title;
