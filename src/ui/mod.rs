// ui/mod.rs

pub mod game;
pub mod markdown;
pub mod spinner;
pub mod utils;

pub use game::draw_in_game as draw;

pub const MIN_WIDTH: u16 = 80;
pub const MIN_HEIGHT: u16 = 24;
