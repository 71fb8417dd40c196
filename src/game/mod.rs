pub mod commands;
pub mod controller;
pub mod state;

pub use controller::{GameController, GameSnapshot};
pub use state::{GamePhase, GameSession, GuessDirection};
