//! The five game modules.

pub mod runner;
pub mod shooter;
pub mod snake;
pub mod tetris;

pub use runner::RunnerGame;
pub use shooter::ShooterGame;
pub use snake::SnakeGame;
pub use tetris::TetrisGame;
