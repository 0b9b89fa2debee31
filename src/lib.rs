//! Rules engine for the liquid sort puzzle: which pours are legal, how much
//! liquid each one moves, and whether a position is won or stuck.

pub mod config;
pub mod deal;
pub mod error;
pub mod gameplay;
pub mod logging;
pub mod model;
pub mod rules;
pub mod solver;

pub use config::GameConfig;
pub use error::{ConfigError, EngineError, ParseError};
pub use gameplay::{GameSession, PourResult, SessionAction, apply_pour, can_pour, evaluate};
pub use model::{ColorId, Container, GameOutcome, GameState, LiquidUnit, Move};
pub use rules::{enumerate_moves, is_stuck, is_won};
pub use solver::{SolveResult, Solver};
