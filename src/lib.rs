//! Rock, paper, scissors token simulation.
//!
//! Tokens of three kinds drift around a square surface, bounce off its walls
//! and each other, and convert the loser of every mixed collision to the
//! winner's kind. Rendering and tick scheduling live outside this crate; the
//! engine only exposes token views through [`TokenRenderer`].

pub mod placement;
pub mod simulation;
pub mod token;

pub use placement::place_initial_tokens;
pub use simulation::{Simulation, StepReport};
pub use simulation_common::{distance, Kind, KindCounts, SimParams, SimulationConfig, TokenRenderer, TokenView, Vec2};
pub use token::Token;
