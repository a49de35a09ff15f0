pub mod config;
pub mod kind;
pub mod render;
pub mod sim_params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{InitialConditions, OutputConfig, SimulationConfig, SurfaceConfig, TimingConfig, TokenConfig};
pub use kind::{Kind, KindCounts};
pub use render::{TokenRenderer, TokenView};
pub use sim_params::SimParams;
pub use snapshot::{load_snapshots, save_snapshots, OutputFormat, Snapshot, TokenRecord};
pub use vecmath::{angle_to_vec, clamp, distance, Vec2};
