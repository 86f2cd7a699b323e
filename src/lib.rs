/*
 * BioCrowds Simulation - Module Definitions
 *
 * Agents cross a bounded ground plane toward individual goals by claiming
 * nearby scattered markers and steering toward the claimed markers that best
 * line up with their goal direction. The core (grid, markers, claims,
 * steering, agents, runs) has no dependency on the viewer modules.
 */

// Re-export key components for easier access
pub use agent::{Agent, StepReport, Team};
pub use error::ConfigError;
pub use marker::{ClaimSlot, Marker, MarkerField};
pub use params::SimulationParams;
pub use scenario::Scenario;
pub use simulation::{FrameStats, SimulationRun};
pub use spatial_grid::{neighborhood, CellRect, SpatialGrid};
pub use debug::DebugInfo;
pub use app::Model;

// Simulation core
pub mod agent;
pub mod claims;
pub mod error;
pub mod marker;
pub mod params;
pub mod scenario;
pub mod simulation;
pub mod spatial_grid;
pub mod steering;

// Ambient and viewer modules
pub mod app;
pub mod debug;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod ui;
