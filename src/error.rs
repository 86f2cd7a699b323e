/*
 * Error Module
 *
 * Configuration failures surfaced when a simulation run, grid or scenario is
 * constructed. The per-frame core itself never fails.
 */

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid divisions must be positive")]
    ZeroDivisions,

    #[error("grid extent must be positive and finite, got {width}x{height}")]
    InvalidExtent { width: f32, height: f32 },

    #[error("sample density must be positive and finite, got {0}")]
    InvalidDensity(f32),

    #[error("sample density {density} yields no markers on a {width}-wide grid")]
    NoMarkers { density: f32, width: f32 },

    #[error("agent count must be positive")]
    NoAgents,

    #[error("agent radius {radius} must exceed the mesh radius {mesh_radius}")]
    RadiusBelowMargin { radius: f32, mesh_radius: f32 },

    #[error("unknown scenario `{0}` (expected 1, 2, 3 or a scenario name)")]
    UnknownScenario(String),
}
