/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that contains every input
 * of a simulation run: population size, grid layout, marker density, agent
 * radii and the anti-stall constants. Some of them can be modified through
 * the UI. It also provides validation and change detection so the viewer
 * knows when an edit requires the run to be rebuilt.
 */

use std::ops::RangeInclusive;

use crate::error::ConfigError;

// Parameters for a simulation run
#[derive(Debug)]
pub struct SimulationParams {
    pub num_agents: usize,
    pub grid_width: f32,
    pub grid_height: f32,
    pub grid_divisions: usize,
    pub sample_density: f32,
    pub agent_radius: f32,
    pub agent_mesh_radius: f32,
    pub stall_threshold: f32,
    pub stall_factor: f32,
    pub epsilon: f32,
    pub circle_radius: f32,
    pub seed: Option<u64>,

    // Run switches
    pub enable_parallel: bool,
    pub reset_claims_each_frame: bool,

    // Viewer settings
    pub pause_simulation: bool,
    pub show_markers: bool,
    pub show_debug: bool,

    // Internal state for tracking changes
    previous_values: Option<ParamSnapshot>,
}

// A snapshot of the values that shape a run (changing any of them needs a reset)
#[derive(Debug, Clone, PartialEq)]
struct ParamSnapshot {
    num_agents: usize,
    grid_divisions: usize,
    sample_density: f32,
    agent_radius: f32,
    circle_radius: f32,
    enable_parallel: bool,
    reset_claims_each_frame: bool,
    pause_simulation: bool,
    show_markers: bool,
    show_debug: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_agents: 20,
            grid_width: 20.0,
            grid_height: 20.0,
            grid_divisions: 10,
            sample_density: 6.0,
            agent_radius: 3.0,
            agent_mesh_radius: 0.25,
            stall_threshold: 0.003,
            stall_factor: 0.001,
            epsilon: 1e-4,
            circle_radius: 8.0,
            seed: None,
            enable_parallel: false,
            reset_claims_each_frame: false,
            pause_simulation: false,
            show_markers: true,
            show_debug: false,
            previous_values: None,
        }
    }
}

impl Clone for SimulationParams {
    // Snapshots are UI bookkeeping and do not follow the values around
    fn clone(&self) -> Self {
        Self {
            num_agents: self.num_agents,
            grid_width: self.grid_width,
            grid_height: self.grid_height,
            grid_divisions: self.grid_divisions,
            sample_density: self.sample_density,
            agent_radius: self.agent_radius,
            agent_mesh_radius: self.agent_mesh_radius,
            stall_threshold: self.stall_threshold,
            stall_factor: self.stall_factor,
            epsilon: self.epsilon,
            circle_radius: self.circle_radius,
            seed: self.seed,
            enable_parallel: self.enable_parallel,
            reset_claims_each_frame: self.reset_claims_each_frame,
            pause_simulation: self.pause_simulation,
            show_markers: self.show_markers,
            show_debug: self.show_debug,
            previous_values: None,
        }
    }
}

impl SimulationParams {
    // Reject configurations the core has no defined behaviour for
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_divisions == 0 {
            return Err(ConfigError::ZeroDivisions);
        }
        let extent_ok = |v: f32| v.is_finite() && v > 0.0;
        if !extent_ok(self.grid_width) || !extent_ok(self.grid_height) {
            return Err(ConfigError::InvalidExtent {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if !self.sample_density.is_finite() || self.sample_density <= 0.0 {
            return Err(ConfigError::InvalidDensity(self.sample_density));
        }
        if self.samples_per_side() == 0 {
            return Err(ConfigError::NoMarkers {
                density: self.sample_density,
                width: self.grid_width,
            });
        }
        if self.num_agents == 0 {
            return Err(ConfigError::NoAgents);
        }
        if !(self.agent_radius > self.agent_mesh_radius) {
            return Err(ConfigError::RadiusBelowMargin {
                radius: self.agent_radius,
                mesh_radius: self.agent_mesh_radius,
            });
        }
        Ok(())
    }

    // Largest per-frame displacement an agent may take
    #[inline]
    pub fn velocity_cap(&self) -> f32 {
        self.agent_radius - self.agent_mesh_radius
    }

    #[inline]
    pub fn samples_per_side(&self) -> usize {
        (self.grid_width * self.sample_density).round().max(0.0) as usize
    }

    #[inline]
    pub fn marker_count(&self) -> usize {
        let side = self.samples_per_side();
        side * side
    }

    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&mut self) {
        self.previous_values = Some(self.snapshot());
    }

    // Check if any parameters have changed since the last snapshot
    // Returns a tuple of (needs_reset, any_ui_changed)
    pub fn detect_changes(&self) -> (bool, bool) {
        let Some(prev) = &self.previous_values else {
            return (false, false);
        };
        let current = self.snapshot();

        let needs_reset = current.num_agents != prev.num_agents
            || current.grid_divisions != prev.grid_divisions
            || current.sample_density != prev.sample_density
            || current.agent_radius != prev.agent_radius
            || current.circle_radius != prev.circle_radius;

        (needs_reset, needs_reset || current != *prev)
    }

    fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            num_agents: self.num_agents,
            grid_divisions: self.grid_divisions,
            sample_density: self.sample_density,
            agent_radius: self.agent_radius,
            circle_radius: self.circle_radius,
            enable_parallel: self.enable_parallel,
            reset_claims_each_frame: self.reset_claims_each_frame,
            pause_simulation: self.pause_simulation,
            show_markers: self.show_markers,
            show_debug: self.show_debug,
        }
    }

    // Get parameter ranges for UI sliders
    pub fn get_num_agents_range() -> RangeInclusive<usize> {
        1..=200
    }

    pub fn get_divisions_range() -> RangeInclusive<usize> {
        1..=40
    }

    pub fn get_density_range() -> RangeInclusive<f32> {
        0.5..=12.0
    }

    pub fn get_agent_radius_range() -> RangeInclusive<f32> {
        0.5..=6.0
    }

    pub fn get_circle_radius_range() -> RangeInclusive<f32> {
        1.0..=10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn defaults_match_reference_configuration() {
        let params = SimulationParams::default();
        assert_eq!(params.num_agents, 20);
        assert_eq!(params.grid_divisions, 10);
        assert_eq!(params.samples_per_side(), 120);
        assert_eq!(params.marker_count(), 14_400);
        assert_relative_eq!(params.velocity_cap(), 2.75);
        assert!(params.validate().is_ok());
    }

    #[rstest]
    #[case::no_divisions(|p: &mut SimulationParams| p.grid_divisions = 0, ConfigError::ZeroDivisions)]
    #[case::no_agents(|p: &mut SimulationParams| p.num_agents = 0, ConfigError::NoAgents)]
    #[case::negative_width(
        |p: &mut SimulationParams| p.grid_width = -1.0,
        ConfigError::InvalidExtent { width: -1.0, height: 20.0 }
    )]
    #[case::zero_density(|p: &mut SimulationParams| p.sample_density = 0.0, ConfigError::InvalidDensity(0.0))]
    #[case::radius_inside_mesh(
        |p: &mut SimulationParams| p.agent_radius = 0.25,
        ConfigError::RadiusBelowMargin { radius: 0.25, mesh_radius: 0.25 }
    )]
    fn validate_rejects_malformed_configuration(
        #[case] tweak: fn(&mut SimulationParams),
        #[case] expected: ConfigError,
    ) {
        let mut params = SimulationParams::default();
        tweak(&mut params);
        assert_eq!(params.validate(), Err(expected));
    }

    #[test]
    fn tiny_density_without_markers_is_rejected() {
        let params = SimulationParams {
            grid_width: 1.0,
            sample_density: 0.1,
            ..SimulationParams::default()
        };
        assert!(matches!(params.validate(), Err(ConfigError::NoMarkers { .. })));
    }

    #[test]
    fn change_detection_separates_resets_from_ui_edits() {
        let mut params = SimulationParams::default();
        assert_eq!(params.detect_changes(), (false, false));

        params.take_snapshot();
        params.show_markers = false;
        assert_eq!(params.detect_changes(), (false, true));

        params.take_snapshot();
        params.num_agents = 40;
        assert_eq!(params.detect_changes(), (true, true));
    }
}
