/*
 * Simulation Module
 *
 * This module defines SimulationRun, the aggregate that owns everything a
 * run needs: parameters, grid, marker field, agents and the RNG used for
 * scattering. Switching scenario rebuilds the markers and agents from
 * scratch; nothing survives a reset.
 *
 * A frame is one pass over every agent. Agents share the marker field's
 * claim slots, so the sequential pass is the reference behaviour; the
 * parallel pass uses the same atomic minimum-distance claims and keeps the
 * tightening law, though which agent lists a stolen marker depends on
 * scheduling.
 */

use log::{debug, info, warn};
use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::agent::{Agent, StepReport};
use crate::error::ConfigError;
use crate::marker::MarkerField;
use crate::params::SimulationParams;
use crate::scenario::Scenario;
use crate::spatial_grid::SpatialGrid;

// Summary of one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    pub frame: u64,
    pub claimed_markers: usize,
    pub owned_markers: usize,
    pub nudged_agents: usize,
    pub arrived_agents: usize,
    pub out_of_bounds: usize,
    pub mean_speed: f32,
}

#[derive(Debug)]
pub struct SimulationRun {
    params: SimulationParams,
    grid: SpatialGrid,
    markers: MarkerField,
    agents: Vec<Agent>,
    scenario: Option<Scenario>,
    rng: StdRng,
    frame: u64,
    last_stats: FrameStats,
}

impl SimulationRun {
    // Seeded from `params.seed` when present, otherwise from OS entropy
    pub fn new(params: SimulationParams, scenario: Scenario) -> Result<Self, ConfigError> {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(params, scenario, rng)
    }

    pub fn with_rng(
        params: SimulationParams,
        scenario: Scenario,
        mut rng: StdRng,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        let grid = SpatialGrid::new(params.grid_divisions, params.grid_width, params.grid_height)?;
        let markers = MarkerField::scatter(params.marker_count(), &grid, &mut rng);
        let agents = scenario.spawn(&params);

        info!(
            "{scenario}: spawned {} agents over {} markers",
            agents.len(),
            markers.len()
        );

        Ok(Self {
            params,
            grid,
            markers,
            agents,
            scenario: Some(scenario),
            rng,
            frame: 0,
            last_stats: FrameStats::default(),
        })
    }

    // Run with a caller-supplied population instead of a scenario layout.
    // `params.num_agents` is overwritten with the population size.
    pub fn with_agents(
        mut params: SimulationParams,
        agents: Vec<Agent>,
        mut rng: StdRng,
    ) -> Result<Self, ConfigError> {
        params.num_agents = agents.len();
        params.validate()?;
        if let Some(agent) = agents
            .iter()
            .find(|agent| agent.radius.is_nan() || agent.radius <= params.agent_mesh_radius)
        {
            return Err(ConfigError::RadiusBelowMargin {
                radius: agent.radius,
                mesh_radius: params.agent_mesh_radius,
            });
        }
        let grid = SpatialGrid::new(params.grid_divisions, params.grid_width, params.grid_height)?;
        let markers = MarkerField::scatter(params.marker_count(), &grid, &mut rng);

        info!(
            "custom run: {} agents over {} markers",
            agents.len(),
            markers.len()
        );

        Ok(Self {
            params,
            grid,
            markers,
            agents,
            scenario: None,
            rng,
            frame: 0,
            last_stats: FrameStats::default(),
        })
    }

    // Replace the marker field, e.g. with hand-placed markers
    pub fn with_markers(mut self, markers: MarkerField) -> Self {
        self.markers = markers;
        self
    }

    // Start over: re-scatter markers and re-spawn agents for `scenario`
    pub fn reset(&mut self, scenario: Scenario) {
        self.markers = MarkerField::scatter(self.params.marker_count(), &self.grid, &mut self.rng);
        self.agents = scenario.spawn(&self.params);
        self.scenario = Some(scenario);
        self.frame = 0;
        self.last_stats = FrameStats::default();

        info!(
            "reset to {scenario}: {} agents over {} markers",
            self.agents.len(),
            self.markers.len()
        );
    }

    // Swap in new parameters and restart the current scenario
    pub fn rebuild(&mut self, params: SimulationParams) -> Result<(), ConfigError> {
        params.validate()?;
        self.grid = SpatialGrid::new(params.grid_divisions, params.grid_width, params.grid_height)?;
        self.params = params;
        self.reset(self.scenario.unwrap_or_default());
        Ok(())
    }

    // Advance every agent by one frame of `delta` seconds
    pub fn step(&mut self, delta: f32) -> FrameStats {
        if self.params.reset_claims_each_frame {
            self.markers.reset_claims();
        }

        let grid = &self.grid;
        let markers = &self.markers;
        let params = &self.params;

        let reports: Vec<StepReport> = if params.enable_parallel {
            self.agents
                .par_iter_mut()
                .map(|agent| agent.step(grid, markers, params, delta))
                .collect()
        } else {
            self.agents
                .iter_mut()
                .map(|agent| agent.step(grid, markers, params, delta))
                .collect()
        };

        self.frame += 1;
        let stats = self.summarize(&reports);

        if stats.out_of_bounds > self.last_stats.out_of_bounds {
            warn!(
                "frame {}: {} agents outside the {}x{} grid",
                stats.frame, stats.out_of_bounds, self.grid.width, self.grid.height
            );
        }
        debug!(
            "frame {}: {} claims ({} markers owned), {} nudged, {} arrived, mean speed {:.4}",
            stats.frame,
            stats.claimed_markers,
            stats.owned_markers,
            stats.nudged_agents,
            stats.arrived_agents,
            stats.mean_speed
        );

        self.last_stats = stats;
        stats
    }

    fn summarize(&self, reports: &[StepReport]) -> FrameStats {
        let speed_sum: f32 = reports.iter().map(|r| r.speed).sum();
        FrameStats {
            frame: self.frame,
            claimed_markers: self.agents.iter().map(|a| a.claimed_markers.len()).sum(),
            owned_markers: self.markers.claimed_count(),
            nudged_agents: reports.iter().filter(|r| r.nudged).count(),
            arrived_agents: self
                .agents
                .iter()
                .filter(|a| a.distance_to_goal() <= self.params.agent_mesh_radius)
                .count(),
            out_of_bounds: reports
                .iter()
                .filter(|r| !self.grid.contains(r.position))
                .count(),
            mean_speed: if reports.is_empty() {
                0.0
            } else {
                speed_sum / reports.len() as f32
            },
        }
    }

    // Current agent positions, in spawn order
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.agents.iter().map(|agent| agent.position)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn markers(&self) -> &MarkerField {
        &self.markers
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    // Run switches that do not reshape the run can change in place
    pub fn params_mut(&mut self) -> &mut SimulationParams {
        &mut self.params
    }

    pub fn scenario(&self) -> Option<Scenario> {
        self.scenario
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }
}
