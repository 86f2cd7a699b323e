/*
 * Agent Module
 *
 * This module defines the Agent struct and its per-frame step:
 * 1. Clear the claimed-marker list
 * 2. Query the grid for the neighbourhood rectangle
 * 3. Claim markers inside it
 * 4. Aggregate the claimed markers into a velocity
 * 5. Cap the velocity at the collision margin
 * 6. Nudge stalled agents toward their goal
 * 7. Integrate the position
 *
 * Motion is planar: the vertical component of every vector stays zero.
 */

use log::trace;
use nannou::prelude::*;

use crate::claims;
use crate::marker::MarkerField;
use crate::params::SimulationParams;
use crate::spatial_grid::SpatialGrid;
use crate::steering;

// Which side of a two-group scenario an agent belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Team {
    #[default]
    Blue,
    Red,
}

#[derive(Debug, Clone)]
pub struct Agent {
    pub position: Vec3,
    pub velocity: Vec3,
    pub goal: Vec3,
    pub orientation: Vec3,
    pub radius: f32,
    pub team: Team,
    // Rebuilt every frame
    pub claimed_markers: Vec<usize>,
}

// What one step did to an agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub position: Vec3,
    pub speed: f32,
    pub nudged: bool,
}

impl Agent {
    pub fn new(position: Vec3, goal: Vec3, radius: f32) -> Self {
        let position = flatten(position);
        let goal = flatten(goal);
        Self {
            position,
            velocity: Vec3::ZERO,
            goal,
            orientation: goal - position,
            radius,
            team: Team::default(),
            claimed_markers: Vec::new(),
        }
    }

    pub fn with_team(mut self, team: Team) -> Self {
        self.team = team;
        self
    }

    #[inline]
    pub fn distance_to_goal(&self) -> f32 {
        self.position.distance(self.goal)
    }

    // Run one frame for this agent and return its new position.
    // Claims go through the shared field, so this only needs `&MarkerField`.
    pub fn step(
        &mut self,
        grid: &SpatialGrid,
        field: &MarkerField,
        params: &SimulationParams,
        delta: f32,
    ) -> StepReport {
        self.claimed_markers.clear();

        let rect = grid.neighborhood(self.position);
        self.claimed_markers = claims::resolve(self, &rect, field);

        let raw = steering::aggregate(self, field, delta, params.epsilon);
        let cap = self.radius - params.agent_mesh_radius;
        let capped = steering::cap_velocity(raw, cap);
        let (velocity, nudged) = steering::apply_anti_stall(
            capped,
            self.position,
            self.goal,
            params.stall_threshold,
            params.stall_factor,
        );

        self.velocity = flatten(velocity);
        self.position += self.velocity;

        trace!(
            "agent at ({:.3}, {:.3}) claimed {} markers, speed {:.4}{}",
            self.position.x,
            self.position.z,
            self.claimed_markers.len(),
            self.velocity.length(),
            if nudged { " (nudged)" } else { "" }
        );

        StepReport {
            position: self.position,
            speed: self.velocity.length(),
            nudged,
        }
    }
}

// Drop the vertical component
#[inline]
fn flatten(v: Vec3) -> Vec3 {
    vec3(v.x, 0.0, v.z)
}
