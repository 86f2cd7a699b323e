/*
 * Steering Module
 *
 * Turns an agent's claimed markers into one planar velocity:
 * 1. Goal alignment: each marker is weighted by 1 + cos of the angle between
 *    the agent->marker and agent->goal vectors (0 opposite the goal, 2 along it)
 * 2. Aggregation: the weighted average of the agent->marker vectors, scaled
 *    by the frame's elapsed time
 * 3. Capping: the result never exceeds the agent's collision margin
 * 4. Anti-stall: a small pull toward the goal when the velocity nearly vanishes
 */

use nannou::prelude::*;

use crate::agent::Agent;
use crate::marker::MarkerField;

// Goal-alignment weight in [0, 2]. Zero when either vector is shorter than
// `epsilon`, since the angle between them is undefined.
#[inline]
pub fn goal_weight(marker_vec: Vec3, goal_vec: Vec3, epsilon: f32) -> f32 {
    let marker_len = marker_vec.length();
    let goal_len = goal_vec.length();
    if marker_len < epsilon || goal_len < epsilon {
        return 0.0;
    }
    let cos_theta = (marker_vec.dot(goal_vec) / (marker_len * goal_len)).clamp(-1.0, 1.0);
    1.0 + cos_theta
}

// Weighted average of the agent->marker vectors, before time scaling
pub fn weighted_direction(position: Vec3, goal: Vec3, marker_positions: &[Vec3], epsilon: f32) -> Vec3 {
    if marker_positions.is_empty() {
        return Vec3::ZERO;
    }

    let goal_vec = goal - position;

    // First pass: total weight
    let weight_sum: f32 = marker_positions
        .iter()
        .map(|&m| goal_weight(m - position, goal_vec, epsilon))
        .sum();

    // Every claimed marker points against the goal
    if weight_sum <= 0.0 {
        return Vec3::ZERO;
    }

    // Second pass: accumulate each marker's share
    marker_positions.iter().fold(Vec3::ZERO, |velocity, &m| {
        let marker_vec = m - position;
        let weight = goal_weight(marker_vec, goal_vec, epsilon);
        velocity + marker_vec * (weight / weight_sum)
    })
}

// Planar steering velocity of an agent for one frame, already scaled by `delta`
pub fn aggregate(agent: &Agent, field: &MarkerField, delta: f32, epsilon: f32) -> Vec3 {
    let marker_positions: Vec<Vec3> = agent
        .claimed_markers
        .iter()
        .filter_map(|&id| field.get(id))
        .map(|marker| marker.position)
        .collect();

    weighted_direction(agent.position, agent.goal, &marker_positions, epsilon) * delta
}

// Rescale to exactly `cap` if longer, keeping the direction
#[inline]
pub fn cap_velocity(velocity: Vec3, cap: f32) -> Vec3 {
    if velocity.length() > cap {
        velocity.normalize() * cap
    } else {
        velocity
    }
}

// Add `factor * (goal - position)` when the velocity is shorter than `threshold`.
// Returns the new velocity and whether the nudge was applied.
#[inline]
pub fn apply_anti_stall(
    velocity: Vec3,
    position: Vec3,
    goal: Vec3,
    threshold: f32,
    factor: f32,
) -> (Vec3, bool) {
    if velocity.length() < threshold {
        (velocity + (goal - position) * factor, true)
    } else {
        (velocity, false)
    }
}
