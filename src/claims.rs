/*
 * Claim Resolver Module
 *
 * For one agent, walks the markers inside its neighbourhood rectangle and
 * claims every marker for which it offers a strictly smaller distance than
 * the marker currently holds.
 *
 * Claims are never retracted: when a later agent steals a marker, the agent
 * that recorded it earlier in the same frame keeps it in its own list. A
 * marker can therefore sit in several claimed lists at once.
 */

use log::trace;
use nannou::prelude::*;

use crate::agent::Agent;
use crate::marker::MarkerField;
use crate::spatial_grid::CellRect;

// Ids of the markers the agent ends this step owning, in ascending order
pub fn resolve(agent: &Agent, rect: &CellRect, field: &MarkerField) -> Vec<usize> {
    resolve_at(agent.position, rect, field)
}

pub fn resolve_at(position: Vec3, rect: &CellRect, field: &MarkerField) -> Vec<usize> {
    let claimed: Vec<usize> = field
        .ids_within(rect)
        .into_iter()
        .filter(|&id| {
            let marker = &field.markers()[id];
            marker.claim.try_claim(marker.position.distance(position))
        })
        .collect();

    trace!(
        "claimed {} markers around ({:.2}, {:.2})",
        claimed.len(),
        position.x,
        position.z
    );
    claimed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial_grid::SpatialGrid;
    use approx::assert_relative_eq;

    fn grid() -> SpatialGrid {
        SpatialGrid::new(10, 20.0, 20.0).unwrap()
    }

    #[test]
    fn unclaimed_markers_go_to_the_first_agent() {
        let grid = grid();
        let field = MarkerField::from_positions(
            [vec3(5.0, 0.0, 5.0), vec3(6.0, 0.0, 5.0), vec3(15.0, 0.0, 15.0)],
            &grid,
        );
        let position = vec3(5.0, 0.0, 4.0);
        let claimed = resolve_at(position, &grid.neighborhood(position), &field);

        assert_eq!(claimed, vec![0, 1]);
        assert_relative_eq!(field.markers()[0].claim_distance().unwrap(), 1.0);
        assert_relative_eq!(field.markers()[1].claim_distance().unwrap(), 2.0_f32.sqrt());
        assert!(field.markers()[2].claim_distance().is_none());
    }

    #[test]
    fn equal_distance_does_not_steal() {
        let grid = grid();
        let field = MarkerField::from_positions([vec3(5.0, 0.0, 5.0)], &grid);
        let first = vec3(4.0, 0.0, 5.0);
        let second = vec3(6.0, 0.0, 5.0);

        assert_eq!(resolve_at(first, &grid.neighborhood(first), &field), vec![0]);
        assert!(resolve_at(second, &grid.neighborhood(second), &field).is_empty());
        assert_relative_eq!(field.markers()[0].claim_distance().unwrap(), 1.0);
    }

    #[test]
    fn markers_outside_the_rectangle_are_ignored() {
        let grid = grid();
        let field = MarkerField::from_positions([vec3(12.0, 0.0, 5.0)], &grid);
        let position = vec3(5.0, 0.0, 5.0);
        assert!(resolve_at(position, &grid.neighborhood(position), &field).is_empty());
        assert!(field.markers()[0].claim_distance().is_none());
    }
}
