//! End-to-end checks of the marker-claiming crowd model: claim contention
//! across agents, velocity limits, and the spawn layouts of each scenario.

use approx::assert_relative_eq;
use biocrowds::steering;
use biocrowds::{neighborhood, Agent, MarkerField, Scenario, SimulationParams, SimulationRun, Team};
use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::rstest;

fn seeded_run(params: SimulationParams, scenario: Scenario) -> SimulationRun {
    SimulationRun::with_rng(params, scenario, StdRng::seed_from_u64(2024)).expect("valid params")
}

// Expected claim of every marker after the first frame of a fresh run:
// the smallest distance among the agents whose neighbourhood contained it
fn expected_first_frame_claims(run: &SimulationRun) -> Vec<Option<f32>> {
    let grid = run.grid();
    let rects: Vec<_> = run
        .agents()
        .iter()
        .map(|a| (a.position, grid.neighborhood(a.position)))
        .collect();

    run.markers()
        .iter()
        .map(|marker| {
            rects
                .iter()
                .filter(|(_, rect)| rect.contains(marker.position))
                .map(|(position, _)| marker.position.distance(*position))
                .fold(None, |best: Option<f32>, d| {
                    Some(best.map_or(d, |b| b.min(d)))
                })
        })
        .collect()
}

#[rstest]
#[case::sequential(false)]
#[case::parallel(true)]
fn claims_settle_on_the_closest_contesting_agent(#[case] parallel: bool) {
    let mut params = SimulationParams::default();
    params.enable_parallel = parallel;
    let mut run = seeded_run(params, Scenario::AlternatingLines);

    let expected = expected_first_frame_claims(&run);
    run.step(0.016);

    for (marker, expected) in run.markers().iter().zip(expected) {
        match (marker.claim_distance(), expected) {
            (None, None) => {}
            (Some(actual), Some(expected)) => assert_relative_eq!(actual, expected),
            (actual, expected) => panic!(
                "marker {} claim {:?}, expected {:?}",
                marker.id, actual, expected
            ),
        }
    }
}

#[test]
fn claim_distances_never_grow_across_frames() {
    let mut run = seeded_run(SimulationParams::default(), Scenario::Circle);
    run.step(0.016);

    for _ in 0..10 {
        let before: Vec<Option<f32>> = run.markers().iter().map(|m| m.claim_distance()).collect();
        run.step(0.016);
        for (marker, previous) in run.markers().iter().zip(before) {
            if let Some(previous) = previous {
                let current = marker.claim_distance().expect("claims persist between frames");
                assert!(current <= previous, "marker {} loosened its claim", marker.id);
            }
        }
    }
}

// A stolen marker stays in the earlier agent's list: claims are never retracted
#[test]
fn stolen_marker_appears_in_both_claim_lists() {
    let params = SimulationParams::default();
    let agents = vec![
        Agent::new(vec3(5.0, 0.0, 5.0), vec3(5.0, 0.0, 20.0), 3.0),
        Agent::new(vec3(5.5, 0.0, 5.0), vec3(5.5, 0.0, 20.0), 3.0),
    ];
    let run = SimulationRun::with_agents(params, agents, StdRng::seed_from_u64(1)).unwrap();
    let markers = MarkerField::from_positions(
        [
            vec3(6.0, 0.0, 5.0), // closer to the second agent
            vec3(4.0, 0.0, 5.0), // closer to the first agent
        ],
        run.grid(),
    );
    let mut run = run.with_markers(markers);

    run.step(0.016);

    let first = &run.agents()[0].claimed_markers;
    let second = &run.agents()[1].claimed_markers;
    assert!(first.contains(&0) && second.contains(&0));
    assert!(first.contains(&1) && !second.contains(&1));
    assert_relative_eq!(run.markers().markers()[0].claim_distance().unwrap(), 0.5);
    assert_relative_eq!(run.markers().markers()[1].claim_distance().unwrap(), 1.0);
}

#[test]
fn agent_without_claims_has_zero_raw_velocity() {
    let run = seeded_run(SimulationParams::default(), Scenario::OpposingLines);
    let agent = Agent::new(vec3(3.0, 0.0, 3.0), vec3(3.0, 0.0, 20.0), 3.0);
    let v = steering::aggregate(&agent, run.markers(), 0.016, 1e-4);
    assert_eq!(v, Vec3::ZERO);
}

#[rstest]
#[case(Scenario::OpposingLines)]
#[case(Scenario::AlternatingLines)]
#[case(Scenario::Circle)]
fn speed_never_exceeds_the_collision_margin(#[case] scenario: Scenario) {
    let mut run = seeded_run(SimulationParams::default(), scenario);
    let cap = run.params().velocity_cap();

    // Huge frame times force the cap on every agent
    for _ in 0..20 {
        run.step(5.0);
        for agent in run.agents() {
            assert!(
                agent.velocity.length() <= cap + 1e-4,
                "speed {} over cap {}",
                agent.velocity.length(),
                cap
            );
            assert_eq!(agent.position.y, 0.0);
            assert_eq!(agent.velocity.y, 0.0);
        }
    }
}

#[test]
fn single_agent_at_the_origin_heads_for_its_goal() {
    let params = SimulationParams::default();
    let agent = Agent::new(Vec3::ZERO, vec3(0.0, 0.0, 20.0), params.agent_radius);
    let mut run = SimulationRun::with_agents(params, vec![agent], StdRng::seed_from_u64(99)).unwrap();

    let rect = neighborhood(Vec3::ZERO, 10, 20.0, 20.0);
    assert_relative_eq!(rect.start_x, 0.0);
    assert_relative_eq!(rect.end_x, 4.0);
    assert_relative_eq!(rect.start_y, 0.0);
    assert_relative_eq!(rect.end_y, 4.0);

    let stats = run.step(0.016);
    let agent = &run.agents()[0];

    assert!(!agent.claimed_markers.is_empty());
    assert_eq!(stats.claimed_markers, agent.claimed_markers.len());
    assert!(agent
        .claimed_markers
        .iter()
        .all(|&id| rect.contains(run.markers().markers()[id].position)));
    assert!(agent.velocity.z >= 0.0);
    assert!(agent.velocity.length() <= 2.75);
    assert_eq!(agent.position, agent.velocity);
}

#[test]
fn agents_progress_toward_their_goals_over_time() {
    let mut run = seeded_run(SimulationParams::default(), Scenario::OpposingLines);
    let start: Vec<f32> = run.agents().iter().map(|a| a.distance_to_goal()).collect();

    for _ in 0..120 {
        run.step(1.0 / 60.0);
    }

    let before_total: f32 = start.iter().sum();
    let after_total: f32 = run.agents().iter().map(|a| a.distance_to_goal()).sum();
    let closer = run
        .agents()
        .iter()
        .zip(&start)
        .filter(|(agent, before)| agent.distance_to_goal() < **before)
        .count();
    assert!(after_total < before_total);
    assert!(closer * 4 >= run.agents().len() * 3, "only {closer} agents got closer");
}

#[test]
fn opposing_lines_layout() {
    let params = SimulationParams::default();
    let agents = Scenario::OpposingLines.spawn(&params);

    assert_eq!(agents.len(), 20);
    for (i, agent) in agents.iter().enumerate() {
        assert_eq!(agent.radius, 3.0);
        assert_eq!(agent.position, vec3(i as f32, 0.0, 0.0));
        assert_eq!(agent.orientation, agent.goal - agent.position);
        assert_eq!(agent.velocity, Vec3::ZERO);
    }
}

#[test]
fn alternating_lines_layout() {
    let params = SimulationParams::default();
    let agents = Scenario::AlternatingLines.spawn(&params);

    assert_eq!(agents.len(), 20);
    for (i, agent) in agents.iter().enumerate() {
        assert_eq!(agent.radius, 3.0);
        assert_eq!(agent.orientation, agent.goal - agent.position);
        if i % 2 == 0 {
            assert_eq!(agent.team, Team::Blue);
            assert_eq!(agent.position.z, 0.0);
            assert_eq!(agent.goal.z, 20.0);
            assert_eq!(agent.position.x, i as f32 + 1.0);
        } else {
            assert_eq!(agent.team, Team::Red);
            assert_eq!(agent.position.z, 20.0);
            assert_eq!(agent.goal.z, 0.0);
            assert_eq!(agent.position.x, i as f32);
        }
    }
}

#[test]
fn circle_layout_converges_on_the_centre() {
    let params = SimulationParams::default();
    let agents = Scenario::Circle.spawn(&params);

    assert_eq!(agents.len(), 20);
    for agent in &agents {
        assert_eq!(agent.goal, vec3(10.0, 0.0, 10.0));
        assert_eq!(agent.radius, 3.0);
        assert_eq!(agent.orientation, agent.goal - agent.position);
    }
}

#[test]
fn same_seed_gives_the_same_run() {
    let mut a = seeded_run(SimulationParams::default(), Scenario::Circle);
    let mut b = seeded_run(SimulationParams::default(), Scenario::Circle);
    for _ in 0..5 {
        a.step(0.016);
        b.step(0.016);
    }
    let pa: Vec<Vec3> = a.positions().collect();
    let pb: Vec<Vec3> = b.positions().collect();
    assert_eq!(pa, pb);
}
