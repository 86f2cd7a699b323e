/*
 * Scenario Module
 *
 * The three spawn layouts a run can start from:
 * 1. Opposing lines: one row of agents crossing the grid along z
 * 2. Alternating lines: even agents cross one way, odd agents the other
 * 3. Circle: agents on a ring converging on the grid centre
 */

use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

use nannou::prelude::*;

use crate::agent::{Agent, Team};
use crate::error::ConfigError;
use crate::params::SimulationParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scenario {
    #[default]
    OpposingLines,
    AlternatingLines,
    Circle,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::OpposingLines,
        Scenario::AlternatingLines,
        Scenario::Circle,
    ];

    // 1-based index as used by the scenario selector
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            1 => Some(Scenario::OpposingLines),
            2 => Some(Scenario::AlternatingLines),
            3 => Some(Scenario::Circle),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Scenario::OpposingLines => 1,
            Scenario::AlternatingLines => 2,
            Scenario::Circle => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scenario::OpposingLines => "opposing-lines",
            Scenario::AlternatingLines => "alternating-lines",
            Scenario::Circle => "circle",
        }
    }

    pub fn spawn(self, params: &SimulationParams) -> Vec<Agent> {
        match self {
            Scenario::OpposingLines => opposing_lines(params),
            Scenario::AlternatingLines => alternating_lines(params),
            Scenario::Circle => circle(params),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Simulation {} ({})", self.index(), self.name())
    }
}

impl FromStr for Scenario {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<usize>() {
            return Scenario::from_index(index)
                .ok_or_else(|| ConfigError::UnknownScenario(trimmed.to_string()));
        }
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ConfigError::UnknownScenario(trimmed.to_string()))
    }
}

// Agent i starts at (i, 0) and heads straight across to the far edge
fn opposing_lines(params: &SimulationParams) -> Vec<Agent> {
    (0..params.num_agents)
        .map(|i| {
            let x = i as f32;
            Agent::new(
                vec3(x, 0.0, 0.0),
                vec3(x, 0.0, params.grid_height),
                params.agent_radius,
            )
        })
        .collect()
}

// Even agents (blue) cross from the near edge, odd agents (red) from the far edge
fn alternating_lines(params: &SimulationParams) -> Vec<Agent> {
    (0..params.num_agents)
        .map(|i| {
            if i % 2 == 0 {
                let x = i as f32 + 1.0;
                Agent::new(
                    vec3(x, 0.0, 0.0),
                    vec3(x, 0.0, params.grid_height),
                    params.agent_radius,
                )
                .with_team(Team::Blue)
            } else {
                let x = i as f32;
                Agent::new(
                    vec3(x, 0.0, params.grid_height),
                    vec3(x, 0.0, 0.0),
                    params.agent_radius,
                )
                .with_team(Team::Red)
            }
        })
        .collect()
}

// Evenly spaced on a ring around the grid centre, all heading for the centre.
// A fixed quarter-turn step would stack every agent on four points.
fn circle(params: &SimulationParams) -> Vec<Agent> {
    let center = vec3(params.grid_width / 2.0, 0.0, params.grid_height / 2.0);
    let count = params.num_agents.max(1) as f32;
    (0..params.num_agents)
        .map(|i| {
            let angle = TAU * i as f32 / count;
            let start = center + vec3(angle.cos(), 0.0, angle.sin()) * params.circle_radius;
            Agent::new(start, center, params.agent_radius)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case("1", Scenario::OpposingLines)]
    #[case("2", Scenario::AlternatingLines)]
    #[case(" 3 ", Scenario::Circle)]
    #[case("circle", Scenario::Circle)]
    #[case("Alternating-Lines", Scenario::AlternatingLines)]
    fn parses_indices_and_names(#[case] input: &str, #[case] expected: Scenario) {
        assert_eq!(input.parse::<Scenario>(), Ok(expected));
    }

    #[rstest]
    #[case("0")]
    #[case("4")]
    #[case("spiral")]
    fn rejects_unknown_scenarios(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Scenario>(),
            Err(ConfigError::UnknownScenario(_))
        ));
    }

    #[test]
    fn index_round_trips_for_every_scenario() {
        for scenario in Scenario::ALL {
            assert_eq!(Scenario::from_index(scenario.index()), Some(scenario));
        }
    }

    #[test]
    fn circle_agents_sit_on_the_ring() {
        let params = SimulationParams::default();
        let center = vec3(10.0, 0.0, 10.0);
        for agent in Scenario::Circle.spawn(&params) {
            assert_relative_eq!(agent.position.distance(center), 8.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn circle_agents_never_share_a_start() {
        let agents = Scenario::Circle.spawn(&SimulationParams::default());
        for (i, a) in agents.iter().enumerate() {
            for b in &agents[i + 1..] {
                assert!(a.position.distance(b.position) > 1.0);
            }
        }
    }

    #[test]
    fn spawn_honours_the_agent_count() {
        let mut params = SimulationParams::default();
        params.num_agents = 7;
        for scenario in Scenario::ALL {
            assert_eq!(scenario.spawn(&params).len(), 7);
        }
    }
}
