/*
 * UI Module
 *
 * This module builds the control panel with nannou_egui: scenario selection,
 * run-shaping parameters, run switches and performance metrics. Parameter
 * change detection is handled by the SimulationParams struct.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::params::SimulationParams;
use crate::scenario::Scenario;

// What the app should do after this frame's UI pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiAction {
    // Re-scatter markers and re-spawn agents for the selected scenario
    pub reset: bool,
    // Parameters that shape the run changed; rebuild it from scratch
    pub rebuild: bool,
    pub ui_changed: bool,
}

pub fn update_ui(
    egui: &mut Egui,
    params: &mut SimulationParams,
    scenario: &mut Scenario,
    debug_info: &DebugInfo,
) -> UiAction {
    let mut reset = false;

    // Take a snapshot of current parameter values for change detection
    params.take_snapshot();

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Scenario", |ui| {
                let mut selected = *scenario;
                for option in Scenario::ALL {
                    ui.radio_value(&mut selected, option, option.to_string());
                }
                if selected != *scenario {
                    *scenario = selected;
                    reset = true;
                }

                if ui.button("Reset Run").clicked() {
                    reset = true;
                }
            });

            ui.collapsing("Crowd Parameters", |ui| {
                ui.add(egui::Slider::new(&mut params.num_agents, SimulationParams::get_num_agents_range()).text("Number of Agents"));
                ui.add(egui::Slider::new(&mut params.agent_radius, SimulationParams::get_agent_radius_range()).text("Agent Radius"));
                ui.add(egui::Slider::new(&mut params.circle_radius, SimulationParams::get_circle_radius_range()).text("Circle Radius"));
                ui.add(egui::Slider::new(&mut params.grid_divisions, SimulationParams::get_divisions_range()).text("Grid Divisions"));
                ui.add(egui::Slider::new(&mut params.sample_density, SimulationParams::get_density_range()).text("Marker Density"));
                ui.label(format!("Velocity cap: {:.2}", params.velocity_cap()));
                ui.label(format!("Markers: {}", params.marker_count()));
            });

            ui.collapsing("Run Switches", |ui| {
                ui.checkbox(&mut params.enable_parallel, "Parallel Agent Processing");
                ui.checkbox(&mut params.reset_claims_each_frame, "Clear Claims Every Frame");

                ui.separator();

                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Nudged agents: {}", debug_info.last_frame.nudged_agents));
                ui.label(format!("Arrived agents: {}", debug_info.last_frame.arrived_agents));
            });

            ui.checkbox(&mut params.show_markers, "Show Markers");
            ui.checkbox(&mut params.show_debug, "Show Debug Info");
            ui.checkbox(&mut params.pause_simulation, "Pause Simulation");
        });

    let (rebuild, ui_changed) = params.detect_changes();

    UiAction {
        reset,
        rebuild,
        ui_changed: ui_changed || reset,
    }
}
