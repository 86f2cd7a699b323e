/*
 * Input Module
 *
 * This module handles keyboard and raw window events for the viewer.
 *
 * Keys:
 * - 1 / 2 / 3: select a scenario (resets the run)
 * - R: reset the current scenario
 * - Space: pause or resume
 * - M: toggle marker drawing
 * - D: toggle the debug overlay
 */

use nannou::prelude::*;

use crate::app::{select_scenario, Model};
use crate::scenario::Scenario;

// Map a number key to the scenario it selects
pub fn scenario_for_key(key: Key) -> Option<Scenario> {
    match key {
        Key::Key1 | Key::Numpad1 => Scenario::from_index(1),
        Key::Key2 | Key::Numpad2 => Scenario::from_index(2),
        Key::Key3 | Key::Numpad3 => Scenario::from_index(3),
        _ => None,
    }
}

// Key pressed event handler
pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    // Typing into a UI field should not drive the simulation
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }

    if let Some(scenario) = scenario_for_key(key) {
        select_scenario(model, scenario);
        return;
    }

    match key {
        Key::R => {
            let scenario = model.scenario;
            select_scenario(model, scenario);
        }
        Key::Space => model.params.pause_simulation = !model.params.pause_simulation,
        Key::M => model.params.show_markers = !model.params.show_markers,
        Key::D => model.params.show_debug = !model.params.show_debug,
        _ => {}
    }
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
