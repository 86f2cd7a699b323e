/*
 * Application Module
 *
 * This module defines the viewer's model and its update loop. The viewer is
 * the presentation collaborator of a SimulationRun: it supplies the elapsed
 * time each frame, reads back agent positions for drawing, and rebuilds the
 * run when a scenario is selected or a run-shaping parameter changes.
 */

use std::sync::OnceLock;

use log::{debug, error, info};
use nannou::prelude::*;
use nannou_egui::Egui;

use crate::debug::DebugInfo;
use crate::input::{key_pressed, raw_window_event};
use crate::params::SimulationParams;
use crate::renderer::view;
use crate::scenario::Scenario;
use crate::simulation::SimulationRun;
use crate::ui;

// Start-up settings handed from the command line to the nannou model function
#[derive(Debug, Clone, Default)]
pub struct ViewerOptions {
    pub params: SimulationParams,
    pub scenario: Scenario,
}

static OPTIONS: OnceLock<ViewerOptions> = OnceLock::new();

// Main model for the application
pub struct Model {
    pub run: SimulationRun,
    pub params: SimulationParams,
    pub scenario: Scenario,
    pub egui: Egui,
    pub debug_info: DebugInfo,
}

// Open the viewer window; blocks until it closes
pub fn launch(options: ViewerOptions) {
    if OPTIONS.set(options).is_err() {
        error!("viewer already launched");
        return;
    }
    nannou::app(model).update(update).run();
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let options = OPTIONS.get().cloned().unwrap_or_default();

    let window_id = app
        .new_window()
        .title("BioCrowds")
        .size(1024, 768)
        .view(view)
        .key_pressed(key_pressed)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let run = SimulationRun::new(options.params.clone(), options.scenario)
        .expect("parameters are validated before launch");

    Model {
        run,
        params: options.params,
        scenario: options.scenario,
        egui,
        debug_info: DebugInfo::default(),
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let action = ui::update_ui(
        &mut model.egui,
        &mut model.params,
        &mut model.scenario,
        &model.debug_info,
    );

    if action.ui_changed {
        debug!("controls changed: {:?}", action);
    }

    if action.rebuild {
        rebuild_run(model);
    } else if action.reset {
        let scenario = model.scenario;
        select_scenario(model, scenario);
    }

    // Switches that only affect how frames run apply in place
    let run_params = model.run.params_mut();
    run_params.enable_parallel = model.params.enable_parallel;
    run_params.reset_claims_each_frame = model.params.reset_claims_each_frame;

    if model.params.pause_simulation {
        model.debug_info.steps_this_frame = 0;
        return;
    }

    let delta = update.since_last.as_secs_f32();
    model.debug_info.last_frame = model.run.step(delta);
    model.debug_info.steps_this_frame = 1;
}

// Reset the run onto a scenario; the only transition of a run's lifecycle
pub fn select_scenario(model: &mut Model, scenario: Scenario) {
    model.scenario = scenario;
    model.run.reset(scenario);
    model.debug_info.last_frame = model.run.last_stats();
}

fn rebuild_run(model: &mut Model) {
    match model.run.rebuild(model.params.clone()) {
        Ok(()) => {
            info!("rebuilt run with {} agents", model.params.num_agents);
            if model.run.scenario() != Some(model.scenario) {
                model.run.reset(model.scenario);
            }
        }
        Err(err) => {
            error!("rejected parameter change: {err}");
            model.params = model.run.params().clone();
        }
    }
    model.debug_info.last_frame = model.run.last_stats();
}
