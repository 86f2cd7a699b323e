/*
 * Renderer Module
 *
 * This module draws the simulation from a top-down view: the ground grid,
 * the marker field (claimed markers brighter), agents coloured by team with
 * their goals and velocities, and an optional debug overlay.
 *
 * World x maps to screen x and world z to screen y; the vertical axis is
 * never drawn.
 */

use nannou::prelude::*;

use crate::agent::Team;
use crate::app::Model;
use crate::spatial_grid::SpatialGrid;

// Fits the grid extent into the window, centred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldView {
    pub scale: f32,
    pub half_width: f32,
    pub half_height: f32,
}

impl WorldView {
    pub fn fit(grid: &SpatialGrid, window_rect: Rect) -> Self {
        let scale = 0.9 * window_rect.w().min(window_rect.h()) / grid.width.max(grid.height);
        Self {
            scale,
            half_width: grid.width / 2.0,
            half_height: grid.height / 2.0,
        }
    }

    #[inline]
    pub fn to_screen(&self, position: Vec3) -> Vec2 {
        vec2(
            (position.x - self.half_width) * self.scale,
            (position.z - self.half_height) * self.scale,
        )
    }
}

fn team_color(team: Team) -> Rgb<u8> {
    match team {
        Team::Blue => rgb(40, 90, 255),
        Team::Red => rgb(255, 50, 50),
    }
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();
    let grid = model.run.grid();
    let world = WorldView::fit(grid, window_rect);

    draw_grid(&draw, grid, &world);

    if model.params.show_markers {
        for marker in model.run.markers().iter() {
            let color = if marker.claim.is_claimed() {
                rgba(0.0, 1.0, 0.0, 0.9)
            } else {
                rgba(0.0, 0.45, 0.0, 0.5)
            };
            draw.rect()
                .xy(world.to_screen(marker.position))
                .w_h(2.0, 2.0)
                .color(color);
        }
    }

    let agent_size = model.run.params().agent_mesh_radius * world.scale;
    for agent in model.run.agents() {
        let position = world.to_screen(agent.position);
        let color = team_color(agent.team);

        // Goal ring
        draw.ellipse()
            .xy(world.to_screen(agent.goal))
            .radius(agent_size * 0.6)
            .no_fill()
            .stroke(color)
            .stroke_weight(1.0);

        draw.ellipse().xy(position).radius(agent_size).color(color);

        if agent.velocity.length_squared() > 0.0 {
            let heading = vec2(agent.velocity.x, agent.velocity.z).normalize() * agent_size * 2.0;
            draw.arrow()
                .start(position)
                .end(position + heading)
                .color(YELLOW)
                .stroke_weight(1.5);
        }
    }

    if model.params.show_debug {
        draw_debug_info(&draw, model, window_rect);
    }

    draw.to_frame(app, &frame).unwrap();

    // Draw the egui UI
    model.egui.draw_to_frame(&frame).unwrap();
}

fn draw_grid(draw: &Draw, grid: &SpatialGrid, world: &WorldView) {
    let line_color = rgba(0.94, 0.06, 1.0, 0.45);
    for i in 0..=grid.divisions {
        let x = i as f32 * grid.box_width();
        let z = i as f32 * grid.box_height();
        draw.line()
            .start(world.to_screen(vec3(x, 0.0, 0.0)))
            .end(world.to_screen(vec3(x, 0.0, grid.height)))
            .color(line_color)
            .stroke_weight(1.0);
        draw.line()
            .start(world.to_screen(vec3(0.0, 0.0, z)))
            .end(world.to_screen(vec3(grid.width, 0.0, z)))
            .color(line_color)
            .stroke_weight(1.0);
    }
}

// Debug overlay in the top-right corner
fn draw_debug_info(draw: &Draw, model: &Model, window_rect: Rect) {
    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 240.0;

    let lines = model
        .debug_info
        .lines(model.run.agents().len(), model.run.markers().len());
    let panel_height = line_height * lines.len() as f32 + margin;

    draw.rect()
        .x_y(window_rect.right() - panel_width / 2.0, window_rect.top() - panel_height / 2.0)
        .w_h(panel_width, panel_height)
        .color(rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.right() - panel_width / 2.0;
    let text_y = window_rect.top() - margin;
    for (i, text) in lines.iter().enumerate() {
        draw.text(text)
            .x_y(text_x, text_y - i as f32 * line_height)
            .color(WHITE)
            .font_size(14);
    }
}
