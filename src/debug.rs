/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * and the latest frame summary, displayed in the UI.
 *
 * Includes metrics for:
 * - FPS (frames per second)
 * - Frame time
 * - Simulation steps taken this frame
 * - Claim, stall and arrival counts from the last simulation step
 */

use std::time::Duration;

use crate::simulation::FrameStats;

// Debug information to display
#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub steps_this_frame: usize,
    pub last_frame: FrameStats,
}

impl DebugInfo {
    // Lines shown in the debug overlay, top to bottom
    pub fn lines(&self, agent_count: usize, marker_count: usize) -> Vec<String> {
        vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Frame: {}", self.last_frame.frame),
            format!("Agents: {} ({} arrived)", agent_count, self.last_frame.arrived_agents),
            format!(
                "Markers: {} ({} owned)",
                marker_count, self.last_frame.owned_markers
            ),
            format!("Claims this frame: {}", self.last_frame.claimed_markers),
            format!("Nudged agents: {}", self.last_frame.nudged_agents),
            format!("Mean speed: {:.4}", self.last_frame.mean_speed),
            format!("Steps this frame: {}", self.steps_this_frame),
        ]
    }
}
