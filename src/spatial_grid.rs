/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct, a uniform partition of the
 * ground plane into divisions x divisions cells. Given a query position it
 * returns the rectangle covering the enclosing cell and its neighbours,
 * which bounds the markers an agent may claim.
 *
 * The grid is stateless: it only carries the constants needed to recompute
 * cell boundaries, so queries are pure and cheap to share across threads.
 */

use std::ops::RangeInclusive;

use nannou::prelude::*;

use crate::error::ConfigError;

// Fixed-shape neighbourhood rectangle on the (x, z) ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub start_x: f32,
    pub end_x: f32,
    pub start_y: f32,
    pub end_y: f32,
}

impl CellRect {
    // Inclusive on both axes; the planar y axis of the rectangle maps to world z
    #[inline]
    pub fn contains(&self, position: Vec3) -> bool {
        position.x >= self.start_x
            && position.x <= self.end_x
            && position.z >= self.start_y
            && position.z <= self.end_y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.end_x - self.start_x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.end_y - self.start_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialGrid {
    pub divisions: usize,
    pub width: f32,
    pub height: f32,
}

impl SpatialGrid {
    pub fn new(divisions: usize, width: f32, height: f32) -> Result<Self, ConfigError> {
        if divisions == 0 {
            return Err(ConfigError::ZeroDivisions);
        }
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(ConfigError::InvalidExtent { width, height });
        }
        Ok(Self {
            divisions,
            width,
            height,
        })
    }

    #[inline]
    pub fn box_width(&self) -> f32 {
        self.width / self.divisions as f32
    }

    #[inline]
    pub fn box_height(&self) -> f32 {
        self.height / self.divisions as f32
    }

    // Column and row of the cell containing the position, clamped into the grid
    #[inline]
    pub fn cell_coords(&self, position: Vec3) -> (usize, usize) {
        let last = self.divisions as f32 - 1.0;
        let col = (position.x / self.box_width()).floor().clamp(0.0, last) as usize;
        let row = (position.z / self.box_height()).floor().clamp(0.0, last) as usize;
        (col, row)
    }

    #[inline]
    pub fn cell_index(&self, position: Vec3) -> usize {
        let (col, row) = self.cell_coords(position);
        row * self.divisions + col
    }

    // Inclusive range of cell indices along each axis touched by a rectangle,
    // padded by one cell so markers sitting on a boundary are never missed
    pub fn cells_overlapping(&self, rect: &CellRect) -> (RangeInclusive<usize>, RangeInclusive<usize>) {
        let last = self.divisions as isize - 1;
        let to_cell = |v: f32, size: f32, pad: isize| -> usize {
            ((v / size).floor() as isize + pad).clamp(0, last) as usize
        };
        let bw = self.box_width();
        let bh = self.box_height();
        (
            to_cell(rect.start_x, bw, -1)..=to_cell(rect.end_x, bw, 1),
            to_cell(rect.start_y, bh, -1)..=to_cell(rect.end_y, bh, 1),
        )
    }

    pub fn neighborhood(&self, position: Vec3) -> CellRect {
        neighborhood(position, self.divisions, self.width, self.height)
    }

    #[inline]
    pub fn contains(&self, position: Vec3) -> bool {
        position.x >= 0.0 && position.x <= self.width && position.z >= 0.0 && position.z <= self.height
    }
}

// Grid lines are multiples of the cell size; compare with a tolerance scaled to the extent
#[inline]
fn on_line(a: f32, b: f32, extent: f32) -> bool {
    (a - b).abs() <= extent * 1e-5
}

// Last cell [i, i + size] (inclusive on both ends) that contains the coordinate.
// A coordinate outside the grid yields the degenerate (0, 0) cell.
fn locate_cell(coord: f32, size: f32, divisions: usize) -> (f32, f32) {
    let mut cell = (0.0, 0.0);
    for i in 0..divisions {
        let start = i as f32 * size;
        let end = (i + 1) as f32 * size;
        if coord >= start && coord <= end {
            cell = (start, end);
        }
    }
    cell
}

// Pull a located cell one step away from the grid edges, then widen it by a
// full cell on each side
fn expand_axis(coord: f32, size: f32, divisions: usize, extent: f32) -> (f32, f32) {
    let (mut start, mut end) = locate_cell(coord, size, divisions);

    if on_line(start, 0.0, extent) {
        start += size;
    }
    if on_line(start, extent, extent) {
        start -= size;
    }
    if on_line(end, extent, extent) {
        end -= size;
    }

    (start - size, end + size)
}

// Bounding rectangle of the 3x3 cell neighbourhood around a position.
// Near the grid edges the core cell is pulled inward first, so the result
// covers fewer cells; at the corners it may still reach past the extent.
pub fn neighborhood(position: Vec3, divisions: usize, width: f32, height: f32) -> CellRect {
    let box_width = width / divisions as f32;
    let box_height = height / divisions as f32;

    let (start_x, end_x) = expand_axis(position.x, box_width, divisions, width);
    let (start_y, end_y) = expand_axis(position.z, box_height, divisions, height);

    CellRect {
        start_x,
        end_x,
        start_y,
        end_y,
    }
}
