/*
 * Marker Module
 *
 * This module defines the scattered sample points (markers) agents compete
 * for. Markers are scattered once per run on a jittered lattice and never
 * move. Each one carries a claim slot: the smallest agent distance offered
 * for it so far. Slots only tighten; a later agent must be strictly closer
 * to take a marker over.
 *
 * The slot is an atomic compare-and-swap-by-minimum cell, so claims stay
 * correct when agents are processed in parallel.
 */

use std::sync::atomic::{AtomicU32, Ordering};

use nannou::prelude::*;
use rand::Rng;

use crate::spatial_grid::{CellRect, SpatialGrid};

// Bit pattern of the unclaimed sentinel (+inf, so any finite distance beats it)
const UNCLAIMED: u32 = 0x7f80_0000;

#[derive(Debug)]
pub struct ClaimSlot(AtomicU32);

impl ClaimSlot {
    pub fn new() -> Self {
        Self(AtomicU32::new(UNCLAIMED))
    }

    // Current claiming distance, or None while unclaimed
    #[inline]
    pub fn distance(&self) -> Option<f32> {
        let bits = self.0.load(Ordering::Acquire);
        (bits != UNCLAIMED).then(|| f32::from_bits(bits))
    }

    #[inline]
    pub fn is_claimed(&self) -> bool {
        self.0.load(Ordering::Acquire) != UNCLAIMED
    }

    // Store `distance` if it is strictly smaller than the held one.
    // Returns true when the caller now owns the marker.
    pub fn try_claim(&self, distance: f32) -> bool {
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            if !(distance < f32::from_bits(current)) {
                return false;
            }
            match self.0.compare_exchange_weak(
                current,
                distance.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    pub fn reset(&self) {
        self.0.store(UNCLAIMED, Ordering::Release);
    }
}

impl Default for ClaimSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ClaimSlot {
    fn clone(&self) -> Self {
        Self(AtomicU32::new(self.0.load(Ordering::Acquire)))
    }
}

#[derive(Debug, Clone)]
pub struct Marker {
    pub id: usize,
    pub position: Vec3,
    pub claim: ClaimSlot,
}

impl Marker {
    pub fn new(id: usize, position: Vec3) -> Self {
        Self {
            id,
            position,
            claim: ClaimSlot::new(),
        }
    }

    #[inline]
    pub fn claim_distance(&self) -> Option<f32> {
        self.claim.distance()
    }
}

// The fixed marker set of a run, bucketed by grid cell for neighbourhood scans
#[derive(Debug, Clone)]
pub struct MarkerField {
    markers: Vec<Marker>,
    grid: SpatialGrid,
    cells: Vec<Vec<usize>>,
}

impl MarkerField {
    // Scatter `count` markers on a jittered lattice covering the grid extent:
    // one marker at a uniformly random offset inside each lattice cell
    pub fn scatter<R: Rng + ?Sized>(count: usize, grid: &SpatialGrid, rng: &mut R) -> Self {
        let side = (count as f64).sqrt().ceil().max(1.0) as usize;
        let cell_w = grid.width / side as f32;
        let cell_h = grid.height / side as f32;

        let positions: Vec<Vec3> = (0..count)
            .map(|i| {
                let col = (i % side) as f32;
                let row = (i / side) as f32;
                let x = (col + rng.gen::<f32>()) * cell_w;
                let z = (row + rng.gen::<f32>()) * cell_h;
                vec3(x, 0.0, z)
            })
            .collect();

        Self::from_positions(positions, grid)
    }

    // Build a field from explicit positions; ids follow the input order
    pub fn from_positions<I>(positions: I, grid: &SpatialGrid) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let markers: Vec<Marker> = positions
            .into_iter()
            .enumerate()
            .map(|(id, position)| Marker::new(id, vec3(position.x, 0.0, position.z)))
            .collect();

        let mut cells = vec![Vec::new(); grid.divisions * grid.divisions];
        for marker in &markers {
            cells[grid.cell_index(marker.position)].push(marker.id);
        }

        Self {
            markers,
            grid: *grid,
            cells,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[inline]
    pub fn get(&self, id: usize) -> Option<&Marker> {
        self.markers.get(id)
    }

    #[inline]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    // Ids of every marker inside the rectangle (inclusive bounds), ascending
    pub fn ids_within(&self, rect: &CellRect) -> Vec<usize> {
        let (cols, rows) = self.grid.cells_overlapping(rect);
        let mut ids = Vec::new();
        for row in rows {
            let row_offset = row * self.grid.divisions;
            for col in cols.clone() {
                ids.extend(
                    self.cells[row_offset + col]
                        .iter()
                        .copied()
                        .filter(|&id| rect.contains(self.markers[id].position)),
                );
            }
        }
        ids.sort_unstable();
        ids
    }

    pub fn claimed_count(&self) -> usize {
        self.markers.iter().filter(|m| m.claim.is_claimed()).count()
    }

    // Return every marker to the unclaimed state
    pub fn reset_claims(&self) {
        for marker in &self.markers {
            marker.claim.reset();
        }
    }
}
