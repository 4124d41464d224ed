//! Hex coordinate system for the battle board (axial coordinates)
//!
//! Flat-top hexes addressed by axial (q, r). The board is a bounded
//! hexagon of fixed radius, enumerated in a deterministic spiral.

use serde::{Deserialize, Serialize};

use crate::battle::constants::BOARD_RADIUS;

/// Axial hex coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r)
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Manhattan distance in hex space
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// All 6 neighboring hex coordinates, unfiltered by board bounds
    pub fn neighbors(&self) -> [HexCoord; 6] {
        [
            HexCoord::new(self.q + 1, self.r),
            HexCoord::new(self.q + 1, self.r - 1),
            HexCoord::new(self.q, self.r - 1),
            HexCoord::new(self.q - 1, self.r),
            HexCoord::new(self.q - 1, self.r + 1),
            HexCoord::new(self.q, self.r + 1),
        ]
    }

    /// Pixel center of this hex (flat-top layout)
    pub fn to_pixel(&self, size: f32) -> (f32, f32) {
        let sqrt3 = 3.0_f32.sqrt();
        let x = size * 1.5 * self.q as f32;
        let y = size * (sqrt3 / 2.0 * self.q as f32 + sqrt3 * self.r as f32);
        (x, y)
    }

    /// Hex containing the given pixel point (flat-top layout)
    pub fn from_pixel(x: f32, y: f32, size: f32) -> Self {
        let sqrt3 = 3.0_f32.sqrt();
        let q = (2.0 / 3.0 * x) / size;
        let r = (-1.0 / 3.0 * x + sqrt3 / 3.0 * y) / size;
        Self::round(q, r)
    }

    /// Round floating point hex to nearest integer hex
    fn round(q: f32, r: f32) -> Self {
        let s = -q - r;
        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();

        let q_diff = (rq - q).abs();
        let r_diff = (rr - r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }

        Self::new(rq as i32, rr as i32)
    }
}

/// The bounded hexagonal board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexGrid {
    pub radius: i32,
}

impl HexGrid {
    pub fn new(radius: i32) -> Self {
        Self { radius }
    }

    /// The fixed-size board every battle runs on
    pub fn standard() -> Self {
        Self::new(BOARD_RADIUS)
    }

    /// Is the coordinate inside the bounded hexagon?
    pub fn contains(&self, coord: &HexCoord) -> bool {
        coord.q.abs() <= self.radius
            && coord.r.abs() <= self.radius
            && (coord.q + coord.r).abs() <= self.radius
    }

    /// Neighbors of a cell that lie on the board (fewer than 6 at the edge)
    pub fn neighbors(&self, coord: &HexCoord) -> Vec<HexCoord> {
        coord
            .neighbors()
            .into_iter()
            .filter(|n| self.contains(n))
            .collect()
    }

    /// Every board cell in a fixed spiral order: center first, then each
    /// ring walked in the same direction. New characters are placed at the
    /// first free cell in this order, so it must never change.
    pub fn cells(&self) -> Vec<HexCoord> {
        let mut cells = Vec::with_capacity(self.cell_count());
        cells.push(HexCoord::new(0, 0));
        for ring in 1..=self.radius {
            let mut hex = HexCoord::new(-ring, ring);
            for direction in HexCoord::new(0, 0).neighbors() {
                for _ in 0..ring {
                    cells.push(hex);
                    hex = HexCoord::new(hex.q + direction.q, hex.r + direction.r);
                }
            }
        }
        cells
    }

    /// Number of cells on the board
    pub fn cell_count(&self) -> usize {
        let r = self.radius as usize;
        3 * r * r + 3 * r + 1
    }
}
