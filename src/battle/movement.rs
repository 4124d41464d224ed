//! Grid movement for move and charge resolutions
//!
//! Steps one hex at a time, greedily improving distance to the
//! reference cell. A step must land on a free board cell and strictly
//! improve, otherwise movement stops early.

use ahash::AHashSet;

use crate::battle::catalog::MoveBehavior;
use crate::battle::hex::{HexCoord, HexGrid};

/// Walk up to `steps` hexes towards or away from `reference`.
///
/// Returns the final position, which equals `from` when no step was
/// possible. Neighbor order is fixed, so equally-good steps always
/// break the same way.
pub fn advance(
    grid: &HexGrid,
    from: HexCoord,
    reference: HexCoord,
    steps: u32,
    behavior: MoveBehavior,
    occupied: &AHashSet<HexCoord>,
) -> HexCoord {
    let mut current = from;

    for _ in 0..steps {
        let current_distance = current.distance(&reference);
        let mut next: Option<(HexCoord, u32)> = None;

        for neighbor in current.neighbors() {
            if !grid.contains(&neighbor) || occupied.contains(&neighbor) {
                continue;
            }
            let d = neighbor.distance(&reference);
            let improves = match behavior {
                MoveBehavior::Towards => d < current_distance,
                MoveBehavior::Away => d > current_distance,
            };
            if !improves {
                continue;
            }
            let better = match (behavior, &next) {
                (_, None) => true,
                (MoveBehavior::Towards, Some((_, best))) => d < *best,
                (MoveBehavior::Away, Some((_, best))) => d > *best,
            };
            if better {
                next = Some((neighbor, d));
            }
        }

        match next {
            Some((cell, _)) => current = cell,
            None => break,
        }
    }

    current
}
