//! Enclosed-territory detection.
//!
//! The grid is padded by one empty ring so the padded corner `(0, 0)` is
//! always outside. A flood fill over 8-connected cells starting from that
//! corner clears every cell reachable without crossing one of the owner's
//! walls; whatever stays flagged is enclosed. The fill runs on an explicit
//! stack so its depth does not grow with the grid area.
//!
//! Foreign tiles nested inside an enclosure are not treated specially.

use crate::board::{Coord, GameState};

/// 8-connected neighbour offsets.
const NEIGHBOURS: [(isize, isize); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Returns a row-major `width * height` mask where `true` marks a cell that
/// cannot be reached from outside the board without crossing a wall owned
/// by `owner`. The owner's walls themselves are always marked.
pub fn enclosure_mask(state: &GameState, owner: usize) -> Vec<bool> {
    let (w, h) = (state.width(), state.height());
    let pw = w + 2;
    let ph = h + 2;

    let blocked = |px: usize, py: usize| -> bool {
        if px == 0 || py == 0 || px > w || py > h {
            return false;
        }
        state
            .tile_at(Coord::new(px - 1, py - 1))
            .is_wall_of(owner)
    };

    let mut enclosed = vec![true; pw * ph];
    let mut stack: Vec<(usize, usize)> = Vec::with_capacity(pw + ph);
    enclosed[0] = false;
    stack.push((0, 0));

    while let Some((x, y)) = stack.pop() {
        for (dx, dy) in NEIGHBOURS {
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                continue;
            };
            if nx >= pw || ny >= ph {
                continue;
            }
            let i = ny * pw + nx;
            if !enclosed[i] || blocked(nx, ny) {
                continue;
            }
            enclosed[i] = false;
            stack.push((nx, ny));
        }
    }

    let mut mask = Vec::with_capacity(w * h);
    for y in 1..=h {
        mask.extend_from_slice(&enclosed[y * pw + 1..y * pw + 1 + w]);
    }
    mask
}

/// Sums the point values of cells that are both enclosed and owned by
/// `owner`.
pub fn enclosed_points(state: &GameState, owner: usize) -> i64 {
    let mask = enclosure_mask(state, owner);
    mask.iter()
        .zip(state.points())
        .zip(state.tiles())
        .filter(|((&enclosed, _), tile)| enclosed && tile.owner == Some(owner))
        .map(|((_, &p), _)| i64::from(p))
        .sum()
}
