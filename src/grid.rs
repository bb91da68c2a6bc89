// Local predicates on the 3D lattice

use std::collections::HashSet;

use crate::types::Cell;

/// True iff every coordinate lies in `[0, bound)`
#[inline]
pub fn in_bounds(cell: Cell, bounds: Cell) -> bool {
    cell.x >= 0
        && cell.x < bounds.x
        && cell.y >= 0
        && cell.y < bounds.y
        && cell.z >= 0
        && cell.z < bounds.z
}

/// True iff `cell` is inside the map and neither an obstacle nor part of `own_body`
#[inline]
pub fn is_free(cell: Cell, bounds: Cell, obstacles: &HashSet<Cell>, own_body: &HashSet<Cell>) -> bool {
    in_bounds(cell, bounds) && !obstacles.contains(&cell) && !own_body.contains(&cell)
}

/// Counts the orthogonal neighbours of `cell` that lie inside the map and are open.
///
/// `exempt` (the mover's current head) counts as open even though it sits in
/// the obstacle set, since it is vacated by the move.
pub fn open_neighbors(cell: Cell, bounds: Cell, obstacles: &HashSet<Cell>, exempt: Cell) -> usize {
    cell.neighbors()
        .iter()
        .filter(|n| in_bounds(**n, bounds))
        .filter(|n| **n == exempt || !obstacles.contains(n))
        .count()
}

/// A cell is a dead end when it has fewer than `min_exits` open neighbours
pub fn is_dead_end(
    cell: Cell,
    bounds: Cell,
    obstacles: &HashSet<Cell>,
    exempt: Cell,
    min_exits: usize,
) -> bool {
    open_neighbors(cell, bounds, obstacles, exempt) < min_exits
}
