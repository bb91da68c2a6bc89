// Bounded A* on the 6-connected lattice
//
// Unit step cost and a Manhattan heuristic, so the first time the goal is
// popped its path is shortest. Equal priorities pop in insertion order, which
// keeps the search fully deterministic.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::grid;
use crate::profile;
use crate::simple_profiler::Category;
use crate::types::Cell;

/// Inputs of one search
pub struct SearchRequest<'a> {
    pub start: Cell,
    pub goal: Cell,
    pub obstacles: &'a HashSet<Cell>,
    pub own_body: &'a HashSet<Cell>,
    pub bounds: Cell,
}

/// Shortest path from `start` to `goal` inclusive, or an empty vector.
///
/// Paths of `max_cost` steps or more are never produced: nodes whose
/// cost-so-far reaches the ceiling are not expanded.
pub fn find_path(request: &SearchRequest<'_>, max_cost: u32) -> Vec<Cell> {
    profile!(Category::Pathfind, { search(request, max_cost) })
}

fn search(request: &SearchRequest<'_>, max_cost: u32) -> Vec<Cell> {
    let SearchRequest {
        start,
        goal,
        obstacles,
        own_body,
        bounds,
    } = *request;

    if start == goal {
        return vec![start];
    }

    let heuristic = |cell: Cell| cell.manhattan(&goal) as u32;

    // (f, insertion sequence, g, cell); Reverse turns the max-heap into a min-heap
    let mut open: BinaryHeap<Reverse<(u32, u64, u32, Cell)>> = BinaryHeap::new();
    let mut g_score: HashMap<Cell, u32> = HashMap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut closed: HashSet<Cell> = HashSet::new();
    let mut seq: u64 = 0;

    g_score.insert(start, 0);
    open.push(Reverse((heuristic(start), seq, 0, start)));

    while let Some(Reverse((_, _, g, current))) = open.pop() {
        if !closed.insert(current) {
            continue;
        }

        if current == goal {
            return reconstruct(&came_from, start, goal);
        }

        if g >= max_cost {
            continue;
        }

        let tentative = g + 1;
        if tentative >= max_cost {
            continue;
        }

        for neighbor in current.neighbors() {
            if !grid::is_free(neighbor, bounds, obstacles, own_body) || closed.contains(&neighbor) {
                continue;
            }

            let improved = g_score
                .get(&neighbor)
                .map_or(true, |&known| tentative < known);
            if improved {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative);
                seq += 1;
                open.push(Reverse((tentative + heuristic(neighbor), seq, tentative, neighbor)));
            }
        }
    }

    Vec::new()
}

fn reconstruct(came_from: &HashMap<Cell, Cell>, start: Cell, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}
