// Food scoring, filtering and target choice

use std::collections::HashSet;

use log::debug;

use crate::config::Config;
use crate::grid;
use crate::pathfinder::{self, SearchRequest};
use crate::profile;
use crate::simple_profiler::Category;
use crate::types::Cell;
use crate::world::Food;

/// `value^exponent / distance`. Distance must be at least 1.
#[inline]
pub fn score(distance: i32, value: i32, exponent: f64) -> f64 {
    (value as f64).powf(exponent) / distance.max(1) as f64
}

/// A ranked food candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub food: Food,
    pub distance: i32,
    pub score: f64,
}

/// A reachable target with the path that reaches it
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub food: Food,
    pub path: Vec<Cell>,
    pub score: f64,
}

/// Context of the agent choosing food this tick
pub struct Chooser<'a> {
    pub config: &'a Config,
    pub head: Cell,
    pub bounds: Cell,
    pub obstacles: &'a HashSet<Cell>,
    pub own_body: &'a HashSet<Cell>,
    pub hostile_heads: &'a [Cell],
    pub tick: u32,
}

impl Chooser<'_> {
    /// Food another snake is likely to reach first
    fn is_contested(&self, cell: Cell, our_distance: i32) -> bool {
        let slack = self.config.food.contest_slack(self.tick);
        self.hostile_heads
            .iter()
            .any(|h| h.manhattan(&cell) + slack <= our_distance)
    }

    /// Filters food and returns the top-K by Manhattan score, best first
    pub fn rank(&self, food: &[Food]) -> Vec<Candidate> {
        profile!(Category::SelectFood, {
            let exponent = self.config.food.value_exponent;
            let min_exits = self.config.grid.dead_end_min_exits;

            let mut candidates: Vec<Candidate> = food
                .iter()
                .filter(|f| f.value > 0 && f.cell != self.head)
                .filter(|f| !self.obstacles.contains(&f.cell))
                .filter(|f| !grid::is_dead_end(f.cell, self.bounds, self.obstacles, self.head, min_exits))
                .filter_map(|f| {
                    let distance = self.head.manhattan(&f.cell);
                    if self.is_contested(f.cell, distance) {
                        return None;
                    }
                    Some(Candidate {
                        food: *f,
                        distance,
                        score: score(distance, f.value, exponent),
                    })
                })
                .collect();

            // Stable sort keeps input order among equal scores
            candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
            candidates.truncate(self.config.food.top_k);
            candidates
        })
    }

    /// Paths to every ranked candidate and keeps the best one by true path length
    pub fn choose(&self, food: &[Food]) -> Option<Target> {
        let exponent = self.config.food.value_exponent;
        let max_cost = self.config.pathfinding.max_path_cost;
        let mut best: Option<Target> = None;

        for candidate in self.rank(food) {
            let path = pathfinder::find_path(
                &SearchRequest {
                    start: self.head,
                    goal: candidate.food.cell,
                    obstacles: self.obstacles,
                    own_body: self.own_body,
                    bounds: self.bounds,
                },
                max_cost,
            );
            if path.len() < 2 {
                continue;
            }

            let steps = (path.len() - 1) as i32;
            let path_score = score(steps, candidate.food.value, exponent);
            debug!(
                "candidate {:?} value {} manhattan {} path {} score {:.3}",
                candidate.food.cell, candidate.food.value, candidate.distance, steps, path_score
            );

            if best.as_ref().map_or(true, |b| path_score > b.score) {
                best = Some(Target {
                    food: candidate.food,
                    path,
                    score: path_score,
                });
            }
        }

        best
    }
}
