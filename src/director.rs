// Fallback movement when no food is reachable
//
// Picks a region-level preference (towards the centre early on, then spread
// out or regroup depending on distance from the centre) and returns the first
// safe step in that preference order.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::DirectorConfig;
use crate::grid;
use crate::profile;
use crate::simple_profiler::Category;
use crate::types::{Cell, Direction};

/// Which way the director is pushing the agent this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Early game: head for the centre
    Converge,
    /// Late game, crowded centre: move away from it
    Spread,
    /// Late game, far out: come back towards the centre
    Regroup,
    /// Late game, middle band: no bias
    Wander,
}

/// Centre cell of the map (integer division)
pub fn center(bounds: Cell) -> Cell {
    Cell::new(bounds.x / 2, bounds.y / 2, bounds.z / 2)
}

pub fn regime(config: &DirectorConfig, tick: u32, distance_to_center: i32) -> Regime {
    if tick < config.phase_threshold_tick {
        Regime::Converge
    } else if distance_to_center < config.spread_radius {
        Regime::Spread
    } else if distance_to_center > config.regroup_radius {
        Regime::Regroup
    } else {
        Regime::Wander
    }
}

/// Unit moves that shrink the head's distance to `center`, one per off-centre axis
fn towards(head: Cell, center: Cell) -> Vec<Direction> {
    let mut dirs = Vec::with_capacity(3);
    if head.x != center.x {
        dirs.push(if head.x < center.x { Direction::PosX } else { Direction::NegX });
    }
    if head.y != center.y {
        dirs.push(if head.y < center.y { Direction::PosY } else { Direction::NegY });
    }
    if head.z != center.z {
        dirs.push(if head.z < center.z { Direction::PosZ } else { Direction::NegZ });
    }
    dirs
}

/// Unit moves that grow the distance to `center`
fn away(head: Cell, center: Cell) -> Vec<Direction> {
    Direction::all()
        .into_iter()
        .filter(|&dir| head.step(dir).manhattan(&center) > head.manhattan(&center))
        .collect()
}

/// Full candidate order for this tick: momentum hint, shuffled preferences, shuffled rest
pub fn preference_order<R: Rng + ?Sized>(
    config: &DirectorConfig,
    head: Cell,
    bounds: Cell,
    tick: u32,
    previous: Option<Direction>,
    rng: &mut R,
) -> Vec<Direction> {
    let center = center(bounds);
    let distance = head.manhattan(&center);

    let mut preferred = match regime(config, tick, distance) {
        Regime::Converge | Regime::Regroup => towards(head, center),
        Regime::Spread => away(head, center),
        Regime::Wander => Direction::all().to_vec(),
    };
    let mut rest: Vec<Direction> = Direction::all()
        .into_iter()
        .filter(|d| !preferred.contains(d))
        .collect();

    preferred.shuffle(rng);
    rest.shuffle(rng);

    let mut order = Vec::with_capacity(7);
    if distance < config.momentum_radius {
        if let Some(prev) = previous {
            order.push(prev);
        }
    }
    order.extend(preferred);
    order.extend(rest);
    order
}

/// State the director validates moves against
pub struct Surroundings<'a> {
    pub head: Cell,
    pub bounds: Cell,
    pub obstacles: &'a HashSet<Cell>,
    pub own_body: &'a HashSet<Cell>,
    pub min_exits: usize,
}

impl Surroundings<'_> {
    /// A move is safe when its target is free and not a dead end
    pub fn is_safe(&self, dir: Direction) -> bool {
        let next = self.head.step(dir);
        grid::is_free(next, self.bounds, self.obstacles, self.own_body)
            && !grid::is_dead_end(next, self.bounds, self.obstacles, self.head, self.min_exits)
    }
}

/// First safe direction in preference order, or `None` to stay put
pub fn fallback_direction<R: Rng + ?Sized>(
    config: &DirectorConfig,
    surroundings: &Surroundings<'_>,
    tick: u32,
    previous: Option<Direction>,
    rng: &mut R,
) -> Option<Direction> {
    profile!(Category::Director, {
        preference_order(config, surroundings.head, surroundings.bounds, tick, previous, rng)
            .into_iter()
            .find(|&dir| surroundings.is_safe(dir))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn director() -> DirectorConfig {
        Config::default_hardcoded().director
    }

    #[test]
    fn test_regime_bands() {
        let config = director();
        assert_eq!(regime(&config, 0, 100), Regime::Converge);
        assert_eq!(regime(&config, 500, 5), Regime::Spread);
        assert_eq!(regime(&config, 500, 20), Regime::Wander);
        assert_eq!(regime(&config, 500, 30), Regime::Wander);
        assert_eq!(regime(&config, 500, 31), Regime::Regroup);
    }

    #[test]
    fn test_early_phase_prefers_centre_on_each_off_axis() {
        let config = director();
        let bounds = Cell::new(100, 100, 100);
        let head = Cell::new(10, 50, 90);
        let mut rng = StdRng::seed_from_u64(7);

        let order = preference_order(&config, head, bounds, 0, None, &mut rng);
        assert_eq!(order.len(), 6);
        let first_two: HashSet<Direction> = order[..2].iter().copied().collect();
        assert_eq!(
            first_two,
            [Direction::PosX, Direction::NegZ].into_iter().collect()
        );
    }

    #[test]
    fn test_spread_prefers_moving_away() {
        let config = director();
        let bounds = Cell::new(100, 100, 100);
        let head = Cell::new(52, 50, 49);
        let mut rng = StdRng::seed_from_u64(1);

        let order = preference_order(&config, head, bounds, 1000, None, &mut rng);
        // On-centre y axis: both y moves increase distance
        let first_four: HashSet<Direction> = order[..4].iter().copied().collect();
        assert_eq!(
            first_four,
            [Direction::PosX, Direction::PosY, Direction::NegY, Direction::NegZ]
                .into_iter()
                .collect()
        );
    }

    #[test]
    fn test_previous_direction_first_only_near_centre() {
        let config = director();
        let bounds = Cell::new(200, 200, 200);
        let mut rng = StdRng::seed_from_u64(3);

        let near = preference_order(
            &config,
            Cell::new(100, 100, 110),
            bounds,
            0,
            Some(Direction::NegY),
            &mut rng,
        );
        assert_eq!(near[0], Direction::NegY);
        assert_eq!(near.len(), 7);

        let far = preference_order(
            &config,
            Cell::new(0, 0, 0),
            bounds,
            0,
            Some(Direction::NegY),
            &mut rng,
        );
        assert_eq!(far.len(), 6);
    }

    #[test]
    fn test_seeded_order_is_reproducible() {
        let config = director();
        let bounds = Cell::new(40, 40, 40);
        let head = Cell::new(20, 20, 20);
        let a = preference_order(&config, head, bounds, 600, None, &mut StdRng::seed_from_u64(99));
        let b = preference_order(&config, head, bounds, 600, None, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_enclosed_head_has_no_fallback() {
        let config = director();
        let head = Cell::new(3, 3, 3);
        let obstacles: HashSet<Cell> = head.neighbors().into_iter().collect();
        let body = HashSet::new();
        let surroundings = Surroundings {
            head,
            bounds: Cell::new(7, 7, 7),
            obstacles: &obstacles,
            own_body: &body,
            min_exits: 2,
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(fallback_direction(&config, &surroundings, 0, None, &mut rng), None);
    }

    #[test]
    fn test_only_safe_exit_is_taken() {
        let config = director();
        let head = Cell::new(3, 3, 3);
        let mut obstacles: HashSet<Cell> = head.neighbors().into_iter().collect();
        obstacles.remove(&Cell::new(3, 3, 2));
        let body = HashSet::new();
        let surroundings = Surroundings {
            head,
            bounds: Cell::new(7, 7, 7),
            obstacles: &obstacles,
            own_body: &body,
            min_exits: 2,
        };
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(
                fallback_direction(&config, &surroundings, 0, Some(Direction::PosX), &mut rng),
                Some(Direction::NegZ)
            );
        }
    }

    #[test]
    fn test_fallback_skips_dead_end_cell() {
        let config = director();
        let head = Cell::new(3, 3, 3);
        // Only +x is free, and (4,3,3) is boxed in apart from the head
        let mut obstacles: HashSet<Cell> = head.neighbors().into_iter().collect();
        obstacles.remove(&Cell::new(4, 3, 3));
        obstacles.extend([
            Cell::new(5, 3, 3),
            Cell::new(4, 4, 3),
            Cell::new(4, 2, 3),
            Cell::new(4, 3, 4),
            Cell::new(4, 3, 2),
        ]);
        let body = HashSet::new();
        let surroundings = Surroundings {
            head,
            bounds: Cell::new(7, 7, 7),
            obstacles: &obstacles,
            own_body: &body,
            min_exits: 2,
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(fallback_direction(&config, &surroundings, 0, None, &mut rng), None);
    }
}
