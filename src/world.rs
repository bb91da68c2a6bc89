// Typed per-tick world built from a server snapshot.
//
// All shape checks happen here, once, at the boundary. The planner only ever
// sees a `World` and may assume every alive agent has a head inside the bounds.

use std::collections::HashSet;
use std::fmt;

use crate::config::FoodConfig;
use crate::grid;
use crate::types::{Cell, Direction, Snapshot, Status};

/// One of our snakes
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: String,
    /// Head first, tail last
    pub geometry: Vec<Cell>,
    pub direction: Option<Direction>,
    pub previous_direction: Option<Direction>,
    pub alive: bool,
}

impl Agent {
    pub fn head(&self) -> Option<Cell> {
        self.geometry.first().copied()
    }

    /// Body cells the agent may not path through: everything but head and tail.
    /// The head is the search origin and the tail vacates this tick.
    pub fn blocking_body(&self) -> HashSet<Cell> {
        if self.geometry.len() <= 2 {
            return HashSet::new();
        }
        self.geometry[1..self.geometry.len() - 1].iter().copied().collect()
    }
}

/// A snake we do not control
#[derive(Debug, Clone, PartialEq)]
pub struct Hostile {
    pub geometry: Vec<Cell>,
    pub alive: bool,
}

impl Hostile {
    pub fn head(&self) -> Option<Cell> {
        self.geometry.first().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Food {
    pub cell: Cell,
    pub value: i32,
}

/// Everything the planner needs for one tick
#[derive(Debug, Clone)]
pub struct World {
    /// Exclusive upper bound per axis
    pub bounds: Cell,
    pub fences: Vec<Cell>,
    pub agents: Vec<Agent>,
    pub hostiles: Vec<Hostile>,
    /// Only items with a positive value
    pub food: Vec<Food>,
    pub tick: u32,
}

/// Reasons a snapshot cannot be turned into a `World`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    NonPositiveBounds { bounds: Cell },
    EmptyAgentGeometry { id: String },
    EmptyHostileGeometry { index: usize },
    HeadOutOfBounds { id: String, head: Cell },
    DuplicateAgentId { id: String },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveBounds { bounds } => write!(
                f,
                "map size must be positive on every axis, got [{}, {}, {}]",
                bounds.x, bounds.y, bounds.z
            ),
            Self::EmptyAgentGeometry { id } => {
                write!(f, "alive snake '{id}' has empty geometry")
            }
            Self::EmptyHostileGeometry { index } => {
                write!(f, "alive enemy #{index} has empty geometry")
            }
            Self::HeadOutOfBounds { id, head } => write!(
                f,
                "snake '{id}' head [{}, {}, {}] is outside the map",
                head.x, head.y, head.z
            ),
            Self::DuplicateAgentId { id } => write!(f, "snake id '{id}' appears more than once"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl World {
    /// Validates a snapshot and converts it into typed entities.
    ///
    /// Special food classes are folded into the food list with the point values
    /// from `food_config`; non-positive values drop the item.
    pub fn from_snapshot(snapshot: &Snapshot, food_config: &FoodConfig) -> Result<World, SnapshotError> {
        let bounds = snapshot.map_size;
        if bounds.x <= 0 || bounds.y <= 0 || bounds.z <= 0 {
            return Err(SnapshotError::NonPositiveBounds { bounds });
        }

        let mut seen = HashSet::new();
        let mut agents = Vec::with_capacity(snapshot.snakes.len());
        for snake in &snapshot.snakes {
            if !seen.insert(snake.id.as_str()) {
                return Err(SnapshotError::DuplicateAgentId {
                    id: snake.id.clone(),
                });
            }

            let alive = snake.status == Status::Alive;
            if alive {
                let head = snake
                    .geometry
                    .first()
                    .copied()
                    .ok_or_else(|| SnapshotError::EmptyAgentGeometry {
                        id: snake.id.clone(),
                    })?;
                if !grid::in_bounds(head, bounds) {
                    return Err(SnapshotError::HeadOutOfBounds {
                        id: snake.id.clone(),
                        head,
                    });
                }
            }

            agents.push(Agent {
                id: snake.id.clone(),
                geometry: snake.geometry.clone(),
                direction: Direction::from_vector(snake.direction),
                previous_direction: Direction::from_vector(snake.old_direction),
                alive,
            });
        }

        let mut hostiles = Vec::with_capacity(snapshot.enemies.len());
        for (index, enemy) in snapshot.enemies.iter().enumerate() {
            let alive = enemy.status == Status::Alive;
            if alive && enemy.geometry.is_empty() {
                return Err(SnapshotError::EmptyHostileGeometry { index });
            }
            hostiles.push(Hostile {
                geometry: enemy.geometry.clone(),
                alive,
            });
        }

        let regular = snapshot.food.iter().map(|f| Food {
            cell: f.c,
            value: f.points,
        });
        let golden = snapshot.special_food.golden.iter().map(|&cell| Food {
            cell,
            value: food_config.golden_points,
        });
        let suspicious = snapshot.special_food.suspicious.iter().map(|&cell| Food {
            cell,
            value: food_config.suspicious_points,
        });
        let food = regular
            .chain(golden)
            .chain(suspicious)
            .filter(|f| f.value > 0)
            .collect();

        Ok(World {
            bounds,
            fences: snapshot.fences.clone(),
            agents,
            hostiles,
            food,
            tick: snapshot.turn,
        })
    }

    pub fn alive_hostiles(&self) -> impl Iterator<Item = &Hostile> {
        self.hostiles.iter().filter(|h| h.alive)
    }
}
