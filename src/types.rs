// Game server wire types
// Cells and vectors travel as [x, y, z] arrays; everything else is camelCase JSON.

use serde::{Deserialize, Serialize};

/// Integer lattice position
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Cell { x, y, z }
    }

    /// Cell reached by moving one step in `dir`
    pub fn step(&self, dir: Direction) -> Cell {
        let v = dir.vector();
        Cell::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }

    /// The 6 orthogonal neighbours, in `Direction::all()` order
    pub fn neighbors(&self) -> [Cell; 6] {
        Direction::all().map(|dir| self.step(dir))
    }

    pub fn manhattan(&self, other: &Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }
}

impl From<[i32; 3]> for Cell {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Cell { x, y, z }
    }
}

impl From<Cell> for [i32; 3] {
    fn from(c: Cell) -> Self {
        [c.x, c.y, c.z]
    }
}

/// A delta between cells. Never bounds-checked.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct Vector {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Vector { x, y, z }
    }

    pub fn is_zero(&self) -> bool {
        *self == Vector::ZERO
    }
}

impl From<[i32; 3]> for Vector {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Vector { x, y, z }
    }
}

impl From<Vector> for [i32; 3] {
    fn from(v: Vector) -> Self {
        [v.x, v.y, v.z]
    }
}

/// The six axis-aligned unit moves of the lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 6] {
        [
            Direction::PosX,
            Direction::NegX,
            Direction::PosY,
            Direction::NegY,
            Direction::PosZ,
            Direction::NegZ,
        ]
    }

    /// Converts direction to string representation for logs and CLI arguments
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::PosX => "+x",
            Direction::NegX => "-x",
            Direction::PosY => "+y",
            Direction::NegY => "-y",
            Direction::PosZ => "+z",
            Direction::NegZ => "-z",
        }
    }

    pub fn vector(&self) -> Vector {
        match self {
            Direction::PosX => Vector::new(1, 0, 0),
            Direction::NegX => Vector::new(-1, 0, 0),
            Direction::PosY => Vector::new(0, 1, 0),
            Direction::NegY => Vector::new(0, -1, 0),
            Direction::PosZ => Vector::new(0, 0, 1),
            Direction::NegZ => Vector::new(0, 0, -1),
        }
    }

    /// Recovers a direction from a unit vector. Zero and diagonal vectors yield `None`.
    pub fn from_vector(v: Vector) -> Option<Direction> {
        match (v.x, v.y, v.z) {
            (1, 0, 0) => Some(Direction::PosX),
            (-1, 0, 0) => Some(Direction::NegX),
            (0, 1, 0) => Some(Direction::PosY),
            (0, -1, 0) => Some(Direction::NegY),
            (0, 0, 1) => Some(Direction::PosZ),
            (0, 0, -1) => Some(Direction::NegZ),
            _ => None,
        }
    }

    /// Direction of a single step between two adjacent cells
    pub fn between(from: Cell, to: Cell) -> Option<Direction> {
        Direction::from_vector(Vector::new(to.x - from.x, to.y - from.y, to.z - from.z))
    }

    pub fn parse(s: &str) -> Result<Direction, String> {
        match s.trim().to_lowercase().as_str() {
            "+x" | "x" => Ok(Direction::PosX),
            "-x" => Ok(Direction::NegX),
            "+y" | "y" => Ok(Direction::PosY),
            "-y" => Ok(Direction::NegY),
            "+z" | "z" => Ok(Direction::PosZ),
            "-z" => Ok(Direction::NegZ),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

/// Alive/dead marker used for both our snakes and enemies
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Alive,
    Dead,
}

/// One of our snakes as reported by the server
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SnakeState {
    pub id: String,
    #[serde(default)]
    pub direction: Vector,
    #[serde(default)]
    pub old_direction: Vector,
    pub geometry: Vec<Cell>,
    #[serde(default)]
    pub death_count: u32,
    pub status: Status,
    #[serde(default)]
    pub revive_remain_ms: u64,
}

/// A hostile snake
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EnemyState {
    pub geometry: Vec<Cell>,
    pub status: Status,
    #[serde(default)]
    pub kills: u32,
}

/// Regular scored food
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FoodState {
    pub c: Cell,
    pub points: i32,
}

/// Unscored special food positions
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SpecialFood {
    #[serde(default)]
    pub golden: Vec<Cell>,
    #[serde(default)]
    pub suspicious: Vec<Cell>,
}

/// Complete per-tick snapshot received from the game server
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub points: i64,
    pub map_size: Cell,
    #[serde(default)]
    pub fences: Vec<Cell>,
    #[serde(default)]
    pub snakes: Vec<SnakeState>,
    #[serde(default)]
    pub enemies: Vec<EnemyState>,
    #[serde(default)]
    pub food: Vec<FoodState>,
    #[serde(default)]
    pub special_food: SpecialFood,
    #[serde(default)]
    pub turn: u32,
    #[serde(default)]
    pub tick_remain_ms: u64,
    #[serde(default)]
    pub revive_timeout_sec: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Direction chosen for one of our snakes
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SnakeMove {
    pub id: String,
    pub direction: Vector,
}

/// Body of the move request sent back to the server
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveResponse {
    pub snakes: Vec<SnakeMove>,
}

impl MoveResponse {
    /// Looks up the direction emitted for a snake id
    pub fn direction_for(&self, id: &str) -> Option<Vector> {
        self.snakes.iter().find(|m| m.id == id).map(|m| m.direction)
    }
}
