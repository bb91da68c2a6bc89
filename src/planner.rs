// Per-tick orchestration
//
// Builds the shared obstacle set once, then walks our snakes in input order.
// Each decision reserves cells in that set before the next snake is planned,
// so the loop must stay sequential.

use std::collections::HashSet;

use log::debug;
use rand::Rng;

use crate::config::Config;
use crate::director::{self, Surroundings};
use crate::food::Chooser;
use crate::profile;
use crate::simple_profiler::Category;
use crate::types::{Cell, Direction, MoveResponse, SnakeMove, Vector};
use crate::world::{Agent, World};

/// Cells unsafe to enter this tick, plus reservations made while planning it
#[derive(Debug, Clone, Default)]
pub struct ObstacleSet {
    cells: HashSet<Cell>,
}

impl ObstacleSet {
    /// Fences, every alive body minus its tail, and the halo around hostile heads.
    ///
    /// Our own heads are always blocked: a one-cell snake's tail is its head,
    /// and that cell only frees up if the snake actually moves.
    pub fn build(world: &World) -> Self {
        let mut cells: HashSet<Cell> = world.fences.iter().copied().collect();

        for agent in world.agents.iter().filter(|a| a.alive) {
            cells.extend(without_tail(&agent.geometry));
            cells.extend(agent.head());
        }

        for hostile in world.alive_hostiles() {
            cells.extend(without_tail(&hostile.geometry));
            if let Some(head) = hostile.head() {
                cells.extend(head.neighbors());
            }
        }

        ObstacleSet { cells }
    }

    pub fn reserve(&mut self, cell: Cell) {
        self.cells.insert(cell);
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    pub fn as_set(&self) -> &HashSet<Cell> {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn without_tail(geometry: &[Cell]) -> impl Iterator<Item = Cell> + '_ {
    geometry[..geometry.len().saturating_sub(1)].iter().copied()
}

/// How a snake's direction was decided
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Dead snakes do not move
    Dead,
    /// Heading for food along `path`
    Food { target: Cell, value: i32, path: Vec<Cell> },
    /// No reachable food; `None` means no safe step existed
    Fallback(Option<Direction>),
}

/// Outcome for one of our snakes
#[derive(Debug, Clone, PartialEq)]
pub struct AgentPlan {
    pub id: String,
    pub direction: Option<Direction>,
    pub decision: Decision,
}

impl AgentPlan {
    pub fn vector(&self) -> Vector {
        self.direction.map_or(Vector::ZERO, |d| d.vector())
    }

    /// The cell this snake will occupy next tick, if it moves
    pub fn next_cell(&self, head: Cell) -> Option<Cell> {
        self.direction.map(|d| head.step(d))
    }
}

/// All decisions of one tick, in input order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickPlan {
    pub agents: Vec<AgentPlan>,
}

impl TickPlan {
    pub fn to_response(&self) -> MoveResponse {
        MoveResponse {
            snakes: self
                .agents
                .iter()
                .map(|a| SnakeMove {
                    id: a.id.clone(),
                    direction: a.vector(),
                })
                .collect(),
        }
    }

    /// Every agent standing still, used when planning could not finish in time
    pub fn all_still(world: &World) -> Self {
        TickPlan {
            agents: world
                .agents
                .iter()
                .map(|a| AgentPlan {
                    id: a.id.clone(),
                    direction: None,
                    decision: if a.alive { Decision::Fallback(None) } else { Decision::Dead },
                })
                .collect(),
        }
    }
}

/// Stateless planner; all per-tick state lives on the stack of `plan`
pub struct TickPlanner<'a> {
    config: &'a Config,
}

impl<'a> TickPlanner<'a> {
    pub fn new(config: &'a Config) -> Self {
        TickPlanner { config }
    }

    /// Decides one direction per controlled snake.
    ///
    /// `rng` only feeds the fallback shuffle; food pursuit is deterministic.
    pub fn plan<R: Rng + ?Sized>(&self, world: &World, rng: &mut R) -> TickPlan {
        profile!(Category::PlanTick, {
            let mut obstacles = ObstacleSet::build(world);
            let hostile_heads: Vec<Cell> = world.alive_hostiles().filter_map(|h| h.head()).collect();

            let agents = world
                .agents
                .iter()
                .map(|agent| self.plan_agent(world, agent, &hostile_heads, &mut obstacles, rng))
                .collect();

            TickPlan { agents }
        })
    }

    fn plan_agent<R: Rng + ?Sized>(
        &self,
        world: &World,
        agent: &Agent,
        hostile_heads: &[Cell],
        obstacles: &mut ObstacleSet,
        rng: &mut R,
    ) -> AgentPlan {
        let head = match agent.head() {
            Some(head) if agent.alive => head,
            _ => {
                return AgentPlan {
                    id: agent.id.clone(),
                    direction: None,
                    decision: Decision::Dead,
                }
            }
        };
        let own_body = agent.blocking_body();

        let target = Chooser {
            config: self.config,
            head,
            bounds: world.bounds,
            obstacles: obstacles.as_set(),
            own_body: &own_body,
            hostile_heads,
            tick: world.tick,
        }
        .choose(&world.food);

        if let Some(target) = target {
            let next = target.path[1];
            let goal = target.food.cell;
            obstacles.reserve(next);
            obstacles.reserve(goal);

            let direction = Direction::between(head, next);
            debug!(
                "{}: food {:?} (value {}) in {} steps, moving {}",
                agent.id,
                goal,
                target.food.value,
                target.path.len() - 1,
                direction.map_or("none", |d| d.as_str())
            );
            return AgentPlan {
                id: agent.id.clone(),
                direction,
                decision: Decision::Food {
                    target: goal,
                    value: target.food.value,
                    path: target.path,
                },
            };
        }

        let direction = director::fallback_direction(
            &self.config.director,
            &Surroundings {
                head,
                bounds: world.bounds,
                obstacles: obstacles.as_set(),
                own_body: &own_body,
                min_exits: self.config.grid.dead_end_min_exits,
            },
            world.tick,
            agent.previous_direction,
            rng,
        );
        // Holding position still claims the head for next tick
        obstacles.reserve(direction.map_or(head, |dir| head.step(dir)));
        debug!(
            "{}: no reachable food, fallback {}",
            agent.id,
            direction.map_or("stay", |d| d.as_str())
        );

        AgentPlan {
            id: agent.id.clone(),
            direction,
            decision: Decision::Fallback(direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Food, Hostile};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn agent(id: &str, geometry: Vec<Cell>) -> Agent {
        Agent {
            id: id.to_string(),
            geometry,
            direction: None,
            previous_direction: None,
            alive: true,
        }
    }

    fn world(bounds: Cell, agents: Vec<Agent>, food: Vec<Food>) -> World {
        World {
            bounds,
            fences: vec![],
            agents,
            hostiles: vec![],
            food,
            tick: 0,
        }
    }

    #[test]
    fn test_obstacles_exclude_tails_and_include_halo() {
        let mut w = world(
            Cell::new(10, 10, 10),
            vec![agent("a", vec![Cell::new(1, 1, 1), Cell::new(1, 1, 2), Cell::new(1, 1, 3)])],
            vec![],
        );
        w.fences.push(Cell::new(9, 9, 9));
        w.hostiles.push(Hostile {
            geometry: vec![Cell::new(5, 5, 5), Cell::new(5, 5, 6)],
            alive: true,
        });
        w.hostiles.push(Hostile {
            geometry: vec![Cell::new(0, 0, 0), Cell::new(0, 0, 1)],
            alive: false,
        });

        let obstacles = ObstacleSet::build(&w);
        assert!(obstacles.contains(&Cell::new(9, 9, 9)));
        assert!(obstacles.contains(&Cell::new(1, 1, 1)));
        assert!(obstacles.contains(&Cell::new(1, 1, 2)));
        assert!(!obstacles.contains(&Cell::new(1, 1, 3)));
        assert!(obstacles.contains(&Cell::new(5, 5, 5)));
        assert!(obstacles.contains(&Cell::new(4, 5, 5)));
        assert!(obstacles.contains(&Cell::new(5, 5, 4)));
        // Hostile tail is also a halo cell of its own head
        assert!(obstacles.contains(&Cell::new(5, 5, 6)));
        assert!(!obstacles.contains(&Cell::new(0, 0, 0)));
        // fence + 2 body + head + 6 halo (tail cell counted once)
        assert_eq!(obstacles.len(), 10);
    }

    #[test]
    fn test_single_cell_agent_head_is_blocked() {
        let w = world(Cell::new(4, 4, 4), vec![agent("a", vec![Cell::new(2, 2, 2)])], vec![]);
        let obstacles = ObstacleSet::build(&w);
        assert!(obstacles.contains(&Cell::new(2, 2, 2)));
        assert_eq!(obstacles.len(), 1);
    }

    #[test]
    fn test_stuck_agent_reserves_its_head() {
        let config = Config::default_hardcoded();
        // `a` is wedged at the corridor end behind `b`; `b` can only back into a's cell
        let w = world(
            Cell::new(3, 1, 1),
            vec![
                agent("a", vec![Cell::new(0, 0, 0)]),
                agent("b", vec![Cell::new(1, 0, 0), Cell::new(2, 0, 0)]),
            ],
            vec![],
        );

        let mut config = config;
        config.grid.dead_end_min_exits = 0;
        for seed in 0..20 {
            let plan = TickPlanner::new(&config).plan(&w, &mut StdRng::seed_from_u64(seed));
            assert_eq!(plan.agents[0].direction, None);
            assert_eq!(plan.agents[1].direction, Some(Direction::PosX));
        }
    }

    #[test]
    fn test_single_step_to_food() {
        let config = Config::default_hardcoded();
        let w = world(
            Cell::new(2, 2, 2),
            vec![agent("a", vec![Cell::new(0, 0, 0)])],
            vec![Food { cell: Cell::new(1, 0, 0), value: 10 }],
        );

        let plan = TickPlanner::new(&config).plan(&w, &mut StdRng::seed_from_u64(0));
        assert_eq!(plan.agents[0].direction, Some(Direction::PosX));
        assert_eq!(
            plan.agents[0].decision,
            Decision::Food {
                target: Cell::new(1, 0, 0),
                value: 10,
                path: vec![Cell::new(0, 0, 0), Cell::new(1, 0, 0)],
            }
        );
    }

    #[test]
    fn test_dead_agent_emits_zero() {
        let config = Config::default_hardcoded();
        let mut dead = agent("d", vec![]);
        dead.alive = false;
        let w = world(Cell::new(4, 4, 4), vec![dead], vec![]);

        let plan = TickPlanner::new(&config).plan(&w, &mut StdRng::seed_from_u64(0));
        assert_eq!(plan.agents[0].decision, Decision::Dead);
        assert_eq!(plan.to_response().snakes[0].direction, Vector::ZERO);
    }

    #[test]
    fn test_second_agent_does_not_chase_reserved_food() {
        let config = Config::default_hardcoded();
        let w = world(
            Cell::new(10, 10, 10),
            vec![
                agent("a", vec![Cell::new(2, 5, 5)]),
                agent("b", vec![Cell::new(6, 5, 5)]),
            ],
            vec![
                Food { cell: Cell::new(4, 5, 5), value: 10 },
                Food { cell: Cell::new(6, 8, 5), value: 1 },
            ],
        );

        let plan = TickPlanner::new(&config).plan(&w, &mut StdRng::seed_from_u64(0));
        match &plan.agents[0].decision {
            Decision::Food { target, .. } => assert_eq!(*target, Cell::new(4, 5, 5)),
            other => panic!("unexpected decision {:?}", other),
        }
        match &plan.agents[1].decision {
            Decision::Food { target, .. } => assert_eq!(*target, Cell::new(6, 8, 5)),
            other => panic!("unexpected decision {:?}", other),
        }
    }

    #[test]
    fn test_fallback_reserves_next_cell() {
        let config = Config::default_hardcoded();
        // Two snakes facing each other across a single gap in a 3x1x1 corridor
        let w = world(
            Cell::new(3, 1, 1),
            vec![agent("a", vec![Cell::new(0, 0, 0)]), agent("b", vec![Cell::new(2, 0, 0)])],
            vec![],
        );

        let mut config = config;
        config.grid.dead_end_min_exits = 0;
        let plan = TickPlanner::new(&config).plan(&w, &mut StdRng::seed_from_u64(5));
        assert_eq!(plan.agents[0].direction, Some(Direction::PosX));
        assert_eq!(plan.agents[1].direction, None);
    }

    #[test]
    fn test_all_still_keeps_ids_and_order() {
        let mut dead = agent("b", vec![]);
        dead.alive = false;
        let w = world(Cell::new(3, 3, 3), vec![agent("a", vec![Cell::new(1, 1, 1)]), dead], vec![]);

        let plan = TickPlan::all_still(&w);
        let response = plan.to_response();
        assert_eq!(response.snakes.len(), 2);
        assert_eq!(response.snakes[0].id, "a");
        assert!(response.snakes.iter().all(|m| m.direction == Vector::ZERO));
        assert_eq!(plan.agents[1].decision, Decision::Dead);
    }
}
