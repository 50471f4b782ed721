//! Cross-task behavior of the scheduler against a real world context.

use std::cell::RefCell;
use std::rc::Rc;

use space_garbage::Result;
use space_garbage::obstacles::ObstacleId;
use space_garbage::registry::ObstacleGuard;
use space_garbage::rendering::FrameCanvas;
use space_garbage::scheduler::{Scheduler, Step, Task, TaskContext, TickStatus};
use space_garbage::terminal_io::{InputSource, SimulatedInput};
use space_garbage::world::{Rules, World};

type GameWorld = World<FrameCanvas>;

fn world() -> GameWorld {
    let canvas = FrameCanvas::headless(40, 20, InputSource::Simulated(SimulatedInput::default()));
    World::new(canvas, Rules::default(), Some(11))
}

struct Marker {
    target: ObstacleId,
    fired: bool,
}

impl Task<GameWorld> for Marker {
    fn step(&mut self, cx: &mut TaskContext<'_, GameWorld>) -> Result<Step> {
        if !self.fired {
            cx.world.registry.mark_collided(self.target)?;
            self.fired = true;
        }
        Ok(Step::Pending)
    }
}

struct Consumer {
    target: ObstacleId,
    seen: Rc<RefCell<Vec<bool>>>,
}

impl Task<GameWorld> for Consumer {
    fn step(&mut self, cx: &mut TaskContext<'_, GameWorld>) -> Result<Step> {
        let first = cx.world.registry.take_collided(self.target);
        let second = cx.world.registry.take_collided(self.target);
        self.seen.borrow_mut().push(first);
        self.seen.borrow_mut().push(second);
        Ok(Step::Pending)
    }
}

#[test]
fn mark_is_visible_to_later_task_in_same_pass_exactly_once() {
    let mut world = world();
    let guard = world.registry.add_obstacle(2.0, 2.0, 2, 2);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let mut scheduler = Scheduler::new();
    scheduler.register(Marker { target: guard.id(), fired: false });
    scheduler.register(Consumer { target: guard.id(), seen: seen.clone() });

    scheduler.run_tick(&mut world).unwrap();
    assert_eq!(*seen.borrow(), vec![true, false]);

    scheduler.run_tick(&mut world).unwrap();
    assert_eq!(*seen.borrow(), vec![true, false, false, false]);
}

/// Owns an obstacle for a fixed number of steps.
struct Owner {
    _obstacle: ObstacleGuard,
    steps_left: u32,
}

impl Task<GameWorld> for Owner {
    fn step(&mut self, _cx: &mut TaskContext<'_, GameWorld>) -> Result<Step> {
        if self.steps_left == 0 {
            return Ok(Step::Done);
        }
        self.steps_left -= 1;
        Ok(Step::Pending)
    }
}

#[test]
fn obstacle_lives_exactly_as_long_as_its_owner() {
    let mut world = world();
    let mut scheduler = Scheduler::new();
    let guard = world.registry.add_obstacle(0.0, 0.0, 1, 1);
    let id = guard.id();
    scheduler.register(Owner { _obstacle: guard, steps_left: 2 });

    scheduler.run_tick(&mut world).unwrap();
    scheduler.run_tick(&mut world).unwrap();
    assert!(world.registry.get(id).is_some());

    assert_eq!(scheduler.run_tick(&mut world).unwrap(), TickStatus::Idle);
    assert!(world.registry.get(id).is_none());
}

struct Chain {
    depth: u32,
    runs: Rc<RefCell<Vec<(u32, u64)>>>,
    tick: Rc<RefCell<u64>>,
}

impl Task<GameWorld> for Chain {
    fn step(&mut self, cx: &mut TaskContext<'_, GameWorld>) -> Result<Step> {
        self.runs.borrow_mut().push((self.depth, *self.tick.borrow()));
        if self.depth < 3 {
            cx.spawn(Chain { depth: self.depth + 1, runs: self.runs.clone(), tick: self.tick.clone() });
        }
        Ok(Step::Done)
    }
}

#[test]
fn each_spawned_generation_runs_one_tick_later() {
    let mut world = world();
    let runs = Rc::new(RefCell::new(Vec::new()));
    let tick = Rc::new(RefCell::new(0));
    let mut scheduler = Scheduler::new();
    scheduler.register(Chain { depth: 0, runs: runs.clone(), tick: tick.clone() });

    while scheduler.run_tick(&mut world).unwrap() == TickStatus::Active {
        *tick.borrow_mut() += 1;
    }

    assert_eq!(*runs.borrow(), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    assert_eq!(scheduler.tick(), 4);
}
