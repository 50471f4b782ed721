//! Cooperative tick scheduler.
//!
//! Every registered task is resumed exactly once per tick, in registration
//! order. A pass iterates over a snapshot of the active set: tasks spawned
//! during the pass are appended once it ends and first run on the next
//! tick, while registry mutations made by earlier tasks are already visible
//! to later ones because everything runs on one thread, one task at a time.

use std::fmt;
use std::mem;

use log::{debug, error};

use crate::error::Result;

/// Outcome of one task step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Suspended; resume on the next tick.
    Pending,
    /// Finished; the scheduler drops the task.
    Done,
}

/// Whether a pass left anything to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    Active,
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// One animation or behavior routine, written as a state machine that
/// advances by one tick-sized step per call.
pub trait Task<W> {
    fn step(&mut self, cx: &mut TaskContext<'_, W>) -> Result<Step>;

    fn name(&self) -> &'static str {
        "task"
    }
}

/// What a task sees while it runs: the shared world and a way to start
/// peers.
pub struct TaskContext<'a, W> {
    pub world: &'a mut W,
    spawned: &'a mut Vec<Box<dyn Task<W>>>,
}

impl<'a, W> TaskContext<'a, W> {
    /// Starts a task on the next tick.
    pub fn spawn(&mut self, task: impl Task<W> + 'static) {
        self.spawned.push(Box::new(task));
    }
}

struct Entry<W> {
    id: TaskId,
    task: Box<dyn Task<W>>,
}

pub struct Scheduler<W> {
    active: Vec<Entry<W>>,
    next_id: u64,
    tick: u64,
}

impl<W> Default for Scheduler<W> {
    fn default() -> Self {
        Scheduler { active: Vec::new(), next_id: 0, tick: 0 }
    }
}

impl<W> Scheduler<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, task: impl Task<W> + 'static) -> TaskId {
        self.register_boxed(Box::new(task))
    }

    pub fn register_boxed(&mut self, task: Box<dyn Task<W>>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        debug!("Registered {} ({})", id, task.name());
        self.active.push(Entry { id, task });
        id
    }

    /// Resumes every task in the active set once.
    ///
    /// An error from a task ends the pass immediately and is returned as
    /// is; tasks not yet resumed stay registered.
    pub fn run_tick(&mut self, world: &mut W) -> Result<TickStatus> {
        let snapshot = mem::take(&mut self.active);
        let mut survivors = Vec::with_capacity(snapshot.len());
        let mut spawned: Vec<Box<dyn Task<W>>> = Vec::new();
        let mut pending = snapshot.into_iter();

        while let Some(mut entry) = pending.next() {
            let mut cx = TaskContext { world: &mut *world, spawned: &mut spawned };
            match entry.task.step(&mut cx) {
                Ok(Step::Pending) => survivors.push(entry),
                Ok(Step::Done) => debug!("{} ({}) finished", entry.id, entry.task.name()),
                Err(e) => {
                    error!("{} ({}) failed on tick {}: {}", entry.id, entry.task.name(), self.tick, e);
                    survivors.push(entry);
                    survivors.extend(pending);
                    self.active = survivors;
                    for task in spawned {
                        self.register_boxed(task);
                    }
                    return Err(e);
                }
            }
        }

        self.active = survivors;
        for task in spawned {
            self.register_boxed(task);
        }
        self.tick += 1;

        Ok(if self.active.is_empty() { TickStatus::Idle } else { TickStatus::Active })
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.active.iter().map(|entry| entry.id).collect()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Completed passes so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::GameError;
    use crate::obstacles::ObstacleId;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct Counted {
        label: &'static str,
        remaining: Option<u32>,
        log: Log,
    }

    impl Task<()> for Counted {
        fn step(&mut self, _cx: &mut TaskContext<'_, ()>) -> Result<Step> {
            self.log.borrow_mut().push(self.label);
            match self.remaining.as_mut() {
                Some(0) | Some(1) => Ok(Step::Done),
                Some(n) => {
                    *n -= 1;
                    Ok(Step::Pending)
                }
                None => Ok(Step::Pending),
            }
        }
    }

    fn counted(label: &'static str, resumes: Option<u32>, log: &Log) -> Counted {
        Counted { label, remaining: resumes, log: log.clone() }
    }

    #[test]
    fn finite_task_leaves_after_its_last_resume() {
        let log = Log::default();
        let mut scheduler = Scheduler::new();
        scheduler.register(counted("finite", Some(3), &log));
        let forever = scheduler.register(counted("forever", None, &log));

        for _ in 0..3 {
            assert_eq!(scheduler.run_tick(&mut ()).unwrap(), TickStatus::Active);
        }

        assert_eq!(scheduler.task_ids(), vec![forever]);
        scheduler.run_tick(&mut ()).unwrap();
        let finite_resumes = log.borrow().iter().filter(|l| **l == "finite").count();
        assert_eq!(finite_resumes, 3);
    }

    #[test]
    fn tasks_run_in_registration_order() {
        let log = Log::default();
        let mut scheduler = Scheduler::new();
        scheduler.register(counted("a", None, &log));
        scheduler.register(counted("b", None, &log));
        scheduler.register(counted("c", None, &log));
        scheduler.run_tick(&mut ()).unwrap();
        scheduler.run_tick(&mut ()).unwrap();
        assert_eq!(*log.borrow(), vec!["a", "b", "c", "a", "b", "c"]);
    }

    #[test]
    fn empty_scheduler_is_idle() {
        let mut scheduler: Scheduler<()> = Scheduler::new();
        assert_eq!(scheduler.run_tick(&mut ()).unwrap(), TickStatus::Idle);
        assert_eq!(scheduler.tick(), 1);
    }

    #[test]
    fn last_task_finishing_reports_idle() {
        let log = Log::default();
        let mut scheduler = Scheduler::new();
        scheduler.register(counted("once", Some(1), &log));
        assert_eq!(scheduler.run_tick(&mut ()).unwrap(), TickStatus::Idle);
        assert!(scheduler.is_empty());
    }

    struct Spawner {
        log: Log,
        spawned: bool,
    }

    impl Task<()> for Spawner {
        fn step(&mut self, cx: &mut TaskContext<'_, ()>) -> Result<Step> {
            self.log.borrow_mut().push("spawner");
            if !self.spawned {
                self.spawned = true;
                cx.spawn(counted("child", None, &self.log));
            }
            Ok(Step::Pending)
        }
    }

    #[test]
    fn spawned_task_starts_next_tick() {
        let log = Log::default();
        let mut scheduler = Scheduler::new();
        scheduler.register(Spawner { log: log.clone(), spawned: false });
        scheduler.register(counted("after", None, &log));

        scheduler.run_tick(&mut ()).unwrap();
        assert_eq!(*log.borrow(), vec!["spawner", "after"]);
        assert_eq!(scheduler.len(), 3);

        log.borrow_mut().clear();
        scheduler.run_tick(&mut ()).unwrap();
        assert_eq!(*log.borrow(), vec!["spawner", "after", "child"]);
    }

    struct Failing;

    impl Task<()> for Failing {
        fn step(&mut self, _cx: &mut TaskContext<'_, ()>) -> Result<Step> {
            Err(GameError::UnknownObstacle(ObstacleId(9)))
        }
    }

    #[test]
    fn task_error_is_propagated() {
        let log = Log::default();
        let mut scheduler = Scheduler::new();
        scheduler.register(Failing);
        scheduler.register(counted("later", None, &log));

        let err = scheduler.run_tick(&mut ()).unwrap_err();
        assert!(matches!(err, GameError::UnknownObstacle(ObstacleId(9))));
        assert!(log.borrow().is_empty());
        assert_eq!(scheduler.len(), 2);
    }

    struct Bump;

    impl Task<u32> for Bump {
        fn step(&mut self, cx: &mut TaskContext<'_, u32>) -> Result<Step> {
            *cx.world += 1;
            Ok(Step::Pending)
        }
    }

    struct Observe(Rc<RefCell<Vec<u32>>>);

    impl Task<u32> for Observe {
        fn step(&mut self, cx: &mut TaskContext<'_, u32>) -> Result<Step> {
            self.0.borrow_mut().push(*cx.world);
            Ok(Step::Pending)
        }
    }

    #[test]
    fn later_tasks_see_earlier_mutations_in_the_same_pass() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.register(Bump);
        scheduler.register(Observe(seen.clone()));

        let mut counter = 0u32;
        scheduler.run_tick(&mut counter).unwrap();
        scheduler.run_tick(&mut counter).unwrap();
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }
}
