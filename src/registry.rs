use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use log::{debug, error};

use crate::error::{GameError, Result};
use crate::obstacles::{Obstacle, ObstacleId};

#[derive(Default)]
struct RegistryState {
    obstacles: BTreeMap<ObstacleId, Obstacle>,
    collided: HashSet<ObstacleId>,
    next_id: u64,
}

/// Live obstacles plus the set of obstacles hit but not yet destroyed.
///
/// Cloning yields another handle onto the same registry. Every call borrows
/// the state for its own duration only, so callbacks passed to
/// `for_each_obstacle` must not call back into the registry.
#[derive(Clone, Default)]
pub struct EntityRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an obstacle and returns the guard that owns it.
    pub fn add_obstacle(&self, row: f64, column: f64, rows_size: usize, columns_size: usize) -> ObstacleGuard {
        let mut state = self.state.borrow_mut();
        let id = ObstacleId(state.next_id);
        state.next_id += 1;
        state.obstacles.insert(id, Obstacle::new(id, row, column, rows_size, columns_size));
        debug!("Obstacle {} added at row {}, column {} ({}x{})", id, row, column, columns_size, rows_size);
        ObstacleGuard { registry: self.clone(), id }
    }

    pub fn remove_obstacle(&self, id: ObstacleId) -> Result<Obstacle> {
        let mut state = self.state.borrow_mut();
        state.collided.remove(&id);
        let obstacle = state.obstacles.remove(&id).ok_or(GameError::UnknownObstacle(id))?;
        debug!("Obstacle {} removed", id);
        Ok(obstacle)
    }

    pub fn move_obstacle(&self, id: ObstacleId, row: f64) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let obstacle = state.obstacles.get_mut(&id).ok_or(GameError::UnknownObstacle(id))?;
        obstacle.row = row;
        Ok(())
    }

    pub fn get(&self, id: ObstacleId) -> Option<Obstacle> {
        self.state.borrow().obstacles.get(&id).cloned()
    }

    pub fn for_each_obstacle(&self, mut f: impl FnMut(&Obstacle)) {
        for obstacle in self.state.borrow().obstacles.values() {
            f(obstacle);
        }
    }

    /// Every obstacle containing the point.
    pub fn hits_at(&self, row: f64, column: f64) -> Vec<ObstacleId> {
        let mut hits = Vec::new();
        self.for_each_obstacle(|obstacle| {
            if obstacle.contains_point(row, column) {
                hits.push(obstacle.id);
            }
        });
        hits
    }

    /// First obstacle containing the point, in registration order.
    pub fn first_hit_at(&self, row: f64, column: f64) -> Option<ObstacleId> {
        self.state
            .borrow()
            .obstacles
            .values()
            .find(|obstacle| obstacle.contains_point(row, column))
            .map(|obstacle| obstacle.id)
    }

    pub fn mark_collided(&self, id: ObstacleId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.obstacles.contains_key(&id) {
            return Err(GameError::UnknownObstacle(id));
        }
        state.collided.insert(id);
        Ok(())
    }

    /// True and clears the mark iff the obstacle was marked.
    pub fn take_collided(&self, id: ObstacleId) -> bool {
        self.state.borrow_mut().collided.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.state.borrow().obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scoped ownership of one registered obstacle.
///
/// The obstacle leaves the registry when the guard is dropped.
pub struct ObstacleGuard {
    registry: EntityRegistry,
    id: ObstacleId,
}

impl ObstacleGuard {
    pub fn id(&self) -> ObstacleId {
        self.id
    }

    pub fn set_row(&self, row: f64) -> Result<()> {
        self.registry.move_obstacle(self.id, row)
    }
}

impl Drop for ObstacleGuard {
    fn drop(&mut self) {
        if let Err(e) = self.registry.remove_obstacle(self.id) {
            error!("Failed to release obstacle on drop: {}", e);
        }
    }
}
