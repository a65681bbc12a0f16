//! Entities and the entity store
//!
//! Positions are the top-left corner of the entity's box, in playfield
//! units with y growing downward. Velocities are units per second.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

pub type EntityId = u32;

/// Gap between a standing runner's head and the underside of a branch
pub const BRANCH_CLEARANCE: f32 = 12.0;

/// Obstacle variants. Only box size and resting height differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Short stump on the ground
    Stump,
    /// Long, low log on the ground
    Log,
    /// Overhanging tree limb, only reachable mid-jump
    Branch,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Stump, ObstacleKind::Log, ObstacleKind::Branch];

    /// Box size (width, height)
    pub fn size(self) -> Vec2 {
        match self {
            ObstacleKind::Stump => Vec2::new(30.0, 45.0),
            ObstacleKind::Log => Vec2::new(70.0, 28.0),
            ObstacleKind::Branch => Vec2::new(60.0, 24.0),
        }
    }

    /// Top edge y for this kind given the ground line and runner height
    pub fn resting_y(self, ground_y: f32, player_height: f32) -> f32 {
        match self {
            ObstacleKind::Stump | ObstacleKind::Log => ground_y - self.size().y,
            ObstacleKind::Branch => ground_y - player_height - BRANCH_CLEARANCE - self.size().y,
        }
    }

    /// Whether the runner has to jump to clear this obstacle
    pub fn is_grounded(self) -> bool {
        !matches!(self, ObstacleKind::Branch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Obstacle(ObstacleKind),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub role: Role,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Box width and height, both strictly positive
    pub size: Vec2,
}

impl Entity {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// X of the right edge. Obstacles move left, so `pos.x` leads and this
    /// edge trails; an obstacle is fully off screen once it passes 0.
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn kind(&self) -> Option<ObstacleKind> {
        match self.role {
            Role::Obstacle(kind) => Some(kind),
            Role::Player => None,
        }
    }
}

/// Player plus active obstacles, iterated in creation order.
///
/// Removals are queued and only applied by [`EntityStore::flush_removals`]
/// at the end of a tick, so ids stay valid for the rest of the tick.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    player: Option<Entity>,
    /// Sorted by id, which is creation order
    obstacles: Vec<Entity>,
    pending_removal: Vec<EntityId>,
    next_id: EntityId,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create the runner, replacing any previous one
    pub fn spawn_player(&mut self, pos: Vec2, size: Vec2) -> EntityId {
        let id = self.next_entity_id();
        self.player = Some(Entity {
            id,
            role: Role::Player,
            pos,
            vel: Vec2::ZERO,
            size,
        });
        id
    }

    pub fn create_obstacle(&mut self, pos: Vec2, kind: ObstacleKind, vel: Vec2) -> EntityId {
        let id = self.next_entity_id();
        self.obstacles.push(Entity {
            id,
            role: Role::Obstacle(kind),
            pos,
            vel,
            size: kind.size(),
        });
        id
    }

    /// Queue an entity for removal at the end of the tick
    pub fn remove_entity(&mut self, id: EntityId) {
        if !self.pending_removal.contains(&id) {
            self.pending_removal.push(id);
        }
    }

    pub fn is_pending_removal(&self, id: EntityId) -> bool {
        self.pending_removal.contains(&id)
    }

    /// Apply queued removals
    pub fn flush_removals(&mut self) {
        if self.pending_removal.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending_removal);
        if self.player.as_ref().is_some_and(|p| pending.contains(&p.id)) {
            self.player = None;
        }
        self.obstacles.retain(|o| !pending.contains(&o.id));
    }

    /// Remove everything immediately (session reset)
    pub fn clear(&mut self) {
        self.player = None;
        self.obstacles.clear();
        self.pending_removal.clear();
    }

    /// Visit the player first, then obstacles in creation order
    pub fn for_each(&self, mut visitor: impl FnMut(&Entity)) {
        if let Some(player) = &self.player {
            visitor(player);
        }
        for obstacle in &self.obstacles {
            visitor(obstacle);
        }
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.player.as_mut()
    }

    pub fn player_position(&self) -> Option<Vec2> {
        self.player.as_ref().map(|p| p.pos)
    }

    pub fn obstacles(&self) -> &[Entity] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut [Entity] {
        &mut self.obstacles
    }

    /// Obstacles not queued for removal
    pub fn live_obstacles(&self) -> impl Iterator<Item = &Entity> {
        self.obstacles
            .iter()
            .filter(|o| !self.pending_removal.contains(&o.id))
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }
}
