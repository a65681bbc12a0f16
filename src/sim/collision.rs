//! Collision detection for axis-aligned boxes
//!
//! Extents are half-open: a box covers `[min, min + size)` on each axis, so
//! two boxes that only share an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};

/// Axis-aligned bounding box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Both dimensions strictly positive (and not NaN)
    pub fn is_valid(&self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0
    }

    /// Half-open overlap test on both axes
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

/// Find the obstacle the player is touching, if any.
///
/// When several overlap in the same tick the lowest id wins.
///
/// # Panics
///
/// Panics if any box reaching the detector has a non-positive dimension;
/// that can only come from a bug upstream and would corrupt scoring.
pub fn check<'a>(
    player: &Entity,
    obstacles: impl IntoIterator<Item = &'a Entity>,
) -> Option<EntityId> {
    let player_box = player.aabb();
    assert!(
        player_box.is_valid(),
        "player {} has invalid box size {:?}",
        player.id,
        player_box.size
    );

    let mut hit: Option<EntityId> = None;
    for obstacle in obstacles {
        let obstacle_box = obstacle.aabb();
        assert!(
            obstacle_box.is_valid(),
            "obstacle {} has invalid box size {:?}",
            obstacle.id,
            obstacle_box.size
        );
        if player_box.overlaps(&obstacle_box) && hit.is_none_or(|id| obstacle.id < id) {
            hit = Some(obstacle.id);
        }
    }
    hit
}
