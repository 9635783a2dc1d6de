//! Entities as seen by one player: the last two positions and rotations of every
//! visible entity, enough to interpolate where the client rendered it.

mod registry;

pub use registry::EntityRegistry;

use glam::DVec3;
use vigil_protocol::packets::game::CAddActor;
use vigil_utils::{Aabb, Rotation};

/// Width and height used when the spawn packet carries no usable dimensions.
const DEFAULT_DIMENSIONS: (f64, f64) = (0.6, 1.8);

/// An entity visible to the player.
#[derive(Clone, Debug)]
pub struct TrackedEntity {
    /// Runtime ID assigned by the server.
    pub runtime_id: u64,
    /// Feet position the client is currently rendering.
    pub position: DVec3,
    /// Feet position at the start of the current tick.
    pub prev_position: DVec3,
    /// Last velocity the server sent.
    pub velocity: DVec3,
    /// Current rotation.
    pub rotation: Rotation,
    /// Rotation at the start of the current tick.
    pub prev_rotation: Rotation,
    /// Bounding box at the origin, translated to a position on use.
    pub bounding_box: Aabb,
    /// Ticks since the server last teleported this entity.
    pub ticks_since_teleport: u64,
    /// Whether this entity is another player.
    pub is_player: bool,
    moved_this_tick: bool,
}

impl TrackedEntity {
    /// Creates an entity standing at `position`.
    #[must_use]
    pub fn new(runtime_id: u64, position: DVec3, bounding_box: Aabb, is_player: bool) -> Self {
        Self {
            runtime_id,
            position,
            prev_position: position,
            velocity: DVec3::ZERO,
            rotation: Rotation::default(),
            prev_rotation: Rotation::default(),
            bounding_box,
            ticks_since_teleport: 0,
            is_player,
            moved_this_tick: false,
        }
    }

    /// Creates an entity from its spawn packet.
    #[must_use]
    pub fn from_add_actor(pk: &CAddActor) -> Self {
        let (width, height) = if pk.width > 0.0 && pk.height > 0.0 {
            (f64::from(pk.width), f64::from(pk.height))
        } else {
            DEFAULT_DIMENSIONS
        };
        let mut entity = Self::new(
            pk.runtime_id,
            pk.position.as_dvec3(),
            Aabb::from_dimensions(width, height),
            pk.is_player(),
        );
        entity.velocity = pk.velocity.as_dvec3();
        entity.rotation = Rotation::new(f64::from(pk.yaw), f64::from(pk.pitch));
        entity.prev_rotation = entity.rotation;
        entity
    }

    /// Moves the entity. A teleport collapses the interpolation range onto the new position.
    pub fn move_to(&mut self, position: DVec3, rotation: Rotation, teleport: bool) {
        if teleport {
            self.prev_position = position;
            self.prev_rotation = rotation;
            self.ticks_since_teleport = 0;
        } else {
            self.prev_position = self.position;
            self.prev_rotation = self.rotation;
        }
        self.position = position;
        self.rotation = rotation;
        self.moved_this_tick = true;
    }

    /// The bounding box placed at `position`.
    #[must_use]
    pub fn aabb_at(&self, position: DVec3) -> Aabb {
        self.bounding_box.translate(position)
    }

    /// The bounding box at the current position.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        self.aabb_at(self.position)
    }

    /// The position `t` of the way from the previous to the current position.
    #[must_use]
    pub fn lerp_position(&self, t: f64) -> DVec3 {
        self.prev_position.lerp(self.position, t)
    }

    /// Advances the entity by one tick. An entity that didn't move settles on its position.
    pub fn tick(&mut self) {
        self.ticks_since_teleport = self.ticks_since_teleport.saturating_add(1);
        if !self.moved_this_tick {
            self.prev_position = self.position;
            self.prev_rotation = self.rotation;
        }
        self.moved_this_tick = false;
    }
}
