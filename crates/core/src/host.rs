//! The seam between the plugin and the game server hosting it.
//!
//! The server owns every entity and player. It hands out short lived
//! references for the duration of an event and the plugin never stores them.

use std::fmt;
use std::time::Instant;

pub type EntityId = u32;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Vec3 {
        Vec3 { x, y, z }
    }

    pub fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Vec3) -> f64 {
        self.sub(other).length()
    }

    /// Returns a unit vector. The zero vector is returned unchanged.
    pub fn normalize(self) -> Vec3 {
        let length = self.length();
        if length == 0.0 {
            return self;
        }
        Vec3::new(self.x / length, self.y / length, self.z / length)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    /// Any living creature that is not a player.
    Living,
    /// Items, projectiles, vehicles and the like.
    Other,
}

pub trait Entity {
    fn entity_id(&self) -> EntityId;

    fn kind(&self) -> EntityKind;

    /// The server's name for the entity type, e.g. `ZOMBIE` or `CAVE_SPIDER`.
    fn type_name(&self) -> &str;

    fn location(&self) -> Vec3;

    fn eye_location(&self) -> Vec3;

    /// Unit vector the entity is looking along.
    fn direction(&self) -> Vec3;

    fn is_dead(&self) -> bool;

    fn as_player(&self) -> Option<&dyn Player> {
        None
    }
}

pub trait Player: Entity {
    /// Stable identity used for preferences and throttling.
    fn name(&self) -> &str;

    fn has_permission(&self, node: &str) -> bool;

    /// Delivers one chat line, already translated to section sign formatting.
    fn send_message(&self, message: &str);
}

pub trait Server {
    fn online_players(&self) -> Vec<&dyn Player>;

    /// Entities within `radius` blocks of the player, excluding the player.
    fn nearby_entities(&self, player: &dyn Player, radius: f64) -> Vec<&dyn Entity>;

    /// Whether no blocks obstruct the view from the entity to the player.
    fn has_line_of_sight(&self, from: &dyn Entity, to: &dyn Player) -> bool;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Whether `entity` is facing `other`, i.e. the angle between its eye
/// direction and the line to the other's eyes is small.
pub fn is_looking_at<A, B>(entity: &A, other: &B, threshold: f64) -> bool
where
    A: Entity + ?Sized,
    B: Entity + ?Sized,
{
    let eye = entity.eye_location();
    let to_other = other.eye_location().sub(eye).normalize();
    to_other.dot(entity.direction()) > threshold
}
