//! Per-archetype behaviour
//!
//! Every gameplay variant implements `Behavior`. The physics in
//! `Entity::animate` is the same for all of them; it only calls out through
//! these hooks. All hooks default to doing nothing.

use super::animation::Stance;
use super::entity::{Body, Entity};
use crate::input::InputSnapshot;
use crate::platform::{AudioService, Media};
use crate::world::{CollisionFlags, TileGrid};

/// What an entity is, for collision responses that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Projectile,
    Enemy,
    Item,
}

/// The other side of an entity-entity overlap.
pub struct Contact<'a> {
    pub kind: EntityKind,
    pub body: &'a mut Body,
}

/// Everything `think` may look at or touch.
///
/// Entities created here are not live yet: the registry admits them at the
/// next cleanup, so the current pass never sees them.
pub struct ThinkContext<'a> {
    pub grid: &'a TileGrid,
    pub input: &'a mut InputSnapshot,
    pub audio: &'a mut dyn AudioService,
    spawned: Vec<Entity>,
}

impl<'a> ThinkContext<'a> {
    pub fn new(grid: &'a TileGrid, input: &'a mut InputSnapshot, audio: &'a mut dyn AudioService) -> Self {
        Self {
            grid,
            input,
            audio,
            spawned: Vec::new(),
        }
    }

    pub fn spawn(&mut self, entity: Entity) {
        self.spawned.push(entity);
    }

    pub fn into_spawned(self) -> Vec<Entity> {
        self.spawned
    }
}

pub trait Behavior {
    fn kind(&self) -> EntityKind;

    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Bind sprites and sounds. Sets the body's initial sprite.
    fn load_media(&mut self, _body: &mut Body, _media: &mut Media<'_>) {}

    /// Decision logic, before integration.
    fn think(&mut self, _body: &mut Body, _ctx: &mut ThinkContext<'_>) {}

    /// Reaction after integration has committed the new position.
    fn on_animate(&mut self, _body: &mut Body, _dt: f32, _flags: CollisionFlags, _grid: &TileGrid) {}

    /// Called once per overlapping entity, every frame the overlap holds.
    fn on_collision(&mut self, _body: &mut Body, _other: Contact<'_>) {}

    fn set_state(&mut self, _body: &mut Body, _stance: Stance) {}
}
