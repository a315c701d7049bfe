//! Entity registry
//!
//! Owns every live entity. Each slot carries a generation that is bumped when
//! its entity is destroyed; an `EntityId` only resolves while its generation
//! matches, so a stale id held by a variant never reaches a newcomer in the
//! same slot. `order` is the dispatch and draw order.
//!
//! Destruction happens in exactly one place, `cleanup`. The think, animate and
//! render passes all tolerate entities that are flagged removable but still
//! present. Entities created during `all_think` wait in `pending` and are
//! admitted by `cleanup` as well, so no pass ever sees the set change under it.

use super::behavior::ThinkContext;
use super::entity::Entity;
use crate::input::InputSnapshot;
use crate::platform::{AudioService, Renderer};
use crate::world::{CollisionFlags, TileGrid};
use std::fmt::{self, Write as _};

/// Non-owning reference to a registered entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Default)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

pub struct EntityRegistry {
    slots: Vec<Slot>,
    /// Empty slot indices, reused last-freed first
    vacant: Vec<u32>,
    order: Vec<EntityId>,
    pending: Vec<Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
            order: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Take ownership of `entity`. It joins the end of the current order.
    pub fn register(&mut self, entity: Entity) -> EntityId {
        let index = match self.vacant.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.entity = Some(entity);

        let id = EntityId { index, generation: slot.generation };
        self.order.push(id);
        id
    }

    /// Hold `entity` until the next `cleanup`.
    pub fn defer(&mut self, entity: Entity) {
        self.pending.push(entity);
    }

    fn slot(&self, id: EntityId) -> Option<&Slot> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
    }

    fn slot_mut(&mut self, id: EntityId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slot(id)?.entity.as_ref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slot_mut(id)?.entity.as_mut()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Live entities, including ones flagged removable.
    pub fn count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entities waiting to be admitted.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Ids in current order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.get(id).map(|e| (id, e)))
    }

    /// Order by z, then x, then y, all ascending. Ties keep their order.
    pub fn sort(&mut self) {
        let slots = &self.slots;
        let position = |id: &EntityId| {
            slots
                .get(id.index as usize)
                .and_then(|slot| slot.entity.as_ref())
                .map(Entity::position)
        };
        self.order.sort_by(|a, b| {
            let (Some(pa), Some(pb)) = (position(a), position(b)) else {
                return std::cmp::Ordering::Equal;
            };
            pa.z()
                .total_cmp(&pb.z())
                .then(pa.x().total_cmp(&pb.x()))
                .then(pa.y().total_cmp(&pb.y()))
        });
    }

    /// Run `think` once on every entity that is not flagged removable.
    pub fn all_think(&mut self, grid: &TileGrid, input: &mut InputSnapshot, audio: &mut dyn AudioService) {
        let mut ctx = ThinkContext::new(grid, input, audio);
        for &id in &self.order {
            let Some(entity) = self.slots.get_mut(id.index as usize).and_then(|s| s.entity.as_mut()) else {
                continue;
            };
            if !entity.is_removable() {
                entity.think(&mut ctx);
            }
        }

        let spawned = ctx.into_spawned();
        if !spawned.is_empty() {
            log::debug!("{} entities spawned, admitted at cleanup", spawned.len());
            self.pending.extend(spawned);
        }
    }

    /// Integrate every entity that is not flagged removable.
    ///
    /// Each entity is lifted out of its slot for its own step so it can see
    /// all the others mutably. Returns the collision flags per entity.
    pub fn all_animate(&mut self, dt: f32, grid: &TileGrid) -> Vec<(EntityId, CollisionFlags)> {
        let mut results = Vec::with_capacity(self.order.len());
        for &id in &self.order {
            let index = id.index as usize;
            let Some(mut entity) = self.slots.get_mut(index).and_then(|s| s.entity.take()) else {
                continue;
            };
            if !entity.is_removable() {
                let others = self.slots.iter_mut().filter_map(|s| s.entity.as_mut());
                let flags = entity.animate(dt, grid, others);
                results.push((id, flags));
            }
            self.slots[index].entity = Some(entity);
        }
        results
    }

    /// Inclusive-edge box intersection; symmetric.
    pub fn overlaps(a: &Entity, b: &Entity) -> bool {
        a.overlaps(b)
    }

    /// Destroy every removable entity, then admit pending ones.
    /// Returns how many were destroyed.
    pub fn cleanup(&mut self) -> usize {
        let slots = &mut self.slots;
        let vacant = &mut self.vacant;
        let before = self.order.len();
        self.order.retain(|&id| {
            let Some(slot) = slots.get_mut(id.index as usize) else {
                return false;
            };
            if slot.entity.as_ref().map_or(false, |e| !e.is_removable()) {
                return true;
            }
            slot.entity = None;
            slot.generation = slot.generation.wrapping_add(1);
            vacant.push(id.index);
            false
        });
        let destroyed = before - self.order.len();

        for entity in std::mem::take(&mut self.pending) {
            self.register(entity);
        }
        destroyed
    }

    pub fn render_all(&self, grid: &TileGrid, renderer: &mut dyn Renderer) {
        for (_, entity) in self.iter() {
            entity.render(grid, renderer);
        }
    }

    /// Drop everything, pending entities included. Every id goes stale.
    pub fn free_all(&mut self) {
        for &id in &self.order {
            if let Some(slot) = self.slots.get_mut(id.index as usize) {
                slot.entity = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.vacant.push(id.index);
            }
        }
        self.order.clear();
        self.pending.clear();
    }

    /// One line per entity, for the entity dump.
    pub fn describe(&self) -> String {
        let mut out = format!("I have {} entities", self.count());
        for (i, (id, entity)) in self.iter().enumerate() {
            let _ = write!(out, "\n{}: {} {} at {}", i, entity.name(), id, entity.position());
            if entity.is_removable() {
                out.push_str(" (removable)");
            }
        }
        out
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
