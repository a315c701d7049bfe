//! Game module
//!
//! Entities, their physics and the per-frame session.
//!
//! Key concepts:
//! - `EntityId`: generational handle, stale once its entity is destroyed
//! - `Entity`: a physics `Body` plus a boxed `Behavior` for its archetype
//! - `EntityRegistry`: owns every live entity and runs the frame passes
//! - `GameSession`: a loaded level, the player, lives and pause state
//!
//! Destruction is always deferred: entities flag themselves (or each other)
//! removable and the registry drops them at cleanup, after rendering.

pub mod animation;
pub mod behavior;
pub mod entity;
pub mod hud;
pub mod registry;
pub mod runtime;
pub mod variants;

pub use animation::Stance;
pub use behavior::{Behavior, Contact, EntityKind, ThinkContext};
pub use entity::{Aabb, Body, Entity, FRICTION, GRAVITY};
pub use registry::{EntityId, EntityRegistry};
pub use runtime::{GameSession, Outcome, DEFAULT_LIVES};
