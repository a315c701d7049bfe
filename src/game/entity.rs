//! Entities and their physics
//!
//! An `Entity` is a `Body` (the kinematic state every entity has) plus a boxed
//! `Behavior` for the archetype-specific parts. `animate` is the per-frame
//! integration step:
//!
//! 1. No sprite bound (negative size) ⇒ only `on_animate`, empty flags
//! 2. Gravity accumulates into acceleration
//! 3. Constant-acceleration kinematics give a candidate position
//! 4. The candidate is resolved against the tile grid
//! 5. Hits zero the blocked axis; floor/ceiling contact adds friction,
//!    otherwise velocity integrates
//! 6. Overlap scan against the other entities, using the position from
//!    *before* this step
//! 7. Commit, then `on_animate`

use super::animation::Stance;
use super::behavior::{Behavior, Contact, EntityKind, ThinkContext};
use crate::math::Vector3;
use crate::platform::{Media, Rect, Renderer, Sprite};
use crate::world::{self, CollisionFlags, TileGrid};

/// Downward acceleration per unit of mass, px/s²
pub const GRAVITY: f32 = 1550.0;

/// Horizontal deceleration per unit of mass while touching a floor or ceiling
pub const FRICTION: f32 = 100.0;

/// Axis-aligned box in world pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// A box with negative extent has nothing to collide with.
    pub fn is_degenerate(&self) -> bool {
        self.w < 0.0 || self.h < 0.0
    }

    /// Inclusive-edge intersection on both axes. Symmetric.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.x <= other.x + other.w
            && other.x <= self.x + self.w
            && self.y <= other.y + other.h
            && other.y <= self.y + self.h
    }
}

/// Kinematic state shared by every entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub acceleration: Vector3<f32>,
    /// 0 means gravity does not apply
    pub mass: f32,
    pub sprite: Option<Sprite>,
    pub animation_seconds: f32,
    pub removable: bool,
}

impl Body {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position,
            velocity: Vector3::zero(),
            acceleration: Vector3::zero(),
            mass: 0.0,
            sprite: None,
            animation_seconds: 0.0,
            removable: false,
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Sprite width, or -1 with no sprite bound.
    pub fn width(&self) -> i32 {
        self.sprite.map_or(-1, |s| s.width)
    }

    pub fn height(&self) -> i32 {
        self.sprite.map_or(-1, |s| s.height)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.position.x(),
            self.position.y(),
            self.width() as f32,
            self.height() as f32,
        )
    }

    pub fn mark_removable(&mut self) {
        self.removable = true;
    }

    /// Keep the box inside `[0, limit]` on x; returns true if it moved.
    pub fn clamp_x(&mut self, limit: i32) -> bool {
        let x = self.position.x();
        if x < 0.0 {
            self.position.clear_x();
            true
        } else if x + self.width() as f32 > limit as f32 {
            self.position.set_x((limit - self.width()) as f32);
            true
        } else {
            false
        }
    }

    /// Cap horizontal speed to `max` in either direction.
    pub fn cap_speed_x(&mut self, max: f32) {
        let vx = self.velocity.x();
        if vx > max {
            self.velocity.set_x(max);
        } else if vx < -max {
            self.velocity.set_x(-max);
        }
    }
}

pub struct Entity {
    pub body: Body,
    behavior: Box<dyn Behavior>,
}

impl Entity {
    pub fn new(body: Body, behavior: impl Behavior + 'static) -> Self {
        Self {
            body,
            behavior: Box::new(behavior),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.behavior.kind()
    }

    pub fn name(&self) -> &'static str {
        self.behavior.name()
    }

    pub fn is_removable(&self) -> bool {
        self.body.removable
    }

    pub fn position(&self) -> Vector3<f32> {
        self.body.position
    }

    pub fn overlaps(&self, other: &Entity) -> bool {
        self.body.bounds().overlaps(&other.body.bounds())
    }

    pub fn load_media(&mut self, media: &mut Media<'_>) {
        self.behavior.load_media(&mut self.body, media);
    }

    pub fn think(&mut self, ctx: &mut ThinkContext<'_>) {
        self.behavior.think(&mut self.body, ctx);
    }

    pub fn set_state(&mut self, stance: Stance) {
        self.behavior.set_state(&mut self.body, stance);
    }

    /// One integration step. `others` must not contain `self`.
    pub fn animate<'a, I>(&mut self, dt: f32, grid: &TileGrid, others: I) -> CollisionFlags
    where
        I: IntoIterator<Item = &'a mut Entity>,
    {
        let body = &mut self.body;
        let (width, height) = (body.width(), body.height());
        if width < 0 || height < 0 {
            self.behavior.on_animate(body, dt, CollisionFlags::NONE, grid);
            return CollisionFlags::NONE;
        }

        body.acceleration.add_y(GRAVITY * body.mass);

        let candidate = body.position + body.velocity * dt + body.acceleration * dt * dt / 2.0;
        let resolution = world::resolve(body.position, candidate, width, height, grid);
        let flags = resolution.flags;

        if flags.horizontal() {
            body.velocity.clear_x();
            body.acceleration.clear_x();
        }
        if flags.vertical() {
            body.velocity.clear_y();
            body.acceleration.clear_y();

            let vx = body.velocity.x();
            if vx > 0.0 {
                body.acceleration.add_x(-FRICTION * body.mass);
            } else if vx < 0.0 {
                body.acceleration.add_x(FRICTION * body.mass);
            }
        } else {
            body.velocity = body.velocity + body.acceleration * dt;
        }

        // Overlaps are tested before the new position is committed
        let bounds = body.bounds();
        for other in others {
            if bounds.overlaps(&other.body.bounds()) {
                let contact = Contact {
                    kind: other.kind(),
                    body: &mut other.body,
                };
                self.behavior.on_collision(&mut self.body, contact);
            }
        }

        self.body.position = resolution.position;
        self.behavior.on_animate(&mut self.body, dt, flags, grid);
        flags
    }

    /// Draw relative to the camera; off-screen entities are skipped.
    pub fn render(&self, grid: &TileGrid, renderer: &mut dyn Renderer) {
        let Some(sprite) = self.body.sprite else {
            return;
        };
        let pos = self.body.position.to_pixels();
        let camera = &grid.camera;
        if !camera.sees(pos.x(), pos.y(), sprite.width, sprite.height) {
            return;
        }
        let dest = Rect::new(
            pos.x() - camera.offset.x(),
            pos.y() - camera.offset.y(),
            sprite.width,
            sprite.height,
        );
        renderer.render(sprite.handle, dest);
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name())
            .field("body", &self.body)
            .finish()
    }
}
