//! The blaster: a pickup lying in the level, the weapon the player holds once
//! it is picked up, and the shots it fires.

use crate::game::animation::Stance;
use crate::game::{Behavior, Body, Entity, EntityKind, ThinkContext};
use crate::math::Vector3;
use crate::platform::{Media, SoundHandle, Sprite};
use crate::world::{CollisionFlags, TileGrid};

pub const PICKUP_SPRITE: &str = "items/blaster/blaster.tga";
pub const SHOT_SPRITE: &str = "items/blaster/shot.tga";
pub const SHOOT_SOUND: &str = "items/blaster/shot.wav";

pub const PICKUP_WIDTH: i32 = 16;
pub const PICKUP_HEIGHT: i32 = 16;
pub const SHOT_WIDTH: i32 = 8;
pub const SHOT_HEIGHT: i32 = 6;

/// Shot speed, px/s
pub const SHOT_SPEED: f32 = 650.0;

/// Seconds between shots
pub const COOL_TIME: f32 = 0.5;

/// The pickup.
#[derive(Debug, Default)]
pub struct Blaster;

impl Blaster {
    pub fn spawn(position: Vector3<f32>) -> Entity {
        Entity::new(Body::new(position), Blaster)
    }
}

impl Behavior for Blaster {
    fn kind(&self) -> EntityKind {
        EntityKind::Item
    }

    fn name(&self) -> &'static str {
        "blaster"
    }

    fn load_media(&mut self, body: &mut Body, media: &mut Media<'_>) {
        body.sprite = media.sprite(PICKUP_SPRITE, PICKUP_WIDTH, PICKUP_HEIGHT);
    }
}

/// Art and sound a held blaster needs, loaded up front with its owner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeaponKit {
    pub shot_sprite: Option<Sprite>,
    pub shoot_sound: Option<SoundHandle>,
}

impl WeaponKit {
    pub fn load(media: &mut Media<'_>) -> Self {
        Self {
            shot_sprite: media.sprite(SHOT_SPRITE, SHOT_WIDTH, SHOT_HEIGHT),
            shoot_sound: media.sound(SHOOT_SOUND),
        }
    }
}

/// A blaster in the player's hands.
#[derive(Debug, Clone)]
pub struct Weapon {
    kit: WeaponKit,
    cool_time: f32,
}

impl Weapon {
    pub fn new(kit: WeaponKit) -> Self {
        Self { kit, cool_time: 0.0 }
    }

    pub fn is_cool(&self) -> bool {
        self.cool_time <= 0.0
    }

    pub fn lower_cool_time(&mut self, dt: f32) {
        if self.cool_time > 0.0 {
            self.cool_time -= dt;
        }
    }

    /// Fire one shot from `shooter` if the weapon has cooled down.
    /// Returns true if a shot was spawned.
    pub fn shoot(&mut self, shooter: &Body, stance: Stance, ctx: &mut ThinkContext<'_>) -> bool {
        if !self.is_cool() {
            return false;
        }

        if let Some(sound) = self.kit.shoot_sound {
            ctx.audio.play(sound);
        }
        let shot = BlasterShot::spawn(
            shooter.position,
            stance,
            ctx.grid.tile_width(),
            ctx.grid.tile_height(),
            self.kit.shot_sprite,
        );
        ctx.spawn(shot);

        self.cool_time = COOL_TIME;
        true
    }
}

/// A projectile flying straight until it hits anything or leaves the screen.
#[derive(Debug, Default)]
pub struct BlasterShot;

impl BlasterShot {
    /// A shot leaves one block below the shooter's top, from the side it faces.
    pub fn spawn(
        shooter: Vector3<f32>,
        stance: Stance,
        block_width: i32,
        block_height: i32,
        sprite: Option<Sprite>,
    ) -> Entity {
        let mut position = shooter.snap();
        position.add_y(block_height as f32);

        let mut body = Body::new(position);
        if stance.faces_left() {
            body.velocity = Vector3::new(-SHOT_SPEED, 0.0, 0.0);
        } else {
            body.position.add_x(block_width as f32);
            body.velocity = Vector3::new(SHOT_SPEED, 0.0, 0.0);
        }
        body.sprite = sprite;
        Entity::new(body, BlasterShot)
    }
}

impl Behavior for BlasterShot {
    fn kind(&self) -> EntityKind {
        EntityKind::Projectile
    }

    fn name(&self) -> &'static str {
        "blaster shot"
    }

    fn load_media(&mut self, body: &mut Body, media: &mut Media<'_>) {
        body.sprite = media.sprite(SHOT_SPRITE, SHOT_WIDTH, SHOT_HEIGHT);
    }

    fn think(&mut self, body: &mut Body, ctx: &mut ThinkContext<'_>) {
        let x = body.position.snap().x();
        let camera = &ctx.grid.camera;
        let left = camera.offset.x() as f32;
        let right = left + camera.viewport_width as f32;
        if x < left || x > right {
            body.mark_removable();
        }
    }

    fn on_animate(&mut self, body: &mut Body, _dt: f32, flags: CollisionFlags, _grid: &TileGrid) {
        if !flags.is_empty() || body.position.x() < 0.0 || body.position.y() < 0.0 {
            body.mark_removable();
        }
    }
}
