//! Skratch, the player character.
//!
//! Runs left and right under keyboard or gamepad control, jumps while standing
//! on something, picks up blasters and fires them. Touching an enemy kills
//! him; the session notices through the removable flag.

use super::blaster::{Weapon, WeaponKit};
use crate::game::animation::{Gait, HumanoidFrames, Stance};
use crate::game::{Behavior, Body, Contact, Entity, EntityKind, ThinkContext};
use crate::math::Vector3;
use crate::platform::{Media, SoundHandle};
use crate::world::{CollisionFlags, TileGrid};

pub const SPRITE_DIR: &str = "characters/skratch";
pub const JUMP_SOUND: &str = "characters/skratch/jump.wav";
pub const WIDTH: i32 = 32;
pub const HEIGHT: i32 = 64;

pub const MASS: f32 = 1.0;
pub const MAX_SPEED: f32 = 325.0;
pub const ACCELERATION: f32 = 525.0;
pub const JUMP_SPEED: f32 = 650.0;

/// Drawn above everything else at the same spot.
pub const DEPTH: f32 = 1.0;

#[derive(Debug, Default)]
pub struct Player {
    gait: Gait,
    can_jump: bool,
    jump_sound: Option<SoundHandle>,
    kit: WeaponKit,
    blaster: Option<Weapon>,
}

impl Player {
    pub fn spawn(x: f32, y: f32) -> Entity {
        let body = Body::new(Vector3::new(x, y, DEPTH)).with_mass(MASS);
        Entity::new(body, Player::default())
    }
}

impl Behavior for Player {
    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn name(&self) -> &'static str {
        "skratch"
    }

    fn load_media(&mut self, body: &mut Body, media: &mut Media<'_>) {
        self.gait.frames = HumanoidFrames::load(media, SPRITE_DIR, WIDTH, HEIGHT);
        self.jump_sound = media.sound(JUMP_SOUND);
        self.kit = WeaponKit::load(media);
        body.sprite = self.gait.frames.right.idle;
    }

    fn think(&mut self, body: &mut Body, ctx: &mut ThinkContext<'_>) {
        if ctx.input.right {
            body.acceleration.set_x(ACCELERATION);
            self.set_state(body, Stance::RunningRight);
        } else if ctx.input.left {
            body.acceleration.set_x(-ACCELERATION);
            self.set_state(body, Stance::RunningLeft);
        } else {
            body.acceleration.clear_x();
            let stance = self.gait.stance();
            if stance.is_running() {
                self.set_state(body, stance.at_rest());
            }
        }

        if self.can_jump && ctx.input.consume_jump() {
            if let Some(sound) = self.jump_sound {
                ctx.audio.play(sound);
            }
            body.velocity.add_y(-JUMP_SPEED);
        } else {
            body.acceleration.clear_y();
        }

        if ctx.input.fire {
            let stance = self.gait.stance();
            if let Some(blaster) = self.blaster.as_mut() {
                blaster.shoot(body, stance, ctx);
            }
        }
    }

    fn on_animate(&mut self, body: &mut Body, dt: f32, flags: CollisionFlags, _grid: &TileGrid) {
        if body.position.x() < 0.0 {
            body.position.clear_x();
        }
        if body.position.y() < 0.0 {
            body.position.clear_y();
        }

        self.can_jump = flags.contains(CollisionFlags::BOTTOM);
        body.cap_speed_x(MAX_SPEED);

        if let Some(blaster) = self.blaster.as_mut() {
            blaster.lower_cool_time(dt);
        }
        self.gait.advance(body, dt);
    }

    fn on_collision(&mut self, body: &mut Body, other: Contact<'_>) {
        match other.kind {
            EntityKind::Item => {
                other.body.mark_removable();
                if self.blaster.is_none() {
                    log::info!("Picked up a blaster");
                }
                self.blaster = Some(Weapon::new(self.kit));
            }
            EntityKind::Enemy => body.mark_removable(),
            EntityKind::Player | EntityKind::Projectile => {}
        }
    }

    fn set_state(&mut self, body: &mut Body, stance: Stance) {
        self.gait.set_stance(body, stance);
    }
}
