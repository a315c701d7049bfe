//! Blue-collar suit: a walking enemy. Kills the player on contact and dies
//! to a single blaster shot, taking the shot with it.

use crate::game::animation::{Gait, HumanoidFrames, Stance};
use crate::game::{Behavior, Body, Contact, Entity, EntityKind};
use crate::math::Vector3;
use crate::platform::Media;
use crate::world::{CollisionFlags, TileGrid};

pub const SPRITE_DIR: &str = "characters/bluecollarsuit";
pub const WIDTH: i32 = 32;
pub const HEIGHT: i32 = 64;

pub const MASS: f32 = 1.0;
pub const MAX_SPEED: f32 = 75.0;

#[derive(Debug, Default)]
pub struct Suit {
    gait: Gait,
}

impl Suit {
    pub fn spawn(position: Vector3<f32>) -> Entity {
        Entity::new(Body::new(position).with_mass(MASS), Suit::default())
    }
}

impl Behavior for Suit {
    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
    }

    fn name(&self) -> &'static str {
        "blue collar suit"
    }

    fn load_media(&mut self, body: &mut Body, media: &mut Media<'_>) {
        self.gait.frames = HumanoidFrames::load(media, SPRITE_DIR, WIDTH, HEIGHT);
        body.sprite = self.gait.frames.right.idle;
    }

    fn on_animate(&mut self, body: &mut Body, dt: f32, _flags: CollisionFlags, grid: &TileGrid) {
        body.clamp_x(grid.pixel_width());
        if body.position.y() < 0.0 {
            body.position.clear_y();
        } else if body.position.y() + body.height() as f32 > grid.pixel_height() as f32 {
            body.position.set_y((grid.pixel_height() - body.height()) as f32);
        }

        body.cap_speed_x(MAX_SPEED);
        self.gait.advance(body, dt);
    }

    fn on_collision(&mut self, body: &mut Body, other: Contact<'_>) {
        if other.kind == EntityKind::Projectile {
            body.mark_removable();
            other.body.mark_removable();
        }
    }

    fn set_state(&mut self, body: &mut Body, stance: Stance) {
        self.gait.set_stance(body, stance);
    }
}
